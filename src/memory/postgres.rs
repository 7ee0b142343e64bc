//! PostgreSQL 持久化
//!
//! `conversations` 与 `memories` 两张表，都只插入不更新。每条语句独立执行，
//! 不跨语句开事务；标识与时间戳由列默认值分配。

use crate::config::DatabaseConfig;
use crate::error::{AssistantError, Result, StoreError};
use crate::memory::conversation::{ConversationRow, ConversationStore};
use crate::memory::store::{Memory, MemoryStore};
use crate::session::Role;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS conversations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    session_id TEXT NOT NULL,
    role TEXT NOT NULL CHECK (role IN ('system', 'user', 'assistant')),
    content TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp()
);
CREATE INDEX IF NOT EXISTS conversations_session_created_idx
    ON conversations (session_id, created_at);
CREATE TABLE IF NOT EXISTS memories (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    memory TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp()
);
"#;

#[derive(sqlx::FromRow)]
struct ConversationRecord {
    id: Uuid,
    session_id: String,
    role: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ConversationRecord> for ConversationRow {
    type Error = AssistantError;

    fn try_from(record: ConversationRecord) -> Result<Self> {
        Ok(ConversationRow {
            id: record.id,
            session_id: record.session_id,
            role: record.role.parse::<Role>()?,
            content: record.content,
            created_at: record.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct MemoryRecord {
    id: Uuid,
    memory: String,
    created_at: DateTime<Utc>,
}

impl From<MemoryRecord> for Memory {
    fn from(record: MemoryRecord) -> Self {
        Memory {
            id: record.id,
            text: record.memory,
            created_at: record.created_at,
        }
    }
}

/// 同时实现 [`ConversationStore`] 与 [`MemoryStore`] 的连接池存储
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// 建立有界连接池并确认数据库可达
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let url = config.url.as_deref().ok_or_else(|| {
            AssistantError::Config(crate::error::ConfigError::MissingField(
                "database.url".to_string(),
            ))
        })?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_millis(config.acquire_timeout_ms))
            .idle_timeout(Duration::from_millis(config.idle_timeout_ms))
            .connect(url)
            .await?;

        sqlx::query("SELECT 1").execute(&pool).await?;
        info!(
            max_connections = config.max_connections,
            "🗄️ 数据库连接池已建立"
        );
        Ok(Self { pool })
    }

    /// 建表（幂等）
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        debug!("数据库表结构已就绪");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ConversationStore for PgStore {
    async fn append(&self, session_id: &str, role: Role, content: &str) -> Result<()> {
        sqlx::query("INSERT INTO conversations (session_id, role, content) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(role.as_str())
            .bind(content)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn load_session(&self, session_id: &str) -> Result<Vec<ConversationRow>> {
        let records = sqlx::query_as::<_, ConversationRecord>(
            "SELECT id, session_id, role, content, created_at FROM conversations \
             WHERE session_id = $1 ORDER BY created_at ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        records.into_iter().map(ConversationRow::try_from).collect()
    }
}

#[async_trait]
impl MemoryStore for PgStore {
    async fn create(&self, text: &str) -> Result<Memory> {
        let record = sqlx::query_as::<_, MemoryRecord>(
            "INSERT INTO memories (memory) VALUES ($1) RETURNING id, memory, created_at",
        )
        .bind(text)
        .fetch_one(&self.pool)
        .await?;
        Ok(record.into())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Memory>> {
        let limit = i64::try_from(limit).map_err(|_| {
            StoreError::Query(format!("memory limit {limit} does not fit a BIGINT"))
        })?;
        let records = sqlx::query_as::<_, MemoryRecord>(
            "SELECT id, memory, created_at FROM memories ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(records.into_iter().map(Memory::from).collect())
    }
}
