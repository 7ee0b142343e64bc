//! 会话消息日志
//!
//! 每个 Turn 追加到内存会话后立即写入（write-through），只在冷启动水合时按
//! 创建时间升序读回。工具 Turn 不落库。

use crate::error::{Result, StoreError};
use crate::session::Role;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

/// 持久化的一行会话消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRow {
    pub id: Uuid,
    pub session_id: String,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// 追加一行，只插入不更新
    async fn append(&self, session_id: &str, role: Role, content: &str) -> Result<()>;

    /// 指定会话的全部行，按创建时间升序
    async fn load_session(&self, session_id: &str) -> Result<Vec<ConversationRow>>;
}

/// 进程内存 ConversationStore
pub struct InMemoryConversationStore {
    sessions: RwLock<HashMap<String, Vec<ConversationRow>>>,
    failing: AtomicBool,
}

impl Default for InMemoryConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// 打开后所有读写都失败，用于测试水合降级与软失败路径
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// 直接写入一行（测试用：模拟历史数据）
    pub async fn insert_row(&self, row: ConversationRow) {
        self.sessions
            .write()
            .await
            .entry(row.session_id.clone())
            .or_default()
            .push(row);
    }

    /// 某个会话当前已落库的行数
    pub async fn row_count(&self, session_id: &str) -> usize {
        self.sessions
            .read()
            .await
            .get(session_id)
            .map(Vec::len)
            .unwrap_or(0)
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store switched off".to_string()).into());
        }
        Ok(())
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn append(&self, session_id: &str, role: Role, content: &str) -> Result<()> {
        self.check()?;
        let row = ConversationRow {
            id: Uuid::now_v7(),
            session_id: session_id.to_string(),
            role,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        self.insert_row(row).await;
        Ok(())
    }

    async fn load_session(&self, session_id: &str) -> Result<Vec<ConversationRow>> {
        self.check()?;
        let mut rows = self
            .sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .unwrap_or_default();
        // 稳定排序：同一时间戳保持插入顺序
        rows.sort_by_key(|r| r.created_at);
        Ok(rows)
    }
}
