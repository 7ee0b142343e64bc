//! 长期记忆 Store
//!
//! 只追加的个人事实记录：没有更新、删除或过期路径。
//! 检索只按创建时间取最近的若干条，不做相关度排序，也不去重。
//!
//! ## 内置实现
//!
//! - [`InMemoryMemoryStore`]：进程内存，适合开发和测试
//! - [`PgStore`](super::postgres::PgStore)：PostgreSQL 持久化

use crate::error::{Result, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// 一条记忆，创建后不可变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    pub id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// 追加一条记忆，标识与时间戳由存储层分配
    async fn create(&self, text: &str) -> Result<Memory>;

    /// 最近创建的至多 `limit` 条记忆（按创建时间倒序）
    async fn recent(&self, limit: usize) -> Result<Vec<Memory>>;
}

/// 进程内存 MemoryStore，不持久化
///
/// `set_failing(true)` 之后所有操作返回 [`StoreError::Unavailable`]，用于测试降级路径。
pub struct InMemoryMemoryStore {
    /// 按创建顺序排列
    items: RwLock<Vec<Memory>>,
    failing: AtomicBool,
}

impl Default for InMemoryMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMemoryStore {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store switched off".to_string()).into());
        }
        Ok(())
    }
}

#[async_trait]
impl MemoryStore for InMemoryMemoryStore {
    async fn create(&self, text: &str) -> Result<Memory> {
        self.check()?;
        let memory = Memory {
            id: Uuid::now_v7(),
            text: text.to_string(),
            created_at: Utc::now(),
        };
        self.items.write().await.push(memory.clone());
        debug!(id = %memory.id, "💡 记忆已写入");
        Ok(memory)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Memory>> {
        self.check()?;
        let items = self.items.read().await;
        Ok(items.iter().rev().take(limit).cloned().collect())
    }
}
