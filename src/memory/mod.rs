//! 持久化层
//!
//! | 存储 | Trait | 作用 |
//! |------|-------|------|
//! | 长期记忆 | [`MemoryStore`] | 跨会话的个人事实，供系统提示词摘要使用 |
//! | 会话日志 | [`ConversationStore`] | 每个会话的只追加消息日志，冷启动时用于水合 |
//!
//! 两者都有进程内存实现（开发、测试）和 [`PgStore`] 实现（生产）。
//!
//! ```rust,no_run
//! use voice_assistant::memory::{InMemoryMemoryStore, MemoryStore};
//!
//! # async fn example() -> voice_assistant::error::Result<()> {
//! let store = InMemoryMemoryStore::new();
//! store.create("User lives in Austin").await?;
//! let recent = store.recent(5).await?;
//! assert_eq!(recent[0].text, "User lives in Austin");
//! # Ok(())
//! # }
//! ```

pub mod conversation;
pub mod postgres;
pub mod store;

pub use conversation::{ConversationRow, ConversationStore, InMemoryConversationStore};
pub use postgres::PgStore;
pub use store::{InMemoryMemoryStore, Memory, MemoryStore};
