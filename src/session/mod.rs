//! 会话状态
//!
//! - [`transcript`]：Turn 变体与会话 Turn 序列
//! - [`cache`]：会话缓存，按会话 id 发放独占租约，冷启动时从会话日志水合
//! - [`prompt`]：系统指令组装（人设模板 + 最近记忆摘要）

pub mod cache;
pub mod prompt;
pub mod transcript;

pub use cache::{SessionCache, SessionLease, new_session_id};
pub use prompt::{MEMORY_DIGEST_LIMIT, PromptComposer};
pub use transcript::{Role, SessionTranscript, Turn};
