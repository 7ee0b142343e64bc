pub mod agent;
pub mod config;
pub mod error;
pub mod llm;
pub mod memory;
pub mod server;
pub mod session;
pub mod testing;
pub mod tools;

pub mod prelude {
    pub use crate::agent::{ChatReply, ChatRequest, OrchestratorConfig, TurnOrchestrator};
    pub use crate::error::Result;
    pub use crate::llm::LlmClient;
    pub use crate::memory::{ConversationStore, MemoryStore};
    pub use crate::session::{SessionCache, Turn};
    pub use crate::tools::{Tool, ToolDispatcher, ToolParameters, ToolResult};
}
