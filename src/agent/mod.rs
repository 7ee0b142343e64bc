//! 单轮对话编排
//!
//! 一句用户话语进入 [`TurnOrchestrator::handle_turn`]，经过
//! `Idle → AwaitingModel → (ToolExecution)* → Finalizing → Done`，
//! 任何阶段出错都进入 `Failed`，会话回滚到本轮开始前的长度。

use crate::session::new_session_id;

pub use config::OrchestratorConfig;
pub use orchestrator::TurnOrchestrator;

mod config;
mod orchestrator;

/// 传输层送来的一句话
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// 为空时创建新会话
    pub session_id: Option<String>,
    pub message: String,
}

impl ChatRequest {
    pub fn new(session_id: Option<String>, message: impl Into<String>) -> Self {
        Self {
            session_id,
            message: message.into(),
        }
    }

    /// 补齐会话 id（为空时生成新 id），传输层在本轮失败时也能把 id 告知客户端
    pub fn ensure_session_id(&mut self) -> &str {
        let id = self
            .session_id
            .take()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(new_session_id);
        self.session_id.insert(id)
    }
}

/// 发回传输层的回复；每句话语恰好有一条 `is_final = true`
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub session_id: String,
    pub text: String,
    pub is_final: bool,
}

/// 单轮状态机的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    AwaitingModel,
    ToolExecution,
    Finalizing,
    Done,
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_session_id() {
        let mut request = ChatRequest::new(Some("  abc ".into()), "hi");
        assert_eq!(request.ensure_session_id(), "abc");

        let mut blank = ChatRequest::new(Some("   ".into()), "hi");
        let minted = blank.ensure_session_id().to_string();
        assert!(!minted.is_empty());
        assert_eq!(blank.session_id.as_deref(), Some(minted.as_str()));
        // 再次调用保持不变
        assert_eq!(blank.ensure_session_id(), minted);

        let mut none = ChatRequest::new(None, "hi");
        assert_ne!(none.ensure_session_id(), minted);
    }
}
