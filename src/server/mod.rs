//! 传输层
//!
//! - [`websocket`]：WebSocket 服务，每个文本帧是一句用户话语
//! - [`console`]：本地命令行对话，驱动同一个编排器
//!
//! # 协议
//!
//! **客户端 → 服务端**：
//! ```json
//! { "session_id": "可选", "message": "What's the weather in Austin?" }
//! ```
//!
//! **服务端 → 客户端**：
//! ```json
//! { "type": "reply", "session_id": "...", "text_response": "...", "is_final": true }
//! { "type": "error", "session_id": "...", "message": "..." }
//! ```

pub mod console;
pub mod websocket;

use crate::agent::{ChatReply, ChatRequest};
use serde::{Deserialize, Serialize};

/// 客户端发来的一句话
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ClientMessage {
    #[serde(default)]
    pub session_id: Option<String>,
    pub message: String,
}

impl From<ClientMessage> for ChatRequest {
    fn from(msg: ClientMessage) -> Self {
        ChatRequest::new(msg.session_id, msg.message)
    }
}

/// 推送给客户端的消息，`type` 字段区分回复与错误
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Reply {
        session_id: String,
        text_response: String,
        is_final: bool,
    },
    Error {
        #[serde(skip_serializing_if = "Option::is_none", default)]
        session_id: Option<String>,
        message: String,
    },
}

impl From<ChatReply> for ServerMessage {
    fn from(reply: ChatReply) -> Self {
        ServerMessage::Reply {
            session_id: reply.session_id,
            text_response: reply.text,
            is_final: reply.is_final,
        }
    }
}

impl ServerMessage {
    pub fn error(session_id: Option<String>, message: impl Into<String>) -> Self {
        ServerMessage::Error {
            session_id,
            message: message.into(),
        }
    }
}
