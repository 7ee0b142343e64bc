//! 会话记录：Turn 变体、持久化角色与单个会话的有序 Turn 序列

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StoreError;

/// 持久化行中的角色，对应 `conversations.role` 列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(Role::System),
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(StoreError::MalformedRow(format!("unknown role '{other}'"))),
        }
    }
}

/// 会话中的一个单元
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Turn {
    SystemInstruction {
        content: String,
    },
    UserUtterance {
        content: String,
    },
    AssistantReply {
        content: String,
    },
    /// 模型发起的工具调用，`arguments` 为原始 JSON 字符串
    ToolInvocation {
        call_id: String,
        name: String,
        arguments: String,
    },
    ToolResult {
        call_id: String,
        output: String,
    },
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Turn::SystemInstruction {
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Turn::UserUtterance {
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Turn::AssistantReply {
            content: content.into(),
        }
    }

    /// 持久化角色；工具 Turn 只存在于内存中，返回 `None`
    pub fn role(&self) -> Option<Role> {
        match self {
            Turn::SystemInstruction { .. } => Some(Role::System),
            Turn::UserUtterance { .. } => Some(Role::User),
            Turn::AssistantReply { .. } => Some(Role::Assistant),
            Turn::ToolInvocation { .. } | Turn::ToolResult { .. } => None,
        }
    }

    /// 纯文本 Turn 的内容
    pub fn content(&self) -> Option<&str> {
        match self {
            Turn::SystemInstruction { content }
            | Turn::UserUtterance { content }
            | Turn::AssistantReply { content } => Some(content),
            Turn::ToolInvocation { .. } | Turn::ToolResult { .. } => None,
        }
    }

    pub fn from_row(role: Role, content: String) -> Self {
        match role {
            Role::System => Turn::SystemInstruction { content },
            Role::User => Turn::UserUtterance { content },
            Role::Assistant => Turn::AssistantReply { content },
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self, Turn::SystemInstruction { .. })
    }
}

/// 单个会话的有序 Turn 序列
///
/// 第一条 Turn 始终是唯一的 `SystemInstruction`（由 [`SessionCache`](super::SessionCache)
/// 在创建或水合时保证）。
#[derive(Debug, Clone)]
pub struct SessionTranscript {
    session_id: String,
    turns: Vec<Turn>,
    /// 占位状态：缓存槽位已建立，但尚未完成水合
    ready: bool,
}

impl SessionTranscript {
    /// 以一条系统指令开始的新会话
    pub fn new(session_id: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            turns: vec![Turn::system(instruction)],
            ready: true,
        }
    }

    /// 由已排好序（系统指令在首位）的 Turn 恢复会话
    pub(crate) fn restored(session_id: impl Into<String>, turns: Vec<Turn>) -> Self {
        Self {
            session_id: session_id.into(),
            turns,
            ready: true,
        }
    }

    pub(crate) fn pending(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            turns: Vec::new(),
            ready: false,
        }
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// 首条系统指令的文本
    pub fn instruction(&self) -> &str {
        self.turns
            .first()
            .and_then(|t| if t.is_system() { t.content() } else { None })
            .unwrap_or_default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// 回滚到指定长度（失败或取消的轮次），系统指令永远保留
    pub fn truncate(&mut self, len: usize) {
        self.turns.truncate(len.max(1));
    }

    /// 每个 `ToolInvocation` 是否恰好有一个同 `call_id` 的 `ToolResult`
    pub fn tool_calls_paired(&self) -> bool {
        let mut open: Vec<&str> = Vec::new();
        for turn in &self.turns {
            match turn {
                Turn::ToolInvocation { call_id, .. } => open.push(call_id),
                Turn::ToolResult { call_id, .. } => {
                    match open.iter().position(|id| *id == call_id.as_str()) {
                        Some(pos) => {
                            open.remove(pos);
                        }
                        None => return false,
                    }
                }
                _ => {}
            }
        }
        open.is_empty()
    }
}
