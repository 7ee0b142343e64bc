//! 模型调用类型
//!
//! - [`ModelRequest`] / [`StreamEvent`]：与供应商无关的请求与流事件
//! - [`ResponsesRequest`] / [`InputItem`] / [`RawStreamEvent`]：OpenAI Responses API 线格式

use crate::session::Turn;
use crate::tools::Tool;
use serde::{Deserialize, Serialize};

/// 一次流式模型调用的输入
#[derive(Debug, Clone)]
pub struct ModelRequest {
    /// 系统指令（会话首条 Turn 的内容）
    pub instructions: String,
    /// 除系统指令外的全部 Turn，按会话顺序
    pub turns: Vec<Turn>,
    pub tools: Vec<ToolDefinition>,
    pub temperature: Option<f32>,
}

/// 模型流中的类型化事件
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// 增量文本
    TextDelta(String),
    /// 一个完整的工具调用（参数已拼接完毕）
    ToolCall {
        call_id: String,
        name: String,
        arguments: String,
    },
    /// 终止：成功。`text` 为供应商给出的完整输出文本（可能为空）
    Completed { text: Option<String> },
    /// 终止：失败
    Failed { message: String },
}

/// 发送给模型的工具声明（严格 JSON Schema 参数）
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
    pub strict: bool,
}

impl ToolDefinition {
    pub fn from_tool(tool: &dyn Tool) -> Self {
        Self {
            tool_type: "function".to_string(),
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            parameters: tool.parameters(),
            strict: true,
        }
    }
}

// ── Responses API 请求 ────────────────────────────────────────────────────────

/// `POST /responses` 请求体
#[derive(Debug, Serialize, Clone)]
pub struct ResponsesRequest {
    pub model: String,
    pub instructions: String,
    pub input: Vec<InputItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    pub stream: bool,
}

/// Responses API `input` 数组元素
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputItem {
    Message {
        role: String,
        content: String,
    },
    FunctionCall {
        call_id: String,
        name: String,
        arguments: String,
    },
    FunctionCallOutput {
        call_id: String,
        output: String,
    },
}

impl From<&Turn> for InputItem {
    fn from(turn: &Turn) -> Self {
        match turn {
            Turn::SystemInstruction { content } => InputItem::Message {
                role: "system".to_string(),
                content: content.clone(),
            },
            Turn::UserUtterance { content } => InputItem::Message {
                role: "user".to_string(),
                content: content.clone(),
            },
            Turn::AssistantReply { content } => InputItem::Message {
                role: "assistant".to_string(),
                content: content.clone(),
            },
            Turn::ToolInvocation {
                call_id,
                name,
                arguments,
            } => InputItem::FunctionCall {
                call_id: call_id.clone(),
                name: name.clone(),
                arguments: arguments.clone(),
            },
            Turn::ToolResult { call_id, output } => InputItem::FunctionCallOutput {
                call_id: call_id.clone(),
                output: output.clone(),
            },
        }
    }
}

impl ResponsesRequest {
    pub fn new(model: impl Into<String>, request: ModelRequest) -> Self {
        Self {
            model: model.into(),
            instructions: request.instructions,
            input: request.turns.iter().map(InputItem::from).collect(),
            tools: request.tools,
            temperature: request.temperature,
            stream: true,
        }
    }
}

// ── Responses API 流事件 ──────────────────────────────────────────────────────

/// SSE `data:` 中的事件，按 `type` 字段区分；未关心的事件落入 `Other`
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
pub enum RawStreamEvent {
    #[serde(rename = "response.output_text.delta")]
    OutputTextDelta { delta: String },
    #[serde(rename = "response.output_item.done")]
    OutputItemDone { item: OutputItem },
    #[serde(rename = "response.completed")]
    Completed { response: ResponseBody },
    #[serde(rename = "response.failed")]
    Failed { response: ResponseBody },
    #[serde(rename = "response.incomplete")]
    Incomplete { response: ResponseBody },
    #[serde(rename = "error")]
    Error {
        #[serde(default)]
        message: Option<String>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    FunctionCall {
        call_id: String,
        name: String,
        arguments: String,
    },
    Message {
        #[serde(default)]
        content: Vec<OutputContent>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputContent {
    OutputText { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ResponseBody {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub output: Vec<OutputItem>,
    #[serde(default)]
    pub error: Option<ResponseErrorBody>,
    #[serde(default)]
    pub incomplete_details: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResponseErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ResponseBody {
    /// 所有 message 输出项的文本拼接
    pub fn output_text(&self) -> String {
        self.output
            .iter()
            .filter_map(|item| match item {
                OutputItem::Message { content } => Some(content),
                _ => None,
            })
            .flatten()
            .filter_map(|c| match c {
                OutputContent::OutputText { text } => Some(text.as_str()),
                OutputContent::Other => None,
            })
            .collect()
    }

    fn error_message(&self, fallback: &str) -> String {
        self.error
            .as_ref()
            .and_then(|e| e.message.clone().or_else(|| e.code.clone()))
            .unwrap_or_else(|| fallback.to_string())
    }
}

impl RawStreamEvent {
    /// 转换为类型化事件；与本系统无关的事件返回 `None`
    pub fn into_event(self) -> Option<StreamEvent> {
        match self {
            RawStreamEvent::OutputTextDelta { delta } => Some(StreamEvent::TextDelta(delta)),
            RawStreamEvent::OutputItemDone {
                item:
                    OutputItem::FunctionCall {
                        call_id,
                        name,
                        arguments,
                    },
            } => Some(StreamEvent::ToolCall {
                call_id,
                name,
                arguments,
            }),
            RawStreamEvent::OutputItemDone { .. } => None,
            RawStreamEvent::Completed { response } => {
                let text = response.output_text();
                Some(StreamEvent::Completed {
                    text: (!text.is_empty()).then_some(text),
                })
            }
            RawStreamEvent::Failed { response } => Some(StreamEvent::Failed {
                message: response.error_message("response failed"),
            }),
            RawStreamEvent::Incomplete { response } => Some(StreamEvent::Failed {
                message: response
                    .incomplete_details
                    .map(|d| format!("response incomplete: {d}"))
                    .unwrap_or_else(|| "response incomplete".to_string()),
            }),
            RawStreamEvent::Error { message } => Some(StreamEvent::Failed {
                message: message.unwrap_or_else(|| "stream error".to_string()),
            }),
            RawStreamEvent::Other => None,
        }
    }
}
