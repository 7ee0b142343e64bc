//! Mock LLM 客户端：按脚本返回事件流，不发起真实 HTTP 请求。
//!
//! 每次 [`stream_response`](LlmClient::stream_response) 调用消费一条预设脚本，
//! 并记录收到的 [`ModelRequest`]，便于断言编排器发给模型的内容。
//!
//! # 示例
//!
//! ```rust
//! use voice_assistant::testing::MockLlmClient;
//! use voice_assistant::llm::LlmClient;
//! use voice_assistant::llm::types::{ModelRequest, StreamEvent};
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mock = MockLlmClient::new().with_text("你好");
//! let request = ModelRequest {
//!     instructions: "sys".into(),
//!     turns: vec![],
//!     tools: vec![],
//!     temperature: None,
//! };
//! let events: Vec<_> = mock.stream_response(request).await.unwrap().collect().await;
//! assert_eq!(events.len(), 2);
//! assert_eq!(mock.call_count(), 1);
//! # }
//! ```

use crate::error::{AssistantError, LlmError, Result};
use crate::llm::types::{ModelRequest, StreamEvent};
use crate::llm::{EventStream, LlmClient};
use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// 一次调用的预设结果
enum MockLlmResponse {
    /// 依次产出这些事件；`hang` 为 true 时产出完毕后永不结束
    Events {
        events: Vec<StreamEvent>,
        hang: bool,
    },
    /// 打开流本身失败
    Err(AssistantError),
}

/// 可脚本化的 Mock LLM 客户端。
///
/// 脚本耗尽后返回 `EmptyResponse` 错误。
pub struct MockLlmClient {
    responses: Arc<Mutex<VecDeque<MockLlmResponse>>>,
    /// 每次调用收到的请求，按顺序记录
    calls: Arc<Mutex<Vec<ModelRequest>>>,
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn push(self, response: MockLlmResponse) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    /// 追加一次任意事件序列
    pub fn with_events(self, events: Vec<StreamEvent>) -> Self {
        self.push(MockLlmResponse::Events {
            events,
            hang: false,
        })
    }

    /// 一段文本后正常完成
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_text_chunks([text])
    }

    /// 多段增量文本后正常完成
    pub fn with_text_chunks(self, chunks: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut events: Vec<StreamEvent> = chunks
            .into_iter()
            .map(|c| StreamEvent::TextDelta(c.into()))
            .collect();
        events.push(StreamEvent::Completed { text: None });
        self.with_events(events)
    }

    /// 一次工具调用后完成（模型等待工具结果）
    pub fn with_tool_call(
        self,
        call_id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        self.with_events(vec![
            StreamEvent::ToolCall {
                call_id: call_id.into(),
                name: name.into(),
                arguments: arguments.into(),
            },
            StreamEvent::Completed { text: None },
        ])
    }

    /// 产出部分文本后以失败事件终止
    pub fn with_failure_after(self, partial: impl Into<String>, message: impl Into<String>) -> Self {
        self.with_events(vec![
            StreamEvent::TextDelta(partial.into()),
            StreamEvent::Failed {
                message: message.into(),
            },
        ])
    }

    /// 产出部分文本后挂起，用于测试取消
    pub fn with_hanging(self, partial: impl Into<String>) -> Self {
        self.push(MockLlmResponse::Events {
            events: vec![StreamEvent::TextDelta(partial.into())],
            hang: true,
        })
    }

    /// 打开流时直接失败
    pub fn with_error(self, err: AssistantError) -> Self {
        self.push(MockLlmResponse::Err(err))
    }

    pub fn with_network_error(self, msg: impl Into<String>) -> Self {
        self.with_error(AssistantError::Llm(LlmError::NetworkError(msg.into())))
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<ModelRequest> {
        self.calls.lock().unwrap().last().cloned()
    }

    pub fn all_requests(&self) -> Vec<ModelRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn stream_response(&self, request: ModelRequest) -> Result<EventStream> {
        self.calls.lock().unwrap().push(request);

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(MockLlmResponse::Events { events, hang }) => {
                let events = stream::iter(events.into_iter().map(Ok));
                if hang {
                    Ok(events.chain(stream::pending()).boxed())
                } else {
                    Ok(events.boxed())
                }
            }
            Some(MockLlmResponse::Err(e)) => Err(e),
            None => Err(LlmError::EmptyResponse.into()),
        }
    }
}
