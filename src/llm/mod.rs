mod client;
pub mod config;
pub mod types;

pub use client::SseDecoder;

use crate::error::{AssistantError, Result};
use crate::llm::client::post_stream;
use crate::llm::config::ModelConfig;
use crate::llm::types::{ModelRequest, ResponsesRequest, StreamEvent};
use async_trait::async_trait;
use futures::stream::BoxStream;
use reqwest::Client;
use reqwest::header::HeaderMap;
use std::sync::Arc;
use tracing::debug;

/// 模型返回的事件流
pub type EventStream = BoxStream<'static, Result<StreamEvent>>;

pub fn assemble_req_header(model: &ModelConfig) -> Result<HeaderMap> {
    let mut header_map = HeaderMap::new();

    header_map.insert(
        "Authorization",
        format!("Bearer {}", model.apikey)
            .parse()
            .map_err(|e| AssistantError::Other(format!("Invalid Authorization header: {}", e)))?,
    );
    header_map.insert(
        "Content-Type",
        "application/json"
            .parse()
            .map_err(|e| AssistantError::Other(format!("Invalid Content-Type header: {}", e)))?,
    );
    header_map.insert(
        "Accept",
        "text/event-stream"
            .parse()
            .map_err(|e| AssistantError::Other(format!("Invalid Accept header: {}", e)))?,
    );
    Ok(header_map)
}

/// 流式模型调用接口，编排器只依赖这个 trait
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// 打开一次流式调用。连接/状态码错误在此返回，流内失败以事件或 `Err` 项出现
    async fn stream_response(&self, request: ModelRequest) -> Result<EventStream>;
}

/// OpenAI Responses 兼容接口的 HTTP 实现
pub struct ResponsesClient {
    client: Arc<Client>,
    model: ModelConfig,
}

impl ResponsesClient {
    pub fn new(client: Arc<Client>, model: ModelConfig) -> Self {
        Self { client, model }
    }

    pub fn model_name(&self) -> &str {
        &self.model.model
    }
}

#[async_trait]
impl LlmClient for ResponsesClient {
    async fn stream_response(&self, request: ModelRequest) -> Result<EventStream> {
        let body = ResponsesRequest::new(self.model.model.clone(), request);
        debug!(
            model = %self.model.model,
            items = body.input.len(),
            tools = body.tools.len(),
            "📡 打开模型流"
        );
        let header_map = assemble_req_header(&self.model)?;
        post_stream(
            self.client.clone(),
            &body,
            header_map,
            self.model.baseurl.as_str(),
        )
        .await
    }
}
