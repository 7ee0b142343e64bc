use crate::error::{LlmError, Result};
use crate::llm::types::{RawStreamEvent, ResponsesRequest, StreamEvent};
use async_stream::stream;
use futures::StreamExt;
use futures::stream::BoxStream;
use reqwest::Client;
use reqwest::header::HeaderMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// 增量 SSE 解码器：在字节缓冲上按空行切分事件，拼接多行 `data:`，跳过注释
///
/// 只对完整事件做 UTF-8 解码，跨块的多字节字符和 CRLF 分隔符不会被拆坏。
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

/// 事件分隔符：LF、CRLF、CR 三种行尾各自的空行
const EVENT_SEPARATORS: [&[u8]; 3] = [b"\r\n\r\n", b"\n\n", b"\r\r"];

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 喂入一块字节，返回其中已完整的事件的 data 负载
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut payloads = Vec::new();
        while let Some((pos, sep_len)) = Self::next_boundary(&self.buffer) {
            let event: Vec<u8> = self.buffer.drain(..pos + sep_len).take(pos).collect();
            if let Some(data) = Self::event_data(&event) {
                payloads.push(data);
            }
        }
        payloads
    }

    /// 流结束时残留的最后一个事件（服务端没有以空行收尾）
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.buffer);
        Self::event_data(&rest)
    }

    fn next_boundary(buffer: &[u8]) -> Option<(usize, usize)> {
        EVENT_SEPARATORS
            .iter()
            .filter_map(|sep| {
                buffer
                    .windows(sep.len())
                    .position(|window| window == *sep)
                    .map(|pos| (pos, sep.len()))
            })
            .min_by_key(|(pos, _)| *pos)
    }

    fn event_data(event: &[u8]) -> Option<String> {
        let event = String::from_utf8_lossy(event)
            .replace("\r\n", "\n")
            .replace('\r', "\n");
        let lines: Vec<&str> = event
            .lines()
            .filter_map(|line| line.strip_prefix("data:"))
            .map(|data| data.strip_prefix(' ').unwrap_or(data))
            .collect();
        if lines.is_empty() {
            return None;
        }
        let data = lines.join("\n");
        if data.trim() == "[DONE]" {
            return None;
        }
        Some(data)
    }
}

fn decode_payload(payload: &str) -> Option<StreamEvent> {
    match serde_json::from_str::<RawStreamEvent>(payload) {
        Ok(raw) => raw.into_event(),
        Err(e) => {
            warn!(error = %e, "无法解析的流事件，已跳过");
            None
        }
    }
}

/// 发起流式请求，返回类型化事件流
pub async fn post_stream(
    client: Arc<Client>,
    request_body: &ResponsesRequest,
    header_map: HeaderMap,
    url: &str,
) -> Result<BoxStream<'static, Result<StreamEvent>>> {
    let response = client
        .post(url)
        .headers(header_map)
        .json(request_body)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(LlmError::ApiError {
            status,
            message: error_text,
        }
        .into());
    }

    let mut bytes = response.bytes_stream();
    let events = stream! {
        let mut decoder = SseDecoder::new();
        while let Some(chunk) = bytes.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    yield Err(LlmError::NetworkError(format!("Stream error: {e}")).into());
                    return;
                }
            };
            for payload in decoder.push(&chunk) {
                if let Some(event) = decode_payload(&payload) {
                    yield Ok(event);
                }
            }
        }
        if let Some(event) = decoder.finish().as_deref().and_then(decode_payload) {
            yield Ok(event);
        }
        debug!("模型事件流结束");
    };

    Ok(events.boxed())
}
