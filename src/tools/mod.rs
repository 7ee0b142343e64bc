//! 工具系统
//!
//! 定义 [`Tool`] trait 和 [`ToolDispatcher`]（注册、按名分发、超时）。
//! 内置两个工具：[`memory::SaveMemoryTool`] 与 [`weather::WeatherTool`]。
//!
//! 分发器从不把工具错误抛给编排器：校验失败、存储失败、外部服务失败
//! 都会变成一条失败的 [`ToolResult`]，模型总能收到结果。

pub mod memory;
pub mod weather;

use crate::error::{AssistantError, ToolError};
use crate::error::Result;
use crate::llm::types::ToolDefinition;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// 工具执行结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolResult {
    pub success: bool,
    pub output: String,
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success(output: String) -> Self {
        Self {
            success: true,
            output,
            error: None,
        }
    }

    pub fn error(error: String) -> Self {
        Self {
            success: false,
            output: String::new(),
            error: Some(error),
        }
    }

    /// 回传给模型的文本
    pub fn model_output(&self) -> String {
        if self.success {
            self.output.clone()
        } else {
            self.error.clone().unwrap_or_else(|| "Tool failed".to_string())
        }
    }
}

/// 工具执行配置
#[derive(Debug, Clone)]
pub struct ToolExecutionConfig {
    /// 单次工具执行超时（毫秒）。0 = 不限制。默认 30_000（30 秒）
    pub timeout_ms: u64,
}

impl Default for ToolExecutionConfig {
    fn default() -> Self {
        Self { timeout_ms: 30_000 }
    }
}

pub type ToolParameters = HashMap<String, Value>;

/// 工具接口
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    /// 工具参数的 JSON Schema 定义（严格模式）
    fn parameters(&self) -> Value;
    async fn execute(&self, parameters: ToolParameters) -> Result<ToolResult>;

    /// `execute` 返回 `Err` 时回传给模型的说明
    fn failure_message(&self, err: &AssistantError) -> String {
        format!("Error running {}: {}", self.name(), err)
    }
}

pub struct ToolDispatcher {
    tools: HashMap<String, Box<dyn Tool>>,
    /// 注册顺序，声明给模型时保持稳定
    order: Vec<String>,
    config: ToolExecutionConfig,
}

impl Default for ToolDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolDispatcher {
    pub fn new() -> Self {
        Self::new_with_config(ToolExecutionConfig::default())
    }

    pub fn new_with_config(config: ToolExecutionConfig) -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
            config,
        }
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_none() {
            self.order.push(name);
        }
    }

    pub fn get_tool(&self, tool_name: &str) -> Option<&dyn Tool> {
        self.tools.get(tool_name).map(|tool| &**tool)
    }

    pub fn get_tool_definitions(&self) -> Vec<ToolDefinition> {
        self.order
            .iter()
            .filter_map(|name| self.get_tool(name))
            .map(ToolDefinition::from_tool)
            .collect()
    }

    /// 按名执行一次工具调用
    ///
    /// 未声明的工具名记录日志后返回 `None`；其余情况总是返回一条结果。
    pub async fn dispatch(&self, tool_name: &str, arguments: &str) -> Option<ToolResult> {
        let Some(tool) = self.get_tool(tool_name) else {
            warn!(tool = %tool_name, "模型调用了未声明的工具，已忽略");
            return None;
        };

        let parameters = match parse_arguments(arguments) {
            Ok(p) => p,
            Err(e) => return Some(ToolResult::error(tool.failure_message(&e))),
        };

        let result = if self.config.timeout_ms > 0 {
            match tokio::time::timeout(
                Duration::from_millis(self.config.timeout_ms),
                tool.execute(parameters),
            )
            .await
            {
                Ok(r) => r,
                Err(_) => Err(ToolError::Timeout(tool_name.to_string()).into()),
            }
        } else {
            tool.execute(parameters).await
        };

        let result = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(tool = %tool_name, error = %e, "工具执行失败");
                ToolResult::error(tool.failure_message(&e))
            }
        };
        debug!(tool = %tool_name, success = result.success, "🔧 工具执行完成");
        Some(result)
    }
}

/// 模型给出的参数必须是 JSON 对象；空字符串视为无参数
fn parse_arguments(arguments: &str) -> Result<ToolParameters> {
    if arguments.trim().is_empty() {
        return Ok(ToolParameters::new());
    }
    match serde_json::from_str::<Value>(arguments) {
        Ok(Value::Object(map)) => Ok(map.into_iter().collect()),
        Ok(_) => Err(ToolError::InvalidParameter {
            name: "arguments".to_string(),
            message: "expected a JSON object".to_string(),
        }
        .into()),
        Err(e) => Err(ToolError::InvalidParameter {
            name: "arguments".to_string(),
            message: e.to_string(),
        }
        .into()),
    }
}
