//! 服务配置
//!
//! 可选的 YAML 文件提供基础值，命令行参数 / 环境变量覆盖其上。
//! 所有字段都有默认值，不提供配置文件也能启动：
//!
//! ```yaml
//! server:
//!   bind: 0.0.0.0:8080
//!   stream_partials: true
//! database:
//!   url: postgres://localhost/assistant
//!   max_connections: 20
//! model:
//!   name: gpt-4o
//!   max_tool_rounds: 4
//! weather:
//!   base_url: https://api.open-meteo.com/v1/forecast
//! ```

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub model: ModelSettings,
    pub weather: WeatherConfig,
    pub tools: ToolsConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// 是否把增量文本即时推给客户端（最终消息总是携带完整文本）
    pub stream_partials: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
            stream_partials: true,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    /// 为空时使用进程内存存储
    pub url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_ms: u64,
    pub idle_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 20,
            acquire_timeout_ms: 2_000,
            idle_timeout_ms: 30_000,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ModelSettings {
    pub name: String,
    /// 单轮内允许的工具调用往返次数
    pub max_tool_rounds: usize,
    pub temperature: Option<f32>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            name: "gpt-4o".to_string(),
            max_tool_rounds: 4,
            temperature: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct WeatherConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ToolsConfig {
    /// 单次工具执行超时（毫秒）。0 = 不限制
    pub timeout_ms: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self { timeout_ms: 30_000 }
    }
}

impl AppConfig {
    pub fn load(path: &str) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|_| ConfigError::FileNotFound(path.to_string()))?;
        let config: AppConfig = serde_yaml::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                field: "database.max_connections".to_string(),
                message: "must be at least 1".to_string(),
            }
            .into());
        }
        if self.model.max_tool_rounds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "model.max_tool_rounds".to_string(),
                message: "must be at least 1".to_string(),
            }
            .into());
        }
        if self.model.name.trim().is_empty() {
            return Err(ConfigError::MissingField("model.name".to_string()).into());
        }
        Ok(())
    }
}
