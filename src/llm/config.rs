//! 模型连接配置
//!
//! 从环境变量读取，格式：
//! ```text
//! ASSISTANT_MODEL_<ID>_MODEL=gpt-4o
//! ASSISTANT_MODEL_<ID>_BASEURL=https://api.openai.com/v1/responses
//! ASSISTANT_MODEL_<ID>_APIKEY=sk-...
//! ```
//! `<ID>` 为自定义标识（如 `GPT4O`），不区分大小写，不能包含下划线。
//! 没有任何 `ASSISTANT_MODEL_*` 变量时，退回到 `OPENAI_API_KEY`
//! （可选 `OPENAI_BASE_URL`）。

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const PREFIX: &str = "ASSISTANT_MODEL_";
const OPENAI_DEFAULT_BASE: &str = "https://api.openai.com/v1";

/// 单个模型的连接配置
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ModelConfig {
    /// 请求体中使用的模型名（如 `gpt-4o`）
    pub model: String,
    /// Responses 接口完整 URL
    pub baseurl: String,
    pub apikey: String,
}

/// 已加载的模型配置表（key = model 字段值）
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: HashMap<String, ModelConfig>,
}

impl ModelRegistry {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Result<Self> {
        let mut model_configs: HashMap<String, HashMap<String, String>> = HashMap::new();
        let mut openai_key = None;
        let mut openai_base = None;

        for (key, value) in vars {
            if key == "OPENAI_API_KEY" {
                openai_key = Some(value);
                continue;
            }
            if key == "OPENAI_BASE_URL" {
                openai_base = Some(value);
                continue;
            }
            let Some(suffix) = key.strip_prefix(PREFIX) else {
                continue;
            };
            let parts: Vec<&str> = suffix.split('_').collect();
            if parts.len() != 2 {
                return Err(ConfigError::EnvFormatError(key).into());
            }
            let model_id = parts[0].to_lowercase();
            let config_key = parts[1].to_lowercase();
            match config_key.as_str() {
                "model" | "baseurl" | "apikey" => {}
                _ => return Err(ConfigError::EnvFormatError(key).into()),
            }
            model_configs
                .entry(model_id)
                .or_default()
                .insert(config_key, value);
        }

        let mut models = HashMap::new();
        for (model_id, mut config_map) in model_configs {
            let mut take = |field: &str| {
                config_map
                    .remove(field)
                    .ok_or_else(|| ConfigError::MissingField(format!("{PREFIX}{model_id}_{field}")))
            };
            let model = take("model")?;
            let baseurl = take("baseurl")?;
            let apikey = take("apikey")?;
            models.insert(
                model.clone(),
                ModelConfig {
                    model,
                    baseurl,
                    apikey,
                },
            );
        }

        if models.is_empty()
            && let Some(apikey) = openai_key
        {
            let base = openai_base.unwrap_or_else(|| OPENAI_DEFAULT_BASE.to_string());
            let baseurl = format!("{}/responses", base.trim_end_matches('/'));
            models.insert(
                "*".to_string(),
                ModelConfig {
                    model: String::new(),
                    baseurl,
                    apikey,
                },
            );
        }

        Ok(Self { models })
    }

    /// 按模型名查找；只有 OpenAI 兜底配置时任何模型名都可用
    pub fn get_model(&self, model: &str) -> Result<ModelConfig> {
        if let Some(config) = self.models.get(model) {
            return Ok(config.clone());
        }
        self.models
            .get("*")
            .map(|fallback| ModelConfig {
                model: model.to_string(),
                ..fallback.clone()
            })
            .ok_or_else(|| ConfigError::ModelNotFound(model.to_string()).into())
    }
}
