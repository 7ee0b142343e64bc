//! `save_memory`：把用户透露的个人事实写入长期记忆
//!
//! 校验失败或存储失败都以失败的 [`ToolResult`] 返回，从不抛出。

use crate::memory::MemoryStore;
use crate::tools::{Tool, ToolParameters, ToolResult};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{error, info};

pub struct SaveMemoryTool {
    store: Arc<dyn MemoryStore>,
}

impl SaveMemoryTool {
    pub fn new(store: Arc<dyn MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Tool for SaveMemoryTool {
    fn name(&self) -> &str {
        "save_memory"
    }

    fn description(&self) -> &str {
        "Save personal information about the user that would be helpful to remember in \
         future conversations: location or address, preferences, family details, important \
         dates, interests, or any other personal fact the user shares. Use this whenever the \
         user mentions something personal about themselves."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "memory": {
                    "type": "string",
                    "description": "The personal information to remember about the user. Be specific and include context."
                }
            },
            "required": ["memory"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, parameters: ToolParameters) -> crate::error::Result<ToolResult> {
        let memory = match parameters.get("memory") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim(),
            Some(Value::String(_)) => {
                return Ok(ToolResult::error(
                    "Error saving memory: memory must not be empty".to_string(),
                ));
            }
            Some(_) => {
                return Ok(ToolResult::error(
                    "Error saving memory: memory must be a string".to_string(),
                ));
            }
            None => {
                return Ok(ToolResult::error(
                    "Error saving memory: missing memory argument".to_string(),
                ));
            }
        };

        match self.store.create(memory).await {
            Ok(saved) => {
                info!(id = %saved.id, "💾 已保存记忆");
                Ok(ToolResult::success(format!(
                    "Successfully saved memory: {}",
                    saved.text
                )))
            }
            Err(e) => {
                error!(error = %e, "记忆写入失败");
                Ok(ToolResult::error(format!("Error saving memory: {e}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryMemoryStore;

    fn params(value: Value) -> ToolParameters {
        value
            .as_object()
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .collect()
    }

    #[tokio::test]
    async fn test_save_memory_creates_record() {
        let store = Arc::new(InMemoryMemoryStore::new());
        let tool = SaveMemoryTool::new(store.clone());
        let result = tool
            .execute(params(json!({"memory": "User lives in Austin"})))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.output, "Successfully saved memory: User lives in Austin");
        assert_eq!(store.recent(5).await.unwrap()[0].text, "User lives in Austin");
    }

    #[tokio::test]
    async fn test_invalid_arguments_never_write() {
        let store = Arc::new(InMemoryMemoryStore::new());
        let tool = SaveMemoryTool::new(store.clone());

        for bad in [json!({"memory": ""}), json!({"memory": "   "}), json!({}), json!({"memory": 42})] {
            let result = tool.execute(params(bad)).await.unwrap();
            assert!(!result.success);
            assert!(result.model_output().starts_with("Error saving memory"));
        }
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_store_failure_is_an_error_result() {
        let store = Arc::new(InMemoryMemoryStore::new());
        store.set_failing(true);
        let tool = SaveMemoryTool::new(store);
        let result = tool
            .execute(params(json!({"memory": "User has a cat"})))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.model_output().contains("Store unavailable"));
    }
}
