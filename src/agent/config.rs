//! 编排器配置

use crate::config::AppConfig;

/// 单轮编排的运行时配置
///
/// 通过构建器链式调用设置各项参数，再传入 [`TurnOrchestrator::new`](super::TurnOrchestrator::new)。
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// 一轮内最多执行几次工具往返，防止模型反复调用工具
    pub(crate) max_tool_rounds: usize,
    /// 是否把增量文本即时转发给传输层（最终消息始终携带完整文本）
    pub(crate) stream_partials: bool,
    pub(crate) temperature: Option<f32>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_tool_rounds: 4,
            stream_partials: true,
            temperature: None,
        }
    }
}

impl OrchestratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_app(config: &AppConfig) -> Self {
        Self::new()
            .max_tool_rounds(config.model.max_tool_rounds)
            .stream_partials(config.server.stream_partials)
            .temperature(config.model.temperature)
    }

    pub fn max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }

    pub fn stream_partials(mut self, enabled: bool) -> Self {
        self.stream_partials = enabled;
        self
    }

    pub fn temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn get_max_tool_rounds(&self) -> usize {
        self.max_tool_rounds
    }

    pub fn is_stream_partials(&self) -> bool {
        self.stream_partials
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_app_config() {
        let mut app = AppConfig::default();
        app.model.max_tool_rounds = 2;
        app.server.stream_partials = false;
        app.model.temperature = Some(0.3);

        let config = OrchestratorConfig::from_app(&app);
        assert_eq!(config.get_max_tool_rounds(), 2);
        assert!(!config.is_stream_partials());
        assert_eq!(config.temperature, Some(0.3));
    }
}
