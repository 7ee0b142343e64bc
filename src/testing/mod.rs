//! 测试基础设施
//!
//! 在不依赖真实模型服务的情况下测试编排器。
//!
//! | 类型 | 用途 |
//! |------|------|
//! | [`MockLlmClient`] | 替代真实模型，按脚本返回事件流并记录请求 |
//!
//! 存储层的替身直接使用 [`InMemoryMemoryStore`](crate::memory::InMemoryMemoryStore)
//! 与 [`InMemoryConversationStore`](crate::memory::InMemoryConversationStore)，
//! 二者都可以通过 `set_failing(true)` 模拟存储故障。

mod mock_llm;

pub use mock_llm::MockLlmClient;
