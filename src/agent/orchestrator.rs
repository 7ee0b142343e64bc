use crate::agent::{ChatReply, ChatRequest, OrchestratorConfig, TurnPhase};
use crate::error::{LlmError, Result, TurnError, log_soft};
use crate::llm::LlmClient;
use crate::llm::types::{ModelRequest, StreamEvent};
use crate::memory::ConversationStore;
use crate::session::{Role, SessionCache, SessionTranscript, Turn};
use crate::tools::ToolDispatcher;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// 模型在一次流中请求的工具调用
struct PendingCall {
    call_id: String,
    name: String,
    arguments: String,
}

/// 一次模型调用的结局
enum RoundOutcome {
    Completed,
    ToolCalls(Vec<PendingCall>),
}

/// 驱动一句用户话语从输入到最终回复
pub struct TurnOrchestrator {
    sessions: Arc<SessionCache>,
    conversations: Arc<dyn ConversationStore>,
    llm: Arc<dyn LlmClient>,
    tools: Arc<ToolDispatcher>,
    config: OrchestratorConfig,
}

impl TurnOrchestrator {
    pub fn new(
        sessions: Arc<SessionCache>,
        conversations: Arc<dyn ConversationStore>,
        llm: Arc<dyn LlmClient>,
        tools: Arc<ToolDispatcher>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            sessions,
            conversations,
            llm,
            tools,
            config,
        }
    }

    pub fn sessions(&self) -> &Arc<SessionCache> {
        &self.sessions
    }

    /// 处理一句话语
    ///
    /// 增量文本（`is_final = false`）经 `partials` 转发；最终回复作为返回值交给调用方发送。
    /// 失败或被 `cancel` 取消时，会话回滚到本轮之前，不落库任何部分回复。
    pub async fn handle_turn(
        &self,
        request: ChatRequest,
        partials: &mpsc::Sender<ChatReply>,
        cancel: &CancellationToken,
    ) -> Result<ChatReply> {
        // 排队等待同一会话的上一轮时也要响应取消
        let mut session = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TurnError::Cancelled.into()),
            lease = self.sessions.resolve(request.session_id.as_deref()) => lease,
        };
        let session_id = session.session_id().to_string();
        let checkpoint = session.len();
        info!(session_id = %session_id, "🎙️ 收到用户话语");

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TurnError::Cancelled.into()),
            result = self.run_turn(&mut session, &request.message, partials) => result,
        };

        match outcome {
            Ok(text) => Ok(ChatReply {
                session_id,
                text,
                is_final: true,
            }),
            Err(e) => {
                session.truncate(checkpoint);
                debug!(session_id = %session_id, phase = ?TurnPhase::Failed, "状态迁移");
                warn!(session_id = %session_id, error = %e, "❌ 本轮失败，会话已回滚");
                Err(e)
            }
        }
    }

    async fn run_turn(
        &self,
        session: &mut SessionTranscript,
        message: &str,
        partials: &mpsc::Sender<ChatReply>,
    ) -> Result<String> {
        let session_id = session.session_id().to_string();
        let mut phase = TurnPhase::Idle;

        session.push(Turn::user(message));
        self.persist(&session_id, Role::User, message).await?;

        let mut text = String::new();
        let mut rounds = 0;
        loop {
            advance(&session_id, &mut phase, TurnPhase::AwaitingModel);
            match self.stream_round(session, &mut text, partials).await? {
                RoundOutcome::Completed => break,
                RoundOutcome::ToolCalls(calls) => {
                    rounds += 1;
                    if rounds > self.config.max_tool_rounds {
                        return Err(TurnError::ToolRoundsExceeded(self.config.max_tool_rounds).into());
                    }
                    advance(&session_id, &mut phase, TurnPhase::ToolExecution);
                    self.execute_tools(session, calls).await;
                }
            }
        }

        advance(&session_id, &mut phase, TurnPhase::Finalizing);
        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse.into());
        }
        session.push(Turn::assistant(text.clone()));
        self.persist(&session_id, Role::Assistant, &text).await?;

        advance(&session_id, &mut phase, TurnPhase::Done);
        info!(
            session_id = %session_id,
            tool_rounds = rounds,
            chars = text.chars().count(),
            "✅ 回复完成"
        );
        Ok(text)
    }

    /// 打开一次模型流并消费到结束；文本追加进 `text`，工具调用收集后返回
    async fn stream_round(
        &self,
        session: &SessionTranscript,
        text: &mut String,
        partials: &mpsc::Sender<ChatReply>,
    ) -> Result<RoundOutcome> {
        let request = ModelRequest {
            instructions: session.instruction().to_string(),
            turns: session.turns().iter().skip(1).cloned().collect(),
            tools: self.tools.get_tool_definitions(),
            temperature: self.config.temperature,
        };
        let mut stream = self.llm.stream_response(request).await?;

        let mut round_text = String::new();
        let mut calls = Vec::new();
        let mut terminated = false;
        while let Some(event) = stream.next().await {
            match event? {
                StreamEvent::TextDelta(delta) => {
                    if self.config.stream_partials {
                        self.forward_partial(session.session_id(), &delta, partials)
                            .await;
                    }
                    round_text.push_str(&delta);
                }
                StreamEvent::ToolCall {
                    call_id,
                    name,
                    arguments,
                } => {
                    debug!(session_id = %session.session_id(), tool = %name, call_id = %call_id, "模型请求工具调用");
                    calls.push(PendingCall {
                        call_id,
                        name,
                        arguments,
                    });
                }
                StreamEvent::Completed { text: full } => {
                    if round_text.is_empty()
                        && let Some(full) = full
                    {
                        round_text = full;
                    }
                    terminated = true;
                    break;
                }
                StreamEvent::Failed { message } => {
                    return Err(LlmError::StreamFailed(message).into());
                }
            }
        }

        if !round_text.is_empty() {
            if !text.is_empty() && !text.ends_with(char::is_whitespace) {
                text.push(' ');
            }
            text.push_str(&round_text);
        }

        if !calls.is_empty() {
            return Ok(RoundOutcome::ToolCalls(calls));
        }
        if !terminated {
            if text.is_empty() {
                return Err(LlmError::EmptyResponse.into());
            }
            warn!(session_id = %session.session_id(), "模型流未给出终止事件，按已完成处理");
        }
        Ok(RoundOutcome::Completed)
    }

    /// 按声明顺序执行工具；每个被执行的调用追加一对 invocation/result
    async fn execute_tools(&self, session: &mut SessionTranscript, calls: Vec<PendingCall>) {
        for call in calls {
            let Some(result) = self.tools.dispatch(&call.name, &call.arguments).await else {
                continue;
            };
            info!(
                session_id = %session.session_id(),
                tool = %call.name,
                call_id = %call.call_id,
                success = result.success,
                "🔧 工具结果已回填"
            );
            session.push(Turn::ToolInvocation {
                call_id: call.call_id.clone(),
                name: call.name,
                arguments: call.arguments,
            });
            session.push(Turn::ToolResult {
                call_id: call.call_id,
                output: result.model_output(),
            });
        }
    }

    async fn forward_partial(&self, session_id: &str, delta: &str, partials: &mpsc::Sender<ChatReply>) {
        let reply = ChatReply {
            session_id: session_id.to_string(),
            text: delta.to_string(),
            is_final: false,
        };
        if partials.send(reply).await.is_err() {
            debug!(session_id = %session_id, "增量文本接收端已关闭");
        }
    }

    /// 写穿落库；存储失败只记录日志，不阻塞回复
    async fn persist(&self, session_id: &str, role: Role, content: &str) -> Result<()> {
        log_soft(
            self.conversations.append(session_id, role, content).await,
            "会话消息落库失败",
        )?;
        Ok(())
    }
}

fn advance(session_id: &str, phase: &mut TurnPhase, next: TurnPhase) {
    debug!(session_id = %session_id, from = ?phase, to = ?next, "状态迁移");
    *phase = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WeatherConfig;
    use crate::error::AssistantError;
    use crate::memory::{InMemoryConversationStore, InMemoryMemoryStore, MemoryStore};
    use crate::session::PromptComposer;
    use crate::testing::MockLlmClient;
    use crate::tools::memory::SaveMemoryTool;
    use crate::tools::weather::{WeatherClient, WeatherTool};
    use std::time::Duration;

    struct Harness {
        orchestrator: TurnOrchestrator,
        llm: Arc<MockLlmClient>,
        memories: Arc<InMemoryMemoryStore>,
        conversations: Arc<InMemoryConversationStore>,
    }

    fn harness(llm: MockLlmClient, config: OrchestratorConfig) -> Harness {
        harness_with_weather(llm, config, "http://127.0.0.1:9/v1/forecast")
    }

    fn harness_with_weather(llm: MockLlmClient, config: OrchestratorConfig, weather_url: &str) -> Harness {
        let llm = Arc::new(llm);
        let memories = Arc::new(InMemoryMemoryStore::new());
        let conversations = Arc::new(InMemoryConversationStore::new());
        let composer = Arc::new(PromptComposer::new(memories.clone()));
        let sessions = Arc::new(SessionCache::new(conversations.clone(), composer));

        let mut tools = ToolDispatcher::new();
        tools.register(Box::new(SaveMemoryTool::new(memories.clone())));
        let weather = WeatherConfig {
            base_url: weather_url.to_string(),
            timeout_ms: 2_000,
        };
        tools.register(Box::new(WeatherTool::new(WeatherClient::new(
            Arc::new(reqwest::Client::new()),
            &weather,
        ))));

        let orchestrator = TurnOrchestrator::new(
            sessions,
            conversations.clone(),
            llm.clone(),
            Arc::new(tools),
            config,
        );
        Harness {
            orchestrator,
            llm,
            memories,
            conversations,
        }
    }

    impl Harness {
        async fn turn(&self, session_id: Option<&str>, message: &str) -> Result<ChatReply> {
            let (tx, _rx) = mpsc::channel(64);
            self.orchestrator
                .handle_turn(
                    ChatRequest::new(session_id.map(str::to_string), message),
                    &tx,
                    &CancellationToken::new(),
                )
                .await
        }

        async fn transcript(&self, session_id: &str) -> Vec<Turn> {
            self.orchestrator
                .sessions()
                .resolve(Some(session_id))
                .await
                .turns()
                .to_vec()
        }

        async fn roles(&self, session_id: &str) -> Vec<Role> {
            self.conversations
                .load_session(session_id)
                .await
                .unwrap()
                .iter()
                .map(|r| r.role)
                .collect()
        }
    }

    #[tokio::test]
    async fn test_plain_answer_without_tools() {
        let llm = MockLlmClient::new().with_text_chunks([
            "Fifteen percent of 250 dollars ",
            "is 37 dollars and 50 cents.",
        ]);
        let h = harness(llm, OrchestratorConfig::new());

        let (tx, mut rx) = mpsc::channel(64);
        let reply = h
            .orchestrator
            .handle_turn(
                ChatRequest::new(None, "What's 15% of 250 dollars?"),
                &tx,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert!(reply.is_final);
        assert_eq!(reply.text, "Fifteen percent of 250 dollars is 37 dollars and 50 cents.");

        let mut partials = Vec::new();
        while let Ok(p) = rx.try_recv() {
            partials.push(p);
        }
        assert_eq!(partials.len(), 2);
        assert!(partials.iter().all(|p| !p.is_final && p.session_id == reply.session_id));

        assert_eq!(
            h.roles(&reply.session_id).await,
            [Role::System, Role::User, Role::Assistant]
        );
        let turns = h.transcript(&reply.session_id).await;
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[2], Turn::assistant(reply.text.clone()));

        let request = h.llm.last_request().unwrap();
        assert_eq!(h.llm.call_count(), 1);
        assert_eq!(request.turns, vec![Turn::user("What's 15% of 250 dollars?")]);
        assert_eq!(request.instructions, PromptComposer::template());
        let tool_names: Vec<_> = request.tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(tool_names, ["save_memory", "get_weather"]);
    }

    #[tokio::test]
    async fn test_save_memory_then_digest_in_next_session() {
        let llm = MockLlmClient::new()
            .with_tool_call("call_1", "save_memory", r#"{"memory":"User lives in Austin"}"#)
            .with_text("Got it, I'll remember that you live in Austin.")
            .with_text("Hi there!");
        let h = harness(llm, OrchestratorConfig::new());

        let reply = h.turn(None, "Remember that I live in Austin").await.unwrap();
        assert_eq!(reply.text, "Got it, I'll remember that you live in Austin.");

        let saved = h.memories.recent(5).await.unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].text, "User lives in Austin");

        let turns = h.transcript(&reply.session_id).await;
        assert_eq!(
            turns[3],
            Turn::ToolResult {
                call_id: "call_1".into(),
                output: "Successfully saved memory: User lives in Austin".into(),
            }
        );
        assert!(matches!(turns[2], Turn::ToolInvocation { ref name, .. } if name == "save_memory"));
        assert_eq!(turns.len(), 5);

        // 第二次模型调用必须看到工具结果
        let second = &h.llm.all_requests()[1];
        assert!(second.turns.iter().any(|t| matches!(t, Turn::ToolResult { call_id, .. } if call_id == "call_1")));

        // 工具 Turn 不落库
        assert_eq!(
            h.roles(&reply.session_id).await,
            [Role::System, Role::User, Role::Assistant]
        );

        h.turn(None, "Good morning").await.unwrap();
        let instructions = h.llm.last_request().unwrap().instructions;
        assert!(instructions.contains("RELEVANT MEMORIES"));
        assert!(instructions.contains("- User lives in Austin"));
    }

    #[tokio::test]
    async fn test_stream_failure_rolls_back() {
        let llm = MockLlmClient::new()
            .with_text("Hello!")
            .with_failure_after("Partial ans", "upstream exploded");
        let h = harness(llm, OrchestratorConfig::new());

        let first = h.turn(Some("s-fail"), "hi").await.unwrap();
        let before = h.transcript(&first.session_id).await.len();

        let err = h.turn(Some("s-fail"), "tell me more").await.unwrap_err();
        assert!(matches!(err, AssistantError::Llm(LlmError::StreamFailed(ref m)) if m == "upstream exploded"));

        assert_eq!(h.transcript("s-fail").await.len(), before);
        let roles = h.roles("s-fail").await;
        assert_eq!(roles.iter().filter(|r| **r == Role::Assistant).count(), 1);
        assert_eq!(roles.last(), Some(&Role::User), "孤立的用户行允许保留");
    }

    #[tokio::test]
    async fn test_cancelled_turn_persists_nothing() {
        let llm = MockLlmClient::new().with_hanging("I was about to");
        let h = harness(llm, OrchestratorConfig::new());

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let (tx, _rx) = mpsc::channel(64);
        let result = tokio::time::timeout(
            Duration::from_secs(2),
            h.orchestrator
                .handle_turn(ChatRequest::new(Some("s-cancel".into()), "hello"), &tx, &cancel),
        )
        .await
        .expect("取消后应立即返回");

        assert!(matches!(result, Err(AssistantError::Turn(TurnError::Cancelled))));
        assert_eq!(h.transcript("s-cancel").await.len(), 1);
        assert!(!h.roles("s-cancel").await.contains(&Role::Assistant));
    }

    #[tokio::test]
    async fn test_stream_open_failure_rolls_back() {
        let llm = MockLlmClient::new().with_text("Hello!").with_error(
            LlmError::ApiError {
                status: 502,
                message: "bad gateway".into(),
            }
            .into(),
        );
        let h = harness(llm, OrchestratorConfig::new());

        h.turn(Some("s-open"), "hi").await.unwrap();
        let before = h.transcript("s-open").await.len();

        let err = h.turn(Some("s-open"), "and now?").await.unwrap_err();
        assert!(matches!(err, AssistantError::Llm(LlmError::ApiError { status: 502, .. })));
        assert_eq!(h.transcript("s-open").await.len(), before);

        let roles = h.roles("s-open").await;
        assert_eq!(roles.iter().filter(|r| **r == Role::Assistant).count(), 1);
    }

    #[tokio::test]
    async fn test_cancel_while_waiting_for_busy_session() {
        let llm = MockLlmClient::new().with_hanging("Thinking");
        let h = Arc::new(harness(llm, OrchestratorConfig::new()));

        let first_cancel = CancellationToken::new();
        let first = {
            let h = h.clone();
            let cancel = first_cancel.clone();
            tokio::spawn(async move {
                let (tx, _rx) = mpsc::channel(64);
                h.orchestrator
                    .handle_turn(ChatRequest::new(Some("s-busy".into()), "first"), &tx, &cancel)
                    .await
            })
        };
        // 等第一轮拿到租约并打开模型流
        while h.llm.call_count() == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let cancel = CancellationToken::new();
        cancel.cancel();
        let (tx, _rx) = mpsc::channel(64);
        let result = tokio::time::timeout(
            Duration::from_secs(1),
            h.orchestrator
                .handle_turn(ChatRequest::new(Some("s-busy".into()), "second"), &tx, &cancel),
        )
        .await
        .expect("排队中的轮次被取消后应立即返回");
        assert!(matches!(result, Err(AssistantError::Turn(TurnError::Cancelled))));
        assert_eq!(h.llm.call_count(), 1);

        first_cancel.cancel();
        let first = first.await.unwrap();
        assert!(matches!(first, Err(AssistantError::Turn(TurnError::Cancelled))));
        assert_eq!(h.transcript("s-busy").await.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_ignored() {
        let llm = MockLlmClient::new()
            .with_tool_call("call_x", "launch_rockets", "{}")
            .with_text("I can't do that.");
        let h = harness(llm, OrchestratorConfig::new());

        let reply = h.turn(Some("s-unknown"), "launch the rockets").await.unwrap();
        assert_eq!(reply.text, "I can't do that.");

        let turns = h.transcript("s-unknown").await;
        assert!(turns.iter().all(|t| !matches!(t, Turn::ToolInvocation { .. } | Turn::ToolResult { .. })));
        assert_eq!(h.llm.call_count(), 2);
    }

    #[tokio::test]
    async fn test_tool_rounds_are_bounded() {
        let llm = MockLlmClient::new()
            .with_tool_call("c1", "save_memory", r#"{"memory":"a"}"#)
            .with_tool_call("c2", "save_memory", r#"{"memory":"b"}"#);
        let h = harness(llm, OrchestratorConfig::new().max_tool_rounds(1));

        let err = h.turn(Some("s-loop"), "remember a and b").await.unwrap_err();
        assert!(matches!(err, AssistantError::Turn(TurnError::ToolRoundsExceeded(1))));
        assert_eq!(h.transcript("s-loop").await.len(), 1);
    }

    #[tokio::test]
    async fn test_stream_without_terminal_event() {
        let llm = MockLlmClient::new()
            .with_events(vec![StreamEvent::TextDelta("Hello".into())])
            .with_events(vec![]);
        let h = harness(llm, OrchestratorConfig::new());

        let reply = h.turn(Some("s-implicit"), "hi").await.unwrap();
        assert_eq!(reply.text, "Hello");

        let err = h.turn(Some("s-implicit"), "again").await.unwrap_err();
        assert!(matches!(err, AssistantError::Llm(LlmError::EmptyResponse)));
        assert_eq!(h.transcript("s-implicit").await.len(), 3);
    }

    #[tokio::test]
    async fn test_completed_text_used_when_no_deltas() {
        let llm = MockLlmClient::new().with_events(vec![StreamEvent::Completed {
            text: Some("Full text".into()),
        }]);
        let h = harness(llm, OrchestratorConfig::new());
        assert_eq!(h.turn(None, "hi").await.unwrap().text, "Full text");
    }

    #[tokio::test]
    async fn test_partials_can_be_disabled() {
        let llm = MockLlmClient::new().with_text_chunks(["a", "b"]);
        let h = harness(llm, OrchestratorConfig::new().stream_partials(false));

        let (tx, mut rx) = mpsc::channel(8);
        let reply = h
            .orchestrator
            .handle_turn(ChatRequest::new(None, "hi"), &tx, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(reply.text, "ab");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_store_outage_does_not_block_reply() {
        let llm = MockLlmClient::new().with_text("Still here.");
        let h = harness(llm, OrchestratorConfig::new());
        h.conversations.set_failing(true);
        h.memories.set_failing(true);

        let reply = h.turn(Some("s-down"), "hello?").await.unwrap();
        assert_eq!(reply.text, "Still here.");
        assert_eq!(h.transcript("s-down").await.len(), 3);
    }

    #[tokio::test]
    async fn test_weather_failure_reaches_model() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let llm = MockLlmClient::new()
            .with_tool_call("w1", "get_weather", r#"{"latitude":30.27,"longitude":-97.74}"#)
            .with_text("Sorry, I couldn't get the weather right now.");
        let h = harness_with_weather(
            llm,
            OrchestratorConfig::new(),
            &format!("{}/v1/forecast", server.uri()),
        );

        let reply = h.turn(Some("s-weather"), "How's the weather in Austin?").await.unwrap();
        assert!(reply.text.starts_with("Sorry"));

        let second = &h.llm.all_requests()[1];
        let output = second
            .turns
            .iter()
            .find_map(|t| match t {
                Turn::ToolResult { call_id, output } if call_id == "w1" => Some(output.clone()),
                _ => None,
            })
            .expect("模型应收到天气工具结果");
        assert_eq!(output, "Error fetching weather: weather service returned status 503");
    }

    #[tokio::test]
    async fn test_same_session_turns_do_not_interleave() {
        let llm = MockLlmClient::new().with_text("one").with_text("two");
        let h = Arc::new(harness(llm, OrchestratorConfig::new()));

        let a = {
            let h = h.clone();
            tokio::spawn(async move { h.turn(Some("shared"), "first").await })
        };
        let b = {
            let h = h.clone();
            tokio::spawn(async move { h.turn(Some("shared"), "second").await })
        };
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        let turns = h.transcript("shared").await;
        assert_eq!(turns.len(), 5);
        for pair in turns[1..].chunks(2) {
            assert!(matches!(pair[0], Turn::UserUtterance { .. }));
            assert!(matches!(pair[1], Turn::AssistantReply { .. }));
        }
    }

    #[tokio::test]
    async fn test_finalized_transcript_pairs_tool_calls() {
        let llm = MockLlmClient::new()
            .with_events(vec![
                StreamEvent::TextDelta("Saving.".into()),
                StreamEvent::ToolCall {
                    call_id: "m1".into(),
                    name: "save_memory".into(),
                    arguments: r#"{"memory":"User has a dog named Rex"}"#.into(),
                },
                StreamEvent::ToolCall {
                    call_id: "m2".into(),
                    name: "save_memory".into(),
                    arguments: r#"{"memory":""}"#.into(),
                },
                StreamEvent::Completed { text: None },
            ])
            .with_text("Done!");
        let h = harness(llm, OrchestratorConfig::new());

        let reply = h.turn(Some("s-pair"), "My dog is Rex").await.unwrap();
        assert_eq!(reply.text, "Saving. Done!");

        let session = h.orchestrator.sessions().resolve(Some("s-pair")).await;
        assert!(session.tool_calls_paired());
        let results: Vec<_> = session
            .turns()
            .iter()
            .filter_map(|t| match t {
                Turn::ToolResult { output, .. } => Some(output.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(results.len(), 2);
        assert!(results[1].starts_with("Error saving memory"));
        assert_eq!(h.memories.len().await, 1);
    }
}
