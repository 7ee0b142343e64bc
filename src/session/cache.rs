use crate::memory::{ConversationRow, ConversationStore};
use crate::session::prompt::PromptComposer;
use crate::session::transcript::{Role, SessionTranscript, Turn};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 对单个会话的独占租约，持有期间同一会话的其它轮次排队等待
pub type SessionLease = OwnedMutexGuard<SessionTranscript>;

/// 生成时间有序的新会话 id
pub fn new_session_id() -> String {
    Uuid::now_v7().to_string()
}

/// 进程级会话缓存
///
/// 每个会话一个槽位（`Arc<Mutex<_>>`），首次访问时在槽位锁内水合，
/// 因此同一会话的并发请求只会水合一次，且轮次之间严格串行。
pub struct SessionCache {
    sessions: RwLock<HashMap<String, Arc<Mutex<SessionTranscript>>>>,
    conversations: Arc<dyn ConversationStore>,
    composer: Arc<PromptComposer>,
}

impl SessionCache {
    pub fn new(conversations: Arc<dyn ConversationStore>, composer: Arc<PromptComposer>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            conversations,
            composer,
        }
    }

    /// 取得会话的独占租约
    ///
    /// 未提供 id（或为空）时生成一个时间有序的新 id。从不失败：
    /// 水合出错时退化为新会话。
    pub async fn resolve(&self, session_id: Option<&str>) -> SessionLease {
        let (session_id, minted) = match session_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => (id.to_string(), false),
            None => (new_session_id(), true),
        };

        let slot = self.slot(&session_id).await;
        let mut lease = slot.lock_owned().await;
        if !lease.is_ready() {
            *lease = if minted {
                self.create(&session_id).await
            } else {
                self.hydrate(&session_id).await
            };
        }
        lease
    }

    /// 缓存中的会话数
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    async fn slot(&self, session_id: &str) -> Arc<Mutex<SessionTranscript>> {
        if let Some(slot) = self.sessions.read().await.get(session_id) {
            return slot.clone();
        }
        self.sessions
            .write()
            .await
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(SessionTranscript::pending(session_id))))
            .clone()
    }

    async fn hydrate(&self, session_id: &str) -> SessionTranscript {
        match self.conversations.load_session(session_id).await {
            Ok(rows) if !rows.is_empty() => self.replay(session_id, rows).await,
            Ok(_) => self.create(session_id).await,
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "会话水合失败，创建新会话");
                self.create(session_id).await
            }
        }
    }

    /// 按行回放；保留最早的系统指令，缺失时补一条并落库
    async fn replay(&self, session_id: &str, rows: Vec<ConversationRow>) -> SessionTranscript {
        let total = rows.len();
        let mut instruction: Option<String> = None;
        let mut turns = Vec::with_capacity(total + 1);

        for row in rows {
            match row.role {
                Role::System if instruction.is_none() => instruction = Some(row.content),
                Role::System => {
                    debug!(session_id = %session_id, "丢弃多余的系统指令行");
                }
                role => turns.push(Turn::from_row(role, row.content)),
            }
        }

        let instruction = match instruction {
            Some(instruction) => instruction,
            None => {
                let instruction = self.composer.compose().await;
                self.persist_instruction(session_id, &instruction).await;
                instruction
            }
        };
        turns.insert(0, Turn::system(instruction));

        info!(session_id = %session_id, rows = total, "♻️ 会话已从日志恢复");
        SessionTranscript::restored(session_id, turns)
    }

    async fn create(&self, session_id: &str) -> SessionTranscript {
        let instruction = self.composer.compose().await;
        self.persist_instruction(session_id, &instruction).await;
        info!(session_id = %session_id, "🆕 新建会话");
        SessionTranscript::new(session_id, instruction)
    }

    async fn persist_instruction(&self, session_id: &str, instruction: &str) {
        if let Err(e) = self
            .conversations
            .append(session_id, Role::System, instruction)
            .await
        {
            warn!(session_id = %session_id, error = %e, "系统指令落库失败");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{InMemoryConversationStore, InMemoryMemoryStore};
    use chrono::{Duration as ChronoDuration, Utc};
    use std::time::Duration;

    fn cache_with(store: Arc<InMemoryConversationStore>) -> SessionCache {
        let composer = Arc::new(PromptComposer::new(Arc::new(InMemoryMemoryStore::new())));
        SessionCache::new(store, composer)
    }

    async fn seed(store: &InMemoryConversationStore, session_id: &str, rows: &[(Role, &str)]) {
        let base = Utc::now() - ChronoDuration::minutes(10);
        for (i, (role, content)) in rows.iter().enumerate() {
            store
                .insert_row(ConversationRow {
                    id: Uuid::now_v7(),
                    session_id: session_id.to_string(),
                    role: *role,
                    content: content.to_string(),
                    created_at: base + ChronoDuration::seconds(i as i64),
                })
                .await;
        }
    }

    #[tokio::test]
    async fn test_new_session_gets_id_and_instruction() {
        let store = Arc::new(InMemoryConversationStore::new());
        let cache = cache_with(store.clone());

        let lease = cache.resolve(None).await;
        assert!(Uuid::parse_str(lease.session_id()).is_ok());
        assert_eq!(lease.len(), 1);
        assert!(lease.turns()[0].is_system());
        assert_eq!(lease.instruction(), PromptComposer::template());

        let rows = store.load_session(lease.session_id()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].role, Role::System);
    }

    #[tokio::test]
    async fn test_blank_id_is_treated_as_missing() {
        let cache = cache_with(Arc::new(InMemoryConversationStore::new()));
        let lease = cache.resolve(Some("   ")).await;
        assert!(Uuid::parse_str(lease.session_id()).is_ok());
    }

    #[tokio::test]
    async fn test_hydrate_keeps_existing_instruction() {
        let store = Arc::new(InMemoryConversationStore::new());
        seed(
            &store,
            "s1",
            &[
                (Role::System, "old instruction"),
                (Role::User, "hi"),
                (Role::Assistant, "hello"),
            ],
        )
        .await;
        let cache = cache_with(store.clone());

        let lease = cache.resolve(Some("s1")).await;
        assert_eq!(
            lease.turns(),
            &[
                Turn::system("old instruction"),
                Turn::user("hi"),
                Turn::assistant("hello")
            ]
        );
        assert_eq!(store.row_count("s1").await, 3);
    }

    #[tokio::test]
    async fn test_hydrate_without_instruction_prepends_and_persists() {
        let store = Arc::new(InMemoryConversationStore::new());
        seed(&store, "s2", &[(Role::User, "hi"), (Role::Assistant, "hello")]).await;
        let cache = cache_with(store.clone());

        let lease = cache.resolve(Some("s2")).await;
        assert_eq!(lease.len(), 3);
        assert!(lease.turns()[0].is_system());
        assert_eq!(lease.turns()[1], Turn::user("hi"));
        assert_eq!(store.row_count("s2").await, 3);
    }

    #[tokio::test]
    async fn test_hydrate_collapses_duplicate_instructions() {
        let store = Arc::new(InMemoryConversationStore::new());
        seed(
            &store,
            "s3",
            &[
                (Role::System, "first"),
                (Role::User, "hi"),
                (Role::System, "second"),
                (Role::Assistant, "hello"),
            ],
        )
        .await;
        let cache = cache_with(store);

        let lease = cache.resolve(Some("s3")).await;
        let systems = lease.turns().iter().filter(|t| t.is_system()).count();
        assert_eq!(systems, 1);
        assert_eq!(lease.instruction(), "first");
        assert_eq!(lease.len(), 3);
    }

    #[tokio::test]
    async fn test_persisted_turns_replay_in_order() {
        let store = Arc::new(InMemoryConversationStore::new());
        let expected = {
            let cache = cache_with(store.clone());
            let mut lease = cache.resolve(Some("replay")).await;
            for (role, text) in [
                (Role::User, "one"),
                (Role::Assistant, "two"),
                (Role::User, "three"),
                (Role::Assistant, "four"),
            ] {
                lease.push(Turn::from_row(role, text.to_string()));
                store.append("replay", role, text).await.unwrap();
            }
            lease.turns().to_vec()
        };

        let restarted = cache_with(store);
        let lease = restarted.resolve(Some("replay")).await;
        assert_eq!(lease.turns(), expected.as_slice());
    }

    #[tokio::test]
    async fn test_hydration_failure_falls_back_to_fresh_session() {
        let store = Arc::new(InMemoryConversationStore::new());
        seed(&store, "s4", &[(Role::User, "hi")]).await;
        store.set_failing(true);
        let cache = cache_with(store);

        let lease = cache.resolve(Some("s4")).await;
        assert_eq!(lease.session_id(), "s4");
        assert_eq!(lease.len(), 1);
        assert!(lease.turns()[0].is_system());
    }

    #[tokio::test]
    async fn test_cached_session_is_returned_unchanged() {
        let store = Arc::new(InMemoryConversationStore::new());
        let cache = cache_with(store.clone());
        {
            let mut lease = cache.resolve(Some("s5")).await;
            lease.push(Turn::user("only in memory"));
        }
        let lease = cache.resolve(Some("s5")).await;
        assert_eq!(lease.len(), 2);
        assert_eq!(lease.turns()[1], Turn::user("only in memory"));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_same_session_is_serialised() {
        let cache = Arc::new(cache_with(Arc::new(InMemoryConversationStore::new())));
        let held = cache.resolve(Some("busy")).await;

        let waiting = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.resolve(Some("busy")).await.len() })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiting.is_finished(), "同一会话不应同时拿到两个租约");

        let other = tokio::time::timeout(Duration::from_millis(200), cache.resolve(Some("free")))
            .await
            .expect("不同会话不应被阻塞");
        assert_eq!(other.session_id(), "free");

        drop(held);
        let len = tokio::time::timeout(Duration::from_secs(1), waiting)
            .await
            .expect("释放后应能拿到租约")
            .unwrap();
        assert_eq!(len, 1);
    }
}
