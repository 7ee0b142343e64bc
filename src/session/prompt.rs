use crate::memory::MemoryStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// 摘要中最多出现的记忆条数（按创建时间取最新）
pub const MEMORY_DIGEST_LIMIT: usize = 5;

const PERSONA_TEMPLATE: &str = "\
PERSONAL HOME ASSISTANT: VOICE MODE

You are a personal home assistant that people talk to out loud. Every reply you give \
is converted to speech, so it has to sound natural when spoken.

SPEAKING STYLE
- Talk the way a friendly person talks: everyday words, contractions, short sentences.
- Aim for roughly 75 to 100 spoken words. Lead with the most important point.
- Offer more detail only when the listener asks for it.

REMEMBERING THE USER
Whenever the user tells you something personal (where they live, their preferences, \
family, important dates, interests), call the save_memory tool with a short, specific \
description of that fact before you answer.

LIVE INFORMATION
For current weather, call the get_weather tool with the latitude and longitude of the \
place in question. Use your own knowledge for stable facts such as math, history and \
definitions.

TIME-SENSITIVE ANSWERS
Say how fresh the information is when that matters, and name the time zone whenever \
you give a clock time.

WHEN SOMETHING GOES WRONG
If a tool reports an error, apologize briefly and say you couldn't get that information \
right now. If the request is unclear, ask one short clarifying question.

OUTPUT FORMAT
Reply in plain sentences ready for text-to-speech. Never use Markdown, HTML, asterisks, \
bullet or numbered lists, code blocks or emojis.";

/// 系统指令组装器：固定人设模板 + 最近记忆摘要
pub struct PromptComposer {
    memories: Arc<dyn MemoryStore>,
}

impl PromptComposer {
    pub fn new(memories: Arc<dyn MemoryStore>) -> Self {
        Self { memories }
    }

    pub fn template() -> &'static str {
        PERSONA_TEMPLATE
    }

    /// 组装系统指令，从不失败：记忆读取失败时返回不带摘要的模板
    pub async fn compose(&self) -> String {
        let memories = match self.memories.recent(MEMORY_DIGEST_LIMIT).await {
            Ok(memories) => memories,
            Err(e) => {
                warn!(error = %e, "读取记忆失败，使用默认系统指令");
                return PERSONA_TEMPLATE.to_string();
            }
        };

        if memories.is_empty() {
            return PERSONA_TEMPLATE.to_string();
        }
        debug!(count = memories.len(), "🧠 注入记忆摘要");

        let mut prompt = String::from(PERSONA_TEMPLATE);
        prompt.push_str("\n\nRELEVANT MEMORIES\nThings the user has told you in past conversations:\n");
        for memory in &memories {
            prompt.push_str("- ");
            prompt.push_str(&memory.text);
            prompt.push('\n');
        }
        prompt.push_str("\nUse these memories to make your answers personal and relevant.");
        prompt
    }
}
