use std::io::Write as _;
use std::sync::Arc;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::agent::{ChatReply, ChatRequest, TurnOrchestrator};
use crate::error::Result;

const PROMPT: &str = "🎙️ > ";

/// 本地命令行对话
///
/// 行编辑在独立线程中进行（不阻塞 tokio 工作线程），每读完一行等待本轮回复结束后再读下一行。
/// `/new` 开启新会话，`/exit` 或 Ctrl-C / Ctrl-D 退出。
pub async fn run(orchestrator: Arc<TurnOrchestrator>, session_id: Option<String>) -> Result<()> {
    let mut session_id = session_id;
    let (line_tx, mut line_rx) = mpsc::channel::<Option<String>>(1);
    let (ready_tx, ready_rx) = std::sync::mpsc::channel::<()>();

    std::thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                warn!("无法初始化命令行编辑器: {e}");
                let _ = line_tx.blocking_send(None);
                return;
            }
        };
        while ready_rx.recv().is_ok() {
            let line = match editor.readline(PROMPT) {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());
                    Some(line)
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => None,
                Err(e) => {
                    warn!("读取输入失败: {e}");
                    None
                }
            };
            if line_tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    println!("语音助手控制台：直接输入问题，/new 开启新会话，/exit 退出");
    loop {
        if ready_tx.send(()).is_err() {
            break;
        }
        let Some(Some(line)) = line_rx.recv().await else {
            break;
        };
        let line = line.trim();
        match line {
            "" => continue,
            "/exit" | "/quit" => break,
            "/new" => {
                session_id = None;
                println!("🆕 已开启新会话");
                continue;
            }
            _ => {}
        }

        let mut request = ChatRequest::new(session_id.clone(), line);
        session_id = Some(request.ensure_session_id().to_string());
        if let Err(e) = ask(&orchestrator, request).await {
            println!("❌ {e}");
        }
    }

    println!("👋 再见");
    Ok(())
}

/// 运行一轮：增量文本边到边打印，返回最终回复
async fn ask(orchestrator: &TurnOrchestrator, request: ChatRequest) -> Result<ChatReply> {
    let (partial_tx, mut partial_rx) = mpsc::channel::<ChatReply>(32);
    let cancel = CancellationToken::new();

    let turn = async move { orchestrator.handle_turn(request, &partial_tx, &cancel).await };
    let print = async {
        let mut streamed = false;
        while let Some(partial) = partial_rx.recv().await {
            if !streamed {
                print!("🤖 ");
                streamed = true;
            }
            print!("{}", partial.text);
            let _ = std::io::stdout().flush();
        }
        streamed
    };
    let (result, streamed) = tokio::join!(turn, print);

    if streamed {
        println!();
    }
    let reply = result?;
    if !streamed {
        println!("🤖 {}", reply.text);
    }
    Ok(reply)
}
