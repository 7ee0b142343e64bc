use std::net::SocketAddr;
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use super::{ClientMessage, ServerMessage};
use crate::agent::{ChatReply, ChatRequest, TurnOrchestrator};
use crate::error::{AssistantError, Result, TurnError};

type Outbound = mpsc::UnboundedSender<String>;

/// 在已绑定的监听器上提供 WebSocket 服务，直到 `shutdown` 被取消。
///
/// 每个连接的每句话语各自运行；连接断开会取消该连接上所有进行中的轮次。
pub async fn serve(
    listener: TcpListener,
    orchestrator: Arc<TurnOrchestrator>,
    shutdown: CancellationToken,
) -> Result<()> {
    let local = listener.local_addr()?;
    info!("🚀 WebSocket 服务已启动: ws://{local}");

    let connections = TaskTracker::new();
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, addr)) => {
                    debug!("新的 WebSocket 客户端连接: {addr}");
                    connections.spawn(handle_connection(
                        stream,
                        addr,
                        orchestrator.clone(),
                        shutdown.child_token(),
                    ));
                }
                Err(e) => error!("WebSocket accept 错误: {e}"),
            },
        }
    }

    connections.close();
    connections.wait().await;
    info!("🛑 WebSocket 服务已停止");
    Ok(())
}

/// 收到 Ctrl-C 或 SIGTERM 时取消 `shutdown`
///
/// 信号监听在返回前注册好，之后由后台任务等待。
pub fn cancel_on_shutdown_signal(shutdown: CancellationToken) -> Result<()> {
    #[cfg(unix)]
    {
        let mut sigterm = signal(SignalKind::terminate())?;
        tokio::spawn(async move {
            tokio::select! {
                _ = sigterm.recv() => info!("收到 SIGTERM，正在关闭"),
                _ = tokio::signal::ctrl_c() => info!("收到 Ctrl-C，正在关闭"),
            }
            shutdown.cancel();
        });
    }

    #[cfg(not(unix))]
    {
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("收到 Ctrl-C，正在关闭");
                shutdown.cancel();
            }
        });
    }

    Ok(())
}

async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    orchestrator: Arc<TurnOrchestrator>,
    cancel: CancellationToken,
) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket 握手失败 ({addr}): {e}");
            return;
        }
    };

    let (mut write, mut read) = ws_stream.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let write_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Err(e) = write.send(Message::Text(msg)).await {
                warn!("WS 消息发送失败: {e}");
                break;
            }
        }
        let _ = write.close().await;
    });

    let turns = TaskTracker::new();
    loop {
        let frame = tokio::select! {
            _ = cancel.cancelled() => break,
            frame = read.next() => frame,
        };
        match frame {
            Some(Ok(Message::Text(text))) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(msg) if msg.message.trim().is_empty() => {
                    send_frame(&tx, &ServerMessage::error(msg.session_id, "message must not be empty"));
                }
                Ok(msg) => {
                    turns.spawn(run_utterance(
                        orchestrator.clone(),
                        msg.into(),
                        tx.clone(),
                        cancel.clone(),
                    ));
                }
                Err(e) => {
                    warn!("WebSocket 消息解析失败: {e}，原始内容: {text}");
                    send_frame(&tx, &ServerMessage::error(None, format!("invalid message: {e}")));
                }
            },
            Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
            Some(Ok(_)) => {}
        }
    }

    // 连接已断开：取消进行中的轮次，等待它们回滚
    cancel.cancel();
    turns.close();
    turns.wait().await;
    drop(tx);
    let _ = write_task.await;
    info!("WebSocket 客户端断开: {addr}");
}

/// 处理一句话语：增量文本边到边发，最后发出最终回复或错误
async fn run_utterance(
    orchestrator: Arc<TurnOrchestrator>,
    mut request: ChatRequest,
    outbound: Outbound,
    cancel: CancellationToken,
) {
    // 新会话在这里就定下 id，失败时错误帧也带上它
    let session_id = request.ensure_session_id().to_string();
    let (partial_tx, mut partial_rx) = mpsc::channel::<ChatReply>(32);

    let turn = async move { orchestrator.handle_turn(request, &partial_tx, &cancel).await };
    let forward = async {
        while let Some(partial) = partial_rx.recv().await {
            send_frame(&outbound, &ServerMessage::from(partial));
        }
    };
    let (result, ()) = tokio::join!(turn, forward);

    match result {
        Ok(reply) => send_frame(&outbound, &ServerMessage::from(reply)),
        Err(AssistantError::Turn(TurnError::Cancelled)) => {
            debug!("连接关闭，本轮已取消");
        }
        Err(e) => {
            error!(error = %e, "本轮处理失败");
            send_frame(
                &outbound,
                &ServerMessage::error(Some(session_id), format!("internal error: {e}")),
            );
        }
    }
}

fn send_frame(outbound: &Outbound, message: &ServerMessage) {
    match serde_json::to_string(message) {
        Ok(text) => {
            let _ = outbound.send(text);
        }
        Err(e) => warn!("WS 消息序列化失败: {e}"),
    }
}
