//! voice-assistant 入口
//!
//! - `voice-assistant serve`：启动 WebSocket 服务（默认子命令）
//! - `voice-assistant chat`：本地命令行对话

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use voice_assistant::agent::{OrchestratorConfig, TurnOrchestrator};
use voice_assistant::config::AppConfig;
use voice_assistant::error::Result;
use voice_assistant::llm::ResponsesClient;
use voice_assistant::llm::config::ModelRegistry;
use voice_assistant::memory::{
    ConversationStore, InMemoryConversationStore, InMemoryMemoryStore, MemoryStore, PgStore,
};
use voice_assistant::server::{console, websocket};
use voice_assistant::session::{PromptComposer, SessionCache};
use voice_assistant::tools::memory::SaveMemoryTool;
use voice_assistant::tools::weather::{WeatherClient, WeatherTool};
use voice_assistant::tools::{ToolDispatcher, ToolExecutionConfig};

#[derive(Parser)]
#[command(name = "voice-assistant", version, about = "语音助手对话编排后端")]
struct Cli {
    /// YAML 配置文件路径
    #[arg(short, long, global = true, env = "ASSISTANT_CONFIG")]
    config: Option<PathBuf>,

    /// 模型名（覆盖配置文件）
    #[arg(short, long, global = true, env = "ASSISTANT_MODEL")]
    model: Option<String>,

    /// PostgreSQL 连接串；未设置时使用 SUPABASE_DB_URL，仍没有则使用内存存储
    #[arg(long, global = true, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// 不转发增量文本，只发送最终回复
    #[arg(long, global = true)]
    no_partials: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// 启动 WebSocket 服务
    Serve {
        /// 监听地址（覆盖配置文件）
        #[arg(short, long, env = "ASSISTANT_BIND")]
        bind: Option<String>,
    },
    /// 本地命令行对话
    Chat {
        /// 继续指定会话
        #[arg(short, long)]
        session: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let default_filter = match cli.command {
        Some(Commands::Chat { .. }) => "voice_assistant=warn",
        _ => "voice_assistant=info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let config = load_config(&cli)?;
    let (orchestrator, pg) = build(&config).await?;

    match cli.command {
        Some(Commands::Chat { session }) => console::run(orchestrator, session).await?,
        Some(Commands::Serve { bind }) => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            serve(&bind, orchestrator).await?;
        }
        None => serve(&config.server.bind, orchestrator).await?,
    }

    if let Some(pg) = pg {
        pg.close().await;
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(&path.to_string_lossy())?,
        None => AppConfig::default(),
    };
    if let Some(model) = &cli.model {
        config.model.name = model.clone();
    }
    if let Some(url) = cli
        .database_url
        .clone()
        .or_else(|| std::env::var("SUPABASE_DB_URL").ok())
        .filter(|url| !url.trim().is_empty())
    {
        config.database.url = Some(url);
    }
    if cli.no_partials {
        config.server.stream_partials = false;
    }
    config.validate()?;
    Ok(config)
}

async fn build(config: &AppConfig) -> Result<(Arc<TurnOrchestrator>, Option<PgStore>)> {
    let (memories, conversations, pg): (Arc<dyn MemoryStore>, Arc<dyn ConversationStore>, _) =
        match &config.database.url {
            Some(_) => {
                let pg = PgStore::connect(&config.database).await?;
                pg.ensure_schema().await?;
                let shared = Arc::new(pg.clone());
                (shared.clone(), shared, Some(pg))
            }
            None => {
                warn!("⚠️ 未配置 DATABASE_URL，使用内存存储（重启后数据丢失）");
                (
                    Arc::new(InMemoryMemoryStore::new()),
                    Arc::new(InMemoryConversationStore::new()),
                    None,
                )
            }
        };

    let registry = ModelRegistry::from_env()?;
    let model = registry.get_model(&config.model.name)?;
    let http = Arc::new(reqwest::Client::new());
    let llm = Arc::new(ResponsesClient::new(http.clone(), model));
    info!(model = %llm.model_name(), "🤖 模型已就绪");

    let mut tools = ToolDispatcher::new_with_config(ToolExecutionConfig {
        timeout_ms: config.tools.timeout_ms,
    });
    tools.register(Box::new(SaveMemoryTool::new(memories.clone())));
    tools.register(Box::new(WeatherTool::new(WeatherClient::new(
        http,
        &config.weather,
    ))));

    let composer = Arc::new(PromptComposer::new(memories));
    let sessions = Arc::new(SessionCache::new(conversations.clone(), composer));
    let orchestrator = TurnOrchestrator::new(
        sessions,
        conversations,
        llm,
        Arc::new(tools),
        OrchestratorConfig::from_app(config),
    );
    Ok((Arc::new(orchestrator), pg))
}

async fn serve(bind: &str, orchestrator: Arc<TurnOrchestrator>) -> Result<()> {
    let listener = TcpListener::bind(bind).await?;
    let shutdown = CancellationToken::new();
    websocket::cancel_on_shutdown_signal(shutdown.clone())?;
    websocket::serve(listener, orchestrator, shutdown).await
}
