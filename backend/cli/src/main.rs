mod client;
mod config;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum_extra::extract::cookie::Key;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{info, warn};

use prinix_chat::{ChatFallback, GeminiBackend};
use prinix_core::{ChatBackend, TargetOpener};
use prinix_gateway::{AppState, Deployment};
use prinix_media::YtDlpResolver;
use prinix_opener::{detect_platform, DesktopOpener, PlatformOpener, UnsupportedOpener};
use prinix_routing::IntentRouter;
use prinix_tts::narrator::DEFAULT_QUEUE_CAPACITY;
use prinix_tts::{CommandSpeaker, Narrator};

use config::Config;

#[derive(Parser)]
#[command(name = "prinix")]
#[command(about = "PRINIX - voice and text assistant backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the assistant HTTP server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind the HTTP server to
        #[arg(short, long)]
        bind: Option<String>,
        /// Do not open a browser tab on startup
        #[arg(long)]
        no_browser: bool,
    },
    /// Send one message to a running server
    Ask {
        /// The utterance, e.g. "play despacito"
        message: String,
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Show the running server's health report
    Status {
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Commands::Serve {
            port,
            bind,
            no_browser,
        } => {
            let config = Config {
                port: port.unwrap_or(config.port),
                bind_address: bind.unwrap_or(config.bind_address),
                open_browser: config.open_browser && !no_browser,
                ..config
            };
            let sink = prinix_logging::init_logger(&config.log_dir, &config.log_level);
            info!(?sink, "Logging initialized");
            run_server(config).await?;
        }
        Commands::Ask { message, port } => {
            init_console_logging(&config.log_level);
            client::ask(port.unwrap_or(config.port), &message).await?;
        }
        Commands::Status { port } => {
            init_console_logging(&config.log_level);
            client::status(port.unwrap_or(config.port)).await?;
        }
    }

    Ok(())
}

fn init_console_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn chat_backend(config: &Config) -> Option<Arc<dyn ChatBackend>> {
    let Some(api_key) = &config.gemini_api_key else {
        warn!("GEMINI_API_KEY not set; chat replies will be placeholders");
        return None;
    };
    let backend = GeminiBackend::new(api_key)
        .with_model(&config.gemini_model)
        .with_base_url(&config.gemini_base_url);
    info!(model = %backend.model(), "Registered Gemini chat backend");
    Some(Arc::new(backend))
}

fn narrator(config: &Config) -> Narrator {
    if !config.speech_enabled() {
        return Narrator::disabled();
    }
    match CommandSpeaker::detect() {
        Some(speaker) => {
            info!(program = %speaker.program().display(), "Speech rendering enabled");
            Narrator::spawn(Arc::new(speaker), DEFAULT_QUEUE_CAPACITY)
        }
        None => {
            warn!("No speech program found; speech rendering disabled");
            Narrator::disabled()
        }
    }
}

fn cookie_key(config: &Config) -> Key {
    if let Some(secret) = &config.session_secret {
        match Key::try_from(secret.as_bytes()) {
            Ok(key) => return key,
            Err(e) => warn!(error = %e, "PRINIX_SESSION_SECRET unusable; generating a random key"),
        }
    }
    // Sessions do not survive a restart with a random key.
    Key::generate()
}

async fn run_server(config: Config) -> Result<()> {
    info!(
        port = config.port,
        bind = %config.bind_address,
        deployment = config.deployment.as_str(),
        "Starting PRINIX"
    );

    let chat = ChatFallback::from_backend(chat_backend(&config), config.max_conversations);
    let media = Arc::new(YtDlpResolver::new(config.ytdlp_path.clone()));

    let opener: Arc<dyn TargetOpener> = match config.deployment {
        Deployment::Desktop => Arc::new(DesktopOpener::new(detect_platform())),
        Deployment::Serverless => Arc::new(UnsupportedOpener),
    };

    let router = IntentRouter::new(media, opener, chat, narrator(&config))
        .with_assistant_name(&config.assistant_name);

    let state = AppState::new(
        Arc::new(router),
        cookie_key(&config),
        config.deployment,
        config.template_dir.clone(),
        config.static_dir.clone(),
    );

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = TcpListener::bind(&addr).await?;

    if config.browser_enabled() {
        let url = config.local_url();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            info!(url = %url, "Opening browser");
            if let Err(e) = detect_platform().open_url(&url) {
                warn!(error = %e, "Failed to open browser");
            }
        });
    }

    prinix_gateway::serve(listener, state).await
}
