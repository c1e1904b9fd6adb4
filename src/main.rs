use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use kael::application::messaging::IntentDispatcher;
use kael::domain::entities::{Command, Effect};
use kael::domain::traits::EffectSink;
use kael::infrastructure::adapters::{build_app, AppState, ConsoleAdapter};
use kael::infrastructure::config::{Config, Mode};
use kael::infrastructure::effects::EffectQueue;
use kael::infrastructure::providers::DuckDuckGoSearch;
use kael::infrastructure::speech::Speaker;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(name = "kael")]
#[command(about = "KAEL - Knowledge and Artificially Enhanced Logic", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Deployment mode (overrides config and KAEL_MODE)
    #[arg(short, long)]
    mode: Option<Mode>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,
        /// Bind port
        #[arg(short, long)]
        port: Option<u16>,
        /// Open the UI in a browser once listening
        #[arg(long)]
        open_browser: bool,
    },
    /// Interactive session in the terminal
    Console,
    /// Answer a single command and exit
    Ask {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

/// Everything a front end needs, wired from one config
struct Services {
    config: Config,
    dispatcher: Arc<IntentDispatcher>,
    speaker: Arc<Speaker>,
    effects: Arc<dyn EffectSink>,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Version => {
            println!("kael v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
        command => run(command, &cli.config, cli.mode),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands, config_path: &Path, mode: Option<Mode>) -> Result<(), BoxError> {
    let mut config = load_config(config_path, mode)?;
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async move {
        match command {
            Commands::Serve { host, port, open_browser } => {
                if let Some(host) = host {
                    config.server.host = host;
                }
                if let Some(port) = port {
                    config.server.port = port;
                }
                serve(build_services(config)?, open_browser).await
            }
            Commands::Console => {
                let services = build_services(config)?;
                ConsoleAdapter::new(services.dispatcher, services.speaker, services.effects)
                    .run()
                    .await?;
                Ok(())
            }
            Commands::Ask { text } => {
                let services = build_services(config)?;
                let Some(command) = Command::parse(&text.join(" ")) else {
                    return Err("No command provided".into());
                };
                let reply = services.dispatcher.dispatch(&command).await;
                println!("{}", reply);
                Ok(())
            }
            Commands::Version | Commands::InitConfig => Ok(()),
        }
    })
}

/// File if present, then environment (including `.env`), then CLI overrides
fn load_config(path: &Path, mode: Option<Mode>) -> Result<Config, BoxError> {
    dotenvy::dotenv().ok();

    let mut config = if path.exists() {
        tracing::info!("Loading config from {}", path.display());
        let mut config = Config::load(path)?;
        config.apply_env()?;
        config
    } else {
        Config::load_env()?
    };

    if let Some(mode) = mode {
        config.mode = mode;
    }

    Ok(config.finalize())
}

/// Must run inside the runtime: the effect worker is spawned here
fn build_services(config: Config) -> Result<Services, BoxError> {
    let speaker = Arc::new(Speaker::detect(&config.speech));
    let effects: Arc<dyn EffectSink> = Arc::new(EffectQueue::start(&speaker));
    let search = DuckDuckGoSearch::from_config(&config)?;
    let dispatcher = IntentDispatcher::from_config(&config, Arc::new(search), effects.clone());

    tracing::info!(
        "KAEL {} ready ({} mode, search: {}, news: {}, weather: {}, gemini: {})",
        env!("CARGO_PKG_VERSION"),
        config.mode,
        config.features.search,
        config.features.news,
        config.features.weather,
        config.llm_enabled(),
    );

    Ok(Services {
        config,
        dispatcher: Arc::new(dispatcher),
        speaker,
        effects,
    })
}

async fn serve(services: Services, open_browser: bool) -> Result<(), BoxError> {
    let Services { config, dispatcher, speaker, effects } = services;
    let addr = config.bind_addr();

    let state = AppState::new(dispatcher, speaker, effects.clone());
    let app = build_app(state, config.server.static_dir.as_deref());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Starting KAEL API server on http://{}", addr);

    if open_browser {
        effects.submit(Effect::OpenBrowser(format!("http://{}", addr)));
    }

    axum::serve(listener, app).await?;
    Ok(())
}

fn init_config() -> Result<(), BoxError> {
    let config = Config::default();
    let yaml = serde_yaml::to_string(&config)?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}
