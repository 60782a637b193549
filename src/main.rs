use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio::io::BufReader;

use robyul_bot::application::errors::BotError;
use robyul_bot::application::messaging::{Dispatcher, EventParser, Invoker, Messenger, Session};
use robyul_bot::application::services::PermissionEvaluator;
use robyul_bot::infrastructure::adapters::console::ConsoleAdapter;
use robyul_bot::infrastructure::config::Config;
use robyul_bot::infrastructure::i18n::Texts;
use robyul_bot::infrastructure::state::CachedState;
use robyul_bot::infrastructure::telemetry::TracingTelemetry;
use robyul_bot::plugins::{builtin, PluginRegistry};

#[derive(Parser)]
#[command(name = "robyul-bot")]
#[command(about = "Plugin-based chat bot with isolated command dispatch", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Show full error details and backtraces in error replies
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot on the console gateway
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    let result = match cli.command {
        Commands::Run => run_bot(&cli.config, cli.debug),
        Commands::Version => {
            println!("robyul-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn load_config(path: &str, debug: bool) -> Result<Config, BotError> {
    let mut config = if std::path::Path::new(path).exists() {
        Config::load(path)?
    } else {
        tracing::info!("No config at {}, using defaults", path);
        Config::default()
    };
    config.apply_env();
    config.bot.debug |= debug;
    Ok(config)
}

fn run_bot(config_path: &str, debug: bool) -> Result<(), BotError> {
    let config = load_config(config_path, debug)?;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_console_bot(config))
}

async fn run_console_bot(config: Config) -> Result<(), BotError> {
    let texts = Arc::new(Texts::new(config.texts.clone()));
    let adapter = Arc::new(ConsoleAdapter::new(config.console.clone()));
    let state = Arc::new(CachedState::new(adapter.upstream()));

    let permissions = PermissionEvaluator::new(config.permissions.to_permission_config(), state.clone());
    let messenger = Messenger::new(adapter.clone(), texts.clone());
    let session = Session::new(messenger.clone(), state, permissions, texts.clone());
    let invoker = Invoker::new(
        messenger,
        Arc::new(TracingTelemetry::default()),
        texts,
        config.bot.debug,
    );

    let mut builder = PluginRegistry::builder(config.plugins.clone());
    builtin::register_all(&mut builder, &config)?;
    let registry = Arc::new(builder.build());
    registry.init_all(&session).await?;

    tracing::info!(
        "Bot started: {} (prefix {:?}, {} plugin(s): {})",
        config.bot.name,
        config.bot.prefix,
        registry.len(),
        registry.plugin_names().join(", ")
    );

    let parser = EventParser::new(config.bot.prefix.clone(), config.console.bot_id.clone());
    let dispatcher = Dispatcher::new(registry.clone(), session.clone(), invoker.clone());

    let stdin = BufReader::new(tokio::io::stdin());
    let interrupted = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Ctrl-C handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
    };
    adapter.pump(stdin, &parser, &dispatcher, interrupted).await;

    tracing::info!("Waiting for {} invocation(s) to finish", invoker.outstanding());
    invoker.shutdown().await;
    registry.uninit_all(&session).await;
    tracing::info!("Shutdown complete");
    Ok(())
}

fn init_config() -> Result<(), BotError> {
    let yaml = Config::default().to_yaml()?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}
