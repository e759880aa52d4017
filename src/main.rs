use clap::{Parser, Subcommand};
use std::sync::Arc;

mod domain;
mod application;
mod infrastructure;

use application::errors::BotError;
use application::handlers::register_commands;
use application::services::{CommandService, MessageService};
use domain::traits::Bot;
use infrastructure::adapters::console::{self, ConsoleAdapter};
use infrastructure::adapters::telegram::{runner, TelegramAdapter};
use infrastructure::config::Config;
use infrastructure::joke::OfficialJokeClient;

#[derive(Parser)]
#[command(name = "jokebot")]
#[command(about = "A small Telegram bot that tells jokes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config and environment)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Telegram bot
    Run,
    /// Talk to the bot on stdin (dev mode)
    Console,
    /// Show version
    Version,
    /// Print a default config
    InitConfig,
}

fn main() {
    // Load .env before the subscriber so RUST_LOG from the file applies
    let env_file = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    match env_file {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => tracing::debug!("No .env file, using process environment"),
        Err(e) => {
            tracing::error!("error loading env file: {}", e);
            std::process::exit(1);
        }
    }

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => run_bot(&cli.config, cli.token),
        Commands::Console => run_console(&cli.config),
        Commands::Version => {
            println!("jokebot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

/// Config file if present, then environment on top
fn load_config(config_path: &str) -> Result<Config, BotError> {
    let mut config = if std::path::Path::new(config_path).exists() {
        tracing::info!("Loading config from {}", config_path);
        Config::load(config_path)?
    } else {
        Config::default()
    };
    config.apply_env();
    Ok(config)
}

fn build_commands(config: &Config) -> CommandService {
    let jokes = Arc::new(OfficialJokeClient::new(&config.joke.endpoint));
    tracing::info!("Jokes from {} (on failure: {:?})", jokes.endpoint(), config.joke.on_failure);
    let mut commands = CommandService::new(&config.bot.prefix);
    register_commands(&mut commands, jokes, config.joke.on_failure);
    commands
}

fn run_bot(config_path: &str, token_override: Option<String>) -> Result<(), BotError> {
    let config = load_config(config_path)?.with_token(token_override);
    let token = config.token()?.to_string();

    tracing::info!("Starting {}", config.bot.name);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let mut bot = TelegramAdapter::new(token).with_api_base(&config.telegram.api_base);
        bot.start().await?;

        // Rejected tokens fail here
        bot.fetch_bot_info().await?;
        let info = bot.bot_info();
        tracing::info!("Bot started: @{} ({}, id {})", info.username, info.name, info.id);

        let commands = build_commands(&config);
        if let Err(e) = bot.register_commands(&commands.commands()).await {
            tracing::warn!("Failed to register commands: {}", e);
        }

        let service = MessageService::new(bot, commands);
        runner::run_telegram_bot(&service, config.telegram.poll_timeout_seconds).await
    })
}

fn run_console(config_path: &str) -> Result<(), BotError> {
    let config = load_config(config_path)?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let bot = ConsoleAdapter::new();
        bot.start().await?;

        let service = MessageService::new(bot, build_commands(&config));
        console::run_console_bot(&service).await
    })
}

fn init_config() -> Result<(), BotError> {
    let yaml = Config::default().to_yaml()?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}
