//! epigram - CLI entry point.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use epigram::config::{self, Config, ConfigStore};
use epigram::error::ConfigError;
use epigram::git;
use epigram::output;
use epigram::provider::{OpenRouterClient, SYSTEM_INSTRUCTION, build_user_prompt};

/// Draft a commit message from your staged changes.
#[derive(Parser, Debug)]
#[command(name = "epigram")]
#[command(about = "Draft a commit message from your staged changes")]
#[command(disable_version_flag = true)]
struct Cli {
    /// Print version information
    #[arg(short = 'v', long = "version")]
    version: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a commit message from the staged diff (the default action)
    Commit,
    /// Read or write the persisted configuration
    Config {
        /// Config action: `get` or `set`
        action: String,
        /// Key, canonical or aliased (`key` for api_key, `id` for model)
        key: Option<String>,
        /// Value to persist (set only)
        value: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(e) = run().await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("epigram v{}", env!("CARGO_PKG_VERSION"));
        println!("{}", env!("CARGO_PKG_DESCRIPTION"));
        return Ok(());
    }

    match cli.command {
        Some(Command::Config { action, key, value }) => {
            run_config(&action, key.as_deref(), value.as_deref())
        }
        Some(Command::Commit) | None => run_commit().await,
    }
}

/// Handle `config <action> [key] [value]`.
fn run_config(action: &str, key: Option<&str>, value: Option<&str>) -> Result<()> {
    let mut store = ConfigStore::load(ConfigStore::default_path()?)?;
    let report = config::run_action(&mut store, action, key, value)?;
    println!("{report}");
    Ok(())
}

/// The full generate-and-present pipeline.
async fn run_commit() -> Result<()> {
    // Step 1: resolve configuration
    let store = ConfigStore::load(ConfigStore::default_path()?)?;
    let config = Config::resolve(&store);

    let api_key = match config.api_key.as_deref() {
        Some(key) if !key.is_empty() => key.to_string(),
        _ => return Err(ConfigError::MissingApiKey.into()),
    };

    // Step 2: collect staged changes, auto-staging once if needed
    let repo = git::open_repo()?;
    let Some(staged) = git::collect_staged(&repo)? else {
        println!("{}", output::render_clean_tree());
        return Ok(());
    };

    // Step 3: generate the message
    let model = config.model_or_default().to_string();
    let client = OpenRouterClient::new(api_key);
    let completion = client
        .complete(&model, SYSTEM_INSTRUCTION, &build_user_prompt(&staged.text))
        .await?;

    // Step 4: present
    println!(
        "{}",
        output::render_report(&completion, &model, staged.auto_staged)
    );

    Ok(())
}
