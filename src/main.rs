use lazy_openai::config::Config;
use lazy_openai::llm::{CompletionRequest, Message, OpenAIClient};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// lazy-openai - OpenAI client that resolves its API key on first use
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory searched (with its ancestors) for lazy-openai.toml
    #[arg(long, short = 'c', default_value = ".", global = true)]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Verify that an API key can be resolved
    Check,

    /// Send a single prompt and print the reply
    Chat {
        prompt: String,

        /// Override the model from the configuration file
        #[arg(long, short = 'm')]
        model: Option<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Default to "warn" if RUST_LOG is not set
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Loading configuration from: {}", args.config_dir.display());
    let config = Config::load_or_default(&args.config_dir)?;

    match args.command {
        Commands::Check => check_command(config),
        Commands::Chat { prompt, model } => chat_command(config, prompt, model),
    }
}

fn check_command(config: Config) -> Result<()> {
    let client = OpenAIClient::new(config.api_key);
    let handle = client.get_sync_client()?;

    println!("ok: {}", handle.base_url());
    Ok(())
}

fn chat_command(config: Config, prompt: String, model: Option<String>) -> Result<()> {
    let client = OpenAIClient::new(config.api_key);
    let model = model.unwrap_or(config.model);

    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;

    let reply = runtime.block_on(async {
        let handle = client.get_async_client()?;
        let request = CompletionRequest::new(model, vec![Message::user(prompt)]);
        let response = handle.chat_completion(&request).await?;

        response
            .first_content()
            .map(str::to_string)
            .context("Response contained no choices")
    })?;

    println!("{}", reply);
    Ok(())
}
