//! seabot binary: load credentials, connect, run until interrupted.

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use seabot::{Bot, BotConfig, Credentials, DEFAULT_CREDENTIALS_PATH};

#[derive(Parser)]
#[command(name = "seabot", version, about = "Twitch chat bot for #smokedseabass")]
struct Args {
    /// Show debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let default_filter = if args.verbose {
        "seabot=debug"
    } else {
        "seabot=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let credentials =
        Credentials::load(DEFAULT_CREDENTIALS_PATH).context("failed to load credentials")?;

    let mut bot = Bot::connect(BotConfig::default(), credentials.access_token)
        .await
        .context("failed to connect")?;

    let outcome = bot.run().await;
    bot.disconnect().await;
    info!("goodbye!");
    outcome.map_err(Into::into)
}
