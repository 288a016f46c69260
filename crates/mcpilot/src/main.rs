//! mcpilot - Discord bot for an EC2-hosted Minecraft server
//!
//! ## Usage
//!
//! ```bash
//! # Values may also come from a .env file
//! export DISCORDBOT_TOKEN=...
//! export SERVER_INSTANCE_ID=i-0123456789abcdef0
//! export REGION_NAME=eu-central-1
//! export AWS_ACCESS_KEY_ID=... AWS_SECRET_ACCESS_KEY=...
//! mcpilot
//! ```

use anyhow::Context;
use mcpilot::{Config, Ec2InstanceProvider, MinecraftProbe, discord};
use mcpilot_core::{CommandRouter, LifecycleController};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mcpilot=info,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;

    info!("========================================");
    info!("mcpilot starting");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Instance: {} ({})", config.instance_id, config.region);
    info!("Game port: {}", config.game_port);
    info!("========================================");

    let provider = Arc::new(Ec2InstanceProvider::from_region(config.region.clone()).await);
    let probe = Arc::new(MinecraftProbe::with_timeout(config.probe_timeout()));
    let controller = Arc::new(LifecycleController::new(
        config.instance_id(),
        config.game_port,
        provider,
        probe,
    ));

    let bot_id = discord::current_user_id(&config.discord_token)
        .await
        .context("Discord rejected the bot token")?;
    let router = Arc::new(CommandRouter::new(bot_id, controller));

    discord::run(&config.discord_token, router).await?;
    Ok(())
}
