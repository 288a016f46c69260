//! Runtime configuration
//!
//! Every option can come from the command line or from the environment;
//! a `.env` file in the working directory is loaded first.

use crate::ec2::DEFAULT_REGION;
use crate::error::{AppError, Result};
use crate::probe::DEFAULT_PROBE_TIMEOUT_SECS;
use clap::Parser;
use mcpilot_core::{DEFAULT_GAME_PORT, InstanceId};
use std::time::Duration;

/// mcpilot: control an EC2-hosted Minecraft server from Discord
#[derive(Parser, Debug, Clone)]
#[command(name = "mcpilot")]
#[command(about = "Discord bot that starts, stops and reports on an EC2-hosted Minecraft server", long_about = None)]
pub struct Config {
    /// Discord bot token
    #[arg(long, env = "DISCORDBOT_TOKEN", hide_env_values = true)]
    pub discord_token: String,

    /// EC2 instance ID hosting the game server
    #[arg(long, env = "SERVER_INSTANCE_ID")]
    pub instance_id: String,

    /// AWS region of the instance
    #[arg(long, env = "REGION_NAME", default_value = DEFAULT_REGION)]
    pub region: String,

    /// Minecraft server port
    #[arg(long, env = "MC_SERVER_PORT", default_value_t = DEFAULT_GAME_PORT)]
    pub game_port: u16,

    /// Timeout for one game server status query (seconds)
    #[arg(long, env = "MC_PROBE_TIMEOUT_SECS", default_value_t = DEFAULT_PROBE_TIMEOUT_SECS)]
    pub probe_timeout_secs: u64,
}

impl Config {
    /// Load `.env`, then parse arguments and environment
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();
        let config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Only presence is checked; the values are opaque to the bot.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("discord token", &self.discord_token),
            ("instance id", &self.instance_id),
            ("region", &self.region),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(AppError::config(format!("{} must not be empty", name)));
            }
        }
        Ok(())
    }

    pub fn instance_id(&self) -> InstanceId {
        InstanceId::new(self.instance_id.trim())
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}
