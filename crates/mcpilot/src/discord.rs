//! Discord session adapter
//!
//! Delivers inbound messages to the [`CommandRouter`] and posts its
//! replies back to the originating channel.

use crate::error::Result;
use mcpilot_core::{CommandRouter, SetupOutcome, UserId};
use serenity::async_trait;
use serenity::client::{Client, Context, EventHandler};
use serenity::http::Http;
use serenity::model::channel::Message;
use serenity::model::gateway::{GatewayIntents, Ready};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Gateway intents needed to read commands in guild channels and DMs
pub fn intents() -> GatewayIntents {
    GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
}

/// Resolve the bot's own user ID. Fails when the token is rejected.
pub async fn current_user_id(token: &str) -> Result<UserId> {
    let http = Http::new(token);
    let user = http.get_current_user().await?;
    info!(user = %user.name, "Discord token accepted");
    Ok(UserId(user.id.get()))
}

/// Serenity event handler wired to the router
pub struct Handler {
    router: Arc<CommandRouter>,
}

impl Handler {
    pub fn new(router: Arc<CommandRouter>) -> Self {
        Self { router }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("Logged on as {}!", ready.user.name);

        let controller = self.router.controller();
        match controller.setup().await {
            SetupOutcome::Connected => {
                info!(
                    instance_id = %controller.instance_id(),
                    "Connection to the EC2 instance has been established successfully."
                );
            }
            SetupOutcome::Unreachable => {
                error!(
                    instance_id = %controller.instance_id(),
                    "Could not connect to the EC2 instance. Check the instance ID, region and AWS credentials, then restart."
                );
            }
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let author = UserId(msg.author.id.get());
        let Some(reply) = self.router.handle(author, &msg.content).await else {
            return;
        };

        if let Err(e) = msg.channel_id.say(&ctx.http, reply).await {
            warn!(channel = %msg.channel_id, error = %e, "Failed to send reply");
        }
    }
}

/// Connect to the gateway and process events until the session ends
pub async fn run(token: &str, router: Arc<CommandRouter>) -> Result<()> {
    let mut client = Client::builder(token, intents())
        .event_handler(Handler::new(router))
        .await?;

    client.start().await?;
    Ok(())
}
