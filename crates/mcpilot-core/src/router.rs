//! Chat command routing
//!
//! Turns one chat line into at most one controller call. The first token
//! picks the command family (`/help`, `/server`), the second token picks
//! the server operation. Anything that does not start with a known
//! family is not a bot command and gets no reply.

use std::sync::Arc;

use crate::controller::LifecycleController;
use crate::types::UserId;

/// Reply to `/server` with a missing or unknown operation
pub const UNKNOWN_COMMAND: &str = "Unknown command.\nType /help for a list of available commands.";

const HELP_TOKEN: &str = "/help";
const SERVER_TOKEN: &str = "/server";

/// Operations available under `/server`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerCommand {
    Start,
    Stop,
    Status,
    Ip,
}

impl ServerCommand {
    pub const ALL: [ServerCommand; 4] = [Self::Start, Self::Stop, Self::Status, Self::Ip];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Status => "status",
            Self::Ip => "ip",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.name() == token)
    }
}

/// A parsed bot command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Server(ServerCommand),
    /// `/server` without a valid operation
    Unknown,
}

impl Command {
    /// Parse a chat line. `None` means the line is not addressed to the bot.
    pub fn parse(content: &str) -> Option<Self> {
        let mut tokens = content.split_whitespace();
        match tokens.next()? {
            HELP_TOKEN => Some(Self::Help),
            SERVER_TOKEN => Some(
                tokens
                    .next()
                    .and_then(ServerCommand::from_token)
                    .map_or(Self::Unknown, Self::Server),
            ),
            _ => None,
        }
    }
}

/// Static list of every recognized command
pub fn help_text() -> String {
    let operations: Vec<&str> = ServerCommand::ALL.iter().map(ServerCommand::name).collect();
    format!(
        "The following commands are available:\n```{} \n{} < {} > \n```",
        HELP_TOKEN,
        SERVER_TOKEN,
        operations.join(" | ")
    )
}

/// Dispatches chat messages to the lifecycle controller
pub struct CommandRouter {
    bot_id: UserId,
    controller: Arc<LifecycleController>,
}

impl CommandRouter {
    pub fn new(bot_id: UserId, controller: Arc<LifecycleController>) -> Self {
        Self { bot_id, controller }
    }

    pub fn controller(&self) -> &Arc<LifecycleController> {
        &self.controller
    }

    /// Handle one inbound message and return the reply to send, if any.
    ///
    /// Messages written by the bot itself are always ignored.
    pub async fn handle(&self, author: UserId, content: &str) -> Option<String> {
        if author == self.bot_id {
            return None;
        }
        let command = Command::parse(content)?;
        Some(self.dispatch(command).await)
    }

    pub async fn dispatch(&self, command: Command) -> String {
        match command {
            Command::Help => help_text(),
            Command::Unknown => UNKNOWN_COMMAND.to_string(),
            Command::Server(ServerCommand::Start) => self.controller.start().await.to_string(),
            Command::Server(ServerCommand::Stop) => self.controller.stop().await.to_string(),
            Command::Server(ServerCommand::Status) => self.controller.status().await.to_string(),
            Command::Server(ServerCommand::Ip) => self.controller.address().await.to_string(),
        }
    }
}
