//! Error types for the mcpilot application

use mcpilot_core::PilotError;
use std::time::Duration;
use thiserror::Error;

/// Application result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Errors raised by the AWS, Minecraft and Discord integrations
#[derive(Error, Debug)]
pub enum AppError {
    /// AWS SDK error
    #[error("AWS error: {0}")]
    Aws(#[from] aws_sdk_ec2::Error),

    /// Discord client error
    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed game server reply
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Timeout
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// Instance not found
    #[error("Instance {0} not found")]
    InstanceNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Create a protocol error
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Convert from EC2 SDK error
    pub fn from_ec2<E>(err: E) -> Self
    where
        aws_sdk_ec2::Error: From<E>,
    {
        Self::Aws(aws_sdk_ec2::Error::from(err))
    }
}

impl From<AppError> for PilotError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::InstanceNotFound(id) => PilotError::InstanceNotFound(id),
            AppError::Config(msg) => PilotError::Config(msg),
            AppError::Io(_) | AppError::Json(_) | AppError::Protocol(_) | AppError::Timeout(_) => {
                PilotError::Probe(err.to_string())
            }
            AppError::Aws(_) | AppError::Discord(_) => PilotError::Provider(err.to_string()),
        }
    }
}
