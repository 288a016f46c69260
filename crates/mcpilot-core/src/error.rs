//! Error types for mcpilot

use thiserror::Error;

/// Result type for provider and probe operations
pub type Result<T> = std::result::Result<T, PilotError>;

/// Core error type for mcpilot operations
#[derive(Error, Debug)]
pub enum PilotError {
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Instance not found: {0}")]
    InstanceNotFound(String),

    #[error("Game server probe failed: {0}")]
    Probe(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PilotError {
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    pub fn probe(msg: impl Into<String>) -> Self {
        Self::Probe(msg.into())
    }
}
