//! Capability traits for the two external collaborators.
//!
//! The lifecycle controller works through these interfaces only, so the
//! cloud SDK and the game protocol stay swappable (and mockable).

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{GameStatus, InstanceDescription, InstanceId};

/// Describe/start/stop a single compute instance by ID.
#[async_trait]
pub trait InstanceProvider: Send + Sync {
    async fn describe_instance(&self, id: &InstanceId) -> Result<InstanceDescription>;

    /// Request a start. Returns once the provider accepted the request,
    /// not when the instance is running.
    async fn start_instance(&self, id: &InstanceId) -> Result<()>;

    /// Request a stop. Same fire-and-forget contract as `start_instance`.
    async fn stop_instance(&self, id: &InstanceId) -> Result<()>;
}

/// Live status query against a game server.
#[async_trait]
pub trait GameProbe: Send + Sync {
    async fn query(&self, host: &str, port: u16) -> Result<GameStatus>;
}
