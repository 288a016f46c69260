//! mcpilot core - chat-driven control of one game server instance
//!
//! This crate holds everything that does not depend on a concrete cloud
//! SDK or chat platform:
//! - `InstanceProvider` / `GameProbe` traits for the external capabilities
//! - `LifecycleController` with the guarded start/stop transitions
//! - `CommandRouter` turning chat lines into controller calls
//! - Error types, plus in-memory mocks for tests

pub mod controller;
pub mod error;
#[cfg(test)]
pub(crate) mod mock;
pub mod router;
pub mod traits;
pub mod types;

pub use controller::*;
pub use error::*;
pub use router::*;
pub use traits::*;
pub use types::*;
