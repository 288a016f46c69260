//! # mcpilot
//!
//! Discord front end for a Minecraft server hosted on a single EC2 instance.
//!
//! ## Architecture
//!
//! ```text
//! Discord (serenity)            mcpilot-core                 Integrations
//! ├── message event  ───────→  CommandRouter
//! └── reply          ←───────    └── LifecycleController ──→ EC2 (aws-sdk-ec2)
//!                                                        └──→ Minecraft status ping
//! ```
//!
//! Users type `/server start|stop|status|ip` or `/help`. Start is only
//! issued from a stopped instance; stop only from a running instance with
//! nobody online.

#![warn(clippy::all)]

pub mod config;
pub mod discord;
pub mod ec2;
pub mod error;
pub mod probe;

pub use config::Config;
pub use ec2::Ec2InstanceProvider;
pub use error::{AppError, Result};
pub use probe::MinecraftProbe;
