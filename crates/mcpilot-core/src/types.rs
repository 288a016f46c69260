//! Core types shared across mcpilot components

use std::fmt;

/// Default Minecraft Java edition port
pub const DEFAULT_GAME_PORT: u16 = 25565;

/// Opaque identifier of the managed cloud instance
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceId(pub String);

impl InstanceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a chat user (the bot itself included)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub u64);

/// Instance run-state as reported by the cloud provider
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InstanceState {
    Pending,
    Running,
    Stopping,
    Stopped,
    /// Any other provider state (`shutting-down`, `terminated`, ...) or
    /// `unknown` when the state could not be read.
    Other(String),
}

impl InstanceState {
    /// Placeholder reported when the provider could not be queried
    pub fn unknown() -> Self {
        Self::Other("unknown".to_string())
    }

    /// Map a provider state name (`running`, `stopped`, ...)
    pub fn from_name(name: &str) -> Self {
        match name {
            "pending" => Self::Pending,
            "running" => Self::Running,
            "stopping" => Self::Stopping,
            "stopped" => Self::Stopped,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Public network address assigned to a running instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicAddress {
    pub dns_name: Option<String>,
    pub ipv4: Option<String>,
}

impl PublicAddress {
    /// Host to contact the game server at: DNS name first, then IPv4.
    pub fn host(&self) -> Option<&str> {
        self.dns_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.ipv4.as_deref().filter(|s| !s.is_empty()))
    }

    pub fn is_empty(&self) -> bool {
        self.host().is_none()
    }
}

/// Result of one describe-instance call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceDescription {
    pub state: InstanceState,
    pub address: PublicAddress,
}

impl InstanceDescription {
    pub fn new(state: InstanceState) -> Self {
        Self {
            state,
            address: PublicAddress::default(),
        }
    }

    pub fn with_address(mut self, dns_name: impl Into<String>, ipv4: impl Into<String>) -> Self {
        self.address = PublicAddress {
            dns_name: Some(dns_name.into()),
            ipv4: Some(ipv4.into()),
        };
        self
    }
}

/// Reply of a live game server status query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStatus {
    pub players_online: u32,
    pub players_max: u32,
    pub version: Option<String>,
}

/// Game server liveness as presented to users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameServerSnapshot {
    pub online: bool,
    pub player_count: u32,
}

impl GameServerSnapshot {
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn online(player_count: u32) -> Self {
        Self {
            online: true,
            player_count,
        }
    }
}
