//! Instance lifecycle controller
//!
//! Mediates every interaction with the cloud instance and the game server
//! behind four guarded operations:
//!
//! ```text
//! status()  -> describe instance, probe game server if running
//! address() -> describe instance, report public DNS name / IPv4
//! start()   -> only from an observed `stopped` state
//! stop()    -> only from an observed `running` state with nobody online
//! ```
//!
//! All operations run under one async mutex, so a guard is evaluated and
//! acted upon without another command interleaving. Provider and probe
//! errors never leave this module: they degrade to an outcome value.

use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::traits::{GameProbe, InstanceProvider};
use crate::types::{GameServerSnapshot, InstanceId, InstanceState, PublicAddress};

/// Connection to the cloud provider, resolved once by [`LifecycleController::setup`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connection {
    /// `setup` has not run yet
    Unset,
    /// The initial describe call succeeded
    Connected,
    /// The initial describe call failed; terminal until restart
    Unreachable,
}

/// Outcome of [`LifecycleController::setup`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupOutcome {
    Connected,
    Unreachable,
}

/// Three-line status report rendered into chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub instance_state: InstanceState,
    pub game: GameServerSnapshot,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "```EC2 instance: {}\nMC server: {}\nPlayers Online: {}```",
            self.instance_state,
            if self.game.online { "online" } else { "offline" },
            self.game.player_count
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusOutcome {
    NotConnected,
    Report(StatusReport),
}

impl fmt::Display for StatusOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => {
                f.write_str("Not connected to AWS. Cannot retrieve current state.")
            }
            Self::Report(report) => fmt::Display::fmt(report, f),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressOutcome {
    NotConnected,
    /// Address as returned by the provider; fields may be empty
    Report(PublicAddress),
}

impl fmt::Display for AddressOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => f.write_str("Not connected to AWS. Cannot retrieve IP."),
            Self::Report(address) => write!(
                f,
                "```Server IPv4 Address: {}\nServer Public DNS Name: {}```",
                address.ipv4.as_deref().unwrap_or_default(),
                address.dns_name.as_deref().unwrap_or_default()
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    NotConnected,
    Started,
    /// Observed state is not `stopped`
    Rejected(InstanceState),
    /// The guard held but the provider refused the start call
    Failed,
}

impl fmt::Display for StartOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => f.write_str("Not connected to AWS. Cannot start EC2 instance."),
            Self::Started => f.write_str("Starting server."),
            Self::Rejected(state) => write!(
                f,
                "Cannot start server right now.\nThe server is currently: {}",
                state
            ),
            Self::Failed => f.write_str("Could not start the server right now."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    NotConnected,
    Stopped,
    /// Running, but players are still connected
    Occupied(u32),
    /// Observed state is not `running`
    Rejected(InstanceState),
    /// The guard held but the provider refused the stop call
    Failed,
}

impl fmt::Display for StopOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => f.write_str("Not connected to AWS. Cannot stop EC2 instance."),
            Self::Stopped => f.write_str("Stopping server."),
            Self::Occupied(_) => {
                f.write_str("Cannot stop server right now. Someone is still online.")
            }
            Self::Rejected(state) => write!(
                f,
                "Cannot stop server right now.\nThe server is currently: {}.",
                state
            ),
            Self::Failed => f.write_str("Could not stop the server right now."),
        }
    }
}

/// Mutable state shared by all chat events
#[derive(Debug)]
struct ControllerState {
    connection: Connection,
    /// Last address seen in a describe call. Informational only: every
    /// operation that needs an address describes the instance again.
    last_address: Option<PublicAddress>,
}

/// Guarded lifecycle operations over one cloud instance
pub struct LifecycleController {
    instance_id: InstanceId,
    game_port: u16,
    provider: Arc<dyn InstanceProvider>,
    probe: Arc<dyn GameProbe>,
    state: Mutex<ControllerState>,
}

impl LifecycleController {
    pub fn new(
        instance_id: InstanceId,
        game_port: u16,
        provider: Arc<dyn InstanceProvider>,
        probe: Arc<dyn GameProbe>,
    ) -> Self {
        Self {
            instance_id,
            game_port,
            provider,
            probe,
            state: Mutex::new(ControllerState {
                connection: Connection::Unset,
                last_address: None,
            }),
        }
    }

    pub fn instance_id(&self) -> &InstanceId {
        &self.instance_id
    }

    pub async fn connection(&self) -> Connection {
        self.state.lock().await.connection
    }

    pub async fn last_address(&self) -> Option<PublicAddress> {
        self.state.lock().await.last_address.clone()
    }

    /// Probe the provider once with a describe call.
    ///
    /// Only the first call reaches the provider; later calls return the
    /// recorded outcome.
    pub async fn setup(&self) -> SetupOutcome {
        let mut state = self.state.lock().await;
        match state.connection {
            Connection::Connected => return SetupOutcome::Connected,
            Connection::Unreachable => return SetupOutcome::Unreachable,
            Connection::Unset => {}
        }

        match self.provider.describe_instance(&self.instance_id).await {
            Ok(description) => {
                info!(
                    instance_id = %self.instance_id,
                    state = %description.state,
                    "Connected to cloud provider"
                );
                state.last_address = Some(description.address);
                state.connection = Connection::Connected;
                SetupOutcome::Connected
            }
            Err(e) => {
                error!(
                    instance_id = %self.instance_id,
                    error = %e,
                    "Cannot establish connection to the instance, credentials or instance ID might be wrong"
                );
                state.connection = Connection::Unreachable;
                SetupOutcome::Unreachable
            }
        }
    }

    /// Instance state plus game server liveness. Never fails.
    pub async fn status(&self) -> StatusOutcome {
        let mut state = self.state.lock().await;
        if state.connection != Connection::Connected {
            return StatusOutcome::NotConnected;
        }
        StatusOutcome::Report(self.observe(&mut state).await)
    }

    /// Public DNS name and IPv4 as currently reported by the provider.
    ///
    /// A failed describe call reports an empty address.
    pub async fn address(&self) -> AddressOutcome {
        let mut state = self.state.lock().await;
        if state.connection != Connection::Connected {
            return AddressOutcome::NotConnected;
        }

        match self.provider.describe_instance(&self.instance_id).await {
            Ok(description) => {
                state.last_address = Some(description.address.clone());
                AddressOutcome::Report(description.address)
            }
            Err(e) => {
                warn!(instance_id = %self.instance_id, error = %e, "Failed to describe instance");
                AddressOutcome::Report(PublicAddress::default())
            }
        }
    }

    /// Start the instance, only from an observed `stopped` state.
    pub async fn start(&self) -> StartOutcome {
        let mut state = self.state.lock().await;
        if state.connection != Connection::Connected {
            return StartOutcome::NotConnected;
        }

        let observed = self.refresh_state(&mut state).await;
        if observed != InstanceState::Stopped {
            info!(instance_id = %self.instance_id, state = %observed, "Start rejected");
            return StartOutcome::Rejected(observed);
        }

        match self.provider.start_instance(&self.instance_id).await {
            Ok(()) => {
                info!(instance_id = %self.instance_id, "Starting EC2 instance");
                StartOutcome::Started
            }
            Err(e) => {
                warn!(instance_id = %self.instance_id, error = %e, "Start request failed");
                StartOutcome::Failed
            }
        }
    }

    /// Stop the instance, only when it is running and nobody is online.
    pub async fn stop(&self) -> StopOutcome {
        let mut state = self.state.lock().await;
        if state.connection != Connection::Connected {
            return StopOutcome::NotConnected;
        }

        let report = self.observe(&mut state).await;
        if report.instance_state != InstanceState::Running {
            info!(instance_id = %self.instance_id, state = %report.instance_state, "Stop rejected");
            return StopOutcome::Rejected(report.instance_state);
        }
        if report.game.player_count > 0 {
            info!(
                instance_id = %self.instance_id,
                players = report.game.player_count,
                "Stop rejected, players online"
            );
            return StopOutcome::Occupied(report.game.player_count);
        }

        match self.provider.stop_instance(&self.instance_id).await {
            Ok(()) => {
                info!(instance_id = %self.instance_id, "Stopping EC2 instance");
                StopOutcome::Stopped
            }
            Err(e) => {
                warn!(instance_id = %self.instance_id, error = %e, "Stop request failed");
                StopOutcome::Failed
            }
        }
    }

    /// Describe the instance; the address is re-read on every call.
    async fn refresh(&self, state: &mut ControllerState) -> Option<(InstanceState, PublicAddress)> {
        match self.provider.describe_instance(&self.instance_id).await {
            Ok(description) => {
                state.last_address = Some(description.address.clone());
                Some((description.state, description.address))
            }
            Err(e) => {
                warn!(
                    instance_id = %self.instance_id,
                    error = %e,
                    "Failed to refresh instance state"
                );
                None
            }
        }
    }

    async fn refresh_state(&self, state: &mut ControllerState) -> InstanceState {
        self.refresh(state)
            .await
            .map(|(run_state, _)| run_state)
            .unwrap_or_else(InstanceState::unknown)
    }

    /// Refresh run-state and, when running, query the game server.
    async fn observe(&self, state: &mut ControllerState) -> StatusReport {
        let Some((instance_state, address)) = self.refresh(state).await else {
            return StatusReport {
                instance_state: InstanceState::unknown(),
                game: GameServerSnapshot::offline(),
            };
        };

        let game = if instance_state == InstanceState::Running {
            self.probe_game(&address).await
        } else {
            GameServerSnapshot::offline()
        };

        StatusReport {
            instance_state,
            game,
        }
    }

    async fn probe_game(&self, address: &PublicAddress) -> GameServerSnapshot {
        let Some(host) = address.host() else {
            debug!(instance_id = %self.instance_id, "Running instance has no public address yet");
            return GameServerSnapshot::offline();
        };

        match self.probe.query(host, self.game_port).await {
            Ok(status) => {
                debug!(
                    host = %host,
                    players = status.players_online,
                    max_players = status.players_max,
                    "Game server online"
                );
                GameServerSnapshot::online(status.players_online)
            }
            Err(e) => {
                warn!(host = %host, port = self.game_port, error = %e, "Game server query failed");
                GameServerSnapshot::offline()
            }
        }
    }
}
