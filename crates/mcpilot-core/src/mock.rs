//! In-memory providers for tests
//!
//! Both mocks count the calls they receive so callers can assert that a
//! guard prevented a provider mutation.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{PilotError, Result};
use crate::traits::{GameProbe, InstanceProvider};
use crate::types::{GameStatus, InstanceDescription, InstanceId, InstanceState};

/// Instance provider backed by a single in-memory description.
///
/// A successful start moves the instance to `pending`, a successful stop
/// to `stopping`, like the real provider does right after the request.
pub struct MockInstanceProvider {
    description: Mutex<Option<InstanceDescription>>,
    fail_mutations: AtomicBool,
    describe_calls: AtomicUsize,
    start_calls: AtomicUsize,
    stop_calls: AtomicUsize,
}

impl MockInstanceProvider {
    pub fn new(description: InstanceDescription) -> Self {
        Self::with_description(Some(description))
    }

    /// Provider whose describe calls always fail
    pub fn unreachable() -> Self {
        Self::with_description(None)
    }

    fn with_description(description: Option<InstanceDescription>) -> Self {
        Self {
            description: Mutex::new(description),
            fail_mutations: AtomicBool::new(false),
            describe_calls: AtomicUsize::new(0),
            start_calls: AtomicUsize::new(0),
            stop_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_description(&self, description: InstanceDescription) {
        *self.lock() = Some(description);
    }

    pub fn fail_describe(&self) {
        *self.lock() = None;
    }

    pub fn fail_mutations(&self) {
        self.fail_mutations.store(true, Ordering::SeqCst);
    }

    pub fn describe_calls(&self) -> usize {
        self.describe_calls.load(Ordering::SeqCst)
    }

    pub fn start_calls(&self) -> usize {
        self.start_calls.load(Ordering::SeqCst)
    }

    pub fn stop_calls(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<InstanceDescription>> {
        self.description
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn transition(&self, id: &InstanceId, next: InstanceState) -> Result<()> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(PilotError::provider("mutation refused"));
        }
        match self.lock().as_mut() {
            Some(description) => {
                description.state = next;
                Ok(())
            }
            None => Err(PilotError::InstanceNotFound(id.to_string())),
        }
    }
}

#[async_trait]
impl InstanceProvider for MockInstanceProvider {
    async fn describe_instance(&self, id: &InstanceId) -> Result<InstanceDescription> {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);
        self.lock()
            .clone()
            .ok_or_else(|| PilotError::provider(format!("describe failed for {}", id)))
    }

    async fn start_instance(&self, id: &InstanceId) -> Result<()> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        self.transition(id, InstanceState::Pending)
    }

    async fn stop_instance(&self, id: &InstanceId) -> Result<()> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        self.transition(id, InstanceState::Stopping)
    }
}

/// Game probe with a fixed reply
pub struct MockGameProbe {
    reply: Option<GameStatus>,
    queries: AtomicUsize,
    last_target: Mutex<Option<(String, u16)>>,
}

impl MockGameProbe {
    /// Probe that reports the server online with `players` connected
    pub fn online(players: u32) -> Self {
        Self::with_reply(Some(GameStatus {
            players_online: players,
            players_max: 20,
            version: Some("1.20.4".to_string()),
        }))
    }

    /// Probe whose queries always fail (server down or unreachable)
    pub fn failing() -> Self {
        Self::with_reply(None)
    }

    fn with_reply(reply: Option<GameStatus>) -> Self {
        Self {
            reply,
            queries: AtomicUsize::new(0),
            last_target: Mutex::new(None),
        }
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Host and port of the most recent query
    pub fn last_target(&self) -> Option<(String, u16)> {
        self.last_target
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl GameProbe for MockGameProbe {
    async fn query(&self, host: &str, port: u16) -> Result<GameStatus> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        *self
            .last_target
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some((host.to_string(), port));
        self.reply
            .clone()
            .ok_or_else(|| PilotError::probe(format!("connection refused by {}:{}", host, port)))
    }
}
