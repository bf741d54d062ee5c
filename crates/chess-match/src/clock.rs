//! Per-turn deadline.
//!
//! A [`TurnClock`] arms one timer at a time. When it fires, the member to
//! move forfeits the match and a [`TurnExpired`] notice is broadcast.

use crate::error::MatchError;
use crate::ids::{MatchId, MemberId};
use crate::repository::MatchRepository;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Broadcast when a member let their turn run out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnExpired {
    pub match_id: MatchId,
    pub member_id: MemberId,
    /// Time from arming to expiry.
    pub exceeded: Duration,
}

/// Sender side of the expiry notifications.
pub type ExpiryBroadcast = broadcast::Sender<TurnExpired>;

/// Creates a channel for expiry notifications.
pub fn create_expiry_broadcast() -> ExpiryBroadcast {
    let (tx, _) = broadcast::channel(64);
    tx
}

#[derive(Default)]
struct ClockState {
    generation: u64,
    armed: Option<JoinHandle<()>>,
}

impl ClockState {
    /// Invalidates whatever timer is armed.
    fn disarm(&mut self) {
        self.generation += 1;
        if let Some(task) = self.armed.take() {
            task.abort();
        }
    }
}

/// A restartable one-shot timer for the member to move.
///
/// Arming again or stopping invalidates the previous timer. A timer whose
/// callback already passed the generation check runs to completion and
/// forfeits the member even if they have moved since. The forfeit only
/// fails once the match has ended.
pub struct TurnClock {
    repository: Arc<MatchRepository>,
    runtime: Handle,
    notify: ExpiryBroadcast,
    state: Arc<Mutex<ClockState>>,
}

impl TurnClock {
    pub fn new(repository: Arc<MatchRepository>, runtime: Handle, notify: ExpiryBroadcast) -> Self {
        TurnClock {
            repository,
            runtime,
            notify,
            state: Arc::new(Mutex::new(ClockState::default())),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TurnExpired> {
        self.notify.subscribe()
    }

    /// Arms the timer for `member_id`, replacing any armed timer.
    pub fn start(&self, match_id: MatchId, member_id: MemberId, duration: Duration) {
        let mut state = lock(&self.state);
        state.disarm();
        let generation = state.generation;

        let expiry = Expiry {
            match_id,
            member_id,
            duration,
            generation,
            state: Arc::clone(&self.state),
            repository: Arc::clone(&self.repository),
            notify: self.notify.clone(),
        };
        state.armed = Some(self.runtime.spawn(expiry.run()));
        tracing::debug!(
            "Turn clock armed for {} in match {} ({}ms)",
            member_id,
            match_id,
            duration.as_millis()
        );
    }

    /// Disarms the timer. Does nothing if none is armed.
    pub fn stop(&self) {
        lock(&self.state).disarm();
    }

    /// Returns true while a timer is waiting to fire.
    pub fn is_armed(&self) -> bool {
        lock(&self.state).armed.is_some()
    }
}

impl Drop for TurnClock {
    fn drop(&mut self) {
        self.stop();
    }
}

fn lock(state: &Mutex<ClockState>) -> MutexGuard<'_, ClockState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct Expiry {
    match_id: MatchId,
    member_id: MemberId,
    duration: Duration,
    generation: u64,
    state: Arc<Mutex<ClockState>>,
    repository: Arc<MatchRepository>,
    notify: ExpiryBroadcast,
}

impl Expiry {
    async fn run(self) {
        let armed_at = Instant::now();
        tokio::time::sleep(self.duration).await;
        {
            let mut state = lock(&self.state);
            if state.generation != self.generation {
                return;
            }
            state.armed = None;
        }

        tracing::info!(
            "Turn expired for {} in match {}",
            self.member_id,
            self.match_id
        );
        if let Err(e) = self.forfeit() {
            tracing::error!("Failed to forfeit match {}: {}", self.match_id, e);
        }
        let expired = TurnExpired {
            match_id: self.match_id,
            member_id: self.member_id,
            exceeded: armed_at.elapsed(),
        };
        if self.notify.send(expired).is_err() {
            tracing::debug!("No listeners for turn expiry in match {}", self.match_id);
        }
    }

    fn forfeit(&self) -> Result<(), MatchError> {
        let mut m = self.repository.load(self.match_id)?;
        m.forfeit(self.member_id)?;
        self.repository.save(&mut m)
    }
}
