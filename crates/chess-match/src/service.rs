//! Application service tying commands, persistence and turn clocks together.
//!
//! Each command loads the match, applies the command to the aggregate, saves
//! the new events, and then re-arms or stops that match's turn clock.

use crate::aggregate::{Match, TurnOutcome};
use crate::clock::{create_expiry_broadcast, ExpiryBroadcast, TurnClock, TurnExpired};
use crate::config::MatchConfig;
use crate::error::MatchError;
use crate::ids::{MatchId, MemberId};
use crate::repository::MatchRepository;
use crate::store::MatchSummary;
use chess_core::{PieceKind, Square};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

type ClockMap = Mutex<HashMap<MatchId, TurnClock>>;

/// Hosts matches for members.
pub struct MatchService {
    repository: Arc<MatchRepository>,
    config: MatchConfig,
    runtime: Option<Handle>,
    notify: ExpiryBroadcast,
    clocks: Arc<ClockMap>,
    pruner: Option<JoinHandle<()>>,
}

impl MatchService {
    /// Creates a service over `repository`.
    ///
    /// Turn clocks need a tokio runtime. When called outside one, or with
    /// `clock_enabled` off, turns are untimed.
    pub fn new(repository: Arc<MatchRepository>, config: MatchConfig) -> Self {
        let runtime = if config.clock_enabled {
            let handle = Handle::try_current().ok();
            if handle.is_none() {
                tracing::warn!("No tokio runtime available, turn clocks disabled");
            }
            handle
        } else {
            None
        };
        let notify = create_expiry_broadcast();
        let clocks = Arc::new(Mutex::new(HashMap::new()));
        let pruner = runtime.as_ref().map(|handle| {
            handle.spawn(prune_expired(notify.subscribe(), Arc::downgrade(&clocks)))
        });
        MatchService {
            repository,
            config,
            runtime,
            notify,
            clocks,
            pruner,
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Subscribes to turn expiry notices from every match.
    pub fn subscribe(&self) -> broadcast::Receiver<TurnExpired> {
        self.notify.subscribe()
    }

    /// Pairs two members in a new match and starts the first turn.
    pub fn start_match(&self, first: MemberId, second: MemberId) -> Result<MatchId, MatchError> {
        let mut m = Match::new(MatchId::new());
        m.start(first, second)?;
        self.repository.save(&mut m)?;
        self.rearm(&m);
        Ok(m.id())
    }

    /// Proposes a move. Only accepted moves are saved and restart the clock.
    pub fn take_turn(
        &self,
        match_id: MatchId,
        member: MemberId,
        start: Square,
        end: Square,
    ) -> Result<TurnOutcome, MatchError> {
        let mut m = self.repository.load(match_id)?;
        let outcome = m.take_turn(member, start, end)?;
        if outcome.is_accepted() {
            self.repository.save(&mut m)?;
            self.rearm(&m);
        }
        if outcome.ends_match() {
            if let Some(result) = m.result() {
                tracing::info!("Match {} ended on the board: {}", match_id, result);
            }
        }
        Ok(outcome)
    }

    pub fn resign(&self, match_id: MatchId, member: MemberId) -> Result<(), MatchError> {
        let mut m = self.repository.load(match_id)?;
        m.resign(member)?;
        self.repository.save(&mut m)?;
        self.rearm(&m);
        Ok(())
    }

    pub fn draw(&self, match_id: MatchId, accepted: bool) -> Result<(), MatchError> {
        let mut m = self.repository.load(match_id)?;
        m.draw(accepted)?;
        self.repository.save(&mut m)?;
        self.rearm(&m);
        Ok(())
    }

    /// Picks the piece a freshly promoted pawn becomes. The clock keeps
    /// running for the opponent.
    pub fn promote_piece(
        &self,
        match_id: MatchId,
        square: Square,
        kind: PieceKind,
    ) -> Result<(), MatchError> {
        let mut m = self.repository.load(match_id)?;
        m.promote_piece(square, kind)?;
        self.repository.save(&mut m)
    }

    /// The match as currently stored.
    pub fn get_match(&self, match_id: MatchId) -> Result<Match, MatchError> {
        self.repository.load(match_id)
    }

    pub fn list_matches(&self) -> Result<Vec<MatchSummary>, MatchError> {
        self.repository.summaries()
    }

    /// Returns true if `match_id` has a running turn clock.
    pub fn is_clock_armed(&self, match_id: MatchId) -> bool {
        self.clocks().get(&match_id).is_some_and(TurnClock::is_armed)
    }

    /// Points the match's clock at the member to move, or drops it once
    /// nobody is.
    fn rearm(&self, m: &Match) {
        let Some(runtime) = &self.runtime else {
            return;
        };
        let mut clocks = self.clocks();
        match m.player_to_move() {
            Some(player) => {
                let clock = clocks.entry(m.id()).or_insert_with(|| {
                    TurnClock::new(
                        Arc::clone(&self.repository),
                        runtime.clone(),
                        self.notify.clone(),
                    )
                });
                clock.start(m.id(), player.member_id, self.config.turn_duration());
            }
            None => {
                // Dropping the clock disarms it.
                clocks.remove(&m.id());
            }
        }
    }

    fn clocks(&self) -> MutexGuard<'_, HashMap<MatchId, TurnClock>> {
        lock(&self.clocks)
    }

    #[cfg(test)]
    fn has_clock(&self, match_id: MatchId) -> bool {
        self.clocks().contains_key(&match_id)
    }
}

impl Drop for MatchService {
    fn drop(&mut self) {
        if let Some(pruner) = self.pruner.take() {
            pruner.abort();
        }
    }
}

fn lock(clocks: &ClockMap) -> MutexGuard<'_, HashMap<MatchId, TurnClock>> {
    clocks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Drops the clock of every match that ended by expiry.
///
/// A clock re-armed since the notice was sent is kept.
async fn prune_expired(mut expirations: broadcast::Receiver<TurnExpired>, clocks: Weak<ClockMap>) {
    loop {
        let expired = match expirations.recv().await {
            Ok(expired) => expired,
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!("Clock pruning skipped {} expiry notices", skipped);
                continue;
            }
            Err(RecvError::Closed) => return,
        };
        let Some(clocks) = clocks.upgrade() else {
            return;
        };
        let mut clocks = lock(&clocks);
        if clocks
            .get(&expired.match_id)
            .is_some_and(|clock| !clock.is_armed())
        {
            clocks.remove(&expired.match_id);
            tracing::debug!("Dropped turn clock of match {}", expired.match_id);
        }
    }
}
