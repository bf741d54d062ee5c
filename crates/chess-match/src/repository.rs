//! Loading and saving matches.

use crate::aggregate::Match;
use crate::error::MatchError;
use crate::events::{DomainEvent, StoredEvent};
use crate::ids::MatchId;
use crate::store::{
    EventStore, InMemoryEventStore, InMemoryMatchSummaryStore, MatchSummary, MatchSummaryStore,
};
use std::sync::Arc;

/// Bridges [`Match`] aggregates and their stores.
#[derive(Clone)]
pub struct MatchRepository {
    events: Arc<dyn EventStore>,
    summaries: Arc<dyn MatchSummaryStore>,
}

impl MatchRepository {
    pub fn new(events: Arc<dyn EventStore>, summaries: Arc<dyn MatchSummaryStore>) -> Self {
        MatchRepository { events, summaries }
    }

    /// A repository backed by fresh in-memory stores.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryEventStore::new()),
            Arc::new(InMemoryMatchSummaryStore::new()),
        )
    }

    /// Replays the stored stream of `match_id`.
    ///
    /// # Errors
    ///
    /// [`MatchError::MatchNotFound`] when the stream is empty, and
    /// [`MatchError::Replay`] when one of its events cannot be decoded.
    pub fn load(&self, match_id: MatchId) -> Result<Match, MatchError> {
        let stored = self.events.get_events(match_id)?;
        if stored.is_empty() {
            return Err(MatchError::MatchNotFound(match_id));
        }
        let events = decode_stream(&stored).map_err(|source| MatchError::Replay {
            match_id,
            source: Box::new(source),
        })?;
        Ok(Match::from_events(match_id, events))
    }

    /// Appends the match's uncommitted events, committing with the last one.
    ///
    /// A started match is also recorded in the summary store.
    pub fn save(&self, m: &mut Match) -> Result<(), MatchError> {
        let pending = m.uncommitted_events();
        let base = m.original_version();
        let last = pending.len().saturating_sub(1);

        for (i, event) in pending.iter().enumerate() {
            let stored = StoredEvent::encode(base + i as u64 + 1, event)?;
            self.events.append_event(m.id(), stored, i == last)?;
            if let DomainEvent::MatchStarted(started) = event {
                self.summaries.add_match_summary(m.id(), started)?;
            }
        }
        if !pending.is_empty() {
            tracing::debug!("Saved {} event(s) for match {}", pending.len(), m.id());
        }
        m.mark_committed();
        Ok(())
    }

    pub fn summaries(&self) -> Result<Vec<MatchSummary>, MatchError> {
        Ok(self.summaries.get_match_summaries()?)
    }

    /// The raw stored stream, for export.
    pub fn stored_events(&self, match_id: MatchId) -> Result<Vec<StoredEvent>, MatchError> {
        Ok(self.events.get_events(match_id)?)
    }
}

/// Decodes a stored stream in order.
pub fn decode_stream(stored: &[StoredEvent]) -> Result<Vec<DomainEvent>, MatchError> {
    stored.iter().map(StoredEvent::decode).collect()
}
