//! Persistence collaborators.
//!
//! The aggregate never talks to storage directly. The repository pushes its
//! events through an [`EventStore`] and mirrors match starts into a
//! [`MatchSummaryStore`] so matches can be listed without replaying them.

use crate::error::StoreError;
use crate::events::{MatchStarted, StoredEvent};
use crate::ids::{MatchId, MemberId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Append-only storage of match event streams.
pub trait EventStore: Send + Sync {
    /// Returns the committed events of a stream in version order.
    fn get_events(&self, match_id: MatchId) -> Result<Vec<StoredEvent>, StoreError>;

    /// Appends one event.
    ///
    /// `event.version` must directly follow the stream's last version.
    /// Appended events become visible once an append with `commit` set
    /// goes through.
    fn append_event(
        &self,
        match_id: MatchId,
        event: StoredEvent,
        commit: bool,
    ) -> Result<(), StoreError>;
}

/// A listing entry for one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    pub match_id: MatchId,
    pub white_member_id: MemberId,
    pub black_member_id: MemberId,
    pub started_at: DateTime<Utc>,
}

/// Read-side listing of matches.
pub trait MatchSummaryStore: Send + Sync {
    fn add_match_summary(&self, match_id: MatchId, started: &MatchStarted)
        -> Result<(), StoreError>;

    /// Returns all summaries, most recently started first.
    fn get_match_summaries(&self) -> Result<Vec<MatchSummary>, StoreError>;
}

#[derive(Debug, Default)]
struct Stream {
    committed: Vec<StoredEvent>,
    staged: Vec<StoredEvent>,
}

impl Stream {
    fn last_version(&self) -> u64 {
        self.staged
            .last()
            .or(self.committed.last())
            .map_or(0, |e| e.version)
    }
}

/// An [`EventStore`] held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    streams: Mutex<HashMap<MatchId, Stream>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<MatchId, Stream>>, StoreError> {
        self.streams
            .lock()
            .map_err(|_| StoreError::Unavailable("event store lock poisoned".to_string()))
    }
}

impl EventStore for InMemoryEventStore {
    fn get_events(&self, match_id: MatchId) -> Result<Vec<StoredEvent>, StoreError> {
        let streams = self.lock()?;
        Ok(streams
            .get(&match_id)
            .map(|s| s.committed.clone())
            .unwrap_or_default())
    }

    fn append_event(
        &self,
        match_id: MatchId,
        event: StoredEvent,
        commit: bool,
    ) -> Result<(), StoreError> {
        let mut streams = self.lock()?;
        let stream = streams.entry(match_id).or_default();

        let expected = stream.last_version() + 1;
        if event.version != expected {
            // A failed save must not leave half a batch behind.
            stream.staged.clear();
            return Err(StoreError::VersionConflict {
                match_id,
                expected,
                actual: event.version,
            });
        }

        stream.staged.push(event);
        if commit {
            let staged = std::mem::take(&mut stream.staged);
            stream.committed.extend(staged);
        }
        Ok(())
    }
}

/// A [`MatchSummaryStore`] held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryMatchSummaryStore {
    summaries: Mutex<Vec<MatchSummary>>,
}

impl InMemoryMatchSummaryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MatchSummaryStore for InMemoryMatchSummaryStore {
    fn add_match_summary(
        &self,
        match_id: MatchId,
        started: &MatchStarted,
    ) -> Result<(), StoreError> {
        let mut summaries = self
            .summaries
            .lock()
            .map_err(|_| StoreError::Unavailable("summary store lock poisoned".to_string()))?;
        summaries.retain(|s| s.match_id != match_id);
        summaries.push(MatchSummary {
            match_id,
            white_member_id: started.white_member_id,
            black_member_id: started.black_member_id,
            started_at: started.started_at,
        });
        Ok(())
    }

    fn get_match_summaries(&self) -> Result<Vec<MatchSummary>, StoreError> {
        let summaries = self
            .summaries
            .lock()
            .map_err(|_| StoreError::Unavailable("summary store lock poisoned".to_string()))?;
        let mut listed = summaries.clone();
        listed.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(listed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn event(version: u64) -> StoredEvent {
        StoredEvent {
            version,
            type_name: "TurnTaken".to_string(),
            payload: json!({}),
        }
    }

    #[test]
    fn unknown_stream_is_empty() {
        let store = InMemoryEventStore::new();
        assert!(store.get_events(MatchId::new()).unwrap().is_empty());
    }

    #[test]
    fn events_become_visible_on_commit() {
        let store = InMemoryEventStore::new();
        let id = MatchId::new();
        store.append_event(id, event(1), false).unwrap();
        store.append_event(id, event(2), false).unwrap();
        assert!(store.get_events(id).unwrap().is_empty());

        store.append_event(id, event(3), true).unwrap();
        let versions: Vec<u64> = store.get_events(id).unwrap().iter().map(|e| e.version).collect();
        assert_eq!(versions, vec![1, 2, 3]);
    }

    #[test]
    fn version_gap_is_a_conflict() {
        let store = InMemoryEventStore::new();
        let id = MatchId::new();
        store.append_event(id, event(1), true).unwrap();
        store.append_event(id, event(2), false).unwrap();

        let err = store.append_event(id, event(4), true).unwrap_err();
        assert_eq!(
            err,
            StoreError::VersionConflict {
                match_id: id,
                expected: 3,
                actual: 4
            }
        );
        // The staged event was dropped with the failed batch.
        store.append_event(id, event(2), true).unwrap();
        assert_eq!(store.get_events(id).unwrap().len(), 2);
    }

    #[test]
    fn stale_writer_conflicts() {
        let store = InMemoryEventStore::new();
        let id = MatchId::new();
        store.append_event(id, event(1), true).unwrap();
        store.append_event(id, event(2), true).unwrap();
        assert!(matches!(
            store.append_event(id, event(2), true),
            Err(StoreError::VersionConflict { expected: 3, .. })
        ));
    }

    #[test]
    fn summaries_newest_first() {
        let store = InMemoryMatchSummaryStore::new();
        let now = Utc::now();
        let older = MatchId::new();
        let newer = MatchId::new();
        let started = |at| MatchStarted {
            white_member_id: MemberId::new(),
            black_member_id: MemberId::new(),
            started_at: at,
        };
        store.add_match_summary(older, &started(now - Duration::minutes(5))).unwrap();
        store.add_match_summary(newer, &started(now)).unwrap();

        let listed: Vec<MatchId> = store
            .get_match_summaries()
            .unwrap()
            .into_iter()
            .map(|s| s.match_id)
            .collect();
        assert_eq!(listed, vec![newer, older]);
    }
}
