//! Errors raised by the match aggregate and its collaborators.

use crate::ids::MatchId;
use thiserror::Error;

/// Errors returned by match commands, the repository and the event codec.
///
/// Rule violations are not errors: a rejected move is reported through
/// [`TurnOutcome::Rejected`](crate::TurnOutcome::Rejected).
#[derive(Error, Debug)]
pub enum MatchError {
    /// The command's arguments are unacceptable (empty ids, a member playing
    /// themselves, a move out of turn).
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
    /// The command does not apply in the match's current state.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    /// No events are stored for this match.
    #[error("Match not found: {0}")]
    MatchNotFound(MatchId),
    /// A stored event carries a type tag the codec does not know.
    #[error("Type is unknown: {0}")]
    UnknownEventType(String),
    /// The stored stream for a match could not be turned back into a match.
    #[error("Failed to replay match {match_id}: {source}")]
    Replay {
        match_id: MatchId,
        #[source]
        source: Box<MatchError>,
    },
    /// An event payload could not be encoded or decoded.
    #[error("Failed to encode event: {0}")]
    Codec(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised by an [`EventStore`](crate::EventStore) or
/// [`MatchSummaryStore`](crate::MatchSummaryStore).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Someone else appended to the stream since it was loaded.
    #[error("Version conflict on match {match_id}: expected {expected}, got {actual}")]
    VersionConflict {
        match_id: MatchId,
        expected: u64,
        actual: u64,
    },
    /// The backing store could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
