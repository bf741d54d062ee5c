//! Domain events and their storage encoding.
//!
//! Every state change of a match is one of four events. Events are stored as
//! a [`StoredEvent`]: a version, a type tag, and a JSON payload. Decoding
//! dispatches on the tag; an unrecognized tag is an error, never skipped.

use crate::error::MatchError;
use crate::ids::MemberId;
use chess_core::{Color, Move, PieceKind, Square};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The outcome of a finished match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchResult {
    WhiteWins,
    BlackWins,
    Draw,
    Stalemate,
}

impl MatchResult {
    /// The result in which `color` wins.
    pub const fn win_for(color: Color) -> Self {
        match color {
            Color::White => MatchResult::WhiteWins,
            Color::Black => MatchResult::BlackWins,
        }
    }

    /// The winning color, if any.
    pub const fn winner(self) -> Option<Color> {
        match self {
            MatchResult::WhiteWins => Some(Color::White),
            MatchResult::BlackWins => Some(Color::Black),
            MatchResult::Draw | MatchResult::Stalemate => None,
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchResult::WhiteWins => "1-0",
            MatchResult::BlackWins => "0-1",
            MatchResult::Draw | MatchResult::Stalemate => "1/2-1/2",
        };
        write!(f, "{}", s)
    }
}

/// Why a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndReason {
    Checkmate,
    Stalemate,
    Resignation,
    Agreement,
    TimeForfeit,
}

/// Two members were paired and colors assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStarted {
    pub white_member_id: MemberId,
    pub black_member_id: MemberId,
    pub started_at: DateTime<Utc>,
}

/// A member played an accepted move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnTaken {
    pub member_id: MemberId,
    pub start: Square,
    pub end: Square,
    pub taken_at: DateTime<Utc>,
}

impl TurnTaken {
    pub fn as_move(&self) -> Move {
        Move::new(self.start, self.end)
    }
}

/// The pawn that just reached its last rank was exchanged for another piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PawnPromoted {
    pub square: Square,
    pub kind: PieceKind,
    pub promoted_at: DateTime<Utc>,
}

/// The match is over.
///
/// A match ended by checkmate or stalemate carries the move that produced
/// the final position, so replay shows the board as it was left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEnded {
    pub result: MatchResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<EndReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_move: Option<TurnTaken>,
    pub ended_at: DateTime<Utc>,
}

/// A change to a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    MatchStarted(MatchStarted),
    TurnTaken(TurnTaken),
    PawnPromoted(PawnPromoted),
    MatchEnded(MatchEnded),
}

impl DomainEvent {
    pub const MATCH_STARTED: &'static str = "MatchStarted";
    pub const TURN_TAKEN: &'static str = "TurnTaken";
    pub const PAWN_PROMOTED: &'static str = "PawnPromoted";
    pub const MATCH_ENDED: &'static str = "MatchEnded";

    /// The tag the event is stored under.
    pub const fn type_name(&self) -> &'static str {
        match self {
            DomainEvent::MatchStarted(_) => Self::MATCH_STARTED,
            DomainEvent::TurnTaken(_) => Self::TURN_TAKEN,
            DomainEvent::PawnPromoted(_) => Self::PAWN_PROMOTED,
            DomainEvent::MatchEnded(_) => Self::MATCH_ENDED,
        }
    }

    /// When the event happened.
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            DomainEvent::MatchStarted(e) => e.started_at,
            DomainEvent::TurnTaken(e) => e.taken_at,
            DomainEvent::PawnPromoted(e) => e.promoted_at,
            DomainEvent::MatchEnded(e) => e.ended_at,
        }
    }
}

/// An event as persisted in a match's stream.
///
/// `version` is 1-based and contiguous within a stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredEvent {
    pub version: u64,
    pub type_name: String,
    pub payload: serde_json::Value,
}

impl StoredEvent {
    /// Encodes `event` as stream entry number `version`.
    pub fn encode(version: u64, event: &DomainEvent) -> Result<Self, MatchError> {
        let payload = match event {
            DomainEvent::MatchStarted(e) => serde_json::to_value(e)?,
            DomainEvent::TurnTaken(e) => serde_json::to_value(e)?,
            DomainEvent::PawnPromoted(e) => serde_json::to_value(e)?,
            DomainEvent::MatchEnded(e) => serde_json::to_value(e)?,
        };
        Ok(StoredEvent {
            version,
            type_name: event.type_name().to_string(),
            payload,
        })
    }

    /// Decodes the payload according to the type tag.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::UnknownEventType`] for an unrecognized tag and
    /// [`MatchError::Codec`] for a payload that does not fit its tag.
    pub fn decode(&self) -> Result<DomainEvent, MatchError> {
        let payload = self.payload.clone();
        let event = match self.type_name.as_str() {
            DomainEvent::MATCH_STARTED => DomainEvent::MatchStarted(serde_json::from_value(payload)?),
            DomainEvent::TURN_TAKEN => DomainEvent::TurnTaken(serde_json::from_value(payload)?),
            DomainEvent::PAWN_PROMOTED => DomainEvent::PawnPromoted(serde_json::from_value(payload)?),
            DomainEvent::MATCH_ENDED => DomainEvent::MatchEnded(serde_json::from_value(payload)?),
            other => return Err(MatchError::UnknownEventType(other.to_string())),
        };
        Ok(event)
    }
}
