//! Rebuilding match state from its events.
//!
//! [`Projection::apply`] is the only place state changes. It is used both
//! when a command raises a new event and when a stored stream is replayed,
//! so the two paths cannot drift apart.

use crate::events::{DomainEvent, MatchEnded, MatchResult, MatchStarted, PawnPromoted, TurnTaken};
use crate::ids::MemberId;
use chess_core::{Color, Move, Square};
use chess_engine::{apply_move, Board, PlayedMove, Turn};
use chrono::{DateTime, Utc};

/// A member seated at one side of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Player {
    pub color: Color,
    pub member_id: MemberId,
    /// Not tracked by matches themselves; left for the hosting platform.
    pub rating: Option<u32>,
}

/// Lifecycle of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    NotStarted,
    InProgress,
    Ended(MatchResult),
}

/// The state of a match derived from its events.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Projection {
    pub white: Option<Player>,
    pub black: Option<Player>,
    pub board: Board,
    pub turns: Vec<Turn>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended: Option<MatchEnded>,
    /// Square of a pawn that just reached its last rank and may still be
    /// exchanged for another piece.
    pub pending_promotion: Option<Square>,
}

impl Projection {
    pub fn status(&self) -> MatchStatus {
        match (&self.ended, self.started_at) {
            (Some(ended), _) => MatchStatus::Ended(ended.result),
            (None, Some(_)) => MatchStatus::InProgress,
            (None, None) => MatchStatus::NotStarted,
        }
    }

    pub fn result(&self) -> Option<MatchResult> {
        self.ended.as_ref().map(|e| e.result)
    }

    /// The side whose turn is open, while the match is in progress.
    pub fn color_to_move(&self) -> Option<Color> {
        if self.ended.is_some() {
            return None;
        }
        self.turns.last().filter(|t| !t.is_complete()).map(|t| t.player)
    }

    pub fn player(&self, color: Color) -> Option<&Player> {
        match color {
            Color::White => self.white.as_ref(),
            Color::Black => self.black.as_ref(),
        }
    }

    pub fn player_to_move(&self) -> Option<&Player> {
        self.color_to_move().and_then(|c| self.player(c))
    }

    /// The color `member` plays, if they are seated in this match.
    pub fn color_of(&self, member: MemberId) -> Option<Color> {
        [self.white, self.black]
            .into_iter()
            .flatten()
            .find(|p| p.member_id == member)
            .map(|p| p.color)
    }

    /// Folds one event into the state.
    pub fn apply(&mut self, event: &DomainEvent) {
        match event {
            DomainEvent::MatchStarted(e) => self.on_started(e),
            DomainEvent::TurnTaken(e) => {
                self.play(e);
                if let Some(color) = self.color_of(e.member_id) {
                    self.turns.push(Turn::open(color.opposite(), e.taken_at));
                }
            }
            DomainEvent::PawnPromoted(e) => self.on_promoted(e),
            DomainEvent::MatchEnded(e) => {
                if let Some(last) = &e.final_move {
                    self.play(last);
                }
                self.ended = Some(e.clone());
            }
        }
    }

    fn on_started(&mut self, e: &MatchStarted) {
        self.white = Some(Player {
            color: Color::White,
            member_id: e.white_member_id,
            rating: None,
        });
        self.black = Some(Player {
            color: Color::Black,
            member_id: e.black_member_id,
            rating: None,
        });
        self.board = Board::standard();
        self.turns = vec![Turn::open(Color::White, e.started_at)];
        self.started_at = Some(e.started_at);
    }

    /// Plays the move on the board and closes the open turn.
    fn play(&mut self, e: &TurnTaken) {
        let kind = self.board.piece_at(e.start).map(|p| p.kind);
        let mv = Move::new(e.start, e.end);
        let effects = apply_move(&mut self.board, mv, &self.turns);

        self.pending_promotion = effects.and_then(|fx| fx.promoted).map(|_| e.end);
        if let (Some(kind), Some(turn)) = (kind, self.turns.last_mut()) {
            turn.played = Some(PlayedMove {
                start: e.start,
                end: e.end,
                kind,
            });
        }
    }

    fn on_promoted(&mut self, e: &PawnPromoted) {
        if let Some(id) = self.board.piece_at(e.square).map(|p| p.id) {
            self.board.replace(id, e.kind);
        }
        self.pending_promotion = None;
    }
}

/// Replays `events` from an empty state.
pub fn project<'a, I>(events: I) -> Projection
where
    I: IntoIterator<Item = &'a DomainEvent>,
{
    events.into_iter().fold(Projection::default(), |mut state, event| {
        state.apply(event);
        state
    })
}
