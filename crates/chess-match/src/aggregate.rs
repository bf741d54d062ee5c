//! The match aggregate.
//!
//! A [`Match`] owns the ordered list of events that make up one game. Every
//! command validates against the current projection and, when accepted,
//! raises exactly one event. Rejected commands leave the match untouched.

use crate::error::MatchError;
use crate::events::{
    DomainEvent, EndReason, MatchEnded, MatchResult, MatchStarted, PawnPromoted, TurnTaken,
};
use crate::ids::{MatchId, MemberId};
use crate::projection::{MatchStatus, Player, Projection};
use chess_core::{Color, Move, PieceKind, Square};
use chess_engine::analysis::{is_check, is_checkmate, is_stalemate};
use chess_engine::{simulate, Board, MoveContext, RulePipeline, Violation};
use chrono::Utc;
use rand::Rng;

/// What became of a proposed move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The move was played and the opponent is to move.
    Moved {
        /// The opponent's king is attacked.
        check: bool,
        /// A pawn reached its last rank on this square and became a queen.
        promotion: Option<Square>,
    },
    /// The move mated the opponent; the match is over.
    Checkmate { winner: Color },
    /// The opponent has no move left; the match is drawn.
    Stalemate,
    /// The move broke a rule. Nothing was recorded.
    Rejected(Vec<Violation>),
}

impl TurnOutcome {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, TurnOutcome::Rejected(_))
    }

    pub fn ends_match(&self) -> bool {
        matches!(self, TurnOutcome::Checkmate { .. } | TurnOutcome::Stalemate)
    }

    pub fn violations(&self) -> &[Violation] {
        match self {
            TurnOutcome::Rejected(v) => v,
            _ => &[],
        }
    }
}

/// An event-sourced chess match.
#[derive(Debug, Clone)]
pub struct Match {
    id: MatchId,
    version: u64,
    original_version: u64,
    events: Vec<DomainEvent>,
    state: Projection,
}

impl Match {
    /// An empty match with no history.
    pub fn new(id: MatchId) -> Self {
        Match {
            id,
            version: 0,
            original_version: 0,
            events: Vec::new(),
            state: Projection::default(),
        }
    }

    /// Rebuilds a match from its stored history.
    ///
    /// The replayed events count as committed.
    pub fn from_events(id: MatchId, events: Vec<DomainEvent>) -> Self {
        let mut m = Match::new(id);
        for event in events {
            m.raise(event);
        }
        m.mark_committed();
        m
    }

    pub fn id(&self) -> MatchId {
        self.id
    }

    /// Number of events applied.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Version the match had when it was loaded or last saved.
    pub fn original_version(&self) -> u64 {
        self.original_version
    }

    pub fn events(&self) -> &[DomainEvent] {
        &self.events
    }

    /// Events raised since the match was loaded or last saved.
    pub fn uncommitted_events(&self) -> &[DomainEvent] {
        let committed = usize::try_from(self.original_version).unwrap_or(self.events.len());
        &self.events[committed.min(self.events.len())..]
    }

    pub fn mark_committed(&mut self) {
        self.original_version = self.version;
    }

    pub fn state(&self) -> &Projection {
        &self.state
    }

    pub fn status(&self) -> MatchStatus {
        self.state.status()
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    pub fn result(&self) -> Option<MatchResult> {
        self.state.result()
    }

    pub fn color_to_move(&self) -> Option<Color> {
        self.state.color_to_move()
    }

    pub fn player_to_move(&self) -> Option<&Player> {
        self.state.player_to_move()
    }

    /// Starts the match, assigning colors at random.
    pub fn start(&mut self, first: MemberId, second: MemberId) -> Result<(), MatchError> {
        self.start_with(first, second, &mut rand::thread_rng())
    }

    /// Starts the match, drawing colors from `rng`.
    ///
    /// # Errors
    ///
    /// [`MatchError::InvalidOperation`] if the match has already started,
    /// [`MatchError::InvalidCommand`] for empty or identical member ids.
    pub fn start_with<R: Rng + ?Sized>(
        &mut self,
        first: MemberId,
        second: MemberId,
        rng: &mut R,
    ) -> Result<(), MatchError> {
        match self.status() {
            MatchStatus::NotStarted => {}
            MatchStatus::InProgress => {
                return Err(MatchError::InvalidOperation("match already started".to_string()))
            }
            MatchStatus::Ended(_) => return Err(already_ended()),
        }
        if first.is_nil() || second.is_nil() {
            return Err(MatchError::InvalidCommand(
                "member ids must not be empty".to_string(),
            ));
        }
        if first == second {
            return Err(MatchError::InvalidCommand(
                "a member cannot play against themselves".to_string(),
            ));
        }

        let (white, black) = if rng.gen_bool(0.5) {
            (first, second)
        } else {
            (second, first)
        };
        self.raise(DomainEvent::MatchStarted(MatchStarted {
            white_member_id: white,
            black_member_id: black,
            started_at: Utc::now(),
        }));
        tracing::info!("Match {} started: {} (white) vs {} (black)", self.id, white, black);
        Ok(())
    }

    /// Proposes a move for `member`.
    ///
    /// Rule violations come back as [`TurnOutcome::Rejected`]; an accepted
    /// move raises a single event. A move that mates or stalemates the
    /// opponent ends the match instead of recording a regular turn.
    ///
    /// # Errors
    ///
    /// [`MatchError::InvalidOperation`] unless the match is in progress,
    /// [`MatchError::InvalidCommand`] if `member` is not seated here or it
    /// is not their turn.
    pub fn take_turn(
        &mut self,
        member: MemberId,
        start: Square,
        end: Square,
    ) -> Result<TurnOutcome, MatchError> {
        self.ensure_in_progress()?;
        let color = self.seat_of(member)?;
        if self.color_to_move() != Some(color) {
            return Err(MatchError::InvalidCommand(format!("it is not {}'s turn", color)));
        }

        let mv = Move::new(start, end);
        let ctx = MoveContext::new(color, mv, &self.state.board, &self.state.turns);
        if let Err(violations) = RulePipeline::standard().validate(&ctx) {
            tracing::debug!("Match {}: {} rejected: {:?}", self.id, mv, violations);
            return Ok(TurnOutcome::Rejected(violations));
        }

        let after = simulate(&self.state.board, mv, &self.state.turns);
        let turn = TurnTaken {
            member_id: member,
            start,
            end,
            taken_at: Utc::now(),
        };
        let opponent = color.opposite();
        let (check, mate) = match after.king(opponent) {
            Some(king) => (is_check(king, &after), is_checkmate(king, &after)),
            None => (false, false),
        };

        if mate {
            self.end(MatchResult::win_for(color), EndReason::Checkmate, Some(turn));
            return Ok(TurnOutcome::Checkmate { winner: color });
        }
        if !check && is_stalemate(opponent, &after) {
            self.end(MatchResult::Draw, EndReason::Stalemate, Some(turn));
            return Ok(TurnOutcome::Stalemate);
        }

        self.raise(DomainEvent::TurnTaken(turn));
        tracing::debug!("Match {}: {} played {}", self.id, color, mv);
        Ok(TurnOutcome::Moved {
            check,
            promotion: self.state.pending_promotion,
        })
    }

    /// `member` gives up; the opponent wins.
    pub fn resign(&mut self, member: MemberId) -> Result<(), MatchError> {
        self.ensure_in_progress()?;
        let color = self.seat_of(member)?;
        self.end(MatchResult::win_for(color.opposite()), EndReason::Resignation, None);
        Ok(())
    }

    /// `member` ran out of time; the opponent wins.
    ///
    /// Turn order is not checked: the caller decides whose time ran out.
    pub fn forfeit(&mut self, member: MemberId) -> Result<(), MatchError> {
        self.ensure_in_progress()?;
        let color = self.seat_of(member)?;
        self.end(MatchResult::win_for(color.opposite()), EndReason::TimeForfeit, None);
        Ok(())
    }

    /// Settles a draw offer. A declined offer changes nothing.
    pub fn draw(&mut self, accepted: bool) -> Result<(), MatchError> {
        self.ensure_in_progress()?;
        if accepted {
            self.end(MatchResult::Draw, EndReason::Agreement, None);
        }
        Ok(())
    }

    /// Exchanges the pawn that just reached `square` for `kind`.
    ///
    /// Pawns become queens automatically when they arrive; this lets the
    /// player pick a different piece before the opponent moves.
    ///
    /// # Errors
    ///
    /// [`MatchError::InvalidCommand`] if `kind` is not a promotion piece or
    /// no pawn is waiting on `square`.
    pub fn promote_piece(&mut self, square: Square, kind: PieceKind) -> Result<(), MatchError> {
        self.ensure_in_progress()?;
        if !kind.is_promotion_target() {
            return Err(MatchError::InvalidCommand(format!("cannot promote to {}", kind)));
        }
        if self.state.pending_promotion != Some(square) {
            return Err(MatchError::InvalidCommand(format!(
                "no pawn awaiting promotion on {}",
                square
            )));
        }
        self.raise(DomainEvent::PawnPromoted(PawnPromoted {
            square,
            kind,
            promoted_at: Utc::now(),
        }));
        Ok(())
    }

    fn end(&mut self, result: MatchResult, reason: EndReason, final_move: Option<TurnTaken>) {
        self.raise(DomainEvent::MatchEnded(MatchEnded {
            result,
            reason: Some(reason),
            final_move,
            ended_at: Utc::now(),
        }));
        tracing::info!("Match {} ended: {} ({:?})", self.id, result, reason);
    }

    fn raise(&mut self, event: DomainEvent) {
        self.state.apply(&event);
        self.events.push(event);
        self.version += 1;
    }

    fn ensure_in_progress(&self) -> Result<(), MatchError> {
        match self.status() {
            MatchStatus::InProgress => Ok(()),
            MatchStatus::NotStarted => {
                Err(MatchError::InvalidOperation("match not started".to_string()))
            }
            MatchStatus::Ended(_) => Err(already_ended()),
        }
    }

    fn seat_of(&self, member: MemberId) -> Result<Color, MatchError> {
        if member.is_nil() {
            return Err(MatchError::InvalidCommand(
                "member id must not be empty".to_string(),
            ));
        }
        self.state.color_of(member).ok_or_else(|| {
            MatchError::InvalidCommand(format!("member {} is not playing in this match", member))
        })
    }
}

fn already_ended() -> MatchError {
    MatchError::InvalidOperation("match already ended".to_string())
}
