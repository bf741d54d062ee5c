//! Move legality rules.
//!
//! A proposed move is checked by a fixed, ordered [`RulePipeline`]. Each
//! [`Rule`] is independent and reports violations as data. The pipeline stops
//! at the first rule that reports anything, because later rules rely on what
//! earlier ones established (for example, that a piece stands on the start
//! square).

mod blocked;
mod castling;
mod invalid_move;
mod king_in_check;
mod own_color;

pub use blocked::PieceIsBlocked;
pub use castling::CastlingNotAllowed;
pub use invalid_move::PieceInvalidMove;
pub use king_in_check::KingIsInCheck;
pub use own_color::PieceCannotAttackOwnColor;

use crate::board::{Board, Piece};
use crate::history::Turn;
use chess_core::{Color, Move};
use std::fmt;

/// Identifies which rule a violation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    PieceInvalidMove,
    PieceCannotAttackOwnColor,
    PieceIsBlocked,
    CastlingNotAllowed,
    KingIsInCheck,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleKind::PieceInvalidMove => "PieceInvalidMove",
            RuleKind::PieceCannotAttackOwnColor => "PieceCannotAttackOwnColor",
            RuleKind::PieceIsBlocked => "PieceIsBlocked",
            RuleKind::CastlingNotAllowed => "CastlingNotAllowed",
            RuleKind::KingIsInCheck => "KingIsInCheck",
        };
        write!(f, "{}", name)
    }
}

/// A broken rule, with a message fit to show the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub rule: RuleKind,
    pub message: String,
}

impl Violation {
    pub fn new(rule: RuleKind, message: impl Into<String>) -> Self {
        Violation {
            rule,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.rule, self.message)
    }
}

/// Everything a rule may look at: who moves, what they propose, the current
/// board and the turn history.
#[derive(Debug, Clone, Copy)]
pub struct MoveContext<'a> {
    pub color: Color,
    pub mv: Move,
    pub board: &'a Board,
    pub turns: &'a [Turn],
}

impl<'a> MoveContext<'a> {
    pub fn new(color: Color, mv: Move, board: &'a Board, turns: &'a [Turn]) -> Self {
        MoveContext {
            color,
            mv,
            board,
            turns,
        }
    }

    /// The piece on the start square.
    pub fn mover(&self) -> Option<&'a Piece> {
        self.board.piece_at(self.mv.start)
    }
}

/// A single legality check.
pub trait Rule: Send + Sync {
    /// Which rule this is.
    fn kind(&self) -> RuleKind;

    /// Returns the violations this move commits against the rule; empty if
    /// the rule is satisfied.
    fn check(&self, ctx: &MoveContext<'_>) -> Vec<Violation>;

    /// Convenience for rules that report at most one violation.
    fn violation(&self, message: impl Into<String>) -> Vec<Violation>
    where
        Self: Sized,
    {
        vec![Violation::new(self.kind(), message)]
    }
}

/// An ordered chain of rules, evaluated until the first one fails.
pub struct RulePipeline {
    rules: Vec<Box<dyn Rule>>,
}

impl RulePipeline {
    /// Creates a pipeline from rules in evaluation order.
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        RulePipeline { rules }
    }

    /// The standard chess rules in their canonical order.
    pub fn standard() -> Self {
        RulePipeline::new(vec![
            Box::new(PieceInvalidMove),
            Box::new(PieceCannotAttackOwnColor),
            Box::new(PieceIsBlocked),
            Box::new(CastlingNotAllowed),
            Box::new(KingIsInCheck),
        ])
    }

    /// Rule kinds in evaluation order.
    pub fn kinds(&self) -> Vec<RuleKind> {
        self.rules.iter().map(|r| r.kind()).collect()
    }

    /// Runs the rules in order. Returns the violations of the first rule
    /// that reports any.
    pub fn validate(&self, ctx: &MoveContext<'_>) -> Result<(), Vec<Violation>> {
        self.rules.iter().try_for_each(|rule| {
            let violations = rule.check(ctx);
            if violations.is_empty() {
                Ok(())
            } else {
                Err(violations)
            }
        })
    }
}

impl Default for RulePipeline {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for RulePipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RulePipeline")
            .field("rules", &self.kinds())
            .finish()
    }
}
