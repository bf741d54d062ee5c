//! Chess rule validation over an arena of pieces.
//!
//! This crate provides:
//! - [`Board`] - pieces keyed by stable [`PieceId`], with a derived square index
//! - [`Turn`] - the ply-by-ply history that special moves depend on
//! - [`analysis`] - attack ranges, obstruction, check, checkmate and stalemate
//! - [`special`] - castling, en passant and promotion detection
//! - [`RulePipeline`] - the ordered legality checks a proposed move must pass
//! - [`apply_move`] - playing an accepted move, special effects included
//!
//! Everything here is pure and synchronous.
//!
//! # Example
//!
//! ```
//! use chess_core::{Color, Move};
//! use chess_engine::{Board, MoveContext, RulePipeline};
//!
//! let board = Board::standard();
//! let pipeline = RulePipeline::standard();
//!
//! let push = Move::from_coordinate("e2e4").unwrap();
//! assert!(pipeline.validate(&MoveContext::new(Color::White, push, &board, &[])).is_ok());
//!
//! let leap = Move::from_coordinate("e2e5").unwrap();
//! let violations = pipeline
//!     .validate(&MoveContext::new(Color::White, leap, &board, &[]))
//!     .unwrap_err();
//! assert_eq!(violations[0].message, "Piece must move to designated squares.");
//! ```

pub mod analysis;
mod board;
mod history;
mod moves;
pub mod rules;
pub mod special;

pub use board::{Board, Piece, PieceId};
pub use history::{has_moved_from, has_touched, last_played, PlayedMove, Turn};
pub use moves::{apply_move, simulate, MoveEffects};
pub use rules::{MoveContext, Rule, RuleKind, RulePipeline, Violation};
pub use special::CastlingSide;
