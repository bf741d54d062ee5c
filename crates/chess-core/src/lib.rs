//! Core types for chess.
//!
//! This crate provides the value types shared by the rules engine and the
//! match aggregate:
//! - [`PieceKind`], [`Movement`] and [`Color`] for piece representation
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Move`] for a start/end square pair
//! - FEN piece-placement parsing and serialization

mod color;
pub mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{FenError, Placed};
pub use mov::Move;
pub use piece::{Movement, PieceKind};
pub use square::{File, Rank, Square};
