//! Piece kinds and their movement capabilities.

use crate::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The six kinds of chess pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    /// All piece kinds in order.
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Kinds a pawn may be promoted to.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    /// Returns the FEN character for this piece with the given color.
    pub const fn to_fen_char(self, color: Color) -> char {
        let c = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parses a FEN character into a piece kind and color.
    pub const fn from_fen_char(c: char) -> Option<(PieceKind, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some((kind, color))
    }

    /// Returns how this kind of piece moves.
    pub const fn movement(self) -> Movement {
        match self {
            PieceKind::King | PieceKind::Queen => Movement::DIAGONAL.with(Movement::STRAIGHT),
            PieceKind::Rook => Movement::STRAIGHT,
            PieceKind::Bishop => Movement::DIAGONAL,
            PieceKind::Knight => Movement::LEAP,
            PieceKind::Pawn => Movement::PAWN_FORWARD,
        }
    }

    /// Returns true if this piece slides along lines (bishop, rook, or queen).
    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }

    /// Returns true if a pawn may be promoted to this kind.
    #[inline]
    pub const fn is_promotion_target(self) -> bool {
        matches!(
            self,
            PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop | PieceKind::Knight
        )
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Rook => "Rook",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for PieceKind {
    type Err = String;

    /// Accepts full names ("knight") or FEN letters ("n"), case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "p" | "pawn" => Ok(PieceKind::Pawn),
            "n" | "knight" => Ok(PieceKind::Knight),
            "b" | "bishop" => Ok(PieceKind::Bishop),
            "r" | "rook" => Ok(PieceKind::Rook),
            "q" | "queen" => Ok(PieceKind::Queen),
            "k" | "king" => Ok(PieceKind::King),
            _ => Err(format!("unknown piece kind: {}", s)),
        }
    }
}

/// Set of movement capabilities a piece has.
///
/// Kings and queens move diagonally and straight, knights leap, pawns use
/// their own forward/capture geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Movement(u8);

impl Movement {
    pub const DIAGONAL: Movement = Movement(0b0001);
    pub const STRAIGHT: Movement = Movement(0b0010);
    pub const LEAP: Movement = Movement(0b0100);
    pub const PAWN_FORWARD: Movement = Movement(0b1000);

    /// Returns the union of both capability sets.
    #[inline]
    pub const fn with(self, other: Movement) -> Movement {
        Movement(self.0 | other.0)
    }

    /// Returns true if every capability in `other` is present.
    #[inline]
    pub const fn contains(self, other: Movement) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if the piece ignores intervening pieces.
    #[inline]
    pub const fn ignores_obstruction(self) -> bool {
        self.contains(Movement::LEAP)
    }
}
