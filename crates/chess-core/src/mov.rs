//! Move representation.

use crate::Square;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A proposed or completed move: the square a piece leaves and the square
/// it lands on.
///
/// Special moves (castling, en passant, promotion) are not flagged here;
/// they are recognised from the board and the turn history.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub start: Square,
    pub end: Square,
}

impl Move {
    /// Creates a new move.
    #[inline]
    pub const fn new(start: Square, end: Square) -> Self {
        Move { start, end }
    }

    /// Returns true if the piece would not leave its square.
    #[inline]
    pub fn is_null(self) -> bool {
        self.start == self.end
    }

    /// Returns coordinate notation for this move (e.g., "e2e4").
    pub fn to_coordinate(self) -> String {
        format!("{}{}", self.start, self.end)
    }

    /// Parses coordinate notation ("e2e4").
    pub fn from_coordinate(s: &str) -> Option<Self> {
        if s.len() != 4 || !s.is_ascii() {
            return None;
        }
        let start = Square::from_algebraic(&s[0..2])?;
        let end = Square::from_algebraic(&s[2..4])?;
        Some(Move::new(start, end))
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self.to_coordinate())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_coordinate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{File, Rank};

    #[test]
    fn move_coordinate() {
        let e2 = Square::new(File::E, Rank::R2);
        let e4 = Square::new(File::E, Rank::R4);
        let m = Move::new(e2, e4);
        assert_eq!(m.to_coordinate(), "e2e4");
        assert_eq!(Move::from_coordinate("e2e4"), Some(m));
    }

    #[test]
    fn move_from_coordinate_rejects_garbage() {
        assert!(Move::from_coordinate("e2").is_none());
        assert!(Move::from_coordinate("e2e9").is_none());
        assert!(Move::from_coordinate("e2e4q").is_none());
        assert!(Move::from_coordinate("invalid").is_none());
        assert!(Move::from_coordinate("é2e4").is_none());
    }

    #[test]
    fn null_move() {
        assert!(Move::new(Square::E1, Square::E1).is_null());
        assert!(!Move::new(Square::E1, Square::E8).is_null());
    }

    #[test]
    fn move_debug_display() {
        let m = Move::new(Square::E1, Square::G1);
        assert_eq!(format!("{:?}", m), "Move(e1g1)");
        assert_eq!(format!("{}", m), "e1g1");
    }
}
