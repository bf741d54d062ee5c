//! Turn history.

use chess_core::{Color, Move, PieceKind, Square};
use chrono::{DateTime, Utc};

/// A completed move as recorded in the turn history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayedMove {
    pub start: Square,
    pub end: Square,
    pub kind: PieceKind,
}

impl PlayedMove {
    /// Returns the move as a start/end pair.
    pub fn as_move(&self) -> Move {
        Move::new(self.start, self.end)
    }
}

/// One ply: who is to move, since when, and what they played once done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub player: Color,
    pub started_at: DateTime<Utc>,
    pub played: Option<PlayedMove>,
}

impl Turn {
    /// Opens a turn for `player`.
    pub fn open(player: Color, started_at: DateTime<Utc>) -> Self {
        Turn {
            player,
            started_at,
            played: None,
        }
    }

    /// Returns true once a move has been recorded.
    pub fn is_complete(&self) -> bool {
        self.played.is_some()
    }
}

/// Returns the most recent completed move and the color that played it.
pub fn last_played(turns: &[Turn]) -> Option<(Color, PlayedMove)> {
    turns
        .iter()
        .rev()
        .find_map(|t| t.played.map(|played| (t.player, played)))
}

/// Returns true if `color` ever moved a piece away from `square`.
///
/// Used to tell whether a king or rook has left its home square.
pub fn has_moved_from(turns: &[Turn], color: Color, square: Square) -> bool {
    turns
        .iter()
        .filter(|t| t.player == color)
        .filter_map(|t| t.played)
        .any(|played| played.start == square)
}

/// Returns true if `color` ever moved a piece away from or onto `square`.
///
/// A rook standing on its home square may still have moved: the original
/// could have been captured there and replaced by another rook.
pub fn has_touched(turns: &[Turn], color: Color, square: Square) -> bool {
    turns
        .iter()
        .filter(|t| t.player == color)
        .filter_map(|t| t.played)
        .any(|played| played.start == square || played.end == square)
}
