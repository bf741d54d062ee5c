//! Stalemate detection.

use super::attacks::{attack_range, can_move_to};
use super::check::king_can_escape;
use crate::board::Board;
use chess_core::{Color, PieceKind};

/// Returns true if `color` has no move for any piece.
///
/// The king needs a neighbouring square that is free of its own pieces and
/// not attacked. Every other piece counts as stuck when its whole range is
/// obstructed; pawn diagonals only count when an enemy stands there.
///
/// Moves of non-king pieces are not checked for exposing the king, so a
/// side whose only moves are pinned pieces is not reported as stalemated.
pub fn is_stalemate(color: Color, board: &Board) -> bool {
    if let Some(king) = board.king(color) {
        if king_can_escape(king, board) {
            return false;
        }
    }
    board
        .pieces_of(color)
        .filter(|p| p.kind != PieceKind::King)
        .all(|piece| {
            attack_range(piece)
                .into_iter()
                .all(|target| !can_move_to(piece, target, board))
        })
}
