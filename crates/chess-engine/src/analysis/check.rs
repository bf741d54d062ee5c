//! Check and checkmate detection.

use super::attacks::{attack_range, can_move_to, is_attacked_by, pieces_that_can_reach};
use super::obstruction::squares_between;
use crate::board::{Board, Piece};
use chess_core::{PieceKind, Square};

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// Returns true if no attack can possibly land on the king's square: every
/// neighbouring square holds one of its own pieces and no enemy knight is a
/// jump away.
pub fn is_unreachable(king: &Piece, board: &Board) -> bool {
    let walled_in = attack_range(king).into_iter().all(|sq| {
        board
            .piece_at(sq)
            .is_some_and(|p| p.color == king.color)
    });
    if !walled_in {
        return false;
    }
    !KNIGHT_JUMPS.iter().any(|&(df, dr)| {
        king.square
            .offset(df, dr)
            .and_then(|sq| board.piece_at(sq))
            .is_some_and(|p| p.kind == PieceKind::Knight && p.color != king.color)
    })
}

/// Returns true if any opposing piece attacks the king.
pub fn is_check(king: &Piece, board: &Board) -> bool {
    !is_unreachable(king, board) && is_attacked_by(board, king.square, king.color.opposite())
}

/// Returns true if the king is in check and nothing can save it.
///
/// The king first tries to step (or capture) out of check. Two attackers at
/// once cannot both be answered by another piece. A single attacker may be
/// captured, or, when it slides, blocked on an intervening square. Adjacent
/// and knight attacks cannot be blocked.
pub fn is_checkmate(king: &Piece, board: &Board) -> bool {
    if !is_check(king, board) || king_can_escape(king, board) {
        return false;
    }

    let attackers = pieces_that_can_reach(board, king.square, king.color.opposite());
    let attacker = match attackers.as_slice() {
        [single] => **single,
        [] => return false,
        _ => return true,
    };

    if defender_can_occupy(king, board, attacker.square) {
        return false;
    }
    if attacker.kind.is_slider() {
        let line = squares_between(attacker.square, king.square);
        if line
            .into_iter()
            .any(|sq| defender_can_occupy(king, board, sq))
        {
            return false;
        }
    }
    true
}

/// Returns true if the king has a square to step to where it is not in
/// check, capturing there if an enemy stands on it.
pub fn king_can_escape(king: &Piece, board: &Board) -> bool {
    attack_range(king).into_iter().any(|target| {
        if !can_move_to(king, target, board) {
            return false;
        }
        let mut after = board.clone();
        after.relocate(king.id, target);
        after
            .get(king.id)
            .is_some_and(|moved| !is_attacked_by(&after, moved.square, moved.color.opposite()))
    })
}

/// Returns true if a piece other than the king can move to `target` without
/// leaving its king attacked.
fn defender_can_occupy(king: &Piece, board: &Board, target: Square) -> bool {
    board
        .pieces_of(king.color)
        .filter(|p| p.kind != PieceKind::King)
        .filter(|p| can_move_to(p, target, board))
        .any(|defender| {
            let mut after = board.clone();
            after.relocate(defender.id, target);
            !is_attacked_by(&after, king.square, king.color.opposite())
        })
}
