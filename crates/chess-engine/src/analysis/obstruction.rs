//! Line-of-sight checks.

use crate::board::Board;
use chess_core::{PieceKind, Square};

/// Squares strictly between `start` and `end` when both lie on a common
/// rank, file or diagonal. Empty for any other geometry.
pub fn squares_between(start: Square, end: Square) -> Vec<Square> {
    let (df, dr) = start.delta(end);
    let aligned = df == 0 || dr == 0 || df.abs() == dr.abs();
    if !aligned || (df == 0 && dr == 0) {
        return Vec::new();
    }
    let step = (df.signum(), dr.signum());
    let distance = df.abs().max(dr.abs());
    (1..distance)
        .filter_map(|i| start.offset(step.0 * i, step.1 * i))
        .collect()
}

/// Returns true if no piece stands strictly between `start` and `end`.
pub fn path_is_clear(board: &Board, start: Square, end: Square) -> bool {
    squares_between(start, end)
        .into_iter()
        .all(|sq| !board.is_occupied(sq))
}

/// Returns true if the piece on `start` cannot travel to `end` because
/// something is in the way.
///
/// Pawns are only obstructed on their two-square advance. Knights are
/// never obstructed. Sliding pieces and kings scan the intervening squares
/// along the straight or diagonal direction of the move.
pub fn direction_is_obstructed(board: &Board, start: Square, end: Square) -> bool {
    let Some(piece) = board.piece_at(start) else {
        return false;
    };
    match piece.kind {
        PieceKind::Knight => false,
        PieceKind::Pawn => {
            let (df, dr) = start.delta(end);
            df == 0 && dr.abs() == 2 && !path_is_clear(board, start, end)
        }
        _ => !path_is_clear(board, start, end),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn between_on_lines() {
        assert_eq!(squares_between(Square::A1, Square::D1), vec![sq("b1"), sq("c1")]);
        assert_eq!(
            squares_between(Square::H8, sq("e5")),
            vec![sq("g7"), sq("f6")]
        );
        assert_eq!(squares_between(sq("e2"), sq("e4")), vec![sq("e3")]);
        assert!(squares_between(Square::E1, Square::F1).is_empty());
    }

    #[test]
    fn between_off_line_is_empty() {
        assert!(squares_between(sq("b1"), sq("c3")).is_empty());
        assert!(squares_between(Square::E1, Square::E1).is_empty());
    }

    #[test]
    fn sliding_piece_obstructed() {
        let board = Board::from_fen("8/8/8/8/8/8/8/R1n5").unwrap();
        assert!(direction_is_obstructed(&board, Square::A1, Square::D1));
        assert!(!direction_is_obstructed(&board, Square::A1, Square::C1));
    }

    #[test]
    fn knight_never_obstructed() {
        let board = Board::from_fen("8/8/8/8/8/8/PPP5/1N6").unwrap();
        assert!(!direction_is_obstructed(&board, sq("b1"), sq("c3")));
    }

    #[test]
    fn pawn_double_advance_obstructed() {
        let board = Board::from_fen("8/8/8/8/8/4n3/4P3/8").unwrap();
        assert!(direction_is_obstructed(&board, sq("e2"), sq("e4")));
        assert!(!direction_is_obstructed(&board, sq("e2"), sq("d3")));
    }

    #[test]
    fn empty_start_is_not_obstructed() {
        let board = Board::new();
        assert!(!direction_is_obstructed(&board, Square::A1, Square::H8));
    }
}
