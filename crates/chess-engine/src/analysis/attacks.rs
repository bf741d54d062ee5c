//! Attack-range generation and reachability for every piece kind.

use super::obstruction::path_is_clear;
use crate::board::{Board, Piece};
use chess_core::{Movement, PieceKind, Square};

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const STRAIGHT_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

const DIAGONAL_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// Returns every square the piece could move to on an empty board.
///
/// Pawns include their single and double advances and both forward
/// diagonals; whether those are usable depends on occupancy.
pub fn attack_range(piece: &Piece) -> Vec<Square> {
    let from = piece.square;
    match piece.kind {
        PieceKind::Knight => offsets(from, &KNIGHT_OFFSETS),
        PieceKind::King => {
            let mut squares = offsets(from, &STRAIGHT_DIRECTIONS);
            squares.extend(offsets(from, &DIAGONAL_DIRECTIONS));
            squares
        }
        PieceKind::Pawn => {
            let dir = piece.color.pawn_direction();
            let mut squares = Vec::with_capacity(4);
            squares.extend(from.offset(0, dir));
            if from.rank() == piece.color.pawn_rank() {
                squares.extend(from.offset(0, 2 * dir));
            }
            squares.extend(pawn_captures(piece));
            squares
        }
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
            let movement = piece.movement();
            let mut squares = Vec::with_capacity(27);
            if movement.contains(Movement::STRAIGHT) {
                for dir in STRAIGHT_DIRECTIONS {
                    squares.extend(ray(from, dir));
                }
            }
            if movement.contains(Movement::DIAGONAL) {
                for dir in DIAGONAL_DIRECTIONS {
                    squares.extend(ray(from, dir));
                }
            }
            squares
        }
    }
}

/// The two forward diagonals a pawn captures on.
pub fn pawn_captures(pawn: &Piece) -> Vec<Square> {
    let dir = pawn.color.pawn_direction();
    [-1, 1]
        .into_iter()
        .filter_map(|df| pawn.square.offset(df, dir))
        .collect()
}

/// Returns true if `piece` attacks `target`: the square is in its range
/// and nothing stands in the way. Knights ignore intervening pieces.
/// Pawns only attack their forward diagonals, occupied or not.
pub fn threatens(piece: &Piece, target: Square, board: &Board) -> bool {
    if piece.square == target {
        return false;
    }
    if piece.kind == PieceKind::Pawn {
        return pawn_captures(piece).contains(&target);
    }
    if !attack_range(piece).contains(&target) {
        return false;
    }
    piece.movement().ignores_obstruction() || path_is_clear(board, piece.square, target)
}

/// Returns true if `piece` could move to `target` ignoring king safety:
/// in range, not onto its own color, path clear, and pawns capture
/// diagonally onto enemies and advance straight onto empty squares.
pub fn can_move_to(piece: &Piece, target: Square, board: &Board) -> bool {
    if piece.square == target || !attack_range(piece).contains(&target) {
        return false;
    }
    let occupant = board.piece_at(target);
    if occupant.is_some_and(|o| o.color == piece.color) {
        return false;
    }
    if piece.kind == PieceKind::Pawn {
        let (file_delta, _) = piece.square.delta(target);
        return if file_delta != 0 {
            occupant.is_some()
        } else {
            occupant.is_none() && path_is_clear(board, piece.square, target)
        };
    }
    piece.movement().ignores_obstruction() || path_is_clear(board, piece.square, target)
}

/// Pieces of `color` that attack `target`.
pub fn pieces_that_can_reach(board: &Board, target: Square, color: chess_core::Color) -> Vec<&Piece> {
    board
        .pieces_of(color)
        .filter(|p| threatens(p, target, board))
        .collect()
}

/// Returns true if any piece of `color` attacks `target`.
pub fn is_attacked_by(board: &Board, target: Square, color: chess_core::Color) -> bool {
    board.pieces_of(color).any(|p| threatens(p, target, board))
}

fn offsets(from: Square, deltas: &[(i8, i8)]) -> Vec<Square> {
    deltas
        .iter()
        .filter_map(|&(df, dr)| from.offset(df, dr))
        .collect()
}

fn ray(from: Square, (df, dr): (i8, i8)) -> impl Iterator<Item = Square> {
    (1..8).map_while(move |step| from.offset(df * step, dr * step))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Color;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).unwrap()
    }

    #[test]
    fn knight_range_in_corner() {
        let b = board("8/8/8/8/8/8/8/N7");
        let knight = b.piece_at(Square::A1).unwrap();
        let mut range = attack_range(knight);
        range.sort();
        assert_eq!(range, vec![sq("c2"), sq("b3")]);
    }

    #[test]
    fn rook_range_from_center() {
        let b = board("8/8/8/8/3R4/8/8/8");
        let rook = b.piece_at(sq("d4")).unwrap();
        let range = attack_range(rook);
        assert_eq!(range.len(), 14);
        assert!(range.contains(&sq("d8")));
        assert!(range.contains(&sq("a4")));
        assert!(!range.contains(&sq("e5")));
    }

    #[test]
    fn queen_range_from_center() {
        let b = board("8/8/8/8/3Q4/8/8/8");
        let queen = b.piece_at(sq("d4")).unwrap();
        assert_eq!(attack_range(queen).len(), 27);
    }

    #[test]
    fn king_range_on_edge() {
        let b = board("8/8/8/8/8/8/8/4K3");
        let king = b.piece_at(Square::E1).unwrap();
        assert_eq!(attack_range(king).len(), 5);
    }

    #[test]
    fn pawn_range_includes_double_step_from_home() {
        let b = board("8/8/8/8/8/8/4P3/8");
        let pawn = b.piece_at(sq("e2")).unwrap();
        let range = attack_range(pawn);
        assert!(range.contains(&sq("e3")));
        assert!(range.contains(&sq("e4")));
        assert!(range.contains(&sq("d3")));
        assert!(range.contains(&sq("f3")));
        assert_eq!(range.len(), 4);

        let b = board("8/8/8/8/4p3/8/8/8");
        let pawn = b.piece_at(sq("e4")).unwrap();
        let range = attack_range(pawn);
        assert_eq!(range.len(), 3);
        assert!(range.contains(&sq("e3")));
        assert!(!range.contains(&sq("e2")));
    }

    #[test]
    fn blocked_rook_does_not_threaten() {
        let b = board("4k3/8/8/8/4P3/8/8/4R3");
        let rook = b.piece_at(Square::E1).unwrap();
        assert!(!threatens(rook, Square::E8, &b));
        assert!(threatens(rook, sq("e4"), &b));
    }

    #[test]
    fn knight_jumps_over_pieces() {
        let b = board("8/8/8/8/8/PPP5/PNP5/PPP5");
        let knight = b.piece_at(sq("b2")).unwrap();
        assert!(threatens(knight, sq("d3"), &b));
        assert!(threatens(knight, sq("c4"), &b));
    }

    #[test]
    fn pawn_threatens_diagonals_only() {
        let b = board("8/8/8/8/8/8/4P3/8");
        let pawn = b.piece_at(sq("e2")).unwrap();
        assert!(threatens(pawn, sq("d3"), &b));
        assert!(threatens(pawn, sq("f3"), &b));
        assert!(!threatens(pawn, sq("e3"), &b));
    }

    #[test]
    fn pawn_moves_need_right_occupancy() {
        let b = board("8/8/8/8/8/3pp3/4P3/8");
        let pawn = b.piece_at(sq("e2")).unwrap();
        assert!(can_move_to(pawn, sq("d3"), &b));
        assert!(!can_move_to(pawn, sq("f3"), &b));
        assert!(!can_move_to(pawn, sq("e3"), &b));
        assert!(!can_move_to(pawn, sq("e4"), &b));
    }

    #[test]
    fn cannot_move_onto_own_piece() {
        let b = board("8/8/8/8/8/8/8/R2B4");
        let rook = b.piece_at(Square::A1).unwrap();
        assert!(!can_move_to(rook, Square::D1, &b));
        assert!(can_move_to(rook, Square::C1, &b));
    }

    #[test]
    fn reach_is_per_color() {
        let b = board("4k3/8/8/8/8/8/8/r3R3");
        let attackers = pieces_that_can_reach(&b, Square::E8, Color::White);
        assert_eq!(attackers.len(), 1);
        assert_eq!(attackers[0].kind, PieceKind::Rook);
        assert!(is_attacked_by(&b, Square::D1, Color::Black));
        assert!(!is_attacked_by(&b, Square::E8, Color::Black));
    }
}
