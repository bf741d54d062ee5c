//! Property tests for board analysis.

use chess_core::{Color, PieceKind, Square};
use chess_engine::analysis::{is_check, is_checkmate, is_stalemate, pieces_that_can_reach};
use chess_engine::Board;
use proptest::prelude::*;
use std::collections::HashSet;

type Placement = (Square, PieceKind, Color);

fn to_square(index: u8) -> Square {
    Square::from_indices(index % 8, (index / 8) % 8).unwrap()
}

/// Two kings plus up to a dozen other pieces on distinct squares.
fn placements() -> impl Strategy<Value = Vec<Placement>> {
    (
        0u8..64,
        0u8..64,
        prop::collection::vec((0u8..64, 0usize..5, any::<bool>()), 0..12),
    )
        .prop_filter("kings on distinct squares", |(wk, bk, _)| wk != bk)
        .prop_map(|(wk, bk, others)| {
            let mut seen = HashSet::new();
            let kings = [
                (to_square(wk), PieceKind::King, Color::White),
                (to_square(bk), PieceKind::King, Color::Black),
            ];
            let rest = others.into_iter().map(|(idx, kind, white)| {
                let color = if white { Color::White } else { Color::Black };
                (to_square(idx), PieceKind::ALL[kind], color)
            });
            kings
                .into_iter()
                .chain(rest)
                .filter(|(sq, _, _)| seen.insert(*sq))
                .collect()
        })
}

fn build(placements: &[Placement]) -> Board {
    let mut board = Board::new();
    for &(square, kind, color) in placements {
        board.place(kind, color, square);
    }
    board
}

proptest! {
    #[test]
    fn check_does_not_depend_on_enumeration_order(
        (original, shuffled) in placements().prop_flat_map(|p| (Just(p.clone()), Just(p).prop_shuffle()))
    ) {
        let a = build(&original);
        let b = build(&shuffled);
        for color in Color::ALL {
            let king_a = a.king(color).unwrap();
            let king_b = b.king(color).unwrap();
            prop_assert_eq!(is_check(king_a, &a), is_check(king_b, &b));
            prop_assert_eq!(is_checkmate(king_a, &a), is_checkmate(king_b, &b));
            prop_assert_eq!(is_stalemate(color, &a), is_stalemate(color, &b));

            let mut reach_a: Vec<Square> = pieces_that_can_reach(&a, king_a.square, color.opposite())
                .into_iter()
                .map(|p| p.square)
                .collect();
            let mut reach_b: Vec<Square> = pieces_that_can_reach(&b, king_b.square, color.opposite())
                .into_iter()
                .map(|p| p.square)
                .collect();
            reach_a.sort();
            reach_b.sort();
            prop_assert_eq!(reach_a, reach_b);
        }
    }

    #[test]
    fn checkmate_implies_check(placed in placements()) {
        let board = build(&placed);
        for color in Color::ALL {
            let king = board.king(color).unwrap();
            if is_checkmate(king, &board) {
                prop_assert!(is_check(king, &board));
            }
        }
    }
}
