use super::{MoveContext, Rule, RuleKind, Violation};
use crate::analysis::direction_is_obstructed;

/// Nothing may stand between the start and end squares of a sliding move
/// or a pawn's double advance. Knights leap.
#[derive(Debug, Clone, Copy, Default)]
pub struct PieceIsBlocked;

impl Rule for PieceIsBlocked {
    fn kind(&self) -> RuleKind {
        RuleKind::PieceIsBlocked
    }

    fn check(&self, ctx: &MoveContext<'_>) -> Vec<Violation> {
        if direction_is_obstructed(ctx.board, ctx.mv.start, ctx.mv.end) {
            self.violation(format!(
                "The path from {} to {} is blocked.",
                ctx.mv.start, ctx.mv.end
            ))
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use chess_core::{Color, Move};

    fn check(fen: &str, mv: &str) -> Vec<Violation> {
        let board = Board::from_fen(fen).unwrap();
        let ctx = MoveContext::new(Color::White, Move::from_coordinate(mv).unwrap(), &board, &[]);
        PieceIsBlocked.check(&ctx)
    }

    #[test]
    fn bishop_blocked() {
        let v = check("8/8/8/8/8/2p5/8/B7", "a1d4");
        assert_eq!(v[0].message, "The path from a1 to d4 is blocked.");
    }

    #[test]
    fn queen_clear() {
        assert!(check("8/8/8/8/8/8/8/Q7", "a1h8").is_empty());
    }

    #[test]
    fn knight_leaps() {
        assert!(check(chess_core::fen::STARTING_PLACEMENT, "g1f3").is_empty());
    }

    #[test]
    fn pawn_double_step_blocked() {
        assert_eq!(check("8/8/8/8/8/4p3/4P3/8", "e2e4").len(), 1);
        assert!(check("8/8/8/8/8/8/4P3/8", "e2e4").is_empty());
    }
}
