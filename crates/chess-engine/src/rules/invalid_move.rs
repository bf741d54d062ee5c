use super::{MoveContext, Rule, RuleKind, Violation};
use crate::analysis::attack_range;
use crate::special::{castling_side, is_en_passant};
use chess_core::PieceKind;

/// The moving piece must exist, belong to the mover, and land inside its
/// geometric range. Pawns capture diagonally onto enemies (or en passant)
/// and advance straight onto empty squares.
#[derive(Debug, Clone, Copy, Default)]
pub struct PieceInvalidMove;

impl Rule for PieceInvalidMove {
    fn kind(&self) -> RuleKind {
        RuleKind::PieceInvalidMove
    }

    fn check(&self, ctx: &MoveContext<'_>) -> Vec<Violation> {
        let Some(piece) = ctx.mover() else {
            return self.violation(format!("There is no piece on {}.", ctx.mv.start));
        };
        if piece.color != ctx.color {
            return self.violation("Piece must belong to the player to move.");
        }
        if ctx.mv.is_null() {
            return self.violation("Piece must move to designated squares.");
        }
        if castling_side(ctx.mv.start, ctx.mv.end, ctx.board).is_some() {
            // Eligibility is judged by CastlingNotAllowed.
            return Vec::new();
        }
        if !attack_range(piece).contains(&ctx.mv.end) {
            return self.violation("Piece must move to designated squares.");
        }

        if piece.kind == PieceKind::Pawn {
            let (file_delta, _) = ctx.mv.start.delta(ctx.mv.end);
            let occupied = ctx.board.is_occupied(ctx.mv.end);
            if file_delta != 0 {
                if !occupied && !is_en_passant(piece, ctx.mv.end, ctx.turns) {
                    return self.violation("A pawn must attack a filled square.");
                }
            } else if occupied {
                return self.violation("Piece must move to designated squares.");
            }
        }

        Vec::new()
    }
}
