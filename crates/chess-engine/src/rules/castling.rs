use super::{MoveContext, Rule, RuleKind, Violation};
use crate::analysis::{is_attacked_by, is_check};
use crate::history::{has_moved_from, has_touched};
use crate::special::{castling_side, CastlingSide};
use chess_core::PieceKind;

/// Castling requires an unmoved king and rook, an empty path between them,
/// a king not in check, and no attacked square under the king's feet on
/// the way. Only evaluated for moves with castling geometry.
#[derive(Debug, Clone, Copy, Default)]
pub struct CastlingNotAllowed;

impl Rule for CastlingNotAllowed {
    fn kind(&self) -> RuleKind {
        RuleKind::CastlingNotAllowed
    }

    fn check(&self, ctx: &MoveContext<'_>) -> Vec<Violation> {
        let Some(side) = castling_side(ctx.mv.start, ctx.mv.end, ctx.board) else {
            return Vec::new();
        };
        let Some(king) = ctx.mover() else {
            return Vec::new();
        };
        let color = king.color;

        if has_moved_from(ctx.turns, color, CastlingSide::king_start(color)) {
            return self.violation("The king has already moved.");
        }

        let rook_home = side.rook_start(color);
        let rook_ready = ctx
            .board
            .piece_at(rook_home)
            .is_some_and(|p| p.kind == PieceKind::Rook && p.color == color);
        if !rook_ready || has_touched(ctx.turns, color, rook_home) {
            return self.violation("The rook has already moved.");
        }

        if side.path(color).into_iter().any(|sq| ctx.board.is_occupied(sq)) {
            return self.violation("Castling path is blocked.");
        }

        if is_check(king, ctx.board) {
            return self.violation("Cannot castle out of check.");
        }

        let opponent = color.opposite();
        if side
            .king_transit(color)
            .into_iter()
            .any(|sq| is_attacked_by(ctx.board, sq, opponent))
        {
            return self.violation("Cannot castle through an attacked square.");
        }

        Vec::new()
    }
}
