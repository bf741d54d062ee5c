use super::{MoveContext, Rule, RuleKind, Violation};

/// A piece may only land on an empty square or one held by the opponent.
#[derive(Debug, Clone, Copy, Default)]
pub struct PieceCannotAttackOwnColor;

impl Rule for PieceCannotAttackOwnColor {
    fn kind(&self) -> RuleKind {
        RuleKind::PieceCannotAttackOwnColor
    }

    fn check(&self, ctx: &MoveContext<'_>) -> Vec<Violation> {
        let Some(mover) = ctx.mover() else {
            return Vec::new();
        };
        match ctx.board.piece_at(ctx.mv.end) {
            Some(target) if target.color == mover.color => {
                self.violation("A piece cannot attack its own color.")
            }
            _ => Vec::new(),
        }
    }
}
