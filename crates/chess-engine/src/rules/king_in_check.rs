use super::{MoveContext, Rule, RuleKind, Violation};
use crate::analysis::is_check;
use crate::moves::simulate;

/// A move may not leave the mover's own king in check.
///
/// Runs last: it plays the move on a copy of the board, including en
/// passant and castling side effects, and inspects the result.
#[derive(Debug, Clone, Copy, Default)]
pub struct KingIsInCheck;

impl Rule for KingIsInCheck {
    fn kind(&self) -> RuleKind {
        RuleKind::KingIsInCheck
    }

    fn check(&self, ctx: &MoveContext<'_>) -> Vec<Violation> {
        let after = simulate(ctx.board, ctx.mv, ctx.turns);
        match after.king(ctx.color) {
            Some(king) if is_check(king, &after) => {
                self.violation("The king would be in check after this move.")
            }
            _ => Vec::new(),
        }
    }
}
