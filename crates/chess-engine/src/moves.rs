//! Applying an accepted move to a board.
//!
//! The same routine drives the "what if" board used by the king-safety rule
//! and the match projection, so a simulated move and a replayed move always
//! agree.

use crate::board::{Board, Piece, PieceId};
use crate::history::Turn;
use crate::special::{castling_side, is_en_passant, pawn_is_promoted, CastlingSide};
use chess_core::{Move, PieceKind};

/// What happened on the board besides the piece moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveEffects {
    /// The piece taken off the board, by occupation or en passant.
    pub captured: Option<Piece>,
    /// Set when the move was a castle; the rook has been moved too.
    pub castled: Option<CastlingSide>,
    /// True if the capture was en passant.
    pub en_passant: bool,
    /// Id of the queen that replaced a promoting pawn.
    pub promoted: Option<PieceId>,
}

/// Plays `mv` on `board`.
///
/// Order matters: an en passant capture removes the passed pawn (not the
/// empty landing square), a castle relocates the rook, a piece on the end
/// square is captured, a pawn reaching its last rank becomes a new queen,
/// and finally the moving piece is relocated.
///
/// Returns `None` and leaves the board untouched when no piece stands on
/// the start square.
pub fn apply_move(board: &mut Board, mv: Move, turns: &[Turn]) -> Option<MoveEffects> {
    let mover = *board.piece_at(mv.start)?;
    let mut effects = MoveEffects::default();

    if mover.kind == PieceKind::Pawn
        && !board.is_occupied(mv.end)
        && is_en_passant(&mover, mv.end, turns)
    {
        let passed = mv.end.offset(0, -mover.color.pawn_direction());
        effects.captured = passed.and_then(|sq| board.remove_at(sq));
        effects.en_passant = effects.captured.is_some();
    }

    if let Some(side) = castling_side(mv.start, mv.end, board) {
        let rook_home = side.rook_start(mover.color);
        if let Some(rook) = board.piece_at(rook_home).copied() {
            board.relocate(rook.id, side.rook_end(mover.color));
        }
        effects.castled = Some(side);
    }

    if let Some(occupant) = board.piece_at(mv.end).copied() {
        if occupant.id != mover.id {
            effects.captured = board.remove(occupant.id);
        }
    }

    let mut moving = mover.id;
    if pawn_is_promoted(&mover, mv.end) {
        if let Some(queen) = board.replace(mover.id, PieceKind::Queen) {
            moving = queen;
            effects.promoted = Some(queen);
        }
    }

    board.relocate(moving, mv.end);
    Some(effects)
}

/// Returns a copy of `board` with `mv` played.
pub fn simulate(board: &Board, mv: Move, turns: &[Turn]) -> Board {
    let mut after = board.clone();
    apply_move(&mut after, mv, turns);
    after
}
