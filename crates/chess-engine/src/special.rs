//! Special-move detection: castling, en passant and promotion.

use crate::analysis::pawn_captures;
use crate::board::{Board, Piece};
use crate::history::{last_played, Turn};
use chess_core::{Color, File, PieceKind, Square};

/// Which rook the king castles with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastlingSide {
    KingSide,
    QueenSide,
}

impl CastlingSide {
    /// The king's home square.
    pub const fn king_start(color: Color) -> Square {
        Square::new(File::E, color.back_rank())
    }

    /// Where the king lands.
    pub const fn king_end(self, color: Color) -> Square {
        match self {
            CastlingSide::KingSide => Square::new(File::G, color.back_rank()),
            CastlingSide::QueenSide => Square::new(File::C, color.back_rank()),
        }
    }

    /// The rook's home square.
    pub const fn rook_start(self, color: Color) -> Square {
        match self {
            CastlingSide::KingSide => Square::new(File::H, color.back_rank()),
            CastlingSide::QueenSide => Square::new(File::A, color.back_rank()),
        }
    }

    /// Where the rook lands.
    pub const fn rook_end(self, color: Color) -> Square {
        match self {
            CastlingSide::KingSide => Square::new(File::F, color.back_rank()),
            CastlingSide::QueenSide => Square::new(File::D, color.back_rank()),
        }
    }

    /// Squares between king and rook that must be empty.
    pub fn path(self, color: Color) -> Vec<Square> {
        let files: &[File] = match self {
            CastlingSide::KingSide => &[File::F, File::G],
            CastlingSide::QueenSide => &[File::B, File::C, File::D],
        };
        files
            .iter()
            .map(|&file| Square::new(file, color.back_rank()))
            .collect()
    }

    /// Squares the king crosses or lands on; none may be attacked.
    pub fn king_transit(self, color: Color) -> [Square; 2] {
        [self.rook_end(color), self.king_end(color)]
    }
}

/// Returns the castling side if a king stands on `start` and the move is
/// E to G or E to C along its home rank.
pub fn castling_side(start: Square, end: Square, board: &Board) -> Option<CastlingSide> {
    let king = board.piece_at(start)?;
    if king.kind != PieceKind::King || start != CastlingSide::king_start(king.color) {
        return None;
    }
    [CastlingSide::KingSide, CastlingSide::QueenSide]
        .into_iter()
        .find(|side| side.king_end(king.color) == end)
}

/// The square a pawn may capture en passant onto, if any.
///
/// Available only immediately after an opposing pawn advanced two ranks and
/// landed beside this pawn: the target is the square that pawn passed over.
pub fn en_passant_target(pawn: &Piece, turns: &[Turn]) -> Option<Square> {
    if pawn.kind != PieceKind::Pawn {
        return None;
    }
    let (mover, played) = last_played(turns)?;
    if mover == pawn.color || played.kind != PieceKind::Pawn {
        return None;
    }
    let (df, dr) = played.start.delta(played.end);
    if df != 0 || dr.abs() != 2 {
        return None;
    }
    let behind = played.end.offset(0, pawn.color.pawn_direction())?;
    pawn_captures(pawn).contains(&behind).then_some(behind)
}

/// Returns true if moving `pawn` to `end` captures en passant.
pub fn is_en_passant(pawn: &Piece, end: Square, turns: &[Turn]) -> bool {
    en_passant_target(pawn, turns) == Some(end)
}

/// Returns true if the piece is a pawn arriving on its last rank.
pub fn pawn_is_promoted(piece: &Piece, end: Square) -> bool {
    piece.kind == PieceKind::Pawn && end.rank() == piece.color.last_rank()
}
