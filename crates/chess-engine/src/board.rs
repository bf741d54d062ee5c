//! Piece arena with a derived square index.
//!
//! Pieces are owned by the arena and keyed by a stable [`PieceId`]. The
//! square index is rebuilt incrementally on every mutation, so "the piece on
//! this square" and "the piece with this id" can never disagree.

use chess_core::fen::{self, FenError, STARTING_PLACEMENT};
use chess_core::{Color, Movement, PieceKind, Square};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Stable identity of a piece on the board.
///
/// Ids are handed out by a per-board counter, so two boards built by the
/// same sequence of operations assign the same ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(u32);

impl PieceId {
    /// Returns the raw id.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A piece standing on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub id: PieceId,
    pub kind: PieceKind,
    pub color: Color,
    pub square: Square,
}

impl Piece {
    /// Returns how this piece moves.
    #[inline]
    pub const fn movement(&self) -> Movement {
        self.kind.movement()
    }
}

/// The pieces of a match, indexed by id and by square.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    pieces: BTreeMap<PieceId, Piece>,
    by_square: HashMap<Square, PieceId>,
    next_id: u32,
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a board with the standard starting setup.
    pub fn standard() -> Self {
        // STARTING_PLACEMENT is a constant known to parse.
        Self::from_fen(STARTING_PLACEMENT).unwrap_or_default()
    }

    /// Creates a board from a FEN placement (or full FEN record).
    pub fn from_fen(placement: &str) -> Result<Self, FenError> {
        let mut board = Board::new();
        for placed in fen::parse_placement(placement)? {
            board.place(placed.kind, placed.color, placed.square);
        }
        Ok(board)
    }

    /// Returns the FEN placement string for this board.
    pub fn to_fen(&self) -> String {
        fen::placement_string(|sq| self.piece_at(sq).map(|p| (p.kind, p.color)))
    }

    /// Puts a new piece on `square`, removing whatever stood there.
    pub fn place(&mut self, kind: PieceKind, color: Color, square: Square) -> PieceId {
        self.remove_at(square);
        let id = PieceId(self.next_id);
        self.next_id += 1;
        self.pieces.insert(
            id,
            Piece {
                id,
                kind,
                color,
                square,
            },
        );
        self.by_square.insert(square, id);
        id
    }

    /// Returns the piece with the given id.
    #[inline]
    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    /// Returns the piece standing on `square`.
    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.by_square.get(&square).and_then(|id| self.pieces.get(id))
    }

    /// Returns true if any piece stands on `square`.
    #[inline]
    pub fn is_occupied(&self, square: Square) -> bool {
        self.by_square.contains_key(&square)
    }

    /// Iterates over all pieces in id order.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }

    /// Iterates over the pieces of one color.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> {
        self.pieces.values().filter(move |p| p.color == color)
    }

    /// Returns the king of the given color.
    pub fn king(&self, color: Color) -> Option<&Piece> {
        self.pieces_of(color).find(|p| p.kind == PieceKind::King)
    }

    /// Number of pieces on the board.
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// Returns true if no pieces are on the board.
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Takes a piece off the board.
    pub fn remove(&mut self, id: PieceId) -> Option<Piece> {
        let piece = self.pieces.remove(&id)?;
        self.by_square.remove(&piece.square);
        Some(piece)
    }

    /// Takes whatever stands on `square` off the board.
    pub fn remove_at(&mut self, square: Square) -> Option<Piece> {
        let id = *self.by_square.get(&square)?;
        self.remove(id)
    }

    /// Moves a piece to `to`, capturing any other piece standing there.
    ///
    /// Returns the captured piece.
    pub fn relocate(&mut self, id: PieceId, to: Square) -> Option<Piece> {
        let from = self.pieces.get(&id)?.square;
        if from == to {
            return None;
        }
        let captured = self.remove_at(to);
        self.by_square.remove(&from);
        self.by_square.insert(to, id);
        if let Some(piece) = self.pieces.get_mut(&id) {
            piece.square = to;
        }
        captured
    }

    /// Replaces a piece with a new entity of another kind on the same square.
    ///
    /// The replacement keeps the color but gets a fresh id.
    pub fn replace(&mut self, id: PieceId, kind: PieceKind) -> Option<PieceId> {
        let old = self.remove(id)?;
        Some(self.place(kind, old.color, old.square))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in chess_core::Rank::ALL.iter().rev() {
            for file in chess_core::File::ALL {
                let c = self
                    .piece_at(Square::new(file, *rank))
                    .map_or('.', |p| p.kind.to_fen_char(p.color));
                write!(f, "{}", c)?;
            }
            writeln!(f, " {}", rank)?;
        }
        write!(f, "abcdefgh")
    }
}
