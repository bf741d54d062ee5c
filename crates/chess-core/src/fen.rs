//! FEN piece-placement parsing and serialization.
//!
//! Only the first FEN field is handled here. Side to move, castling rights
//! and en passant availability are derived from match history instead.

use crate::{Color, File, PieceKind, Rank, Square};
use thiserror::Error;

/// Errors that can occur when parsing a FEN placement.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid piece placement: expected 8 ranks, got {0}")]
    InvalidRankCount(usize),

    #[error("invalid character '{found}' in rank {rank}")]
    InvalidCharacter { found: char, rank: u8 },

    #[error("rank {rank} has {squares} squares, expected 8")]
    InvalidRankLength { rank: u8, squares: u32 },
}

/// A piece standing on a square, as read from a placement string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placed {
    pub square: Square,
    pub kind: PieceKind,
    pub color: Color,
}

/// The standard starting placement.
pub const STARTING_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// Parses a placement string such as `"7k/6R1/5N2/8/8/8/8/K7"`.
///
/// A full FEN record is accepted too; everything after the first
/// whitespace is ignored. Pieces are returned rank 8 first, file A first.
pub fn parse_placement(fen: &str) -> Result<Vec<Placed>, FenError> {
    let placement = fen.split_whitespace().next().unwrap_or_default();
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::InvalidRankCount(ranks.len()));
    }

    let mut pieces = Vec::new();
    for (i, row) in ranks.iter().enumerate() {
        let rank_number = 8 - i as u8;
        let rank = Rank::from_index(rank_number - 1).ok_or(FenError::InvalidRankCount(i))?;
        let mut squares: u32 = 0;

        for c in row.chars() {
            if let Some(skip) = c.to_digit(10) {
                squares += skip;
                continue;
            }
            let (kind, color) = PieceKind::from_fen_char(c).ok_or(FenError::InvalidCharacter {
                found: c,
                rank: rank_number,
            })?;
            if let Some(file) = File::from_index(squares as u8) {
                pieces.push(Placed {
                    square: Square::new(file, rank),
                    kind,
                    color,
                });
            }
            squares += 1;
        }

        if squares != 8 {
            return Err(FenError::InvalidRankLength {
                rank: rank_number,
                squares,
            });
        }
    }

    Ok(pieces)
}

/// Writes a placement string for whatever stands on each square.
pub fn placement_string<F>(piece_at: F) -> String
where
    F: Fn(Square) -> Option<(PieceKind, Color)>,
{
    let mut out = String::with_capacity(72);
    for (i, rank) in Rank::ALL.iter().rev().enumerate() {
        if i > 0 {
            out.push('/');
        }
        let mut empty = 0;
        for file in File::ALL {
            match piece_at(Square::new(file, *rank)) {
                Some((kind, color)) => {
                    if empty > 0 {
                        out.push_str(&empty.to_string());
                        empty = 0;
                    }
                    out.push(kind.to_fen_char(color));
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            out.push_str(&empty.to_string());
        }
    }
    out
}
