//! Board analysis.
//!
//! Pure functions over a [`Board`](crate::Board) snapshot: attack ranges per
//! piece kind, line-of-sight obstruction, and check, checkmate and stalemate
//! determination. Results never depend on the order pieces are enumerated in.

mod attacks;
mod check;
mod obstruction;
mod stalemate;

pub use attacks::{
    attack_range, can_move_to, is_attacked_by, pawn_captures, pieces_that_can_reach, threatens,
};
pub use check::{is_check, is_checkmate, is_unreachable, king_can_escape};
pub use obstruction::{direction_is_obstructed, path_is_clear, squares_between};
pub use stalemate::is_stalemate;
