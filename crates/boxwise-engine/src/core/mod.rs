//! Board geometry and line drawing.
//!
//! A board of `W x H` cells sits on a `(W+1) x (H+1)` lattice of dots. Players
//! draw straight horizontal or vertical segments between dots; a segment may
//! span several unit edges at once. Every unit edge that lies between two cells
//! is stored twice (once per neighbour) and both copies always agree.
//!
//! - [`Cell`] / [`Edges`] / [`Owner`] - per-cell edge flags and ownership
//! - [`Board`] - the grid, line application and ownership tally
//! - [`Move`] / [`Point`] - segments between lattice points
//! - [`generate_moves`] - every legal segment for a position

pub use self::{board::*, cell::*, move_generator::*, moves::*};

mod board;
mod cell;
mod move_generator;
mod moves;

/// Smallest supported board side, in cells.
pub const MIN_BOARD_SIDE: u8 = 3;
/// Largest supported board side, in cells.
pub const MAX_BOARD_SIDE: u8 = 8;
/// Upper bound on the number of cells of any supported board.
pub const MAX_CELLS: usize = MAX_BOARD_SIDE as usize * MAX_BOARD_SIDE as usize;
/// Dots along the longest supported side; the normaliser for segment lengths.
pub const MAX_LINE_LENGTH: u8 = MAX_BOARD_SIDE + 1;
