//! Game-level state built on the board model.
//!
//! - [`GameState`] - board, side to move, scores and thinking-time budgets
//! - [`GameRecord`] - the plain-text exchange format for a game in progress
//! - [`StartPosition`] - randomly seeded opening positions

pub use self::{game_record::*, game_state::*, start_position::*};

mod game_record;
mod game_state;
mod start_position;
