//! Heuristic dots-and-boxes player.
//!
//! The player is a greedy one-ply search over every legal line, scored by a
//! linear heuristic whose six weights form a [`Genome`](genome::Genome):
//!
//! ```text
//! Game runner (plays a full game between two selectors)
//!     ↓ uses
//! Move selection (try every candidate, keep the best)
//!     ↓ uses
//! Position scoring (weighted sum of board features)
//!     ↓ uses
//! Board evaluation (cell counts by drawn sides and owner)
//! ```
//!
//! - [`board_evaluation`] - single-pass feature extraction from a board
//! - [`position_scorer`] - the [`PositionScorer`](position_scorer::PositionScorer)
//!   trait, win/loss sentinels and the genome-driven linear scorer
//! - [`move_selector`] - candidate enumeration, trial application and
//!   uniform tie-breaking
//! - [`game_runner`] - alternating play with per-player think-time accounting
//! - [`genome`] - the weights, their bounds and their text form
//!
//! # Example
//!
//! ```
//! use boxwise_engine::StartPosition;
//! use boxwise_evaluator::{game_runner::play_game, genome::Genome, move_selector::MoveSelector};
//!
//! let tuned = MoveSelector::from_genome(Genome::TUNED);
//! let naive = MoveSelector::from_genome(Genome::ZERO);
//! let start = StartPosition::empty(3, 3).unwrap();
//! let game = play_game(&start, [&tuned, &naive], &mut rand::rng());
//! assert!(game.final_board.is_full());
//! ```

pub mod board_evaluation;
pub mod game_runner;
pub mod genome;
pub mod move_selector;
pub mod position_scorer;
