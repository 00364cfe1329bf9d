//! Move selection: picking the best line for the side to move.
//!
//! # How It Works
//!
//! 1. **Enumerate** - every legal segment from [`generate_moves`]
//! 2. **Trial** - apply each one to a private copy of the board
//! 3. **Score** - evaluate the copy and score it with a [`PositionScorer`]
//! 4. **Select** - keep every candidate tied at the running maximum and pick
//!    one of them uniformly at random
//!
//! A candidate that scores [`WIN_SCORE`] is taken immediately without looking
//! at the remaining ones.
//!
//! The search is greedy: it looks one move ahead and never considers the
//! opponent's reply.
//!
//! # Usage
//!
//! ```
//! use boxwise_engine::{Board, GameState, Player};
//! use boxwise_evaluator::{genome::Genome, move_selector::MoveSelector};
//!
//! let state = GameState::new(Board::new(3, 3).unwrap(), Player::One);
//! let selector = MoveSelector::from_genome(Genome::TUNED);
//! let selected = selector.select_for_state(&state, &mut rand::rng());
//! assert!(state.board().check_move(selected.mv).is_ok());
//! ```

use boxwise_engine::{Board, CompletedCells, GameState, Move, generate_moves};
use rand::Rng;

use crate::{
    board_evaluation::BoardEvaluation,
    genome::Genome,
    position_scorer::{GenomeScorer, PositionScorer, ScoringContext, WIN_SCORE},
};

/// The chosen line and the position it leads to.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedMove {
    pub mv: Move,
    pub score: f64,
    /// Board after the move, with ownership of completed cells applied.
    pub board: Board,
    pub completed: CompletedCells,
}

/// Selects moves by scoring every candidate with a [`PositionScorer`].
#[derive(Debug)]
pub struct MoveSelector<'a> {
    scorer: Box<dyn PositionScorer + 'a>,
}

impl<'a> MoveSelector<'a> {
    #[must_use]
    pub fn new(scorer: Box<dyn PositionScorer + 'a>) -> Self {
        Self { scorer }
    }

    /// Selector scoring positions with the linear heuristic of `genome`.
    #[must_use]
    pub fn from_genome(genome: Genome) -> Self {
        Self::new(Box::new(GenomeScorer::new(genome)))
    }

    /// Selects a move for `context.me` on `board`.
    ///
    /// # Panics
    ///
    /// Panics if `board` has no legal move left.
    pub fn select_move<R>(
        &self,
        board: &Board,
        context: &ScoringContext,
        rng: &mut R,
    ) -> SelectedMove
    where
        R: Rng + ?Sized,
    {
        let candidates = generate_moves(board);
        assert!(
            !candidates.is_empty(),
            "no legal move on a board that is not finished"
        );

        let mover = context.me.into();
        let mut best_score = f64::NEG_INFINITY;
        let mut tied = vec![];
        for (index, &mv) in candidates.iter().enumerate() {
            let (after, completed) = board.trial(mover, mv);
            let evaluation = BoardEvaluation::from_board(&after, Some(mv));
            let score = self.scorer.score_position(&evaluation, context);
            if score == WIN_SCORE {
                return SelectedMove {
                    mv,
                    score,
                    board: after,
                    completed,
                };
            }
            if score > best_score || tied.is_empty() {
                best_score = score;
                tied.clear();
                tied.push(index);
            } else if score == best_score {
                tied.push(index);
            }
        }

        let mv = candidates[tied[rng.random_range(0..tied.len())]];
        let (board, completed) = board.trial(mover, mv);
        tracing::trace!(%mv, score = best_score, ties = tied.len(), "selected move");
        SelectedMove {
            mv,
            score: best_score,
            board,
            completed,
        }
    }

    /// Selects a move for the side to move in `state` without committing it.
    pub fn select_for_state<R>(&self, state: &GameState, rng: &mut R) -> SelectedMove
    where
        R: Rng + ?Sized,
    {
        self.select_move(state.board(), &ScoringContext::from_state(state), rng)
    }
}
