//! Position scoring: turning a [`BoardEvaluation`] into a single number.
//!
//! # How It Works
//!
//! Decided positions short-circuit to fixed sentinels:
//!
//! - a position we have won scores [`WIN_SCORE`]
//! - a position that is lost or tied scores [`LOSS_SCORE`]
//!
//! Undecided positions are scored as a weighted sum of six features, each
//! normalised so that an in-bounds genome can never reach either sentinel:
//!
//! ```text
//! score = w_no    * cells_with_0_sides / area
//!       + w_one   * cells_with_1_side  / area
//!       + w_two   * cells_with_2_sides / area
//!       + w_three * cells_with_3_sides / area
//!       + w_len   * move_length / MAX_LINE_LENGTH
//!       + w_margin * (our_score - their_score) / area
//! ```
//!
//! The four count features sum to at most 1, the margin lies in `[-1, 1]` and
//! the legacy move length is at most `3 * MAX_BOARD_SIDE`, so the weighted sum
//! stays below `(2 + 24/9) * WEIGHT_LIMIT` in absolute value.

use std::{fmt, iter};

use boxwise_engine::{GameState, MAX_LINE_LENGTH, Outcome, Player};

use crate::{
    board_evaluation::BoardEvaluation,
    genome::{GENE_COUNT, Genome, WEIGHT_LIMIT},
};

/// Score of a position the acting player has won.
pub const WIN_SCORE: f64 = 7.0 * WEIGHT_LIMIT;
/// Score of a position the acting player has lost or tied.
pub const LOSS_SCORE: f64 = -WIN_SCORE;

/// Who is asking, and the running score before the candidate move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringContext {
    pub me: Player,
    pub our_score: u32,
    pub their_score: u32,
    pub board_area: u32,
}

impl ScoringContext {
    /// Context for the side to move in `state`.
    #[must_use]
    pub fn from_state(state: &GameState) -> Self {
        let me = state.to_move();
        #[expect(clippy::cast_possible_truncation)]
        let board_area = state.board().area() as u32;
        Self {
            me,
            our_score: state.score(me),
            their_score: state.score(me.opponent()),
            board_area,
        }
    }
}

/// Scores positions (higher is better for [`ScoringContext::me`]).
pub trait PositionScorer: fmt::Debug + Send + Sync {
    fn score_position(&self, evaluation: &BoardEvaluation, context: &ScoringContext) -> f64;
}

/// The six normalised features in [`Gene`](crate::genome::Gene) order.
#[must_use]
pub fn position_features(
    evaluation: &BoardEvaluation,
    context: &ScoringContext,
) -> [f64; GENE_COUNT] {
    let area = f64::from(context.board_area);
    let margin = f64::from(context.our_score) - f64::from(context.their_score);
    [
        f64::from(evaluation.cells_with_sides(0)) / area,
        f64::from(evaluation.cells_with_sides(1)) / area,
        f64::from(evaluation.cells_with_sides(2)) / area,
        f64::from(evaluation.cells_with_sides(3)) / area,
        f64::from(evaluation.move_length()) / f64::from(MAX_LINE_LENGTH),
        margin / area,
    ]
}

/// Linear scorer driven by a [`Genome`].
#[derive(Debug, Clone)]
pub struct GenomeScorer {
    genome: Genome,
}

impl GenomeScorer {
    #[must_use]
    pub fn new(genome: Genome) -> Self {
        Self { genome }
    }

    #[must_use]
    pub fn genome(&self) -> &Genome {
        &self.genome
    }
}

impl PositionScorer for GenomeScorer {
    #[inline]
    fn score_position(&self, evaluation: &BoardEvaluation, context: &ScoringContext) -> f64 {
        match evaluation.outcome() {
            Outcome::Winner(winner) if winner == context.me => return WIN_SCORE,
            Outcome::Winner(_) | Outcome::Tie => return LOSS_SCORE,
            Outcome::Undecided => {}
        }
        iter::zip(position_features(evaluation, context), self.genome.weights())
            .map(|(feature, weight)| feature * weight)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use boxwise_engine::{Board, Move, Owner, generate_moves};
    use rand::{Rng as _, SeedableRng as _, seq::IndexedRandom as _};
    use rand_pcg::Pcg32;

    use super::*;

    fn context(me: Player, board: &Board) -> ScoringContext {
        ScoringContext {
            me,
            our_score: 0,
            their_score: 0,
            board_area: u32::try_from(board.area()).unwrap(),
        }
    }

    fn full_board(owner_of_last_column: Player) -> Board {
        let mut board = Board::new(3, 3).unwrap();
        for text in ["A1 D1", "A2 D2", "A3 D3", "A4 D4", "A1 A4", "B1 B4", "C1 C4"] {
            board.apply(Owner::Other, text.parse::<Move>().unwrap());
        }
        board.apply(owner_of_last_column.into(), "D1 D4".parse().unwrap());
        board
    }

    #[test]
    fn test_sentinels() {
        let scorer = GenomeScorer::new(Genome::TUNED);
        let board = full_board(Player::One);
        let evaluation = BoardEvaluation::from_board(&board, None);
        assert_eq!(
            scorer.score_position(&evaluation, &context(Player::One, &board)),
            WIN_SCORE
        );
        assert_eq!(
            scorer.score_position(&evaluation, &context(Player::Two, &board)),
            LOSS_SCORE
        );
    }

    #[test]
    fn test_tie_scores_as_loss() {
        // Each player closes two of the four columns.
        let mut board = Board::new(4, 3).unwrap();
        for text in ["A1 E1", "A2 E2", "A3 E3", "A4 E4", "A1 A4", "C1 C4", "E1 E4"] {
            board.apply(Owner::Other, text.parse::<Move>().unwrap());
        }
        board.apply(Player::One.into(), "B1 B4".parse().unwrap());
        board.apply(Player::Two.into(), "D1 D4".parse().unwrap());
        let evaluation = BoardEvaluation::from_board(&board, None);
        assert_eq!(evaluation.outcome(), Outcome::Tie);
        let scorer = GenomeScorer::new(Genome::TUNED);
        for me in Player::ALL {
            assert_eq!(
                scorer.score_position(&evaluation, &context(me, &board)),
                LOSS_SCORE
            );
        }
    }

    #[test]
    fn test_linear_combination() {
        let mut board = Board::new(3, 3).unwrap();
        let mv: Move = "A1 D1".parse().unwrap();
        board.apply(Owner::Other, mv);
        let evaluation = BoardEvaluation::from_board(&board, Some(mv));
        let genome = Genome::from_weights([1.0, -0.5, 0.0, 0.0, 0.9, 0.5]);
        let ctx = ScoringContext {
            me: Player::One,
            our_score: 3,
            their_score: 0,
            board_area: 9,
        };
        let expected = 6.0 / 9.0 - 0.5 * 3.0 / 9.0 + 0.9 * 3.0 / 9.0 + 0.5 * 3.0 / 9.0;
        let score = GenomeScorer::new(genome).score_position(&evaluation, &ctx);
        assert!((score - expected).abs() < 1e-12, "{score} != {expected}");
    }

    #[test]
    fn test_heuristic_stays_inside_sentinels() {
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..50 {
            let genome = Genome::from_fn(|_| {
                if rng.random_bool(0.5) {
                    WEIGHT_LIMIT
                } else {
                    -WEIGHT_LIMIT
                }
            });
            let scorer = GenomeScorer::new(genome);
            let mut board = Board::new(8, 8).unwrap();
            let mut last = None;
            while !board.is_full() {
                let evaluation = BoardEvaluation::from_board(&board, last);
                let ctx = ScoringContext {
                    me: Player::One,
                    our_score: rng.random_range(0..=64),
                    their_score: 0,
                    board_area: 64,
                };
                let score = scorer.score_position(&evaluation, &ctx);
                assert!(LOSS_SCORE < score && score < WIN_SCORE, "{score}");
                let moves = generate_moves(&board);
                let mv = *moves.choose(&mut rng).unwrap();
                board.apply(Owner::Other, mv);
                last = Some(mv);
            }
        }
    }
}
