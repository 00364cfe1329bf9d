//! Feature extraction from a board position.
//!
//! [`BoardEvaluation`] scans the cells of a board once and records how many
//! cells have 0, 1, 2 or 3 sides drawn, how many completed cells each party
//! owns, whether the game is decided, and the length metric of the move that
//! produced the position. Every cell lands in exactly one bucket, so the
//! bucket counts always add up to the board area.

use boxwise_engine::{Board, Move, Outcome, Owner, OwnershipTally, Player};

/// Features of a board position, consumed by a [`PositionScorer`].
///
/// [`PositionScorer`]: crate::position_scorer::PositionScorer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardEvaluation {
    side_counts: [u32; 4],
    owned_by_one: u32,
    owned_by_two: u32,
    owned_by_other: u32,
    outcome: Outcome,
    move_length: i32,
}

impl BoardEvaluation {
    /// Scans `board`, optionally noting the move that produced it.
    #[must_use]
    pub fn from_board(board: &Board, last_move: Option<Move>) -> Self {
        let mut side_counts = [0; 4];
        let (mut owned_by_one, mut owned_by_two, mut owned_by_other) = (0, 0, 0);
        for cell in board.cells() {
            match cell.owner() {
                Some(Owner::Player(Player::One)) => owned_by_one += 1,
                Some(Owner::Player(Player::Two)) => owned_by_two += 1,
                Some(Owner::Other) => owned_by_other += 1,
                // Unowned cells never have all four sides.
                None => side_counts[cell.edge_count() as usize] += 1,
            }
        }

        let outcome = Board::outcome_of(&OwnershipTally {
            player_one: owned_by_one,
            player_two: owned_by_two,
            other: owned_by_other,
            unowned: side_counts.iter().sum(),
        });

        Self {
            side_counts,
            owned_by_one,
            owned_by_two,
            owned_by_other,
            outcome,
            move_length: last_move.map_or(-1, legacy_move_length),
        }
    }

    /// Number of unowned cells with exactly `sides` sides drawn (0 to 3).
    #[must_use]
    pub fn cells_with_sides(&self, sides: usize) -> u32 {
        self.side_counts[sides]
    }

    #[must_use]
    pub fn owned_by(&self, owner: Owner) -> u32 {
        match owner {
            Owner::Player(Player::One) => self.owned_by_one,
            Owner::Player(Player::Two) => self.owned_by_two,
            Owner::Other => self.owned_by_other,
        }
    }

    /// Sum of every bucket; equals the board area.
    #[must_use]
    pub fn total_cells(&self) -> u32 {
        self.side_counts.iter().sum::<u32>()
            + self.owned_by_one
            + self.owned_by_two
            + self.owned_by_other
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Length metric of the last move, or `-1` if none was given.
    #[must_use]
    pub fn move_length(&self) -> i32 {
        self.move_length
    }
}

/// `|from.x - to.x| + |from.y + to.y|`.
///
/// The y term sums rather than subtracts; tuned genomes were evolved against
/// this metric, so it is kept as is.
#[must_use]
pub fn legacy_move_length(mv: Move) -> i32 {
    let (from, to) = (mv.from(), mv.to());
    let dx = i32::from(from.x) - i32::from(to.x);
    let sy = i32::from(from.y) + i32::from(to.y);
    dx.abs() + sy.abs()
}

#[cfg(test)]
mod tests {
    use boxwise_engine::{Point, generate_moves};
    use rand::{SeedableRng as _, seq::IndexedRandom as _};
    use rand_pcg::Pcg32;

    use super::*;

    fn mv(text: &str) -> Move {
        text.parse().unwrap()
    }

    #[test]
    fn test_empty_board() {
        let board = Board::new(4, 3).unwrap();
        let evaluation = BoardEvaluation::from_board(&board, None);
        assert_eq!(evaluation.cells_with_sides(0), 12);
        assert_eq!(evaluation.outcome(), Outcome::Undecided);
        assert_eq!(evaluation.move_length(), -1);
    }

    #[test]
    fn test_buckets_sum_to_area_during_random_play() {
        let mut rng = Pcg32::seed_from_u64(42);
        for (width, height) in [(3, 3), (5, 4), (8, 8)] {
            let mut board = Board::new(width, height).unwrap();
            let movers = [
                Owner::Player(Player::One),
                Owner::Player(Player::Two),
                Owner::Other,
            ];
            loop {
                let evaluation = BoardEvaluation::from_board(&board, None);
                assert_eq!(evaluation.total_cells() as usize, board.area());
                assert_eq!(
                    evaluation.outcome().is_undecided(),
                    !board.is_full(),
                    "Decided iff every cell is owned"
                );
                let moves = generate_moves(&board);
                let Some(&next) = moves.choose(&mut rng) else {
                    break;
                };
                board.apply(*movers.choose(&mut rng).unwrap(), next);
            }
        }
    }

    #[test]
    fn test_partial_cells_are_bucketed() {
        let mut board = Board::new(3, 3).unwrap();
        board.apply(Owner::Other, mv("A1 D1"));
        board.apply(Owner::Other, mv("A1 A2"));
        let evaluation = BoardEvaluation::from_board(&board, Some(mv("A1 A2")));
        assert_eq!(evaluation.cells_with_sides(2), 1);
        assert_eq!(evaluation.cells_with_sides(1), 2);
        assert_eq!(evaluation.cells_with_sides(0), 6);
        assert_eq!(evaluation.move_length(), 1);
    }

    #[test]
    fn test_outcome_on_full_board() {
        let mut board = Board::new(3, 3).unwrap();
        for y in 0..=3 {
            board.apply(Owner::Other, Move::new(Point::new(0, y), Point::new(3, y)).unwrap());
        }
        board.apply(Owner::Other, mv("A1 A4"));
        board.apply(Owner::Player(Player::Two), mv("B1 B4"));
        board.apply(Owner::Player(Player::One), mv("C1 C4"));
        board.apply(Owner::Player(Player::Two), mv("D1 D4"));
        let evaluation = BoardEvaluation::from_board(&board, None);
        assert_eq!(evaluation.owned_by(Owner::Player(Player::Two)), 6);
        assert_eq!(evaluation.owned_by(Owner::Player(Player::One)), 3);
        assert_eq!(evaluation.outcome(), Outcome::Winner(Player::Two));
    }

    #[test]
    fn test_legacy_move_length() {
        assert_eq!(legacy_move_length(mv("A1 C1")), 2);
        // Vertical: dx is zero and the y term is the sum of both rows.
        assert_eq!(legacy_move_length(mv("B2 B4")), 4);
        assert_eq!(legacy_move_length(mv("A3 D3")), 3 + 4);
    }
}
