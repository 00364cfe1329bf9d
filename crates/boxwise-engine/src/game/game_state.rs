use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Board, CompletedCells, Move, Outcome, Player};

/// Thinking time each player starts a game with, in seconds.
pub const INITIAL_TIME_BUDGET: f64 = 60.0;

/// Per-player score and remaining thinking time.
///
/// The time budget is informational: running out does not forfeit the game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerClock {
    pub score: u32,
    pub time_left: f64,
}

impl Default for PlayerClock {
    fn default() -> Self {
        Self {
            score: 0,
            time_left: INITIAL_TIME_BUDGET,
        }
    }
}

/// A game in progress: the board, whose turn it is and both clocks.
///
/// Turns strictly alternate; completing a cell does not grant another move.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    board: Board,
    to_move: Player,
    clocks: [PlayerClock; 2],
}

impl GameState {
    /// Starts from `board` with scores taken from cells the players already own.
    #[must_use]
    pub fn new(board: Board, to_move: Player) -> Self {
        let tally = board.tally();
        let clocks = Player::ALL.map(|player| PlayerClock {
            score: tally.of(player),
            ..PlayerClock::default()
        });
        Self::with_clocks(board, to_move, clocks)
    }

    #[must_use]
    pub fn with_clocks(board: Board, to_move: Player, clocks: [PlayerClock; 2]) -> Self {
        Self {
            board,
            to_move,
            clocks,
        }
    }

    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub const fn to_move(&self) -> Player {
        self.to_move
    }

    #[must_use]
    pub const fn clock(&self, player: Player) -> PlayerClock {
        self.clocks[player.index()]
    }

    #[must_use]
    pub const fn clocks(&self) -> [PlayerClock; 2] {
        self.clocks
    }

    #[must_use]
    pub const fn score(&self, player: Player) -> u32 {
        self.clocks[player.index()].score
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.board.is_full()
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.board.outcome()
    }

    /// Plays `mv` for the side to move, credits completed cells and passes
    /// the turn.
    ///
    /// # Panics
    ///
    /// Panics if the game is already over or the move does not fit the board.
    pub fn play(&mut self, mv: Move) -> CompletedCells {
        assert!(!self.is_over(), "no moves left on a full board");
        let mover = self.to_move;
        let completed = self.board.apply(mover.into(), mv);
        self.clocks[mover.index()].score += u32::try_from(completed.len()).unwrap_or(u32::MAX);
        self.to_move = mover.opponent();
        completed
    }

    /// Deducts thinking time from `player`'s budget.
    pub fn charge_time(&mut self, player: Player, elapsed: Duration) {
        self.clocks[player.index()].time_left -= elapsed.as_secs_f64();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Owner;

    fn mv(text: &str) -> Move {
        text.parse().unwrap()
    }

    #[test]
    fn test_play_alternates_and_scores() {
        let mut state = GameState::new(Board::new(3, 3).unwrap(), Player::One);
        state.play(mv("A1 B1"));
        assert_eq!(state.to_move(), Player::Two);
        state.play(mv("A1 A2"));
        state.play(mv("B1 B2"));
        let completed = state.play(mv("A2 B2"));
        assert_eq!(completed.len(), 1);
        assert_eq!(state.score(Player::Two), 1);
        assert_eq!(state.score(Player::One), 0);
        assert_eq!(
            state.to_move(),
            Player::One,
            "Completing a cell does not grant another move"
        );
    }

    #[test]
    fn test_new_counts_existing_ownership() {
        let mut board = Board::new(3, 3).unwrap();
        board.apply(Owner::Other, mv("A1 B1"));
        board.apply(Owner::Other, mv("A1 A2"));
        board.apply(Owner::Other, mv("B1 B2"));
        board.apply(Owner::Player(Player::Two), mv("A2 B2"));
        let state = GameState::new(board, Player::One);
        assert_eq!(state.score(Player::Two), 1);
        assert_eq!(state.clock(Player::One).time_left, INITIAL_TIME_BUDGET);
    }

    #[test]
    fn test_charge_time() {
        let mut state = GameState::new(Board::new(3, 3).unwrap(), Player::One);
        state.charge_time(Player::Two, Duration::from_millis(1500));
        assert!((state.clock(Player::Two).time_left - 58.5).abs() < 1e-9);
        assert_eq!(state.clock(Player::One).time_left, INITIAL_TIME_BUDGET);
    }
}
