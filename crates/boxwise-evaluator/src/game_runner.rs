//! Playing a complete game between two move selectors.

use std::time::{Duration, Instant};

use boxwise_engine::{Board, GameRecord, GameState, Outcome, Owner, Player, StartPosition};
use rand::Rng;

use crate::move_selector::MoveSelector;

/// Result of a finished game.
#[derive(Debug, Clone)]
pub struct PlayedGame {
    /// Every line drawn, start-position lines included, with final clocks.
    pub record: GameRecord,
    pub final_board: Board,
    pub outcome: Outcome,
    /// Wall-clock time spent selecting moves, per player.
    pub think_time: [Duration; 2],
    pub turns: usize,
}

impl PlayedGame {
    #[must_use]
    pub fn think_time(&self, player: Player) -> Duration {
        self.think_time[player.index()]
    }
}

/// Plays `start` to the end. `selectors[0]` plays [`Player::One`], who moves
/// first.
///
/// Turns strictly alternate and every move draws at least one new unit edge,
/// so a game lasts at most as many turns as the board has unit edges.
///
/// # Panics
///
/// Panics if the game does not finish within that bound.
pub fn play_game<R>(
    start: &StartPosition,
    selectors: [&MoveSelector<'_>; 2],
    rng: &mut R,
) -> PlayedGame
where
    R: Rng + ?Sized,
{
    let board = &start.board;
    let mut record = GameRecord::new(board.width(), board.height(), Player::One);
    for &mv in &start.lines {
        record.push(Owner::Other, mv);
    }

    let max_turns = board.unit_edge_count();
    let mut state = GameState::new(board.clone(), Player::One);
    let mut think_time = [Duration::ZERO; 2];
    let mut turns = 0;
    while !state.is_over() {
        assert!(turns < max_turns, "game exceeded {max_turns} turns");
        let mover = state.to_move();
        let started = Instant::now();
        let selected = selectors[mover.index()].select_for_state(&state, rng);
        let elapsed = started.elapsed();
        think_time[mover.index()] += elapsed;
        state.charge_time(mover, elapsed);
        state.play(selected.mv);
        record.push(mover.into(), selected.mv);
        turns += 1;
    }
    record.clocks = state.clocks();

    let outcome = state.outcome();
    tracing::debug!(
        width = board.width(),
        height = board.height(),
        turns,
        ?outcome,
        "game finished"
    );
    PlayedGame {
        record,
        final_board: state.board().clone(),
        outcome,
        think_time,
        turns,
    }
}
