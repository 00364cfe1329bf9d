use rand::Rng;

use crate::{Board, BoardSizeError, MAX_BOARD_SIDE, MIN_BOARD_SIDE, Move, Owner, Point};

/// Most neutral lines a start position can be seeded with.
pub const MAX_START_LINES: u8 = 16;

/// A board together with the neutral lines that were drawn to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartPosition {
    pub board: Board,
    pub lines: Vec<Move>,
}

impl StartPosition {
    /// An empty board with no seeded lines.
    pub fn empty(width: u8, height: u8) -> Result<Self, BoardSizeError> {
        Ok(Self {
            board: Board::new(width, height)?,
            lines: vec![],
        })
    }

    /// Draws a random opening position.
    ///
    /// Half of the time the board stays empty. Otherwise between 2 and
    /// [`MAX_START_LINES`] random segments are attempted, each horizontal or
    /// vertical with equal probability; degenerate draws are skipped. All
    /// lines are drawn with [`Owner::Other`], so any cell they close is
    /// neutral.
    pub fn random<R>(width: u8, height: u8, rng: &mut R) -> Result<Self, BoardSizeError>
    where
        R: Rng + ?Sized,
    {
        let mut position = Self::empty(width, height)?;
        if rng.random_bool(0.5) {
            return Ok(position);
        }
        let attempts = rng.random_range(2..=MAX_START_LINES);
        for _ in 0..attempts {
            let (from, to) = if rng.random_bool(0.5) {
                let y = rng.random_range(0..=height);
                let x0 = rng.random_range(0..=width);
                let x1 = rng.random_range(0..=width);
                (Point::new(x0, y), Point::new(x1, y))
            } else {
                let x = rng.random_range(0..=width);
                let y0 = rng.random_range(0..=height);
                let y1 = rng.random_range(0..=height);
                (Point::new(x, y0), Point::new(x, y1))
            };
            let Ok(mv) = Move::new(from, to) else {
                continue;
            };
            position.board.apply(Owner::Other, mv);
            position.lines.push(mv);
        }
        tracing::debug!(
            width,
            height,
            lines = position.lines.len(),
            "generated start position"
        );
        Ok(position)
    }
}

/// Picks a board size uniformly from the supported range on each axis.
pub fn random_board_size<R>(rng: &mut R) -> (u8, u8)
where
    R: Rng + ?Sized,
{
    (
        rng.random_range(MIN_BOARD_SIDE..=MAX_BOARD_SIDE),
        rng.random_range(MIN_BOARD_SIDE..=MAX_BOARD_SIDE),
    )
}
