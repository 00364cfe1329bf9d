use std::fmt::{self, Write as _};

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::{BoardSizeError, MoveError};

use super::{
    Cell, Edges, MAX_BOARD_SIDE, MAX_CELLS, MIN_BOARD_SIDE, Move, Orientation, Owner, Player,
    Point,
};

/// Cells completed by a single line, as cell coordinates.
pub type CompletedCells = ArrayVec<Point, MAX_CELLS>;

/// Cell ownership counts of a board.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OwnershipTally {
    pub player_one: u32,
    pub player_two: u32,
    pub other: u32,
    pub unowned: u32,
}

impl OwnershipTally {
    #[must_use]
    pub const fn of(&self, player: Player) -> u32 {
        match player {
            Player::One => self.player_one,
            Player::Two => self.player_two,
        }
    }
}

/// Result of a board, decided only once every cell is owned.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant,
)]
pub enum Outcome {
    Undecided,
    Winner(Player),
    Tie,
}

/// Rectangular grid of `width x height` cells, stored row-major.
///
/// Shared edges are kept in both neighbouring cells and every mutation goes
/// through [`Board::apply`], which writes both copies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    width: u8,
    height: u8,
    cells: ArrayVec<Cell, MAX_CELLS>,
}

impl Board {
    /// Creates an empty board.
    pub fn new(width: u8, height: u8) -> Result<Self, BoardSizeError> {
        let range = MIN_BOARD_SIDE..=MAX_BOARD_SIDE;
        if !range.contains(&width) || !range.contains(&height) {
            return Err(BoardSizeError { width, height });
        }
        let mut cells = ArrayVec::new();
        for _ in 0..usize::from(width) * usize::from(height) {
            cells.push(Cell::EMPTY);
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    #[must_use]
    pub const fn width(&self) -> u8 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u8 {
        self.height
    }

    /// Number of cells.
    #[must_use]
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    /// Number of unit edges on the board, drawn or not.
    #[must_use]
    pub fn unit_edge_count(&self) -> usize {
        let (w, h) = (usize::from(self.width), usize::from(self.height));
        w * (h + 1) + h * (w + 1)
    }

    fn index(&self, x: u8, y: u8) -> usize {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) outside {}x{} board",
            self.width,
            self.height
        );
        usize::from(y) * usize::from(self.width) + usize::from(x)
    }

    #[must_use]
    pub fn cell(&self, x: u8, y: u8) -> Cell {
        self.cells[self.index(x, y)]
    }

    /// Iterates over all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    fn cell_mut(&mut self, x: u8, y: u8) -> &mut Cell {
        let index = self.index(x, y);
        &mut self.cells[index]
    }

    /// Whether the unit edge from `(x, y)` to `(x + 1, y)` is drawn.
    ///
    /// Rows `0..height` are read from the top side of the cell below the edge;
    /// the last lattice row is read from the bottom side of the last cell row.
    #[must_use]
    pub fn is_horizontal_edge_drawn(&self, x: u8, y: u8) -> bool {
        if y < self.height {
            self.cell(x, y).edges().contains(Edges::TOP)
        } else {
            self.cell(x, self.height - 1).edges().contains(Edges::BOTTOM)
        }
    }

    /// Whether the unit edge from `(x, y)` to `(x, y + 1)` is drawn.
    ///
    /// Columns `0..width` are read from the left side of the cell to the right
    /// of the edge; the last lattice column is read from the right side of the
    /// last cell column.
    #[must_use]
    pub fn is_vertical_edge_drawn(&self, x: u8, y: u8) -> bool {
        if x < self.width {
            self.cell(x, y).edges().contains(Edges::LEFT)
        } else {
            self.cell(self.width - 1, y).edges().contains(Edges::RIGHT)
        }
    }

    /// Checks that the move lies on this board's lattice.
    pub fn check_move(&self, mv: Move) -> Result<(), MoveError> {
        mv.check_bounds(self.width, self.height)
    }

    /// Draws `mv` and hands every newly completed cell to `mover`.
    ///
    /// Returns the coordinates of the cells that changed owner.
    ///
    /// # Panics
    ///
    /// Panics if the move does not fit on the board.
    pub fn apply(&mut self, mover: Owner, mv: Move) -> CompletedCells {
        assert!(
            self.check_move(mv).is_ok(),
            "move {mv} does not fit on a {}x{} board",
            self.width,
            self.height
        );
        self.draw_line(mv);

        let mut completed = CompletedCells::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let cell = self.cell_mut(x, y);
                if cell.is_complete() && cell.owner().is_none() {
                    cell.claim(mover);
                    completed.push(Point::new(x, y));
                }
            }
        }
        completed
    }

    /// Applies `mv` to a private copy, leaving `self` untouched.
    ///
    /// Ownership of completed cells is written to the copy only.
    #[must_use]
    pub fn trial(&self, mover: Owner, mv: Move) -> (Self, CompletedCells) {
        let mut board = self.clone();
        let completed = board.apply(mover, mv);
        (board, completed)
    }

    fn draw_line(&mut self, mv: Move) {
        let (from, to) = (mv.from(), mv.to());
        match mv.orientation() {
            Orientation::Vertical => {
                let x = from.x;
                for y in from.y..to.y {
                    if x != self.width {
                        self.cell_mut(x, y).draw(Edges::LEFT);
                    }
                    if x != 0 {
                        self.cell_mut(x - 1, y).draw(Edges::RIGHT);
                    }
                }
            }
            Orientation::Horizontal => {
                let y = from.y;
                for x in from.x..to.x {
                    if y != self.height {
                        self.cell_mut(x, y).draw(Edges::TOP);
                    }
                    if y != 0 {
                        self.cell_mut(x, y - 1).draw(Edges::BOTTOM);
                    }
                }
            }
        }
    }

    /// Checks that both copies of every interior edge agree.
    #[must_use]
    pub fn has_consistent_edges(&self) -> bool {
        let horizontal = (1..self.height).all(|y| {
            (0..self.width).all(|x| {
                self.cell(x, y).edges().contains(Edges::TOP)
                    == self.cell(x, y - 1).edges().contains(Edges::BOTTOM)
            })
        });
        let vertical = (1..self.width).all(|x| {
            (0..self.height).all(|y| {
                self.cell(x, y).edges().contains(Edges::LEFT)
                    == self.cell(x - 1, y).edges().contains(Edges::RIGHT)
            })
        });
        horizontal && vertical
    }

    #[must_use]
    pub fn tally(&self) -> OwnershipTally {
        let mut tally = OwnershipTally::default();
        for cell in &self.cells {
            match cell.owner() {
                Some(Owner::Player(Player::One)) => tally.player_one += 1,
                Some(Owner::Player(Player::Two)) => tally.player_two += 1,
                Some(Owner::Other) => tally.other += 1,
                None => tally.unowned += 1,
            }
        }
        tally
    }

    /// Whether every cell is owned.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| cell.owner().is_some())
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        Self::outcome_of(&self.tally())
    }

    /// Decides the result from a tally; neutral cells count for nobody.
    #[must_use]
    pub fn outcome_of(tally: &OwnershipTally) -> Outcome {
        if tally.unowned > 0 {
            return Outcome::Undecided;
        }
        match tally.player_one.cmp(&tally.player_two) {
            std::cmp::Ordering::Greater => Outcome::Winner(Player::One),
            std::cmp::Ordering::Less => Outcome::Winner(Player::Two),
            std::cmp::Ordering::Equal => Outcome::Tie,
        }
    }
}

impl fmt::Display for Board {
    /// Renders dots as `*`, drawn edges as `-` / `|` and owned cells as
    /// `1`, `2` or `X` (neutral).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..=self.height {
            f.write_char('*')?;
            for x in 0..self.width {
                f.write_char(if self.is_horizontal_edge_drawn(x, y) {
                    '-'
                } else {
                    ' '
                })?;
                f.write_char('*')?;
            }
            f.write_char('\n')?;
            if y == self.height {
                break;
            }
            for x in 0..=self.width {
                f.write_char(if self.is_vertical_edge_drawn(x, y) {
                    '|'
                } else {
                    ' '
                })?;
                if x < self.width {
                    f.write_char(match self.cell(x, y).owner() {
                        Some(Owner::Player(Player::One)) => '1',
                        Some(Owner::Player(Player::Two)) => '2',
                        Some(Owner::Other) => 'X',
                        None => ' ',
                    })?;
                }
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: "3x3:00,0c,..." (size, then raw cell bytes in hex, row-major)
        let mut text = String::with_capacity(4 + self.cells.len() * 3);
        write!(&mut text, "{}x{}:", self.width, self.height).map_err(serde::ser::Error::custom)?;
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                text.push(',');
            }
            write!(&mut text, "{:02x}", cell.to_raw()).map_err(serde::ser::Error::custom)?;
        }
        serializer.serialize_str(&text)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as _;

        let s = String::deserialize(deserializer)?;
        let (size, cells) = s
            .split_once(':')
            .ok_or_else(|| D::Error::custom(format!("missing ':' in board {s:?}")))?;
        let (width, height) = size
            .split_once('x')
            .and_then(|(w, h)| Some((w.parse::<u8>().ok()?, h.parse::<u8>().ok()?)))
            .ok_or_else(|| D::Error::custom(format!("invalid board size {size:?}")))?;
        let mut board = Self::new(width, height).map_err(D::Error::custom)?;

        let parts = cells.split(',').collect::<Vec<_>>();
        if parts.len() != board.area() {
            return Err(D::Error::custom(format!(
                "expected {} comma-separated hex values, got {}",
                board.area(),
                parts.len()
            )));
        }
        for (i, hex) in parts.iter().enumerate() {
            let raw = u8::from_str_radix(hex, 16)
                .map_err(|e| D::Error::custom(format!("invalid hex at cell {i}: {hex} ({e})")))?;
            board.cells[i] = Cell::from_raw(raw)
                .map_err(|e| D::Error::custom(format!("invalid cell {i}: {e}")))?;
        }
        if !board.has_consistent_edges() {
            return Err(D::Error::custom("shared edges disagree"));
        }
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(text: &str) -> Move {
        text.parse().unwrap()
    }

    #[test]
    fn test_board_size_limits() {
        assert!(Board::new(3, 3).is_ok());
        assert!(Board::new(8, 3).is_ok());
        assert!(Board::new(2, 5).is_err());
        assert!(Board::new(5, 9).is_err());
        let board = Board::new(4, 3).unwrap();
        assert_eq!(board.area(), 12);
        assert_eq!(board.unit_edge_count(), 4 * 4 + 3 * 5);
        assert!(board.cells().all(|cell| cell == Cell::EMPTY));
    }

    #[test]
    fn test_apply_writes_both_copies() {
        let mut board = Board::new(3, 3).unwrap();
        // Horizontal line along the interior lattice row y = 1.
        board.apply(Owner::Player(Player::One), mv("A2 D2"));
        for x in 0..3 {
            assert!(board.cell(x, 1).edges().contains(Edges::TOP));
            assert!(board.cell(x, 0).edges().contains(Edges::BOTTOM));
        }
        // Vertical line on the right boundary only touches the last column.
        board.apply(Owner::Player(Player::Two), mv("D1 D4"));
        for y in 0..3 {
            assert!(board.cell(2, y).edges().contains(Edges::RIGHT));
        }
        assert!(board.has_consistent_edges());
        assert_eq!(board.tally().unowned, 9);
    }

    #[test]
    fn test_apply_claims_completed_cells() {
        let mut board = Board::new(3, 3).unwrap();
        let one = Owner::Player(Player::One);
        let two = Owner::Player(Player::Two);
        assert!(board.apply(one, mv("A1 B1")).is_empty());
        assert!(board.apply(two, mv("A1 A2")).is_empty());
        assert!(board.apply(one, mv("B1 B2")).is_empty());
        let completed = board.apply(two, mv("A2 B2"));
        assert_eq!(completed.as_slice(), &[Point::new(0, 0)]);
        assert_eq!(board.cell(0, 0).owner(), Some(two));

        // Redrawing an existing line completes nothing and keeps the owner.
        assert!(board.apply(one, mv("A2 B2")).is_empty());
        assert_eq!(board.cell(0, 0).owner(), Some(two));
    }

    #[test]
    fn test_single_line_can_complete_two_cells() {
        let mut board = Board::new(3, 3).unwrap();
        let other = Owner::Other;
        board.apply(other, mv("A1 B1"));
        board.apply(other, mv("A3 B3"));
        board.apply(other, mv("A1 A3"));
        board.apply(other, mv("B1 B3"));
        let completed = board.apply(Owner::Player(Player::One), mv("A2 B2"));
        assert_eq!(completed.len(), 2);
        assert_eq!(board.tally().player_one, 2);
    }

    #[test]
    fn test_trial_leaves_board_untouched() {
        let mut board = Board::new(3, 3).unwrap();
        board.apply(Owner::Other, mv("A1 B1"));
        board.apply(Owner::Other, mv("A1 A2"));
        board.apply(Owner::Other, mv("B1 B2"));
        let before = board.clone();

        let (after, completed) = board.trial(Owner::Player(Player::One), mv("A2 B2"));
        assert_eq!(board, before, "Trial must not mutate the original board");
        assert_eq!(completed.len(), 1);
        assert_eq!(
            after.cell(0, 0).owner(),
            Some(Owner::Player(Player::One))
        );
    }

    #[test]
    fn test_outcome_requires_full_board() {
        let mut board = Board::new(3, 3).unwrap();
        let one = Owner::Player(Player::One);
        for y in 1..=4 {
            board.apply(Owner::Other, Move::horizontal(y - 1, 0, 3));
        }
        for x in 0..3 {
            assert_eq!(board.outcome(), Outcome::Undecided);
            board.apply(one, Move::vertical(x, 0, 3));
        }
        assert_eq!(board.outcome(), Outcome::Undecided);
        board.apply(Owner::Player(Player::Two), Move::vertical(3, 0, 3));
        let tally = board.tally();
        assert_eq!(tally.player_one, 6);
        assert_eq!(tally.player_two, 3);
        assert!(board.is_full());
        assert_eq!(board.outcome(), Outcome::Winner(Player::One));
    }

    #[test]
    fn test_outcome_ignores_neutral_cells() {
        let tally = OwnershipTally {
            player_one: 2,
            player_two: 2,
            other: 5,
            unowned: 0,
        };
        assert_eq!(Board::outcome_of(&tally), Outcome::Tie);
        let tally = OwnershipTally {
            unowned: 1,
            ..tally
        };
        assert_eq!(Board::outcome_of(&tally), Outcome::Undecided);
    }

    #[test]
    #[should_panic(expected = "does not fit")]
    fn test_apply_rejects_out_of_bounds_move() {
        let mut board = Board::new(3, 3).unwrap();
        board.apply(Owner::Other, mv("A1 A5"));
    }

    #[test]
    fn test_display() {
        let mut board = Board::new(3, 3).unwrap();
        board.apply(Owner::Other, mv("A1 B1"));
        board.apply(Owner::Other, mv("A1 A2"));
        board.apply(Owner::Other, mv("B1 B2"));
        board.apply(Owner::Player(Player::Two), mv("A2 B2"));
        let expected = [
            "*-* * *", "|2|    ", "*-* * *", "       ", "* * * *", "       ", "* * * *", "",
        ]
        .join("\n");
        assert_eq!(board.to_string(), expected);
    }

    #[test]
    fn test_serde_compact_form() {
        let mut board = Board::new(3, 4).unwrap();
        board.apply(Owner::Other, mv("A1 B1"));
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(json, r#""3x4:01,00,00,00,00,00,00,00,00,00,00,00""#);
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(back, board);

        assert!(serde_json::from_str::<Board>(r#""3x3:01""#).is_err());
        // Interior edge recorded on one side only.
        assert!(
            serde_json::from_str::<Board>(r#""3x3:04,00,00,00,00,00,00,00,00""#).is_err()
        );
    }
}
