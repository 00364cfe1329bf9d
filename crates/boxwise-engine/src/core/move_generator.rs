use super::{Board, Move};

/// Enumerates every legal move of `board` in a fixed order.
///
/// A legal move is any straight segment, of any length, whose unit edges are
/// all undrawn. Lattice rows `0..=height` are scanned first, then lattice
/// columns `0..=width`. Within a line every maximal run of undrawn unit edges
/// `[start, end)` yields all sub-segments `(i, j)` with `start <= i < j <= end`,
/// ordered by `i` then `j`, so a run of `n` edges gives `n * (n + 1) / 2` moves.
///
/// # Example
///
/// ```
/// use boxwise_engine::{Board, generate_moves};
///
/// let board = Board::new(3, 3).unwrap();
/// // 8 lines of 3 undrawn edges, 6 segments each.
/// assert_eq!(generate_moves(&board).len(), 48);
/// ```
#[must_use]
pub fn generate_moves(board: &Board) -> Vec<Move> {
    let (width, height) = (board.width(), board.height());
    let mut moves = Vec::new();
    for y in 0..=height {
        push_runs(
            width,
            |x| board.is_horizontal_edge_drawn(x, y),
            |i, j| Move::horizontal(y, i, j),
            &mut moves,
        );
    }
    for x in 0..=width {
        push_runs(
            height,
            |y| board.is_vertical_edge_drawn(x, y),
            |i, j| Move::vertical(x, i, j),
            &mut moves,
        );
    }
    moves
}

/// Splits one lattice line of `len` unit edges into undrawn runs and pushes
/// every segment inside each run.
fn push_runs(
    len: u8,
    is_drawn: impl Fn(u8) -> bool,
    make_move: impl Fn(u8, u8) -> Move,
    moves: &mut Vec<Move>,
) {
    let mut pos = 0;
    while pos < len {
        if is_drawn(pos) {
            pos += 1;
            continue;
        }
        let start = pos;
        while pos < len && !is_drawn(pos) {
            pos += 1;
        }
        let end = pos;
        for i in start..end {
            for j in i + 1..=end {
                moves.push(make_move(i, j));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Orientation, Owner, Point};

    fn mv(text: &str) -> Move {
        text.parse().unwrap()
    }

    #[test]
    fn test_empty_board_counts() {
        for (width, height) in [(3, 3), (4, 3), (8, 8)] {
            let board = Board::new(width, height).unwrap();
            let moves = generate_moves(&board);
            let row_moves = usize::from(width) * (usize::from(width) + 1) / 2;
            let column_moves = usize::from(height) * (usize::from(height) + 1) / 2;
            let expected = (usize::from(height) + 1) * row_moves
                + (usize::from(width) + 1) * column_moves;
            assert_eq!(moves.len(), expected, "{width}x{height} board");
        }
    }

    #[test]
    fn test_order_is_rows_then_columns() {
        let board = Board::new(3, 3).unwrap();
        let moves = generate_moves(&board);
        let first_row = moves[..6].iter().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(
            first_row,
            ["A1 B1", "A1 C1", "A1 D1", "B1 C1", "B1 D1", "C1 D1"]
        );
        let split = moves
            .iter()
            .position(|mv| mv.orientation() == Orientation::Vertical)
            .unwrap();
        assert_eq!(split, 4 * 6);
        assert!(moves[split..].iter().all(|mv| mv.orientation().is_vertical()));
        assert_eq!(moves[split], mv("A1 A2"));
    }

    #[test]
    fn test_drawn_edges_split_runs() {
        let mut board = Board::new(4, 3).unwrap();
        // Draw the second unit edge of lattice row 0: runs become [0,1) and [2,4).
        board.apply(Owner::Other, mv("B1 C1"));
        let row0 = generate_moves(&board)
            .into_iter()
            .filter(|mv| mv.orientation().is_horizontal() && mv.from().y == 0)
            .collect::<Vec<_>>();
        assert_eq!(row0.len(), 1 + 3);
        assert!(row0.iter().all(|m| {
            let (from, to) = (m.from().x, m.to().x);
            !(from <= 1 && to >= 2)
        }));
    }

    #[test]
    fn test_moves_only_cover_undrawn_edges() {
        let mut board = Board::new(3, 3).unwrap();
        board.apply(Owner::Other, mv("A1 D1"));
        board.apply(Owner::Other, mv("D1 D3"));
        for m in generate_moves(&board) {
            assert!(board.check_move(m).is_ok());
            let (from, to) = (m.from(), m.to());
            if m.orientation().is_horizontal() {
                for x in from.x..to.x {
                    assert!(!board.is_horizontal_edge_drawn(x, from.y), "{m} redraws an edge");
                }
            } else {
                for y in from.y..to.y {
                    assert!(!board.is_vertical_edge_drawn(from.x, y), "{m} redraws an edge");
                }
            }
        }
        let drawn = Move::new(Point::new(0, 0), Point::new(1, 0)).unwrap();
        assert!(!generate_moves(&board).contains(&drawn));
    }

    #[test]
    fn test_full_board_has_no_moves() {
        let mut board = Board::new(3, 3).unwrap();
        while let Some(&first) = generate_moves(&board).first() {
            board.apply(Owner::Other, first);
        }
        assert!(board.is_full());
        assert_eq!(board.tally().other, 9);
    }
}
