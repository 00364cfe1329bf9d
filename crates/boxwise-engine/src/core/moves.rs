use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{MoveError, ParseMoveError};

/// A lattice point (dot). `x` ranges over `0..=width`, `y` over `0..=height`.
///
/// Displayed as a column letter followed by a one-based row, so `(0, 0)` is
/// `A1` and `(2, 1)` is `C2`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Point {
    pub x: u8,
    pub y: u8,
}

impl Point {
    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", char::from(b'A' + self.x), u32::from(self.y) + 1)
    }
}

impl FromStr for Point {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseMoveError::InvalidPoint {
            text: s.to_owned(),
        };
        let mut chars = s.chars();
        let column = chars.next().ok_or_else(invalid)?.to_ascii_uppercase();
        if !column.is_ascii_uppercase() {
            return Err(invalid());
        }
        let row: u8 = chars.as_str().parse().map_err(|_| invalid())?;
        if row == 0 {
            return Err(invalid());
        }
        let x = u8::try_from(column).map_err(|_| invalid())? - b'A';
        Ok(Self { x, y: row - 1 })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A straight segment between two lattice points.
///
/// Endpoints are stored in ascending order, so a move and its reverse compare
/// equal. The segment always spans at least one unit edge.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "MoveRepr", into = "MoveRepr")]
pub struct Move {
    from: Point,
    to: Point,
}

#[derive(Serialize, Deserialize)]
struct MoveRepr {
    from: Point,
    to: Point,
}

impl TryFrom<MoveRepr> for Move {
    type Error = MoveError;

    fn try_from(repr: MoveRepr) -> Result<Self, Self::Error> {
        Self::new(repr.from, repr.to)
    }
}

impl From<Move> for MoveRepr {
    fn from(mv: Move) -> Self {
        Self {
            from: mv.from,
            to: mv.to,
        }
    }
}

impl Move {
    /// Creates a segment, swapping endpoints if needed.
    pub fn new(from: Point, to: Point) -> Result<Self, MoveError> {
        if from == to {
            return Err(MoveError::ZeroLength { from, to });
        }
        if from.x != to.x && from.y != to.y {
            return Err(MoveError::Diagonal { from, to });
        }
        let (from, to) = if from <= to { (from, to) } else { (to, from) };
        Ok(Self { from, to })
    }

    /// Horizontal segment on lattice row `y` from column `from_x` to `to_x`.
    pub(crate) const fn horizontal(y: u8, from_x: u8, to_x: u8) -> Self {
        debug_assert!(from_x < to_x);
        Self {
            from: Point::new(from_x, y),
            to: Point::new(to_x, y),
        }
    }

    /// Vertical segment on lattice column `x` from row `from_y` to `to_y`.
    pub(crate) const fn vertical(x: u8, from_y: u8, to_y: u8) -> Self {
        debug_assert!(from_y < to_y);
        Self {
            from: Point::new(x, from_y),
            to: Point::new(x, to_y),
        }
    }

    #[must_use]
    pub const fn from(self) -> Point {
        self.from
    }

    #[must_use]
    pub const fn to(self) -> Point {
        self.to
    }

    #[must_use]
    pub const fn orientation(self) -> Orientation {
        if self.from.y == self.to.y {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        }
    }

    /// Number of unit edges the segment covers.
    #[must_use]
    pub const fn edge_count(self) -> u8 {
        match self.orientation() {
            Orientation::Horizontal => self.to.x - self.from.x,
            Orientation::Vertical => self.to.y - self.from.y,
        }
    }

    /// Checks that both endpoints lie on the lattice of a `width x height` board.
    pub fn check_bounds(self, width: u8, height: u8) -> Result<(), MoveError> {
        if self.to.x > width || self.to.y > height {
            return Err(MoveError::OutOfBounds {
                mv: self,
                width,
                height,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.from, self.to)
    }
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s.split_whitespace().collect::<Vec<_>>();
        let [from, to] = parts.as_slice() else {
            return Err(ParseMoveError::WrongPointCount { text: s.to_owned() });
        };
        Self::new(from.parse()?, to.parse()?).map_err(ParseMoveError::InvalidLine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_notation() {
        assert_eq!(Point::new(0, 0).to_string(), "A1");
        assert_eq!(Point::new(2, 1).to_string(), "C2");
        assert_eq!("I9".parse::<Point>(), Ok(Point::new(8, 8)));
        assert_eq!("c2".parse::<Point>(), Ok(Point::new(2, 1)));
        assert!("A0".parse::<Point>().is_err());
        assert!("1A".parse::<Point>().is_err());
        assert!("".parse::<Point>().is_err());
    }

    #[test]
    fn test_move_normalizes_endpoints() {
        let forward = Move::new(Point::new(0, 1), Point::new(3, 1)).unwrap();
        let backward = Move::new(Point::new(3, 1), Point::new(0, 1)).unwrap();
        assert_eq!(forward, backward);
        assert_eq!(backward.from(), Point::new(0, 1));
        assert_eq!(forward.edge_count(), 3);
        assert!(forward.orientation().is_horizontal());
    }

    #[test]
    fn test_move_rejects_bad_segments() {
        let p = Point::new(1, 1);
        assert_eq!(
            Move::new(p, p),
            Err(MoveError::ZeroLength { from: p, to: p })
        );
        assert!(matches!(
            Move::new(p, Point::new(2, 2)),
            Err(MoveError::Diagonal { .. })
        ));
        let mv = Move::new(Point::new(0, 0), Point::new(0, 4)).unwrap();
        assert!(mv.check_bounds(3, 4).is_ok());
        assert!(mv.check_bounds(3, 3).is_err());
    }

    #[test]
    fn test_move_text_form() {
        let mv: Move = "C1 A1".parse().unwrap();
        assert_eq!(mv.to_string(), "A1 C1");
        assert!(matches!(
            "A1".parse::<Move>(),
            Err(ParseMoveError::WrongPointCount { .. })
        ));
        assert!(matches!(
            "A1 B2".parse::<Move>(),
            Err(ParseMoveError::InvalidLine(MoveError::Diagonal { .. }))
        ));
    }

    #[test]
    fn test_move_serde_rejects_diagonal() {
        let json = r#"{"from":{"x":0,"y":0},"to":{"x":1,"y":1}}"#;
        assert!(serde_json::from_str::<Move>(json).is_err());
        let mv: Move = serde_json::from_str(r#"{"from":{"x":2,"y":0},"to":{"x":0,"y":0}}"#)
            .unwrap();
        assert_eq!(mv.from(), Point::new(0, 0));
    }
}
