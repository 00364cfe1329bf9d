use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{CellDecodeError, PlayerTagError};

// Raw cell byte layout, compatible with the legacy board dumps.
const EDGE_MASK: u8 = 0b0000_1111;
const OWNED_BY_OTHER: u8 = 0b0010_0000;
const OWNED_BY_PLAYER_TWO: u8 = 0b0100_0000;
const OWNED_BY_PLAYER_ONE: u8 = 0b1000_0000;
const OWNER_MASK: u8 = OWNED_BY_PLAYER_ONE | OWNED_BY_PLAYER_TWO | OWNED_BY_OTHER;

/// Set of drawn sides of a cell.
///
/// # Bit Layout
///
/// - Bit 0: top
/// - Bit 1: right
/// - Bit 2: bottom
/// - Bit 3: left
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edges {
    bits: u8,
}

impl Edges {
    pub const NONE: Self = Self { bits: 0 };
    pub const TOP: Self = Self { bits: 0b0001 };
    pub const RIGHT: Self = Self { bits: 0b0010 };
    pub const BOTTOM: Self = Self { bits: 0b0100 };
    pub const LEFT: Self = Self { bits: 0b1000 };
    pub const ALL: Self = Self { bits: EDGE_MASK };

    #[inline]
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.bits
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.bits & other.bits == other.bits
    }

    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.bits |= other.bits;
    }

    /// Number of drawn sides (0 to 4).
    #[inline]
    #[must_use]
    pub const fn count(self) -> u32 {
        self.bits.count_ones()
    }

    #[inline]
    #[must_use]
    pub const fn is_full(self) -> bool {
        self.bits == EDGE_MASK
    }
}

/// One of the two competing players.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum Player {
    #[display("1")]
    One,
    #[display("2")]
    Two,
}

impl Player {
    pub const ALL: [Self; 2] = [Self::One, Self::Two];

    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    /// Numeric tag used by the text formats (1 or 2).
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }

    /// Zero-based slot for per-player arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}

impl TryFrom<u8> for Player {
    type Error = PlayerTagError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            _ => Err(PlayerTagError { tag }),
        }
    }
}

/// Whoever draws a line, and therefore whoever owns the cells it completes.
///
/// [`Owner::Other`] is the neutral tag used for lines that are part of a start
/// position rather than a player's move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    Player(Player),
    Other,
}

impl Owner {
    /// Numeric tag used by the text formats (0 for neutral, else the player tag).
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Player(player) => player.tag(),
            Self::Other => 0,
        }
    }

    #[must_use]
    pub const fn player(self) -> Option<Player> {
        match self {
            Self::Player(player) => Some(player),
            Self::Other => None,
        }
    }

    const fn owner_bit(self) -> u8 {
        match self {
            Self::Player(Player::One) => OWNED_BY_PLAYER_ONE,
            Self::Player(Player::Two) => OWNED_BY_PLAYER_TWO,
            Self::Other => OWNED_BY_OTHER,
        }
    }
}

impl From<Player> for Owner {
    fn from(player: Player) -> Self {
        Self::Player(player)
    }
}

impl TryFrom<u8> for Owner {
    type Error = PlayerTagError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Self::Other),
            _ => Player::try_from(tag).map(Self::Player),
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// A single box of the grid.
///
/// A cell is owned exactly when all four of its sides are drawn; the owner is
/// whoever drew the completing line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    edges: Edges,
    owner: Option<Owner>,
}

impl Cell {
    pub const EMPTY: Self = Self {
        edges: Edges::NONE,
        owner: None,
    };

    #[inline]
    #[must_use]
    pub const fn edges(self) -> Edges {
        self.edges
    }

    #[inline]
    #[must_use]
    pub const fn owner(self) -> Option<Owner> {
        self.owner
    }

    #[inline]
    #[must_use]
    pub const fn edge_count(self) -> u32 {
        self.edges.count()
    }

    #[inline]
    #[must_use]
    pub const fn is_complete(self) -> bool {
        self.edges.is_full()
    }

    #[inline]
    pub(crate) fn draw(&mut self, edges: Edges) {
        self.edges.insert(edges);
    }

    /// Assigns the owner of a freshly completed cell.
    #[inline]
    pub(crate) fn claim(&mut self, owner: Owner) {
        debug_assert!(self.edges.is_full() && self.owner.is_none());
        self.owner = Some(owner);
    }

    /// Encodes the cell into the legacy one-byte form.
    #[must_use]
    pub const fn to_raw(self) -> u8 {
        let owner = match self.owner {
            Some(owner) => owner.owner_bit(),
            None => 0,
        };
        self.edges.bits | owner
    }

    /// Decodes the legacy one-byte form, rejecting unknown owner tags and
    /// cells that break the ownership rule.
    pub fn from_raw(raw: u8) -> Result<Self, CellDecodeError> {
        if raw & !(EDGE_MASK | OWNER_MASK) != 0 {
            return Err(CellDecodeError::ReservedBits { raw });
        }
        let owner = match raw & OWNER_MASK {
            0 => None,
            OWNED_BY_PLAYER_ONE => Some(Owner::Player(Player::One)),
            OWNED_BY_PLAYER_TWO => Some(Owner::Player(Player::Two)),
            OWNED_BY_OTHER => Some(Owner::Other),
            _ => return Err(CellDecodeError::AmbiguousOwner { raw }),
        };
        let edges = Edges {
            bits: raw & EDGE_MASK,
        };
        if edges.is_full() != owner.is_some() {
            return Err(CellDecodeError::OwnershipMismatch { raw });
        }
        Ok(Self { edges, owner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_count() {
        let mut edges = Edges::NONE;
        assert_eq!(edges.count(), 0);
        edges.insert(Edges::TOP);
        edges.insert(Edges::LEFT);
        edges.insert(Edges::TOP);
        assert_eq!(edges.count(), 2, "Inserting the same side twice counts once");
        assert!(edges.contains(Edges::LEFT));
        assert!(!edges.contains(Edges::RIGHT));
        edges.insert(Edges::RIGHT);
        edges.insert(Edges::BOTTOM);
        assert!(edges.is_full());
    }

    #[test]
    fn test_player_tags() {
        for player in Player::ALL {
            assert_eq!(Player::try_from(player.tag()), Ok(player));
            assert_eq!(player.opponent().opponent(), player);
        }
        assert_eq!(Owner::try_from(0), Ok(Owner::Other));
        assert_eq!(Owner::try_from(2), Ok(Owner::Player(Player::Two)));
        assert_eq!(Owner::try_from(3), Err(PlayerTagError { tag: 3 }));
    }

    #[test]
    fn test_raw_encoding() {
        let mut cell = Cell::EMPTY;
        cell.draw(Edges::TOP);
        cell.draw(Edges::RIGHT);
        assert_eq!(cell.to_raw(), 0b0011);
        assert_eq!(Cell::from_raw(0b0011), Ok(cell));

        cell.draw(Edges::ALL);
        cell.claim(Owner::Player(Player::One));
        assert_eq!(cell.to_raw(), 128 + 15);
        assert_eq!(Cell::from_raw(128 + 15), Ok(cell));
        assert_eq!(
            Cell::from_raw(32 + 15).map(Cell::owner),
            Ok(Some(Owner::Other))
        );
    }

    #[test]
    fn test_raw_decoding_rejects_invalid_bytes() {
        assert_eq!(
            Cell::from_raw(128 + 64 + 15),
            Err(CellDecodeError::AmbiguousOwner { raw: 128 + 64 + 15 })
        );
        assert_eq!(
            Cell::from_raw(16),
            Err(CellDecodeError::ReservedBits { raw: 16 })
        );
        assert_eq!(
            Cell::from_raw(64 + 7),
            Err(CellDecodeError::OwnershipMismatch { raw: 64 + 7 }),
            "An owned cell needs four edges"
        );
        assert_eq!(
            Cell::from_raw(15),
            Err(CellDecodeError::OwnershipMismatch { raw: 15 }),
            "A full cell needs an owner"
        );
    }
}
