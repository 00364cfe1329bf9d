//! Dots-and-boxes board model and game plumbing.
//!
//! - [`core`] holds the grid of cells, the line segments players draw and the
//!   enumeration of legal moves.
//! - [`game`] builds on top of it with per-game state, the textual game record
//!   and the random start-board generator.

pub use self::{core::*, game::*};

pub mod core;
pub mod game;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("board size {width}x{height} is outside the supported range 3..=8")]
pub struct BoardSizeError {
    pub width: u8,
    pub height: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown player tag {tag}")]
pub struct PlayerTagError {
    pub tag: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CellDecodeError {
    #[display("cell byte {raw:#04x} sets more than one owner bit")]
    AmbiguousOwner { raw: u8 },
    #[display("cell byte {raw:#04x} sets reserved bits")]
    ReservedBits { raw: u8 },
    #[display("cell byte {raw:#04x} breaks the ownership rule (owned iff four edges)")]
    OwnershipMismatch { raw: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    #[display("line from {from} to {to} is neither horizontal nor vertical")]
    Diagonal { from: Point, to: Point },
    #[display("line from {from} to {to} has zero length")]
    ZeroLength { from: Point, to: Point },
    #[display("line {mv} leaves the {width}x{height} board")]
    OutOfBounds { mv: Move, width: u8, height: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseMoveError {
    #[display("invalid point {text:?}")]
    InvalidPoint {
        #[error(not(source))]
        text: String,
    },
    #[display("expected two points separated by whitespace, got {text:?}")]
    WrongPointCount {
        #[error(not(source))]
        text: String,
    },
    #[display("{_0}")]
    InvalidLine(MoveError),
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("game record line {line}: {kind}")]
pub struct ParseGameRecordError {
    pub line: usize,
    pub kind: GameRecordErrorKind,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum GameRecordErrorKind {
    #[display("missing line")]
    MissingLine,
    #[display("expected {expected} fields, got {actual}")]
    FieldCount { expected: usize, actual: usize },
    #[display("invalid number {text:?}")]
    InvalidNumber {
        #[error(not(source))]
        text: String,
    },
    #[display("player slot must be {expected}, got {actual}")]
    UnexpectedSlot { expected: u8, actual: u8 },
    #[display("{_0}")]
    PlayerTag(PlayerTagError),
    #[display("{_0}")]
    BoardSize(BoardSizeError),
    #[display("{_0}")]
    Move(ParseMoveError),
    #[display("{_0}")]
    IllegalMove(MoveError),
}
