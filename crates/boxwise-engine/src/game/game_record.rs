//! Plain-text game record.
//!
//! ```text
//! 1 3 4          <player to move> <height> <width>
//! 1 2 59.5       <slot 1> <score> <time left>
//! 2 0 60         <slot 2> <score> <time left>
//! 0 A1 C1        <mover tag> <from> <to>, one line per drawn segment
//! 1 B1 B2
//! ```
//!
//! Mover tag `0` marks neutral start-position lines. Replaying every line onto
//! an empty board reproduces the position.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    Board, GameRecordErrorKind, GameState, Move, Owner, ParseGameRecordError, Player, PlayerClock,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedMove {
    pub mover: Owner,
    pub mv: Move,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub to_move: Player,
    pub width: u8,
    pub height: u8,
    pub clocks: [PlayerClock; 2],
    pub moves: Vec<RecordedMove>,
}

impl GameRecord {
    #[must_use]
    pub fn new(width: u8, height: u8, to_move: Player) -> Self {
        Self {
            to_move,
            width,
            height,
            clocks: [PlayerClock::default(); 2],
            moves: vec![],
        }
    }

    pub fn push(&mut self, mover: Owner, mv: Move) {
        self.moves.push(RecordedMove { mover, mv });
    }

    /// Rebuilds the game state by replaying every recorded line.
    pub fn replay(&self) -> Result<GameState, ParseGameRecordError> {
        let mut board =
            Board::new(self.width, self.height).map_err(|e| ParseGameRecordError {
                line: 1,
                kind: GameRecordErrorKind::BoardSize(e),
            })?;
        for (i, recorded) in self.moves.iter().enumerate() {
            board.check_move(recorded.mv).map_err(|e| ParseGameRecordError {
                line: i + 4,
                kind: GameRecordErrorKind::IllegalMove(e),
            })?;
            board.apply(recorded.mover, recorded.mv);
        }
        Ok(GameState::with_clocks(board, self.to_move, self.clocks))
    }
}

impl fmt::Display for GameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {} {}", self.to_move, self.height, self.width)?;
        for player in Player::ALL {
            let clock = self.clocks[player.index()];
            writeln!(f, "{player} {} {}", clock.score, clock.time_left)?;
        }
        for RecordedMove { mover, mv } in &self.moves {
            writeln!(f, "{mover} {mv}")?;
        }
        Ok(())
    }
}

fn fields<const N: usize>(
    line_no: usize,
    line: Option<&str>,
) -> Result<[&str; N], ParseGameRecordError> {
    let error = |kind| ParseGameRecordError {
        line: line_no,
        kind,
    };
    let line = line.ok_or_else(|| error(GameRecordErrorKind::MissingLine))?;
    let parts = line.split_whitespace().collect::<Vec<_>>();
    let actual = parts.len();
    <[&str; N]>::try_from(parts).map_err(|_| {
        error(GameRecordErrorKind::FieldCount {
            expected: N,
            actual,
        })
    })
}

fn number<T: FromStr>(line_no: usize, text: &str) -> Result<T, ParseGameRecordError> {
    text.parse().map_err(|_| ParseGameRecordError {
        line: line_no,
        kind: GameRecordErrorKind::InvalidNumber {
            text: text.to_owned(),
        },
    })
}

impl FromStr for GameRecord {
    type Err = ParseGameRecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines();
        let [to_move, height, width] = fields(1, lines.next())?;
        let to_move = Player::try_from(number::<u8>(1, to_move)?).map_err(|e| {
            ParseGameRecordError {
                line: 1,
                kind: GameRecordErrorKind::PlayerTag(e),
            }
        })?;
        let mut record = Self::new(number(1, width)?, number(1, height)?, to_move);

        for player in Player::ALL {
            let line_no = player.index() + 2;
            let [slot, score, time_left] = fields(line_no, lines.next())?;
            let slot = number::<u8>(line_no, slot)?;
            if slot != player.tag() {
                return Err(ParseGameRecordError {
                    line: line_no,
                    kind: GameRecordErrorKind::UnexpectedSlot {
                        expected: player.tag(),
                        actual: slot,
                    },
                });
            }
            record.clocks[player.index()] = PlayerClock {
                score: number(line_no, score)?,
                time_left: number(line_no, time_left)?,
            };
        }

        for (i, line) in lines.enumerate() {
            let line_no = i + 4;
            if line.trim().is_empty() {
                continue;
            }
            let error = |kind| ParseGameRecordError {
                line: line_no,
                kind,
            };
            let (tag, segment) = line
                .trim()
                .split_once(char::is_whitespace)
                .ok_or_else(|| {
                    error(GameRecordErrorKind::FieldCount {
                        expected: 3,
                        actual: 1,
                    })
                })?;
            let mover = Owner::try_from(number::<u8>(line_no, tag)?)
                .map_err(|e| error(GameRecordErrorKind::PlayerTag(e)))?;
            let mv = segment
                .parse::<Move>()
                .map_err(|e| error(GameRecordErrorKind::Move(e)))?;
            record.push(mover, mv);
        }
        Ok(record)
    }
}
