/*
  MAGPIE, an engine for crossword board games of the Scrabble family.
  Copyright (C) 2024 The MAGPIE Authors.

  MAGPIE is free software: you can redistribute it and/or modify
  it under the terms of the GNU General Public License as published by
  the Free Software Foundation, either version 3 of the License, or
  (at your option) any later version.

  MAGPIE is distributed in the hope that it will be useful,
  but WITHOUT ANY WARRANTY; without even the implied warranty of
  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
  GNU General Public License for more details.

  You should have received a copy of the GNU General Public License
  along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/

//! The error taxonomy shared by every subsystem.
//!
//! Errors are never recovered from inside an engine call: detection happens
//! at the boundary (CGP/GCG parsing, move validation, engine preconditions),
//! and each error kind maps 1:1 to a process exit code so a UCGI or console
//! front end can report a stable `info error <code> <message>` line.

use std::fmt;

/// Errors produced while parsing or validating a CGP position string.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CgpError {
    #[error("CGP position has {found} board rows, expected {expected}")]
    WrongRowCount { found: usize, expected: usize },
    #[error("CGP board row {row} has the wrong width")]
    MalformedRow { row: usize },
    #[error("CGP position is missing a required field")]
    MissingField,
    #[error("CGP score field `{0}` is not a valid number")]
    MalformedNumber(String),
    #[error("CGP rack `{0}` overflows the rack capacity")]
    RackOverflow(String),
    #[error("unknown lexicon `{0}`")]
    UnknownLexicon(String),
    #[error("unrecognized game variant `{0}`")]
    UnknownVariant(String),
    #[error("letter distribution is incompatible with this board/lexicon")]
    IncompatibleLetterDistribution,
}

/// Errors produced while validating a candidate or recorded move.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("coordinates ({row}, {col}) are out of bounds")]
    InvalidCoordinates { row: i8, col: i8 },
    #[error("move places a tile out of bounds")]
    OutOfBounds,
    #[error("move is not connected to an existing tile or the opening square")]
    NotConnected,
    #[error("rack does not contain the tiles this move requires")]
    TilesNotInRack,
    #[error("played-through letter does not match the tile already on the board")]
    PlayedThroughMismatch,
    #[error("`{0}` is not a word in the active lexicon")]
    Phony(String),
    #[error("exchange requests more tiles than the bag can supply")]
    InsufficientExchangeTiles,
}

/// Errors that abort an engine call before any worker is spawned.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EnginePreconditionError {
    #[error("endgame solver requires an empty bag, but {0} tiles remain")]
    BagNotEmpty(usize),
    #[error("inference requires at least one played tile or exchange")]
    NoTilesPlayed,
    #[error("inference cannot take both a play and an exchange")]
    BothPlayAndExchange,
    #[error("exchanges require at least {required} tiles in the bag, found {found}")]
    ExchangeDisallowed { required: usize, found: usize },
    #[error("an exchange observation must score zero, found {0}")]
    ExchangeScoreNonzero(i32),
    #[error("the target's played/known tiles are not available in the bag")]
    TargetLettersNotInBag,
    #[error("a rack would exceed its capacity")]
    RackOverflow,
    #[error("challenging a move requires a backup mode that records it")]
    ChallengeRequiresBackup,
    #[error("there is no previous move to challenge")]
    NoMoveToChallenge,
    #[error("the bag cannot supply a rack of {needed} tiles for the opponent ({available} available)")]
    OpponentRackUnavailable { needed: usize, available: usize },
}

/// Errors reading an immutable resource file (`.kwg`, `.klv`, `.csv`).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("file could not be read: {0}")]
    Unreadable(String),
    #[error("file format is corrupt: {0}")]
    Corrupt(String),
}

/// Operational outcomes that are not errors but end a run early.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operational {
    /// The user (or a timer) requested cancellation.
    Interrupted,
    /// The configured iteration/depth limit was reached normally.
    LimitReached,
}

/// The union of every error kind the engine can surface, with a stable exit
/// code per variant.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MagpieError {
    #[error(transparent)]
    Cgp(#[from] CgpError),
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error(transparent)]
    Precondition(#[from] EnginePreconditionError),
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error("malformed number: {0}")]
    MalformedNumber(String),
}

impl MagpieError {
    /// The process exit code this error should produce.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            MagpieError::Cgp(_) => 10,
            MagpieError::Move(_) => 20,
            MagpieError::Precondition(_) => 30,
            MagpieError::Resource(_) => 40,
            MagpieError::MalformedNumber(_) => 11,
        }
    }
}

/// A chain of error context, innermost cause first, pushed as an engine call
/// unwinds. Mirrors the source's "stack of error records": detection
/// happens once, at the boundary, and every deeper frame narrates why the
/// call that wraps it failed.
#[derive(Clone, Debug, Default)]
pub struct ErrorContext {
    frames: Vec<String>,
}

impl ErrorContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a new context frame, describing why the enclosing call failed.
    pub fn push(&mut self, frame: impl Into<String>) {
        self.frames.push(frame.into());
    }

    #[must_use]
    pub fn frames(&self) -> &[String] {
        &self.frames
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, frame) in self.frames.iter().rev().enumerate() {
            if i == 0 {
                write!(f, "{frame}")?;
            } else {
                write!(f, "\n  caused by: {frame}")?;
            }
        }
        Ok(())
    }
}

pub type MagpieResult<T> = Result<T, MagpieError>;
