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

//! The move: a tagged record `{ Placement, Exchange, Pass }`.

use crate::board::Direction;
use crate::letters::MachineLetter;
use crate::rack::RACK_SIZE;

/// The maximum number of tiles a single placement's sequence can hold.
pub const MAX_PLACEMENT_TILES: usize = 16;

/// A sentinel equity lower than any real move's equity, used by
/// [`Pass`](Move::Pass) so a `MoveList` sorted descending by equity always
/// ranks a genuine pass last.
pub const PASS_EQUITY_SENTINEL: f64 = f64::NEG_INFINITY;

/// One tile in a placement's sequence: either a fresh tile from the rack,
/// or the marker for a square the board already held a tile on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacedTile {
    /// A tile newly placed from the rack. `is_blank` means a blank was
    /// assigned to stand in for this letter.
    New {
        letter: MachineLetter,
        is_blank: bool,
    },
    /// This square already held a tile; `PLAYED_THROUGH_MARKER` in the
    /// wire format, carried here as the letter actually on the board so
    /// scoring does not need to re-consult the board.
    PlayedThrough(MachineLetter),
}

impl PlacedTile {
    #[must_use]
    pub fn letter(self) -> MachineLetter {
        match self {
            PlacedTile::New { letter, .. } => letter,
            PlacedTile::PlayedThrough(letter) => letter,
        }
    }

    #[must_use]
    pub fn is_new(self) -> bool {
        matches!(self, PlacedTile::New { .. })
    }
}

/// A candidate action: place tiles, exchange tiles, or pass.
#[derive(Clone, Debug, PartialEq)]
pub enum Move {
    Place {
        start_row: u8,
        start_col: u8,
        direction: Direction,
        tiles: Vec<PlacedTile>,
        score: i32,
        equity: f64,
    },
    Exchange {
        tiles: Vec<MachineLetter>,
        equity: f64,
    },
    Pass {
        equity: f64,
    },
}

impl Move {
    #[must_use]
    pub fn pass() -> Self {
        Move::Pass {
            equity: PASS_EQUITY_SENTINEL,
        }
    }

    #[must_use]
    pub fn equity(&self) -> f64 {
        match self {
            Move::Place { equity, .. } | Move::Exchange { equity, .. } | Move::Pass { equity } => {
                *equity
            }
        }
    }

    pub fn set_equity(&mut self, new_equity: f64) {
        match self {
            Move::Place { equity, .. } | Move::Exchange { equity, .. } | Move::Pass { equity } => {
                *equity = new_equity;
            }
        }
    }

    #[must_use]
    pub fn score(&self) -> i32 {
        match self {
            Move::Place { score, .. } => *score,
            Move::Exchange { .. } | Move::Pass { .. } => 0,
        }
    }

    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Move::Pass { .. })
    }

    #[must_use]
    pub fn is_exchange(&self) -> bool {
        matches!(self, Move::Exchange { .. })
    }

    #[must_use]
    pub fn is_placement(&self) -> bool {
        matches!(self, Move::Place { .. })
    }

    /// Number of tiles newly placed from the rack (0 for exchange/pass).
    #[must_use]
    pub fn tiles_played(&self) -> usize {
        match self {
            Move::Place { tiles, .. } => tiles.iter().filter(|t| t.is_new()).count(),
            Move::Exchange { .. } | Move::Pass { .. } => 0,
        }
    }

    /// Whether this placement uses every tile of a full rack (a bingo),
    /// which the static evaluator awards a bonus for.
    #[must_use]
    pub fn is_bingo(&self) -> bool {
        self.tiles_played() == RACK_SIZE
    }
}
