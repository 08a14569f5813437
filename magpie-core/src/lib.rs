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

//! `magpie-core`: the board, rack, bag, word graph, leave table, move
//! generator, static evaluator, game state and history that every MAGPIE
//! engine (simulation, inference, endgame — in `magpie-engine`) is built on.
//!
//! Shared immutable resources (letter distribution, word graph, leave
//! table, board layout, win-percentage table) are constructed once per
//! configuration and passed by reference. Per-game state (board, bag,
//! racks, move lists) is owned and duplicated whenever a worker needs its
//! own copy.

pub mod autoplay;
pub mod bag;
pub mod board;
pub mod board_layout;
pub mod cgp;
pub mod equity;
pub mod error;
pub mod game;
pub mod gcg;
pub mod history;
pub mod klv;
pub mod kwg;
pub mod letters;
pub mod movegen;
pub mod rack;
pub mod thread_control;
pub mod winpct;
