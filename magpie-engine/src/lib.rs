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

//! `magpie-engine`: the three multi-worker search engines (simulation,
//! inference, endgame) built on top of `magpie-core`'s board, game and
//! move-generation primitives.
//!
//! Every engine here follows the same concurrency shape: a shared
//! [`magpie_core::thread_control::ThreadControl`] coordinates workers that
//! otherwise own a private, duplicated [`magpie_core::game::Game`]; workers
//! claim indices from a shared counter, observe a shared halt flag at
//! iteration boundaries, and combine their private results into one
//! accumulator only once every worker has stopped.

pub mod alias;
pub mod endgame;
pub mod infer;
pub mod sim;
