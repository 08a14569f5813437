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

//! Shared library behind the three `magpie-cli` binaries (`magpie`,
//! `autoplay`, `convert`): the command-surface parser, the `set`-command
//! config, resource loading, and the session that ties them to
//! `magpie-core`/`magpie-engine`.

pub mod command;
pub mod config;
pub mod console;
pub mod error;
pub mod notation;
pub mod resources;
pub mod session;
pub mod ucgi;
