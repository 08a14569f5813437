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

//! The front door's own error union: every [`magpie_core::error::MagpieError`]
//! plus the command-surface errors that only exist at this boundary
//! (unknown command, malformed `set` flags). Every variant still maps to
//! a stable exit code so `console`/`ucgi` can report `info error <code>
//! <message>` the same way a bare engine error does.

use crate::config::ConfigError;
use magpie_core::error::MagpieError;

#[derive(Clone, Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] MagpieError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("unrecognized command `{0}`")]
    UnknownCommand(String),
    #[error("command `{0}` is missing a required argument")]
    MissingArgument(String),
    #[error("no position is loaded; run `cgp <position>` first")]
    NoGameLoaded,
    #[error("`{0}` does not match any legal move in this position")]
    NoSuchMove(String),
    #[error("{0}")]
    Io(String),
}

impl CliError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Engine(e) => e.exit_code(),
            CliError::Config(_) => 50,
            CliError::UnknownCommand(_) => 51,
            CliError::MissingArgument(_) => 52,
            CliError::NoGameLoaded => 53,
            CliError::NoSuchMove(_) => 54,
            CliError::Io(_) => 40,
        }
    }
}
