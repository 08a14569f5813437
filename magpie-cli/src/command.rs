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

//! The single-command-string surface: one command per invocation,
//! whitespace-tokenized, the first token selecting which of `cgp` /
//! `moves` / `gen` / `sim` / `simk` / `infer` / `autoplay` / `convert` /
//! `set` / `quit` runs. `endgame` is a supplement — the only way to
//! reach the endgame solver as its own top-level command, alongside
//! every other engine.

use crate::error::CliError;

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Set(String),
    Cgp(String),
    Moves(Vec<String>),
    Gen,
    Sim,
    SimK(String),
    Infer {
        player: usize,
        tiles: String,
        score: i32,
        num_exch: usize,
    },
    Endgame {
        depth: u8,
    },
    Autoplay(u64),
    Convert {
        infile: String,
        outfile: String,
        kind: String,
    },
    Quit,
}

/// Parse one line of the command surface. Blank lines and `#`-prefixed
/// comment lines parse to `None` rather than an error, matching a REPL's
/// ordinary treatment of empty input.
pub fn parse_line(line: &str) -> Result<Option<Command>, CliError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut parts = line.splitn(2, char::is_whitespace);
    let verb = parts.next().unwrap_or("");
    let rest = parts.next().unwrap_or("").trim();

    let command = match verb {
        "set" => Command::Set(rest.to_string()),
        "cgp" => Command::Cgp(rest.to_string()),
        "moves" => Command::Moves(rest.split_whitespace().map(str::to_string).collect()),
        "gen" => Command::Gen,
        "sim" => Command::Sim,
        "simk" => Command::SimK(rest.to_string()),
        "infer" => {
            let fields: Vec<&str> = rest.split_whitespace().collect();
            if fields.len() != 4 {
                return Err(CliError::MissingArgument(
                    "infer <player> <tiles> <score> <numexch>".to_string(),
                ));
            }
            let player: usize = fields[0]
                .parse()
                .map_err(|_| CliError::MissingArgument("infer player index".to_string()))?;
            let score: i32 = fields[2]
                .parse()
                .map_err(|_| CliError::MissingArgument("infer score".to_string()))?;
            let num_exch: usize = fields[3]
                .parse()
                .map_err(|_| CliError::MissingArgument("infer numexch".to_string()))?;
            Command::Infer {
                player,
                tiles: fields[1].to_string(),
                score,
                num_exch,
            }
        }
        "endgame" => {
            let depth: u8 = rest
                .parse()
                .map_err(|_| CliError::MissingArgument("endgame <depth>".to_string()))?;
            Command::Endgame { depth }
        }
        "autoplay" => {
            let n: u64 = rest
                .parse()
                .map_err(|_| CliError::MissingArgument("autoplay <n>".to_string()))?;
            Command::Autoplay(n)
        }
        "convert" => {
            let fields: Vec<&str> = rest.split_whitespace().collect();
            if fields.len() != 3 {
                return Err(CliError::MissingArgument(
                    "convert <in> <out> <type>".to_string(),
                ));
            }
            Command::Convert {
                infile: fields[0].to_string(),
                outfile: fields[1].to_string(),
                kind: fields[2].to_string(),
            }
        }
        "quit" | "exit" => Command::Quit,
        other => return Err(CliError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cgp_and_gen() {
        assert_eq!(
            parse_line("cgp 15/... rest").unwrap(),
            Some(Command::Cgp("15/... rest".to_string()))
        );
        assert_eq!(parse_line("gen").unwrap(), Some(Command::Gen));
    }

    #[test]
    fn parses_infer_fields() {
        let cmd = parse_line("infer 0 MUZAKS 52 0").unwrap().unwrap();
        assert_eq!(
            cmd,
            Command::Infer {
                player: 0,
                tiles: "MUZAKS".to_string(),
                score: 52,
                num_exch: 0,
            }
        );
    }

    #[test]
    fn blank_and_comment_lines_are_none() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("  # a comment").unwrap(), None);
    }

    #[test]
    fn unknown_verb_is_an_error() {
        assert!(matches!(
            parse_line("frobnicate"),
            Err(CliError::UnknownCommand(_))
        ));
    }
}
