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

//! The `set` command: a tokenizer over `-flag value` pairs, parsed
//! into one [`Config`] the way a central options struct holds search
//! tunables. This is the in-process command surface, not `argv` —
//! `bin/main.rs` parses its own process arguments with `clap` separately
//! and feeds the rest of the line here.

use magpie_core::game::{BackupMode, ChallengeRule};
use magpie_core::movegen::movelist::{RecordPolicy, SortKey};
use magpie_core::movegen::GameVariant;

/// Which front end is driving the engine (`-mode console|ucgi`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrontEndMode {
    Console,
    Ucgi,
}

/// One player's sort/record preference (`-s1`/`-r1`, `-s2`/`-r2`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerMoveGenPolicy {
    pub sort_key: SortKey,
    pub record_policy: RecordPolicy,
}

impl Default for PlayerMoveGenPolicy {
    fn default() -> Self {
        PlayerMoveGenPolicy {
            sort_key: SortKey::Equity,
            record_policy: RecordPolicy::Best,
        }
    }
}

/// The full set of tunables the `set` command can override. Fields
/// mirror the flag names directly so round-tripping a command string is a
/// straight lookup rather than a translation table.
#[derive(Clone, Debug)]
pub struct Config {
    pub lexicon_name: String,
    pub letter_distribution_name: String,
    pub board_layout_name: String,
    pub variant: GameVariant,
    pub bingo_bonus: i32,
    pub player_policy: [PlayerMoveGenPolicy; 2],
    pub num_plays: usize,
    pub threads: usize,
    pub max_iterations: u64,
    pub bai_confidence_pct: Option<f64>,
    pub plies: usize,
    pub epsilon: f64,
    pub win_pct_name: String,
    pub infile: Option<String>,
    pub outfile: Option<String>,
    pub mode: FrontEndMode,
    pub seed: u64,
    pub info_cadence: u64,
    pub check_cadence: u64,
    pub challenge_rule: ChallengeRule,
    pub backup_mode: BackupMode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            lexicon_name: "CSW21".to_string(),
            letter_distribution_name: "english".to_string(),
            board_layout_name: "standard15".to_string(),
            variant: GameVariant::Classic,
            bingo_bonus: 50,
            player_policy: [PlayerMoveGenPolicy::default(), PlayerMoveGenPolicy::default()],
            num_plays: 1,
            threads: 1,
            max_iterations: 10_000,
            bai_confidence_pct: None,
            plies: 2,
            epsilon: 0.25,
            win_pct_name: "default".to_string(),
            infile: None,
            outfile: None,
            mode: FrontEndMode::Console,
            seed: 0,
            info_cadence: 0,
            check_cadence: 0,
            challenge_rule: ChallengeRule::Void,
            backup_mode: BackupMode::Off,
        }
    }
}

/// An unrecognized flag, a flag missing its value, or a value that could
/// not be parsed into the type the flag expects.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown option `-{0}`")]
    UnknownFlag(String),
    #[error("option `-{0}` is missing its value")]
    MissingValue(String),
    #[error("option `-{flag}` has an invalid value `{value}`")]
    InvalidValue { flag: String, value: String },
}

fn parse_sort_key(v: &str) -> Option<SortKey> {
    match v {
        "score" => Some(SortKey::Score),
        "equity" => Some(SortKey::Equity),
        _ => None,
    }
}

fn parse_record_policy(v: &str) -> Option<RecordPolicy> {
    match v {
        "all" => Some(RecordPolicy::All),
        "best" => Some(RecordPolicy::Best),
        "small" => Some(RecordPolicy::SmallWindow { epsilon: 0.0 }),
        _ => None,
    }
}

impl Config {
    /// Apply every `-flag value` pair in `line` on top of the existing
    /// config, returning the first parse error encountered (flags are
    /// processed left to right, so a later flag can still override an
    /// earlier one even if a middle one fails — the caller decides whether
    /// a partially-applied config is usable).
    pub fn apply(&mut self, line: &str) -> Result<(), ConfigError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let mut i = 0;
        while i < tokens.len() {
            let flag = tokens[i]
                .strip_prefix('-')
                .ok_or_else(|| ConfigError::UnknownFlag(tokens[i].to_string()))?;
            let value = tokens
                .get(i + 1)
                .ok_or_else(|| ConfigError::MissingValue(flag.to_string()))?;
            self.apply_one(flag, value)?;
            i += 2;
        }
        Ok(())
    }

    fn apply_one(&mut self, flag: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            flag: flag.to_string(),
            value: value.to_string(),
        };
        match flag {
            "lex" => self.lexicon_name = value.to_string(),
            "ld" => self.letter_distribution_name = value.to_string(),
            "bdn" => self.board_layout_name = value.to_string(),
            "var" => {
                self.variant = match value {
                    "classic" => GameVariant::Classic,
                    "wordsmog" => GameVariant::Wordsmog,
                    _ => return Err(invalid()),
                }
            }
            "bb" => self.bingo_bonus = value.parse().map_err(|_| invalid())?,
            "s1" => {
                self.player_policy[0].sort_key = parse_sort_key(value).ok_or_else(invalid)?
            }
            "s2" => {
                self.player_policy[1].sort_key = parse_sort_key(value).ok_or_else(invalid)?
            }
            "r1" => {
                self.player_policy[0].record_policy =
                    parse_record_policy(value).ok_or_else(invalid)?
            }
            "r2" => {
                self.player_policy[1].record_policy =
                    parse_record_policy(value).ok_or_else(invalid)?
            }
            "numplays" => self.num_plays = value.parse().map_err(|_| invalid())?,
            "threads" => self.threads = value.parse().map_err(|_| invalid())?,
            "i" => self.max_iterations = value.parse().map_err(|_| invalid())?,
            "cond" => self.bai_confidence_pct = Some(value.parse().map_err(|_| invalid())?),
            "plies" => self.plies = value.parse().map_err(|_| invalid())?,
            "eq" => self.epsilon = value.parse().map_err(|_| invalid())?,
            "winpct" => self.win_pct_name = value.to_string(),
            "infile" => self.infile = Some(value.to_string()),
            "outfile" => self.outfile = Some(value.to_string()),
            "mode" => {
                self.mode = match value {
                    "console" => FrontEndMode::Console,
                    "ucgi" => FrontEndMode::Ucgi,
                    _ => return Err(invalid()),
                }
            }
            "seed" => self.seed = value.parse().map_err(|_| invalid())?,
            "info" => self.info_cadence = value.parse().map_err(|_| invalid())?,
            "check" => self.check_cadence = value.parse().map_err(|_| invalid())?,
            _ => return Err(ConfigError::UnknownFlag(flag.to_string())),
        }
        Ok(())
    }

    /// Best-arm-identification confidence as a z-score, for
    /// [`magpie_engine::sim::SimArgs::bai_confidence_z`]. `-cond` is
    /// expressed as a percentage (e.g. `99`); this is a coarse two-point
    /// table rather than an inverse-normal-CDF implementation, which is
    /// adequate for the handful of confidence levels operators actually
    /// use.
    #[must_use]
    pub fn bai_confidence_z(&self) -> Option<f64> {
        self.bai_confidence_pct.map(|pct| {
            if pct >= 99.0 {
                2.576
            } else if pct >= 95.0 {
                1.960
            } else {
                1.645
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_known_flags() {
        let mut cfg = Config::default();
        cfg.apply("-lex NWL20 -threads 4 -var wordsmog").unwrap();
        assert_eq!(cfg.lexicon_name, "NWL20");
        assert_eq!(cfg.threads, 4);
        assert_eq!(cfg.variant, GameVariant::Wordsmog);
    }

    #[test]
    fn rejects_unknown_flag() {
        let mut cfg = Config::default();
        assert_eq!(
            cfg.apply("-bogus 1"),
            Err(ConfigError::UnknownFlag("bogus".to_string()))
        );
    }

    #[test]
    fn rejects_malformed_number() {
        let mut cfg = Config::default();
        assert!(cfg.apply("-threads abc").is_err());
    }
}
