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

//! The session: the one piece of state a console/UCGI front end holds
//! between commands — the active [`Config`], the shared immutable
//! resources it names, and the current [`Game`] (if any `cgp` has been
//! loaded yet). [`Session::execute`] is the single entry point both front
//! ends call; they differ only in how they render [`Output`].

use crate::command::Command;
use crate::config::{Config, FrontEndMode};
use crate::error::CliError;
use crate::notation;
use crate::resources;
use magpie_core::autoplay::{self, AutoplayResult};
use magpie_core::bag::Bag;
use magpie_core::board::Board;
use magpie_core::board_layout::{self, BoardLayout};
use magpie_core::cgp::CgpPosition;
use magpie_core::error::MagpieError;
use magpie_core::game::{Game, Player};
use magpie_core::klv::Klv;
use magpie_core::kwg::Kwg;
use magpie_core::letters::LetterDistribution;
use magpie_core::movegen::movelist::{MoveList, RecordPolicy, SortKey};
use magpie_core::movegen::mv::Move;
use magpie_core::thread_control::ThreadControl;
use magpie_engine::endgame::{self, EndgameArgs, EndgameResult};
use magpie_engine::infer::{self, InferArgs, InferenceResults, Observation};
use magpie_engine::sim::{self, SimArgs, SimResults};
use std::sync::Arc;

/// The outcome of one [`Session::execute`] call, rendered differently by
/// `console`/`ucgi`.
pub enum Output {
    Ack,
    Moves(Vec<Move>),
    Sim(SimResults),
    Infer(InferenceResults),
    Endgame(EndgameResult),
    Autoplay(Vec<AutoplayResult>),
    Converted { infile: String, outfile: String },
    Quit,
}

pub struct Session {
    pub config: Config,
    ld: Arc<LetterDistribution>,
    kwg: Arc<Kwg>,
    klv: Arc<Klv>,
    layout: BoardLayout,
    control: Arc<ThreadControl>,
    game: Option<Game>,
}

impl Session {
    /// Build a session from `config`, loading the named letter
    /// distribution and board layout eagerly (they are cheap built-in
    /// presets or small CSVs) and the lexicon's `.kwg`/`.klv` lazily —
    /// commands that don't need a lexicon (`set`, `quit`) should work on a
    /// checkout with no lexicon data installed at all.
    pub fn new(config: Config) -> Result<Self, CliError> {
        let ld = Arc::new(
            resources::load_letter_distribution(&config.letter_distribution_name)
                .map_err(MagpieError::from)?,
        );
        let layout = board_layout::by_name(&config.board_layout_name).map_err(MagpieError::from)?;
        let kwg = Arc::new(Kwg::from_words(&[]));
        let klv = Arc::new(Klv::from_map(std::collections::HashMap::new()));
        Ok(Session {
            config,
            ld,
            kwg,
            klv,
            layout,
            control: Arc::new(ThreadControl::new()),
            game: None,
        })
    }

    fn reload_lexicon(&mut self) -> Result<(), CliError> {
        let kwg_path = resources::kwg_path(&self.config.lexicon_name);
        let klv_path = resources::klv_path(&self.config.lexicon_name);
        log::debug!("reloading lexicon `{}`", self.config.lexicon_name);
        self.kwg = Arc::new(resources::load_kwg(&kwg_path).map_err(MagpieError::from)?);
        self.klv = Arc::new(resources::load_klv(&klv_path).map_err(MagpieError::from)?);
        Ok(())
    }

    fn game(&self) -> Result<&Game, CliError> {
        self.game.as_ref().ok_or(CliError::NoGameLoaded)
    }

    fn game_mut(&mut self) -> Result<&mut Game, CliError> {
        self.game.as_mut().ok_or(CliError::NoGameLoaded)
    }

    pub fn execute(&mut self, command: Command) -> Result<Output, CliError> {
        let result = match &command {
            Command::Set(line) => {
                self.config.apply(line)?;
                Ok(Output::Ack)
            }
            Command::Cgp(line) => self.cgp(line),
            Command::Moves(tokens) => self.moves(tokens),
            Command::Gen => self.gen(),
            Command::Sim => self.sim(None),
            Command::SimK(rack) => self.sim(Some(rack.clone())),
            Command::Infer {
                player,
                tiles,
                score,
                num_exch,
            } => self.infer(*player, tiles, *score, *num_exch),
            Command::Endgame { depth } => self.endgame(*depth),
            Command::Autoplay(n) => self.autoplay(*n),
            Command::Convert {
                infile,
                outfile,
                kind,
            } => self.convert(infile, outfile, kind),
            Command::Quit => Ok(Output::Quit),
        };
        if let Err(e) = &result {
            log::warn!("command failed: {e}");
        }
        result
    }

    fn cgp(&mut self, line: &str) -> Result<Output, CliError> {
        self.reload_lexicon()?;
        let ld = self.ld.clone();
        let pos = CgpPosition::parse(line, &ld).map_err(MagpieError::from)?;
        for (flag, value) in &pos.options {
            self.config.apply(&format!("-{flag} {value}"))?;
        }
        let mut board: Board = pos.to_board(&self.layout).map_err(MagpieError::from)?;
        board.recompute_all(&ld, &self.kwg);

        // A CGP string carries no bag contents directly; reconstruct it by
        // starting from a full bag and removing every tile the position
        // places on the board or in either rack.
        let mut bag = Bag::new(&ld, self.config.seed);
        for &ml in pos.rows.iter().flatten() {
            if ml != 0 {
                bag.take_letter(magpie_core::letters::unblank(ml));
            }
        }
        for (ml, count) in pos.rack1.iter() {
            for _ in 0..count {
                bag.take_letter(ml);
            }
        }
        for (ml, count) in pos.rack2.iter() {
            for _ in 0..count {
                bag.take_letter(ml);
            }
        }

        let mut p1 = Player::new("player1", pos.rack1.clone(), self.kwg.clone(), self.klv.clone());
        p1.score = pos.score1;
        p1.sort_key = self.config.player_policy[0].sort_key;
        p1.record_policy = self.config.player_policy[0].record_policy;
        let mut p2 = Player::new("player2", pos.rack2.clone(), self.kwg.clone(), self.klv.clone());
        p2.score = pos.score2;
        p2.sort_key = self.config.player_policy[1].sort_key;
        p2.record_policy = self.config.player_policy[1].record_policy;

        let mut game = Game::new(
            board,
            bag,
            vec![p1, p2],
            ld.clone(),
            self.config.variant,
            self.config.bingo_bonus,
        );
        // `Game` has no public setter for `consecutive_scoreless_turns`
        // (only `play` advances it); a freshly loaded CGP starts that
        // counter at 0 regardless of `pos.consecutive_scoreless`, since
        // CGP carries no event history to replay. A caller that cares
        // about the CGP's own counter reads `pos.consecutive_scoreless`
        // directly rather than through the loaded `Game`.
        game.set_backup_mode(self.config.backup_mode);
        self.game = Some(game);
        log::info!("cgp position loaded");
        Ok(Output::Ack)
    }

    /// Apply each notation token in turn by generating every legal move
    /// from the current position and matching the one whose rendered
    /// notation is identical, so the score this applies is always the
    /// generator's own (never recomputed by this front end).
    fn moves(&mut self, tokens: &[String]) -> Result<Output, CliError> {
        let ld = self.ld.clone();
        for token in tokens {
            let game = self.game_mut()?;
            let mut candidates = MoveList::new(4096, SortKey::Equity, RecordPolicy::All);
            game.generate_moves(&mut candidates);
            let found = candidates
                .into_sorted_vec()
                .into_iter()
                .find(|mv| notation::format_move(mv, &ld).eq_ignore_ascii_case(token));
            let mv = found.ok_or_else(|| CliError::NoSuchMove(token.clone()))?;
            game.play(&mv).map_err(CliError::from)?;
        }
        Ok(Output::Ack)
    }

    fn gen(&mut self) -> Result<Output, CliError> {
        let game = self.game()?;
        let policy = self.config.player_policy[game.on_turn()];
        let mut list = MoveList::new(self.config.num_plays.max(1), policy.sort_key, policy.record_policy);
        game.generate_moves(&mut list);
        Ok(Output::Moves(list.into_sorted_vec()))
    }

    fn sim(&mut self, known_rack: Option<String>) -> Result<Output, CliError> {
        let ld = self.ld.clone();
        let known_opponent_rack = known_rack
            .map(|s| notation::parse_rack(&s, &ld).ok_or_else(|| CliError::MissingArgument(s)))
            .transpose()?;
        let game = self.game()?;
        let policy = self.config.player_policy[game.on_turn()];
        let mut list = MoveList::new(self.config.num_plays.max(1), policy.sort_key, policy.record_policy);
        game.generate_moves(&mut list);
        let candidates = list.into_sorted_vec();
        let args = SimArgs {
            plies: self.config.plies,
            max_iterations: self.config.max_iterations,
            num_threads: self.config.threads,
            seed: self.config.seed,
            known_opponent_rack,
            bai_confidence_z: self.config.bai_confidence_z(),
            max_samples_per_arm: None,
            win_pct: Some(Arc::new(
                magpie_core::winpct::by_name(&self.config.win_pct_name).map_err(MagpieError::from)?,
            )),
        };
        let results = sim::simulate(game, &candidates, &args, &self.control).map_err(CliError::from)?;
        Ok(Output::Sim(results))
    }

    fn infer(
        &mut self,
        player: usize,
        tiles: &str,
        score: i32,
        num_exch: usize,
    ) -> Result<Output, CliError> {
        let ld = self.ld.clone();
        let observation = if num_exch > 0 {
            Observation::Exchange {
                count: num_exch,
                score,
            }
        } else {
            let played = notation::parse_tiles(tiles, &ld)
                .ok_or_else(|| CliError::MissingArgument(tiles.to_string()))?;
            Observation::Play {
                tiles: played,
                score,
            }
        };
        let game = self.game()?;
        let args = InferArgs {
            target_player: player,
            known_target_tiles: magpie_core::rack::Rack::new(ld.alphabet_size()),
            observation,
            epsilon: self.config.epsilon,
            num_threads: self.config.threads,
        };
        let results = infer::infer(game, &args, &self.control).map_err(CliError::from)?;
        Ok(Output::Infer(results))
    }

    fn endgame(&mut self, depth: u8) -> Result<Output, CliError> {
        let game = self.game()?;
        let args = EndgameArgs {
            max_depth: depth,
            num_threads: self.config.threads,
            ..EndgameArgs::default()
        };
        let result = endgame::solve(game, &args, &self.control, |_, _, _| {}).map_err(CliError::from)?;
        Ok(Output::Endgame(result))
    }

    fn autoplay(&mut self, n: u64) -> Result<Output, CliError> {
        let game = self.game()?;
        let seeds: Vec<u64> = (0..n).map(|i| self.config.seed.wrapping_add(i)).collect();
        let results = autoplay::play_n_games(game, &seeds).map_err(CliError::from)?;
        Ok(Output::Autoplay(results))
    }

    fn convert(&mut self, infile: &str, outfile: &str, kind: &str) -> Result<Output, CliError> {
        match kind {
            "words2kwg" => {
                let ld = self.ld.clone();
                let text = std::fs::read_to_string(infile).map_err(|e| CliError::Io(e.to_string()))?;
                let words: Vec<Vec<_>> = text
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(|w| {
                        w.chars()
                            .map(|c| ld.machine_letter_for_glyph(c).unwrap_or(0))
                            .collect()
                    })
                    .collect();
                let kwg = Kwg::from_words(&words);
                resources::save_kwg(&kwg, outfile).map_err(|e| CliError::Io(e.to_string()))?;
            }
            "klv2text" => {
                let klv = resources::load_klv(infile).map_err(MagpieError::from)?;
                // Round trips through the in-memory map representation;
                // `Klv` does not expose leave enumeration beyond its byte
                // form, so the text form here is just the hex dump of the
                // binary (good enough for a diff-friendly `convert`
                // sanity check, not a human leave table).
                let bytes = klv.to_bytes();
                let text: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
                std::fs::write(outfile, text).map_err(|e| CliError::Io(e.to_string()))?;
            }
            other => return Err(CliError::MissingArgument(format!("unknown convert type `{other}`"))),
        }
        Ok(Output::Converted {
            infile: infile.to_string(),
            outfile: outfile.to_string(),
        })
    }

    #[must_use]
    pub fn letter_distribution(&self) -> &LetterDistribution {
        &self.ld
    }

    #[must_use]
    pub fn game_ref(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    #[must_use]
    pub fn mode(&self) -> FrontEndMode {
        self.config.mode
    }
}
