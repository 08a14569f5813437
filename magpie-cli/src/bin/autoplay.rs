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

//! Standalone bulk self-play: load a fresh starting position for the
//! configured lexicon/board/distribution and autoplay it `n` times,
//! printing a one-line summary per game.

use clap::Parser;
use magpie_cli::config::Config;
use magpie_cli::resources;
use magpie_core::bag::Bag;
use magpie_core::board::Board;
use magpie_core::board_layout;
use magpie_core::game::{Game, Player};
use magpie_core::klv::Klv;
use magpie_core::rack::Rack;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "autoplay", about = "Bulk self-play regression runner")]
struct Args {
    /// How many independent games to play.
    #[arg(long, default_value_t = 100)]
    n: u64,
    #[arg(long, default_value = "CSW21")]
    lex: String,
    #[arg(long, default_value = "english")]
    ld: String,
    #[arg(long, default_value = "standard15")]
    bdn: String,
    #[arg(long, default_value_t = 1)]
    seed: u64,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    log::info!("autoplay starting: n={}, lex={}, ld={}, bdn={}", args.n, args.lex, args.ld, args.bdn);

    let ld = match resources::load_letter_distribution(&args.ld) {
        Ok(ld) => Arc::new(ld),
        Err(e) => {
            log::error!("failed to load letter distribution `{}`: {e}", args.ld);
            eprintln!("error: {e}");
            return ExitCode::from(40);
        }
    };
    let layout = match board_layout::by_name(&args.bdn) {
        Ok(l) => l,
        Err(e) => {
            log::error!("failed to load board layout `{}`: {e}", args.bdn);
            eprintln!("error: {e}");
            return ExitCode::from(40);
        }
    };
    let kwg = match resources::load_kwg(&resources::kwg_path(&args.lex)) {
        Ok(k) => Arc::new(k),
        Err(e) => {
            log::error!("failed to load kwg for lexicon `{}`: {e}", args.lex);
            eprintln!("error: {e}");
            return ExitCode::from(40);
        }
    };
    let klv = Arc::new(
        resources::load_klv(&resources::klv_path(&args.lex)).unwrap_or_else(|_| Klv::from_map(Default::default())),
    );

    let board = Board::new(&layout);
    let mut bag = Bag::new(&ld, args.seed);
    let rack1 = {
        let mut r = Rack::new(ld.alphabet_size());
        bag.refill_rack(&mut r, magpie_core::rack::RACK_SIZE as u8);
        r
    };
    let rack2 = {
        let mut r = Rack::new(ld.alphabet_size());
        bag.refill_rack(&mut r, magpie_core::rack::RACK_SIZE as u8);
        r
    };
    let players = vec![
        Player::new("player1", rack1, kwg.clone(), klv.clone()),
        Player::new("player2", rack2, kwg, klv),
    ];
    let template = Game::new(
        board,
        bag,
        players,
        ld,
        Config::default().variant,
        Config::default().bingo_bonus,
    );

    let seeds: Vec<u64> = (0..args.n).map(|i| args.seed.wrapping_add(i).wrapping_add(1)).collect();
    match magpie_core::autoplay::play_n_games(&template, &seeds) {
        Ok(results) => {
            for (i, r) in results.iter().enumerate() {
                println!(
                    "game {}: {:?} in {} turns, scores {:?}",
                    i + 1,
                    r.end_reason,
                    r.turns,
                    r.final_scores
                );
            }
            log::info!("autoplay finished: {} games played", results.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("autoplay run failed: {e}");
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
