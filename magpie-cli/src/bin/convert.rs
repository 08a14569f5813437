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

//! Standalone resource converter, for scripted use outside
//! a REPL session: `convert --kind words2kwg wordlist.txt out.kwg`.

use clap::Parser;
use magpie_cli::resources;
use magpie_core::kwg::Kwg;
use magpie_core::letters::LetterDistribution;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "convert", about = "Convert between lexicon/leave resource formats")]
struct Args {
    infile: String,
    outfile: String,
    /// `words2kwg` (a newline-separated word list to a packed `.kwg`).
    #[arg(long, default_value = "words2kwg")]
    kind: String,
    #[arg(long, default_value = "english")]
    ld: String,
}

fn run(args: &Args) -> Result<(), String> {
    let ld: LetterDistribution = resources::load_letter_distribution(&args.ld).map_err(|e| e.to_string())?;
    match args.kind.as_str() {
        "words2kwg" => {
            let text = std::fs::read_to_string(&args.infile).map_err(|e| e.to_string())?;
            let words: Vec<Vec<_>> = text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(|w| {
                    w.chars()
                        .filter_map(|c| ld.machine_letter_for_glyph(c))
                        .collect()
                })
                .collect();
            log::debug!("words2kwg: converting {} words from {}", words.len(), args.infile);
            let kwg = Kwg::from_words(&words);
            resources::save_kwg(&kwg, &args.outfile).map_err(|e| e.to_string())
        }
        other => Err(format!("unknown conversion kind `{other}`")),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    log::info!("convert starting: {} -> {} ({})", args.infile, args.outfile, args.kind);
    match run(&args) {
        Ok(()) => {
            log::info!("convert finished successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("convert failed: {e}");
            eprintln!("error: {e}");
            ExitCode::from(40)
        }
    }
}
