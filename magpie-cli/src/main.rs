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

//! `magpie`: the console/UCGI front door. Process arguments pick the
//! front end and any `-flag value` overrides to seed the initial
//! [`Config`] with before the REPL starts reading commands.

use clap::Parser;
use magpie_cli::config::{Config, FrontEndMode};
use magpie_cli::session::Session;
use magpie_cli::{console, ucgi};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "magpie", about = "Console and UCGI front door for the MAGPIE engine")]
struct Args {
    /// Front end to run: `console` (plain text) or `ucgi` (wire protocol).
    #[arg(long, default_value = "console")]
    mode: String,
    /// Read commands from this file instead of stdin (console mode only).
    #[arg(long)]
    infile: Option<String>,
    /// Write responses to this file instead of stdout (console mode only).
    #[arg(long)]
    outfile: Option<String>,
    /// Initial `set`-style overrides, e.g. `--set "-lex CSW21 -threads 4"`.
    #[arg(long)]
    set: Option<String>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    log::info!("magpie starting in {} mode", args.mode);

    let mut config = Config::default();
    config.mode = match args.mode.as_str() {
        "ucgi" => FrontEndMode::Ucgi,
        _ => FrontEndMode::Console,
    };
    config.infile = args.infile.clone();
    config.outfile = args.outfile.clone();
    if let Some(set_line) = &args.set {
        if let Err(e) = config.apply(set_line) {
            log::error!("initial --set line rejected: {e}");
            eprintln!("error: {e}");
            return ExitCode::from(50);
        }
    }

    let session = match Session::new(config.clone()) {
        Ok(s) => s,
        Err(e) => {
            log::error!("session setup failed: {e}");
            eprintln!("error: {e}");
            return ExitCode::from(e.exit_code() as u8);
        }
    };

    match config.mode {
        FrontEndMode::Ucgi => {
            ucgi::run(session);
            ExitCode::SUCCESS
        }
        FrontEndMode::Console => {
            let reader = match console::reader_for(config.infile.as_deref()) {
                Ok(r) => r,
                Err(e) => {
                    log::error!("failed to open input stream: {e}");
                    eprintln!("error: {e}");
                    return ExitCode::from(40);
                }
            };
            let writer = match console::writer_for(config.outfile.as_deref()) {
                Ok(w) => w,
                Err(e) => {
                    log::error!("failed to open output stream: {e}");
                    eprintln!("error: {e}");
                    return ExitCode::from(40);
                }
            };
            let code = console::run(session, reader, writer);
            log::info!("magpie exiting with code {code}");
            ExitCode::from(code as u8)
        }
    }
}
