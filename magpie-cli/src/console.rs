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

//! The human-readable console REPL: same command surface as UCGI,
//! but rendered as plain sentences instead of `info`/`bestmove` lines.
//! Reads from `-infile` if set, else stdin; writes to `-outfile` if set,
//! else stdout.

use crate::command::{self, Command};
use crate::notation;
use crate::session::{Output, Session};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

fn render(out: &mut impl Write, session: &Session, output: Output) {
    let ld = session.letter_distribution();
    match output {
        Output::Ack => {
            let _ = writeln!(out, "ok");
        }
        Output::Moves(moves) => {
            for mv in &moves {
                let _ = writeln!(
                    out,
                    "{:>3}  {}  eq {:.2}",
                    mv.score(),
                    notation::format_move(mv, ld),
                    mv.equity()
                );
            }
        }
        Output::Sim(results) => {
            for (mv, stats) in results.candidates.iter().zip(&results.stats) {
                let _ = writeln!(
                    out,
                    "{}  mean {:.3} +/- {:.3}  win {:.1}%",
                    notation::format_move(mv, ld),
                    stats.mean(),
                    stats.stderr(),
                    stats.win_pct() * 100.0
                );
            }
        }
        Output::Infer(results) => {
            for rack in &results.leave_racks {
                let _ = writeln!(
                    out,
                    "{}  weight {:.6}",
                    notation::format_rack(&rack.leave, ld),
                    rack.weight
                );
            }
            let _ = writeln!(out, "{} unique leave(s)", results.unique_leaves);
        }
        Output::Endgame(result) => {
            let pv: Vec<String> = result
                .pv
                .iter()
                .map(|mv| notation::format_move(mv, ld))
                .collect();
            let _ = writeln!(
                out,
                "spread {} at depth {} ({} nodes): {}",
                result.spread,
                result.depth_reached,
                result.nodes,
                pv.join(" ")
            );
        }
        Output::Autoplay(results) => {
            let _ = writeln!(out, "played {} game(s)", results.len());
            for (i, r) in results.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "  game {}: {:?} in {} turns, scores {:?}",
                    i + 1,
                    r.end_reason,
                    r.turns,
                    r.final_scores
                );
            }
        }
        Output::Converted { infile, outfile } => {
            let _ = writeln!(out, "converted {infile} -> {outfile}");
        }
        Output::Quit => {}
    }
}

/// Run the console REPL, reading commands from `reader` and writing
/// responses/errors to `writer` until `quit`/`exit` or EOF. Returns the
/// process exit code of the last error encountered, or 0 if every command
/// succeeded.
pub fn run(mut session: Session, reader: impl BufRead, mut writer: impl Write) -> i32 {
    let mut exit_code = 0;
    for line in reader.lines() {
        let Ok(line) = line else { break };
        let command = match command::parse_line(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                log::warn!("console: failed to parse line: {e}");
                let _ = writeln!(writer, "error: {e}");
                exit_code = e.exit_code();
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        match session.execute(command) {
            Ok(output) => render(&mut writer, &session, output),
            Err(e) => {
                log::error!("console: command execution failed: {e}");
                let _ = writeln!(writer, "error: {e}");
                exit_code = e.exit_code();
            }
        }
    }
    exit_code
}

/// Build the reader for console mode: `-infile` if set, else stdin.
pub fn reader_for(infile: Option<&str>) -> io::Result<Box<dyn BufRead>> {
    match infile {
        Some(path) => Ok(Box::new(BufReader::new(File::open(path)?))),
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

/// Build the writer for console mode: `-outfile` if set, else stdout.
pub fn writer_for(outfile: Option<&str>) -> io::Result<Box<dyn Write>> {
    match outfile {
        Some(path) => Ok(Box::new(File::create(path)?)),
        None => Ok(Box::new(io::stdout())),
    }
}
