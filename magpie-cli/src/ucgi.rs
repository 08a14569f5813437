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

//! The UCGI loop: a line-oriented wire protocol in the mold of UCI
//! chess engines. Every command from the caller is one line on stdin;
//! every reply is one or more `info ...`/`bestmove ...` lines on stdout,
//! flushed immediately so a driving GUI never blocks waiting on buffering.

use crate::command;
use crate::error::CliError;
use crate::notation;
use crate::session::{Output, Session};
use std::io::{self, BufRead, Write};

const ENGINE_NAME: &str = "magpie";

fn print_line(out: &mut impl Write, line: &str) {
    let _ = writeln!(out, "{line}");
    let _ = out.flush();
}

fn print_error(out: &mut impl Write, err: &CliError) {
    log::error!("ucgi: {err}");
    print_line(out, &format!("info error {} {}", err.exit_code(), err));
}

fn render(out: &mut impl Write, session: &Session, output: Output) {
    let ld = session.letter_distribution();
    match output {
        Output::Ack => {}
        Output::Moves(moves) => {
            for mv in &moves {
                print_line(
                    out,
                    &format!(
                        "info currmove {} sc {} eq {:.2}",
                        notation::format_move(mv, ld),
                        mv.score(),
                        mv.equity()
                    ),
                );
            }
            if let Some(best) = moves.first() {
                print_line(out, &format!("bestmove {}", notation::format_move(best, ld)));
            } else {
                print_line(out, "bestmove pass");
            }
        }
        Output::Sim(results) => {
            let mut best_idx = 0;
            for (i, (mv, stats)) in results.candidates.iter().zip(&results.stats).enumerate() {
                print_line(
                    out,
                    &format!(
                        "info currmove {} sc {} mean {:.3} stderr {:.3} winpct {:.3}",
                        notation::format_move(mv, ld),
                        mv.score(),
                        stats.mean(),
                        stats.stderr(),
                        stats.win_pct()
                    ),
                );
                if stats.mean() > results.stats[best_idx].mean() {
                    best_idx = i;
                }
            }
            if let Some(best) = results.candidates.get(best_idx) {
                print_line(out, &format!("bestmove {}", notation::format_move(best, ld)));
            }
        }
        Output::Infer(results) => {
            for rack in &results.leave_racks {
                print_line(
                    out,
                    &format!(
                        "info leave {} weight {:.6}",
                        notation::format_rack(&rack.leave, ld),
                        rack.weight
                    ),
                );
            }
            print_line(
                out,
                &format!("info uniqueleaves {}", results.unique_leaves),
            );
        }
        Output::Endgame(result) => {
            let pv: Vec<String> = result
                .pv
                .iter()
                .map(|mv| notation::format_move(mv, ld))
                .collect();
            print_line(
                out,
                &format!(
                    "info depth {} nodes {} spread {} pv {}",
                    result.depth_reached,
                    result.nodes,
                    result.spread,
                    pv.join(" ")
                ),
            );
            if let Some(first) = result.pv.first() {
                print_line(out, &format!("bestmove {}", notation::format_move(first, ld)));
            } else {
                print_line(out, "bestmove pass");
            }
        }
        Output::Autoplay(results) => {
            print_line(out, &format!("info autoplay games {}", results.len()));
        }
        Output::Converted { infile, outfile } => {
            print_line(out, &format!("info string converted {infile} to {outfile}"));
        }
        Output::Quit => {}
    }
}

/// Run the UCGI loop over stdin/stdout until `quit`/`exit` or EOF.
pub fn run(mut session: Session) {
    log::info!("ucgi loop starting");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let trimmed = line.trim();
        match trimmed {
            "ucgi" => {
                print_line(&mut stdout, &format!("id name {ENGINE_NAME}"));
                print_line(&mut stdout, "ucgiok");
                continue;
            }
            "isready" => {
                print_line(&mut stdout, "readyok");
                continue;
            }
            _ => {}
        }
        let command = match command::parse_line(trimmed) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                print_error(&mut stdout, &e);
                continue;
            }
        };
        if command == crate::command::Command::Quit {
            break;
        }
        match session.execute(command) {
            Ok(output) => render(&mut stdout, &session, output),
            Err(e) => print_error(&mut stdout, &e),
        }
    }
}
