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

//! The static evaluator: equity = score + leave value (+ endgame
//! adjustments). This module owns the combination step only; score itself
//! is computed by the move generator as it descends the board, and
//! leave value comes from the KLV.

use crate::klv::Klv;
use crate::rack::Rack;
use crate::winpct::WinPctTable;

/// Tiles remaining in the bag at or below which the simulation engine
/// starts consulting the win-percentage table instead of raw spread.
pub const ENDGAME_ADJUST_THRESHOLD_TILES: usize = 7;

/// `score + leave_value(leave)`. This is the equity every placement and
/// exchange candidate is ranked by during move generation.
#[must_use]
pub fn equity(score: i32, leave: &Rack, klv: &Klv) -> f64 {
    f64::from(score) + klv.leave_value(leave)
}

/// Equity adjusted by the endgame win-percentage table when few tiles
/// remain in the bag. `bag_tiles` and
/// `unseen_tiles` describe the position *before* this move; `my_spread`
/// is the on-turn player's score spread after the move.
#[must_use]
pub fn equity_with_endgame_adjustment(
    score: i32,
    leave: &Rack,
    klv: &Klv,
    bag_tiles: usize,
    my_spread: i32,
    my_tiles_on_rack: usize,
    opp_tiles_on_rack: usize,
    win_pct: Option<&WinPctTable>,
) -> f64 {
    let base = equity(score, leave, klv);
    if bag_tiles > ENDGAME_ADJUST_THRESHOLD_TILES {
        return base;
    }
    match win_pct {
        Some(table) => {
            let p = table.win_percentage(my_spread, bag_tiles, my_tiles_on_rack, opp_tiles_on_rack);
            // Blend the learned leave-based equity with the empirical win
            // percentage, scaled back into equity units so both terms are
            // commensurate with ordinary mid-game equities.
            base * 0.5 + (p - 0.5) * 100.0
        }
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::letters::english;
    use std::collections::HashMap;

    #[test]
    fn equity_is_score_plus_leave() {
        let ld = english();
        let mut leave = Rack::for_distribution(&ld);
        let s = ld.machine_letter_for_glyph('S').unwrap();
        leave.add(s);
        let mut map = HashMap::new();
        map.insert(leave.canonical_key().to_vec(), 3.5);
        let klv = Klv::from_map(map);
        assert!((equity(20, &leave, &klv) - 23.5).abs() < 1e-9);
    }

    #[test]
    fn endgame_adjustment_noop_with_full_bag() {
        let ld = english();
        let leave = Rack::for_distribution(&ld);
        let klv = Klv::from_map(HashMap::new());
        let e = equity_with_endgame_adjustment(10, &leave, &klv, 50, 0, 7, 7, None);
        assert!((e - 10.0).abs() < 1e-9);
    }
}
