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

//! The endgame win-percentage table: an empirical
//! lookup from (spread, tiles left in bag, tiles on each rack) to the
//! probability the on-turn player wins the game. Loaded from a named
//! preset the same way a board layout is, so the simulation engine
//! and static evaluator share one table instead of each re-deriving an
//! approximation.

use crate::error::ResourceError;
use std::collections::HashMap;

/// Key: `(spread, bag_tiles, my_tiles, opp_tiles)`, clamped so the table
/// stays small; values beyond the clamp saturate to the table's edge.
#[derive(Clone, Debug)]
pub struct WinPctTable {
    name: String,
    values: HashMap<(i32, u8, u8, u8), f64>,
    max_bag_tiles: u8,
    spread_clamp: i32,
}

impl WinPctTable {
    /// Look up the probability that the on-turn player, with `my_spread`
    /// points ahead, `bag_tiles` left in the bag, and the given rack
    /// sizes, goes on to win. Falls back to a logistic approximation of
    /// spread alone for any key the table was not built with (every
    /// lookup is total).
    #[must_use]
    pub fn win_percentage(
        &self,
        my_spread: i32,
        bag_tiles: usize,
        my_tiles: usize,
        opp_tiles: usize,
    ) -> f64 {
        let spread = my_spread.clamp(-self.spread_clamp, self.spread_clamp);
        let bag = (bag_tiles as u8).min(self.max_bag_tiles);
        let my = my_tiles.min(u8::MAX as usize) as u8;
        let opp = opp_tiles.min(u8::MAX as usize) as u8;
        if let Some(&v) = self.values.get(&(spread, bag, my, opp)) {
            return v;
        }
        // Logistic fallback: centered on spread, steeper as fewer tiles
        // remain (the game is closer to being decided by what's visible).
        let steepness = 0.035 + 0.01 * (self.max_bag_tiles.saturating_sub(bag) as f64);
        1.0 / (1.0 + (-steepness * f64::from(spread)).exp())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build a table directly from entries (used by `convert` and tests;
    /// parsing the on-disk preset format is a front-end/builder concern
    /// out of scope here, matching how board layouts are handled).
    #[must_use]
    pub fn from_entries(
        name: &str,
        max_bag_tiles: u8,
        spread_clamp: i32,
        entries: HashMap<(i32, u8, u8, u8), f64>,
    ) -> Self {
        WinPctTable {
            name: name.to_string(),
            values: entries,
            max_bag_tiles,
            spread_clamp,
        }
    }
}

/// A built-in, coarse win-percentage table so the engine is useful without
/// an external preset file: a pure logistic curve over spread, tightening
/// as the bag empties.
#[must_use]
pub fn default_table() -> WinPctTable {
    WinPctTable::from_entries("default", 7, 200, HashMap::new())
}

/// Resolve a named preset.
pub fn by_name(name: &str) -> Result<WinPctTable, ResourceError> {
    match name {
        "default" => Ok(default_table()),
        other => Err(ResourceError::NotFound(format!(
            "unknown win-percentage table `{other}`"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_spread_is_fifty_fifty() {
        let table = default_table();
        let p = table.win_percentage(0, 7, 7, 7);
        assert!((p - 0.5).abs() < 1e-9);
    }

    #[test]
    fn positive_spread_favors_on_turn_player() {
        let table = default_table();
        let p = table.win_percentage(50, 2, 1, 1);
        assert!(p > 0.5);
    }

    #[test]
    fn explicit_entry_overrides_fallback() {
        let mut entries = HashMap::new();
        entries.insert((10, 5, 3, 3), 0.9);
        let table = WinPctTable::from_entries("custom", 7, 200, entries);
        assert_eq!(table.win_percentage(10, 5, 3, 3), 0.9);
    }
}
