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

//! The rack: a fixed-capacity multiset of machine letters.

use crate::letters::{unblank, LetterDistribution, MachineLetter};
use std::fmt;

/// The conventional maximum number of tiles a player holds at once.
pub const RACK_SIZE: usize = 7;

/// A fixed-capacity multiset of machine letters, stored as a dense
/// count-per-letter vector plus a running total so size queries are O(1).
///
/// Blanks are tracked unblanked: a rack never stores a blank already
/// assigned to a face (that assignment only exists once the blank has been
/// played). The count at index 0 is the number of unassigned blanks.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Rack {
    counts: Vec<u8>,
    num_tiles: u8,
}

impl Rack {
    #[must_use]
    pub fn new(alphabet_size: usize) -> Self {
        Rack {
            counts: vec![0; alphabet_size.max(1)],
            num_tiles: 0,
        }
    }

    #[must_use]
    pub fn for_distribution(ld: &LetterDistribution) -> Self {
        Self::new(ld.alphabet_size())
    }

    #[must_use]
    pub fn num_tiles(&self) -> u8 {
        self.num_tiles
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.num_tiles == 0
    }

    #[must_use]
    pub fn count(&self, ml: MachineLetter) -> u8 {
        self.counts.get(unblank(ml) as usize).copied().unwrap_or(0)
    }

    /// Add one tile of `ml` (blanks are stored unblanked).
    pub fn add(&mut self, ml: MachineLetter) {
        let idx = unblank(ml) as usize;
        self.counts[idx] += 1;
        self.num_tiles += 1;
    }

    /// Add `n` tiles of `ml`.
    pub fn add_n(&mut self, ml: MachineLetter, n: u8) {
        for _ in 0..n {
            self.add(ml);
        }
    }

    /// Remove one tile of `ml`. Returns `false` if none were present.
    pub fn take(&mut self, ml: MachineLetter) -> bool {
        let idx = unblank(ml) as usize;
        if self.counts[idx] == 0 {
            return false;
        }
        self.counts[idx] -= 1;
        self.num_tiles -= 1;
        true
    }

    /// Subtract every tile in `other` from `self`. Returns `false` (and
    /// leaves `self` unmodified) if `self` does not contain `other` as a
    /// sub-multiset.
    pub fn subtract(&mut self, other: &Rack) -> bool {
        if !self.contains(other) {
            return false;
        }
        for (idx, &c) in other.counts.iter().enumerate() {
            self.counts[idx] -= c;
        }
        self.num_tiles -= other.num_tiles;
        true
    }

    /// Whether `self` contains `other` as a sub-multiset.
    #[must_use]
    pub fn contains(&self, other: &Rack) -> bool {
        other
            .counts
            .iter()
            .enumerate()
            .all(|(idx, &c)| self.counts.get(idx).copied().unwrap_or(0) >= c)
    }

    /// Score of every tile on this rack (blanks score 0), used by the leave
    /// evaluator's canonical key and by end-rack scoring.
    #[must_use]
    pub fn score(&self, ld: &LetterDistribution) -> i32 {
        self.counts
            .iter()
            .enumerate()
            .map(|(ml, &c)| ld.score(ml as MachineLetter) * i32::from(c))
            .sum()
    }

    /// Iterate the distinct machine letters on this rack with their counts.
    pub fn iter(&self) -> impl Iterator<Item = (MachineLetter, u8)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(ml, &c)| (ml as MachineLetter, c))
    }

    /// Expand into a flat `Vec` of machine letters, one entry per tile.
    #[must_use]
    pub fn to_vec(&self) -> Vec<MachineLetter> {
        let mut out = Vec::with_capacity(self.num_tiles as usize);
        for (ml, c) in self.iter() {
            for _ in 0..c {
                out.push(ml);
            }
        }
        out
    }

    /// Build a rack directly from per-letter counts (index = machine
    /// letter), used by the inference engine's size-bounded multiset
    /// enumeration, which needs to construct many candidate racks without
    /// going through repeated [`Rack::add`] calls.
    #[must_use]
    pub fn from_counts(counts: Vec<u8>) -> Self {
        let num_tiles = counts.iter().map(|&c| u32::from(c)).sum::<u32>() as u8;
        Rack { counts, num_tiles }
    }

    /// Build a rack from a flat slice of machine letters.
    #[must_use]
    pub fn from_letters(alphabet_size: usize, letters: &[MachineLetter]) -> Self {
        let mut rack = Self::new(alphabet_size);
        for &ml in letters {
            rack.add(ml);
        }
        rack
    }

    /// A canonical hashable/orderable encoding: the dense count vector
    /// itself, which is already canonical (independent of insertion order).
    #[must_use]
    pub fn canonical_key(&self) -> &[u8] {
        &self.counts
    }

    /// Every nonempty sub-multiset of this rack, used by exchange
    /// generation and by inference's leave partitioning.
    /// Generated by recursive descent over letter counts so
    /// no sub-multiset is produced twice.
    #[must_use]
    pub fn sub_multisets(&self, include_empty: bool) -> Vec<Rack> {
        let entries: Vec<(MachineLetter, u8)> = self.iter().collect();
        let mut out = Vec::new();
        let mut current = vec![0u8; self.counts.len()];
        fn recurse(
            entries: &[(MachineLetter, u8)],
            idx: usize,
            current: &mut Vec<u8>,
            out: &mut Vec<Rack>,
        ) {
            if idx == entries.len() {
                out.push(Rack {
                    counts: current.clone(),
                    num_tiles: current.iter().map(|&c| u32::from(c)).sum::<u32>() as u8,
                });
                return;
            }
            let (ml, max_count) = entries[idx];
            for take in 0..=max_count {
                current[ml as usize] = take;
                recurse(entries, idx + 1, current, out);
            }
            current[ml as usize] = 0;
        }
        recurse(&entries, 0, &mut current, &mut out);
        if !include_empty {
            out.retain(|r| r.num_tiles > 0);
        }
        out
    }

    #[must_use]
    pub fn alphabet_size(&self) -> usize {
        self.counts.len()
    }
}

impl fmt::Display for Rack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} tiles: {:?}]", self.num_tiles, self.counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::letters::english;

    #[test]
    fn add_take_roundtrip() {
        let ld = english();
        let mut rack = Rack::for_distribution(&ld);
        let a = ld.machine_letter_for_glyph('A').unwrap();
        rack.add(a);
        assert_eq!(rack.count(a), 1);
        assert_eq!(rack.num_tiles(), 1);
        assert!(rack.take(a));
        assert_eq!(rack.num_tiles(), 0);
        assert!(!rack.take(a));
    }

    #[test]
    fn blank_stored_unblanked() {
        let ld = english();
        let mut rack = Rack::for_distribution(&ld);
        let a = ld.machine_letter_for_glyph('A').unwrap();
        rack.add(crate::letters::blank(a));
        assert_eq!(rack.count(0), 1);
        assert_eq!(rack.count(a), 1);
    }

    #[test]
    fn contains_and_subtract() {
        let ld = english();
        let mut rack = Rack::from_letters(
            ld.alphabet_size(),
            &[
                ld.machine_letter_for_glyph('M').unwrap(),
                ld.machine_letter_for_glyph('U').unwrap(),
                ld.machine_letter_for_glyph('Z').unwrap(),
            ],
        );
        let sub = Rack::from_letters(ld.alphabet_size(), &[ld.machine_letter_for_glyph('U').unwrap()]);
        assert!(rack.contains(&sub));
        assert!(rack.subtract(&sub));
        assert_eq!(rack.num_tiles(), 2);
    }

    #[test]
    fn from_counts_derives_num_tiles() {
        let ld = english();
        let mut counts = vec![0u8; ld.alphabet_size()];
        let a = ld.machine_letter_for_glyph('A').unwrap();
        counts[a as usize] = 3;
        let rack = Rack::from_counts(counts);
        assert_eq!(rack.num_tiles(), 3);
        assert_eq!(rack.count(a), 3);
    }

    #[test]
    fn sub_multisets_count() {
        let ld = english();
        let rack = Rack::from_letters(
            ld.alphabet_size(),
            &[
                ld.machine_letter_for_glyph('A').unwrap(),
                ld.machine_letter_for_glyph('A').unwrap(),
                ld.machine_letter_for_glyph('B').unwrap(),
            ],
        );
        // (0..=2 copies of A) * (0..=1 copies of B) = 6 sub-multisets including empty.
        let subs = rack.sub_multisets(true);
        assert_eq!(subs.len(), 6);
        assert_eq!(rack.sub_multisets(false).len(), 5);
    }
}
