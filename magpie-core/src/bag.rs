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

//! The bag: a multiset of machine letters with reproducible seeded draw.

use crate::letters::{LetterDistribution, MachineLetter};
use crate::rack::Rack;
use rand::{seq::SliceRandom, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// A shuffled multiset of tiles plus the RNG stream that produced (and will
/// continue) its draw order. Draws come off the end of `tiles`, so refilling
/// never needs to shift elements.
#[derive(Clone)]
pub struct Bag {
    tiles: Vec<MachineLetter>,
    rng: Xoshiro256PlusPlus,
}

impl Bag {
    /// Build a full bag from a letter distribution's initial population,
    /// shuffled with the given seed. Every simulation/inference worker
    /// derives its own seed from the parent by splitting this generator
    /// (see [`Bag::split`]), never by re-seeding from system entropy, so a
    /// run is reproducible end to end.
    #[must_use]
    pub fn new(ld: &LetterDistribution, seed: u64) -> Self {
        let mut tiles = Vec::with_capacity(ld.total_tiles() as usize);
        for ml in 0..ld.alphabet_size() as MachineLetter {
            for _ in 0..ld.initial_count(ml) {
                tiles.push(ml);
            }
        }
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        tiles.shuffle(&mut rng);
        Bag { tiles, rng }
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[must_use]
    pub fn count(&self, ml: MachineLetter) -> usize {
        self.tiles.iter().filter(|&&t| t == ml).count()
    }

    /// Draw one tile, or `None` if the bag is empty.
    pub fn draw_one(&mut self) -> Option<MachineLetter> {
        self.tiles.pop()
    }

    /// Draw up to `n` tiles (fewer if the bag runs out first).
    pub fn draw(&mut self, n: usize) -> Vec<MachineLetter> {
        let k = n.min(self.tiles.len());
        self.tiles.split_off(self.tiles.len() - k)
    }

    /// Draw exactly enough tiles to refill `rack` to `capacity`, mutating
    /// the rack in place and returning the drawn tiles.
    pub fn refill_rack(&mut self, rack: &mut Rack, capacity: u8) -> Vec<MachineLetter> {
        let need = capacity.saturating_sub(rack.num_tiles()) as usize;
        let drawn = self.draw(need);
        for &ml in &drawn {
            rack.add(ml);
        }
        drawn
    }

    /// Remove one specific tile from the bag, wherever it sits, for callers
    /// that need a named letter rather than an arbitrary draw (simulation's
    /// known-opponent-rack constraint). Returns `false` if none remain.
    pub fn take_letter(&mut self, ml: MachineLetter) -> bool {
        if let Some(pos) = self.tiles.iter().position(|&t| t == ml) {
            self.tiles.remove(pos);
            true
        } else {
            false
        }
    }

    /// Return tiles to the bag (used by exchange, and by unplay/undo), and
    /// reshuffle so the next draw is still uniformly random over everything
    /// currently in the bag.
    pub fn put_back(&mut self, letters: &[MachineLetter]) {
        self.tiles.extend_from_slice(letters);
        self.tiles.shuffle(&mut self.rng);
    }

    /// A `Rack`-shaped view of the bag's current contents, used by
    /// inference to reconstruct "every tile the inferrer cannot see".
    #[must_use]
    pub fn as_rack(&self, alphabet_size: usize) -> Rack {
        Rack::from_letters(alphabet_size, &self.tiles)
    }

    /// Derive an independent child stream for a parallel worker by jumping
    /// the generator's state ahead by a large, fixed polynomial (`long_jump`
    /// on a Xoshiro256++ stream gives 2^192 non-overlapping subsequences).
    /// This is what makes simulation and inference reproducible across
    /// thread counts: workers claim indices in order and each owns a
    /// disjoint RNG subsequence, so interleaving never perturbs the result.
    #[must_use]
    pub fn split(&mut self) -> Xoshiro256PlusPlus {
        let child = self.rng.clone();
        self.rng.long_jump();
        child
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::letters::english;

    #[test]
    fn full_bag_has_100_tiles() {
        let ld = english();
        let bag = Bag::new(&ld, 42);
        assert_eq!(bag.remaining(), 100);
    }

    #[test]
    fn draw_reduces_count() {
        let ld = english();
        let mut bag = Bag::new(&ld, 1);
        let drawn = bag.draw(7);
        assert_eq!(drawn.len(), 7);
        assert_eq!(bag.remaining(), 93);
    }

    #[test]
    fn put_back_restores_total() {
        let ld = english();
        let mut bag = Bag::new(&ld, 7);
        let drawn = bag.draw(7);
        bag.put_back(&drawn);
        assert_eq!(bag.remaining(), 100);
    }

    #[test]
    fn same_seed_same_draw() {
        let ld = english();
        let mut a = Bag::new(&ld, 99);
        let mut b = Bag::new(&ld, 99);
        assert_eq!(a.draw(10), b.draw(10));
    }

    #[test]
    fn take_letter_removes_exactly_one() {
        let ld = english();
        let mut bag = Bag::new(&ld, 3);
        let a = ld.machine_letter_for_glyph('A').unwrap();
        let before = bag.count(a);
        assert!(bag.take_letter(a));
        assert_eq!(bag.count(a), before - 1);
        assert_eq!(bag.remaining(), 99);
    }

    #[test]
    fn split_streams_are_independent_but_deterministic() {
        let ld = english();
        let mut bag = Bag::new(&ld, 123);
        let mut child1 = bag.split();
        let mut bag2 = Bag::new(&ld, 123);
        let mut child1_again = bag2.split();
        // Splitting twice from the same seeded bag state gives the same
        // first child stream both times.
        use rand::RngCore;
        assert_eq!(child1.next_u64(), child1_again.next_u64());
    }
}
