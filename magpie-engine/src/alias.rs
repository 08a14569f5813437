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

//! Walker's alias method: O(1)
//! weighted sampling after an O(n) setup, used by the inference engine to
//! draw a Monte-Carlo opponent rack from the weighted candidate-leave
//! distribution it accumulates.

use rand::Rng;

/// A table supporting O(1) weighted sampling over `n` outcomes, built once
/// from `n` relative weights (Vose's algorithm, a numerically stable
/// variant of Walker's original construction).
#[derive(Clone, Debug)]
pub struct AliasTable {
    /// `prob[i]` is the probability (scaled into `[0, 1]`) of landing on
    /// outcome `i` directly, rather than its alias, when bucket `i` is hit.
    prob: Vec<f64>,
    /// `alias[i]` is the outcome bucket `i` defers to when the coin flip
    /// misses `prob[i]`.
    alias: Vec<usize>,
}

impl AliasTable {
    /// Build a table from `n` nonnegative weights. Weights need not sum to
    /// 1; they are normalized internally. Panics if `weights` is empty or
    /// every weight is zero (the caller's candidate-leave accumulation
    /// never produces either — every accepted candidate has a positive
    /// multinomial draw count).
    #[must_use]
    pub fn new(weights: &[f64]) -> Self {
        let n = weights.len();
        assert!(n > 0, "alias table requires at least one outcome");
        let total: f64 = weights.iter().sum();
        assert!(total > 0.0, "alias table requires positive total weight");

        let mut scaled: Vec<f64> = weights.iter().map(|&w| w / total * n as f64).collect();
        let mut prob = vec![0.0; n];
        let mut alias = vec![0usize; n];

        let mut small: Vec<usize> = Vec::new();
        let mut large: Vec<usize> = Vec::new();
        for (i, &p) in scaled.iter().enumerate() {
            if p < 1.0 {
                small.push(i);
            } else {
                large.push(i);
            }
        }

        while let (Some(s), Some(l)) = (small.pop(), large.pop()) {
            prob[s] = scaled[s];
            alias[s] = l;
            scaled[l] = (scaled[l] + scaled[s]) - 1.0;
            if scaled[l] < 1.0 {
                small.push(l);
            } else {
                large.push(l);
            }
        }
        // Leftover buckets (from floating-point rounding) always resolve to
        // certain self-selection.
        for i in large {
            prob[i] = 1.0;
        }
        for i in small {
            prob[i] = 1.0;
        }

        AliasTable { prob, alias }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.prob.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prob.is_empty()
    }

    /// Draw one outcome index in O(1).
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let n = self.prob.len();
        let i = rng.gen_range(0..n);
        if rng.gen::<f64>() < self.prob[i] {
            i
        } else {
            self.alias[i]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn uniform_weights_sample_every_bucket() {
        let table = AliasTable::new(&[1.0, 1.0, 1.0, 1.0]);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let mut seen = [0u32; 4];
        for _ in 0..4000 {
            seen[table.sample(&mut rng)] += 1;
        }
        for count in seen {
            assert!(count > 500, "expected roughly uniform draws, got {seen:?}");
        }
    }

    #[test]
    fn skewed_weights_favor_heavy_bucket() {
        let table = AliasTable::new(&[100.0, 1.0, 1.0]);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(2);
        let mut heavy = 0;
        for _ in 0..2000 {
            if table.sample(&mut rng) == 0 {
                heavy += 1;
            }
        }
        assert!(heavy > 1800);
    }

    #[test]
    fn single_outcome_always_selected() {
        let table = AliasTable::new(&[5.0]);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        for _ in 0..10 {
            assert_eq!(table.sample(&mut rng), 0);
        }
    }
}
