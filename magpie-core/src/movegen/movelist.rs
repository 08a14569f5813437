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

//! The move list: a bounded container over candidate moves,
//! backed by an in-place min-heap so that once capacity is reached the
//! lowest-ranked move is the one overwritten.

use super::mv::Move;
use std::cmp::Ordering;

/// Which moves a [`MoveList`] keeps once it reaches capacity (or once the
/// generator has decided the field of candidates for this call).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordPolicy {
    /// Keep every move offered, up to capacity.
    All,
    /// Keep only the single best move seen so far.
    Best,
    /// Keep every move within `epsilon` of the best equity seen so far.
    /// Moves that fall outside the window after a better move arrives are
    /// dropped on the next compaction.
    SmallWindow { epsilon: f64 },
}

/// The quantity moves are ranked by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    Score,
    Equity,
}

fn rank(m: &Move, key: SortKey) -> f64 {
    match key {
        SortKey::Score => f64::from(m.score()),
        SortKey::Equity => m.equity(),
    }
}

/// A min-heap entry: `rank` is cached so repeated comparisons during
/// sift-up/down don't need to re-derive it from the move.
struct Entry {
    rank: f64,
    mv: Move,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.rank == other.rank
    }
}
impl Eq for Entry {}
impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank.partial_cmp(&other.rank).unwrap_or(Ordering::Equal)
    }
}

/// A bounded, priority-ordered container of candidate moves.
///
/// Internally a binary min-heap over `rank`, so the lowest-ranked move is
/// always at index 0 and can be evicted in O(log n) when a better candidate
/// arrives after the list is full.
pub struct MoveList {
    capacity: usize,
    key: SortKey,
    policy: RecordPolicy,
    heap: Vec<Entry>,
    best_rank: f64,
}

impl MoveList {
    #[must_use]
    pub fn new(capacity: usize, key: SortKey, policy: RecordPolicy) -> Self {
        MoveList {
            capacity: capacity.max(1),
            key,
            policy,
            heap: Vec::with_capacity(capacity.min(256)),
            best_rank: f64::NEG_INFINITY,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The lowest rank currently kept, or `f64::NEG_INFINITY` if the list
    /// is not yet at capacity (anything at all is worth keeping).
    #[must_use]
    pub fn threshold(&self) -> f64 {
        if self.heap.len() < self.capacity {
            f64::NEG_INFINITY
        } else {
            self.heap[0].rank
        }
    }

    /// The best rank offered so far, used by [`RecordPolicy::SmallWindow`]
    /// to decide the current acceptance window and by the shadow pass
    /// to decide when a remaining anchor's bound can no
    /// longer beat what's already been found.
    #[must_use]
    pub fn best_rank(&self) -> f64 {
        self.best_rank
    }

    /// Offer a move to the list. It is kept according to the record policy
    /// and capacity; otherwise dropped. Returns whether it was kept.
    pub fn offer(&mut self, mv: Move) -> bool {
        let r = rank(&mv, self.key);
        if r > self.best_rank {
            self.best_rank = r;
        }
        match self.policy {
            RecordPolicy::Best => {
                if self.heap.is_empty() || r > self.heap[0].rank {
                    self.heap.clear();
                    self.heap.push(Entry { rank: r, mv });
                    return true;
                }
                false
            }
            RecordPolicy::SmallWindow { epsilon } => {
                let window_floor = self.best_rank - epsilon;
                if r < window_floor {
                    return false;
                }
                self.push_bounded(Entry { rank: r, mv });
                // Drop anything that fell out of the window now that
                // best_rank may have moved.
                self.heap.retain(|e| e.rank >= window_floor);
                self.reheapify();
                true
            }
            RecordPolicy::All => {
                self.push_bounded(Entry { rank: r, mv });
                true
            }
        }
    }

    fn push_bounded(&mut self, entry: Entry) {
        if self.heap.len() < self.capacity {
            self.heap.push(entry);
            self.sift_up(self.heap.len() - 1);
        } else if entry.rank > self.heap[0].rank {
            self.heap[0] = entry;
            self.sift_down(0);
        }
    }

    fn reheapify(&mut self) {
        for i in (0..self.heap.len() / 2).rev() {
            self.sift_down(i);
        }
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.heap[i].rank < self.heap[parent].rank {
                self.heap.swap(i, parent);
                i = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        loop {
            let (l, r) = (2 * i + 1, 2 * i + 2);
            let mut smallest = i;
            if l < self.heap.len() && self.heap[l].rank < self.heap[smallest].rank {
                smallest = l;
            }
            if r < self.heap.len() && self.heap[r].rank < self.heap[smallest].rank {
                smallest = r;
            }
            if smallest == i {
                break;
            }
            self.heap.swap(i, smallest);
            i = smallest;
        }
    }

    /// Drain every kept move, sorted best-first.
    #[must_use]
    pub fn into_sorted_vec(self) -> Vec<Move> {
        let mut entries = self.heap;
        entries.sort_by(|a, b| b.rank.partial_cmp(&a.rank).unwrap_or(Ordering::Equal));
        entries.into_iter().map(|e| e.mv).collect()
    }

    /// The current best move without draining the list, if any.
    #[must_use]
    pub fn best(&self) -> Option<&Move> {
        self.heap
            .iter()
            .max_by(|a, b| a.rank.partial_cmp(&b.rank).unwrap_or(Ordering::Equal))
            .map(|e| &e.mv)
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.best_rank = f64::NEG_INFINITY;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Direction;

    fn place(score: i32, equity: f64) -> Move {
        Move::Place {
            start_row: 7,
            start_col: 7,
            direction: Direction::Horizontal,
            tiles: vec![],
            score,
            equity,
        }
    }

    #[test]
    fn best_policy_keeps_only_top() {
        let mut list = MoveList::new(10, SortKey::Equity, RecordPolicy::Best);
        list.offer(place(10, 10.0));
        list.offer(place(5, 5.0));
        list.offer(place(20, 20.0));
        assert_eq!(list.len(), 1);
        assert_eq!(list.best().unwrap().score(), 20);
    }

    #[test]
    fn all_policy_respects_capacity() {
        let mut list = MoveList::new(2, SortKey::Score, RecordPolicy::All);
        list.offer(place(1, 1.0));
        list.offer(place(2, 2.0));
        list.offer(place(3, 3.0));
        assert_eq!(list.len(), 2);
        let sorted = list.into_sorted_vec();
        assert_eq!(sorted[0].score(), 3);
        assert_eq!(sorted[1].score(), 2);
    }

    #[test]
    fn small_window_drops_outside_epsilon() {
        let mut list = MoveList::new(10, SortKey::Equity, RecordPolicy::SmallWindow { epsilon: 5.0 });
        list.offer(place(10, 10.0));
        list.offer(place(4, 4.0)); // within window of 10 (>= 5.0)
        list.offer(place(0, 0.0)); // outside window, should be dropped
        let sorted = list.into_sorted_vec();
        assert_eq!(sorted.len(), 2);
        assert!(sorted.iter().all(|m| m.equity() >= 5.0));
    }

    #[test]
    fn threshold_is_neg_infinity_until_full() {
        let mut list = MoveList::new(3, SortKey::Score, RecordPolicy::All);
        assert_eq!(list.threshold(), f64::NEG_INFINITY);
        list.offer(place(1, 1.0));
        list.offer(place(2, 2.0));
        list.offer(place(3, 3.0));
        assert_eq!(list.threshold(), 1.0);
    }
}
