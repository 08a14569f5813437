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

//! The board: a square grid with per-square tile, bonus multiplier,
//! anchor flags, and per-direction cross-sets/cross-scores.
//!
//! Cross-sets and cross-scores are recomputed only for squares adjacent to
//! a placement, never globally. A `transposed` flag lets the move generator
//! reuse one direction's code for both orientations: `transpose()` swaps
//! the grid and swaps which per-direction table is "horizontal".

use crate::kwg::Kwg;
use crate::letters::{unblank, LetterDistribution, MachineLetter};

/// A per-square bonus multiplier, or a structural brick that cannot be
/// played through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bonus {
    None,
    DoubleLetter,
    TripleLetter,
    DoubleWord,
    TripleWord,
    Brick,
}

impl Bonus {
    #[must_use]
    pub fn letter_multiplier(self) -> i32 {
        match self {
            Bonus::DoubleLetter => 2,
            Bonus::TripleLetter => 3,
            _ => 1,
        }
    }

    #[must_use]
    pub fn word_multiplier(self) -> i32 {
        match self {
            Bonus::DoubleWord => 2,
            Bonus::TripleWord => 3,
            _ => 1,
        }
    }

    #[must_use]
    pub fn is_brick(self) -> bool {
        matches!(self, Bonus::Brick)
    }
}

/// A direction a word can run in. The board itself is only ever stored in
/// one orientation at a time; `Vertical` is realized by transposing the
/// board and operating in the `Horizontal` orientation underneath.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    #[must_use]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Horizontal => Direction::Vertical,
            Direction::Vertical => Direction::Horizontal,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Square {
    tile: MachineLetter,
    bonus: Bonus,
}

/// A bitmask over machine letters (including the blank at bit 0), wide
/// enough for [`crate::letters::MAX_ALPHABET_SIZE`].
pub type CrossSet = u64;

/// Every letter is allowed: used for squares with no perpendicular
/// neighbor, where any tile forms no perpendicular word to validate.
pub const CROSS_SET_ALL: CrossSet = u64::MAX;

#[derive(Clone, Debug)]
pub struct Board {
    dim: u8,
    squares: Vec<Square>,
    /// `cross_sets[dir as usize][row * dim + col]`.
    cross_sets: [Vec<CrossSet>; 2],
    cross_scores: [Vec<i32>; 2],
    anchors: [Vec<bool>; 2],
    transposed: bool,
    opening_row: u8,
    opening_col: u8,
}

impl Board {
    #[must_use]
    pub fn new(layout: &crate::board_layout::BoardLayout) -> Self {
        let dim = layout.dim();
        let n = dim as usize * dim as usize;
        let squares = (0..dim)
            .flat_map(|r| (0..dim).map(move |c| (r, c)))
            .map(|(r, c)| Square {
                tile: 0,
                bonus: layout.bonus(r, c),
            })
            .collect();
        let (opening_row, opening_col) = layout.opening_square();
        let mut board = Board {
            dim,
            squares,
            cross_sets: [vec![CROSS_SET_ALL; n], vec![CROSS_SET_ALL; n]],
            cross_scores: [vec![0; n], vec![0; n]],
            anchors: [vec![false; n], vec![false; n]],
            transposed: false,
            opening_row,
            opening_col,
        };
        board.recompute_anchor(opening_row, opening_col);
        board
    }

    #[must_use]
    pub fn dim(&self) -> u8 {
        self.dim
    }

    #[must_use]
    pub fn is_transposed(&self) -> bool {
        self.transposed
    }

    #[must_use]
    pub fn opening_square(&self) -> (u8, u8) {
        (self.opening_row, self.opening_col)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.squares.iter().all(|s| s.tile == 0)
    }

    fn idx(&self, row: u8, col: u8) -> usize {
        row as usize * self.dim as usize + col as usize
    }

    #[must_use]
    pub fn in_bounds(&self, row: i16, col: i16) -> bool {
        row >= 0 && col >= 0 && row < i16::from(self.dim) && col < i16::from(self.dim)
    }

    #[must_use]
    pub fn tile(&self, row: u8, col: u8) -> MachineLetter {
        self.squares[self.idx(row, col)].tile
    }

    #[must_use]
    pub fn is_occupied(&self, row: u8, col: u8) -> bool {
        self.tile(row, col) != 0
    }

    #[must_use]
    pub fn bonus(&self, row: u8, col: u8) -> Bonus {
        self.squares[self.idx(row, col)].bonus
    }

    #[must_use]
    pub fn cross_set(&self, row: u8, col: u8, dir: Direction) -> CrossSet {
        self.cross_sets[cross_table_index(dir)][self.idx(row, col)]
    }

    #[must_use]
    pub fn cross_score(&self, row: u8, col: u8, dir: Direction) -> i32 {
        self.cross_scores[cross_table_index(dir)][self.idx(row, col)]
    }

    #[must_use]
    pub fn is_anchor(&self, row: u8, col: u8, dir: Direction) -> bool {
        self.anchors[cross_table_index(dir)][self.idx(row, col)]
    }

    /// Whether placing a tile at `(row, col)` as part of a word running in
    /// `dir` would form a perpendicular side word at all, i.e. whether
    /// there is an occupied neighbor immediately before or after it in the
    /// opposite direction. Used by the move generator to decide whether a
    /// newly placed tile contributes a cross-word score.
    #[must_use]
    pub fn has_perp_neighbor(&self, row: u8, col: u8, dir: Direction) -> bool {
        let (dr, dc) = step(dir.opposite());
        for sign in [-1i16, 1] {
            let (nr, nc) = (i16::from(row) + dr * sign, i16::from(col) + dc * sign);
            if self.in_bounds(nr, nc) && self.is_occupied(nr as u8, nc as u8) {
                return true;
            }
        }
        false
    }

    /// Place `tile` at `(row, col)` (not a move — a single square write).
    /// Used by `Game::play` for each tile in a placement's sequence.
    pub fn set_tile(&mut self, row: u8, col: u8, tile: MachineLetter) {
        self.squares[self.idx(row, col)].tile = tile;
    }

    /// Recompute cross-sets, cross-scores and anchors for every square in
    /// `touched` plus each of their immediate neighbors in both
    /// directions. This is the only recomputation entry point `Game::play`
    /// calls; it never rescans the whole board.
    pub fn recompute_around(&mut self, touched: &[(u8, u8)], ld: &LetterDistribution, kwg: &Kwg) {
        use std::collections::BTreeSet;
        let mut affected: BTreeSet<(u8, u8)> = BTreeSet::new();
        for &(r, c) in touched {
            affected.insert((r, c));
            for (dr, dc) in [(-1i16, 0i16), (1, 0), (0, -1), (0, 1)] {
                let (nr, nc) = (i16::from(r) + dr, i16::from(c) + dc);
                if self.in_bounds(nr, nc) {
                    affected.insert((nr as u8, nc as u8));
                }
            }
        }
        for &(r, c) in &affected {
            self.recompute_cross_set(r, c, Direction::Horizontal, ld, kwg);
            self.recompute_cross_set(r, c, Direction::Vertical, ld, kwg);
            self.recompute_anchor(r, c);
        }
    }

    /// Recompute the cross-set and cross-score of `(row, col)` in
    /// direction `dir`: the set of letters that, placed at `(row, col)`,
    /// would produce only a valid (or absent) word running perpendicular
    /// to `dir`.
    fn recompute_cross_set(
        &mut self,
        row: u8,
        col: u8,
        dir: Direction,
        ld: &LetterDistribution,
        kwg: &Kwg,
    ) {
        if self.is_occupied(row, col) {
            // Occupied squares are never played through by the anchor that
            // owns this cross-set; the stored value is irrelevant but kept
            // harmless (full mask, zero score).
            let i = cross_table_index(dir);
            let idx = self.idx(row, col);
            self.cross_sets[i][idx] = CROSS_SET_ALL;
            self.cross_scores[i][idx] = 0;
            return;
        }
        let perp = dir.opposite();
        let (before, before_score) = self.run_before(row, col, perp, ld);
        let (after, after_score) = self.run_after(row, col, perp, ld);
        let i = cross_table_index(dir);
        let idx = self.idx(row, col);
        if before.is_empty() && after.is_empty() {
            self.cross_sets[i][idx] = CROSS_SET_ALL;
            self.cross_scores[i][idx] = 0;
            return;
        }
        let mut mask: CrossSet = 0;
        for ml in 0..ld.alphabet_size() as MachineLetter {
            let mut word = before.clone();
            word.push(ml);
            word.extend_from_slice(&after);
            if kwg.accepts_word(&word) {
                mask |= 1u64 << ml;
            }
        }
        self.cross_sets[i][idx] = mask;
        self.cross_scores[i][idx] = before_score + after_score;
    }

    /// The run of tiles immediately before `(row, col)` in direction
    /// `dir`, nearest-first reversed to natural reading order, plus their
    /// summed score.
    fn run_before(
        &self,
        row: u8,
        col: u8,
        dir: Direction,
        ld: &LetterDistribution,
    ) -> (Vec<MachineLetter>, i32) {
        let (dr, dc) = step(dir);
        let mut letters = Vec::new();
        let mut score = 0;
        let (mut r, mut c) = (i16::from(row) - dr, i16::from(col) - dc);
        while self.in_bounds(r, c) && self.is_occupied(r as u8, c as u8) {
            let tile = self.tile(r as u8, c as u8);
            letters.push(tile);
            score += ld.score(tile);
            r -= dr;
            c -= dc;
        }
        letters.reverse();
        (letters, score)
    }

    fn run_after(
        &self,
        row: u8,
        col: u8,
        dir: Direction,
        ld: &LetterDistribution,
    ) -> (Vec<MachineLetter>, i32) {
        let (dr, dc) = step(dir);
        let mut letters = Vec::new();
        let mut score = 0;
        let (mut r, mut c) = (i16::from(row) + dr, i16::from(col) + dc);
        while self.in_bounds(r, c) && self.is_occupied(r as u8, c as u8) {
            let tile = self.tile(r as u8, c as u8);
            letters.push(tile);
            score += ld.score(tile);
            r += dr;
            c += dc;
        }
        (letters, score)
    }

    fn recompute_anchor(&mut self, row: u8, col: u8) {
        for dir in [Direction::Horizontal, Direction::Vertical] {
            let is_anchor = if self.is_occupied(row, col) {
                false
            } else if self.is_empty() {
                (row, col) == (self.opening_row, self.opening_col) && dir == Direction::Horizontal
            } else {
                let (dr, dc) = step(dir.opposite());
                let mut has_neighbor = false;
                for sign in [-1i16, 1] {
                    let (nr, nc) = (i16::from(row) + dr * sign, i16::from(col) + dc * sign);
                    if self.in_bounds(nr, nc) && self.is_occupied(nr as u8, nc as u8) {
                        has_neighbor = true;
                    }
                }
                has_neighbor
            };
            let i = cross_table_index(dir);
            let idx = self.idx(row, col);
            self.anchors[i][idx] = is_anchor;
        }
    }

    /// Recompute every cross-set/score/anchor from scratch. Used only when
    /// loading a position directly from CGP (there is no adjacency history
    /// to exploit) — every other mutation path uses
    /// [`Board::recompute_around`].
    pub fn recompute_all(&mut self, ld: &LetterDistribution, kwg: &Kwg) {
        let dim = self.dim;
        let all: Vec<(u8, u8)> = (0..dim)
            .flat_map(|r| (0..dim).map(move |c| (r, c)))
            .collect();
        for &(r, c) in &all {
            self.recompute_cross_set(r, c, Direction::Horizontal, ld, kwg);
            self.recompute_cross_set(r, c, Direction::Vertical, ld, kwg);
        }
        for &(r, c) in &all {
            self.recompute_anchor(r, c);
        }
    }

    /// Transpose the board in place: swap rows and columns, and swap which
    /// per-direction table plays the role of "horizontal". Calling this
    /// twice is the identity.
    pub fn transpose(&mut self) {
        let dim = self.dim as usize;
        let mut new_squares = self.squares.clone();
        for r in 0..dim {
            for c in 0..dim {
                new_squares[c * dim + r] = self.squares[r * dim + c];
            }
        }
        self.squares = new_squares;

        self.cross_sets = [
            transpose_grid(&self.cross_sets[0], dim),
            transpose_grid(&self.cross_sets[1], dim),
        ];
        self.cross_sets.swap(0, 1);
        self.cross_scores = [
            transpose_grid(&self.cross_scores[0], dim),
            transpose_grid(&self.cross_scores[1], dim),
        ];
        self.cross_scores.swap(0, 1);
        self.anchors = [
            transpose_grid(&self.anchors[0], dim),
            transpose_grid(&self.anchors[1], dim),
        ];
        self.anchors.swap(0, 1);

        std::mem::swap(&mut self.opening_row, &mut self.opening_col);
        self.transposed = !self.transposed;
    }
}

fn transpose_grid<T: Copy>(grid: &[T], dim: usize) -> Vec<T> {
    let mut out = grid.to_vec();
    for r in 0..dim {
        for c in 0..dim {
            out[c * dim + r] = grid[r * dim + c];
        }
    }
    out
}

fn cross_table_index(dir: Direction) -> usize {
    match dir {
        Direction::Horizontal => 0,
        Direction::Vertical => 1,
    }
}

fn step(dir: Direction) -> (i16, i16) {
    match dir {
        Direction::Horizontal => (0, 1),
        Direction::Vertical => (1, 0),
    }
}

#[must_use]
pub fn cross_set_allows(set: CrossSet, ml: MachineLetter) -> bool {
    let bit = unblank(ml);
    set & (1u64 << bit) != 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kwg::Kwg;
    use crate::letters::english;

    fn word(s: &str, ld: &LetterDistribution) -> Vec<MachineLetter> {
        s.chars()
            .map(|c| ld.machine_letter_for_glyph(c).unwrap())
            .collect()
    }

    #[test]
    fn empty_board_opening_square_is_horizontal_anchor_only() {
        let board = Board::new(&crate::board_layout::standard15());
        assert!(board.is_anchor(7, 7, Direction::Horizontal));
        assert!(!board.is_anchor(7, 7, Direction::Vertical));
        assert!(!board.is_anchor(7, 8, Direction::Horizontal));
    }

    #[test]
    fn cross_set_empty_neighbor_allows_everything() {
        let ld = english();
        let kwg = Kwg::from_words(&[word("CAT", &ld)]);
        let mut board = Board::new(&crate::board_layout::standard15());
        board.recompute_all(&ld, &kwg);
        assert_eq!(board.cross_set(3, 3, Direction::Horizontal), CROSS_SET_ALL);
    }

    #[test]
    fn cross_set_restricts_to_valid_perpendicular_words() {
        let ld = english();
        let kwg = Kwg::from_words(&[word("CAT", &ld), word("CARS", &ld), word("AT", &ld)]);
        let mut board = Board::new(&crate::board_layout::standard15());
        // Place "CAT" horizontally at row 7, cols 7-9.
        board.set_tile(7, 7, ld.machine_letter_for_glyph('C').unwrap());
        board.set_tile(7, 8, ld.machine_letter_for_glyph('A').unwrap());
        board.set_tile(7, 9, ld.machine_letter_for_glyph('T').unwrap());
        board.recompute_around(&[(7, 7), (7, 8), (7, 9)], &ld, &kwg);
        // Square below the 'C' (row 8, col 7) should allow only letters
        // that make a valid two-letter word "C?" reading down... none are
        // in our toy lexicon, so it should be empty. Square above row 6
        // col 9 should allow 'A' (making "AT"?) — check the square above
        // the 'T' reads upward: (row 6, col 9) + T below = "?T"; no match
        // either, so exercise a case that *does* match instead:
        let cs = board.cross_set(6, 9, Direction::Vertical);
        // no two-letter word ending in T exists in our toy lexicon other
        // than none; assert it's restrictive (not CROSS_SET_ALL).
        assert_ne!(cs, CROSS_SET_ALL);
    }

    #[test]
    fn transpose_is_involution() {
        let ld = english();
        let kwg = Kwg::from_words(&[word("CAT", &ld)]);
        let mut board = Board::new(&crate::board_layout::standard15());
        board.set_tile(7, 7, ld.machine_letter_for_glyph('C').unwrap());
        board.recompute_around(&[(7, 7)], &ld, &kwg);
        let before = board.clone();
        board.transpose();
        board.transpose();
        assert_eq!(before.tile(7, 7), board.tile(7, 7));
        assert_eq!(
            before.is_anchor(7, 7, Direction::Horizontal),
            board.is_anchor(7, 7, Direction::Horizontal)
        );
    }
}
