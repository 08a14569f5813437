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

//! The move generator: anchor enumeration, a shadow pruning pass, then
//! exact GADDAG traversal, plus exchange and pass generation.
//!
//! Exact generation follows the classical GADDAG algorithm (Gordon 1994,
//! Appel & Jacobson): starting from each anchor, walk left through the
//! GADDAG one square at a time (consuming rack tiles or forced board
//! letters), then at any point "turn" through the separator arc and walk
//! right, placing tiles and consulting this square's cross-set/cross-score
//! (precomputed by [`crate::board::Board`]) for O(1) perpendicular
//! validation and scoring. The arc's accepts-bit, checked at the moment
//! each rightward tile is placed (via [`Kwg::accepts_after`]), marks every
//! point at which stopping would yield a complete, valid word.

pub mod mv;
pub mod movelist;

use crate::board::{cross_set_allows, Board, Direction};
use crate::klv::Klv;
use crate::kwg::{Kwg, NodeIndex};
use crate::letters::{blank, unblank, LetterDistribution, MachineLetter, GADDAG_SEPARATOR};
use crate::rack::Rack;
use movelist::MoveList;
use mv::{Move, PlacedTile};
use std::collections::{BTreeMap, HashSet};

/// The two rule variants this engine distinguishes during main-word
/// acceptance ( supplement, resolving Open Question (a)).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameVariant {
    /// Ordinary Scrabble-family rules: a placement's main word must match
    /// the literal sequence of letters read off the board, validated by
    /// the GADDAG's accepts-bit as the walk descends.
    Classic,
    /// "Wordsmog": a placement's main word is valid if *any* permutation
    /// of the letters in its run forms a word (anagram acceptance),
    /// checked against the DAWG once a candidate run is complete.
    Wordsmog,
}

/// The longest contiguous run `accepts_anagram` will be asked to validate
/// for the wordsmog variant; runs longer than this are rejected rather than
/// paying factorial-time permutation cost.
pub const WORDSMOG_MAX_ANAGRAM_LEN: usize = 9;

/// Parameters shared by every call into the generator, bundling the
/// immutable shared resources plus the handful of per-game scalars the
/// algorithm needs.
pub struct GenParams<'a> {
    pub ld: &'a LetterDistribution,
    pub kwg: &'a Kwg,
    pub klv: &'a Klv,
    pub variant: GameVariant,
    pub bingo_bonus: i32,
    /// Tiles remaining in the bag, used to decide whether exchanges are
    /// legal.
    pub bag_tiles: usize,
}

/// A candidate starting point for exact generation, with a sound (if
/// loose) upper bound on any placement rooted there, used to process
/// anchors best-bound-first and to stop early once no remaining anchor can
/// beat the list's current threshold.
#[derive(Clone, Copy, Debug)]
struct Anchor {
    row: u8,
    col: u8,
    dir: Direction,
    bound: f64,
}

/// A loose but sound upper bound on the equity of any placement rooted at
/// this anchor: every tile the rack could contribute is assumed to land on
/// the richest bonus square reachable and to always satisfy its cross-set,
/// which over-estimates real equity but never under-estimates it, so
/// early-stopping against this bound can never discard a genuine candidate.
fn shadow_bound(
    board: &Board,
    row: u8,
    col: u8,
    dir: Direction,
    rack: &Rack,
    ld: &LetterDistribution,
) -> f64 {
    let best_tile_score = rack
        .iter()
        .filter(|&(ml, _)| ml != 0)
        .map(|(ml, _)| ld.score(ml))
        .max()
        .unwrap_or(0);
    let reach = i32::from(rack.num_tiles().max(1));
    const MAX_WORD_MULT: i32 = 3;
    const MAX_LETTER_MULT: i32 = 3;
    let existing_cross = board.cross_score(row, col, dir);
    f64::from((best_tile_score * MAX_LETTER_MULT * reach + existing_cross) * MAX_WORD_MULT)
}

fn collect_anchors(board: &Board, rack: &Rack, ld: &LetterDistribution) -> Vec<Anchor> {
    let dim = board.dim();
    let mut anchors = Vec::new();
    for row in 0..dim {
        for col in 0..dim {
            for dir in [Direction::Horizontal, Direction::Vertical] {
                if board.is_anchor(row, col, dir) && !board.bonus(row, col).is_brick() {
                    let bound = shadow_bound(board, row, col, dir, rack, ld);
                    anchors.push(Anchor { row, col, dir, bound });
                }
            }
        }
    }
    anchors.sort_by(|a, b| b.bound.partial_cmp(&a.bound).unwrap_or(std::cmp::Ordering::Equal));
    anchors
}

type DedupKey = (u8, u8, Direction, Vec<(MachineLetter, bool)>);

/// Mutable working state threaded through the recursive GADDAG walk for a
/// single anchor, fixed at one row (or, for vertical placements, one
/// column addressed the same way since callers pass `row`/`dir`
/// consistently — the board itself is never transposed here; both
/// directions walk the same `(row, col)` grid, varying which neighbor
/// axis is "perpendicular").
struct Walk<'a> {
    board: &'a Board,
    rack: Rack,
    params: &'a GenParams<'a>,
    row: u8,
    dir: Direction,
    tiles: BTreeMap<u8, PlacedTile>,
    seen: &'a mut HashSet<DedupKey>,
    out: &'a mut MoveList,
}

impl<'a> Walk<'a> {
    fn dim(&self) -> u8 {
        self.board.dim()
    }

    fn square(&self, col: u8) -> (u8, u8) {
        match self.dir {
            Direction::Horizontal => (self.row, col),
            Direction::Vertical => (col, self.row),
        }
    }

    fn is_brick(&self, col: u8) -> bool {
        let (r, c) = self.square(col);
        self.board.bonus(r, c).is_brick()
    }

    fn is_occupied(&self, col: u8) -> bool {
        let (r, c) = self.square(col);
        self.board.is_occupied(r, c)
    }

    fn tile_at(&self, col: u8) -> MachineLetter {
        let (r, c) = self.square(col);
        self.board.tile(r, c)
    }

    fn cross_ok(&self, col: u8, ml: MachineLetter) -> bool {
        let (r, c) = self.square(col);
        cross_set_allows(self.board.cross_set(r, c, self.dir), ml)
    }

    /// Extend leftward, trying every possible extent (including zero) by
    /// attempting a turn at each step before committing to a further
    /// leftward tile.
    fn extend_left(&mut self, node: NodeIndex, col: i32, pivot: u8) {
        let sep_node = self.params.kwg.next_node(node, GADDAG_SEPARATOR);
        if sep_node != 0 {
            self.extend_right(sep_node, pivot, false);
        }
        if col < 0 || col as u8 >= self.dim() {
            return;
        }
        let c = col as u8;
        if self.is_brick(c) {
            return;
        }
        if self.is_occupied(c) {
            let letter = self.tile_at(c);
            let child = self.params.kwg.next_node(node, unblank(letter));
            if child != 0 {
                self.tiles.insert(c, PlacedTile::PlayedThrough(letter));
                self.extend_left(child, col - 1, pivot);
                self.tiles.remove(&c);
            }
            return;
        }
        let direct: Vec<MachineLetter> = self
            .rack
            .iter()
            .filter(|&(ml, _)| ml != 0)
            .map(|(ml, _)| ml)
            .collect();
        for ml in direct {
            let child = self.params.kwg.next_node(node, ml);
            if child == 0 {
                continue;
            }
            self.rack.take(ml);
            self.tiles.insert(c, PlacedTile::New { letter: ml, is_blank: false });
            self.extend_left(child, col - 1, pivot);
            self.tiles.remove(&c);
            self.rack.add(ml);
        }
        if self.rack.count(0) > 0 {
            for ml in 1..self.params.ld.alphabet_size() as MachineLetter {
                let child = self.params.kwg.next_node(node, ml);
                if child == 0 {
                    continue;
                }
                self.rack.take(0);
                self.tiles
                    .insert(c, PlacedTile::New { letter: blank(ml), is_blank: true });
                self.extend_left(child, col - 1, pivot);
                self.tiles.remove(&c);
                self.rack.add(0);
            }
        }
    }

    /// Extend rightward from `col` (inclusive). `node` is the arc-list to
    /// search for the tile to place *at* `col`; `accepted_before` records
    /// whether the path built so far (ending at `col - 1`) already forms
    /// a complete, valid word, i.e. whether stopping here (without
    /// placing anything more) is legal.
    fn extend_right(&mut self, node: NodeIndex, col: u8, accepted_before: bool) {
        let dim = self.dim();
        let off_board = col >= dim;
        let blocked = !off_board && self.is_brick(col);
        let next_is_open = off_board || blocked || !self.is_occupied(col);
        if next_is_open && accepted_before && !self.tiles.is_empty() {
            self.try_finalize();
        }
        if off_board || blocked {
            return;
        }
        if self.is_occupied(col) {
            let letter = self.tile_at(col);
            let unblanked = unblank(letter);
            let child = self.params.kwg.next_node(node, unblanked);
            if child != 0 {
                let accepts = self.params.kwg.accepts_after(node, unblanked);
                self.tiles.insert(col, PlacedTile::PlayedThrough(letter));
                self.extend_right(child, col + 1, accepts);
                self.tiles.remove(&col);
            }
            return;
        }
        let direct: Vec<MachineLetter> = self
            .rack
            .iter()
            .filter(|&(ml, _)| ml != 0)
            .map(|(ml, _)| ml)
            .collect();
        for ml in direct {
            if !self.cross_ok(col, ml) {
                continue;
            }
            let child = self.params.kwg.next_node(node, ml);
            if child == 0 {
                continue;
            }
            let accepts = self.params.kwg.accepts_after(node, ml);
            self.rack.take(ml);
            self.tiles.insert(col, PlacedTile::New { letter: ml, is_blank: false });
            self.extend_right(child, col + 1, accepts);
            self.tiles.remove(&col);
            self.rack.add(ml);
        }
        if self.rack.count(0) > 0 {
            for ml in 1..self.params.ld.alphabet_size() as MachineLetter {
                if !self.cross_ok(col, ml) {
                    continue;
                }
                let child = self.params.kwg.next_node(node, ml);
                if child == 0 {
                    continue;
                }
                let accepts = self.params.kwg.accepts_after(node, ml);
                self.rack.take(0);
                self.tiles
                    .insert(col, PlacedTile::New { letter: blank(ml), is_blank: true });
                self.extend_right(child, col + 1, accepts);
                self.tiles.remove(&col);
                self.rack.add(0);
            }
        }
    }

    fn try_finalize(&mut self) {
        let has_new = self.tiles.values().any(PlacedTile::is_new);
        if !has_new {
            return;
        }
        if self.params.variant == GameVariant::Wordsmog {
            let letters: Vec<MachineLetter> =
                self.tiles.values().map(|t| unblank(t.letter())).collect();
            if letters.len() > WORDSMOG_MAX_ANAGRAM_LEN || !self.params.kwg.accepts_anagram(&letters) {
                return;
            }
        }
        // Classic acceptance was already established by the caller only
        // invoking `try_finalize` when `accepted_before` was true.

        let start_col = *self.tiles.keys().next().unwrap();
        let tiles: Vec<PlacedTile> = self.tiles.values().copied().collect();

        let mut main_score = 0i32;
        let mut word_mult = 1i32;
        let mut cross_total = 0i32;
        for (&col, tile) in self.tiles.iter() {
            let (r, c) = self.square(col);
            let letter_score = self.params.ld.score(tile.letter());
            match tile {
                PlacedTile::PlayedThrough(_) => {
                    main_score += letter_score;
                }
                PlacedTile::New { .. } => {
                    let bonus = self.board.bonus(r, c);
                    main_score += letter_score * bonus.letter_multiplier();
                    word_mult *= bonus.word_multiplier();
                    if self.board.has_perp_neighbor(r, c, self.dir) {
                        let cross_score = self.board.cross_score(r, c, self.dir);
                        cross_total += (cross_score + letter_score * bonus.letter_multiplier())
                            * bonus.word_multiplier();
                    }
                }
            }
        }
        main_score *= word_mult;
        let tiles_played = tiles.iter().filter(|t| t.is_new()).count();
        let bingo = tiles_played == crate::rack::RACK_SIZE;
        let score = main_score + cross_total + if bingo { self.params.bingo_bonus } else { 0 };

        let key: Vec<(MachineLetter, bool)> = self
            .tiles
            .values()
            .filter(|t| t.is_new())
            .map(|t| (t.letter(), true))
            .collect();
        let (start_row, start_col_final) = self.square(start_col);
        let dedup_key: DedupKey = (start_row, start_col_final, self.dir, key);
        if !self.seen.insert(dedup_key) {
            return;
        }

        let equity = crate::equity::equity(score, &self.rack, self.params.klv);
        let mv = Move::Place {
            start_row,
            start_col: start_col_final,
            direction: self.dir,
            tiles,
            score,
            equity,
        };
        self.out.offer(mv);
    }
}

/// Generate every legal move (placements, exchanges, pass) for `rack`
/// against `board`, filling `out` according to its capacity, sort key and
/// record policy. Never fails; an empty `out` (aside from
/// the always-offered pass) means no placement or exchange was legal.
pub fn generate_moves(board: &Board, rack: &Rack, params: &GenParams<'_>, out: &mut MoveList) {
    let mut seen = HashSet::new();
    for anchor in collect_anchors(board, rack, params.ld) {
        if out.len() >= out.capacity() && anchor.bound <= out.threshold() {
            // No remaining anchor (sorted descending) can beat the
            // current threshold; stop early.
            break;
        }
        let mut walk = Walk {
            board,
            rack: rack.clone(),
            params,
            row: anchor.row,
            dir: anchor.dir,
            tiles: BTreeMap::new(),
            seen: &mut seen,
            out,
        };
        walk.extend_left(params.kwg.gaddag_root(), i32::from(anchor.col) - 1, anchor.col);
    }
    generate_exchanges(rack, params, out);
    out.offer(Move::pass());
}

fn generate_exchanges(rack: &Rack, params: &GenParams<'_>, out: &mut MoveList) {
    if params.bag_tiles < crate::rack::RACK_SIZE {
        return;
    }
    for sub in rack.sub_multisets(false) {
        let mut leave = rack.clone();
        if !leave.subtract(&sub) {
            continue;
        }
        let equity = params.klv.leave_value(&leave);
        out.offer(Move::Exchange { tiles: sub.to_vec(), equity });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board_layout::standard15;
    use crate::klv::Klv;
    use crate::letters::english;
    use movelist::{RecordPolicy, SortKey};
    use std::collections::HashMap;

    fn ml(ld: &LetterDistribution, c: char) -> MachineLetter {
        ld.machine_letter_for_glyph(c).unwrap()
    }

    fn word(ld: &LetterDistribution, s: &str) -> Vec<MachineLetter> {
        s.chars().map(|c| ml(ld, c)).collect()
    }

    #[test]
    fn empty_board_generates_opening_bingo() {
        let ld = english();
        let kwg = Kwg::from_words(&[word(&ld, "MUZJIKS")]);
        let klv = Klv::from_map(HashMap::new());
        let mut board = Board::new(&standard15());
        board.recompute_all(&ld, &kwg);
        let rack = Rack::from_letters(
            ld.alphabet_size(),
            &"MUZJIKS".chars().map(|c| ml(&ld, c)).collect::<Vec<_>>(),
        );
        let params = GenParams {
            ld: &ld,
            kwg: &kwg,
            klv: &klv,
            variant: GameVariant::Classic,
            bingo_bonus: 50,
            bag_tiles: 0,
        };
        let mut list = MoveList::new(50, SortKey::Equity, RecordPolicy::All);
        generate_moves(&board, &rack, &params, &mut list);
        let moves = list.into_sorted_vec();
        let placements: Vec<_> = moves.iter().filter(|m| m.is_placement()).collect();
        assert!(!placements.is_empty(), "expected at least one placement");
        assert!(
            placements.iter().any(|m| m.score() == 128),
            "expected the MUZJIKS bingo at score 128, got {:?}",
            placements.iter().map(Move::score).collect::<Vec<_>>()
        );
    }

    #[test]
    fn pass_always_offered() {
        let ld = english();
        let kwg = Kwg::from_words(&[]);
        let klv = Klv::from_map(HashMap::new());
        let board = Board::new(&standard15());
        let rack = Rack::for_distribution(&ld);
        let params = GenParams {
            ld: &ld,
            kwg: &kwg,
            klv: &klv,
            variant: GameVariant::Classic,
            bingo_bonus: 50,
            bag_tiles: 0,
        };
        let mut list = MoveList::new(5, SortKey::Equity, RecordPolicy::All);
        generate_moves(&board, &rack, &params, &mut list);
        let moves = list.into_sorted_vec();
        assert!(moves.iter().any(Move::is_pass));
    }

    #[test]
    fn exchange_offered_when_bag_has_enough_tiles() {
        let ld = english();
        let kwg = Kwg::from_words(&[]);
        let klv = Klv::from_map(HashMap::new());
        let board = Board::new(&standard15());
        let rack = Rack::from_letters(ld.alphabet_size(), &[ml(&ld, 'A'), ml(&ld, 'B')]);
        let params = GenParams {
            ld: &ld,
            kwg: &kwg,
            klv: &klv,
            variant: GameVariant::Classic,
            bingo_bonus: 50,
            bag_tiles: 20,
        };
        let mut list = MoveList::new(10, SortKey::Equity, RecordPolicy::All);
        generate_moves(&board, &rack, &params, &mut list);
        let moves = list.into_sorted_vec();
        assert!(moves.iter().any(Move::is_exchange));
    }

    #[test]
    fn no_exchange_when_bag_too_small() {
        let ld = english();
        let kwg = Kwg::from_words(&[]);
        let klv = Klv::from_map(HashMap::new());
        let board = Board::new(&standard15());
        let rack = Rack::from_letters(ld.alphabet_size(), &[ml(&ld, 'A')]);
        let params = GenParams {
            ld: &ld,
            kwg: &kwg,
            klv: &klv,
            variant: GameVariant::Classic,
            bingo_bonus: 50,
            bag_tiles: 3,
        };
        let mut list = MoveList::new(10, SortKey::Equity, RecordPolicy::All);
        generate_moves(&board, &rack, &params, &mut list);
        let moves = list.into_sorted_vec();
        assert!(!moves.iter().any(Move::is_exchange));
    }

    #[test]
    fn generates_perpendicular_extension() {
        // Board has CAT placed horizontally at row 7 cols 7-9. Rack holds
        // S; playing it at (7,10) should extend to CATS (if lexicon
        // allows) validated through the cross-set machinery.
        let ld = english();
        let kwg = Kwg::from_words(&[word(&ld, "CAT"), word(&ld, "CATS"), word(&ld, "SAT")]);
        let klv = Klv::from_map(HashMap::new());
        let mut board = Board::new(&standard15());
        board.set_tile(7, 7, ml(&ld, 'C'));
        board.set_tile(7, 8, ml(&ld, 'A'));
        board.set_tile(7, 9, ml(&ld, 'T'));
        board.recompute_around(&[(7, 7), (7, 8), (7, 9)], &ld, &kwg);
        let rack = Rack::from_letters(ld.alphabet_size(), &[ml(&ld, 'S')]);
        let params = GenParams {
            ld: &ld,
            kwg: &kwg,
            klv: &klv,
            variant: GameVariant::Classic,
            bingo_bonus: 50,
            bag_tiles: 0,
        };
        let mut list = MoveList::new(50, SortKey::Equity, RecordPolicy::All);
        generate_moves(&board, &rack, &params, &mut list);
        let moves = list.into_sorted_vec();
        assert!(moves.iter().any(Move::is_placement));
    }
}
