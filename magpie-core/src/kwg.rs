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

//! The word graph: a packed DAWG + GADDAG node array (`.kwg` format).
//!
//! A node is an arc: it carries the letter labeling the arc, whether the
//! path ending here accepts (forms a word), whether it is the last arc in
//! its sibling list, and the index of its child's own arc list (0 if none).
//! Two roots index into the same node array: the DAWG root accepts words
//! read left to right; the GADDAG root accepts, for any pivot letter in a
//! word, the reversed prefix, a separator, then the suffix, so that a word
//! can be generated outward in both directions starting from any letter.

use crate::error::ResourceError;
use crate::letters::{LetterDistribution, MachineLetter, GADDAG_SEPARATOR};
use nohash_hasher::IntSet;
use std::collections::BTreeMap;

const ARC_INDEX_BITS: u32 = 22;
const ARC_INDEX_MASK: u32 = (1 << ARC_INDEX_BITS) - 1;
const ACCEPTS_BIT: u32 = 1 << 22;
const END_OF_LIST_BIT: u32 = 1 << 23;
const LETTER_SHIFT: u32 = 24;

/// An index into a [`Kwg`]'s node array. Node 0 is the null node: it has no
/// children and is never a valid arc to follow.
pub type NodeIndex = u32;

/// A packed DAWG + GADDAG node array, loaded once per configuration and
/// shared by reference across every game and worker that uses this
/// lexicon.
#[derive(Clone, Debug)]
pub struct Kwg {
    nodes: Vec<u32>,
    gaddag_root: NodeIndex,
    dawg_root: NodeIndex,
}

impl Kwg {
    /// Parse a little-endian `.kwg` file: node 0 is null, node 1 is the
    /// GADDAG root arc list, and the DAWG root is the first arc list after
    /// the last GADDAG node (recorded explicitly here rather than inferred,
    /// since nothing about the packed bytes alone distinguishes it).
    pub fn from_bytes(bytes: &[u8], dawg_root: NodeIndex) -> Result<Self, ResourceError> {
        if bytes.len() % 4 != 0 {
            return Err(ResourceError::Corrupt(
                "kwg byte length is not a multiple of 4".to_string(),
            ));
        }
        let nodes: Vec<u32> = bytes
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        if nodes.is_empty() {
            return Err(ResourceError::Corrupt("kwg has no nodes".to_string()));
        }
        if (dawg_root as usize) >= nodes.len() {
            return Err(ResourceError::Corrupt(
                "kwg dawg_root is out of range".to_string(),
            ));
        }
        Ok(Kwg {
            nodes,
            gaddag_root: 1,
            dawg_root,
        })
    }

    #[must_use]
    pub fn dawg_root(&self) -> NodeIndex {
        self.dawg_root
    }

    #[must_use]
    pub fn gaddag_root(&self) -> NodeIndex {
        self.gaddag_root
    }

    /// Serialize the packed node array back to little-endian bytes, the
    /// inverse of [`Kwg::from_bytes`] (the `dawg_root` needed to reload it
    /// is carried separately, the same way it is passed into `from_bytes`
    /// — callers that persist a `Kwg` must persist `dawg_root()` alongside
    /// these bytes).
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.nodes.len() * 4);
        for node in &self.nodes {
            out.extend_from_slice(&node.to_le_bytes());
        }
        out
    }

    #[must_use]
    fn tile(&self, idx: NodeIndex) -> MachineLetter {
        (self.nodes[idx as usize] >> LETTER_SHIFT) as MachineLetter
    }

    #[must_use]
    fn node_accepts(&self, idx: NodeIndex) -> bool {
        self.nodes[idx as usize] & ACCEPTS_BIT != 0
    }

    #[must_use]
    fn is_end_of_list(&self, idx: NodeIndex) -> bool {
        self.nodes[idx as usize] & END_OF_LIST_BIT != 0
    }

    #[must_use]
    fn arc_index(&self, idx: NodeIndex) -> NodeIndex {
        self.nodes[idx as usize] & ARC_INDEX_MASK
    }

    /// Whether the arc list starting at `node` (0 for none) has any arcs at
    /// all.
    #[must_use]
    pub fn is_end(&self, node: NodeIndex) -> bool {
        node == 0
    }

    /// Iterate every arc in the sibling list starting at `node`, yielding
    /// `(letter, child)` pairs.
    pub fn iter_arcs(&self, node: NodeIndex) -> ArcIter<'_> {
        ArcIter {
            kwg: self,
            next: if node == 0 { None } else { Some(node) },
        }
    }

    /// Follow the arc labeled `letter` from the arc-list starting at
    /// `node`. Returns 0 (the null node) if `node` is 0 or no such arc
    /// exists.
    #[must_use]
    pub fn next_node(&self, node: NodeIndex, letter: MachineLetter) -> NodeIndex {
        if node == 0 {
            return 0;
        }
        let mut idx = node;
        loop {
            if self.tile(idx) == letter {
                return self.arc_index(idx);
            }
            if self.is_end_of_list(idx) {
                return 0;
            }
            idx += 1;
        }
    }

    /// Whether the arc list starting at `node` contains an arc labeled
    /// `letter` at all (regardless of whether that arc accepts).
    #[must_use]
    pub fn has_letter(&self, node: NodeIndex, letter: MachineLetter) -> bool {
        self.next_node(node, letter) != 0 || self.accepts_after(node, letter)
    }

    /// Whether following `letter` from `node` lands on an accepting arc.
    #[must_use]
    pub fn accepts_after(&self, node: NodeIndex, letter: MachineLetter) -> bool {
        if node == 0 {
            return false;
        }
        let mut idx = node;
        loop {
            if self.tile(idx) == letter {
                return self.node_accepts(idx);
            }
            if self.is_end_of_list(idx) {
                return false;
            }
            idx += 1;
        }
    }

    /// DAWG acceptance: does `word` (read left to right) form a word in
    /// this lexicon?
    #[must_use]
    pub fn accepts_word(&self, word: &[MachineLetter]) -> bool {
        let mut node = self.dawg_root;
        for (i, &ml) in word.iter().enumerate() {
            if node == 0 && i > 0 {
                return false;
            }
            let mut idx = node;
            let mut found = false;
            loop {
                if idx == 0 {
                    break;
                }
                if self.tile(idx) == ml {
                    found = true;
                    if i == word.len() - 1 {
                        return self.node_accepts(idx);
                    }
                    node = self.arc_index(idx);
                    break;
                }
                if self.is_end_of_list(idx) {
                    break;
                }
                idx += 1;
            }
            if !found {
                return false;
            }
        }
        word.is_empty()
    }

    /// Whether any permutation of `letters` forms a word in this lexicon
    /// (used by the `wordsmog` variant's anagram main-word check, 's
    /// Open Question (a): wordsmog scores anagram validity of the run
    /// rather than the fixed order the tiles were placed in).
    #[must_use]
    pub fn accepts_anagram(&self, letters: &[MachineLetter]) -> bool {
        fn permute(
            kwg: &Kwg,
            remaining: &mut Vec<MachineLetter>,
            current: &mut Vec<MachineLetter>,
        ) -> bool {
            if remaining.is_empty() {
                return kwg.accepts_word(current);
            }
            for i in 0..remaining.len() {
                let ml = remaining.remove(i);
                current.push(ml);
                if permute(kwg, remaining, current) {
                    current.pop();
                    remaining.insert(i, ml);
                    return true;
                }
                current.pop();
                remaining.insert(i, ml);
            }
            false
        }
        let mut remaining = letters.to_vec();
        let mut current = Vec::with_capacity(letters.len());
        permute(self, &mut remaining, &mut current)
    }

    /// Build a smaller word graph containing only the words of this
    /// lexicon whose letters are all drawn from `allowed`. The
    /// returned graph is a fresh DAWG+GADDAG built from the matching
    /// words, not a view into `self`.
    #[must_use]
    pub fn prune(&self, allowed: &IntSet<MachineLetter>) -> Kwg {
        let mut words = Vec::new();
        let mut path = Vec::new();
        self.collect_words(self.dawg_root, allowed, &mut path, &mut words);
        Kwg::from_words(&words)
    }

    fn collect_words(
        &self,
        node: NodeIndex,
        allowed: &IntSet<MachineLetter>,
        path: &mut Vec<MachineLetter>,
        out: &mut Vec<Vec<MachineLetter>>,
    ) {
        if node == 0 {
            return;
        }
        for (letter, child) in self.iter_arcs(node) {
            if !allowed.contains(&letter) {
                continue;
            }
            path.push(letter);
            if self.accepts_after(node, letter) {
                out.push(path.clone());
            }
            self.collect_words(child, allowed, path, out);
            path.pop();
        }
    }

    /// Build a minimal (unmerged, unoptimized) word graph from a sorted
    /// word list, for tests and fixtures only: the real builder is a
    /// separate tool out of this engine's scope. This produces a correct,
    /// if larger than necessary, DAWG-plus-per-pivot-GADDAG.
    #[must_use]
    pub fn from_words(words: &[Vec<MachineLetter>]) -> Self {
        let mut builder = TrieBuilder::new();
        for word in words {
            builder.insert_dawg(word);
            for pivot in 0..word.len() {
                builder.insert_gaddag_form(word, pivot);
            }
        }
        builder.finish()
    }
}

/// Iterator over a KWG arc list.
pub struct ArcIter<'a> {
    kwg: &'a Kwg,
    next: Option<NodeIndex>,
}

impl<'a> Iterator for ArcIter<'a> {
    type Item = (MachineLetter, NodeIndex);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.next?;
        let letter = self.kwg.tile(idx);
        let child = self.kwg.arc_index(idx);
        if self.kwg.is_end_of_list(idx) {
            self.next = None;
        } else {
            self.next = Some(idx + 1);
        }
        Some((letter, child))
    }
}

/// A plain (non-packed) trie used only to build test fixtures; converted
/// into the packed array-of-arcs representation by [`TrieBuilder::finish`].
struct TrieBuilder {
    // node id -> (letter -> (child node id, accepts))
    children: Vec<BTreeMap<MachineLetter, (usize, bool)>>,
}

impl TrieBuilder {
    fn new() -> Self {
        // node 0: DAWG root. node 1: GADDAG root.
        TrieBuilder {
            children: vec![BTreeMap::new(), BTreeMap::new()],
        }
    }

    fn insert_path(&mut self, root: usize, path: &[MachineLetter]) {
        let mut node = root;
        for (i, &ml) in path.iter().enumerate() {
            let is_last = i == path.len() - 1;
            let entry = self.children[node].entry(ml).or_insert_with(|| {
                self.children.push(BTreeMap::new());
                (self.children.len() - 1, false)
            });
            if is_last {
                entry.1 = true;
            }
            node = entry.0;
        }
    }

    fn insert_dawg(&mut self, word: &[MachineLetter]) {
        self.insert_path(0, word);
    }

    /// A word's GADDAG form for the given pivot: the letters before the
    /// pivot, reversed, then the separator, then the letters from the
    /// pivot onward — e.g. for "CARE" pivoting at index 2 ('R'): "AC" + sep
    /// + "RE".
    fn insert_gaddag_form(&mut self, word: &[MachineLetter], pivot: usize) {
        let mut path: Vec<MachineLetter> = word[..pivot].iter().rev().copied().collect();
        path.push(GADDAG_SEPARATOR);
        path.extend_from_slice(&word[pivot..]);
        self.insert_path(1, &path);
    }

    fn finish(self) -> Kwg {
        // Flatten each node's children into a consecutive arc list.
        let mut nodes = vec![0u32; 1]; // node 0 is the null placeholder slot.
        let mut arc_list_start = vec![0u32; self.children.len()];
        // Pass 1: allocate contiguous regions for each node's arc list.
        for (node_id, kids) in self.children.iter().enumerate() {
            if kids.is_empty() {
                arc_list_start[node_id] = 0;
                continue;
            }
            arc_list_start[node_id] = nodes.len() as u32;
            for _ in kids {
                nodes.push(0);
            }
        }
        // Pass 2: fill in each arc now that every node's start is known.
        for (node_id, kids) in self.children.iter().enumerate() {
            if kids.is_empty() {
                continue;
            }
            let start = arc_list_start[node_id] as usize;
            let last = kids.len() - 1;
            for (i, (&letter, &(child, accepts))) in kids.iter().enumerate() {
                let mut word = u32::from(letter) << LETTER_SHIFT;
                word |= arc_list_start[child] & ARC_INDEX_MASK;
                if accepts {
                    word |= ACCEPTS_BIT;
                }
                if i == last {
                    word |= END_OF_LIST_BIT;
                }
                nodes[start + i] = word;
            }
        }
        let gaddag_root = arc_list_start[1];
        let dawg_root = arc_list_start[0];
        Kwg {
            nodes,
            gaddag_root: if gaddag_root == 0 { 1 } else { gaddag_root },
            dawg_root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(s: &str) -> Vec<MachineLetter> {
        s.bytes().map(|b| b - b'A' + 1).collect()
    }

    #[test]
    fn accepts_dawg_word() {
        let kwg = Kwg::from_words(&[word("CAT"), word("CATS"), word("DOG")]);
        assert!(kwg.accepts_word(&word("CAT")));
        assert!(kwg.accepts_word(&word("CATS")));
        assert!(kwg.accepts_word(&word("DOG")));
        assert!(!kwg.accepts_word(&word("CA")));
        assert!(!kwg.accepts_word(&word("COT")));
    }

    #[test]
    fn gaddag_root_has_pivot_forms() {
        let kwg = Kwg::from_words(&[word("CAT")]);
        // pivot at 'A' (index 1): reversed prefix "C" + sep + "AT"
        let c = 3u8; // 'C' - 'A' + 1 = 3
        let sep = GADDAG_SEPARATOR;
        let a = 1u8;
        let t = 20u8;
        let n1 = kwg.next_node(kwg.gaddag_root(), c);
        assert_ne!(n1, 0);
        let n2 = kwg.next_node(n1, sep);
        assert_ne!(n2, 0);
        let n3 = kwg.next_node(n2, a);
        assert_ne!(n3, 0);
        assert!(kwg.accepts_after(n3, t));
    }

    #[test]
    fn prune_keeps_only_reachable_words() {
        let kwg = Kwg::from_words(&[word("CAT"), word("DOG"), word("CATS")]);
        let allowed: IntSet<MachineLetter> = [3u8, 1, 20].into_iter().collect(); // C, A, T
        let pruned = kwg.prune(&allowed);
        assert!(pruned.accepts_word(&word("CAT")));
        assert!(!pruned.accepts_word(&word("DOG")));
        assert!(!pruned.accepts_word(&word("CATS")));
    }

    #[test]
    fn anagram_acceptance() {
        let kwg = Kwg::from_words(&[word("CAT")]);
        assert!(kwg.accepts_anagram(&word("TAC")));
        assert!(kwg.accepts_anagram(&word("CAT")));
        assert!(!kwg.accepts_anagram(&word("CATS")));
    }

    #[test]
    fn to_bytes_round_trips_through_from_bytes() {
        let kwg = Kwg::from_words(&[word("CAT"), word("CATS"), word("DOG")]);
        let bytes = kwg.to_bytes();
        let reloaded = Kwg::from_bytes(&bytes, kwg.dawg_root()).unwrap();
        assert!(reloaded.accepts_word(&word("CAT")));
        assert!(reloaded.accepts_word(&word("CATS")));
        assert!(!reloaded.accepts_word(&word("COT")));
    }
}
