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

//! Machine letters and the letter distribution.
//!
//! A [`MachineLetter`] is the small integer identifier every other subsystem
//! uses to refer to a tile. Value 0 is the played-through/empty-square
//! marker. The high bit marks a blank assigned to a particular face; the low
//! seven bits give the unblanked letter.

use crate::error::ResourceError;
use once_cell::sync::Lazy;
use std::fmt;

/// A small integer identifier for a tile, or 0 for "empty / played-through".
pub type MachineLetter = u8;

/// Bit 7 of a [`MachineLetter`] marks a blank assigned to a face.
pub const BLANK_MASK: MachineLetter = 0x80;

/// The low seven bits of a [`MachineLetter`], i.e. the mask that strips the
/// blank-assignment bit.
pub const UNBLANK_MASK: MachineLetter = 0x80 - 1;

/// The sentinel machine letter reserved for the GADDAG's direction-change
/// separator. No tile in play, on a rack, or in a bag ever carries this
/// value; it only ever appears inside [`crate::kwg::Kwg`] arc labels.
pub const GADDAG_SEPARATOR: MachineLetter = 0;

/// The conventional maximum size of an alphabet (including the blank),
/// matching the binary file formats this crate reads and writes.
pub const MAX_ALPHABET_SIZE: usize = 50;

/// The empty-square / played-through marker. Aliased separately from
/// [`GADDAG_SEPARATOR`] even though the numeric value coincides, because the
/// two represent different invariants in different subsystems.
pub const EMPTY_SQUARE_MARKER: MachineLetter = 0;

#[must_use]
/// Whether `ml` is a blank assigned to a face.
pub const fn is_blanked(ml: MachineLetter) -> bool {
    ml & BLANK_MASK != 0
}

#[must_use]
/// The unblanked letter underlying `ml`, discarding the blank-assignment bit.
pub const fn unblank(ml: MachineLetter) -> MachineLetter {
    ml & UNBLANK_MASK
}

#[must_use]
/// `ml`, with the blank-assignment bit set, denoting a blank that has been
/// assigned to stand in for the given unblanked letter.
pub const fn blank(ml: MachineLetter) -> MachineLetter {
    ml | BLANK_MASK
}

/// Per-letter static facts: its score, how many copies start in the bag,
/// whether it is a vowel (used by some heuristics and by leave grouping),
/// and its human-readable glyph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LetterInfo {
    pub score: i32,
    pub count: u16,
    pub is_vowel: bool,
    pub glyph: char,
    pub lowercase_glyph: char,
}

/// An immutable alphabet plus tile population, constructed once per
/// configuration and shared by reference from then on (letter distribution,
/// word graph and leave table are the three immutable shared resources
/// every per-game object borrows).
#[derive(Clone, Debug)]
pub struct LetterDistribution {
    name: String,
    letters: Vec<LetterInfo>,
    /// Machine letters in descending score order; used by the shadow pass
    /// to find the highest-scoring tile on a rack satisfying a cross-set
    /// without a linear rescan.
    by_descending_score: Vec<MachineLetter>,
    total_tiles: u32,
}

impl LetterDistribution {
    /// Construct a distribution from CSV rows of the form
    /// `glyph,lowercase_glyph,count,score,is_vowel`. The blank is the row
    /// whose glyph is `?`.
    pub fn from_csv(name: &str, csv: &str) -> Result<Self, ResourceError> {
        let mut letters = vec![LetterInfo {
            score: 0,
            count: 0,
            is_vowel: false,
            glyph: '?',
            lowercase_glyph: '?',
        }];
        for (lineno, line) in csv.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() != 5 {
                return Err(ResourceError::Corrupt(format!(
                    "letter distribution line {lineno} has {} fields, expected 5",
                    fields.len()
                )));
            }
            let glyph = fields[0].chars().next().ok_or_else(|| {
                ResourceError::Corrupt(format!("empty glyph on line {lineno}"))
            })?;
            let lowercase_glyph = fields[1].chars().next().unwrap_or(glyph);
            let count: u16 = fields[2]
                .parse()
                .map_err(|_| ResourceError::Corrupt(format!("bad count on line {lineno}")))?;
            let score: i32 = fields[3]
                .parse()
                .map_err(|_| ResourceError::Corrupt(format!("bad score on line {lineno}")))?;
            let is_vowel = matches!(fields[4].trim(), "1" | "true" | "TRUE");

            if glyph == '?' {
                letters[0] = LetterInfo {
                    score,
                    count,
                    is_vowel: false,
                    glyph,
                    lowercase_glyph,
                };
            } else {
                letters.push(LetterInfo {
                    score,
                    count,
                    is_vowel,
                    glyph,
                    lowercase_glyph,
                });
            }
        }
        if letters.len() < 2 {
            return Err(ResourceError::Corrupt(
                "letter distribution has no non-blank tiles".to_string(),
            ));
        }
        let mut by_descending_score: Vec<MachineLetter> =
            (1..letters.len() as MachineLetter).collect();
        by_descending_score.sort_by_key(|&ml| std::cmp::Reverse(letters[ml as usize].score));
        let total_tiles = letters.iter().map(|l| u32::from(l.count)).sum();
        Ok(LetterDistribution {
            name: name.to_string(),
            letters,
            by_descending_score,
            total_tiles,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    /// The number of distinct machine letters, including the blank.
    pub fn alphabet_size(&self) -> usize {
        self.letters.len()
    }

    #[must_use]
    pub fn total_tiles(&self) -> u32 {
        self.total_tiles
    }

    #[must_use]
    pub fn score(&self, ml: MachineLetter) -> i32 {
        if is_blanked(ml) {
            0
        } else {
            self.letters[ml as usize].score
        }
    }

    #[must_use]
    pub fn initial_count(&self, ml: MachineLetter) -> u16 {
        self.letters[unblank(ml) as usize].count
    }

    #[must_use]
    pub fn is_vowel(&self, ml: MachineLetter) -> bool {
        self.letters[unblank(ml) as usize].is_vowel
    }

    #[must_use]
    pub fn glyph(&self, ml: MachineLetter) -> char {
        let info = &self.letters[unblank(ml) as usize];
        if is_blanked(ml) {
            info.lowercase_glyph
        } else {
            info.glyph
        }
    }

    #[must_use]
    /// Machine letters (unblanked) ordered from highest score to lowest;
    /// the shadow pass walks this to find the best tile on a rack that
    /// satisfies a cross-set.
    pub fn by_descending_score(&self) -> &[MachineLetter] {
        &self.by_descending_score
    }

    /// Parse a single UTF-8 glyph into its machine letter. A lowercase
    /// glyph denotes a blank assigned to the corresponding uppercase
    /// letter. Returns `None` if the glyph is not in the alphabet.
    #[must_use]
    pub fn machine_letter_for_glyph(&self, glyph: char) -> Option<MachineLetter> {
        if glyph == '?' {
            return Some(0);
        }
        for (ml, info) in self.letters.iter().enumerate() {
            if ml == 0 {
                continue;
            }
            if info.glyph == glyph {
                return Some(ml as MachineLetter);
            }
            if info.lowercase_glyph == glyph {
                return Some(blank(ml as MachineLetter));
            }
        }
        None
    }
}

impl fmt::Display for LetterDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} tiles)", self.name, self.total_tiles)
    }
}

const ENGLISH_CSV: &str = "\
?,?,2,0,0
A,a,9,1,1
B,b,2,3,0
C,c,2,3,0
D,d,4,2,0
E,e,12,1,1
F,f,2,4,0
G,g,3,2,0
H,h,2,4,0
I,i,9,1,1
J,j,1,8,0
K,k,1,5,0
L,l,4,1,0
M,m,2,3,0
N,n,6,1,0
O,o,8,1,1
P,p,2,3,0
Q,q,1,10,0
R,r,6,1,0
S,s,4,1,0
T,t,6,1,0
U,u,4,1,1
V,v,2,4,0
W,w,2,4,0
X,x,1,8,0
Y,y,2,4,1
Z,z,1,10,0
";

static ENGLISH: Lazy<LetterDistribution> = Lazy::new(|| {
    LetterDistribution::from_csv("english", ENGLISH_CSV).expect("embedded distribution is well-formed")
});

/// The standard 100-tile English Scrabble distribution, embedded so tests
/// and the CLI do not need a filesystem round-trip to exercise the common
/// case. Parsed once per process and cloned out of a [`Lazy`] static on
/// every call.
#[must_use]
pub fn english() -> LetterDistribution {
    ENGLISH.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_has_100_tiles() {
        let ld = english();
        assert_eq!(ld.total_tiles(), 100);
        assert_eq!(ld.alphabet_size(), 27);
    }

    #[test]
    fn blank_roundtrips() {
        let a: MachineLetter = 1;
        let blanked = blank(a);
        assert!(is_blanked(blanked));
        assert_eq!(unblank(blanked), a);
    }

    #[test]
    fn glyph_lookup() {
        let ld = english();
        let a = ld.machine_letter_for_glyph('A').unwrap();
        assert_eq!(ld.glyph(a), 'A');
        let blank_a = ld.machine_letter_for_glyph('a').unwrap();
        assert!(is_blanked(blank_a));
        assert_eq!(ld.glyph(blank_a), 'a');
        assert_eq!(ld.score(blank_a), 0);
    }

    #[test]
    fn q_scores_ten() {
        let ld = english();
        let q = ld.machine_letter_for_glyph('Q').unwrap();
        assert_eq!(ld.score(q), 10);
    }
}
