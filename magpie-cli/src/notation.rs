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

//! Human/UCGI move notation.
//!
//! `magpie_core::gcg` already has a coordinate formatter for GCG's
//! uppercase-column convention; this is the sibling used by the console
//! and UCGI front ends, which write the coordinate lowercase and join it
//! to the word with a `.`.

use magpie_core::board::Direction;
use magpie_core::letters::{blank, LetterDistribution, MachineLetter, BLANK_MASK};
use magpie_core::movegen::mv::{Move, PlacedTile};
use magpie_core::rack::Rack;

fn col_index_to_letter(i: u8) -> char {
    (b'a' + i) as char
}

fn format_coord(start_row: u8, start_col: u8, direction: Direction) -> String {
    match direction {
        Direction::Horizontal => format!("{}{}", start_row + 1, col_index_to_letter(start_col)),
        Direction::Vertical => format!("{}{}", col_index_to_letter(start_col), start_row + 1),
    }
}

fn format_tiles(tiles: &[PlacedTile], ld: &LetterDistribution) -> String {
    tiles
        .iter()
        .map(|t| match t {
            PlacedTile::PlayedThrough(_) => '.',
            PlacedTile::New { letter, is_blank } => {
                if *is_blank {
                    ld.glyph(letter | BLANK_MASK).to_ascii_lowercase()
                } else {
                    ld.glyph(*letter)
                }
            }
        })
        .collect()
}

/// Render `mv` the way the console and UCGI surfaces print it: a
/// placement is `<coord>.<word>`, an exchange is `ex.<tiles>`, a pass is
/// the literal `pass`.
#[must_use]
pub fn format_move(mv: &Move, ld: &LetterDistribution) -> String {
    match mv {
        Move::Place {
            start_row,
            start_col,
            direction,
            tiles,
            ..
        } => format!(
            "{}.{}",
            format_coord(*start_row, *start_col, *direction),
            format_tiles(tiles, ld)
        ),
        Move::Exchange { tiles, .. } => {
            let letters: String = tiles.iter().map(|&ml| ld.glyph(ml)).collect();
            format!("ex.{letters}")
        }
        Move::Pass { .. } => "pass".to_string(),
    }
}

/// Parse a glyph string (`-lex`/console input, not GCG/CGP) into machine
/// letters: uppercase is an unblanked tile, lowercase is a blank assigned
/// to that face, `?` is an unassigned blank. Used for a `simk` known-rack
/// argument and an `infer` played-tiles argument alike.
#[must_use]
pub fn parse_tiles(s: &str, ld: &LetterDistribution) -> Option<Vec<MachineLetter>> {
    s.chars()
        .map(|c| {
            if c == '?' {
                return Some(0u8 | BLANK_MASK);
            }
            let ml = ld.machine_letter_for_glyph(c.to_ascii_uppercase())?;
            Some(if c.is_lowercase() { blank(ml) } else { ml })
        })
        .collect()
}

/// Parse a glyph string into a [`Rack`], unblanking any lowercase face
/// back to a bare blank count (a `Rack` tracks how many blanks it holds,
/// not which face each is wearing).
#[must_use]
pub fn parse_rack(s: &str, ld: &LetterDistribution) -> Option<Rack> {
    let tiles = parse_tiles(s, ld)?;
    let mut rack = Rack::new(ld.alphabet_size());
    for ml in tiles {
        rack.add(if ml & BLANK_MASK != 0 { 0 } else { ml });
    }
    Some(rack)
}

/// Render a rack/leave in a stable glyph order, blanks as `?`.
#[must_use]
pub fn format_rack(rack: &Rack, ld: &LetterDistribution) -> String {
    let mut out = String::new();
    for (ml, count) in rack.iter() {
        for _ in 0..count {
            out.push(if ml == 0 { '?' } else { ld.glyph(ml) });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use magpie_core::letters::english;
    use magpie_core::movegen::mv::PlacedTile;

    #[test]
    fn formats_a_horizontal_opening_placement() {
        let ld = english();
        let tiles: Vec<_> = "MUZJIKS"
            .chars()
            .map(|c| PlacedTile::New {
                letter: ld.machine_letter_for_glyph(c).unwrap(),
                is_blank: false,
            })
            .collect();
        let mv = Move::Place {
            start_row: 7,
            start_col: 7,
            direction: Direction::Horizontal,
            tiles,
            score: 128,
            equity: 128.0,
        };
        assert_eq!(format_move(&mv, &ld), "8h.MUZJIKS");
    }

    #[test]
    fn formats_pass_and_exchange() {
        let ld = english();
        assert_eq!(format_move(&Move::pass(), &ld), "pass");
        let e = Move::Exchange {
            tiles: vec![ld.machine_letter_for_glyph('A').unwrap()],
            equity: 0.0,
        };
        assert_eq!(format_move(&e, &ld), "ex.A");
    }
}
