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

//! CGP: a one-line text encoding of a game position.
//!
//! `<row>/<row>/.../<row> <rack1>/<rack2> <score1>/<score2>
//! <consecutive_scoreless> [-flag value]...`. A row is a run of digits (an
//! empty-square count) interleaved with letters (uppercase a placed tile,
//! lowercase a blank assigned to that face); row widths must all equal the
//! board dimension. Parsing and serializing always go through the same
//! canonical run-length form, so `parse` then `to_string` is idempotent
//!.

use crate::board::Board;
use crate::board_layout::BoardLayout;
use crate::error::CgpError;
use crate::letters::{is_blanked, unblank, LetterDistribution, MachineLetter};
use crate::rack::Rack;

/// A parsed CGP position: everything needed to reconstruct a [`Board`] (once
/// given a [`BoardLayout`]) plus both racks, both scores, the scoreless-turn
/// counter, and any trailing `-flag value` option overrides.
#[derive(Clone, Debug, PartialEq)]
pub struct CgpPosition {
    /// One entry per board row, each `dim` machine letters wide (0 for
    /// empty).
    pub rows: Vec<Vec<MachineLetter>>,
    pub rack1: Rack,
    pub rack2: Rack,
    pub score1: i32,
    pub score2: i32,
    pub consecutive_scoreless: u32,
    pub options: Vec<(String, String)>,
}

impl CgpPosition {
    /// Parse a CGP string against `ld` for glyph lookup. Board dimension is
    /// inferred from the row count, and every row must be exactly that wide.
    pub fn parse(s: &str, ld: &LetterDistribution) -> Result<Self, CgpError> {
        let mut tokens = s.split_whitespace();
        let board_field = tokens.next().ok_or(CgpError::MissingField)?;
        let racks_field = tokens.next().ok_or(CgpError::MissingField)?;
        let scores_field = tokens.next().ok_or(CgpError::MissingField)?;
        let consecutive_field = tokens.next().ok_or(CgpError::MissingField)?;

        let row_strs: Vec<&str> = board_field.split('/').collect();
        let dim = row_strs.len();
        let mut rows = Vec::with_capacity(dim);
        for (i, row_str) in row_strs.iter().enumerate() {
            let row = parse_row(row_str, dim, ld)
                .ok_or(CgpError::MalformedRow { row: i })?;
            rows.push(row);
        }

        let (rack1_str, rack2_str) = racks_field
            .split_once('/')
            .ok_or(CgpError::MissingField)?;
        let rack1 = parse_rack(rack1_str, ld)?;
        let rack2 = parse_rack(rack2_str, ld)?;

        let (score1_str, score2_str) = scores_field
            .split_once('/')
            .ok_or(CgpError::MissingField)?;
        let score1 = score1_str
            .parse()
            .map_err(|_| CgpError::MalformedNumber(score1_str.to_string()))?;
        let score2 = score2_str
            .parse()
            .map_err(|_| CgpError::MalformedNumber(score2_str.to_string()))?;

        let consecutive_scoreless = consecutive_field
            .parse()
            .map_err(|_| CgpError::MalformedNumber(consecutive_field.to_string()))?;

        let mut options = Vec::new();
        let remaining: Vec<&str> = tokens.collect();
        let mut i = 0;
        while i < remaining.len() {
            let flag = remaining[i];
            if !flag.starts_with('-') {
                return Err(CgpError::MissingField);
            }
            let value = remaining.get(i + 1).copied().unwrap_or("");
            options.push((flag.trim_start_matches('-').to_string(), value.to_string()));
            i += 2;
        }

        Ok(CgpPosition {
            rows,
            rack1,
            rack2,
            score1,
            score2,
            consecutive_scoreless,
            options,
        })
    }

    /// Build a [`Board`] from this position's tiles against `layout`. The
    /// caller is responsible for recomputing cross-sets afterward (via
    /// [`Board::recompute_all`]) since that requires the active word graph,
    /// which a CGP string does not itself carry.
    pub fn to_board(&self, layout: &BoardLayout) -> Result<Board, CgpError> {
        let dim = layout.dim() as usize;
        if self.rows.len() != dim {
            return Err(CgpError::WrongRowCount {
                found: self.rows.len(),
                expected: dim,
            });
        }
        let mut board = Board::new(layout);
        for (r, row) in self.rows.iter().enumerate() {
            if row.len() != dim {
                return Err(CgpError::MalformedRow { row: r });
            }
            for (c, &ml) in row.iter().enumerate() {
                if ml != 0 {
                    board.set_tile(r as u8, c as u8, ml);
                }
            }
        }
        Ok(board)
    }

    /// Serialize back to the canonical one-line CGP form.
    #[must_use]
    pub fn to_cgp_string(&self, ld: &LetterDistribution) -> String {
        let rows: Vec<String> = self.rows.iter().map(|row| serialize_row(row, ld)).collect();
        let mut out = format!(
            "{} {}/{} {}/{} {}",
            rows.join("/"),
            rack_to_string(&self.rack1, ld),
            rack_to_string(&self.rack2, ld),
            self.score1,
            self.score2,
            self.consecutive_scoreless,
        );
        for (flag, value) in &self.options {
            out.push_str(&format!(" -{flag} {value}"));
        }
        out
    }
}

fn parse_row(row_str: &str, dim: usize, ld: &LetterDistribution) -> Option<Vec<MachineLetter>> {
    let mut row = Vec::with_capacity(dim);
    let mut digits = String::new();
    for ch in row_str.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        if !digits.is_empty() {
            let n: usize = digits.parse().ok()?;
            row.extend(std::iter::repeat(0).take(n));
            digits.clear();
        }
        row.push(ld.machine_letter_for_glyph(ch)?);
    }
    if !digits.is_empty() {
        let n: usize = digits.parse().ok()?;
        row.extend(std::iter::repeat(0).take(n));
    }
    if row.len() != dim {
        return None;
    }
    Some(row)
}

fn serialize_row(row: &[MachineLetter], ld: &LetterDistribution) -> String {
    let mut out = String::new();
    let mut run = 0usize;
    for &ml in row {
        if ml == 0 {
            run += 1;
        } else {
            if run > 0 {
                out.push_str(&run.to_string());
                run = 0;
            }
            out.push(ld.glyph(ml));
        }
    }
    if run > 0 {
        out.push_str(&run.to_string());
    }
    out
}

fn parse_rack(s: &str, ld: &LetterDistribution) -> Result<Rack, CgpError> {
    let mut rack = Rack::new(ld.alphabet_size());
    for ch in s.chars() {
        let ml = ld
            .machine_letter_for_glyph(ch)
            .ok_or_else(|| CgpError::RackOverflow(s.to_string()))?;
        // A lowercase glyph in a rack field has no board meaning; it is
        // stored as an unassigned blank, same as `?`.
        rack.add(if is_blanked(ml) { 0 } else { unblank(ml) });
    }
    Ok(rack)
}

fn rack_to_string(rack: &Rack, ld: &LetterDistribution) -> String {
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
    use crate::board_layout::standard15;
    use crate::letters::english;

    #[test]
    fn parses_empty_board() {
        let ld = english();
        let rows: Vec<String> = (0..15).map(|_| "15".to_string()).collect();
        let s = format!("{} AEIOUMT/BCDFGHJ 0/0 0", rows.join("/"));
        let pos = CgpPosition::parse(&s, &ld).unwrap();
        assert_eq!(pos.rows.len(), 15);
        assert!(pos.rows.iter().all(|r| r.iter().all(|&ml| ml == 0)));
        assert_eq!(pos.rack1.num_tiles(), 7);
        assert_eq!(pos.score1, 0);
        assert_eq!(pos.consecutive_scoreless, 0);
    }

    #[test]
    fn round_trip_is_idempotent() {
        let ld = english();
        let mut rows: Vec<String> = (0..15).map(|_| "15".to_string()).collect();
        rows[7] = "7CAT5".to_string();
        let s = format!("{} ABC/XYZ 12/0 0 -lex NWL20", rows.join("/"));
        let pos = CgpPosition::parse(&s, &ld).unwrap();
        let written = pos.to_cgp_string(&ld);
        let reparsed = CgpPosition::parse(&written, &ld).unwrap();
        let rewritten = reparsed.to_cgp_string(&ld);
        assert_eq!(written, rewritten);
    }

    #[test]
    fn to_board_places_tiles() {
        let ld = english();
        let mut rows: Vec<String> = (0..15).map(|_| "15".to_string()).collect();
        rows[7] = "7CAT5".to_string();
        let s = format!("{} /  0/0 0", rows.join("/"));
        let pos = CgpPosition::parse(&s, &ld).unwrap();
        let board = pos.to_board(&standard15()).unwrap();
        assert!(board.is_occupied(7, 7));
        assert_eq!(board.tile(7, 7), ld.machine_letter_for_glyph('C').unwrap());
    }

    #[test]
    fn rejects_wrong_row_width() {
        let ld = english();
        let s = "14/15/15/15/15/15/15/15/15/15/15/15/15/15/15 /  0/0 0";
        assert!(CgpPosition::parse(s, &ld).is_err());
    }
}
