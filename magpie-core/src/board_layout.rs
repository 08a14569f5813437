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

//! Named board-layout presets: bonus-multiplier and brick data per
//! square, plus the designated opening square, for a given board
//! dimension. Loading presets from a config file is a front-end concern;
//! this module only owns the in-memory contract and two built-in presets
//! so the engine is useful without external data.

use crate::board::Bonus;
use crate::error::ResourceError;
use once_cell::sync::Lazy;

/// A named bonus-multiplier template for a square board.
#[derive(Clone, Debug)]
pub struct BoardLayout {
    name: String,
    dim: u8,
    /// Row-major bonus grid, `dim * dim` entries.
    bonuses: Vec<Bonus>,
    opening_row: u8,
    opening_col: u8,
}

impl BoardLayout {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn dim(&self) -> u8 {
        self.dim
    }

    #[must_use]
    pub fn opening_square(&self) -> (u8, u8) {
        (self.opening_row, self.opening_col)
    }

    #[must_use]
    pub fn bonus(&self, row: u8, col: u8) -> Bonus {
        self.bonuses[row as usize * self.dim as usize + col as usize]
    }

    /// Parse a layout from a row-major grid of single-character codes:
    /// `.` none, `l`/`L` double/triple letter, `w`/`W` double/triple word,
    /// `#` a structural brick, `*` the opening square (also `.`-scored).
    /// Used by `convert` and tests; the production presets below are built
    /// in directly.
    pub fn from_grid(name: &str, rows: &[&str]) -> Result<Self, ResourceError> {
        let dim = rows.len();
        if dim == 0 || rows.iter().any(|r| r.chars().count() != dim) {
            return Err(ResourceError::Corrupt(
                "board layout grid must be square".to_string(),
            ));
        }
        if dim > 16 {
            return Err(ResourceError::Corrupt(
                "board dimension must be <= 16 (endgame move-undo mask is 16 bits)".to_string(),
            ));
        }
        let mut bonuses = Vec::with_capacity(dim * dim);
        let mut opening = None;
        for (r, row) in rows.iter().enumerate() {
            for (c, ch) in row.chars().enumerate() {
                let bonus = match ch {
                    '.' => Bonus::None,
                    'l' => Bonus::DoubleLetter,
                    'L' => Bonus::TripleLetter,
                    'w' => Bonus::DoubleWord,
                    'W' => Bonus::TripleWord,
                    '#' => Bonus::Brick,
                    '*' => {
                        opening = Some((r as u8, c as u8));
                        Bonus::None
                    }
                    other => {
                        return Err(ResourceError::Corrupt(format!(
                            "unknown board layout code `{other}`"
                        )))
                    }
                };
                bonuses.push(bonus);
            }
        }
        let (opening_row, opening_col) = opening.unwrap_or((dim as u8 / 2, dim as u8 / 2));
        Ok(BoardLayout {
            name: name.to_string(),
            dim: dim as u8,
            bonuses,
            opening_row,
            opening_col,
        })
    }
}

static STANDARD15: Lazy<BoardLayout> = Lazy::new(|| {
    let rows = [
        "W..l...W...l..W",
        ".w...L...L...w.",
        "..w...l.l...w..",
        "l..w...l...w..l",
        "....w.....w....",
        ".L...L...L...L.",
        "..l...l.l...l..",
        "W..l...*...l..W",
        "..l...l.l...l..",
        ".L...L...L...L.",
        "....w.....w....",
        "l..w...l...w..l",
        "..w...l.l...w..",
        ".w...L...L...w.",
        "W..l...W...l..W",
    ];
    BoardLayout::from_grid("standard15", &rows).expect("built-in layout is well-formed")
});

/// The standard 15x15 Scrabble board. Built once per process and cloned
/// out of a [`Lazy`] static on every call.
#[must_use]
pub fn standard15() -> BoardLayout {
    STANDARD15.clone()
}

static SUPER21: Lazy<BoardLayout> = Lazy::new(|| {
    // A symmetric 21x21 template; exact bonus placement for `super`
    // variants differs across rule sets, so this built-in is a reasonable
    // representative rather than a single canonical standard.
    let mut rows = vec![vec!['.'; 21]; 21];
    rows[10][10] = '*';
    for i in 0..21 {
        if i % 4 == 0 {
            rows[i][i] = 'W';
            rows[i][20 - i] = 'W';
        } else if i % 4 == 2 {
            rows[i][i] = 'w';
            rows[i][20 - i] = 'w';
        }
    }
    for i in (2..21).step_by(6) {
        rows[i][10] = 'L';
        rows[10][i] = 'L';
    }
    let row_strs: Vec<String> = rows.into_iter().map(|r| r.into_iter().collect()).collect();
    let row_refs: Vec<&str> = row_strs.iter().map(String::as_str).collect();
    BoardLayout::from_grid("super21", &row_refs).expect("built-in layout is well-formed")
});

/// The 21x21 "super" board used by some large-board variants. Built once
/// per process and cloned out of a [`Lazy`] static on every call.
#[must_use]
pub fn super21() -> BoardLayout {
    SUPER21.clone()
}

/// Resolve a named preset, matching the `-bdn LAYOUT` configuration flag.
pub fn by_name(name: &str) -> Result<BoardLayout, ResourceError> {
    match name {
        "standard15" => Ok(standard15()),
        "super21" => Ok(super21()),
        other => Err(ResourceError::NotFound(format!(
            "unknown board layout `{other}`"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard15_opening_is_center() {
        let layout = standard15();
        assert_eq!(layout.opening_square(), (7, 7));
        assert_eq!(layout.bonus(0, 0), Bonus::TripleWord);
    }

    #[test]
    fn rejects_nonsquare_grid() {
        assert!(BoardLayout::from_grid("bad", &["..", "."]).is_err());
    }

    #[test]
    fn rejects_oversized_board() {
        let rows = vec!["."; 17];
        assert!(BoardLayout::from_grid("too-big", &rows).is_err());
    }
}
