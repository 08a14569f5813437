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

//! Loading the immutable shared resources named by `-lex`, `-ld`, `-bdn`
//! and `-winpct` from disk into the `magpie_core` in-memory types.
//!
//! `magpie_core::kwg::Kwg::from_bytes` needs the DAWG root node index as a
//! separate argument — nothing in the packed node array alone identifies
//! it. We
//! resolve that the same way the builder's companion loader would: the
//! last four bytes of the file are a little-endian `dawg_root` footer
//! appended after the node array, and everything before it is the node
//! array itself. This is this crate's own on-disk convention for the
//! files it reads and writes (via `convert`), not a claim about any other
//! tool's `.kwg` layout.

use magpie_core::error::ResourceError;
use magpie_core::klv::Klv;
use magpie_core::kwg::Kwg;
use magpie_core::letters::{english, LetterDistribution};
use std::fs;
use std::path::Path;

fn read_file(path: &str) -> Result<Vec<u8>, ResourceError> {
    fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ResourceError::NotFound(path.to_string())
        } else {
            ResourceError::Unreadable(format!("{path}: {e}"))
        }
    })
}

/// Resolve a lexicon name to its `.kwg` path under `data/lexica/`, the
/// convention this front end uses.
#[must_use]
pub fn kwg_path(lexicon_name: &str) -> String {
    format!("data/lexica/{lexicon_name}.kwg")
}

#[must_use]
pub fn klv_path(lexicon_name: &str) -> String {
    format!("data/lexica/{lexicon_name}.klv")
}

#[must_use]
pub fn letter_distribution_path(name: &str) -> String {
    format!("data/letterdistributions/{name}.csv")
}

pub fn load_kwg(path: &str) -> Result<Kwg, ResourceError> {
    let bytes = read_file(path)?;
    if bytes.len() < 4 {
        return Err(ResourceError::Corrupt(format!("{path}: too short to hold a dawg_root footer")));
    }
    let (node_bytes, footer) = bytes.split_at(bytes.len() - 4);
    let dawg_root = u32::from_le_bytes([footer[0], footer[1], footer[2], footer[3]]);
    Kwg::from_bytes(node_bytes, dawg_root)
}

pub fn save_kwg(kwg: &Kwg, path: &str) -> std::io::Result<()> {
    let mut bytes = kwg.to_bytes();
    bytes.extend_from_slice(&kwg.dawg_root().to_le_bytes());
    fs::write(path, bytes)
}

pub fn load_klv(path: &str) -> Result<Klv, ResourceError> {
    let bytes = read_file(path)?;
    Klv::from_bytes(&bytes)
}

pub fn save_klv(klv: &Klv, path: &str) -> std::io::Result<()> {
    fs::write(path, klv.to_bytes())
}

/// Load a letter distribution by name, falling back to the built-in
/// `english()` table when no file by that name exists on disk yet (so a
/// fresh checkout can run `gen`/`autoplay` against the bundled default
/// without first installing lexicon data).
pub fn load_letter_distribution(name: &str) -> Result<LetterDistribution, ResourceError> {
    let path = letter_distribution_path(name);
    if Path::new(&path).exists() {
        let csv = fs::read_to_string(&path)
            .map_err(|e| ResourceError::Unreadable(format!("{path}: {e}")))?;
        LetterDistribution::from_csv(name, &csv)
    } else if name == "english" {
        Ok(english())
    } else {
        Err(ResourceError::NotFound(path))
    }
}
