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

//! The leave evaluator: a compact lookup table mapping a canonical
//! leave to a learned equity value.
//!
//! The `.klv` binary format has a magic prefix, a header describing
//! leave-size buckets, and packed `(canonical leave, fixed-point equity)`
//! records; exact layout is owned by the builder. Here we only need the
//! in-memory contract: given a leave's canonical key, look up its equity in
//! O(leave size) by hashing that key directly (the real `.klv` uses a
//! perfect hash per bucket; a plain hash map is observationally equivalent
//! for every caller in this crate and is what we build from a parsed file).

use crate::error::ResourceError;
use crate::rack::Rack;
use std::collections::HashMap;

/// Fixed-point equity: the `.klv` value scaled by this factor and stored as
/// an integer on disk. Exposed so string/codec layers can convert to the
/// same values a human would type, e.g. in a UCGI `eq` field.
pub const EQUITY_FIXED_POINT_SCALE: f64 = 256.0;

const KLV_MAGIC: &[u8; 4] = b"KLV2";

/// A canonical leave → equity lookup table.
#[derive(Clone, Debug)]
pub struct Klv {
    values: HashMap<Vec<u8>, f64>,
}

impl Klv {
    /// Parse a `.klv` file: a 4-byte magic, a little-endian `u32` record
    /// count, then that many `(u8 leave_len, leave_len bytes, i32
    /// fixed-point equity)` records.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ResourceError> {
        if bytes.len() < 8 || &bytes[0..4] != KLV_MAGIC {
            return Err(ResourceError::Corrupt(
                "klv file missing magic prefix".to_string(),
            ));
        }
        let count = u32::from_le_bytes(bytes[4..8].try_into().unwrap()) as usize;
        let mut values = HashMap::with_capacity(count);
        let mut pos = 8;
        for _ in 0..count {
            if pos >= bytes.len() {
                return Err(ResourceError::Corrupt("klv truncated".to_string()));
            }
            let len = bytes[pos] as usize;
            pos += 1;
            if pos + len + 4 > bytes.len() {
                return Err(ResourceError::Corrupt("klv truncated record".to_string()));
            }
            let key = bytes[pos..pos + len].to_vec();
            pos += len;
            let fixed = i32::from_le_bytes(bytes[pos..pos + 4].try_into().unwrap());
            pos += 4;
            values.insert(key, f64::from(fixed) / EQUITY_FIXED_POINT_SCALE);
        }
        Ok(Klv { values })
    }

    /// Serialize back to the `.klv` byte layout (used by `convert` and by
    /// round-trip tests).
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(KLV_MAGIC);
        out.extend_from_slice(&(self.values.len() as u32).to_le_bytes());
        let mut entries: Vec<_> = self.values.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        for (key, value) in entries {
            out.push(key.len() as u8);
            out.extend_from_slice(key);
            let fixed = (value * EQUITY_FIXED_POINT_SCALE).round() as i32;
            out.extend_from_slice(&fixed.to_le_bytes());
        }
        out
    }

    #[must_use]
    pub fn from_map(values: HashMap<Vec<u8>, f64>) -> Self {
        Klv { values }
    }

    /// The learned equity of keeping exactly this leave, or 0.0 if the
    /// leave was never observed during training (a full-rack discard, or a
    /// leave larger than the table's maximum bucket).
    #[must_use]
    pub fn leave_value(&self, leave: &Rack) -> f64 {
        if leave.is_empty() {
            return 0.0;
        }
        self.values
            .get(leave.canonical_key())
            .copied()
            .unwrap_or(0.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::letters::english;

    #[test]
    fn roundtrip_bytes() {
        let ld = english();
        let s = ld.machine_letter_for_glyph('S').unwrap();
        let mut rack = Rack::for_distribution(&ld);
        rack.add(s);
        let mut map = HashMap::new();
        map.insert(rack.canonical_key().to_vec(), 8.5);
        let klv = Klv::from_map(map);
        let bytes = klv.to_bytes();
        let klv2 = Klv::from_bytes(&bytes).unwrap();
        assert!((klv2.leave_value(&rack) - 8.5).abs() < 1e-9);
    }

    #[test]
    fn unknown_leave_is_zero() {
        let ld = english();
        let klv = Klv::from_map(HashMap::new());
        let rack = Rack::for_distribution(&ld);
        assert_eq!(klv.leave_value(&rack), 0.0);
    }

    #[test]
    fn bad_magic_rejected() {
        let err = Klv::from_bytes(b"xxxxxxxx");
        assert!(err.is_err());
    }
}
