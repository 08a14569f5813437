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

//! GCG: a line-oriented game record, read and written losslessly
//! enough that a second parse/write round-trip is byte-identical.
//!
//! A file is a block of `#pragma value` lines (metadata) followed by one
//! `>player: ...` line per [`GameEvent`], each optionally followed by a
//! `#note ...` line attaching to it. The event line grammar is tagged by
//! its second field: a coordinate for a placement, `-letters` for an
//! exchange, a bare `-` for a pass, `--` for a returned phony, and a
//! parenthesized `(challenge)`/`(tiles)`/`(time)` tag for the three
//! adjustment-only events.

use crate::board::Direction;
use crate::error::ResourceError;
use crate::history::{GameEvent, GameEventKind, GameHistory};
use crate::letters::{is_blanked, unblank, LetterDistribution, MachineLetter};
use crate::movegen::mv::{Move, PlacedTile};
use crate::rack::Rack;

/// The pragma metadata preceding a GCG file's events.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GcgMetadata {
    pub player_names: [String; 2],
    pub lexicon: Option<String>,
    pub character_encoding: Option<String>,
    pub board_layout: Option<String>,
    pub game_type: Option<String>,
    pub description: Option<String>,
    pub title: Option<String>,
    pub id: Option<String>,
}

/// Parse a full GCG document into its pragma metadata and event history.
pub fn parse(text: &str, ld: &LetterDistribution) -> Result<(GcgMetadata, GameHistory), ResourceError> {
    let mut metadata = GcgMetadata::default();
    let mut history = GameHistory::new();
    let mut player_index_by_name: Vec<String> = Vec::new();

    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix('#') {
            if let Some(note) = rest.strip_prefix("note ") {
                history.annotate_last(note.to_string());
                continue;
            }
            let mut parts = rest.splitn(2, ' ');
            let key = parts.next().unwrap_or("");
            let value = parts.next().unwrap_or("").trim().to_string();
            match key {
                "player1" => metadata.player_names[0] = value,
                "player2" => metadata.player_names[1] = value,
                "lexicon" => metadata.lexicon = Some(value),
                "character-encoding" => metadata.character_encoding = Some(value),
                "board-layout" => metadata.board_layout = Some(value),
                "game-type" => metadata.game_type = Some(value),
                "description" => metadata.description = Some(value),
                "title" => metadata.title = Some(value),
                "id" => metadata.id = Some(value),
                _ => {}
            }
            continue;
        }
        if let Some(rest) = line.strip_prefix('>') {
            let (name, body) = rest
                .split_once(':')
                .ok_or_else(|| ResourceError::Corrupt(format!("malformed gcg event line: {line}")))?;
            let name = name.trim();
            let player_index = player_index_by_name
                .iter()
                .position(|n| n == name)
                .unwrap_or_else(|| {
                    player_index_by_name.push(name.to_string());
                    player_index_by_name.len() - 1
                });
            let event = parse_event_body(player_index, body.trim(), ld)
                .ok_or_else(|| ResourceError::Corrupt(format!("malformed gcg event line: {line}")))?;
            history.push(event);
            continue;
        }
        return Err(ResourceError::Corrupt(format!(
            "unrecognized gcg line: {line}"
        )));
    }
    Ok((metadata, history))
}

fn parse_event_body(player_index: usize, body: &str, ld: &LetterDistribution) -> Option<GameEvent> {
    let fields: Vec<&str> = body.split_whitespace().collect();
    if fields.is_empty() {
        return None;
    }
    if fields[0] == "--" {
        // >player: -- -score cumulative
        let score_adjustment: i32 = fields.get(1)?.parse().ok()?;
        let cumulative: i32 = fields.get(2)?.parse().ok()?;
        return Some(GameEvent {
            kind: GameEventKind::PhonyReturned,
            player_index,
            cumulative_score: cumulative,
            score_adjustment,
            rack: Rack::new(ld.alphabet_size()),
            played_move: None,
            note: None,
        });
    }
    if let Some(tag) = fields[0].strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        let adjustment: i32 = fields.get(1)?.parse().ok()?;
        let cumulative: i32 = fields.get(2)?.parse().ok()?;
        let kind = match tag {
            "challenge" => GameEventKind::ChallengeBonus,
            "tiles" => {
                if adjustment >= 0 {
                    GameEventKind::EndRackPoints
                } else {
                    GameEventKind::EndRackPenalty
                }
            }
            "time" => GameEventKind::TimePenalty,
            _ => return None,
        };
        return Some(GameEvent {
            kind,
            player_index,
            cumulative_score: cumulative,
            score_adjustment: adjustment,
            rack: Rack::new(ld.alphabet_size()),
            played_move: None,
            note: None,
        });
    }

    // Move-carrying events: rack coord word +score cumulative
    //                        rack -letters +0 cumulative
    //                        rack -        +0 cumulative
    let rack_str = fields.first()?;
    let rack = parse_rack_field(rack_str, ld)?;
    let second = *fields.get(1)?;
    if second == "-" {
        let cumulative: i32 = fields.get(3)?.parse().ok()?;
        return Some(GameEvent {
            kind: GameEventKind::Pass,
            player_index,
            cumulative_score: cumulative,
            score_adjustment: 0,
            rack,
            played_move: Some(Move::pass()),
            note: None,
        });
    }
    if let Some(letters) = second.strip_prefix('-') {
        let tiles: Vec<MachineLetter> = letters
            .chars()
            .map(|c| ld.machine_letter_for_glyph(c))
            .collect::<Option<Vec<_>>>()?;
        let cumulative: i32 = fields.get(3)?.parse().ok()?;
        return Some(GameEvent {
            kind: GameEventKind::Exchange,
            player_index,
            cumulative_score: cumulative,
            score_adjustment: 0,
            rack,
            played_move: Some(Move::Exchange {
                tiles,
                equity: 0.0,
            }),
            note: None,
        });
    }
    // Placement: fields[1] is the coordinate, fields[2] the word.
    let (start_row, start_col, direction) = parse_coord(second)?;
    let word = fields.get(2)?;
    let score: i32 = fields.get(3)?.strip_prefix('+')?.parse().ok()?;
    let cumulative: i32 = fields.get(4)?.parse().ok()?;
    let tiles = parse_word(word, ld)?;
    Some(GameEvent {
        kind: GameEventKind::Placement,
        player_index,
        cumulative_score: cumulative,
        score_adjustment: score,
        rack,
        played_move: Some(Move::Place {
            start_row,
            start_col,
            direction,
            tiles,
            score,
            equity: 0.0,
        }),
        note: None,
    })
}

fn parse_rack_field(s: &str, ld: &LetterDistribution) -> Option<Rack> {
    let mut rack = Rack::new(ld.alphabet_size());
    for ch in s.chars() {
        let ml = ld.machine_letter_for_glyph(ch)?;
        rack.add(if is_blanked(ml) { 0 } else { unblank(ml) });
    }
    Some(rack)
}

/// A placement's word field: one character per square in the run,
/// uppercase for a tile placed this turn, lowercase for a placed blank,
/// and `.` for a square the board already held (played through).
fn parse_word(word: &str, ld: &LetterDistribution) -> Option<Vec<PlacedTile>> {
    word.chars()
        .map(|ch| {
            if ch == '.' {
                Some(PlacedTile::PlayedThrough(0))
            } else {
                let ml = ld.machine_letter_for_glyph(ch)?;
                Some(PlacedTile::New {
                    letter: unblank(ml),
                    is_blank: is_blanked(ml),
                })
            }
        })
        .collect()
}

/// GCG coordinates: a horizontal play is written `<row><col letter>` (row
/// first); a vertical play is written `<col letter><row>` (letter first).
/// Rows and columns are 1-indexed in the text, 0-indexed internally.
fn parse_coord(s: &str) -> Option<(u8, u8, Direction)> {
    let first = s.chars().next()?;
    if first.is_ascii_digit() {
        let split = s.find(|c: char| c.is_ascii_alphabetic())?;
        let row: u8 = s[..split].parse().ok()?;
        let col_letter = s[split..].chars().next()?;
        let col = col_letter_to_index(col_letter)?;
        Some((row.checked_sub(1)?, col, Direction::Horizontal))
    } else {
        let split = s.find(|c: char| c.is_ascii_digit())?;
        let col_letter = s[..split].chars().next()?;
        let col = col_letter_to_index(col_letter)?;
        let row: u8 = s[split..].parse().ok()?;
        Some((row.checked_sub(1)?, col, Direction::Vertical))
    }
}

fn col_letter_to_index(c: char) -> Option<u8> {
    let upper = c.to_ascii_uppercase();
    if upper.is_ascii_uppercase() {
        Some(upper as u8 - b'A')
    } else {
        None
    }
}

fn col_index_to_letter(i: u8) -> char {
    (b'A' + i) as char
}

fn format_coord(start_row: u8, start_col: u8, direction: Direction) -> String {
    match direction {
        Direction::Horizontal => format!("{}{}", start_row + 1, col_index_to_letter(start_col)),
        Direction::Vertical => format!("{}{}", col_index_to_letter(start_col), start_row + 1),
    }
}

fn format_word(tiles: &[PlacedTile], ld: &LetterDistribution) -> String {
    tiles
        .iter()
        .map(|t| match t {
            PlacedTile::PlayedThrough(_) => '.',
            PlacedTile::New { letter, is_blank } => {
                if *is_blank {
                    ld.glyph(letter | crate::letters::BLANK_MASK)
                } else {
                    ld.glyph(*letter)
                }
            }
        })
        .collect()
}

fn format_rack(rack: &Rack, ld: &LetterDistribution) -> String {
    let mut out = String::new();
    for (ml, count) in rack.iter() {
        for _ in 0..count {
            out.push(if ml == 0 { '?' } else { ld.glyph(ml) });
        }
    }
    out
}

/// Serialize pragma metadata and a game history back to GCG text.
#[must_use]
pub fn write(metadata: &GcgMetadata, history: &GameHistory, ld: &LetterDistribution) -> String {
    let mut out = String::new();
    if !metadata.player_names[0].is_empty() {
        out.push_str(&format!("#player1 {}\n", metadata.player_names[0]));
    }
    if !metadata.player_names[1].is_empty() {
        out.push_str(&format!("#player2 {}\n", metadata.player_names[1]));
    }
    if let Some(v) = &metadata.lexicon {
        out.push_str(&format!("#lexicon {v}\n"));
    }
    if let Some(v) = &metadata.character_encoding {
        out.push_str(&format!("#character-encoding {v}\n"));
    }
    if let Some(v) = &metadata.board_layout {
        out.push_str(&format!("#board-layout {v}\n"));
    }
    if let Some(v) = &metadata.game_type {
        out.push_str(&format!("#game-type {v}\n"));
    }
    if let Some(v) = &metadata.description {
        out.push_str(&format!("#description {v}\n"));
    }
    if let Some(v) = &metadata.title {
        out.push_str(&format!("#title {v}\n"));
    }
    if let Some(v) = &metadata.id {
        out.push_str(&format!("#id {v}\n"));
    }
    for event in history.events() {
        let name = metadata
            .player_names
            .get(event.player_index)
            .filter(|n| !n.is_empty())
            .cloned()
            .unwrap_or_else(|| format!("player{}", event.player_index + 1));
        let rack = format_rack(&event.rack, ld);
        let line = match event.kind {
            GameEventKind::Placement => {
                let Some(Move::Place {
                    start_row,
                    start_col,
                    direction,
                    tiles,
                    ..
                }) = &event.played_move
                else {
                    continue;
                };
                format!(
                    ">{name}: {rack} {} {} +{} {}",
                    format_coord(*start_row, *start_col, *direction),
                    format_word(tiles, ld),
                    event.score_adjustment,
                    event.cumulative_score
                )
            }
            GameEventKind::Exchange => {
                let Some(Move::Exchange { tiles, .. }) = &event.played_move else {
                    continue;
                };
                let letters: String = tiles.iter().map(|&ml| ld.glyph(ml)).collect();
                format!(">{name}: {rack} -{letters} +0 {}", event.cumulative_score)
            }
            GameEventKind::Pass => {
                format!(">{name}: {rack} - +0 {}", event.cumulative_score)
            }
            GameEventKind::PhonyReturned => {
                format!(
                    ">{name}: -- {} {}",
                    event.score_adjustment, event.cumulative_score
                )
            }
            GameEventKind::ChallengeBonus => {
                format!(
                    ">{name}: (challenge) +{} {}",
                    event.score_adjustment, event.cumulative_score
                )
            }
            GameEventKind::EndRackPoints | GameEventKind::EndRackPenalty => {
                let sign = if event.score_adjustment >= 0 { "+" } else { "" };
                format!(
                    ">{name}: (tiles) {sign}{} {}",
                    event.score_adjustment, event.cumulative_score
                )
            }
            GameEventKind::TimePenalty => {
                format!(
                    ">{name}: (time) {} {}",
                    event.score_adjustment, event.cumulative_score
                )
            }
        };
        out.push_str(&line);
        out.push('\n');
        if let Some(note) = &event.note {
            out.push_str(&format!("#note {note}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::letters::english;

    #[test]
    fn parses_pragmas_and_placement() {
        let ld = english();
        let text = "#player1 Alice\n#player2 Bob\n#lexicon NWL20\n>Alice: ABCDEFG 8D CAT +10 10\n";
        let (meta, history) = parse(text, &ld).unwrap();
        assert_eq!(meta.player_names[0], "Alice");
        assert_eq!(meta.lexicon.as_deref(), Some("NWL20"));
        assert_eq!(history.len(), 1);
        let event = history.last().unwrap();
        assert_eq!(event.kind, GameEventKind::Placement);
        assert_eq!(event.cumulative_score, 10);
    }

    #[test]
    fn round_trip_is_stable() {
        let ld = english();
        let text = "#player1 Alice\n#player2 Bob\n\
                    >Alice: ABCDEFG 8D CAT +10 10\n\
                    >Bob: HIJKLMN - +0 0\n\
                    #note passed with a full rack\n";
        let (meta, history) = parse(text, &ld).unwrap();
        let written = write(&meta, &history, &ld);
        let (meta2, history2) = parse(&written, &ld).unwrap();
        let rewritten = write(&meta2, &history2, &ld);
        assert_eq!(written, rewritten);
    }

    #[test]
    fn exchange_and_pass_round_trip() {
        let ld = english();
        let text = "#player1 Alice\n#player2 Bob\n\
                    >Alice: ABCXYZ? -XYZ +0 0\n\
                    >Bob: DEFGHIJ - +0 0\n";
        let (meta, history) = parse(text, &ld).unwrap();
        assert_eq!(history.events()[0].kind, GameEventKind::Exchange);
        assert_eq!(history.events()[1].kind, GameEventKind::Pass);
        let written = write(&meta, &history, &ld);
        assert!(written.contains("-XYZ"));
    }

    #[test]
    fn coord_direction_detection() {
        assert_eq!(parse_coord("8D"), Some((7, 3, Direction::Horizontal)));
        assert_eq!(parse_coord("D8"), Some((7, 3, Direction::Vertical)));
    }
}
