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

//! Game history: an ordered log of [`GameEvent`]s, one per turn (plus
//! the handful of post-hoc adjustment events a challenge or end-of-game
//! scoring pass appends), matching 's "Game event" record and the GCG
//! event taxonomy in .

use crate::movegen::mv::Move;
use crate::rack::Rack;

/// The kind of a recorded event, mirroring the GCG line types one for
/// one (`>player: rack coord word +score cumulative`, the exchange and pass
/// forms, and the post-hoc adjustment lines).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEventKind {
    Placement,
    Exchange,
    Pass,
    /// A previously recorded placement was challenged off the board as a
    /// phony.
    PhonyReturned,
    /// A challenge against a valid word was itself wrong; the challenged
    /// player is credited a rule-specific bonus.
    ChallengeBonus,
    /// Game-end bonus: the emptied-rack player is credited the value of
    /// every opponent's remaining tiles.
    EndRackPoints,
    /// Game-end penalty: a player still holding tiles when the game ends is
    /// charged their value.
    EndRackPenalty,
    /// A clock-based penalty (out of scope for timing itself; only the
    /// resulting score adjustment is modeled).
    TimePenalty,
}

/// One entry in a game's history.
#[derive(Clone, Debug)]
pub struct GameEvent {
    pub kind: GameEventKind,
    pub player_index: usize,
    /// The scoring player's cumulative score *after* this event.
    pub cumulative_score: i32,
    /// The signed change in score this event represents.
    pub score_adjustment: i32,
    /// The rack the player held at the moment of this event (before any
    /// tiles this event itself plays or removes, matching the GCG line's
    /// rack field).
    pub rack: Rack,
    /// The move this event records, if any (absent for pure adjustment
    /// events like `EndRackPoints`).
    pub played_move: Option<Move>,
    /// A free-text annotation (e.g. the phony word that was returned),
    /// analogous to a GCG `#note` line attached to the preceding event.
    pub note: Option<String>,
}

/// An ordered, append-only log of everything that happened in one game.
#[derive(Clone, Debug, Default)]
pub struct GameHistory {
    events: Vec<GameEvent>,
}

impl GameHistory {
    #[must_use]
    pub fn new() -> Self {
        GameHistory::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&GameEvent> {
        self.events.last()
    }

    /// Attach a note to the most recently pushed event, the way a GCG
    /// `#note` line attaches to the event above it.
    pub fn annotate_last(&mut self, note: impl Into<String>) {
        if let Some(event) = self.events.last_mut() {
            event.note = Some(note.into());
        }
    }

    /// Truncate the log back to `len` events, used when a challenge unplays
    /// the move whose event was just appended.
    pub fn truncate(&mut self, len: usize) {
        self.events.truncate(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::letters::english;

    #[test]
    fn push_and_annotate() {
        let ld = english();
        let mut history = GameHistory::new();
        history.push(GameEvent {
            kind: GameEventKind::Pass,
            player_index: 0,
            cumulative_score: 0,
            score_adjustment: 0,
            rack: Rack::for_distribution(&ld),
            played_move: None,
            note: None,
        });
        history.annotate_last("a note");
        assert_eq!(history.len(), 1);
        assert_eq!(history.last().unwrap().note.as_deref(), Some("a note"));
    }

    #[test]
    fn truncate_removes_tail() {
        let ld = english();
        let mut history = GameHistory::new();
        for _ in 0..3 {
            history.push(GameEvent {
                kind: GameEventKind::Pass,
                player_index: 0,
                cumulative_score: 0,
                score_adjustment: 0,
                rack: Rack::for_distribution(&ld),
                played_move: None,
                note: None,
            });
        }
        history.truncate(1);
        assert_eq!(history.len(), 1);
    }
}
