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

//! Game state and play: the composite mutable object every engine
//! operates on, plus the backup stack that lets simulation roll a play back
//! out without re-deriving the position from scratch.
//!
//! A `Game` owns its board, bag, and players outright; it only *borrows*
//! the immutable, process-wide resources (letter distribution, word graphs,
//! leave tables) behind `Arc`, so duplicating a `Game` for a worker thread
//! is a deep copy of a few small `Vec`s plus a handful of refcount bumps —
//! never a re-parse of a `.kwg`/`.klv` file.

use crate::bag::Bag;
use crate::board::{Board, Direction};
use crate::error::{EnginePreconditionError, MagpieError, MagpieResult, MoveError};
use crate::history::{GameEvent, GameEventKind, GameHistory};
use crate::klv::Klv;
use crate::kwg::Kwg;
use crate::letters::{unblank, LetterDistribution, MachineLetter};
use crate::movegen::mv::{Move, PlacedTile};
use crate::movegen::movelist::{MoveList, RecordPolicy, SortKey};
use crate::movegen::{generate_moves, GameVariant, GenParams};
use crate::rack::{Rack, RACK_SIZE};
use std::sync::Arc;

/// The six-consecutive-zero-scoring-turns end condition.
pub const MAX_SCORELESS_TURNS: u32 = 6;

/// How many rolled-back positions a [`Game`] keeps on its backup stack
/// before the oldest is dropped. Bounded rather than unbounded because
/// simulation workers only ever need to undo the handful of plies they
/// just made.
const MAX_BACKUP_DEPTH: usize = 64;

/// Why a game stopped accepting further plays, resolving the six-pass
/// scenario into a named enum rather than an ad hoc flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEndReason {
    /// The game is still in progress.
    None,
    /// A player emptied their rack with the bag empty; end-rack bonuses and
    /// penalties have been applied.
    Standard,
    /// `MAX_SCORELESS_TURNS` consecutive zero-scoring turns elapsed.
    ConsecutiveZeros,
}

/// What a [`Game`] records before each mutation, so simulation-style
/// rollback is possible. The original ad hoc undo log
/// records deltas (square writes, cross-set changes, rack/score deltas);
/// here a full snapshot of the owned, already cheaply-cloneable state plays
/// the same role with less bookkeeping code, at the cost of copying a
/// little more per backup than a delta would.
#[derive(Clone)]
struct Snapshot {
    board: Board,
    bag: Bag,
    players: Vec<Player>,
    on_turn: usize,
    consecutive_scoreless_turns: u32,
    end_reason: GameEndReason,
    history_len: usize,
}

/// How much undo information a [`Game`] retains across plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackupMode {
    /// No backup is kept; `unplay`/`challenge_move` are unavailable.
    Off,
    /// Keep enough to unplay, for simulation roll-outs. The history log is
    /// not maintained in this mode.
    Simulation,
    /// Keep enough to unplay *and* maintain the full [`GameHistory`] log,
    /// for GCG-style game records.
    Gcg,
}

/// The GCG challenge-rule variants, selected via a
/// `-challenge-rule` configuration flag. Consumed by
/// [`Game::challenge_move`] to decide what happens on a wrong challenge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChallengeRule {
    /// Phonies cannot be played; any challenge of a phony simply removes it
    /// with no further penalty, and a wrong challenge (the word was valid)
    /// has no cost either.
    Void,
    /// A correct challenge removes the phony at no further cost; a wrong
    /// challenge also costs nothing beyond the challenger's turn.
    Single,
    /// A wrong challenge costs the challenger their entire next turn (the
    /// caller is expected to act on `ChallengeOutcome::challenger_loses_turn`).
    Double,
    /// A wrong challenge awards the challenged player a 5-point bonus.
    FivePoint,
    /// A wrong challenge awards the challenged player a 10-point bonus.
    TenPoint,
}

impl ChallengeRule {
    fn wrong_challenge_bonus(self) -> i32 {
        match self {
            ChallengeRule::FivePoint => 5,
            ChallengeRule::TenPoint => 10,
            ChallengeRule::Void | ChallengeRule::Single | ChallengeRule::Double => 0,
        }
    }
}

/// The outcome of [`Game::challenge_move`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChallengeOutcome {
    /// Whether the challenged play was in fact a phony (and was unplayed).
    pub phony: bool,
    /// The net score adjustment applied as a result of this challenge.
    pub score_adjustment: i32,
    /// Under [`ChallengeRule::Double`], set when the challenge was wrong:
    /// the caller is responsible for skipping the challenger's next turn.
    pub challenger_loses_turn: bool,
}

/// One seat at the table: identity, current holdings, and the per-player
/// knobs the move generator and the UCGI surface both read.
#[derive(Clone)]
pub struct Player {
    pub name: String,
    pub rack: Rack,
    pub score: i32,
    pub sort_key: SortKey,
    pub record_policy: RecordPolicy,
    pub kwg: Arc<Kwg>,
    pub klv: Arc<Klv>,
}

impl Player {
    #[must_use]
    pub fn new(name: impl Into<String>, rack: Rack, kwg: Arc<Kwg>, klv: Arc<Klv>) -> Self {
        Player {
            name: name.into(),
            rack,
            score: 0,
            sort_key: SortKey::Equity,
            record_policy: RecordPolicy::Best,
            kwg,
            klv,
        }
    }
}

struct LastMove {
    player: usize,
    mv: Move,
    touched: Vec<(u8, u8)>,
}

/// The composite mutable game state every engine call operates on.
#[derive(Clone)]
pub struct Game {
    board: Board,
    bag: Bag,
    players: Vec<Player>,
    on_turn: usize,
    starting_player: usize,
    consecutive_scoreless_turns: u32,
    end_reason: GameEndReason,
    variant: GameVariant,
    bingo_bonus: i32,
    backup_mode: BackupMode,
    ld: Arc<LetterDistribution>,
    backups: Vec<Snapshot>,
    history: GameHistory,
    last_move: Option<LastMove>,
}

impl Game {
    #[must_use]
    pub fn new(
        board: Board,
        bag: Bag,
        players: Vec<Player>,
        ld: Arc<LetterDistribution>,
        variant: GameVariant,
        bingo_bonus: i32,
    ) -> Self {
        Game {
            board,
            bag,
            players,
            on_turn: 0,
            starting_player: 0,
            consecutive_scoreless_turns: 0,
            end_reason: GameEndReason::None,
            variant,
            bingo_bonus,
            backup_mode: BackupMode::Off,
            ld,
            backups: Vec::new(),
            history: GameHistory::new(),
            last_move: None,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn bag(&self) -> &Bag {
        &self.bag
    }

    #[must_use]
    pub fn letter_distribution(&self) -> &Arc<LetterDistribution> {
        &self.ld
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player_mut(&mut self, index: usize) -> &mut Player {
        &mut self.players[index]
    }

    pub fn bag_mut(&mut self) -> &mut Bag {
        &mut self.bag
    }

    /// Force whose turn it is without advancing any other state. Used by
    /// the simulation engine to roll a rack for the player about to act,
    /// and by the inference engine to run move generation "as" the
    /// observed player while evaluating a candidate leave.
    pub fn set_on_turn(&mut self, index: usize) {
        self.on_turn = index;
    }

    #[must_use]
    pub fn on_turn(&self) -> usize {
        self.on_turn
    }

    #[must_use]
    pub fn other_player(&self) -> usize {
        1 - self.on_turn
    }

    #[must_use]
    pub fn starting_player(&self) -> usize {
        self.starting_player
    }

    pub fn set_starting_player(&mut self, index: usize) {
        self.starting_player = index;
        self.on_turn = index;
    }

    #[must_use]
    pub fn consecutive_scoreless_turns(&self) -> u32 {
        self.consecutive_scoreless_turns
    }

    #[must_use]
    pub fn end_reason(&self) -> GameEndReason {
        self.end_reason
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.end_reason != GameEndReason::None
    }

    #[must_use]
    pub fn variant(&self) -> GameVariant {
        self.variant
    }

    #[must_use]
    pub fn history(&self) -> &GameHistory {
        &self.history
    }

    pub fn set_backup_mode(&mut self, mode: BackupMode) {
        self.backup_mode = mode;
        self.backups.clear();
    }

    #[must_use]
    pub fn backup_mode(&self) -> BackupMode {
        self.backup_mode
    }

    /// Build the move-generation parameters for the on-turn player.
    #[must_use]
    pub fn gen_params(&self) -> GenParams<'_> {
        let player = &self.players[self.on_turn];
        GenParams {
            ld: &self.ld,
            kwg: &player.kwg,
            klv: &player.klv,
            variant: self.variant,
            bingo_bonus: self.bingo_bonus,
            bag_tiles: self.bag.remaining(),
        }
    }

    /// Generate every legal move for the on-turn player into `out`,
    /// following that player's own sort key/record policy if the caller
    /// passes a freshly-built list.
    pub fn generate_moves(&self, out: &mut MoveList) {
        let params = self.gen_params();
        generate_moves(&self.board, &self.players[self.on_turn].rack, &params, out);
    }

    /// A convenience [`MoveList`] sized/ordered per the on-turn player's
    /// preferences, ready to hand to [`Game::generate_moves`].
    #[must_use]
    pub fn new_move_list(&self, capacity: usize) -> MoveList {
        let player = &self.players[self.on_turn];
        MoveList::new(capacity, player.sort_key, player.record_policy)
    }

    /// Refill every player's rack from the bag up to [`RACK_SIZE`], in
    /// seat order. Used once at game setup (a fresh `Game` starts with
    /// empty racks and a full bag); never called mid-game, since `play`
    /// already refills the mover's rack after each placement.
    pub fn deal_opening_racks(&mut self) {
        let bag = &mut self.bag;
        for player in &mut self.players {
            bag.refill_rack(&mut player.rack, RACK_SIZE as u8);
        }
    }

    fn push_backup(&mut self) {
        if self.backup_mode == BackupMode::Off {
            return;
        }
        if self.backups.len() >= MAX_BACKUP_DEPTH {
            self.backups.remove(0);
        }
        self.backups.push(Snapshot {
            board: self.board.clone(),
            bag: self.bag.clone(),
            players: self.players.clone(),
            on_turn: self.on_turn,
            consecutive_scoreless_turns: self.consecutive_scoreless_turns,
            end_reason: self.end_reason,
            history_len: self.history.len(),
        });
    }

    /// Roll back to the state immediately before the last [`Game::play`]
    /// call. Returns an error if no backup is available.
    pub fn unplay(&mut self) -> MagpieResult<()> {
        let snapshot = self.backups.pop().ok_or(MagpieError::Precondition(
            EnginePreconditionError::NoMoveToChallenge,
        ))?;
        self.board = snapshot.board;
        self.bag = snapshot.bag;
        self.players = snapshot.players;
        self.on_turn = snapshot.on_turn;
        self.consecutive_scoreless_turns = snapshot.consecutive_scoreless_turns;
        self.end_reason = snapshot.end_reason;
        self.history.truncate(snapshot.history_len);
        self.last_move = None;
        Ok(())
    }

    fn validate(&self, mv: &Move) -> MagpieResult<()> {
        match mv {
            Move::Place {
                start_row,
                start_col,
                direction,
                tiles,
                ..
            } => self.validate_place(*start_row, *start_col, *direction, tiles),
            Move::Exchange { tiles, .. } => {
                let mut needed = Rack::new(self.ld.alphabet_size());
                for &ml in tiles {
                    needed.add(unblank(ml));
                }
                if !self.players[self.on_turn].rack.contains(&needed) {
                    return Err(MagpieError::Move(MoveError::TilesNotInRack));
                }
                if self.bag.remaining() < RACK_SIZE {
                    return Err(MagpieError::Move(MoveError::InsufficientExchangeTiles));
                }
                Ok(())
            }
            Move::Pass { .. } => Ok(()),
        }
    }

    fn validate_place(
        &self,
        start_row: u8,
        start_col: u8,
        direction: Direction,
        tiles: &[PlacedTile],
    ) -> MagpieResult<()> {
        let dim = self.board.dim();
        let (dr, dc): (i16, i16) = match direction {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
        };
        let mut needed = Rack::new(self.ld.alphabet_size());
        let mut any_connected = false;
        for (i, tile) in tiles.iter().enumerate() {
            let row = i16::from(start_row) + dr * i as i16;
            let col = i16::from(start_col) + dc * i as i16;
            if row < 0 || col < 0 || row >= i16::from(dim) || col >= i16::from(dim) {
                return Err(MagpieError::Move(MoveError::OutOfBounds));
            }
            let (row, col) = (row as u8, col as u8);
            match tile {
                PlacedTile::New { letter, is_blank } => {
                    if self.board.is_occupied(row, col) {
                        return Err(MagpieError::Move(MoveError::PlayedThroughMismatch));
                    }
                    needed.add(if *is_blank { 0 } else { *letter });
                }
                PlacedTile::PlayedThrough(letter) => {
                    if self.board.tile(row, col) != *letter {
                        return Err(MagpieError::Move(MoveError::PlayedThroughMismatch));
                    }
                    any_connected = true;
                }
            }
            if self.board.is_anchor(row, col, direction)
                || self.board.is_anchor(row, col, direction.opposite())
            {
                // An anchor square is either the opening square or adjacent
                // to an existing tile; either way this placement touches
                // the rest of the board (or starts the game there).
                any_connected = true;
            }
        }
        if !self.players[self.on_turn].rack.contains(&needed) {
            return Err(MagpieError::Move(MoveError::TilesNotInRack));
        }
        if !any_connected {
            return Err(MagpieError::Move(MoveError::NotConnected));
        }
        Ok(())
    }

    /// Apply `mv` as the on-turn player's play: validate, optionally back
    /// up, mutate board/bag/rack/score, recompute cross-sets locally,
    /// advance the scoreless-turn counter, check for game end, and advance
    /// `on_turn`.
    pub fn play(&mut self, mv: &Move) -> MagpieResult<()> {
        self.validate(mv)?;
        self.push_backup();
        let mover = self.on_turn;
        let pre_play_rack = self.players[mover].rack.clone();
        let touched = self.apply_unchecked(mv);
        if self.backup_mode == BackupMode::Gcg {
            self.history.push(GameEvent {
                kind: event_kind_for(mv),
                player_index: mover,
                cumulative_score: self.players[mover].score,
                score_adjustment: mv.score(),
                rack: pre_play_rack,
                played_move: Some(mv.clone()),
                note: None,
            });
        }
        self.last_move = Some(LastMove {
            player: mover,
            mv: mv.clone(),
            touched,
        });
        if self.players[mover].rack.is_empty() && self.bag.is_empty() && !self.is_over() {
            self.end_game_on_empty_rack(mover);
        }
        self.advance_turn();
        Ok(())
    }

    /// Mutate state for `mv` without validation or backup bookkeeping;
    /// returns the squares touched (for cross-set recomputation and, later,
    /// challenge word-formation checks).
    fn apply_unchecked(&mut self, mv: &Move) -> Vec<(u8, u8)> {
        match mv {
            Move::Place {
                start_row,
                start_col,
                direction,
                tiles,
                score,
                ..
            } => {
                let (dr, dc): (i16, i16) = match direction {
                    Direction::Horizontal => (0, 1),
                    Direction::Vertical => (1, 0),
                };
                let mut touched = Vec::with_capacity(tiles.len());
                for (i, tile) in tiles.iter().enumerate() {
                    let row = (i16::from(*start_row) + dr * i as i16) as u8;
                    let col = (i16::from(*start_col) + dc * i as i16) as u8;
                    if let PlacedTile::New { letter, is_blank } = tile {
                        self.board.set_tile(row, col, *letter);
                        self.players[self.on_turn]
                            .rack
                            .take(if *is_blank { 0 } else { *letter });
                    }
                    touched.push((row, col));
                }
                let kwg = self.players[self.on_turn].kwg.clone();
                self.board.recompute_around(&touched, &self.ld, &kwg);
                self.bag.refill_rack(&mut self.players[self.on_turn].rack, RACK_SIZE as u8);
                self.players[self.on_turn].score += score;
                if *score == 0 {
                    self.consecutive_scoreless_turns += 1;
                } else {
                    self.consecutive_scoreless_turns = 0;
                }
                touched
            }
            Move::Exchange { tiles, .. } => {
                let drawn = self.bag.draw(tiles.len());
                for &ml in tiles {
                    self.players[self.on_turn].rack.take(unblank(ml));
                }
                self.bag.put_back(tiles);
                for &ml in &drawn {
                    self.players[self.on_turn].rack.add(ml);
                }
                self.consecutive_scoreless_turns += 1;
                Vec::new()
            }
            Move::Pass { .. } => {
                self.consecutive_scoreless_turns += 1;
                Vec::new()
            }
        }
    }

    fn end_game_on_empty_rack(&mut self, emptied: usize) {
        let mut bonus = 0;
        for i in 0..self.players.len() {
            if i == emptied {
                continue;
            }
            let value = self.players[i].rack.score(&self.ld);
            self.players[i].score -= value;
            bonus += value;
            if self.backup_mode == BackupMode::Gcg && value > 0 {
                self.history.push(GameEvent {
                    kind: GameEventKind::EndRackPenalty,
                    player_index: i,
                    cumulative_score: self.players[i].score,
                    score_adjustment: -value,
                    rack: self.players[i].rack.clone(),
                    played_move: None,
                    note: None,
                });
            }
        }
        self.players[emptied].score += bonus;
        if self.backup_mode == BackupMode::Gcg && bonus > 0 {
            self.history.push(GameEvent {
                kind: GameEventKind::EndRackPoints,
                player_index: emptied,
                cumulative_score: self.players[emptied].score,
                score_adjustment: bonus,
                rack: self.players[emptied].rack.clone(),
                played_move: None,
                note: None,
            });
        }
        self.end_reason = GameEndReason::Standard;
    }

    fn advance_turn(&mut self) {
        if self.end_reason == GameEndReason::None
            && self.consecutive_scoreless_turns >= MAX_SCORELESS_TURNS
        {
            self.end_reason = GameEndReason::ConsecutiveZeros;
        }
        if self.end_reason == GameEndReason::None {
            self.on_turn = (self.on_turn + 1) % self.players.len();
        }
    }

    /// Every word the last play formed: the main word plus any
    /// perpendicular side words, read in natural left-to-right / top-to-
    /// bottom order, used by [`Game::challenge_move`]'s phony check.
    fn formed_words(&self) -> Vec<Vec<MachineLetter>> {
        let Some(last) = &self.last_move else {
            return Vec::new();
        };
        let Move::Place { direction, .. } = &last.mv else {
            return Vec::new();
        };
        let mut words = Vec::new();
        if let Some(main) = self.run_through(last.touched[0], *direction) {
            words.push(main);
        }
        let Move::Place { tiles, .. } = &last.mv else {
            unreachable!()
        };
        for (&(row, col), tile) in last.touched.iter().zip(tiles.iter()) {
            if tile.is_new() {
                if let Some(side) = self.run_through((row, col), direction.opposite()) {
                    if side.len() > 1 {
                        words.push(side);
                    }
                }
            }
        }
        words
    }

    /// The full contiguous run of tiles through `(row, col)` in `dir`,
    /// reading from the run's start. `None` if `(row, col)` is empty.
    fn run_through(&self, (row, col): (u8, u8), dir: Direction) -> Option<Vec<MachineLetter>> {
        if !self.board.is_occupied(row, col) {
            return None;
        }
        let (dr, dc): (i16, i16) = match dir {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
        };
        let (mut r, mut c) = (i16::from(row), i16::from(col));
        while self.board.in_bounds(r - dr, c - dc) && self.board.is_occupied((r - dr) as u8, (c - dc) as u8) {
            r -= dr;
            c -= dc;
        }
        let mut out = Vec::new();
        while self.board.in_bounds(r, c) && self.board.is_occupied(r as u8, c as u8) {
            out.push(unblank(self.board.tile(r as u8, c as u8)));
            r += dr;
            c += dc;
        }
        Some(out)
    }

    /// Challenge the last play. If it formed any word not accepted by the
    /// mover's own word graph (anagram-checked under [`GameVariant::Wordsmog`]),
    /// the play is unplayed and a [`crate::history::GameEventKind::PhonyReturned`]
    /// event is recorded; otherwise the rule-specific wrong-challenge
    /// consequence is applied.
    pub fn challenge_move(&mut self, rule: ChallengeRule) -> MagpieResult<ChallengeOutcome> {
        if self.backup_mode == BackupMode::Off {
            return Err(MagpieError::Precondition(
                EnginePreconditionError::ChallengeRequiresBackup,
            ));
        }
        let last = self
            .last_move
            .as_ref()
            .ok_or(MagpieError::Precondition(
                EnginePreconditionError::NoMoveToChallenge,
            ))?;
        if !last.mv.is_placement() {
            return Err(MagpieError::Precondition(
                EnginePreconditionError::NoMoveToChallenge,
            ));
        }
        let mover = last.player;
        let kwg = self.players[mover].kwg.clone();
        let words = self.formed_words();
        let phony = words.iter().any(|w| match self.variant {
            GameVariant::Classic => !kwg.accepts_word(w),
            GameVariant::Wordsmog => !kwg.accepts_anagram(w),
        });
        if phony {
            let reversed_score = last.mv.score();
            self.unplay()?;
            if self.backup_mode == BackupMode::Gcg {
                self.history.push(GameEvent {
                    kind: GameEventKind::PhonyReturned,
                    player_index: mover,
                    cumulative_score: self.players[mover].score,
                    score_adjustment: -reversed_score,
                    rack: self.players[mover].rack.clone(),
                    played_move: None,
                    note: Some("phony returned".to_string()),
                });
            }
            Ok(ChallengeOutcome {
                phony: true,
                score_adjustment: -reversed_score,
                challenger_loses_turn: false,
            })
        } else {
            let bonus = rule.wrong_challenge_bonus();
            if bonus != 0 {
                self.players[mover].score += bonus;
                if self.backup_mode == BackupMode::Gcg {
                    self.history.push(GameEvent {
                        kind: GameEventKind::ChallengeBonus,
                        player_index: mover,
                        cumulative_score: self.players[mover].score,
                        score_adjustment: bonus,
                        rack: self.players[mover].rack.clone(),
                        played_move: None,
                        note: None,
                    });
                }
            }
            Ok(ChallengeOutcome {
                phony: false,
                score_adjustment: bonus,
                challenger_loses_turn: rule == ChallengeRule::Double,
            })
        }
    }
}

fn event_kind_for(mv: &Move) -> GameEventKind {
    match mv {
        Move::Place { .. } => GameEventKind::Placement,
        Move::Exchange { .. } => GameEventKind::Exchange,
        Move::Pass { .. } => GameEventKind::Pass,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bag::Bag;
    use crate::board_layout::standard15;
    use crate::letters::english;
    use std::collections::HashMap;

    fn ml(ld: &LetterDistribution, c: char) -> MachineLetter {
        ld.machine_letter_for_glyph(c).unwrap()
    }

    fn word(ld: &LetterDistribution, s: &str) -> Vec<MachineLetter> {
        s.chars().map(|c| ml(ld, c)).collect()
    }

    fn two_player_game(words: &[&str]) -> (Game, Arc<LetterDistribution>) {
        let ld = Arc::new(english());
        let kwg = Arc::new(Kwg::from_words(
            &words.iter().map(|w| word(&ld, w)).collect::<Vec<_>>(),
        ));
        let klv = Arc::new(Klv::from_map(HashMap::new()));
        let mut board = Board::new(&standard15());
        board.recompute_all(&ld, &kwg);
        let bag = Bag::new(&ld, 7);
        let p1 = Player::new("p1", Rack::for_distribution(&ld), kwg.clone(), klv.clone());
        let p2 = Player::new("p2", Rack::for_distribution(&ld), kwg, klv);
        let game = Game::new(board, bag, vec![p1, p2], ld.clone(), GameVariant::Classic, 50);
        (game, ld)
    }

    fn cat_move(ld: &LetterDistribution) -> Move {
        Move::Place {
            start_row: 7,
            start_col: 7,
            direction: Direction::Horizontal,
            tiles: vec![
                PlacedTile::New { letter: ml(ld, 'C'), is_blank: false },
                PlacedTile::New { letter: ml(ld, 'A'), is_blank: false },
                PlacedTile::New { letter: ml(ld, 'T'), is_blank: false },
            ],
            score: 10,
            equity: 10.0,
        }
    }

    #[test]
    fn play_placement_updates_score_and_turn() {
        let (mut game, ld) = two_player_game(&["CAT"]);
        game.players[0].rack = Rack::from_letters(
            ld.alphabet_size(),
            &[ml(&ld, 'C'), ml(&ld, 'A'), ml(&ld, 'T')],
        );
        let mv = cat_move(&ld);
        game.play(&mv).unwrap();
        assert_eq!(game.players()[0].score, 10);
        assert_eq!(game.on_turn(), 1);
        assert!(game.board().is_occupied(7, 7));
    }

    #[test]
    fn six_consecutive_passes_end_the_game() {
        let (mut game, _ld) = two_player_game(&["CAT"]);
        for _ in 0..MAX_SCORELESS_TURNS {
            game.play(&Move::pass()).unwrap();
        }
        assert_eq!(game.consecutive_scoreless_turns(), MAX_SCORELESS_TURNS);
        assert_eq!(game.end_reason(), GameEndReason::ConsecutiveZeros);
    }

    #[test]
    fn unplay_restores_prior_state() {
        let (mut game, ld) = two_player_game(&["CAT"]);
        game.set_backup_mode(BackupMode::Simulation);
        game.players[0].rack = Rack::from_letters(
            ld.alphabet_size(),
            &[ml(&ld, 'C'), ml(&ld, 'A'), ml(&ld, 'T')],
        );
        let before_score = game.players()[0].score;
        let mv = cat_move(&ld);
        game.play(&mv).unwrap();
        assert_ne!(game.players()[0].score, before_score);
        game.unplay().unwrap();
        assert_eq!(game.players()[0].score, before_score);
        assert!(!game.board().is_occupied(7, 7));
        assert_eq!(game.on_turn(), 0);
    }

    #[test]
    fn challenge_returns_phony() {
        let (mut game, ld) = two_player_game(&["DOG"]);
        game.set_backup_mode(BackupMode::Gcg);
        game.players[0].rack = Rack::from_letters(
            ld.alphabet_size(),
            &[ml(&ld, 'C'), ml(&ld, 'A'), ml(&ld, 'T')],
        );
        let mv = cat_move(&ld);
        game.play(&mv).unwrap();
        let outcome = game.challenge_move(ChallengeRule::Single).unwrap();
        assert!(outcome.phony);
        assert!(!game.board().is_occupied(7, 7));
        assert_eq!(game.history().last().unwrap().kind, GameEventKind::PhonyReturned);
    }

    #[test]
    fn challenge_of_valid_word_is_noop_under_single() {
        let (mut game, ld) = two_player_game(&["CAT"]);
        game.set_backup_mode(BackupMode::Gcg);
        game.players[0].rack = Rack::from_letters(
            ld.alphabet_size(),
            &[ml(&ld, 'C'), ml(&ld, 'A'), ml(&ld, 'T')],
        );
        let mv = cat_move(&ld);
        game.play(&mv).unwrap();
        let outcome = game.challenge_move(ChallengeRule::Single).unwrap();
        assert!(!outcome.phony);
        assert!(game.board().is_occupied(7, 7));
    }

    #[test]
    fn wrong_challenge_under_five_point_awards_bonus() {
        let (mut game, ld) = two_player_game(&["CAT"]);
        game.set_backup_mode(BackupMode::Gcg);
        game.players[0].rack = Rack::from_letters(
            ld.alphabet_size(),
            &[ml(&ld, 'C'), ml(&ld, 'A'), ml(&ld, 'T')],
        );
        let mv = cat_move(&ld);
        game.play(&mv).unwrap();
        let score_before = game.players()[0].score;
        let outcome = game.challenge_move(ChallengeRule::FivePoint).unwrap();
        assert!(!outcome.phony);
        assert_eq!(game.players()[0].score, score_before + 5);
    }
}
