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

//! Rack inference: given an observed play or exchange, reconstruct a
//! probability distribution over the opponent's unseen leave by exhaustive
//! candidate enumeration, weighted by how many ways the bag could have
//! supplied each candidate and by whether the observed play was close
//! enough to optimal for that candidate to be plausible.

use crate::alias::AliasTable;
use magpie_core::error::{EnginePreconditionError, MagpieError, MagpieResult};
use magpie_core::game::Game;
use magpie_core::klv::Klv;
use magpie_core::letters::MachineLetter;
use magpie_core::movegen::movelist::{MoveList, RecordPolicy, SortKey};
use magpie_core::rack::{Rack, RACK_SIZE};
use magpie_core::thread_control::{HaltReason, ThreadControl};
use std::sync::{Arc, Mutex};
use std::thread;

/// What was observed about the target's turn.
#[derive(Clone, Debug)]
pub enum Observation {
    /// The target played these tiles (already unblanked) for this score.
    Play { tiles: Vec<MachineLetter>, score: i32 },
    /// The target exchanged this many tiles (identity unknown); the score
    /// of an exchange observation must be zero.
    Exchange { count: usize, score: i32 },
}

pub struct InferArgs {
    pub target_player: usize,
    /// Tiles of the target's pre-play rack already known to the inferrer,
    /// beyond what this call is trying to determine. Empty unless an
    /// earlier inference or `simk`-style constraint narrowed the leave
    /// already.
    pub known_target_tiles: Rack,
    pub observation: Observation,
    /// The acceptance margin ε: a candidate survives if the observed play
    /// scores within ε of the best move available from that candidate's
    /// reconstructed rack.
    pub epsilon: f64,
    pub num_threads: usize,
}

/// One candidate leave that survived the acceptance test, with its
/// draw-count weight and (for an exchange observation) the specific
/// tiles hypothesized to have been exchanged.
#[derive(Clone, Debug)]
pub struct LeaveRack {
    pub leave: Rack,
    pub exchanged: Option<Rack>,
    pub weight: f64,
}

pub struct InferenceResults {
    pub leave_racks: Vec<LeaveRack>,
    /// Weighted draw-count subtotal per machine letter, summed over every
    /// accepted candidate (index = machine letter).
    pub per_letter_subtotals: Vec<f64>,
    pub unique_leaves: usize,
    /// `None` when every candidate was rejected (an unusual, empty-signal
    /// result, not a failure).
    pub alias_table: Option<AliasTable>,
}

/// Run the inference algorithm for one observed turn.
///
/// Preconditions are all checked before any worker is spawned: an observation with no information at all
/// (`no_tiles_played`), an exchange that the bag cannot support
/// (`exchange_disallowed`) or that carries a nonzero score
/// (`exchange_score_nonzero`), a known-tile count that overflows a rack
/// (`rack_overflow`), or a leave size the bag cannot possibly supply
/// (`target_letters_not_in_bag`).
pub fn infer(
    game: &Game,
    args: &InferArgs,
    control: &Arc<ThreadControl>,
) -> MagpieResult<InferenceResults> {
    let known_count = args.known_target_tiles.num_tiles() as usize;
    let (played_tiles, exchange_count, score): (&[MachineLetter], usize, i32) =
        match &args.observation {
            Observation::Play { tiles, score } => {
                if tiles.is_empty() {
                    return Err(precondition(EnginePreconditionError::NoTilesPlayed));
                }
                (tiles.as_slice(), 0, *score)
            }
            Observation::Exchange { count, score } => {
                if *count == 0 {
                    return Err(precondition(EnginePreconditionError::NoTilesPlayed));
                }
                if *score != 0 {
                    return Err(precondition(EnginePreconditionError::ExchangeScoreNonzero(
                        *score,
                    )));
                }
                if game.bag().remaining() < 2 * RACK_SIZE {
                    return Err(precondition(EnginePreconditionError::ExchangeDisallowed {
                        required: 2 * RACK_SIZE,
                        found: game.bag().remaining(),
                    }));
                }
                (&[], *count, 0)
            }
        };

    if known_count + played_tiles.len() + exchange_count > RACK_SIZE {
        return Err(precondition(EnginePreconditionError::RackOverflow));
    }
    // For an exchange observation the size to enumerate is the whole
    // unknown pre-exchange rack (the exchanged tiles' identity is exactly
    // what step 4 partitions back out); for a play observation it is just
    // the resulting leave, since the played tiles are already known and
    // contribute nothing further to draw from the bag.
    let leave_size: u8 = if exchange_count > 0 {
        (RACK_SIZE - known_count) as u8
    } else {
        (RACK_SIZE - known_count - played_tiles.len()) as u8
    };

    let ld = game.letter_distribution().clone();
    let mut pool = game.bag().as_rack(ld.alphabet_size());
    for (ml, count) in game.players()[args.target_player].rack.iter() {
        pool.add_n(ml, count);
    }
    if pool.num_tiles() < leave_size {
        return Err(precondition(
            EnginePreconditionError::TargetLettersNotInBag,
        ));
    }

    let candidates = enumerate_multisets(&pool, leave_size);
    log::info!(
        "infer starting: {} candidate leaves, leave_size={}, num_threads={}",
        candidates.len(),
        leave_size,
        args.num_threads
    );

    control.start(None);
    let stats = Arc::new(Mutex::new(InferAccumulator::new(ld.alphabet_size())));
    let num_threads = args.num_threads.max(1);

    thread::scope(|scope| {
        for _ in 0..num_threads {
            let stats = Arc::clone(&stats);
            let control = Arc::clone(control);
            let candidates = &candidates;
            let game = game.clone();
            let klv = game.players()[args.target_player].klv.clone();
            scope.spawn(move || {
                worker_loop(
                    &game,
                    candidates,
                    args,
                    played_tiles,
                    exchange_count,
                    score,
                    &pool,
                    &klv,
                    &stats,
                    &control,
                );
            });
        }
    });

    let accumulator = Arc::try_unwrap(stats)
        .map(|m| m.into_inner().unwrap())
        .unwrap_or_else(|arc| arc.lock().unwrap().clone());

    if control.is_halted() && control.halt_reason() == Some(HaltReason::Interrupted) {
        log::warn!("infer cancelled, discarding partial results");
        //  Cancellation: a cancelled run's partial results are not a
        // valid final answer.
        return Ok(InferenceResults {
            leave_racks: Vec::new(),
            per_letter_subtotals: vec![0.0; ld.alphabet_size()],
            unique_leaves: 0,
            alias_table: None,
        });
    }

    let alias_table = if accumulator.leave_racks.is_empty() {
        None
    } else {
        let weights: Vec<f64> = accumulator.leave_racks.iter().map(|lr| lr.weight).collect();
        Some(AliasTable::new(&weights))
    };

    log::info!(
        "infer finished: {} unique leaves accepted",
        accumulator.leave_racks.len()
    );
    Ok(InferenceResults {
        unique_leaves: accumulator.leave_racks.len(),
        leave_racks: accumulator.leave_racks,
        per_letter_subtotals: accumulator.per_letter_subtotals,
        alias_table,
    })
}

fn precondition(e: EnginePreconditionError) -> MagpieError {
    MagpieError::Precondition(e)
}

#[derive(Clone)]
struct InferAccumulator {
    leave_racks: Vec<LeaveRack>,
    per_letter_subtotals: Vec<f64>,
}

impl InferAccumulator {
    fn new(alphabet_size: usize) -> Self {
        InferAccumulator {
            leave_racks: Vec::new(),
            per_letter_subtotals: vec![0.0; alphabet_size],
        }
    }

    fn accept(&mut self, leave: Rack, exchanged: Option<Rack>, weight: f64) {
        for (ml, count) in leave.iter() {
            self.per_letter_subtotals[ml as usize] += weight * f64::from(count);
        }
        self.leave_racks.push(LeaveRack {
            leave,
            exchanged,
            weight,
        });
    }
}

#[allow(clippy::too_many_arguments)]
fn worker_loop(
    game: &Game,
    candidates: &[Rack],
    args: &InferArgs,
    played_tiles: &[MachineLetter],
    exchange_count: usize,
    score: i32,
    pool: &Rack,
    klv: &Klv,
    stats: &Arc<Mutex<InferAccumulator>>,
    control: &Arc<ThreadControl>,
) {
    loop {
        if control.is_halted() {
            return;
        }
        let index = control.claim_next_index();
        if index as usize >= candidates.len() {
            control.halt(HaltReason::LimitReached);
            return;
        }
        let candidate = &candidates[index as usize];
        log::trace!("infer worker evaluating candidate leave {index}");
        let weight = ways_to_draw(pool, candidate);

        if exchange_count > 0 {
            evaluate_exchange_candidate(candidate, exchange_count, weight, stats);
        } else {
            evaluate_play_candidate(
                game,
                args,
                candidate,
                played_tiles,
                score,
                weight,
                klv,
                stats,
            );
        }
        control.record_iteration();
    }
}

fn evaluate_play_candidate(
    game: &Game,
    args: &InferArgs,
    candidate: &Rack,
    played_tiles: &[MachineLetter],
    score: i32,
    weight: f64,
    klv: &Klv,
    stats: &Arc<Mutex<InferAccumulator>>,
) {
    let mut resulting_leave = args.known_target_tiles.clone();
    for (ml, count) in candidate.iter() {
        resulting_leave.add_n(ml, count);
    }
    let current_leave_value = klv.leave_value(&resulting_leave);

    let bag_empty = game.bag().is_empty();
    let accepted = if bag_empty {
        true
    } else {
        let mut full_rack = resulting_leave.clone();
        for &ml in played_tiles {
            full_rack.add(ml);
        }
        let mut game2 = game.clone();
        game2.set_on_turn(args.target_player);
        game2.player_mut(args.target_player).rack = full_rack;
        let mut list = MoveList::new(1, SortKey::Equity, RecordPolicy::Best);
        game2.generate_moves(&mut list);
        let top_eq = list.best().map(|m| m.equity()).unwrap_or(f64::NEG_INFINITY);
        f64::from(score) + current_leave_value + args.epsilon >= top_eq
    };

    if accepted {
        stats.lock().unwrap().accept(resulting_leave, None, weight);
    }
}

fn evaluate_exchange_candidate(
    candidate: &Rack,
    exchange_count: usize,
    weight: f64,
    stats: &Arc<Mutex<InferAccumulator>>,
) {
    // Every partition of the candidate (pre-exchange) rack into a leave of
    // the right size and an exchanged set of `exchange_count` tiles is
    // consistent with the observation; the candidate rack
    // itself is small (<= RACK_SIZE tiles) so this inner enumeration is
    // cheap even though the outer candidate pool is not.
    for split in candidate.sub_multisets(true) {
        if split.num_tiles() as usize != exchange_count {
            continue;
        }
        let mut leave = candidate.clone();
        if !leave.subtract(&split) {
            continue;
        }
        stats.lock().unwrap().accept(leave, Some(split), weight);
    }
}

/// Every distinct multiset of machine letters of exactly `size` tiles
/// drawable from `pool`, generated by bounded recursive descent so the
/// branching factor is governed by `size` (≤ `RACK_SIZE`) rather than the
/// full size of `pool` (the whole bag, for an opening-turn inference).
fn enumerate_multisets(pool: &Rack, size: u8) -> Vec<Rack> {
    let entries: Vec<(MachineLetter, u8)> = pool.iter().collect();
    let mut out = Vec::new();
    let mut current = vec![0u8; pool.alphabet_size()];
    recurse(&entries, 0, size, &mut current, &mut out);
    out
}

fn recurse(
    entries: &[(MachineLetter, u8)],
    idx: usize,
    remaining: u8,
    current: &mut Vec<u8>,
    out: &mut Vec<Rack>,
) {
    if idx == entries.len() {
        if remaining == 0 {
            out.push(Rack::from_counts(current.clone()));
        }
        return;
    }
    let (ml, max_count) = entries[idx];
    let take_max = max_count.min(remaining);
    for take in 0..=take_max {
        current[ml as usize] = take;
        recurse(entries, idx + 1, remaining - take, current, out);
    }
    current[ml as usize] = 0;
}

/// The number of ways `candidate` could be drawn from `pool` without
/// regard to order: the product, over each letter in `candidate`, of
/// `C(pool.count(letter), candidate.count(letter))`.
fn ways_to_draw(pool: &Rack, candidate: &Rack) -> f64 {
    candidate
        .iter()
        .map(|(ml, k)| choose(u32::from(pool.count(ml)), u32::from(k)))
        .product()
}

fn choose(n: u32, k: u32) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    let mut result = 1.0;
    for i in 0..k {
        result *= f64::from(n - i) / f64::from(i + 1);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use magpie_core::bag::Bag;
    use magpie_core::board::Board;
    use magpie_core::board_layout::standard15;
    use magpie_core::game::Player;
    use magpie_core::kwg::Kwg;
    use magpie_core::letters::english;
    use magpie_core::movegen::GameVariant;
    use std::collections::HashMap;
    use std::sync::Arc as StdArc;

    fn game_with_bag(seed: u64) -> Game {
        let ld = StdArc::new(english());
        let words = ["CAT", "DOG", "CATS", "DOGS", "AT", "TO", "GO", "OAT"];
        let kwg = StdArc::new(Kwg::from_words(
            &words
                .iter()
                .map(|w| {
                    w.chars()
                        .map(|c| ld.machine_letter_for_glyph(c).unwrap())
                        .collect::<Vec<_>>()
                })
                .collect::<Vec<_>>(),
        ));
        let klv = StdArc::new(Klv::from_map(HashMap::new()));
        let mut board = Board::new(&standard15());
        board.recompute_all(&ld, &kwg);
        let bag = Bag::new(&ld, seed);
        let p1 = Player::new("p1", Rack::for_distribution(&ld), kwg.clone(), klv.clone());
        let p2 = Player::new("p2", Rack::for_distribution(&ld), kwg, klv);
        let mut game = Game::new(board, bag, vec![p1, p2], ld, GameVariant::Classic, 50);
        game.deal_opening_racks();
        game
    }

    #[test]
    fn choose_matches_known_values() {
        assert_eq!(choose(5, 0), 1.0);
        assert!((choose(5, 2) - 10.0).abs() < 1e-9);
        assert_eq!(choose(2, 5), 0.0);
    }

    #[test]
    fn enumerate_multisets_respects_size() {
        let ld = english();
        let mut pool = Rack::new(ld.alphabet_size());
        let a = ld.machine_letter_for_glyph('A').unwrap();
        let b = ld.machine_letter_for_glyph('B').unwrap();
        pool.add_n(a, 2);
        pool.add_n(b, 1);
        let found = enumerate_multisets(&pool, 2);
        assert!(found.iter().all(|r| r.num_tiles() == 2));
        // {A,A}, {A,B} are the only size-2 multisets available.
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn exchange_observation_rejects_small_bag() {
        let mut game = game_with_bag(1);
        // Drain the bag down below the 2*RACK_SIZE exchange floor.
        let remaining = game.bag().remaining();
        game.bag_mut().draw(remaining.saturating_sub(5));
        let args = InferArgs {
            target_player: 1,
            known_target_tiles: Rack::new(game.letter_distribution().alphabet_size()),
            observation: Observation::Exchange { count: 3, score: 0 },
            epsilon: 5.0,
            num_threads: 1,
        };
        let control = Arc::new(ThreadControl::new());
        let err = infer(&game, &args, &control).unwrap_err();
        assert!(matches!(
            err,
            MagpieError::Precondition(EnginePreconditionError::ExchangeDisallowed { .. })
        ));
    }

    #[test]
    fn nonzero_exchange_score_is_rejected() {
        let game = game_with_bag(1);
        let args = InferArgs {
            target_player: 1,
            known_target_tiles: Rack::new(game.letter_distribution().alphabet_size()),
            observation: Observation::Exchange { count: 3, score: 4 },
            epsilon: 5.0,
            num_threads: 1,
        };
        let control = Arc::new(ThreadControl::new());
        let err = infer(&game, &args, &control).unwrap_err();
        assert!(matches!(
            err,
            MagpieError::Precondition(EnginePreconditionError::ExchangeScoreNonzero(4))
        ));
    }

    #[test]
    fn play_observation_with_empty_tiles_is_rejected() {
        let game = game_with_bag(1);
        let args = InferArgs {
            target_player: 1,
            known_target_tiles: Rack::new(game.letter_distribution().alphabet_size()),
            observation: Observation::Play {
                tiles: Vec::new(),
                score: 10,
            },
            epsilon: 5.0,
            num_threads: 1,
        };
        let control = Arc::new(ThreadControl::new());
        let err = infer(&game, &args, &control).unwrap_err();
        assert!(matches!(
            err,
            MagpieError::Precondition(EnginePreconditionError::NoTilesPlayed)
        ));
    }

    #[test]
    fn bag_empty_accepts_every_candidate() {
        let mut game = game_with_bag(2);
        let ld = game.letter_distribution().clone();
        let drained = game.bag().remaining();
        game.bag_mut().draw(drained);
        let t = ld.machine_letter_for_glyph('T').unwrap();
        let o = ld.machine_letter_for_glyph('O').unwrap();
        let args = InferArgs {
            target_player: 1,
            known_target_tiles: Rack::new(ld.alphabet_size()),
            observation: Observation::Play {
                tiles: vec![t, o],
                score: 2,
            },
            epsilon: 0.0,
            num_threads: 1,
        };
        let control = Arc::new(ThreadControl::new());
        let results = infer(&game, &args, &control).unwrap();
        // With an empty bag every enumerated candidate leave is accepted
        // unconditionally, regardless of equity.
        assert!(!results.leave_racks.is_empty());
        assert!(results.alias_table.is_some());
    }
}
