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

//! Monte-Carlo simulation: roll each candidate root move out to a
//! fixed ply depth many times, tracking spread and win percentage per
//! candidate, and stop early once a best-arm-identification rule says the
//! leader is statistically settled.

use magpie_core::bag::Bag;
use magpie_core::error::{EnginePreconditionError, MagpieError, MagpieResult};
use magpie_core::equity::{equity_with_endgame_adjustment, ENDGAME_ADJUST_THRESHOLD_TILES};
use magpie_core::game::Game;
use magpie_core::movegen::movelist::{MoveList, RecordPolicy, SortKey};
use magpie_core::movegen::mv::Move;
use magpie_core::rack::Rack;
use magpie_core::thread_control::{HaltReason, ThreadControl};
use magpie_core::winpct::WinPctTable;
use std::sync::{Arc, Mutex};
use std::thread;

/// Parameters for one [`simulate`] call.
pub struct SimArgs {
    /// How many plies (half-turns) to roll out after the root candidate.
    pub plies: usize,
    /// Stop once this many total samples have been drawn across every
    /// candidate, regardless of the stopping rule below.
    pub max_iterations: u64,
    pub num_threads: usize,
    pub seed: u64,
    /// Pin the opponent's first-ply rack to exactly these tiles (the
    /// `simk` use case); every other tile drawn is still random.
    pub known_opponent_rack: Option<Rack>,
    /// Z-score for the best-arm-identification early-stop check; `None`
    /// disables early stopping and every candidate runs to
    /// `max_iterations`.
    pub bai_confidence_z: Option<f64>,
    /// Never let any one candidate exceed this many samples even if the
    /// stopping rule has not fired (bounds a single pathological arm).
    pub max_samples_per_arm: Option<u64>,
    pub win_pct: Option<Arc<WinPctTable>>,
}

/// Streaming mean/variance/win-tally for one candidate, updated with
/// Welford's online algorithm so no sample history needs to be retained.
#[derive(Clone, Copy, Debug, Default)]
pub struct CandidateStats {
    count: u64,
    mean: f64,
    m2: f64,
    wins: f64,
}

impl CandidateStats {
    fn push(&mut self, value: f64, win: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
        self.wins += win;
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    #[must_use]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    #[must_use]
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    #[must_use]
    pub fn stderr(&self) -> f64 {
        if self.count == 0 {
            f64::INFINITY
        } else {
            (self.variance() / self.count as f64).sqrt()
        }
    }

    #[must_use]
    pub fn win_pct(&self) -> f64 {
        if self.count == 0 {
            0.5
        } else {
            self.wins / self.count as f64
        }
    }
}

fn merge(a: &mut CandidateStats, b: CandidateStats) {
    if b.count == 0 {
        return;
    }
    if a.count == 0 {
        *a = b;
        return;
    }
    let total = a.count + b.count;
    let delta = b.mean - a.mean;
    let new_mean = a.mean + delta * b.count as f64 / total as f64;
    let new_m2 = a.m2 + b.m2 + delta * delta * (a.count as f64 * b.count as f64) / total as f64;
    a.count = total;
    a.mean = new_mean;
    a.m2 = new_m2;
    a.wins += b.wins;
}

pub struct SimResults {
    pub candidates: Vec<Move>,
    pub stats: Vec<CandidateStats>,
    pub halt_reason: Option<HaltReason>,
}

/// Roll `candidates` out `args.plies` plies deep, many times in parallel,
/// accumulating spread and win-percentage statistics per candidate.
///
/// Returns [`EnginePreconditionError::OpponentRackUnavailable`] if
/// `known_opponent_rack` names tiles the bag cannot supply, checked once
/// up front before any worker is spawned.
pub fn simulate(
    game: &Game,
    candidates: &[Move],
    args: &SimArgs,
    control: &Arc<ThreadControl>,
) -> MagpieResult<SimResults> {
    if candidates.is_empty() {
        return Ok(SimResults {
            candidates: Vec::new(),
            stats: Vec::new(),
            halt_reason: None,
        });
    }
    if let Some(known) = &args.known_opponent_rack {
        let available = game.bag().as_rack(known.alphabet_size());
        if !available.contains(known) {
            return Err(MagpieError::Precondition(
                EnginePreconditionError::OpponentRackUnavailable {
                    needed: known.num_tiles() as usize,
                    available: game.bag().remaining(),
                },
            ));
        }
    }

    control.start(None);
    log::info!(
        "sim starting: {} candidates, {} plies, max_iterations={}, num_threads={}",
        candidates.len(),
        args.plies,
        args.max_iterations,
        args.num_threads
    );
    let num_threads = args.num_threads.max(1);
    let stats = Arc::new(Mutex::new(vec![CandidateStats::default(); candidates.len()]));
    // Reseed a scratch copy of the bag from `args.seed` so the whole run's
    // worker streams are reproducible from one caller-supplied number,
    // rather than whatever stream the live game's bag happens to be on.
    let ld = game.letter_distribution().clone();
    let contents = game.bag().as_rack(ld.alphabet_size()).to_vec();
    let mut base_bag = Bag::new(&ld, args.seed);
    let _ = base_bag.draw(usize::MAX);
    base_bag.put_back(&contents);

    thread::scope(|scope| {
        for _ in 0..num_threads {
            let stream = base_bag.split();
            let stats = Arc::clone(&stats);
            let control = Arc::clone(control);
            let template = game.clone();
            scope.spawn(move || {
                worker_loop(&template, candidates, args, stream, &stats, &control);
            });
        }
    });

    let final_stats = Arc::try_unwrap(stats)
        .map(|m| m.into_inner().unwrap())
        .unwrap_or_else(|arc| arc.lock().unwrap().clone());

    log::info!(
        "sim finished: halt_reason={:?}, iterations_done={}",
        control.halt_reason(),
        control.iterations_done()
    );
    Ok(SimResults {
        candidates: candidates.to_vec(),
        stats: final_stats,
        halt_reason: control.halt_reason(),
    })
}

fn worker_loop(
    template: &Game,
    candidates: &[Move],
    args: &SimArgs,
    mut rng: rand_xoshiro::Xoshiro256PlusPlus,
    stats: &Arc<Mutex<Vec<CandidateStats>>>,
    control: &Arc<ThreadControl>,
) {
    loop {
        if control.is_halted() {
            return;
        }
        let index = control.claim_next_index();
        if index >= args.max_iterations {
            control.halt(HaltReason::LimitReached);
            return;
        }
        log::trace!("sim worker rolling out iteration {index}");
        let candidate_idx = (index as usize) % candidates.len();
        if let Some(cap) = args.max_samples_per_arm {
            let count = stats.lock().unwrap()[candidate_idx].count();
            if count >= cap {
                continue;
            }
        }

        let mut game = template.clone();
        let root_player = game.on_turn();
        inject_rng(&mut game, &mut rng);

        if game.play(&candidates[candidate_idx]).is_err() {
            continue;
        }
        if let Some(known) = &args.known_opponent_rack {
            let opponent = game.on_turn();
            if opponent != root_player && redraw_known_rack(&mut game, opponent, known).is_err() {
                continue;
            }
        }

        for _ in 0..args.plies {
            if game.is_over() {
                break;
            }
            let mv = best_move(&game);
            if game.play(&mv).is_err() {
                break;
            }
        }

        let opponent = other_index(&game, root_player);
        let spread = game.players()[root_player].score - game.players()[opponent].score;
        let win = if spread > 0 {
            1.0
        } else if spread == 0 {
            0.5
        } else {
            0.0
        };
        let value = final_value(&game, root_player, spread, args.win_pct.as_deref());

        stats.lock().unwrap()[candidate_idx].push(value, win);
        control.record_iteration();

        if let Some(z) = args.bai_confidence_z {
            if stopping_rule_satisfied(&stats.lock().unwrap(), z) {
                log::debug!("sim stopping rule satisfied at iteration {index}");
                control.halt(HaltReason::StatisticallySufficient);
                return;
            }
        }
    }
}

/// Seed `game`'s bag draws from `rng` without re-deriving its contents:
/// the clone already carries the parent's exact tile multiset, so only the
/// shuffle order needs a fresh, worker-private stream.
fn inject_rng(game: &mut Game, rng: &mut rand_xoshiro::Xoshiro256PlusPlus) {
    let ld = game.letter_distribution().clone();
    let contents = game.bag().as_rack(ld.alphabet_size()).to_vec();
    let seed = rand::RngCore::next_u64(rng);
    let mut fresh = Bag::new(&ld, seed);
    // `Bag::new` populates from the distribution's full initial counts;
    // drain that away and refill with the clone's actual remaining
    // contents so only the shuffle order (not the tile multiset) changes.
    let _ = fresh.draw(usize::MAX);
    fresh.put_back(&contents);
    *game.bag_mut() = fresh;
}

fn other_index(game: &Game, idx: usize) -> usize {
    (idx + 1) % game.players().len()
}

fn redraw_known_rack(game: &mut Game, player: usize, known: &Rack) -> MagpieResult<()> {
    let capacity = magpie_core::rack::RACK_SIZE as u8;
    let current = game.player_mut(player).rack.clone();
    game.bag_mut().put_back(&current.to_vec());
    let mut new_rack = Rack::new(known.alphabet_size());
    for (ml, count) in known.iter() {
        for _ in 0..count {
            if !game.bag_mut().take_letter(ml) {
                return Err(MagpieError::Precondition(
                    EnginePreconditionError::OpponentRackUnavailable {
                        needed: known.num_tiles() as usize,
                        available: game.bag().remaining(),
                    },
                ));
            }
            new_rack.add(ml);
        }
    }
    game.bag_mut().refill_rack(&mut new_rack, capacity);
    game.player_mut(player).rack = new_rack;
    Ok(())
}

fn best_move(game: &Game) -> Move {
    let mut list = MoveList::new(1, SortKey::Equity, RecordPolicy::Best);
    game.generate_moves(&mut list);
    list.best().cloned().unwrap_or_else(Move::pass)
}

fn final_value(game: &Game, root_player: usize, spread: i32, win_pct: Option<&WinPctTable>) -> f64 {
    let bag_tiles = game.bag().remaining();
    if bag_tiles > ENDGAME_ADJUST_THRESHOLD_TILES {
        return f64::from(spread);
    }
    let opp = other_index(game, root_player);
    let my_tiles = game.players()[root_player].rack.num_tiles() as usize;
    let opp_tiles = game.players()[opp].rack.num_tiles() as usize;
    let leave = game.players()[root_player].rack.clone();
    let klv = game.players()[root_player].klv.clone();
    equity_with_endgame_adjustment(
        spread,
        &leave,
        &klv,
        bag_tiles,
        spread,
        my_tiles,
        opp_tiles,
        win_pct,
    )
}

/// A conservative best-arm-identification check: the leading candidate's
/// lower confidence bound must clear every other candidate's upper bound.
fn stopping_rule_satisfied(stats: &[CandidateStats], z: f64) -> bool {
    if stats.iter().all(|s| s.count() < 2) {
        return false;
    }
    let Some((leader_idx, _)) = stats
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.mean().partial_cmp(&b.mean()).unwrap())
    else {
        return false;
    };
    let leader = &stats[leader_idx];
    let leader_lower = leader.mean() - z * leader.stderr();
    stats.iter().enumerate().all(|(i, s)| {
        i == leader_idx || s.count() == 0 || leader_lower > s.mean() + z * s.stderr()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use magpie_core::board::Board;
    use magpie_core::board_layout::standard15;
    use magpie_core::bag::Bag as CoreBag;
    use magpie_core::game::Player;
    use magpie_core::klv::Klv;
    use magpie_core::kwg::Kwg;
    use magpie_core::letters::english;
    use magpie_core::movegen::GameVariant;
    use std::collections::HashMap;

    fn small_game() -> Game {
        let ld = Arc::new(english());
        let words = ["CAT", "DOG", "CATS", "DOGS", "AT", "TO", "GO", "OAT"];
        let kwg = Arc::new(Kwg::from_words(
            &words
                .iter()
                .map(|w| {
                    w.chars()
                        .map(|c| ld.machine_letter_for_glyph(c).unwrap())
                        .collect::<Vec<_>>()
                })
                .collect::<Vec<_>>(),
        ));
        let klv = Arc::new(Klv::from_map(HashMap::new()));
        let mut board = Board::new(&standard15());
        board.recompute_all(&ld, &kwg);
        let bag = CoreBag::new(&ld, 7);
        let p1 = Player::new("p1", magpie_core::rack::Rack::for_distribution(&ld), kwg.clone(), klv.clone());
        let p2 = Player::new("p2", magpie_core::rack::Rack::for_distribution(&ld), kwg, klv);
        let mut game = Game::new(board, bag, vec![p1, p2], ld, GameVariant::Classic, 50);
        game.deal_opening_racks();
        game
    }

    #[test]
    fn simulate_returns_one_stat_row_per_candidate() {
        let game = small_game();
        let mut list = MoveList::new(4, SortKey::Equity, RecordPolicy::All);
        game.generate_moves(&mut list);
        let mut candidates = list.into_sorted_vec();
        candidates.push(Move::pass());
        let args = SimArgs {
            plies: 2,
            max_iterations: 20,
            num_threads: 2,
            seed: 1,
            known_opponent_rack: None,
            bai_confidence_z: None,
            max_samples_per_arm: None,
            win_pct: None,
        };
        let control = Arc::new(ThreadControl::new());
        let results = simulate(&game, &candidates, &args, &control).unwrap();
        assert_eq!(results.stats.len(), candidates.len());
        assert!(results.stats.iter().map(CandidateStats::count).sum::<u64>() >= 20);
    }

    #[test]
    fn unavailable_known_rack_is_rejected_before_any_worker_runs() {
        let game = small_game();
        let ld = game.letter_distribution().clone();
        // Demand more tiles of a letter than the bag could possibly hold.
        let mut known = Rack::new(ld.alphabet_size());
        let z = ld.machine_letter_for_glyph('Z').unwrap();
        known.add_n(z, 20);
        let args = SimArgs {
            plies: 1,
            max_iterations: 5,
            num_threads: 1,
            seed: 1,
            known_opponent_rack: Some(known),
            bai_confidence_z: None,
            max_samples_per_arm: None,
            win_pct: None,
        };
        let control = Arc::new(ThreadControl::new());
        let err = simulate(&game, &[Move::pass()], &args, &control).unwrap_err();
        assert!(matches!(
            err,
            MagpieError::Precondition(EnginePreconditionError::OpponentRackUnavailable { .. })
        ));
    }

    #[test]
    fn welford_stats_match_naive_mean() {
        let mut stats = CandidateStats::default();
        let samples = [1.0, 2.0, 3.0, 4.0, 5.0];
        for &s in &samples {
            stats.push(s, if s > 2.5 { 1.0 } else { 0.0 });
        }
        assert!((stats.mean() - 3.0).abs() < 1e-9);
        assert_eq!(stats.count(), 5);
    }

    #[test]
    fn merge_combines_disjoint_streams_like_one_pass() {
        let mut a = CandidateStats::default();
        for v in [1.0, 2.0, 3.0] {
            a.push(v, 0.0);
        }
        let mut b = CandidateStats::default();
        for v in [4.0, 5.0] {
            b.push(v, 1.0);
        }
        merge(&mut a, b);
        assert_eq!(a.count(), 5);
        assert!((a.mean() - 3.0).abs() < 1e-9);
    }
}
