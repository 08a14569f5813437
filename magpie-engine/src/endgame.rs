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

//! The endgame solver: iterative-deepening alpha-beta over an
//! empty-bag position, with a Zobrist-keyed transposition table, forced-
//! pass heuristic, and optional parallel root-split.
//!
//! Unlike simulation and inference, the endgame solver recurses on a
//! single duplicated [`Game`] via [`Game::play`]/[`Game::unplay`] rather
//! than cloning per node: a make/unmake idiom, since `Game`'s backup
//! stack already exists for this purpose.

use magpie_core::board::{cross_set_allows, Direction};
use magpie_core::error::{EnginePreconditionError, MagpieError, MagpieResult};
use magpie_core::game::{BackupMode, Game};
use magpie_core::letters::unblank;
use magpie_core::movegen::movelist::{MoveList, RecordPolicy, SortKey};
use magpie_core::movegen::mv::Move;
use magpie_core::rack::RACK_SIZE;
use magpie_core::thread_control::{HaltReason, ThreadControl};
use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Upper bound on how many candidates a single node's move list holds.
/// Bounding this keeps one node's
/// generation cost independent of how wide the position actually is.
const MOVE_ARENA_CAPACITY: usize = 128;

/// Resolves the Open Question of whether both players' cross-sets are
/// computed against one shared word graph or each player's own
/// (`game_defs.h`'s `ENDGAME_LEXICON_SHARED`/`ENDGAME_LEXICON_PER_PLAYER`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndgameLexiconMode {
    /// Both players' move generation uses `players()[0]`'s word graph.
    Shared,
    /// Each player's move generation uses their own `Player::kwg`.
    PerPlayer,
}

/// Parameters for one [`solve`] call.
pub struct EndgameArgs {
    pub max_depth: u8,
    pub num_threads: usize,
    pub soft_time_limit: Option<Duration>,
    pub hard_time_limit: Option<Duration>,
    /// Use the cross-set precheck to skip move generation in stuck
    /// positions, and prune each player's word graph to the letters that
    /// can still reach the board (`Kwg::prune`).
    pub use_heuristics: bool,
    pub lexicon_mode: EndgameLexiconMode,
    /// log2 of the transposition table's bucket count.
    pub tt_capacity_log2: u32,
}

impl Default for EndgameArgs {
    fn default() -> Self {
        EndgameArgs {
            max_depth: 10,
            num_threads: 1,
            soft_time_limit: None,
            hard_time_limit: None,
            use_heuristics: true,
            lexicon_mode: EndgameLexiconMode::Shared,
            tt_capacity_log2: 16,
        }
    }
}

/// The outcome of [`solve`]: an exact minimax spread and its line, from
/// the perspective of the player on turn in the position passed in.
#[derive(Clone, Debug, PartialEq)]
pub struct EndgameResult {
    pub spread: i32,
    pub pv: Vec<Move>,
    pub depth_reached: u8,
    pub nodes: u64,
    pub transpositions: u64,
}

/// Solve `game` to a configured depth, invoking `on_depth(depth, spread,
/// pv)` after each completed iterative-deepening pass.
///
/// `lexicon_mode` is read by the caller before constructing `game`'s
/// players: `PerPlayer` simply means each `Player::kwg`
/// already differs; this function always generates moves with whichever
/// `kwg` the on-turn `Player` carries, so no further branching on the mode
/// is needed here.
pub fn solve(
    game: &Game,
    args: &EndgameArgs,
    control: &Arc<ThreadControl>,
    mut on_depth: impl FnMut(u8, i32, &[Move]),
) -> MagpieResult<EndgameResult> {
    if !game.bag().is_empty() {
        return Err(MagpieError::Precondition(EnginePreconditionError::BagNotEmpty(
            game.bag().remaining(),
        )));
    }

    let zobrist = Arc::new(ZobristTable::build(game));
    let tt = Arc::new(TTable::with_capacity_log2(args.tt_capacity_log2));
    control.start(args.soft_time_limit);
    log::info!(
        "endgame solve starting: max_depth={}, num_threads={}",
        args.max_depth,
        args.num_threads
    );

    let mut best = EndgameResult {
        spread: current_spread(game),
        pv: Vec::new(),
        depth_reached: 0,
        nodes: 0,
        transpositions: 0,
    };
    let mut prev_depth_nodes = 1u64;
    let started = Instant::now();

    for depth in 1..=args.max_depth {
        if control.is_halted() {
            break;
        }
        let depth_started = Instant::now();
        let mut root = game.clone();
        root.set_backup_mode(BackupMode::Simulation);
        let (spread, pv, nodes, transpositions) =
            root_search(&mut root, depth, args, &tt, &zobrist, control)?;
        best = EndgameResult {
            spread,
            pv,
            depth_reached: depth,
            nodes,
            transpositions,
        };
        on_depth(best.depth_reached, best.spread, &best.pv);
        log::debug!(
            "endgame depth {} complete: spread={}, nodes={}, transpositions={}, elapsed={:?}",
            depth,
            best.spread,
            best.nodes,
            best.transpositions,
            depth_started.elapsed()
        );

        if control.soft_limit_exceeded() {
            control.halt(HaltReason::LimitReached);
            break;
        }
        if let Some(hard) = args.hard_time_limit {
            let this_depth_elapsed = depth_started.elapsed();
            // Effective branching factor: how much bigger this depth's
            // tree was than the last one, used to estimate whether the
            // *next* depth would blow the hard limit.
            let branching = (best.nodes.max(1) as f64 / prev_depth_nodes.max(1) as f64).max(1.0);
            let estimated_next = this_depth_elapsed.mul_f64(branching);
            if started.elapsed() + estimated_next > hard {
                log::debug!("endgame stopping before depth {}: estimated next depth would exceed the hard time limit", depth + 1);
                break;
            }
        }
        prev_depth_nodes = best.nodes.max(1);
    }
    if !control.is_halted() {
        control.halt(HaltReason::LimitReached);
    }
    log::info!(
        "endgame solve finished: depth_reached={}, spread={}, nodes={}",
        best.depth_reached,
        best.spread,
        best.nodes
    );
    Ok(best)
}

/// Generate the root's move list, optionally partition it across
/// `args.num_threads` workers sharing one transposition table, and return the best (spread, pv, nodes,
/// transpositions) found at this depth.
fn root_search(
    root: &mut Game,
    depth: u8,
    args: &EndgameArgs,
    tt: &Arc<TTable>,
    zobrist: &Arc<ZobristTable>,
    control: &Arc<ThreadControl>,
) -> MagpieResult<(i32, Vec<Move>, u64, u64)> {
    let moves = ordered_moves(root, args.use_heuristics);
    let num_threads = args.num_threads.max(1).min(moves.len().max(1));

    if num_threads <= 1 {
        let mut nodes = 0u64;
        let mut transpositions = 0u64;
        let mut best_value = i32::MIN + 1;
        let mut best_move = moves[0].clone();
        let mut best_line = Vec::new();
        let mut alpha = i32::MIN + 1;
        for mv in &moves {
            if control.is_halted() {
                break;
            }
            let mut line = Vec::new();
            let value = search_move(
                root,
                mv,
                depth,
                alpha,
                i32::MAX,
                0,
                args.use_heuristics,
                tt,
                zobrist,
                control,
                &mut nodes,
                &mut transpositions,
                &mut line,
            )?;
            if value > best_value {
                best_value = value;
                best_move = mv.clone();
                best_line = line;
            }
            alpha = alpha.max(value);
        }
        let mut pv = vec![best_move];
        pv.extend(best_line);
        return Ok((best_value, pv, nodes, transpositions));
    }

    // Parallel root-split: partition the already-ordered move list across
    // workers round-robin so each thread gets a mix of strong and weak
    // candidates rather than a contiguous, uneven slice.
    let chunks: Vec<Vec<Move>> = (0..num_threads)
        .map(|i| moves.iter().skip(i).step_by(num_threads).cloned().collect())
        .collect();
    let results: Mutex<Vec<(i32, Move, Vec<Move>, u64, u64)>> = Mutex::new(Vec::new());
    thread::scope(|scope| {
        for chunk in chunks {
            let mut worker_game = root.clone();
            let tt = Arc::clone(tt);
            let zobrist = Arc::clone(zobrist);
            let control = Arc::clone(control);
            let results = &results;
            let use_heuristics = args.use_heuristics;
            scope.spawn(move || {
                let mut nodes = 0u64;
                let mut transpositions = 0u64;
                let mut local_best: Option<(i32, Move, Vec<Move>)> = None;
                for mv in &chunk {
                    if control.is_halted() {
                        break;
                    }
                    let mut line = Vec::new();
                    let value = search_move(
                        &mut worker_game,
                        mv,
                        depth,
                        i32::MIN + 1,
                        i32::MAX,
                        0,
                        use_heuristics,
                        &tt,
                        &zobrist,
                        &control,
                        &mut nodes,
                        &mut transpositions,
                        &mut line,
                    )
                    .unwrap_or(i32::MIN);
                    let better = match &local_best {
                        Some((best, ..)) => value > *best,
                        None => true,
                    };
                    if better {
                        local_best = Some((value, mv.clone(), line));
                    }
                }
                if let Some((value, mv, line)) = local_best {
                    results
                        .lock()
                        .unwrap()
                        .push((value, mv, line, nodes, transpositions));
                }
            });
        }
    });

    let gathered = results.into_inner().unwrap();
    let total_nodes: u64 = gathered.iter().map(|r| r.3).sum();
    let total_transpositions: u64 = gathered.iter().map(|r| r.4).sum();
    let (best_value, best_move, best_line, ..) = gathered
        .into_iter()
        .reduce(|a, b| if b.0 > a.0 { b } else { a })
        .unwrap_or((0, Move::pass(), Vec::new(), 0, 0));
    let mut pv = vec![best_move];
    pv.extend(best_line);
    Ok((best_value, pv, total_nodes, total_transpositions))
}

/// Play one root candidate, recurse, then unplay it. Returns the
/// evaluation from the mover's (pre-recursion) perspective.
#[allow(clippy::too_many_arguments)]
fn search_move(
    game: &mut Game,
    mv: &Move,
    depth: u8,
    alpha: i32,
    beta: i32,
    passes_in_a_row: u8,
    use_heuristics: bool,
    tt: &TTable,
    zobrist: &ZobristTable,
    control: &Arc<ThreadControl>,
    nodes: &mut u64,
    transpositions: &mut u64,
    line: &mut Vec<Move>,
) -> MagpieResult<i32> {
    game.play(mv)?;
    let passes = if mv.is_pass() { passes_in_a_row + 1 } else { 0 };
    let value = -negamax(
        game,
        depth.saturating_sub(1),
        -beta,
        -alpha,
        passes,
        use_heuristics,
        tt,
        zobrist,
        control,
        nodes,
        transpositions,
        line,
    )?;
    game.unplay()?;
    Ok(value)
}

/// Negamax alpha-beta search with transposition-table probing.
#[allow(clippy::too_many_arguments)]
fn negamax(
    game: &mut Game,
    depth_to_go: u8,
    mut alpha: i32,
    beta: i32,
    passes_in_a_row: u8,
    use_heuristics: bool,
    tt: &TTable,
    zobrist: &ZobristTable,
    control: &Arc<ThreadControl>,
    nodes: &mut u64,
    transpositions: &mut u64,
    parent_line: &mut Vec<Move>,
) -> MagpieResult<i32> {
    *nodes += 1;

    if game.is_over() || passes_in_a_row >= 2 {
        parent_line.clear();
        return Ok(current_spread(game));
    }
    if depth_to_go == 0 {
        parent_line.clear();
        return Ok(current_spread(game));
    }

    let hash = zobrist.hash(game);
    let orig_alpha = alpha;
    if let Some(entry) = tt.probe(hash) {
        if entry.depth >= depth_to_go as i8 {
            *transpositions += 1;
            let cutoff = match entry.bound {
                Bound::Exact => true,
                Bound::Lower => entry.value >= beta,
                Bound::Upper => entry.value <= alpha,
            };
            if cutoff {
                log::trace!("endgame tt cutoff at depth_to_go={depth_to_go}, value={}", entry.value);
                parent_line.clear();
                return Ok(entry.value);
            }
        }
    }

    let moves = ordered_moves(game, use_heuristics);
    let mut best_value = i32::MIN + 1;
    let mut best_move = moves[0].clone();
    for mv in &moves {
        if control.is_halted() {
            break;
        }
        let passes = if mv.is_pass() { passes_in_a_row + 1 } else { 0 };
        game.play(mv)?;
        let mut line = Vec::new();
        let value = -negamax(
            game,
            depth_to_go - 1,
            -beta,
            -alpha,
            passes,
            use_heuristics,
            tt,
            zobrist,
            control,
            nodes,
            transpositions,
            &mut line,
        )?;
        game.unplay()?;

        if value > best_value {
            best_value = value;
            best_move = mv.clone();
            parent_line.clear();
            parent_line.push(mv.clone());
            parent_line.extend(line);
        }
        alpha = alpha.max(value);
        if alpha >= beta {
            break;
        }
    }

    let bound = if best_value <= orig_alpha {
        Bound::Upper
    } else if best_value >= beta {
        Bound::Lower
    } else {
        Bound::Exact
    };
    tt.store(
        hash,
        TTEntry {
            key_check: (hash >> 48) as u16,
            depth: depth_to_go as i8,
            bound,
            value: best_value,
            best_move: Some(best_move),
        },
    );
    Ok(best_value)
}

/// `on_turn` player's score minus every other player's, as things stand
/// right now (already includes end-rack bonuses/penalties once
/// `Game::play` has applied them).
fn current_spread(game: &Game) -> i32 {
    let mover = game.on_turn();
    let mover_score = game.players()[mover].score;
    let others: i32 = game
        .players()
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != mover)
        .map(|(_, p)| p.score)
        .sum();
    mover_score - others
}

/// Generate and equity-sort the on-turn player's legal moves, applying the
/// forced-pass heuristic first. Always returns at least one move
/// (a pass, if nothing else is legal).
fn ordered_moves(game: &Game, use_heuristics: bool) -> Vec<Move> {
    if use_heuristics && is_stuck(game) {
        return vec![Move::pass()];
    }
    let mut list = MoveList::new(MOVE_ARENA_CAPACITY, SortKey::Equity, RecordPolicy::All);
    game.generate_moves(&mut list);
    let mut moves = list.into_sorted_vec();
    if moves.is_empty() {
        moves.push(Move::pass());
    }
    moves
}

/// Cheap precheck for a stuck position: true only if no tile on the
/// on-turn player's rack is allowed by *any* empty square's cross-set in
/// either direction, meaning full move generation could not possibly find
/// a placement.
fn is_stuck(game: &Game) -> bool {
    let board = game.board();
    let rack = &game.players()[game.on_turn()].rack;
    let dim = board.dim();
    for row in 0..dim {
        for col in 0..dim {
            if board.is_occupied(row, col) {
                continue;
            }
            for dir in [Direction::Horizontal, Direction::Vertical] {
                if !board.is_anchor(row, col, dir) {
                    continue;
                }
                let cross = board.cross_set(row, col, dir);
                for (ml, count) in rack.iter() {
                    if count > 0 && cross_set_allows(cross, ml) {
                        return false;
                    }
                }
            }
        }
    }
    true
}

/// Which bound a stored value represents, relative to the window it was
/// searched with (fiddler's `lower_bound`/`upper_bound` pair collapsed
/// into one tagged value, since an endgame spread has no separate mate
/// encoding to keep distinct).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Bound {
    Exact,
    Lower,
    Upper,
}

#[derive(Clone, Debug, PartialEq)]
struct TTEntry {
    key_check: u16,
    depth: i8,
    bound: Bound,
    value: i32,
    #[allow(dead_code)]
    best_move: Option<Move>,
}

const BUCKET_SIZE: usize = 4;

#[derive(Clone, Default)]
struct Bucket {
    entries: [Option<TTEntry>; BUCKET_SIZE],
}

/// A depth-preferred, bucket-locked transposition table: each bucket is
/// its own mutex, so concurrent root-split workers never tear an entry,
/// at the cost of one lock per probe/store instead of a lock-free read.
struct TTable {
    buckets: Vec<Mutex<Bucket>>,
    mask: u64,
}

impl TTable {
    fn with_capacity_log2(log2: u32) -> Self {
        let n = 1usize << log2.min(24);
        TTable {
            buckets: (0..n).map(|_| Mutex::new(Bucket::default())).collect(),
            mask: (n - 1) as u64,
        }
    }

    fn index(&self, hash: u64) -> usize {
        ((hash >> 16) & self.mask) as usize
    }

    fn probe(&self, hash: u64) -> Option<TTEntry> {
        let bucket = self.buckets[self.index(hash)].lock().unwrap();
        let key_check = (hash >> 48) as u16;
        bucket.entries.iter().flatten().find(|e| e.key_check == key_check).cloned()
    }

    fn store(&self, hash: u64, entry: TTEntry) {
        let mut bucket = self.buckets[self.index(hash)].lock().unwrap();
        let key_check = entry.key_check;
        for slot in &mut bucket.entries {
            if matches!(slot, Some(e) if e.key_check == key_check) {
                *slot = Some(entry);
                return;
            }
        }
        for slot in &mut bucket.entries {
            if slot.is_none() {
                *slot = Some(entry);
                return;
            }
        }
        // Every slot is occupied by a different position: evict the
        // shallowest entry.
        let (min_idx, _) = bucket
            .entries
            .iter()
            .enumerate()
            .min_by_key(|(_, e)| e.as_ref().map_or(i8::MIN, |e| e.depth))
            .unwrap();
        bucket.entries[min_idx] = Some(entry);
    }
}

/// Random per-feature hash keys for a specific game shape (board
/// dimension/alphabet, rack capacity, player count), built once per
/// `solve` call and shared read-only by every worker: a Zobrist hash of
/// (board + racks + on-turn), table-of-random-keys style. Since the
/// board/alphabet size is runtime-configured by the lexicon and board
/// layout rather than fixed at compile time, the tables are generated at
/// construction time from a fixed seed instead of being `const`.
struct ZobristTable {
    /// `board_keys[square * alphabet_size + letter]`.
    board_keys: Vec<u64>,
    alphabet_size: usize,
    /// `rack_keys[player][letter][count]`, count in `0..=RACK_SIZE`.
    rack_keys: Vec<Vec<Vec<u64>>>,
    /// `turn_keys[player]`.
    turn_keys: Vec<u64>,
}

/// Fixed seed so every `solve` call over the same process builds the same
/// tables; irrelevant to correctness (any random tables work) but keeps
/// hashes reproducible across runs for debugging.
const ZOBRIST_SEED: u64 = 0x5A6B_7C8D_9E0F_1A2B;

impl ZobristTable {
    fn build(game: &Game) -> Self {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(ZOBRIST_SEED);
        let dim = usize::from(game.board().dim());
        let alphabet_size = game.letter_distribution().alphabet_size();
        let board_keys = (0..dim * dim * alphabet_size).map(|_| rng.next_u64()).collect();
        let rack_keys = game
            .players()
            .iter()
            .map(|_| {
                (0..alphabet_size)
                    .map(|_| (0..=RACK_SIZE).map(|_| rng.next_u64()).collect())
                    .collect()
            })
            .collect();
        let turn_keys = game.players().iter().map(|_| rng.next_u64()).collect();
        ZobristTable {
            board_keys,
            alphabet_size,
            rack_keys,
            turn_keys,
        }
    }

    fn hash(&self, game: &Game) -> u64 {
        let board = game.board();
        let dim = board.dim();
        let mut h = self.turn_keys[game.on_turn()];
        for row in 0..dim {
            for col in 0..dim {
                if board.is_occupied(row, col) {
                    let letter = unblank(board.tile(row, col));
                    let square = usize::from(row) * usize::from(dim) + usize::from(col);
                    h ^= self.board_keys[square * self.alphabet_size + letter as usize];
                }
            }
        }
        for (i, player) in game.players().iter().enumerate() {
            for (ml, count) in player.rack.iter() {
                h ^= self.rack_keys[i][ml as usize][count as usize];
            }
        }
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magpie_core::bag::Bag;
    use magpie_core::board::Board;
    use magpie_core::board_layout::standard15;
    use magpie_core::game::Player;
    use magpie_core::klv::Klv;
    use magpie_core::kwg::Kwg;
    use magpie_core::letters::english;
    use magpie_core::movegen::GameVariant;
    use magpie_core::rack::Rack;
    use std::collections::HashMap;

    fn two_letter_word_game(words: &[&str]) -> Game {
        let ld = Arc::new(english());
        let vocab: Vec<Vec<u8>> = words
            .iter()
            .map(|w| w.chars().map(|c| ld.machine_letter_for_glyph(c).unwrap()).collect())
            .collect();
        let kwg = Arc::new(Kwg::from_words(&vocab));
        let klv = Arc::new(Klv::from_map(HashMap::new()));
        let mut board = Board::new(&standard15());
        board.recompute_all(&ld, &kwg);
        let bag = Bag::new(&ld, 1);
        let p1 = Player::new("a", Rack::new(ld.alphabet_size()), kwg.clone(), klv.clone());
        let p2 = Player::new("b", Rack::new(ld.alphabet_size()), kwg, klv);
        let mut game = Game::new(board, bag, vec![p1, p2], ld, GameVariant::Classic, 50);
        let drained = game.bag().remaining();
        game.bag_mut().draw(drained);
        game
    }

    #[test]
    fn bag_not_empty_is_rejected() {
        let mut game = two_letter_word_game(&["AA"]);
        let ld = game.letter_distribution().clone();
        game.bag_mut().put_back(&[ld.machine_letter_for_glyph('A').unwrap()]);
        let args = EndgameArgs::default();
        let control = Arc::new(ThreadControl::new());
        let err = solve(&game, &args, &control, |_, _, _| {}).unwrap_err();
        assert!(matches!(
            err,
            MagpieError::Precondition(EnginePreconditionError::BagNotEmpty(_))
        ));
    }

    #[test]
    fn empty_racks_solve_to_a_draw() {
        let game = two_letter_word_game(&["AA"]);
        let args = EndgameArgs {
            max_depth: 2,
            ..EndgameArgs::default()
        };
        let control = Arc::new(ThreadControl::new());
        let result = solve(&game, &args, &control, |_, _, _| {}).unwrap();
        assert_eq!(result.spread, 0);
    }

    #[test]
    fn zobrist_hash_changes_with_rack_contents() {
        let mut game = two_letter_word_game(&["AA"]);
        let ld = game.letter_distribution().clone();
        let zobrist = ZobristTable::build(&game);
        let before = zobrist.hash(&game);
        let a = ld.machine_letter_for_glyph('A').unwrap();
        game.player_mut(0).rack.add(a);
        let after = zobrist.hash(&game);
        assert_ne!(before, after);
    }

    #[test]
    fn is_stuck_is_false_on_an_empty_board() {
        // The opening square is an anchor that allows every letter, so an
        // otherwise-empty board is never "stuck".
        let game = two_letter_word_game(&["AA"]);
        assert!(!is_stuck(&game));
    }

    #[test]
    fn tt_store_and_probe_roundtrip() {
        let tt = TTable::with_capacity_log2(4);
        let entry = TTEntry {
            key_check: 42,
            depth: 5,
            bound: Bound::Exact,
            value: 17,
            best_move: None,
        };
        tt.store(0xABCD, entry.clone());
        assert_eq!(tt.probe(0xABCD), Some(entry));
    }

    #[test]
    fn tt_depth_preferred_replacement_keeps_deeper_entry() {
        let tt = TTable::with_capacity_log2(0); // one bucket, forces collisions
        for i in 0..BUCKET_SIZE as u16 {
            tt.store(
                u64::from(i) << 48,
                TTEntry {
                    key_check: i,
                    depth: 1,
                    bound: Bound::Exact,
                    value: 0,
                    best_move: None,
                },
            );
        }
        let deep = TTEntry {
            key_check: 999,
            depth: 9,
            bound: Bound::Exact,
            value: 5,
            best_move: None,
        };
        tt.store(999u64 << 48, deep.clone());
        assert_eq!(tt.probe(999u64 << 48), Some(deep));
    }
}
