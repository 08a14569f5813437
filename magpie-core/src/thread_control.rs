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

//! Thread control: the scheduling state every multi-worker engine
//! (simulation, inference, endgame) shares with its workers. A worker's
//! only contact with the outside world is through this struct: a shared
//! atomic iteration/candidate counter for next-index assignment, a shared
//! halt flag for cooperative cancellation, and a mutex around the one
//! print path every engine funnels output through.

use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Why a run stopped, surfaced to the caller once every worker has
/// observed the halt flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HaltReason {
    /// The configured iteration/depth/sample limit was reached normally.
    LimitReached,
    /// A user interrupt (or a timer thread) requested cancellation.
    Interrupted,
    /// A statistical stopping rule (BAI) concluded early.
    StatisticallySufficient,
}

/// Shared control-plane state for one multi-worker engine run. Cloned by
/// `Arc` into every worker thread; never duplicated per-worker the way a
/// `Game` is.
#[derive(Debug)]
pub struct ThreadControl {
    halted: AtomicBool,
    halt_reason: Mutex<Option<HaltReason>>,
    next_index: AtomicU64,
    iterations_done: AtomicU64,
    print_lock: Mutex<()>,
    started_at: Mutex<Option<Instant>>,
    soft_limit: Mutex<Option<Duration>>,
}

impl ThreadControl {
    #[must_use]
    pub fn new() -> Self {
        ThreadControl {
            halted: AtomicBool::new(false),
            halt_reason: Mutex::new(None),
            next_index: AtomicU64::new(0),
            iterations_done: AtomicU64::new(0),
            print_lock: Mutex::new(()),
            started_at: Mutex::new(None),
            soft_limit: Mutex::new(None),
        }
    }

    /// Reset all counters and clear the halt flag, recording the start
    /// time and an optional soft wall-clock limit.
    pub fn start(&self, soft_limit: Option<Duration>) {
        self.halted.store(false, Ordering::SeqCst);
        *self.halt_reason.lock().unwrap() = None;
        self.next_index.store(0, Ordering::SeqCst);
        self.iterations_done.store(0, Ordering::SeqCst);
        *self.started_at.lock().unwrap() = Some(Instant::now());
        *self.soft_limit.lock().unwrap() = soft_limit;
        log::debug!("thread control started, soft_limit={soft_limit:?}");
    }

    /// Claim the next iteration/candidate index for a worker to process;
    /// callers stop drawing more work once `is_halted()` is true. This is
    /// the only coordination point between workers during the hot loop.
    pub fn claim_next_index(&self) -> u64 {
        let index = self.next_index.fetch_add(1, Ordering::SeqCst);
        log::trace!("worker claimed index {index}");
        index
    }

    /// Record that one more iteration/candidate has completed, for
    /// progress reporting and sample-limit stopping rules.
    pub fn record_iteration(&self) -> u64 {
        self.iterations_done.fetch_add(1, Ordering::SeqCst) + 1
    }

    #[must_use]
    pub fn iterations_done(&self) -> u64 {
        self.iterations_done.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at
            .lock()
            .unwrap()
            .map(|t| t.elapsed())
            .unwrap_or_default()
    }

    /// Whether the soft wall-clock limit, if any, has been exceeded.
    #[must_use]
    pub fn soft_limit_exceeded(&self) -> bool {
        match *self.soft_limit.lock().unwrap() {
            Some(limit) => self.elapsed() >= limit,
            None => false,
        }
    }

    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn halt_reason(&self) -> Option<HaltReason> {
        *self.halt_reason.lock().unwrap()
    }

    /// Set the halt flag for the given reason; a reason already recorded
    /// is never overwritten.
    pub fn halt(&self, reason: HaltReason) {
        let mut guard = self.halt_reason.lock().unwrap();
        if guard.is_none() {
            *guard = Some(reason);
            log::info!("run halted: {reason:?}");
        }
        self.halted.store(true, Ordering::SeqCst);
    }

    /// Serialize output through one mutex so interleaved worker prints
    /// never tear a line.
    pub fn print_line(&self, line: &str) {
        let _guard = self.print_lock.lock().unwrap();
        let mut stdout = std::io::stdout();
        let _ = writeln!(stdout, "{line}");
    }
}

impl Default for ThreadControl {
    fn default() -> Self {
        ThreadControl::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn claim_next_index_is_unique_across_threads() {
        let control = Arc::new(ThreadControl::new());
        control.start(None);
        let mut handles = Vec::new();
        for _ in 0..8 {
            let c = control.clone();
            handles.push(thread::spawn(move || {
                let mut claimed = Vec::new();
                for _ in 0..100 {
                    claimed.push(c.claim_next_index());
                }
                claimed
            }));
        }
        let mut all: Vec<u64> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 800);
    }

    #[test]
    fn halt_is_sticky_to_first_reason() {
        let control = ThreadControl::new();
        control.start(None);
        control.halt(HaltReason::LimitReached);
        control.halt(HaltReason::Interrupted);
        assert_eq!(control.halt_reason(), Some(HaltReason::LimitReached));
        assert!(control.is_halted());
    }

    #[test]
    fn start_resets_state() {
        let control = ThreadControl::new();
        control.start(None);
        control.claim_next_index();
        control.halt(HaltReason::LimitReached);
        control.start(None);
        assert!(!control.is_halted());
        assert_eq!(control.claim_next_index(), 0);
    }
}
