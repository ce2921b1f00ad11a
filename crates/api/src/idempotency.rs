// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Duplicate-delivery suppression.
//!
//! The platform retries deliveries it believes failed. The cache remembers
//! recently seen delivery keys so a retry is acknowledged without being
//! processed again. It lives only as long as the process.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Default number of delivery keys remembered.
pub const DEFAULT_DEDUP_CAPACITY: usize = 1024;

/// Remembers which deliveries have been seen.
pub trait IdempotencyCache: Send + Sync {
    /// Records `key` and returns `true` if it had not been seen before.
    fn first_sighting(&self, key: &str) -> bool;
}

/// Keys stamped with a sighting counter; the smallest stamp is the least
/// recently seen. Lookups and refreshes are logarithmic in the capacity.
#[derive(Debug, Default)]
struct LruState {
    tick: u64,
    stamps: HashMap<String, u64>,
    by_stamp: BTreeMap<u64, String>,
}

impl LruState {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }
}

/// A bounded cache evicting the least recently seen key.
#[derive(Debug)]
pub struct LruIdempotencyCache {
    capacity: usize,
    state: Mutex<LruState>,
}

impl LruIdempotencyCache {
    /// Creates a cache holding up to `capacity` keys (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            state: Mutex::new(LruState::default()),
        }
    }

    /// Number of keys currently remembered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .stamps
            .len()
    }

    /// Returns true if no key is remembered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for LruIdempotencyCache {
    fn default() -> Self {
        Self::new(DEFAULT_DEDUP_CAPACITY)
    }
}

impl IdempotencyCache for LruIdempotencyCache {
    fn first_sighting(&self, key: &str) -> bool {
        let mut state: MutexGuard<'_, LruState> =
            self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let tick: u64 = state.next_tick();

        if let Some(previous) = state.stamps.insert(key.to_string(), tick) {
            state.by_stamp.remove(&previous);
            state.by_stamp.insert(tick, key.to_string());
            return false;
        }

        while state.stamps.len() > self.capacity {
            let Some((_, evicted)) = state.by_stamp.pop_first() else {
                break;
            };
            state.stamps.remove(&evicted);
        }
        state.by_stamp.insert(tick, key.to_string());
        true
    }
}
