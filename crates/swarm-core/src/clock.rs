// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction so record timestamps and lock-staleness checks are
//! testable without sleeping real wall-clock time.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A source of "now", in whole seconds since the Unix epoch.
///
/// Record timestamps in this system are second-granularity (per the data
/// model), so the clock deals in `u64` seconds rather than milliseconds.
pub trait Clock: Send + Sync {
    fn now_secs(&self) -> u64;
}

/// Real wall-clock time.
#[derive(Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// Controllable clock for deterministic tests (lock staleness, cost
/// tailing cadence, retry backoff).
#[derive(Clone)]
pub struct FakeClock {
    secs: Arc<Mutex<u64>>,
}

impl FakeClock {
    pub fn new(start_secs: u64) -> Self {
        Self { secs: Arc::new(Mutex::new(start_secs)) }
    }

    pub fn advance(&self, by: Duration) {
        *self.secs.lock() += by.as_secs();
    }

    pub fn set(&self, secs: u64) {
        *self.secs.lock() = secs;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new(1_700_000_000)
    }
}

impl Clock for FakeClock {
    fn now_secs(&self) -> u64 {
        *self.secs.lock()
    }
}
