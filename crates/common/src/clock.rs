//! Wall-clock access behind a trait so time-dependent values (registration
//! expiries, genesis timestamps) can be pinned in tests.

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use chrono::Utc;

/// Source of the current unix time in seconds.
pub trait Clock: fmt::Debug + Send + Sync + 'static {
    /// Returns the current unix timestamp in seconds.
    fn now_unix_secs(&self) -> u64;
}

/// [`Clock`] backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix_secs(&self) -> u64 {
        // Pre-epoch system time is clamped.
        Utc::now().timestamp().max(0) as u64
    }
}

/// [`Clock`] that returns a settable fixed value.
#[derive(Debug, Default)]
pub struct FixedClock {
    secs: AtomicU64,
}

impl FixedClock {
    pub fn new(secs: u64) -> Self {
        Self {
            secs: AtomicU64::new(secs),
        }
    }

    pub fn set(&self, secs: u64) {
        self.secs.store(secs, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: u64) {
        self.secs.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_unix_secs(&self) -> u64 {
        self.secs.load(Ordering::SeqCst)
    }
}
