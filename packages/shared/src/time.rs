//! Time-related utilities with clock abstraction for testability.

use std::{
    sync::{
        LazyLock,
        atomic::{AtomicI64, Ordering},
    },
    time::Instant,
};

use chrono::Utc;

/// Reference point of `SystemClock`
static PROCESS_START: LazyLock<Instant> = LazyLock::new(Instant::now);

/// Clock trait for dependency injection and testing
///
/// Readings are milliseconds on a scale that never goes backwards. Only the
/// difference between two readings is meaningful.
pub trait Clock: Send + Sync {
    /// Get the current reading (milliseconds)
    fn now_millis(&self) -> i64;
}

/// System clock implementation
///
/// Counts milliseconds since the first reading in this process using the
/// monotonic clock, so stepping the wall clock does not affect it.
/// Use [`get_timestamp_millis`] for wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        i64::try_from(PROCESS_START.elapsed().as_millis()).unwrap_or(i64::MAX)
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    /// Create a new fixed clock with the given timestamp
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: fixed_time_millis,
        }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.fixed_time
    }
}

/// Manually advanced clock for tests that need time to move (expiry, throttling)
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(start_millis),
        }
    }

    /// Move the clock forward by `millis`
    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }

    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Get current Unix timestamp (milliseconds)
pub fn get_timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}
