use std::sync::atomic::{AtomicI64, Ordering};

/// Source of the current time in unix seconds.
///
/// The aggregator reads the clock exactly once per snapshot, after listing
/// finishes. Tests swap in [`FixedClock`] or [`SteppingClock`] to get
/// deterministic timestamps.
pub trait Clock: Send + Sync {
    fn now_unix(&self) -> i64;
}

/// Wall-clock time in UTC.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Always returns the same instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_unix(&self) -> i64 {
        self.0
    }
}

/// Returns `start`, then `start + step`, `start + 2 * step`, ...
#[derive(Debug)]
pub struct SteppingClock {
    next: AtomicI64,
    step: i64,
}

impl SteppingClock {
    pub fn new(start: i64, step: i64) -> Self {
        Self {
            next: AtomicI64::new(start),
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn now_unix(&self) -> i64 {
        self.next.fetch_add(self.step, Ordering::SeqCst)
    }
}
