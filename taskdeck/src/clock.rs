//! Injectable time and identifier sources.
//!
//! The store never reads the system clock or invents identifiers on its
//! own; it asks a [`Clock`] and an [`IdGenerator`]. Production code uses
//! [`SystemClock`] and [`UuidV7Ids`], tests use [`ManualClock`] and
//! [`SequentialIds`] for deterministic results.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use parking_lot::Mutex;
use taskdeck_model::TaskId;

/// Source of the current instant and the current calendar date.
pub trait Clock: Send + Sync {
    /// The current instant, used for creation and update timestamps.
    fn now(&self) -> DateTime<Utc>;

    /// The current calendar date, used for due-date validation.
    fn today(&self) -> NaiveDate;
}

/// Wall clock. Dates are taken in the local time zone, the way a user
/// reads "today".
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock frozen at `now`.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Jumps to `now`.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock() = now;
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }

    /// The UTC date of the frozen instant.
    fn today(&self) -> NaiveDate {
        self.now.lock().date_naive()
    }
}

/// Source of fresh task identifiers.
pub trait IdGenerator: Send + Sync {
    /// Returns an identifier never returned before by this generator.
    fn next_id(&self) -> TaskId;
}

/// Time-ordered UUID v7 identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV7Ids;

impl IdGenerator for UuidV7Ids {
    fn next_id(&self) -> TaskId {
        TaskId::new_v7()
    }
}

/// `task-1`, `task-2`, ... from an atomic counter.
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    /// Starts counting at 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> TaskId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        TaskId::from(format!("task-{n}"))
    }
}
