//! Growth clock: pull-based crop maturity.
//!
//! The engine owns no timers. Maturity is recomputed on demand from the
//! planting timestamp, the crop's growth duration, and an externally
//! supplied "now", which makes growth resilient to the game being paused
//! or reloaded: elapsed wall-clock time is all that matters.

use serde::{Deserialize, Serialize};

/// Milliseconds in one second, for catalog durations given in seconds.
pub const MILLIS_PER_SECOND: u64 = 1_000;

/// Milliseconds in one minute, for quest durations given in minutes.
pub const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;

/// A point in time, in milliseconds since an arbitrary epoch.
///
/// The engine never reads a clock; every time-dependent operation takes a
/// `Timestamp` from the caller. Any epoch works as long as the caller is
/// consistent within a run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Create a timestamp from milliseconds since the epoch.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Create a timestamp from whole seconds since the epoch.
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs * MILLIS_PER_SECOND)
    }

    /// Milliseconds since the epoch.
    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Milliseconds elapsed since `earlier`, saturating at zero if this
    /// timestamp is the earlier of the two.
    #[must_use]
    pub const fn elapsed_since(self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// A timestamp `millis` later than this one.
    #[must_use]
    pub const fn plus_millis(self, millis: u64) -> Self {
        Self(self.0 + millis)
    }

    /// A timestamp `secs` seconds later than this one.
    #[must_use]
    pub const fn plus_secs(self, secs: u64) -> Self {
        Self(self.0 + secs * MILLIS_PER_SECOND)
    }
}

/// Growth completion fraction in `[0, 1]`.
///
/// Monotonically non-decreasing in `now`, clamped at 1. A non-positive
/// growth duration counts as instantly mature.
#[must_use]
pub fn maturity(planted_at: Timestamp, growth_secs: f64, now: Timestamp) -> f64 {
    if growth_secs <= 0.0 {
        return 1.0;
    }
    let elapsed_ms = now.elapsed_since(planted_at) as f64;
    (elapsed_ms / (growth_secs * MILLIS_PER_SECOND as f64)).min(1.0)
}

/// Whether a crop planted at `planted_at` is ready to harvest at `now`.
#[must_use]
pub fn is_mature(planted_at: Timestamp, growth_secs: f64, now: Timestamp) -> bool {
    maturity(planted_at, growth_secs, now) >= 1.0
}
