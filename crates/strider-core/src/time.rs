use std::fmt;
use std::ops::{Add, Sub};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ControlTime
// ---------------------------------------------------------------------------

/// Integer-nanosecond monotonic timestamp.
///
/// Elapsed time is tracked as a `u64` nanosecond count so long-running
/// control loops do not accumulate floating-point drift.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct ControlTime {
    nanos: u64,
}

impl ControlTime {
    /// Create a new `ControlTime` at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { nanos: 0 }
    }

    /// Create a `ControlTime` from a raw nanosecond count.
    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self { nanos }
    }

    /// Create a `ControlTime` from seconds. Negative or NaN input clamps to zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_secs(secs: f64) -> Self {
        Self {
            nanos: (secs.max(0.0) * 1_000_000_000.0) as u64,
        }
    }

    /// Create a `ControlTime` from a [`Duration`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_duration(duration: Duration) -> Self {
        Self {
            nanos: duration.as_nanos() as u64,
        }
    }

    /// Raw nanosecond count.
    #[must_use]
    pub const fn nanos(&self) -> u64 {
        self.nanos
    }

    /// Elapsed milliseconds (truncated).
    #[must_use]
    pub const fn millis(&self) -> u64 {
        self.nanos / 1_000_000
    }

    /// Elapsed seconds as `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn secs_f64(&self) -> f64 {
        self.nanos as f64 / 1_000_000_000.0
    }

    /// Advance the timestamp by `delta_nanos` nanoseconds.
    pub const fn advance(&mut self, delta_nanos: u64) {
        self.nanos = self.nanos.saturating_add(delta_nanos);
    }

    /// Time elapsed since `earlier`. Zero if `earlier` is ahead.
    #[must_use]
    pub const fn elapsed_since(&self, earlier: Self) -> Duration {
        Duration::from_nanos(self.nanos.saturating_sub(earlier.nanos))
    }
}

impl Add<Duration> for ControlTime {
    type Output = Self;

    #[allow(clippy::cast_possible_truncation)]
    fn add(self, rhs: Duration) -> Self {
        Self {
            nanos: self.nanos.saturating_add(rhs.as_nanos() as u64),
        }
    }
}

impl Sub for ControlTime {
    type Output = Duration;

    /// Saturating difference of two timestamps.
    fn sub(self, rhs: Self) -> Duration {
        self.elapsed_since(rhs)
    }
}

impl fmt::Display for ControlTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_secs = self.nanos / 1_000_000_000;
        let remaining_nanos = self.nanos % 1_000_000_000;
        let millis = remaining_nanos / 1_000_000;
        let micros = (remaining_nanos % 1_000_000) / 1_000;
        write!(f, "{total_secs}.{millis:03}{micros:03}s")
    }
}

// ---------------------------------------------------------------------------
// ElapsedSource
// ---------------------------------------------------------------------------

/// A monotonic elapsed-time source.
pub trait ElapsedSource {
    /// Time elapsed since the source was created.
    fn elapsed(&self) -> ControlTime;
}

/// Wall-clock source backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ElapsedSource for MonotonicClock {
    fn elapsed(&self) -> ControlTime {
        ControlTime::from_duration(self.start.elapsed())
    }
}

/// Deterministic source advanced by hand, for simulation and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now: ControlTime,
}

impl ManualClock {
    pub const fn new() -> Self {
        Self {
            now: ControlTime::new(),
        }
    }

    /// Move the clock forward by `secs` seconds.
    pub fn advance_secs(&mut self, secs: f64) {
        self.now.advance(ControlTime::from_secs(secs).nanos());
    }
}

impl ElapsedSource for ManualClock {
    fn elapsed(&self) -> ControlTime {
        self.now
    }
}

// ---------------------------------------------------------------------------
// TickTimer
// ---------------------------------------------------------------------------

/// Turns successive elapsed-time readings into per-tick `dt` values.
///
/// The first reading yields `dt = 0`. Readings that go backwards also yield
/// zero rather than a negative step.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickTimer {
    last: Option<ControlTime>,
}

impl TickTimer {
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Record `now` and return the seconds elapsed since the previous reading.
    pub fn tick(&mut self, now: ControlTime) -> f64 {
        let dt = self
            .last
            .map_or(0.0, |last| now.elapsed_since(last).as_secs_f64());
        if self.last.is_none_or(|last| now >= last) {
            self.last = Some(now);
        }
        dt
    }

    /// Forget the previous reading; the next tick yields zero.
    pub const fn reset(&mut self) {
        self.last = None;
    }
}
