//! # Frame Clock
//!
//! The only temporal primitive of the simulation: a monotonic millisecond
//! tick counter. The frame loop advances it explicitly, which keeps every
//! rate-limited behaviour (fire intervals, animation frames, time-to-live)
//! deterministic and testable.

/// Monotonic millisecond counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameClock {
    /// Ticks since start.
    now_ms: u64,
    /// Length of the last step.
    last_step_ms: u64,
}

impl FrameClock {
    /// Creates a clock at tick zero.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now_ms: 0,
            last_step_ms: 0,
        }
    }

    /// Current tick in milliseconds.
    #[inline]
    #[must_use]
    pub const fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Moves the clock forward by `elapsed_ms`.
    ///
    /// # Returns
    ///
    /// The new current tick.
    #[inline]
    pub fn advance(&mut self, elapsed_ms: u64) -> u64 {
        self.now_ms = self.now_ms.saturating_add(elapsed_ms);
        self.last_step_ms = elapsed_ms;
        self.now_ms
    }

    /// Milliseconds since `start_ms`, zero if `start_ms` lies in the future.
    #[inline]
    #[must_use]
    pub const fn elapsed_since(&self, start_ms: u64) -> u64 {
        self.now_ms.saturating_sub(start_ms)
    }

    /// Length of the last step in seconds.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn delta_seconds(&self) -> f64 {
        self.last_step_ms as f64 / 1000.0
    }
}
