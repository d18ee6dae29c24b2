use crate::{LINKLET_EPOCH_MS, TimeSource};
use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

/// A wall-clock time source anchored to a custom epoch.
///
/// Every call reads [`SystemTime::now`], so the returned value follows the
/// host clock, including backward adjustments made by NTP or an operator.
/// Generators built on this clock detect such regressions and refuse to issue
/// IDs until the clock catches up.
///
/// Readings taken before the epoch saturate to `0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WallClock {
    epoch_ms: u64,
}

impl Default for WallClock {
    /// Constructs a clock aligned to [`LINKLET_EPOCH_MS`].
    fn default() -> Self {
        Self::with_epoch(Duration::from_millis(LINKLET_EPOCH_MS))
    }
}

impl WallClock {
    /// Constructs a clock using `epoch` (a [`Duration`] since 1970-01-01 UTC)
    /// as t = 0.
    ///
    /// # Example
    ///
    /// ```
    /// use core::time::Duration;
    /// use linklet::{LINKLET_EPOCH_MS, TimeSource, WallClock};
    ///
    /// let clock = WallClock::with_epoch(Duration::from_millis(LINKLET_EPOCH_MS));
    /// assert!(clock.current_millis() > 0);
    /// ```
    pub const fn with_epoch(epoch: Duration) -> Self {
        Self {
            epoch_ms: epoch.as_millis() as u64,
        }
    }

    /// The configured epoch in milliseconds since the Unix epoch.
    pub const fn epoch_ms(&self) -> u64 {
        self.epoch_ms
    }

    /// Milliseconds since the Unix epoch according to the host clock.
    pub fn unix_millis() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64)
    }
}

impl TimeSource for WallClock {
    fn current_millis(&self) -> u64 {
        Self::unix_millis().saturating_sub(self.epoch_ms)
    }
}
