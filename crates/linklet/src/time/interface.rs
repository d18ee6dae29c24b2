use std::sync::Arc;

/// Unix epoch expressed in milliseconds.
pub const UNIX_EPOCH_MS: u64 = 0;

/// Default custom epoch: Monday, January 1, 2024 00:00:00 UTC
pub const LINKLET_EPOCH_MS: u64 = 1_704_067_200_000;

/// A trait for time sources that return a timestamp relative to an epoch.
///
/// This abstraction allows you to plug in a real system clock or a mocked time
/// source in tests. The unit is expected to be **milliseconds** relative to a
/// configurable origin.
///
/// # Example
///
/// ```
/// use linklet::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the configured epoch.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}
