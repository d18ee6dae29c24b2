use crate::SnowflakeId;

/// The outcome of a single generation attempt.
///
/// - [`Poll::Ready`] carries a freshly issued ID.
/// - [`Poll::Pending`] means the sequence for the current millisecond is
///   exhausted; retry once the clock reaches `yield_until`.
///
/// This allows non-blocking generation loops with the caller choosing how to
/// back off.
///
/// # Example
///
/// ```
/// use linklet::{LockSnowflakeGenerator, Poll, SnowflakeLayout, TimeSource};
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1
///     }
/// }
///
/// let generator = LockSnowflakeGenerator::new(SnowflakeLayout::TWITTER, 0, FixedTime).unwrap();
/// match generator.try_poll_id().unwrap() {
///     Poll::Ready { id } => println!("ID: {id}"),
///     Poll::Pending { yield_until } => println!("Back off until: {yield_until}"),
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: SnowflakeId,
    },
    /// No ID could be generated because the sequence is exhausted for the
    /// current millisecond.
    Pending {
        /// The timestamp (inclusive) at which generation may resume.
        yield_until: u64,
    },
}
