/// A result type defaulting to the generator's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors a Snowflake generator can emit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The clock reads earlier than the last issued timestamp.
    ///
    /// Fatal for this generator until the clock catches up: issuing an ID now
    /// could collide with one already handed out. The generator never guesses
    /// a corrected timestamp.
    #[error("clock moved backwards: now {now}ms is behind last issued {last}ms")]
    ClockRegression { now: u64, last: u64 },

    /// The clock is past the largest timestamp the layout can encode.
    #[error("timestamp {now}ms exceeds the layout maximum {max}ms")]
    TimestampExhausted { now: u64, max: u64 },

    /// The node ID does not fit the layout's node field.
    #[error("node id {node_id} exceeds the layout maximum {max}")]
    NodeIdOutOfRange { node_id: u64, max: u64 },

    /// The state lock was poisoned by a panicking thread.
    ///
    /// Not available with the `parking-lot` feature, whose mutexes do not
    /// poison.
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator lock poisoned")]
    LockPoisoned,
}

#[cfg(not(feature = "parking-lot"))]
use crate::mutex::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
