use crate::{Base62Error, Error, ShortCode};

/// Failures reported by a [`DurableStore`].
///
/// [`DurableStore`]: crate::DurableStore
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached or failed the operation.
    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },

    /// A record with this code already exists.
    #[error("short code {code} already exists")]
    Conflict { code: ShortCode },
}

impl StoreError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

/// Failures reported by a [`FastCache`]. Never surfaced to callers of
/// [`Shortener`]; they are logged and the operation degrades.
///
/// [`FastCache`]: crate::FastCache
/// [`Shortener`]: crate::Shortener
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    #[error("cache unavailable: {reason}")]
    Unavailable { reason: String },
}

impl CacheError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by [`Shortener`].
///
/// A valid code with no mapping is not an error; see
/// [`Resolution::NotFound`].
///
/// [`Shortener`]: crate::Shortener
/// [`Resolution::NotFound`]: crate::Resolution::NotFound
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ServiceError {
    /// The node's clock moved backwards. Stop issuing IDs from this node until
    /// the condition clears.
    #[error("clock moved backwards: now {now}ms is behind last issued {last}ms")]
    ClockRegression { now: u64, last: u64 },

    /// Any other generator fault.
    #[error("id generation failed: {0}")]
    Generator(Error),

    /// The supplied short code is malformed.
    #[error("invalid short code: {0}")]
    InvalidCode(#[from] Base62Error),

    #[error("invalid target: {reason}")]
    InvalidTarget { reason: String },

    /// The durable store failed. On the write path this always fails the
    /// operation, since the mapping could not be made durable.
    #[error("durable store unavailable: {0}")]
    StoreUnavailable(StoreError),

    /// The store already holds the generated code. Only possible when two
    /// nodes share a node ID.
    #[error("short code {code} already exists")]
    DuplicateCode { code: ShortCode },
}

impl From<Error> for ServiceError {
    fn from(err: Error) -> Self {
        match err {
            Error::ClockRegression { now, last } => Self::ClockRegression { now, last },
            other => Self::Generator(other),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { code } => Self::DuplicateCode { code },
            unavailable @ StoreError::Unavailable { .. } => Self::StoreUnavailable(unavailable),
        }
    }
}
