use crate::{CacheError, MappingRecord, ShortCode, StoreError};
use core::time::Duration;

/// The system of record for [`MappingRecord`]s.
///
/// Implementations are remote and fallible; callers treat every call as one
/// that can time out or fail. Codes are unique: writing a code twice must
/// fail with [`StoreError::Conflict`]. A successful `put` means the record is
/// durable (or durably queued).
pub trait DurableStore: Send + Sync {
    /// Persists a new record.
    fn put(&self, record: &MappingRecord) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Fetches the record for `code`, or `None` if absent.
    fn get(
        &self,
        code: &ShortCode,
    ) -> impl Future<Output = Result<Option<MappingRecord>, StoreError>> + Send;

    /// Lists every record created by `owner`, newest first.
    fn list_by_owner(
        &self,
        owner: &str,
    ) -> impl Future<Output = Result<Vec<MappingRecord>, StoreError>> + Send;
}

/// A best-effort key/value cache with per-entry expiry.
///
/// Unavailability must only cost latency, never correctness: the cache is
/// never the only place a mapping lives.
pub trait FastCache: Send + Sync {
    fn set(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> impl Future<Output = Result<(), CacheError>> + Send;

    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, CacheError>> + Send;
}
