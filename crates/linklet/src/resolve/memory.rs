use crate::{
    CacheError, DurableStore, FastCache, MappingRecord, ShortCode, StoreError,
    mutex::{Mutex, MutexGuard},
};
use core::time::Duration;
use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};
use tokio::time::Instant;

// Cap for TTLs too large to add to `Instant::now()`. Roughly 30 years.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, &'static str> {
    #[cfg(feature = "parking-lot")]
    {
        Ok(mutex.lock())
    }
    #[cfg(not(feature = "parking-lot"))]
    {
        mutex.lock().map_err(|_| "lock poisoned")
    }
}

/// Shared switch used to simulate an outage of an in-memory backend.
#[derive(Clone, Debug)]
struct Availability(Arc<AtomicBool>);

impl Default for Availability {
    fn default() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }
}

impl Availability {
    fn set(&self, available: bool) {
        self.0.store(available, Ordering::Release);
    }

    fn get(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// An in-process [`DurableStore`] backed by a `HashMap`.
///
/// Clones share the same map, so a test can keep a handle while a
/// [`Shortener`] owns another. Nothing survives the process.
///
/// [`Shortener`]: crate::Shortener
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<HashMap<ShortCode, MappingRecord>>>,
    available: Availability,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates an outage: while unavailable, every call fails with
    /// [`StoreError::Unavailable`].
    pub fn set_available(&self, available: bool) {
        self.available.set(available);
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        lock(&self.records).map_or(0, |records| records.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn records(&self) -> Result<MutexGuard<'_, HashMap<ShortCode, MappingRecord>>, StoreError> {
        if !self.available.get() {
            return Err(StoreError::unavailable("memory store offline"));
        }
        lock(&self.records).map_err(StoreError::unavailable)
    }
}

impl DurableStore for MemoryStore {
    async fn put(&self, record: &MappingRecord) -> Result<(), StoreError> {
        let mut records = self.records()?;
        if records.contains_key(&record.code) {
            return Err(StoreError::Conflict {
                code: record.code.clone(),
            });
        }
        records.insert(record.code.clone(), record.clone());
        Ok(())
    }

    async fn get(&self, code: &ShortCode) -> Result<Option<MappingRecord>, StoreError> {
        Ok(self.records()?.get(code).cloned())
    }

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<MappingRecord>, StoreError> {
        let mut owned: Vec<_> = self
            .records()?
            .values()
            .filter(|r| r.owner.as_deref() == Some(owner))
            .cloned()
            .collect();
        owned.sort_by(MappingRecord::newest_first);
        Ok(owned)
    }
}

#[derive(Clone, Debug)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// An in-process [`FastCache`] with per-entry TTLs.
///
/// Expiry is measured with [`tokio::time::Instant`], so tests can pause and
/// advance time. Expired entries are evicted lazily on read, or in bulk with
/// [`MemoryCache::purge_expired`].
#[derive(Clone, Debug, Default)]
pub struct MemoryCache {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
    available: Availability,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates an outage: while unavailable, every call fails with
    /// [`CacheError::Unavailable`].
    pub fn set_available(&self, available: bool) {
        self.available.set(available);
    }

    /// Number of entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        lock(&self.entries).map_or(0, |entries| entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let Ok(mut entries) = lock(&self.entries) else {
            return 0;
        };
        let now = Instant::now();
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, Entry>>, CacheError> {
        if !self.available.get() {
            return Err(CacheError::unavailable("memory cache offline"));
        }
        lock(&self.entries).map_err(CacheError::unavailable)
    }
}

impl FastCache for MemoryCache {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let now = Instant::now();
        let expires_at = now.checked_add(ttl).unwrap_or(now + FAR_FUTURE);
        self.entries()?.insert(
            key.to_owned(),
            Entry {
                value: value.to_owned(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.entries()?;
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

/// A [`FastCache`] that stores nothing and always misses.
///
/// Every resolution goes to the durable store.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopCache;

impl FastCache for NoopCache {
    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
        Ok(())
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }
}
