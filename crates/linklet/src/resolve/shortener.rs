use crate::{
    CacheError, DurableStore, FastCache, LockSnowflakeGenerator, MappingRecord, ServiceError,
    ShortCode, TimeSource, WallClock,
};
use core::time::Duration;

/// Default cache TTL: 24 hours.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Outcome of a best-effort cache write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheWrite {
    Stored,
    /// The cache rejected the write. The operation still succeeded; only
    /// future lookups are slower.
    Degraded(CacheError),
}

impl CacheWrite {
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }
}

/// A successful [`Shortener::create`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Created {
    pub record: MappingRecord,
    pub cache: CacheWrite,
}

/// The answer to a lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Served from the fast cache without touching the store.
    Cached(String),
    /// Loaded from the durable store after a cache miss.
    Loaded { target: String, cache: CacheWrite },
    /// The code is well formed but maps to nothing.
    NotFound,
}

impl Resolution {
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Cached(target) | Self::Loaded { target, .. } => Some(target),
            Self::NotFound => None,
        }
    }

    pub fn into_target(self) -> Option<String> {
        match self {
            Self::Cached(target) | Self::Loaded { target, .. } => Some(target),
            Self::NotFound => None,
        }
    }

    pub const fn is_found(&self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

/// Creates and resolves short codes.
///
/// `create` draws a fresh ID, encodes it, writes the record to the durable
/// store and then warms the cache. `resolve` reads the cache first and falls
/// back to the store, refilling the cache on a miss.
///
/// Store failures on the write path are always surfaced: a code that decodes
/// but resolves to nothing would be worse than an error. Cache failures are
/// logged and swallowed everywhere.
///
/// No cross-request locking is needed. Records are immutable and uniquely
/// keyed, so concurrent creates never conflict and concurrent misses on the
/// same code refill the cache with the same value.
///
/// # Example
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use linklet::{
///     LockSnowflakeGenerator, MemoryCache, MemoryStore, Resolution, Shortener, SnowflakeLayout,
///     WallClock,
/// };
///
/// let generator = LockSnowflakeGenerator::new(SnowflakeLayout::TWITTER, 1, WallClock::default()).unwrap();
/// let shortener = Shortener::new(generator, MemoryStore::new(), MemoryCache::new());
///
/// let code = shortener.create_mapping("https://example.com").await.unwrap();
/// let found = shortener.resolve(code.as_str()).await.unwrap();
/// assert_eq!(found, Resolution::Cached("https://example.com".into()));
/// # }
/// ```
pub struct Shortener<S, C, T>
where
    T: TimeSource,
{
    generator: LockSnowflakeGenerator<T>,
    store: S,
    cache: C,
    cache_ttl: Duration,
}

impl<S, C, T> Shortener<S, C, T>
where
    S: DurableStore,
    C: FastCache,
    T: TimeSource + Send + Sync,
{
    /// Builds a shortener with the [`DEFAULT_CACHE_TTL`].
    pub fn new(generator: LockSnowflakeGenerator<T>, store: S, cache: C) -> Self {
        Self {
            generator,
            store,
            cache,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Sets how long cached entries live.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub const fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    pub const fn generator(&self) -> &LockSnowflakeGenerator<T> {
        &self.generator
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn cache(&self) -> &C {
        &self.cache
    }

    /// Shortens `target` and returns its code.
    ///
    /// # Errors
    ///
    /// See [`Self::create`].
    pub async fn create_mapping(&self, target: &str) -> Result<ShortCode, ServiceError> {
        self.create(target, None).await.map(|created| created.record.code)
    }

    /// Shortens `target` on behalf of `owner` and returns its code.
    ///
    /// # Errors
    ///
    /// See [`Self::create`].
    pub async fn create_mapping_for(
        &self,
        target: &str,
        owner: &str,
    ) -> Result<ShortCode, ServiceError> {
        self.create(target, Some(owner))
            .await
            .map(|created| created.record.code)
    }

    /// Creates a mapping and reports how the cache write went.
    ///
    /// The record is durable once this returns `Ok`, whatever the value of
    /// [`Created::cache`].
    ///
    /// # Errors
    ///
    /// - [`ServiceError::InvalidTarget`] if `target` is blank
    /// - [`ServiceError::ClockRegression`] or [`ServiceError::Generator`] if no
    ///   ID could be issued
    /// - [`ServiceError::StoreUnavailable`] if the record could not be made
    ///   durable
    /// - [`ServiceError::DuplicateCode`] if the store already holds the code
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(self, target)))]
    pub async fn create(&self, target: &str, owner: Option<&str>) -> Result<Created, ServiceError> {
        let target = target.trim();
        if target.is_empty() {
            return Err(ServiceError::InvalidTarget {
                reason: "target must not be empty".to_owned(),
            });
        }

        let id = self.generator.next_id_async().await?;
        let code = ShortCode::from(id);
        let record = MappingRecord::new(code, target, WallClock::unix_millis())
            .with_owner(owner.map(str::to_owned));

        self.store.put(&record).await.inspect_err(|e| {
            tracing::error!(code = %record.code, error = %e, "failed to persist mapping");
        })?;

        let cache = self.populate(&record.code, &record.target).await;
        tracing::debug!(code = %record.code, "created mapping");
        Ok(Created { record, cache })
    }

    /// Resolves `code` to its target.
    ///
    /// A cache hit is returned without touching the store, so lookups of hot
    /// codes keep working while the store is down.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::InvalidCode`] if `code` is not a canonical base62
    ///   code
    /// - [`ServiceError::StoreUnavailable`] if the cache missed and the store
    ///   failed
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(self)))]
    pub async fn resolve(&self, code: &str) -> Result<Resolution, ServiceError> {
        let code = ShortCode::parse(code)?;

        match self.cache.get(code.as_str()).await {
            Ok(Some(target)) => {
                tracing::trace!(%code, "cache hit");
                return Ok(Resolution::Cached(target));
            }
            Ok(None) => tracing::trace!(%code, "cache miss"),
            Err(e) => {
                tracing::warn!(%code, error = %e, "cache read failed, falling back to store");
            }
        }

        let Some(record) = self.store.get(&code).await? else {
            return Ok(Resolution::NotFound);
        };

        let cache = self.populate(&code, &record.target).await;
        Ok(Resolution::Loaded {
            target: record.target,
            cache,
        })
    }

    /// Lists the mappings created by `owner`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::StoreUnavailable`] if the store fails.
    pub async fn history(&self, owner: &str) -> Result<Vec<MappingRecord>, ServiceError> {
        Ok(self.store.list_by_owner(owner).await?)
    }

    async fn populate(&self, code: &ShortCode, target: &str) -> CacheWrite {
        match self.cache.set(code.as_str(), target, self.cache_ttl).await {
            Ok(()) => CacheWrite::Stored,
            Err(e) => {
                tracing::warn!(%code, error = %e, "cache write failed, continuing without it");
                CacheWrite::Degraded(e)
            }
        }
    }
}
