//! Core object pool implementation

use crate::config::PoolConfiguration;
use crate::errors::{CallbackError, PoolError, PoolResult};
use crate::health::HealthStatus;
use crate::metrics::{MetricsExporter, MetricsTracker, PoolMetrics};
use crate::pooled::Pooled;

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type Creator<T> = Box<dyn Fn() -> Result<T, CallbackError> + Send + Sync>;
type Clearer<T> = Box<dyn Fn(&mut T) -> Result<(), CallbackError> + Send + Sync>;

/// State shared between a pool and the handles it hands out
pub(crate) struct Shared<T> {
    idle: Mutex<Vec<T>>,
    creator: Creator<T>,
    clearer: Option<Clearer<T>>,
    config: PoolConfiguration<T>,
    metrics: MetricsTracker,
}

impl<T> Shared<T> {
    fn acquire(&self) -> PoolResult<T> {
        // Guard is released before the creator runs
        let recycled = self.idle.lock().pop();

        let item = match recycled {
            Some(item) => {
                MetricsTracker::increment(&self.metrics.recycled);
                tracing::trace!(pool = %self.config.name, "Recycled idle object");
                item
            }
            None => {
                let item = self.create()?;
                tracing::debug!(pool = %self.config.name, "Pool empty, created new object");
                item
            }
        };

        MetricsTracker::increment(&self.metrics.total_rented);
        Ok(item)
    }

    fn create(&self) -> PoolResult<T> {
        match (self.creator)() {
            Ok(item) => {
                MetricsTracker::increment(&self.metrics.created);
                Ok(item)
            }
            Err(source) => {
                MetricsTracker::increment(&self.metrics.creation_failures);
                tracing::warn!(pool = %self.config.name, error = %source, "Creator failed");
                Err(PoolError::CreationFailed(source))
            }
        }
    }

    /// Clear, validate and reinsert `item`, reporting whether it was kept.
    pub(crate) fn try_return(&self, mut item: T) -> PoolResult<bool> {
        // Cleared unconditionally, even if the item ends up discarded
        if let Some(clearer) = &self.clearer
            && let Err(source) = clearer(&mut item)
        {
            MetricsTracker::increment(&self.metrics.clear_failures);
            tracing::warn!(pool = %self.config.name, error = %source, "Clearer failed, discarding object");
            return Err(PoolError::ClearingFailed(source));
        }

        if let Some(validate) = self.config.validation_function
            && !validate(&item)
        {
            MetricsTracker::increment(&self.metrics.validation_failures);
            tracing::debug!(pool = %self.config.name, "Validation rejected returned object");
            return Ok(false);
        }

        let mut idle = self.idle.lock();

        if let Some(same) = self.config.identity_function
            && idle.iter().any(|held| same(held, &item))
        {
            drop(idle);
            MetricsTracker::increment(&self.metrics.duplicate_returns);
            tracing::debug!(pool = %self.config.name, "Object already idle, skipping duplicate return");
            return Ok(false);
        }

        if idle.len() >= self.config.capacity {
            drop(idle);
            MetricsTracker::increment(&self.metrics.discarded);
            tracing::debug!(
                pool = %self.config.name,
                capacity = self.config.capacity,
                "Pool at capacity, discarding returned object"
            );
            return Ok(false);
        }

        idle.push(item);
        let idle_count = idle.len();
        drop(idle);

        MetricsTracker::increment(&self.metrics.total_returned);
        tracing::trace!(pool = %self.config.name, idle = idle_count, "Object returned");
        Ok(true)
    }

    fn warmup(&self, count: usize) -> PoolResult<usize> {
        let mut added = 0;

        while added < count && self.len() < self.config.capacity {
            let item = self.create()?;

            let mut idle = self.idle.lock();
            // Concurrent returns may have filled the pool meanwhile
            if idle.len() >= self.config.capacity {
                drop(idle);
                break;
            }
            idle.push(item);
            added += 1;
        }

        tracing::debug!(pool = %self.config.name, added, "Pool warmed up");
        Ok(added)
    }

    fn len(&self) -> usize {
        self.idle.lock().len()
    }
}

/// Thread-safe pool that recycles objects built by a creator function.
///
/// Renting pops an idle object or, when none is idle, constructs one; it never
/// waits. Returning clears the object and keeps it only while fewer than
/// `capacity` objects are idle.
///
/// Cloning a `Pool` is cheap and yields another handle to the same pool.
///
/// # Examples
///
/// ```
/// use pooling::Pool;
///
/// let pool = Pool::with_clearer(|| Vec::<u64>::with_capacity(1024), |v: &mut Vec<u64>| v.clear(), 2);
///
/// {
///     let mut buf = pool.rent().unwrap();
///     buf.push(7);
/// } // cleared and returned here
///
/// assert_eq!(pool.count(), 1);
/// assert!(pool.rent().unwrap().is_empty());
/// ```
pub struct Pool<T> {
    shared: Arc<Shared<T>>,
}

impl<T: Send + 'static> Pool<T> {
    /// Create a pool with an infallible creator and no clearer
    pub fn new<F>(creator: F, capacity: usize) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::from_parts(
            infallible_creator(creator),
            None,
            PoolConfiguration::new().with_capacity(capacity),
        )
    }

    /// Create a pool that clears every object before it is recycled
    pub fn with_clearer<F, C>(creator: F, clearer: C, capacity: usize) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        C: Fn(&mut T) + Send + Sync + 'static,
    {
        Self::from_parts(
            infallible_creator(creator),
            Some(infallible_clearer(clearer)),
            PoolConfiguration::new().with_capacity(capacity),
        )
    }

    /// Start building a pool with fallible callbacks or extra configuration
    pub fn builder() -> PoolBuilder<T> {
        PoolBuilder::new()
    }

    fn from_parts(creator: Creator<T>, clearer: Option<Clearer<T>>, config: PoolConfiguration<T>) -> Self {
        Self {
            shared: Arc::new(Shared {
                idle: Mutex::new(Vec::new()),
                creator,
                clearer,
                config,
                metrics: MetricsTracker::new(),
            }),
        }
    }

    /// Rent an object wrapped in a handle that returns it when dropped
    pub fn rent(&self) -> PoolResult<Pooled<T>> {
        let item = self.shared.acquire()?;
        Ok(Pooled::new(item, Arc::downgrade(&self.shared)))
    }

    /// Rent an object without a handle; the caller returns it manually
    pub fn rent_detached(&self) -> PoolResult<T> {
        self.shared.acquire()
    }

    /// Return an object, reporting whether the pool kept it
    ///
    /// `Ok(false)` means the object was dropped: the pool was full, validation
    /// rejected it, or the same instance was already idle. A clearer failure
    /// drops the object and is returned as [`PoolError::ClearingFailed`].
    pub fn try_return(&self, item: T) -> PoolResult<bool> {
        self.shared.try_return(item)
    }

    /// Return an object to the pool
    pub fn return_item(&self, item: T) -> PoolResult<()> {
        self.shared.try_return(item).map(|_| ())
    }

    /// Number of idle objects
    pub fn count(&self) -> usize {
        self.shared.len()
    }

    /// Maximum number of idle objects retained
    pub fn capacity(&self) -> usize {
        self.shared.config.capacity
    }

    pub fn name(&self) -> &str {
        &self.shared.config.name
    }

    /// Pre-create up to `count` idle objects, never exceeding capacity
    ///
    /// Returns how many objects were added.
    pub fn warmup(&self, count: usize) -> PoolResult<usize> {
        self.shared.warmup(count)
    }

    /// Warm up on tokio's blocking thread pool
    pub async fn warmup_async(&self, count: usize) -> PoolResult<usize> {
        let shared = Arc::clone(&self.shared);

        tokio::task::spawn_blocking(move || shared.warmup(count))
            .await
            .map_err(|_| PoolError::Cancelled)?
    }

    /// Get pool metrics
    pub fn get_metrics(&self) -> PoolMetrics {
        self.shared
            .metrics
            .get_metrics(self.count(), self.shared.config.capacity)
    }

    /// Export metrics
    pub fn export_metrics(&self) -> HashMap<String, String> {
        self.get_metrics().export()
    }

    /// Export metrics in Prometheus format
    pub fn export_metrics_prometheus(
        &self,
        pool_name: &str,
        tags: Option<&HashMap<String, String>>,
    ) -> String {
        MetricsExporter::export_prometheus(&self.get_metrics(), pool_name, tags)
    }

    /// Get health status
    pub fn get_health_status(&self) -> HealthStatus {
        HealthStatus::new(&self.get_metrics())
    }
}

impl<T> Clone for Pool<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("name", &self.shared.config.name)
            .field("capacity", &self.shared.config.capacity)
            .field("idle", &self.shared.len())
            .field("has_clearer", &self.shared.clearer.is_some())
            .finish()
    }
}

/// Builder for [`Pool`]
///
/// # Examples
///
/// ```
/// use pooling::{Pool, PoolConfiguration, PoolError};
///
/// let pool = Pool::<String>::builder()
///     .try_creator(|| Ok(String::with_capacity(256)))
///     .clearer(|s: &mut String| s.clear())
///     .configuration(PoolConfiguration::new().with_capacity(8).with_warmup(2))
///     .build()
///     .unwrap();
/// assert_eq!(pool.count(), 2);
///
/// let missing = Pool::<String>::builder().capacity(8).build();
/// assert!(matches!(missing, Err(PoolError::InvalidArgument("creator"))));
/// ```
pub struct PoolBuilder<T> {
    creator: Option<Creator<T>>,
    clearer: Option<Clearer<T>>,
    config: PoolConfiguration<T>,
}

impl<T: Send + 'static> PoolBuilder<T> {
    pub fn new() -> Self {
        Self {
            creator: None,
            clearer: None,
            config: PoolConfiguration::default(),
        }
    }

    /// Set an infallible creator
    pub fn creator<F>(mut self, creator: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.creator = Some(infallible_creator(creator));
        self
    }

    /// Set a creator whose errors are passed to the caller of `rent`
    pub fn try_creator<F>(mut self, creator: F) -> Self
    where
        F: Fn() -> Result<T, CallbackError> + Send + Sync + 'static,
    {
        self.creator = Some(Box::new(creator));
        self
    }

    /// Set an infallible clearer
    pub fn clearer<C>(mut self, clearer: C) -> Self
    where
        C: Fn(&mut T) + Send + Sync + 'static,
    {
        self.clearer = Some(infallible_clearer(clearer));
        self
    }

    /// Set a clearer whose errors are passed to the caller of `try_return`
    pub fn try_clearer<C>(mut self, clearer: C) -> Self
    where
        C: Fn(&mut T) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.clearer = Some(Box::new(clearer));
        self
    }

    /// Replace the whole configuration
    pub fn configuration(mut self, config: PoolConfiguration<T>) -> Self {
        self.config = config;
        self
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// Build the pool, warming it up if the configuration asks for it
    ///
    /// Fails with [`PoolError::InvalidArgument`] when no creator was set, or
    /// with [`PoolError::CreationFailed`] when warm-up fails.
    pub fn build(self) -> PoolResult<Pool<T>> {
        let creator = self.creator.ok_or(PoolError::InvalidArgument("creator"))?;
        let warmup_size = self.config.warmup_size;

        let pool = Pool::from_parts(creator, self.clearer, self.config);
        if let Some(count) = warmup_size {
            pool.warmup(count)?;
        }
        Ok(pool)
    }
}

fn infallible_creator<T: 'static, F>(creator: F) -> Creator<T>
where
    F: Fn() -> T + Send + Sync + 'static,
{
    Box::new(move || Ok::<T, CallbackError>(creator()))
}

fn infallible_clearer<T: 'static, C>(clearer: C) -> Clearer<T>
where
    C: Fn(&mut T) + Send + Sync + 'static,
{
    Box::new(move |item: &mut T| {
        clearer(item);
        Ok::<(), CallbackError>(())
    })
}

impl<T: Send + 'static> Default for PoolBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
