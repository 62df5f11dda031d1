//! Scope-bound handle returning a rented object to its pool

use crate::errors::PoolResult;
use crate::pool::Shared;

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Weak;

/// A rented object that returns itself to the pool exactly once.
///
/// The return happens on drop or on an explicit [`Pooled::release`]. Both
/// `release` and [`Pooled::into_inner`] consume the handle, so the object
/// cannot be reached or returned again afterwards.
///
/// The handle holds only a weak reference to the pool; if the pool is gone
/// by the time the handle is released, the object is simply dropped.
pub struct Pooled<T> {
    value: Option<T>,
    pool: Weak<Shared<T>>,
}

impl<T> Pooled<T> {
    pub(crate) fn new(value: T, pool: Weak<Shared<T>>) -> Self {
        Self {
            value: Some(value),
            pool,
        }
    }

    pub fn get(&self) -> &T {
        self.value.as_ref().expect("Value already taken")
    }

    pub fn get_mut(&mut self) -> &mut T {
        self.value.as_mut().expect("Value already taken")
    }

    /// Return the object now, reporting whether the pool kept it
    ///
    /// Unlike an implicit drop, a clearer failure is returned to the caller.
    ///
    /// # Examples
    ///
    /// ```
    /// use pooling::Pool;
    ///
    /// let pool = Pool::new(String::new, 1);
    /// let first = pool.rent().unwrap();
    /// let second = pool.rent().unwrap();
    ///
    /// assert!(first.release().unwrap());
    /// assert!(!second.release().unwrap()); // pool already full
    /// assert_eq!(pool.count(), 1);
    /// ```
    pub fn release(mut self) -> PoolResult<bool> {
        match self.value.take() {
            Some(value) => Self::give_back(&self.pool, value),
            None => Ok(false),
        }
    }

    /// Take the object out without returning it to the pool
    pub fn into_inner(mut self) -> T {
        self.value.take().expect("Value already taken")
    }

    fn give_back(pool: &Weak<Shared<T>>, value: T) -> PoolResult<bool> {
        match pool.upgrade() {
            Some(shared) => shared.try_return(value),
            None => {
                tracing::trace!("Pool dropped before release, discarding object");
                Ok(false)
            }
        }
    }
}

impl<T> Deref for Pooled<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.get()
    }
}

impl<T> DerefMut for Pooled<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.get_mut()
    }
}

impl<T> Drop for Pooled<T> {
    fn drop(&mut self) {
        if let Some(value) = self.value.take() {
            // Clearer failures are already logged by the pool
            let _ = Self::give_back(&self.pool, value);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Pooled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pooled")
            .field("value", &self.value)
            .field("pool_alive", &(self.pool.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Pool, PoolError};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn drop_returns_to_pool() {
        let pool = Pool::new(|| vec![0u8; 32], 4);
        {
            let obj = pool.rent().unwrap();
            assert_eq!(obj.len(), 32);
            assert_eq!(pool.count(), 0);
        }
        assert_eq!(pool.count(), 1);
    }

    #[test]
    fn release_then_drop_returns_once() {
        let cleared = Arc::new(AtomicUsize::new(0));
        let cleared_c = cleared.clone();
        let pool = Pool::with_clearer(
            Vec::<u8>::new,
            move |v: &mut Vec<u8>| {
                cleared_c.fetch_add(1, Ordering::SeqCst);
                v.clear();
            },
            4,
        );

        let obj = pool.rent().unwrap();
        assert!(obj.release().unwrap());

        assert_eq!(pool.count(), 1);
        assert_eq!(cleared.load(Ordering::SeqCst), 1);
        assert_eq!(pool.get_metrics().total_returned, 1);
    }

    #[test]
    fn into_inner_skips_return() {
        let pool = Pool::new(|| String::from("fresh"), 4);
        let value = pool.rent().unwrap().into_inner();
        assert_eq!(value, "fresh");
        assert_eq!(pool.count(), 0);
    }

    #[test]
    fn deref_mut_changes_are_cleared() {
        let pool = Pool::with_clearer(String::new, |s: &mut String| s.clear(), 2);
        {
            let mut s = pool.rent().unwrap();
            s.push_str("dirty");
            assert_eq!(s.get(), "dirty");
        }
        assert_eq!(*pool.rent().unwrap(), "");
    }

    #[test]
    fn release_surfaces_clearing_failure() {
        let pool = Pool::<String>::builder()
            .creator(|| String::from("x"))
            .try_clearer(|_| Err("cannot reset".into()))
            .build()
            .unwrap();

        let obj = pool.rent().unwrap();
        assert!(matches!(obj.release(), Err(PoolError::ClearingFailed(_))));
        assert_eq!(pool.count(), 0);

        // Same failure on drop is swallowed
        drop(pool.rent().unwrap());
        assert_eq!(pool.count(), 0);
        assert_eq!(pool.get_metrics().clear_failures, 2);
    }

    #[test]
    fn release_after_pool_dropped() {
        let pool = Pool::new(|| 5u32, 1);
        let obj = pool.rent().unwrap();
        drop(pool);

        assert_eq!(*obj, 5);
        assert!(!obj.release().unwrap());
    }

    #[test]
    fn debug_shows_value() {
        let pool = Pool::new(|| 9u8, 1);
        let obj = pool.rent().unwrap();
        assert_eq!(format!("{:?}", obj), "Pooled { value: Some(9), pool_alive: true }");
    }
}
