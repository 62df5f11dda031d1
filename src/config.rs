//! Pool configuration options

/// Configuration for object pool behavior
///
/// # Examples
///
/// ```
/// use pooling::PoolConfiguration;
///
/// let config = PoolConfiguration::<Vec<u8>>::new()
///     .with_capacity(16)
///     .with_warmup(4)
///     .with_name("buffers");
///
/// assert_eq!(config.capacity, 16);
/// assert_eq!(config.warmup_size, Some(4));
/// assert_eq!(config.name, "buffers");
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfiguration<T> {
    /// Maximum number of idle objects retained by the pool
    pub capacity: usize,

    /// Number of objects to pre-create when the pool is built
    pub warmup_size: Option<usize>,

    /// Objects failing this check after clearing are discarded instead of recycled
    pub validation_function: Option<fn(&T) -> bool>,

    /// Identity comparison used to skip duplicate returns of aliased objects
    pub identity_function: Option<fn(&T, &T) -> bool>,

    /// Label used in log fields and exported metrics
    pub name: String,
}

impl<T> Default for PoolConfiguration<T> {
    fn default() -> Self {
        Self {
            capacity: 100,
            warmup_size: None,
            validation_function: None,
            identity_function: None,
            name: "pool".to_string(),
        }
    }
}

impl<T> PoolConfiguration<T> {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of idle objects
    ///
    /// A capacity of zero is allowed; such a pool never retains anything and
    /// every rent constructs a fresh object.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set warm-up size
    pub fn with_warmup(mut self, size: usize) -> Self {
        self.warmup_size = Some(size);
        self
    }

    /// Validate objects on return
    pub fn with_validation(mut self, func: fn(&T) -> bool) -> Self {
        self.validation_function = Some(func);
        self
    }

    /// Enable duplicate-return detection
    ///
    /// Owned values cannot be returned twice, so this only matters for types
    /// that alias a shared instance, such as `Arc<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pooling::PoolConfiguration;
    /// use std::sync::Arc;
    ///
    /// let config = PoolConfiguration::<Arc<Vec<u8>>>::new()
    ///     .with_identity(Arc::ptr_eq);
    ///
    /// assert!(config.identity_function.is_some());
    /// ```
    pub fn with_identity(mut self, func: fn(&T, &T) -> bool) -> Self {
        self.identity_function = Some(func);
        self
    }

    /// Set the pool name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = PoolConfiguration::<i32>::default();
        assert_eq!(config.capacity, 100);
        assert!(config.warmup_size.is_none());
        assert!(config.validation_function.is_none());
        assert!(config.identity_function.is_none());
        assert_eq!(config.name, "pool");
    }

    #[test]
    fn validation_is_stored() {
        let config = PoolConfiguration::<i32>::new().with_validation(|x| *x >= 0);
        let validate = config.validation_function.unwrap();
        assert!(validate(&1));
        assert!(!validate(&-1));
    }
}
