//! Health monitoring for object pools

use crate::metrics::PoolMetrics;

/// Health status of an object pool
///
/// # Examples
///
/// ```
/// use pooling::Pool;
///
/// let pool = Pool::new(|| vec![0u8; 16], 3);
/// pool.warmup(3).unwrap();
///
/// let health = pool.get_health_status();
/// assert!(health.is_healthy());
/// assert_eq!(health.idle_objects, 3);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "metrics", derive(serde::Serialize))]
pub struct HealthStatus {
    /// Whether the pool is healthy
    pub is_healthy: bool,

    /// Number of warnings detected
    pub warning_count: usize,

    /// Idle objects relative to capacity (0.0 to 1.0)
    pub fill_ratio: f64,

    /// Idle objects count
    pub idle_objects: usize,

    /// Total capacity
    pub total_capacity: usize,

    /// Warning messages
    pub warnings: Vec<String>,
}

impl HealthStatus {
    /// Derive a health status from a metrics snapshot
    pub fn new(metrics: &PoolMetrics) -> Self {
        let fill_ratio = if metrics.capacity > 0 {
            metrics.idle_objects as f64 / metrics.capacity as f64
        } else {
            0.0
        };

        let mut warnings = Vec::new();
        let mut is_healthy = true;

        // A failing clearer means recycled objects cannot be trusted
        if metrics.clear_failures > 0 {
            warnings.push(format!("Clearer failed {} time(s)", metrics.clear_failures));
            is_healthy = false;
        }

        if metrics.creation_failures > 0 {
            warnings.push(format!("Creator failed {} time(s)", metrics.creation_failures));
        }

        if metrics.capacity == 0 {
            warnings.push("Capacity is zero, nothing is recycled".to_string());
        }

        // More discards than accepted returns: capacity is too small for the load
        if metrics.discarded > metrics.total_returned {
            warnings.push(format!(
                "Discarded {} of {} returns at capacity",
                metrics.discarded,
                metrics.discarded + metrics.total_returned
            ));
        }

        Self {
            is_healthy,
            warning_count: warnings.len(),
            fill_ratio,
            idle_objects: metrics.idle_objects,
            total_capacity: metrics.capacity,
            warnings,
        }
    }

    /// Check if the pool is healthy
    pub fn is_healthy(&self) -> bool {
        self.is_healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricsTracker;

    #[test]
    fn quiet_pool_is_healthy() {
        let metrics = MetricsTracker::new().get_metrics(0, 10);
        let health = HealthStatus::new(&metrics);
        assert!(health.is_healthy());
        assert_eq!(health.warning_count, 0);
    }

    #[test]
    fn clear_failure_marks_unhealthy() {
        let tracker = MetricsTracker::new();
        MetricsTracker::increment(&tracker.clear_failures);

        let health = HealthStatus::new(&tracker.get_metrics(0, 10));
        assert!(!health.is_healthy());
        assert_eq!(health.warnings, vec!["Clearer failed 1 time(s)".to_string()]);
    }

    #[test]
    fn heavy_discarding_warns_but_stays_healthy() {
        let tracker = MetricsTracker::new();
        MetricsTracker::increment(&tracker.total_returned);
        MetricsTracker::increment(&tracker.discarded);
        MetricsTracker::increment(&tracker.discarded);

        let health = HealthStatus::new(&tracker.get_metrics(1, 1));
        assert!(health.is_healthy());
        assert_eq!(health.warning_count, 1);
        assert_eq!(health.fill_ratio, 1.0);
    }
}
