//! Metrics collection and export for object pools

use crossbeam::utils::CachePadded;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Metrics data for a pool
///
/// # Examples
///
/// ```
/// use pooling::Pool;
///
/// let pool = Pool::new(Vec::<u8>::new, 4);
///
/// {
///     let _buf = pool.rent().unwrap();
///     let metrics = pool.get_metrics();
///     assert_eq!(metrics.total_rented, 1);
///     assert_eq!(metrics.created, 1);
/// }
///
/// assert_eq!(pool.get_metrics().total_returned, 1);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "metrics", derive(serde::Serialize))]
pub struct PoolMetrics {
    /// Total successful rents
    pub total_rented: usize,

    /// Rents served from the idle list
    pub recycled: usize,

    /// Objects constructed, on a miss or during warm-up
    pub created: usize,

    /// Returns that put the object back into the idle list
    pub total_returned: usize,

    /// Returns dropped because the idle list was full
    pub discarded: usize,

    /// Returns dropped because validation rejected the object
    pub validation_failures: usize,

    /// Returns skipped because the same instance was already idle
    pub duplicate_returns: usize,

    /// Creator errors
    pub creation_failures: usize,

    /// Clearer errors
    pub clear_failures: usize,

    /// Current idle objects
    pub idle_objects: usize,

    /// Maximum idle objects retained
    pub capacity: usize,

    /// Share of rents served from the idle list (0.0 to 1.0)
    pub hit_rate: f64,
}

impl PoolMetrics {
    /// Export metrics as a HashMap
    pub fn export(&self) -> HashMap<String, String> {
        let mut metrics = HashMap::new();
        metrics.insert("total_rented".to_string(), self.total_rented.to_string());
        metrics.insert("recycled".to_string(), self.recycled.to_string());
        metrics.insert("created".to_string(), self.created.to_string());
        metrics.insert("total_returned".to_string(), self.total_returned.to_string());
        metrics.insert("discarded".to_string(), self.discarded.to_string());
        metrics.insert("validation_failures".to_string(), self.validation_failures.to_string());
        metrics.insert("duplicate_returns".to_string(), self.duplicate_returns.to_string());
        metrics.insert("creation_failures".to_string(), self.creation_failures.to_string());
        metrics.insert("clear_failures".to_string(), self.clear_failures.to_string());
        metrics.insert("idle_objects".to_string(), self.idle_objects.to_string());
        metrics.insert("capacity".to_string(), self.capacity.to_string());
        metrics.insert("hit_rate".to_string(), format!("{:.2}", self.hit_rate));
        metrics
    }
}

/// Metrics exporter for Prometheus format
pub struct MetricsExporter;

impl MetricsExporter {
    /// Export metrics in Prometheus exposition format
    ///
    /// # Examples
    ///
    /// ```
    /// use pooling::Pool;
    /// use std::collections::HashMap;
    ///
    /// let pool = Pool::new(|| vec![0u8; 64], 8);
    ///
    /// let mut tags = HashMap::new();
    /// tags.insert("service".to_string(), "api".to_string());
    ///
    /// let output = pool.export_metrics_prometheus("buffers", Some(&tags));
    /// assert!(output.contains("objectpool_objects_idle"));
    /// assert!(output.contains("service=\"api\""));
    /// ```
    pub fn export_prometheus(
        metrics: &PoolMetrics,
        pool_name: &str,
        tags: Option<&HashMap<String, String>>,
    ) -> String {
        let labels = Self::format_labels(pool_name, tags);
        let mut output = String::new();

        let gauges = [
            ("objectpool_objects_idle", "Current idle objects", metrics.idle_objects as f64),
            ("objectpool_capacity", "Maximum idle objects retained", metrics.capacity as f64),
            ("objectpool_hit_rate", "Share of rents served from the idle list", metrics.hit_rate),
        ];
        for (name, help, value) in gauges {
            Self::write_metric(&mut output, name, help, "gauge", &labels, &format!("{:.2}", value));
        }

        let counters = [
            ("objectpool_rented_total", "Total objects rented", metrics.total_rented),
            ("objectpool_recycled_total", "Rents served from the idle list", metrics.recycled),
            ("objectpool_created_total", "Objects constructed by the creator", metrics.created),
            ("objectpool_returned_total", "Objects accepted back into the pool", metrics.total_returned),
            ("objectpool_discarded_total", "Objects dropped at capacity", metrics.discarded),
            ("objectpool_validation_failures_total", "Objects rejected by validation", metrics.validation_failures),
            ("objectpool_duplicate_returns_total", "Duplicate returns skipped", metrics.duplicate_returns),
            ("objectpool_creation_failures_total", "Creator errors", metrics.creation_failures),
            ("objectpool_clear_failures_total", "Clearer errors", metrics.clear_failures),
        ];
        for (name, help, value) in counters {
            Self::write_metric(&mut output, name, help, "counter", &labels, &value.to_string());
        }

        output
    }

    fn write_metric(output: &mut String, name: &str, help: &str, kind: &str, labels: &str, value: &str) {
        output.push_str(&format!("# HELP {} {}\n", name, help));
        output.push_str(&format!("# TYPE {} {}\n", name, kind));
        output.push_str(&format!("{}{{{}}} {}\n", name, labels, value));
    }

    fn format_labels(pool_name: &str, tags: Option<&HashMap<String, String>>) -> String {
        let mut labels = vec![format!("pool=\"{}\"", pool_name)];

        if let Some(tags) = tags {
            let mut sorted: Vec<_> = tags.iter().collect();
            sorted.sort();
            for (key, value) in sorted {
                labels.push(format!("{}=\"{}\"", key, value));
            }
        }

        labels.join(",")
    }
}

/// Internal metrics tracker
#[derive(Default)]
pub(crate) struct MetricsTracker {
    pub total_rented: CachePadded<AtomicUsize>,
    pub recycled: CachePadded<AtomicUsize>,
    pub created: CachePadded<AtomicUsize>,
    pub total_returned: CachePadded<AtomicUsize>,
    pub discarded: CachePadded<AtomicUsize>,
    pub validation_failures: CachePadded<AtomicUsize>,
    pub duplicate_returns: CachePadded<AtomicUsize>,
    pub creation_failures: CachePadded<AtomicUsize>,
    pub clear_failures: CachePadded<AtomicUsize>,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_metrics(&self, idle: usize, capacity: usize) -> PoolMetrics {
        let total_rented = self.total_rented.load(Ordering::Relaxed);
        let recycled = self.recycled.load(Ordering::Relaxed);
        let hit_rate = if total_rented > 0 {
            recycled as f64 / total_rented as f64
        } else {
            0.0
        };

        PoolMetrics {
            total_rented,
            recycled,
            created: self.created.load(Ordering::Relaxed),
            total_returned: self.total_returned.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            validation_failures: self.validation_failures.load(Ordering::Relaxed),
            duplicate_returns: self.duplicate_returns.load(Ordering::Relaxed),
            creation_failures: self.creation_failures.load(Ordering::Relaxed),
            clear_failures: self.clear_failures.load(Ordering::Relaxed),
            idle_objects: idle,
            capacity,
            hit_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_rate_is_zero_without_rents() {
        let tracker = MetricsTracker::new();
        let metrics = tracker.get_metrics(0, 10);
        assert_eq!(metrics.hit_rate, 0.0);
        assert_eq!(metrics.capacity, 10);
    }

    #[test]
    fn hit_rate_counts_recycled_rents() {
        let tracker = MetricsTracker::new();
        for _ in 0..4 {
            MetricsTracker::increment(&tracker.total_rented);
        }
        MetricsTracker::increment(&tracker.recycled);

        let metrics = tracker.get_metrics(2, 10);
        assert_eq!(metrics.total_rented, 4);
        assert_eq!(metrics.recycled, 1);
        assert!((metrics.hit_rate - 0.25).abs() < f64::EPSILON);
        assert_eq!(metrics.export()["hit_rate"], "0.25");
    }

    #[test]
    fn prometheus_labels_are_sorted() {
        let metrics = MetricsTracker::new().get_metrics(1, 2);
        let mut tags = HashMap::new();
        tags.insert("zone".to_string(), "b".to_string());
        tags.insert("app".to_string(), "a".to_string());

        let output = MetricsExporter::export_prometheus(&metrics, "p", Some(&tags));
        assert!(output.contains("objectpool_objects_idle{pool=\"p\",app=\"a\",zone=\"b\"} 1.00"));
        assert!(output.contains("# TYPE objectpool_discarded_total counter"));
    }
}
