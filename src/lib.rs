//! # pooling
//!
//! Thread-safe pool of reusable objects for Rust. Expensive instances, such as
//! large buffers, are recycled instead of being allocated on every use.
//!
//! ## Features
//!
//! - Rent never blocks: an empty pool constructs a new object
//! - Bounded idle capacity; returns beyond it are discarded
//! - Optional clearer run on every return, before an object is reused
//! - Validation and duplicate-return detection on return
//! - Automatic, exactly-once return via RAII (Drop trait)
//! - Pool warm-up/pre-population, sync and async
//! - Metrics, Prometheus export and health status
//!
//! ## Quick Start
//!
//! ```rust
//! use pooling::Pool;
//!
//! let pool = Pool::with_clearer(|| Vec::<i64>::with_capacity(1024), |v: &mut Vec<i64>| v.clear(), 8);
//! {
//!     let mut buf = pool.rent().unwrap();
//!     buf.push(42);
//!     // Buffer cleared and returned when `buf` goes out of scope
//! }
//! assert_eq!(pool.count(), 1);
//! ```

mod config;
mod errors;
mod health;
mod metrics;
mod pool;
mod pooled;

pub use config::PoolConfiguration;
pub use errors::{CallbackError, PoolError, PoolResult};
pub use health::HealthStatus;
pub use metrics::{MetricsExporter, PoolMetrics};
pub use pool::{Pool, PoolBuilder};
pub use pooled::Pooled;
