// Stress driver: many concurrent tasks rent and return one large buffer each.
// Run with: RUST_LOG=pooling=debug cargo run

use pooling::{Pool, PoolConfiguration, PoolError, PoolResult};
use tracing_subscriber::EnvFilter;

const BUFFER_LEN: usize = 1024 * 1024;

fn env_or(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> PoolResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let tasks = env_or("POOLING_TASKS", 1000);
    let capacity = env_or("POOLING_CAPACITY", 100);

    let pool = Pool::<Vec<i64>>::builder()
        .creator(|| Vec::with_capacity(BUFFER_LEN))
        .clearer(|buf: &mut Vec<i64>| buf.clear())
        .configuration(
            PoolConfiguration::new()
                .with_capacity(capacity)
                .with_name("big_list"),
        )
        .build()?;

    let mut handles = Vec::with_capacity(tasks);
    for i in 0..tasks {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            let mut buf = pool.rent()?;
            buf.push(i as i64);
            Ok::<_, PoolError>(())
        }));
    }

    for handle in handles {
        if let Err(err) = handle.await.map_err(|_| PoolError::Cancelled)? {
            tracing::warn!(error = %err, "Task failed");
        }
    }

    let metrics = pool.get_metrics();
    tracing::info!(
        idle = pool.count(),
        created = metrics.created,
        recycled = metrics.recycled,
        discarded = metrics.discarded,
        "Done"
    );
    println!("{}", pool.count());

    Ok(())
}
