//! Basic usage examples for Pool

use pooling::{Pool, PoolConfiguration};
use std::sync::Arc;

fn main() {
    println!("=== pooling - Basic Examples ===\n");

    // Example 1: Rent and automatic return
    simple_pool();

    // Example 2: Capacity and discards
    bounded_pool();

    // Example 3: Manual rent/return
    detached_rent();

    // Example 4: Metrics and health
    metrics_and_health();
}

fn simple_pool() {
    println!("1. Simple Pool:");
    let pool = Pool::with_clearer(|| Vec::<u8>::with_capacity(4096), |v: &mut Vec<u8>| v.clear(), 4);

    {
        let mut buf = pool.rent().unwrap();
        buf.extend_from_slice(b"hello");
        println!("   Got buffer with {} bytes", buf.len());
        // Buffer cleared and returned when dropped
    }

    println!("   Idle after return: {}\n", pool.count());
}

fn bounded_pool() {
    println!("2. Bounded Pool:");

    let config = PoolConfiguration::new()
        .with_capacity(2)
        .with_validation(|v: &Vec<u8>| v.capacity() <= 8192)
        .with_name("bounded");

    let pool = Pool::builder()
        .creator(|| Vec::<u8>::with_capacity(1024))
        .configuration(config)
        .build()
        .unwrap();

    let held: Vec<_> = (0..3).map(|_| pool.rent().unwrap()).collect();
    println!("   Rented {} buffers, idle: {}", held.len(), pool.count());

    for buf in held {
        let kept = buf.release().unwrap();
        println!("   Released, kept by pool: {}", kept);
    }

    println!("   Idle after release: {}\n", pool.count());
}

fn detached_rent() {
    println!("3. Detached Rent:");
    let pool = Pool::builder()
        .creator(|| Arc::new(vec![0u64; 16]))
        .configuration(PoolConfiguration::<Arc<Vec<u64>>>::new().with_identity(Arc::ptr_eq))
        .build()
        .unwrap();

    let shared = pool.rent_detached().unwrap();
    let alias = Arc::clone(&shared);

    println!("   First return kept: {}", pool.try_return(shared).unwrap());
    println!("   Aliased return kept: {}", pool.try_return(alias).unwrap());
    println!("   Idle: {}\n", pool.count());
}

fn metrics_and_health() {
    println!("4. Metrics and Health:");
    let pool = Pool::new(|| String::with_capacity(256), 2);
    pool.warmup(2).unwrap();

    for _ in 0..5 {
        let _s = pool.rent().unwrap();
    }

    let health = pool.get_health_status();
    println!("   Health: {}", if health.is_healthy { "Healthy" } else { "Unhealthy" });
    println!("   Fill: {:.1}%", health.fill_ratio * 100.0);

    let metrics = pool.export_metrics();
    println!("\n   Metrics:");
    for (key, value) in metrics {
        println!("     {}: {}", key, value);
    }
}
