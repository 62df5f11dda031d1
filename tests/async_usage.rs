use pooling::{Pool, PoolConfiguration, PoolError};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_tasks_share_a_pool() {
    let pool = Pool::with_clearer(|| Vec::<i64>::with_capacity(1024), |v: &mut Vec<i64>| v.clear(), 10);

    let tasks: Vec<_> = (0..200)
        .map(|i| {
            let pool = pool.clone();
            tokio::spawn(async move {
                let mut buf = pool.rent()?;
                assert!(buf.is_empty());
                buf.push(i);
                tokio::task::yield_now().await;
                Ok::<_, PoolError>(())
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert!(pool.count() <= 10);
    let metrics = pool.get_metrics();
    assert_eq!(metrics.total_rented, 200);
    assert_eq!(metrics.total_returned + metrics.discarded, 200);
}

#[tokio::test]
async fn test_warmup_async_fills_to_capacity() {
    let pool = Pool::new(|| vec![0u8; 4096], 5);
    assert_eq!(pool.warmup_async(8).await.unwrap(), 5);
    assert_eq!(pool.count(), 5);

    let metrics = pool.get_metrics();
    assert_eq!(metrics.created, 5);
    assert_eq!(metrics.idle_objects, 5);
}

#[tokio::test]
async fn test_warmup_async_propagates_creation_failure() {
    let pool = Pool::<Vec<u8>>::builder()
        .try_creator(|| Err("no memory".into()))
        .configuration(PoolConfiguration::new().with_name("failing"))
        .build()
        .unwrap();

    let err = pool.warmup_async(3).await.unwrap_err();
    assert!(matches!(err, PoolError::CreationFailed(_)));
    assert_eq!(pool.count(), 0);
    assert_eq!(pool.name(), "failing");
}

#[test]
fn test_build_with_failing_warmup() {
    let result = Pool::<Vec<u8>>::builder()
        .try_creator(|| Err("no memory".into()))
        .configuration(PoolConfiguration::new().with_warmup(2))
        .build();

    assert!(matches!(result, Err(PoolError::CreationFailed(_))));
}
