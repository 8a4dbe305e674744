//! Lock benchmarks for redis-mutex (in-memory store)

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::time::Duration;

use redis_mutex::{MutexClient, MutexOptions};

fn lock_unlock_benchmark(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let client = MutexClient::in_memory();

    let mut group = c.benchmark_group("lock_unlock");
    group.throughput(Throughput::Elements(1));

    group.bench_function("uncontended", |b| {
        b.to_async(&rt).iter(|| async {
            let mutex = client
                .new_mutex("bench_key", MutexOptions::default())
                .unwrap();
            mutex.lock().await.unwrap();
            mutex.unlock().await.unwrap();
        });
    });

    group.bench_function("with_auto_refresh", |b| {
        b.to_async(&rt).iter(|| async {
            let mutex = client
                .new_mutex(
                    "bench_refresh_key",
                    MutexOptions::default()
                        .with_ttl(Duration::from_secs(10))
                        .with_auto_refresh(true),
                )
                .unwrap();
            mutex.lock().await.unwrap();
            mutex.unlock().await.unwrap();
        });
    });

    group.finish();
}

fn lease_ops_benchmark(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let client = MutexClient::in_memory();
    let mutex = client
        .new_mutex("bench_held", MutexOptions::default().with_ttl(Duration::from_secs(600)))
        .unwrap();
    rt.block_on(async { mutex.lock().await.unwrap() });

    let mut group = c.benchmark_group("lease_ops");
    group.throughput(Throughput::Elements(1));

    group.bench_function("refresh_ttl", |b| {
        b.to_async(&rt).iter(|| async { mutex.refresh_ttl().await.unwrap() });
    });

    group.bench_function("ttl", |b| {
        b.to_async(&rt).iter(|| async { mutex.ttl().await.unwrap() });
    });

    group.bench_function("contended_no_retry", |b| {
        b.to_async(&rt).iter(|| async {
            let contender = client
                .new_mutex("bench_held", MutexOptions::default().with_no_retry())
                .unwrap();
            assert!(contender.lock().await.is_err());
        });
    });

    group.finish();
}

criterion_group!(benches, lock_unlock_benchmark, lease_ops_benchmark);
criterion_main!(benches);
