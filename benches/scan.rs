use chrono::Utc;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use echoguard::{DetectionConfig, DuplicateDetector};

// Benchmarks the per-message hot path. State is kept bounded by the
// detector's own behavior: a content burst purges itself every time it
// trips the threshold, and a flagged URL is never re-appended.

fn content_burst_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    group.throughput(Throughput::Elements(1));

    let detector: DuplicateDetector<u64> =
        DuplicateDetector::new(DetectionConfig::default()).unwrap();
    let now = Utc::now();
    let mut id = 0u64;

    group.bench_function("content_burst_cycle", |b| {
        b.iter(|| {
            id += 1;
            detector.scan(id % 64, "same message every time", now, id)
        })
    });

    group.finish();
}

fn url_raid_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    group.throughput(Throughput::Elements(1));

    let detector: DuplicateDetector<u64> =
        DuplicateDetector::new(DetectionConfig::default()).unwrap();
    let now = Utc::now();
    let mut id = 0u64;

    group.bench_function("url_raid_steady_state", |b| {
        b.iter(|| {
            id += 1;
            detector.scan(id % 64, "free stuff at http://raid.test right now", now, id)
        })
    });

    group.finish();
}

criterion_group!(benches, content_burst_benchmark, url_raid_benchmark);
criterion_main!(benches);
