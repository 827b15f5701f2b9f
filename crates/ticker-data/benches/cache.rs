//! Benchmarks for cache lookups.

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use ticker_core::types::{Bar, PriceHistory, SpanRequest};
use ticker_data::HistoryCache;

fn history(symbol: &str, len: usize) -> Arc<PriceHistory> {
    let bars = (0..len)
        .map(|i| {
            let price = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            Bar::new(i as i64 * 86_400_000, price, price + 1.0, price - 1.0, price, 1000.0)
        })
        .collect();
    Arc::new(PriceHistory::new(symbol, bars))
}

fn bench_cache(c: &mut Criterion) {
    let now = Utc.with_ymd_and_hms(2025, 12, 15, 10, 30, 0).unwrap();
    let one_year: SpanRequest = "1y".parse().unwrap();
    let five_days: SpanRequest = "5d".parse().unwrap();

    let mut group = c.benchmark_group("RangeCache");

    for keys in [10, 1000] {
        let cache = HistoryCache::new(Duration::minutes(3));
        let payloads = (0..keys).map(|i| (format!("SYM{i}"), history("SYM", 252)));
        cache.set_many(payloads, &one_year, now).unwrap();

        group.bench_with_input(BenchmarkId::new("get_hit", keys), &keys, |b, _| {
            b.iter(|| cache.get(black_box("SYM7"), black_box(&five_days), black_box(now)))
        });

        group.bench_with_input(BenchmarkId::new("get_absent", keys), &keys, |b, _| {
            b.iter(|| cache.get(black_box("MISSING"), black_box(&one_year), black_box(now)))
        });
    }

    group.bench_function("set", |b| {
        let cache = HistoryCache::new(Duration::minutes(3));
        let payload = history("AAPL", 252);
        b.iter(|| cache.set("AAPL", Arc::clone(&payload), black_box(&one_year), now))
    });

    group.finish();
}

criterion_group!(benches, bench_cache);
criterion_main!(benches);
