use std::sync::Arc;

use chrono::NaiveDate;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use matchday_tips::sample_feed::SampleProvider;
use matchday_tips::value::analyze_match;
use matchday_tips::{League, Match, TipConfig, TipSelector};

fn slate(rounds: usize) -> Vec<Arc<Match>> {
    let now = NaiveDate::from_ymd_opt(2026, 4, 17)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .unwrap();
    let mut provider = SampleProvider::new(Some(2026));
    let mut out = Vec::new();
    for _ in 0..rounds {
        for league in League::ALL {
            out.extend(provider.upcoming_matches(league, 7, now));
        }
    }
    out
}

fn bench_analyze_match(c: &mut Criterion) {
    let matches = slate(1);
    c.bench_function("analyze_match", |b| {
        b.iter(|| {
            for m in &matches {
                black_box(analyze_match(black_box(m)));
            }
        })
    });
}

fn bench_select_global_pool(c: &mut Criterion) {
    let matches = slate(40);
    let selector = TipSelector::new(TipConfig::default());
    let now = matches[0].kickoff;
    c.bench_function("select_global_pool", |b| {
        b.iter(|| black_box(selector.select(black_box(&matches), now).len()))
    });
}

fn bench_select_dedicated_pool(c: &mut Criterion) {
    let matches = slate(40);
    let selector = TipSelector::with_parallelism(TipConfig::default(), 2);
    let now = matches[0].kickoff;
    c.bench_function("select_dedicated_pool", |b| {
        b.iter(|| black_box(selector.select(black_box(&matches), now).len()))
    });
}

criterion_group!(
    perf,
    bench_analyze_match,
    bench_select_global_pool,
    bench_select_dedicated_pool
);
criterion_main!(perf);
