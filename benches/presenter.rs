//! Presenter benchmarks
//!
//! Run with: `cargo bench`
//! View results: `open target/criterion/report/index.html`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wheel_dashboard::table::sort_rows;
use wheel_dashboard::{present, CandidateRow, SortState};

fn sample_rows(count: usize) -> Vec<CandidateRow> {
    let tickers = ["AAPL", "msft", "Spy", "QQQ", "nvda"];
    (0..count)
        .map(|i| {
            CandidateRow::new()
                .with("ticker", tickers[i % tickers.len()])
                .with("strike", 100.0 + (i * 37 % 250) as f64)
                .with("roi_%", ((i * 7919) % 1000) as f64 / 100.0)
                .with("dte", (7 + i % 40) as f64)
        })
        .collect()
}

fn benchmark_sort(c: &mut Criterion) {
    let rows = sample_rows(10_000);

    let mut numeric = SortState::new();
    numeric.activate("roi_%");
    c.bench_function("sort_numeric_10k", |b| {
        b.iter(|| sort_rows(black_box(&rows), &numeric).len())
    });

    let mut text = SortState::new();
    text.activate("ticker");
    c.bench_function("sort_text_10k", |b| {
        b.iter(|| sort_rows(black_box(&rows), &text).len())
    });
}

fn benchmark_present(c: &mut Criterion) {
    let rows = sample_rows(10_000);
    let mut sort = SortState::new();
    sort.activate("roi_%");
    sort.activate("roi_%");

    c.bench_function("present_top_10_of_10k", |b| {
        b.iter(|| {
            let table = present("Cash-Secured Put Ideas", black_box(&rows), &sort, 10);
            table.render_text().len()
        })
    });
}

criterion_group!(benches, benchmark_sort, benchmark_present);
criterion_main!(benches);
