//! Benchmarks for pool loading
//!
//! Run with: cargo bench --package data-loader

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use data_loader::InvestorPool;

const STAGES: [&str; 4] = ["Pre-Seed", "Seed", "Series A", "Series B"];
const INDUSTRIES: [&str; 4] = ["Fintech Solutions", "Healthcare", "AI / ML", "Climate"];

fn synthetic_csv(rows: usize) -> String {
    let mut csv = String::from(
        "Firm,Investor Name,Investor Stage,Investor Industry,Check Size,Previous Investments,Success Rate,Relevance\n",
    );
    for i in 0..rows {
        csv.push_str(&format!(
            "Firm {},Investor {},{},{},\"${},000\",{},{}%,{}\n",
            i / 3,
            i,
            STAGES[i % STAGES.len()],
            INDUSTRIES[i % INDUSTRIES.len()],
            100 + i % 900,
            i % 40,
            i % 100,
            i % 4
        ));
    }
    csv
}

fn bench_load_pool(c: &mut Criterion) {
    let csv = synthetic_csv(10_000);

    c.bench_function("load_pool_10k", |b| {
        b.iter(|| {
            let pool = InvestorPool::load_from_reader(black_box(csv.as_bytes())).unwrap();
            black_box(pool)
        })
    });
}

criterion_group!(benches, bench_load_pool);
criterion_main!(benches);
