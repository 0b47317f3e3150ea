use criterion::{Criterion, criterion_group, criterion_main};
use tracenav_engine::{BoundaryPattern, TransactionView, TracePatterns, build_transactions};
use xi_rope::Rope;
mod common;

fn bench_build_transactions(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.sample_size(10);

    let settings = common::settings();
    let boundaries = BoundaryPattern::from_settings(&settings).unwrap();
    let patterns = TracePatterns::from_settings(&settings).unwrap();

    for (name, transactions, depth) in [("flat", 1000, 1), ("nested", 250, 4)] {
        let trace = common::generate_trace(transactions, depth);
        let rope = Rope::from(trace.as_str());

        group.bench_function(format!("build_{name}"), |b| {
            b.iter(|| {
                let forest = build_transactions(std::hint::black_box(&trace), &rope, &boundaries);
                std::hint::black_box(forest);
            });
        });

        let forest = build_transactions(&trace, &rope, &boundaries);
        group.bench_function(format!("derive_{name}"), |b| {
            b.iter(|| {
                for transaction in &forest {
                    let view = TransactionView::new(transaction, Some(trace.as_str()), &patterns);
                    std::hint::black_box((view.start_timestamp(), view.event_types(), view.policies()));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build_transactions);
criterion_main!(benches);
