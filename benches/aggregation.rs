use budget_builder::{AggregationEngine, BudgetBuilder, CategoryKind, PeriodWindow};
use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

fn build_sample_budget(roots: usize, children: usize) -> BudgetBuilder {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();
    let mut builder = BudgetBuilder::with_window(PeriodWindow::new(start, end));

    for idx in 0..roots {
        let kind = if idx % 2 == 0 {
            CategoryKind::Income
        } else {
            CategoryKind::Expense
        };
        let root = builder.add_root_category(kind, format!("Root {idx}"));
        for child_idx in 0..children {
            let child = builder
                .add_subcategory(&root, format!("Child {idx}.{child_idx}"))
                .expect("add child");
            builder
                .set_value(&child, child_idx % 24, 10.0 + child_idx as f64)
                .expect("set value");
        }
    }
    builder
}

fn bench_recompute(c: &mut Criterion) {
    let builder = build_sample_budget(black_box(50), black_box(20));

    c.bench_function("aggregate_1k_categories_24_months", |b| {
        b.iter(|| {
            let aggregates = AggregationEngine::compute(builder.forest(), builder.window());
            black_box(aggregates);
        })
    });
}

fn bench_resize(c: &mut Criterion) {
    let builder = build_sample_budget(50, 20);
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2029, 12, 1).unwrap();

    c.bench_function("resize_1k_categories_to_60_months", |b| {
        b.iter_batched(
            || builder.clone(),
            |mut budget| {
                budget.update_date_range(start, end);
                black_box(budget);
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_recompute, bench_resize);
criterion_main!(benches);
