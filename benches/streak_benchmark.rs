use std::collections::HashMap;

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use studystreak::models::DailyActivity;
use studystreak::services::grid::build_activity_grid;
use studystreak::services::streaks::compute_streak_stats;

/// A dense year of records: study time every day, alternating between
/// qualifying and non-qualifying totals so both streak paths run.
fn dense_year(today: NaiveDate) -> Vec<DailyActivity> {
    let mut records = Vec::with_capacity(366);
    let mut day = today;
    for i in 0..366 {
        records.push(DailyActivity {
            user_id: "bench_user".to_string(),
            date: day,
            minutes: if i % 5 == 0 { 20 } else { 45 },
            session_count: 2,
            updated_at: "2026-08-28T00:00:00Z".to_string(),
        });
        day = day.pred_opt().unwrap();
    }
    records
}

fn benchmark_streaks(c: &mut Criterion) {
    let today: NaiveDate = "2026-08-28".parse().unwrap();
    let signup: NaiveDate = "2024-01-15".parse().unwrap();
    let records = dense_year(today);

    let minutes_by_day: HashMap<NaiveDate, u32> =
        records.iter().map(|r| (r.date, r.minutes)).collect();

    let mut group = c.benchmark_group("streak_pipeline");

    group.bench_function("compute_streak_stats_dense_year", |b| {
        b.iter(|| {
            compute_streak_stats(
                black_box(&records),
                black_box(signup),
                black_box(120_000),
                black_box(today),
            )
        })
    });

    group.bench_function("build_activity_grid_dense_year", |b| {
        b.iter(|| build_activity_grid(black_box(today), black_box(&minutes_by_day)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_streaks);
criterion_main!(benches);
