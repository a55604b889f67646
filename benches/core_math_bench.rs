use chrono::{Duration, NaiveDate};
use criterion::{Criterion, criterion_group, criterion_main};
use finchart::api::ChartSession;
use finchart::core::{
    CoordinateMapper, PlotArea, PlotInsets, ProviderShape, RawBatch, RawRecord, TimeSeriesPoint,
    ValueAxis, Viewport, align_single, normalize, project_points,
};
use finchart::render::NullRenderer;
use finchart::ChartSessionConfig;
use std::hint::black_box;

fn daily_points(count: i64) -> Vec<TimeSeriesPoint> {
    let start = NaiveDate::from_ymd_opt(1990, 1, 1).expect("valid date");
    (0..count)
        .map(|i| {
            let value = 100.0 + (i as f64 * 0.01).sin() * 25.0;
            TimeSeriesPoint::new(start + Duration::days(i), value)
        })
        .collect()
}

fn mapper_for(points: Vec<TimeSeriesPoint>) -> CoordinateMapper {
    let series = align_single(points).expect("series");
    let plot = PlotArea::from_viewport(Viewport::new(1920, 1080), PlotInsets::default())
        .expect("plot area");
    CoordinateMapper::new(plot, &series).expect("mapper")
}

fn bench_mapper_round_trip(c: &mut Criterion) {
    let mapper = mapper_for(daily_points(2_000));
    let date = NaiveDate::from_ymd_opt(1993, 6, 15).expect("valid date");

    c.bench_function("mapper_round_trip", |b| {
        b.iter(|| {
            let x = mapper.date_to_pixel(black_box(date)).expect("to pixel");
            let y = mapper.value_to_pixel(black_box(110.0)).expect("to pixel");
            let _ = mapper.pixel_to_date(x).expect("from pixel");
            let _ = mapper.pixel_to_value(y).expect("from pixel");
        })
    });
}

fn bench_nearest_lookup_10k(c: &mut Criterion) {
    let mapper = mapper_for(daily_points(10_000));

    c.bench_function("nearest_lookup_10k", |b| {
        b.iter(|| {
            for step in 0..100 {
                let x = 72.0 + f64::from(step) * 17.8;
                let _ = mapper.nearest_point(black_box(x)).expect("nearest");
            }
        })
    });
}

fn bench_projection_10k(c: &mut Criterion) {
    let points = daily_points(10_000);
    let mapper = mapper_for(points.clone());

    c.bench_function("projection_10k", |b| {
        b.iter(|| {
            let _ = project_points(black_box(&points), &mapper, ValueAxis::Primary)
                .expect("projection");
        })
    });
}

fn bench_normalize_stock_10k(c: &mut Criterion) {
    let records: Vec<RawRecord> = daily_points(10_000)
        .into_iter()
        .map(|point| {
            RawRecord::ohlcv(
                point.date.format("%Y-%m-%d").to_string(),
                point.value - 0.5,
                point.value + 1.0,
                point.value - 1.0,
                point.value,
                1_000_000.0,
            )
        })
        .collect();
    let batch = RawBatch::new(ProviderShape::StockDaily, records);

    c.bench_function("normalize_stock_10k", |b| {
        b.iter(|| {
            let _ = normalize(black_box(&batch)).expect("normalize");
        })
    });
}

fn bench_drag_frame_2k(c: &mut Criterion) {
    let series = align_single(daily_points(2_000)).expect("series");
    let config = ChartSessionConfig::new(Viewport::new(1600, 900));
    let mut session =
        ChartSession::new(NullRenderer::default(), config, series, None).expect("session");
    session.pointer_down(200.0, 400.0);
    session.pointer_move(1_200.0, 400.0);

    c.bench_function("drag_frame_2k", |b| {
        b.iter(|| {
            let _ = session.frame().expect("frame");
        })
    });
}

criterion_group!(
    benches,
    bench_mapper_round_trip,
    bench_nearest_lookup_10k,
    bench_projection_10k,
    bench_normalize_stock_10k,
    bench_drag_frame_2k
);
criterion_main!(benches);
