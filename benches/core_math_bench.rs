use deck_charts::api::{ChartEngine, ChartEngineConfig};
use deck_charts::core::{
    AxisKind, BarSeries, ChartConfig, NormalizeOptions, RawPoint, Series, Viewport, normalize,
};
use deck_charts::render::NullRenderer;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn numeric_lines(points: usize) -> ChartConfig {
    let series = (0..3)
        .map(|series_idx| {
            let offset = series_idx as f64 * 25.0;
            Series::new(
                format!("s{series_idx}"),
                format!("Serie {series_idx}"),
                (0..points)
                    .map(|i| {
                        let x = i as f64;
                        RawPoint::new(x, offset + 100.0 + (x * 0.01).sin() * 40.0)
                    })
                    .collect(),
            )
        })
        .collect();
    ChartConfig::line("bench", series).with_x_axis(AxisKind::Number)
}

fn stacked_quarters(categories: usize) -> ChartConfig {
    let series = (0..4)
        .map(|series_idx| {
            BarSeries::new(Series::new(
                format!("s{series_idx}"),
                format!("Serie {series_idx}"),
                (0..categories)
                    .map(|i| RawPoint::new(format!("Q{}-{}", i % 4 + 1, 2000 + i / 4), 10.0 + i as f64))
                    .collect(),
            ))
        })
        .collect();
    ChartConfig::stacked_bar("bench", series)
}

fn engine_for(chart: ChartConfig) -> ChartEngine<NullRenderer> {
    let mut engine = ChartEngine::new(
        NullRenderer::default(),
        ChartEngineConfig::new(Viewport::new(1600, 900)),
    )
    .expect("engine init");
    engine.set_chart(chart);
    engine
}

fn bench_normalize_lines_2k(c: &mut Criterion) {
    let config = numeric_lines(2_000);
    let options = NormalizeOptions::from_config(&config);

    c.bench_function("normalize_lines_2k", |b| {
        b.iter(|| {
            let _ = normalize(black_box(&config), black_box(options));
        })
    });
}

fn bench_pointer_focus_2k(c: &mut Criterion) {
    let mut engine = engine_for(numeric_lines(2_000));
    let mut x = 60.0;

    c.bench_function("pointer_focus_2k", |b| {
        b.iter(|| {
            x = if x > 1_500.0 { 60.0 } else { x + 7.0 };
            let _ = engine.pointer_move(black_box(x), black_box(300.0));
        })
    });
}

fn bench_stacked_frame_200(c: &mut Criterion) {
    let engine = engine_for(stacked_quarters(200));

    c.bench_function("stacked_frame_200", |b| {
        b.iter(|| {
            let _ = engine.build_frame().expect("frame should build");
        })
    });
}

criterion_group!(
    benches,
    bench_normalize_lines_2k,
    bench_pointer_focus_2k,
    bench_stacked_frame_200
);
criterion_main!(benches);
