use deck_charts::core::{
    AxisKind, BarSeries, ChartConfig, LayoutTuning, NormalizeOptions, RawPoint, ResolvedScales,
    Series, TickFormat, Viewport, XScale, YAxisOptions, compose_chart_bars, normalize,
    resolve_scales,
};

fn resolve(config: &ChartConfig, viewport: Viewport) -> Option<ResolvedScales> {
    let data = normalize(config, NormalizeOptions::from_config(config));
    let bars = compose_chart_bars(config, &data);
    resolve_scales(&data, config, &bars, viewport, LayoutTuning::default())
}

fn quarterly(values: [f64; 4]) -> ChartConfig {
    let labels = ["Q1-25", "Q2-25", "Q3-25", "Q4-25"];
    ChartConfig::bar(
        "Trimestral",
        vec![Series::new(
            "s",
            "Serie",
            labels
                .iter()
                .zip(values)
                .map(|(label, value)| RawPoint::new(*label, value))
                .collect(),
        )],
    )
}

#[test]
fn y_domain_adds_eight_percent_headroom() {
    let scales = resolve(&quarterly([10.0, 20.0, 15.0, 25.0]), Viewport::new(800, 400))
        .expect("scales");
    let (min, max) = scales.y_domain();
    assert_eq!(min, 0.0);
    approx::assert_abs_diff_eq!(max, 27.0, epsilon = 1e-9);
}

#[test]
fn negative_data_extends_the_floor() {
    let scales = resolve(&quarterly([-50.0, 100.0, 20.0, 30.0]), Viewport::new(800, 400))
        .expect("scales");
    let (min, max) = scales.y_domain();
    approx::assert_abs_diff_eq!(min, -54.0, epsilon = 1e-9);
    approx::assert_abs_diff_eq!(max, 108.0, epsilon = 1e-9);
}

#[test]
fn max_override_wins_when_it_keeps_data_visible() {
    let config = quarterly([10.0, 20.0, 15.0, 25.0]).with_y_axis(YAxisOptions {
        max: Some(30.0),
        ..YAxisOptions::default()
    });
    let scales = resolve(&config, Viewport::new(800, 400)).expect("scales");
    assert_eq!(scales.y_domain().1, 30.0);
}

#[test]
fn clipping_override_is_ignored() {
    let config = quarterly([10.0, 20.0, 15.0, 25.0]).with_y_axis(YAxisOptions {
        max: Some(20.0),
        ..YAxisOptions::default()
    });
    let scales = resolve(&config, Viewport::new(800, 400)).expect("scales");
    approx::assert_abs_diff_eq!(scales.y_domain().1, 27.0, epsilon = 1e-9);
}

#[test]
fn stacked_totals_drive_the_domain() {
    let config = ChartConfig::stacked_bar(
        "Fuentes",
        vec![
            BarSeries::new(Series::new("a", "A", vec![RawPoint::new("X", 10.0)])),
            BarSeries::new(Series::new("b", "B", vec![RawPoint::new("X", 15.0)])),
        ],
    );
    let scales = resolve(&config, Viewport::new(800, 400)).expect("scales");
    approx::assert_abs_diff_eq!(scales.y_domain().1, 27.0, epsilon = 1e-9);
}

#[test]
fn band_positions_are_evenly_spaced() {
    let scales = resolve(&quarterly([10.0, 20.0, 15.0, 25.0]), Viewport::new(800, 400))
        .expect("scales");
    let XScale::Band(band) = &scales.x else {
        panic!("bar charts use a band scale");
    };
    assert_eq!(band.len(), 4);
    let centers: Vec<f64> = (0..4).map(|idx| band.band_center(idx)).collect();
    let step = centers[1] - centers[0];
    assert!(step > 0.0);
    for pair in centers.windows(2) {
        assert!((pair[1] - pair[0] - step).abs() <= 1e-9);
    }
    assert!(centers[0] > 0.0);
    assert!(centers[3] < scales.plot().width);
}

#[test]
fn narrow_containers_switch_to_compact_layout() {
    let labels: Vec<String> = (1..=8).map(|year| format!("201{year}")).collect();
    let config = ChartConfig::bar(
        "Serie larga",
        vec![Series::new(
            "s",
            "S",
            labels
                .iter()
                .map(|label| RawPoint::new(label.as_str(), 1.0))
                .collect(),
        )],
    );

    let wide = resolve(&config, Viewport::new(900, 400)).expect("wide scales");
    let narrow = resolve(&config, Viewport::new(360, 300)).expect("narrow scales");

    assert!(!wide.layout.compact);
    assert!(narrow.layout.compact);
    assert!(narrow.layout.rotate_x_labels);
    assert!(narrow.plot().left < wide.plot().left);
    assert!(narrow.y_ticks.len() <= wide.y_ticks.len());
}

#[test]
fn zero_size_container_yields_no_scales() {
    assert!(resolve(&quarterly([1.0, 2.0, 3.0, 4.0]), Viewport::new(0, 0)).is_none());
}

#[test]
fn empty_dataset_yields_no_scales() {
    let config = ChartConfig::bar("Vacio", vec![Series::new("s", "S", Vec::new())]);
    assert!(resolve(&config, Viewport::new(800, 400)).is_none());
}

#[test]
fn explicit_tick_values_replace_generated_ticks() {
    let config = quarterly([10.0, 20.0, 15.0, 25.0]).with_y_axis(YAxisOptions {
        tick_values: Some(vec![0.0, 12.5, 25.0, 40.0]),
        ..YAxisOptions::default()
    });
    let scales = resolve(&config, Viewport::new(800, 400)).expect("scales");
    let values: Vec<f64> = scales.y_ticks.iter().map(|tick| tick.value).collect();
    assert_eq!(values, vec![0.0, 12.5, 25.0]);
    let labels: Vec<&str> = scales.y_ticks.iter().map(|tick| tick.label.as_str()).collect();
    assert_eq!(labels, vec!["0.0", "12.5", "25.0"]);
}

#[test]
fn short_year_format_keeps_the_year() {
    let mut config = ChartConfig::line(
        "Anual",
        vec![Series::new(
            "s",
            "S",
            vec![RawPoint::new("31/12/24", 1.0), RawPoint::new("31/12/25", 2.0)],
        )],
    )
    .with_x_axis(AxisKind::Time);
    config.x_axis.tick_format = TickFormat::ShortYear;

    let scales = resolve(&config, Viewport::new(800, 400)).expect("scales");
    assert!(!scales.x.is_band());
    let labels: Vec<&str> = scales.x_ticks.iter().map(|tick| tick.label.as_str()).collect();
    assert_eq!(labels, vec!["24", "25"]);
}

#[test]
fn category_ticks_reproduce_input_labels() {
    let scales = resolve(&quarterly([1.0, 2.0, 3.0, 4.0]), Viewport::new(800, 400))
        .expect("scales");
    let labels: Vec<&str> = scales.x_ticks.iter().map(|tick| tick.label.as_str()).collect();
    assert_eq!(labels, vec!["Q1-25", "Q2-25", "Q3-25", "Q4-25"]);
}
