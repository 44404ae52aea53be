use deck_charts::core::{
    AxisKind, ChartConfig, ChartKind, LayoutTuning, NormalizeOptions, NormalizedData, RawPoint,
    ResolvedScales, ScatterOptions, Series, Viewport, compose_chart_bars, normalize,
    resolve_scales,
};
use deck_charts::interaction::{
    FocusRequest, FocusSampling, HitTestTuning, ProximityMode, resolve_key_focus,
    resolve_pointer_focus, snap_key,
};

fn prepare(config: &ChartConfig) -> (NormalizedData, ResolvedScales) {
    let data = normalize(config, NormalizeOptions::from_config(config));
    let bars = compose_chart_bars(config, &data);
    let scales = resolve_scales(
        &data,
        config,
        &bars,
        Viewport::new(800, 400),
        LayoutTuning::default(),
    )
    .expect("scales");
    (data, scales)
}

fn flat_lines(values: &[(&str, f64)]) -> ChartConfig {
    ChartConfig::line(
        "Lineas",
        values
            .iter()
            .map(|(id, value)| {
                Series::new(
                    *id,
                    id.to_uppercase(),
                    vec![RawPoint::new(0.0, *value), RawPoint::new(10.0, *value)],
                )
            })
            .collect(),
    )
    .with_x_axis(AxisKind::Number)
}

fn request(mode: ProximityMode, tuning: HitTestTuning) -> FocusRequest {
    FocusRequest {
        mode,
        sampling: FocusSampling::Snapped,
        tuning,
    }
}

#[test]
fn snapping_picks_the_nearest_key_in_pixels() {
    let config = ChartConfig::line(
        "Plazos",
        vec![Series::new(
            "s",
            "S",
            vec![
                RawPoint::new(10.0, 1.0),
                RawPoint::new(20.0, 2.0),
                RawPoint::new(30.0, 3.0),
            ],
        )],
    )
    .with_x_axis(AxisKind::Number);
    let (data, scales) = prepare(&config);

    // Keys 10, 20 and 30 sit at 0, 362 and 724 plot pixels.
    let at = |domain_x: f64| scales.x.map_key(domain_x).expect("pixel");
    assert_eq!(snap_key(&data.sorted_keys, &scales.x, at(19.0)), Some(20.0));
    assert_eq!(snap_key(&data.sorted_keys, &scales.x, at(14.9)), Some(10.0));
    assert_eq!(snap_key(&data.sorted_keys, &scales.x, 181.0), Some(20.0));
    assert_eq!(snap_key(&data.sorted_keys, &scales.x, -50.0), Some(10.0));
    assert_eq!(snap_key(&data.sorted_keys, &scales.x, 900.0), Some(30.0));
}

#[test]
fn band_snapping_uses_band_centers() {
    let config = ChartConfig::bar(
        "Trimestral",
        vec![Series::new(
            "s",
            "S",
            vec![
                RawPoint::new("Q1", 1.0),
                RawPoint::new("Q2", 2.0),
                RawPoint::new("Q3", 3.0),
                RawPoint::new("Q4", 4.0),
            ],
        )],
    );
    let (data, scales) = prepare(&config);
    let q2 = data.key_for_label("Q2").expect("Q2");
    let q3 = data.key_for_label("Q3").expect("Q3");

    assert_eq!(snap_key(&data.keys, &scales.x, 271.5), Some(q2));
    assert_eq!(snap_key(&data.keys, &scales.x, 300.0), Some(q2));
    assert_eq!(snap_key(&data.keys, &scales.x, 400.0), Some(q3));
}

#[test]
fn line_focus_activates_only_series_near_the_pointer() {
    let (data, scales) = prepare(&flat_lines(&[("a", 100.0), ("b", 10.0)]));
    let focus = resolve_pointer_focus(
        &data,
        &scales,
        request(ProximityMode::Line, HitTestTuning::default()),
        0.0,
        Some(30.0),
    )
    .expect("focus");

    assert!(focus.is_active(0));
    assert!(!focus.is_active(1));
    let a = &focus.series[0];
    assert!((a.y_px.expect("a y") - 352.0 * 8.0 / 108.0).abs() <= 1e-9);
    assert!((a.distance_px.expect("a distance") - (30.0 - 352.0 * 8.0 / 108.0)).abs() <= 1e-9);
}

#[test]
fn close_series_share_focus_within_the_threshold() {
    let (data, scales) = prepare(&flat_lines(&[("a", 100.0), ("b", 95.0)]));

    let default_focus = resolve_pointer_focus(
        &data,
        &scales,
        request(ProximityMode::Line, HitTestTuning::default()),
        0.0,
        Some(30.0),
    )
    .expect("focus");
    assert_eq!(default_focus.active_series().count(), 2);

    // Without a proximity floor only the nearest series plus the margin counts.
    let strict = HitTestTuning {
        line_proximity_px: 0.0,
        ..HitTestTuning::default()
    };
    let strict_focus = resolve_pointer_focus(
        &data,
        &scales,
        request(ProximityMode::Line, strict),
        0.0,
        Some(30.0),
    )
    .expect("focus");
    assert!(strict_focus.is_active(0));
    assert!(!strict_focus.is_active(1));
}

#[test]
fn scatter_mode_uses_the_wider_threshold() {
    let (data, scales) = prepare(&flat_lines(&[("a", 100.0), ("b", 90.0)]));

    let line = resolve_pointer_focus(
        &data,
        &scales,
        request(ProximityMode::Line, HitTestTuning::default()),
        0.0,
        Some(30.0),
    )
    .expect("line focus");
    let scatter = resolve_pointer_focus(
        &data,
        &scales,
        request(ProximityMode::Scatter, HitTestTuning::default()),
        0.0,
        Some(30.0),
    )
    .expect("scatter focus");

    assert!(!line.is_active(1));
    assert!(scatter.is_active(1));
}

#[test]
fn key_focus_without_pointer_marks_every_series_active() {
    let (data, scales) = prepare(&flat_lines(&[("a", 100.0), ("b", 10.0)]));
    let focus = resolve_key_focus(
        &data,
        &scales,
        request(ProximityMode::Line, HitTestTuning::default()),
        10.0,
    )
    .expect("focus");

    assert_eq!(focus.label, "10");
    assert!(focus.series.iter().all(|series| series.active));
    assert!(focus.series.iter().all(|series| series.distance_px.is_none()));
    assert!((focus.x_px - 724.0).abs() <= 1e-9);
}

#[test]
fn bar_focus_marks_series_with_values() {
    let config = ChartConfig::bar(
        "Barras",
        vec![
            Series::new(
                "a",
                "A",
                vec![RawPoint::new("X", 1.0), RawPoint::new("Y", 2.0)],
            ),
            Series::new("b", "B", vec![RawPoint::new("X", 3.0)]),
        ],
    );
    let (data, scales) = prepare(&config);
    let y = data.key_for_label("Y").expect("Y");
    let focus = resolve_key_focus(
        &data,
        &scales,
        request(ProximityMode::None, HitTestTuning::default()),
        y,
    )
    .expect("focus");

    assert_eq!(focus.label, "Y");
    assert!(focus.is_active(0));
    assert!(!focus.is_active(1));
    assert_eq!(focus.value_of("a"), Some(2.0));
    assert_eq!(focus.value_of("b"), None);
}

#[test]
fn snapped_focus_skips_series_without_a_sample_at_the_key() {
    let config = ChartConfig::line(
        "Huecos",
        vec![
            Series::new(
                "b",
                "B",
                vec![
                    RawPoint::new("Q1", 1.0),
                    RawPoint::new("Q2", 2.0),
                    RawPoint::new("Q3", 3.0),
                ],
            ),
            Series::new(
                "a",
                "A",
                vec![RawPoint::new("Q1", 10.0), RawPoint::new("Q3", 30.0)],
            ),
        ],
    );
    let (data, scales) = prepare(&config);
    let q2 = data.key_for_label("Q2").expect("Q2");
    let x = scales.x.map_key(q2).expect("Q2 pixel");
    let y = scales.y.map(20.0);

    let focus = resolve_pointer_focus(
        &data,
        &scales,
        request(ProximityMode::Line, HitTestTuning::default()),
        x,
        Some(y),
    )
    .expect("focus");

    assert_eq!(focus.key, q2);
    assert_eq!(focus.value_of("a"), None);
    assert!(focus.series[1].distance_px.is_none());
    assert!(!focus.is_active(1));
    assert!(focus.is_active(0));
}

#[test]
fn all_zero_skipped_series_fall_back_to_active() {
    let config = ChartConfig::new(
        "Eventos",
        ChartKind::Line {
            series: vec![
                Series::new(
                    "a",
                    "A",
                    vec![
                        RawPoint::new("X", 1.0),
                        RawPoint::new("Y", 0.0),
                        RawPoint::new("Z", 3.0),
                    ],
                ),
                Series::new(
                    "b",
                    "B",
                    vec![
                        RawPoint::new("X", 2.0),
                        RawPoint::new("Y", 0.0),
                        RawPoint::new("Z", 4.0),
                    ],
                ),
            ],
            scatter: Some(ScatterOptions {
                skip_zero: true,
                ..ScatterOptions::default()
            }),
        },
    );
    let (data, scales) = prepare(&config);
    let y_key = data.key_for_label("Y").expect("Y");
    let x = scales.x.map_key(y_key).expect("Y pixel");

    let focus = resolve_pointer_focus(
        &data,
        &scales,
        request(ProximityMode::Scatter, HitTestTuning::default()),
        x,
        Some(100.0),
    )
    .expect("focus");

    assert_eq!(focus.key, y_key);
    assert!(focus.series.iter().all(|series| series.value.is_none()));
    assert!(focus.series.iter().all(|series| series.active));
}

#[test]
fn interpolated_sampling_reads_between_keys() {
    let config = ChartConfig::line(
        "Lineal",
        vec![Series::new(
            "s",
            "S",
            vec![RawPoint::new(0.0, 100.0), RawPoint::new(10.0, 200.0)],
        )],
    )
    .with_x_axis(AxisKind::Number);
    let (data, scales) = prepare(&config);
    let focus = resolve_pointer_focus(
        &data,
        &scales,
        FocusRequest {
            mode: ProximityMode::Line,
            sampling: FocusSampling::Interpolated,
            tuning: HitTestTuning::default(),
        },
        362.0,
        None,
    )
    .expect("focus");

    assert!((focus.sample_x - 5.0).abs() <= 1e-9);
    let value = focus.value_of("s").expect("interpolated value");
    assert!((value - 150.0).abs() <= 1e-9);
}

#[test]
fn negative_tuning_is_rejected() {
    let tuning = HitTestTuning {
        cutoff_margin_px: -1.0,
        ..HitTestTuning::default()
    };
    assert!(tuning.validate().is_err());
    assert!(HitTestTuning::default().validate().is_ok());
}
