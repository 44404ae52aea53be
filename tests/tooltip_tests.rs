use deck_charts::api::{
    ProjectedKeys, RenderStyle, Swatch, TooltipAnchor, TooltipBody, TooltipMode, TooltipPlacement,
    build_tooltip,
};
use deck_charts::core::{
    BarLayout, BarSeries, BarStyle, ChartConfig, ChartKind, Decorations, NormalizeOptions,
    ProjectedSegments, RawPoint, ScatterOptions, Series, Viewport, normalize,
};
use deck_charts::interaction::{Focus, SeriesFocus};
use deck_charts::render::NullRenderer;
use deck_charts::{ChartEngine, ChartEngineConfig};

const Q2_X: f64 = 52.0 + 271.5;

fn engine_with(chart: ChartConfig, config: ChartEngineConfig) -> ChartEngine<NullRenderer> {
    let mut engine = ChartEngine::new(NullRenderer::default(), config).expect("engine init");
    engine.set_chart(chart);
    engine
}

fn engine(chart: ChartConfig) -> ChartEngine<NullRenderer> {
    engine_with(chart, ChartEngineConfig::new(Viewport::new(800, 400)))
}

fn rows_of(body: &TooltipBody) -> Vec<(String, String)> {
    body.rows()
        .map(|row| (row.series_id.clone(), row.formatted.clone()))
        .collect()
}

#[test]
fn values_use_series_magnitude_and_unit() {
    let chart = ChartConfig::bar(
        "Deuda y tasa",
        vec![
            Series::new(
                "deuda",
                "Deuda",
                vec![RawPoint::new("2024", 1234.4), RawPoint::new("2025", 980.0)],
            ),
            Series::new(
                "tasa",
                "Tasa",
                vec![RawPoint::new("2024", 4.2), RawPoint::new("2025", 3.8)],
            )
            .with_unit("%"),
        ],
    )
    .with_unit("MM USD");
    let mut engine = engine(chart);
    assert!(engine.set_active_label(Some("2024")));

    let tooltip = engine.tooltip().expect("tooltip");
    assert_eq!(tooltip.content.title, "2024");
    assert_eq!(
        rows_of(&tooltip.content.body),
        vec![
            ("deuda".to_owned(), "1234 MM USD".to_owned()),
            ("tasa".to_owned(), "4.20%".to_owned()),
        ]
    );
}

#[test]
fn missing_values_produce_no_row() {
    let chart = ChartConfig::bar(
        "Parcial",
        vec![
            Series::new(
                "a",
                "A",
                vec![RawPoint::new("Q1", 10.0), RawPoint::new("Q2", 20.0)],
            ),
            Series::new("b", "B", vec![RawPoint::new("Q1", 5.0)]),
        ],
    );
    let mut engine = engine(chart);
    engine.set_active_label(Some("Q2"));

    let tooltip = engine.tooltip().expect("tooltip");
    let rows = rows_of(&tooltip.content.body);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, "a");
}

#[test]
fn skip_zero_drops_rows_for_zero_values() {
    let chart = ChartConfig::new(
        "Emisiones",
        ChartKind::Line {
            series: vec![
                Series::new(
                    "locales",
                    "Locales",
                    vec![
                        RawPoint::new("2023", 4.0),
                        RawPoint::new("2024", 6.0),
                        RawPoint::new("2025", 0.0),
                    ],
                ),
                Series::new(
                    "externas",
                    "Externas",
                    vec![
                        RawPoint::new("2023", 1.0),
                        RawPoint::new("2024", 2.0),
                        RawPoint::new("2025", 3.0),
                    ],
                ),
            ],
            scatter: Some(ScatterOptions {
                skip_zero: true,
                ..ScatterOptions::default()
            }),
        },
    );
    let mut engine = engine(chart);
    engine.set_active_label(Some("2025"));

    let tooltip = engine.tooltip().expect("tooltip");
    let rows = rows_of(&tooltip.content.body);
    assert_eq!(rows, vec![("externas".to_owned(), "3.00".to_owned())]);
}

#[test]
fn line_gaps_between_samples_get_no_row() {
    let chart = ChartConfig::line(
        "Tasas",
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
    let mut engine = engine(chart);
    assert!(engine.set_active_label(Some("Q2")));

    let tooltip = engine.tooltip().expect("tooltip");
    assert_eq!(
        rows_of(&tooltip.content.body),
        vec![("b".to_owned(), "2.00".to_owned())]
    );
    assert_eq!(engine.focus().expect("focus").value_of("a"), None);
}

#[test]
fn skipped_zero_inside_a_scatter_series_is_not_interpolated() {
    let chart = ChartConfig::new(
        "Emisiones",
        ChartKind::Line {
            series: vec![
                Series::new(
                    "a",
                    "A",
                    vec![
                        RawPoint::new("2023", 10.0),
                        RawPoint::new("2024", 0.0),
                        RawPoint::new("2025", 30.0),
                    ],
                ),
                Series::new(
                    "b",
                    "B",
                    vec![
                        RawPoint::new("2023", 1.0),
                        RawPoint::new("2024", 2.0),
                        RawPoint::new("2025", 3.0),
                    ],
                ),
            ],
            scatter: Some(ScatterOptions {
                skip_zero: true,
                ..ScatterOptions::default()
            }),
        },
    );
    let mut engine = engine(chart);
    assert!(engine.set_active_label(Some("2024")));

    let tooltip = engine.tooltip().expect("tooltip");
    assert_eq!(
        rows_of(&tooltip.content.body),
        vec![("b".to_owned(), "2.00".to_owned())]
    );
}

#[test]
fn zero_valued_focus_rows_are_filtered_when_skipping_zero() {
    let mut chart = ChartConfig::line(
        "Ceros",
        vec![Series::new("a", "A", vec![RawPoint::new("X", 2.0)])],
    );
    if let ChartKind::Line { scatter, .. } = &mut chart.kind {
        *scatter = Some(ScatterOptions {
            skip_zero: true,
            ..ScatterOptions::default()
        });
    }
    let data = normalize(&chart, NormalizeOptions::from_config(&chart));
    let focus = Focus {
        key: 0.0,
        label: "X".to_owned(),
        x_px: 0.0,
        sample_x: 0.0,
        series: vec![SeriesFocus {
            series_index: 0,
            series_id: "a".to_owned(),
            value: Some(0.0),
            y_px: Some(10.0),
            distance_px: None,
            active: true,
        }],
    };
    let tooltip = build_tooltip(
        &chart,
        &data,
        &focus,
        &ProjectedKeys::default(),
        &RenderStyle::default(),
    );
    assert!(tooltip.is_none());
}

#[test]
fn grouped_tooltips_list_point_metrics() {
    let chart = ChartConfig::line(
        "Spread vs plazo",
        vec![Series::new(
            "bonos",
            "Bonos",
            vec![
                RawPoint::new("BONO26", 210.0)
                    .with_metric("plazo", 2.0)
                    .with_metric("spread", 210.0),
                RawPoint::new("BONO31", 260.0)
                    .with_metric("plazo", 7.0)
                    .with_metric("spread", 260.0),
            ],
        )],
    )
    .with_grouped_tooltip(true);
    let mut engine = engine(chart);
    engine.set_active_label(Some("BONO31"));

    let tooltip = engine.tooltip().expect("tooltip");
    let TooltipBody::Groups(groups) = &tooltip.content.body else {
        panic!("grouped tooltip expected");
    };
    assert_eq!(groups.len(), 1);
    let metrics: Vec<(&str, &str)> = groups[0]
        .metrics
        .iter()
        .map(|metric| (metric.name.as_str(), metric.formatted.as_str()))
        .collect();
    assert_eq!(metrics, vec![("plazo", "7.00"), ("spread", "260")]);
    assert_eq!(groups[0].row.formatted, "260");
}

#[test]
fn overlay_bars_get_hollow_swatches() {
    let chart = ChartConfig::new(
        "Limites",
        ChartKind::Bar {
            series: vec![Series::new("uso", "Uso", vec![RawPoint::new("2025", 40.0)])],
            overlays: vec![
                BarSeries::new(Series::new(
                    "limite",
                    "Limite",
                    vec![RawPoint::new("2025", 60.0)],
                ))
                .with_style(BarStyle {
                    hollow: true,
                    stroke_width: None,
                    dashed: true,
                }),
                BarSeries::new(Series::new(
                    "meta",
                    "Meta",
                    vec![RawPoint::new("2025", 50.0)],
                ))
                .with_style(BarStyle {
                    hollow: true,
                    stroke_width: None,
                    dashed: false,
                }),
            ],
            overlay_layout: BarLayout::Grouped,
        },
    );
    let mut engine = engine(chart);
    engine.set_active_label(Some("2025"));

    let tooltip = engine.tooltip().expect("tooltip");
    let swatches: Vec<Swatch> = tooltip.content.body.rows().map(|row| row.swatch).collect();
    assert_eq!(
        swatches,
        vec![
            Swatch::Solid,
            Swatch::Hollow { dashed: true },
            Swatch::Hollow { dashed: false },
        ]
    );
}

#[test]
fn projected_keys_use_dashed_swatches() {
    let chart = ChartConfig::bar(
        "Proyeccion",
        vec![Series::new(
            "pib",
            "PIB",
            vec![
                RawPoint::new("2024", 3.1),
                RawPoint::new("2025", 2.8),
                RawPoint::new("2026", 2.4),
            ],
        )],
    )
    .with_decorations(Decorations {
        rating_zones: Vec::new(),
        projected: ProjectedSegments {
            trailing: Some(1),
            after_label: None,
        },
    });
    let mut engine = engine(chart);

    engine.set_active_label(Some("2026"));
    let projected = engine.tooltip().expect("projected tooltip");
    assert_eq!(
        projected.content.body.rows().next().map(|row| row.swatch),
        Some(Swatch::Hollow { dashed: true })
    );

    engine.set_active_label(Some("2025"));
    let actual = engine.tooltip().expect("actual tooltip");
    assert_eq!(
        actual.content.body.rows().next().map(|row| row.swatch),
        Some(Swatch::Solid)
    );
}

#[test]
fn floating_tooltip_follows_the_pointer() {
    let chart = ChartConfig::bar(
        "Trimestral",
        vec![Series::new(
            "s",
            "S",
            vec![
                RawPoint::new("Q1", 10.0),
                RawPoint::new("Q2", 20.0),
                RawPoint::new("Q3", 15.0),
                RawPoint::new("Q4", 25.0),
            ],
        )],
    );
    let mut engine = engine(chart);
    engine.pointer_move(Q2_X, 200.0);

    let tooltip = engine.tooltip().expect("tooltip");
    assert_eq!(tooltip.content.title, "Q2");
    assert_eq!(
        tooltip.placement,
        TooltipPlacement::Floating {
            x: Q2_X + 12.0,
            y: 212.0,
            flipped_x: false,
            flipped_y: false,
        }
    );
}

#[test]
fn fixed_mode_docks_the_tooltip() {
    let chart = ChartConfig::bar(
        "Fijo",
        vec![Series::new("s", "S", vec![RawPoint::new("A", 1.0)])],
    );
    let config = ChartEngineConfig::new(Viewport::new(800, 400)).with_tooltip_mode(
        TooltipMode::Fixed {
            anchor: TooltipAnchor::Header,
        },
    );
    let mut engine = engine_with(chart, config);
    engine.set_active_label(Some("A"));

    let tooltip = engine.tooltip().expect("tooltip");
    assert_eq!(
        tooltip.placement,
        TooltipPlacement::Docked {
            anchor: TooltipAnchor::Header,
        }
    );
}

#[test]
fn tooltip_is_hidden_without_focus() {
    let chart = ChartConfig::bar(
        "Sin foco",
        vec![Series::new("s", "S", vec![RawPoint::new("A", 1.0)])],
    );
    let engine = engine(chart);
    assert!(engine.tooltip().is_none());
}
