use deck_charts::core::{
    BarSeries, ChartConfig, NormalizeOptions, RawPoint, Series, compose_chart_bars, normalize,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn stacked_totals_equal_the_sum_of_inputs(
        rows in prop::collection::vec(prop::collection::vec(-1e4f64..1e4, 3), 1..12)
    ) {
        let series = (0..3)
            .map(|series_idx| {
                let points = rows
                    .iter()
                    .enumerate()
                    .map(|(category_idx, row)| {
                        RawPoint::new(format!("c{category_idx}"), row[series_idx])
                    })
                    .collect();
                BarSeries::new(Series::new(
                    format!("s{series_idx}"),
                    format!("S{series_idx}"),
                    points,
                ))
            })
            .collect();
        let config = ChartConfig::stacked_bar("p", series).with_sort(false);
        let data = normalize(&config, NormalizeOptions::from_config(&config));
        let bars = compose_chart_bars(&config, &data);
        let composition = &bars.primary.as_ref().expect("primary").composition;

        for (category_idx, row) in rows.iter().enumerate() {
            let expected: f64 = row.iter().sum();
            let total = composition.category_total(category_idx);
            prop_assert!((total - expected).abs() <= 1e-6);
        }
        prop_assert!(composition.min_total <= 0.0 && 0.0 <= composition.max_total);
        for segment in &composition.segments {
            prop_assert!(segment.y0.min(segment.y1) >= composition.min_total);
            prop_assert!(segment.y0.max(segment.y1) <= composition.max_total);
        }
    }
}
