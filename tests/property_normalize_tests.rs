use deck_charts::core::{
    ChartConfig, NormalizeOptions, RawPoint, Series, TickFormat, normalize, tick_label_for_key,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn category_labels_round_trip_through_their_keys(
        values in prop::collection::vec(-1_000.0f64..1_000.0, 1..24),
        sort in any::<bool>()
    ) {
        let points = values
            .iter()
            .enumerate()
            .map(|(idx, value)| RawPoint::new(format!("c{idx}"), *value))
            .collect();
        let config = ChartConfig::bar("p", vec![Series::new("s", "S", points)]).with_sort(sort);
        let data = normalize(&config, NormalizeOptions::from_config(&config));

        prop_assert_eq!(data.keys.len(), values.len());
        prop_assert!(data.keys.windows(2).all(|pair| pair[0] < pair[1]));
        for idx in 0..values.len() {
            let label = format!("c{idx}");
            let key = data.key_for_label(&label).expect("key for label");
            let tick = tick_label_for_key(&data, key, TickFormat::Label, 0.0);
            prop_assert_eq!(tick.as_deref(), Some(label.as_str()));
        }
    }

    #[test]
    fn numeric_keys_are_sorted_and_unique(
        xs in prop::collection::vec(-10_000i32..10_000, 1..32)
    ) {
        let points = xs
            .iter()
            .map(|x| RawPoint::new(f64::from(*x), 1.0))
            .collect();
        let config = ChartConfig::line("p", vec![Series::new("s", "S", points)])
            .with_x_axis(deck_charts::core::AxisKind::Number)
            .with_sort(true);
        let data = normalize(&config, NormalizeOptions::from_config(&config));

        let mut expected: Vec<f64> = xs.iter().map(|x| f64::from(*x)).collect();
        expected.sort_by(f64::total_cmp);
        expected.dedup();
        prop_assert_eq!(data.keys.clone(), expected);
    }
}
