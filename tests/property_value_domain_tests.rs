use deck_charts::core::{YDomainOverrides, resolve_y_domain};
use proptest::prelude::*;

proptest! {
    #[test]
    fn resolved_domain_never_clips_values(
        values in prop::collection::vec(-1e6f64..1e6, 1..64),
        min_override in prop::option::of(-2e6f64..2e6),
        max_override in prop::option::of(-2e6f64..2e6)
    ) {
        let overrides = YDomainOverrides { min: min_override, max: max_override };
        let (min, max) = resolve_y_domain(values.iter().copied(), overrides).expect("domain");

        prop_assert!(min < max);
        for value in &values {
            prop_assert!(min <= *value && *value <= max);
        }
    }

    #[test]
    fn non_clipping_max_override_is_honored(
        values in prop::collection::vec(0.0f64..1e6, 1..64),
        extra in 0.0f64..1e6
    ) {
        let data_max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let requested = data_max + extra + 1.0;
        let overrides = YDomainOverrides { min: None, max: Some(requested) };
        let (_, max) = resolve_y_domain(values.iter().copied(), overrides).expect("domain");
        prop_assert_eq!(max, requested);
    }
}
