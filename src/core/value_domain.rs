use serde::{Deserialize, Serialize};
use tracing::warn;

/// Headroom applied above the data maximum (and below a negative minimum).
pub const Y_HEADROOM_RATIO: f64 = 1.08;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct YDomainOverrides {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Resolves the y domain `[y_min, y_max]` for a set of plotted values.
///
/// - `y_max` defaults to `max * 1.08`; `y_min` defaults to `0`, or to
///   `min * 1.08` when the data goes negative.
/// - An override is used only when it keeps every value visible; a
///   clipping override is ignored and logged.
///
/// Returns `None` when no finite value is present.
#[must_use]
pub fn resolve_y_domain(
    values: impl IntoIterator<Item = f64>,
    overrides: YDomainOverrides,
) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for value in values {
        if !value.is_finite() {
            continue;
        }
        min = min.min(value);
        max = max.max(value);
    }
    if !min.is_finite() || !max.is_finite() {
        return None;
    }

    let computed_max = if max > 0.0 { max * Y_HEADROOM_RATIO } else { 0.0 };
    let computed_min = if min < 0.0 {
        (min * Y_HEADROOM_RATIO).min(0.0)
    } else {
        0.0
    };

    let mut y_max = match overrides.max {
        Some(requested) if requested.is_finite() && requested >= max => requested,
        Some(requested) => {
            warn!(requested, data_max = max, "ignoring y max override that clips data");
            computed_max
        }
        None => computed_max,
    };
    let y_min = match overrides.min {
        Some(requested) if requested.is_finite() && requested <= min && requested < y_max => {
            requested
        }
        Some(requested) => {
            warn!(requested, data_min = min, "ignoring y min override that clips data");
            computed_min
        }
        None => computed_min,
    };

    if y_max <= y_min {
        // All-zero data (or all values equal to the floor) still needs a span.
        y_max = y_min + 1.0;
    }
    Some((y_min, y_max))
}
