use serde::{Deserialize, Serialize};

use crate::core::format::format_by_magnitude;
use crate::core::layout::{LayoutTuning, ResponsiveLayout};
use crate::core::normalize::NormalizedData;
use crate::core::scale::{BandScale, LinearScale, XScale};
use crate::core::series::{ChartConfig, TickFormat, format_number_label};
use crate::core::stack::ChartBars;
use crate::core::ticks::{Tick, format_x_label, nice_ticks, thin_indices, value_ticks};
use crate::core::value_domain::{YDomainOverrides, resolve_y_domain};
use crate::core::{AxisKind, PlotArea, Viewport};

const DAY_MILLIS: f64 = 86_400_000.0;

/// Scales, layout and tick sets for one render pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedScales {
    pub layout: ResponsiveLayout,
    pub x: XScale,
    pub y: LinearScale,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
}

impl ResolvedScales {
    #[must_use]
    pub fn plot(&self) -> PlotArea {
        self.layout.plot
    }

    #[must_use]
    pub fn y_domain(&self) -> (f64, f64) {
        self.y.domain()
    }

    /// Pixel y of the value baseline (zero, clamped into the domain).
    #[must_use]
    pub fn baseline_y(&self) -> f64 {
        let (min, max) = self.y.domain();
        self.y.map(0.0_f64.clamp(min, max))
    }
}

/// Whether the chart draws its x axis as discrete bands.
#[must_use]
pub fn uses_band_axis(config: &ChartConfig, data: &NormalizedData) -> bool {
    config.is_bar_kind() || data.axis == AxisKind::Category || data.has_fallback_labels
}

/// Builds scales for `data` in `viewport`.
///
/// Returns `None` for an empty dataset or a container too small to draw in;
/// callers retry on the next resize.
#[must_use]
pub fn resolve_scales(
    data: &NormalizedData,
    config: &ChartConfig,
    bars: &ChartBars,
    viewport: Viewport,
    tuning: LayoutTuning,
) -> Option<ResolvedScales> {
    if data.is_empty() {
        return None;
    }

    let layout = ResponsiveLayout::resolve(viewport, tuning, data.keys.len());
    let plot = layout.plot;
    if !plot.is_drawable() {
        return None;
    }

    let x = if uses_band_axis(config, data) {
        XScale::Band(
            BandScale::new(
                data.keys.clone(),
                (0.0, plot.width),
                tuning.band_padding,
                tuning.band_padding * 0.5,
            )
            .ok()?,
        )
    } else {
        let first = *data.sorted_keys.first()?;
        let last = *data.sorted_keys.last()?;
        let (start, end) = if first == last {
            let pad = if data.axis == AxisKind::Time {
                DAY_MILLIS
            } else {
                1.0
            };
            (first - pad, last + pad)
        } else {
            (first, last)
        };
        XScale::Linear(LinearScale::new((start, end), (0.0, plot.width)).ok()?)
    };

    let overrides = YDomainOverrides {
        min: config.y_axis.min,
        max: config.y_axis.max,
    };
    let (y_min, y_max) = resolve_y_domain(data.values().chain(bars.domain_values()), overrides)?;
    let y = LinearScale::new((y_min, y_max), (plot.height, 0.0)).ok()?;

    let x_ticks = x_ticks(data, config, &x, layout);
    let y_ticks = value_ticks(
        (y_min, y_max),
        layout.y_tick_count,
        config.y_axis.tick_values.as_deref(),
    );

    Some(ResolvedScales {
        layout,
        x,
        y,
        x_ticks,
        y_ticks,
    })
}

fn x_ticks(
    data: &NormalizedData,
    config: &ChartConfig,
    x: &XScale,
    layout: ResponsiveLayout,
) -> Vec<Tick> {
    let format = config.x_axis.tick_format;
    let max_abs = data
        .sorted_keys
        .iter()
        .fold(0.0_f64, |acc, key| acc.max(key.abs()));

    if let Some(labels) = &config.x_axis.tick_labels {
        return labels
            .iter()
            .filter_map(|label| {
                data.key_for_label(label).map(|value| Tick {
                    value,
                    label: format_x_label(label, format, max_abs),
                })
            })
            .collect();
    }

    let tick_for_key = |value: f64| {
        tick_label_for_key(data, value, format, max_abs).map(|label| Tick { value, label })
    };

    match x {
        XScale::Band(band) => {
            let budget = if layout.rotate_x_labels {
                layout.x_tick_count * 2
            } else {
                layout.x_tick_count.max(band.len().min(layout.x_tick_count * 2))
            };
            thin_indices(band.len(), budget)
                .into_iter()
                .filter_map(|idx| tick_for_key(band.keys()[idx]))
                .collect()
        }
        XScale::Linear(linear) if data.axis == AxisKind::Number => {
            let (start, end) = linear.domain();
            nice_ticks(start, end, layout.x_tick_count)
                .into_iter()
                .map(|value| Tick {
                    value,
                    label: match (format, data.label_for_key(value)) {
                        (TickFormat::Magnitude, _) | (_, None) => format_by_magnitude(value, max_abs),
                        (_, Some(label)) => format_x_label(label, format, max_abs),
                    },
                })
                .collect()
        }
        XScale::Linear(_) => thin_indices(data.sorted_keys.len(), layout.x_tick_count)
            .into_iter()
            .filter_map(|idx| tick_for_key(data.sorted_keys[idx]))
            .collect(),
    }
}

/// Display text for the tick at `key`.
///
/// With `TickFormat::Label` this is the original input label, unchanged.
#[must_use]
pub fn tick_label_for_key(
    data: &NormalizedData,
    key: f64,
    format: TickFormat,
    axis_max_abs: f64,
) -> Option<String> {
    match data.label_for_key(key) {
        Some(label) => Some(format_x_label(label, format, axis_max_abs)),
        None if data.axis == AxisKind::Number => Some(format_number_label(key)),
        None => None,
    }
}
