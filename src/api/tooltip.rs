//! Tooltip content and placement.
//!
//! Content is rebuilt whenever the active key changes and is never cached.

use serde::{Deserialize, Serialize};

use crate::core::format::{format_by_magnitude, with_unit};
use crate::core::normalize::ZERO_EPSILON;
use crate::core::{ChartConfig, NormalizedData, NormalizedSeries};
use crate::interaction::Focus;
use crate::render::Color;

use super::decorations::ProjectedKeys;
use super::engine_config::{TooltipAnchor, TooltipMode, TooltipTuning};
use super::render_style::RenderStyle;

/// Legend marker drawn next to a tooltip row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Swatch {
    Solid,
    /// Outline only, dashed for projected or dashed-stroke segments.
    Hollow { dashed: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipRow {
    pub series_id: String,
    pub label: String,
    pub color: Color,
    pub swatch: Swatch,
    pub value: f64,
    /// Value with magnitude-based precision and unit suffix.
    pub formatted: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipMetric {
    pub name: String,
    pub value: f64,
    pub formatted: String,
}

/// One series with its named metrics, for grouped tooltips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipGroup {
    pub row: TooltipRow,
    pub metrics: Vec<TooltipMetric>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "items", rename_all = "kebab-case")]
pub enum TooltipBody {
    Rows(Vec<TooltipRow>),
    Groups(Vec<TooltipGroup>),
}

impl TooltipBody {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Rows(rows) => rows.len(),
            Self::Groups(groups) => groups.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat view over the series rows of either body kind.
    pub fn rows(&self) -> Box<dyn Iterator<Item = &TooltipRow> + '_> {
        match self {
            Self::Rows(rows) => Box::new(rows.iter()),
            Self::Groups(groups) => Box::new(groups.iter().map(|group| &group.row)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipContent {
    pub title: String,
    pub body: TooltipBody,
}

/// Builds the tooltip for `focus`.
///
/// Only active series with a value at the focus contribute a row; a missing
/// value yields no row instead of "0". With skip-zero enabled, rows whose
/// value is ~0 are dropped. Returns `None` when no row remains.
#[must_use]
pub fn build_tooltip(
    config: &ChartConfig,
    data: &NormalizedData,
    focus: &Focus,
    projected: &ProjectedKeys,
    style: &RenderStyle,
) -> Option<TooltipContent> {
    let skip_zero = config.skip_zero();
    let focus_projected = projected.contains(focus.key);

    let rows: Vec<(TooltipRow, &NormalizedSeries)> = focus
        .active_series()
        .filter_map(|series_focus| {
            let value = series_focus.value?;
            if skip_zero && value.abs() < ZERO_EPSILON {
                return None;
            }
            let series = data.series.get(series_focus.series_index)?;
            let unit = series.unit.as_deref().or(config.unit.as_deref());
            Some((
                TooltipRow {
                    series_id: series.id.clone(),
                    label: series.label.clone(),
                    color: style.series_color(series, series_focus.series_index),
                    swatch: swatch_for(series, focus_projected),
                    value,
                    formatted: with_unit(format_by_magnitude(value, series.max_abs_value()), unit),
                },
                series,
            ))
        })
        .collect();

    if rows.is_empty() {
        return None;
    }

    let body = if config.tooltip.grouped {
        TooltipBody::Groups(
            rows.into_iter()
                .map(|(row, series)| TooltipGroup {
                    metrics: metrics_at(series, focus.key),
                    row,
                })
                .collect(),
        )
    } else {
        TooltipBody::Rows(rows.into_iter().map(|(row, _)| row).collect())
    };

    Some(TooltipContent {
        title: focus.label.clone(),
        body,
    })
}

fn swatch_for(series: &NormalizedSeries, focus_projected: bool) -> Swatch {
    match series.bar_style {
        Some(style) if style.hollow => Swatch::Hollow {
            dashed: style.dashed || focus_projected,
        },
        Some(style) if style.dashed => Swatch::Hollow { dashed: true },
        _ if focus_projected => Swatch::Hollow { dashed: true },
        _ => Swatch::Solid,
    }
}

/// Metrics of the point at `key`, each formatted by its own series-wide magnitude.
fn metrics_at(series: &NormalizedSeries, key: f64) -> Vec<TooltipMetric> {
    let Some(point) = series.point_at(key) else {
        return Vec::new();
    };
    point
        .metrics
        .iter()
        .filter(|(_, value)| value.is_finite())
        .map(|(name, value)| {
            let max_abs = series
                .points
                .iter()
                .filter_map(|other| other.metrics.get(name))
                .fold(0.0_f64, |acc, other| acc.max(other.abs()));
            TooltipMetric {
                name: name.clone(),
                value: *value,
                formatted: format_by_magnitude(*value, max_abs),
            }
        })
        .collect()
}

/// Resolved tooltip position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TooltipPlacement {
    Floating {
        x: f64,
        y: f64,
        flipped_x: bool,
        flipped_y: bool,
    },
    Docked { anchor: TooltipAnchor },
}

/// Places a floating tooltip of `size` near `pointer` inside `container`.
///
/// The box sits below-right of the pointer, flips left/up when it would
/// overflow, and is finally clamped so it never leaves the container.
#[must_use]
pub fn place_floating(
    pointer: (f64, f64),
    size: (f64, f64),
    container: (f64, f64),
    offset: f64,
) -> TooltipPlacement {
    let (x, flipped_x) = place_axis(pointer.0, size.0, container.0, offset);
    let (y, flipped_y) = place_axis(pointer.1, size.1, container.1, offset);
    TooltipPlacement::Floating {
        x,
        y,
        flipped_x,
        flipped_y,
    }
}

fn place_axis(pointer: f64, size: f64, extent: f64, offset: f64) -> (f64, bool) {
    let preferred = pointer + offset;
    let (position, flipped) = if preferred + size > extent {
        (pointer - offset - size, true)
    } else {
        (preferred, false)
    };
    let max = (extent - size).max(0.0);
    (position.clamp(0.0, max), flipped)
}

/// Placement for the configured mode; floating needs a pointer.
#[must_use]
pub fn place_tooltip(
    tuning: &TooltipTuning,
    pointer: Option<(f64, f64)>,
    container: (f64, f64),
) -> Option<TooltipPlacement> {
    match &tuning.mode {
        TooltipMode::Fixed { anchor } => Some(TooltipPlacement::Docked {
            anchor: anchor.clone(),
        }),
        TooltipMode::Floating => pointer
            .map(|pointer| place_floating(pointer, tuning.size_hint, container, tuning.offset_px)),
    }
}
