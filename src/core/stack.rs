//! Stacked, grouped and mixed bar composition.
//!
//! Works purely in value space; the frame builder turns slots and
//! `[y0, y1]` spans into pixels.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::normalize::{NormalizedData, NormalizedSeries, SeriesRole};
use crate::core::series::{BarLayout, ChartConfig, ChartKind};

/// One bar segment in value space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSegment {
    /// Index into the series slice passed to `compose_bars`.
    pub series_index: usize,
    pub series_id: String,
    /// Index into the key list passed to `compose_bars`.
    pub category_index: usize,
    pub x_key: f64,
    /// Column within the category band.
    pub slot: usize,
    pub y0: f64,
    pub y1: f64,
    pub value: f64,
}

impl BarSegment {
    /// Signed extent; equals `value`.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    #[must_use]
    pub fn top(&self) -> f64 {
        self.y0.max(self.y1)
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y0.min(self.y1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackComposition {
    pub layout: BarLayout,
    pub segments: Vec<BarSegment>,
    /// Columns per category band.
    pub slot_count: usize,
    /// Slot assigned to each input series.
    pub series_slots: Vec<usize>,
    /// Largest positive stacked extent over all categories and slots.
    pub max_total: f64,
    /// Most negative stacked extent (`<= 0`).
    pub min_total: f64,
}

impl StackComposition {
    #[must_use]
    pub fn segment(&self, series_index: usize, category_index: usize) -> Option<&BarSegment> {
        self.segments.iter().find(|segment| {
            segment.series_index == series_index && segment.category_index == category_index
        })
    }

    pub fn segments_for_category(
        &self,
        category_index: usize,
    ) -> impl Iterator<Item = &BarSegment> + '_ {
        self.segments
            .iter()
            .filter(move |segment| segment.category_index == category_index)
    }

    /// Sum of signed segment heights for one category.
    #[must_use]
    pub fn category_total(&self, category_index: usize) -> f64 {
        self.segments_for_category(category_index)
            .map(BarSegment::height)
            .sum()
    }

    /// Values the y domain must cover: the stacked extremes, not single series.
    #[must_use]
    pub fn domain_values(&self) -> [f64; 2] {
        [self.min_total, self.max_total]
    }
}

/// Composes bar segments for `series` over `keys`.
///
/// Series order is stack order: the first series sits on the baseline.
/// Negative values stack downward from zero, so the signed heights of a
/// category always sum to its input values.
#[must_use]
pub fn compose_bars(
    series: &[&NormalizedSeries],
    keys: &[f64],
    layout: BarLayout,
) -> StackComposition {
    let series_slots = assign_slots(series, layout);
    let slot_count = series_slots.iter().copied().max().map_or(0, |max| max + 1);
    let stacks_within_slot = !matches!(layout, BarLayout::Grouped);

    let mut segments = Vec::new();
    let mut max_total: f64 = 0.0;
    let mut min_total: f64 = 0.0;

    for (category_index, key) in keys.iter().copied().enumerate() {
        let mut positive = vec![0.0_f64; slot_count];
        let mut negative = vec![0.0_f64; slot_count];

        for (series_index, current) in series.iter().enumerate() {
            let Some(value) = current.value_at(key) else {
                continue;
            };
            let slot = series_slots[series_index];
            let (y0, y1) = if !stacks_within_slot {
                (0.0, value)
            } else if value >= 0.0 {
                let base = positive[slot];
                positive[slot] += value;
                (base, base + value)
            } else {
                let base = negative[slot];
                negative[slot] += value;
                (base, base + value)
            };

            max_total = max_total.max(y0.max(y1));
            min_total = min_total.min(y0.min(y1));
            segments.push(BarSegment {
                series_index,
                series_id: current.id.clone(),
                category_index,
                x_key: key,
                slot,
                y0,
                y1,
                value,
            });
        }
    }

    StackComposition {
        layout,
        segments,
        slot_count,
        series_slots,
        max_total,
        min_total,
    }
}

fn assign_slots(series: &[&NormalizedSeries], layout: BarLayout) -> Vec<usize> {
    match layout {
        BarLayout::Stacked => vec![0; series.len()],
        BarLayout::Grouped => (0..series.len()).collect(),
        BarLayout::Mixed => {
            let mut groups: IndexMap<String, usize> = IndexMap::new();
            series
                .iter()
                .map(|current| {
                    // Ungrouped series get a column of their own.
                    let group_key = current
                        .stack_group
                        .clone()
                        .unwrap_or_else(|| format!("\u{0}{}", current.id));
                    let next = groups.len();
                    *groups.entry(group_key).or_insert(next)
                })
                .collect()
        }
    }
}

/// A composition plus the mapping from its local series indices back to
/// `NormalizedData::series`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarComposition {
    pub composition: StackComposition,
    pub series_indices: Vec<usize>,
}

impl BarComposition {
    /// Index of the segment's series in `NormalizedData::series`.
    #[must_use]
    pub fn data_index(&self, segment: &BarSegment) -> usize {
        self.series_indices
            .get(segment.series_index)
            .copied()
            .unwrap_or(segment.series_index)
    }
}

/// Bar geometry of one chart: primary bars and the overlay layer behind them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartBars {
    pub primary: Option<BarComposition>,
    pub overlay: Option<BarComposition>,
}

impl ChartBars {
    pub fn domain_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.primary
            .iter()
            .chain(self.overlay.iter())
            .flat_map(|bars| bars.composition.domain_values())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.overlay.is_none()
    }
}

/// Composes every bar layer `config` asks for.
///
/// Plain bar charts place their primary series side by side and compose
/// overlays with the configured overlay layout. Stacked and grouped charts
/// switch to the mixed layout as soon as any series names a stack group.
#[must_use]
pub fn compose_chart_bars(config: &ChartConfig, data: &NormalizedData) -> ChartBars {
    let compose_role = |role: SeriesRole, layout: BarLayout| {
        let (series_indices, series): (Vec<usize>, Vec<&NormalizedSeries>) = data
            .series
            .iter()
            .enumerate()
            .filter(|(_, series)| series.role == role)
            .unzip();
        if series.is_empty() {
            return None;
        }
        Some(BarComposition {
            composition: compose_bars(&series, &data.keys, layout),
            series_indices,
        })
    };
    let grouped_by_stack = data
        .series
        .iter()
        .any(|series| series.stack_group.is_some());

    match &config.kind {
        ChartKind::Line { .. } => ChartBars::default(),
        ChartKind::Bar { overlay_layout, .. } => ChartBars {
            primary: compose_role(SeriesRole::Primary, BarLayout::Grouped),
            overlay: compose_role(SeriesRole::Overlay, *overlay_layout),
        },
        ChartKind::StackedBar { .. } => ChartBars {
            primary: compose_role(
                SeriesRole::Primary,
                if grouped_by_stack {
                    BarLayout::Mixed
                } else {
                    BarLayout::Stacked
                },
            ),
            overlay: None,
        },
        ChartKind::GroupedBar { .. } => ChartBars {
            primary: compose_role(
                SeriesRole::Primary,
                if grouped_by_stack {
                    BarLayout::Mixed
                } else {
                    BarLayout::Grouped
                },
            ),
            overlay: None,
        },
    }
}

/// A segment label is drawn only when the segment is taller than the threshold.
#[must_use]
pub fn segment_label_visible(height_px: f64, min_height_px: f64) -> bool {
    height_px.is_finite() && height_px.abs() > min_height_px
}
