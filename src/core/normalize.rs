//! Series normalization: heterogeneous x values to one sortable numeric key.
//!
//! Every axis kind ends up with `x_key: f64` so hit-testing runs one bisect
//! algorithm regardless of whether the chart is time, category or numeric.

use chrono::NaiveDate;
use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::primitives::{date_to_unix_millis, parse_date_label, synthesized_ordinal_date};
use crate::core::series::{BarStyle, ChartConfig, ChartKind, RawPoint, RawX, Series};
use crate::core::AxisKind;

/// Value zero is treated as "no sample" below this magnitude when skip-zero is on.
pub const ZERO_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeOptions {
    pub axis: AxisKind,
    pub sort: bool,
    pub skip_zero: bool,
}

impl NormalizeOptions {
    #[must_use]
    pub fn from_config(config: &ChartConfig) -> Self {
        Self {
            axis: config.x_axis.kind,
            sort: config.x_axis.sort,
            skip_zero: config.skip_zero(),
        }
    }
}

/// Normalized x value, kept alongside the numeric key for formatting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum XValue {
    Date(NaiveDate),
    Number(f64),
    Ordinal(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x_value: XValue,
    pub x_key: f64,
    pub value: f64,
    pub label: String,
    #[serde(default)]
    pub metrics: IndexMap<String, f64>,
}

/// Which part of the chart a normalized series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesRole {
    Primary,
    Overlay,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSeries {
    pub id: String,
    pub label: String,
    pub color: Option<String>,
    pub unit: Option<String>,
    pub role: SeriesRole,
    pub stack_group: Option<String>,
    pub bar_style: Option<BarStyle>,
    pub points: Vec<NormalizedPoint>,
    by_key: IndexMap<OrderedFloat<f64>, usize>,
}

impl NormalizedSeries {
    #[must_use]
    pub fn point_at(&self, key: f64) -> Option<&NormalizedPoint> {
        self.by_key
            .get(&OrderedFloat(key))
            .and_then(|idx| self.points.get(*idx))
    }

    #[must_use]
    pub fn value_at(&self, key: f64) -> Option<f64> {
        self.point_at(key).map(|point| point.value)
    }

    /// Value at `x`, interpolating linearly between the two bracketing samples.
    ///
    /// Returns `None` outside the sampled range.
    #[must_use]
    pub fn interpolated_value_at(&self, x: f64) -> Option<f64> {
        if let Some(value) = self.value_at(x) {
            return Some(value);
        }

        let mut prev: Option<&NormalizedPoint> = None;
        let mut next: Option<&NormalizedPoint> = None;
        for point in &self.points {
            if point.x_key < x {
                if prev.is_none_or(|p| point.x_key > p.x_key) {
                    prev = Some(point);
                }
            } else if point.x_key > x && next.is_none_or(|n| point.x_key < n.x_key) {
                next = Some(point);
            }
        }

        let (prev, next) = (prev?, next?);
        let span = next.x_key - prev.x_key;
        if span <= 0.0 {
            return Some(prev.value);
        }
        let t = (x - prev.x_key) / span;
        Some(prev.value + (next.value - prev.value) * t)
    }

    /// Largest absolute value, used for tooltip precision.
    #[must_use]
    pub fn max_abs_value(&self) -> f64 {
        self.points
            .iter()
            .map(|point| point.value.abs())
            .fold(0.0, f64::max)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Key collision inside one series; the later point wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateKey {
    pub series_id: String,
    pub label: String,
    pub x_key: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedData {
    pub axis: AxisKind,
    pub series: Vec<NormalizedSeries>,
    /// Distinct keys across all series in display order.
    pub keys: Vec<f64>,
    /// Same keys ascending, for bisection.
    pub sorted_keys: Vec<f64>,
    pub label_to_key: IndexMap<String, f64>,
    pub key_labels: IndexMap<OrderedFloat<f64>, String>,
    pub has_fallback_labels: bool,
    pub duplicates: Vec<DuplicateKey>,
}

impl NormalizedData {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty() || self.series.iter().all(NormalizedSeries::is_empty)
    }

    #[must_use]
    pub fn key_for_label(&self, label: &str) -> Option<f64> {
        self.label_to_key.get(label).copied()
    }

    #[must_use]
    pub fn label_for_key(&self, key: f64) -> Option<&str> {
        self.key_labels.get(&OrderedFloat(key)).map(String::as_str)
    }

    /// Position of `key` in display order.
    #[must_use]
    pub fn key_index(&self, key: f64) -> Option<usize> {
        self.keys.iter().position(|candidate| *candidate == key)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.series
            .iter()
            .flat_map(|series| series.points.iter().map(|point| point.value))
    }

    #[must_use]
    pub fn series_by_id(&self, id: &str) -> Option<&NormalizedSeries> {
        self.series.iter().find(|series| series.id == id)
    }
}

struct SeriesInput<'a> {
    series: &'a Series,
    role: SeriesRole,
    stack_group: Option<&'a str>,
    bar_style: Option<BarStyle>,
}

fn series_inputs(config: &ChartConfig) -> Vec<SeriesInput<'_>> {
    match &config.kind {
        ChartKind::Line { series, .. } => series
            .iter()
            .map(|series| SeriesInput {
                series,
                role: SeriesRole::Primary,
                stack_group: None,
                bar_style: None,
            })
            .collect(),
        ChartKind::Bar {
            series, overlays, ..
        } => series
            .iter()
            .map(|series| SeriesInput {
                series,
                role: SeriesRole::Primary,
                stack_group: None,
                bar_style: None,
            })
            .chain(overlays.iter().map(|bar| SeriesInput {
                series: &bar.series,
                role: SeriesRole::Overlay,
                stack_group: bar.stack_group.as_deref(),
                bar_style: Some(bar.style),
            }))
            .collect(),
        ChartKind::StackedBar { series } | ChartKind::GroupedBar { series } => series
            .iter()
            .map(|bar| SeriesInput {
                series: &bar.series,
                role: SeriesRole::Primary,
                stack_group: bar.stack_group.as_deref(),
                bar_style: Some(bar.style),
            })
            .collect(),
    }
}

/// Normalizes every series of `config` into keyed points plus the global key universe.
#[must_use]
pub fn normalize(config: &ChartConfig, options: NormalizeOptions) -> NormalizedData {
    let inputs = series_inputs(config);
    let mut resolver = KeyResolver::new(options.axis, &inputs);

    let mut duplicates = Vec::new();
    let mut series = Vec::with_capacity(inputs.len());
    for input in &inputs {
        series.push(normalize_one(input, &mut resolver, options, &mut duplicates));
    }

    let mut keys: Vec<f64> = resolver.key_labels.keys().map(|key| key.0).collect();
    if options.sort {
        keys.sort_by(f64::total_cmp);
    }
    let mut sorted_keys = keys.clone();
    sorted_keys.sort_by(f64::total_cmp);

    for duplicate in &duplicates {
        warn!(
            series = %duplicate.series_id,
            label = %duplicate.label,
            "duplicate x key, later point wins"
        );
    }
    debug!(
        series_count = series.len(),
        key_count = keys.len(),
        fallback_labels = resolver.has_fallback_labels,
        "normalized chart series"
    );

    NormalizedData {
        axis: options.axis,
        series,
        keys,
        sorted_keys,
        label_to_key: resolver.label_to_key,
        key_labels: resolver.key_labels,
        has_fallback_labels: resolver.has_fallback_labels,
        duplicates,
    }
}

fn normalize_one(
    input: &SeriesInput<'_>,
    resolver: &mut KeyResolver,
    options: NormalizeOptions,
    duplicates: &mut Vec<DuplicateKey>,
) -> NormalizedSeries {
    let mut points: Vec<NormalizedPoint> = Vec::with_capacity(input.series.points.len());
    let mut by_key: IndexMap<OrderedFloat<f64>, usize> = IndexMap::new();

    for raw in &input.series.points {
        let (x_value, x_key, label) = resolver.resolve(&raw.x);
        if !raw.value.is_finite() {
            continue;
        }
        if options.skip_zero && raw.value.abs() < ZERO_EPSILON {
            continue;
        }

        let point = to_point(raw, x_value, x_key, label);
        match by_key.get(&OrderedFloat(x_key)) {
            Some(existing) => {
                duplicates.push(DuplicateKey {
                    series_id: input.series.id.clone(),
                    label: point.label.clone(),
                    x_key,
                });
                points[*existing] = point;
            }
            None => {
                by_key.insert(OrderedFloat(x_key), points.len());
                points.push(point);
            }
        }
    }

    if options.sort {
        points.sort_by(|left, right| left.x_key.total_cmp(&right.x_key));
        by_key = points
            .iter()
            .enumerate()
            .map(|(idx, point)| (OrderedFloat(point.x_key), idx))
            .collect();
    }

    NormalizedSeries {
        id: input.series.id.clone(),
        label: input.series.label.clone(),
        color: input.series.color.clone(),
        unit: input.series.unit.clone(),
        role: input.role,
        stack_group: input.stack_group.map(str::to_owned),
        bar_style: input.bar_style,
        points,
        by_key,
    }
}

fn to_point(raw: &RawPoint, x_value: XValue, x_key: f64, label: String) -> NormalizedPoint {
    NormalizedPoint {
        x_value,
        x_key,
        value: raw.value,
        label,
        metrics: raw.metrics.clone(),
    }
}

/// Assigns keys to labels consistently across all series of one chart.
struct KeyResolver {
    axis: AxisKind,
    categories: IndexMap<String, usize>,
    fallback_ordinals: IndexMap<String, usize>,
    label_to_key: IndexMap<String, f64>,
    key_labels: IndexMap<OrderedFloat<f64>, String>,
    has_fallback_labels: bool,
}

impl KeyResolver {
    fn new(axis: AxisKind, inputs: &[SeriesInput<'_>]) -> Self {
        let mut categories = IndexMap::new();
        if axis == AxisKind::Category {
            let mut labels: Vec<String> = Vec::new();
            for input in inputs {
                for point in &input.series.points {
                    let label = point.x.label();
                    if !labels.contains(&label) {
                        labels.push(label);
                    }
                }
            }
            categories = labels
                .into_iter()
                .enumerate()
                .map(|(idx, label)| (label, idx))
                .collect();
        }

        Self {
            axis,
            categories,
            fallback_ordinals: IndexMap::new(),
            label_to_key: IndexMap::new(),
            key_labels: IndexMap::new(),
            has_fallback_labels: false,
        }
    }

    fn resolve(&mut self, x: &RawX) -> (XValue, f64, String) {
        let label = x.label();
        let (x_value, key) = match self.axis {
            AxisKind::Category => {
                let ordinal = self.categories.get(&label).copied().unwrap_or_else(|| {
                    let next = self.categories.len();
                    self.categories.insert(label.clone(), next);
                    next
                });
                (XValue::Ordinal(ordinal), ordinal as f64)
            }
            AxisKind::Time => match x {
                RawX::Number(millis) if millis.is_finite() => (
                    crate::core::primitives::unix_millis_to_date(*millis)
                        .map_or(XValue::Number(*millis), XValue::Date),
                    *millis,
                ),
                _ => match parse_date_label(&label) {
                    Some(date) => (XValue::Date(date), date_to_unix_millis(date)),
                    None => {
                        let date = synthesized_ordinal_date(self.fallback_ordinal(&label));
                        (XValue::Date(date), date_to_unix_millis(date))
                    }
                },
            },
            AxisKind::Number => {
                let parsed = match x {
                    RawX::Number(value) => Some(*value).filter(|v| v.is_finite()),
                    RawX::Text(text) => text.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
                };
                match parsed {
                    Some(value) => (XValue::Number(value), value),
                    None => {
                        let ordinal = self.fallback_ordinal(&label);
                        (XValue::Ordinal(ordinal), ordinal as f64)
                    }
                }
            }
        };

        self.label_to_key.insert(label.clone(), key);
        self.key_labels
            .entry(OrderedFloat(key))
            .or_insert_with(|| label.clone());
        (x_value, key, label)
    }

    fn fallback_ordinal(&mut self, label: &str) -> usize {
        self.has_fallback_labels = true;
        if let Some(ordinal) = self.fallback_ordinals.get(label) {
            return *ordinal;
        }
        let next = self.fallback_ordinals.len();
        self.fallback_ordinals.insert(label.to_owned(), next);
        next
    }
}
