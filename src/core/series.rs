use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::AxisKind;
use crate::core::primitives::decimal_to_f64;
use crate::error::{ChartError, ChartResult};

/// Raw x value as written in slide data: a date/category label or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawX {
    Number(f64),
    Text(String),
}

impl RawX {
    /// Label used for display and for the external-hover lookup.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(value) => format_number_label(*value),
        }
    }
}

impl From<&str> for RawX {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for RawX {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for RawX {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

#[must_use]
pub fn format_number_label(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// One input sample.
///
/// `metrics` carries secondary named values (for example tenor or spread)
/// shown in grouped tooltips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPoint {
    pub x: RawX,
    pub value: f64,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub metrics: IndexMap<String, f64>,
}

impl RawPoint {
    #[must_use]
    pub fn new(x: impl Into<RawX>, value: f64) -> Self {
        Self {
            x: x.into(),
            value,
            metrics: IndexMap::new(),
        }
    }

    pub fn from_decimal(x: impl Into<RawX>, value: Decimal) -> ChartResult<Self> {
        Ok(Self::new(x, decimal_to_f64(value, "point value")?))
    }

    #[must_use]
    pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }
}

/// Line/bar series with identity, optional color and ordered points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub points: Vec<RawPoint>,
}

impl Series {
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>, points: Vec<RawPoint>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color: None,
            unit: None,
            points,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

/// Stroke/fill styling for secondary bar layers.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BarStyle {
    #[serde(default)]
    pub hollow: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default)]
    pub dashed: bool,
}

/// Bar series used by stacked, grouped and overlay layouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    #[serde(flatten)]
    pub series: Series,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_group: Option<String>,
    #[serde(default)]
    pub style: BarStyle,
}

impl BarSeries {
    #[must_use]
    pub fn new(series: Series) -> Self {
        Self {
            series,
            stack_group: None,
            style: BarStyle::default(),
        }
    }

    #[must_use]
    pub fn with_stack_group(mut self, group: impl Into<String>) -> Self {
        self.stack_group = Some(group.into());
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: BarStyle) -> Self {
        self.style = style;
        self
    }
}

/// Composition of several bar series inside one category band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BarLayout {
    #[default]
    Stacked,
    Grouped,
    Mixed,
}

/// Scatter rendering for line charts (spread-vs-tenor style charts).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterOptions {
    /// Zero means "no event that period" and is dropped from points, tooltip
    /// rows and the value domain.
    #[serde(default)]
    pub skip_zero: bool,
    /// Labels of the points joined by the connect line; unlisted points stay
    /// unconnected.
    #[serde(default)]
    pub connect_labels: Vec<String>,
    #[serde(default = "default_point_radius")]
    pub point_radius: f64,
}

impl Default for ScatterOptions {
    fn default() -> Self {
        Self {
            skip_zero: false,
            connect_labels: Vec::new(),
            point_radius: default_point_radius(),
        }
    }
}

fn default_point_radius() -> f64 {
    4.0
}

/// Chart kind with its series payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ChartKind {
    Line {
        series: Vec<Series>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        scatter: Option<ScatterOptions>,
    },
    Bar {
        series: Vec<Series>,
        /// Secondary bar layers drawn behind the primary bars.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        overlays: Vec<BarSeries>,
        #[serde(default)]
        overlay_layout: BarLayout,
    },
    StackedBar {
        series: Vec<BarSeries>,
    },
    GroupedBar {
        series: Vec<BarSeries>,
    },
}

/// Where a rating-zone label is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZoneLabelPosition {
    #[default]
    Inside,
    Outside,
}

/// Horizontal background band marking a qualitative threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingZone {
    pub from: f64,
    pub to: f64,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub label_position: ZoneLabelPosition,
}

/// Forecast styling for trailing categories.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectedSegments {
    /// Number of trailing x-keys drawn as projected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailing: Option<usize>,
    /// Keys strictly after this label are projected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_label: Option<String>,
}

impl ProjectedSegments {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trailing.is_none() && self.after_label.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Decorations {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rating_zones: Vec<RatingZone>,
    #[serde(default, skip_serializing_if = "ProjectedSegments::is_empty")]
    pub projected: ProjectedSegments,
}

/// Explicit y-axis overrides.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct YAxisOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_values: Option<Vec<f64>>,
}

/// X tick label formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TickFormat {
    /// Original input label.
    #[default]
    Label,
    /// `31/12/25` becomes `25`.
    ShortYear,
    /// Numeric rounding driven by the axis maximum.
    Magnitude,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XAxisOptions {
    #[serde(default)]
    pub kind: AxisKind,
    /// Sort points ascending by key; disable to keep input order.
    /// Category keys are first-seen ordinals, so categories never reorder.
    #[serde(default = "default_true")]
    pub sort: bool,
    #[serde(default)]
    pub tick_format: TickFormat,
    /// Explicit tick labels; replaces the generated tick set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_labels: Option<Vec<String>>,
}

impl Default for XAxisOptions {
    fn default() -> Self {
        Self {
            kind: AxisKind::default(),
            sort: true,
            tick_format: TickFormat::default(),
            tick_labels: None,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TooltipOptions {
    /// Nest rows per series into named metric groups.
    #[serde(default)]
    pub grouped: bool,
}

/// Chart document produced by the slide data layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(flatten)]
    pub kind: ChartKind,
    #[serde(default)]
    pub x_axis: XAxisOptions,
    #[serde(default)]
    pub y_axis: YAxisOptions,
    #[serde(default)]
    pub decorations: Decorations,
    #[serde(default)]
    pub tooltip: TooltipOptions,
    #[serde(default = "default_true")]
    pub allow_fullscreen: bool,
}

impl ChartConfig {
    #[must_use]
    pub fn new(title: impl Into<String>, kind: ChartKind) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            unit: None,
            kind,
            x_axis: XAxisOptions::default(),
            y_axis: YAxisOptions::default(),
            decorations: Decorations::default(),
            tooltip: TooltipOptions::default(),
            allow_fullscreen: true,
        }
    }

    #[must_use]
    pub fn line(title: impl Into<String>, series: Vec<Series>) -> Self {
        Self::new(
            title,
            ChartKind::Line {
                series,
                scatter: None,
            },
        )
    }

    #[must_use]
    pub fn bar(title: impl Into<String>, series: Vec<Series>) -> Self {
        Self::new(
            title,
            ChartKind::Bar {
                series,
                overlays: Vec::new(),
                overlay_layout: BarLayout::default(),
            },
        )
    }

    #[must_use]
    pub fn stacked_bar(title: impl Into<String>, series: Vec<BarSeries>) -> Self {
        Self::new(title, ChartKind::StackedBar { series })
    }

    #[must_use]
    pub fn grouped_bar(title: impl Into<String>, series: Vec<BarSeries>) -> Self {
        Self::new(title, ChartKind::GroupedBar { series })
    }

    #[must_use]
    pub fn with_x_axis(mut self, kind: AxisKind) -> Self {
        self.x_axis.kind = kind;
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: bool) -> Self {
        self.x_axis.sort = sort;
        self
    }

    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    #[must_use]
    pub fn with_y_axis(mut self, y_axis: YAxisOptions) -> Self {
        self.y_axis = y_axis;
        self
    }

    #[must_use]
    pub fn with_decorations(mut self, decorations: Decorations) -> Self {
        self.decorations = decorations;
        self
    }

    #[must_use]
    pub fn with_grouped_tooltip(mut self, grouped: bool) -> Self {
        self.tooltip.grouped = grouped;
        self
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to parse chart config: {e}")))
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::Serialization(format!("failed to serialize chart config: {e}"))
        })
    }

    /// Whether zero values are dropped from points, tooltips and domains.
    #[must_use]
    pub fn skip_zero(&self) -> bool {
        matches!(
            &self.kind,
            ChartKind::Line {
                scatter: Some(ScatterOptions {
                    skip_zero: true,
                    ..
                }),
                ..
            }
        )
    }

    #[must_use]
    pub fn is_bar_kind(&self) -> bool {
        !matches!(self.kind, ChartKind::Line { .. })
    }

    /// Every series in draw order, primary series first.
    #[must_use]
    pub fn all_series(&self) -> Vec<&Series> {
        match &self.kind {
            ChartKind::Line { series, .. } => series.iter().collect(),
            ChartKind::Bar {
                series, overlays, ..
            } => series
                .iter()
                .chain(overlays.iter().map(|bar| &bar.series))
                .collect(),
            ChartKind::StackedBar { series } | ChartKind::GroupedBar { series } => {
                series.iter().map(|bar| &bar.series).collect()
            }
        }
    }
}
