//! Optional chart decorations: rating zones, projected periods and scatter
//! connect lines.

use ordered_float::OrderedFloat;

use crate::core::{
    NormalizedData, NormalizedPoint, NormalizedSeries, ProjectedSegments, RatingZone,
    ResolvedScales, ZoneLabelPosition,
};
use crate::render::{
    CanvasLayerKind, Color, LinePrimitive, LineStrokeStyle, RectPrimitive, RenderFrame,
    TextHAlign, TextPrimitive,
};

use super::render_style::{RenderStyle, fade};

/// Keys drawn with projected (forecast) styling.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectedKeys {
    /// First projected position in display order.
    pub start_index: Option<usize>,
    keys: Vec<OrderedFloat<f64>>,
}

impl ProjectedKeys {
    /// Trailing `N` keys and keys after `after_label` are projected; when
    /// both are set the earlier start wins. An unknown label projects nothing.
    #[must_use]
    pub fn resolve(data: &NormalizedData, projected: &ProjectedSegments) -> Self {
        let len = data.keys.len();
        let from_trailing = projected
            .trailing
            .filter(|count| *count > 0)
            .map(|count| len.saturating_sub(count));
        let from_label = projected
            .after_label
            .as_deref()
            .and_then(|label| data.key_for_label(label))
            .and_then(|key| data.key_index(key))
            .map(|idx| idx + 1)
            .filter(|start| *start < len);

        let start_index = match (from_trailing, from_label) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        let mut keys: Vec<OrderedFloat<f64>> = start_index
            .map(|start| data.keys[start..].iter().copied().map(OrderedFloat).collect())
            .unwrap_or_default();
        keys.sort();

        Self { start_index, keys }
    }

    #[must_use]
    pub fn contains(&self, key: f64) -> bool {
        self.keys.binary_search(&OrderedFloat(key)).is_ok()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }
}

/// Horizontal rating bands behind the plot, clipped to the y domain.
pub fn push_rating_zones(
    frame: &mut RenderFrame,
    zones: &[RatingZone],
    scales: &ResolvedScales,
    style: &RenderStyle,
) {
    let plot = scales.plot();
    let (domain_min, domain_max) = scales.y_domain();

    for (zone_index, zone) in zones.iter().enumerate() {
        let low = zone.from.min(zone.to).clamp(domain_min, domain_max);
        let high = zone.from.max(zone.to).clamp(domain_min, domain_max);
        if high <= low {
            continue;
        }

        let top = plot.top + scales.y.map(high);
        let bottom = plot.top + scales.y.map(low);
        let base = zone
            .color
            .as_deref()
            .and_then(|hex| Color::from_hex(hex).ok())
            .unwrap_or_else(|| style.palette_color(zone_index));

        frame.push_rect(
            CanvasLayerKind::Background,
            RectPrimitive::new(
                plot.left,
                top,
                plot.width,
                bottom - top,
                fade(base, style.rating_zone_alpha),
            ),
        );

        if zone.label.trim().is_empty() {
            continue;
        }
        let font = style.rating_zone_label_font_size_px;
        let label = match zone.label_position {
            ZoneLabelPosition::Inside => TextPrimitive::new(
                zone.label.clone(),
                plot.left + 6.0,
                top + 4.0,
                font,
                style.rating_zone_label_color,
                TextHAlign::Left,
            ),
            ZoneLabelPosition::Outside => TextPrimitive::new(
                zone.label.clone(),
                plot.right() + 6.0,
                (top + bottom) / 2.0 - font / 2.0,
                font,
                style.rating_zone_label_color,
                TextHAlign::Left,
            ),
        };
        frame.push_text(CanvasLayerKind::Background, label);
    }
}

/// Points of `series` whose label is listed in `connect_labels`, in x order.
#[must_use]
pub fn connected_points<'a>(
    series: &'a NormalizedSeries,
    connect_labels: &[String],
) -> Vec<&'a NormalizedPoint> {
    let mut points: Vec<&NormalizedPoint> = series
        .points
        .iter()
        .filter(|point| connect_labels.iter().any(|label| *label == point.label))
        .collect();
    points.sort_by(|a, b| a.x_key.total_cmp(&b.x_key));
    points
}

/// Line through the selected scatter markers only; other markers stay loose.
pub fn push_scatter_connect_lines(
    frame: &mut RenderFrame,
    series: &NormalizedSeries,
    connect_labels: &[String],
    scales: &ResolvedScales,
    color: Color,
    stroke_width: f64,
) {
    let plot = scales.plot();
    let positions: Vec<(f64, f64)> = connected_points(series, connect_labels)
        .into_iter()
        .filter_map(|point| {
            scales
                .x
                .map_key(point.x_key)
                .map(|x| (plot.left + x, plot.top + scales.y.map(point.value)))
        })
        .collect();

    for pair in positions.windows(2) {
        let (x1, y1) = pair[0];
        let (x2, y2) = pair[1];
        frame.push_line(
            CanvasLayerKind::Overlay,
            LinePrimitive::new(x1, y1, x2, y2, stroke_width, color)
                .with_stroke_style(LineStrokeStyle::Dotted),
        );
    }
}
