use serde::{Deserialize, Serialize};

use crate::core::NormalizedSeries;
use crate::render::{Color, LineStrokeStyle};

/// Colors, stroke widths and font sizes used by the frame builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderStyle {
    /// Fallback series colors, cycled by series index.
    pub palette: Vec<Color>,
    pub grid_line_color: Color,
    pub grid_line_width: f64,
    pub axis_line_color: Color,
    pub axis_line_width: f64,
    pub axis_label_color: Color,
    pub axis_label_font_size_px: f64,
    pub segment_label_color: Color,
    pub segment_label_font_size_px: f64,
    pub series_line_width: f64,
    pub line_point_radius: f64,
    pub bar_corner_radius: f64,
    /// Gap between columns of one category band.
    pub bar_slot_gap_px: f64,
    pub hollow_bar_stroke_width: f64,
    pub focus_guide_color: Color,
    pub focus_guide_style: LineStrokeStyle,
    pub focus_band_color: Color,
    pub focus_marker_stroke_color: Color,
    /// Alpha multiplier for series and categories outside the focus.
    pub dimmed_alpha: f64,
    /// Alpha multiplier for projected (forecast) marks.
    pub projected_alpha: f64,
    pub rating_zone_alpha: f64,
    pub rating_zone_label_color: Color,
    pub rating_zone_label_font_size_px: f64,
    /// Clockwise rotation applied to x labels in rotated layouts.
    pub rotated_label_deg: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        let ink = Color::rgb(0.25, 0.28, 0.33);
        Self {
            palette: vec![
                Color::rgb(0.0, 0.30, 0.55),
                Color::rgb(0.0, 0.62, 0.60),
                Color::rgb(0.96, 0.60, 0.13),
                Color::rgb(0.55, 0.35, 0.64),
                Color::rgb(0.84, 0.25, 0.27),
                Color::rgb(0.45, 0.50, 0.55),
            ],
            grid_line_color: Color::rgba(0.60, 0.63, 0.67, 0.35),
            grid_line_width: 1.0,
            axis_line_color: Color::rgba(0.25, 0.28, 0.33, 0.8),
            axis_line_width: 1.0,
            axis_label_color: ink,
            axis_label_font_size_px: 11.0,
            segment_label_color: Color::rgb(1.0, 1.0, 1.0),
            segment_label_font_size_px: 10.0,
            series_line_width: 2.0,
            line_point_radius: 3.0,
            bar_corner_radius: 2.0,
            bar_slot_gap_px: 2.0,
            hollow_bar_stroke_width: 1.5,
            focus_guide_color: Color::rgba(0.25, 0.28, 0.33, 0.6),
            focus_guide_style: LineStrokeStyle::Dashed,
            focus_band_color: Color::rgba(0.25, 0.28, 0.33, 0.08),
            focus_marker_stroke_color: Color::rgb(1.0, 1.0, 1.0),
            dimmed_alpha: 0.3,
            projected_alpha: 0.45,
            rating_zone_alpha: 0.12,
            rating_zone_label_color: ink,
            rating_zone_label_font_size_px: 10.0,
            rotated_label_deg: -35.0,
        }
    }
}

impl RenderStyle {
    /// Color of `series`: its configured hex color, else the palette entry.
    ///
    /// Unparseable colors fall back to the palette silently.
    #[must_use]
    pub fn series_color(&self, series: &NormalizedSeries, series_index: usize) -> Color {
        series
            .color
            .as_deref()
            .and_then(|hex| Color::from_hex(hex).ok())
            .unwrap_or_else(|| self.palette_color(series_index))
    }

    #[must_use]
    pub fn palette_color(&self, index: usize) -> Color {
        if self.palette.is_empty() {
            return self.axis_label_color;
        }
        self.palette[index % self.palette.len()]
    }
}

/// Scales the alpha channel of `color`.
#[must_use]
pub fn fade(color: Color, factor: f64) -> Color {
    color.with_alpha((color.alpha * factor).clamp(0.0, 1.0))
}
