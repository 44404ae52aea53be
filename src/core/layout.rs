use serde::{Deserialize, Serialize};

use crate::core::ticks::axis_tick_target_count;
use crate::core::{Margins, PlotArea, Viewport};
use crate::error::{ChartError, ChartResult};

/// Responsive layout knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutTuning {
    /// Containers narrower than this switch to compact mode.
    pub compact_width_px: f64,
    pub margins: Margins,
    pub compact_margins: Margins,
    /// Extra bottom margin reserved for rotated x labels.
    pub rotated_label_extra_px: f64,
    /// Compact charts rotate x labels above this many categories.
    pub rotate_labels_above: usize,
    pub x_tick_spacing_px: f64,
    pub compact_x_tick_spacing_px: f64,
    pub y_tick_spacing_px: f64,
    /// Band padding fraction (inner and outer) for bar and category axes.
    pub band_padding: f64,
}

impl Default for LayoutTuning {
    fn default() -> Self {
        Self {
            compact_width_px: 520.0,
            margins: Margins::new(16.0, 24.0, 32.0, 52.0),
            compact_margins: Margins::new(8.0, 12.0, 26.0, 38.0),
            rotated_label_extra_px: 22.0,
            rotate_labels_above: 6,
            x_tick_spacing_px: 72.0,
            compact_x_tick_spacing_px: 96.0,
            y_tick_spacing_px: 48.0,
            band_padding: 0.2,
        }
    }
}

impl LayoutTuning {
    pub fn validate(self) -> ChartResult<Self> {
        if !self.compact_width_px.is_finite() || self.compact_width_px < 0.0 {
            return Err(ChartError::InvalidConfig(
                "compact width threshold must be finite and >= 0".to_owned(),
            ));
        }
        for (name, margins) in [("margins", self.margins), ("compact margins", self.compact_margins)] {
            for side in [margins.top, margins.right, margins.bottom, margins.left] {
                if !side.is_finite() || side < 0.0 {
                    return Err(ChartError::InvalidConfig(format!(
                        "{name} must be finite and >= 0"
                    )));
                }
            }
        }
        for spacing in [
            self.x_tick_spacing_px,
            self.compact_x_tick_spacing_px,
            self.y_tick_spacing_px,
        ] {
            if !spacing.is_finite() || spacing <= 0.0 {
                return Err(ChartError::InvalidConfig(
                    "tick spacing must be finite and > 0".to_owned(),
                ));
            }
        }
        if !(0.0..1.0).contains(&self.band_padding) {
            return Err(ChartError::InvalidConfig(
                "band padding must be in [0, 1)".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Layout resolved for one container size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResponsiveLayout {
    pub plot: PlotArea,
    pub compact: bool,
    pub rotate_x_labels: bool,
    pub x_tick_count: usize,
    pub y_tick_count: usize,
}

impl ResponsiveLayout {
    #[must_use]
    pub fn resolve(viewport: Viewport, tuning: LayoutTuning, category_count: usize) -> Self {
        let compact = f64::from(viewport.width) < tuning.compact_width_px;
        let rotate_x_labels = compact && category_count > tuning.rotate_labels_above;

        let mut margins = if compact {
            tuning.compact_margins
        } else {
            tuning.margins
        };
        if rotate_x_labels {
            margins.bottom += tuning.rotated_label_extra_px;
        }

        let plot = PlotArea::from_viewport(viewport, margins);
        let (x_spacing, x_max) = if compact {
            (tuning.compact_x_tick_spacing_px, 6)
        } else {
            (tuning.x_tick_spacing_px, 14)
        };
        let x_tick_count = axis_tick_target_count(plot.width, x_spacing, 2, x_max);
        let y_tick_count =
            axis_tick_target_count(plot.height, tuning.y_tick_spacing_px, 2, if compact { 5 } else { 8 });

        Self {
            plot,
            compact,
            rotate_x_labels,
            x_tick_count,
            y_tick_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LayoutTuning, ResponsiveLayout};
    use crate::core::Viewport;

    #[test]
    fn narrow_containers_switch_to_compact() {
        let tuning = LayoutTuning::default();
        let wide = ResponsiveLayout::resolve(Viewport::new(900, 400), tuning, 12);
        let narrow = ResponsiveLayout::resolve(Viewport::new(360, 400), tuning, 12);

        assert!(!wide.compact);
        assert!(narrow.compact);
        assert!(narrow.rotate_x_labels);
        assert!(!wide.rotate_x_labels);
        assert!(narrow.x_tick_count <= wide.x_tick_count);
        assert!(narrow.plot.left < wide.plot.left);
    }

    #[test]
    fn zero_size_viewport_is_not_drawable() {
        let layout = ResponsiveLayout::resolve(Viewport::new(0, 0), LayoutTuning::default(), 4);
        assert!(!layout.plot.is_drawable());
    }
}
