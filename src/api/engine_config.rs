use serde::{Deserialize, Serialize};

use crate::core::{LayoutTuning, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::interaction::HitTestTuning;

/// Where a fixed tooltip is docked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "kebab-case")]
pub enum TooltipAnchor {
    /// The chart card header.
    Header,
    /// A host-supplied node, e.g. a deck-wide legend panel.
    External(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum TooltipMode {
    /// Follows the pointer, clamped to the container.
    #[default]
    Floating,
    Fixed { anchor: TooltipAnchor },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipTuning {
    #[serde(default)]
    pub mode: TooltipMode,
    /// Distance between pointer and floating tooltip.
    #[serde(default = "default_tooltip_offset_px")]
    pub offset_px: f64,
    /// Expected tooltip box size, used for edge flipping.
    #[serde(default = "default_tooltip_size_hint")]
    pub size_hint: (f64, f64),
}

impl Default for TooltipTuning {
    fn default() -> Self {
        Self {
            mode: TooltipMode::Floating,
            offset_px: default_tooltip_offset_px(),
            size_hint: default_tooltip_size_hint(),
        }
    }
}

/// Bar entry animation: grow from the baseline, staggered per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryAnimation {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_animation_duration_ms")]
    pub duration_ms: u32,
    #[serde(default = "default_animation_stagger_ms")]
    pub stagger_ms: u32,
}

impl Default for EntryAnimation {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: default_animation_duration_ms(),
            stagger_ms: default_animation_stagger_ms(),
        }
    }
}

impl EntryAnimation {
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn delay_for(self, index: usize) -> u32 {
        u32::try_from(index)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.stagger_ms)
    }
}

/// Public engine bootstrap configuration.
///
/// This type is serializable so host applications can persist/load chart setup
/// without inventing their own ad-hoc format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartEngineConfig {
    pub viewport: Viewport,
    #[serde(default)]
    pub layout: LayoutTuning,
    #[serde(default)]
    pub hit_test: HitTestTuning,
    #[serde(default)]
    pub tooltip: TooltipTuning,
    #[serde(default)]
    pub animation: EntryAnimation,
    /// Segment labels are hidden unless taller than this pixel height.
    #[serde(default = "default_segment_label_min_px")]
    pub segment_label_min_px: f64,
    /// Normalized datasets kept by the engine's memo cache.
    #[serde(default = "default_series_cache_capacity")]
    pub series_cache_capacity: usize,
}

impl ChartEngineConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            layout: LayoutTuning::default(),
            hit_test: HitTestTuning::default(),
            tooltip: TooltipTuning::default(),
            animation: EntryAnimation::default(),
            segment_label_min_px: default_segment_label_min_px(),
            series_cache_capacity: default_series_cache_capacity(),
        }
    }

    #[must_use]
    pub fn with_layout(mut self, layout: LayoutTuning) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn with_hit_test(mut self, hit_test: HitTestTuning) -> Self {
        self.hit_test = hit_test;
        self
    }

    #[must_use]
    pub fn with_tooltip_mode(mut self, mode: TooltipMode) -> Self {
        self.tooltip.mode = mode;
        self
    }

    #[must_use]
    pub fn with_animation(mut self, animation: EntryAnimation) -> Self {
        self.animation = animation;
        self
    }

    #[must_use]
    pub fn with_segment_label_min_px(mut self, min_px: f64) -> Self {
        self.segment_label_min_px = min_px;
        self
    }

    /// Checks every tunable. A zero-size viewport is allowed: layout may not
    /// have settled yet and rendering simply waits for the next resize.
    pub fn validate(&self) -> ChartResult<()> {
        self.layout.validate()?;
        self.hit_test.validate()?;

        let (width, height) = self.tooltip.size_hint;
        if !self.tooltip.offset_px.is_finite() || self.tooltip.offset_px < 0.0 {
            return Err(ChartError::InvalidConfig(
                "tooltip offset must be finite and >= 0".to_owned(),
            ));
        }
        if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
            return Err(ChartError::InvalidConfig(
                "tooltip size hint must be finite and >= 0".to_owned(),
            ));
        }
        if let TooltipMode::Fixed {
            anchor: TooltipAnchor::External(id),
        } = &self.tooltip.mode
        {
            if id.trim().is_empty() {
                return Err(ChartError::InvalidConfig(
                    "external tooltip anchor id must not be empty".to_owned(),
                ));
            }
        }
        if !self.segment_label_min_px.is_finite() || self.segment_label_min_px < 0.0 {
            return Err(ChartError::InvalidConfig(
                "segment label min height must be finite and >= 0".to_owned(),
            ));
        }
        if self.series_cache_capacity == 0 {
            return Err(ChartError::InvalidConfig(
                "series cache capacity must be > 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Serializes config to pretty JSON.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::Serialization(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::Serialization(format!("failed to parse config: {e}")))
    }
}

fn default_true() -> bool {
    true
}

fn default_tooltip_offset_px() -> f64 {
    12.0
}

fn default_tooltip_size_hint() -> (f64, f64) {
    (220.0, 120.0)
}

fn default_animation_duration_ms() -> u32 {
    600
}

fn default_animation_stagger_ms() -> u32 {
    40
}

fn default_segment_label_min_px() -> f64 {
    14.0
}

fn default_series_cache_capacity() -> usize {
    32
}
