use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::interaction::{Focus, PointerPhase};
use crate::render::{CanvasLayerKind, RenderFrame, Renderer};

use super::ChartEngine;
use super::series_cache::SeriesCacheStats;
use super::tooltip::TooltipContent;

/// Primitive counts per layer of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSummary {
    pub kind: CanvasLayerKind,
    pub rects: usize,
    pub lines: usize,
    pub circles: usize,
    pub texts: usize,
}

/// Serializable deterministic state snapshot used by regression tests and
/// debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub viewport: Viewport,
    pub title: Option<String>,
    pub phase: PointerPhase,
    pub hovered_label: Option<String>,
    pub pinned_label: Option<String>,
    /// Tick universe labels in display order.
    pub keys: Vec<String>,
    pub has_fallback_labels: bool,
    pub duplicate_keys: usize,
    pub y_domain: Option<(f64, f64)>,
    pub compact: Option<bool>,
    pub focus: Option<Focus>,
    pub tooltip: Option<TooltipContent>,
    pub layers: Vec<LayerSummary>,
    pub series_cache: SeriesCacheStats,
}

impl<R: Renderer> ChartEngine<R> {
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        let data = self.data();
        let scales = self.scales();
        EngineSnapshot {
            viewport: self.viewport,
            title: self.chart().map(|chart| chart.title.clone()),
            phase: self.phase(),
            hovered_label: self.hovered_label().map(str::to_owned),
            pinned_label: self.interaction.pinned_label().map(str::to_owned),
            keys: data
                .map(|data| {
                    data.keys
                        .iter()
                        .filter_map(|key| data.label_for_key(*key).map(str::to_owned))
                        .collect()
                })
                .unwrap_or_default(),
            has_fallback_labels: data.is_some_and(|data| data.has_fallback_labels),
            duplicate_keys: data.map_or(0, |data| data.duplicates.len()),
            y_domain: scales.map(|scales| scales.y_domain()),
            compact: scales.map(|scales| scales.layout.compact),
            focus: self.focus(),
            tooltip: self.tooltip().map(|view| view.content),
            layers: self
                .build_frame()
                .map(|frame| summarize_layers(&frame))
                .unwrap_or_default(),
            series_cache: self.cache_stats(),
        }
    }
}

fn summarize_layers(frame: &RenderFrame) -> Vec<LayerSummary> {
    frame
        .layers
        .iter()
        .map(|layer| LayerSummary {
            kind: layer.kind,
            rects: layer.rects.len(),
            lines: layer.lines.len(),
            circles: layer.circles.len(),
            texts: layer.texts.len(),
        })
        .collect()
}
