use std::sync::Arc;

use tracing::debug;

use crate::core::{
    AxisKind, ChartBars, ChartConfig, ChartKind, NormalizedData, ResolvedScales, Viewport,
};
use crate::error::ChartResult;
use crate::interaction::{FocusRequest, FocusSampling, InteractionState, ProximityMode};
use crate::render::{RenderFrame, Renderer};

use super::decorations::ProjectedKeys;
use super::render_frame_builder::{FrameContext, build_render_frame};
use super::render_style::RenderStyle;
use super::series_cache::{SeriesCache, SeriesCacheStats};
use super::{ChartEngineConfig, EntryAnimation};

#[cfg(feature = "cairo-backend")]
use crate::render::CairoContextRenderer;

/// Derived state of the chart currently loaded in the engine.
#[derive(Debug, Clone)]
pub(super) struct LoadedChart {
    pub(super) config: ChartConfig,
    pub(super) data: Arc<NormalizedData>,
    pub(super) bars: ChartBars,
    pub(super) projected: ProjectedKeys,
    pub(super) request: FocusRequest,
    /// `None` for empty data or a container too small to draw in.
    pub(super) scales: Option<ResolvedScales>,
}

/// Main orchestration facade consumed by host applications.
///
/// `ChartEngine` owns one chart instance: its normalized data, scales,
/// hover/pin state and renderer. Every frame is rebuilt from that state by
/// pure functions and handed to the renderer.
pub struct ChartEngine<R: Renderer> {
    pub(super) renderer: R,
    pub(super) config: ChartEngineConfig,
    pub(super) style: RenderStyle,
    pub(super) cache: SeriesCache,
    pub(super) viewport: Viewport,
    pub(super) chart: Option<LoadedChart>,
    pub(super) interaction: InteractionState,
    pub(super) animation: EntryAnimation,
}

impl<R: Renderer> ChartEngine<R> {
    /// Creates an engine without a chart.
    ///
    /// A zero-size viewport is accepted; drawing waits for `resize`.
    pub fn new(renderer: R, config: ChartEngineConfig) -> ChartResult<Self> {
        config.validate()?;
        Ok(Self {
            renderer,
            viewport: config.viewport,
            cache: SeriesCache::new(config.series_cache_capacity),
            animation: config.animation,
            config,
            style: RenderStyle::default(),
            chart: None,
            interaction: InteractionState::default(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ChartEngineConfig {
        &self.config
    }

    #[must_use]
    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: RenderStyle) {
        self.style = style;
    }

    #[must_use]
    pub fn cache_stats(&self) -> SeriesCacheStats {
        self.cache.stats()
    }

    /// Builds the scene for the current state.
    ///
    /// Returns `None` when there is nothing to draw: no chart, empty data or
    /// a container that has not been laid out yet.
    #[must_use]
    pub fn build_frame(&self) -> Option<RenderFrame> {
        let chart = self.chart.as_ref()?;
        let scales = chart.scales.as_ref()?;
        let focus = self.focus();
        Some(build_render_frame(FrameContext {
            viewport: self.viewport,
            config: &chart.config,
            data: &chart.data,
            bars: &chart.bars,
            scales,
            projected: &chart.projected,
            focus: focus.as_ref(),
            style: &self.style,
            animation: self.animation,
            segment_label_min_px: self.config.segment_label_min_px,
        }))
    }

    pub fn render(&mut self) -> ChartResult<()> {
        let Some(frame) = self.build_frame() else {
            debug!(
                width = self.viewport.width,
                height = self.viewport.height,
                "skipping render, nothing drawable yet"
            );
            return Ok(());
        };
        self.renderer.render(&frame)?;
        // Entry transitions play once; later frames draw settled geometry.
        self.animation.enabled = false;
        Ok(())
    }

    /// Renders the frame into an external cairo context.
    #[cfg(feature = "cairo-backend")]
    pub fn render_on_cairo_context(&mut self, context: &cairo::Context) -> ChartResult<()>
    where
        R: CairoContextRenderer,
    {
        let Some(frame) = self.build_frame() else {
            return Ok(());
        };
        self.renderer.render_on_cairo_context(context, &frame)
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}

/// Proximity mode and sampling for a chart kind.
pub(super) fn focus_request(
    chart: &ChartConfig,
    data: &NormalizedData,
    config: &ChartEngineConfig,
) -> FocusRequest {
    let mode = match &chart.kind {
        ChartKind::Line {
            scatter: Some(_), ..
        } => ProximityMode::Scatter,
        ChartKind::Line { .. } => ProximityMode::Line,
        ChartKind::Bar { .. } | ChartKind::StackedBar { .. } | ChartKind::GroupedBar { .. } => {
            ProximityMode::None
        }
    };
    let continuous_number_axis = data.axis == AxisKind::Number && !data.has_fallback_labels;
    let sampling = config.hit_test.sampling.unwrap_or(
        if mode != ProximityMode::None && continuous_number_axis {
            FocusSampling::Interpolated
        } else {
            FocusSampling::Snapped
        },
    );
    FocusRequest {
        mode,
        sampling,
        tuning: config.hit_test,
    }
}
