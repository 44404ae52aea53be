use tracing::{debug, trace};

use crate::core::{
    ChartBars, ChartConfig, NormalizeOptions, NormalizedData, ResolvedScales, Viewport,
    compose_chart_bars, resolve_scales,
};
use crate::render::Renderer;

use super::ChartEngine;
use super::decorations::ProjectedKeys;
use super::engine::{LoadedChart, focus_request};

impl<R: Renderer> ChartEngine<R> {
    /// Loads `chart`, replacing the previous one.
    ///
    /// Hover and pin state are reset: a new config starts from `Idle`.
    pub fn set_chart(&mut self, chart: ChartConfig) {
        let options = NormalizeOptions::from_config(&chart);
        let data = self.cache.get_or_normalize(&chart, options);
        let bars = compose_chart_bars(&chart, &data);
        let projected = ProjectedKeys::resolve(&data, &chart.decorations.projected);
        let request = focus_request(&chart, &data, &self.config);
        let scales = resolve_scales(&data, &chart, &bars, self.viewport, self.config.layout);

        debug!(
            title = %chart.title,
            series_count = data.series.len(),
            key_count = data.keys.len(),
            duplicates = data.duplicates.len(),
            drawable = scales.is_some(),
            "chart loaded"
        );

        self.chart = Some(LoadedChart {
            config: chart,
            data,
            bars,
            projected,
            request,
            scales,
        });
        self.interaction.reset();
        self.animation = self.config.animation;
    }

    pub fn clear_chart(&mut self) {
        self.chart = None;
        self.interaction.reset();
    }

    /// Applies an observed container size.
    ///
    /// Repeated reports of the same size are coalesced and return `false`.
    /// Hover and pin survive a resize since they are stored as keys.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        if viewport == self.viewport {
            trace!(
                width = viewport.width,
                height = viewport.height,
                "resize coalesced"
            );
            return false;
        }

        self.viewport = viewport;
        if let Some(chart) = self.chart.as_mut() {
            chart.scales = resolve_scales(
                &chart.data,
                &chart.config,
                &chart.bars,
                viewport,
                self.config.layout,
            );
        }
        true
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn chart(&self) -> Option<&ChartConfig> {
        self.chart.as_ref().map(|chart| &chart.config)
    }

    #[must_use]
    pub fn data(&self) -> Option<&NormalizedData> {
        self.chart.as_ref().map(|chart| chart.data.as_ref())
    }

    #[must_use]
    pub fn bars(&self) -> Option<&ChartBars> {
        self.chart.as_ref().map(|chart| &chart.bars)
    }

    #[must_use]
    pub fn scales(&self) -> Option<&ResolvedScales> {
        self.chart.as_ref().and_then(|chart| chart.scales.as_ref())
    }

    #[must_use]
    pub fn projected_keys(&self) -> Option<&ProjectedKeys> {
        self.chart.as_ref().map(|chart| &chart.projected)
    }
}
