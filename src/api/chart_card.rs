use tracing::debug;

use crate::core::{ChartConfig, Viewport};
use crate::error::ChartResult;
use crate::render::Renderer;

use super::{ChartEngine, ChartEngineConfig};

/// Keys a chart card reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKey {
    Escape,
    Other,
}

/// A chart card with an optional fullscreen modal.
///
/// Fullscreen is orthogonal to hover/pin: opening it mounts a second engine
/// with its own fresh `InteractionState` at the modal size, and the inline
/// engine keeps whatever pin it had. Body scroll stays locked while the
/// modal is open.
pub struct ChartCard<R: Renderer> {
    inline: ChartEngine<R>,
    fullscreen: Option<ChartEngine<R>>,
    body_scroll_locked: bool,
}

impl<R: Renderer> ChartCard<R> {
    pub fn new(renderer: R, config: ChartEngineConfig, chart: ChartConfig) -> ChartResult<Self> {
        let mut inline = ChartEngine::new(renderer, config)?;
        inline.set_chart(chart);
        Ok(Self {
            inline,
            fullscreen: None,
            body_scroll_locked: false,
        })
    }

    #[must_use]
    pub fn inline(&self) -> &ChartEngine<R> {
        &self.inline
    }

    pub fn inline_mut(&mut self) -> &mut ChartEngine<R> {
        &mut self.inline
    }

    #[must_use]
    pub fn fullscreen(&self) -> Option<&ChartEngine<R>> {
        self.fullscreen.as_ref()
    }

    pub fn fullscreen_mut(&mut self) -> Option<&mut ChartEngine<R>> {
        self.fullscreen.as_mut()
    }

    /// Engine receiving pointer input: the modal while it is open.
    pub fn active_engine_mut(&mut self) -> &mut ChartEngine<R> {
        match self.fullscreen.as_mut() {
            Some(engine) => engine,
            None => &mut self.inline,
        }
    }

    #[must_use]
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen.is_some()
    }

    #[must_use]
    pub fn body_scroll_locked(&self) -> bool {
        self.body_scroll_locked
    }

    /// Opens the modal at `viewport` with `renderer`.
    ///
    /// Returns `Ok(false)` when the chart disallows fullscreen, no chart is
    /// loaded, or the modal is already open.
    pub fn open_fullscreen(&mut self, renderer: R, viewport: Viewport) -> ChartResult<bool> {
        if self.fullscreen.is_some() {
            return Ok(false);
        }
        let Some(chart) = self.inline.chart().cloned() else {
            return Ok(false);
        };
        if !chart.allow_fullscreen {
            debug!(title = %chart.title, "fullscreen not allowed for chart");
            return Ok(false);
        }

        let mut config = self.inline.config().clone();
        config.viewport = viewport;
        let mut engine = ChartEngine::new(renderer, config)?;
        engine.set_style(self.inline.style().clone());
        engine.set_chart(chart);

        self.fullscreen = Some(engine);
        self.body_scroll_locked = true;
        Ok(true)
    }

    /// Closes the modal; returns whether one was open.
    pub fn close_fullscreen(&mut self) -> bool {
        let was_open = self.fullscreen.take().is_some();
        self.body_scroll_locked = false;
        was_open
    }

    /// Escape closes the modal.
    pub fn on_key(&mut self, key: CardKey) -> bool {
        match key {
            CardKey::Escape => self.close_fullscreen(),
            CardKey::Other => false,
        }
    }

    pub fn on_backdrop_click(&mut self) -> bool {
        self.close_fullscreen()
    }

    /// Replaces the chart in every mounted engine; interaction resets.
    pub fn set_chart(&mut self, chart: ChartConfig) {
        if let Some(engine) = self.fullscreen.as_mut() {
            engine.set_chart(chart.clone());
        }
        self.inline.set_chart(chart);
    }

    pub fn render(&mut self) -> ChartResult<()> {
        self.inline.render()?;
        if let Some(engine) = self.fullscreen.as_mut() {
            engine.render()?;
        }
        Ok(())
    }
}
