use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::interaction::{
    Focus, HoverSource, InteractionState, LeaveOutcome, PinChange, PointerPhase,
    resolve_key_focus, resolve_pointer_focus, snap_key,
};
use crate::render::Renderer;

use super::ChartEngine;
use super::tooltip::{TooltipContent, TooltipPlacement, build_tooltip, place_tooltip};

/// Tooltip content with its resolved placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipView {
    pub content: TooltipContent,
    pub placement: TooltipPlacement,
}

impl<R: Renderer> ChartEngine<R> {
    /// Handles a pointer move at container coordinates `(x, y)`.
    ///
    /// Returns the resulting focus, or `None` when nothing is drawable.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<Focus> {
        let key = self.snap_container_x(x);
        self.interaction.on_pointer_move(x, y, key);
        trace!(x, y, key = ?key, "pointer move");
        key.and_then(|_| self.focus())
    }

    pub fn pointer_leave(&mut self) -> LeaveOutcome {
        self.interaction.on_pointer_leave()
    }

    /// Click at `(x, y)`: toggles the pin on the snapped label.
    pub fn click(&mut self, x: f64, y: f64) -> Option<PinChange> {
        self.pointer_move(x, y)?;
        let key = self.interaction.hovered_key()?;
        let label = self.data()?.label_for_key(key)?.to_owned();
        Some(self.interaction.on_click(&label, key))
    }

    /// External-hover API: mirrors another chart's active label.
    ///
    /// Looks the key up by label, bypassing pointer math. `None` clears the
    /// external hover; an unknown label clears it too and returns `false`.
    pub fn set_active_label(&mut self, label: Option<&str>) -> bool {
        let key = label.and_then(|label| self.data().and_then(|data| data.key_for_label(label)));
        self.interaction.set_external_hover(key);
        key.is_some()
    }

    /// Label of the currently hovered key, for mirroring into other charts.
    #[must_use]
    pub fn hovered_label(&self) -> Option<&str> {
        let key = self.interaction.hovered_key()?;
        self.data()?.label_for_key(key)
    }

    #[must_use]
    pub fn phase(&self) -> PointerPhase {
        self.interaction.phase()
    }

    #[must_use]
    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// Focus for the active key: the hover if any, else the pin.
    ///
    /// A pointer hover keeps y proximity; external hovers and pins resolve
    /// by key alone.
    #[must_use]
    pub fn focus(&self) -> Option<Focus> {
        let chart = self.chart.as_ref()?;
        let scales = chart.scales.as_ref()?;
        let plot = scales.plot();

        match (
            self.interaction.hovered_key(),
            self.interaction.hover_source(),
            self.interaction.pointer(),
        ) {
            (Some(_), Some(HoverSource::Pointer), Some((x, y))) => resolve_pointer_focus(
                &chart.data,
                scales,
                chart.request,
                x - plot.left,
                Some(y - plot.top),
            ),
            _ => {
                let key = self.interaction.active_key()?;
                resolve_key_focus(&chart.data, scales, chart.request, key)
            }
        }
    }

    /// Tooltip for the current focus, or `None` when hidden.
    #[must_use]
    pub fn tooltip(&self) -> Option<TooltipView> {
        let chart = self.chart.as_ref()?;
        let scales = chart.scales.as_ref()?;
        let focus = self.focus()?;
        let content = build_tooltip(&chart.config, &chart.data, &focus, &chart.projected, &self.style)?;

        let plot = scales.plot();
        let pointer = self
            .interaction
            .pointer()
            .or(Some((plot.left + focus.x_px, plot.top)));
        let container = (
            f64::from(self.viewport.width),
            f64::from(self.viewport.height),
        );
        let placement = place_tooltip(&self.config.tooltip, pointer, container)?;
        Some(TooltipView { content, placement })
    }

    fn snap_container_x(&self, x: f64) -> Option<f64> {
        let chart = self.chart.as_ref()?;
        let scales = chart.scales.as_ref()?;
        snap_key(&chart.data.sorted_keys, &scales.x, x - scales.plot().left)
    }
}
