
pub use hit_test::{
    Focus, FocusRequest, FocusSampling, HitTestTuning, ProximityMode, SeriesFocus,
    resolve_key_focus, resolve_pointer_focus, snap_key,
};

use serde::{Deserialize, Serialize};

/// Per-chart pointer phase: `Idle -> Hovering -> Pinned -> Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerPhase {
    Idle,
    Hovering,
    Pinned,
}

/// Where the current hover came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoverSource {
    Pointer,
    /// Set programmatically by a synchronized chart.
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PinChange {
    Pinned,
    Unpinned,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LeaveOutcome {
    /// A pin exists; its visualization is restored.
    RestorePinned { label: String, key: f64 },
    /// No pin; active styling and tooltip are cleared.
    Cleared,
}

/// Hover/pin state held by one chart instance.
///
/// A pin survives pointer-leave and is never overwritten by hovering; only a
/// click on the pinned label (or a reset) clears it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InteractionState {
    hovered_key: Option<f64>,
    hover_source: Option<HoverSource>,
    pointer: Option<(f64, f64)>,
    pinned_label: Option<String>,
    pinned_key: Option<f64>,
}

impl InteractionState {
    #[must_use]
    pub fn phase(&self) -> PointerPhase {
        if self.pinned_label.is_some() {
            PointerPhase::Pinned
        } else if self.hovered_key.is_some() {
            PointerPhase::Hovering
        } else {
            PointerPhase::Idle
        }
    }

    #[must_use]
    pub fn hovered_key(&self) -> Option<f64> {
        self.hovered_key
    }

    #[must_use]
    pub fn hover_source(&self) -> Option<HoverSource> {
        self.hover_source
    }

    #[must_use]
    pub fn pointer(&self) -> Option<(f64, f64)> {
        self.pointer
    }

    #[must_use]
    pub fn pinned_label(&self) -> Option<&str> {
        self.pinned_label.as_deref()
    }

    #[must_use]
    pub fn pinned_key(&self) -> Option<f64> {
        self.pinned_key
    }

    /// Key whose focus should be displayed: the hover, else the pin.
    #[must_use]
    pub fn active_key(&self) -> Option<f64> {
        self.hovered_key.or(self.pinned_key)
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64, key: Option<f64>) {
        self.pointer = Some((x, y));
        self.hovered_key = key;
        self.hover_source = key.map(|_| HoverSource::Pointer);
    }

    /// Toggles the pin on `label`.
    pub fn on_click(&mut self, label: &str, key: f64) -> PinChange {
        if self.pinned_label.as_deref() == Some(label) {
            self.pinned_label = None;
            self.pinned_key = None;
            PinChange::Unpinned
        } else {
            self.pinned_label = Some(label.to_owned());
            self.pinned_key = Some(key);
            PinChange::Pinned
        }
    }

    pub fn on_pointer_leave(&mut self) -> LeaveOutcome {
        self.pointer = None;
        self.hovered_key = None;
        self.hover_source = None;
        match (&self.pinned_label, self.pinned_key) {
            (Some(label), Some(key)) => LeaveOutcome::RestorePinned {
                label: label.clone(),
                key,
            },
            _ => LeaveOutcome::Cleared,
        }
    }

    /// Programmatic hover used to mirror another chart; `None` clears it.
    pub fn set_external_hover(&mut self, key: Option<f64>) {
        self.hovered_key = key;
        self.hover_source = key.map(|_| HoverSource::External);
        if key.is_none() {
            self.pointer = None;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
