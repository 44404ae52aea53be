use serde::{Deserialize, Serialize};

/// Draw layers of one chart, back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CanvasLayerKind {
    /// Rating zones behind the plot.
    Background,
    Grid,
    Series,
    /// Segment labels, projected outlines, scatter connect lines.
    Overlay,
    /// Focus guide and highlighted markers.
    Focus,
    Axis,
}

impl CanvasLayerKind {
    /// Canonical back-to-front order.
    pub const ORDER: [Self; 6] = [
        Self::Background,
        Self::Grid,
        Self::Series,
        Self::Overlay,
        Self::Focus,
        Self::Axis,
    ];

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Background => 0,
            Self::Grid => 1,
            Self::Series => 2,
            Self::Overlay => 3,
            Self::Focus => 4,
            Self::Axis => 5,
        }
    }
}
