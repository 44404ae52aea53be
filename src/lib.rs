//! deck-charts: chart geometry, hit-testing and tooltip engine for slide decks.
//!
//! Chart documents (`core::ChartConfig`) are normalized into keyed series,
//! resolved into scales for a viewport and turned into a layered
//! `render::RenderFrame` that any `render::Renderer` backend can draw.
//! Pointer input flows through `interaction` into focus and tooltip state.
//! `export` holds the raw-data and PDF slide exporters.

pub mod api;
pub mod core;
pub mod error;
pub mod export;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartCard, ChartEngine, ChartEngineConfig};
pub use error::{ChartError, ChartResult};
