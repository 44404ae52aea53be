mod chart_card;
mod decorations;
mod engine;
mod engine_config;
mod engine_data;
mod engine_interaction;
mod engine_snapshot;
mod json_contract;
mod render_frame_builder;
mod render_style;
mod series_cache;
mod tooltip;

pub use chart_card::{CardKey, ChartCard};
pub use decorations::{
    ProjectedKeys, connected_points, push_rating_zones, push_scatter_connect_lines,
};
pub use engine::ChartEngine;
pub use engine_config::{
    ChartEngineConfig, EntryAnimation, TooltipAnchor, TooltipMode, TooltipTuning,
};
pub use engine_interaction::TooltipView;
pub use engine_snapshot::{EngineSnapshot, LayerSummary};
pub use json_contract::{ENGINE_SNAPSHOT_JSON_SCHEMA_V1, EngineSnapshotJsonContractV1};
pub use render_frame_builder::{FrameContext, build_render_frame};
pub use render_style::{RenderStyle, fade};
pub use series_cache::{SeriesCache, SeriesCacheStats};
pub use tooltip::{
    Swatch, TooltipBody, TooltipContent, TooltipGroup, TooltipMetric, TooltipPlacement,
    TooltipRow, build_tooltip, place_floating, place_tooltip,
};
