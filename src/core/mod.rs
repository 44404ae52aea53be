pub mod format;
pub mod layout;
pub mod normalize;
pub mod primitives;
pub mod resolver;
pub mod scale;
pub mod series;
pub mod stack;
pub mod ticks;
pub mod types;
pub mod value_domain;

pub use layout::{LayoutTuning, ResponsiveLayout};
pub use normalize::{
    DuplicateKey, NormalizeOptions, NormalizedData, NormalizedPoint, NormalizedSeries, SeriesRole,
    XValue, normalize,
};
pub use resolver::{ResolvedScales, resolve_scales, tick_label_for_key, uses_band_axis};
pub use scale::{BandScale, LinearScale, XScale};
pub use series::{
    BarLayout, BarSeries, BarStyle, ChartConfig, ChartKind, Decorations, ProjectedSegments,
    RatingZone, RawPoint, RawX, ScatterOptions, Series, TickFormat, TooltipOptions, XAxisOptions,
    YAxisOptions, ZoneLabelPosition,
};
pub use stack::{
    BarComposition, BarSegment, ChartBars, StackComposition, compose_bars, compose_chart_bars,
    segment_label_visible,
};
pub use ticks::Tick;
pub use types::{AxisKind, Margins, PlotArea, Viewport};
pub use value_domain::{YDomainOverrides, resolve_y_domain};
