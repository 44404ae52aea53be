//! Pure scene construction: chart data, scales and focus in, `RenderFrame` out.
//!
//! Scales are plot-relative; everything pushed into the frame is translated
//! by the plot origin.

use crate::core::format::format_by_magnitude;
use crate::core::{
    BarComposition, BarLayout, ChartBars, ChartConfig, ChartKind, NormalizedData,
    ResolvedScales, ScatterOptions, Viewport, XScale, segment_label_visible,
};
use crate::interaction::Focus;
use crate::render::{
    CanvasLayerKind, CirclePrimitive, Color, EntryTransition, LinePrimitive, LineStrokeStyle,
    RectPrimitive, RenderFrame, TextHAlign, TextPrimitive,
};

use super::decorations::{ProjectedKeys, push_rating_zones, push_scatter_connect_lines};
use super::engine_config::EntryAnimation;
use super::render_style::{RenderStyle, fade};

/// Width share of the band taken by primary bars when overlays sit behind them.
const PRIMARY_WIDTH_WITH_OVERLAY: f64 = 0.6;

/// Everything the frame builder reads.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub viewport: Viewport,
    pub config: &'a ChartConfig,
    pub data: &'a NormalizedData,
    pub bars: &'a ChartBars,
    pub scales: &'a ResolvedScales,
    pub projected: &'a ProjectedKeys,
    pub focus: Option<&'a Focus>,
    pub style: &'a RenderStyle,
    pub animation: EntryAnimation,
    pub segment_label_min_px: f64,
}

#[must_use]
pub fn build_render_frame(ctx: FrameContext<'_>) -> RenderFrame {
    let mut frame = RenderFrame::new(ctx.viewport);

    push_rating_zones(
        &mut frame,
        &ctx.config.decorations.rating_zones,
        ctx.scales,
        ctx.style,
    );
    push_grid(&mut frame, ctx);

    match &ctx.config.kind {
        ChartKind::Line { scatter, .. } => push_lines(&mut frame, ctx, scatter.as_ref()),
        ChartKind::Bar { .. } | ChartKind::StackedBar { .. } | ChartKind::GroupedBar { .. } => {
            push_bars(&mut frame, ctx);
        }
    }

    if let Some(focus) = ctx.focus {
        push_focus(&mut frame, ctx, focus);
    }
    push_axes(&mut frame, ctx);

    frame
}

fn push_grid(frame: &mut RenderFrame, ctx: FrameContext<'_>) {
    let plot = ctx.scales.plot();
    for tick in &ctx.scales.y_ticks {
        let y = plot.top + ctx.scales.y.map(tick.value);
        frame.push_line(
            CanvasLayerKind::Grid,
            LinePrimitive::new(
                plot.left,
                y,
                plot.right(),
                y,
                ctx.style.grid_line_width,
                ctx.style.grid_line_color,
            ),
        );
    }
}

fn push_bars(frame: &mut RenderFrame, ctx: FrameContext<'_>) {
    let XScale::Band(_) = &ctx.scales.x else {
        return;
    };

    if let Some(overlay) = &ctx.bars.overlay {
        push_bar_composition(frame, ctx, overlay, 1.0, false);
    }
    if let Some(primary) = &ctx.bars.primary {
        let width_share = if ctx.bars.overlay.is_some() {
            PRIMARY_WIDTH_WITH_OVERLAY
        } else {
            1.0
        };
        push_bar_composition(frame, ctx, primary, width_share, true);
    }
}

fn push_bar_composition(
    frame: &mut RenderFrame,
    ctx: FrameContext<'_>,
    bars: &BarComposition,
    width_share: f64,
    label_segments: bool,
) {
    let XScale::Band(band) = &ctx.scales.x else {
        return;
    };
    let composition = &bars.composition;
    if composition.slot_count == 0 {
        return;
    }

    let plot = ctx.scales.plot();
    let style = ctx.style;
    let baseline = plot.top + ctx.scales.baseline_y();
    let slots = composition.slot_count as f64;
    let band_width = band.bandwidth() * width_share;
    let inset = (band.bandwidth() - band_width) * 0.5;
    let gap = if composition.slot_count > 1 {
        style.bar_slot_gap_px
    } else {
        0.0
    };
    let slot_width = ((band_width - gap * (slots - 1.0)) / slots).max(1.0);
    let stacked_labels =
        label_segments && !matches!(composition.layout, BarLayout::Grouped);

    for segment in &composition.segments {
        let data_index = bars.data_index(segment);
        let Some(series) = ctx.data.series.get(data_index) else {
            continue;
        };

        let x = plot.left
            + band.band_start(segment.category_index)
            + inset
            + segment.slot as f64 * (slot_width + gap);
        let top = plot.top + ctx.scales.y.map(segment.top());
        let bottom = plot.top + ctx.scales.y.map(segment.bottom());
        let height = bottom - top;
        if height <= 0.0 {
            continue;
        }

        let mut color = style.series_color(series, data_index);
        if ctx.focus.is_some_and(|focus| focus.key != segment.x_key) {
            color = fade(color, style.dimmed_alpha);
        }
        let projected = ctx.projected.contains(segment.x_key);
        let bar_style = series.bar_style.unwrap_or_default();

        let mut rect = RectPrimitive::new(x, top, slot_width, height, color)
            .with_corner_radius(style.bar_corner_radius);
        if bar_style.hollow || projected {
            let fill = if bar_style.hollow {
                color.with_alpha(0.0)
            } else {
                fade(color, style.projected_alpha)
            };
            let stroke_style = if bar_style.dashed || projected {
                LineStrokeStyle::Dashed
            } else {
                LineStrokeStyle::Solid
            };
            rect.fill_color = fill;
            rect = rect.with_border(
                bar_style
                    .stroke_width
                    .unwrap_or(style.hollow_bar_stroke_width),
                color,
                stroke_style,
            );
        } else if bar_style.dashed {
            rect = rect.with_border(
                bar_style
                    .stroke_width
                    .unwrap_or(style.hollow_bar_stroke_width),
                color,
                LineStrokeStyle::Dashed,
            );
        }
        if ctx.animation.enabled {
            rect = rect.with_transition(EntryTransition {
                from_y: baseline,
                from_height: 0.0,
                delay_ms: ctx.animation.delay_for(segment.category_index),
                duration_ms: ctx.animation.duration_ms,
            });
        }
        frame.push_rect(CanvasLayerKind::Series, rect);

        if stacked_labels && segment_label_visible(height, ctx.segment_label_min_px) {
            let font = style.segment_label_font_size_px;
            frame.push_text(
                CanvasLayerKind::Overlay,
                TextPrimitive::new(
                    format_by_magnitude(segment.value, series.max_abs_value()),
                    x + slot_width * 0.5,
                    top + height * 0.5 - font * 0.5,
                    font,
                    style.segment_label_color,
                    TextHAlign::Center,
                ),
            );
        }
    }
}

fn push_lines(frame: &mut RenderFrame, ctx: FrameContext<'_>, scatter: Option<&ScatterOptions>) {
    let plot = ctx.scales.plot();
    let style = ctx.style;
    let radius = scatter.map_or(style.line_point_radius, |options| options.point_radius);

    for (series_index, series) in ctx.data.series.iter().enumerate() {
        let mut color = style.series_color(series, series_index);
        if ctx
            .focus
            .is_some_and(|focus| !focus.is_active(series_index))
        {
            color = fade(color, style.dimmed_alpha);
        }

        let mut marks: Vec<(f64, f64, f64)> = series
            .points
            .iter()
            .filter_map(|point| {
                ctx.scales.x.map_key(point.x_key).map(|x| {
                    (
                        point.x_key,
                        plot.left + x,
                        plot.top + ctx.scales.y.map(point.value),
                    )
                })
            })
            .collect();
        marks.sort_by(|a, b| a.1.total_cmp(&b.1));

        if scatter.is_none() {
            for pair in marks.windows(2) {
                let (_, x1, y1) = pair[0];
                let (end_key, x2, y2) = pair[1];
                let line = if ctx.projected.contains(end_key) {
                    LinePrimitive::new(
                        x1,
                        y1,
                        x2,
                        y2,
                        style.series_line_width,
                        fade(color, style.projected_alpha),
                    )
                    .with_stroke_style(LineStrokeStyle::Dashed)
                } else {
                    LinePrimitive::new(x1, y1, x2, y2, style.series_line_width, color)
                };
                frame.push_line(CanvasLayerKind::Series, line);
            }
        }

        if radius > 0.0 {
            for (key, x, y) in &marks {
                let marker = if ctx.projected.contains(*key) {
                    CirclePrimitive::new(*x, *y, radius, fade(color, style.projected_alpha))
                        .with_stroke(1.0, color)
                } else {
                    CirclePrimitive::new(*x, *y, radius, color)
                };
                frame.push_circle(CanvasLayerKind::Series, marker);
            }
        }

        if let Some(options) = scatter {
            if !options.connect_labels.is_empty() {
                push_scatter_connect_lines(
                    frame,
                    series,
                    &options.connect_labels,
                    ctx.scales,
                    color,
                    style.series_line_width * 0.75,
                );
            }
        }
    }
}

fn push_focus(frame: &mut RenderFrame, ctx: FrameContext<'_>, focus: &Focus) {
    let plot = ctx.scales.plot();
    let style = ctx.style;

    match &ctx.scales.x {
        XScale::Band(band) if ctx.config.is_bar_kind() => {
            let Some(index) = band.index_of(focus.key) else {
                return;
            };
            frame.push_rect(
                CanvasLayerKind::Focus,
                RectPrimitive::new(
                    plot.left + band.band_start(index),
                    plot.top,
                    band.bandwidth(),
                    plot.height,
                    style.focus_band_color,
                ),
            );
        }
        _ => {
            let x = plot.left
                + ctx
                    .scales
                    .x
                    .map_key(focus.sample_x)
                    .unwrap_or(focus.x_px);
            frame.push_line(
                CanvasLayerKind::Focus,
                LinePrimitive::new(x, plot.top, x, plot.bottom(), 1.0, style.focus_guide_color)
                    .with_stroke_style(style.focus_guide_style),
            );

            let radius = match &ctx.config.kind {
                ChartKind::Line {
                    scatter: Some(options),
                    ..
                } => options.point_radius,
                _ => style.line_point_radius,
            } + 2.0;
            for series_focus in focus.active_series() {
                let (Some(y_px), Some(series)) = (
                    series_focus.y_px,
                    ctx.data.series.get(series_focus.series_index),
                ) else {
                    continue;
                };
                let color = style.series_color(series, series_focus.series_index);
                frame.push_circle(
                    CanvasLayerKind::Focus,
                    CirclePrimitive::new(x, plot.top + y_px, radius, color)
                        .with_stroke(2.0, style.focus_marker_stroke_color),
                );
            }
        }
    }
}

fn push_axes(frame: &mut RenderFrame, ctx: FrameContext<'_>) {
    let plot = ctx.scales.plot();
    let style = ctx.style;
    let font = style.axis_label_font_size_px;
    let baseline = plot.top + ctx.scales.baseline_y();

    frame.push_line(
        CanvasLayerKind::Axis,
        LinePrimitive::new(
            plot.left,
            baseline,
            plot.right(),
            baseline,
            style.axis_line_width,
            style.axis_line_color,
        ),
    );

    for tick in &ctx.scales.y_ticks {
        if tick.label.is_empty() {
            continue;
        }
        frame.push_text(
            CanvasLayerKind::Axis,
            TextPrimitive::new(
                tick.label.clone(),
                plot.left - 6.0,
                plot.top + ctx.scales.y.map(tick.value) - font * 0.5,
                font,
                style.axis_label_color,
                TextHAlign::Right,
            ),
        );
    }

    let rotate = ctx.scales.layout.rotate_x_labels;
    for tick in &ctx.scales.x_ticks {
        if tick.label.is_empty() {
            continue;
        }
        let Some(x) = ctx.scales.x.map_key(tick.value) else {
            continue;
        };
        let label = TextPrimitive::new(
            tick.label.clone(),
            plot.left + x,
            plot.bottom() + 6.0,
            font,
            axis_label_color(style, ctx.projected.contains(tick.value)),
            if rotate {
                TextHAlign::Right
            } else {
                TextHAlign::Center
            },
        );
        let label = if rotate {
            label.with_rotation(style.rotated_label_deg)
        } else {
            label
        };
        frame.push_text(CanvasLayerKind::Axis, label);
    }
}

fn axis_label_color(style: &RenderStyle, projected: bool) -> Color {
    if projected {
        fade(style.axis_label_color, style.projected_alpha)
    } else {
        style.axis_label_color
    }
}
