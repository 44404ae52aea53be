use std::fmt::Write as _;

use crate::error::ChartResult;
use crate::render::{
    CirclePrimitive, Color, LayerPrimitives, LinePrimitive, LineStrokeStyle, RectPrimitive,
    RenderFrame, Renderer, TextHAlign, TextPrimitive,
};

/// Renders frames to a standalone SVG document.
///
/// Bars carrying an `EntryTransition` get `<animate>` children so the
/// document replays the grow-in when opened in a browser.
#[derive(Debug, Default, Clone)]
pub struct SvgRenderer {
    document: String,
    frames_rendered: usize,
}

impl SvgRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Document produced by the last `render` call.
    #[must_use]
    pub fn document(&self) -> &str {
        &self.document
    }

    #[must_use]
    pub fn frames_rendered(&self) -> usize {
        self.frames_rendered
    }

    #[must_use]
    pub fn into_document(self) -> String {
        self.document
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;

        let mut output = String::new();
        let _ = writeln!(
            output,
            r#"<svg viewBox="0 0 {w} {h}" width="{w}" height="{h}" xmlns="http://www.w3.org/2000/svg" role="img">"#,
            w = frame.viewport.width,
            h = frame.viewport.height,
        );
        for layer in &frame.layers {
            write_layer(&mut output, layer);
        }
        output.push_str("</svg>\n");

        self.document = output;
        self.frames_rendered += 1;
        Ok(())
    }
}

fn write_layer(output: &mut String, layer: &LayerPrimitives) {
    if layer.is_empty() {
        return;
    }
    let _ = writeln!(output, r#"  <g data-layer="{:?}">"#, layer.kind);
    for rect in &layer.rects {
        write_rect(output, rect);
    }
    for line in &layer.lines {
        write_line(output, line);
    }
    for circle in &layer.circles {
        write_circle(output, circle);
    }
    for text in &layer.texts {
        write_text(output, text);
    }
    output.push_str("  </g>\n");
}

fn write_rect(output: &mut String, rect: &RectPrimitive) {
    let _ = write!(
        output,
        r#"    <rect x="{}" y="{}" width="{}" height="{}" {}"#,
        fmt_num(rect.x),
        fmt_num(rect.y),
        fmt_num(rect.width),
        fmt_num(rect.height),
        paint_attr("fill", rect.fill_color),
    );
    if rect.corner_radius > 0.0 {
        let _ = write!(output, r#" rx="{}""#, fmt_num(rect.corner_radius));
    }
    if rect.border_width > 0.0 {
        let _ = write!(
            output,
            r#" {} stroke-width="{}"{}"#,
            paint_attr("stroke", rect.border_color),
            fmt_num(rect.border_width),
            dash_attr(rect.border_style),
        );
    }

    match rect.transition {
        Some(transition) if transition.duration_ms > 0 => {
            output.push_str(">\n");
            for (attribute, from, to) in [
                ("y", transition.from_y, rect.y),
                ("height", transition.from_height, rect.height),
            ] {
                let _ = writeln!(
                    output,
                    r#"      <animate attributeName="{attribute}" from="{}" to="{}" begin="{}ms" dur="{}ms" fill="freeze"/>"#,
                    fmt_num(from),
                    fmt_num(to),
                    transition.delay_ms,
                    transition.duration_ms,
                );
            }
            output.push_str("    </rect>\n");
        }
        _ => output.push_str("/>\n"),
    }
}

fn write_line(output: &mut String, line: &LinePrimitive) {
    let _ = writeln!(
        output,
        r#"    <line x1="{}" y1="{}" x2="{}" y2="{}" {} stroke-width="{}"{}/>"#,
        fmt_num(line.x1),
        fmt_num(line.y1),
        fmt_num(line.x2),
        fmt_num(line.y2),
        paint_attr("stroke", line.color),
        fmt_num(line.stroke_width),
        dash_attr(line.stroke_style),
    );
}

fn write_circle(output: &mut String, circle: &CirclePrimitive) {
    let _ = write!(
        output,
        r#"    <circle cx="{}" cy="{}" r="{}" {}"#,
        fmt_num(circle.cx),
        fmt_num(circle.cy),
        fmt_num(circle.radius),
        paint_attr("fill", circle.fill_color),
    );
    if circle.stroke_width > 0.0 {
        let _ = write!(
            output,
            r#" {} stroke-width="{}""#,
            paint_attr("stroke", circle.stroke_color),
            fmt_num(circle.stroke_width),
        );
    }
    output.push_str("/>\n");
}

fn write_text(output: &mut String, text: &TextPrimitive) {
    let anchor = match text.h_align {
        TextHAlign::Left => "start",
        TextHAlign::Center => "middle",
        TextHAlign::Right => "end",
    };
    let _ = write!(
        output,
        r#"    <text x="{}" y="{}" font-size="{}" text-anchor="{anchor}" dominant-baseline="hanging" {}"#,
        fmt_num(text.x),
        fmt_num(text.y),
        fmt_num(text.font_size_px),
        paint_attr("fill", text.color),
    );
    if text.rotation_deg != 0.0 {
        let _ = write!(
            output,
            r#" transform="rotate({} {} {})""#,
            fmt_num(text.rotation_deg),
            fmt_num(text.x),
            fmt_num(text.y),
        );
    }
    let _ = writeln!(output, ">{}</text>", xml_escape(&text.text));
}

fn paint_attr(name: &str, color: Color) -> String {
    if (color.alpha - 1.0).abs() <= f64::EPSILON {
        format!(r#"{name}="{}""#, color.to_hex())
    } else {
        format!(
            r#"{name}="{}" {name}-opacity="{}""#,
            color.to_hex(),
            fmt_num(color.alpha)
        )
    }
}

fn dash_attr(style: LineStrokeStyle) -> String {
    let pattern = style.dash_pattern();
    if pattern.is_empty() {
        return String::new();
    }
    let joined = pattern
        .iter()
        .map(|value| fmt_num(*value))
        .collect::<Vec<_>>()
        .join(" ");
    format!(r#" stroke-dasharray="{joined}""#)
}

/// Two decimals, trailing zeros stripped.
fn fmt_num(value: f64) -> String {
    let text = format!("{value:.2}");
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_owned()
    } else {
        trimmed.to_owned()
    }
}

#[must_use]
pub fn xml_escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
