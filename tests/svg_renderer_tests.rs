use deck_charts::core::{BarSeries, ChartConfig, RawPoint, Series, Viewport};
use deck_charts::render::{
    CanvasLayerKind, Color, RectPrimitive, RenderFrame, Renderer, SvgRenderer, TextHAlign,
    TextPrimitive, xml_escape,
};
use deck_charts::{ChartEngine, ChartEngineConfig};

fn chart() -> ChartConfig {
    ChartConfig::stacked_bar(
        "Fuentes A&B",
        vec![
            BarSeries::new(Series::new(
                "a",
                "A&B <local>",
                vec![RawPoint::new("2024", 40.0), RawPoint::new("2025", 60.0)],
            )),
            BarSeries::new(Series::new(
                "b",
                "Externa",
                vec![RawPoint::new("2024", 20.0), RawPoint::new("2025", 30.0)],
            )),
        ],
    )
}

#[test]
fn document_wraps_layers_in_groups() {
    let mut engine = ChartEngine::new(
        SvgRenderer::new(),
        ChartEngineConfig::new(Viewport::new(640, 360)),
    )
    .expect("engine init");
    engine.set_chart(chart());
    engine.render().expect("render");

    let svg = engine.renderer().document();
    assert!(svg.starts_with(r#"<svg viewBox="0 0 640 360""#));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert!(svg.contains(r#"<g data-layer="Series">"#));
    assert!(svg.contains(r#"<g data-layer="Axis">"#));
    assert!(!svg.contains(r#"<g data-layer="Background">"#));
    assert_eq!(svg.matches("<rect ").count(), 4);
    assert_eq!(engine.renderer().frames_rendered(), 1);
}

#[test]
fn first_render_animates_bars_then_settles() {
    let mut engine = ChartEngine::new(
        SvgRenderer::new(),
        ChartEngineConfig::new(Viewport::new(640, 360)),
    )
    .expect("engine init");
    engine.set_chart(chart());

    engine.render().expect("first render");
    let first = engine.renderer().document().to_owned();
    assert_eq!(first.matches(r#"<animate attributeName="height""#).count(), 4);
    assert!(first.contains(r#"begin="40ms""#));

    engine.render().expect("second render");
    assert!(!engine.renderer().document().contains("<animate"));
}

#[test]
fn text_content_is_escaped() {
    let frame = RenderFrame::new(Viewport::new(200, 100)).with_text(
        CanvasLayerKind::Axis,
        TextPrimitive::new(
            "A&B <1>",
            10.0,
            10.0,
            11.0,
            Color::rgb(0.0, 0.0, 0.0),
            TextHAlign::Left,
        ),
    );
    let mut renderer = SvgRenderer::new();
    renderer.render(&frame).expect("render");

    assert!(renderer.document().contains(">A&amp;B &lt;1&gt;</text>"));
    assert_eq!(xml_escape(r#"say "hi" & 'bye'"#), "say &quot;hi&quot; &amp; &#39;bye&#39;");
}

#[test]
fn translucent_fills_carry_opacity() {
    let frame = RenderFrame::new(Viewport::new(100, 100)).with_rect(
        CanvasLayerKind::Background,
        RectPrimitive::new(0.0, 0.0, 50.5, 20.0, Color::rgba(1.0, 0.0, 0.0, 0.25)),
    );
    let mut renderer = SvgRenderer::new();
    renderer.render(&frame).expect("render");

    let svg = renderer.into_document();
    assert!(svg.contains(r#"width="50.5""#));
    assert!(svg.contains(r#"fill-opacity="0.25""#));
}

#[test]
fn invalid_frames_are_rejected() {
    let frame = RenderFrame::new(Viewport::new(0, 100));
    let mut renderer = SvgRenderer::new();
    assert!(renderer.render(&frame).is_err());
    assert_eq!(renderer.frames_rendered(), 0);
}
