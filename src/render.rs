use crate::config::RenderConfig;
use crate::ir::{DisplayKind, Side};
use crate::scene::{ContentBlock, GradientDef, Paint, Primitive, Scene, tags_offset};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

const HTML_STYLES: &str = r#"
.timeline-container {
  position: relative;
  margin: 0 auto;
}
.timeline-container > svg {
  position: absolute;
  left: 0;
  top: 0;
}
#experiences {
  position: absolute;
  left: 0;
  top: 0;
}
.experience-node {
  position: absolute;
  box-sizing: border-box;
}
.experience-node.kind-card {
  border-radius: 10px;
  box-shadow: 0 6px 18px rgba(15, 23, 42, 0.08);
}
.experience-node.side-left {
  text-align: right;
}
.node-title {
  font-weight: 600;
}
.node-description {
  margin-top: 8px;
}
.node-stack {
  display: flex;
  flex-wrap: wrap;
  gap: 6px;
  margin-top: 8px;
}
.stack-tag {
  border-radius: 999px;
  padding: 4px 8px;
}
"#;

/// Serializes a scene as a standalone SVG document, blocks included.
pub fn render_svg(scene: &Scene, theme: &Theme) -> String {
    let mut svg = String::new();
    open_svg(&mut svg, scene, "");

    svg.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"0\" width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        scene.origin_x, scene.background
    ));
    push_defs(&mut svg, scene);
    push_primitives(&mut svg, scene, theme);
    for block in &scene.blocks {
        push_block_svg(&mut svg, block, theme);
    }

    svg.push_str("</svg>");
    svg
}

/// Standalone HTML page: the vector canvas holds the spine, markers and
/// connectors, content blocks are positioned elements on top of it.
pub fn render_html(scene: &Scene, theme: &Theme) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Timeline</title><style>");
    html.push_str(HTML_STYLES);
    html.push_str(&format!(
        "body {{ margin: 0; background: {}; color: {}; font-family: {}; font-size: {}px; }}",
        theme.background, theme.text_color, theme.font_family, theme.font_size
    ));
    html.push_str(&format!(
        ".node-year {{ color: {}; font-size: {}px; }} .stack-tag {{ background: {}; color: {}; font-size: {}px; }}",
        theme.muted_text_color,
        theme.small_font_size,
        theme.tag_background,
        theme.tag_text_color,
        theme.small_font_size
    ));
    html.push_str("</style></head><body>");

    html.push_str(&format!(
        "<div class=\"timeline-container\" style=\"width:{}px;height:{}px\">",
        scene.width, scene.height
    ));
    let mut canvas = String::new();
    open_svg(&mut canvas, scene, " id=\"timelineCanvas\"");
    push_defs(&mut canvas, scene);
    push_primitives(&mut canvas, scene, theme);
    canvas.push_str("</svg>");
    html.push_str(&canvas);

    html.push_str("<div id=\"experiences\">");
    for block in &scene.blocks {
        push_block_html(&mut html, block, scene.origin_x, theme);
    }
    html.push_str("</div></div></body></html>");
    html
}

fn open_svg(out: &mut String, scene: &Scene, attrs: &str) {
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\"{attrs} width=\"{w}\" height=\"{h}\" viewBox=\"{x:.2} 0 {w} {h}\">",
        w = scene.width,
        h = scene.height,
        x = scene.origin_x,
    ));
}

fn push_defs(out: &mut String, scene: &Scene) {
    out.push_str("<defs>");
    out.push_str(
        "<filter id=\"card-shadow\" x=\"-10%\" y=\"-10%\" width=\"120%\" height=\"130%\"><feDropShadow dx=\"0\" dy=\"3\" stdDeviation=\"4\" flood-color=\"#0f172a\" flood-opacity=\"0.08\"/></filter>",
    );
    for gradient in &scene.gradients {
        push_gradient(out, gradient);
    }
    out.push_str("</defs>");
}

fn push_gradient(out: &mut String, gradient: &GradientDef) {
    out.push_str(&format!(
        "<linearGradient id=\"{}\" gradientUnits=\"userSpaceOnUse\" x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\">",
        gradient.id, gradient.x1, gradient.y1, gradient.x2, gradient.y2
    ));
    for stop in &gradient.stops {
        out.push_str(&format!(
            "<stop offset=\"{}\" stop-color=\"{}\" stop-opacity=\"{}\"/>",
            stop.offset, stop.color, stop.opacity
        ));
    }
    out.push_str("</linearGradient>");
}

fn paint(paint: &Paint) -> String {
    match paint {
        Paint::Color(color) => color.clone(),
        Paint::Gradient(id) => format!("url(#{id})"),
    }
}

fn push_primitives(out: &mut String, scene: &Scene, theme: &Theme) {
    for primitive in &scene.primitives {
        match primitive {
            Primitive::Path {
                d,
                stroke,
                stroke_width,
                class,
            } => {
                out.push_str(&format!(
                    "<path class=\"{class}\" d=\"{d}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{stroke_width}\" stroke-linecap=\"round\"/>",
                    paint(stroke)
                ));
            }
            Primitive::Line {
                x1,
                y1,
                x2,
                y2,
                stroke,
                stroke_width,
                class,
            } => {
                out.push_str(&format!(
                    "<line class=\"{class}\" x1=\"{x1:.2}\" y1=\"{y1:.2}\" x2=\"{x2:.2}\" y2=\"{y2:.2}\" stroke=\"{}\" stroke-width=\"{stroke_width}\"/>",
                    paint(stroke)
                ));
            }
            Primitive::Circle {
                cx,
                cy,
                r,
                fill,
                stroke,
                stroke_width,
                class,
            } => {
                let stroke_attr = match stroke {
                    Some(stroke) => format!(" stroke=\"{stroke}\" stroke-width=\"{stroke_width}\""),
                    None => String::new(),
                };
                out.push_str(&format!(
                    "<circle class=\"{class}\" cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{r:.2}\" fill=\"{fill}\"{stroke_attr}/>"
                ));
            }
            Primitive::Text {
                x,
                y,
                content,
                anchor,
                font_size,
                fill,
                class,
            } => {
                out.push_str(&format!(
                    "<text class=\"{class}\" x=\"{x:.2}\" y=\"{y:.2}\" text-anchor=\"{}\" font-family=\"{}\" font-size=\"{font_size}\" fill=\"{fill}\">{}</text>",
                    anchor.as_str(),
                    escape_xml(&theme.font_family),
                    escape_xml(content)
                ));
            }
        }
    }
}

fn push_block_svg(out: &mut String, block: &ContentBlock, theme: &Theme) {
    out.push_str(&format!("<g class=\"experience-node kind-{}\" data-id=\"{}\">", block.kind.as_str(), escape_xml(&block.id)));
    if block.kind == DisplayKind::Card {
        out.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"10\" ry=\"10\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\" filter=\"url(#card-shadow)\"/>",
            block.x, block.y, block.width, block.height, theme.card_background, theme.card_border
        ));
        out.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"3\" height=\"{:.2}\" rx=\"1.5\" fill=\"{}\"/>",
            block.x,
            block.y + 10.0,
            (block.height - 20.0).max(0.0),
            block.color
        ));
    }

    let (text_x, anchor) = match block.side {
        Side::Left if block.kind != DisplayKind::Card => (block.right() - block.padding, "end"),
        _ => (block.x + block.padding, "start"),
    };
    let title_color = if block.kind == DisplayKind::Card {
        theme.text_color.clone()
    } else {
        block.color.to_string()
    };
    push_text_lines(
        out,
        text_x,
        block.title_y(),
        &block.title.lines,
        block.title_font_size,
        block.line_height,
        anchor,
        &title_color,
        "node-title",
        &theme.font_family,
    );
    if !block.year.is_empty() {
        push_text_lines(
            out,
            text_x,
            block.year_y(),
            std::slice::from_ref(&block.year),
            block.year_font_size,
            block.line_height,
            anchor,
            &theme.muted_text_color,
            "node-year",
            &theme.font_family,
        );
    }
    push_text_lines(
        out,
        text_x,
        block.description_y(),
        &block.description.lines,
        theme.font_size,
        block.line_height,
        anchor,
        &theme.text_color,
        "node-description",
        &theme.font_family,
    );

    let tags_y = block.y + tags_offset(block);
    for tag in &block.stack {
        let x = block.x + block.padding + tag.x;
        let y = tags_y + tag.y;
        out.push_str(&format!(
            "<rect class=\"stack-tag\" x=\"{x:.2}\" y=\"{y:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{:.2}\" fill=\"{}\"/>",
            tag.width,
            tag.height,
            tag.height / 2.0,
            theme.tag_background
        ));
        out.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            x + tag.width / 2.0,
            y + tag.height / 2.0,
            escape_xml(&theme.font_family),
            theme.small_font_size,
            theme.tag_text_color,
            escape_xml(&tag.label)
        ));
    }
    out.push_str("</g>");
}

#[allow(clippy::too_many_arguments)]
fn push_text_lines(
    out: &mut String,
    x: f32,
    top: f32,
    lines: &[String],
    font_size: f32,
    line_height: f32,
    anchor: &str,
    fill: &str,
    class: &str,
    font_family: &str,
) {
    if lines.is_empty() {
        return;
    }
    let step = font_size * line_height;
    // Baseline sits roughly one font size below the line box top.
    let baseline = top + (step - font_size) / 2.0 + font_size * 0.85;
    out.push_str(&format!(
        "<text class=\"{class}\" x=\"{x:.2}\" y=\"{baseline:.2}\" text-anchor=\"{anchor}\" font-family=\"{}\" font-size=\"{font_size}\" fill=\"{fill}\">",
        escape_xml(font_family)
    ));
    for (idx, line) in lines.iter().enumerate() {
        let dy = if idx == 0 { 0.0 } else { step };
        out.push_str(&format!("<tspan x=\"{x:.2}\" dy=\"{dy:.2}\">{}</tspan>", escape_xml(line)));
    }
    out.push_str("</text>");
}

fn push_block_html(out: &mut String, block: &ContentBlock, origin_x: f32, theme: &Theme) {
    let side = match block.side {
        Side::Left => "left",
        Side::Right => "right",
    };
    out.push_str(&format!(
        "<div class=\"experience-node kind-{} side-{side}\" id=\"{}\" style=\"left:{:.2}px;top:{:.2}px;width:{:.2}px;padding:{:.2}px;",
        block.kind.as_str(),
        escape_xml(&block.id),
        block.x - origin_x,
        block.y,
        block.width,
        block.padding
    ));
    if block.kind == DisplayKind::Card {
        out.push_str(&format!(
            "background:{};border:1px solid {};border-left:3px solid {};",
            theme.card_background, theme.card_border, block.color
        ));
    } else {
        out.push_str(&format!("color:{};", block.color));
    }
    out.push_str("\">");

    out.push_str(&format!(
        "<div class=\"node-header\"><div class=\"node-title\" style=\"font-size:{}px\">{}</div>",
        block.title_font_size,
        escape_xml(&block.title.lines.join(" "))
    ));
    if !block.year.is_empty() {
        out.push_str(&format!("<div class=\"node-year\">{}</div>", escape_xml(&block.year)));
    }
    out.push_str("</div>");
    if !block.description.lines.is_empty() {
        out.push_str(&format!(
            "<div class=\"node-description\">{}</div>",
            escape_xml(&block.description.lines.join(" "))
        ));
    }
    if !block.stack.is_empty() {
        out.push_str("<div class=\"node-stack\">");
        for tag in &block.stack {
            out.push_str(&format!("<span class=\"stack-tag\">{}</span>", escape_xml(&tag.label)));
        }
        out.push_str("</div>");
    }
    out.push_str("</div>");
}

pub fn write_output(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)?;
            tracing::info!(path = %path.display(), bytes = content.len(), "wrote output");
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.default_size = usvg::Size::from_wh(render_cfg.width.max(1.0), render_cfg.height.max(1.0))
        .ok_or_else(|| anyhow::anyhow!("Invalid render size"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    tracing::info!(path = %output.display(), "wrote png");
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
