use resume_timeline_renderer::layout_dump::LayoutDump;
use resume_timeline_renderer::{
    ColorMode, Config, Measurements, RenderOptions, SpacingMode, Theme, compute_layout,
    load_document, render_html, render_with_options, scene_with_options,
};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimelineRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    viewport_width: Option<f32>,
    color_mode: Option<ColorMode>,
    spacing: Option<SpacingMode>,
}

fn build_render_options(options: TimelineRenderOptions) -> RenderOptions {
    let mut render_options = RenderOptions::default();
    if let Some(theme) = options.theme.as_deref().and_then(Theme::by_name) {
        render_options.config.theme = theme;
    }
    if let Some(font_family) = options.font_family {
        render_options.config.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        render_options.config.theme.font_size = font_size;
    }
    if let Some(width) = options.viewport_width {
        render_options.viewport_width = width;
    }
    if let Some(mode) = options.color_mode {
        render_options.config.colors.color_mode = mode;
    }
    if let Some(spacing) = options.spacing {
        render_options.config.timeline.spacing = spacing;
    }
    render_options
}

fn parse_options(options_json: Option<String>) -> Result<TimelineRenderOptions, JsValue> {
    match options_json {
        Some(raw) => serde_json::from_str(&raw).map_err(|error| JsValue::from_str(&error.to_string())),
        None => Ok(TimelineRenderOptions::default()),
    }
}

#[wasm_bindgen]
pub fn render_timeline_svg(input: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let render_options = build_render_options(parse_options(options_json)?);
    render_with_options(input, render_options).map_err(|error| JsValue::from_str(&error.to_string()))
}

#[wasm_bindgen]
pub fn render_timeline_html(input: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let render_options = build_render_options(parse_options(options_json)?);
    let (scene, config) =
        scene_with_options(input, render_options).map_err(|error| JsValue::from_str(&error.to_string()))?;
    Ok(render_html(&scene, &config.theme))
}

/// Returns the computed positions as JSON. `heights_json` carries block
/// heights measured by the host page, keyed by event id.
#[wasm_bindgen]
pub fn layout_timeline(input: &str, heights_json: Option<String>) -> Result<String, JsValue> {
    let to_js = |error: anyhow::Error| JsValue::from_str(&error.to_string());
    let (timeline, config) = load_document(input, Config::default()).map_err(to_js)?;
    let heights = match heights_json {
        Some(raw) => Measurements::from_json(&raw).map_err(to_js)?,
        None => Measurements::new(),
    };
    let layout = compute_layout(&timeline, &config.timeline, &heights);
    serde_json::to_string(&LayoutDump::from_layout(&layout, &timeline))
        .map_err(|error| JsValue::from_str(&error.to_string()))
}
