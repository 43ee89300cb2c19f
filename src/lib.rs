#[cfg(feature = "cli")]
pub mod cli;
pub mod color;
pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod measure;
pub mod parser;
pub mod render;
pub mod scene;
pub mod text;
pub mod text_metrics;
pub mod theme;
pub mod timesheet;

#[cfg(feature = "cli")]
pub use cli::run;
pub use color::{ColorConfig, ColorMode, Hsl, color};
pub use config::{Config, SpacingMode, TimelineConfig, load_config};
pub use error::TimelineError;
pub use ir::{DisplayKind, Event, Side, Timeline};
pub use layout::{TimelineLayout, compute_layout};
pub use measure::{Measure, Measurements, SceneMeasurer, render_two_pass};
pub use parser::{ParseOutput, parse_timeline};
pub use render::{render_html, render_svg};
pub use scene::{Scene, build_scene};
pub use theme::Theme;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub config: Config,
    pub viewport_width: f32,
    /// Heights measured by the caller; takes precedence over self-measurement.
    pub measurements: Option<Measurements>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            config: Config::default(),
            viewport_width: 1200.0,
            measurements: None,
        }
    }
}

/// Parses a timeline document and applies its config sections over `base`.
pub fn load_document(input: &str, mut base: Config) -> anyhow::Result<(Timeline, Config)> {
    let parsed = parse_timeline(input)?;
    config::apply_config_file(&mut base, parsed.config)?;
    Ok((parsed.timeline, base))
}

/// Lays out and builds the scene for a loaded timeline. Supplied heights are
/// used as-is; otherwise dynamic spacing measures the scene and relays it.
/// Returns the heights the final layout was computed from.
pub fn build_timeline_scene(
    timeline: &Timeline,
    config: &Config,
    viewport_width: f32,
    measurements: Option<Measurements>,
) -> (Scene, Measurements) {
    match (measurements, config.timeline.spacing) {
        (Some(heights), _) => {
            let layout = compute_layout(timeline, &config.timeline, &heights);
            (build_scene(timeline, &layout, config, viewport_width), heights)
        }
        (None, SpacingMode::Dynamic) => {
            render_two_pass(timeline, config, viewport_width, &mut SceneMeasurer)
        }
        (None, SpacingMode::Fixed) => {
            let heights = Measurements::new();
            let layout = compute_layout(timeline, &config.timeline, &heights);
            (build_scene(timeline, &layout, config, viewport_width), heights)
        }
    }
}

/// Parses a timeline document and returns its scene. The returned config has
/// the document's own sections applied.
pub fn scene_with_options(input: &str, options: RenderOptions) -> anyhow::Result<(Scene, Config)> {
    let (timeline, config) = load_document(input, options.config)?;
    let (scene, _) =
        build_timeline_scene(&timeline, &config, options.viewport_width, options.measurements);
    Ok((scene, config))
}

pub fn render_with_options(input: &str, options: RenderOptions) -> anyhow::Result<String> {
    let (scene, config) = scene_with_options(input, options)?;
    Ok(render_svg(&scene, &config.theme))
}
