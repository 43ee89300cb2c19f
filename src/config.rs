use crate::color::ColorConfig;
use crate::ir::DisplayKind;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum SpacingMode {
    /// Constant gap (or per-kind override) between events.
    #[default]
    Fixed,
    /// Gap derived from each content block's measured height.
    Dynamic,
}

/// Optional per-kind value table; `None` falls back to the shared default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerKind {
    pub card: Option<f32>,
    pub label: Option<f32>,
    pub note: Option<f32>,
}

impl PerKind {
    pub fn get(&self, kind: DisplayKind) -> Option<f32> {
        match kind {
            DisplayKind::Card => self.card,
            DisplayKind::Label => self.label,
            DisplayKind::Note => self.note,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockEstimates {
    pub card: f32,
    pub label: f32,
    pub note: f32,
}

impl BlockEstimates {
    pub fn get(&self, kind: DisplayKind) -> f32 {
        match kind {
            DisplayKind::Card => self.card,
            DisplayKind::Label => self.label,
            DisplayKind::Note => self.note,
        }
    }
}

impl Default for BlockEstimates {
    fn default() -> Self {
        Self {
            card: 180.0,
            label: 56.0,
            note: 36.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimelineConfig {
    #[serde(rename = "timelineX")]
    pub timeline_x: f32,
    pub start_y: f32,
    pub event_spacing: f32,
    pub spacing: SpacingMode,
    pub spacing_overrides: PerKind,
    pub min_spacing: f32,
    pub block_gap: f32,
    pub block_estimates: BlockEstimates,
    pub lane_offset: f32,
    pub curve_radius: f32,
    pub spine_top: f32,
    pub dot_radius: f32,
    pub dot_border_width: f32,
    pub connector_width: f32,
    pub fade_connectors: bool,
    pub content_offset_x: f32,
    pub content_offset_y: f32,
    pub card_width: f32,
    pub label_width: f32,
    pub note_width: f32,
    pub card_padding: f32,
    pub label_line_height: f32,
    pub canvas_padding: f32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            timeline_x: 120.0,
            start_y: 50.0,
            event_spacing: 100.0,
            spacing: SpacingMode::Fixed,
            spacing_overrides: PerKind::default(),
            min_spacing: 24.0,
            block_gap: 24.0,
            block_estimates: BlockEstimates::default(),
            lane_offset: 70.0,
            curve_radius: 30.0,
            spine_top: 0.0,
            dot_radius: 5.0,
            dot_border_width: 2.0,
            connector_width: 1.5,
            fade_connectors: true,
            content_offset_x: 40.0,
            content_offset_y: 12.0,
            card_width: 360.0,
            label_width: 260.0,
            note_width: 200.0,
            card_padding: 16.0,
            label_line_height: 1.45,
            canvas_padding: 100.0,
        }
    }
}

impl TimelineConfig {
    pub fn block_width(&self, kind: DisplayKind) -> f32 {
        match kind {
            DisplayKind::Card => self.card_width,
            DisplayKind::Label => self.label_width,
            DisplayKind::Note => self.note_width,
        }
        .max(1.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background: Theme::modern().background,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub timeline: TimelineConfig,
    pub colors: ColorConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    title_font_size: Option<f32>,
    text_color: Option<String>,
    muted_text_color: Option<String>,
    line_color: Option<String>,
    card_background: Option<String>,
    card_border: Option<String>,
    tag_background: Option<String>,
    tag_text_color: Option<String>,
    background: Option<String>,
}

/// Config sections as they appear in a config file or an input document.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConfigFile {
    pub(crate) theme: Option<String>,
    pub(crate) theme_variables: Option<ThemeVariables>,
    pub(crate) timeline: Option<serde_json::Value>,
    pub(crate) colors: Option<serde_json::Value>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = json5::from_str(&contents)?;
    apply_config_file(&mut config, parsed)?;
    Ok(config)
}

/// Overlays the sections present in `file` on top of `config`.
pub(crate) fn apply_config_file(config: &mut Config, file: ConfigFile) -> anyhow::Result<()> {
    if let Some(theme_name) = file.theme.as_deref() {
        match Theme::by_name(theme_name) {
            Some(theme) => {
                config.theme = theme;
                config.render.background = config.theme.background.clone();
            }
            None => tracing::warn!(theme = theme_name, "unknown theme, keeping current"),
        }
    }

    if let Some(vars) = file.theme_variables {
        apply_theme_variables(&mut config.theme, vars);
        config.render.background = config.theme.background.clone();
    }

    if let Some(section) = file.timeline {
        config.timeline = merge_section(&config.timeline, section)?;
    }
    if let Some(section) = file.colors {
        config.colors = merge_section(&config.colors, section)?;
    }
    Ok(())
}

fn apply_theme_variables(theme: &mut Theme, vars: ThemeVariables) {
    if let Some(v) = vars.font_family {
        theme.font_family = v;
    }
    if let Some(v) = vars.font_size {
        theme.font_size = v;
    }
    if let Some(v) = vars.title_font_size {
        theme.title_font_size = v;
    }
    if let Some(v) = vars.text_color {
        theme.text_color = v;
    }
    if let Some(v) = vars.muted_text_color {
        theme.muted_text_color = v;
    }
    if let Some(v) = vars.line_color {
        theme.line_color = v;
    }
    if let Some(v) = vars.card_background {
        theme.card_background = v;
    }
    if let Some(v) = vars.card_border {
        theme.card_border = v;
    }
    if let Some(v) = vars.tag_background {
        theme.tag_background = v;
    }
    if let Some(v) = vars.tag_text_color {
        theme.tag_text_color = v;
    }
    if let Some(v) = vars.background {
        theme.background = v;
    }
}

/// Deserializes a partial section over the current values: keys present in
/// `patch` win, everything else keeps its current value.
fn merge_section<T>(current: &T, patch: serde_json::Value) -> anyhow::Result<T>
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    let mut base = serde_json::to_value(current)?;
    merge_json(&mut base, patch);
    Ok(serde_json::from_value(base)?)
}

fn merge_json(base: &mut serde_json::Value, patch: serde_json::Value) {
    match (base, patch) {
        (serde_json::Value::Object(base_map), serde_json::Value::Object(patch_map)) => {
            for (key, value) in patch_map {
                match base_map.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorMode;
    use std::io::Write;

    #[test]
    fn defaults_match_resume_config() {
        let cfg = TimelineConfig::default();
        assert_eq!(cfg.timeline_x, 120.0);
        assert_eq!(cfg.start_y, 50.0);
        assert_eq!(cfg.event_spacing, 100.0);
        assert_eq!(cfg.dot_radius, 5.0);
        assert_eq!(cfg.dot_border_width, 2.0);
        assert_eq!(ColorConfig::default().color_mode, ColorMode::BlueGradient);
    }

    #[test]
    fn partial_sections_overlay_defaults() {
        let mut config = Config::default();
        let file: ConfigFile = json5::from_str(
            r#"{
                // comments are fine, this is JSON5
                timeline: { timelineX: 200, spacingOverrides: { note: 60 } },
                colors: { colorMode: 'hue' },
            }"#,
        )
        .unwrap();
        apply_config_file(&mut config, file).unwrap();
        assert_eq!(config.timeline.timeline_x, 200.0);
        assert_eq!(config.timeline.start_y, 50.0);
        assert_eq!(config.timeline.spacing_overrides.note, Some(60.0));
        assert_eq!(config.timeline.spacing_overrides.card, None);
        assert_eq!(config.colors.color_mode, ColorMode::Hue);
        assert_eq!(config.colors.base_color, "#7fa8c4");
    }

    #[test]
    fn theme_variables_override_named_theme() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r##"{{ "theme": "classic", "themeVariables": {{ "lineColor": "#123456", "background": "#000" }} }}"##
        )
        .unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.theme.line_color, "#123456");
        assert_eq!(config.theme.font_size, Theme::classic().font_size);
        assert_eq!(config.render.background, "#000");
    }

    #[test]
    fn missing_path_yields_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.timeline.canvas_padding, 100.0);
    }
}
