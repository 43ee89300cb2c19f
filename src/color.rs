use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_BASE_COLOR: &str = "#7fa8c4";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "camelCase")]
pub enum ColorMode {
    /// Every event uses the base color.
    Mono,
    /// Evenly spaced hue rotation.
    Hue,
    /// Fixed hue, saturation and lightness ramp down the list.
    #[default]
    #[cfg_attr(feature = "cli", value(name = "blueGradient", alias = "blue-gradient"))]
    BlueGradient,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    fn lerp(&self, t: f32) -> f32 {
        let (lo, hi) = self.ordered();
        lo + (hi - lo) * t.clamp(0.0, 1.0)
    }

    fn ordered(&self) -> (f32, f32) {
        if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorConfig {
    pub color_mode: ColorMode,
    pub base_color: String,
    pub hue_start: f32,
    pub hue_saturation: f32,
    pub hue_lightness: f32,
    /// Hue of the gradient ramp; the base color's hue when unset.
    pub gradient_hue: Option<f32>,
    pub gradient_saturation: Range,
    pub gradient_lightness: Range,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::BlueGradient,
            base_color: DEFAULT_BASE_COLOR.to_string(),
            hue_start: 0.0,
            hue_saturation: 65.0,
            hue_lightness: 55.0,
            gradient_hue: None,
            gradient_saturation: Range::new(18.0, 48.0),
            gradient_lightness: Range::new(38.0, 72.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    pub fn new(h: f32, s: f32, l: f32) -> Self {
        Self {
            h: h.rem_euclid(360.0),
            s: s.clamp(0.0, 100.0),
            l: l.clamp(0.0, 100.0),
        }
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            fmt_component(self.h),
            fmt_component(self.s),
            fmt_component(self.l)
        )
    }
}

fn fmt_component(value: f32) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i32)
    } else {
        format!("{rounded}")
    }
}

/// Per-event display color. Pure; `total <= 1` never divides by zero.
pub fn color(index: usize, total: usize, config: &ColorConfig) -> Hsl {
    match config.color_mode {
        ColorMode::Mono => base_hsl(config),
        ColorMode::Hue => {
            let steps = total.max(1) as f32;
            let hue = config.hue_start + index as f32 * 360.0 / steps;
            Hsl::new(hue, config.hue_saturation, config.hue_lightness)
        }
        ColorMode::BlueGradient => {
            let t = if total <= 1 {
                0.0
            } else {
                index as f32 / (total - 1) as f32
            };
            let hue = config.gradient_hue.unwrap_or_else(|| base_hsl(config).h);
            Hsl::new(
                hue,
                config.gradient_saturation.lerp(t),
                config.gradient_lightness.lerp(t),
            )
        }
    }
}

fn base_hsl(config: &ColorConfig) -> Hsl {
    parse_color(&config.base_color).unwrap_or_else(|| {
        tracing::warn!(color = %config.base_color, "unparseable base color, using default");
        parse_color(DEFAULT_BASE_COLOR).unwrap_or(Hsl::new(204.0, 37.0, 63.0))
    })
}

/// Parses `#rgb`, `#rrggbb` or `hsl(h, s%, l%)`.
pub fn parse_color(input: &str) -> Option<Hsl> {
    let value = input.trim();
    if let Some(hex) = value.strip_prefix('#') {
        let (r, g, b) = parse_hex(hex)?;
        return Some(rgb_to_hsl(r, g, b));
    }
    let lower = value.to_ascii_lowercase();
    let inner = lower
        .strip_prefix("hsl(")
        .and_then(|rest| rest.strip_suffix(')'))?;
    let mut parts = inner
        .split(',')
        .map(|part| part.trim().trim_end_matches('%').trim_end_matches("deg"));
    let h = parts.next()?.parse::<f32>().ok()?;
    let s = parts.next()?.parse::<f32>().ok()?;
    let l = parts.next()?.parse::<f32>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Hsl::new(h, s, l))
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let expand = |idx: usize| u8::from_str_radix(&hex[idx..idx + 1], 16).ok().map(|v| v * 17);
            Some((expand(0)?, expand(1)?, expand(2)?))
        }
        6 => {
            let channel = |idx: usize| u8::from_str_radix(&hex[idx..idx + 2], 16).ok();
            Some((channel(0)?, channel(2)?, channel(4)?))
        }
        _ => None,
    }
}

fn rgb_to_hsl(r: u8, g: u8, b: u8) -> Hsl {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let delta = max - min;
    if delta == 0.0 {
        return Hsl::new(0.0, 0.0, l * 100.0);
    }
    let s = if l > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };
    let h = if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    Hsl::new(h * 60.0, s * 100.0, l * 100.0)
}
