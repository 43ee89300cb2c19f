use crate::text_metrics;

/// Wrapped text with its measured extent.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub width: f32,
    pub height: f32,
}

impl TextBlock {
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            width: 0.0,
            height: 0.0,
        }
    }
}

/// Word-wraps `text` to `max_width` px and measures the result.
pub fn wrap_text(
    text: &str,
    max_width: f32,
    font_size: f32,
    line_height: f32,
    font_family: &str,
) -> TextBlock {
    let mut lines = Vec::new();
    for raw in text.split('\n') {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        lines.extend(wrap_line(raw, max_width, font_size, font_family));
    }
    if lines.is_empty() {
        return TextBlock::empty();
    }
    let width = lines
        .iter()
        .map(|line| text_width(line, font_size, font_family))
        .fold(0.0, f32::max);
    let height = lines.len() as f32 * font_size * line_height;
    TextBlock {
        lines,
        width,
        height,
    }
}

pub fn wrap_line(line: &str, max_width: f32, font_size: f32, font_family: &str) -> Vec<String> {
    if text_width(line, font_size, font_family) <= max_width {
        return vec![line.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if text_width(&candidate, font_size, font_family) > max_width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

pub fn text_width(text: &str, font_size: f32, font_family: &str) -> f32 {
    text_metrics::measure_text_width(text, font_size, font_family)
        .unwrap_or_else(|| fallback_text_width(text, font_size))
}

pub(crate) fn fallback_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(char_width_factor).sum::<f32>() * font_size
}

/// Rough em-relative advance for a sans-serif face.
fn char_width_factor(ch: char) -> f32 {
    match ch {
        ' ' => 0.306,
        '.' | ',' | ':' | ';' | '|' | '!' | '(' | ')' | '[' | ']' | '\'' => 0.321,
        'i' | 'j' | 'l' | 'I' => 0.25,
        'f' | 'r' | 't' => 0.34,
        'm' | 'w' => 0.84,
        'M' | 'W' => 0.93,
        '@' | '#' | '%' | '&' => 0.946,
        c if c.is_ascii_uppercase() => 0.68,
        c if c.is_ascii_lowercase() => 0.57,
        c if c.is_ascii_digit() => 0.6,
        c if c.is_ascii() => 0.568,
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_width_scales_with_font_size() {
        let w12 = fallback_text_width("Résumé", 12.0);
        let w24 = fallback_text_width("Résumé", 24.0);
        assert!((w24 - w12 * 2.0).abs() < 0.01);
    }

    #[test]
    fn short_line_is_not_wrapped() {
        assert_eq!(wrap_line("Rust", 1000.0, 14.0, "sans-serif").len(), 1);
    }

    #[test]
    fn long_line_wraps_on_words() {
        let lines = wrap_line(
            "Building scalable, performant web applications with modern frameworks",
            120.0,
            14.0,
            "sans-serif",
        );
        assert!(lines.len() > 1, "expected wrapping, got {lines:?}");
        assert_eq!(
            lines.join(" "),
            "Building scalable, performant web applications with modern frameworks"
        );
    }

    #[test]
    fn blank_text_is_empty_block() {
        let block = wrap_text("  \n ", 200.0, 14.0, 1.4, "sans-serif");
        assert!(block.lines.is_empty());
        assert_eq!(block.height, 0.0);
    }

    #[test]
    fn block_height_counts_lines() {
        let block = wrap_text("one\ntwo", 500.0, 10.0, 1.5, "sans-serif");
        assert_eq!(block.lines, vec!["one", "two"]);
        assert!((block.height - 30.0).abs() < f32::EPSILON);
    }
}
