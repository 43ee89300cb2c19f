use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub title_font_size: f32,
    pub small_font_size: f32,
    pub text_color: String,
    pub muted_text_color: String,
    pub line_color: String,
    pub card_background: String,
    pub card_border: String,
    pub tag_background: String,
    pub tag_text_color: String,
    pub background: String,
}

impl Theme {
    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            title_font_size: 15.0,
            small_font_size: 11.0,
            text_color: "#1C2430".to_string(),
            muted_text_color: "#5B6B82".to_string(),
            line_color: "#C7D2E5".to_string(),
            card_background: "#FFFFFF".to_string(),
            card_border: "#D7E0F0".to_string(),
            tag_background: "#EEF2F8".to_string(),
            tag_text_color: "#3A4A63".to_string(),
            background: "#FAFBFD".to_string(),
        }
    }

    pub fn classic() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            font_size: 14.0,
            title_font_size: 16.0,
            small_font_size: 12.0,
            text_color: "#333333".to_string(),
            muted_text_color: "#777777".to_string(),
            line_color: "#999999".to_string(),
            card_background: "#FFFFFF".to_string(),
            card_border: "#CCCCCC".to_string(),
            tag_background: "#F0F0F0".to_string(),
            tag_text_color: "#333333".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "modern" => Some(Self::modern()),
            "classic" | "default" | "base" => Some(Self::classic()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::modern()
    }
}
