use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub background: String,
    pub grid_dot_color: String,
    pub grid_dot_opacity: f32,
    pub grid_spacing: f32,
    pub grid_dot_radius: f32,
    pub box_fill: String,
    pub box_stroke: String,
    pub box_stroke_width: f32,
    pub box_shadow: Option<String>,
    pub selected_stroke: String,
    pub selected_stroke_width: f32,
    pub line_color: String,
    pub line_width: f32,
    pub text_color: String,
}

impl Theme {
    /// Light-blue outline look with a selection highlight.
    pub fn mindmap() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            background: "white".to_string(),
            grid_dot_color: "#d0d7de".to_string(),
            grid_dot_opacity: 0.4,
            grid_spacing: 75.0,
            grid_dot_radius: 3.0,
            box_fill: "#f8f8f8".to_string(),
            box_stroke: "rgb(173, 216, 230)".to_string(),
            box_stroke_width: 1.5,
            box_shadow: Some("drop-shadow(4px 4px 10px rgba(173, 216, 230, 0.7))".to_string()),
            selected_stroke: "rgb(30, 144, 255)".to_string(),
            selected_stroke_width: 4.0,
            line_color: "#bbb".to_string(),
            line_width: 2.0,
            text_color: "black".to_string(),
        }
    }

    /// Grey outlines, as drawn by the first sample-data version.
    pub fn classic() -> Self {
        Self {
            box_stroke: "#bbb".to_string(),
            box_stroke_width: 2.0,
            box_shadow: Some("drop-shadow(4px 4px 10px rgba(255,255,255,0.5))".to_string()),
            ..Self::mindmap()
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "mindmap" | "default" => Some(Self::mindmap()),
            "classic" | "legacy" => Some(Self::classic()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::mindmap()
    }
}
