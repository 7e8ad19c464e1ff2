use crate::theme::Theme;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Names containing this are drawn as compact boxes unless a row says otherwise.
pub const DEFAULT_COMPACT_LABEL_PATTERN: &str = "Phase";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 100.0,
            right: 200.0,
            bottom: 100.0,
            left: 500.0,
        }
    }
}

/// Spacing units between adjacent nodes of the same depth, in multiples of the
/// breadth-axis unit before scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeparationPolicy {
    /// Nodes sharing a parent.
    pub siblings: f32,
    /// Same depth, different parents.
    pub cousins: f32,
    /// Both nodes on the deepest tier; `None` disables the tier rule.
    pub deepest_tier: Option<f32>,
}

impl SeparationPolicy {
    pub fn refined() -> Self {
        Self {
            siblings: 3.0,
            cousins: 5.0,
            deepest_tier: Some(4.0),
        }
    }

    pub fn legacy() -> Self {
        Self {
            siblings: 5.0,
            cousins: 7.0,
            deepest_tier: None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "refined" | "default" => Some(Self::refined()),
            "legacy" => Some(Self::legacy()),
            _ => None,
        }
    }
}

impl Default for SeparationPolicy {
    fn default() -> Self {
        Self::refined()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeometryConfig {
    pub char_width: f32,
    pub padding: f32,
    pub min_height: f32,
    pub height_per_char: f32,
    pub compact_height: f32,
    /// Distance from the box's left edge to the node anchor.
    pub box_inset: f32,
    pub link_offset: f32,
    pub corner_radius: f32,
    pub font_size: f32,
    pub compact_font_size: f32,
    pub baseline_shift: f32,
    pub compact_baseline_shift: f32,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            char_width: 14.0,
            padding: 80.0,
            min_height: 60.0,
            height_per_char: 2.0,
            compact_height: 20.0,
            box_inset: 60.0,
            link_offset: 80.0,
            corner_radius: 6.0,
            font_size: 14.0,
            compact_font_size: 8.0,
            baseline_shift: 5.0,
            compact_baseline_shift: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub margin: Margins,
    pub separation: SeparationPolicy,
    /// Depth treated as the deepest, most size-variable tier (separation and
    /// link offset rules).
    pub tier_depth: Option<usize>,
    /// Regex; names matching it are classified as the compact tier.
    pub compact_label_pattern: Option<String>,
    pub geometry: GeometryConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin: Margins::default(),
            separation: SeparationPolicy::default(),
            tier_depth: Some(4),
            compact_label_pattern: Some(DEFAULT_COMPACT_LABEL_PATTERN.to_string()),
            geometry: GeometryConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    /// Draw the dotted grid behind the diagram.
    pub grid: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 2500.0,
            height: 2200.0,
            grid: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    background: Option<String>,
    box_fill: Option<String>,
    box_stroke: Option<String>,
    box_stroke_width: Option<f32>,
    selected_stroke: Option<String>,
    selected_stroke_width: Option<f32>,
    line_color: Option<String>,
    line_width: Option<f32>,
    text_color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    separation: Option<String>,
    layout: Option<LayoutConfig>,
    geometry: Option<GeometryConfig>,
    render: Option<RenderConfig>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("parsing config file {}", path.display()))
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = json5::from_str(contents)?;
    let mut config = Config::default();

    if let Some(name) = parsed.theme.as_deref() {
        config.theme =
            Theme::from_name(name).ok_or_else(|| anyhow::anyhow!("unknown theme `{name}`"))?;
    }

    if let Some(vars) = parsed.theme_variables {
        apply_theme_variables(&mut config.theme, vars);
    }

    if let Some(layout) = parsed.layout {
        config.layout = layout;
    }

    if let Some(geometry) = parsed.geometry {
        config.layout.geometry = geometry;
    }

    // The named preset wins over whatever the layout section carried.
    if let Some(name) = parsed.separation.as_deref() {
        config.layout.separation = SeparationPolicy::from_name(name)
            .ok_or_else(|| anyhow::anyhow!("unknown separation preset `{name}`"))?;
    }

    if let Some(render) = parsed.render {
        config.render = render;
    }

    Ok(config)
}

fn apply_theme_variables(theme: &mut Theme, vars: ThemeVariables) {
    if let Some(v) = vars.font_family {
        theme.font_family = v;
    }
    if let Some(v) = vars.background {
        theme.background = v;
    }
    if let Some(v) = vars.box_fill {
        theme.box_fill = v;
    }
    if let Some(v) = vars.box_stroke {
        theme.box_stroke = v;
    }
    if let Some(v) = vars.box_stroke_width {
        theme.box_stroke_width = v;
    }
    if let Some(v) = vars.selected_stroke {
        theme.selected_stroke = v;
    }
    if let Some(v) = vars.selected_stroke_width {
        theme.selected_stroke_width = v;
    }
    if let Some(v) = vars.line_color {
        theme.line_color = v;
    }
    if let Some(v) = vars.line_width {
        theme.line_width = v;
    }
    if let Some(v) = vars.text_color {
        theme.text_color = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = parse_config(
            r##"{
                // json5 allows comments and unquoted keys
                theme: "classic",
                themeVariables: { lineColor: "#333" },
                separation: "legacy",
                layout: { margin: { left: 40 }, tierDepth: null },
                render: { width: 1200 },
            }"##,
        )
        .unwrap();
        assert_eq!(config.theme.box_stroke, "#bbb");
        assert_eq!(config.theme.line_color, "#333");
        assert_eq!(config.layout.separation, SeparationPolicy::legacy());
        assert_eq!(config.layout.margin.left, 40.0);
        assert_eq!(config.layout.margin.top, 100.0);
        assert_eq!(config.layout.tier_depth, None);
        assert_eq!(config.layout.geometry, GeometryConfig::default());
        assert_eq!(config.render.width, 1200.0);
        assert_eq!(config.render.height, 2200.0);
    }

    #[test]
    fn top_level_geometry_section_overrides_box_constants() {
        let config = parse_config(r#"{ geometry: { charWidth: 9, linkOffset: 0 } }"#).unwrap();
        assert_eq!(config.layout.geometry.char_width, 9.0);
        assert_eq!(config.layout.geometry.link_offset, 0.0);
        assert_eq!(config.layout.geometry.padding, 80.0);
    }

    #[test]
    fn unknown_presets_are_rejected() {
        assert!(parse_config(r#"{ theme: "neon" }"#).is_err());
        assert!(parse_config(r#"{ separation: "tight" }"#).is_err());
    }
}
