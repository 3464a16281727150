use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Archimedean spiral `r = a + b·θ`, sampled every `step` radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpiralParams {
    pub a: f32,
    pub b: f32,
    pub step: f32,
}

impl Default for SpiralParams {
    fn default() -> Self {
        Self {
            a: 0.0,
            b: 1.0,
            step: 0.35,
        }
    }
}

impl SpiralParams {
    pub fn is_valid(&self) -> bool {
        self.a.is_finite()
            && self.b.is_finite()
            && self.step.is_finite()
            && self.a >= 0.0
            && self.b > 0.0
            && self.step > 0.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub spiral: SpiralParams,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Hard ceiling on spiral samples per tag. The engine also stops once the
    /// spiral has left the canvas, whichever comes first.
    pub max_samples: usize,
    /// Extra clearance around each tag for collision tests only.
    pub tag_padding: f32,
    pub label_line_height: f32,
    /// Inner padding added to measured text before layout.
    pub label_padding_x: f32,
    pub label_padding_y: f32,
    pub fast_text_metrics: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            spiral: SpiralParams::default(),
            min_scale: 1.0,
            max_scale: 3.0,
            max_samples: 200_000,
            tag_padding: 0.0,
            label_line_height: 1.2,
            label_padding_x: 2.0,
            label_padding_y: 1.0,
            fast_text_metrics: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
    pub animation_ms: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            background: "#FFFFFF".to_string(),
            animation_ms: 400,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::classic();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariablesFile {
    font_family: Option<String>,
    font_size: Option<f32>,
    font_weight: Option<String>,
    text_color: Option<String>,
    palette: Option<Vec<String>>,
    background: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpiralFile {
    a: Option<f32>,
    b: Option<f32>,
    step: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    spiral: Option<SpiralFile>,
    min_scale: Option<f32>,
    max_scale: Option<f32>,
    max_samples: Option<usize>,
    tag_padding: Option<f32>,
    label_line_height: Option<f32>,
    label_padding_x: Option<f32>,
    label_padding_y: Option<f32>,
    fast_text_metrics: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    animation_ms: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariablesFile>,
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
}

/// Load a JSON5 config file over the defaults. `None` yields the defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = json5::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme = Theme::by_name(theme_name)
            .ok_or_else(|| anyhow::anyhow!("unknown theme '{theme_name}'"))?;
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.font_weight {
            config.theme.font_weight = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.palette {
            config.theme.palette = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(spiral) = layout.spiral {
            if let Some(v) = spiral.a {
                config.layout.spiral.a = v;
            }
            if let Some(v) = spiral.b {
                config.layout.spiral.b = v;
            }
            if let Some(v) = spiral.step {
                config.layout.spiral.step = v;
            }
        }
        if let Some(v) = layout.min_scale {
            config.layout.min_scale = v;
        }
        if let Some(v) = layout.max_scale {
            config.layout.max_scale = v;
        }
        if let Some(v) = layout.max_samples {
            config.layout.max_samples = v;
        }
        if let Some(v) = layout.tag_padding {
            config.layout.tag_padding = v;
        }
        if let Some(v) = layout.label_line_height {
            config.layout.label_line_height = v;
        }
        if let Some(v) = layout.label_padding_x {
            config.layout.label_padding_x = v;
        }
        if let Some(v) = layout.label_padding_y {
            config.layout.label_padding_y = v;
        }
        if let Some(v) = layout.fast_text_metrics {
            config.layout.fast_text_metrics = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.animation_ms {
            config.render.animation_ms = v;
        }
    }

    config.render.background = config.theme.background.clone();

    Ok(config)
}
