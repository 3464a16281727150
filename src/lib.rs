#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod reconcile;
pub mod render;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, SpiralParams};
pub use ir::TagSet;
pub use layout::{Layout, LayoutError, Placement, Size, SizedTag, compute_layout, layout_tag_set};
pub use parser::{InputFormat, ParseError, TextOptions, parse_tags};
pub use reconcile::{ElementAction, ElementSurface, Reconciliation, apply, reconcile};
pub use render::{render_svg, render_transition_svg};
pub use theme::Theme;

/// Everything needed to turn raw input into an SVG in one call.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    pub input_format: InputFormat,
    pub text: TextOptions,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::classic()
    }
}

impl RenderOptions {
    pub fn classic() -> Self {
        Self::with_theme(Theme::classic())
    }

    pub fn modern() -> Self {
        Self::with_theme(Theme::modern())
    }

    fn with_theme(theme: Theme) -> Self {
        let render = RenderConfig {
            background: theme.background.clone(),
            ..RenderConfig::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
            input_format: InputFormat::Auto,
            text: TextOptions::default(),
        }
    }

    pub fn canvas(&self) -> Size {
        Size::new(self.render.width, self.render.height)
    }
}

/// Parse and lay out `input` with the given options.
pub fn layout_with_options(input: &str, options: &RenderOptions) -> anyhow::Result<Layout> {
    let tags = parse_tags(input, options.input_format, &options.text)?;
    let layout = layout_tag_set(&tags, options.canvas(), &options.theme, &options.layout)?;
    Ok(layout)
}

pub fn render_with_options(input: &str, options: RenderOptions) -> anyhow::Result<String> {
    let layout = layout_with_options(input, &options)?;
    Ok(render_svg(&layout, &options.theme, &options.render))
}
