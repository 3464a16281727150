use serde::Deserialize;
use tagcloud_rs::layout_dump::LayoutDump;
use tagcloud_rs::parser::parse_json_counts;
use tagcloud_rs::{InputFormat, RenderOptions, Theme, layout_tag_set, render_with_options};
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TagCloudOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    width: Option<f32>,
    height: Option<f32>,
    min_scale: Option<f32>,
    max_scale: Option<f32>,
    tag_padding: Option<f32>,
    max_tags: Option<usize>,
    input_format: Option<String>,
    fast_text: Option<bool>,
}

fn parse_options(options_json: Option<String>) -> Result<TagCloudOptions, String> {
    match options_json {
        Some(raw) => serde_json::from_str(&raw).map_err(|error| error.to_string()),
        None => Ok(TagCloudOptions::default()),
    }
}

fn build_render_options(options: TagCloudOptions) -> Result<RenderOptions, String> {
    let mut render_options = match options.theme.as_deref() {
        None => RenderOptions::classic(),
        Some(name) => {
            let theme = Theme::by_name(name).ok_or_else(|| format!("unknown theme '{name}'"))?;
            let mut render_options = RenderOptions::classic();
            render_options.render.background = theme.background.clone();
            render_options.theme = theme;
            render_options
        }
    };

    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        render_options.theme.font_size = font_size;
    }
    if let Some(width) = options.width {
        render_options.render.width = width;
    }
    if let Some(height) = options.height {
        render_options.render.height = height;
    }
    if let Some(min_scale) = options.min_scale {
        render_options.layout.min_scale = min_scale;
    }
    if let Some(max_scale) = options.max_scale {
        render_options.layout.max_scale = max_scale;
    }
    if let Some(tag_padding) = options.tag_padding {
        render_options.layout.tag_padding = tag_padding;
    }
    if let Some(max_tags) = options.max_tags {
        render_options.text.max_tags = max_tags;
    }
    render_options.input_format = match options.input_format.as_deref() {
        None | Some("auto") => InputFormat::Auto,
        Some("counts") => InputFormat::Counts,
        Some("text") => InputFormat::Text,
        Some(other) => return Err(format!("unknown input format '{other}'")),
    };
    // Browsers have no system font database to query.
    render_options.layout.fast_text_metrics = options.fast_text.unwrap_or(true);

    Ok(render_options)
}

fn layout_json(counts_json: &str, options: TagCloudOptions) -> Result<String, String> {
    let max_tags = options.max_tags;
    let render_options = build_render_options(options)?;
    let mut tags = parse_json_counts(counts_json).map_err(|error| error.to_string())?;
    if let Some(limit) = max_tags {
        tags.truncate_to_top(limit);
    }
    let layout = layout_tag_set(
        &tags,
        render_options.canvas(),
        &render_options.theme,
        &render_options.layout,
    )
    .map_err(|error| error.to_string())?;
    serde_json::to_string(&LayoutDump::from_layout(&layout)).map_err(|error| error.to_string())
}

/// Lay out a JSON object of `label: count` and return the layout JSON.
#[wasm_bindgen]
pub fn layout_tag_cloud(
    counts_json: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    let options = parse_options(options_json).map_err(|error| JsValue::from_str(&error))?;
    layout_json(counts_json, options).map_err(|error| JsValue::from_str(&error))
}

#[wasm_bindgen]
pub fn render_tag_cloud_svg(input: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = parse_options(options_json).map_err(|error| JsValue::from_str(&error))?;
    let render_options = build_render_options(options).map_err(|error| JsValue::from_str(&error))?;
    render_with_options(input, render_options)
        .map_err(|error| JsValue::from_str(&error.to_string()))
}
