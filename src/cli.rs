use crate::config::{Config, load_config};
use crate::layout::{Size, layout_tag_set};
use crate::layout_dump::{LayoutDump, read_layout_dump, write_layout_dump};
use crate::parser::{InputFormat as TagInputFormat, TextOptions, parse_tags};
use crate::render::{render_transition_svg, write_output_png, write_output_svg};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::collections::BTreeMap;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "TCLOUD_LOG";

#[derive(Parser, Debug)]
#[command(name = "tcloud", version, about = "Spiral tag cloud layout and renderer")]
pub struct Args {
    /// Input file (counts or text) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png/json). Defaults to stdout for SVG and JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON5 file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Canvas width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Canvas height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// How to read the input
    #[arg(long = "inputFormat", value_enum, default_value = "auto")]
    pub input_format: InputFormat,

    /// Layout JSON from a previous run; its tags are reused by label
    #[arg(long = "previous")]
    pub previous: Option<PathBuf>,

    /// Animate moves, entries and exits relative to --previous
    #[arg(long = "animate")]
    pub animate: bool,

    /// Keep only the N most frequent tags
    #[arg(long = "maxTags")]
    pub max_tags: Option<usize>,

    /// Log layout progress to stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Auto,
    Counts,
    Text,
}

impl From<InputFormat> for TagInputFormat {
    fn from(format: InputFormat) -> Self {
        match format {
            InputFormat::Auto => TagInputFormat::Auto,
            InputFormat::Counts => TagInputFormat::Counts,
            InputFormat::Text => TagInputFormat::Text,
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = resolve_config(&args)?;
    let input = read_input(args.input.as_deref())?;

    let text_options = TextOptions {
        max_tags: args.max_tags.unwrap_or(TextOptions::default().max_tags),
        ..TextOptions::default()
    };
    let mut tags = parse_tags(&input, args.input_format.into(), &text_options)?;
    if let Some(limit) = args.max_tags {
        tags.truncate_to_top(limit);
    }
    if tags.is_empty() {
        tracing::warn!("input contains no tags");
    }

    let canvas = Size::new(config.render.width, config.render.height);
    let layout = layout_tag_set(&tags, canvas, &config.theme, &config.layout)?;
    if !layout.dropped.is_empty() {
        tracing::warn!(
            dropped = layout.dropped.len(),
            "some tags did not fit on the canvas"
        );
    }

    match args.output_format {
        OutputFormat::Json => match args.output.as_deref() {
            Some(path) => write_layout_dump(path, &layout)?,
            None => println!(
                "{}",
                serde_json::to_string_pretty(&LayoutDump::from_layout(&layout))?
            ),
        },
        OutputFormat::Svg | OutputFormat::Png => {
            let previous = load_previous(args.previous.as_deref())?;
            let svg = render_transition_svg(
                &previous,
                &layout,
                &config.theme,
                &config.render,
                args.animate,
            );
            if args.output_format == OutputFormat::Svg {
                write_output_svg(&svg, args.output.as_deref())?;
            } else {
                let output = ensure_output(&args.output, "png")?;
                write_output_png(&svg, &output, &config.render, &config.theme)?;
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    Ok(config)
}

fn load_previous(path: Option<&Path>) -> Result<BTreeMap<String, crate::layout::Placement>> {
    match path {
        Some(path) => Ok(read_layout_dump(path)?.placements()),
        None => Ok(BTreeMap::new()),
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
