use crate::config::load_config;
use crate::input::parse_rows;
use crate::ir::RawRow;
use crate::sample::sample_rows;
use crate::scene_dump::write_scene_dump;
use crate::session::{Diagram, RenderOutput};
use crate::svg::{render_svg, write_output_svg};
use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, fmt};

#[derive(Parser, Debug)]
#[command(
    name = "mindtree",
    version,
    about = "Tidy-tree renderer for flat id/name/parent records"
)]
pub struct Args {
    /// Input rows (.json/.json5) or '-' for stdin
    #[arg(short = 'i', long = "input", conflicts_with = "sample")]
    pub input: Option<PathBuf>,

    /// Render the built-in demo hierarchy instead of reading input
    #[arg(long = "sample")]
    pub sample: bool,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON5 file (theme, themeVariables, separation, layout, render)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Canvas width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Canvas height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Highlight this node id, as if it had been clicked
    #[arg(long = "select")]
    pub select: Option<String>,

    /// Verbosity, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short = 'd', long = "debug", action = ArgAction::Count)]
    pub debug: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    /// Laid-out nodes plus the primitive list
    Json,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.debug);

    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }

    let rows = if args.sample {
        sample_rows()
    } else {
        read_rows(args.input.as_deref())?
    };
    debug!(rows = rows.len(), "read input rows");

    let mut diagram = Diagram::new(config)?;
    diagram.rebuild(&rows)?;
    if let Some(node_id) = args.select.as_deref() {
        diagram.select(node_id);
    }

    let output = RenderOutput {
        tree: diagram.tree().cloned(),
        scene: diagram.scene().cloned().unwrap_or_default(),
    };
    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg(&output.scene);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Json => {
            write_scene_dump(args.output.as_deref(), &output)?;
        }
    }
    info!(primitives = output.scene.primitives.len(), "done");
    Ok(())
}

fn read_rows(path: Option<&Path>) -> Result<Vec<RawRow>> {
    let (input, source) = match path {
        Some(path) if path != Path::new("-") => (
            std::fs::read_to_string(path)
                .with_context(|| format!("reading input file {}", path.display()))?,
            path.display().to_string(),
        ),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            (buf, "stdin".to_string())
        }
    };
    parse_rows(&input).with_context(|| format!("decoding rows from {source}"))
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        3 => LevelFilter::TRACE,
        _ => {
            eprintln!("Don't be crazy, max is -d -d -d");
            LevelFilter::TRACE
        }
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();
}
