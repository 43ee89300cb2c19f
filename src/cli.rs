use crate::color::ColorMode;
use crate::config::{Config, SpacingMode, load_config};
use crate::layout::compute_layout;
use crate::layout_dump::write_layout_dump;
use crate::{build_timeline_scene, load_document};
use crate::measure::Measurements;
use crate::render::{render_html, render_svg, write_output, write_output_png};
use crate::timesheet::{
    EntryTemplate, description_from_tickets, each_weekday_of_interval, extract_ticket_refs,
    parse_date, plan_week_fill,
};
use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rtl", version, about = "Résumé timeline renderer")]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Lay out a timeline document and render it
    Render(RenderArgs),
    /// Plan a timesheet fill and emit the browser console script
    Timesheet(TimesheetArgs),
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Input file (.json, .json5 or a JS data file) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for SVG and HTML if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config file (JSON or JSON5) applied before the document's own sections
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Viewport width
    #[arg(short = 'w', long = "width", default_value_t = 1200.0)]
    pub width: f32,

    /// Viewport height (PNG default size)
    #[arg(short = 'H', long = "height", default_value_t = 800.0)]
    pub height: f32,

    /// Override the color mode
    #[arg(long = "color-mode", value_enum)]
    pub color_mode: Option<ColorMode>,

    /// Override the spacing mode
    #[arg(long = "spacing", value_enum)]
    pub spacing: Option<SpacingMode>,

    /// JSON object of measured block heights keyed by event id
    #[arg(long = "measurements")]
    pub measurements: Option<PathBuf>,

    /// Write the computed layout as JSON
    #[arg(long = "dump-layout")]
    pub dump_layout: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct TimesheetArgs {
    /// First day (YYYY-MM-DD)
    #[arg(long = "from")]
    pub from: String,

    /// Last day, inclusive (YYYY-MM-DD)
    #[arg(long = "to")]
    pub to: String,

    #[arg(long = "start-time", default_value = "09:00")]
    pub start_time: String,

    #[arg(long = "end-time", default_value = "17:00")]
    pub end_time: String,

    #[arg(long = "subject", default_value = "Feature Development")]
    pub subject: String,

    #[arg(long = "description")]
    pub description: Option<String>,

    /// File of commit subjects to collect ticket references from
    #[arg(long = "commits")]
    pub commits: Option<PathBuf>,

    /// Output file for the script. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Html,
    Png,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Command::Render(args) => run_render(args),
        Command::Timesheet(args) => run_timesheet(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run_render(args: RenderArgs) -> Result<()> {
    let input = read_input(args.input.as_deref())?;
    let (timeline, mut config) = load_document(&input, load_config(args.config.as_deref())?)?;
    apply_overrides(&mut config, &args);

    let external = match args.measurements.as_deref() {
        Some(path) => Some(Measurements::load(path)?),
        None => None,
    };
    let (scene, heights) = build_timeline_scene(&timeline, &config, args.width, external);

    if let Some(path) = args.dump_layout.as_deref() {
        let layout = compute_layout(&timeline, &config.timeline, &heights);
        write_layout_dump(path, &layout, &timeline)?;
    }

    match args.output_format {
        OutputFormat::Svg => write_output(&render_svg(&scene, &config.theme), args.output.as_deref()),
        OutputFormat::Html => {
            write_output(&render_html(&scene, &config.theme), args.output.as_deref())
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_output_png(&render_svg(&scene, &config.theme), &output, &config.render)
        }
    }
}

fn apply_overrides(config: &mut Config, args: &RenderArgs) {
    config.render.width = args.width;
    config.render.height = args.height;
    if let Some(mode) = args.color_mode {
        config.colors.color_mode = mode;
    }
    if let Some(spacing) = args.spacing {
        config.timeline.spacing = spacing;
    }
}

fn run_timesheet(args: TimesheetArgs) -> Result<()> {
    let start = parse_date(&args.from)?;
    let end = parse_date(&args.to)?;
    let days = each_weekday_of_interval(start, end);
    if days.is_empty() {
        tracing::warn!(from = %start, to = %end, "no weekdays in range");
    }

    let description = match (args.description, args.commits.as_deref()) {
        (Some(text), _) => text,
        (None, Some(path)) => {
            let log = std::fs::read_to_string(path)?;
            description_from_tickets(&extract_ticket_refs(&log))
        }
        (None, None) => String::new(),
    };
    let template = EntryTemplate {
        start_time: args.start_time,
        end_time: args.end_time,
        subject: args.subject,
        description,
    };

    let plan = plan_week_fill(&days, &template);
    tracing::info!(days = plan.len(), "planned timesheet fill");
    write_output(&plan.to_console_script(), args.output.as_deref())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(std::fs::read_to_string(path)?);
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
