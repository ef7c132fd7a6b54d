use crate::config::{Config, load_config, merge_init_config};
use crate::ir::Day;
use crate::layout_dump::{layout_dump_json, write_layout_dump};
use crate::parser::parse_timetable;
use crate::render::write_output_svg;
use crate::theme::{PaletteId, Theme};
use crate::time::parse_clock;
use crate::timetable::Timetable;
use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "ttgrid", version, about = "Weekly timetable grid renderer")]
pub struct Args {
    /// Input file (.json / .json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for text formats if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON5 file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Earliest displayed time, e.g. 8:00 or 480
    #[arg(long = "min-time", value_parser = parse_time_arg)]
    pub min_time: Option<u16>,

    /// Latest displayed time, e.g. 22:00 or 1320
    #[arg(long = "max-time", value_parser = parse_time_arg)]
    pub max_time: Option<u16>,

    /// Minutes per row (1-60)
    #[arg(short = 'r', long = "resolution")]
    pub resolution: Option<u16>,

    /// Comma separated display days, e.g. mon,tue,wed
    #[arg(short = 'd', long = "days", value_delimiter = ',', value_parser = parse_day_arg)]
    pub days: Option<Vec<Day>>,

    /// Colour palette: default, accessible, monochrome
    #[arg(short = 'p', long = "palette", value_parser = parse_palette_arg)]
    pub palette: Option<PaletteId>,

    /// Dark theme
    #[arg(long = "dark")]
    pub dark: bool,

    /// 12-hour clock labels
    #[arg(long = "twelve-hour")]
    pub twelve_hour: bool,

    /// Width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Html,
    Png,
    Json,
}

fn parse_time_arg(value: &str) -> Result<u16, String> {
    if let Ok(minutes) = value.parse::<u16>() {
        if value.len() > 2 {
            return Ok(minutes);
        }
    }
    parse_clock(value).ok_or_else(|| format!("invalid time `{value}`"))
}

fn parse_day_arg(value: &str) -> Result<Day, String> {
    value.parse::<Day>().map_err(|err| err.to_string())
}

fn parse_palette_arg(value: &str) -> Result<PaletteId, String> {
    PaletteId::from_name(value).ok_or_else(|| format!("unknown palette `{value}`"))
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => std::env::var("RUST_LOG")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(Level::WARN),
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn init_logging(verbose: u8) {
    let _ = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(log_level(verbose))
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn apply_args(mut config: Config, args: &Args) -> Config {
    if let Some(v) = args.min_time {
        config.grid.min_time = v;
    }
    if let Some(v) = args.max_time {
        config.grid.max_time = v;
    }
    if let Some(v) = args.resolution {
        config.grid.resolution = v;
    }
    if let Some(days) = args.days.as_ref() {
        config.grid.days = days.clone();
    }
    if let Some(v) = args.palette {
        config.presentation.palette = v;
    }
    if args.dark {
        config.presentation.dark = true;
        config.theme = Theme::dark();
    }
    if args.twelve_hour {
        config.presentation.twenty_four = false;
    }
    if let Some(v) = args.width {
        config.render.width = v;
    }
    config
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let base_config = load_config(args.config.as_deref())?;
    let input = read_input(args.input.as_deref())?;
    let parsed = parse_timetable(&input)?;

    let mut config = base_config;
    if let Some(init_cfg) = parsed.init_config {
        config = merge_init_config(config, init_cfg)?;
    }
    let config = apply_args(config, &args);
    tracing::info!(
        meetings = parsed.meetings.len(),
        min_time = config.grid.min_time,
        max_time = config.grid.max_time,
        resolution = config.grid.resolution,
        "rendering timetable"
    );

    let mut timetable = Timetable::new(config);
    match args.output_format {
        OutputFormat::Svg => {
            let svg = timetable.to_svg(&parsed.meetings)?;
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Html => {
            let html = timetable.to_html(&parsed.meetings)?;
            write_output_svg(&html, args.output.as_deref())?;
        }
        OutputFormat::Json => {
            let layout = timetable.layout(&parsed.meetings)?;
            match args.output.as_deref() {
                Some(path) => write_layout_dump(path, &layout)?,
                None => write_output_svg(&layout_dump_json(&layout)?, None)?,
            }
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let svg = timetable.to_svg(&parsed.meetings)?;
            write_png(&svg, &output, timetable.config())?;
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &Config) -> Result<()> {
    crate::render::write_output_png(svg, output, &config.render, &config.theme)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()));
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
    Err(anyhow::anyhow!(
        "Output path required for {} output",
        ext
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags_over_config() {
        let args = Args::try_parse_from([
            "ttgrid",
            "--min-time",
            "9:00",
            "--max-time",
            "1020",
            "-r",
            "30",
            "--days",
            "mon,wed,fri",
            "--palette",
            "accessible",
            "--dark",
            "--twelve-hour",
            "-vv",
        ])
        .unwrap();
        let config = apply_args(Config::default(), &args);
        assert_eq!(config.grid.min_time, 540);
        assert_eq!(config.grid.max_time, 1020);
        assert_eq!(config.grid.resolution, 30);
        assert_eq!(config.grid.days, vec![Day::Monday, Day::Wednesday, Day::Friday]);
        assert_eq!(config.presentation.palette, PaletteId::Accessible);
        assert!(config.presentation.dark);
        assert!(!config.presentation.twenty_four);
        assert_eq!(log_level(args.verbose), Level::DEBUG);
    }

    #[test]
    fn rejects_bad_flag_values() {
        assert!(Args::try_parse_from(["ttgrid", "--days", "mon,funday"]).is_err());
        assert!(Args::try_parse_from(["ttgrid", "--palette", "neon"]).is_err());
        assert!(Args::try_parse_from(["ttgrid", "--min-time", "25:00"]).is_err());
    }

    #[test]
    fn short_numbers_are_hours() {
        assert_eq!(parse_time_arg("9"), Ok(540));
        assert_eq!(parse_time_arg("480"), Ok(480));
        assert_eq!(parse_time_arg("8pm"), Ok(1200));
    }

    #[test]
    fn png_needs_an_output_path() {
        assert!(ensure_output(&None, "png").is_err());
        assert_eq!(
            ensure_output(&Some(PathBuf::from("out.png")), "png").unwrap(),
            PathBuf::from("out.png")
        );
    }
}
