use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use log::{LevelFilter, Metadata, Record};

use zenlayers::catalog::{Catalog, CatalogConfig};
use zenlayers::resolve::{ChildOrder, RawDocument, Resolver};
use zenlayers::svg::render_composition_svg;
use zenlayers::{ComposeOptions, FitMode, ImageFormat, OpacityConvention, Size, compose, sniff};

#[derive(Parser, Debug)]
#[command(
    name = "zenlayers",
    version,
    about = "Layered design document tools: header sniffing, template catalogs, composition",
    arg_required_else_help = true
)]
struct Cli {
    /// More log output (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Less log output (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    quiet: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the pixel dimensions of PNG and JPEG files
    Sniff {
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },
    /// Scan a template directory and write its catalog JSON
    Catalog {
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,
        /// Output file; stdout when omitted
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
        /// TOML catalog settings
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// Compose a layer tree (JSON) for a surface and print the placements
    Compose {
        #[arg(value_name = "LAYERS")]
        layers: PathBuf,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
        /// Also write an SVG preview
        #[arg(long, value_name = "FILE")]
        svg: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OpacityArg::Fraction)]
        opacity: OpacityArg,
        #[arg(long, value_enum, default_value_t = OrderArg::BottomToTop)]
        order: OrderArg,
        /// Never upscale documents smaller than the surface
        #[arg(long)]
        within: bool,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OpacityArg {
    Fraction,
    Byte,
    Auto,
}

impl From<OpacityArg> for OpacityConvention {
    fn from(arg: OpacityArg) -> Self {
        match arg {
            OpacityArg::Fraction => Self::Fraction,
            OpacityArg::Byte => Self::Byte,
            OpacityArg::Auto => Self::Auto,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OrderArg {
    BottomToTop,
    TopToBottom,
}

impl From<OrderArg> for ChildOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::BottomToTop => Self::BottomToTop,
            OrderArg::TopToBottom => Self::TopToBottom,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Sniff { files } => sniff_files(&files),
        Command::Catalog { dir, output, config } => write_catalog(dir, output, config),
        Command::Compose {
            layers,
            width,
            height,
            svg,
            opacity,
            order,
            within,
        } => {
            let resolver = Resolver::new().opacity(opacity.into()).child_order(order.into());
            let options = ComposeOptions::new().fit(if within { FitMode::Within } else { FitMode::Fit });
            compose_file(&layers, Size::new(width, height), &resolver, &options, svg)
        }
    }
}

fn sniff_files(files: &[PathBuf]) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for path in files {
        let data = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ImageFormat::from_extension);
        let header = match format {
            Some(format) => sniff::sniff(&data, format),
            None => sniff::sniff_auto(&data),
        };
        match header.size() {
            Some(size) => writeln!(out, "{}: {size}", path.display())?,
            None => writeln!(out, "{}: unknown", path.display())?,
        }
    }
    Ok(())
}

fn write_catalog(dir: Option<PathBuf>, output: Option<PathBuf>, config: Option<PathBuf>) -> Result<()> {
    let mut config = match config {
        Some(path) => CatalogConfig::load(&path)
            .with_context(|| format!("failed to load catalog config {}", path.display()))?,
        None => CatalogConfig::default(),
    };
    if let Some(dir) = dir {
        config.input_dir = dir;
    }

    let catalog = Catalog::scan(&config).context("failed to scan templates")?;
    let json = catalog.to_json()?;
    match output {
        Some(path) => {
            fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
            log::info!("wrote {} templates to {}", catalog.count, path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn compose_file(
    layers: &Path,
    surface: Size,
    resolver: &Resolver,
    options: &ComposeOptions,
    svg: Option<PathBuf>,
) -> Result<()> {
    let raw = fs::read_to_string(layers).with_context(|| format!("failed to read {}", layers.display()))?;
    let raw: RawDocument =
        serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", layers.display()))?;
    let document = resolver.resolve(&raw)?;
    let composition = compose(&document, surface, options).map_err(|e| anyhow!("{}", e.error()))?;

    let skipped: Vec<_> = composition
        .skipped
        .iter()
        .map(|s| serde_json::json!({ "name": s.name, "depth": s.depth, "reason": s.reason.to_string() }))
        .collect();
    let report = serde_json::json!({
        "viewport": composition.viewport,
        "placements": composition.placements,
        "skipped": skipped,
        "hidden": composition.hidden,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    if let Some(path) = svg {
        fs::write(&path, render_composition_svg(&composition))
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: u8, quiet: u8) {
    let level = match i16::from(verbose) - i16::from(quiet) {
        i16::MIN..=-2 => LevelFilter::Off,
        -1 => LevelFilter::Error,
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
