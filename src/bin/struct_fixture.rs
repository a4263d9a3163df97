use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser, ValueEnum};
use cstruct_fixtures::error::log_emit_error;
use cstruct_fixtures::{
    emit_all, emit_fixture, EmitError, Fixture, FixtureConfig, IntWidth, LayoutReport, Packing,
    RecordShape,
};
use tracing::level_filters::LevelFilter;

#[derive(Parser, Debug)]
#[command(
    name = "struct-fixture",
    version,
    about = "Write the raw memory image of a C test record to a file"
)]
struct Cli {
    /// Destination file for the record image (a directory with --all)
    output: PathBuf,
    /// Field alignment rule [default: packed]
    #[arg(long, value_enum)]
    packing: Option<PackingArg>,
    /// Integer types used for the integer fields [default: fixed]
    #[arg(long = "ints", value_enum)]
    int_width: Option<IntWidthArg>,
    /// Record written to the file [default: container]
    #[arg(long, value_enum)]
    shape: Option<ShapeArg>,
    /// JSON file with packing/int_width/shape defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Also write a JSON description of the layout here
    #[arg(long)]
    layout_json: Option<PathBuf>,
    /// Write every variant into the OUTPUT directory as <profile>.bin
    #[arg(long, conflicts_with_all = ["packing", "int_width", "shape", "config", "layout_json"])]
    all: bool,
    /// Log progress to stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
enum PackingArg {
    Native,
    Packed,
}

impl From<PackingArg> for Packing {
    fn from(arg: PackingArg) -> Self {
        match arg {
            PackingArg::Native => Packing::Native,
            PackingArg::Packed => Packing::Packed,
        }
    }
}

#[derive(Debug, Copy, Clone, ValueEnum)]
enum IntWidthArg {
    Native,
    Fixed,
}

impl From<IntWidthArg> for IntWidth {
    fn from(arg: IntWidthArg) -> Self {
        match arg {
            IntWidthArg::Native => IntWidth::Native,
            IntWidthArg::Fixed => IntWidth::Fixed,
        }
    }
}

#[derive(Debug, Copy, Clone, ValueEnum)]
enum ShapeArg {
    Container,
    Simple,
}

impl From<ShapeArg> for RecordShape {
    fn from(arg: ShapeArg) -> Self {
        match arg {
            ShapeArg::Container => RecordShape::Container,
            ShapeArg::Simple => RecordShape::Simple,
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = err.print();
                return ExitCode::SUCCESS;
            }
            _ => {
                eprintln!("{}", usage_error(&err));
                return ExitCode::from(1);
            }
        },
    };

    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("struct-fixture error: {err:#}");
            ExitCode::from(1)
        }
    }
}

/// Collapse a clap parse failure into a single diagnostic line.
fn usage_error(err: &clap::Error) -> EmitError {
    let usage = Cli::command().render_usage().to_string();
    let usage = usage.trim();
    let message = match err.kind().as_str() {
        Some(reason) => format!("{}; {}", reason, usage),
        None => usage.to_string(),
    };
    EmitError::Usage { message }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::OFF,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    if cli.all {
        let written = emit_all(&cli.output).map_err(|err| {
            log_emit_error(&err, "emit all variants");
            err
        })?;
        tracing::info!(count = written.len(), dir = %cli.output.display(), "variants written");
        return Ok(());
    }

    let config = resolve_config(&cli)?;
    let fixture = Fixture::build(&config).map_err(|err| {
        log_emit_error(&err, "record construction");
        err
    })?;

    emit_fixture(&cli.output, &fixture).map_err(|err| {
        log_emit_error(&err, "fixture write");
        err
    })?;

    if let Some(path) = &cli.layout_json {
        LayoutReport::new(&fixture)
            .write_to(path)
            .map_err(|err| {
                log_emit_error(&err, "layout report write");
                err
            })
            .with_context(|| format!("writing layout report {}", path.display()))?;
    }

    Ok(())
}

/// Defaults, then the config file, then individual flags.
fn resolve_config(cli: &Cli) -> Result<FixtureConfig> {
    let mut config = match &cli.config {
        Some(path) => FixtureConfig::load_from_file(path).map_err(|err| {
            log_emit_error(&err, "config load");
            err
        })?,
        None => FixtureConfig::default(),
    };

    if let Some(packing) = cli.packing {
        config.packing = packing.into();
    }
    if let Some(int_width) = cli.int_width {
        config.int_width = int_width.into();
    }
    if let Some(shape) = cli.shape {
        config.shape = shape.into();
    }

    tracing::debug!(profile = %config.profile_name(), "resolved configuration");
    Ok(config)
}
