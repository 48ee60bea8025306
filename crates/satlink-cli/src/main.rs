//! satlink CLI tool

mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use satlink_core::config::AnalysisConfig;
use satlink_core::observe::{init_logging, LogFormat, LogLevel};
use satlink_core::params::{LinkConfiguration, LinkDirection, LinkParams};
use satlink_core::sweep::Spacing;
use satlink_core::LinkBudgetEngine;

use output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "satlink")]
#[command(author, version, about = "Satellite link budget: SNR versus altitude", long_about = None)]
pub struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Log format (json, pretty, compact)
    #[arg(long, global = true, value_name = "FORMAT")]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate SNR over a range of altitudes
    Sweep {
        #[command(flatten)]
        source: ConfigSource,

        /// First altitude (km)
        #[arg(long, value_name = "KM")]
        start: Option<f64>,

        /// Last altitude (km)
        #[arg(long, value_name = "KM")]
        end: Option<f64>,

        /// Number of evenly spaced altitudes
        #[arg(long, value_name = "N")]
        count: Option<usize>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Print the full link budget at one altitude
    Budget {
        #[command(flatten)]
        source: ConfigSource,

        /// Spacecraft altitude (km)
        #[arg(long, value_name = "KM")]
        altitude: f64,
    },

    /// Print an example configuration file
    ExampleConfig,
}

#[derive(clap::Args, Debug)]
pub struct ConfigSource {
    /// Configuration file (YAML); defaults to the search path
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Replace the configured link parameters with a preset
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    Downlink,
    Uplink,
}

impl From<Preset> for LinkDirection {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Downlink => LinkDirection::Downlink,
            Preset::Uplink => LinkDirection::Uplink,
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    match &args.command {
        Command::Sweep {
            source,
            start,
            end,
            count,
            format,
        } => {
            let mut config = load_config(&args, source)?;
            if let Some(start) = start {
                config.sweep.start_km = *start;
            }
            if let Some(end) = end {
                config.sweep.end_km = *end;
            }
            if let Some(count) = count {
                config.sweep.spacing = Spacing::Count(*count);
            }
            run_sweep(&config, *format)
        }
        Command::Budget { source, altitude } => {
            let config = load_config(&args, source)?;
            run_budget(&config, *altitude)
        }
        Command::ExampleConfig => {
            let yaml =
                AnalysisConfig::example_yaml().context("Failed to render example configuration")?;
            print!("{yaml}");
            Ok(())
        }
    }
}

/// Load the configuration, apply overrides and install logging.
fn load_config(args: &Args, source: &ConfigSource) -> Result<AnalysisConfig> {
    let mut config = match &source.config {
        Some(path) => AnalysisConfig::load_from(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => AnalysisConfig::load().context("Failed to load configuration")?,
    };

    if let Some(preset) = source.preset {
        config.link = LinkParams::preset(preset.into());
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    if let Some(format) = args.log_format {
        config.logging.format = format;
    }

    init_logging(&config.logging);
    tracing::debug!(direction = %config.link.direction, "configuration loaded");
    Ok(config)
}

fn link_engine(config: &AnalysisConfig) -> Result<LinkBudgetEngine> {
    let link = LinkConfiguration::new(config.link.clone()).context("Invalid link parameters")?;
    Ok(LinkBudgetEngine::new(link))
}

fn run_sweep(config: &AnalysisConfig, format: OutputFormat) -> Result<()> {
    let engine = link_engine(config)?;
    let result = engine
        .sweep(&config.sweep)
        .context("Invalid altitude sampling")?;

    output::print_sweep(&result, &config.plot, format)
}

fn run_budget(config: &AnalysisConfig, altitude_km: f64) -> Result<()> {
    let engine = link_engine(config)?;
    let budget = engine
        .evaluate_budget_at_altitude(altitude_km)
        .with_context(|| format!("Cannot evaluate the link at {altitude_km} km"))?;

    output::print_budget(engine.config(), altitude_km, &budget);
    Ok(())
}
