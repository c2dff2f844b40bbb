use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use salesforecast::config::{LoggingConfig, SalesForecastConfig};
use salesforecast::pipeline;
use salesforecast::vis::OutputType;

/// Forecast daily sales from a spreadsheet
#[derive(Parser, Debug)]
#[command(name = "salesforecast")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (TOML or YAML)
    #[arg(short, long, env = "SALESFORECAST_CONFIG")]
    config: Option<PathBuf>,

    /// Sales table (.xlsx, .xls, .ods or .csv)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Sheet to read instead of the first one
    #[arg(long)]
    sheet: Option<String>,

    /// Directory for the chart files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Number of days to forecast
    #[arg(long)]
    horizon: Option<usize>,

    /// Chart format: png or svg
    #[arg(long)]
    format: Option<String>,

    /// Also fit a default-configured model and log both fit metrics
    #[arg(long)]
    compare_default: bool,

    /// Skip chart rendering
    #[arg(long)]
    no_render: bool,
}

impl Cli {
    /// Flags take precedence over file and environment settings
    fn apply(&self, config: &mut SalesForecastConfig) -> anyhow::Result<()> {
        if let Some(input) = &self.input {
            config.input.path = input.clone();
        }
        if let Some(sheet) = &self.sheet {
            config.input.sheet = Some(sheet.clone());
        }
        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.clone();
        }
        if let Some(horizon) = self.horizon {
            config.forecast.horizon = horizon;
        }
        if let Some(format) = &self.format {
            config.output.format = format.parse::<OutputType>()?;
        }
        if self.compare_default {
            config.forecast.compare_default = true;
        }
        if self.no_render {
            config.output.render = false;
        }
        Ok(())
    }
}

/// Filter from the configured level alone; `RUST_LOG` was already folded into it
/// by the config loader, below `SALESFORECAST_LOG_LEVEL`
fn log_filter(config: &LoggingConfig) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_new(&config.level)
        .with_context(|| format!("invalid log level '{}'", config.level))
}

fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = log_filter(config)?;

    // Logs go to stderr; stdout carries the report
    match config.format.as_str() {
        "json" => fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
        _ => fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = SalesForecastConfig::load(cli.config.as_deref())
        .context("failed to load configuration")?;
    cli.apply(&mut config)?;
    config.validate().context("invalid command-line options")?;

    init_logging(&config.logging)?;
    log::info!("salesforecast starting");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    pipeline::run(&config, &mut out)
        .with_context(|| format!("forecast failed for {}", config.input.path.display()))?;
    out.flush()?;

    log::info!("salesforecast finished");
    Ok(())
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
