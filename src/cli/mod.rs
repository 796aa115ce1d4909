//! Command-line boundary: loads a snapshot, runs the engine, prints JSON.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::billing::{calculate_mrr, calculate_total_mrr, occurrences, payments_per_month};
use crate::config::{Config, ConfigManager};
use crate::errors::{ForecastError, SnapshotError};
use crate::forecast::RangeSpec;
use crate::time::dates::{format_ymd, parse_utc};
use crate::time::{Clock, FixedClock, SystemClock};
use crate::utils::persistence::{load_snapshot, Snapshot};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Forecast(#[from] ForecastError),
    #[error("no snapshot given; pass --snapshot or set snapshot_path in {0}")]
    MissingSnapshot(String),
    #[error("Output error: {0}")]
    Output(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Parser)]
#[command(name = "forecast_core_cli", about = "Billing revenue forecasts from contract snapshots")]
pub struct Cli {
    /// Path to a config file (defaults to $FORECAST_CORE_HOME/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Actual + projected revenue report
    Report(ReportArgs),
    /// Monthly recurring revenue per contract
    Mrr(SnapshotArgs),
    /// Occurrence dates of each active contract in a window
    Schedule(ScheduleArgs),
    /// Build metadata
    Version,
}

#[derive(Debug, Args)]
pub struct SnapshotArgs {
    #[arg(long)]
    pub snapshot: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,
    /// Named range such as this_month or next_30_days
    #[arg(long)]
    pub preset: Option<String>,
    #[arg(long)]
    pub start: Option<String>,
    #[arg(long)]
    pub end: Option<String>,
    /// Pin "today" instead of reading the system clock
    #[arg(long)]
    pub today: Option<String>,
    #[arg(long)]
    pub compact: bool,
}

#[derive(Debug, Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,
    #[arg(long)]
    pub start: String,
    #[arg(long)]
    pub end: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContractMrr<'a> {
    customer_name: &'a str,
    schedule: String,
    status: String,
    payments_per_month: Decimal,
    mrr: Decimal,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MrrReport<'a> {
    contracts: Vec<ContractMrr<'a>>,
    total_mrr: Decimal,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContractSchedule<'a> {
    customer_name: &'a str,
    schedule: String,
    dates: Vec<String>,
}

/// Parses process arguments and writes the result to stdout.
pub fn run_cli() -> Result<(), CliError> {
    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out)
}

pub fn run(cli: Cli, out: &mut impl Write) -> Result<(), CliError> {
    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    };
    let config = manager.load()?;
    let location = manager.path().display().to_string();

    match cli.command {
        Command::Report(args) => {
            let snapshot = open_snapshot(&args.snapshot, &config, &location)?;
            let range = if args.preset.is_none() && args.start.is_none() && args.end.is_none() {
                RangeSpec::preset(config.default_preset.clone())
            } else {
                RangeSpec {
                    preset: args.preset,
                    start_date: args.start,
                    end_date: args.end,
                }
            };
            let clock: Box<dyn Clock> = match args.today.as_deref() {
                Some(raw) => Box::new(FixedClock::new(parse_utc(raw)?)),
                None => Box::new(SystemClock),
            };
            let report = snapshot.forecast(&range, &*clock)?;
            emit(out, &report, config.pretty_output && !args.compact)
        }
        Command::Mrr(args) => {
            let snapshot = open_snapshot(&args, &config, &location)?;
            let contracts = snapshot
                .contracts
                .iter()
                .map(|contract| ContractMrr {
                    customer_name: &contract.customer_name,
                    schedule: contract.schedule.label(),
                    status: contract.status.to_string(),
                    payments_per_month: payments_per_month(&contract.schedule),
                    mrr: calculate_mrr(contract),
                })
                .collect();
            let report = MrrReport {
                contracts,
                total_mrr: calculate_total_mrr(&snapshot.contracts),
            };
            emit(out, &report, config.pretty_output)
        }
        Command::Schedule(args) => {
            let snapshot = open_snapshot(&args.snapshot, &config, &location)?;
            let (start, end) = (parse_utc(&args.start)?, parse_utc(&args.end)?);
            if start > end {
                return Err(ForecastError::InvalidRangeSpec(format!(
                    "start {start} is after end {end}"
                ))
                .into());
            }
            let schedules: Vec<_> = snapshot
                .contracts
                .iter()
                .filter(|contract| contract.is_active())
                .map(|contract| ContractSchedule {
                    customer_name: &contract.customer_name,
                    schedule: contract.schedule.label(),
                    dates: occurrences(contract, start, end)
                        .into_iter()
                        .map(format_ymd)
                        .collect(),
                })
                .collect();
            emit(out, &schedules, config.pretty_output)
        }
        Command::Version => {
            writeln!(out, "{}", version_line())?;
            Ok(())
        }
    }
}

fn open_snapshot(
    args: &SnapshotArgs,
    config: &Config,
    location: &str,
) -> Result<Snapshot, CliError> {
    let path = args
        .snapshot
        .as_ref()
        .or(config.snapshot_path.as_ref())
        .ok_or_else(|| CliError::MissingSnapshot(location.to_string()))?;
    tracing::debug!(path = %path.display(), "loading snapshot");
    Ok(load_snapshot(path)?)
}

fn emit<T: Serialize>(out: &mut impl Write, value: &T, pretty: bool) -> Result<(), CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    writeln!(out, "{json}")?;
    Ok(())
}

fn version_line() -> String {
    format!(
        "forecast_core {} ({} {}, built {}, {})",
        env!("CARGO_PKG_VERSION"),
        env!("FORECAST_CORE_BUILD_HASH"),
        env!("FORECAST_CORE_BUILD_PROFILE"),
        env!("FORECAST_CORE_BUILD_TIMESTAMP"),
        env!("FORECAST_CORE_BUILD_RUSTC"),
    )
}
