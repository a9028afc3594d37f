use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum, error::ErrorKind};
use serde::Serialize;

use crate::batch::DirectoryBatchDriver;
use crate::config::{ArrayDiscovery, ArraySegmentConfig, LogParseConfig, MalformedTimestampPolicy};
use crate::constants::array::{
    AVERAGE_RETURN_MARKER, DEFAULT_EPOCHS_PER_SEED, DEFAULT_WALL_TIME_INCREMENT,
};
use crate::constants::sink::DEFAULT_OUTPUT_DIR;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TimestampArg {
    Skip,
    Fail,
}

impl From<TimestampArg> for MalformedTimestampPolicy {
    fn from(value: TimestampArg) -> Self {
        match value {
            TimestampArg::Skip => MalformedTimestampPolicy::Skip,
            TimestampArg::Fail => MalformedTimestampPolicy::Fail,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "parse_log",
    disable_help_subcommand = true,
    about = "Extract per-task average-return curves from a training log",
    long_about = "Scan one timestamped training log for `[INFO] Epoch <n> | EnvName: <task> ... AverageReturn: <x>` lines and write one wall_time,step,value CSV per task."
)]
struct ParseLogCli {
    #[arg(value_name = "LOG_FILE", help = "Training log to parse")]
    log_file: PathBuf,
    #[arg(
        long = "output-dir",
        value_name = "DIR",
        default_value = DEFAULT_OUTPUT_DIR,
        help = "Directory receiving the CSV files (created if absent)"
    )]
    output_dir: PathBuf,
    #[arg(
        long = "malformed-timestamps",
        value_enum,
        default_value = "skip",
        help = "Skip or fail on timestamp prefixes that are not valid dates"
    )]
    malformed_timestamps: TimestampArg,
    #[arg(long = "json-report", help = "Print a JSON report of written files to stdout")]
    json_report: bool,
}

#[derive(Debug, Parser)]
#[command(
    name = "convert_arrays",
    disable_help_subcommand = true,
    about = "Split concatenated per-seed return arrays into per-seed CSV curves",
    long_about = "Read every `<task>_AverageReturn.npy` array in a directory, split it into runs of --epochs-per-seed samples, drop any incomplete trailing run, and write one wall_time,step,value CSV per task and seed."
)]
struct ConvertArraysCli {
    #[arg(value_name = "INPUT_DIR", help = "Directory containing the .npy arrays")]
    input_dir: PathBuf,
    #[arg(
        long = "output-dir",
        value_name = "DIR",
        default_value = DEFAULT_OUTPUT_DIR,
        help = "Directory receiving the CSV files (created if absent)"
    )]
    output_dir: PathBuf,
    #[arg(
        long = "epochs-per-seed",
        default_value_t = DEFAULT_EPOCHS_PER_SEED,
        value_parser = parse_positive_usize,
        help = "Number of recorded epochs in one seed run"
    )]
    epochs_per_seed: usize,
    #[arg(
        long = "wall-time-increment",
        default_value_t = DEFAULT_WALL_TIME_INCREMENT,
        value_parser = parse_positive_f64,
        help = "Synthetic seconds between recorded steps"
    )]
    wall_time_increment: f64,
    #[arg(
        long,
        default_value = AVERAGE_RETURN_MARKER,
        help = "File-name marker selecting arrays; removed from the task name"
    )]
    marker: String,
    #[arg(long = "json-report", help = "Print a JSON report of written files to stdout")]
    json_report: bool,
}

/// Run the `parse_log` command with arguments excluding the program name.
pub fn run_parse_log<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    init_tracing();

    let Some(cli) =
        parse_cli::<ParseLogCli, _>(std::iter::once("parse_log".to_string()).chain(args_iter))?
    else {
        return Ok(());
    };

    let driver = DirectoryBatchDriver::default().with_log_config(
        LogParseConfig::default().with_malformed_timestamps(cli.malformed_timestamps.into()),
    );
    let report = driver.convert_log_file(&cli.log_file, &cli.output_dir)?;

    if cli.json_report {
        print_json(&report)?;
    } else {
        println!("=== log conversion ===");
        println!("source: {}", report.source.display());
        println!("output: {}", cli.output_dir.display());
        for output in &report.outputs {
            println!("  {} => {} rows", output.task_id, output.rows);
        }
        println!("tasks written: {}", report.outputs.len());
    }
    Ok(())
}

/// Run the `convert_arrays` command with arguments excluding the program name.
pub fn run_convert_arrays<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    init_tracing();

    let Some(cli) = parse_cli::<ConvertArraysCli, _>(
        std::iter::once("convert_arrays".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    let driver = DirectoryBatchDriver::new(
        ArraySegmentConfig::new(cli.epochs_per_seed)
            .with_wall_time_increment(cli.wall_time_increment),
    )
    .with_discovery(ArrayDiscovery::default().with_marker(cli.marker));
    let report = driver.convert_array_dir(&cli.input_dir, &cli.output_dir)?;

    if cli.json_report {
        print_json(&report)?;
    } else {
        println!("=== array conversion ===");
        println!("input: {}", cli.input_dir.display());
        println!("output: {}", cli.output_dir.display());
        for file in &report.files {
            println!(
                "  {} => {} seeds (length={}, discarded={})",
                file.task_id,
                file.outputs.len(),
                file.original_len,
                file.discarded
            );
        }
        println!(
            "arrays: {}, rows written: {}, entries discarded: {}",
            report.files.len(),
            report.total_rows(),
            report.total_discarded()
        );
    }
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_json<T: Serialize>(report: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn parse_positive_usize(raw: &str) -> Result<usize, String> {
    let parsed = raw.parse::<usize>().map_err(|_| {
        format!(
            "Could not parse --epochs-per-seed value '{}' as a positive integer",
            raw
        )
    })?;
    if parsed == 0 {
        return Err("--epochs-per-seed must be greater than zero".to_string());
    }
    Ok(parsed)
}

fn parse_positive_f64(raw: &str) -> Result<f64, String> {
    let parsed = raw
        .parse::<f64>()
        .map_err(|_| format!("Could not parse '{}' as a number", raw))?;
    if !parsed.is_finite() || parsed <= 0.0 {
        return Err("--wall-time-increment must be a positive finite number".to_string());
    }
    Ok(parsed)
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}
