use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use log::info;
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

use crate::allocation::{allocate, format_report, to_csv_string, to_json, AllocationResult};
use crate::data::{
    load_profile, validate_table, ValidationOptions, CONFIG_PATH_ENV, DEFAULT_DISTRIBUTIONS_PATH,
};

/// Known distribution presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    #[value(name = "s", alias = "soldier")]
    Soldier,
    #[value(name = "d", alias = "demoman")]
    Demoman,
}

impl Mode {
    /// Profile key in the distributions file.
    pub fn profile_name(self) -> &'static str {
        match self {
            Self::Soldier => "Soldier Monthly",
            Self::Demoman => "Demoman Monthly",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(name = "prize_pooler", about = "Calculates prize pools")]
pub struct Cli {
    /// Total amount of keys
    #[arg(short, long)]
    pub pool: u64,

    /// What are we calculating for?
    #[arg(short, long, value_enum)]
    pub mode: Mode,

    /// Distributions file (YAML)
    #[arg(short, long, env = CONFIG_PATH_ENV, default_value = DEFAULT_DISTRIBUTIONS_PATH)]
    pub config: PathBuf,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Allowed distance from 100 when checking percentage sums (0 = exact)
    #[arg(long, default_value_t = 0.0, value_parser = parse_tolerance)]
    pub tolerance: f64,

    /// Repeat for more log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

fn parse_tolerance(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("tolerance must be a non-negative number, got {raw}"));
    }
    Ok(value)
}

pub fn run_with_args(args: &[String]) -> i32 {
    match Cli::try_parse_from(args) {
        Ok(cli) => run(&cli),
        Err(err) => {
            let _ = err.print();
            if err.use_stderr() {
                2
            } else {
                0
            }
        }
    }
}

pub fn run(cli: &Cli) -> i32 {
    init_logging(cli.verbose);

    let profile = cli.mode.profile_name();
    eprintln!("Loading distribution for mode: {profile}");

    let table = match load_profile(&cli.config, profile) {
        Ok(table) => table,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };

    let report = validate_table(&table, &ValidationOptions::with_tolerance(cli.tolerance));
    if !report.is_valid() {
        eprintln!("validation failed: {} issue(s)", report.diagnostics.len());
        for diagnostic in &report.diagnostics {
            eprintln!("- {diagnostic}");
        }
        return 1;
    }

    info!(
        "allocating {} keys across {} divisions of '{profile}'",
        cli.pool,
        table.len()
    );
    let result = match allocate(cli.pool, &table) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("allocation failed: {err}");
            return 1;
        }
    };

    match render(&result, cli.format) {
        Ok(payload) => {
            print!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to render payout sheet: {err}");
            1
        }
    }
}

fn render(
    result: &AllocationResult,
    format: OutputFormat,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    Ok(match format {
        OutputFormat::Text => format_report(result),
        OutputFormat::Json => {
            let mut payload = to_json(result)?;
            payload.push('\n');
            payload
        }
        OutputFormat::Csv => to_csv_string(result)?,
    })
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let mut config = ConfigBuilder::new();
    config
        .set_time_level(LevelFilter::Error)
        .set_location_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off);
    // A logger may already be installed when run() is called more than once in-process.
    let _ = TermLogger::init(level, config.build(), TerminalMode::Stderr, ColorChoice::Auto);
}
