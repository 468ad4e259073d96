//! licw-score CLI - Score ADIF logs for the LICW CW challenge.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use licw_score::{
    Challenge, ChallengeReport, Config, LICW_TABLES, LogReader, OutputFormat, Qso, ReaderStats,
    ScoringTables,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Calculate a LICW challenge score from one or more ADIF log files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// ADIF log files to score
    #[arg(required = true, value_name = "ADIF_LOG")]
    log_files: Vec<PathBuf>,

    /// Only count QSOs in this quarter (e.g. 2025Q3, Q3-2025, or Q3 for this year)
    #[arg(short, long)]
    quarter: Option<String>,

    /// Inclusive start date (YYYYMMDD), overrides the quarter's start
    #[arg(long, value_name = "YYYYMMDD")]
    start: Option<String>,

    /// Inclusive end date (YYYYMMDD), overrides the quarter's end
    #[arg(long, value_name = "YYYYMMDD")]
    end: Option<String>,

    /// Report format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// List every counted QSO
    #[arg(short, long)]
    list: bool,

    /// Show debug logging (omitted records, replaced duplicates)
    #[arg(short, long)]
    verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Configuration file [default: <config dir>/licw-score/config.toml]
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let config = merge(config, &args);

    // Initialize logging
    let level = if args.verbose {
        "licw_score=debug,info".to_string()
    } else {
        config.log_level.clone().unwrap_or_else(|| "warn".to_string())
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let range = config.date_range()?;
    let mut challenge = Challenge::new(range);
    let mut totals = ReaderStats::default();

    for path in &args.log_files {
        let (qsos, stats) = read_log(path, &LICW_TABLES)?;
        info!(
            "{}: {} records, {} scorable",
            path.display(),
            stats.records,
            qsos.len()
        );
        totals.records += stats.records;
        totals.omitted += stats.omitted;
        challenge.add_qsos(qsos);
    }

    let score = challenge.calculate_score();
    let report = ChallengeReport::new(&challenge, score, totals, config.list);

    match config.format.unwrap_or_default() {
        OutputFormat::Text => print!("{}", report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

/// Apply command-line flags over the configuration file.
fn merge(mut config: Config, args: &Args) -> Config {
    if args.quarter.is_some() {
        config.quarter = args.quarter.clone();
    }
    if args.start.is_some() {
        config.start = args.start.clone();
    }
    if args.end.is_some() {
        config.end = args.end.clone();
    }
    if args.format.is_some() {
        config.format = args.format;
    }
    if args.log_level.is_some() {
        config.log_level = args.log_level.clone();
    }
    config.list |= args.list;
    config
}

/// Read one ADIF file line by line, returning its scorable QSOs.
fn read_log(path: &Path, tables: &ScoringTables) -> Result<(Vec<Qso>, ReaderStats)> {
    let file =
        File::open(path).with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let mut reader = LogReader::new(tables);
    for line in BufReader::new(file).lines() {
        let line =
            line.with_context(|| format!("Failed to read log file: {}", path.display()))?;
        reader
            .parse(&line)
            .with_context(|| format!("Invalid ADIF in {}", path.display()))?;
    }

    let stats = reader.finish();
    Ok((reader.take_qsos(), stats))
}
