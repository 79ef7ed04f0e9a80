//! MED Reader CLI Application
//!
//! This is the command-line interface for the MED raw file reader.
//! It uses the med-decoder library and adds:
//! - Single-file extraction from command-line arguments
//! - Parallel batch extraction driven by a TOML config
//! - Skip/abort policy for failing files
//! - Run summaries (log and JSON)

use anyhow::{Context, Result};
use clap::Parser;
use med_decoder::{ExtractConfig, Extractor, Label, Phase, SessionInfo};
use std::path::PathBuf;

mod batch;
mod config;
mod report;

/// MED Reader - Convert MED raw data files into tidy time/event tables
#[derive(Parser, Debug)]
#[command(name = "med-cli")]
#[command(about = "Convert MED raw data files into tidy time/event CSV tables", long_about = None)]
#[command(version)]
struct Args {
    /// Path to a MED raw file to convert
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Phase label (repeat to build a phase from several parts, e.g. --phase A --phase 1)
    #[arg(short, long, value_name = "PHASE")]
    phase: Vec<String>,

    /// Subject identifier
    #[arg(long, value_name = "SUBJECT")]
    subject: Option<String>,

    /// Session identifier
    #[arg(long, value_name = "SESSION")]
    session: Option<String>,

    /// Directory for the tidy CSV (created if missing)
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Number of data columns per row (PRINTCOLUMNS)
    #[arg(long, value_name = "COUNT", default_value_t = 5)]
    var_cols: usize,

    /// Label of the array variable to extract
    #[arg(long, value_name = "MARKER", default_value = "C:")]
    marker: String,

    /// Do not write the time,event header row
    #[arg(long)]
    no_header: bool,

    /// Strip trailing zeros from event codes (120.100 -> 1)
    #[arg(long)]
    trim_event_zeros: bool,

    /// Path to batch configuration file (batch.toml)
    #[arg(short, long, value_name = "FILE", conflicts_with = "file")]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("MED Reader CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using decoder library v{}", med_decoder::VERSION);

    if let Some(config_path) = &args.config {
        batch_mode(config_path)
    } else if let Some(file) = &args.file {
        single_file_mode(file, &args)
    } else {
        println!("MED Reader - No input specified");
        println!("\nQuick Start:");
        println!("  med-cli --file raw/subject034 --phase A --phase 1 --subject 034 --session 1 -o tidy");
        println!("\nFor many files:");
        println!("  med-cli --config batch.toml");
        println!("\nUse --help for more options");
        Ok(())
    }
}

/// Single-file mode - extract one file described on the command line
fn single_file_mode(file: &PathBuf, args: &Args) -> Result<()> {
    let info = session_from_args(args)?;

    let config = ExtractConfig::new()
        .with_var_cols(args.var_cols)
        .with_marker(args.marker.clone())
        .with_header_row(!args.no_header)
        .with_trim_event_zeros(args.trim_event_zeros);
    let extractor = Extractor::new(config)?;

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", args.output_dir))?;

    let summary = extractor
        .extract(file, &info, &args.output_dir)
        .with_context(|| format!("Failed to extract {:?}", file))?;

    if !args.quiet {
        println!("{} events -> {}", summary.rows, summary.output.display());
    }
    Ok(())
}

/// Batch mode - extract every file listed in a config
fn batch_mode(config_path: &PathBuf) -> Result<()> {
    log::info!("Loading configuration from: {:?}", config_path);
    let config = config::load_config(config_path)?;
    log::debug!("Configuration loaded: {} files", config.files.len());

    let report = batch::run_batch(&config)?;
    report.log_summary();

    if let Some(summary_path) = &config.output.summary {
        report.write_json(summary_path)?;
    }

    if report.aborted {
        anyhow::bail!("Batch aborted after {} failed file(s)", report.failed);
    }
    Ok(())
}

fn session_from_args(args: &Args) -> Result<SessionInfo> {
    let subject = args.subject.clone().context("--subject is required with --file")?;
    let session = args.session.clone().context("--session is required with --file")?;

    let phase = match args.phase.as_slice() {
        [] => anyhow::bail!("--phase is required with --file"),
        [single] => Phase::Single(Label::from(single.as_str())),
        parts => Phase::Sequence(parts.iter().map(|p| Label::from(p.as_str())).collect()),
    };

    Ok(SessionInfo::new(phase, subject, session))
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
