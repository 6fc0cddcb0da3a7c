//! Command-line interface for refalt-annotator.
//!
//! ## Usage
//!
//! ```text
//! # Annotate with one worker per core
//! refalt-annotator -i input.tsv -o annotated.tsv -d refs/
//!
//! # Eight workers, file log in run.log instead of logs/annotation.log
//! refalt-annotator -i data.tsv -o results.tsv -d refs/ -p 8 --log-file run.log
//!
//! # Only check paths and the input header
//! refalt-annotator -i data.tsv -o results.tsv -d refs/ --validate-only
//!
//! # Machine-readable summary on stdout
//! refalt-annotator -i data.tsv -o results.tsv -d refs/ --format json
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::filter::LevelFilter;

use crate::utils::logging::DEFAULT_LOG_FILE;

pub mod annotate;

#[derive(Parser)]
#[command(name = "refalt-annotator")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Parallel variant annotation using chromosome-split reference")]
#[command(
    long_about = "Converts '#CHROM POS ID allele1 allele2' to '#CHROM POS ID REF ALT'.\n\nFor each variant the allele matching the reference base (directly or after reverse complementing) becomes REF. Chromosomes are processed in parallel, one per worker, and written in natural chromosome order."
)]
pub struct Cli {
    /// Input TSV file (columns: #CHROM POS ID allele1 allele2)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output TSV file (columns: #CHROM POS ID REF ALT)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Directory with reference chromosomes (chr1.fa, chr2.fa, etc.) and their .fai indexes
    #[arg(short = 'd', long)]
    pub ref_dir: PathBuf,

    /// Number of parallel workers [default: available cores]
    #[arg(short, long)]
    pub processes: Option<usize>,

    /// Skip input file header validation
    #[arg(long)]
    pub skip_header_check: bool,

    /// Limit variants per chromosome (for testing)
    #[arg(long)]
    pub max_variants_per_chrom: Option<usize>,

    /// Only validate paths and the input header without processing
    #[arg(long)]
    pub validate_only: bool,

    /// Seconds between per-chromosome progress messages
    #[arg(long, default_value = "30")]
    pub progress_interval: u64,

    /// Console logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Also write logs to this file, rotated at 5 MiB with 3 backups
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Log to the console only
    #[arg(long, conflicts_with = "log_file")]
    pub no_log_file: bool,

    /// Logging level for --log-file
    #[arg(long, value_enum, default_value = "debug")]
    pub log_file_level: LogLevel,

    /// Summary format written to stdout
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}
