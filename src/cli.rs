use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Colored summary for interactive use
    Terminal,
    /// Machine-readable JSON
    Json,
    /// Markdown report
    Markdown,
}

impl From<OutputFormat> for crate::io::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => crate::io::OutputFormat::Terminal,
            OutputFormat::Json => crate::io::OutputFormat::Json,
            OutputFormat::Markdown => crate::io::OutputFormat::Markdown,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "delaymap")]
#[command(about = "Construction schedule delay and forensic window analyzer", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare a baseline schedule against a current update
    Compare {
        /// Baseline schedule JSON
        baseline: PathBuf,

        /// Current schedule JSON
        current: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Analysis configuration TOML
        #[arg(long)]
        config: Option<PathBuf>,

        /// Trust source float/criticality instead of running the CPM pass
        #[arg(long)]
        no_cpm: bool,
    },

    /// Slice the horizon into forensic windows and attribute delay per window
    Windows {
        /// Baseline schedule JSON
        baseline: PathBuf,

        /// Current schedule JSON
        current: PathBuf,

        /// Calendar-month windows instead of fixed-length periods
        #[arg(long)]
        monthly: bool,

        /// Fixed window length in days (overrides config)
        #[arg(long)]
        period_days: Option<u32>,

        /// Analysis start date (YYYY-MM-DD), defaults to the baseline start
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Analysis end date (YYYY-MM-DD), defaults to the later finish
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Analysis configuration TOML
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check a schedule for data-quality issues
    Validate {
        /// Schedule JSON
        schedule: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the CPM pass and report float and criticality
    Cpm {
        /// Schedule JSON
        schedule: PathBuf,

        /// Total float threshold for criticality
        #[arg(long, default_value_t = 0.0)]
        threshold: f64,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
