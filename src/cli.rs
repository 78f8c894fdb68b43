use crate::error::{ArdapError, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ardap-extract")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract summary fields from ARDaP HTML reports into a TSV table")]
#[command(
    long_about = "ardap-extract scans a folder of per-sample ARDaP HTML reports, pulls out \
                  the sample identifier, summary lines, resistance prediction and \
                  antimicrobial determinant details from each, and writes one TSV row per report."
)]
#[command(after_help = "EXAMPLES:\n  \
    ardap-extract reports/ resistance.tsv\n  \
    ardap-extract reports/ resistance.tsv --verbose\n  \
    ardap-extract reports/ resistance.tsv --output-format json --quiet")]
pub struct Cli {
    /// Folder containing per-sample .html reports
    pub input_dir: PathBuf,

    /// Path of the TSV file to write
    pub output_tsv: PathBuf,

    /// Output format for run messages and the final summary
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    /// The input folder must exist and be a directory before the run starts;
    /// everything else about its contents is best-effort.
    pub fn validate_input_dir(&self) -> Result<()> {
        if !self.input_dir.is_dir() {
            return Err(ArdapError::InvalidInputDir {
                path: self.input_dir.display().to_string(),
            });
        }
        Ok(())
    }

    pub fn should_use_colors(&self) -> bool {
        !self.quiet && console::Term::stdout().features().colors_supported()
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}
