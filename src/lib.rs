pub mod cli;
pub mod error;
pub mod extractor;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use error::{ArdapError, Result, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{FieldCoverage, Record, ReportParser, TsvWriter, FIELD_NAMES};
pub use scanner::{ReportFile, ReportScanner};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use serde::Serialize;
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Statistics of one extraction run, printed (or emitted as JSON) after the
/// TSV has been written.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionSummary {
    pub reports_processed: usize,
    pub field_coverage: FieldCoverage,
    pub input_dir: String,
    pub output_path: String,
    pub elapsed_secs: f64,
}

/// Main library interface: scan a folder of ARDaP HTML reports, extract one
/// [`Record`] per report, write the TSV, and summarize the run.
pub struct ArdapExtract {
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl ArdapExtract {
    pub fn new(output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        // Progress bars share the terminal with human output only.
        let progress_manager =
            ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            output_formatter,
            progress_manager,
        }
    }

    /// Create an instance from parsed CLI arguments.
    pub fn from_cli(cli_args: &Cli) -> Self {
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Self::new(output_mode, cli_args.verbose, cli_args.quiet)
    }

    /// Extract every `.html` report under `input_dir` (lexicographic order)
    /// into a TSV at `output_path`.
    ///
    /// An unreadable report aborts the run; a report with missing sections
    /// does not (its fields come back empty). An empty folder is a valid
    /// run and produces a header-only TSV.
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_dir: P,
        output_path: Q,
    ) -> Result<ExtractionSummary> {
        let input_dir = input_dir.as_ref();
        let output_path = output_path.as_ref();
        let start_time = Instant::now();

        // Step 1: list reports
        self.output_formatter.start_operation("Scanning report folder");
        let scanner = ReportScanner::new();
        let reports = scanner.scan_directory(input_dir)?;

        let stats = scanner.get_statistics(&reports);
        self.output_formatter.debug(&stats.display_summary());
        self.output_formatter
            .info(&format!("Found {} HTML reports", reports.len()));

        // Step 2: extract fields
        let records = self.extract_records(&reports)?;

        // Step 3: write TSV
        self.output_formatter.start_operation("Writing TSV output");
        TsvWriter::new().write_to_file(output_path, &records)?;

        self.output_formatter.success(&format!(
            "Wrote {} rows to {}",
            records.len(),
            output_path.display()
        ));

        Ok(ExtractionSummary {
            reports_processed: records.len(),
            field_coverage: FieldCoverage::from_records(&records),
            input_dir: input_dir.display().to_string(),
            output_path: output_path.display().to_string(),
            elapsed_secs: start_time.elapsed().as_secs_f64(),
        })
    }

    fn extract_records(&self, reports: &[ReportFile]) -> Result<Vec<Record>> {
        self.output_formatter.start_operation("Extracting report fields");

        let pb = self
            .progress_manager
            .create_report_progress(reports.len() as u64);

        let parser = ReportParser::new();
        let mut records = Vec::with_capacity(reports.len());

        for report in reports {
            pb.set_message(report.filename.clone());

            let html = fs::read_to_string(&report.source_path).map_err(|e| {
                ArdapError::ReportUnreadable {
                    path: report.display_path(),
                    source: e,
                }
            })?;

            let record = parser.extract(&html, &report.stem);
            if record.sample_id.is_empty() {
                self.output_formatter
                    .warning(&format!("No sample id resolved for {}", report.filename));
            }

            records.push(record);
            pb.inc(1);
        }

        pb.finish_and_clear();
        Ok(records)
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn print_summary(&self, summary: &ExtractionSummary) {
        self.output_formatter.print_extraction_summary(summary);
    }

    pub fn handle_error(&self, error: &ArdapError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Convenience function to run an extraction with minimal setup.
pub fn extract_reports_simple<P: AsRef<Path>, Q: AsRef<Path>>(
    input_dir: P,
    output_path: Q,
) -> Result<ExtractionSummary> {
    ArdapExtract::new(OutputMode::Plain, 0, true).run(input_dir, output_path)
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
