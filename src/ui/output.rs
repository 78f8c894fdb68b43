use crate::error::{ArdapError, UserFriendlyError};
use crate::ExtractionSummary;
use console::{style, Emoji, Term};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");

pub struct OutputFormatter {
    #[allow(dead_code)]
    term: Term,
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let term = Term::stdout();
        let use_colors = match mode {
            OutputMode::Human => term.features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            term,
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}{}", CHECKMARK, style(message).green());
                } else {
                    println!("✓ {}", message);
                }
            }
            OutputMode::Json => self.print_json_message("success", message),
            OutputMode::Plain => println!("SUCCESS: {}", message),
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    eprintln!("{}", style(format!("✗ {}", message)).red());
                } else {
                    eprintln!("✗ {}", message);
                }
            }
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", WARNING, style(message).yellow());
                    } else {
                        println!("! {}", message);
                    }
                }
                OutputMode::Json => self.print_json_message("warning", message),
                OutputMode::Plain => println!("WARNING: {}", message),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", INFO, message);
                    } else {
                        println!("i {}", message);
                    }
                }
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(2) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("  {}", style(message).dim());
                    } else {
                        println!("  DEBUG: {}", message);
                    }
                }
                OutputMode::Json => self.print_json_message("debug", message),
                OutputMode::Plain => println!("DEBUG: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", ROCKET, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => self.print_json_message("operation_start", operation),
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    pub fn print_user_friendly_error(&self, error: &ArdapError) {
        self.error(&error.user_message());

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        eprintln!("{}{}", INFO, style(format!("Suggestion: {}", suggestion)).cyan());
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => {
                    eprintln!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    /// Final run summary. JSON mode always emits it (even when quiet) since
    /// it is the machine-readable result of the run.
    pub fn print_extraction_summary(&self, summary: &ExtractionSummary) {
        match self.mode {
            OutputMode::Json => {
                let json =
                    serde_json::to_string_pretty(summary).unwrap_or_else(|_| "{}".to_string());
                println!("{}", json);
            }
            _ if self.quiet => {}
            OutputMode::Human => self.print_human_summary(summary),
            OutputMode::Plain => self.print_plain_summary(summary),
        }
    }

    fn print_human_summary(&self, summary: &ExtractionSummary) {
        println!();
        let title = "Extraction summary";
        if self.use_colors {
            println!("{}", style(title).bold().cyan());
        } else {
            println!("=== {} ===", title);
        }
        println!("  Reports processed: {}", summary.reports_processed);
        println!("  Output file: {}", summary.output_path);
        println!("  Elapsed: {:.2}s", summary.elapsed_secs);

        if self.verbose_level > 0 {
            let c = &summary.field_coverage;
            println!("  Non-empty fields:");
            println!("    SampleID: {}", c.sample_id);
            println!("    SummaryLine1: {}", c.summary_line1);
            println!("    SummaryLine2: {}", c.summary_line2);
            println!("    ResistancePredict: {}", c.resistance_predict);
            println!("    AntimicrobialDeterminantDetails: {}", c.determinant_details);
        }
    }

    fn print_plain_summary(&self, summary: &ExtractionSummary) {
        println!("REPORTS: {}", summary.reports_processed);
        println!("OUTPUT: {}", summary.output_path);
        println!("ELAPSED: {:.2}s", summary.elapsed_secs);
    }

    fn print_json_message(&self, message_type: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": message_type,
            "message": message
        }));
    }

    fn print_json_object(&self, value: &serde_json::Value) {
        println!("{}", value);
    }

    fn should_show_message(&self, required_level: u8) -> bool {
        !self.quiet && self.verbose_level >= required_level
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }
}
