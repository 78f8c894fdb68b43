use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArdapError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input path is not usable: {path}")]
    InvalidInputDir { path: String },

    #[error("Failed to read report: {path}")]
    ReportUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output file: {path}")]
    OutputWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Usage: ardap-extract <INPUT_DIR> <OUTPUT_TSV>")]
    Usage,
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for ArdapError {
    fn user_message(&self) -> String {
        match self {
            ArdapError::InvalidInputDir { path } => {
                format!("Input path is not a readable directory: {}", path)
            }
            ArdapError::ReportUnreadable { path, source } => {
                format!("Could not read report {}: {}", path, source)
            }
            ArdapError::OutputWrite { path, source } => {
                format!("Could not write output file {}: {}", path, source)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            ArdapError::InvalidInputDir { .. } => Some(
                "Check that the input folder exists and is a directory containing .html reports."
                    .to_string(),
            ),
            ArdapError::ReportUnreadable { .. } => Some(
                "The run stops at the first unreadable report. Remove or fix the file and re-run."
                    .to_string(),
            ),
            ArdapError::OutputWrite { .. } => Some(
                "Ensure the output directory exists and you have write permission.".to_string(),
            ),
            ArdapError::Usage => Some(
                "Provide the report folder and the output TSV path, e.g. \
                 ardap-extract reports/ resistance.tsv"
                    .to_string(),
            ),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ArdapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_friendly_messages() {
        let error = ArdapError::InvalidInputDir {
            path: "/no/such/dir".to_string(),
        };
        assert!(error.user_message().contains("not a readable directory"));
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error = ArdapError::from(io_error);
        assert!(matches!(error, ArdapError::Io(_)));
    }

    #[test]
    fn test_usage_error_mentions_both_arguments() {
        let error = ArdapError::Usage;
        assert!(error.user_message().contains("<INPUT_DIR>"));
        assert!(error.user_message().contains("<OUTPUT_TSV>"));
    }
}
