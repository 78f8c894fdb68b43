use crate::error::{ArdapError, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ReportFile {
    pub source_path: PathBuf,
    pub filename: String,
    /// Basename without the .html extension, used as the last-resort sample id.
    pub stem: String,
    pub size: u64,
}

impl ReportFile {
    pub fn new(source_path: PathBuf, size: u64) -> Self {
        let filename = source_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();

        let stem = source_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        Self {
            source_path,
            filename,
            stem,
            size,
        }
    }

    pub fn display_path(&self) -> String {
        self.source_path.display().to_string()
    }

    pub fn format_size(&self) -> String {
        format_bytes(self.size)
    }
}

/// Lists the HTML reports of one folder. The listing is flat (reports live
/// directly in the input folder) and ordered lexicographically by filename so
/// output rows are reproducible across runs and platforms.
pub struct ReportScanner;

impl ReportScanner {
    pub fn new() -> Self {
        Self
    }

    pub fn scan_directory<P: AsRef<Path>>(&self, root: P) -> Result<Vec<ReportFile>> {
        let root_path = root.as_ref();

        if !root_path.exists() || !root_path.is_dir() {
            return Err(ArdapError::InvalidInputDir {
                path: root_path.display().to_string(),
            });
        }

        let mut reports = Vec::new();

        for entry in std::fs::read_dir(root_path)? {
            let entry = entry?;

            let file_type = entry.file_type()?;
            if !file_type.is_file() {
                continue;
            }

            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };

            if !is_html_report(name) {
                continue;
            }

            let metadata = entry.metadata()?;
            reports.push(ReportFile::new(entry.path(), metadata.len()));
        }

        reports.sort_by(|a, b| a.filename.cmp(&b.filename));

        Ok(reports)
    }

    pub fn get_statistics(&self, reports: &[ReportFile]) -> ScanStatistics {
        let total_reports = reports.len();
        let total_size = reports.iter().map(|r| r.size).sum();

        let (largest_file_size, largest_file_name) = reports
            .iter()
            .max_by_key(|r| r.size)
            .map(|r| (r.size, r.filename.clone()))
            .unwrap_or((0, String::new()));

        ScanStatistics {
            total_reports,
            total_size,
            largest_file_size,
            largest_file_name,
        }
    }
}

impl Default for ReportScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn is_html_report(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.ends_with(".html")
}

#[derive(Debug, Default)]
pub struct ScanStatistics {
    pub total_reports: usize,
    pub total_size: u64,
    pub largest_file_size: u64,
    pub largest_file_name: String,
}

impl ScanStatistics {
    pub fn display_summary(&self) -> String {
        let mut summary = format!(
            "Scan results:\n  Reports found: {}\n  Total size: {}\n",
            self.total_reports,
            format_bytes(self.total_size)
        );

        if self.largest_file_size > 0 {
            summary.push_str(&format!(
                "  Largest report: {} ({})\n",
                self.largest_file_name,
                format_bytes(self.largest_file_size)
            ));
        }

        summary
    }
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}
