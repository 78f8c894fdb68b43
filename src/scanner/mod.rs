pub mod report_scanner;

pub use report_scanner::{ReportFile, ReportScanner, ScanStatistics};
