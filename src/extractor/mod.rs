pub mod record;
pub mod report_parser;
pub mod tsv_writer;

pub use record::{FieldCoverage, Record, FIELD_NAMES};
pub use report_parser::ReportParser;
pub use tsv_writer::TsvWriter;
