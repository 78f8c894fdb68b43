use serde::Serialize;

/// Output column names, in the order they appear in the TSV header.
pub const FIELD_NAMES: [&str; 5] = [
    "SampleID",
    "SummaryLine1",
    "SummaryLine2",
    "ResistancePredict",
    "AntimicrobialDeterminantDetails",
];

/// One extracted report. Every field is best-effort: a section the parser
/// cannot locate is represented as an empty string, never as an error, so a
/// run always yields exactly one row per input report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    #[serde(rename = "SampleID")]
    pub sample_id: String,

    #[serde(rename = "SummaryLine1")]
    pub summary_line1: String,

    #[serde(rename = "SummaryLine2")]
    pub summary_line2: String,

    #[serde(rename = "ResistancePredict")]
    pub resistance_predict: String,

    #[serde(rename = "AntimicrobialDeterminantDetails")]
    pub determinant_details: String,
}

impl Record {
    /// Field values in header order, for row serialization.
    pub fn values(&self) -> [&str; 5] {
        [
            &self.sample_id,
            &self.summary_line1,
            &self.summary_line2,
            &self.resistance_predict,
            &self.determinant_details,
        ]
    }
}

/// How many records carried a non-empty value per field, for the run summary.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FieldCoverage {
    pub sample_id: usize,
    pub summary_line1: usize,
    pub summary_line2: usize,
    pub resistance_predict: usize,
    pub determinant_details: usize,
}

impl FieldCoverage {
    pub fn from_records(records: &[Record]) -> Self {
        let mut coverage = Self::default();
        for record in records {
            if !record.sample_id.is_empty() {
                coverage.sample_id += 1;
            }
            if !record.summary_line1.is_empty() {
                coverage.summary_line1 += 1;
            }
            if !record.summary_line2.is_empty() {
                coverage.summary_line2 += 1;
            }
            if !record.resistance_predict.is_empty() {
                coverage.resistance_predict += 1;
            }
            if !record.determinant_details.is_empty() {
                coverage.determinant_details += 1;
            }
        }
        coverage
    }
}
