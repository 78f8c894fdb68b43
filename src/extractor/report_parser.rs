use crate::extractor::record::Record;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// The four resistance categories an ARDaP report offers as mutually
/// exclusive options. Order matters: it is the tie-break whenever more than
/// one category is present in the page text.
pub const RESISTANCE_OPTIONS: [&str; 4] = [
    "No drug resistance predicted",
    "Mono-resistance predicted",
    "Multi-drug resistance predicted",
    "Extensive drug resistance predicted",
];

// Ballot boxes, check marks and cross marks used by report skins as a purely
// visual selection indicator.
const CHECKBOX_GLYPHS: &str = "[\u{2610}\u{2611}\u{2612}\u{2713}\u{2714}\u{2716}]";

// How far (in characters) a glyph may sit from an option string and still be
// taken as marking it.
const GLYPH_WINDOW: usize = 50;

// Cap on the container-text fallback for a checked box without any label.
const CONTAINER_TEXT_LIMIT: usize = 200;

struct GlyphMatcher {
    option: &'static str,
    glyph_before: Regex,
    glyph_after: Regex,
}

/// Scrapes one ARDaP HTML report into a [`Record`].
///
/// Every heuristic is best-effort and independent: a section the report skin
/// dropped or renamed yields an empty field, never an error. html5ever
/// recovers from arbitrarily malformed markup, so [`ReportParser::extract`]
/// is total.
pub struct ReportParser {
    cell_selector: Selector,
    title_selector: Selector,
    detail_table_selector: Selector,
    thead_selector: Selector,
    tbody_selector: Selector,
    input_selector: Selector,
    label_selector: Selector,
    sample_token_patterns: Vec<Regex>,
    glyph_matchers: Vec<GlyphMatcher>,
    whitespace_run: Regex,
    separator_run: Regex,
}

impl ReportParser {
    pub fn new() -> Self {
        // Sample-code shapes seen in real reports: Illumina lane tokens like
        // SAMPLE-1_S2_L001, and SRA run accessions.
        let sample_token_patterns = [
            r"\b[A-Za-z0-9\-]+_S\d+_L\d+\b",
            r"\bSRR\d+\b",
            r"\bERR\d+\b",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("hard-coded pattern"))
        .collect();

        let glyph_matchers = RESISTANCE_OPTIONS
            .iter()
            .map(|&option| GlyphMatcher {
                option,
                glyph_before: Regex::new(&format!(
                    "(?i){CHECKBOX_GLYPHS}.{{0,{GLYPH_WINDOW}}}{}",
                    regex::escape(option)
                ))
                .expect("hard-coded pattern"),
                glyph_after: Regex::new(&format!(
                    "(?i){}.{{0,{GLYPH_WINDOW}}}{CHECKBOX_GLYPHS}",
                    regex::escape(option)
                ))
                .expect("hard-coded pattern"),
            })
            .collect();

        Self {
            cell_selector: Selector::parse("td, th").expect("hard-coded selector"),
            title_selector: Selector::parse("title").expect("hard-coded selector"),
            detail_table_selector: Selector::parse("table.detail_table")
                .expect("hard-coded selector"),
            thead_selector: Selector::parse("thead").expect("hard-coded selector"),
            tbody_selector: Selector::parse("tbody").expect("hard-coded selector"),
            input_selector: Selector::parse("input").expect("hard-coded selector"),
            label_selector: Selector::parse("label").expect("hard-coded selector"),
            sample_token_patterns,
            glyph_matchers,
            whitespace_run: Regex::new(r"\s+").expect("hard-coded pattern"),
            separator_run: Regex::new(r"\s*\|\s*").expect("hard-coded pattern"),
        }
    }

    /// Extract the five report fields. `file_stem` is the report's basename
    /// without extension, used as the last-resort sample id.
    pub fn extract(&self, html: &str, file_stem: &str) -> Record {
        let doc = Html::parse_document(html);
        let page_text = joined_text(doc.root_element(), " ");

        let detail_tables: Vec<ElementRef> = doc.select(&self.detail_table_selector).collect();
        let (summary_line1, summary_line2) = self.summary_lines(&detail_tables);

        Record {
            sample_id: self.resolve_sample_id(&doc, &page_text, file_stem),
            summary_line1,
            summary_line2,
            resistance_predict: self.resolve_resistance(&doc, &page_text),
            determinant_details: self.determinant_details(&detail_tables),
        }
    }

    /// Sample id resolution: explicit "Sample ID" label cell, then document
    /// title, then the file stem. A sample-code token anywhere in the page
    /// then overrides whatever was found, because report skins often carry a
    /// fixed site banner in the title instead of the sample name.
    fn resolve_sample_id(&self, doc: &Html, page_text: &str, file_stem: &str) -> String {
        let mut sample_id = self
            .sample_id_from_label(doc)
            .or_else(|| self.title_text(doc))
            .unwrap_or_else(|| file_stem.to_string());

        for pattern in &self.sample_token_patterns {
            if let Some(m) = pattern.find(page_text) {
                let candidate = m.as_str();
                if !candidate.is_empty() && candidate != sample_id {
                    sample_id = candidate.to_string();
                    break;
                }
            }
        }

        sample_id
    }

    fn sample_id_from_label(&self, doc: &Html) -> Option<String> {
        let label_cell = doc
            .select(&self.cell_selector)
            .find(|cell| flat_text(*cell).to_lowercase().contains("sample id"))?;

        // Value lives in the next sibling <td>, or failing that in the cell
        // following the label within the same row.
        let mut value_cell = label_cell
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|e| e.value().name() == "td");

        if value_cell.is_none() {
            if let Some(row) = label_cell
                .ancestors()
                .filter_map(ElementRef::wrap)
                .find(|e| e.value().name() == "tr")
            {
                let cells: Vec<ElementRef> = row.select(&self.cell_selector).collect();
                if let Some(pos) = cells.iter().position(|c| c.id() == label_cell.id()) {
                    value_cell = cells.get(pos + 1).copied();
                }
            }
        }

        let txt = flat_text(value_cell?);
        if txt.is_empty() {
            return None;
        }
        Some(txt.trim_end_matches(':').trim().to_string())
    }

    fn title_text(&self, doc: &Html) -> Option<String> {
        let title = doc.select(&self.title_selector).next()?;
        let txt = flat_text(title);
        if txt.is_empty() {
            None
        } else {
            Some(txt)
        }
    }

    /// Summary lines come from the first detail table whose header says
    /// "Summary": the flattened text of its first two direct body rows.
    fn summary_lines(&self, detail_tables: &[ElementRef]) -> (String, String) {
        let Some(table) = self.find_detail_table(detail_tables, "Summary") else {
            return (String::new(), String::new());
        };

        let Some(tbody) = table.select(&self.tbody_selector).next() else {
            return (String::new(), String::new());
        };

        // Direct children only; rows of nested tables are not summary lines.
        let rows: Vec<ElementRef> = tbody
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|e| e.value().name() == "tr")
            .collect();

        let line1 = rows.first().map(|r| flat_text(*r)).unwrap_or_default();
        let line2 = rows.get(1).map(|r| flat_text(*r)).unwrap_or_default();
        (line1, line2)
    }

    /// Resistance prediction, in decreasing order of confidence: a checked
    /// checkbox control with an associated label, an option string adjacent
    /// to a checkbox glyph, any option string on the page, empty.
    fn resolve_resistance(&self, doc: &Html, page_text: &str) -> String {
        if let Some(label) = self.checked_input_label(doc) {
            return label;
        }

        for matcher in &self.glyph_matchers {
            if matcher.glyph_before.is_match(page_text) || matcher.glyph_after.is_match(page_text)
            {
                return matcher.option.to_string();
            }
        }

        let lower = page_text.to_lowercase();
        RESISTANCE_OPTIONS
            .iter()
            .find(|option| lower.contains(&option.to_lowercase()))
            .map(|option| option.to_string())
            .unwrap_or_default()
    }

    fn checked_input_label(&self, doc: &Html) -> Option<String> {
        let input = doc.select(&self.input_selector).find(|e| {
            e.value().attr("type") == Some("checkbox")
                && (e.value().attr("checked").is_some()
                    || e.value().attr("aria-checked") == Some("true"))
        })?;

        // Explicit for/id association wins.
        if let Some(id) = input.value().attr("id") {
            if let Some(label) = doc
                .select(&self.label_selector)
                .find(|l| l.value().attr("for") == Some(id))
            {
                return Some(flat_text(label));
            }
        }

        if let Some(sibling) = input
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|e| e.value().name() == "label")
        {
            return Some(flat_text(sibling));
        }

        if let Some(enclosing) = input
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|e| e.value().name() == "label")
        {
            return Some(flat_text(enclosing));
        }

        // Last resort: nearby text, capped so we never return the whole page.
        if let Some(container) = input.parent().and_then(ElementRef::wrap) {
            let txt = joined_text(container, " ");
            let truncated: String = txt.chars().take(CONTAINER_TEXT_LIMIT).collect();
            return Some(truncated.trim().to_string());
        }

        None
    }

    /// Body of the "Antimicrobial determinant details" table, flattened to
    /// one " | "-separated line with whitespace runs collapsed.
    fn determinant_details(&self, detail_tables: &[ElementRef]) -> String {
        let Some(table) =
            self.find_detail_table(detail_tables, "Antimicrobial determinant details")
        else {
            return String::new();
        };

        let Some(tbody) = table.select(&self.tbody_selector).next() else {
            return String::new();
        };

        let raw = joined_text(tbody, " | ");
        let collapsed = self.whitespace_run.replace_all(&raw, " ");
        let normalized = self.separator_run.replace_all(&collapsed, " | ");
        normalized.trim().to_string()
    }

    fn find_detail_table<'a>(
        &self,
        detail_tables: &[ElementRef<'a>],
        header_text: &str,
    ) -> Option<ElementRef<'a>> {
        detail_tables
            .iter()
            .find(|table| {
                table
                    .select(&self.thead_selector)
                    .next()
                    .map(|thead| flat_text(thead).contains(header_text))
                    .unwrap_or(false)
            })
            .copied()
    }
}

impl Default for ReportParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Flattened element text: each text node trimmed, empty ones dropped, the
/// rest concatenated.
fn flat_text(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Like [`flat_text`] but with a separator between text nodes.
fn joined_text(element: ElementRef, separator: &str) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> Record {
        ReportParser::new().extract(html, "fallback_stem")
    }

    fn report(body: &str) -> String {
        format!("<html><head></head><body>{}</body></html>", body)
    }

    #[test]
    fn test_sample_id_from_label_cell() {
        let html = report("<table><tr><th>Sample ID</th><td> ABC-42: </td></tr></table>");
        assert_eq!(extract(&html).sample_id, "ABC-42");
    }

    #[test]
    fn test_sample_id_case_insensitive_label() {
        let html = report("<table><tr><td>SAMPLE id</td><td>XYZ</td></tr></table>");
        assert_eq!(extract(&html).sample_id, "XYZ");
    }

    #[test]
    fn test_sample_id_from_following_header_cell() {
        // No sibling <td>; the value sits in the next <th> of the same row.
        let html = report("<table><tr><th>Sample ID</th><th>HEADER-VALUE</th></tr></table>");
        assert_eq!(extract(&html).sample_id, "HEADER-VALUE");
    }

    #[test]
    fn test_sample_id_falls_back_to_title() {
        let html = "<html><head><title>My Sample</title></head><body></body></html>";
        assert_eq!(extract(html).sample_id, "My Sample");
    }

    #[test]
    fn test_sample_id_falls_back_to_file_stem() {
        assert_eq!(extract("<html><body></body></html>").sample_id, "fallback_stem");
    }

    #[test]
    fn test_sample_token_overrides_label_value() {
        let html = report(
            "<table><tr><td>Sample ID</td><td>Curated name</td></tr></table>\
             <p>Run: SAMPLE-7_S1_L001</p>",
        );
        assert_eq!(extract(&html).sample_id, "SAMPLE-7_S1_L001");
    }

    #[test]
    fn test_sra_accession_override() {
        let html = "<html><head><title>ARDaP report portal</title></head>\
                    <body><p>Accession SRR123456 processed.</p></body></html>";
        assert_eq!(extract(html).sample_id, "SRR123456");
    }

    #[test]
    fn test_override_skipped_when_token_equals_current_id() {
        let html = report("<table><tr><td>Sample ID</td><td>SRR999</td></tr></table>");
        assert_eq!(extract(&html).sample_id, "SRR999");
    }

    #[test]
    fn test_lane_token_checked_before_accessions() {
        let html = report("<p>ERR111 and also S1-A_S3_L002 appear here</p>");
        assert_eq!(extract(&html).sample_id, "S1-A_S3_L002");
    }

    #[test]
    fn test_summary_lines() {
        let html = report(
            "<table class=\"detail_table\"><thead><tr><th>Summary</th></tr></thead>\
             <tbody><tr><td>A</td></tr><tr><td>B</td></tr><tr><td>C</td></tr></tbody></table>",
        );
        let record = extract(&html);
        assert_eq!(record.summary_line1, "A");
        assert_eq!(record.summary_line2, "B");
    }

    #[test]
    fn test_summary_single_row() {
        let html = report(
            "<table class=\"detail_table\"><thead><tr><th>Summary</th></tr></thead>\
             <tbody><tr><td>only</td></tr></tbody></table>",
        );
        let record = extract(&html);
        assert_eq!(record.summary_line1, "only");
        assert_eq!(record.summary_line2, "");
    }

    #[test]
    fn test_summary_empty_body() {
        let html = report(
            "<table class=\"detail_table\"><thead><tr><th>Summary</th></tr></thead>\
             <tbody></tbody></table>",
        );
        let record = extract(&html);
        assert_eq!(record.summary_line1, "");
        assert_eq!(record.summary_line2, "");
    }

    #[test]
    fn test_summary_ignores_nested_table_rows() {
        let html = report(
            "<table class=\"detail_table\"><thead><tr><th>Summary</th></tr></thead><tbody>\
             <tr><td>outer1<table><tbody><tr><td>inner</td></tr></tbody></table></td></tr>\
             <tr><td>outer2</td></tr>\
             </tbody></table>",
        );
        let record = extract(&html);
        assert_eq!(record.summary_line1, "outer1inner");
        assert_eq!(record.summary_line2, "outer2");
    }

    #[test]
    fn test_summary_requires_detail_table_class() {
        let html = report(
            "<table><thead><tr><th>Summary</th></tr></thead>\
             <tbody><tr><td>A</td></tr></tbody></table>",
        );
        assert_eq!(extract(&html).summary_line1, "");
    }

    #[test]
    fn test_checked_box_label_by_id() {
        let html = report(
            "<input type=\"checkbox\" id=\"mdr\" checked>\
             <label for=\"mdr\">Multi-drug resistance predicted</label>\
             <p>No drug resistance predicted</p>",
        );
        assert_eq!(
            extract(&html).resistance_predict,
            "Multi-drug resistance predicted"
        );
    }

    #[test]
    fn test_checked_box_sibling_label() {
        let html = report(
            "<div><input type=\"checkbox\" checked>\
             <label>Mono-resistance predicted</label></div>",
        );
        assert_eq!(extract(&html).resistance_predict, "Mono-resistance predicted");
    }

    #[test]
    fn test_checked_box_enclosing_label() {
        let html = report(
            "<label><input type=\"checkbox\" aria-checked=\"true\">\
             Extensive drug resistance predicted</label>",
        );
        assert_eq!(
            extract(&html).resistance_predict,
            "Extensive drug resistance predicted"
        );
    }

    #[test]
    fn test_checked_box_container_text_is_capped() {
        let long_tail = "x".repeat(400);
        let html = report(&format!(
            "<div><input type=\"checkbox\" checked> some nearby text {}</div>",
            long_tail
        ));
        let predicted = extract(&html).resistance_predict;
        assert!(predicted.starts_with("some nearby text"));
        assert!(predicted.chars().count() <= 200);
    }

    #[test]
    fn test_unchecked_box_is_ignored() {
        let html = report(
            "<input type=\"checkbox\"><label>Extensive drug resistance predicted</label>",
        );
        // Falls through to the page-text scan, which still finds the option.
        assert_eq!(
            extract(&html).resistance_predict,
            "Extensive drug resistance predicted"
        );
    }

    #[test]
    fn test_glyph_before_option() {
        let html = report("<p>\u{2611} No drug resistance predicted</p>");
        assert_eq!(
            extract(&html).resistance_predict,
            "No drug resistance predicted"
        );
    }

    #[test]
    fn test_glyph_after_option() {
        let html = report("<p>Extensive drug resistance predicted \u{2714}</p>");
        assert_eq!(
            extract(&html).resistance_predict,
            "Extensive drug resistance predicted"
        );
    }

    #[test]
    fn test_glyph_tie_break_uses_fixed_order() {
        // Both options sit near glyphs; the first vocabulary entry wins.
        let html = report(
            "<p>\u{2610} Multi-drug resistance predicted</p>\
             <p>\u{2611} No drug resistance predicted</p>",
        );
        assert_eq!(
            extract(&html).resistance_predict,
            "No drug resistance predicted"
        );
    }

    #[test]
    fn test_plain_text_fallback() {
        let html = report("<p>Result: multi-drug resistance predicted for this isolate.</p>");
        assert_eq!(
            extract(&html).resistance_predict,
            "Multi-drug resistance predicted"
        );
    }

    #[test]
    fn test_no_resistance_section_yields_empty() {
        assert_eq!(extract("<html><body></body></html>").resistance_predict, "");
    }

    #[test]
    fn test_determinant_details_flattened() {
        let html = report(
            "<table class=\"detail_table\">\
             <thead><tr><th>Antimicrobial determinant details</th></tr></thead>\
             <tbody><tr><td> gyrA </td><td>S83L\n  mutation</td></tr>\
             <tr><td>parC</td><td>wild type</td></tr></tbody></table>",
        );
        assert_eq!(
            extract(&html).determinant_details,
            "gyrA | S83L mutation | parC | wild type"
        );
    }

    #[test]
    fn test_determinant_details_no_doubled_whitespace() {
        let html = report(
            "<table class=\"detail_table\">\
             <thead><tr><th>Antimicrobial determinant details</th></tr></thead>\
             <tbody><tr><td>a   b</td><td>\n\n c \t d </td></tr></tbody></table>",
        );
        let details = extract(&html).determinant_details;
        assert!(!details.contains("  "));
        assert!(!details.contains("| |"));
        assert_eq!(details, "a b | c d");
    }

    #[test]
    fn test_determinant_details_absent() {
        assert_eq!(extract("<html><body></body></html>").determinant_details, "");
    }

    #[test]
    fn test_malformed_markup_never_panics() {
        let record = extract("<<<table><tr<td>Sample ID<td>broken&&&");
        assert_eq!(record.summary_line1, "");
        assert_eq!(record.resistance_predict, "");
    }

    #[test]
    fn test_full_report_round_trip() {
        let html = "<html><head><title>ARDaP portal</title></head><body>\
            <table><tr><th>Sample ID:</th><td>banner</td></tr></table>\
            <p>Sequencing run SAMPLE-9_S4_L001</p>\
            <table class=\"detail_table\"><thead><tr><th>Summary</th></tr></thead>\
            <tbody><tr><td>Species: B. pseudomallei</td><td></td></tr>\
            <tr><td>Coverage: 88x</td></tr></tbody></table>\
            <p>\u{2611} Mono-resistance predicted</p>\
            <table class=\"detail_table\">\
            <thead><tr><th>Antimicrobial determinant details</th></tr></thead>\
            <tbody><tr><td>amrB</td><td>loss</td></tr></tbody></table>\
            </body></html>";

        let record = extract(html);
        assert_eq!(record.sample_id, "SAMPLE-9_S4_L001");
        assert_eq!(record.summary_line1, "Species: B. pseudomallei");
        assert_eq!(record.summary_line2, "Coverage: 88x");
        assert_eq!(record.resistance_predict, "Mono-resistance predicted");
        assert_eq!(record.determinant_details, "amrB | loss");
    }
}
