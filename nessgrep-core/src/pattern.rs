use nessgrep_types::REPORT_ROOT_TAG;
use nessgrep_xml::Document;
use regex::{Regex, RegexBuilder};

use crate::error::SearchError;

/// Compile the search expression. Case sensitivity applies to the whole run.
pub fn compile_pattern(pattern: &str, case_sensitive: bool) -> Result<Regex, SearchError> {
    RegexBuilder::new(pattern)
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|e| SearchError::UnparsableInput(format!("invalid search expression: {e}")))
}

/// A document is a report if the root tag occurs anywhere in it.
pub fn is_report_document(doc: &Document) -> bool {
    doc.contains_tag(REPORT_ROOT_TAG)
}

/// Check that `doc` is a Nessus report, then compile the pattern for it.
///
/// The document is classified before the pattern is compiled, so a file that
/// is not a report is reported as such even when the pattern is invalid.
pub fn validate_and_compile(
    doc: &Document,
    pattern: &str,
    case_sensitive: bool,
) -> Result<Regex, SearchError> {
    if !is_report_document(doc) {
        return Err(SearchError::NotAReportDocument);
    }
    compile_pattern(pattern, case_sensitive)
}
