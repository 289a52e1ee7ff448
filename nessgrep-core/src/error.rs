use nessgrep_xml::ParseError;

/// Why a report file produced no (or incomplete) results.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The document parsed, but carries no `NessusClientData_v2` element.
    #[error("not a Nessus report")]
    NotAReportDocument,
    /// Reading or parsing the file failed, or the search expression did not compile.
    #[error("unable to parse: {0}")]
    UnparsableInput(String),
    /// A `plugin_output` element selected for output has no leading text.
    #[error("plugin_output on port '{port}' has no text content")]
    MissingTextContent { port: String },
}

impl From<ParseError> for SearchError {
    fn from(err: ParseError) -> Self {
        Self::UnparsableInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_a_report_display() {
        assert_eq!(SearchError::NotAReportDocument.to_string(), "not a Nessus report");
    }

    #[test]
    fn parse_error_becomes_unparsable() {
        let err = SearchError::from(ParseError::NoRootElement);
        assert!(matches!(err, SearchError::UnparsableInput(_)));
        assert_eq!(err.to_string(), "unable to parse: document has no root element");
    }

    #[test]
    fn missing_text_names_port() {
        let err = SearchError::MissingTextContent { port: "443".into() };
        assert_eq!(err.to_string(), "plugin_output on port '443' has no text content");
    }
}
