use nessgrep_types::SearchRecord;

use crate::traits::{OutputError, RecordFormatter};

/// Newline-delimited JSON, one object per record tagged by `kind`.
pub struct JsonFormatter;

impl RecordFormatter for JsonFormatter {
    fn format(&self, record: &SearchRecord) -> Result<String, OutputError> {
        let mut line = serde_json::to_string(record)
            .map_err(|e| OutputError::FormatError(format!("JSON serialization failed: {e}")))?;
        line.push('\n');
        Ok(line)
    }
}
