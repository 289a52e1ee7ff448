use nessgrep_types::{OutputMode, SearchRecord};

/// Trait for rendering search records.
pub trait RecordFormatter: Send + Sync {
    /// Text for one record, including its trailing newline.
    fn format(&self, record: &SearchRecord) -> Result<String, OutputError>;

    /// Emitted once before the first record of a run.
    fn header(&self, _mode: OutputMode) -> Option<String> {
        None
    }

    /// Emitted once after the last record of a run.
    fn footer(&self, _mode: OutputMode) -> Option<String> {
        None
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("formatting error: {0}")]
    FormatError(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
