use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use nessgrep_types::OutputMode;

/// How records are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordFormat {
    /// Console layout, one shape per output mode.
    #[default]
    Text,
    /// One JSON object per record, newline-delimited.
    Json,
}

impl fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordFormat::Text => write!(f, "text"),
            RecordFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for RecordFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(RecordFormat::Text),
            "json" => Ok(RecordFormat::Json),
            other => Err(format!("unknown record format '{other}'")),
        }
    }
}

/// Where and how records are written.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    pub mode: OutputMode,
    pub format: RecordFormat,
    /// Write to this file instead of stdout (--out-file).
    pub path: Option<PathBuf>,
}
