use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::config::{OutputConfig, RecordFormat};
use crate::json::JsonFormatter;
use crate::text::TextFormatter;
use crate::traits::{OutputError, RecordFormatter};
use nessgrep_types::SearchRecord;

fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    for component in path.components() {
        if matches!(component, std::path::Component::ParentDir) {
            return Err(OutputError::FormatError(format!(
                "output path '{}' must not contain '..' components",
                path.display()
            )));
        }
    }
    Ok(())
}

/// Streams records to stdout or a single file as they are produced.
///
/// Call [`begin`](Self::begin) once, [`write`](Self::write) per record, and
/// [`finish`](Self::finish) at the end of the run.
pub struct OutputManager {
    config: OutputConfig,
    formatter: Box<dyn RecordFormatter>,
    sink: Box<dyn Write>,
    written: usize,
}

impl OutputManager {
    /// Open the configured destination.
    pub fn new(config: OutputConfig) -> Result<Self, OutputError> {
        let sink: Box<dyn Write> = match &config.path {
            Some(path) => {
                validate_output_path(path)?;
                let file = File::create(path).map_err(|e| {
                    OutputError::Io(io::Error::new(
                        e.kind(),
                        format!("failed to create {}: {}", path.display(), e),
                    ))
                })?;
                Box::new(BufWriter::new(file))
            }
            None => Box::new(io::stdout()),
        };
        Ok(Self::with_writer(config, sink))
    }

    /// Write to an arbitrary sink; `config.path` is ignored.
    pub fn with_writer(config: OutputConfig, sink: Box<dyn Write>) -> Self {
        let formatter = formatter_for(config.format);
        Self {
            config,
            formatter,
            sink,
            written: 0,
        }
    }

    pub fn begin(&mut self) -> Result<(), OutputError> {
        if let Some(header) = self.formatter.header(self.config.mode) {
            self.sink.write_all(header.as_bytes())?;
        }
        Ok(())
    }

    pub fn write(&mut self, record: &SearchRecord) -> Result<(), OutputError> {
        let out = self.formatter.format(record)?;
        self.sink.write_all(out.as_bytes())?;
        self.written += 1;
        Ok(())
    }

    pub fn finish(&mut self) -> Result<(), OutputError> {
        if let Some(footer) = self.formatter.footer(self.config.mode) {
            self.sink.write_all(footer.as_bytes())?;
        }
        self.sink.flush()?;
        Ok(())
    }

    /// Records written so far.
    pub fn written(&self) -> usize {
        self.written
    }
}

fn formatter_for(format: RecordFormat) -> Box<dyn RecordFormatter> {
    match format {
        RecordFormat::Text => Box::new(TextFormatter),
        RecordFormat::Json => Box::new(JsonFormatter),
    }
}
