use std::convert::Infallible;
use std::path::{Path, PathBuf};

use nessgrep_types::{OutputMode, SearchRecord};
use nessgrep_xml::Document;
use tracing::{debug, info};

use crate::error::SearchError;
use crate::matcher::HostMatcher;
use crate::pattern::validate_and_compile;

/// What to search for and how to project it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub pattern: String,
    pub case_sensitive: bool,
    pub mode: OutputMode,
}

/// Outcome of one report file that was searched to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub hosts_matched: usize,
    pub records: usize,
}

/// Event emitted while searching a set of files.
#[derive(Debug)]
pub enum SearchEvent {
    /// A projected record, in document-then-host-then-finding order.
    Record(SearchRecord),
    /// A file was searched to completion.
    FileComplete(FileReport),
    /// A file could not be searched. Records it produced before failing
    /// have already been emitted.
    FileSkipped { path: PathBuf, error: SearchError },
}

/// Totals for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files_searched: usize,
    pub files_failed: usize,
    pub files_empty: usize,
    pub hosts_matched: usize,
    pub records: usize,
}

impl RunSummary {
    /// Whether any file could not be processed.
    pub fn has_errors(&self) -> bool {
        self.files_failed > 0
    }
}

pub struct SearchEngine {
    query: SearchQuery,
}

impl SearchEngine {
    pub fn new(query: SearchQuery) -> Self {
        Self { query }
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    /// Validate a parsed report, compile the pattern for it, and search it.
    /// Returns the number of hosts that matched.
    pub fn search_document(
        &self,
        doc: &Document,
        emit: &mut dyn FnMut(SearchRecord),
    ) -> Result<usize, SearchError> {
        let regex = validate_and_compile(doc, &self.query.pattern, self.query.case_sensitive)?;
        HostMatcher::new(&regex, self.query.mode).search_document(doc, emit)
    }

    /// Read, parse and search one report file, streaming records to `emit`.
    pub fn process_file(
        &self,
        path: &Path,
        emit: &mut dyn FnMut(SearchRecord),
    ) -> Result<FileReport, SearchError> {
        let doc = Document::from_path(path)?;
        let mut records = 0;
        let hosts_matched = self.search_document(&doc, &mut |record| {
            records += 1;
            emit(record);
        })?;
        Ok(FileReport {
            path: path.to_path_buf(),
            hosts_matched,
            records,
        })
    }

    /// Search `files` one after another. A failing file is reported through
    /// [`SearchEvent::FileSkipped`] and never stops the run. Empty files are
    /// skipped without an event.
    pub fn run<F>(&self, files: &[PathBuf], mut on_event: F) -> RunSummary
    where
        F: FnMut(SearchEvent),
    {
        let result = self.try_run(files, |event| {
            on_event(event);
            Ok::<(), Infallible>(())
        });
        match result {
            Ok(summary) => summary,
            Err(never) => match never {},
        }
    }

    /// Like [`run`](Self::run), but the consumer can stop the run by
    /// returning an error. No file after the current one is opened, and no
    /// further events are delivered.
    pub fn try_run<F, E>(&self, files: &[PathBuf], mut on_event: F) -> Result<RunSummary, E>
    where
        F: FnMut(SearchEvent) -> Result<(), E>,
    {
        let mut summary = RunSummary::default();

        for path in files {
            if is_empty_file(path) {
                debug!(path = %path.display(), "skipping empty file");
                summary.files_empty += 1;
                continue;
            }

            let mut emitted = 0;
            let mut stopped: Option<E> = None;
            let result = self.process_file(path, &mut |record| {
                if stopped.is_some() {
                    return;
                }
                match on_event(SearchEvent::Record(record)) {
                    Ok(()) => emitted += 1,
                    Err(e) => stopped = Some(e),
                }
            });
            summary.records += emitted;

            if let Some(e) = stopped {
                debug!(path = %path.display(), "run stopped by consumer");
                return Err(e);
            }

            match result {
                Ok(report) => {
                    debug!(
                        path = %path.display(),
                        hosts_matched = report.hosts_matched,
                        records = report.records,
                        "file searched"
                    );
                    summary.files_searched += 1;
                    summary.hosts_matched += report.hosts_matched;
                    on_event(SearchEvent::FileComplete(report))?;
                }
                Err(error) => {
                    debug!(path = %path.display(), error = %error, "file skipped");
                    summary.files_failed += 1;
                    on_event(SearchEvent::FileSkipped {
                        path: path.clone(),
                        error,
                    })?;
                }
            }
        }

        info!(
            files_searched = summary.files_searched,
            files_failed = summary.files_failed,
            hosts_matched = summary.hosts_matched,
            records = summary.records,
            "search complete"
        );
        Ok(summary)
    }
}

/// Zero-length files are not reports and are skipped quietly. A file whose
/// size cannot be read is left for the parser to report.
fn is_empty_file(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|meta| meta.len() == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(pattern: &str, mode: OutputMode) -> SearchEngine {
        SearchEngine::new(SearchQuery {
            pattern: pattern.into(),
            case_sensitive: false,
            mode,
        })
    }

    #[test]
    fn search_document_rejects_non_report() {
        let doc = Document::parse("<nmaprun><host/></nmaprun>").unwrap();
        let mut records = Vec::new();
        let result = engine(".", OutputMode::Xml).search_document(&doc, &mut |r| records.push(r));
        assert!(matches!(result, Err(SearchError::NotAReportDocument)));
        assert!(records.is_empty());
    }

    #[test]
    fn search_document_is_case_insensitive_when_asked() {
        let doc = Document::parse(
            r#"<NessusClientData_v2><ReportHost><tag name="host-ip">10.1.1.1</tag><ReportItem port="80" svc_name="www"/></ReportHost></NessusClientData_v2>"#,
        )
        .unwrap();
        let mut records = Vec::new();
        let matched = engine("WWW", OutputMode::Ipv4)
            .search_document(&doc, &mut |r| records.push(r))
            .unwrap();
        assert_eq!(matched, 1);

        let strict = SearchEngine::new(SearchQuery {
            pattern: "WWW".into(),
            case_sensitive: true,
            mode: OutputMode::Ipv4,
        });
        let matched = strict.search_document(&doc, &mut |_| {}).unwrap();
        assert_eq!(matched, 0);
    }

    #[test]
    fn process_file_reports_unreadable_path() {
        let path = std::env::temp_dir().join("nessgrep_engine_missing.nessus");
        let _ = std::fs::remove_file(&path);
        let result = engine(".", OutputMode::Xml).process_file(&path, &mut |_| {});
        assert!(matches!(result, Err(SearchError::UnparsableInput(_))));
    }

    #[test]
    fn try_run_stops_at_first_consumer_error() {
        let dir = std::env::temp_dir().join("nessgrep_engine_try_run");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let report = r#"<NessusClientData_v2>
<ReportHost><tag name="host-ip">10.0.0.1</tag><ReportItem port="80" svc_name="www"/></ReportHost>
<ReportHost><tag name="host-ip">10.0.0.2</tag><ReportItem port="80" svc_name="www"/></ReportHost>
</NessusClientData_v2>"#;
        let files: Vec<PathBuf> = ["a.nessus", "b.nessus"]
            .iter()
            .map(|name| {
                let path = dir.join(name);
                std::fs::write(&path, report).unwrap();
                path
            })
            .collect();

        let mut delivered = Vec::new();
        let result = engine("www", OutputMode::Ipv4).try_run(&files, |event| match event {
            SearchEvent::Record(record) => {
                delivered.push(record);
                Err("sink closed")
            }
            other => panic!("no event expected after the failure, got {other:?}"),
        });

        assert_eq!(result, Err("sink closed"));
        assert_eq!(delivered, vec![SearchRecord::Address { ipv4: "10.0.0.1".into() }]);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn try_run_without_errors_matches_run() {
        let dir = std::env::temp_dir().join("nessgrep_engine_try_run_ok");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("a.nessus");
        std::fs::write(
            &path,
            r#"<NessusClientData_v2><ReportHost><tag name="host-ip">10.0.0.1</tag></ReportHost></NessusClientData_v2>"#,
        )
        .unwrap();
        let files = vec![path];

        let engine = engine("host-ip", OutputMode::Ipv4);
        let summary = engine
            .try_run(&files, |_| Ok::<(), std::io::Error>(()))
            .unwrap();
        assert_eq!(summary, engine.run(&files, |_| {}));
        assert_eq!(summary.records, 1);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn summary_has_errors_only_on_failures() {
        let mut summary = RunSummary::default();
        assert!(!summary.has_errors());
        summary.files_empty = 3;
        assert!(!summary.has_errors());
        summary.files_failed = 1;
        assert!(summary.has_errors());
    }
}
