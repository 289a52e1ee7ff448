pub mod discovery;
pub mod engine;
pub mod error;
pub mod host;
pub mod matcher;
pub mod pattern;
pub mod plugin_output;
pub mod ports;
pub mod snippet;

pub use discovery::discover_files;
pub use engine::{FileReport, RunSummary, SearchEngine, SearchEvent, SearchQuery};
pub use error::SearchError;
pub use host::{Finding, HostRecord};
pub use matcher::HostMatcher;
pub use pattern::{compile_pattern, is_report_document, validate_and_compile};
pub use ports::{derive_service, port_table, ssl_ports};
