pub mod config;
pub mod json;
pub mod manager;
pub mod text;
pub mod traits;

pub use config::{OutputConfig, RecordFormat};
pub use manager::OutputManager;
pub use traits::{OutputError, RecordFormatter};
