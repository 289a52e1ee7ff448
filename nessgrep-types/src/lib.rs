pub mod mode;
pub mod record;
pub mod report;
pub mod tag;

pub use mode::{OutputMode, OutputModeParseError};
pub use record::{PortEntry, PortStatus, SearchRecord, Tunnel};
pub use report::{
    FINDING_TAG, HOST_TAG, HOST_TAG_ELEMENT, PLUGIN_OUTPUT_TAG, REPORT_ROOT_TAG,
    SSL_SUPPORT_PLUGIN,
};
pub use tag::{HostIdentity, HostTag};
