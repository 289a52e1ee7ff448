//! Element and attribute names of the `.nessus` (v2) report format.

/// Root element every Nessus v2 export carries.
pub const REPORT_ROOT_TAG: &str = "NessusClientData_v2";

/// One scanned host.
pub const HOST_TAG: &str = "ReportHost";

/// `<tag name="...">value</tag>` entries under `HostProperties`.
pub const HOST_TAG_ELEMENT: &str = "tag";

/// One (port, plugin) observation on a host.
pub const FINDING_TAG: &str = "ReportItem";

/// Diagnostic text attached to a finding.
pub const PLUGIN_OUTPUT_TAG: &str = "plugin_output";

/// Plugin whose presence on a port is taken as evidence of SSL/TLS.
pub const SSL_SUPPORT_PLUGIN: &str = "SSL / TLS Versions Supported";
