use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What to emit for each matching host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OutputMode {
    /// The host's full serialized subtree.
    #[serde(rename = "xml")]
    Xml,
    /// One trimmed snippet per pattern match inside the host.
    #[default]
    #[serde(rename = "xml_min")]
    XmlMin,
    #[serde(rename = "ipv4")]
    Ipv4,
    #[serde(rename = "mac")]
    Mac,
    #[serde(rename = "mac+ipv4")]
    MacIpv4,
    /// Open-port table with derived service names.
    #[serde(rename = "ports")]
    Ports,
    /// Matching `plugin_output` text.
    #[serde(rename = "script")]
    Script,
}

impl OutputMode {
    pub const ALL: [OutputMode; 7] = [
        OutputMode::Xml,
        OutputMode::XmlMin,
        OutputMode::Ipv4,
        OutputMode::Mac,
        OutputMode::MacIpv4,
        OutputMode::Ports,
        OutputMode::Script,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Xml => "xml",
            OutputMode::XmlMin => "xml_min",
            OutputMode::Ipv4 => "ipv4",
            OutputMode::Mac => "mac",
            OutputMode::MacIpv4 => "mac+ipv4",
            OutputMode::Ports => "ports",
            OutputMode::Script => "script",
        }
    }

    /// Whether the caller wraps the whole run in a report root element.
    pub fn wraps_document(&self) -> bool {
        matches!(self, OutputMode::Xml)
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputModeParseError(pub String);

impl fmt::Display for OutputModeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown output mode '{}'", self.0)
    }
}

impl std::error::Error for OutputModeParseError {}

impl FromStr for OutputMode {
    type Err = OutputModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| OutputModeParseError(s.to_string()))
    }
}
