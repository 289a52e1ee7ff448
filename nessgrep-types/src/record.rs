use serde::{Deserialize, Serialize};
use std::fmt;

/// Encapsulation observed on a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tunnel {
    #[default]
    None,
    Ssl,
}

impl Tunnel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tunnel::None => "",
            Tunnel::Ssl => "ssl",
        }
    }
}

impl fmt::Display for Tunnel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reports only list ports something answered on, so every entry is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortStatus {
    #[default]
    Open,
}

impl fmt::Display for PortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortStatus::Open => write!(f, "open"),
        }
    }
}

/// One row of the port table projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortEntry {
    pub address: String,
    /// Port identifier exactly as the report spells it.
    pub port: String,
    /// Effective service name after normalization.
    pub service: String,
    pub tunnel: Tunnel,
    pub status: PortStatus,
}

impl fmt::Display for PortEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}|{}",
            self.address, self.port, self.service, self.tunnel, self.status
        )
    }
}

/// A single projected result for a matching host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchRecord {
    /// Full serialized host (`xml`).
    Host { xml: String },
    /// Markup from the nearest element start through one match (`xml_min`).
    Snippet {
        hostname: String,
        address: String,
        fragment: String,
    },
    /// `ipv4`
    Address { ipv4: String },
    /// `mac`
    Mac { mac: String },
    /// `mac+ipv4`
    MacAddress { mac: String, ipv4: String },
    /// `ports`
    Port(PortEntry),
    /// `script`
    PluginOutput {
        hostname: String,
        address: String,
        port: String,
        text: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_entry_display() {
        let entry = PortEntry {
            address: "10.0.0.5".into(),
            port: "443".into(),
            service: "https".into(),
            tunnel: Tunnel::Ssl,
            status: PortStatus::Open,
        };
        assert_eq!(entry.to_string(), "10.0.0.5|443|https|ssl|open");
    }

    #[test]
    fn port_entry_without_tunnel_keeps_empty_column() {
        let entry = PortEntry {
            address: "10.0.0.5".into(),
            port: "22".into(),
            service: "ssh".into(),
            tunnel: Tunnel::None,
            status: PortStatus::Open,
        };
        assert_eq!(entry.to_string(), "10.0.0.5|22|ssh||open");
    }

    #[test]
    fn record_json_is_tagged_by_kind() {
        let record = SearchRecord::Address {
            ipv4: "192.168.1.1".into(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"kind":"address","ipv4":"192.168.1.1"}"#);

        let port = SearchRecord::Port(PortEntry {
            address: "192.168.1.1".into(),
            port: "80".into(),
            service: "http".into(),
            tunnel: Tunnel::None,
            status: PortStatus::Open,
        });
        let json = serde_json::to_string(&port).unwrap();
        assert!(json.starts_with(r#"{"kind":"port","address":"192.168.1.1""#));
        assert!(json.contains(r#""tunnel":"none""#));
        assert!(json.contains(r#""status":"open""#));
    }
}
