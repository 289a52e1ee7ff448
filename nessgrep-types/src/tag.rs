use serde::{Deserialize, Serialize};
use std::fmt;

/// Host property tags the search consumes. Any other `<tag name=...>` is
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostTag {
    /// `host-ip`
    HostIp,
    /// `host-fqdn`
    HostFqdn,
}

impl HostTag {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "host-ip" => Some(Self::HostIp),
            "host-fqdn" => Some(Self::HostFqdn),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::HostIp => "host-ip",
            Self::HostFqdn => "host-fqdn",
        }
    }
}

impl fmt::Display for HostTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Address and name of a host, as read from its property tags.
///
/// Fields stay empty when the report does not carry the tag. `mac` has no
/// corresponding tag and is never filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostIdentity {
    pub ipv4: String,
    pub hostname: String,
    pub mac: String,
}

impl HostIdentity {
    /// Value recorded for `tag`, `None` if the host never carried it.
    pub fn get(&self, tag: HostTag) -> Option<&str> {
        let value = match tag {
            HostTag::HostIp => &self.ipv4,
            HostTag::HostFqdn => &self.hostname,
        };
        (!value.is_empty()).then_some(value.as_str())
    }

    /// Record a tag value. Later values replace earlier ones.
    pub fn set(&mut self, tag: HostTag, value: impl Into<String>) {
        match tag {
            HostTag::HostIp => self.ipv4 = value.into(),
            HostTag::HostFqdn => self.hostname = value.into(),
        }
    }
}
