//! Port table projection and service-name derivation.

use std::collections::HashSet;

use nessgrep_types::{PortEntry, PortStatus, SSL_SUPPORT_PLUGIN, Tunnel};
use regex::Regex;

use crate::host::HostRecord;

/// Ports on which the host reported SSL/TLS version support.
pub fn ssl_ports<'a>(host: &HostRecord<'a>) -> HashSet<&'a str> {
    host.findings()
        .filter(|finding| finding.plugin_name() == SSL_SUPPORT_PLUGIN)
        .map(|finding| finding.port())
        .collect()
}

/// Effective service name and tunnel for a finding's raw service label.
///
/// `www` reads as `http`; `http` on a port with SSL evidence reads as `https`.
pub fn derive_service(
    svc_name: &str,
    port: &str,
    ssl_ports: &HashSet<&str>,
) -> (String, Tunnel) {
    let name = if svc_name == "www" { "http" } else { svc_name };
    let tunnel = if ssl_ports.contains(port) {
        Tunnel::Ssl
    } else {
        Tunnel::None
    };
    let name = if name == "http" && tunnel == Tunnel::Ssl {
        "https"
    } else {
        name
    };
    (name.to_string(), tunnel)
}

/// One entry per distinct port whose identifier or effective service name
/// matches `regex`. The first qualifying finding for a port wins.
pub fn port_table(host: &HostRecord<'_>, regex: &Regex) -> Vec<PortEntry> {
    let ssl = ssl_ports(host);
    let mut emitted: HashSet<&str> = HashSet::new();
    let mut entries = Vec::new();

    for finding in host.findings() {
        let port = finding.port();
        let (service, tunnel) = derive_service(finding.service_name(), port, &ssl);
        if !(regex.is_match(port) || regex.is_match(&service)) {
            continue;
        }
        if !emitted.insert(port) {
            continue;
        }
        entries.push(PortEntry {
            address: host.address().to_string(),
            port: port.to_string(),
            service,
            tunnel,
            status: PortStatus::Open,
        });
    }

    entries
}
