use nessgrep_types::{OutputMode, REPORT_ROOT_TAG, SearchRecord};

use crate::traits::{OutputError, RecordFormatter};

/// Plain console output.
///
/// Snippet and plugin output records start with a blank line followed by
/// `Host-FQDN:` / `Host-Addr:` header lines; every other record is a single
/// line.
pub struct TextFormatter;

impl RecordFormatter for TextFormatter {
    fn format(&self, record: &SearchRecord) -> Result<String, OutputError> {
        let out = match record {
            SearchRecord::Host { xml } => format!("{xml}\n"),
            SearchRecord::Snippet {
                hostname,
                address,
                fragment,
            } => format!("\nHost-FQDN: {hostname}\nHost-Addr: {address}\n\n{fragment}\n"),
            SearchRecord::Address { ipv4 } => format!("{ipv4}\n"),
            SearchRecord::Mac { mac } => format!("{mac}\n"),
            SearchRecord::MacAddress { mac, ipv4 } => format!("{mac}|{ipv4}\n"),
            SearchRecord::Port(entry) => format!("{entry}\n"),
            SearchRecord::PluginOutput {
                hostname,
                address,
                port,
                text,
            } => format!("\nHost-FQDN: {hostname}:{port}\nHost-Addr: {address}:{port}\n{text}\n"),
        };
        Ok(out)
    }

    fn header(&self, mode: OutputMode) -> Option<String> {
        mode.wraps_document()
            .then(|| format!("<{REPORT_ROOT_TAG}>\n"))
    }

    fn footer(&self, mode: OutputMode) -> Option<String> {
        mode.wraps_document()
            .then(|| format!("</{REPORT_ROOT_TAG}>\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nessgrep_types::{PortEntry, PortStatus, Tunnel};

    #[test]
    fn port_line() {
        let record = SearchRecord::Port(PortEntry {
            address: "10.0.0.5".into(),
            port: "443".into(),
            service: "https".into(),
            tunnel: Tunnel::Ssl,
            status: PortStatus::Open,
        });
        assert_eq!(
            TextFormatter.format(&record).unwrap(),
            "10.0.0.5|443|https|ssl|open\n"
        );
    }

    #[test]
    fn snippet_block() {
        let record = SearchRecord::Snippet {
            hostname: "x.example".into(),
            address: "10.0.0.5".into(),
            fragment: "<plugin_output>TLSv1".into(),
        };
        assert_eq!(
            TextFormatter.format(&record).unwrap(),
            "\nHost-FQDN: x.example\nHost-Addr: 10.0.0.5\n\n<plugin_output>TLSv1\n"
        );
    }

    #[test]
    fn plugin_output_block_appends_port() {
        let record = SearchRecord::PluginOutput {
            hostname: "".into(),
            address: "10.0.0.9".into(),
            port: "22".into(),
            text: "SSH version : OpenSSH_8.9".into(),
        };
        assert_eq!(
            TextFormatter.format(&record).unwrap(),
            "\nHost-FQDN: :22\nHost-Addr: 10.0.0.9:22\nSSH version : OpenSSH_8.9\n"
        );
    }

    #[test]
    fn address_lines() {
        let ipv4 = SearchRecord::Address { ipv4: "10.0.0.5".into() };
        assert_eq!(TextFormatter.format(&ipv4).unwrap(), "10.0.0.5\n");

        let both = SearchRecord::MacAddress {
            mac: String::new(),
            ipv4: "10.0.0.5".into(),
        };
        assert_eq!(TextFormatter.format(&both).unwrap(), "|10.0.0.5\n");
    }

    #[test]
    fn wrapper_only_in_xml_mode() {
        assert_eq!(
            TextFormatter.header(OutputMode::Xml).as_deref(),
            Some("<NessusClientData_v2>\n")
        );
        assert_eq!(
            TextFormatter.footer(OutputMode::Xml).as_deref(),
            Some("</NessusClientData_v2>\n")
        );
        for mode in OutputMode::ALL.into_iter().filter(|m| *m != OutputMode::Xml) {
            assert!(TextFormatter.header(mode).is_none());
            assert!(TextFormatter.footer(mode).is_none());
        }
    }
}
