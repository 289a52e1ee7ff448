use nessgrep_types::{HOST_TAG, OutputMode, SearchRecord};
use nessgrep_xml::{Document, Element};
use regex::Regex;
use tracing::trace;

use crate::error::SearchError;
use crate::host::HostRecord;
use crate::plugin_output::emit_plugin_outputs;
use crate::ports::port_table;
use crate::snippet::snippets;

/// Tests each host of a report against the pattern and projects matches.
///
/// A host is selected when the pattern matches anywhere in its serialized
/// subtree, markup included. What is emitted for it depends on the mode and
/// need not contain the text that matched.
pub struct HostMatcher<'r> {
    regex: &'r Regex,
    mode: OutputMode,
}

impl<'r> HostMatcher<'r> {
    pub fn new(regex: &'r Regex, mode: OutputMode) -> Self {
        Self { regex, mode }
    }

    /// Visit every `ReportHost` in document order. Returns the number of
    /// hosts that matched.
    pub fn search_document(
        &self,
        doc: &Document,
        emit: &mut dyn FnMut(SearchRecord),
    ) -> Result<usize, SearchError> {
        let mut matched = 0;
        for host in doc.elements_by_tag(HOST_TAG) {
            if self.process_host(host, emit)? {
                matched += 1;
            }
        }
        Ok(matched)
    }

    /// Match one host and emit its projection. Returns whether it matched.
    pub fn process_host(
        &self,
        host: &Element,
        emit: &mut dyn FnMut(SearchRecord),
    ) -> Result<bool, SearchError> {
        let serialized = host.to_xml();
        if !self.regex.is_match(&serialized) {
            return Ok(false);
        }

        let record = HostRecord::new(host);
        trace!(
            host = host.attribute_or_empty("name"),
            address = record.address(),
            "host matched"
        );

        match self.mode {
            OutputMode::Xml => emit(SearchRecord::Host { xml: serialized }),
            OutputMode::XmlMin => {
                for fragment in snippets(&serialized, self.regex) {
                    emit(SearchRecord::Snippet {
                        hostname: record.hostname().to_string(),
                        address: record.address().to_string(),
                        fragment: fragment.to_string(),
                    });
                }
            }
            OutputMode::Ipv4 => {
                if !record.address().is_empty() {
                    emit(SearchRecord::Address {
                        ipv4: record.address().to_string(),
                    });
                }
            }
            OutputMode::Mac => {
                let mac = &record.identity().mac;
                if !mac.is_empty() {
                    emit(SearchRecord::Mac { mac: mac.clone() });
                }
            }
            OutputMode::MacIpv4 => {
                if !record.address().is_empty() {
                    emit(SearchRecord::MacAddress {
                        mac: record.identity().mac.clone(),
                        ipv4: record.address().to_string(),
                    });
                }
            }
            OutputMode::Ports => {
                for entry in port_table(&record, self.regex) {
                    emit(SearchRecord::Port(entry));
                }
            }
            OutputMode::Script => {
                emit_plugin_outputs(&record, self.regex, emit)?;
            }
        }

        Ok(true)
    }
}
