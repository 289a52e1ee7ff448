//! Diagnostic text projection (`script` mode).

use nessgrep_types::SearchRecord;
use regex::Regex;

use crate::error::SearchError;
use crate::host::HostRecord;

/// Emit every `plugin_output` of the host whose serialized form matches.
///
/// The pattern is tested against the markup of the element while the record
/// carries its raw text. Returns the number of records emitted.
pub fn emit_plugin_outputs(
    host: &HostRecord<'_>,
    regex: &Regex,
    emit: &mut dyn FnMut(SearchRecord),
) -> Result<usize, SearchError> {
    let mut emitted = 0;
    for finding in host.findings() {
        let port = finding.port();
        for output in finding.plugin_outputs() {
            if !regex.is_match(&output.to_xml()) {
                continue;
            }
            let text = output
                .first_text()
                .ok_or_else(|| SearchError::MissingTextContent {
                    port: port.to_string(),
                })?;
            emit(SearchRecord::PluginOutput {
                hostname: host.hostname().to_string(),
                address: host.address().to_string(),
                port: port.to_string(),
                text: text.to_string(),
            });
            emitted += 1;
        }
    }
    Ok(emitted)
}
