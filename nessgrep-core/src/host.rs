use nessgrep_types::{
    FINDING_TAG, HOST_TAG_ELEMENT, HostIdentity, HostTag, PLUGIN_OUTPUT_TAG,
};
use nessgrep_xml::{Element, ElementsByTag};

/// Read-only view over a `ReportHost` element.
pub struct HostRecord<'a> {
    element: &'a Element,
    identity: HostIdentity,
}

impl<'a> HostRecord<'a> {
    pub fn new(element: &'a Element) -> Self {
        Self {
            element,
            identity: read_identity(element),
        }
    }

    pub fn element(&self) -> &'a Element {
        self.element
    }

    pub fn identity(&self) -> &HostIdentity {
        &self.identity
    }

    /// `host-ip` value, or empty.
    pub fn address(&self) -> &str {
        &self.identity.ipv4
    }

    /// `host-fqdn` value, or empty.
    pub fn hostname(&self) -> &str {
        &self.identity.hostname
    }

    /// `ReportItem` descendants in document order.
    pub fn findings(&self) -> impl Iterator<Item = Finding<'a>> + 'a {
        self.element.elements_by_tag(FINDING_TAG).map(Finding::new)
    }
}

/// Collect the recognized property tags of a host.
///
/// Every `tag` descendant is visited; when a tag name occurs more than once
/// the last value wins. A recognized tag with no text records an empty value.
pub fn read_identity(host: &Element) -> HostIdentity {
    let mut identity = HostIdentity::default();
    for tag in host.elements_by_tag(HOST_TAG_ELEMENT) {
        let Some(kind) = HostTag::from_name(tag.attribute_or_empty("name")) else {
            continue;
        };
        identity.set(kind, tag.first_text().unwrap_or_default());
    }
    identity
}

/// Read-only view over a `ReportItem` element.
#[derive(Clone, Copy)]
pub struct Finding<'a> {
    element: &'a Element,
}

impl<'a> Finding<'a> {
    pub fn new(element: &'a Element) -> Self {
        Self { element }
    }

    pub fn port(&self) -> &'a str {
        self.element.attribute_or_empty("port")
    }

    /// Raw `svc_name` label.
    pub fn service_name(&self) -> &'a str {
        self.element.attribute_or_empty("svc_name")
    }

    pub fn plugin_name(&self) -> &'a str {
        self.element.attribute_or_empty("pluginName")
    }

    pub fn plugin_outputs(&self) -> ElementsByTag<'a> {
        self.element.elements_by_tag(PLUGIN_OUTPUT_TAG)
    }
}
