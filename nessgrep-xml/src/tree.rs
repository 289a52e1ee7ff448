use std::borrow::Cow;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::ParseError;
use crate::escape::{escape_attribute, escape_text};

/// A child of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Unescaped character data.
    Text(String),
    CData(String),
    Comment(String),
}

/// An element with its attributes (in document order) and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push_text(&text.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Attribute value, or `""` when the attribute is absent.
    pub fn attribute_or_empty(&self, name: &str) -> &str {
        self.attribute(name).unwrap_or("")
    }

    /// Content of the first child when that child is text or CDATA.
    pub fn first_text(&self) -> Option<&str> {
        match self.children.first()? {
            Node::Text(text) | Node::CData(text) => Some(text),
            _ => None,
        }
    }

    /// Descendant elements named `tag`, in document order. The element
    /// itself is not included.
    pub fn elements_by_tag<'a>(&'a self, tag: &'a str) -> ElementsByTag<'a> {
        ElementsByTag {
            tag,
            stack: vec![self.children.iter()],
        }
    }

    /// Serialize this element and its subtree.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        write_element(&mut out, self);
        out
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Node::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(Node::Text(text.to_string()));
        }
    }
}

/// Pre-order iterator over descendant elements with a given name.
pub struct ElementsByTag<'a> {
    tag: &'a str,
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Iterator for ElementsByTag<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<&'a Element> {
        while let Some(children) = self.stack.last_mut() {
            match children.next() {
                Some(Node::Element(element)) => {
                    self.stack.push(element.children.iter());
                    if element.name == self.tag {
                        return Some(element);
                    }
                }
                Some(_) => {}
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

/// A parsed XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// Read and parse a UTF-8 XML file.
    pub fn from_path(path: &Path) -> Result<Self, ParseError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        let input = normalize_line_endings(input);
        let mut reader = Reader::from_str(&input);
        reader.config_mut().trim_text(false);

        let mut open: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(start)) => open.push(element_from_start(&start)?),
                Ok(Event::Empty(start)) => {
                    let element = element_from_start(&start)?;
                    attach(&mut open, &mut root, element)?;
                }
                Ok(Event::End(end)) => {
                    let element = open.pop().ok_or_else(|| {
                        ParseError::UnexpectedEnd(String::from_utf8_lossy(end.name().as_ref()).into_owned())
                    })?;
                    attach(&mut open, &mut root, element)?;
                }
                Ok(Event::Text(text)) => {
                    let text = text
                        .unescape()
                        .map_err(|e| ParseError::Text(e.to_string()))?;
                    match open.last_mut() {
                        Some(parent) => parent.push_text(&text),
                        None if text.trim().is_empty() => {}
                        None => return Err(ParseError::TextOutsideRoot),
                    }
                }
                Ok(Event::CData(cdata)) => {
                    let data = String::from_utf8_lossy(&cdata.into_inner()).into_owned();
                    match open.last_mut() {
                        Some(parent) => parent.children.push(Node::CData(data)),
                        None => return Err(ParseError::TextOutsideRoot),
                    }
                }
                Ok(Event::Comment(comment)) => {
                    // Comments outside the root are dropped.
                    if let Some(parent) = open.last_mut() {
                        let data = String::from_utf8_lossy(&comment.into_inner()).into_owned();
                        parent.children.push(Node::Comment(data));
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(ParseError::Syntax {
                        position: reader.buffer_position() as u64,
                        message: e.to_string(),
                    });
                }
            }
        }

        if let Some(unclosed) = open.last() {
            return Err(ParseError::Unclosed(unclosed.name.clone()));
        }
        root.map(Document::new).ok_or(ParseError::NoRootElement)
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Elements named `tag` anywhere in the document, root included.
    pub fn elements_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        std::iter::once(&self.root)
            .filter(move |root| root.name == tag)
            .chain(self.root.elements_by_tag(tag))
    }

    pub fn contains_tag(&self, tag: &str) -> bool {
        self.elements_by_tag(tag).next().is_some()
    }
}

/// `\r\n` and lone `\r` become `\n` before parsing (XML 1.0 section 2.11).
fn normalize_line_endings(input: &str) -> Cow<'_, str> {
    if input.contains('\r') {
        Cow::Owned(input.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(input)
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element, ParseError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| ParseError::Attribute {
            element: name.clone(),
            message: e.to_string(),
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| ParseError::Attribute {
                element: name.clone(),
                message: e.to_string(),
            })?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
    })
}

fn attach(
    open: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), ParseError> {
    if let Some(parent) = open.last_mut() {
        parent.children.push(Node::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(ParseError::MultipleRoots(element.name));
    }
    *root = Some(element);
    Ok(())
}

fn write_element(out: &mut String, element: &Element) {
    out.push('<');
    out.push_str(&element.name);
    for (key, value) in &element.attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape_attribute(value));
        out.push('"');
    }
    if element.children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for child in &element.children {
        match child {
            Node::Element(inner) => write_element(out, inner),
            Node::Text(text) => out.push_str(&escape_text(text)),
            Node::CData(data) => {
                out.push_str("<![CDATA[");
                out.push_str(data);
                out.push_str("]]>");
            }
            Node::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
        }
    }
    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" ?>
<NessusClientData_v2>
<Report name="weekly">
<ReportHost name="10.0.0.5"><HostProperties>
<tag name="host-ip">10.0.0.5</tag>
</HostProperties>
<ReportItem port="443" svc_name="www" pluginName="A &amp; B"><plugin_output>x &lt; y</plugin_output></ReportItem>
</ReportHost>
</Report>
</NessusClientData_v2>
"#;

    #[test]
    fn crlf_and_lone_cr_become_newlines() {
        let doc = Document::parse("<plugin_output>a\r\nb\rc</plugin_output>").unwrap();
        assert_eq!(doc.root().first_text(), Some("a\nb\nc"));

        let doc = Document::parse("<r>\r\n<x n=\"1\"/>\r\n</r>").unwrap();
        assert_eq!(doc.root().to_xml(), "<r>\n<x n=\"1\"/>\n</r>");
    }

    #[test]
    fn escaped_carriage_return_survives() {
        let doc = Document::parse("<p>a&#13;b</p>").unwrap();
        assert_eq!(doc.root().first_text(), Some("a\rb"));
    }

    #[test]
    fn parse_builds_tree() {
        let doc = Document::parse(SAMPLE).unwrap();
        assert_eq!(doc.root().name(), "NessusClientData_v2");

        let hosts: Vec<_> = doc.elements_by_tag("ReportHost").collect();
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts[0].attribute("name"), Some("10.0.0.5"));

        let item = hosts[0].elements_by_tag("ReportItem").next().unwrap();
        assert_eq!(item.attribute("pluginName"), Some("A & B"));
        assert_eq!(item.attribute_or_empty("protocol"), "");
    }

    #[test]
    fn document_search_includes_root() {
        let doc = Document::parse(SAMPLE).unwrap();
        assert!(doc.contains_tag("NessusClientData_v2"));
        assert!(!doc.contains_tag("nmaprun"));
        assert_eq!(doc.root().elements_by_tag("NessusClientData_v2").count(), 0);
    }

    #[test]
    fn elements_by_tag_is_preorder() {
        let doc = Document::parse("<a><b id=\"1\"><b id=\"2\"/></b><c><b id=\"3\"/></c></a>").unwrap();
        let ids: Vec<_> = doc
            .elements_by_tag("b")
            .map(|b| b.attribute_or_empty("id"))
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn text_is_unescaped_and_reescaped() {
        let doc = Document::parse(SAMPLE).unwrap();
        let output = doc.elements_by_tag("plugin_output").next().unwrap();
        assert_eq!(output.first_text(), Some("x < y"));
        assert_eq!(output.to_xml(), "<plugin_output>x &lt; y</plugin_output>");
    }

    #[test]
    fn to_xml_keeps_attribute_order_and_whitespace() {
        let input = "<ReportHost name=\"h\"><HostProperties>\n<tag name=\"host-ip\">1.2.3.4</tag>\n</HostProperties></ReportHost>";
        let doc = Document::parse(input).unwrap();
        assert_eq!(doc.root().to_xml(), input);

        let item = Document::parse("<ReportItem port=\"0\" svc_name=\"general\" pluginName=\"A &amp; &quot;B&quot;\"></ReportItem>").unwrap();
        assert_eq!(
            item.root().to_xml(),
            "<ReportItem port=\"0\" svc_name=\"general\" pluginName=\"A &amp; &quot;B&quot;\"/>"
        );
    }

    #[test]
    fn cdata_and_comments_round_trip() {
        let input = "<plugin_output><![CDATA[<b>raw</b>]]><!-- note --></plugin_output>";
        let doc = Document::parse(input).unwrap();
        assert_eq!(doc.root().first_text(), Some("<b>raw</b>"));
        assert_eq!(doc.root().to_xml(), input);
    }

    #[test]
    fn first_text_requires_leading_text_node() {
        let doc = Document::parse("<plugin_output><b>bold</b>tail</plugin_output>").unwrap();
        assert_eq!(doc.root().first_text(), None);

        let empty = Document::parse("<plugin_output/>").unwrap();
        assert_eq!(empty.root().first_text(), None);
    }

    #[test]
    fn builder_matches_parsed_form() {
        let built = Element::new("tag")
            .with_attribute("name", "host-fqdn")
            .with_text("x.example");
        let parsed = Document::parse("<tag name=\"host-fqdn\">x.example</tag>").unwrap();
        assert_eq!(&built, parsed.root());
    }

    #[test]
    fn leading_bom_is_ignored() {
        let doc = Document::parse("\u{feff}<NessusClientData_v2/>").unwrap();
        assert_eq!(doc.root().name(), "NessusClientData_v2");
    }

    #[test]
    fn malformed_documents_are_rejected() {
        assert!(matches!(Document::parse(""), Err(ParseError::NoRootElement)));
        assert!(matches!(
            Document::parse("<a><b></a>"),
            Err(ParseError::Syntax { .. })
        ));
        assert!(matches!(
            Document::parse("<a>"),
            Err(ParseError::Unclosed(_) | ParseError::Syntax { .. })
        ));
        assert!(matches!(
            Document::parse("<a/><b/>"),
            Err(ParseError::MultipleRoots(name)) if name == "b"
        ));
        assert!(matches!(
            Document::parse("stray<a/>"),
            Err(ParseError::TextOutsideRoot)
        ));
        assert!(Document::parse("this is not xml at all").is_err());
    }

    #[test]
    fn from_path_reports_missing_file() {
        let path = std::env::temp_dir().join("nessgrep_xml_missing_file.nessus");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(Document::from_path(&path), Err(ParseError::Io(_))));
    }
}
