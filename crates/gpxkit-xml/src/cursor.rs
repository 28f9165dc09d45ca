//! Pull cursor over XML events
//!
//! Wraps the quick-xml reader and hands out owned events. Empty elements
//! are expanded into a start/end pair, CDATA arrives as text, and the
//! declaration, processing instructions and doctype are skipped. The
//! cursor is owned by exactly one parse and passed down by `&mut`.

use std::fmt;
use std::io::BufRead;

use gpxkit_core::{GpxError, GpxResult, XmlElement, XmlNode};
use quick_xml::events::Event;
use quick_xml::Reader;

pub(crate) fn xml_error(e: impl fmt::Display) -> GpxError {
    GpxError::Xml(e.to_string())
}

/// Start tag with its decoded attributes
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartTag {
    name: String,
    attributes: Vec<(String, String)>,
}

impl StartTag {
    pub fn new(name: impl Into<String>) -> Self {
        StartTag {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Qualified name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn local_name(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    /// Namespace prefix, empty for unprefixed names
    pub fn prefix(&self) -> &str {
        match self.name.split_once(':') {
            Some((prefix, _)) => prefix,
            None => "",
        }
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Owned XML event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum XmlEvent {
    Start(StartTag),
    End(String),
    Text(String),
    Comment,
    Eof,
}

/// Single-owner pull cursor
pub struct XmlCursor<'a> {
    reader: Reader<Box<dyn BufRead + 'a>>,
    buf: Vec<u8>,
    /// Namespace declarations of every open element, the default
    /// namespace under the empty prefix
    scopes: Vec<Vec<(String, String)>>,
}

impl<'a> XmlCursor<'a> {
    pub fn new<R: BufRead + 'a>(input: R) -> Self {
        let mut reader = Reader::from_reader(Box::new(input) as Box<dyn BufRead + 'a>);
        reader.trim_text(false);
        reader.expand_empty_elements(true);
        XmlCursor {
            reader,
            buf: Vec::with_capacity(1024),
            scopes: Vec::new(),
        }
    }

    pub fn from_xml(xml: &'a str) -> Self {
        XmlCursor::new(xml.as_bytes())
    }

    /// Number of currently open elements
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Namespace URI bound to `prefix` in the current scope
    ///
    /// The empty prefix resolves the default namespace.
    pub fn namespace_uri(&self, prefix: &str) -> Option<&str> {
        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.iter())
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
            .filter(|uri| !uri.is_empty())
    }

    /// Namespace of the element opened by `tag`, as seen from its scope
    pub fn element_namespace(&self, tag: &StartTag) -> Option<&str> {
        self.namespace_uri(tag.prefix())
    }

    /// Advance to the next significant event
    pub fn next_event(&mut self) -> GpxResult<XmlEvent> {
        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf).map_err(xml_error)? {
                Event::Start(start) => {
                    let name = String::from_utf8(start.name().as_ref().to_vec())
                        .map_err(xml_error)?;
                    let mut tag = StartTag::new(name);
                    let mut scope = Vec::new();
                    for attr in start.attributes() {
                        let attr = attr.map_err(xml_error)?;
                        let key = String::from_utf8(attr.key.as_ref().to_vec()).map_err(xml_error)?;
                        let value = attr
                            .decode_and_unescape_value(&self.reader)
                            .map_err(xml_error)?
                            .into_owned();
                        if key == "xmlns" {
                            scope.push((String::new(), value.clone()));
                        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                            scope.push((prefix.to_string(), value.clone()));
                        }
                        tag.attributes.push((key, value));
                    }
                    self.scopes.push(scope);
                    return Ok(XmlEvent::Start(tag));
                }
                Event::End(end) => {
                    let name = String::from_utf8(end.name().as_ref().to_vec()).map_err(xml_error)?;
                    self.scopes.pop();
                    return Ok(XmlEvent::End(name));
                }
                Event::Text(text) => {
                    let text = text.unescape().map_err(xml_error)?.into_owned();
                    return Ok(XmlEvent::Text(text));
                }
                Event::CData(data) => {
                    let text = String::from_utf8(data.into_inner().into_owned()).map_err(xml_error)?;
                    return Ok(XmlEvent::Text(text));
                }
                Event::Comment(_) => return Ok(XmlEvent::Comment),
                Event::Eof => return Ok(XmlEvent::Eof),
                Event::Empty(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => continue,
            }
        }
    }

    /// Consume everything up to the end of the element started by `start`
    pub fn skip_element(&mut self, start: &StartTag) -> GpxResult<()> {
        let mut depth = 1usize;
        loop {
            match self.next_event()? {
                XmlEvent::Start(_) => depth += 1,
                XmlEvent::End(_) => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                XmlEvent::Eof => return Err(GpxError::PrematureEnd(start.name().to_string())),
                XmlEvent::Text(_) | XmlEvent::Comment => {}
            }
        }
    }

    /// Capture the element started by `start` as an owned tree
    ///
    /// Comments are dropped. Prefixes used inside the tree but declared on
    /// an ancestor are re-declared on the captured root.
    pub fn capture_element(&mut self, start: &StartTag) -> GpxResult<XmlElement> {
        let mut stack = vec![element_of(start)];
        loop {
            match self.next_event()? {
                XmlEvent::Start(tag) => stack.push(element_of(&tag)),
                XmlEvent::Text(text) => {
                    if let Some(top) = stack.last_mut() {
                        top.push_text(text);
                    }
                }
                XmlEvent::Comment => {}
                XmlEvent::End(_) => {
                    let done = match stack.pop() {
                        Some(element) => element,
                        None => return Err(GpxError::Xml("Unbalanced end tag".into())),
                    };
                    match stack.last_mut() {
                        Some(parent) => parent.push_child(XmlNode::Element(done)),
                        None => return Ok(self.declare_prefixes(done.normalized())),
                    }
                }
                XmlEvent::Eof => return Err(GpxError::PrematureEnd(start.name().to_string())),
            }
        }
    }

    fn declare_prefixes(&self, mut element: XmlElement) -> XmlElement {
        for prefix in element.undeclared_prefixes() {
            if let Some(uri) = self.namespace_uri(&prefix) {
                element.push_attribute(format!("xmlns:{}", prefix), uri.to_string());
            }
        }
        element
    }
}

fn element_of(tag: &StartTag) -> XmlElement {
    let mut element = XmlElement::new(tag.name());
    for (name, value) in tag.attributes() {
        element.push_attribute(name.clone(), value.clone());
    }
    element
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(xml: &str) -> Vec<XmlEvent> {
        let mut cursor = XmlCursor::from_xml(xml);
        let mut events = Vec::new();
        loop {
            let event = cursor.next_event().unwrap();
            let done = event == XmlEvent::Eof;
            events.push(event);
            if done {
                return events;
            }
        }
    }

    #[test]
    fn test_empty_elements_are_expanded() {
        let events = events(r#"<?xml version="1.0"?><a x="1"/>"#);
        assert_eq!(
            events,
            vec![
                XmlEvent::Start(StartTag::new("a").with_attribute("x", "1")),
                XmlEvent::End("a".into()),
                XmlEvent::Eof,
            ]
        );
    }

    #[test]
    fn test_text_cdata_and_comments() {
        let events = events("<a>x &amp; y<!-- c --><![CDATA[<z>]]></a>");
        assert_eq!(events[1], XmlEvent::Text("x & y".into()));
        assert_eq!(events[2], XmlEvent::Comment);
        assert_eq!(events[3], XmlEvent::Text("<z>".into()));
    }

    #[test]
    fn test_mismatched_end_tag_is_malformed() {
        let mut cursor = XmlCursor::from_xml("<a><b></a>");
        let mut result = Ok(XmlEvent::Comment);
        for _ in 0..4 {
            result = cursor.next_event();
            if result.is_err() {
                break;
            }
        }
        assert!(matches!(result, Err(GpxError::Xml(_))));
    }

    #[test]
    fn test_skip_element() {
        let mut cursor = XmlCursor::from_xml("<root><skip><a><b/></a>text</skip><keep/></root>");
        cursor.next_event().unwrap();
        let skip = match cursor.next_event().unwrap() {
            XmlEvent::Start(tag) => tag,
            other => panic!("unexpected {:?}", other),
        };
        cursor.skip_element(&skip).unwrap();
        assert_eq!(
            cursor.next_event().unwrap(),
            XmlEvent::Start(StartTag::new("keep"))
        );
    }

    #[test]
    fn test_skip_premature_end() {
        let mut cursor = XmlCursor::from_xml("<root><skip><a>");
        cursor.next_event().unwrap();
        let skip = match cursor.next_event().unwrap() {
            XmlEvent::Start(tag) => tag,
            other => panic!("unexpected {:?}", other),
        };
        assert!(cursor.skip_element(&skip).is_err());
    }

    #[test]
    fn test_element_namespace() {
        let xml = r#"<gpx xmlns="urn:gpx" xmlns:o="urn:other"><wpt/><o:name/><x:y/><n xmlns=""/></gpx>"#;
        let mut cursor = XmlCursor::from_xml(xml);
        let mut namespaces = Vec::new();
        loop {
            match cursor.next_event().unwrap() {
                XmlEvent::Start(tag) => namespaces.push(cursor.element_namespace(&tag).map(str::to_string)),
                XmlEvent::Eof => break,
                _ => {}
            }
        }
        assert_eq!(
            namespaces,
            vec![
                Some("urn:gpx".to_string()),
                Some("urn:gpx".to_string()),
                Some("urn:other".to_string()),
                None,
                None,
            ]
        );
    }

    #[test]
    fn test_capture_redeclares_prefixes() {
        let xml = r#"<gpx xmlns:h="urn:heart"><extensions>
            <h:rate unit="bpm">120</h:rate>
            <!-- ignored -->
        </extensions></gpx>"#;
        let mut cursor = XmlCursor::from_xml(xml);
        cursor.next_event().unwrap();
        let start = loop {
            if let XmlEvent::Start(tag) = cursor.next_event().unwrap() {
                break tag;
            }
        };
        let element = cursor.capture_element(&start).unwrap();

        let expected = XmlElement::new("extensions")
            .with_attribute("xmlns:h", "urn:heart")
            .with_child(
                XmlElement::new("h:rate")
                    .with_attribute("unit", "bpm")
                    .with_text("120"),
            );
        assert_eq!(element, expected);
        assert_eq!(cursor.depth(), 1);
    }
}
