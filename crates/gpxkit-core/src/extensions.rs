//! Opaque foreign XML carried by `extensions` elements
//!
//! The tree is owned and compared structurally. Whitespace-only text and
//! comments never enter it, so indentation does not affect equality.

use std::collections::BTreeSet;

/// Element or text node of an extension tree
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An element of an extension tree, names kept as qualified names
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        XmlElement {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_attribute(name, value);
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text);
        self
    }

    /// Set an attribute, replacing an existing one of the same name
    pub fn push_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn push_child(&mut self, child: XmlNode) {
        match child {
            XmlNode::Text(text) => self.push_text(text),
            element => self.children.push(element),
        }
    }

    /// Append character data, merging with a preceding text node
    pub fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        if let Some(XmlNode::Text(last)) = self.children.last_mut() {
            last.push_str(&text);
        } else {
            self.children.push(XmlNode::Text(text));
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn local_name(&self) -> &str {
        split_prefix(&self.name).1
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

    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Drop whitespace-only text nodes, recursively
    pub fn normalized(mut self) -> Self {
        self.children = self
            .children
            .into_iter()
            .filter_map(|child| match child {
                XmlNode::Text(text) if text.trim().is_empty() => None,
                XmlNode::Text(text) => Some(XmlNode::Text(text)),
                XmlNode::Element(element) => Some(XmlNode::Element(element.normalized())),
            })
            .collect();
        self
    }

    /// Namespace prefixes used in this sub-tree but not declared inside it
    pub fn undeclared_prefixes(&self) -> BTreeSet<String> {
        let mut used = BTreeSet::new();
        let mut declared = BTreeSet::new();
        self.collect_prefixes(&mut used, &mut declared);
        used.difference(&declared).cloned().collect()
    }

    fn collect_prefixes(&self, used: &mut BTreeSet<String>, declared: &mut BTreeSet<String>) {
        if let (Some(prefix), _) = split_prefix(&self.name) {
            used.insert(prefix.to_string());
        }
        for (name, _) in &self.attributes {
            match split_prefix(name) {
                (Some("xmlns"), declared_prefix) => {
                    declared.insert(declared_prefix.to_string());
                }
                (Some("xml"), _) | (None, _) => {}
                (Some(prefix), _) => {
                    used.insert(prefix.to_string());
                }
            }
        }
        for child in &self.children {
            if let XmlNode::Element(element) = child {
                element.collect_prefixes(used, declared);
            }
        }
    }
}

fn split_prefix(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}

/// Content of an `extensions` element
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Extensions(XmlElement);

impl Extensions {
    /// Element name of the escape hatch
    pub const ELEMENT: &'static str = "extensions";

    pub fn new() -> Self {
        Extensions(XmlElement::new(Self::ELEMENT))
    }

    /// Wrap a captured `extensions` element
    pub fn from_element(element: XmlElement) -> Self {
        Extensions(element.normalized())
    }

    pub fn with_child(self, child: XmlElement) -> Self {
        Extensions(self.0.with_child(child))
    }

    /// Declare a namespace prefix on the `extensions` element
    pub fn with_namespace(self, prefix: &str, uri: impl Into<String>) -> Self {
        Extensions(self.0.with_attribute(format!("xmlns:{}", prefix), uri))
    }

    pub fn element(&self) -> &XmlElement {
        &self.0
    }

    pub fn into_element(self) -> XmlElement {
        self.0
    }

    pub fn children(&self) -> &[XmlNode] {
        self.0.children()
    }

    pub fn is_empty(&self) -> bool {
        self.0.children().is_empty()
    }
}

impl Default for Extensions {
    fn default() -> Self {
        Extensions::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_drops_whitespace_text() {
        let element = XmlElement::new("extensions")
            .with_text("\n    ")
            .with_child(XmlElement::new("ext:speed").with_text("12.5"))
            .with_text("\n");
        let normalized = element.normalized();
        assert_eq!(normalized.children().len(), 1);
        match &normalized.children()[0] {
            XmlNode::Element(child) => {
                assert_eq!(child.name(), "ext:speed");
                assert_eq!(child.local_name(), "speed");
                assert_eq!(child.children(), &[XmlNode::Text("12.5".into())]);
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_adjacent_text_merges() {
        let element = XmlElement::new("a").with_text("foo").with_text("bar");
        assert_eq!(element.children(), &[XmlNode::Text("foobar".into())]);
    }

    #[test]
    fn test_undeclared_prefixes() {
        let element = XmlElement::new("extensions")
            .with_child(
                XmlElement::new("gpxtpx:TrackPointExtension")
                    .with_child(XmlElement::new("gpxtpx:hr").with_text("120")),
            )
            .with_child(
                XmlElement::new("own:tag")
                    .with_attribute("xmlns:own", "urn:own")
                    .with_attribute("xml:lang", "en"),
            );
        let prefixes: Vec<_> = element.undeclared_prefixes().into_iter().collect();
        assert_eq!(prefixes, vec!["gpxtpx".to_string()]);
    }

    #[test]
    fn test_structural_equality() {
        let a = Extensions::new().with_child(XmlElement::new("x:a").with_attribute("k", "v"));
        let b = Extensions::new().with_child(XmlElement::new("x:a").with_attribute("k", "v"));
        let c = Extensions::new().with_child(XmlElement::new("x:a").with_attribute("k", "w"));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(Extensions::new().is_empty());
    }
}
