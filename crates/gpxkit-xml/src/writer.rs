//! Writer combinators
//!
//! Mirror image of the readers. A [`Writer`] writes one construct of a
//! borrowed value and skips absent values instead of failing: a mapped
//! field that is `None` writes nothing, not an empty tag.

use std::fmt;
use std::sync::Arc;

use gpxkit_core::{Extensions, GpxResult, NumberFormat, TextValue, XmlElement, XmlNode};

use crate::{Kind, XmlEmitter};

type WriteFn<T> = Arc<dyn Fn(&T, &mut dyn XmlEmitter, &NumberFormat) -> GpxResult<()> + Send + Sync>;

/// Writer of one XML construct of a `T`
pub struct Writer<T: ?Sized> {
    name: String,
    kind: Kind,
    write: WriteFn<T>,
}

impl<T: ?Sized> Clone for Writer<T> {
    fn clone(&self) -> Self {
        Writer {
            name: self.name.clone(),
            kind: self.kind,
            write: Arc::clone(&self.write),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Writer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Writer")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

impl<T: ?Sized + 'static> Writer<T> {
    fn new(
        name: &str,
        kind: Kind,
        write: impl Fn(&T, &mut dyn XmlEmitter, &NumberFormat) -> GpxResult<()> + Send + Sync + 'static,
    ) -> Self {
        Writer {
            name: name.to_string(),
            kind,
            write: Arc::new(write),
        }
    }

    /// Element or attribute name, empty for text writers
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn write(&self, value: &T, emitter: &mut dyn XmlEmitter, format: &NumberFormat) -> GpxResult<()> {
        (self.write)(value, emitter, format)
    }

    /// Write the part of an `S` selected by `f`, nothing when it is absent
    pub fn map<S: ?Sized + 'static>(
        self,
        f: impl Fn(&S) -> Option<&T> + Send + Sync + 'static,
    ) -> Writer<S> {
        let write = self.write;
        Writer {
            name: self.name,
            kind: self.kind,
            write: Arc::new(move |source: &S, emitter: &mut dyn XmlEmitter, format: &NumberFormat| {
                match f(source) {
                    Some(value) => write(value, emitter, format),
                    None => Ok(()),
                }
            }),
        }
    }
}

impl<T: 'static> Writer<T> {
    /// Like [`Writer::map`] for values computed on the fly
    pub fn map_owned<S: ?Sized + 'static>(
        self,
        f: impl Fn(&S) -> Option<T> + Send + Sync + 'static,
    ) -> Writer<S> {
        let write = self.write;
        Writer {
            name: self.name,
            kind: self.kind,
            write: Arc::new(move |source: &S, emitter: &mut dyn XmlEmitter, format: &NumberFormat| {
                match f(source) {
                    Some(value) => write(&value, emitter, format),
                    None => Ok(()),
                }
            }),
        }
    }
}

/// Attribute `name` with the value's text form
pub fn attr<T: TextValue + 'static>(name: &str) -> Writer<T> {
    let attribute = name.to_string();
    Writer::new(name, Kind::Attribute, move |value: &T, emitter, format| {
        emitter.attribute(&attribute, &value.to_text(format))
    })
}

/// Attribute `name` holding a string
pub fn attr_str(name: &str) -> Writer<str> {
    let attribute = name.to_string();
    Writer::new(name, Kind::Attribute, move |value: &str, emitter, _| {
        emitter.attribute(&attribute, value)
    })
}

/// Character data of the enclosing element
pub fn text<T: TextValue + 'static>() -> Writer<T> {
    Writer::new("", Kind::Text, |value: &T, emitter, format| {
        emitter.characters(&value.to_text(format))
    })
}

/// Child element `name` holding a single text value
pub fn elem_text<T: TextValue + 'static>(name: &str) -> Writer<T> {
    let element = name.to_string();
    Writer::new(name, Kind::Element, move |value: &T, emitter, format| {
        emitter.start_element(&element)?;
        emitter.characters(&value.to_text(format))?;
        emitter.end_element()
    })
}

/// Child element `name` holding a string
pub fn elem_str(name: &str) -> Writer<str> {
    let element = name.to_string();
    Writer::new(name, Kind::Element, move |value: &str, emitter, _| {
        emitter.start_element(&element)?;
        emitter.characters(value)?;
        emitter.end_element()
    })
}

/// Child element `name` written by `children`
///
/// Attribute writers run first, the others in declared order. An element
/// without children is written as an empty tag.
pub fn elem<T: ?Sized + 'static>(name: &str, children: Vec<Writer<T>>) -> Writer<T> {
    let element = name.to_string();
    let (attributes, content): (Vec<_>, Vec<_>) = children
        .into_iter()
        .partition(|child| child.kind == Kind::Attribute);
    Writer::new(name, Kind::Element, move |value: &T, emitter, format| {
        emitter.start_element(&element)?;
        for child in attributes.iter().chain(content.iter()) {
            (child.write)(value, &mut *emitter, format)?;
        }
        emitter.end_element()
    })
}

/// Every item of a slice with `inner`, as sibling elements
pub fn elems<T: 'static>(inner: Writer<T>) -> Writer<[T]> {
    let name = inner.name.clone();
    Writer::new(&name, Kind::RepeatedElement, move |items: &[T], emitter, format| {
        for item in items {
            (inner.write)(item, &mut *emitter, format)?;
        }
        Ok(())
    })
}

/// Extension tree written verbatim as element `name`
pub fn doc(name: &str) -> Writer<Extensions> {
    let element = name.to_string();
    Writer::new(name, Kind::EmbeddedDocument, move |extensions: &Extensions, emitter, _| {
        let root = extensions.element();
        emitter.start_element(&element)?;
        for (attribute, value) in root.attributes() {
            emitter.attribute(attribute, value)?;
        }
        for child in root.children() {
            write_node(child, emitter)?;
        }
        emitter.end_element()
    })
}

fn write_tree(element: &XmlElement, emitter: &mut dyn XmlEmitter) -> GpxResult<()> {
    emitter.start_element(element.name())?;
    for (attribute, value) in element.attributes() {
        emitter.attribute(attribute, value)?;
    }
    for child in element.children() {
        write_node(child, emitter)?;
    }
    emitter.end_element()
}

fn write_node(node: &XmlNode, emitter: &mut dyn XmlEmitter) -> GpxResult<()> {
    match node {
        XmlNode::Element(element) => write_tree(element, emitter),
        XmlNode::Text(text) => emitter.characters(text),
    }
}

/// Default namespace declaration, written on every invocation
pub fn ns<T: ?Sized + 'static>(uri: &'static str) -> Writer<T> {
    Writer::new("xmlns", Kind::Attribute, move |_: &T, emitter, _| {
        emitter.default_namespace(uri)
    })
}
