//! Reader combinators
//!
//! A [`Reader`] reads one XML construct: an attribute, the text of the
//! enclosing element, a child element, a repeated child element or an
//! opaque embedded sub-document. Element readers are built from an
//! ordered list of child readers and a generator that turns the parsed
//! slot values into the record.
//!
//! Readers are immutable once constructed. The name to slot mapping of
//! every element is computed at construction time, and a parse only ever
//! owns its cursor and the slot values of the element being read, so one
//! reader can serve any number of concurrent parses.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use gpxkit_core::{Extensions, GpxError, GpxResult, Mode, TextValue};
use tracing::debug;

use crate::cursor::{StartTag, XmlCursor, XmlEvent};

/// Kind of a combinator, deciding how the enclosing element consumes it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Attribute,
    Text,
    Element,
    RepeatedElement,
    EmbeddedDocument,
}

impl Kind {
    /// Whether the combinator is driven by a child start tag
    pub fn is_element(self) -> bool {
        matches!(
            self,
            Kind::Element | Kind::RepeatedElement | Kind::EmbeddedDocument
        )
    }
}

type Parsed = Box<dyn Any>;
/// Raw character data to a value, `None` when the value is absent
type Convert = Arc<dyn Fn(&str) -> GpxResult<Option<Parsed>> + Send + Sync>;
type Build = Arc<dyn Fn(&mut Values<'_>) -> GpxResult<Option<Parsed>> + Send + Sync>;
type Finish = Arc<dyn Fn(Vec<Parsed>) -> GpxResult<Parsed> + Send + Sync>;
type Capture = Arc<dyn Fn(Extensions) -> GpxResult<Parsed> + Send + Sync>;

struct Node {
    name: String,
    kind: Kind,
    op: Op,
}

enum Op {
    Attribute(Convert),
    Text(Convert),
    Element(ElementOp),
    Repeated { inner: Arc<Node>, finish: Finish },
    Document(Capture),
}

struct ElementOp {
    children: Vec<Arc<Node>>,
    /// Slot name to child index
    slots: HashMap<String, usize>,
    /// Local element name to child index
    elements: HashMap<String, usize>,
    attributes: Vec<usize>,
    text: Option<usize>,
    build: Build,
}

fn type_mismatch(what: &str) -> GpxError {
    GpxError::Combinator(format!("{} produced a value of another type", what))
}

fn downcast<T: 'static>(value: Parsed, what: &str) -> GpxResult<T> {
    value
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| type_mismatch(what))
}

/// Reader of one XML construct producing a `T`
pub struct Reader<T> {
    node: Arc<Node>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Reader<T> {
    fn clone(&self) -> Self {
        Reader {
            node: Arc::clone(&self.node),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Reader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reader")
            .field("name", &self.node.name)
            .field("kind", &self.node.kind)
            .finish()
    }
}

impl<T: 'static> Reader<T> {
    fn from_node(node: Node) -> Self {
        Reader {
            node: Arc::new(node),
            _marker: PhantomData,
        }
    }

    /// Element or attribute name, empty for text readers
    pub fn name(&self) -> &str {
        &self.node.name
    }

    pub fn kind(&self) -> Kind {
        self.node.kind
    }

    /// Convert every value this reader produces
    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + Send + Sync + 'static) -> Reader<U> {
        let f = Arc::new(f);
        let name = self.node.name.clone();
        let kind = self.node.kind;
        let op = match &self.node.op {
            Op::Attribute(convert) => Op::Attribute(map_convert(convert.clone(), f, name.clone())),
            Op::Text(convert) => Op::Text(map_convert(convert.clone(), f, name.clone())),
            Op::Element(element) => {
                let build = element.build.clone();
                let what = name.clone();
                Op::Element(ElementOp {
                    children: element.children.clone(),
                    slots: element.slots.clone(),
                    elements: element.elements.clone(),
                    attributes: element.attributes.clone(),
                    text: element.text,
                    build: Arc::new(move |values: &mut Values<'_>| match build(values)? {
                        Some(value) => Ok(Some(Box::new(f(downcast::<T>(value, &what)?)) as Parsed)),
                        None => Ok(None),
                    }),
                })
            }
            Op::Repeated { inner, finish } => {
                let finish = finish.clone();
                let what = name.clone();
                Op::Repeated {
                    inner: Arc::clone(inner),
                    finish: Arc::new(move |items| {
                        let value = downcast::<T>(finish(items)?, &what)?;
                        Ok(Box::new(f(value)) as Parsed)
                    }),
                }
            }
            Op::Document(capture) => {
                let capture = capture.clone();
                let what = name.clone();
                Op::Document(Arc::new(move |extensions| {
                    let value = downcast::<T>(capture(extensions)?, &what)?;
                    Ok(Box::new(f(value)) as Parsed)
                }))
            }
        };
        Reader::from_node(Node { name, kind, op })
    }

    /// Read the root element of a document
    ///
    /// Text and comments before the root are skipped. A root that reads
    /// as absent (lenient mode) yields [`GpxError::NoRootElement`].
    pub fn read(&self, cursor: &mut XmlCursor<'_>, mode: Mode) -> GpxResult<T> {
        loop {
            match cursor.next_event()? {
                XmlEvent::Start(tag) => {
                    if tag.local_name() != self.node.name {
                        return Err(GpxError::UnexpectedElement(tag.name().to_string()));
                    }
                    return match read_node(&self.node, &tag, cursor, mode)? {
                        Some(value) => downcast(value, &self.node.name),
                        None => Err(GpxError::NoRootElement),
                    };
                }
                XmlEvent::Text(_) | XmlEvent::Comment => continue,
                XmlEvent::End(name) => {
                    return Err(GpxError::Xml(format!("Unexpected end tag </{}>", name)))
                }
                XmlEvent::Eof => return Err(GpxError::NoRootElement),
            }
        }
    }
}

fn map_convert<T: 'static, U: 'static>(
    convert: Convert,
    f: Arc<impl Fn(T) -> U + Send + Sync + 'static>,
    what: String,
) -> Convert {
    Arc::new(move |text: &str| match convert(text)? {
        Some(value) => {
            let value = downcast::<T>(value, &what)?;
            Ok(Some(Box::new(f(value)) as Parsed))
        }
        None => Ok(None),
    })
}

/// Type-erased reader, as stored in element child lists and version tables
#[derive(Clone)]
pub struct ErasedReader(Arc<Node>);

impl ErasedReader {
    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn kind(&self) -> Kind {
        self.0.kind
    }
}

impl fmt::Debug for ErasedReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedReader")
            .field("name", &self.0.name)
            .field("kind", &self.0.kind)
            .finish()
    }
}

impl<T> From<Reader<T>> for ErasedReader {
    fn from(reader: Reader<T>) -> Self {
        ErasedReader(reader.node)
    }
}

fn text_convert<T: TextValue + 'static>() -> Convert {
    Arc::new(|raw: &str| Ok(T::from_text(raw)?.map(|value| Box::new(value) as Parsed)))
}

/// Attribute `name` parsed with the value's text form
pub fn attr<T: TextValue + 'static>(name: &str) -> Reader<T> {
    Reader::from_node(Node {
        name: name.to_string(),
        kind: Kind::Attribute,
        op: Op::Attribute(text_convert::<T>()),
    })
}

/// Attribute `name` parsed with `parse`
///
/// `parse` sees the trimmed value; a blank value is absent.
pub fn attr_with<T: 'static>(
    name: &str,
    parse: impl Fn(&str) -> GpxResult<T> + Send + Sync + 'static,
) -> Reader<T> {
    Reader::from_node(Node {
        name: name.to_string(),
        kind: Kind::Attribute,
        op: Op::Attribute(Arc::new(move |raw: &str| {
            let text = raw.trim();
            if text.is_empty() {
                return Ok(None);
            }
            parse(text).map(|value| Some(Box::new(value) as Parsed))
        })),
    })
}

/// Character data of the enclosing element
pub fn text<T: TextValue + 'static>() -> Reader<T> {
    Reader::from_node(Node {
        name: String::new(),
        kind: Kind::Text,
        op: Op::Text(text_convert::<T>()),
    })
}

/// Child element `name` holding a single text value
///
/// String content is kept verbatim, so an empty element reads as an
/// empty string. For every other value blank content reads as absent.
pub fn elem_text<T: TextValue + 'static>(name: &str) -> Reader<T> {
    let content: Reader<T> = text();
    let mut slots = HashMap::new();
    slots.insert(String::new(), 0);
    Reader::from_node(Node {
        name: name.to_string(),
        kind: Kind::Element,
        op: Op::Element(ElementOp {
            children: vec![content.node],
            slots,
            elements: HashMap::new(),
            attributes: Vec::new(),
            text: Some(0),
            build: Arc::new(|values: &mut Values<'_>| Ok(values.take(0))),
        }),
    })
}

/// Child element `name` built from `children` by `build`
///
/// Fails when two text readers are given, when two children share a
/// name, or when a repeated child does not read elements.
pub fn elem<T: 'static>(
    name: &str,
    children: Vec<ErasedReader>,
    build: impl Fn(&mut Values<'_>) -> GpxResult<T> + Send + Sync + 'static,
) -> GpxResult<Reader<T>> {
    let mut slots = HashMap::new();
    let mut elements = HashMap::new();
    let mut attributes = Vec::new();
    let mut text = None;
    let mut nodes = Vec::with_capacity(children.len());

    for (idx, child) in children.into_iter().enumerate() {
        let node = child.0;
        if slots.insert(node.name.clone(), idx).is_some() {
            return Err(GpxError::Combinator(format!(
                "<{}> declares '{}' twice",
                name, node.name
            )));
        }
        match &node.op {
            Op::Attribute(_) => attributes.push(idx),
            Op::Text(_) => {
                if text.replace(idx).is_some() {
                    return Err(GpxError::Combinator(format!(
                        "<{}> declares more than one text reader",
                        name
                    )));
                }
            }
            Op::Repeated { inner, .. } if !inner.kind.is_element() => {
                return Err(GpxError::Combinator(format!(
                    "repeated '{}' of <{}> does not read elements",
                    node.name, name
                )));
            }
            Op::Element(_) | Op::Repeated { .. } | Op::Document(_) => {
                elements.insert(node.name.clone(), idx);
            }
        }
        nodes.push(node);
    }

    Ok(Reader::from_node(Node {
        name: name.to_string(),
        kind: Kind::Element,
        op: Op::Element(ElementOp {
            children: nodes,
            slots,
            elements,
            attributes,
            text,
            build: Arc::new(move |values: &mut Values<'_>| {
                build(values).map(|value| Some(Box::new(value) as Parsed))
            }),
        }),
    }))
}

/// Any number of sibling occurrences of `inner`, in document order
///
/// Each occurrence contributes one item, or none when it reads as absent.
pub fn elems<T: 'static>(inner: Reader<T>) -> Reader<Vec<T>> {
    let what = inner.node.name.clone();
    Reader::from_node(Node {
        name: inner.node.name.clone(),
        kind: Kind::RepeatedElement,
        op: Op::Repeated {
            inner: inner.node,
            finish: Arc::new(move |items| {
                let items = items
                    .into_iter()
                    .map(|item| downcast::<T>(item, &what))
                    .collect::<GpxResult<Vec<T>>>()?;
                Ok(Box::new(items) as Parsed)
            }),
        },
    })
}

/// Element `name` captured verbatim as an extension tree
pub fn doc(name: &str) -> Reader<Extensions> {
    Reader::from_node(Node {
        name: name.to_string(),
        kind: Kind::EmbeddedDocument,
        op: Op::Document(Arc::new(|extensions| Ok(Box::new(extensions) as Parsed))),
    })
}

/// Slot values of one element, handed to its generator
pub struct Values<'a> {
    element: &'a str,
    slots: &'a HashMap<String, usize>,
    values: Vec<Option<Parsed>>,
}

impl<'a> Values<'a> {
    /// Name of the element being built
    pub fn element(&self) -> &str {
        self.element
    }

    fn take(&mut self, idx: usize) -> Option<Parsed> {
        self.values.get_mut(idx).and_then(Option::take)
    }

    /// Value of the child `name`, if present
    ///
    /// Names not declared for the element being read are absent, so one
    /// generator can serve every version of a record.
    pub fn opt<T: 'static>(&mut self, name: &str) -> GpxResult<Option<T>> {
        let idx = match self.slots.get(name) {
            Some(&idx) => idx,
            None => return Ok(None),
        };
        match self.take(idx) {
            Some(value) => downcast(value, name).map(Some),
            None => Ok(None),
        }
    }

    /// Value of the mandatory child `name`
    pub fn req<T: 'static>(&mut self, name: &str) -> GpxResult<T> {
        self.opt(name)?.ok_or_else(|| GpxError::MissingField {
            element: self.element.to_string(),
            field: name.to_string(),
        })
    }

    /// Items of the repeated child `name`
    pub fn list<T: 'static>(&mut self, name: &str) -> GpxResult<Vec<T>> {
        Ok(self.opt::<Vec<T>>(name)?.unwrap_or_default())
    }
}

/// Apply the mode to a value error raised while reading `name`
fn recover<T>(name: &str, result: GpxResult<T>, mode: Mode) -> GpxResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_value_error() => {
            if mode.is_lenient() {
                debug!(element = name, error = %e, "dropping invalid value");
                Ok(None)
            } else {
                Err(GpxError::invalid_value(name, e))
            }
        }
        Err(e) => Err(e),
    }
}

fn convert_text(name: &str, raw: &str, convert: &Convert, mode: Mode) -> GpxResult<Option<Parsed>> {
    Ok(recover(name, convert(raw), mode)?.flatten())
}

fn read_node(
    node: &Node,
    start: &StartTag,
    cursor: &mut XmlCursor<'_>,
    mode: Mode,
) -> GpxResult<Option<Parsed>> {
    match &node.op {
        Op::Element(element) => read_element(node, element, start, cursor, mode),
        Op::Repeated { inner, finish } => {
            let items = read_node(inner, start, cursor, mode)?.into_iter().collect();
            finish(items).map(Some)
        }
        Op::Document(capture) => {
            let element = cursor.capture_element(start)?;
            recover(&node.name, capture(Extensions::from_element(element)), mode)
        }
        Op::Attribute(_) | Op::Text(_) => Err(GpxError::Combinator(format!(
            "'{}' cannot read an element",
            node.name
        ))),
    }
}

fn read_element(
    node: &Node,
    element: &ElementOp,
    start: &StartTag,
    cursor: &mut XmlCursor<'_>,
    mode: Mode,
) -> GpxResult<Option<Parsed>> {
    let count = element.children.len();
    let mut values: Vec<Option<Parsed>> = (0..count).map(|_| None).collect();
    let mut repeated: Vec<Vec<Parsed>> = (0..count).map(|_| Vec::new()).collect();

    for &idx in &element.attributes {
        let child = &element.children[idx];
        if let (Op::Attribute(convert), Some(raw)) = (&child.op, start.attribute(&child.name)) {
            values[idx] = convert_text(&child.name, raw, convert, mode)
                .map_err(|e| match e {
                    GpxError::InvalidValue { .. } => GpxError::invalid_value(&node.name, e),
                    e => e,
                })?;
        }
    }

    let namespace = cursor.element_namespace(start).map(str::to_string);
    let mut content = String::new();
    loop {
        match cursor.next_event()? {
            XmlEvent::Start(tag) => match element
                .elements
                .get(tag.local_name())
                .filter(|_| cursor.element_namespace(&tag) == namespace.as_deref())
            {
                Some(&idx) => {
                    let child = &element.children[idx];
                    match &child.op {
                        Op::Repeated { inner, .. } => {
                            if let Some(value) = read_node(inner, &tag, cursor, mode)? {
                                repeated[idx].push(value);
                            }
                        }
                        _ => {
                            if let Some(value) = read_node(child, &tag, cursor, mode)? {
                                values[idx] = Some(value);
                            }
                        }
                    }
                }
                None if mode.is_lenient() => {
                    debug!(element = %node.name, unknown = %tag.name(), "skipping unknown element");
                    cursor.skip_element(&tag)?;
                }
                None => return Err(GpxError::UnexpectedElement(tag.name().to_string())),
            },
            XmlEvent::Text(text) => {
                if element.text.is_some() {
                    content.push_str(&text);
                }
            }
            XmlEvent::Comment => {}
            XmlEvent::End(_) => break,
            XmlEvent::Eof => return Err(GpxError::PrematureEnd(node.name.clone())),
        }
    }

    if let Some(idx) = element.text {
        if let Op::Text(convert) = &element.children[idx].op {
            values[idx] = convert_text(&node.name, &content, convert, mode)?;
        }
    }

    for (idx, child) in element.children.iter().enumerate() {
        if let Op::Repeated { finish, .. } = &child.op {
            values[idx] = Some(finish(std::mem::take(&mut repeated[idx]))?);
        }
    }

    let mut slots = Values {
        element: &node.name,
        slots: &element.slots,
        values,
    };
    Ok(recover(&node.name, (element.build)(&mut slots), mode)?.flatten())
}
