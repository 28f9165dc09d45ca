//! XML event emission
//!
//! Writers talk to an [`XmlEmitter`] rather than to quick-xml directly,
//! so decorators such as [`Indenting`](crate::Indenting) can be stacked
//! in front of the stream.

use std::io::{self, Write};

use gpxkit_core::{GpxError, GpxResult};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// Sink for XML events
pub trait XmlEmitter {
    /// XML declaration
    fn start_document(&mut self) -> GpxResult<()>;

    /// Flush everything written so far. Never closes the underlying stream.
    fn end_document(&mut self) -> GpxResult<()>;

    fn start_element(&mut self, name: &str) -> GpxResult<()>;

    /// Attribute of the most recently started element
    fn attribute(&mut self, name: &str, value: &str) -> GpxResult<()>;

    fn default_namespace(&mut self, uri: &str) -> GpxResult<()> {
        self.attribute("xmlns", uri)
    }

    fn characters(&mut self, text: &str) -> GpxResult<()>;

    fn end_element(&mut self) -> GpxResult<()>;
}

impl<E: XmlEmitter + ?Sized> XmlEmitter for &mut E {
    fn start_document(&mut self) -> GpxResult<()> {
        (**self).start_document()
    }

    fn end_document(&mut self) -> GpxResult<()> {
        (**self).end_document()
    }

    fn start_element(&mut self, name: &str) -> GpxResult<()> {
        (**self).start_element(name)
    }

    fn attribute(&mut self, name: &str, value: &str) -> GpxResult<()> {
        (**self).attribute(name, value)
    }

    fn default_namespace(&mut self, uri: &str) -> GpxResult<()> {
        (**self).default_namespace(uri)
    }

    fn characters(&mut self, text: &str) -> GpxResult<()> {
        (**self).characters(text)
    }

    fn end_element(&mut self) -> GpxResult<()> {
        (**self).end_element()
    }
}

fn write_error(e: quick_xml::Error) -> GpxError {
    match e {
        quick_xml::Error::Io(io) => GpxError::Io(io::Error::new(io.kind(), io.to_string())),
        other => GpxError::Xml(other.to_string()),
    }
}

/// Emitter writing escaped XML to a byte stream
///
/// Start tags are held back until their first child or text arrives, so
/// elements without content are written as `<name/>`.
pub struct StreamEmitter<W: Write> {
    writer: Writer<W>,
    pending: Option<BytesStart<'static>>,
    open: Vec<String>,
}

impl<W: Write> StreamEmitter<W> {
    pub fn new(inner: W) -> Self {
        StreamEmitter {
            writer: Writer::new(inner),
            pending: None,
            open: Vec::new(),
        }
    }

    /// Number of open elements
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write(&mut self, event: Event<'_>) -> GpxResult<()> {
        self.writer.write_event(event).map_err(write_error)
    }

    fn flush_pending(&mut self) -> GpxResult<()> {
        match self.pending.take() {
            Some(start) => self.write(Event::Start(start)),
            None => Ok(()),
        }
    }
}

impl<W: Write> XmlEmitter for StreamEmitter<W> {
    fn start_document(&mut self) -> GpxResult<()> {
        self.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    }

    fn end_document(&mut self) -> GpxResult<()> {
        if let Some(name) = self.open.last() {
            return Err(GpxError::Combinator(format!("element <{}> left open", name)));
        }
        self.writer.get_mut().flush()?;
        Ok(())
    }

    fn start_element(&mut self, name: &str) -> GpxResult<()> {
        self.flush_pending()?;
        self.pending = Some(BytesStart::new(name.to_string()));
        self.open.push(name.to_string());
        Ok(())
    }

    fn attribute(&mut self, name: &str, value: &str) -> GpxResult<()> {
        match self.pending.as_mut() {
            Some(start) => {
                start.push_attribute((name, value));
                Ok(())
            }
            None => Err(GpxError::Combinator(format!(
                "attribute '{}' written outside of a start tag",
                name
            ))),
        }
    }

    fn characters(&mut self, text: &str) -> GpxResult<()> {
        self.flush_pending()?;
        self.write(Event::Text(BytesText::new(text)))
    }

    fn end_element(&mut self) -> GpxResult<()> {
        let name = self
            .open
            .pop()
            .ok_or_else(|| GpxError::Combinator("end of element without a start".into()))?;
        match self.pending.take() {
            Some(start) => self.write(Event::Empty(start)),
            None => self.write(Event::End(BytesEnd::new(name))),
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{XmlCursor, XmlEvent};

    fn emit(f: impl FnOnce(&mut StreamEmitter<Vec<u8>>) -> GpxResult<()>) -> String {
        let mut emitter = StreamEmitter::new(Vec::new());
        f(&mut emitter).unwrap();
        String::from_utf8(emitter.into_inner()).unwrap()
    }

    #[test]
    fn test_elements_and_attributes() {
        let xml = emit(|e| {
            e.start_element("gpx")?;
            e.default_namespace("urn:x")?;
            e.attribute("creator", "a & b")?;
            e.start_element("name")?;
            e.characters("<x>")?;
            e.end_element()?;
            e.end_element()
        });
        assert_eq!(
            xml,
            r#"<gpx xmlns="urn:x" creator="a &amp; b"><name>&lt;x&gt;</name></gpx>"#
        );
    }

    #[test]
    fn test_empty_element() {
        let xml = emit(|e| {
            e.start_element("trkseg")?;
            e.end_element()
        });
        assert_eq!(xml, "<trkseg/>");
    }

    #[test]
    fn test_declaration() {
        let xml = emit(|e| {
            e.start_document()?;
            e.start_element("gpx")?;
            e.end_element()?;
            e.end_document()
        });
        assert_eq!(xml, r#"<?xml version="1.0" encoding="UTF-8"?><gpx/>"#);
    }

    #[test]
    fn test_attribute_after_content_is_rejected() {
        let mut emitter = StreamEmitter::new(Vec::new());
        emitter.start_element("a").unwrap();
        emitter.characters("x").unwrap();
        assert!(matches!(
            emitter.attribute("b", "c"),
            Err(GpxError::Combinator(_))
        ));
    }

    #[test]
    fn test_unbalanced_end() {
        let mut emitter = StreamEmitter::new(Vec::new());
        assert!(emitter.end_element().is_err());
        emitter.start_element("a").unwrap();
        assert!(emitter.end_document().is_err());
    }

    proptest! {
        #[test]
        fn prop_escaped_content_reads_back(value in "[ -~äöüß€]{1,40}") {
            let xml = emit(|e| {
                e.start_element("name")?;
                e.attribute("value", &value)?;
                e.characters(&value)?;
                e.end_element()
            });
            let mut cursor = XmlCursor::from_xml(&xml);
            match cursor.next_event().unwrap() {
                XmlEvent::Start(tag) => prop_assert_eq!(tag.attribute("value"), Some(value.as_str())),
                other => prop_assert!(false, "unexpected {:?}", other),
            }
            match cursor.next_event().unwrap() {
                XmlEvent::Text(text) => prop_assert_eq!(text, value),
                other => prop_assert!(false, "unexpected {:?}", other),
            }
        }
    }
}
