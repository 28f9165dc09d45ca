//! Indentation decorator
//!
//! Inserts a line break and indentation before start tags and before the
//! end tags of elements that only hold child elements. Elements with
//! character data are left untouched so text values read back unchanged.

use gpxkit_core::GpxResult;

use crate::XmlEmitter;

/// Indentation policy of the writer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Indent {
    /// Compact single-line output
    None,
    /// One line per element, indented by the string once per level
    Lines(String),
}

impl Indent {
    pub fn space4() -> Self {
        Indent::Lines("    ".into())
    }

    pub fn space2() -> Self {
        Indent::Lines("  ".into())
    }

    pub fn tab() -> Self {
        Indent::Lines("\t".into())
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Indent::None)
    }
}

impl Default for Indent {
    fn default() -> Self {
        Indent::space4()
    }
}

#[derive(Default)]
struct Frame {
    has_children: bool,
    has_text: bool,
}

/// Emitter decorator adding line breaks and indentation
pub struct Indenting<E> {
    inner: E,
    indent: String,
    frames: Vec<Frame>,
}

impl<E: XmlEmitter> Indenting<E> {
    pub fn new(inner: E, indent: impl Into<String>) -> Self {
        Indenting {
            inner,
            indent: indent.into(),
            frames: Vec::new(),
        }
    }

    pub fn into_inner(self) -> E {
        self.inner
    }

    fn line_break(&mut self, depth: usize) -> GpxResult<()> {
        let mut whitespace = String::with_capacity(1 + self.indent.len() * depth);
        whitespace.push('\n');
        for _ in 0..depth {
            whitespace.push_str(&self.indent);
        }
        self.inner.characters(&whitespace)
    }
}

impl<E: XmlEmitter> XmlEmitter for Indenting<E> {
    fn start_document(&mut self) -> GpxResult<()> {
        self.inner.start_document()
    }

    fn end_document(&mut self) -> GpxResult<()> {
        self.inner.characters("\n")?;
        self.inner.end_document()
    }

    fn start_element(&mut self, name: &str) -> GpxResult<()> {
        let depth = self.frames.len();
        let needs_break = match self.frames.last_mut() {
            Some(parent) => {
                parent.has_children = true;
                !parent.has_text
            }
            None => true,
        };
        if needs_break {
            self.line_break(depth)?;
        }
        self.frames.push(Frame::default());
        self.inner.start_element(name)
    }

    fn attribute(&mut self, name: &str, value: &str) -> GpxResult<()> {
        self.inner.attribute(name, value)
    }

    fn default_namespace(&mut self, uri: &str) -> GpxResult<()> {
        self.inner.default_namespace(uri)
    }

    fn characters(&mut self, text: &str) -> GpxResult<()> {
        if let Some(frame) = self.frames.last_mut() {
            frame.has_text = true;
        }
        self.inner.characters(text)
    }

    fn end_element(&mut self) -> GpxResult<()> {
        if let Some(frame) = self.frames.pop() {
            if frame.has_children && !frame.has_text {
                self.line_break(self.frames.len())?;
            }
        }
        self.inner.end_element()
    }
}
