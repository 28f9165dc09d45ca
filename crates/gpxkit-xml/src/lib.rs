//! gpxkit XML - Streaming GPX 1.0/1.1 codec
//!
//! This crate reads and writes GPX documents with a small combinator
//! framework:
//! - Pull cursor over quick-xml events
//! - Reader combinators (attribute, text, element, repeated element, embedded document)
//! - Writer combinators mirroring the readers
//! - Version dispatch tables projecting one declaration per schema version
//! - Record codecs for every GPX element
//! - Document reader and writer with lenient/strict modes and indentation
//!
//! ```no_run
//! use gpxkit_core::{Mode, Version};
//! use gpxkit_xml::{GpxReader, GpxWriter, Indent};
//!
//! let gpx = GpxReader::new(Version::V11, Mode::Lenient).read_path("track.gpx")?;
//! GpxWriter::new(Indent::space2(), Some(6)).write_path(&gpx, "copy.gpx")?;
//! # Ok::<(), gpxkit_core::GpxError>(())
//! ```

pub mod codecs;
pub mod cursor;
pub mod document;
pub mod emit;
pub mod indent;
pub mod reader;
pub mod records;
pub mod table;
pub mod writer;

pub use codecs::{codecs, Codecs};
pub use cursor::{StartTag, XmlCursor, XmlEvent};
pub use document::*;
pub use emit::*;
pub use indent::*;
pub use reader::{ErasedReader, Kind, Reader, Values};
pub use table::*;
pub use writer::Writer;
