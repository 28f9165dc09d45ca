//! Document entry points
//!
//! [`GpxReader`] positions a cursor on the document, picks the root
//! reader of its configured version and reads in its configured mode.
//! [`GpxWriter`] writes the prolog, the root element and its namespace,
//! optionally through the indentation decorator.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use gpxkit_core::{Gpx, GpxError, GpxResult, Mode, NumberFormat, Version};
use tracing::{debug, warn};

use crate::codecs::codecs;
use crate::{Indent, Indenting, StreamEmitter, XmlCursor, XmlEmitter};

/// Reader configuration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Schema version the document is read with
    pub version: Version,
    pub mode: Mode,
}

impl ReaderConfig {
    /// GPX 1.1, failing on the first violation
    pub fn strict() -> Self {
        ReaderConfig {
            version: Version::V11,
            mode: Mode::Strict,
        }
    }

    /// GPX 1.1, dropping invalid and unknown content
    pub fn lenient() -> Self {
        ReaderConfig {
            version: Version::V11,
            mode: Mode::Lenient,
        }
    }
}

/// GPX document reader
#[derive(Clone, Copy, Debug, Default)]
pub struct GpxReader {
    config: ReaderConfig,
}

impl GpxReader {
    pub fn new(version: Version, mode: Mode) -> Self {
        GpxReader {
            config: ReaderConfig { version, mode },
        }
    }

    pub fn with_config(config: ReaderConfig) -> Self {
        GpxReader { config }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Read a document from a byte stream
    pub fn read<R: Read>(&self, input: R) -> GpxResult<Gpx> {
        self.read_buffered(BufReader::new(input))
    }

    /// Read a document from an already buffered stream
    pub fn read_buffered<R: BufRead>(&self, input: R) -> GpxResult<Gpx> {
        let ReaderConfig { version, mode } = self.config;
        debug!(%version, ?mode, "reading GPX document");

        let codecs = codecs(version)?;
        let mut cursor = XmlCursor::new(input);
        let gpx = codecs.reader.read(&mut cursor, mode)?;

        if gpx.version() != version {
            warn!(
                document = %gpx.version(),
                reader = %version,
                "document version differs from the reader version"
            );
        }
        debug!(
            way_points = gpx.way_points().len(),
            routes = gpx.routes().len(),
            tracks = gpx.tracks().len(),
            "read GPX document"
        );
        Ok(gpx)
    }

    pub fn read_path(&self, path: impl AsRef<Path>) -> GpxResult<Gpx> {
        self.read(File::open(path)?)
    }

    pub fn read_str(&self, xml: &str) -> GpxResult<Gpx> {
        self.read_buffered(xml.as_bytes())
    }
}

/// Writer configuration
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriterConfig {
    pub indent: Indent,
    /// Upper bound of fraction digits written for numbers, `None` for
    /// the shortest round-trip form
    pub maximum_fraction_digits: Option<usize>,
    /// Schema version of the written document
    pub version: Version,
}

impl WriterConfig {
    /// Single-line output
    pub fn compact() -> Self {
        WriterConfig {
            indent: Indent::None,
            ..WriterConfig::default()
        }
    }
}

/// GPX document writer
#[derive(Clone, Debug, Default)]
pub struct GpxWriter {
    config: WriterConfig,
}

impl GpxWriter {
    pub fn new(indent: Indent, maximum_fraction_digits: Option<usize>) -> Self {
        GpxWriter {
            config: WriterConfig {
                indent,
                maximum_fraction_digits,
                version: Version::V11,
            },
        }
    }

    pub fn with_config(config: WriterConfig) -> Self {
        GpxWriter { config }
    }

    /// Write documents of `version` instead of GPX 1.1
    pub fn with_version(mut self, version: Version) -> Self {
        self.config.version = version;
        self
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Write `gpx` to `output`
    ///
    /// The output is flushed but not closed; it stays usable by the caller.
    pub fn write<W: Write>(&self, gpx: &Gpx, output: W) -> GpxResult<()> {
        let version = self.config.version;
        debug!(%version, indent = !self.config.indent.is_none(), "writing GPX document");

        let format = NumberFormat {
            maximum_fraction_digits: self.config.maximum_fraction_digits,
        };
        let emitter = StreamEmitter::new(output);
        match &self.config.indent {
            Indent::None => write_document(gpx, version, emitter, &format),
            Indent::Lines(indent) => {
                write_document(gpx, version, Indenting::new(emitter, indent.clone()), &format)
            }
        }
    }

    pub fn write_path(&self, gpx: &Gpx, path: impl AsRef<Path>) -> GpxResult<()> {
        let mut output = BufWriter::new(File::create(path)?);
        self.write(gpx, &mut output)?;
        output.flush()?;
        Ok(())
    }

    pub fn write_to_string(&self, gpx: &Gpx) -> GpxResult<String> {
        let mut output = Vec::new();
        self.write(gpx, &mut output)?;
        String::from_utf8(output).map_err(|e| GpxError::Xml(e.to_string()))
    }
}

fn write_document(
    gpx: &Gpx,
    version: Version,
    mut emitter: impl XmlEmitter,
    format: &NumberFormat,
) -> GpxResult<()> {
    let codecs = codecs(version)?;
    emitter.start_document()?;
    codecs.writer.write(gpx, &mut emitter, format)?;
    emitter.end_document()
}

/// Read a GPX 1.1 document in strict mode
pub fn read(path: impl AsRef<Path>) -> GpxResult<Gpx> {
    GpxReader::default().read_path(path)
}

/// Write a GPX 1.1 document indented by four spaces
pub fn write(gpx: &Gpx, path: impl AsRef<Path>) -> GpxResult<()> {
    GpxWriter::default().write_path(gpx, path)
}
