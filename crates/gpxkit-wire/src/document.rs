//! Whole-document binary persistence
//!
//! Document = Format Header + tagged `Gpx` value

use bytes::{BufMut, Bytes, BytesMut};
use gpxkit_core::{Gpx, GpxError, GpxResult};

use crate::{read_tagged, BinaryCodec, FormatHeader, TypeTag, Value, FORMAT_HEADER_SIZE};

/// Encode a document into its binary form
pub fn encode_document(gpx: &Gpx) -> Bytes {
    let mut buf = BytesMut::with_capacity(256);
    buf.extend_from_slice(&FormatHeader::new().to_bytes());
    buf.put_u8(TypeTag::Gpx.to_byte());
    gpx.encode(&mut buf);
    tracing::trace!(bytes = buf.len(), "encoded binary GPX document");
    buf.freeze()
}

/// Decode a document written by [`encode_document`]
pub fn decode_document(bytes: &[u8]) -> GpxResult<Gpx> {
    FormatHeader::parse(bytes)?;
    let mut body = &bytes[FORMAT_HEADER_SIZE..];
    let value = read_tagged(&mut body)?;
    if !body.is_empty() {
        return Err(GpxError::InvalidWireFormat(format!(
            "{} trailing bytes after document",
            body.len()
        )));
    }
    tracing::trace!(bytes = bytes.len(), "decoded binary GPX document");
    match value {
        Value::Gpx(gpx) => Ok(gpx),
        other => Err(GpxError::InvalidWireFormat(format!(
            "Expected GPX document, found {:?}",
            other.tag()
        ))),
    }
}
