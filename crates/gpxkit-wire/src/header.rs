//! Format header of binary GPX documents
//!
//! Header is 4 bytes:
//! - Bytes 0-1: Magic `GX`
//! - Byte 2: Format version
//! - Byte 3: Flags (reserved, must be zero)

use gpxkit_core::{GpxError, GpxResult};

/// Header size in bytes
pub const FORMAT_HEADER_SIZE: usize = 4;

/// Leading magic bytes
pub const FORMAT_MAGIC: [u8; 2] = *b"GX";

/// Current binary format version
pub const FORMAT_VERSION: u8 = 1;

/// Binary document header
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormatHeader {
    pub version: u8,
    pub flags: u8,
}

impl FormatHeader {
    pub fn new() -> Self {
        FormatHeader {
            version: FORMAT_VERSION,
            flags: 0,
        }
    }

    /// Parse header from bytes
    pub fn parse(buf: &[u8]) -> GpxResult<Self> {
        if buf.len() < FORMAT_HEADER_SIZE {
            return Err(GpxError::BufferTooShort {
                expected: FORMAT_HEADER_SIZE,
                actual: buf.len(),
            });
        }

        if buf[0..2] != FORMAT_MAGIC {
            return Err(GpxError::InvalidWireFormat("Bad magic bytes".into()));
        }

        let version = buf[2];
        if version != FORMAT_VERSION {
            return Err(GpxError::UnsupportedFormat(version));
        }

        let flags = buf[3];
        if flags != 0 {
            return Err(GpxError::InvalidWireFormat(format!(
                "Unknown header flags: {:#04x}",
                flags
            )));
        }

        Ok(FormatHeader { version, flags })
    }

    /// Serialize header to bytes
    pub fn to_bytes(&self) -> [u8; FORMAT_HEADER_SIZE] {
        [FORMAT_MAGIC[0], FORMAT_MAGIC[1], self.version, self.flags]
    }
}

impl Default for FormatHeader {
    fn default() -> Self {
        FormatHeader::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_roundtrip() {
        let header = FormatHeader::new();
        let bytes = header.to_bytes();
        assert_eq!(&bytes, b"GX\x01\x00");
        assert_eq!(FormatHeader::parse(&bytes).unwrap(), header);
    }

    #[test]
    fn test_header_too_short() {
        let result = FormatHeader::parse(b"GX");
        assert!(matches!(result, Err(GpxError::BufferTooShort { .. })));
    }

    #[test]
    fn test_unsupported_version() {
        let result = FormatHeader::parse(b"GX\x07\x00");
        assert!(matches!(result, Err(GpxError::UnsupportedFormat(7))));
    }

    #[test]
    fn test_bad_magic() {
        let result = FormatHeader::parse(b"PK\x01\x00");
        assert!(matches!(result, Err(GpxError::InvalidWireFormat(_))));
    }
}
