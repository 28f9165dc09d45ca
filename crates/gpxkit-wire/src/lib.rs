//! gpxkit Wire - Compact binary form of the GPX domain graph
//!
//! This crate implements the binary persistence format:
//! - Primitive codec (varints, doubles, strings, nullable values, sequences)
//! - Optional-field masks
//! - Record layouts for every domain type
//! - Tagged dispatch (one type byte + value)
//! - Versioned document header
//!
//! The format is internal: it is stable per `FORMAT_VERSION`, not a
//! contract with other tools.

pub mod codec;
pub mod document;
pub mod header;
pub mod mask;
pub mod primitive;
pub mod records;
pub mod tag;

pub use codec::*;
pub use document::*;
pub use header::*;
pub use mask::*;
pub use records::MAX_EXTENSION_DEPTH;
pub use tag::*;
