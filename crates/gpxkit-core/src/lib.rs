//! gpxkit Core - GPX value model and domain graph
//!
//! This crate defines the types shared by the XML and binary codecs:
//! - Error taxonomy (GpxError, GpxResult)
//! - Schema versions and read modes
//! - Validated scalar values (Latitude, Longitude, Degrees, Length, Speed, UInt, DgpsStation, Fix)
//! - Canonical text forms (TextValue, NumberFormat)
//! - Domain records (Gpx, Metadata, WayPoint, Route, Track, TrackSegment, ...)
//! - Opaque extension trees
//! - Geodesic distances (Ellipsoid, Geoid, PathLength)
//! - Location text patterns (LocationFormatter)

pub mod error;
pub mod extensions;
pub mod format;
pub mod geo;
pub mod geom;
pub mod gpx;
pub mod measure;
pub mod metadata;
pub mod number;
pub mod point;
pub mod route;
pub mod text;
pub mod track;
pub mod version;

pub use error::*;
pub use extensions::*;
pub use format::{Location, LocationFormatter};
pub use geo::*;
pub use geom::*;
pub use gpx::*;
pub use measure::*;
pub use metadata::*;
pub use number::*;
pub use point::*;
pub use route::*;
pub use text::*;
pub use track::*;
pub use version::*;
