//! GPX schema versions and read modes

use std::fmt;
use std::str::FromStr;

use crate::{GpxError, GpxResult};

/// GPX schema version
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Version {
    /// GPX 1.0
    V10,
    /// GPX 1.1
    #[default]
    V11,
}

impl Version {
    pub const ALL: [Version; 2] = [Version::V10, Version::V11];

    /// Value of the `version` attribute
    pub fn value(self) -> &'static str {
        match self {
            Version::V10 => "1.0",
            Version::V11 => "1.1",
        }
    }

    /// Default namespace of the root element
    pub fn namespace_uri(self) -> &'static str {
        match self {
            Version::V10 => "http://www.topografix.com/GPX/1/0",
            Version::V11 => "http://www.topografix.com/GPX/1/1",
        }
    }

    /// Look up a version by its attribute value
    pub fn from_value(value: &str) -> Option<Self> {
        match value.trim() {
            "1.0" => Some(Version::V10),
            "1.1" => Some(Version::V11),
            _ => None,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl FromStr for Version {
    type Err = GpxError;

    fn from_str(s: &str) -> GpxResult<Self> {
        Version::from_value(s).ok_or_else(|| GpxError::parse("version", s))
    }
}

/// Read-time policy for schema and value violations
///
/// `Strict` fails on the first unexpected element or invalid value.
/// `Lenient` drops the offending content and keeps reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    Lenient,
    #[default]
    Strict,
}

impl Mode {
    #[inline]
    pub fn is_lenient(self) -> bool {
        self == Mode::Lenient
    }
}
