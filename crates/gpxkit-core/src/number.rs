//! Integer-valued and enumerated GPX values

use std::fmt;

use crate::text::{NumberFormat, TextValue};
use crate::{GpxError, GpxResult};

/// Non-negative integer (`xsd:nonNegativeInteger`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct UInt(u32);

impl UInt {
    pub const ZERO: UInt = UInt(0);

    #[inline]
    pub fn new(value: u32) -> Self {
        UInt(value)
    }

    /// Checked construction from a signed value
    pub fn from_i64(value: i64) -> GpxResult<Self> {
        u32::try_from(value).map(UInt).map_err(|_| GpxError::OutOfRange {
            kind: "unsigned integer",
            value: value.to_string(),
            range: "[0, 4294967295]",
        })
    }

    #[inline]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for UInt {
    fn from(value: u32) -> Self {
        UInt(value)
    }
}

/// DGPS station id, in `[0, 1023]`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DgpsStation(u16);

impl DgpsStation {
    pub const MAX: u16 = 1023;

    pub fn new(value: i64) -> GpxResult<Self> {
        if (0..=Self::MAX as i64).contains(&value) {
            Ok(DgpsStation(value as u16))
        } else {
            Err(GpxError::OutOfRange {
                kind: "DGPS station",
                value: value.to_string(),
                range: "[0, 1023]",
            })
        }
    }

    #[inline]
    pub fn value(self) -> u16 {
        self.0
    }
}

/// Type of GPS fix
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Fix {
    /// GPS had no fix
    None = 0x00,
    /// 2-dimensional fix
    TwoD = 0x01,
    /// 3-dimensional fix
    ThreeD = 0x02,
    /// Differential GPS
    Dgps = 0x03,
    /// Military signal
    Pps = 0x04,
}

impl Fix {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x00 => Some(Fix::None),
            0x01 => Some(Fix::TwoD),
            0x02 => Some(Fix::ThreeD),
            0x03 => Some(Fix::Dgps),
            0x04 => Some(Fix::Pps),
            _ => None,
        }
    }

    #[inline]
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// GPX literal
    pub fn value(self) -> &'static str {
        match self {
            Fix::None => "none",
            Fix::TwoD => "2d",
            Fix::ThreeD => "3d",
            Fix::Dgps => "dgps",
            Fix::Pps => "pps",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "none" => Some(Fix::None),
            "2d" => Some(Fix::TwoD),
            "3d" => Some(Fix::ThreeD),
            "dgps" => Some(Fix::Dgps),
            "pps" => Some(Fix::Pps),
            _ => None,
        }
    }
}

fn parse_integer(kind: &'static str, text: &str) -> GpxResult<i64> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| GpxError::parse(kind, text))
}

impl TextValue for UInt {
    fn parse_text(text: &str) -> GpxResult<Self> {
        UInt::from_i64(parse_integer("unsigned integer", text)?)
    }

    fn to_text(&self, _format: &NumberFormat) -> String {
        self.0.to_string()
    }
}

impl TextValue for DgpsStation {
    fn parse_text(text: &str) -> GpxResult<Self> {
        DgpsStation::new(parse_integer("DGPS station", text)?)
    }

    fn to_text(&self, _format: &NumberFormat) -> String {
        self.0.to_string()
    }
}

impl TextValue for Fix {
    fn parse_text(text: &str) -> GpxResult<Self> {
        Fix::from_value(text.trim()).ok_or_else(|| GpxError::parse("fix", text))
    }

    fn to_text(&self, _format: &NumberFormat) -> String {
        self.value().to_string()
    }
}

impl fmt::Display for UInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for DgpsStation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Fix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}
