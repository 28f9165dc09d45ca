//! Angular values: latitude, longitude and bearing degrees

use std::fmt;

use crate::text::{parse_f64, NumberFormat, TextValue};
use crate::{GpxError, GpxResult};

/// Latitude in decimal degrees, in `[-90, 90]`
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Latitude(f64);

impl Latitude {
    pub const MIN_DEGREES: f64 = -90.0;
    pub const MAX_DEGREES: f64 = 90.0;

    pub fn from_degrees(degrees: f64) -> GpxResult<Self> {
        if (Self::MIN_DEGREES..=Self::MAX_DEGREES).contains(&degrees) {
            Ok(Latitude(degrees))
        } else {
            Err(GpxError::OutOfRange {
                kind: "latitude",
                value: degrees.to_string(),
                range: "[-90, 90]",
            })
        }
    }

    #[inline]
    pub fn to_degrees(self) -> f64 {
        self.0
    }
}

/// Longitude in decimal degrees, in `[-180, 180)`
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Longitude(f64);

impl Longitude {
    pub const MIN_DEGREES: f64 = -180.0;
    /// Exclusive upper bound
    pub const MAX_DEGREES: f64 = 180.0;

    pub fn from_degrees(degrees: f64) -> GpxResult<Self> {
        if (Self::MIN_DEGREES..Self::MAX_DEGREES).contains(&degrees) {
            Ok(Longitude(degrees))
        } else {
            Err(GpxError::OutOfRange {
                kind: "longitude",
                value: degrees.to_string(),
                range: "[-180, 180)",
            })
        }
    }

    #[inline]
    pub fn to_degrees(self) -> f64 {
        self.0
    }
}

/// Bearing or magnetic variation in degrees, in `[0, 360)`
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Degrees(f64);

impl Degrees {
    pub fn from_degrees(degrees: f64) -> GpxResult<Self> {
        if (0.0..360.0).contains(&degrees) {
            Ok(Degrees(degrees))
        } else {
            Err(GpxError::OutOfRange {
                kind: "degrees",
                value: degrees.to_string(),
                range: "[0, 360)",
            })
        }
    }

    #[inline]
    pub fn to_degrees(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn to_radians(self) -> f64 {
        self.0.to_radians()
    }
}

impl TextValue for Latitude {
    fn parse_text(text: &str) -> GpxResult<Self> {
        Latitude::from_degrees(parse_f64("latitude", text)?)
    }

    fn to_text(&self, format: &NumberFormat) -> String {
        format.format_f64(self.0)
    }
}

impl TextValue for Longitude {
    fn parse_text(text: &str) -> GpxResult<Self> {
        Longitude::from_degrees(parse_f64("longitude", text)?)
    }

    fn to_text(&self, format: &NumberFormat) -> String {
        format.format_f64(self.0)
    }
}

impl TextValue for Degrees {
    fn parse_text(text: &str) -> GpxResult<Self> {
        Degrees::from_degrees(parse_f64("degrees", text)?)
    }

    fn to_text(&self, format: &NumberFormat) -> String {
        format.format_f64(self.0)
    }
}

impl fmt::Display for Latitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

impl fmt::Display for Longitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

impl fmt::Display for Degrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_latitude_bounds() {
        assert!(Latitude::from_degrees(-90.0).is_ok());
        assert!(Latitude::from_degrees(90.0).is_ok());
        assert!(Latitude::from_degrees(-95.0).is_err());
        assert!(Latitude::from_degrees(f64::NAN).is_err());
    }

    #[test]
    fn test_longitude_upper_bound_is_exclusive() {
        assert!(Longitude::from_degrees(-180.0).is_ok());
        assert!(Longitude::from_degrees(179.999_999).is_ok());
        assert!(Longitude::from_degrees(180.0).is_err());
    }

    #[test]
    fn test_degrees_range() {
        assert!(Degrees::from_degrees(0.0).is_ok());
        assert!(Degrees::from_degrees(341.6).is_ok());
        assert!(Degrees::from_degrees(360.0).is_err());
        assert!(Degrees::from_degrees(-1.0).is_err());
    }

    #[test]
    fn test_parse_text() {
        let lat = Latitude::parse_text("48.2081743").unwrap();
        assert_eq!(lat.to_degrees(), 48.2081743);
        assert_eq!(lat.to_text(&NumberFormat::SHORTEST), "48.2081743");

        let err = Latitude::parse_text("-95.0").unwrap_err();
        assert!(matches!(err, GpxError::OutOfRange { kind: "latitude", .. }));
        assert!(Longitude::parse_text("east").is_err());
    }

    proptest! {
        #[test]
        fn prop_latitude_text_roundtrip(degrees in -90.0f64..=90.0) {
            let lat = Latitude::from_degrees(degrees).unwrap();
            let text = lat.to_text(&NumberFormat::SHORTEST);
            prop_assert_eq!(Latitude::parse_text(&text).unwrap(), lat);
        }

        #[test]
        fn prop_longitude_text_roundtrip(degrees in -180.0f64..180.0) {
            let lon = Longitude::from_degrees(degrees).unwrap();
            let text = lon.to_text(&NumberFormat::SHORTEST);
            prop_assert_eq!(Longitude::parse_text(&text).unwrap(), lon);
        }
    }
}
