//! Physical quantities with unit conversion

use std::fmt;

use crate::text::{parse_f64, NumberFormat, TextValue};
use crate::{GpxError, GpxResult};

/// Length units, with their size in meters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LengthUnit {
    Meter,
    Kilometer,
    Inch,
    Foot,
    Yard,
    Mile,
    Fathom,
    Cable,
    NauticalMile,
}

impl LengthUnit {
    pub fn meters(self) -> f64 {
        match self {
            LengthUnit::Meter => 1.0,
            LengthUnit::Kilometer => 1000.0,
            LengthUnit::Inch => 127.0 / 5000.0,
            LengthUnit::Foot => 0.3048,
            LengthUnit::Yard => 1143.0 / 1250.0,
            LengthUnit::Mile => 201168.0 / 125.0,
            LengthUnit::Fathom => 1.853184,
            LengthUnit::Cable => 185.3184,
            LengthUnit::NauticalMile => 1853.184,
        }
    }
}

/// A length, stored in meters
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Length(f64);

impl Length {
    pub fn of(value: f64, unit: LengthUnit) -> GpxResult<Self> {
        Length::from_meters(value * unit.meters())
    }

    pub fn from_meters(meters: f64) -> GpxResult<Self> {
        if meters.is_finite() {
            Ok(Length(meters))
        } else {
            Err(GpxError::OutOfRange {
                kind: "length",
                value: meters.to_string(),
                range: "finite",
            })
        }
    }

    #[inline]
    pub fn to_meters(self) -> f64 {
        self.0
    }

    pub fn to(self, unit: LengthUnit) -> f64 {
        self.0 / unit.meters()
    }
}

/// Speed units, with their size in meters per second
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpeedUnit {
    MetersPerSecond,
    KilometersPerHour,
    MilesPerHour,
    Knots,
    Mach,
}

impl SpeedUnit {
    pub fn meters_per_second(self) -> f64 {
        match self {
            SpeedUnit::MetersPerSecond => 1.0,
            SpeedUnit::KilometersPerHour => 5.0 / 18.0,
            SpeedUnit::MilesPerHour => 1397.0 / 3125.0,
            SpeedUnit::Knots => 463.0 / 900.0,
            SpeedUnit::Mach => 331.3,
        }
    }
}

/// A speed, stored in meters per second
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Speed(f64);

impl Speed {
    pub fn of(value: f64, unit: SpeedUnit) -> GpxResult<Self> {
        Speed::from_meters_per_second(value * unit.meters_per_second())
    }

    pub fn from_meters_per_second(value: f64) -> GpxResult<Self> {
        if value.is_finite() {
            Ok(Speed(value))
        } else {
            Err(GpxError::OutOfRange {
                kind: "speed",
                value: value.to_string(),
                range: "finite",
            })
        }
    }

    #[inline]
    pub fn to_meters_per_second(self) -> f64 {
        self.0
    }

    pub fn to(self, unit: SpeedUnit) -> f64 {
        self.0 / unit.meters_per_second()
    }
}

impl TextValue for Length {
    fn parse_text(text: &str) -> GpxResult<Self> {
        Length::from_meters(parse_f64("length", text)?)
    }

    fn to_text(&self, format: &NumberFormat) -> String {
        format.format_f64(self.0)
    }
}

impl TextValue for Speed {
    fn parse_text(text: &str) -> GpxResult<Self> {
        Speed::from_meters_per_second(parse_f64("speed", text)?)
    }

    fn to_text(&self, format: &NumberFormat) -> String {
        format.format_f64(self.0)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} m", self.0)
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} m/s", self.0)
    }
}
