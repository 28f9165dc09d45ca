//! Tagged dispatch over every type with a binary form
//!
//! Format: [TAG:1][VALUE]

use bytes::{Buf, BufMut};
use gpxkit_core::{
    Bounds, Copyright, Degrees, DgpsStation, Email, Gpx, GpxError, GpxResult, Latitude, Length,
    Link, Longitude, Metadata, Person, Route, Speed, Track, TrackSegment, UInt, WayPoint,
};

use crate::codec::BinaryCodec;
use crate::primitive::get_u8;

/// Type tag identifiers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeTag {
    Bounds = 0x01,
    Copyright = 0x02,
    Degrees = 0x03,
    DgpsStation = 0x04,
    Email = 0x05,
    Gpx = 0x06,
    Latitude = 0x07,
    Length = 0x08,
    Link = 0x09,
    Longitude = 0x0A,
    Metadata = 0x0B,
    Person = 0x0C,
    Route = 0x0D,
    Speed = 0x0E,
    Track = 0x0F,
    TrackSegment = 0x10,
    UInt = 0x11,
    WayPoint = 0x12,
}

impl TypeTag {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x01 => Some(TypeTag::Bounds),
            0x02 => Some(TypeTag::Copyright),
            0x03 => Some(TypeTag::Degrees),
            0x04 => Some(TypeTag::DgpsStation),
            0x05 => Some(TypeTag::Email),
            0x06 => Some(TypeTag::Gpx),
            0x07 => Some(TypeTag::Latitude),
            0x08 => Some(TypeTag::Length),
            0x09 => Some(TypeTag::Link),
            0x0A => Some(TypeTag::Longitude),
            0x0B => Some(TypeTag::Metadata),
            0x0C => Some(TypeTag::Person),
            0x0D => Some(TypeTag::Route),
            0x0E => Some(TypeTag::Speed),
            0x0F => Some(TypeTag::Track),
            0x10 => Some(TypeTag::TrackSegment),
            0x11 => Some(TypeTag::UInt),
            0x12 => Some(TypeTag::WayPoint),
            _ => None,
        }
    }

    #[inline]
    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

/// Any value of the closed set of taggable types
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bounds(Bounds),
    Copyright(Copyright),
    Degrees(Degrees),
    DgpsStation(DgpsStation),
    Email(Email),
    Gpx(Gpx),
    Latitude(Latitude),
    Length(Length),
    Link(Link),
    Longitude(Longitude),
    Metadata(Metadata),
    Person(Person),
    Route(Route),
    Speed(Speed),
    Track(Track),
    TrackSegment(TrackSegment),
    UInt(UInt),
    WayPoint(WayPoint),
}

impl Value {
    pub fn tag(&self) -> TypeTag {
        match self {
            Value::Bounds(_) => TypeTag::Bounds,
            Value::Copyright(_) => TypeTag::Copyright,
            Value::Degrees(_) => TypeTag::Degrees,
            Value::DgpsStation(_) => TypeTag::DgpsStation,
            Value::Email(_) => TypeTag::Email,
            Value::Gpx(_) => TypeTag::Gpx,
            Value::Latitude(_) => TypeTag::Latitude,
            Value::Length(_) => TypeTag::Length,
            Value::Link(_) => TypeTag::Link,
            Value::Longitude(_) => TypeTag::Longitude,
            Value::Metadata(_) => TypeTag::Metadata,
            Value::Person(_) => TypeTag::Person,
            Value::Route(_) => TypeTag::Route,
            Value::Speed(_) => TypeTag::Speed,
            Value::Track(_) => TypeTag::Track,
            Value::TrackSegment(_) => TypeTag::TrackSegment,
            Value::UInt(_) => TypeTag::UInt,
            Value::WayPoint(_) => TypeTag::WayPoint,
        }
    }
}

macro_rules! impl_from_value {
    ($($ty:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$ty(value)
                }
            }
        )*
    };
}

impl_from_value!(
    Bounds,
    Copyright,
    Degrees,
    DgpsStation,
    Email,
    Gpx,
    Latitude,
    Length,
    Link,
    Longitude,
    Metadata,
    Person,
    Route,
    Speed,
    Track,
    TrackSegment,
    UInt,
    WayPoint,
);

/// Write the type tag followed by the value's own encoding
pub fn write_tagged<B: BufMut>(buf: &mut B, value: &Value) {
    buf.put_u8(value.tag().to_byte());
    match value {
        Value::Bounds(v) => v.encode(buf),
        Value::Copyright(v) => v.encode(buf),
        Value::Degrees(v) => v.encode(buf),
        Value::DgpsStation(v) => v.encode(buf),
        Value::Email(v) => v.encode(buf),
        Value::Gpx(v) => v.encode(buf),
        Value::Latitude(v) => v.encode(buf),
        Value::Length(v) => v.encode(buf),
        Value::Link(v) => v.encode(buf),
        Value::Longitude(v) => v.encode(buf),
        Value::Metadata(v) => v.encode(buf),
        Value::Person(v) => v.encode(buf),
        Value::Route(v) => v.encode(buf),
        Value::Speed(v) => v.encode(buf),
        Value::Track(v) => v.encode(buf),
        Value::TrackSegment(v) => v.encode(buf),
        Value::UInt(v) => v.encode(buf),
        Value::WayPoint(v) => v.encode(buf),
    }
}

/// Read a tagged value written by [`write_tagged`]
pub fn read_tagged<B: Buf>(buf: &mut B) -> GpxResult<Value> {
    let b = get_u8(buf)?;
    let tag = TypeTag::from_byte(b).ok_or(GpxError::UnknownTypeTag(b))?;
    Ok(match tag {
        TypeTag::Bounds => Value::Bounds(Bounds::decode(buf)?),
        TypeTag::Copyright => Value::Copyright(Copyright::decode(buf)?),
        TypeTag::Degrees => Value::Degrees(Degrees::decode(buf)?),
        TypeTag::DgpsStation => Value::DgpsStation(DgpsStation::decode(buf)?),
        TypeTag::Email => Value::Email(Email::decode(buf)?),
        TypeTag::Gpx => Value::Gpx(Gpx::decode(buf)?),
        TypeTag::Latitude => Value::Latitude(Latitude::decode(buf)?),
        TypeTag::Length => Value::Length(Length::decode(buf)?),
        TypeTag::Link => Value::Link(Link::decode(buf)?),
        TypeTag::Longitude => Value::Longitude(Longitude::decode(buf)?),
        TypeTag::Metadata => Value::Metadata(Metadata::decode(buf)?),
        TypeTag::Person => Value::Person(Person::decode(buf)?),
        TypeTag::Route => Value::Route(Route::decode(buf)?),
        TypeTag::Speed => Value::Speed(Speed::decode(buf)?),
        TypeTag::Track => Value::Track(Track::decode(buf)?),
        TypeTag::TrackSegment => Value::TrackSegment(TrackSegment::decode(buf)?),
        TypeTag::UInt => Value::UInt(UInt::decode(buf)?),
        TypeTag::WayPoint => Value::WayPoint(WayPoint::decode(buf)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_bytes() {
        for b in 0x01..=0x12 {
            let tag = TypeTag::from_byte(b).unwrap();
            assert_eq!(tag.to_byte(), b);
        }
        assert_eq!(TypeTag::from_byte(0x00), None);
        assert_eq!(TypeTag::from_byte(0x13), None);
    }

    #[test]
    fn test_tagged_roundtrip() {
        let values: Vec<Value> = vec![
            Bounds::of(1.0, 2.0, 3.0, 4.0).unwrap().into(),
            Email::new("a", "b.org").unwrap().into(),
            Latitude::from_degrees(12.5).unwrap().into(),
            Link::new("https://example.org").unwrap().into(),
            UInt::new(7).into(),
            WayPoint::of(5.0, 6.0).unwrap().into(),
            Gpx::builder().creator("me").build().into(),
        ];

        let mut buf = Vec::new();
        for value in &values {
            write_tagged(&mut buf, value);
        }

        let mut slice = buf.as_slice();
        for value in &values {
            let decoded = read_tagged(&mut slice).unwrap();
            assert_eq!(decoded.tag(), value.tag());
            assert_eq!(&decoded, value);
        }
        assert!(slice.is_empty());
    }

    #[test]
    fn test_unknown_tag() {
        let bytes = [0x42u8, 0x00];
        assert!(matches!(
            read_tagged(&mut &bytes[..]),
            Err(GpxError::UnknownTypeTag(0x42))
        ));
    }
}
