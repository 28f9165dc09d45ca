//! Binary codec trait and leaf value encodings

use std::time::Duration;

use bytes::{Buf, BufMut};
use chrono::{DateTime, Utc};
use gpxkit_core::{
    Degrees, DgpsStation, Fix, GpxError, GpxResult, Latitude, Length, Longitude, Speed, UInt,
    Version,
};

use crate::primitive::{
    get_bool, get_f64, get_i32, get_i64, get_len, get_string, get_u16, get_u8, get_varint,
    put_bool, put_i32, put_i64, put_len, put_string, put_varint, MAX_VARINT32_LEN,
    MAX_VARINT64_LEN,
};

/// A value with a compact binary form
///
/// Encoding is infallible; decoding validates the bytes and the value
/// constraints of the decoded type.
pub trait BinaryCodec: Sized {
    fn encode<B: BufMut>(&self, buf: &mut B);

    fn decode<B: Buf>(buf: &mut B) -> GpxResult<Self>;
}

/// Presence flag followed by the value iff present
pub fn put_nullable<T: BinaryCodec, B: BufMut>(buf: &mut B, value: Option<&T>) {
    match value {
        Some(value) => {
            put_bool(buf, true);
            value.encode(buf);
        }
        None => put_bool(buf, false),
    }
}

pub fn get_nullable<T: BinaryCodec, B: Buf>(buf: &mut B) -> GpxResult<Option<T>> {
    if get_bool(buf)? {
        Ok(Some(T::decode(buf)?))
    } else {
        Ok(None)
    }
}

/// Count prefix followed by the items in order
pub fn put_seq<T: BinaryCodec, B: BufMut>(buf: &mut B, items: &[T]) {
    put_len(buf, items.len());
    for item in items {
        item.encode(buf);
    }
}

pub fn get_seq<T: BinaryCodec, B: Buf>(buf: &mut B) -> GpxResult<Vec<T>> {
    let count = get_len(buf)?;
    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        items.push(T::decode(buf)?);
    }
    Ok(items)
}

fn invalid(err: GpxError) -> GpxError {
    GpxError::InvalidWireFormat(err.to_string())
}

impl BinaryCodec for String {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        put_string(buf, self);
    }

    fn decode<B: Buf>(buf: &mut B) -> GpxResult<Self> {
        get_string(buf)
    }
}

impl BinaryCodec for f64 {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_f64(*self);
    }

    fn decode<B: Buf>(buf: &mut B) -> GpxResult<Self> {
        get_f64(buf)
    }
}

impl BinaryCodec for i32 {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        put_i32(buf, *self);
    }

    fn decode<B: Buf>(buf: &mut B) -> GpxResult<Self> {
        get_i32(buf)
    }
}

impl BinaryCodec for Latitude {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_f64(self.to_degrees());
    }

    fn decode<B: Buf>(buf: &mut B) -> GpxResult<Self> {
        Latitude::from_degrees(get_f64(buf)?).map_err(invalid)
    }
}

impl BinaryCodec for Longitude {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_f64(self.to_degrees());
    }

    fn decode<B: Buf>(buf: &mut B) -> GpxResult<Self> {
        Longitude::from_degrees(get_f64(buf)?).map_err(invalid)
    }
}

impl BinaryCodec for Degrees {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_f64(self.to_degrees());
    }

    fn decode<B: Buf>(buf: &mut B) -> GpxResult<Self> {
        Degrees::from_degrees(get_f64(buf)?).map_err(invalid)
    }
}

impl BinaryCodec for Length {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_f64(self.to_meters());
    }

    fn decode<B: Buf>(buf: &mut B) -> GpxResult<Self> {
        Length::from_meters(get_f64(buf)?).map_err(invalid)
    }
}

impl BinaryCodec for Speed {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_f64(self.to_meters_per_second());
    }

    fn decode<B: Buf>(buf: &mut B) -> GpxResult<Self> {
        Speed::from_meters_per_second(get_f64(buf)?).map_err(invalid)
    }
}

impl BinaryCodec for UInt {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        put_i64(buf, self.value() as i64);
    }

    fn decode<B: Buf>(buf: &mut B) -> GpxResult<Self> {
        UInt::from_i64(get_i64(buf)?).map_err(invalid)
    }
}

impl BinaryCodec for DgpsStation {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u16(self.value());
    }

    fn decode<B: Buf>(buf: &mut B) -> GpxResult<Self> {
        DgpsStation::new(get_u16(buf)? as i64).map_err(invalid)
    }
}

impl BinaryCodec for Fix {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.to_byte());
    }

    fn decode<B: Buf>(buf: &mut B) -> GpxResult<Self> {
        let b = get_u8(buf)?;
        Fix::from_byte(b)
            .ok_or_else(|| GpxError::InvalidWireFormat(format!("Unknown fix type: {}", b)))
    }
}

impl BinaryCodec for Version {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(match self {
            Version::V10 => 10,
            Version::V11 => 11,
        });
    }

    fn decode<B: Buf>(buf: &mut B) -> GpxResult<Self> {
        match get_u8(buf)? {
            10 => Ok(Version::V10),
            11 => Ok(Version::V11),
            b => Err(GpxError::InvalidWireFormat(format!(
                "Unknown GPX version: {}",
                b
            ))),
        }
    }
}

/// Seconds since the epoch followed by the sub-second nanos
impl BinaryCodec for DateTime<Utc> {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        put_i64(buf, self.timestamp());
        put_varint(buf, self.timestamp_subsec_nanos() as u64);
    }

    fn decode<B: Buf>(buf: &mut B) -> GpxResult<Self> {
        let secs = get_i64(buf)?;
        let nanos = get_varint(buf, MAX_VARINT32_LEN)?;
        u32::try_from(nanos)
            .ok()
            .and_then(|nanos| DateTime::from_timestamp(secs, nanos))
            .ok_or_else(|| GpxError::InvalidWireFormat("Timestamp out of range".into()))
    }
}

impl BinaryCodec for Duration {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        put_varint(buf, self.as_secs());
        put_varint(buf, self.subsec_nanos() as u64);
    }

    fn decode<B: Buf>(buf: &mut B) -> GpxResult<Self> {
        let secs = get_varint(buf, MAX_VARINT64_LEN)?;
        let nanos = get_varint(buf, MAX_VARINT32_LEN)?;
        if nanos >= 1_000_000_000 {
            return Err(GpxError::InvalidWireFormat(format!(
                "Invalid duration nanos: {}",
                nanos
            )));
        }
        Ok(Duration::new(secs, nanos as u32))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn roundtrip<T: BinaryCodec>(value: &T) -> T {
        let mut buf = Vec::new();
        value.encode(&mut buf);
        let mut slice = buf.as_slice();
        let decoded = T::decode(&mut slice).unwrap();
        assert!(slice.is_empty());
        decoded
    }

    #[test]
    fn test_scalar_roundtrip() {
        let lat = Latitude::from_degrees(-33.865).unwrap();
        assert_eq!(roundtrip(&lat), lat);
        let dgps = DgpsStation::new(1023).unwrap();
        assert_eq!(roundtrip(&dgps), dgps);
        assert_eq!(roundtrip(&Fix::Dgps), Fix::Dgps);
        assert_eq!(roundtrip(&UInt::new(u32::MAX)), UInt::new(u32::MAX));
    }

    #[test]
    fn test_time_roundtrip() {
        let time = Utc.with_ymd_and_hms(1969, 7, 20, 20, 17, 40).unwrap()
            + chrono::TimeDelta::nanoseconds(123);
        assert_eq!(roundtrip(&time), time);
        let duration = Duration::new(86_400, 500_000_000);
        assert_eq!(roundtrip(&duration), duration);
    }

    #[test]
    fn test_out_of_range_latitude_is_corrupt() {
        let mut buf = Vec::new();
        buf.put_f64(95.0);
        let result = Latitude::decode(&mut buf.as_slice());
        assert!(matches!(result, Err(GpxError::InvalidWireFormat(_))));
    }

    #[test]
    fn test_nullable_and_seq() {
        let mut buf = Vec::new();
        put_nullable(&mut buf, Some(&"a".to_string()));
        put_nullable::<String, _>(&mut buf, None);
        put_seq(&mut buf, &[1i32, -2, 3]);

        let mut slice = buf.as_slice();
        assert_eq!(get_nullable::<String, _>(&mut slice).unwrap(), Some("a".into()));
        assert_eq!(get_nullable::<String, _>(&mut slice).unwrap(), None);
        assert_eq!(get_seq::<i32, _>(&mut slice).unwrap(), vec![1, -2, 3]);
        assert!(slice.is_empty());
    }

    #[test]
    fn test_seq_count_beyond_input() {
        let mut buf = Vec::new();
        put_len(&mut buf, 1_000_000);
        assert!(matches!(
            get_seq::<i32, _>(&mut buf.as_slice()),
            Err(GpxError::BufferTooShort { .. })
        ));
    }
}
