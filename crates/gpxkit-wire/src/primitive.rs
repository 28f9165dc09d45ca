//! Primitive binary codec
//!
//! Building blocks for every record layout:
//! - Fixed-width big-endian `u8`, `u16` and `f64`
//! - Zig-zag varints for signed integers (7 bits per byte, LSB group first)
//! - Length-prefixed UTF-8 strings
//! - Varint lengths and counts, checked against the remaining input
//!
//! All reads are bounds-checked and fail with `BufferTooShort` instead of
//! panicking.

use bytes::{Buf, BufMut};
use gpxkit_core::{GpxError, GpxResult};

/// Maximum encoded size of a 32-bit varint
pub const MAX_VARINT32_LEN: usize = 5;

/// Maximum encoded size of a 64-bit varint
pub const MAX_VARINT64_LEN: usize = 10;

#[inline]
pub fn ensure<B: Buf>(buf: &B, needed: usize) -> GpxResult<()> {
    if buf.remaining() < needed {
        return Err(GpxError::BufferTooShort {
            expected: needed,
            actual: buf.remaining(),
        });
    }
    Ok(())
}

#[inline]
pub fn get_u8<B: Buf>(buf: &mut B) -> GpxResult<u8> {
    ensure(buf, 1)?;
    Ok(buf.get_u8())
}

#[inline]
pub fn get_u16<B: Buf>(buf: &mut B) -> GpxResult<u16> {
    ensure(buf, 2)?;
    Ok(buf.get_u16())
}

#[inline]
pub fn get_f64<B: Buf>(buf: &mut B) -> GpxResult<f64> {
    ensure(buf, 8)?;
    Ok(buf.get_f64())
}

#[inline]
pub fn put_bool<B: BufMut>(buf: &mut B, value: bool) {
    buf.put_u8(value as u8);
}

pub fn get_bool<B: Buf>(buf: &mut B) -> GpxResult<bool> {
    match get_u8(buf)? {
        0 => Ok(false),
        1 => Ok(true),
        b => Err(GpxError::InvalidWireFormat(format!(
            "Invalid boolean flag: {}",
            b
        ))),
    }
}

/// Write an unsigned varint
pub fn put_varint<B: BufMut>(buf: &mut B, mut value: u64) {
    while value >= 0x80 {
        buf.put_u8((value as u8 & 0x7F) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

/// Read an unsigned varint of at most `max_len` bytes
pub fn get_varint<B: Buf>(buf: &mut B, max_len: usize) -> GpxResult<u64> {
    let mut value = 0u64;
    for i in 0..max_len {
        let b = get_u8(buf)?;
        value |= ((b & 0x7F) as u64) << (7 * i);
        if b & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(GpxError::InvalidWireFormat("Invalid varint encoding".into()))
}

#[inline]
pub fn put_i32<B: BufMut>(buf: &mut B, value: i32) {
    put_varint(buf, ((value << 1) ^ (value >> 31)) as u32 as u64);
}

pub fn get_i32<B: Buf>(buf: &mut B) -> GpxResult<i32> {
    let raw = get_varint(buf, MAX_VARINT32_LEN)?;
    let raw = u32::try_from(raw)
        .map_err(|_| GpxError::InvalidWireFormat("Invalid int encoding".into()))?;
    Ok(((raw >> 1) as i32) ^ -((raw & 1) as i32))
}

#[inline]
pub fn put_i64<B: BufMut>(buf: &mut B, value: i64) {
    put_varint(buf, ((value << 1) ^ (value >> 63)) as u64);
}

pub fn get_i64<B: Buf>(buf: &mut B) -> GpxResult<i64> {
    let raw = get_varint(buf, MAX_VARINT64_LEN)?;
    Ok(((raw >> 1) as i64) ^ -((raw & 1) as i64))
}

/// Write a length or element count
#[inline]
pub fn put_len<B: BufMut>(buf: &mut B, len: usize) {
    put_varint(buf, len as u64);
}

/// Read a length or count; every counted item takes at least one byte,
/// so anything above the remaining input is corrupt.
pub fn get_len<B: Buf>(buf: &mut B) -> GpxResult<usize> {
    let len = get_varint(buf, MAX_VARINT64_LEN)?;
    let len = usize::try_from(len)
        .map_err(|_| GpxError::InvalidWireFormat("Length overflows usize".into()))?;
    ensure(buf, len)?;
    Ok(len)
}

pub fn put_string<B: BufMut>(buf: &mut B, value: &str) {
    put_len(buf, value.len());
    buf.put_slice(value.as_bytes());
}

pub fn get_string<B: Buf>(buf: &mut B) -> GpxResult<String> {
    let len = get_len(buf)?;
    let mut bytes = vec![0u8; len];
    buf.copy_to_slice(&mut bytes);
    String::from_utf8(bytes)
        .map_err(|_| GpxError::InvalidWireFormat("Invalid UTF-8 string".into()))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_varint_sizes() {
        let mut buf = Vec::new();
        put_varint(&mut buf, 0x7F);
        assert_eq!(buf, vec![0x7F]);

        buf.clear();
        put_varint(&mut buf, 300);
        assert_eq!(buf, vec![0xAC, 0x02]);
    }

    #[test]
    fn test_zigzag_ints() {
        for value in [0, -1, 1, i32::MIN, i32::MAX, -64, 64] {
            let mut buf = Vec::new();
            put_i32(&mut buf, value);
            assert!(buf.len() <= MAX_VARINT32_LEN);
            assert_eq!(get_i32(&mut buf.as_slice()).unwrap(), value);
        }

        let mut buf = Vec::new();
        put_i32(&mut buf, -1);
        assert_eq!(buf, vec![0x01]);
    }

    #[test]
    fn test_zigzag_longs() {
        for value in [0, -1, i64::MIN, i64::MAX, 1_700_000_000] {
            let mut buf = Vec::new();
            put_i64(&mut buf, value);
            assert!(buf.len() <= MAX_VARINT64_LEN);
            assert_eq!(get_i64(&mut buf.as_slice()).unwrap(), value);
        }
    }

    #[test]
    fn test_overlong_varint() {
        let bytes = [0xFFu8; 6];
        let result = get_i32(&mut &bytes[..]);
        assert!(matches!(result, Err(GpxError::InvalidWireFormat(_))));
    }

    #[test]
    fn test_string_roundtrip() {
        let mut buf = Vec::new();
        put_string(&mut buf, "Wien – Ústí");
        assert_eq!(get_string(&mut buf.as_slice()).unwrap(), "Wien – Ústí");
    }

    #[test]
    fn test_string_length_exceeds_buffer() {
        let mut buf = Vec::new();
        put_len(&mut buf, 10);
        buf.extend_from_slice(b"abc");
        let result = get_string(&mut buf.as_slice());
        assert!(matches!(
            result,
            Err(GpxError::BufferTooShort {
                expected: 10,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_invalid_bool() {
        let bytes = [2u8];
        assert!(get_bool(&mut &bytes[..]).is_err());
        assert!(get_f64(&mut &[0u8; 4][..]).is_err());
    }

    proptest! {
        #[test]
        fn prop_reads_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
            let _ = get_string(&mut bytes.as_slice());
            let _ = get_i64(&mut bytes.as_slice());
        }

        #[test]
        fn prop_zigzag_i64(value in any::<i64>()) {
            let mut buf = Vec::new();
            put_i64(&mut buf, value);
            prop_assert!(buf.len() <= MAX_VARINT64_LEN);
            prop_assert_eq!(get_i64(&mut buf.as_slice()).unwrap(), value);
        }
    }
}
