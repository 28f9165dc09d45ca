//! Optional-field mask for binary record layouts

use bytes::{Buf, BufMut};
use gpxkit_core::{GpxError, GpxResult};

use crate::primitive::{get_varint, put_varint, MAX_VARINT32_LEN};

/// One bit per optional field, in declared field order
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FieldMask(pub u32);

impl FieldMask {
    pub const NONE: FieldMask = FieldMask(0);

    /// Widest supported record
    pub const MAX_FIELDS: u8 = 32;

    #[inline]
    pub fn new(bits: u32) -> Self {
        FieldMask(bits)
    }

    #[inline]
    pub fn is_set(self, bit: u8) -> bool {
        self.0 & (1 << bit) != 0
    }

    #[inline]
    pub fn set(&mut self, bit: u8, value: bool) {
        if value {
            self.0 |= 1 << bit;
        } else {
            self.0 &= !(1 << bit);
        }
    }

    /// Mask with every field of an `n`-field record present
    pub fn all(n: u8) -> Self {
        if n >= Self::MAX_FIELDS {
            FieldMask(u32::MAX)
        } else {
            FieldMask((1u32 << n) - 1)
        }
    }

    #[inline]
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    pub fn write<B: BufMut>(self, buf: &mut B) {
        put_varint(buf, self.0 as u64);
    }

    /// Read a mask for an `n`-field record, rejecting undeclared bits
    pub fn read<B: Buf>(buf: &mut B, n: u8) -> GpxResult<Self> {
        let raw = get_varint(buf, MAX_VARINT32_LEN)?;
        let bits = u32::try_from(raw)
            .map_err(|_| GpxError::InvalidWireFormat("Field mask overflow".into()))?;
        if bits & !Self::all(n).0 != 0 {
            return Err(GpxError::InvalidWireFormat(format!(
                "Field mask {:#x} has bits beyond {} fields",
                bits, n
            )));
        }
        Ok(FieldMask(bits))
    }
}

impl From<u32> for FieldMask {
    fn from(bits: u32) -> Self {
        FieldMask(bits)
    }
}

impl From<FieldMask> for u32 {
    fn from(mask: FieldMask) -> Self {
        mask.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_operations() {
        let mut mask = FieldMask::NONE;

        assert!(!mask.is_set(0));
        mask.set(0, true);
        assert!(mask.is_set(0));

        mask.set(18, true);
        assert!(mask.is_set(18));
        assert!(mask.is_set(0));

        mask.set(0, false);
        assert!(!mask.is_set(0));
        assert!(mask.is_set(18));
        assert_eq!(mask.count(), 1);
    }

    #[test]
    fn test_all_bits() {
        assert_eq!(FieldMask::all(0), FieldMask::NONE);
        assert_eq!(FieldMask::all(3).0, 0b111);
        assert_eq!(FieldMask::all(32).0, u32::MAX);
    }

    #[test]
    fn test_read_rejects_undeclared_bits() {
        let mut buf = Vec::new();
        FieldMask(0b1000).write(&mut buf);
        assert!(FieldMask::read(&mut buf.as_slice(), 3).is_err());
        assert_eq!(FieldMask::read(&mut buf.as_slice(), 4).unwrap().0, 0b1000);
    }
}
