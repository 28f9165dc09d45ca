//! Binary round trips: decode(encode(G)) == G

use bytes::{Bytes, BytesMut};
use gpxkit_core::{GpxError, Version, WayPoint};
use gpxkit_test::{arb_gpx, arb_way_point, generate, FixtureConfig};
use gpxkit_wire::{decode_document, encode_document, read_tagged, write_tagged, Value};
use proptest::prelude::*;

#[test]
fn test_full_and_bare_documents() {
    for version in Version::ALL {
        for config in [FixtureConfig::full(), FixtureConfig::bare(), FixtureConfig::heavy()] {
            let gpx = generate(config, version).unwrap();
            let bytes = encode_document(&gpx);
            assert_eq!(decode_document(&bytes).unwrap(), gpx);
        }
    }
}

#[test]
fn test_every_truncation_fails() {
    let gpx = generate(FixtureConfig::light(), Version::V11).unwrap();
    let bytes = encode_document(&gpx);
    for len in 0..bytes.len() {
        assert!(decode_document(&bytes[..len]).is_err(), "prefix of {} bytes", len);
    }
}

#[test]
fn test_unknown_tag() {
    let gpx = generate(FixtureConfig::bare(), Version::V11).unwrap();
    let mut bytes = encode_document(&gpx).to_vec();
    bytes[4] = 0xEE;
    assert!(matches!(
        decode_document(&bytes),
        Err(GpxError::UnknownTypeTag(0xEE))
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_document_round_trip(gpx in arb_gpx(Version::V11)) {
        prop_assert_eq!(decode_document(&encode_document(&gpx)).unwrap(), gpx);
    }

    #[test]
    fn prop_v10_document_round_trip(gpx in arb_gpx(Version::V10)) {
        prop_assert_eq!(decode_document(&encode_document(&gpx)).unwrap(), gpx);
    }

    #[test]
    fn prop_tagged_way_point(point in arb_way_point()) {
        let mut buf = BytesMut::new();
        write_tagged(&mut buf, &Value::from(point.clone()));
        let mut bytes: Bytes = buf.freeze();
        let value = read_tagged(&mut bytes).unwrap();
        prop_assert_eq!(value, Value::WayPoint(point));
        prop_assert!(bytes.is_empty());
    }

    #[test]
    fn prop_garbage_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = decode_document(&bytes);
    }
}

#[test]
fn test_way_point_value_tag() {
    let value = Value::from(WayPoint::of(1.0, 2.0).unwrap());
    assert_eq!(value.tag().to_byte(), gpxkit_wire::TypeTag::WayPoint.to_byte());
}
