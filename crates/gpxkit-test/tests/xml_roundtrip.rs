//! XML round trips: read(write(G, V), V) == G for graphs legal in V

use std::time::Duration;

use gpxkit_core::{Copyright, Gpx, Latitude, Longitude, Metadata, Mode, Version, WayPoint};
use gpxkit_test::{arb_gpx, arb_way_point_gpx, generate, FixtureConfig};
use gpxkit_xml::{GpxReader, GpxWriter, Indent, WriterConfig};
use proptest::prelude::*;

fn round_trip(gpx: &Gpx, writer: &GpxWriter) -> Gpx {
    let version = writer.config().version;
    let xml = writer.write_to_string(gpx).unwrap();
    GpxReader::new(version, Mode::Strict).read_str(&xml).unwrap()
}

fn writers(version: Version) -> Vec<GpxWriter> {
    [Indent::None, Indent::space2(), Indent::tab(), Indent::Lines(String::new())]
        .into_iter()
        .map(|indent| {
            GpxWriter::with_config(WriterConfig {
                indent,
                maximum_fraction_digits: None,
                version,
            })
        })
        .collect()
}

#[test]
fn test_full_and_bare_documents() {
    for version in Version::ALL {
        for config in [FixtureConfig::full(), FixtureConfig::bare(), FixtureConfig::default()] {
            let gpx = generate(config, version).unwrap();
            for writer in writers(version) {
                assert_eq!(round_trip(&gpx, &writer), gpx, "GPX {} {:?}", version, writer.config().indent);
            }
        }
    }
}

#[test]
fn test_v11_graph_written_as_v10_loses_only_v11_data() {
    let gpx = generate(FixtureConfig::full(), Version::V11).unwrap();
    let writer = GpxWriter::new(Indent::None, None).with_version(Version::V10);
    let back = round_trip(&gpx, &writer);
    assert_eq!(back.version(), Version::V10);
    assert_eq!(back.way_points().len(), gpx.way_points().len());
    for (read, written) in back.way_points().iter().zip(gpx.way_points()) {
        assert_eq!(read.lat(), written.lat());
        assert_eq!(read.name(), written.name());
        assert!(read.links().len() <= 1);
    }
    let metadata = back.metadata().unwrap();
    assert!(metadata.copyright().is_none());
    assert!(metadata.links().is_empty());
}

#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fixture.gpx");
    let gpx = generate(FixtureConfig::default(), Version::V11).unwrap();
    gpxkit_xml::write(&gpx, &path).unwrap();
    assert_eq!(gpxkit_xml::read(&path).unwrap(), gpx);
}

fn strict_round_trip(gpx: &Gpx) {
    for version in Version::ALL {
        for writer in writers(version) {
            assert_eq!(&round_trip(gpx, &writer), gpx, "GPX {} {:?}", version, writer.config().indent);
        }
    }
}

#[test]
fn test_padded_strings_keep_their_whitespace() {
    let point = WayPoint::builder(Latitude::from_degrees(48.2).unwrap(), Longitude::from_degrees(16.37).unwrap())
        .name(Some("  Vienna ".to_string()))
        .comment(Some(" ".to_string()))
        .description(Some("two\n lines".to_string()))
        .build();
    let gpx = Gpx::builder().creator(" gpxkit ").way_points(vec![point]).build();
    strict_round_trip(&gpx);
}

#[test]
fn test_empty_strings_are_present() {
    let point = WayPoint::builder(Latitude::from_degrees(1.0).unwrap(), Longitude::from_degrees(2.0).unwrap())
        .name(Some(String::new()))
        .symbol(Some(String::new()))
        .build();
    let metadata = Metadata::builder()
        .name(Some(String::new()))
        .copyright(Some(Copyright::new("", Some(2020), None)))
        .build();
    let gpx = Gpx::builder()
        .creator("")
        .metadata(Some(metadata))
        .way_points(vec![point])
        .build();

    let writer = GpxWriter::default();
    let xml = writer.write_to_string(&gpx).unwrap();
    assert!(xml.contains(r#"<copyright author="">"#), "{}", xml);
    assert_eq!(round_trip(&gpx, &writer), gpx);
}

#[test]
fn test_sub_microsecond_age_of_gps_data() {
    let point = WayPoint::builder(Latitude::from_degrees(1.0).unwrap(), Longitude::from_degrees(2.0).unwrap())
        .age_of_gps_data(Some(Duration::new(1, 123_456_789)))
        .build();
    let gpx = Gpx::builder().creator("c").way_points(vec![point]).build();
    let xml = GpxWriter::default().write_to_string(&gpx).unwrap();
    assert!(xml.contains("<ageofdgpsdata>1.123456789</ageofdgpsdata>"), "{}", xml);
    strict_round_trip(&gpx);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_v11_round_trip(gpx in arb_gpx(Version::V11)) {
        let writer = GpxWriter::default();
        prop_assert_eq!(round_trip(&gpx, &writer), gpx);
    }

    #[test]
    fn prop_v10_round_trip(gpx in arb_gpx(Version::V10)) {
        let writer = GpxWriter::new(Indent::None, None).with_version(Version::V10);
        prop_assert_eq!(round_trip(&gpx, &writer), gpx);
    }

    #[test]
    fn prop_way_points_round_trip(gpx in arb_way_point_gpx()) {
        let writer = GpxWriter::new(Indent::space4(), None);
        prop_assert_eq!(round_trip(&gpx, &writer), gpx);
    }
}
