//! Lenient and strict reading of the same documents

use gpxkit_core::{GpxError, Mode, Version};
use gpxkit_test::{arb_gpx, generate, FixtureConfig};
use gpxkit_xml::{GpxReader, GpxWriter, Indent};
use proptest::prelude::*;

fn read(xml: &str, mode: Mode) -> Result<gpxkit_core::Gpx, GpxError> {
    GpxReader::new(Version::V11, mode).read_str(xml)
}

/// Insert `snippet` right after the start tag that begins with `anchor`
fn inject(xml: &str, anchor: &str, snippet: &str) -> Option<String> {
    let start = xml.find(anchor)?;
    let at = start + xml[start..].find('>')? + 1;
    Some(format!("{}{}{}", &xml[..at], snippet, &xml[at..]))
}

#[test]
fn test_out_of_range_latitude() {
    let xml = r#"<gpx version="1.1" creator="c">
        <wpt lat="10" lon="10"><name>first</name></wpt>
        <wpt lat="-95.0" lon="10"><name>bad</name></wpt>
        <wpt lat="30" lon="10"><name>third</name></wpt>
    </gpx>"#;
    match read(xml, Mode::Strict) {
        Err(GpxError::InvalidValue { name, source }) => {
            assert_eq!(name, "wpt");
            match *source {
                GpxError::InvalidValue { name, source } => {
                    assert_eq!(name, "lat");
                    assert!(matches!(*source, GpxError::OutOfRange { .. }));
                }
                other => panic!("unexpected {:?}", other),
            }
        }
        other => panic!("unexpected {:?}", other),
    }
    let gpx = read(xml, Mode::Lenient).unwrap();
    let names: Vec<_> = gpx.way_points().iter().filter_map(|p| p.name()).collect();
    assert_eq!(names, vec!["first", "third"]);
}

#[test]
fn test_unknown_metadata_child() {
    let xml = r#"<gpx version="1.1" creator="c"><metadata>
        <name>n</name><rating stars="5"><why>nice</why></rating><keywords>k</keywords>
    </metadata></gpx>"#;
    assert!(matches!(
        read(xml, Mode::Strict),
        Err(GpxError::UnexpectedElement(ref name)) if name == "rating"
    ));
    let gpx = read(xml, Mode::Lenient).unwrap();
    let metadata = gpx.metadata().unwrap();
    assert_eq!(metadata.name(), Some("n"));
    assert_eq!(metadata.keywords(), Some("k"));
}

#[test]
fn test_course_depends_on_version() {
    let xml = r#"<gpx creator="c"><trk><trkseg>
        <trkpt lat="1" lon="2"><course>341.6</course></trkpt>
    </trkseg></trk></gpx>"#;
    let v10 = GpxReader::new(Version::V10, Mode::Strict).read_str(xml).unwrap();
    let point = v10.tracks()[0].points().next().unwrap();
    assert_eq!(point.course().map(|c| c.to_degrees()), Some(341.6));

    let v11 = GpxReader::new(Version::V11, Mode::Lenient).read_str(xml).unwrap();
    let point = v11.tracks()[0].points().next().unwrap();
    assert_eq!(point.course(), None);
}

#[test]
fn test_premature_end_in_both_modes() {
    let gpx = generate(FixtureConfig::light(), Version::V11).unwrap();
    let xml = GpxWriter::default().write_to_string(&gpx).unwrap();
    let cut = &xml[..xml.len() / 2];
    for mode in [Mode::Strict, Mode::Lenient] {
        assert!(read(cut, mode).is_err());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_lenient_accepts_what_strict_accepts(gpx in arb_gpx(Version::V11)) {
        let xml = GpxWriter::new(Indent::space2(), None).write_to_string(&gpx).unwrap();
        let strict = read(&xml, Mode::Strict).unwrap();
        let lenient = read(&xml, Mode::Lenient).unwrap();
        prop_assert_eq!(&strict, &lenient);
        prop_assert_eq!(strict, gpx);
    }

    #[test]
    fn prop_lenient_ignores_unknown_elements(
        gpx in arb_gpx(Version::V11),
        anchor in prop::sample::select(vec!["<wpt ", "<trkseg>", "<rte>", "<metadata>"]),
    ) {
        let xml = GpxWriter::new(Indent::None, None).write_to_string(&gpx).unwrap();
        let corrupted = inject(&xml, anchor, "<vendor><data>1</data></vendor>");
        prop_assume!(corrupted.is_some());
        let corrupted = corrupted.unwrap();
        prop_assert!(matches!(
            read(&corrupted, Mode::Strict),
            Err(GpxError::UnexpectedElement(ref name)) if name == "vendor"
        ));
        prop_assert_eq!(read(&corrupted, Mode::Lenient).unwrap(), gpx);
    }
}
