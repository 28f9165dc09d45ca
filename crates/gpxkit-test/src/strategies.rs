//! Proptest strategies for GPX values and documents

use gpxkit_core::{
    Degrees, Extensions, Fix, Gpx, Latitude, Length, Longitude, Version, WayPoint, XmlElement,
};
use proptest::prelude::*;

use crate::fixtures::{FixtureConfig, FixtureGenerator};

pub fn arb_latitude() -> impl Strategy<Value = Latitude> {
    (-90.0..=90.0f64).prop_filter_map("latitude", |d| Latitude::from_degrees(d).ok())
}

pub fn arb_longitude() -> impl Strategy<Value = Longitude> {
    (-180.0..180.0f64).prop_filter_map("longitude", |d| Longitude::from_degrees(d).ok())
}

pub fn arb_degrees() -> impl Strategy<Value = Degrees> {
    (0.0..360.0f64).prop_filter_map("degrees", |d| Degrees::from_degrees(d).ok())
}

pub fn arb_length() -> impl Strategy<Value = Length> {
    (-1.0e4..1.0e5f64).prop_filter_map("length", |m| Length::from_meters(m).ok())
}

pub fn arb_fix() -> impl Strategy<Value = Fix> {
    prop_oneof![
        Just(Fix::None),
        Just(Fix::TwoD),
        Just(Fix::ThreeD),
        Just(Fix::Dgps),
        Just(Fix::Pps),
    ]
}

/// Any string value, including empty, blank and padded text and markup characters
pub fn arb_text() -> impl Strategy<Value = String> {
    "[ a-zA-Z0-9<>&\"]{0,20}"
}

/// Extension leaf text; whitespace-only nodes are dropped when captured
fn arb_leaf_text() -> impl Strategy<Value = String> {
    "[ a-zA-Z0-9<>&\"]{0,20}[a-zA-Z0-9<>&\"][ a-zA-Z0-9<>&\"]{0,4}"
}

/// Extension tree of namespaced elements with text leaves
pub fn arb_extensions() -> impl Strategy<Value = Extensions> {
    prop::collection::vec(("[a-z]{1,8}", arb_leaf_text()), 1..4).prop_map(|children| {
        children.into_iter().fold(
            Extensions::new().with_namespace("p", "urn:example:p"),
            |extensions, (name, text)| {
                extensions.with_child(XmlElement::new(format!("p:{}", name)).with_text(text))
            },
        )
    })
}

prop_compose! {
    /// Way-point legal in GPX 1.1
    pub fn arb_way_point()(
        lat in arb_latitude(),
        lon in arb_longitude(),
        ele in prop::option::of(arb_length()),
        magvar in prop::option::of(arb_degrees()),
        name in prop::option::of(arb_text()),
        fix in prop::option::of(arb_fix()),
        hdop in prop::option::of(0.0..100.0f64),
        extensions in prop::option::of(arb_extensions()),
    ) -> WayPoint {
        WayPoint::builder(lat, lon)
            .ele(ele)
            .magvar(magvar)
            .name(name)
            .fix(fix)
            .hdop(hdop)
            .extensions(extensions)
            .build()
    }
}

/// Generated document legal in `version`
pub fn arb_gpx(version: Version) -> impl Strategy<Value = Gpx> {
    (any::<u64>(), 0.0..=1.0f64).prop_filter_map("fixture", move |(seed, optional_prob)| {
        let config = FixtureConfig {
            optional_prob,
            ..FixtureConfig::light().with_seed(seed)
        };
        FixtureGenerator::new(config).gpx(version).ok()
    })
}

/// Small document made of arbitrary way-points
pub fn arb_way_point_gpx() -> impl Strategy<Value = Gpx> {
    (prop::collection::vec(arb_way_point(), 0..8), arb_text()).prop_map(|(points, creator)| {
        Gpx::builder().creator(creator).way_points(points).build()
    })
}
