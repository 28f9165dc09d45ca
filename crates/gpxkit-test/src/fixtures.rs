//! Random GPX graphs
//!
//! Graphs generated for a version only use what that version can carry,
//! so they survive an XML round trip through it unchanged. Strings are
//! made of words; padded and empty strings come from the proptest
//! strategies.

use std::time::Duration;

use chrono::{DateTime, Utc};
use gpxkit_core::{
    Bounds, Copyright, Degrees, DgpsStation, Email, Extensions, Fix, Gpx, GpxResult, Latitude,
    Length, Link, Longitude, Metadata, Person, Route, Speed, Track, TrackSegment, UInt, Version,
    WayPoint, XmlElement,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const WORDS: &[&str] = &[
    "alpine", "brook", "cairn", "delta", "ridge", "fjord", "glacier", "heath", "inlet", "junction",
    "karst", "lagoon", "moraine", "notch", "oasis", "pass", "quarry", "ravine", "saddle", "tarn",
];

/// Fixture configuration
#[derive(Clone, Debug)]
pub struct FixtureConfig {
    /// Number of top-level way-points
    pub way_points: usize,
    /// Number of routes
    pub routes: usize,
    /// Points per route
    pub route_points: usize,
    /// Number of tracks
    pub tracks: usize,
    /// Segments per track
    pub segments: usize,
    /// Points per segment
    pub segment_points: usize,
    /// Probability of each optional field being present (0.0 - 1.0)
    pub optional_prob: f64,
    /// Random seed
    pub seed: u64,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        FixtureConfig {
            way_points: 20,
            routes: 3,
            route_points: 20,
            tracks: 2,
            segments: 3,
            segment_points: 100,
            optional_prob: 0.5,
            seed: 42,
        }
    }
}

impl FixtureConfig {
    /// Small documents for property tests
    pub fn light() -> Self {
        FixtureConfig {
            way_points: 3,
            routes: 1,
            route_points: 3,
            tracks: 1,
            segments: 2,
            segment_points: 4,
            optional_prob: 0.5,
            seed: 42,
        }
    }

    /// Large documents for benchmarks
    pub fn heavy() -> Self {
        FixtureConfig {
            way_points: 200,
            routes: 10,
            route_points: 100,
            tracks: 5,
            segments: 5,
            segment_points: 1000,
            optional_prob: 0.7,
            seed: 42,
        }
    }

    /// Every optional field present
    pub fn full() -> Self {
        FixtureConfig {
            optional_prob: 1.0,
            ..FixtureConfig::light()
        }
    }

    /// Every optional field absent
    pub fn bare() -> Self {
        FixtureConfig {
            optional_prob: 0.0,
            ..FixtureConfig::light()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Seeded generator of GPX graphs
pub struct FixtureGenerator {
    config: FixtureConfig,
    rng: StdRng,
}

impl FixtureGenerator {
    pub fn new(config: FixtureConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        FixtureGenerator { config, rng }
    }

    fn some<T>(&mut self, value: impl FnOnce(&mut Self) -> GpxResult<T>) -> GpxResult<Option<T>> {
        if self.rng.gen_bool(self.config.optional_prob) {
            value(self).map(Some)
        } else {
            Ok(None)
        }
    }

    fn word(&mut self) -> String {
        WORDS[self.rng.gen_range(0..WORDS.len())].to_string()
    }

    fn text(&mut self) -> String {
        let count = self.rng.gen_range(1..4);
        (0..count).map(|_| self.word()).collect::<Vec<_>>().join(" ")
    }

    fn time(&mut self) -> DateTime<Utc> {
        let secs = self.rng.gen_range(0..4_000_000_000i64);
        let millis = self.rng.gen_range(0..1000u32);
        DateTime::from_timestamp(secs, millis * 1_000_000).unwrap_or_default()
    }

    fn latitude(&mut self) -> GpxResult<Latitude> {
        Latitude::from_degrees(self.rng.gen_range(-90.0..=90.0))
    }

    fn longitude(&mut self) -> GpxResult<Longitude> {
        Longitude::from_degrees(self.rng.gen_range(-180.0..180.0))
    }

    fn degrees(&mut self) -> GpxResult<Degrees> {
        Degrees::from_degrees(self.rng.gen_range(0.0..360.0))
    }

    fn length(&mut self) -> GpxResult<Length> {
        Length::from_meters(self.rng.gen_range(-400.0..9000.0))
    }

    fn dop(&mut self) -> f64 {
        self.rng.gen_range(0.5..50.0)
    }

    pub fn email(&mut self) -> GpxResult<Email> {
        let id = self.word();
        let domain = format!("{}.example", self.word());
        Email::new(id, domain)
    }

    /// Link for `version`: 1.0 links have no type
    pub fn link(&mut self, version: Version) -> GpxResult<Link> {
        let href = format!("https://example.com/{}", self.word());
        let text = self.some(|g| Ok(g.text()))?;
        let link_type = match version {
            Version::V10 => None,
            Version::V11 => self.some(|_| Ok("text/html".to_string()))?,
        };
        Link::of(href, text, link_type)
    }

    fn links(&mut self, version: Version) -> GpxResult<Vec<Link>> {
        let max = match version {
            Version::V10 => 1,
            Version::V11 => 3,
        };
        let count = self.rng.gen_range(0..=max);
        (0..count).map(|_| self.link(version)).collect()
    }

    /// Extension tree with a namespaced element
    pub fn extensions(&mut self) -> Extensions {
        let value = self.rng.gen_range(40..200u32).to_string();
        let unit = self.word();
        Extensions::new()
            .with_namespace("x", "urn:example:x")
            .with_child(
                XmlElement::new("x:sample")
                    .with_attribute("unit", unit)
                    .with_child(XmlElement::new("x:value").with_text(value)),
            )
    }

    pub fn bounds(&mut self) -> GpxResult<Bounds> {
        Ok(Bounds::new(
            self.latitude()?,
            self.longitude()?,
            self.latitude()?,
            self.longitude()?,
        ))
    }

    pub fn person(&mut self, version: Version) -> GpxResult<Person> {
        Ok(Person::new(
            self.some(|g| Ok(g.text()))?,
            self.some(|g| g.email())?,
            self.some(|g| g.link(version))?,
        ))
    }

    /// Metadata for `version`; 1.0 has no copyright, links or extensions
    pub fn metadata(&mut self, version: Version) -> GpxResult<Metadata> {
        let builder = Metadata::builder()
            .name(self.some(|g| Ok(g.text()))?)
            .description(self.some(|g| Ok(g.text()))?)
            .author(self.some(|g| g.person(version))?)
            .time(self.some(|g| Ok(g.time()))?)
            .keywords(self.some(|g| Ok(g.text()))?)
            .bounds(self.some(|g| g.bounds())?);
        Ok(match version {
            Version::V10 => builder.build(),
            Version::V11 => builder
                .copyright(self.some(|g| {
                    Ok(Copyright::new(
                        g.word(),
                        Some(g.rng.gen_range(1990..2030)),
                        Some(format!("https://example.com/license/{}", g.word())),
                    ))
                })?)
                .links(self.links(version)?)
                .extensions(self.some(|g| Ok(g.extensions()))?)
                .build(),
        })
    }

    /// Way-point for `version`; only 1.0 points carry a course
    pub fn way_point(&mut self, version: Version) -> GpxResult<WayPoint> {
        let course = match version {
            Version::V10 => self.some(|g| g.degrees())?,
            Version::V11 => None,
        };
        Ok(WayPoint::builder(self.latitude()?, self.longitude()?)
            .ele(self.some(|g| g.length())?)
            .speed(self.some(|g| Speed::from_meters_per_second(g.rng.gen_range(0.0..80.0)))?)
            .time(self.some(|g| Ok(g.time()))?)
            .course(course)
            .magvar(self.some(|g| g.degrees())?)
            .geoid_height(self.some(|g| g.length())?)
            .name(self.some(|g| Ok(g.text()))?)
            .comment(self.some(|g| Ok(g.text()))?)
            .description(self.some(|g| Ok(g.text()))?)
            .source(self.some(|g| Ok(g.word()))?)
            .links(self.links(version)?)
            .symbol(self.some(|g| Ok(g.word()))?)
            .point_type(self.some(|g| Ok(g.word()))?)
            .fix(self.some(|g| Ok(Fix::from_byte(g.rng.gen_range(0..5)).unwrap_or(Fix::None)))?)
            .sat(self.some(|g| Ok(UInt::new(g.rng.gen_range(0..24))))?)
            .hdop(self.some(|g| Ok(g.dop()))?)
            .vdop(self.some(|g| Ok(g.dop()))?)
            .pdop(self.some(|g| Ok(g.dop()))?)
            .age_of_gps_data(self.some(|g| Ok(Duration::new(g.rng.gen_range(0..600), g.rng.gen_range(0..1_000_000_000))))?)
            .dgps_id(self.some(|g| DgpsStation::new(g.rng.gen_range(0..=1023)))?)
            .extensions(self.some(|g| Ok(g.extensions()))?)
            .build())
    }

    fn points(&mut self, count: usize, version: Version) -> GpxResult<Vec<WayPoint>> {
        (0..count).map(|_| self.way_point(version)).collect()
    }

    pub fn route(&mut self, version: Version) -> GpxResult<Route> {
        let points = self.points(self.config.route_points, version)?;
        Ok(Route::builder()
            .name(self.some(|g| Ok(g.text()))?)
            .comment(self.some(|g| Ok(g.text()))?)
            .description(self.some(|g| Ok(g.text()))?)
            .source(self.some(|g| Ok(g.word()))?)
            .links(self.links(version)?)
            .number(self.some(|g| Ok(UInt::new(g.rng.gen())))?)
            .route_type(self.some(|g| Ok(g.word()))?)
            .extensions(self.some(|g| Ok(g.extensions()))?)
            .points(points)
            .build())
    }

    pub fn track(&mut self, version: Version) -> GpxResult<Track> {
        let mut segments = Vec::with_capacity(self.config.segments);
        for _ in 0..self.config.segments {
            let points = self.points(self.config.segment_points, version)?;
            let extensions = self.some(|g| Ok(g.extensions()))?;
            segments.push(TrackSegment::new(points, extensions));
        }
        Ok(Track::builder()
            .name(self.some(|g| Ok(g.text()))?)
            .comment(self.some(|g| Ok(g.text()))?)
            .description(self.some(|g| Ok(g.text()))?)
            .source(self.some(|g| Ok(g.word()))?)
            .links(self.links(version)?)
            .number(self.some(|g| Ok(UInt::new(g.rng.gen())))?)
            .track_type(self.some(|g| Ok(g.word()))?)
            .extensions(self.some(|g| Ok(g.extensions()))?)
            .segments(segments)
            .build())
    }

    /// Whole document legal in `version`
    pub fn gpx(&mut self, version: Version) -> GpxResult<Gpx> {
        let creator = self.word();
        let metadata = self.some(|g| g.metadata(version))?;
        let way_points = self.points(self.config.way_points, version)?;
        let routes = (0..self.config.routes)
            .map(|_| self.route(version))
            .collect::<GpxResult<Vec<_>>>()?;
        let tracks = (0..self.config.tracks)
            .map(|_| self.track(version))
            .collect::<GpxResult<Vec<_>>>()?;
        Ok(Gpx::builder()
            .version(version)
            .creator(creator)
            .metadata(metadata)
            .way_points(way_points)
            .routes(routes)
            .tracks(tracks)
            .extensions(self.some(|g| Ok(g.extensions()))?)
            .build())
    }
}

/// Document legal in `version` generated from `config`
pub fn generate(config: FixtureConfig, version: Version) -> GpxResult<Gpx> {
    FixtureGenerator::new(config).gpx(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_deterministic() {
        let a = generate(FixtureConfig::light(), Version::V11).unwrap();
        let b = generate(FixtureConfig::light(), Version::V11).unwrap();
        assert_eq!(a, b);
        let c = generate(FixtureConfig::light().with_seed(7), Version::V11).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_sizes() {
        let gpx = generate(FixtureConfig::light(), Version::V11).unwrap();
        assert_eq!(gpx.way_points().len(), 3);
        assert_eq!(gpx.routes()[0].points().len(), 3);
        assert_eq!(gpx.tracks()[0].segments().len(), 2);
        assert_eq!(gpx.tracks()[0].points().count(), 8);
    }

    #[test]
    fn test_version_restrictions() {
        let v10 = generate(FixtureConfig::full(), Version::V10).unwrap();
        assert_eq!(v10.version(), Version::V10);
        assert!(v10.way_points().iter().all(|p| p.course().is_some() && p.links().len() <= 1));
        let metadata = v10.metadata().unwrap();
        assert!(metadata.copyright().is_none() && metadata.links().is_empty());

        let v11 = generate(FixtureConfig::full(), Version::V11).unwrap();
        assert!(v11.way_points().iter().all(|p| p.course().is_none()));
    }

    #[test]
    fn test_bare_has_no_optional_fields() {
        let gpx = generate(FixtureConfig::bare(), Version::V11).unwrap();
        assert!(gpx.metadata().is_none());
        assert!(gpx.extensions().is_none());
        assert!(gpx.way_points().iter().all(|p| p.name().is_none() && p.ele().is_none()));
    }
}
