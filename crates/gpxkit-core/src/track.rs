//! Tracks and track segments

use crate::{Extensions, Link, UInt, WayPoint};

/// A continuous span of track points
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackSegment {
    points: Vec<WayPoint>,
    extensions: Option<Extensions>,
}

impl TrackSegment {
    pub fn new(points: Vec<WayPoint>, extensions: Option<Extensions>) -> Self {
        TrackSegment { points, extensions }
    }

    pub fn of(points: Vec<WayPoint>) -> Self {
        TrackSegment::new(points, None)
    }

    pub fn points(&self) -> &[WayPoint] {
        &self.points
    }

    pub fn extensions(&self) -> Option<&Extensions> {
        self.extensions.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.extensions.is_none()
    }
}

/// An ordered list of segments describing a recorded path
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Track {
    name: Option<String>,
    comment: Option<String>,
    description: Option<String>,
    source: Option<String>,
    links: Vec<Link>,
    number: Option<UInt>,
    track_type: Option<String>,
    extensions: Option<Extensions>,
    segments: Vec<TrackSegment>,
}

impl Track {
    pub fn builder() -> TrackBuilder {
        TrackBuilder::default()
    }

    pub fn to_builder(&self) -> TrackBuilder {
        TrackBuilder {
            track: self.clone(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn number(&self) -> Option<UInt> {
        self.number
    }

    pub fn track_type(&self) -> Option<&str> {
        self.track_type.as_deref()
    }

    pub fn extensions(&self) -> Option<&Extensions> {
        self.extensions.as_ref()
    }

    pub fn segments(&self) -> &[TrackSegment] {
        &self.segments
    }

    /// All points of all segments, in order
    pub fn points(&self) -> impl Iterator<Item = &WayPoint> {
        self.segments.iter().flat_map(|segment| segment.points().iter())
    }
}

/// Builder for [`Track`]
#[derive(Clone, Debug, Default)]
pub struct TrackBuilder {
    track: Track,
}

impl TrackBuilder {
    pub fn name(mut self, name: Option<String>) -> Self {
        self.track.name = name;
        self
    }

    pub fn comment(mut self, comment: Option<String>) -> Self {
        self.track.comment = comment;
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.track.description = description;
        self
    }

    pub fn source(mut self, source: Option<String>) -> Self {
        self.track.source = source;
        self
    }

    pub fn links(mut self, links: Vec<Link>) -> Self {
        self.track.links = links;
        self
    }

    pub fn number(mut self, number: Option<UInt>) -> Self {
        self.track.number = number;
        self
    }

    pub fn track_type(mut self, track_type: Option<String>) -> Self {
        self.track.track_type = track_type;
        self
    }

    pub fn extensions(mut self, extensions: Option<Extensions>) -> Self {
        self.track.extensions = extensions;
        self
    }

    pub fn segments(mut self, segments: Vec<TrackSegment>) -> Self {
        self.track.segments = segments;
        self
    }

    pub fn add_segment(mut self, segment: TrackSegment) -> Self {
        self.track.segments.push(segment);
        self
    }

    pub fn build(self) -> Track {
        self.track
    }
}
