//! Root of the GPX domain graph

use crate::{Extensions, Metadata, Route, Track, Version, WayPoint};

/// Creator written by documents built without an explicit creator
pub const DEFAULT_CREATOR: &str = concat!("gpxkit ", env!("CARGO_PKG_VERSION"));

/// A GPX document
#[derive(Clone, Debug, PartialEq)]
pub struct Gpx {
    version: Version,
    creator: String,
    metadata: Option<Metadata>,
    way_points: Vec<WayPoint>,
    routes: Vec<Route>,
    tracks: Vec<Track>,
    extensions: Option<Extensions>,
}

impl Gpx {
    pub fn builder() -> GpxBuilder {
        GpxBuilder {
            gpx: Gpx {
                version: Version::default(),
                creator: DEFAULT_CREATOR.to_string(),
                metadata: None,
                way_points: Vec::new(),
                routes: Vec::new(),
                tracks: Vec::new(),
                extensions: None,
            },
        }
    }

    pub fn to_builder(&self) -> GpxBuilder {
        GpxBuilder { gpx: self.clone() }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn creator(&self) -> &str {
        &self.creator
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    pub fn way_points(&self) -> &[WayPoint] {
        &self.way_points
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn extensions(&self) -> Option<&Extensions> {
        self.extensions.as_ref()
    }
}

impl Default for Gpx {
    fn default() -> Self {
        Gpx::builder().build()
    }
}

/// Builder for [`Gpx`]
#[derive(Clone, Debug)]
pub struct GpxBuilder {
    gpx: Gpx,
}

impl GpxBuilder {
    pub fn version(mut self, version: Version) -> Self {
        self.gpx.version = version;
        self
    }

    pub fn creator(mut self, creator: impl Into<String>) -> Self {
        self.gpx.creator = creator.into();
        self
    }

    /// Empty metadata is stored as absent
    pub fn metadata(mut self, metadata: Option<Metadata>) -> Self {
        self.gpx.metadata = metadata.filter(|metadata| !metadata.is_empty());
        self
    }

    pub fn way_points(mut self, way_points: Vec<WayPoint>) -> Self {
        self.gpx.way_points = way_points;
        self
    }

    pub fn add_way_point(mut self, point: WayPoint) -> Self {
        self.gpx.way_points.push(point);
        self
    }

    pub fn routes(mut self, routes: Vec<Route>) -> Self {
        self.gpx.routes = routes;
        self
    }

    pub fn add_route(mut self, route: Route) -> Self {
        self.gpx.routes.push(route);
        self
    }

    pub fn tracks(mut self, tracks: Vec<Track>) -> Self {
        self.gpx.tracks = tracks;
        self
    }

    pub fn add_track(mut self, track: Track) -> Self {
        self.gpx.tracks.push(track);
        self
    }

    pub fn extensions(mut self, extensions: Option<Extensions>) -> Self {
        self.gpx.extensions = extensions;
        self
    }

    pub fn build(self) -> Gpx {
        self.gpx
    }
}
