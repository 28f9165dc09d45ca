//! Way-points, route points and track points

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::{
    Degrees, DgpsStation, Extensions, Fix, GpxResult, Latitude, Length, Link, Longitude, Speed,
    UInt,
};

/// A geo-referenced point with optional measurement data
///
/// The same record backs `wpt`, `rtept` and `trkpt` elements.
#[derive(Clone, Debug, PartialEq)]
pub struct WayPoint {
    lat: Latitude,
    lon: Longitude,
    ele: Option<Length>,
    speed: Option<Speed>,
    time: Option<DateTime<Utc>>,
    course: Option<Degrees>,
    magvar: Option<Degrees>,
    geoid_height: Option<Length>,
    name: Option<String>,
    comment: Option<String>,
    description: Option<String>,
    source: Option<String>,
    links: Vec<Link>,
    symbol: Option<String>,
    point_type: Option<String>,
    fix: Option<Fix>,
    sat: Option<UInt>,
    hdop: Option<f64>,
    vdop: Option<f64>,
    pdop: Option<f64>,
    age_of_gps_data: Option<Duration>,
    dgps_id: Option<DgpsStation>,
    extensions: Option<Extensions>,
}

impl WayPoint {
    pub fn new(lat: Latitude, lon: Longitude) -> Self {
        WayPoint::builder(lat, lon).build()
    }

    /// Create a point from raw degrees
    pub fn of(lat: f64, lon: f64) -> GpxResult<Self> {
        Ok(WayPoint::new(
            Latitude::from_degrees(lat)?,
            Longitude::from_degrees(lon)?,
        ))
    }

    pub fn builder(lat: Latitude, lon: Longitude) -> WayPointBuilder {
        WayPointBuilder {
            point: WayPoint {
                lat,
                lon,
                ele: None,
                speed: None,
                time: None,
                course: None,
                magvar: None,
                geoid_height: None,
                name: None,
                comment: None,
                description: None,
                source: None,
                links: Vec::new(),
                symbol: None,
                point_type: None,
                fix: None,
                sat: None,
                hdop: None,
                vdop: None,
                pdop: None,
                age_of_gps_data: None,
                dgps_id: None,
                extensions: None,
            },
        }
    }

    pub fn to_builder(&self) -> WayPointBuilder {
        WayPointBuilder { point: self.clone() }
    }

    pub fn lat(&self) -> Latitude {
        self.lat
    }

    pub fn lon(&self) -> Longitude {
        self.lon
    }

    /// Elevation
    pub fn ele(&self) -> Option<Length> {
        self.ele
    }

    pub fn speed(&self) -> Option<Speed> {
        self.speed
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.time
    }

    /// Instantaneous course (GPX 1.0 only)
    pub fn course(&self) -> Option<Degrees> {
        self.course
    }

    /// Magnetic variation
    pub fn magvar(&self) -> Option<Degrees> {
        self.magvar
    }

    /// Height of the geoid above the WGS84 ellipsoid
    pub fn geoid_height(&self) -> Option<Length> {
        self.geoid_height
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

    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    pub fn point_type(&self) -> Option<&str> {
        self.point_type.as_deref()
    }

    pub fn fix(&self) -> Option<Fix> {
        self.fix
    }

    pub fn sat(&self) -> Option<UInt> {
        self.sat
    }

    pub fn hdop(&self) -> Option<f64> {
        self.hdop
    }

    pub fn vdop(&self) -> Option<f64> {
        self.vdop
    }

    pub fn pdop(&self) -> Option<f64> {
        self.pdop
    }

    pub fn age_of_gps_data(&self) -> Option<Duration> {
        self.age_of_gps_data
    }

    pub fn dgps_id(&self) -> Option<DgpsStation> {
        self.dgps_id
    }

    pub fn extensions(&self) -> Option<&Extensions> {
        self.extensions.as_ref()
    }
}

/// Builder for [`WayPoint`]
#[derive(Clone, Debug)]
pub struct WayPointBuilder {
    point: WayPoint,
}

impl WayPointBuilder {
    pub fn lat(mut self, lat: Latitude) -> Self {
        self.point.lat = lat;
        self
    }

    pub fn lon(mut self, lon: Longitude) -> Self {
        self.point.lon = lon;
        self
    }

    pub fn ele(mut self, ele: Option<Length>) -> Self {
        self.point.ele = ele;
        self
    }

    pub fn speed(mut self, speed: Option<Speed>) -> Self {
        self.point.speed = speed;
        self
    }

    pub fn time(mut self, time: Option<DateTime<Utc>>) -> Self {
        self.point.time = time;
        self
    }

    pub fn course(mut self, course: Option<Degrees>) -> Self {
        self.point.course = course;
        self
    }

    pub fn magvar(mut self, magvar: Option<Degrees>) -> Self {
        self.point.magvar = magvar;
        self
    }

    pub fn geoid_height(mut self, geoid_height: Option<Length>) -> Self {
        self.point.geoid_height = geoid_height;
        self
    }

    pub fn name(mut self, name: Option<String>) -> Self {
        self.point.name = name;
        self
    }

    pub fn comment(mut self, comment: Option<String>) -> Self {
        self.point.comment = comment;
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.point.description = description;
        self
    }

    pub fn source(mut self, source: Option<String>) -> Self {
        self.point.source = source;
        self
    }

    pub fn links(mut self, links: Vec<Link>) -> Self {
        self.point.links = links;
        self
    }

    pub fn add_link(mut self, link: Link) -> Self {
        self.point.links.push(link);
        self
    }

    pub fn symbol(mut self, symbol: Option<String>) -> Self {
        self.point.symbol = symbol;
        self
    }

    pub fn point_type(mut self, point_type: Option<String>) -> Self {
        self.point.point_type = point_type;
        self
    }

    pub fn fix(mut self, fix: Option<Fix>) -> Self {
        self.point.fix = fix;
        self
    }

    pub fn sat(mut self, sat: Option<UInt>) -> Self {
        self.point.sat = sat;
        self
    }

    pub fn hdop(mut self, hdop: Option<f64>) -> Self {
        self.point.hdop = hdop;
        self
    }

    pub fn vdop(mut self, vdop: Option<f64>) -> Self {
        self.point.vdop = vdop;
        self
    }

    pub fn pdop(mut self, pdop: Option<f64>) -> Self {
        self.point.pdop = pdop;
        self
    }

    pub fn age_of_gps_data(mut self, age: Option<Duration>) -> Self {
        self.point.age_of_gps_data = age;
        self
    }

    pub fn dgps_id(mut self, dgps_id: Option<DgpsStation>) -> Self {
        self.point.dgps_id = dgps_id;
        self
    }

    pub fn extensions(mut self, extensions: Option<Extensions>) -> Self {
        self.point.extensions = extensions;
        self
    }

    pub fn build(self) -> WayPoint {
        self.point
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_of_validates_coordinates() {
        assert!(WayPoint::of(48.2, 16.4).is_ok());
        assert!(WayPoint::of(-95.0, 16.4).is_err());
        assert!(WayPoint::of(48.2, 180.0).is_err());
    }

    #[test]
    fn test_builder_sets_fields() {
        let point = WayPoint::builder(
            Latitude::from_degrees(48.2).unwrap(),
            Longitude::from_degrees(16.4).unwrap(),
        )
        .ele(Some(Length::from_meters(171.0).unwrap()))
        .name(Some("Stephansplatz".into()))
        .fix(Some(Fix::ThreeD))
        .hdop(Some(1.2))
        .build();

        assert_eq!(point.ele().unwrap().to_meters(), 171.0);
        assert_eq!(point.name(), Some("Stephansplatz"));
        assert_eq!(point.fix(), Some(Fix::ThreeD));
        assert_eq!(point.hdop(), Some(1.2));
        assert!(point.links().is_empty());
        assert!(point.course().is_none());
    }

    #[test]
    fn test_to_builder_roundtrip() {
        let point = WayPoint::of(1.0, 2.0).unwrap();
        let copy = point.to_builder().comment(Some("c".into())).build();
        assert_ne!(point, copy);
        assert_eq!(copy.to_builder().comment(None).build(), point);
    }
}
