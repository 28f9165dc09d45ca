//! Way-point codec, shared by `wpt`, `rtept` and `trkpt`
//!
//! GPX 1.0 points carry `course` and a single `url`/`urlname` pair; 1.1
//! points carry any number of `link` elements instead. The 1.0 pair maps
//! to the first link of the point.

use std::time::Duration;

use chrono::{DateTime, Utc};
use gpxkit_core::{
    Degrees, DgpsStation, Fix, GpxResult, Latitude, Length, Link, Longitude, Speed, UInt, Version,
    WayPoint,
};

use super::common;
use crate::reader::{self, Reader, Values};
use crate::writer::{self, Writer};
use crate::{ReaderTable, WriterTable};

pub(crate) fn table(version: Version) -> GpxResult<ReaderTable> {
    Ok(ReaderTable::new()
        .all(reader::attr::<Latitude>("lat"))
        .all(reader::attr::<Longitude>("lon"))
        .all(reader::elem_text::<Length>("ele"))
        .all(reader::elem_text::<Speed>("speed"))
        .all(reader::elem_text::<DateTime<Utc>>("time"))
        .v10(reader::elem_text::<Degrees>("course"))
        .all(reader::elem_text::<Degrees>("magvar"))
        .all(reader::elem_text::<Length>("geoidheight"))
        .all(reader::elem_text::<String>("name"))
        .all(reader::elem_text::<String>("cmt"))
        .all(reader::elem_text::<String>("desc"))
        .all(reader::elem_text::<String>("src"))
        .v11(reader::elems(common::link_reader(version)?))
        .v10(reader::elem_text::<String>("url"))
        .v10(reader::elem_text::<String>("urlname"))
        .all(reader::elem_text::<String>("sym"))
        .all(reader::elem_text::<String>("type"))
        .all(reader::elem_text::<Fix>("fix"))
        .all(reader::elem_text::<UInt>("sat"))
        .all(reader::elem_text::<f64>("hdop"))
        .all(reader::elem_text::<f64>("vdop"))
        .all(reader::elem_text::<f64>("pdop"))
        .all(reader::elem_text::<Duration>("ageofdgpsdata"))
        .all(reader::elem_text::<DgpsStation>("dgpsid"))
        .all(reader::doc("extensions")))
}

pub(crate) fn writers(version: Version) -> WriterTable<WayPoint> {
    WriterTable::new()
        .all(writer::attr::<Latitude>("lat").map_owned(|p: &WayPoint| Some(p.lat())))
        .all(writer::attr::<Longitude>("lon").map_owned(|p: &WayPoint| Some(p.lon())))
        .all(writer::elem_text::<Length>("ele").map_owned(WayPoint::ele))
        .all(writer::elem_text::<Speed>("speed").map_owned(WayPoint::speed))
        .all(writer::elem_text::<DateTime<Utc>>("time").map_owned(WayPoint::time))
        .v10(writer::elem_text::<Degrees>("course").map_owned(WayPoint::course))
        .all(writer::elem_text::<Degrees>("magvar").map_owned(WayPoint::magvar))
        .all(writer::elem_text::<Length>("geoidheight").map_owned(WayPoint::geoid_height))
        .all(writer::elem_str("name").map(WayPoint::name))
        .all(writer::elem_str("cmt").map(WayPoint::comment))
        .all(writer::elem_str("desc").map(WayPoint::description))
        .all(writer::elem_str("src").map(WayPoint::source))
        .v11(writer::elems(common::link_writer(version)).map(|p: &WayPoint| Some(p.links())))
        .v10(writer::elem_str("url").map(|p: &WayPoint| first_href(p.links())))
        .v10(writer::elem_str("urlname").map(|p: &WayPoint| first_text(p.links())))
        .all(writer::elem_str("sym").map(WayPoint::symbol))
        .all(writer::elem_str("type").map(WayPoint::point_type))
        .all(writer::elem_text::<Fix>("fix").map_owned(WayPoint::fix))
        .all(writer::elem_text::<UInt>("sat").map_owned(WayPoint::sat))
        .all(writer::elem_text::<f64>("hdop").map_owned(WayPoint::hdop))
        .all(writer::elem_text::<f64>("vdop").map_owned(WayPoint::vdop))
        .all(writer::elem_text::<f64>("pdop").map_owned(WayPoint::pdop))
        .all(writer::elem_text::<Duration>("ageofdgpsdata").map_owned(WayPoint::age_of_gps_data))
        .all(writer::elem_text::<DgpsStation>("dgpsid").map_owned(WayPoint::dgps_id))
        .all(writer::doc("extensions").map(WayPoint::extensions))
}

pub(crate) fn first_href(links: &[Link]) -> Option<&str> {
    links.first().map(Link::href)
}

pub(crate) fn first_text(links: &[Link]) -> Option<&str> {
    links.first().and_then(Link::text)
}

/// Links of a record: the `link` list in 1.1, the `url`/`urlname` pair in 1.0
pub(crate) fn read_links(v: &mut Values<'_>) -> GpxResult<Vec<Link>> {
    let mut links = v.list::<Link>("link")?;
    if let Some(href) = v.opt::<String>("url")? {
        links.push(Link::of(href, v.opt("urlname")?, None)?);
    }
    Ok(links)
}

fn build(v: &mut Values<'_>) -> GpxResult<WayPoint> {
    Ok(WayPoint::builder(v.req("lat")?, v.req("lon")?)
        .ele(v.opt("ele")?)
        .speed(v.opt("speed")?)
        .time(v.opt("time")?)
        .course(v.opt("course")?)
        .magvar(v.opt("magvar")?)
        .geoid_height(v.opt("geoidheight")?)
        .name(v.opt("name")?)
        .comment(v.opt("cmt")?)
        .description(v.opt("desc")?)
        .source(v.opt("src")?)
        .links(read_links(v)?)
        .symbol(v.opt("sym")?)
        .point_type(v.opt("type")?)
        .fix(v.opt("fix")?)
        .sat(v.opt("sat")?)
        .hdop(v.opt("hdop")?)
        .vdop(v.opt("vdop")?)
        .pdop(v.opt("pdop")?)
        .age_of_gps_data(v.opt("ageofdgpsdata")?)
        .dgps_id(v.opt("dgpsid")?)
        .extensions(v.opt("extensions")?)
        .build())
}

/// Point element `name`: `wpt`, `rtept` or `trkpt`
pub fn reader(name: &str, version: Version) -> GpxResult<Reader<WayPoint>> {
    reader::elem(name, table(version)?.project(version), build)
}

pub fn writer(name: &str, version: Version) -> Writer<WayPoint> {
    writer::elem(name, writers(version).project(version))
}
