//! Root `<gpx>` codec
//!
//! GPX 1.1 groups the document metadata in `<metadata>`; GPX 1.0 puts the
//! same information directly under the root, with the author spread over
//! `author`, `email`, `url` and `urlname`. One generator reads both.

use chrono::{DateTime, Utc};
use gpxkit_core::{
    Email, Gpx, GpxResult, Link, Metadata, Person, Route, Track, Version, WayPoint,
};

use super::{common, metadata, point, route, track};
use crate::reader::{self, Reader, Values};
use crate::writer::{self, Writer};
use crate::{ReaderTable, WriterTable};

/// Root element name
pub const ROOT: &str = "gpx";

pub(crate) fn table(version: Version) -> GpxResult<ReaderTable> {
    Ok(ReaderTable::new()
        .all(reader::attr_with("version", |text| text.parse::<Version>()))
        .all(reader::attr::<String>("creator"))
        .v11(metadata::reader(version)?)
        .v10(reader::elem_text::<String>("name"))
        .v10(reader::elem_text::<String>("desc"))
        .v10(reader::elem_text::<String>("author"))
        .v10(reader::elem(
            "email",
            vec![reader::text::<String>().into()],
            |v| v.req::<String>("")?.parse::<Email>(),
        )?)
        .v10(reader::elem_text::<String>("url"))
        .v10(reader::elem_text::<String>("urlname"))
        .v10(reader::elem_text::<DateTime<Utc>>("time"))
        .v10(reader::elem_text::<String>("keywords"))
        .v10(common::bounds_reader(version)?)
        .all(reader::elems(point::reader("wpt", version)?))
        .all(reader::elems(route::reader(version)?))
        .all(reader::elems(track::reader(version)?))
        .all(reader::doc("extensions")))
}

fn author(gpx: &Gpx) -> Option<&Person> {
    gpx.metadata().and_then(Metadata::author)
}

pub(crate) fn writers(version: Version) -> WriterTable<Gpx> {
    WriterTable::new()
        .all(writer::ns(version.namespace_uri()))
        .all(writer::attr_str("version").map(move |_: &Gpx| Some(version.value())))
        .all(writer::attr_str("creator").map(|g: &Gpx| Some(g.creator())))
        .v11(metadata::writer(version).map(Gpx::metadata))
        .v10(writer::elem_str("name").map(|g: &Gpx| g.metadata().and_then(Metadata::name)))
        .v10(writer::elem_str("desc").map(|g: &Gpx| g.metadata().and_then(Metadata::description)))
        .v10(writer::elem_str("author").map(|g: &Gpx| author(g).and_then(Person::name)))
        .v10(writer::elem_text::<String>("email").map_owned(|g: &Gpx| {
            author(g).and_then(Person::email).map(Email::address)
        }))
        .v10(writer::elem_str("url").map(|g: &Gpx| author(g).and_then(Person::link).map(Link::href)))
        .v10(writer::elem_str("urlname").map(|g: &Gpx| author(g).and_then(Person::link).and_then(Link::text)))
        .v10(writer::elem_text::<DateTime<Utc>>("time").map_owned(|g: &Gpx| g.metadata().and_then(Metadata::time)))
        .v10(writer::elem_str("keywords").map(|g: &Gpx| g.metadata().and_then(Metadata::keywords)))
        .v10(common::bounds_writer(version).map(|g: &Gpx| g.metadata().and_then(Metadata::bounds)))
        .all(writer::elems(point::writer("wpt", version)).map(|g: &Gpx| Some(g.way_points())))
        .all(writer::elems(route::writer(version)).map(|g: &Gpx| Some(g.routes())))
        .all(writer::elems(track::writer(version)).map(|g: &Gpx| Some(g.tracks())))
        .all(writer::doc("extensions").map(Gpx::extensions))
}

/// Metadata spread over the 1.0 root
fn flat_metadata(v: &mut Values<'_>) -> GpxResult<Metadata> {
    let link = match v.opt::<String>("url")? {
        Some(href) => Some(Link::of(href, v.opt("urlname")?, None)?),
        None => None,
    };
    let author = Person::new(v.opt("author")?, v.opt("email")?, link);
    Ok(Metadata::builder()
        .name(v.opt("name")?)
        .description(v.opt("desc")?)
        .author(Some(author))
        .time(v.opt("time")?)
        .keywords(v.opt("keywords")?)
        .bounds(v.opt("bounds")?)
        .build())
}

/// Root reader for documents of `version`
///
/// A missing `version` attribute is taken as `version`; so is an unknown
/// one in lenient mode.
pub fn reader(version: Version) -> GpxResult<Reader<Gpx>> {
    reader::elem(ROOT, table(version)?.project(version), move |v| {
        let metadata = match v.opt::<Metadata>("metadata")? {
            Some(metadata) => Some(metadata),
            None => Some(flat_metadata(v)?),
        };
        Ok(Gpx::builder()
            .version(v.opt("version")?.unwrap_or(version))
            .creator(v.opt::<String>("creator")?.unwrap_or_default())
            .metadata(metadata)
            .way_points(v.list::<WayPoint>("wpt")?)
            .routes(v.list::<Route>("rte")?)
            .tracks(v.list::<Track>("trk")?)
            .extensions(v.opt("extensions")?)
            .build())
    })
}

/// Root writer producing `version` documents
pub fn writer(version: Version) -> Writer<Gpx> {
    writer::elem(ROOT, writers(version).project(version))
}
