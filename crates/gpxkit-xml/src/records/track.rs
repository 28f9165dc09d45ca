//! Track and track segment codecs

use gpxkit_core::{GpxResult, Track, TrackSegment, UInt, Version};

use super::{common, point};
use crate::reader::{self, Reader};
use crate::writer::{self, Writer};
use crate::{ReaderTable, WriterTable};

pub(crate) fn segment_table(version: Version) -> GpxResult<ReaderTable> {
    Ok(ReaderTable::new()
        .all(reader::elems(point::reader("trkpt", version)?))
        .all(reader::doc("extensions")))
}

pub(crate) fn segment_writers(version: Version) -> WriterTable<TrackSegment> {
    WriterTable::new()
        .all(writer::elems(point::writer("trkpt", version)).map(|s: &TrackSegment| Some(s.points())))
        .all(writer::doc("extensions").map(TrackSegment::extensions))
}

/// `<trkseg>` with its `trkpt` children
pub fn segment_reader(version: Version) -> GpxResult<Reader<TrackSegment>> {
    reader::elem("trkseg", segment_table(version)?.project(version), |v| {
        Ok(TrackSegment::new(v.list("trkpt")?, v.opt("extensions")?))
    })
}

pub fn segment_writer(version: Version) -> Writer<TrackSegment> {
    writer::elem("trkseg", segment_writers(version).project(version))
}

pub(crate) fn table(version: Version) -> GpxResult<ReaderTable> {
    Ok(ReaderTable::new()
        .all(reader::elem_text::<String>("name"))
        .all(reader::elem_text::<String>("cmt"))
        .all(reader::elem_text::<String>("desc"))
        .all(reader::elem_text::<String>("src"))
        .v11(reader::elems(common::link_reader(version)?))
        .v10(reader::elem_text::<String>("url"))
        .v10(reader::elem_text::<String>("urlname"))
        .all(reader::elem_text::<UInt>("number"))
        .all(reader::elem_text::<String>("type"))
        .all(reader::doc("extensions"))
        .all(reader::elems(segment_reader(version)?)))
}

pub(crate) fn writers(version: Version) -> WriterTable<Track> {
    WriterTable::new()
        .all(writer::elem_str("name").map(Track::name))
        .all(writer::elem_str("cmt").map(Track::comment))
        .all(writer::elem_str("desc").map(Track::description))
        .all(writer::elem_str("src").map(Track::source))
        .v11(writer::elems(common::link_writer(version)).map(|t: &Track| Some(t.links())))
        .v10(writer::elem_str("url").map(|t: &Track| point::first_href(t.links())))
        .v10(writer::elem_str("urlname").map(|t: &Track| point::first_text(t.links())))
        .all(writer::elem_text::<UInt>("number").map_owned(Track::number))
        .all(writer::elem_str("type").map(Track::track_type))
        .all(writer::doc("extensions").map(Track::extensions))
        .all(writer::elems(segment_writer(version)).map(|t: &Track| Some(t.segments())))
}

/// `<trk>` with its `trkseg` children
pub fn reader(version: Version) -> GpxResult<Reader<Track>> {
    reader::elem("trk", table(version)?.project(version), |v| {
        Ok(Track::builder()
            .name(v.opt("name")?)
            .comment(v.opt("cmt")?)
            .description(v.opt("desc")?)
            .source(v.opt("src")?)
            .links(point::read_links(v)?)
            .number(v.opt("number")?)
            .track_type(v.opt("type")?)
            .extensions(v.opt("extensions")?)
            .segments(v.list("trkseg")?)
            .build())
    })
}

pub fn writer(version: Version) -> Writer<Track> {
    writer::elem("trk", writers(version).project(version))
}
