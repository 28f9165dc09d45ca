//! Route codec

use gpxkit_core::{GpxResult, Route, UInt, Version};

use super::{common, point};
use crate::reader::{self, Reader};
use crate::writer::{self, Writer};
use crate::{ReaderTable, WriterTable};

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
        .all(reader::elems(point::reader("rtept", version)?)))
}

pub(crate) fn writers(version: Version) -> WriterTable<Route> {
    WriterTable::new()
        .all(writer::elem_str("name").map(Route::name))
        .all(writer::elem_str("cmt").map(Route::comment))
        .all(writer::elem_str("desc").map(Route::description))
        .all(writer::elem_str("src").map(Route::source))
        .v11(writer::elems(common::link_writer(version)).map(|r: &Route| Some(r.links())))
        .v10(writer::elem_str("url").map(|r: &Route| point::first_href(r.links())))
        .v10(writer::elem_str("urlname").map(|r: &Route| point::first_text(r.links())))
        .all(writer::elem_text::<UInt>("number").map_owned(Route::number))
        .all(writer::elem_str("type").map(Route::route_type))
        .all(writer::doc("extensions").map(Route::extensions))
        .all(writer::elems(point::writer("rtept", version)).map(|r: &Route| Some(r.points())))
}

/// `<rte>` with its `rtept` children
pub fn reader(version: Version) -> GpxResult<Reader<Route>> {
    reader::elem("rte", table(version)?.project(version), |v| {
        Ok(Route::builder()
            .name(v.opt("name")?)
            .comment(v.opt("cmt")?)
            .description(v.opt("desc")?)
            .source(v.opt("src")?)
            .links(point::read_links(v)?)
            .number(v.opt("number")?)
            .route_type(v.opt("type")?)
            .extensions(v.opt("extensions")?)
            .points(v.list("rtept")?)
            .build())
    })
}

pub fn writer(version: Version) -> Writer<Route> {
    writer::elem("rte", writers(version).project(version))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::XmlCursor;
    use gpxkit_core::Mode;

    #[test]
    fn test_read_route() {
        let xml = r#"<rte>
            <name>R</name>
            <number>3</number>
            <rtept lat="1" lon="1"/>
            <rtept lat="2" lon="2"><name>second</name></rtept>
            <rtept lat="3" lon="3"/>
        </rte>"#;
        let route = reader(Version::V11)
            .unwrap()
            .read(&mut XmlCursor::from_xml(xml), Mode::Strict)
            .unwrap();
        assert_eq!(route.name(), Some("R"));
        assert_eq!(route.number(), Some(UInt::new(3)));
        let lats: Vec<f64> = route.points().iter().map(|p| p.lat().to_degrees()).collect();
        assert_eq!(lats, vec![1.0, 2.0, 3.0]);
        assert_eq!(route.points()[1].name(), Some("second"));
    }

    #[test]
    fn test_lenient_keeps_sibling_points() {
        let xml = r#"<rte><rtept lat="1" lon="1"/><rtept lat="-95" lon="1"/><rtept lat="3" lon="3"/></rte>"#;
        let route = reader(Version::V11)
            .unwrap()
            .read(&mut XmlCursor::from_xml(xml), Mode::Lenient)
            .unwrap();
        assert_eq!(route.points().len(), 2);
    }
}
