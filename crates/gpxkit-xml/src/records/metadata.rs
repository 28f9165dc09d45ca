//! Metadata codec (GPX 1.1 `<metadata>`)

use chrono::{DateTime, Utc};
use gpxkit_core::{GpxResult, Metadata, Version};

use super::common;
use crate::reader::{self, Reader};
use crate::writer::{self, Writer};
use crate::{ReaderTable, WriterTable};

pub(crate) fn table(version: Version) -> GpxResult<ReaderTable> {
    Ok(ReaderTable::new()
        .all(reader::elem_text::<String>("name"))
        .all(reader::elem_text::<String>("desc"))
        .all(common::person_reader("author", version)?)
        .all(common::copyright_reader(version)?)
        .all(reader::elems(common::link_reader(version)?))
        .all(reader::elem_text::<DateTime<Utc>>("time"))
        .all(reader::elem_text::<String>("keywords"))
        .all(common::bounds_reader(version)?)
        .all(reader::doc("extensions")))
}

pub(crate) fn writers(version: Version) -> WriterTable<Metadata> {
    WriterTable::new()
        .all(writer::elem_str("name").map(Metadata::name))
        .all(writer::elem_str("desc").map(Metadata::description))
        .all(common::person_writer("author", version).map(Metadata::author))
        .all(common::copyright_writer(version).map(Metadata::copyright))
        .all(writer::elems(common::link_writer(version)).map(|m: &Metadata| Some(m.links())))
        .all(writer::elem_text::<DateTime<Utc>>("time").map_owned(Metadata::time))
        .all(writer::elem_str("keywords").map(Metadata::keywords))
        .all(common::bounds_writer(version).map(Metadata::bounds))
        .all(writer::doc("extensions").map(Metadata::extensions))
}

pub fn reader(version: Version) -> GpxResult<Reader<Metadata>> {
    reader::elem("metadata", table(version)?.project(version), |v| {
        Ok(Metadata::builder()
            .name(v.opt("name")?)
            .description(v.opt("desc")?)
            .author(v.opt("author")?)
            .copyright(v.opt("copyright")?)
            .links(v.list("link")?)
            .time(v.opt("time")?)
            .keywords(v.opt("keywords")?)
            .bounds(v.opt("bounds")?)
            .extensions(v.opt("extensions")?)
            .build())
    })
}

pub fn writer(version: Version) -> Writer<Metadata> {
    writer::elem("metadata", writers(version).project(version))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::XmlCursor;
    use gpxkit_core::{GpxError, Mode};

    const METADATA: &str = r#"<metadata>
        <name>Trip</name>
        <desc>Alps</desc>
        <author><name>Jane</name></author>
        <link href="https://example.com/1"/>
        <link href="https://example.com/2"/>
        <time>2020-01-02T03:04:05Z</time>
        <unknown><x>1</x></unknown>
        <keywords>hiking</keywords>
        <bounds minlat="1" minlon="2" maxlat="3" maxlon="4"/>
    </metadata>"#;

    fn read(mode: Mode) -> GpxResult<Metadata> {
        reader(Version::V11)?.read(&mut XmlCursor::from_xml(METADATA), mode)
    }

    #[test]
    fn test_unknown_element_strict() {
        let err = read(Mode::Strict).unwrap_err();
        assert!(matches!(err, GpxError::UnexpectedElement(ref n) if n == "unknown"));
    }

    #[test]
    fn test_unknown_element_lenient() {
        let metadata = read(Mode::Lenient).unwrap();
        assert_eq!(metadata.name(), Some("Trip"));
        assert_eq!(metadata.description(), Some("Alps"));
        assert_eq!(metadata.author().and_then(|a| a.name()), Some("Jane"));
        assert_eq!(metadata.links().len(), 2);
        assert_eq!(metadata.links()[1].href(), "https://example.com/2");
        assert!(metadata.time().is_some());
        assert_eq!(metadata.keywords(), Some("hiking"));
        assert!(metadata.bounds().is_some());
    }
}
