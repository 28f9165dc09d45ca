//! Small records shared by the larger ones: link, email, person,
//! copyright and bounds

use gpxkit_core::{
    Bounds, Copyright, Email, GpxResult, Latitude, Link, Longitude, Person, Version,
};

use crate::reader::{self, Reader};
use crate::writer::{self, Writer};
use crate::{ReaderTable, WriterTable};

pub(crate) fn link_table(_version: Version) -> GpxResult<ReaderTable> {
    Ok(ReaderTable::new()
        .all(reader::attr::<String>("href"))
        .all(reader::elem_text::<String>("text"))
        .all(reader::elem_text::<String>("type")))
}

pub(crate) fn link_writers(_version: Version) -> WriterTable<Link> {
    WriterTable::new()
        .all(writer::attr_str("href").map(|link: &Link| Some(link.href())))
        .all(writer::elem_str("text").map(Link::text))
        .all(writer::elem_str("type").map(Link::link_type))
}

/// `<link href="...">` with optional `text` and `type`
pub fn link_reader(version: Version) -> GpxResult<Reader<Link>> {
    reader::elem("link", link_table(version)?.project(version), |v| {
        Link::of(v.req::<String>("href")?, v.opt("text")?, v.opt("type")?)
    })
}

pub fn link_writer(version: Version) -> Writer<Link> {
    writer::elem("link", link_writers(version).project(version))
}

pub(crate) fn email_table(_version: Version) -> GpxResult<ReaderTable> {
    Ok(ReaderTable::new()
        .all(reader::attr::<String>("id"))
        .all(reader::attr::<String>("domain")))
}

pub(crate) fn email_writers(_version: Version) -> WriterTable<Email> {
    WriterTable::new()
        .all(writer::attr_str("id").map(|email: &Email| Some(email.id())))
        .all(writer::attr_str("domain").map(|email: &Email| Some(email.domain())))
}

/// `<email id="..." domain="..."/>`
pub fn email_reader(version: Version) -> GpxResult<Reader<Email>> {
    reader::elem("email", email_table(version)?.project(version), |v| {
        Email::new(v.req::<String>("id")?, v.req::<String>("domain")?)
    })
}

pub fn email_writer(version: Version) -> Writer<Email> {
    writer::elem("email", email_writers(version).project(version))
}

pub(crate) fn person_table(version: Version) -> GpxResult<ReaderTable> {
    Ok(ReaderTable::new()
        .all(reader::elem_text::<String>("name"))
        .all(email_reader(version)?)
        .all(link_reader(version)?))
}

pub(crate) fn person_writers(version: Version) -> WriterTable<Person> {
    WriterTable::new()
        .all(writer::elem_str("name").map(Person::name))
        .all(email_writer(version).map(Person::email))
        .all(link_writer(version).map(Person::link))
}

/// Person element `name` (`author` in metadata)
pub fn person_reader(name: &str, version: Version) -> GpxResult<Reader<Person>> {
    reader::elem(name, person_table(version)?.project(version), |v| {
        Ok(Person::new(v.opt("name")?, v.opt("email")?, v.opt("link")?))
    })
}

pub fn person_writer(name: &str, version: Version) -> Writer<Person> {
    writer::elem(name, person_writers(version).project(version))
}

pub(crate) fn copyright_table(_version: Version) -> GpxResult<ReaderTable> {
    Ok(ReaderTable::new()
        .all(reader::attr::<String>("author"))
        .all(reader::elem_text::<i32>("year"))
        .all(reader::elem_text::<String>("license")))
}

pub(crate) fn copyright_writers(_version: Version) -> WriterTable<Copyright> {
    WriterTable::new()
        .all(writer::attr_str("author").map(|copyright: &Copyright| Some(copyright.author())))
        .all(writer::elem_text::<i32>("year").map_owned(Copyright::year))
        .all(writer::elem_str("license").map(Copyright::license))
}

/// `<copyright author="...">` with optional `year` and `license`
pub fn copyright_reader(version: Version) -> GpxResult<Reader<Copyright>> {
    reader::elem("copyright", copyright_table(version)?.project(version), |v| {
        Ok(Copyright::new(
            v.req::<String>("author")?,
            v.opt("year")?,
            v.opt("license")?,
        ))
    })
}

pub fn copyright_writer(version: Version) -> Writer<Copyright> {
    writer::elem("copyright", copyright_writers(version).project(version))
}

pub(crate) fn bounds_table(_version: Version) -> GpxResult<ReaderTable> {
    Ok(ReaderTable::new()
        .all(reader::attr::<Latitude>("minlat"))
        .all(reader::attr::<Longitude>("minlon"))
        .all(reader::attr::<Latitude>("maxlat"))
        .all(reader::attr::<Longitude>("maxlon")))
}

pub(crate) fn bounds_writers(_version: Version) -> WriterTable<Bounds> {
    WriterTable::new()
        .all(writer::attr::<Latitude>("minlat").map_owned(|b: &Bounds| Some(b.min_lat())))
        .all(writer::attr::<Longitude>("minlon").map_owned(|b: &Bounds| Some(b.min_lon())))
        .all(writer::attr::<Latitude>("maxlat").map_owned(|b: &Bounds| Some(b.max_lat())))
        .all(writer::attr::<Longitude>("maxlon").map_owned(|b: &Bounds| Some(b.max_lon())))
}

/// `<bounds minlat="..." minlon="..." maxlat="..." maxlon="..."/>`
pub fn bounds_reader(version: Version) -> GpxResult<Reader<Bounds>> {
    reader::elem("bounds", bounds_table(version)?.project(version), |v| {
        Ok(Bounds::new(
            v.req("minlat")?,
            v.req("minlon")?,
            v.req("maxlat")?,
            v.req("maxlon")?,
        ))
    })
}

pub fn bounds_writer(version: Version) -> Writer<Bounds> {
    writer::elem("bounds", bounds_writers(version).project(version))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StreamEmitter, XmlCursor};
    use gpxkit_core::{GpxError, Mode, NumberFormat};

    fn read<T: 'static>(reader: GpxResult<Reader<T>>, xml: &str, mode: Mode) -> GpxResult<T> {
        reader.unwrap().read(&mut XmlCursor::from_xml(xml), mode)
    }

    fn write<T: 'static>(writer: Writer<T>, value: &T) -> String {
        let mut emitter = StreamEmitter::new(Vec::new());
        writer
            .write(value, &mut emitter, &NumberFormat::SHORTEST)
            .unwrap();
        String::from_utf8(emitter.into_inner()).unwrap()
    }

    #[test]
    fn test_link() {
        let xml = r#"<link href="https://example.com/a"><text>A</text><type>text/html</type></link>"#;
        let link = read(link_reader(Version::V11), xml, Mode::Strict).unwrap();
        assert_eq!(link.href(), "https://example.com/a");
        assert_eq!(link.text(), Some("A"));
        assert_eq!(link.link_type(), Some("text/html"));
        assert_eq!(write(link_writer(Version::V11), &link), xml);
    }

    #[test]
    fn test_link_without_href() {
        let err = read(link_reader(Version::V11), "<link><text>A</text></link>", Mode::Strict).unwrap_err();
        assert!(matches!(err, GpxError::InvalidValue { ref name, .. } if name == "link"));
    }

    #[test]
    fn test_person() {
        let xml = concat!(
            "<author><name>Jane</name>",
            r#"<email id="jane" domain="example.com"/>"#,
            r#"<link href="https://example.com/jane"/></author>"#,
        );
        let person = read(person_reader("author", Version::V11), xml, Mode::Strict).unwrap();
        assert_eq!(person.name(), Some("Jane"));
        assert_eq!(person.email().map(Email::address).as_deref(), Some("jane@example.com"));
        assert_eq!(person.link().map(Link::href), Some("https://example.com/jane"));
        assert_eq!(write(person_writer("author", Version::V11), &person), xml);
    }

    #[test]
    fn test_copyright() {
        let xml = r#"<copyright author="Jane"><year>2021</year><license>https://example.com/l</license></copyright>"#;
        let copyright = read(copyright_reader(Version::V11), xml, Mode::Strict).unwrap();
        assert_eq!(copyright.author(), "Jane");
        assert_eq!(copyright.year(), Some(2021));
        assert_eq!(write(copyright_writer(Version::V11), &copyright), xml);
    }

    #[test]
    fn test_bounds() {
        let xml = r#"<bounds minlat="-1.5" minlon="2" maxlat="3.25" maxlon="179.5"/>"#;
        let bounds = read(bounds_reader(Version::V11), xml, Mode::Strict).unwrap();
        assert_eq!(bounds, Bounds::of(-1.5, 2.0, 3.25, 179.5).unwrap());
        assert_eq!(write(bounds_writer(Version::V11), &bounds), xml);
    }

    #[test]
    fn test_bounds_out_of_range() {
        let xml = r#"<bounds minlat="-91" minlon="2" maxlat="3" maxlon="4"/>"#;
        assert!(read(bounds_reader(Version::V11), xml, Mode::Strict).is_err());
        assert!(matches!(
            read(bounds_reader(Version::V11), xml, Mode::Lenient),
            Err(GpxError::NoRootElement)
        ));
    }
}
