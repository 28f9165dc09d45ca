//! Version dispatch tables
//!
//! One ordered declaration per record lists the child combinators of
//! every schema version, each tagged with the versions it applies to.
//! Projecting a table keeps the declared order.

use gpxkit_core::Version;

use crate::{ErasedReader, Writer};

/// Versions a table entry applies to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VersionTag {
    Universal,
    V10,
    V11,
}

impl VersionTag {
    pub fn applies_to(self, version: Version) -> bool {
        match self {
            VersionTag::Universal => true,
            VersionTag::V10 => version == Version::V10,
            VersionTag::V11 => version == Version::V11,
        }
    }
}

/// Version-tagged reader children of one element
#[derive(Clone, Debug, Default)]
pub struct ReaderTable {
    entries: Vec<(VersionTag, ErasedReader)>,
}

impl ReaderTable {
    pub fn new() -> Self {
        ReaderTable::default()
    }

    fn push(mut self, tag: VersionTag, reader: impl Into<ErasedReader>) -> Self {
        self.entries.push((tag, reader.into()));
        self
    }

    /// Add a reader for every version
    pub fn all(self, reader: impl Into<ErasedReader>) -> Self {
        self.push(VersionTag::Universal, reader)
    }

    /// Add a reader for GPX 1.0 only
    pub fn v10(self, reader: impl Into<ErasedReader>) -> Self {
        self.push(VersionTag::V10, reader)
    }

    /// Add a reader for GPX 1.1 only
    pub fn v11(self, reader: impl Into<ErasedReader>) -> Self {
        self.push(VersionTag::V11, reader)
    }

    pub fn entries(&self) -> &[(VersionTag, ErasedReader)] {
        &self.entries
    }

    /// Readers applying to `version`, in declared order
    pub fn project(&self, version: Version) -> Vec<ErasedReader> {
        self.entries
            .iter()
            .filter(|(tag, _)| tag.applies_to(version))
            .map(|(_, reader)| reader.clone())
            .collect()
    }
}

/// Version-tagged writer children of one element
pub struct WriterTable<T: ?Sized> {
    entries: Vec<(VersionTag, Writer<T>)>,
}

impl<T: ?Sized> Default for WriterTable<T> {
    fn default() -> Self {
        WriterTable {
            entries: Vec::new(),
        }
    }
}

impl<T: ?Sized + 'static> WriterTable<T> {
    pub fn new() -> Self {
        WriterTable::default()
    }

    fn push(mut self, tag: VersionTag, writer: Writer<T>) -> Self {
        self.entries.push((tag, writer));
        self
    }

    pub fn all(self, writer: Writer<T>) -> Self {
        self.push(VersionTag::Universal, writer)
    }

    pub fn v10(self, writer: Writer<T>) -> Self {
        self.push(VersionTag::V10, writer)
    }

    pub fn v11(self, writer: Writer<T>) -> Self {
        self.push(VersionTag::V11, writer)
    }

    pub fn entries(&self) -> &[(VersionTag, Writer<T>)] {
        &self.entries
    }

    pub fn project(&self, version: Version) -> Vec<Writer<T>> {
        self.entries
            .iter()
            .filter(|(tag, _)| tag.applies_to(version))
            .map(|(_, writer)| writer.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{reader, writer};

    #[test]
    fn test_applies_to() {
        assert!(VersionTag::Universal.applies_to(Version::V10));
        assert!(VersionTag::Universal.applies_to(Version::V11));
        assert!(VersionTag::V10.applies_to(Version::V10));
        assert!(!VersionTag::V10.applies_to(Version::V11));
        assert!(!VersionTag::V11.applies_to(Version::V10));
    }

    #[test]
    fn test_projection_keeps_order() {
        let table = ReaderTable::new()
            .all(reader::elem_text::<String>("a"))
            .v10(reader::elem_text::<String>("b"))
            .v11(reader::elem_text::<String>("c"))
            .all(reader::elem_text::<String>("d"));

        let names = |version| -> Vec<String> {
            table
                .project(version)
                .iter()
                .map(|r| r.name().to_string())
                .collect()
        };
        assert_eq!(names(Version::V10), vec!["a", "b", "d"]);
        assert_eq!(names(Version::V11), vec!["a", "c", "d"]);
        assert_eq!(table.entries().len(), 4);
    }

    #[test]
    fn test_writer_projection() {
        let table = WriterTable::<str>::new()
            .v10(writer::elem_str("url"))
            .v11(writer::elem_str("link"))
            .all(writer::elem_str("name"));
        let names: Vec<_> = table
            .project(Version::V10)
            .iter()
            .map(|w| w.name().to_string())
            .collect();
        assert_eq!(names, vec!["url", "name"]);
    }
}
