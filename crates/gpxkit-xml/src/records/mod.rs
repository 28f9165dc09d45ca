//! Record codecs
//!
//! Every record declares its reader children and its writer children in
//! two version tables. For each version the two projections must list
//! the same constructs in the same order; the tests below hold every
//! table to that.

pub mod common;
pub mod gpx;
pub mod metadata;
pub mod point;
pub mod route;
pub mod track;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Kind, ReaderTable, WriterTable};
    use gpxkit_core::{GpxResult, Version};

    fn reader_shape(table: GpxResult<ReaderTable>, version: Version) -> Vec<(String, Kind)> {
        table
            .unwrap()
            .project(version)
            .iter()
            .map(|r| (r.name().to_string(), r.kind()))
            .collect()
    }

    fn writer_shape<T: ?Sized + 'static>(table: WriterTable<T>, version: Version) -> Vec<(String, Kind)> {
        table
            .project(version)
            .iter()
            .filter(|w| w.name() != "xmlns")
            .map(|w| (w.name().to_string(), w.kind()))
            .collect()
    }

    macro_rules! assert_same_shape {
        ($readers:path, $writers:path) => {
            for version in Version::ALL {
                assert_eq!(
                    reader_shape($readers(version), version),
                    writer_shape($writers(version), version),
                    "{} under GPX {}",
                    stringify!($readers),
                    version
                );
            }
        };
    }

    #[test]
    fn test_reader_writer_correspondence() {
        assert_same_shape!(common::link_table, common::link_writers);
        assert_same_shape!(common::email_table, common::email_writers);
        assert_same_shape!(common::person_table, common::person_writers);
        assert_same_shape!(common::copyright_table, common::copyright_writers);
        assert_same_shape!(common::bounds_table, common::bounds_writers);
        assert_same_shape!(point::table, point::writers);
        assert_same_shape!(route::table, route::writers);
        assert_same_shape!(track::segment_table, track::segment_writers);
        assert_same_shape!(track::table, track::writers);
        assert_same_shape!(metadata::table, metadata::writers);
        assert_same_shape!(gpx::table, gpx::writers);
    }

    #[test]
    fn test_version_specific_children() {
        let names = |version| -> Vec<String> {
            reader_shape(point::table(version), version)
                .into_iter()
                .map(|(name, _)| name)
                .collect()
        };
        let v10 = names(Version::V10);
        let v11 = names(Version::V11);
        assert!(v10.contains(&"course".to_string()));
        assert!(v10.contains(&"url".to_string()));
        assert!(!v10.contains(&"link".to_string()));
        assert!(!v11.contains(&"course".to_string()));
        assert!(v11.contains(&"link".to_string()));
        assert_eq!(v10.len(), 24);
        assert_eq!(v11.len(), 22);
    }
}
