//! Per-version root codecs, built once per process

use gpxkit_core::{Gpx, GpxError, GpxResult, Version};
use once_cell::sync::Lazy;

use crate::records::gpx;
use crate::{Reader, Writer};

/// Root reader and writer of one GPX version
pub struct Codecs {
    pub reader: Reader<Gpx>,
    pub writer: Writer<Gpx>,
}

impl Codecs {
    fn build(version: Version) -> Result<Codecs, String> {
        Ok(Codecs {
            reader: gpx::reader(version).map_err(|e| e.to_string())?,
            writer: gpx::writer(version),
        })
    }
}

static V10: Lazy<Result<Codecs, String>> = Lazy::new(|| Codecs::build(Version::V10));
static V11: Lazy<Result<Codecs, String>> = Lazy::new(|| Codecs::build(Version::V11));

/// Shared codecs for `version`
pub fn codecs(version: Version) -> GpxResult<&'static Codecs> {
    let codecs = match version {
        Version::V10 => &*V10,
        Version::V11 => &*V11,
    };
    codecs
        .as_ref()
        .map_err(|message| GpxError::Combinator(message.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Kind;

    #[test]
    fn test_codecs_are_shared() {
        for version in Version::ALL {
            let first = codecs(version).unwrap();
            let second = codecs(version).unwrap();
            assert!(std::ptr::eq(first, second));
            assert_eq!(first.reader.name(), "gpx");
            assert_eq!(first.writer.kind(), Kind::Element);
        }
    }

    #[test]
    fn test_parallel_parses() {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                std::thread::spawn(move || {
                    let xml = format!(r#"<gpx version="1.1" creator="t{}"><wpt lat="{}" lon="0"/></gpx>"#, i, i);
                    let reader = &codecs(Version::V11).unwrap().reader;
                    let gpx = reader
                        .read(&mut crate::XmlCursor::from_xml(&xml), gpxkit_core::Mode::Strict)
                        .unwrap();
                    gpx.way_points()[0].lat().to_degrees()
                })
            })
            .collect();
        let lats: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(lats, vec![0.0, 1.0, 2.0, 3.0]);
    }
}
