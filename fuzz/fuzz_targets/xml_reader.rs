#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use gpxkit_core::{Mode, Version};
use gpxkit_xml::{GpxReader, GpxWriter, Indent};

#[derive(Debug, Arbitrary)]
struct Input {
    v10: bool,
    lenient: bool,
    xml: String,
}

fuzz_target!(|input: Input| {
    let version = if input.v10 { Version::V10 } else { Version::V11 };
    let mode = if input.lenient { Mode::Lenient } else { Mode::Strict };

    let Ok(gpx) = GpxReader::new(version, mode).read_str(&input.xml) else {
        return;
    };

    // Anything that reads must also write
    GpxWriter::new(Indent::None, None)
        .with_version(version)
        .write_to_string(&gpx)
        .expect("write of a parsed document");
});
