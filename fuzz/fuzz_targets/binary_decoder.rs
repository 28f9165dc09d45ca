#![no_main]

use libfuzzer_sys::fuzz_target;

use gpxkit_wire::{decode_document, encode_document};

fuzz_target!(|data: &[u8]| {
    if let Ok(gpx) = decode_document(data) {
        let encoded = encode_document(&gpx);
        decode_document(&encoded).expect("decode of an encoded document");
    }
});
