//! Record layouts of the domain graph
//!
//! Larger records start with a [`FieldMask`] naming the optional fields that
//! follow; mandatory fields come next, then the present optional fields in
//! declared bit order. Reads mirror writes field by field, so the bit
//! constants below are part of the format and must not be reordered
//! without bumping `FORMAT_VERSION`.

use bytes::{Buf, BufMut};
use gpxkit_core::{
    Bounds, Copyright, Email, Extensions, Gpx, GpxError, GpxResult, Latitude, Link, Longitude,
    Metadata, Person, Route, Track, TrackSegment, WayPoint, XmlElement, XmlNode,
};

use crate::codec::{get_nullable, get_seq, put_nullable, put_seq, BinaryCodec};
use crate::primitive::{get_len, get_string, get_u8, put_len, put_string};
use crate::FieldMask;

/// Way-point field bits
pub mod wpt {
    pub const ELE: u8 = 0;
    pub const SPEED: u8 = 1;
    pub const TIME: u8 = 2;
    pub const MAGVAR: u8 = 3;
    pub const GEOID_HEIGHT: u8 = 4;
    pub const NAME: u8 = 5;
    pub const COMMENT: u8 = 6;
    pub const DESCRIPTION: u8 = 7;
    pub const SOURCE: u8 = 8;
    pub const LINKS: u8 = 9;
    pub const SYMBOL: u8 = 10;
    pub const TYPE: u8 = 11;
    pub const FIX: u8 = 12;
    pub const SAT: u8 = 13;
    pub const HDOP: u8 = 14;
    pub const VDOP: u8 = 15;
    pub const PDOP: u8 = 16;
    pub const AGE_OF_GPS_DATA: u8 = 17;
    pub const DGPS_ID: u8 = 18;
    pub const COURSE: u8 = 19;
    pub const EXTENSIONS: u8 = 20;
    pub const FIELDS: u8 = 21;
}

/// Maximum nesting of extension elements accepted by the decoder
pub const MAX_EXTENSION_DEPTH: usize = 128;

/// Optional-field writer: sets the mask bit and defers the payload
struct MaskedWriter<'a> {
    mask: FieldMask,
    fields: Vec<Box<dyn Fn(&mut Vec<u8>) + 'a>>,
}

impl<'a> MaskedWriter<'a> {
    fn new() -> Self {
        MaskedWriter {
            mask: FieldMask::NONE,
            fields: Vec::new(),
        }
    }

    fn opt<T: BinaryCodec>(&mut self, bit: u8, value: Option<&'a T>) {
        if let Some(value) = value {
            self.mask.set(bit, true);
            self.fields.push(Box::new(move |buf| value.encode(buf)));
        }
    }

    fn owned<T: BinaryCodec + 'a>(&mut self, bit: u8, value: Option<T>) {
        if let Some(value) = value {
            self.mask.set(bit, true);
            self.fields.push(Box::new(move |buf| value.encode(buf)));
        }
    }

    fn seq<T: BinaryCodec>(&mut self, bit: u8, items: &'a [T]) {
        if !items.is_empty() {
            self.mask.set(bit, true);
            self.fields.push(Box::new(move |buf| put_seq(buf, items)));
        }
    }

    /// Write mask, then `mandatory`, then the present optional fields
    fn finish<B: BufMut>(self, buf: &mut B, mandatory: impl FnOnce(&mut Vec<u8>)) {
        let mut body = Vec::new();
        mandatory(&mut body);
        for field in &self.fields {
            field(&mut body);
        }
        self.mask.write(buf);
        buf.put_slice(&body);
    }
}

/// Mirror of [`MaskedWriter`]
struct MaskedReader {
    mask: FieldMask,
}

impl MaskedReader {
    fn read<B: Buf>(buf: &mut B, fields: u8) -> GpxResult<Self> {
        Ok(MaskedReader {
            mask: FieldMask::read(buf, fields)?,
        })
    }

    fn opt<T: BinaryCodec, B: Buf>(&self, buf: &mut B, bit: u8) -> GpxResult<Option<T>> {
        if self.mask.is_set(bit) {
            Ok(Some(T::decode(buf)?))
        } else {
            Ok(None)
        }
    }

    fn seq<T: BinaryCodec, B: Buf>(&self, buf: &mut B, bit: u8) -> GpxResult<Vec<T>> {
        if self.mask.is_set(bit) {
            get_seq(buf)
        } else {
            Ok(Vec::new())
        }
    }
}

impl BinaryCodec for Email {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        put_string(buf, &self.address());
    }

    fn decode<B: Buf>(buf: &mut B) -> GpxResult<Self> {
        get_string(buf)?
            .parse::<Email>()
            .map_err(|e| GpxError::InvalidWireFormat(e.to_string()))
    }
}

impl BinaryCodec for Link {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        put_string(buf, self.href());
        put_nullable(buf, self.text().map(str::to_string).as_ref());
        put_nullable(buf, self.link_type().map(str::to_string).as_ref());
    }

    fn decode<B: Buf>(buf: &mut B) -> GpxResult<Self> {
        let href = get_string(buf)?;
        let text = get_nullable(buf)?;
        let link_type = get_nullable(buf)?;
        Link::of(href, text, link_type).map_err(|e| GpxError::InvalidWireFormat(e.to_string()))
    }
}

impl BinaryCodec for Person {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        put_nullable(buf, self.name().map(str::to_string).as_ref());
        put_nullable(buf, self.email());
        put_nullable(buf, self.link());
    }

    fn decode<B: Buf>(buf: &mut B) -> GpxResult<Self> {
        let name = get_nullable(buf)?;
        let email = get_nullable(buf)?;
        let link = get_nullable(buf)?;
        Ok(Person::new(name, email, link))
    }
}

impl BinaryCodec for Copyright {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        put_string(buf, self.author());
        put_nullable(buf, self.year().as_ref());
        put_nullable(buf, self.license().map(str::to_string).as_ref());
    }

    fn decode<B: Buf>(buf: &mut B) -> GpxResult<Self> {
        let author = get_string(buf)?;
        let year = get_nullable(buf)?;
        let license = get_nullable(buf)?;
        Ok(Copyright::new(author, year, license))
    }
}

impl BinaryCodec for Bounds {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        self.min_lat().encode(buf);
        self.min_lon().encode(buf);
        self.max_lat().encode(buf);
        self.max_lon().encode(buf);
    }

    fn decode<B: Buf>(buf: &mut B) -> GpxResult<Self> {
        let min_lat = Latitude::decode(buf)?;
        let min_lon = Longitude::decode(buf)?;
        let max_lat = Latitude::decode(buf)?;
        let max_lon = Longitude::decode(buf)?;
        Ok(Bounds::new(min_lat, min_lon, max_lat, max_lon))
    }
}

const NODE_ELEMENT: u8 = 0;
const NODE_TEXT: u8 = 1;

fn put_element<B: BufMut>(buf: &mut B, element: &XmlElement) {
    put_string(buf, element.name());
    put_len(buf, element.attributes().len());
    for (name, value) in element.attributes() {
        put_string(buf, name);
        put_string(buf, value);
    }
    put_len(buf, element.children().len());
    for child in element.children() {
        match child {
            XmlNode::Element(child) => {
                buf.put_u8(NODE_ELEMENT);
                put_element(buf, child);
            }
            XmlNode::Text(text) => {
                buf.put_u8(NODE_TEXT);
                put_string(buf, text);
            }
        }
    }
}

fn get_element<B: Buf>(buf: &mut B, depth: usize) -> GpxResult<XmlElement> {
    if depth > MAX_EXTENSION_DEPTH {
        return Err(GpxError::InvalidWireFormat(
            "Extension nesting too deep".into(),
        ));
    }
    let mut element = XmlElement::new(get_string(buf)?);
    for _ in 0..get_len(buf)? {
        let name = get_string(buf)?;
        let value = get_string(buf)?;
        element.push_attribute(name, value);
    }
    for _ in 0..get_len(buf)? {
        match get_u8(buf)? {
            NODE_ELEMENT => element.push_child(XmlNode::Element(get_element(buf, depth + 1)?)),
            NODE_TEXT => element.push_child(XmlNode::Text(get_string(buf)?)),
            b => {
                return Err(GpxError::InvalidWireFormat(format!(
                    "Unknown extension node kind: {}",
                    b
                )))
            }
        }
    }
    Ok(element)
}

impl BinaryCodec for Extensions {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        put_element(buf, self.element());
    }

    fn decode<B: Buf>(buf: &mut B) -> GpxResult<Self> {
        Ok(Extensions::from_element(get_element(buf, 0)?))
    }
}

impl BinaryCodec for WayPoint {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        let name = self.name().map(str::to_string);
        let comment = self.comment().map(str::to_string);
        let description = self.description().map(str::to_string);
        let source = self.source().map(str::to_string);
        let symbol = self.symbol().map(str::to_string);
        let point_type = self.point_type().map(str::to_string);

        let mut fields = MaskedWriter::new();
        fields.owned(wpt::ELE, self.ele());
        fields.owned(wpt::SPEED, self.speed());
        fields.owned(wpt::TIME, self.time());
        fields.owned(wpt::MAGVAR, self.magvar());
        fields.owned(wpt::GEOID_HEIGHT, self.geoid_height());
        fields.owned(wpt::NAME, name);
        fields.owned(wpt::COMMENT, comment);
        fields.owned(wpt::DESCRIPTION, description);
        fields.owned(wpt::SOURCE, source);
        fields.seq(wpt::LINKS, self.links());
        fields.owned(wpt::SYMBOL, symbol);
        fields.owned(wpt::TYPE, point_type);
        fields.owned(wpt::FIX, self.fix());
        fields.owned(wpt::SAT, self.sat());
        fields.owned(wpt::HDOP, self.hdop());
        fields.owned(wpt::VDOP, self.vdop());
        fields.owned(wpt::PDOP, self.pdop());
        fields.owned(wpt::AGE_OF_GPS_DATA, self.age_of_gps_data());
        fields.owned(wpt::DGPS_ID, self.dgps_id());
        fields.owned(wpt::COURSE, self.course());
        fields.opt(wpt::EXTENSIONS, self.extensions());
        fields.finish(buf, |body| {
            self.lat().encode(body);
            self.lon().encode(body);
        });
    }

    fn decode<B: Buf>(buf: &mut B) -> GpxResult<Self> {
        let fields = MaskedReader::read(buf, wpt::FIELDS)?;
        let lat = Latitude::decode(buf)?;
        let lon = Longitude::decode(buf)?;
        Ok(WayPoint::builder(lat, lon)
            .ele(fields.opt(buf, wpt::ELE)?)
            .speed(fields.opt(buf, wpt::SPEED)?)
            .time(fields.opt(buf, wpt::TIME)?)
            .magvar(fields.opt(buf, wpt::MAGVAR)?)
            .geoid_height(fields.opt(buf, wpt::GEOID_HEIGHT)?)
            .name(fields.opt(buf, wpt::NAME)?)
            .comment(fields.opt(buf, wpt::COMMENT)?)
            .description(fields.opt(buf, wpt::DESCRIPTION)?)
            .source(fields.opt(buf, wpt::SOURCE)?)
            .links(fields.seq(buf, wpt::LINKS)?)
            .symbol(fields.opt(buf, wpt::SYMBOL)?)
            .point_type(fields.opt(buf, wpt::TYPE)?)
            .fix(fields.opt(buf, wpt::FIX)?)
            .sat(fields.opt(buf, wpt::SAT)?)
            .hdop(fields.opt(buf, wpt::HDOP)?)
            .vdop(fields.opt(buf, wpt::VDOP)?)
            .pdop(fields.opt(buf, wpt::PDOP)?)
            .age_of_gps_data(fields.opt(buf, wpt::AGE_OF_GPS_DATA)?)
            .dgps_id(fields.opt(buf, wpt::DGPS_ID)?)
            .course(fields.opt(buf, wpt::COURSE)?)
            .extensions(fields.opt(buf, wpt::EXTENSIONS)?)
            .build())
    }
}

impl BinaryCodec for Metadata {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        let name = self.name().map(str::to_string);
        let description = self.description().map(str::to_string);
        let keywords = self.keywords().map(str::to_string);

        let mut fields = MaskedWriter::new();
        fields.owned(0, name);
        fields.owned(1, description);
        fields.opt(2, self.author());
        fields.opt(3, self.copyright());
        fields.seq(4, self.links());
        fields.owned(5, self.time());
        fields.owned(6, keywords);
        fields.opt(7, self.bounds());
        fields.opt(8, self.extensions());
        fields.finish(buf, |_| {});
    }

    fn decode<B: Buf>(buf: &mut B) -> GpxResult<Self> {
        let fields = MaskedReader::read(buf, 9)?;
        Ok(Metadata::builder()
            .name(fields.opt(buf, 0)?)
            .description(fields.opt(buf, 1)?)
            .author(fields.opt(buf, 2)?)
            .copyright(fields.opt(buf, 3)?)
            .links(fields.seq(buf, 4)?)
            .time(fields.opt(buf, 5)?)
            .keywords(fields.opt(buf, 6)?)
            .bounds(fields.opt(buf, 7)?)
            .extensions(fields.opt(buf, 8)?)
            .build())
    }
}

impl BinaryCodec for Route {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        let name = self.name().map(str::to_string);
        let comment = self.comment().map(str::to_string);
        let description = self.description().map(str::to_string);
        let source = self.source().map(str::to_string);
        let route_type = self.route_type().map(str::to_string);

        let mut fields = MaskedWriter::new();
        fields.owned(0, name);
        fields.owned(1, comment);
        fields.owned(2, description);
        fields.owned(3, source);
        fields.seq(4, self.links());
        fields.owned(5, self.number());
        fields.owned(6, route_type);
        fields.opt(7, self.extensions());
        fields.seq(8, self.points());
        fields.finish(buf, |_| {});
    }

    fn decode<B: Buf>(buf: &mut B) -> GpxResult<Self> {
        let fields = MaskedReader::read(buf, 9)?;
        Ok(Route::builder()
            .name(fields.opt(buf, 0)?)
            .comment(fields.opt(buf, 1)?)
            .description(fields.opt(buf, 2)?)
            .source(fields.opt(buf, 3)?)
            .links(fields.seq(buf, 4)?)
            .number(fields.opt(buf, 5)?)
            .route_type(fields.opt(buf, 6)?)
            .extensions(fields.opt(buf, 7)?)
            .points(fields.seq(buf, 8)?)
            .build())
    }
}

impl BinaryCodec for TrackSegment {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        let mut fields = MaskedWriter::new();
        fields.seq(0, self.points());
        fields.opt(1, self.extensions());
        fields.finish(buf, |_| {});
    }

    fn decode<B: Buf>(buf: &mut B) -> GpxResult<Self> {
        let fields = MaskedReader::read(buf, 2)?;
        let points = fields.seq(buf, 0)?;
        let extensions = fields.opt(buf, 1)?;
        Ok(TrackSegment::new(points, extensions))
    }
}

impl BinaryCodec for Track {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        let name = self.name().map(str::to_string);
        let comment = self.comment().map(str::to_string);
        let description = self.description().map(str::to_string);
        let source = self.source().map(str::to_string);
        let track_type = self.track_type().map(str::to_string);

        let mut fields = MaskedWriter::new();
        fields.owned(0, name);
        fields.owned(1, comment);
        fields.owned(2, description);
        fields.owned(3, source);
        fields.seq(4, self.links());
        fields.owned(5, self.number());
        fields.owned(6, track_type);
        fields.opt(7, self.extensions());
        fields.seq(8, self.segments());
        fields.finish(buf, |_| {});
    }

    fn decode<B: Buf>(buf: &mut B) -> GpxResult<Self> {
        let fields = MaskedReader::read(buf, 9)?;
        Ok(Track::builder()
            .name(fields.opt(buf, 0)?)
            .comment(fields.opt(buf, 1)?)
            .description(fields.opt(buf, 2)?)
            .source(fields.opt(buf, 3)?)
            .links(fields.seq(buf, 4)?)
            .number(fields.opt(buf, 5)?)
            .track_type(fields.opt(buf, 6)?)
            .extensions(fields.opt(buf, 7)?)
            .segments(fields.seq(buf, 8)?)
            .build())
    }
}

impl BinaryCodec for Gpx {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        let mut fields = MaskedWriter::new();
        fields.opt(0, self.metadata());
        fields.seq(1, self.way_points());
        fields.seq(2, self.routes());
        fields.seq(3, self.tracks());
        fields.opt(4, self.extensions());
        fields.finish(buf, |body| {
            self.version().encode(body);
            put_string(body, self.creator());
        });
    }

    fn decode<B: Buf>(buf: &mut B) -> GpxResult<Self> {
        let fields = MaskedReader::read(buf, 5)?;
        let version = BinaryCodec::decode(buf)?;
        let creator = get_string(buf)?;
        Ok(Gpx::builder()
            .version(version)
            .creator(creator)
            .metadata(fields.opt(buf, 0)?)
            .way_points(fields.seq(buf, 1)?)
            .routes(fields.seq(buf, 2)?)
            .tracks(fields.seq(buf, 3)?)
            .extensions(fields.opt(buf, 4)?)
            .build())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use gpxkit_core::{Degrees, DgpsStation, Fix, Length, Speed, UInt};

    use super::*;

    fn encode<T: BinaryCodec>(value: &T) -> Vec<u8> {
        let mut buf = Vec::new();
        value.encode(&mut buf);
        buf
    }

    fn decode<T: BinaryCodec>(bytes: &[u8]) -> T {
        let mut slice = bytes;
        let value = T::decode(&mut slice).unwrap();
        assert!(slice.is_empty(), "{} trailing bytes", slice.len());
        value
    }

    fn full_point() -> WayPoint {
        WayPoint::builder(
            Latitude::from_degrees(48.2).unwrap(),
            Longitude::from_degrees(16.4).unwrap(),
        )
        .ele(Some(Length::from_meters(171.5).unwrap()))
        .speed(Some(Speed::from_meters_per_second(3.2).unwrap()))
        .time(Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()))
        .magvar(Some(Degrees::from_degrees(4.5).unwrap()))
        .geoid_height(Some(Length::from_meters(45.0).unwrap()))
        .name(Some("name".into()))
        .comment(Some("cmt".into()))
        .description(Some("desc".into()))
        .source(Some("src".into()))
        .add_link(Link::of("https://example.org", Some("text".into()), None).unwrap())
        .symbol(Some("sym".into()))
        .point_type(Some("type".into()))
        .fix(Some(Fix::ThreeD))
        .sat(Some(UInt::new(12)))
        .hdop(Some(1.1))
        .vdop(Some(1.2))
        .pdop(Some(1.3))
        .age_of_gps_data(Some(std::time::Duration::from_secs(3)))
        .dgps_id(Some(DgpsStation::new(17).unwrap()))
        .course(Some(Degrees::from_degrees(341.6).unwrap()))
        .extensions(Some(
            Extensions::new().with_child(XmlElement::new("x:hr").with_text("120")),
        ))
        .build()
    }

    #[test]
    fn test_empty_point_mask_is_clear() {
        let point = WayPoint::of(1.0, 2.0).unwrap();
        let bytes = encode(&point);
        // mask(1) + lat(8) + lon(8)
        assert_eq!(bytes.len(), 17);
        assert_eq!(bytes[0], 0);
        assert_eq!(decode::<WayPoint>(&bytes), point);
    }

    #[test]
    fn test_full_point_mask_is_set() {
        let point = full_point();
        let bytes = encode(&point);
        let mask = FieldMask::read(&mut bytes.as_slice(), wpt::FIELDS).unwrap();
        assert_eq!(mask, FieldMask::all(wpt::FIELDS));
        assert_eq!(decode::<WayPoint>(&bytes), point);
    }

    #[test]
    fn test_mask_follows_declared_order() {
        let point = WayPoint::builder(
            Latitude::from_degrees(0.0).unwrap(),
            Longitude::from_degrees(0.0).unwrap(),
        )
        .hdop(Some(2.0))
        .ele(Some(Length::from_meters(1.0).unwrap()))
        .build();
        let bytes = encode(&point);
        let mask = FieldMask::read(&mut bytes.as_slice(), wpt::FIELDS).unwrap();
        assert!(mask.is_set(wpt::ELE));
        assert!(mask.is_set(wpt::HDOP));
        assert_eq!(mask.count(), 2);
        // mask(3 bytes for bit 14) + lat + lon + ele + hdop
        assert_eq!(&bytes[19..27], &1.0f64.to_be_bytes());
        assert_eq!(&bytes[27..35], &2.0f64.to_be_bytes());
    }

    #[test]
    fn test_gpx_roundtrip() {
        let gpx = Gpx::builder()
            .creator("test")
            .metadata(Some(
                Metadata::builder()
                    .name(Some("meta".into()))
                    .author(Some(Person::new(
                        Some("Franz".into()),
                        Some("franz@example.org".parse().unwrap()),
                        None,
                    )))
                    .copyright(Some(Copyright::new("Franz", Some(2024), None)))
                    .bounds(Some(Bounds::of(-1.0, -2.0, 3.0, 4.0).unwrap()))
                    .build(),
            ))
            .add_way_point(full_point())
            .add_route(Route::of(vec![WayPoint::of(1.0, 1.0).unwrap()]))
            .add_track(
                Track::builder()
                    .name(Some("trk".into()))
                    .add_segment(TrackSegment::of(vec![full_point()]))
                    .add_segment(TrackSegment::default())
                    .build(),
            )
            .build();
        assert_eq!(decode::<Gpx>(&encode(&gpx)), gpx);
    }

    #[test]
    fn test_truncated_record() {
        let bytes = encode(&full_point());
        for len in [0, 1, 10, bytes.len() - 1] {
            assert!(WayPoint::decode(&mut &bytes[..len]).is_err());
        }
    }

    #[test]
    fn test_deep_extensions_rejected() {
        let mut element = XmlElement::new("x:leaf");
        for _ in 0..=MAX_EXTENSION_DEPTH + 1 {
            element = XmlElement::new("x:node").with_child(element);
        }
        let bytes = encode(&Extensions::from_element(element));
        assert!(matches!(
            Extensions::decode(&mut bytes.as_slice()),
            Err(GpxError::InvalidWireFormat(_))
        ));
    }
}
