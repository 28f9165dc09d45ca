//! Location text patterns
//!
//! A [`LocationFormatter`] is compiled from a pattern of field letters,
//! literal text and at most one level of optional sections:
//!
//! | Symbol    | Meaning                                   |
//! |-----------|-------------------------------------------|
//! | `L` `l`   | latitude, longitude in degrees            |
//! | `D` `d`   | degrees of latitude, longitude            |
//! | `M` `m`   | minutes of latitude, longitude            |
//! | `S` `s`   | seconds of latitude, longitude            |
//! | `X` `x`   | hemisphere, `N`/`S` and `E`/`W`           |
//! | `E`       | elevation in meters                       |
//! | `H`       | absolute elevation in meters              |
//! | `+`       | sign of the following field               |
//! | `'text'`  | literal text, `''` for a single quote     |
//! | `[` `]`   | optional section                          |
//!
//! The run length of a letter is the minimum number of integer digits,
//! letters after a `.` give the fixed number of fraction digits. Degrees
//! are written without a minus when the pattern has a hemisphere or a `+`
//! for their axis. Coarser angle fields are truncated, only the finest one
//! is rounded.

use std::fmt;

use crate::{GpxError, GpxResult, Latitude, Length, Longitude, WayPoint};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    Latitude,
    Longitude,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Unit {
    Degrees,
    Minutes,
    Seconds,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Quantity {
    Angle(Axis, Unit),
    Elevation,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Field {
    quantity: Quantity,
    int_digits: usize,
    frac_digits: usize,
    /// Number of leading `+` sign characters
    signs: usize,
    /// Written without a minus
    absolute: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    Literal(String),
    Field(Field),
    Hemisphere(Axis),
    Optional(Vec<Token>),
}

/// Latitude, longitude and elevation, each of which may be missing
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Location {
    latitude: Option<Latitude>,
    longitude: Option<Longitude>,
    elevation: Option<Length>,
}

impl Location {
    pub fn new(
        latitude: Option<Latitude>,
        longitude: Option<Longitude>,
        elevation: Option<Length>,
    ) -> Self {
        Location {
            latitude,
            longitude,
            elevation,
        }
    }

    pub fn latitude(&self) -> Option<Latitude> {
        self.latitude
    }

    pub fn longitude(&self) -> Option<Longitude> {
        self.longitude
    }

    pub fn elevation(&self) -> Option<Length> {
        self.elevation
    }

    /// Way-point at this location, if it has both coordinates
    pub fn to_point(&self) -> Option<WayPoint> {
        Some(
            WayPoint::builder(self.latitude?, self.longitude?)
                .ele(self.elevation)
                .build(),
        )
    }
}

impl From<&WayPoint> for Location {
    fn from(point: &WayPoint) -> Self {
        Location::new(Some(point.lat()), Some(point.lon()), point.ele())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn part(value: Option<impl fmt::Display>) -> String {
            value.map_or_else(|| "-".to_string(), |v| v.to_string())
        }
        write!(
            f,
            "[lat={}, lon={}, ele={}]",
            part(self.latitude),
            part(self.longitude),
            part(self.elevation)
        )
    }
}

/// Formatter and parser of locations, compiled from a pattern
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocationFormatter {
    pattern: String,
    tokens: Vec<Token>,
    /// Finest unit and its fraction digits, per axis
    resolution: [(Unit, usize); 2],
}

impl LocationFormatter {
    /// `16°27'59.180"N`
    pub const ISO_HUMAN_LAT_LONG: &'static str = "D°MM''SS.SSS\"X";
    /// `16°27'59.180"E`
    pub const ISO_HUMAN_LON_LONG: &'static str = "dd°mm''ss.sss\"x";
    /// `2045.00m`
    pub const ISO_HUMAN_ELE_LONG: &'static str = "E.EE'm'";
    /// `50°03'46.461"S 125°48'26.533"E 978.90m`
    pub const ISO_HUMAN_LONG: &'static str = "DD°MM''SS.SSS\"X dd°mm''ss.sss\"x[ E.EE'm']";

    pub const ISO_LAT_SHORT: &'static str = "+DD.DD";
    pub const ISO_LAT_MEDIUM: &'static str = "+DDMM.MMM";
    pub const ISO_LAT_LONG: &'static str = "+DDMMSS.SS";
    pub const ISO_LON_SHORT: &'static str = "+ddd.dd";
    pub const ISO_LON_MEDIUM: &'static str = "+dddmm.mmm";
    pub const ISO_LON_LONG: &'static str = "+dddmmss.ss";
    pub const ISO_ELE_SHORT: &'static str = "+H'CRS'";
    pub const ISO_ELE_MEDIUM: &'static str = "+H.H'CRS'";
    pub const ISO_ELE_LONG: &'static str = "+H.HH'CRS'";

    /// ISO 6709 `+DD.DD+ddd.dd[+H'CRS']`
    pub const ISO_SHORT: &'static str = "+DD.DD+ddd.dd[+H'CRS']";
    /// ISO 6709 `+DDMM.MMM+dddmm.mmm[+H.H'CRS']`
    pub const ISO_MEDIUM: &'static str = "+DDMM.MMM+dddmm.mmm[+H.H'CRS']";
    /// ISO 6709 `+DDMMSS.SS+dddmmss.ss[+H.HH'CRS']`
    pub const ISO_LONG: &'static str = "+DDMMSS.SS+dddmmss.ss[+H.HH'CRS']";

    pub fn of_pattern(pattern: &str) -> GpxResult<Self> {
        let mut tokens = Compiler::new(pattern).compile()?;
        let invalid = |reason: &'static str| GpxError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        };

        let mut fields = Vec::new();
        let mut hemispheres = Vec::new();
        collect(&tokens, &mut fields, &mut hemispheres);
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].iter().any(|f| f.quantity == field.quantity) {
                return Err(invalid("repeated field"));
            }
        }
        if hemispheres.iter().enumerate().any(|(i, axis)| hemispheres[..i].contains(axis)) {
            return Err(invalid("repeated hemisphere"));
        }

        let mut resolution = [(Unit::Degrees, 0); 2];
        for (slot, axis) in [Axis::Latitude, Axis::Longitude].into_iter().enumerate() {
            let angles: Vec<(Unit, &Field)> = fields
                .iter()
                .filter_map(|f| match f.quantity {
                    Quantity::Angle(a, unit) if a == axis => Some((unit, *f)),
                    _ => None,
                })
                .collect();
            let has = |unit: Unit| angles.iter().any(|(u, _)| *u == unit);
            if (has(Unit::Minutes) && !has(Unit::Degrees))
                || (has(Unit::Seconds) && !has(Unit::Minutes))
            {
                return Err(invalid("missing larger field"));
            }
            if let Some(&(finest, field)) = angles.iter().max_by_key(|(unit, _)| *unit) {
                if angles.iter().any(|(unit, f)| *unit < finest && f.frac_digits > 0) {
                    return Err(invalid("fraction digits on a coarser field"));
                }
                resolution[slot] = (finest, field.frac_digits);
            }
            if hemispheres.contains(&axis) && angles.iter().any(|(_, f)| f.signs > 0) {
                return Err(invalid("sign and hemisphere for the same axis"));
            }
        }

        resolve_absolute(&mut tokens, &hemispheres);
        Ok(LocationFormatter {
            pattern: pattern.to_string(),
            tokens,
            resolution,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Format `location`
    ///
    /// Fails when a field outside an optional section has no value.
    pub fn format(&self, location: &Location) -> GpxResult<String> {
        let values = Values {
            latitude: location
                .latitude
                .map(|lat| Angle::split(lat.to_degrees(), self.resolution[0])),
            longitude: location
                .longitude
                .map(|lon| Angle::split(lon.to_degrees(), self.resolution[1])),
            elevation: location.elevation.map(Length::to_meters),
        };
        let mut out = String::new();
        if write_tokens(&self.tokens, &values, &mut out) {
            Ok(out)
        } else {
            Err(GpxError::Unformattable {
                pattern: self.pattern.clone(),
                location: location.to_string(),
            })
        }
    }

    /// Parse the whole of `text`
    pub fn parse(&self, text: &str) -> GpxResult<Location> {
        let mut state = ParseState {
            text,
            pos: 0,
            parts: Default::default(),
        };
        match parse_tokens(&self.tokens, &mut state) {
            Some(()) if state.pos == text.len() => state.build(),
            _ => Err(GpxError::parse("location", text)),
        }
    }
}

impl fmt::Display for LocationFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocationFormatter[{}]", self.pattern)
    }
}

struct Compiler<'p> {
    pattern: &'p str,
    root: Vec<Token>,
    optional: Option<Vec<Token>>,
    signs: usize,
}

impl<'p> Compiler<'p> {
    fn new(pattern: &'p str) -> Self {
        Compiler {
            pattern,
            root: Vec::new(),
            optional: None,
            signs: 0,
        }
    }

    fn error(&self, reason: &'static str) -> GpxError {
        GpxError::InvalidPattern {
            pattern: self.pattern.to_string(),
            reason,
        }
    }

    fn tokens(&mut self) -> &mut Vec<Token> {
        match &mut self.optional {
            Some(tokens) => tokens,
            None => &mut self.root,
        }
    }

    fn literal(&mut self, text: &str) {
        let tokens = self.tokens();
        match tokens.last_mut() {
            Some(Token::Literal(last)) => last.push_str(text),
            _ => tokens.push(Token::Literal(text.to_string())),
        }
    }

    /// Signs not followed by a field are plain text
    fn flush_signs(&mut self) {
        if self.signs > 0 {
            let plus = "+".repeat(self.signs);
            self.signs = 0;
            self.literal(&plus);
        }
    }

    fn compile(mut self) -> GpxResult<Vec<Token>> {
        let chars: Vec<char> = self.pattern.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            match c {
                '\'' => {
                    self.flush_signs();
                    let mut text = String::new();
                    if chars.get(i + 1) == Some(&'\'') {
                        text.push('\'');
                        i += 2;
                    } else {
                        i += 1;
                        loop {
                            match chars.get(i) {
                                None => return Err(self.error("missing closing quote")),
                                Some('\'') if chars.get(i + 1) == Some(&'\'') => {
                                    text.push('\'');
                                    i += 2;
                                }
                                Some('\'') => {
                                    i += 1;
                                    break;
                                }
                                Some(&other) => {
                                    text.push(other);
                                    i += 1;
                                }
                            }
                        }
                    }
                    self.literal(&text);
                }
                '+' => {
                    self.signs += 1;
                    i += 1;
                }
                '[' => {
                    if self.optional.is_some() {
                        return Err(self.error("nested optional section"));
                    }
                    if self.signs > 0 {
                        return Err(self.error("sign before optional section"));
                    }
                    self.optional = Some(Vec::new());
                    i += 1;
                }
                ']' => {
                    self.flush_signs();
                    let section = self
                        .optional
                        .take()
                        .ok_or_else(|| self.error("missing opening bracket"))?;
                    self.root.push(Token::Optional(section));
                    i += 1;
                }
                'X' | 'x' => {
                    if self.signs > 0 {
                        return Err(self.error("sign and hemisphere for the same axis"));
                    }
                    let axis = if c == 'X' { Axis::Latitude } else { Axis::Longitude };
                    self.tokens().push(Token::Hemisphere(axis));
                    i += 1;
                }
                'L' | 'D' | 'M' | 'S' | 'l' | 'd' | 'm' | 's' | 'E' | 'H' => {
                    let run = |from: usize| chars[from..].iter().take_while(|&&x| x == c).count();
                    let int_digits = run(i);
                    let mut end = i + int_digits;
                    let mut frac_digits = 0;
                    if chars.get(end) == Some(&'.') && chars.get(end + 1) == Some(&c) {
                        frac_digits = run(end + 1);
                        end += 1 + frac_digits;
                    }
                    let field = Field {
                        quantity: quantity(c),
                        int_digits,
                        frac_digits,
                        signs: self.signs,
                        absolute: c == 'H',
                    };
                    self.signs = 0;
                    self.tokens().push(Token::Field(field));
                    i = end;
                }
                _ => {
                    self.flush_signs();
                    self.literal(c.encode_utf8(&mut [0; 4]));
                    i += 1;
                }
            }
        }
        if self.optional.is_some() {
            return Err(self.error("missing closing bracket"));
        }
        self.flush_signs();
        Ok(self.root)
    }
}

fn quantity(letter: char) -> Quantity {
    match letter {
        'L' | 'D' => Quantity::Angle(Axis::Latitude, Unit::Degrees),
        'M' => Quantity::Angle(Axis::Latitude, Unit::Minutes),
        'S' => Quantity::Angle(Axis::Latitude, Unit::Seconds),
        'l' | 'd' => Quantity::Angle(Axis::Longitude, Unit::Degrees),
        'm' => Quantity::Angle(Axis::Longitude, Unit::Minutes),
        's' => Quantity::Angle(Axis::Longitude, Unit::Seconds),
        _ => Quantity::Elevation,
    }
}

fn collect<'t>(tokens: &'t [Token], fields: &mut Vec<&'t Field>, hemispheres: &mut Vec<Axis>) {
    for token in tokens {
        match token {
            Token::Field(field) => fields.push(field),
            Token::Hemisphere(axis) => hemispheres.push(*axis),
            Token::Optional(section) => collect(section, fields, hemispheres),
            Token::Literal(_) => {}
        }
    }
}

fn resolve_absolute(tokens: &mut [Token], hemispheres: &[Axis]) {
    for token in tokens {
        match token {
            Token::Field(field) => {
                field.absolute = match field.quantity {
                    Quantity::Angle(axis, Unit::Degrees) => {
                        field.signs > 0 || hemispheres.contains(&axis)
                    }
                    Quantity::Angle(..) => true,
                    Quantity::Elevation => field.absolute || field.signs > 0,
                }
            }
            Token::Optional(section) => resolve_absolute(section, hemispheres),
            Token::Literal(_) | Token::Hemisphere(_) => {}
        }
    }
}

/// Angle split into the units a pattern writes
#[derive(Clone, Copy, Debug)]
struct Angle {
    negative: bool,
    degrees: f64,
    minutes: f64,
    seconds: f64,
}

impl Angle {
    fn split(value: f64, (finest, frac_digits): (Unit, usize)) -> Angle {
        let dd = value.abs();
        let mut angle = Angle {
            negative: value < 0.0,
            degrees: dd,
            minutes: 0.0,
            seconds: 0.0,
        };
        match finest {
            Unit::Degrees => {}
            Unit::Minutes => {
                angle.degrees = dd.floor();
                angle.minutes = ((dd - angle.degrees) * 60.0).max(0.0);
                if rounds_to_sixty(angle.minutes, frac_digits) {
                    angle.minutes = 0.0;
                    angle.degrees += 1.0;
                }
            }
            Unit::Seconds => {
                angle.degrees = dd.floor();
                angle.minutes = ((dd - angle.degrees) * 60.0).floor();
                angle.seconds = ((dd - angle.degrees - angle.minutes / 60.0) * 3600.0).max(0.0);
                if rounds_to_sixty(angle.seconds, frac_digits) {
                    angle.seconds = 0.0;
                    angle.minutes += 1.0;
                }
                if angle.minutes >= 60.0 {
                    angle.minutes = 0.0;
                    angle.degrees += 1.0;
                }
            }
        }
        angle
    }

    fn unit(&self, unit: Unit) -> f64 {
        match unit {
            Unit::Degrees => self.degrees,
            Unit::Minutes => self.minutes,
            Unit::Seconds => self.seconds,
        }
    }
}

fn rounds_to_sixty(value: f64, frac_digits: usize) -> bool {
    format!("{:.*}", frac_digits, value)
        .parse::<f64>()
        .map_or(false, |rounded| rounded >= 60.0)
}

fn digits(value: f64, int_digits: usize, frac_digits: usize) -> String {
    let text = format!("{:.*}", frac_digits, value);
    let int_len = text.find('.').unwrap_or(text.len());
    if int_len >= int_digits {
        text
    } else {
        format!("{}{}", "0".repeat(int_digits - int_len), text)
    }
}

struct Values {
    latitude: Option<Angle>,
    longitude: Option<Angle>,
    elevation: Option<f64>,
}

impl Values {
    fn angle(&self, axis: Axis) -> Option<Angle> {
        match axis {
            Axis::Latitude => self.latitude,
            Axis::Longitude => self.longitude,
        }
    }

    fn field(&self, field: &Field) -> Option<String> {
        let (value, negative) = match field.quantity {
            Quantity::Angle(axis, unit) => {
                let angle = self.angle(axis)?;
                (angle.unit(unit), angle.negative)
            }
            Quantity::Elevation => {
                let meters = self.elevation?;
                (meters.abs(), meters < 0.0)
            }
        };
        let sign = if negative { '-' } else { '+' };
        let mut out: String = std::iter::repeat(sign).take(field.signs).collect();
        if negative && !field.absolute {
            out.push('-');
        }
        out.push_str(&digits(value, field.int_digits, field.frac_digits));
        Some(out)
    }
}

/// Write `tokens`, false when a mandatory value is missing
fn write_tokens(tokens: &[Token], values: &Values, out: &mut String) -> bool {
    for token in tokens {
        match token {
            Token::Literal(text) => out.push_str(text),
            Token::Field(field) => match values.field(field) {
                Some(text) => out.push_str(&text),
                None => return false,
            },
            Token::Hemisphere(axis) => match (axis, values.angle(*axis)) {
                (Axis::Latitude, Some(angle)) => out.push(if angle.negative { 'S' } else { 'N' }),
                (Axis::Longitude, Some(angle)) => out.push(if angle.negative { 'W' } else { 'E' }),
                (_, None) => return false,
            },
            Token::Optional(section) => {
                let mut text = String::new();
                if write_tokens(section, values, &mut text) {
                    out.push_str(&text);
                }
            }
        }
    }
    true
}

/// Accumulated magnitude and sign of one parsed quantity
#[derive(Clone, Copy, Debug, Default)]
struct Part {
    magnitude: Option<f64>,
    negative: bool,
}

impl Part {
    fn add(&mut self, value: f64) {
        self.magnitude = Some(self.magnitude.unwrap_or(0.0) + value);
    }

    fn signed(&self) -> Option<f64> {
        self.magnitude
            .map(|m| if self.negative { -m } else { m })
    }
}

#[derive(Clone)]
struct ParseState<'t> {
    text: &'t str,
    pos: usize,
    /// Latitude, longitude and elevation
    parts: [Part; 3],
}

impl<'t> ParseState<'t> {
    fn rest(&self) -> &'t str {
        &self.text[self.pos..]
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.rest().chars().next()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn part(&mut self, quantity: Quantity) -> &mut Part {
        match quantity {
            Quantity::Angle(Axis::Latitude, _) => &mut self.parts[0],
            Quantity::Angle(Axis::Longitude, _) => &mut self.parts[1],
            Quantity::Elevation => &mut self.parts[2],
        }
    }

    /// Read an unsigned decimal
    ///
    /// A field directly followed by another field takes exactly
    /// `int_digits` integer digits.
    fn number(&mut self, int_digits: usize, fraction: bool, bounded: bool) -> Option<f64> {
        let rest = self.rest();
        let available = rest.bytes().take_while(u8::is_ascii_digit).count();
        let int_len = if bounded { int_digits } else { available };
        if int_len == 0 || int_len > available {
            return None;
        }
        let mut end = int_len;
        if fraction && rest[end..].starts_with('.') {
            end += 1 + rest[end + 1..].bytes().take_while(u8::is_ascii_digit).count();
        }
        let value = rest[..end].parse::<f64>().ok()?;
        self.pos += end;
        Some(value)
    }

    fn build(&self) -> GpxResult<Location> {
        Ok(Location {
            latitude: self.parts[0].signed().map(Latitude::from_degrees).transpose()?,
            longitude: self.parts[1].signed().map(Longitude::from_degrees).transpose()?,
            elevation: self.parts[2].signed().map(Length::from_meters).transpose()?,
        })
    }
}

fn parse_tokens(tokens: &[Token], state: &mut ParseState<'_>) -> Option<()> {
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::Literal(text) => {
                if !state.rest().starts_with(text.as_str()) {
                    return None;
                }
                state.pos += text.len();
            }
            Token::Hemisphere(axis) => {
                let negative = match (axis, state.next_char()?) {
                    (Axis::Latitude, 'N') | (Axis::Longitude, 'E') => false,
                    (Axis::Latitude, 'S') | (Axis::Longitude, 'W') => true,
                    _ => return None,
                };
                state.part(Quantity::Angle(*axis, Unit::Degrees)).negative = negative;
            }
            Token::Field(field) => {
                for _ in 0..field.signs {
                    let negative = match state.next_char()? {
                        '+' => false,
                        '-' => true,
                        _ => return None,
                    };
                    state.part(field.quantity).negative = negative;
                }
                if !field.absolute && state.rest().starts_with('-') {
                    state.pos += 1;
                    state.part(field.quantity).negative = true;
                }
                let bounded = matches!(tokens.get(i + 1), Some(Token::Field(_)));
                let value = state.number(field.int_digits, field.frac_digits > 0, bounded)?;
                let scale = match field.quantity {
                    Quantity::Angle(_, Unit::Minutes) => 60.0,
                    Quantity::Angle(_, Unit::Seconds) => 3600.0,
                    _ => 1.0,
                };
                state.part(field.quantity).add(value / scale);
            }
            Token::Optional(section) => {
                let saved = state.clone();
                if parse_tokens(section, state).is_none() {
                    *state = saved;
                }
            }
        }
    }
    Some(())
}
