//! Document metadata and the small records it is built from

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::{Extensions, GpxError, GpxResult, Latitude, Longitude};

/// E-mail address, split into id and domain
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Email {
    id: String,
    domain: String,
}

impl Email {
    pub fn new(id: impl Into<String>, domain: impl Into<String>) -> GpxResult<Self> {
        let id = id.into();
        let domain = domain.into();
        if id.trim().is_empty() || domain.trim().is_empty() {
            return Err(GpxError::parse("email", &format!("{}@{}", id, domain)));
        }
        Ok(Email { id, domain })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn address(&self) -> String {
        format!("{}@{}", self.id, self.domain)
    }
}

impl FromStr for Email {
    type Err = GpxError;

    fn from_str(address: &str) -> GpxResult<Self> {
        let address = address.trim();
        match address.split_once('@') {
            Some((id, domain)) if !id.is_empty() && !domain.is_empty() => Email::new(id, domain),
            _ => Err(GpxError::parse("email", address)),
        }
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.domain)
    }
}

/// Link to an external resource
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Link {
    href: String,
    text: Option<String>,
    link_type: Option<String>,
}

impl Link {
    pub fn new(href: impl Into<String>) -> GpxResult<Self> {
        Link::of(href, None, None)
    }

    pub fn of(
        href: impl Into<String>,
        text: Option<String>,
        link_type: Option<String>,
    ) -> GpxResult<Self> {
        let href = href.into();
        if href.is_empty() || href.chars().any(char::is_whitespace) {
            return Err(GpxError::parse("URI", &href));
        }
        Ok(Link {
            href,
            text,
            link_type,
        })
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// MIME type of the linked content
    pub fn link_type(&self) -> Option<&str> {
        self.link_type.as_deref()
    }
}

/// A person or organization
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Person {
    name: Option<String>,
    email: Option<Email>,
    link: Option<Link>,
}

impl Person {
    pub fn new(name: Option<String>, email: Option<Email>, link: Option<Link>) -> Self {
        Person { name, email, link }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Person::new(Some(name.into()), None, None)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn email(&self) -> Option<&Email> {
        self.email.as_ref()
    }

    pub fn link(&self) -> Option<&Link> {
        self.link.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.link.is_none()
    }
}

/// Copyright holder and license
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Copyright {
    author: String,
    year: Option<i32>,
    license: Option<String>,
}

impl Copyright {
    pub fn new(author: impl Into<String>, year: Option<i32>, license: Option<String>) -> Self {
        Copyright {
            author: author.into(),
            year,
            license,
        }
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn license(&self) -> Option<&str> {
        self.license.as_deref()
    }
}

/// Bounding box of a document
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    min_lat: Latitude,
    min_lon: Longitude,
    max_lat: Latitude,
    max_lon: Longitude,
}

impl Bounds {
    pub fn new(min_lat: Latitude, min_lon: Longitude, max_lat: Latitude, max_lon: Longitude) -> Self {
        Bounds {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    pub fn of(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> GpxResult<Self> {
        Ok(Bounds::new(
            Latitude::from_degrees(min_lat)?,
            Longitude::from_degrees(min_lon)?,
            Latitude::from_degrees(max_lat)?,
            Longitude::from_degrees(max_lon)?,
        ))
    }

    pub fn min_lat(&self) -> Latitude {
        self.min_lat
    }

    pub fn min_lon(&self) -> Longitude {
        self.min_lon
    }

    pub fn max_lat(&self) -> Latitude {
        self.max_lat
    }

    pub fn max_lon(&self) -> Longitude {
        self.max_lon
    }
}

/// Information about a GPX document
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Metadata {
    name: Option<String>,
    description: Option<String>,
    author: Option<Person>,
    copyright: Option<Copyright>,
    links: Vec<Link>,
    time: Option<DateTime<Utc>>,
    keywords: Option<String>,
    bounds: Option<Bounds>,
    extensions: Option<Extensions>,
}

impl Metadata {
    pub fn builder() -> MetadataBuilder {
        MetadataBuilder::default()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn author(&self) -> Option<&Person> {
        self.author.as_ref()
    }

    pub fn copyright(&self) -> Option<&Copyright> {
        self.copyright.as_ref()
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.time
    }

    pub fn keywords(&self) -> Option<&str> {
        self.keywords.as_deref()
    }

    pub fn bounds(&self) -> Option<&Bounds> {
        self.bounds.as_ref()
    }

    pub fn extensions(&self) -> Option<&Extensions> {
        self.extensions.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.author.is_none()
            && self.copyright.is_none()
            && self.links.is_empty()
            && self.time.is_none()
            && self.keywords.is_none()
            && self.bounds.is_none()
            && self.extensions.is_none()
    }

    pub fn to_builder(&self) -> MetadataBuilder {
        MetadataBuilder {
            metadata: self.clone(),
        }
    }
}

/// Builder for [`Metadata`]
#[derive(Clone, Debug, Default)]
pub struct MetadataBuilder {
    metadata: Metadata,
}

impl MetadataBuilder {
    pub fn name(mut self, name: Option<String>) -> Self {
        self.metadata.name = name;
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.metadata.description = description;
        self
    }

    /// Empty persons are stored as absent
    pub fn author(mut self, author: Option<Person>) -> Self {
        self.metadata.author = author.filter(|person| !person.is_empty());
        self
    }

    pub fn copyright(mut self, copyright: Option<Copyright>) -> Self {
        self.metadata.copyright = copyright;
        self
    }

    pub fn links(mut self, links: Vec<Link>) -> Self {
        self.metadata.links = links;
        self
    }

    pub fn add_link(mut self, link: Link) -> Self {
        self.metadata.links.push(link);
        self
    }

    pub fn time(mut self, time: Option<DateTime<Utc>>) -> Self {
        self.metadata.time = time;
        self
    }

    pub fn keywords(mut self, keywords: Option<String>) -> Self {
        self.metadata.keywords = keywords;
        self
    }

    pub fn bounds(mut self, bounds: Option<Bounds>) -> Self {
        self.metadata.bounds = bounds;
        self
    }

    pub fn extensions(mut self, extensions: Option<Extensions>) -> Self {
        self.metadata.extensions = extensions;
        self
    }

    pub fn build(self) -> Metadata {
        self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_parse() {
        let email: Email = "franz.wilhelmstoetter@gmail.com".parse().unwrap();
        assert_eq!(email.id(), "franz.wilhelmstoetter");
        assert_eq!(email.domain(), "gmail.com");
        assert_eq!(email.address(), "franz.wilhelmstoetter@gmail.com");

        assert!("@domain".parse::<Email>().is_err());
        assert!("user@".parse::<Email>().is_err());
        assert!("nodomain".parse::<Email>().is_err());
    }

    #[test]
    fn test_link_validation() {
        assert!(Link::new("https://example.org/a").is_ok());
        assert!(Link::new("").is_err());
        assert!(Link::new("not a uri").is_err());
    }

    #[test]
    fn test_empty_author_is_dropped() {
        let metadata = Metadata::builder()
            .author(Some(Person::default()))
            .build();
        assert!(metadata.author().is_none());
        assert!(metadata.is_empty());
    }

    #[test]
    fn test_metadata_builder() {
        let metadata = Metadata::builder()
            .name(Some("Vienna".into()))
            .add_link(Link::new("https://example.org").unwrap())
            .bounds(Some(Bounds::of(48.1, 16.2, 48.3, 16.5).unwrap()))
            .build();
        assert_eq!(metadata.name(), Some("Vienna"));
        assert_eq!(metadata.links().len(), 1);
        assert!(!metadata.is_empty());
        assert_eq!(metadata.to_builder().build(), metadata);
    }
}
