//! Routes: ordered points for planned navigation

use crate::{Extensions, Link, UInt, WayPoint};

/// An ordered list of route points
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Route {
    name: Option<String>,
    comment: Option<String>,
    description: Option<String>,
    source: Option<String>,
    links: Vec<Link>,
    number: Option<UInt>,
    route_type: Option<String>,
    extensions: Option<Extensions>,
    points: Vec<WayPoint>,
}

impl Route {
    pub fn builder() -> RouteBuilder {
        RouteBuilder::default()
    }

    pub fn of(points: Vec<WayPoint>) -> Self {
        Route::builder().points(points).build()
    }

    pub fn to_builder(&self) -> RouteBuilder {
        RouteBuilder {
            route: self.clone(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn number(&self) -> Option<UInt> {
        self.number
    }

    pub fn route_type(&self) -> Option<&str> {
        self.route_type.as_deref()
    }

    pub fn extensions(&self) -> Option<&Extensions> {
        self.extensions.as_ref()
    }

    pub fn points(&self) -> &[WayPoint] {
        &self.points
    }
}

/// Builder for [`Route`]
#[derive(Clone, Debug, Default)]
pub struct RouteBuilder {
    route: Route,
}

impl RouteBuilder {
    pub fn name(mut self, name: Option<String>) -> Self {
        self.route.name = name;
        self
    }

    pub fn comment(mut self, comment: Option<String>) -> Self {
        self.route.comment = comment;
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.route.description = description;
        self
    }

    pub fn source(mut self, source: Option<String>) -> Self {
        self.route.source = source;
        self
    }

    pub fn links(mut self, links: Vec<Link>) -> Self {
        self.route.links = links;
        self
    }

    pub fn number(mut self, number: Option<UInt>) -> Self {
        self.route.number = number;
        self
    }

    pub fn route_type(mut self, route_type: Option<String>) -> Self {
        self.route.route_type = route_type;
        self
    }

    pub fn extensions(mut self, extensions: Option<Extensions>) -> Self {
        self.route.extensions = extensions;
        self
    }

    pub fn points(mut self, points: Vec<WayPoint>) -> Self {
        self.route.points = points;
        self
    }

    pub fn add_point(mut self, point: WayPoint) -> Self {
        self.route.points.push(point);
        self
    }

    pub fn build(self) -> Route {
        self.route
    }
}
