//! Geodesic distances on a reference ellipsoid
//!
//! [`Geoid::distance`] solves the inverse geodetic problem with Vincenty's
//! iteration. [`PathLength`] accumulates the distances along a sequence of
//! points, the way route and track lengths are measured.

use crate::{GpxError, GpxResult, Length, Speed, WayPoint};

const DISTANCE_ITERATION_MAX: usize = 1000;
const DISTANCE_ITERATION_EPSILON: f64 = 1e-12;

/// Reference ellipsoid
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    name: &'static str,
    a: f64,
    b: f64,
    inverse_flattening: f64,
}

impl Ellipsoid {
    /// World Geodetic System 1984
    pub const WGS84: Ellipsoid = Ellipsoid {
        name: "WGS-84",
        a: 6_378_137.0,
        b: 6_356_752.314245,
        inverse_flattening: 298.257223563,
    };

    /// International Earth Rotation Service (1989)
    pub const IERS_1989: Ellipsoid = Ellipsoid {
        name: "IERS-1989",
        a: 6_378_136.0,
        b: 6_356_751.302,
        inverse_flattening: 298.257,
    };

    /// International Earth Rotation Service (2003)
    pub const IERS_2003: Ellipsoid = Ellipsoid {
        name: "IERS-2003",
        a: 6_378_136.6,
        b: 6_356_751.9,
        inverse_flattening: 298.25642,
    };

    pub const DEFAULT: Ellipsoid = Ellipsoid::WGS84;

    pub fn new(name: &'static str, a: f64, b: f64, inverse_flattening: f64) -> Self {
        Ellipsoid {
            name,
            a,
            b,
            inverse_flattening,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Equatorial radius in meters
    pub fn a(&self) -> f64 {
        self.a
    }

    /// Polar radius in meters
    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn inverse_flattening(&self) -> f64 {
        self.inverse_flattening
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Ellipsoid::DEFAULT
    }
}

/// Distance calculations on an [`Ellipsoid`]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Geoid {
    ellipsoid: Ellipsoid,
}

impl Geoid {
    pub const WGS84: Geoid = Geoid::of(Ellipsoid::WGS84);
    pub const IERS_1989: Geoid = Geoid::of(Ellipsoid::IERS_1989);
    pub const IERS_2003: Geoid = Geoid::of(Ellipsoid::IERS_2003);
    pub const DEFAULT: Geoid = Geoid::of(Ellipsoid::DEFAULT);

    pub const fn of(ellipsoid: Ellipsoid) -> Self {
        Geoid { ellipsoid }
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    /// Shortest distance between two points on the ellipsoid surface
    ///
    /// Fails with [`GpxError::NoConvergence`] for nearly antipodal points.
    pub fn distance(&self, start: &WayPoint, end: &WayPoint) -> GpxResult<Length> {
        let meters = self
            .vincenty(
                (start.lat().to_degrees().to_radians(), start.lon().to_degrees().to_radians()),
                (end.lat().to_degrees().to_radians(), end.lon().to_degrees().to_radians()),
            )
            .ok_or_else(|| GpxError::NoConvergence {
                start: format!("({}, {})", start.lat(), start.lon()),
                end: format!("({}, {})", end.lat(), end.lon()),
            })?;
        Length::from_meters(meters)
    }

    fn vincenty(&self, (lat1, lon1): (f64, f64), (lat2, lon2): (f64, f64)) -> Option<f64> {
        let f = 1.0 / self.ellipsoid.inverse_flattening;
        let aa = self.ellipsoid.a * self.ellipsoid.a;
        let bb = self.ellipsoid.b * self.ellipsoid.b;
        let aabbbb = (aa - bb) / bb;

        let omega = lon2 - lon1;
        let (sin_u1, cos_u1) = ((1.0 - f) * lat1.tan()).atan().sin_cos();
        let (sin_u2, cos_u2) = ((1.0 - f) * lat2.tan()).atan().sin_cos();
        let sin_u1_sin_u2 = sin_u1 * sin_u2;
        let cos_u1_sin_u2 = cos_u1 * sin_u2;
        let sin_u1_cos_u2 = sin_u1 * cos_u2;
        let cos_u1_cos_u2 = cos_u1 * cos_u2;

        let mut lambda = omega;
        for _ in 0..DISTANCE_ITERATION_MAX {
            let lambda0 = lambda;
            let (sin_lambda, cos_lambda) = lambda.sin_cos();

            let sin2_sigma = (cos_u2 * sin_lambda).powi(2)
                + (cos_u1_sin_u2 - sin_u1_cos_u2 * cos_lambda).powi(2);
            let sin_sigma = sin2_sigma.sqrt();
            let cos_sigma = sin_u1_sin_u2 + cos_u1_cos_u2 * cos_lambda;
            let sigma = sin_sigma.atan2(cos_sigma);

            // Coincident points leave sin(sigma) at zero.
            let sin_alpha = if sin2_sigma == 0.0 {
                0.0
            } else {
                cos_u1_cos_u2 * sin_lambda / sin_sigma
            };
            let cos2_alpha = sin_alpha.asin().cos().powi(2);

            // Equatorial lines leave cos(alpha) at zero.
            let cos2_sigma_m = if cos2_alpha == 0.0 {
                0.0
            } else {
                cos_sigma - 2.0 * sin_u1_sin_u2 / cos2_alpha
            };
            let cos2_sigma_m2 = cos2_sigma_m * cos2_sigma_m;
            let u2 = cos2_alpha * aabbbb;

            let a = 1.0 + u2 / 16384.0 * (4096.0 + u2 * (-768.0 + u2 * (320.0 - 175.0 * u2)));
            let b = u2 / 1024.0 * (256.0 + u2 * (-128.0 + u2 * (74.0 - 47.0 * u2)));
            let delta_sigma = b
                * sin_sigma
                * (cos2_sigma_m
                    + b / 4.0
                        * (cos_sigma * (-1.0 + 2.0 * cos2_sigma_m2)
                            - b / 6.0
                                * cos2_sigma_m
                                * (-3.0 + 4.0 * sin2_sigma)
                                * (-3.0 + 4.0 * cos2_sigma_m2)));

            let c = f / 16.0 * cos2_alpha * (4.0 + f * (4.0 - 3.0 * cos2_alpha));
            lambda = omega
                + (1.0 - c)
                    * f
                    * sin_alpha
                    * (sigma
                        + c * sin_sigma
                            * (cos2_sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos2_sigma_m2)));

            if lambda.is_nan() {
                return None;
            }
            // Zero lambda makes the change NaN, which counts as converged.
            let change = ((lambda - lambda0) / lambda).abs();
            if change.is_nan() || change <= DISTANCE_ITERATION_EPSILON {
                return Some(self.ellipsoid.b * a * (sigma - delta_sigma));
            }
        }
        None
    }

    /// Length of the path through `points`, in iteration order
    pub fn path_length<'a>(&self, points: impl IntoIterator<Item = &'a WayPoint>) -> GpxResult<Length> {
        let mut length = PathLength::new(*self);
        for point in points {
            length.add(point)?;
        }
        length.path_length()
    }

    /// Length of the closed tour through `points`, back to the first one
    pub fn tour_length<'a>(&self, points: impl IntoIterator<Item = &'a WayPoint>) -> GpxResult<Length> {
        let mut length = PathLength::new(*self);
        for point in points {
            length.add(point)?;
        }
        length.tour_length()
    }

    /// Average speed from `p0` to `p1`
    ///
    /// `None` unless both points carry distinct time stamps.
    pub fn speed(&self, p0: &WayPoint, p1: &WayPoint) -> GpxResult<Option<Speed>> {
        let (t0, t1) = match (p0.time(), p1.time()) {
            (Some(t0), Some(t1)) => (t0, t1),
            _ => return Ok(None),
        };
        let millis = (t1 - t0).num_milliseconds();
        if millis == 0 {
            return Ok(None);
        }
        let meters = self.distance(p0, p1)?.to_meters();
        Speed::from_meters_per_second(meters / (millis as f64 / 1000.0)).map(Some)
    }
}

/// Running length of a sequence of points
#[derive(Clone, Debug)]
pub struct PathLength {
    geoid: Geoid,
    first: Option<WayPoint>,
    last: Option<WayPoint>,
    meters: f64,
}

impl PathLength {
    pub fn new(geoid: Geoid) -> Self {
        PathLength {
            geoid,
            first: None,
            last: None,
            meters: 0.0,
        }
    }

    /// Append the next point of the path
    pub fn add(&mut self, point: &WayPoint) -> GpxResult<()> {
        match &self.last {
            Some(last) => self.meters += self.geoid.distance(last, point)?.to_meters(),
            None => self.first = Some(point.clone()),
        }
        self.last = Some(point.clone());
        Ok(())
    }

    /// Append the path collected by `other`, joining its first point to our last
    pub fn combine(mut self, other: PathLength) -> GpxResult<PathLength> {
        let (first, last) = match (&self.last, &other.first) {
            (None, _) => return Ok(other),
            (Some(_), None) => return Ok(self),
            (Some(last), Some(first)) => (last, first),
        };
        self.meters += self.geoid.distance(last, first)?.to_meters() + other.meters;
        self.last = other.last;
        Ok(self)
    }

    pub fn path_length(&self) -> GpxResult<Length> {
        Length::from_meters(self.meters)
    }

    pub fn tour_length(&self) -> GpxResult<Length> {
        match (&self.first, &self.last) {
            (Some(first), Some(last)) => {
                Length::from_meters(self.meters + self.geoid.distance(last, first)?.to_meters())
            }
            _ => Length::from_meters(self.meters),
        }
    }
}
