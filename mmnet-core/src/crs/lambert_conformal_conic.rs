use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use geo::Coord;

use super::{projection::normalize_longitude, CrsError, Ellipsoid};

const MAX_ITERATIONS: usize = 15;
const TOLERANCE: f64 = 1e-12;

/// ellipsoidal lambert conformal conic with two standard parallels, after Snyder,
/// "Map Projections: A Working Manual" (USGS PP 1395), p. 107-109.
#[derive(Debug, Clone)]
pub struct LambertConformalConic {
    a: f64,
    e: f64,
    n: f64,
    f: f64,
    rho0: f64,
    lon0: f64,
    false_easting: f64,
    false_northing: f64,
}

impl LambertConformalConic {
    pub fn new(
        ellipsoid: Ellipsoid,
        standard_parallel_1: f64,
        standard_parallel_2: f64,
        latitude_of_origin: f64,
        central_meridian: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let a = ellipsoid.semi_major_axis();
        let e = ellipsoid.eccentricity_squared().sqrt();
        let phi1 = standard_parallel_1.to_radians();
        let phi2 = standard_parallel_2.to_radians();
        let phi0 = latitude_of_origin.to_radians();

        let m1 = m(phi1, e);
        let m2 = m(phi2, e);
        let t1 = t(phi1, e);
        let t2 = t(phi2, e);
        let n = if (phi1 - phi2).abs() < 1e-10 {
            phi1.sin()
        } else {
            (m1.ln() - m2.ln()) / (t1.ln() - t2.ln())
        };
        let f = m1 / (n * t1.powf(n));
        let rho0 = a * f * t(phi0, e).powf(n);

        Self {
            a,
            e,
            n,
            f,
            rho0,
            lon0: central_meridian.to_radians(),
            false_easting,
            false_northing,
        }
    }

    pub fn forward(&self, lon: f64, lat: f64) -> Result<Coord<f64>, CrsError> {
        let phi = lat.to_radians();
        let rho = if (phi.abs() - FRAC_PI_2).abs() < 1e-12 {
            if phi * self.n <= 0.0 {
                return Err(CrsError::Transform(format!(
                    "latitude {lat} is the pole opposite the cone apex"
                )));
            }
            0.0
        } else {
            self.a * self.f * t(phi, self.e).powf(self.n)
        };
        let theta = self.n * normalize_longitude(lon.to_radians() - self.lon0);
        Ok(Coord {
            x: self.false_easting + rho * theta.sin(),
            y: self.false_northing + self.rho0 - rho * theta.cos(),
        })
    }

    pub fn inverse(&self, x: f64, y: f64) -> Result<Coord<f64>, CrsError> {
        let sign = self.n.signum();
        let dx = x - self.false_easting;
        let dy = self.rho0 - (y - self.false_northing);
        let rho = sign * dx.hypot(dy);
        let theta = (sign * dx).atan2(sign * dy);

        if rho == 0.0 {
            return Ok(Coord {
                x: self.lon0.to_degrees(),
                y: (sign * FRAC_PI_2).to_degrees(),
            });
        }

        let t_prime = (rho / (self.a * self.f)).powf(1.0 / self.n);
        let mut phi = FRAC_PI_2 - 2.0 * t_prime.atan();
        let mut converged = false;
        for _ in 0..MAX_ITERATIONS {
            let es = self.e * phi.sin();
            let next =
                FRAC_PI_2 - 2.0 * (t_prime * ((1.0 - es) / (1.0 + es)).powf(self.e / 2.0)).atan();
            let delta = (next - phi).abs();
            phi = next;
            if delta < TOLERANCE {
                converged = true;
                break;
            }
        }
        if !converged {
            return Err(CrsError::Transform(format!(
                "latitude did not converge for ({x}, {y})"
            )));
        }

        let lambda = theta / self.n + self.lon0;
        Ok(Coord {
            x: normalize_longitude(lambda).to_degrees(),
            y: phi.to_degrees(),
        })
    }
}

fn m(phi: f64, e: f64) -> f64 {
    let es = e * phi.sin();
    phi.cos() / (1.0 - es * es).sqrt()
}

fn t(phi: f64, e: f64) -> f64 {
    let es = e * phi.sin();
    (FRAC_PI_4 - phi / 2.0).tan() / ((1.0 - es) / (1.0 + es)).powf(e / 2.0)
}
