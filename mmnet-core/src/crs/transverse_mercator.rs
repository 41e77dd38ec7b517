use std::f64::consts::FRAC_PI_2;

use geo::Coord;

use super::{projection::normalize_longitude, CrsError, Ellipsoid};

/// ellipsoidal transverse mercator using the series expansions of Snyder,
/// "Map Projections: A Working Manual" (USGS PP 1395), p. 60-64. accurate to the
/// millimetre within the usual 3-4 degrees of the central meridian.
#[derive(Debug, Clone)]
pub struct TransverseMercator {
    a: f64,
    e2: f64,
    ep2: f64,
    e1: f64,
    k0: f64,
    lon0: f64,
    false_easting: f64,
    false_northing: f64,
    /// meridional arc at the latitude of origin
    m0: f64,
}

impl TransverseMercator {
    pub fn new(
        ellipsoid: Ellipsoid,
        latitude_of_origin: f64,
        central_meridian: f64,
        scale_factor: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let a = ellipsoid.semi_major_axis();
        let e2 = ellipsoid.eccentricity_squared();
        let sqrt_1_e2 = (1.0 - e2).sqrt();
        let mut tm = Self {
            a,
            e2,
            ep2: e2 / (1.0 - e2),
            e1: (1.0 - sqrt_1_e2) / (1.0 + sqrt_1_e2),
            k0: scale_factor,
            lon0: central_meridian.to_radians(),
            false_easting,
            false_northing,
            m0: 0.0,
        };
        tm.m0 = tm.meridional_arc(latitude_of_origin.to_radians());
        tm
    }

    /// longitude/latitude degrees to easting/northing
    pub fn forward(&self, lon: f64, lat: f64) -> Result<Coord<f64>, CrsError> {
        let phi = lat.to_radians();
        let dlambda = normalize_longitude(lon.to_radians() - self.lon0);
        if dlambda.abs() >= FRAC_PI_2 {
            return Err(CrsError::Transform(format!(
                "longitude {lon} is too far from the central meridian {}",
                self.lon0.to_degrees()
            )));
        }

        let (sin_phi, cos_phi) = phi.sin_cos();
        let tan_phi = phi.tan();
        let n = self.a / (1.0 - self.e2 * sin_phi * sin_phi).sqrt();
        let t = tan_phi * tan_phi;
        let c = self.ep2 * cos_phi * cos_phi;
        let a = dlambda * cos_phi;
        let m = self.meridional_arc(phi);
        let ep2 = self.ep2;

        let x = self.k0
            * n
            * (a + (1.0 - t + c) * a.powi(3) / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a.powi(5) / 120.0);
        let y = self.k0
            * (m - self.m0
                + n * tan_phi
                    * (a * a / 2.0
                        + (5.0 - t + 9.0 * c + 4.0 * c * c) * a.powi(4) / 24.0
                        + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a.powi(6)
                            / 720.0));

        Ok(Coord {
            x: x + self.false_easting,
            y: y + self.false_northing,
        })
    }

    /// easting/northing to longitude/latitude degrees
    pub fn inverse(&self, x: f64, y: f64) -> Result<Coord<f64>, CrsError> {
        let (e2, ep2, e1) = (self.e2, self.ep2, self.e1);
        let e4 = e2 * e2;
        let e6 = e4 * e2;

        let m = self.m0 + (y - self.false_northing) / self.k0;
        let mu = m / (self.a * (1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));
        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();
        if phi1.abs() >= FRAC_PI_2 {
            return Err(CrsError::Transform(format!(
                "northing {y} lies beyond the pole"
            )));
        }

        let (sin_phi1, cos_phi1) = phi1.sin_cos();
        let tan_phi1 = phi1.tan();
        let c1 = ep2 * cos_phi1 * cos_phi1;
        let t1 = tan_phi1 * tan_phi1;
        let w = 1.0 - e2 * sin_phi1 * sin_phi1;
        let n1 = self.a / w.sqrt();
        let r1 = self.a * (1.0 - e2) / w.powf(1.5);
        let d = (x - self.false_easting) / (n1 * self.k0);

        let phi = phi1
            - (n1 * tan_phi1 / r1)
                * (d * d / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d.powi(4) / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep2 - 3.0 * c1 * c1)
                        * d.powi(6)
                        / 720.0);
        let lambda = self.lon0
            + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
                + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1)
                    * d.powi(5)
                    / 120.0)
                / cos_phi1;

        Ok(Coord {
            x: normalize_longitude(lambda).to_degrees(),
            y: phi.to_degrees(),
        })
    }

    fn meridional_arc(&self, phi: f64) -> f64 {
        let e2 = self.e2;
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        self.a
            * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
                - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
                + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
                - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utm(zone: u32, south: bool) -> TransverseMercator {
        let false_northing = if south { 10_000_000.0 } else { 0.0 };
        TransverseMercator::new(
            Ellipsoid::Wgs84,
            0.0,
            zone as f64 * 6.0 - 183.0,
            0.9996,
            500_000.0,
            false_northing,
        )
    }

    #[test]
    fn test_central_meridian_maps_to_false_easting() {
        let c = utm(31, false).forward(3.0, 0.0).unwrap();
        assert!((c.x - 500_000.0).abs() < 1e-6);
        assert!(c.y.abs() < 1e-6);
    }

    #[test]
    fn test_known_value_zone_31() {
        // reference easting for (0, 0) in UTM zone 31N
        let c = utm(31, false).forward(0.0, 0.0).unwrap();
        assert!((c.x - 166_021.443).abs() < 0.01, "{c:?}");
        assert!(c.y.abs() < 1e-6);
    }

    #[test]
    fn test_amsterdam_zone_31() {
        let c = utm(31, false).forward(4.9, 52.37).unwrap();
        assert!((c.x - 629_351.9).abs() < 1.0, "{c:?}");
        assert!((c.y - 5_803_890.8).abs() < 1.0, "{c:?}");
    }

    #[test]
    fn test_round_trip_southern_hemisphere() {
        let tm = utm(56, true);
        let c = tm.forward(151.2, -33.87).unwrap();
        let back = tm.inverse(c.x, c.y).unwrap();
        assert!((back.x - 151.2).abs() < 1e-7, "{back:?}");
        assert!((back.y + 33.87).abs() < 1e-7, "{back:?}");
    }

    #[test]
    fn test_far_from_central_meridian_rejected() {
        assert!(utm(31, false).forward(120.0, 10.0).is_err());
    }
}
