use std::f64::consts::PI;

use geo::Coord;
use serde::{Deserialize, Serialize};

use super::{
    lambert_conformal_conic::LambertConformalConic, transverse_mercator::TransverseMercator,
    CrsError, Ellipsoid,
};

/// spherical web mercator is undefined towards the poles
const WEB_MERCATOR_MAX_LATITUDE: f64 = 85.051_128_779_806_6;
/// longitudes beyond one and a half turns are treated as corrupt input
const MAX_LONGITUDE: f64 = 540.0;

/// definition of how a coordinate reference system maps longitude/latitude degrees onto
/// its own coordinates. angles are in degrees, distances in metres.
///
/// custom systems can be defined in configuration, for example
/// `{ type = "offset", dx = 1000.0, dy = -50.0 }`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Projection {
    /// longitude/latitude degrees
    Geographic,
    /// spherical (pseudo) mercator on the WGS84 semi-major axis
    WebMercator,
    TransverseMercator {
        #[serde(default)]
        ellipsoid: Ellipsoid,
        #[serde(default)]
        latitude_of_origin: f64,
        central_meridian: f64,
        scale_factor: f64,
        #[serde(default)]
        false_easting: f64,
        #[serde(default)]
        false_northing: f64,
    },
    /// lambert conformal conic with two standard parallels
    LambertConformalConic {
        #[serde(default)]
        ellipsoid: Ellipsoid,
        standard_parallel_1: f64,
        standard_parallel_2: f64,
        latitude_of_origin: f64,
        central_meridian: f64,
        #[serde(default)]
        false_easting: f64,
        #[serde(default)]
        false_northing: f64,
    },
    /// longitude/latitude degrees shifted by a constant offset
    Offset { dx: f64, dy: f64 },
}

impl Projection {
    /// universal transverse mercator zone, numbered 1..=60
    pub fn utm(zone: u32, south: bool, ellipsoid: Ellipsoid) -> Self {
        Projection::TransverseMercator {
            ellipsoid,
            latitude_of_origin: 0.0,
            central_meridian: zone as f64 * 6.0 - 183.0,
            scale_factor: 0.9996,
            false_easting: 500_000.0,
            false_northing: if south { 10_000_000.0 } else { 0.0 },
        }
    }

    /// validates the definition and precomputes its constants.
    pub fn prepare(&self) -> Result<PreparedProjection, String> {
        match self {
            Projection::Geographic => Ok(PreparedProjection::Geographic),
            Projection::WebMercator => Ok(PreparedProjection::WebMercator),
            Projection::TransverseMercator {
                ellipsoid,
                latitude_of_origin,
                central_meridian,
                scale_factor,
                false_easting,
                false_northing,
            } => {
                if *scale_factor <= 0.0 {
                    return Err(format!("scale factor must be positive, found {scale_factor}"));
                }
                validate_latitude(*latitude_of_origin)?;
                let tm = TransverseMercator::new(
                    *ellipsoid,
                    *latitude_of_origin,
                    *central_meridian,
                    *scale_factor,
                    *false_easting,
                    *false_northing,
                );
                Ok(PreparedProjection::TransverseMercator(tm))
            }
            Projection::LambertConformalConic {
                ellipsoid,
                standard_parallel_1,
                standard_parallel_2,
                latitude_of_origin,
                central_meridian,
                false_easting,
                false_northing,
            } => {
                for lat in [standard_parallel_1, standard_parallel_2] {
                    if lat.abs() >= 90.0 {
                        return Err(format!("standard parallel {lat} must lie strictly between the poles"));
                    }
                }
                if (standard_parallel_1 + standard_parallel_2).abs() < 1e-10 {
                    return Err(String::from(
                        "standard parallels may not be symmetric around the equator",
                    ));
                }
                validate_latitude(*latitude_of_origin)?;
                let lcc = LambertConformalConic::new(
                    *ellipsoid,
                    *standard_parallel_1,
                    *standard_parallel_2,
                    *latitude_of_origin,
                    *central_meridian,
                    *false_easting,
                    *false_northing,
                );
                Ok(PreparedProjection::LambertConformalConic(lcc))
            }
            Projection::Offset { dx, dy } => {
                if !dx.is_finite() || !dy.is_finite() {
                    return Err(format!("offset ({dx}, {dy}) must be finite"));
                }
                Ok(PreparedProjection::Offset { dx: *dx, dy: *dy })
            }
        }
    }
}

fn validate_latitude(lat: f64) -> Result<(), String> {
    if (-90.0..=90.0).contains(&lat) {
        Ok(())
    } else {
        Err(format!("latitude {lat} out of range [-90, 90]"))
    }
}

/// a [Projection] with its constants computed, ready to map coordinates.
#[derive(Debug, Clone)]
pub enum PreparedProjection {
    Geographic,
    WebMercator,
    TransverseMercator(TransverseMercator),
    LambertConformalConic(LambertConformalConic),
    Offset { dx: f64, dy: f64 },
}

impl PreparedProjection {
    /// maps longitude/latitude degrees into this system
    pub fn forward(&self, lonlat: Coord<f64>) -> Result<Coord<f64>, CrsError> {
        let Coord { x: lon, y: lat } = lonlat;
        if !(-90.0..=90.0).contains(&lat) || !(-MAX_LONGITUDE..=MAX_LONGITUDE).contains(&lon) {
            return Err(CrsError::Transform(format!(
                "({lon}, {lat}) is not a valid longitude/latitude"
            )));
        }
        let result = match self {
            PreparedProjection::Geographic => lonlat,
            PreparedProjection::WebMercator => {
                if lat.abs() > WEB_MERCATOR_MAX_LATITUDE {
                    return Err(CrsError::Transform(format!(
                        "latitude {lat} outside of web mercator bounds"
                    )));
                }
                let a = Ellipsoid::Wgs84.semi_major_axis();
                let lambda = normalize_longitude(lon.to_radians());
                let phi = lat.to_radians();
                Coord {
                    x: a * lambda,
                    y: a * (PI / 4.0 + phi / 2.0).tan().ln(),
                }
            }
            PreparedProjection::TransverseMercator(tm) => tm.forward(lon, lat)?,
            PreparedProjection::LambertConformalConic(lcc) => lcc.forward(lon, lat)?,
            PreparedProjection::Offset { dx, dy } => Coord {
                x: lon + dx,
                y: lat + dy,
            },
        };
        finite(result)
    }

    /// maps coordinates of this system into longitude/latitude degrees
    pub fn inverse(&self, coord: Coord<f64>) -> Result<Coord<f64>, CrsError> {
        if !coord.x.is_finite() || !coord.y.is_finite() {
            return Err(CrsError::Transform(format!(
                "({}, {}) is not a finite coordinate",
                coord.x, coord.y
            )));
        }
        let result = match self {
            PreparedProjection::Geographic => coord,
            PreparedProjection::WebMercator => {
                let a = Ellipsoid::Wgs84.semi_major_axis();
                Coord {
                    x: (coord.x / a).to_degrees(),
                    y: (2.0 * (coord.y / a).exp().atan() - PI / 2.0).to_degrees(),
                }
            }
            PreparedProjection::TransverseMercator(tm) => tm.inverse(coord.x, coord.y)?,
            PreparedProjection::LambertConformalConic(lcc) => lcc.inverse(coord.x, coord.y)?,
            PreparedProjection::Offset { dx, dy } => Coord {
                x: coord.x - dx,
                y: coord.y - dy,
            },
        };
        finite(result)
    }
}

fn finite(coord: Coord<f64>) -> Result<Coord<f64>, CrsError> {
    if coord.x.is_finite() && coord.y.is_finite() {
        Ok(coord)
    } else {
        Err(CrsError::Transform(format!(
            "projection produced a non-finite coordinate ({}, {})",
            coord.x, coord.y
        )))
    }
}

/// wraps an angle in radians into (-pi, pi]
pub(super) fn normalize_longitude(lambda: f64) -> f64 {
    PI - (PI - lambda).rem_euclid(2.0 * PI)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_mercator_antimeridian() {
        let p = Projection::WebMercator.prepare().unwrap();
        let c = p.forward(Coord { x: 180.0, y: 0.0 }).unwrap();
        assert!((c.x - 20_037_508.342_789).abs() < 1e-3);
        assert!(c.y.abs() < 1e-6);
    }

    #[test]
    fn test_web_mercator_round_trip() {
        let p = Projection::WebMercator.prepare().unwrap();
        let input = Coord { x: 151.2, y: -33.87 };
        let back = p.inverse(p.forward(input).unwrap()).unwrap();
        assert!((back.x - input.x).abs() < 1e-9);
        assert!((back.y - input.y).abs() < 1e-9);
    }

    #[test]
    fn test_web_mercator_rejects_poles() {
        let p = Projection::WebMercator.prepare().unwrap();
        assert!(p.forward(Coord { x: 0.0, y: 89.0 }).is_err());
    }

    #[test]
    fn test_offset_forward_and_inverse() {
        let p = Projection::Offset { dx: 10.0, dy: -5.0 }.prepare().unwrap();
        let c = p.forward(Coord { x: 1.5, y: 2.5 }).unwrap();
        assert_eq!(c, Coord { x: 11.5, y: -2.5 });
        assert_eq!(p.inverse(c).unwrap(), Coord { x: 1.5, y: 2.5 });
    }

    #[test]
    fn test_normalize_longitude() {
        assert!((normalize_longitude(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
        assert!((normalize_longitude(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-12);
        assert!((normalize_longitude(0.5) - 0.5).abs() < 1e-12);
        assert!((normalize_longitude(PI) - PI).abs() < 1e-12);
        let huge = normalize_longitude(1e300);
        assert!(huge > -PI && huge <= PI, "{huge}");
    }

    #[test]
    fn test_invalid_latitude_rejected() {
        let p = Projection::Geographic.prepare().unwrap();
        assert!(p.forward(Coord { x: 0.0, y: 91.0 }).is_err());
    }

    #[test]
    fn test_huge_longitude_rejected() {
        let p = Projection::utm(31, false, Ellipsoid::Wgs84).prepare().unwrap();
        let result = p.forward(Coord { x: 1e300, y: 10.0 });
        assert!(matches!(result, Err(CrsError::Transform(_))));
        let wrapped = p.forward(Coord { x: 363.0, y: 0.0 }).unwrap();
        assert!((wrapped.x - 500_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_definitions() {
        let tm = Projection::TransverseMercator {
            ellipsoid: Ellipsoid::Wgs84,
            latitude_of_origin: 0.0,
            central_meridian: 3.0,
            scale_factor: 0.0,
            false_easting: 0.0,
            false_northing: 0.0,
        };
        assert!(tm.prepare().is_err());
        let lcc = Projection::LambertConformalConic {
            ellipsoid: Ellipsoid::Grs80,
            standard_parallel_1: 30.0,
            standard_parallel_2: -30.0,
            latitude_of_origin: 0.0,
            central_meridian: 0.0,
            false_easting: 0.0,
            false_northing: 0.0,
        };
        assert!(lcc.prepare().is_err());
    }

    #[test]
    fn test_deserialize_custom_projection() {
        let offset: Projection = toml::from_str("type = \"offset\"\ndx = 1.0\ndy = 2.0").unwrap();
        assert_eq!(offset, Projection::Offset { dx: 1.0, dy: 2.0 });
        let tm: Projection = toml::from_str(
            "type = \"transverse_mercator\"\ncentral_meridian = 9.0\nscale_factor = 0.9996\nfalse_easting = 500000.0",
        )
        .unwrap();
        assert_eq!(tm, Projection::utm(32, false, Ellipsoid::Wgs84));
    }
}
