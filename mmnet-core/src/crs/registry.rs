use indexmap::IndexMap;

use super::{normalize_code, Crs, CrsError, Ellipsoid, Projection};

/// resolves coordinate reference system codes into [Crs] values. custom definitions
/// registered on the registry take precedence over the built-in EPSG codes.
#[derive(Debug, Clone, Default)]
pub struct CrsRegistry {
    custom: IndexMap<String, Projection>,
}

impl CrsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// registry holding the given custom definitions, keyed by code.
    pub fn with_custom<'a, I>(definitions: I) -> Result<Self, CrsError>
    where
        I: IntoIterator<Item = (&'a String, &'a Projection)>,
    {
        let mut registry = Self::new();
        for (code, projection) in definitions {
            registry.register(code, projection.clone())?;
        }
        Ok(registry)
    }

    /// adds a custom definition, validating it first.
    pub fn register(&mut self, code: &str, projection: Projection) -> Result<(), CrsError> {
        let code = normalize_code(code);
        projection
            .prepare()
            .map_err(|message| CrsError::InvalidDefinition {
                code: code.clone(),
                message,
            })?;
        self.custom.insert(code, projection);
        Ok(())
    }

    pub fn lookup(&self, code: &str) -> Result<Crs, CrsError> {
        let normalized = normalize_code(code);
        if let Some(projection) = self.custom.get(&normalized) {
            return Ok(Crs::new(&normalized, projection.clone()));
        }
        let projection = builtin_projection(&normalized)
            .ok_or_else(|| CrsError::UnknownCode(code.to_string()))?;
        Ok(Crs::new(&normalized, projection))
    }
}

fn builtin_projection(code: &str) -> Option<Projection> {
    let epsg = code.strip_prefix("EPSG:")?.parse::<u32>().ok()?;
    let projection = match epsg {
        // WGS84, ETRS89, GDA94, NZGD2000
        4326 | 4258 | 4283 | 4167 => Projection::Geographic,
        3857 | 900913 => Projection::WebMercator,
        32601..=32660 => Projection::utm(epsg - 32600, false, Ellipsoid::Wgs84),
        32701..=32760 => Projection::utm(epsg - 32700, true, Ellipsoid::Wgs84),
        // ETRS89 / UTM zones 28N-38N
        25828..=25838 => Projection::utm(epsg - 25800, false, Ellipsoid::Grs80),
        // GDA94 / MGA zones 48-58
        28348..=28358 => Projection::utm(epsg - 28300, true, Ellipsoid::Grs80),
        // GDA94 / Geoscience Australia Lambert
        3112 => Projection::LambertConformalConic {
            ellipsoid: Ellipsoid::Grs80,
            standard_parallel_1: -18.0,
            standard_parallel_2: -36.0,
            latitude_of_origin: 0.0,
            central_meridian: 134.0,
            false_easting: 0.0,
            false_northing: 0.0,
        },
        // NZGD2000 / New Zealand Transverse Mercator 2000
        2193 => Projection::TransverseMercator {
            ellipsoid: Ellipsoid::Grs80,
            latitude_of_origin: 0.0,
            central_meridian: 173.0,
            scale_factor: 0.9996,
            false_easting: 1_600_000.0,
            false_northing: 10_000_000.0,
        },
        // RGF93 / Lambert-93
        2154 => Projection::LambertConformalConic {
            ellipsoid: Ellipsoid::Grs80,
            standard_parallel_1: 49.0,
            standard_parallel_2: 44.0,
            latitude_of_origin: 46.5,
            central_meridian: 3.0,
            false_easting: 700_000.0,
            false_northing: 6_600_000.0,
        },
        // ETRS89 / Belgian Lambert 2008
        3812 => Projection::LambertConformalConic {
            ellipsoid: Ellipsoid::Grs80,
            standard_parallel_1: 49.833_333_333,
            standard_parallel_2: 51.166_666_667,
            latitude_of_origin: 50.797_815,
            central_meridian: 4.359_215_833,
            false_easting: 649_328.0,
            false_northing: 665_262.0,
        },
        // SVY21 / Singapore TM
        3414 => Projection::TransverseMercator {
            ellipsoid: Ellipsoid::Wgs84,
            latitude_of_origin: 1.366_666_667,
            central_meridian: 103.833_333_333,
            scale_factor: 1.0,
            false_easting: 28_001.642,
            false_northing: 38_744.572,
        },
        // SWEREF99 TM
        3006 => Projection::TransverseMercator {
            ellipsoid: Ellipsoid::Grs80,
            latitude_of_origin: 0.0,
            central_meridian: 15.0,
            scale_factor: 0.9996,
            false_easting: 500_000.0,
            false_northing: 0.0,
        },
        _ => return None,
    };
    Some(projection)
}
