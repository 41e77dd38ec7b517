use serde::{Deserialize, Serialize};

/// reference ellipsoids of the supported datums. WGS84 and GRS80 based datums are
/// treated as coincident (no datum shift is applied between them).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Ellipsoid {
    #[default]
    Wgs84,
    Grs80,
}

impl Ellipsoid {
    /// semi-major axis in metres
    pub fn semi_major_axis(&self) -> f64 {
        6_378_137.0
    }

    pub fn inverse_flattening(&self) -> f64 {
        match self {
            Ellipsoid::Wgs84 => 298.257_223_563,
            Ellipsoid::Grs80 => 298.257_222_101,
        }
    }

    /// first eccentricity squared
    pub fn eccentricity_squared(&self) -> f64 {
        let f = 1.0 / self.inverse_flattening();
        f * (2.0 - f)
    }
}
