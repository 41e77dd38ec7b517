use geo::{Coord, LineString};

use super::{Crs, CrsError, PreparedProjection};

/// maps coordinates from a source CRS to a target CRS by way of longitude/latitude
/// degrees. built once per run and reused for every coordinate.
#[derive(Debug, Clone)]
pub struct CrsTransform {
    source: Crs,
    target: Crs,
    from: PreparedProjection,
    to: PreparedProjection,
}

impl CrsTransform {
    pub fn new(source: Crs, target: Crs) -> Result<Self, CrsError> {
        let from = prepare(&source)?;
        let to = prepare(&target)?;
        Ok(Self {
            source,
            target,
            from,
            to,
        })
    }

    pub fn source(&self) -> &Crs {
        &self.source
    }

    pub fn target(&self) -> &Crs {
        &self.target
    }

    pub fn transform(&self, coord: Coord<f64>) -> Result<Coord<f64>, CrsError> {
        let lonlat = self.from.inverse(coord)?;
        self.to.forward(lonlat)
    }

    pub fn transform_line_string(
        &self,
        line: &LineString<f64>,
    ) -> Result<LineString<f64>, CrsError> {
        line.coords()
            .map(|c| self.transform(*c))
            .collect::<Result<Vec<_>, _>>()
            .map(LineString::new)
    }
}

fn prepare(crs: &Crs) -> Result<PreparedProjection, CrsError> {
    crs.projection
        .prepare()
        .map_err(|message| CrsError::InvalidDefinition {
            code: crs.code.clone(),
            message,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::CrsRegistry;

    fn transform(source: &str, target: &str) -> CrsTransform {
        let registry = CrsRegistry::new();
        CrsTransform::new(
            registry.lookup(source).unwrap(),
            registry.lookup(target).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_geographic_to_utm() {
        let t = transform("EPSG:4326", "EPSG:32631");
        let c = t.transform(Coord { x: 4.9, y: 52.37 }).unwrap();
        assert!((c.x - 629_351.9).abs() < 1.0, "{c:?}");
        assert!((c.y - 5_803_890.8).abs() < 1.0, "{c:?}");
    }

    #[test]
    fn test_projected_to_projected() {
        let forward = transform("EPSG:28356", "EPSG:3112");
        let backward = transform("EPSG:3112", "EPSG:28356");
        let mga = Coord {
            x: 333_510.65,
            y: 6_250_800.24,
        };
        let lambert = forward.transform(mga).unwrap();
        assert!((lambert.x - 1_578_129.9).abs() < 1.0, "{lambert:?}");
        assert!((lambert.y + 3_922_944.0).abs() < 1.0, "{lambert:?}");
        let back = backward.transform(lambert).unwrap();
        assert!((back.x - mga.x).abs() < 1e-3 && (back.y - mga.y).abs() < 1e-3);
    }

    #[test]
    fn test_line_string() {
        let t = transform("EPSG:4326", "EPSG:3857");
        let line = LineString::from(vec![(0.0, 0.0), (180.0, 0.0)]);
        let projected = t.transform_line_string(&line).unwrap();
        assert_eq!(projected.0.len(), 2);
        assert!((projected.0[1].x - 20_037_508.342_789).abs() < 1e-3);
    }

    #[test]
    fn test_out_of_domain_fails() {
        let t = transform("EPSG:3857", "EPSG:4326");
        assert!(t.transform(Coord { x: f64::NAN, y: 0.0 }).is_err());
    }

    #[test]
    fn test_huge_longitude_fails() {
        let t = transform("EPSG:4326", "EPSG:32631");
        let result = t.transform(Coord { x: 1e300, y: 10.0 });
        assert!(matches!(result, Err(CrsError::Transform(_))));
    }
}
