use geo::{Coord, LineString};

use super::{default_crs_code_for_country, Crs, CrsError, CrsRegistry, CrsTransform};

/// the target CRS of an export run and, when it differs from the CRS of the source
/// network, the transform into it. fixed for the whole run once resolved.
#[derive(Debug, Clone)]
pub struct ResolvedCrs {
    pub target: Crs,
    pub source: Option<Crs>,
    pub transform: Option<CrsTransform>,
}

impl ResolvedCrs {
    /// maps a source coordinate into the target CRS
    pub fn apply(&self, coord: Coord<f64>) -> Result<Coord<f64>, CrsError> {
        match &self.transform {
            Some(t) => t.transform(coord),
            None => Ok(coord),
        }
    }

    pub fn apply_line_string(&self, line: &LineString<f64>) -> Result<LineString<f64>, CrsError> {
        match &self.transform {
            Some(t) => t.transform_line_string(line),
            None => Ok(line.clone()),
        }
    }

    /// whether source coordinates are longitude/latitude degrees. without a source
    /// CRS, coordinates are read as already being in the target CRS.
    pub fn source_is_geographic(&self) -> bool {
        self.source
            .as_ref()
            .unwrap_or(&self.target)
            .is_geographic()
    }
}

/// determines the target CRS of a run. an explicitly configured code wins, then the
/// default of the country hint, then the CRS of the source network. having none of
/// them is an error.
pub fn resolve(
    explicit: Option<&str>,
    country: Option<&str>,
    source: Option<&str>,
    registry: &CrsRegistry,
) -> Result<ResolvedCrs, CrsError> {
    fn non_blank(s: Option<&str>) -> Option<&str> {
        s.map(str::trim).filter(|s| !s.is_empty())
    }

    let target_code = match non_blank(explicit) {
        Some(code) => code.to_string(),
        None => match non_blank(country).and_then(default_crs_code_for_country) {
            Some(code) => code.to_string(),
            None => match non_blank(source) {
                Some(code) => code.to_string(),
                None => {
                    return Err(CrsError::Unresolved(String::from(
                        "no crs configured, no known country given and the network has no crs",
                    )))
                }
            },
        },
    };
    let target = registry.lookup(&target_code)?;

    let source = match non_blank(source) {
        Some(code) => Some(registry.lookup(code)?),
        None => {
            log::warn!(
                "network has no coordinate reference system, coordinates are written as found and assumed to be in {target}"
            );
            None
        }
    };

    let transform = match &source {
        Some(s) if !s.same_as(&target) => Some(CrsTransform::new(s.clone(), target.clone())?),
        _ => None,
    };

    match &source {
        Some(s) if transform.is_some() => {
            log::info!("coordinate reference system: {target} (transformed from {s})")
        }
        _ => log::info!("coordinate reference system: {target}"),
    }

    Ok(ResolvedCrs {
        target,
        source,
        transform,
    })
}
