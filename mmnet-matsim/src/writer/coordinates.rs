use std::cell::Cell;

use geo::{Coord, LineString};
use mmnet_core::{
    crs::{CrsError, ResolvedCrs},
    model::Position,
};

use super::format::{format_decimal, round_to};

/// reprojects source coordinates into the target CRS of the run and formats them to
/// the configured precision. shared by all writers of one run.
pub struct CoordinateFormatter<'a> {
    crs: &'a ResolvedCrs,
    decimals: usize,
    elevation_warned: Cell<bool>,
}

impl<'a> CoordinateFormatter<'a> {
    pub fn new(crs: &'a ResolvedCrs, decimals: usize) -> Self {
        Self {
            crs,
            decimals,
            elevation_warned: Cell::new(false),
        }
    }

    pub fn crs(&self) -> &ResolvedCrs {
        self.crs
    }

    /// position in the target CRS. elevation is not part of the output.
    pub fn project(&self, position: &Position) -> Result<Coord<f64>, CrsError> {
        if position.z.is_some() && !self.elevation_warned.replace(true) {
            log::warn!("positions carry an elevation, which is not supported and ignored");
        }
        self.crs.apply(position.coord())
    }

    /// line string in the target CRS rounded to the configured precision
    pub fn project_line_string(&self, line: &LineString<f64>) -> Result<LineString<f64>, CrsError> {
        let projected = self.crs.apply_line_string(line)?;
        let rounded = projected
            .coords()
            .map(|c| Coord {
                x: round_to(c.x, self.decimals),
                y: round_to(c.y, self.decimals),
            })
            .collect::<Vec<_>>();
        Ok(LineString::new(rounded))
    }

    pub fn format(&self, value: f64) -> String {
        format_decimal(value, self.decimals)
    }

    /// formatted x and y of a projected coordinate
    pub fn format_coord(&self, coord: Coord<f64>) -> (String, String) {
        (self.format(coord.x), self.format(coord.y))
    }
}
