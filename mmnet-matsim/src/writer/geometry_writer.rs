use std::path::Path;

use geo::LineString;
use mmnet_core::model::{Link, SegmentHeading};
use wkt::ToWkt;

use super::{coordinates::CoordinateFormatter, MatsimWriterError};
use crate::util::fs::CsvOutput;

pub const GEOMETRY_LINK_ID_HEADER: &str = "LINK_ID";
pub const GEOMETRY_HEADER: &str = "GEOMETRY";

/// tab separated side file holding, per MATSim link, the interior vertices of its
/// geometry in travel direction as a WKT line string. MATSim links themselves are
/// straight lines between their end nodes.
pub struct DetailedGeometryWriter {
    csv: CsvOutput,
    written: usize,
    missing: usize,
}

impl DetailedGeometryWriter {
    pub fn create(path: &Path, compress: bool) -> Result<Self, MatsimWriterError> {
        let mut csv = CsvOutput::create(path, b'\t', compress)?;
        csv.write_record([GEOMETRY_LINK_ID_HEADER, GEOMETRY_HEADER])?;
        Ok(Self {
            csv,
            written: 0,
            missing: 0,
        })
    }

    /// writes the interior vertices of the segment of `link` in direction `heading`.
    /// straight links have no interior vertices and produce no row.
    pub fn write_segment(
        &mut self,
        matsim_link_id: &str,
        link: &Link,
        heading: SegmentHeading,
        coordinates: &CoordinateFormatter,
    ) -> Result<(), MatsimWriterError> {
        let geometry = match link.geometry.as_ref() {
            Some(geometry) => geometry,
            None => {
                log::warn!(
                    "link '{}' has no geometry, no detailed geometry written for MATSim link {matsim_link_id}",
                    link.xml_id
                );
                self.missing += 1;
                return Ok(());
            }
        };
        let n = geometry.0.len();
        if n <= 2 {
            return Ok(());
        }

        let mut interior = geometry.0[1..n - 1].to_vec();
        if heading == SegmentHeading::Backward {
            interior.reverse();
        }
        let projected = match coordinates.project_line_string(&LineString::new(interior)) {
            Ok(line) => line,
            Err(e) => {
                log::warn!(
                    "unable to transform geometry of link '{}', no detailed geometry written for MATSim link {matsim_link_id}: {e}",
                    link.xml_id
                );
                self.missing += 1;
                return Ok(());
            }
        };
        let wkt = projected.to_wkt().to_string();
        self.csv.write_record([matsim_link_id, wkt.as_str()])?;
        self.written += 1;
        Ok(())
    }

    /// rows written
    pub fn written(&self) -> usize {
        self.written
    }

    /// segments skipped for lacking a usable geometry
    pub fn missing(&self) -> usize {
        self.missing
    }

    pub fn path(&self) -> &Path {
        self.csv.path()
    }

    pub fn finish(self) -> Result<(), MatsimWriterError> {
        self.csv.finish()
    }
}
