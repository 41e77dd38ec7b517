use std::path::Path;

use super::{transit_writer::StopFacilityRecord, MatsimWriterError};
use crate::util::fs::CsvOutput;

/// writes the `id,x,y` stop list consumed by the MATSim matrix based router.
pub fn write_matrix_router_file(
    path: &Path,
    compress: bool,
    stops: &[StopFacilityRecord],
) -> Result<(), MatsimWriterError> {
    let mut csv = CsvOutput::create(path, b',', compress)?;
    csv.write_record(["id", "x", "y"])?;
    for stop in stops {
        csv.write_record([stop.id.as_str(), stop.x.as_str(), stop.y.as_str()])?;
    }
    csv.finish()?;
    log::info!("wrote {} stops to '{}'", stops.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stops.csv");
        let stops = vec![StopFacilityRecord {
            id: String::from("s,1"),
            x: String::from("1.5"),
            y: String::from("2"),
            link_ref_id: String::from("7"),
            name: None,
        }];
        write_matrix_router_file(&path, false, &stops).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "id,x,y\n\"s,1\",1.5,2\n");
    }
}
