use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use mmnet_core::id_mapping::IdMappingType;
use serde::{Deserialize, Serialize};

use crate::writer::{MatsimWriterError, NetworkWriterStats, TransitWriterStats};

/// summarizes a MATSim export run.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ExportSummary {
    /// CRS of all written coordinates
    pub target_crs: String,
    /// CRS of the source network, when it declares one
    pub source_crs: Option<String>,
    pub id_mapping: IdMappingType,
    /// MATSim mode of every network mode that made it into the output
    pub modes: IndexMap<String, String>,
    pub network: NetworkWriterStats,
    /// absent when no transit schedule was written
    pub transit: Option<TransitWriterStats>,
    /// names of the written files, relative to the output directory
    pub files: Vec<String>,
}

impl ExportSummary {
    pub fn write_json(&self, path: &Path) -> Result<(), MatsimWriterError> {
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            MatsimWriterError::InternalError(format!("failed to serialize export summary: {e}"))
        })?;
        std::fs::write(path, contents).map_err(|e| MatsimWriterError::WriteError {
            path: path.to_owned(),
            message: e.to_string(),
        })
    }
}

/// file name of each path, for reporting
pub(super) fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect()
}
