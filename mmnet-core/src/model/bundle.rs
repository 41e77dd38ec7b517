use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ModelError, TransitServices, TransportNetwork, Zoning};

/// a complete in-memory model ready for export: the physical network and, optionally,
/// the stops and scheduled services that reference it.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ModelBundle {
    pub network: TransportNetwork,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub zoning: Option<Zoning>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub services: Option<TransitServices>,
}

impl ModelBundle {
    /// reads a bundle stored as JSON.
    pub fn from_json_file(path: &Path) -> Result<Self, ModelError> {
        let contents = std::fs::read(path).map_err(|e| ModelError::ReadError {
            path: path.to_owned(),
            message: e.to_string(),
        })?;
        serde_json::from_slice::<ModelBundle>(&contents).map_err(|e| ModelError::ReadError {
            path: path.to_owned(),
            message: format!("failed to deserialize from JSON: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LinkSegmentId, ModeId, NodeId, PredefinedModeType};

    const MODEL: &str = r#"{
        "network": {
            "crs": "EPSG:4326",
            "modes": [
                { "id": 0, "xml_id": "car", "max_speed_kmh": 120.0, "predefined_type": "car" }
            ],
            "layers": [{
                "xml_id": "road",
                "nodes": [
                    { "id": 0, "xml_id": "a", "position": { "x": 4.9, "y": 52.37 } },
                    { "id": 1, "xml_id": "b", "position": { "x": 4.91, "y": 52.37, "z": 3.0 } }
                ],
                "links": [{
                    "id": 0,
                    "xml_id": "l",
                    "node_a": 0,
                    "node_b": 1,
                    "geometry": [{ "x": 4.9, "y": 52.37 }, { "x": 4.91, "y": 52.37 }],
                    "segment_ab": {
                        "id": 0,
                        "xml_id": "s",
                        "max_speed_kmh": 50.0,
                        "allowed_modes": [0],
                        "link_segment_type": 0
                    }
                }],
                "link_segment_types": [
                    { "id": 0, "xml_id": "t", "capacity_per_lane_pcuh": 1200.0 }
                ]
            }]
        }
    }"#;

    #[test]
    fn test_read_json_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, MODEL).unwrap();
        let bundle = ModelBundle::from_json_file(&path).unwrap();
        assert!(bundle.zoning.is_none());
        assert!(bundle.services.is_none());

        let network = &bundle.network;
        assert_eq!(network.modes[0].predefined_type, PredefinedModeType::Car);
        let layer = network.single_macroscopic_layer().unwrap();
        assert_eq!(layer.nodes[1].position.and_then(|p| p.z), Some(3.0));
        let link = &layer.links[0];
        assert_eq!(link.node_b, NodeId(1));
        assert_eq!(link.geometry.as_ref().map(|g| g.0.len()), Some(2));
        let segment = link.segment_ab.as_ref().unwrap();
        assert_eq!(segment.id, LinkSegmentId(0));
        assert_eq!(segment.lanes, 1);
        assert!(segment.allows_mode(&ModeId(0)));
        assert_eq!(layer.link_segment_types[0].max_density_pcukm, 180.0);
    }

    #[test]
    fn test_unreadable_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let missing = ModelBundle::from_json_file(&dir.path().join("absent.json"));
        assert!(matches!(missing, Err(ModelError::ReadError { .. })));

        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ \"network\": 3 }").unwrap();
        let broken = ModelBundle::from_json_file(&path);
        assert!(matches!(broken, Err(ModelError::ReadError { .. })));
    }
}
