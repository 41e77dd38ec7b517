use std::collections::HashMap;

use geo::{Euclidean, Haversine, Length, LineString};

use super::{
    Link, LinkSegment, LinkSegmentId, LinkSegmentType, LinkSegmentTypeId, Mode, ModeId,
    ModelError, NetworkLayer, Node, NodeId, SegmentHeading,
};

/// a link segment together with the link it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct SegmentRef<'a> {
    pub link: &'a Link,
    pub segment: &'a LinkSegment,
    pub heading: SegmentHeading,
}

impl SegmentRef<'_> {
    pub fn upstream_node(&self) -> NodeId {
        self.link.upstream_node(self.heading)
    }

    pub fn downstream_node(&self) -> NodeId {
        self.link.downstream_node(self.heading)
    }
}

/// read-only lookup tables over a network layer, built once per export run.
pub struct NetworkIndex<'a> {
    nodes: HashMap<NodeId, &'a Node>,
    segments: HashMap<LinkSegmentId, SegmentRef<'a>>,
    segment_types: HashMap<LinkSegmentTypeId, &'a LinkSegmentType>,
    modes: HashMap<ModeId, &'a Mode>,
}

impl<'a> NetworkIndex<'a> {
    pub fn new(modes: &'a [Mode], layer: &'a NetworkLayer) -> Result<Self, ModelError> {
        let mut nodes = HashMap::with_capacity(layer.nodes.len());
        for node in layer.nodes.iter() {
            if nodes.insert(node.id, node).is_some() {
                return Err(duplicate("node", node.id.0));
            }
        }

        let mut segments = HashMap::with_capacity(layer.links.len() * 2);
        for link in layer.links.iter() {
            for (heading, segment) in link.segments() {
                let entry = SegmentRef {
                    link,
                    segment,
                    heading,
                };
                if segments.insert(segment.id, entry).is_some() {
                    return Err(duplicate("link segment", segment.id.0));
                }
            }
        }

        let mut segment_types = HashMap::with_capacity(layer.link_segment_types.len());
        for segment_type in layer.link_segment_types.iter() {
            if segment_types.insert(segment_type.id, segment_type).is_some() {
                return Err(duplicate("link segment type", segment_type.id.0));
            }
        }

        let mut mode_lookup = HashMap::with_capacity(modes.len());
        for mode in modes.iter() {
            if mode_lookup.insert(mode.id, mode).is_some() {
                return Err(duplicate("mode", mode.id.0));
            }
        }

        Ok(Self {
            nodes,
            segments,
            segment_types,
            modes: mode_lookup,
        })
    }

    pub fn node(&self, id: &NodeId) -> Option<&'a Node> {
        self.nodes.get(id).copied()
    }

    pub fn segment(&self, id: &LinkSegmentId) -> Option<SegmentRef<'a>> {
        self.segments.get(id).copied()
    }

    pub fn mode(&self, id: &ModeId) -> Option<&'a Mode> {
        self.modes.get(id).copied()
    }

    /// the type of a segment. a segment without a (known) type cannot be exported.
    pub fn segment_type_of(&self, segment: &LinkSegment) -> Result<&'a LinkSegmentType, ModelError> {
        let type_id = segment
            .link_segment_type
            .ok_or(ModelError::MissingLinkSegmentType(segment.id))?;
        self.segment_types
            .get(&type_id)
            .copied()
            .ok_or(ModelError::UnknownLinkSegmentType {
                segment: segment.id,
                segment_type: type_id,
            })
    }

    /// the end node of a segment in its direction of travel
    pub fn downstream_node_of(&self, segment: &SegmentRef<'a>) -> Result<&'a Node, ModelError> {
        let node = segment.downstream_node();
        self.node(&node).ok_or(ModelError::UnknownNode {
            link: segment.link.id,
            node,
        })
    }

    /// the start node of a segment in its direction of travel
    pub fn upstream_node_of(&self, segment: &SegmentRef<'a>) -> Result<&'a Node, ModelError> {
        let node = segment.upstream_node();
        self.node(&node).ok_or(ModelError::UnknownNode {
            link: segment.link.id,
            node,
        })
    }

    /// checks that every link references known nodes and every segment a known type,
    /// so an export does not fail halfway through.
    pub fn validate_references(&self, layer: &'a NetworkLayer) -> Result<(), ModelError> {
        for link in layer.links.iter() {
            for (heading, segment) in link.segments() {
                let segment_ref = SegmentRef {
                    link,
                    segment,
                    heading,
                };
                self.upstream_node_of(&segment_ref)?;
                self.downstream_node_of(&segment_ref)?;
                self.segment_type_of(segment)?;
            }
        }
        Ok(())
    }

    /// length of a link in metres. uses the link geometry when available, otherwise the
    /// straight line between its end nodes. `geographic` selects haversine distance over
    /// lon/lat degrees instead of euclidean distance over projected units.
    ///
    /// # Returns
    ///
    /// * None when neither a geometry nor both node positions are available
    pub fn link_length_meters(&self, link: &Link, geographic: bool) -> Option<f64> {
        let straight;
        let line = match link.geometry.as_ref() {
            Some(geometry) if geometry.0.len() >= 2 => geometry,
            _ => {
                let a = self.node(&link.node_a)?.position?;
                let b = self.node(&link.node_b)?.position?;
                straight = LineString::new(vec![a.coord(), b.coord()]);
                &straight
            }
        };
        let length = if geographic {
            Haversine.length(line)
        } else {
            Euclidean.length(line)
        };
        Some(length)
    }
}

fn duplicate(category: &'static str, id: usize) -> ModelError {
    ModelError::DuplicateId { category, id }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::model::{LayerKind, LinkId, Position};

    fn node(id: usize, x: f64, y: f64) -> Node {
        Node {
            id: NodeId(id),
            xml_id: id.to_string(),
            external_id: None,
            position: Some(Position::new(x, y)),
        }
    }

    fn segment(id: usize, segment_type: Option<usize>) -> LinkSegment {
        LinkSegment {
            id: LinkSegmentId(id),
            xml_id: id.to_string(),
            external_id: None,
            lanes: 1,
            max_speed_kmh: 50.0,
            capacity_per_lane_pcuh: None,
            allowed_modes: BTreeSet::new(),
            link_segment_type: segment_type.map(LinkSegmentTypeId),
        }
    }

    fn test_layer() -> NetworkLayer {
        NetworkLayer {
            xml_id: String::from("layer"),
            kind: LayerKind::Macroscopic,
            nodes: vec![node(0, 0.0, 0.0), node(1, 3.0, 4.0)],
            links: vec![Link {
                id: LinkId(0),
                xml_id: String::from("0"),
                external_id: None,
                node_a: NodeId(0),
                node_b: NodeId(1),
                geometry: None,
                segment_ab: Some(segment(0, Some(0))),
                segment_ba: Some(segment(1, None)),
            }],
            link_segment_types: vec![LinkSegmentType {
                id: LinkSegmentTypeId(0),
                xml_id: String::from("t"),
                external_id: None,
                name: None,
                capacity_per_lane_pcuh: 1200.0,
                max_density_pcukm: 180.0,
            }],
        }
    }

    #[test]
    fn test_segment_lookup_knows_direction() {
        let layer = test_layer();
        let index = NetworkIndex::new(&[], &layer).unwrap();
        let backward = index.segment(&LinkSegmentId(1)).unwrap();
        assert_eq!(backward.heading, SegmentHeading::Backward);
        assert_eq!(backward.upstream_node(), NodeId(1));
        assert_eq!(backward.downstream_node(), NodeId(0));
    }

    #[test]
    fn test_missing_segment_type() {
        let layer = test_layer();
        let index = NetworkIndex::new(&[], &layer).unwrap();
        let forward = index.segment(&LinkSegmentId(0)).unwrap();
        let backward = index.segment(&LinkSegmentId(1)).unwrap();
        assert!(index.segment_type_of(forward.segment).is_ok());
        assert!(matches!(
            index.segment_type_of(backward.segment),
            Err(ModelError::MissingLinkSegmentType(LinkSegmentId(1)))
        ));
    }

    #[test]
    fn test_validate_references() {
        let mut layer = test_layer();
        let index = NetworkIndex::new(&[], &layer).unwrap();
        assert!(matches!(
            index.validate_references(&layer),
            Err(ModelError::MissingLinkSegmentType(LinkSegmentId(1)))
        ));

        layer.links[0].segment_ba = None;
        layer.links[0].node_b = NodeId(9);
        let index = NetworkIndex::new(&[], &layer).unwrap();
        assert!(matches!(
            index.validate_references(&layer),
            Err(ModelError::UnknownNode {
                node: NodeId(9),
                ..
            })
        ));
    }

    #[test]
    fn test_duplicate_node_ids_rejected() {
        let mut layer = test_layer();
        layer.nodes.push(node(0, 1.0, 1.0));
        let result = NetworkIndex::new(&[], &layer);
        assert!(matches!(
            result,
            Err(ModelError::DuplicateId {
                category: "node",
                id: 0
            })
        ));
    }

    #[test]
    fn test_length_from_node_positions_when_no_geometry() {
        let layer = test_layer();
        let index = NetworkIndex::new(&[], &layer).unwrap();
        let length = index.link_length_meters(&layer.links[0], false).unwrap();
        assert!((length - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_length_from_geometry() {
        let mut layer = test_layer();
        layer.links[0].geometry = Some(LineString::from(vec![(0.0, 0.0), (0.0, 4.0), (3.0, 4.0)]));
        let index = NetworkIndex::new(&[], &layer).unwrap();
        let length = index.link_length_meters(&layer.links[0], false).unwrap();
        assert!((length - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_haversine_length_of_one_degree_at_equator() {
        let mut layer = test_layer();
        layer.links[0].geometry = Some(LineString::from(vec![(0.0, 0.0), (1.0, 0.0)]));
        let index = NetworkIndex::new(&[], &layer).unwrap();
        let length = index.link_length_meters(&layer.links[0], true).unwrap();
        // mean earth radius 6371008.8m * pi / 180
        assert!((length - 111_195.08).abs() < 1.0);
    }
}
