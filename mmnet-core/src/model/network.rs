use std::collections::BTreeSet;
use std::fmt;

use geo::{Coord, LineString};
use serde::{Deserialize, Serialize};

use super::{
    identifiable::impl_identifiable, LinkId, LinkSegmentId, LinkSegmentTypeId, ModeId,
    ModelError, NodeId,
};

/// a multimodal physical transport network. coordinates of all nodes and link
/// geometries are expressed in `crs`, when known.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct TransportNetwork {
    /// code of the coordinate reference system of this network, such as "EPSG:4326"
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub crs: Option<String>,
    #[serde(default)]
    pub modes: Vec<Mode>,
    #[serde(default)]
    pub layers: Vec<NetworkLayer>,
}

impl TransportNetwork {
    /// the exchange format only supports a network made of exactly one macroscopic layer.
    pub fn single_macroscopic_layer(&self) -> Result<&NetworkLayer, ModelError> {
        match self.layers.as_slice() {
            [layer] if layer.kind == LayerKind::Macroscopic => Ok(layer),
            [layer] => Err(ModelError::UnsupportedLayerKind(layer.kind.to_string())),
            layers => Err(ModelError::UnsupportedLayerCount(layers.len())),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    #[default]
    Macroscopic,
    Microscopic,
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LayerKind::Macroscopic => "macroscopic",
            LayerKind::Microscopic => "microscopic",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct NetworkLayer {
    pub xml_id: String,
    #[serde(default)]
    pub kind: LayerKind,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub link_segment_types: Vec<LinkSegmentType>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    /// elevation is carried by some sources but has no place in the exchange format
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub z: Option<f64>,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    pub fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.x,
            y: self.y,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Node {
    pub id: NodeId,
    pub xml_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub position: Option<Position>,
}

/// direction of travel of a link segment relative to its parent link. links are
/// oriented from `node_a` to `node_b`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SegmentHeading {
    /// travels from node a to node b
    Forward,
    /// travels from node b to node a
    Backward,
}

/// an undirected link between two nodes which owns up to two directed segments.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Link {
    pub id: LinkId,
    pub xml_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub external_id: Option<String>,
    pub node_a: NodeId,
    pub node_b: NodeId,
    /// ordered from node a to node b, including both end points
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub geometry: Option<LineString<f64>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub segment_ab: Option<LinkSegment>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub segment_ba: Option<LinkSegment>,
}

impl Link {
    pub fn segment(&self, heading: SegmentHeading) -> Option<&LinkSegment> {
        match heading {
            SegmentHeading::Forward => self.segment_ab.as_ref(),
            SegmentHeading::Backward => self.segment_ba.as_ref(),
        }
    }

    /// existing segments of this link, forward before backward
    pub fn segments(&self) -> impl Iterator<Item = (SegmentHeading, &LinkSegment)> {
        [SegmentHeading::Forward, SegmentHeading::Backward]
            .into_iter()
            .filter_map(|heading| self.segment(heading).map(|s| (heading, s)))
    }

    pub fn upstream_node(&self, heading: SegmentHeading) -> NodeId {
        match heading {
            SegmentHeading::Forward => self.node_a,
            SegmentHeading::Backward => self.node_b,
        }
    }

    pub fn downstream_node(&self, heading: SegmentHeading) -> NodeId {
        match heading {
            SegmentHeading::Forward => self.node_b,
            SegmentHeading::Backward => self.node_a,
        }
    }
}

/// a directed traversal of a [Link].
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LinkSegment {
    pub id: LinkSegmentId,
    pub xml_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub external_id: Option<String>,
    #[serde(default = "default_lanes")]
    pub lanes: u32,
    /// physical speed limit in km/h
    pub max_speed_kmh: f64,
    /// overrides the capacity per lane of the segment type, in pcu/h/lane
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub capacity_per_lane_pcuh: Option<f64>,
    #[serde(default)]
    pub allowed_modes: BTreeSet<ModeId>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub link_segment_type: Option<LinkSegmentTypeId>,
}

fn default_lanes() -> u32 {
    1
}

impl LinkSegment {
    pub fn allows_mode(&self, mode: &ModeId) -> bool {
        self.allowed_modes.contains(mode)
    }

    /// capacity of the whole segment in pcu/h
    pub fn capacity_pcuh(&self, segment_type: &LinkSegmentType) -> f64 {
        let per_lane = self
            .capacity_per_lane_pcuh
            .unwrap_or(segment_type.capacity_per_lane_pcuh);
        per_lane * self.lanes as f64
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LinkSegmentType {
    pub id: LinkSegmentTypeId,
    pub xml_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    /// pcu/h/lane
    pub capacity_per_lane_pcuh: f64,
    /// pcu/km/lane
    #[serde(default = "default_max_density")]
    pub max_density_pcukm: f64,
}

fn default_max_density() -> f64 {
    180.0
}

/// travel mode available on the network.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Mode {
    pub id: ModeId,
    pub xml_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    /// top speed of vehicles of this mode in km/h
    pub max_speed_kmh: f64,
    #[serde(default)]
    pub predefined_type: PredefinedModeType,
}

impl Mode {
    pub fn is_custom(&self) -> bool {
        self.predefined_type == PredefinedModeType::Custom
    }
}

/// taxonomy of well-known travel modes. any other mode is [PredefinedModeType::Custom].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(rename_all = "snake_case")]
pub enum PredefinedModeType {
    Bicycle,
    Bus,
    Car,
    CarShare,
    CarHighOccupancy,
    Ferry,
    GoodsVehicle,
    HeavyGoodsVehicle,
    LargeHeavyGoodsVehicle,
    LightRail,
    Motorcycle,
    Pedestrian,
    Subway,
    Train,
    Tram,
    #[default]
    Custom,
}

impl PredefinedModeType {
    /// all predefined types, excluding [PredefinedModeType::Custom]
    pub const ALL: [PredefinedModeType; 15] = [
        Self::Bicycle,
        Self::Bus,
        Self::Car,
        Self::CarShare,
        Self::CarHighOccupancy,
        Self::Ferry,
        Self::GoodsVehicle,
        Self::HeavyGoodsVehicle,
        Self::LargeHeavyGoodsVehicle,
        Self::LightRail,
        Self::Motorcycle,
        Self::Pedestrian,
        Self::Subway,
        Self::Train,
        Self::Tram,
    ];

    /// scheduled public transport modes which share a track or lane with a timetable
    pub fn is_public_transport(&self) -> bool {
        matches!(
            self,
            Self::Bus | Self::Train | Self::Tram | Self::Subway | Self::LightRail
        )
    }
}

impl fmt::Display for PredefinedModeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PredefinedModeType::Bicycle => "bicycle",
            PredefinedModeType::Bus => "bus",
            PredefinedModeType::Car => "car",
            PredefinedModeType::CarShare => "car_share",
            PredefinedModeType::CarHighOccupancy => "car_high_occupancy",
            PredefinedModeType::Ferry => "ferry",
            PredefinedModeType::GoodsVehicle => "goods_vehicle",
            PredefinedModeType::HeavyGoodsVehicle => "heavy_goods_vehicle",
            PredefinedModeType::LargeHeavyGoodsVehicle => "large_heavy_goods_vehicle",
            PredefinedModeType::LightRail => "light_rail",
            PredefinedModeType::Motorcycle => "motorcycle",
            PredefinedModeType::Pedestrian => "pedestrian",
            PredefinedModeType::Subway => "subway",
            PredefinedModeType::Train => "train",
            PredefinedModeType::Tram => "tram",
            PredefinedModeType::Custom => "custom",
        };
        f.write_str(s)
    }
}

impl_identifiable!(Node, Link, LinkSegment, LinkSegmentType, Mode);
