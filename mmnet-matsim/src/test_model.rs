//! small multimodal model shared by the writer tests.
//!
//! nodes 0 (4.90, 52.37), 1 (4.91, 52.37) and 2 (4.91, 52.38) in EPSG:4326:
//! - link 0 (0 -> 1, curved geometry): segment 0 car+bus, segment 1 car, both tagged "A"
//! - link 1 (1 -> 2, no geometry): segment 2 bus tagged "B", segment 3 pedestrian only
//! - link 2 (2 -> 0): segment 4 custom mode only
//!
//! connectoid 0 on segment 0 (zones "Central", "Station"), 1 on segment 2 (blank zone
//! name), 2 on segment 3, 3 without access segment. bus line 0 runs route 0 over
//! connectoids 0, 1 and route 1 over connectoids 0, 2. line 1 uses the pedestrian mode.
use std::collections::BTreeSet;

use geo::LineString;
use mmnet_core::model::{
    ConnectoidId, Departure, DepartureId, LayerKind, Link, LinkId, LinkSegment, LinkSegmentId,
    LinkSegmentType, LinkSegmentTypeId, Mode, ModeId, ModelBundle, NetworkLayer, Node, NodeId,
    Position, PredefinedModeType, RouteId, RouteStop, ServiceId, ServiceLine, ServiceRoute,
    TransferConnectoid, TransferZone, TransitServices, TransportNetwork, ZoneId, Zoning,
};

pub(crate) const CAR: ModeId = ModeId(0);
pub(crate) const BUS: ModeId = ModeId(1);
pub(crate) const PEDESTRIAN: ModeId = ModeId(2);
pub(crate) const HOVERCRAFT: ModeId = ModeId(3);

pub(crate) fn mode(id: ModeId, predefined_type: PredefinedModeType, max_speed_kmh: f64) -> Mode {
    Mode {
        id,
        xml_id: format!("mode{}", id.0),
        external_id: None,
        name: Some(predefined_type.to_string()),
        max_speed_kmh,
        predefined_type,
    }
}

pub(crate) fn node(id: usize, x: f64, y: f64) -> Node {
    Node {
        id: NodeId(id),
        xml_id: format!("node{id}"),
        external_id: Some(format!("n{id}")),
        position: Some(Position::new(x, y)),
    }
}

pub(crate) fn segment(id: usize, modes: &[ModeId], external_id: Option<&str>) -> LinkSegment {
    LinkSegment {
        id: LinkSegmentId(id),
        xml_id: format!("seg{id}"),
        external_id: external_id.map(String::from),
        lanes: 2,
        max_speed_kmh: 100.0,
        capacity_per_lane_pcuh: None,
        allowed_modes: modes.iter().copied().collect::<BTreeSet<_>>(),
        link_segment_type: Some(LinkSegmentTypeId(0)),
    }
}

pub(crate) fn link(
    id: usize,
    node_a: usize,
    node_b: usize,
    segment_ab: Option<LinkSegment>,
    segment_ba: Option<LinkSegment>,
) -> Link {
    Link {
        id: LinkId(id),
        xml_id: format!("link{id}"),
        external_id: None,
        node_a: NodeId(node_a),
        node_b: NodeId(node_b),
        geometry: None,
        segment_ab,
        segment_ba,
    }
}

pub(crate) fn network() -> TransportNetwork {
    let mut curved = link(
        0,
        0,
        1,
        Some(segment(0, &[CAR, BUS], Some("A"))),
        Some(segment(1, &[CAR], Some("A"))),
    );
    curved.geometry = Some(LineString::from(vec![
        (4.90, 52.37),
        (4.903, 52.371),
        (4.907, 52.372),
        (4.91, 52.37),
    ]));
    let layer = NetworkLayer {
        xml_id: String::from("road"),
        kind: LayerKind::Macroscopic,
        nodes: vec![node(0, 4.90, 52.37), node(1, 4.91, 52.37), node(2, 4.91, 52.38)],
        links: vec![
            curved,
            link(
                1,
                1,
                2,
                Some(segment(2, &[BUS], Some("B"))),
                Some(segment(3, &[PEDESTRIAN], None)),
            ),
            link(2, 2, 0, Some(segment(4, &[HOVERCRAFT], None)), None),
        ],
        link_segment_types: vec![LinkSegmentType {
            id: LinkSegmentTypeId(0),
            xml_id: String::from("type0"),
            external_id: None,
            name: Some(String::from("primary")),
            capacity_per_lane_pcuh: 1800.0,
            max_density_pcukm: 180.0,
        }],
    };
    TransportNetwork {
        crs: Some(String::from("EPSG:4326")),
        modes: vec![
            mode(CAR, PredefinedModeType::Car, 120.0),
            mode(BUS, PredefinedModeType::Bus, 80.0),
            mode(PEDESTRIAN, PredefinedModeType::Pedestrian, 5.0),
            mode(HOVERCRAFT, PredefinedModeType::Custom, 40.0),
        ],
        layers: vec![layer],
    }
}

fn zone(id: usize, name: &str) -> TransferZone {
    TransferZone {
        id: ZoneId(id),
        xml_id: format!("zone{id}"),
        external_id: None,
        name: Some(String::from(name)),
    }
}

fn connectoid(id: usize, access: Option<usize>, zones: &[usize]) -> TransferConnectoid {
    TransferConnectoid {
        id: ConnectoidId(id),
        xml_id: format!("stop{id}"),
        external_id: Some(format!("s{id}")),
        access_link_segment: access.map(LinkSegmentId),
        access_zones: zones.iter().copied().map(ZoneId).collect(),
    }
}

pub(crate) fn zoning() -> Zoning {
    Zoning {
        transfer_zones: vec![zone(0, "Central"), zone(1, "Station"), zone(2, "  ")],
        connectoids: vec![
            connectoid(0, Some(0), &[0, 1]),
            connectoid(1, Some(2), &[2]),
            connectoid(2, Some(3), &[0]),
            connectoid(3, None, &[1]),
        ],
    }
}

fn stop(connectoid: usize, arrival_offset_s: u32, departure_offset_s: u32) -> RouteStop {
    RouteStop {
        connectoid: ConnectoidId(connectoid),
        arrival_offset_s,
        departure_offset_s,
    }
}

fn departure(id: usize, time_s: u32) -> Departure {
    Departure {
        id: DepartureId(id),
        xml_id: format!("dep{id}"),
        external_id: None,
        time_s,
    }
}

pub(crate) fn services() -> TransitServices {
    TransitServices {
        lines: vec![
            ServiceLine {
                id: ServiceId(0),
                xml_id: String::from("line0"),
                external_id: None,
                name: Some(String::from("Line 1")),
                mode: BUS,
                routes: vec![
                    ServiceRoute {
                        id: RouteId(0),
                        xml_id: String::from("route0"),
                        external_id: None,
                        stops: vec![stop(0, 0, 0), stop(1, 120, 150)],
                        link_segments: vec![LinkSegmentId(0), LinkSegmentId(2)],
                        departures: vec![departure(0, 8 * 3600), departure(1, 25 * 3600 + 1800)],
                    },
                    ServiceRoute {
                        id: RouteId(1),
                        xml_id: String::from("route1"),
                        external_id: None,
                        stops: vec![stop(0, 0, 0), stop(2, 60, 60)],
                        link_segments: vec![LinkSegmentId(0), LinkSegmentId(3)],
                        departures: vec![departure(2, 9 * 3600)],
                    },
                ],
            },
            ServiceLine {
                id: ServiceId(1),
                xml_id: String::from("line1"),
                external_id: None,
                name: None,
                mode: PEDESTRIAN,
                routes: vec![ServiceRoute {
                    id: RouteId(2),
                    xml_id: String::from("route2"),
                    external_id: None,
                    stops: vec![stop(0, 0, 0), stop(1, 60, 60)],
                    link_segments: vec![LinkSegmentId(0), LinkSegmentId(2)],
                    departures: vec![departure(3, 10 * 3600)],
                }],
            },
        ],
    }
}

pub(crate) fn bundle() -> ModelBundle {
    ModelBundle {
        network: network(),
        zoning: Some(zoning()),
        services: Some(services()),
    }
}
