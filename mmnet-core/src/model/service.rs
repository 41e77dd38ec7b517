use serde::{Deserialize, Serialize};

use super::{
    identifiable::impl_identifiable, ConnectoidId, DepartureId, LinkSegmentId, ModeId, RouteId,
    ServiceId,
};

/// scheduled services running on top of the physical network.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct TransitServices {
    #[serde(default)]
    pub lines: Vec<ServiceLine>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServiceLine {
    pub id: ServiceId,
    pub xml_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    pub mode: ModeId,
    #[serde(default)]
    pub routes: Vec<ServiceRoute>,
}

/// one stop pattern of a line with the physical path between its stops.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServiceRoute {
    pub id: RouteId,
    pub xml_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub stops: Vec<RouteStop>,
    /// ordered link segments traversed from the first to the last stop
    #[serde(default)]
    pub link_segments: Vec<LinkSegmentId>,
    #[serde(default)]
    pub departures: Vec<Departure>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct RouteStop {
    pub connectoid: ConnectoidId,
    /// seconds after the departure from the first stop
    pub arrival_offset_s: u32,
    /// seconds after the departure from the first stop
    pub departure_offset_s: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Departure {
    pub id: DepartureId,
    pub xml_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub external_id: Option<String>,
    /// seconds since midnight of the service day, may exceed one day
    pub time_s: u32,
}

impl_identifiable!(ServiceLine, ServiceRoute, Departure);
