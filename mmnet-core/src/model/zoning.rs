use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{identifiable::impl_identifiable, ConnectoidId, LinkSegmentId, ZoneId};

/// transfer zones and the connectoids giving them access to the physical network.
/// each connectoid becomes a stop facility in the transit schedule.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Zoning {
    #[serde(default)]
    pub transfer_zones: Vec<TransferZone>,
    #[serde(default)]
    pub connectoids: Vec<TransferConnectoid>,
}

impl Zoning {
    pub fn zone_lookup(&self) -> HashMap<ZoneId, &TransferZone> {
        self.transfer_zones.iter().map(|z| (z.id, z)).collect()
    }
}

/// a named area, such as a station, grouping one or more stop facilities.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TransferZone {
    pub id: ZoneId,
    pub xml_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
}

/// network-attached access point of one or more transfer zones.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TransferConnectoid {
    pub id: ConnectoidId,
    pub xml_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub external_id: Option<String>,
    /// the directed segment vehicles use to reach this stop. the stop is located at
    /// the downstream end of this segment.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub access_link_segment: Option<LinkSegmentId>,
    #[serde(default)]
    pub access_zones: Vec<ZoneId>,
}

impl_identifiable!(TransferZone, TransferConnectoid);
