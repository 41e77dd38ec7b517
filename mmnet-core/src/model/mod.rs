mod bundle;
mod error;
mod identifiable;
mod ids;
mod network;
mod network_index;
mod service;
mod zoning;

pub use bundle::ModelBundle;
pub use error::ModelError;
pub use identifiable::Identifiable;
pub use ids::{
    ConnectoidId, DepartureId, LinkId, LinkSegmentId, LinkSegmentTypeId, ModeId, NodeId, RouteId,
    ServiceId, ZoneId,
};
pub use network::{
    LayerKind, Link, LinkSegment, LinkSegmentType, Mode, NetworkLayer, Node, Position,
    PredefinedModeType, SegmentHeading, TransportNetwork,
};
pub use network_index::{NetworkIndex, SegmentRef};
pub use service::{Departure, RouteStop, ServiceLine, ServiceRoute, TransitServices};
pub use zoning::{TransferConnectoid, TransferZone, Zoning};
