use serde::{Deserialize, Serialize};
use std::fmt;

/// declares a typed, copyable index over usize. these are the internal sequence ids
/// assigned when a model is loaded, unique within their entity category.
macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub usize);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

typed_id!(
    /// id of a network node
    NodeId
);
typed_id!(
    /// id of an undirected network link
    LinkId
);
typed_id!(
    /// id of one directed traversal of a link
    LinkSegmentId
);
typed_id!(
    /// id of a link segment type
    LinkSegmentTypeId
);
typed_id!(
    /// id of a travel mode
    ModeId
);
typed_id!(
    /// id of a transfer zone
    ZoneId
);
typed_id!(
    /// id of a transfer connectoid (stop facility)
    ConnectoidId
);
typed_id!(
    /// id of a scheduled service line
    ServiceId
);
typed_id!(
    /// id of a route within a service line
    RouteId
);
typed_id!(
    /// id of a scheduled departure on a route
    DepartureId
);
