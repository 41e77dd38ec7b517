use indexmap::IndexMap;
use mmnet_core::model::PredefinedModeType;
use serde::{Deserialize, Serialize};

/// user adjustments applied on top of the default mode mapping table, in field order.
///
/// ```toml
/// [modes]
/// deactivate_all = true
/// activate = ["car", "bus"]
/// tokens = { bus = "bus" }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ModeMappingConfig {
    /// start from an empty activation set instead of the defaults
    pub deactivate_all: bool,
    pub activate: Vec<PredefinedModeType>,
    pub deactivate: Vec<PredefinedModeType>,
    /// replacement MATSim mode tokens
    pub tokens: IndexMap<PredefinedModeType, String>,
    /// modes whose token is removed, which excludes them from the output
    pub unmapped: Vec<PredefinedModeType>,
}
