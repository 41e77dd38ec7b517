use serde::{Deserialize, Serialize};

pub const DEFAULT_ZONE_NAME_SEPARATOR: &str = "-";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TransitWriterConfig {
    /// when given, must match the country of the network writer
    pub country: Option<String>,
    /// when given, must match the CRS of the network writer
    pub crs: Option<String>,
    /// joins the names of all transfer zones served by a stop facility
    pub zone_name_separator: String,
}

impl Default for TransitWriterConfig {
    fn default() -> Self {
        Self {
            country: None,
            crs: None,
            zone_name_separator: String::from(DEFAULT_ZONE_NAME_SEPARATOR),
        }
    }
}
