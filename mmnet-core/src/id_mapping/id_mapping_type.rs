use std::fmt;

use serde::{Deserialize, Serialize};

/// selects which identity of an entity becomes its output identifier.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum IdMappingType {
    /// internal sequence id, unique by construction
    #[default]
    Id,
    /// structured stable tag, unique by construction
    XmlId,
    /// free-form tag from the source data. duplicates are disambiguated on output.
    ExternalId,
}

impl fmt::Display for IdMappingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IdMappingType::Id => "id",
            IdMappingType::XmlId => "xml_id",
            IdMappingType::ExternalId => "external_id",
        };
        f.write_str(s)
    }
}
