use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use mmnet_core::{
    crs::{country_code, normalize_code, CrsError, CrsRegistry, Projection},
    id_mapping::IdMappingType,
};
use serde::{Deserialize, Serialize};

use super::{ModeMappingConfig, TransitWriterConfig};
use crate::writer::MatsimWriterError;

/// most decimals a coordinate can be written with before f64 precision runs out
const MAX_COORDINATE_DECIMALS: usize = 15;

/// settings of a single export run. read once, never modified while writing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MatsimWriterConfig {
    /// directory receiving all output files. the command line argument takes precedence.
    pub output_directory: Option<PathBuf>,
    pub network_file_name: String,
    pub transit_file_name: String,
    pub detailed_geometry_file_name: String,
    pub matrix_router_file_name: String,
    /// country hint used to pick a default projected CRS
    pub country: Option<String>,
    /// explicit destination CRS code, such as "EPSG:32631"
    pub crs: Option<String>,
    pub id_mapping: IdMappingType,
    /// cap the free speed of a link by the slowest mode allowed on it
    pub restrict_link_speed_by_supported_modes: bool,
    pub generate_detailed_geometry: bool,
    pub generate_matrix_router_file: bool,
    pub coordinate_decimals: usize,
    /// gzip every output file
    pub compress: bool,
    pub write_summary: bool,
    /// write the link segment type name as the link `type` attribute
    pub link_type_from_segment_type: bool,
    pub modes: ModeMappingConfig,
    pub transit: TransitWriterConfig,
    /// user defined coordinate reference systems keyed by code
    pub custom_crs: IndexMap<String, Projection>,
}

impl Default for MatsimWriterConfig {
    fn default() -> Self {
        Self {
            output_directory: None,
            network_file_name: String::from("network"),
            transit_file_name: String::from("transitschedule"),
            detailed_geometry_file_name: String::from("network_geometry"),
            matrix_router_file_name: String::from("stops"),
            country: None,
            crs: None,
            id_mapping: IdMappingType::default(),
            restrict_link_speed_by_supported_modes: false,
            generate_detailed_geometry: false,
            generate_matrix_router_file: false,
            coordinate_decimals: 6,
            compress: false,
            write_summary: true,
            link_type_from_segment_type: false,
            modes: ModeMappingConfig::default(),
            transit: TransitWriterConfig::default(),
            custom_crs: IndexMap::new(),
        }
    }
}

impl MatsimWriterConfig {
    /// loads a TOML configuration file.
    pub fn from_file(path: &Path) -> Result<Self, MatsimWriterError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path))
            .build()
            .map_err(|e| {
                let msg = format!("file '{}' produced error: {e}", path.display());
                MatsimWriterError::InvalidUserInput(msg)
            })?;
        config.try_deserialize::<MatsimWriterConfig>().map_err(|e| {
            let msg = format!("error reading writer configuration in '{}': {e}", path.display());
            MatsimWriterError::InvalidUserInput(msg)
        })
    }

    /// the output directory, or the current working directory when none is configured.
    pub fn output_directory(&self) -> &Path {
        match &self.output_directory {
            Some(dir) => dir.as_path(),
            None => Path::new(""),
        }
    }

    /// file name with extension, plus a `.gz` suffix when compressing.
    pub fn output_file_name(&self, name: &str, extension: &str) -> String {
        if self.compress {
            format!("{name}.{extension}.gz")
        } else {
            format!("{name}.{extension}")
        }
    }

    pub fn network_file(&self) -> PathBuf {
        self.output_directory()
            .join(self.output_file_name(&self.network_file_name, "xml"))
    }

    pub fn transit_file(&self) -> PathBuf {
        self.output_directory()
            .join(self.output_file_name(&self.transit_file_name, "xml"))
    }

    pub fn detailed_geometry_file(&self) -> PathBuf {
        self.output_directory()
            .join(self.output_file_name(&self.detailed_geometry_file_name, "csv"))
    }

    pub fn matrix_router_file(&self) -> PathBuf {
        self.output_directory()
            .join(self.output_file_name(&self.matrix_router_file_name, "csv"))
    }

    /// registry with the built-in codes and every configured custom CRS.
    pub fn crs_registry(&self) -> Result<CrsRegistry, CrsError> {
        CrsRegistry::with_custom(self.custom_crs.iter())
    }

    /// rejects settings that cannot produce a valid export.
    pub fn validate(&self) -> Result<(), MatsimWriterError> {
        let names = [
            ("network_file_name", &self.network_file_name),
            ("transit_file_name", &self.transit_file_name),
            ("detailed_geometry_file_name", &self.detailed_geometry_file_name),
            ("matrix_router_file_name", &self.matrix_router_file_name),
        ];
        for (key, name) in names {
            if name.trim().is_empty() {
                return Err(MatsimWriterError::InvalidUserInput(format!(
                    "'{key}' may not be empty"
                )));
            }
        }
        if self.coordinate_decimals > MAX_COORDINATE_DECIMALS {
            return Err(MatsimWriterError::InvalidUserInput(format!(
                "'coordinate_decimals' must be at most {MAX_COORDINATE_DECIMALS}, found {}",
                self.coordinate_decimals
            )));
        }
        self.check_transit_consistency()
    }

    /// the transit writer must place stops in the same CRS as the network writer, so
    /// any country or CRS given for it must name the same one as the network setting.
    /// checked for every run, whether or not transit data is supplied.
    pub fn check_transit_consistency(&self) -> Result<(), MatsimWriterError> {
        if let Some(transit_country) = &self.transit.country {
            let matches = self
                .country
                .as_deref()
                .is_some_and(|c| same_country(c, transit_country));
            if !matches {
                return Err(MatsimWriterError::InconsistentSettings(format!(
                    "transit country '{transit_country}' differs from network country '{}'",
                    self.country.as_deref().unwrap_or("<none>")
                )));
            }
        }
        if let Some(transit_crs) = &self.transit.crs {
            let matches = self
                .crs
                .as_deref()
                .is_some_and(|c| normalize_code(c) == normalize_code(transit_crs));
            if !matches {
                return Err(MatsimWriterError::InconsistentSettings(format!(
                    "transit crs '{transit_crs}' differs from network crs '{}'",
                    self.crs.as_deref().unwrap_or("<none>")
                )));
            }
        }
        Ok(())
    }
}

/// equal names, or a name and a code of the same known country
fn same_country(a: &str, b: &str) -> bool {
    if a.trim().eq_ignore_ascii_case(b.trim()) {
        return true;
    }
    matches!((country_code(a), country_code(b)), (Some(a), Some(b)) if a == b)
}

#[cfg(test)]
mod tests {
    use mmnet_core::model::PredefinedModeType;

    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config: MatsimWriterConfig = toml::from_str("").unwrap();
        assert_eq!(config, MatsimWriterConfig::default());
        assert_eq!(config.network_file().to_str(), Some("network.xml"));
        assert_eq!(config.transit.zone_name_separator, "-");
        assert_eq!(config.coordinate_decimals, 6);
        assert!(config.write_summary);
    }

    #[test]
    fn test_full_toml() {
        let config: MatsimWriterConfig = toml::from_str(
            r#"
            output_directory = "out"
            country = "Australia"
            id_mapping = "external_id"
            compress = true

            [modes]
            deactivate = ["bus"]
            tokens = { tram = "tram" }

            [transit]
            country = "australia"
            zone_name_separator = "/"

            [custom_crs."local:grid"]
            type = "offset"
            dx = 10.0
            dy = 20.0
            "#,
        )
        .unwrap();
        assert_eq!(config.id_mapping, IdMappingType::ExternalId);
        assert_eq!(config.modes.deactivate, vec![PredefinedModeType::Bus]);
        assert_eq!(
            config.modes.tokens.get(&PredefinedModeType::Tram),
            Some(&String::from("tram"))
        );
        assert_eq!(
            config.transit_file(),
            Path::new("out").join("transitschedule.xml.gz")
        );
        assert!(config.validate().is_ok());
        let registry = config.crs_registry().unwrap();
        assert!(registry.lookup("LOCAL:GRID").is_ok());
    }

    #[test]
    fn test_inconsistent_transit_country() {
        let mut config = MatsimWriterConfig {
            country: Some(String::from("Germany")),
            ..Default::default()
        };
        config.transit.country = Some(String::from("France"));
        assert!(matches!(
            config.validate(),
            Err(MatsimWriterError::InconsistentSettings(_))
        ));
    }

    #[test]
    fn test_inconsistent_transit_crs() {
        let mut config = MatsimWriterConfig::default();
        config.transit.crs = Some(String::from("EPSG:3857"));
        assert!(matches!(
            config.check_transit_consistency(),
            Err(MatsimWriterError::InconsistentSettings(_))
        ));
        config.crs = Some(String::from("epsg:3857"));
        assert!(config.check_transit_consistency().is_ok());
    }

    #[test]
    fn test_transit_settings_compared_by_meaning() {
        let mut config = MatsimWriterConfig {
            country: Some(String::from("Netherlands")),
            crs: Some(String::from("EPSG:3857")),
            ..Default::default()
        };
        config.transit.crs = Some(String::from(" 3857 "));
        config.transit.country = Some(String::from("nl"));
        assert!(config.check_transit_consistency().is_ok());
        config.transit.crs = Some(String::from("3112"));
        assert!(matches!(
            config.check_transit_consistency(),
            Err(MatsimWriterError::InconsistentSettings(_))
        ));

        let mut config = MatsimWriterConfig {
            country: Some(String::from("Germany")),
            ..Default::default()
        };
        config.transit.country = Some(String::from("DK"));
        assert!(config.check_transit_consistency().is_err());
    }

    #[test]
    fn test_invalid_decimals() {
        let config = MatsimWriterConfig {
            coordinate_decimals: 40,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(MatsimWriterError::InvalidUserInput(_))
        ));
    }
}
