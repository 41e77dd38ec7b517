use indexmap::IndexMap;
use mmnet_core::{
    crs::resolve,
    model::{ModelBundle, NetworkIndex, TransitServices, TransportNetwork, Zoning},
};

use super::summary::{file_names, ExportSummary};
use crate::{
    config::MatsimWriterConfig,
    mode::ModeMappingTable,
    util::fs::create_dirs,
    writer::{
        segment_type_name, write_matrix_router_file, CoordinateFormatter, LinkAttributeFunctions,
        MatsimNetworkWriter, MatsimTransitWriter, MatsimWriterError,
    },
};

pub const SUMMARY_FILENAME: &str = "export-summary.json";

/// writes a network, and optionally its stops and scheduled services, as a set of
/// mutually consistent MATSim files. all writers of a run share one configuration,
/// one target CRS and one set of identifier mappers.
#[derive(Debug, Clone)]
pub struct MatsimIntermodalWriter {
    config: MatsimWriterConfig,
    mode_table: ModeMappingTable,
    link_attributes: LinkAttributeFunctions,
}

impl MatsimIntermodalWriter {
    pub fn new(config: MatsimWriterConfig) -> Self {
        let mode_table = ModeMappingTable::from(&config.modes);
        let link_attributes = LinkAttributeFunctions {
            link_type: if config.link_type_from_segment_type {
                Some(segment_type_name)
            } else {
                None
            },
            ..Default::default()
        };
        Self {
            config,
            mode_table,
            link_attributes,
        }
    }

    /// replaces the functions deriving the optional link attributes
    pub fn with_link_attributes(mut self, link_attributes: LinkAttributeFunctions) -> Self {
        self.link_attributes = link_attributes;
        self
    }

    /// replaces the mode mapping table built from the configuration
    pub fn with_mode_table(mut self, mode_table: ModeMappingTable) -> Self {
        self.mode_table = mode_table;
        self
    }

    pub fn config(&self) -> &MatsimWriterConfig {
        &self.config
    }

    pub fn mode_table(&self) -> &ModeMappingTable {
        &self.mode_table
    }

    pub fn write_bundle(&self, bundle: &ModelBundle) -> Result<ExportSummary, MatsimWriterError> {
        self.write(
            &bundle.network,
            bundle.zoning.as_ref(),
            bundle.services.as_ref(),
        )
    }

    /// runs the export. all structural and configuration problems are reported before
    /// the first file is created.
    pub fn write(
        &self,
        network: &TransportNetwork,
        zoning: Option<&Zoning>,
        services: Option<&TransitServices>,
    ) -> Result<ExportSummary, MatsimWriterError> {
        let config = &self.config;
        let layer = network.single_macroscopic_layer()?;
        config.validate()?;

        let registry = config.crs_registry()?;
        let crs = resolve(
            config.crs.as_deref(),
            config.country.as_deref(),
            network.crs.as_deref(),
            &registry,
        )?;

        let index = NetworkIndex::new(&network.modes, layer)?;
        index.validate_references(layer)?;

        let mode_tokens = self.mode_table.activated_mapping(&network.modes);
        if mode_tokens.is_empty() {
            log::warn!("no network mode is activated and mapped, the MATSim network will have no links");
        }
        let services = match (zoning, services) {
            (None, Some(_)) => {
                log::warn!("transit services cannot be written without zoning, skipped");
                None
            }
            (_, services) => services,
        };

        create_dirs(config.output_directory())?;
        let coordinates = CoordinateFormatter::new(&crs, config.coordinate_decimals);

        let network_writer =
            MatsimNetworkWriter::new(config, &coordinates, &mode_tokens, self.link_attributes);
        let mut network_output = network_writer.write(layer, &index)?;
        let mut files = network_output.files.clone();

        let transit_output = match zoning {
            Some(zoning) => {
                let transit_writer = MatsimTransitWriter::new(config, &coordinates, &mode_tokens);
                let output = transit_writer.write(
                    zoning,
                    services,
                    &index,
                    &mut network_output.id_mappers,
                    &network_output.emitted_segments,
                )?;
                files.extend(output.files.iter().cloned());
                Some(output)
            }
            None => None,
        };

        if config.generate_matrix_router_file {
            match transit_output.as_ref() {
                Some(output) => {
                    let path = config.matrix_router_file();
                    write_matrix_router_file(&path, config.compress, &output.stop_facilities)?;
                    files.push(path);
                }
                None => log::warn!("no zoning provided, matrix router file not written"),
            }
        }

        let modes = mode_tokens
            .iter()
            .filter_map(|(id, token)| index.mode(id).map(|m| (m.xml_id.clone(), token.clone())))
            .collect::<IndexMap<_, _>>();
        let summary = ExportSummary {
            target_crs: crs.target.code.clone(),
            source_crs: crs.source.as_ref().map(|c| c.code.clone()),
            id_mapping: config.id_mapping,
            modes,
            network: network_output.stats,
            transit: transit_output.map(|o| o.stats),
            files: file_names(&files),
        };
        if config.write_summary {
            let path = config.output_directory().join(SUMMARY_FILENAME);
            summary.write_json(&path)?;
        }
        Ok(summary)
    }
}
