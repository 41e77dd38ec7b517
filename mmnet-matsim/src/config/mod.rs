mod matsim_writer_config;
mod mode_mapping_config;
mod transit_writer_config;

pub use matsim_writer_config::MatsimWriterConfig;
pub use mode_mapping_config::ModeMappingConfig;
pub use transit_writer_config::TransitWriterConfig;
