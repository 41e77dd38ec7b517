mod coordinates;
mod error;
mod format;
mod geometry_writer;
mod link_attributes;
mod network_writer;
mod stop_writer;
mod transit_writer;
mod xml_writer;

pub use coordinates::CoordinateFormatter;
pub use error::MatsimWriterError;
pub use format::{format_decimal, format_time};
pub use geometry_writer::DetailedGeometryWriter;
pub use link_attributes::{segment_type_name, LinkAttributeFn, LinkAttributeFunctions};
pub use network_writer::{MatsimNetworkWriter, NetworkWriterOutput, NetworkWriterStats};
pub use stop_writer::write_matrix_router_file;
pub use transit_writer::{
    MatsimTransitWriter, StopFacilityRecord, TransitWriterOutput, TransitWriterStats,
};
pub use xml_writer::XmlDocumentWriter;
