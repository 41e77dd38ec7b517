mod intermodal_writer;
mod summary;

pub use intermodal_writer::{MatsimIntermodalWriter, SUMMARY_FILENAME};
pub use summary::ExportSummary;
