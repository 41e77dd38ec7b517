pub mod crs;
pub mod id_mapping;
pub mod model;
