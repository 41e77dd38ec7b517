mod id_mapper;
mod id_mapper_set;
mod id_mapping_type;

pub use id_mapper::{IdMapper, IdMapperCategory};
pub use id_mapper_set::IdMappers;
pub use id_mapping_type::IdMappingType;
