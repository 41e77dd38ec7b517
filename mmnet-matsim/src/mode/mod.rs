mod mode_mapping_table;

pub use mode_mapping_table::{
    default_token, ModeMappingTable, DEFAULT_CAR_TOKEN, DEFAULT_DEACTIVATED, DEFAULT_PT_TOKEN,
};
