#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CrsError {
    #[error("unknown coordinate reference system '{0}'")]
    UnknownCode(String),
    #[error("unable to resolve a coordinate reference system: {0}")]
    Unresolved(String),
    #[error("invalid definition for coordinate reference system '{code}': {message}")]
    InvalidDefinition { code: String, message: String },
    #[error("failed to transform coordinate: {0}")]
    Transform(String),
}
