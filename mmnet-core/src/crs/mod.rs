//! coordinate reference systems: code lookup, per-country defaults, resolution of the
//! target CRS of an export run and the transform from the source network CRS.
mod country;
mod ellipsoid;
mod error;
mod lambert_conformal_conic;
mod projection;
mod reference_system;
mod registry;
mod resolver;
mod transform;
mod transverse_mercator;

pub use country::{country_code, default_crs_code_for_country, GLOBAL_COUNTRY};
pub use ellipsoid::Ellipsoid;
pub use error::CrsError;
pub use projection::{PreparedProjection, Projection};
pub use reference_system::{normalize_code, Crs};
pub use registry::CrsRegistry;
pub use resolver::{resolve, ResolvedCrs};
pub use transform::CrsTransform;
