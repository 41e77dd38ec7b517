use std::fmt;

use serde::{Deserialize, Serialize};

use super::Projection;

/// a coordinate reference system identified by its code, such as "EPSG:4326".
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Crs {
    pub code: String,
    pub projection: Projection,
}

impl Crs {
    pub fn new(code: &str, projection: Projection) -> Self {
        Self {
            code: normalize_code(code),
            projection,
        }
    }

    /// coordinates are longitude/latitude degrees
    pub fn is_geographic(&self) -> bool {
        matches!(self.projection, Projection::Geographic)
    }

    /// two systems are the same when their codes match
    pub fn same_as(&self, other: &Crs) -> bool {
        self.code == other.code
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

/// upper-cased, trimmed code. bare numbers are read as EPSG codes.
pub fn normalize_code(code: &str) -> String {
    let trimmed = code.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        format!("EPSG:{trimmed}")
    } else {
        trimmed.to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code(" epsg:4326 "), "EPSG:4326");
        assert_eq!(normalize_code("3857"), "EPSG:3857");
        assert_eq!(normalize_code("local:grid"), "LOCAL:GRID");
    }
}
