//! Schema version gate.

use crate::{SchemaError, SchemaResult};

/// Minimum schema version required by this version of the API.
pub const MIN_SCHEMA_VERSION: f64 = 0.2;

/// Check the store's declared `schema_version` info value against `required`.
pub fn check_schema_version(found: Option<&str>, required: f64) -> SchemaResult<f64> {
    let text = found.unwrap_or("");
    let version: f64 = text.trim().parse().map_err(|_| SchemaError::SchemaVersion {
        found: text.to_string(),
        required,
    })?;
    if version < required {
        return Err(SchemaError::SchemaVersion {
            found: text.to_string(),
            required,
        });
    }
    Ok(version)
}
