//! pdg-schema: explicit schema binding for the PDG dataset.
//!
//! One typed record per table, a dataset container used by file-backed
//! stores, binding checks against a store's declared structure, and
//! dataset validation.

pub mod binding;
pub mod schema;
pub mod validate;
pub mod version;

pub use binding::{Cell, Record, Table, check_binding, check_all_bindings};
pub use schema::*;
pub use validate::{ValidationError, validate_dataset};
pub use version::{MIN_SCHEMA_VERSION, check_schema_version};

pub type SchemaResult<T> = Result<T, SchemaError>;

#[derive(thiserror::Error, Debug)]
pub enum SchemaError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Table {table} not declared by the data store")]
    MissingTable { table: &'static str },

    #[error("Column {table}.{column} not declared by the data store")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },

    #[error("Database schema v{found} too old - need at least v{required}")]
    SchemaVersion { found: String, required: f64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<SchemaError> for pdg_core::PdgError {
    fn from(err: SchemaError) -> Self {
        pdg_core::PdgError::Schema(err.to_string())
    }
}

pub fn load_yaml(path: &std::path::Path) -> SchemaResult<Dataset> {
    let content = std::fs::read_to_string(path)?;
    let dataset: Dataset = serde_yaml::from_str(&content)?;
    validate_dataset(&dataset)?;
    tracing::debug!(path = %path.display(), ids = dataset.pdgid.len(), "loaded YAML dataset");
    Ok(dataset)
}

pub fn save_yaml(path: &std::path::Path, dataset: &Dataset) -> SchemaResult<()> {
    validate_dataset(dataset)?;
    let content = serde_yaml::to_string(dataset)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> SchemaResult<Dataset> {
    let content = std::fs::read_to_string(path)?;
    let dataset: Dataset = serde_json::from_str(&content)?;
    validate_dataset(&dataset)?;
    tracing::debug!(path = %path.display(), ids = dataset.pdgid.len(), "loaded JSON dataset");
    Ok(dataset)
}

pub fn save_json(path: &std::path::Path, dataset: &Dataset) -> SchemaResult<()> {
    validate_dataset(dataset)?;
    let content = serde_json::to_string_pretty(dataset)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a dataset, picking the format from the file extension (`.json`, else YAML).
pub fn load_path(path: &std::path::Path) -> SchemaResult<Dataset> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => load_json(path),
        _ => load_yaml(path),
    }
}
