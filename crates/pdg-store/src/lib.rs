//! pdg-store: read-only data store interface and an in-memory store.

pub mod memory;
pub mod query;
pub mod store;

pub use memory::MemoryStore;
pub use query::{Aggregate, Filter, Param, Query, like_matches};
pub use store::{DataStore, Session};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Column {table}.{column} is not bound")]
    UnknownColumn { table: &'static str, column: String },

    #[error(transparent)]
    Schema(#[from] pdg_schema::SchemaError),
}

impl From<StoreError> for pdg_core::PdgError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Schema(err) => err.into(),
            other => pdg_core::PdgError::Store(other.to_string()),
        }
    }
}
