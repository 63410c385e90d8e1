//! Typed access to the PDG particle data.
//!
//! This crate turns PDG Identifiers into typed entities (particles and
//! their properties), arbitrates between competing summary values and
//! properties, and expands branching fractions into decay products.
//! Every read goes through a scoped [`pdg_store::Session`].

pub mod api;
pub mod best;
pub mod cache;
pub mod config;
pub mod decay;
pub mod entity;
pub mod measurement;
pub mod particle;
pub mod property;
pub mod value;

// Re-export key types for convenience
pub use api::PdgApi;
pub use best::{DataFlags, best};
pub use cache::EntityCache;
pub use config::{ApiConfig, Resolution};
pub use decay::{BranchingFraction, DecayProduct, Item};
pub use entity::{Entity, EntityCore};
pub use measurement::{Footnote, Measurement, Reference, Value};
pub use particle::{
    Particle, ParticleResolution, PropertyFilter, derive_error_from_complement,
    derive_from_complement,
};
pub use property::{Property, PropertyKind};
pub use value::{SummaryValue, value_type_indicator};

pub use pdg_core::{PdgError, PdgResult};
