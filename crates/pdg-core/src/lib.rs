//! pdg-core: stable foundation for the PDG data access layers.
//!
//! Contains:
//! - ids (PDG Identifiers and compact arena ids)
//! - units (dimension-tagged unit table, uom SI constructors, constants)
//! - numeric (tolerances, float helpers, PDG rounding)
//! - error (shared error taxonomy)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{PdgError, PdgResult};
pub use ids::*;
pub use numeric::*;
pub use units::{Dimension, UnitDef, UnitError, convert, conversion_factor};
