//! API configuration and the resolution context.

use std::path::Path;

use pdg_core::{PdgError, PdgResult};
use pdg_schema::MIN_SCHEMA_VERSION;
use serde::{Deserialize, Serialize};

/// Policy for arbitrating between several qualifying candidates.
///
/// Lenient resolution picks a candidate heuristically; strict resolution
/// raises [`PdgError::AmbiguousValue`] instead and never substitutes a
/// derived quantity for a missing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Resolution {
    #[serde(default)]
    pub strict: bool,
}

impl Resolution {
    pub const LENIENT: Resolution = Resolution { strict: false };
    pub const STRICT: Resolution = Resolution { strict: true };
}

fn default_min_schema_version() -> f64 {
    MIN_SCHEMA_VERSION
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Edition used when neither the identifier nor the caller names one.
    /// Overrides the store's `edition` info value.
    #[serde(default)]
    pub default_edition: Option<String>,

    /// Default resolution context handed out by [`crate::PdgApi::context`].
    #[serde(default)]
    pub strict: bool,

    #[serde(default = "default_min_schema_version")]
    pub min_schema_version: f64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            default_edition: None,
            strict: false,
            min_schema_version: MIN_SCHEMA_VERSION,
        }
    }
}

impl ApiConfig {
    pub fn from_yaml_str(content: &str) -> PdgResult<Self> {
        serde_yaml::from_str(content).map_err(|err| PdgError::InvalidArgument {
            what: format!("API configuration: {err}"),
        })
    }

    pub fn load(path: &Path) -> PdgResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|err| PdgError::InvalidArgument {
            what: format!("API configuration {}: {err}", path.display()),
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn resolution(&self) -> Resolution {
        Resolution {
            strict: self.strict,
        }
    }
}
