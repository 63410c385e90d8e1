use thiserror::Error;

use crate::units::UnitError;

pub type PdgResult<T> = Result<T, PdgError>;

/// Errors surfaced by identifier resolution, value arbitration and numerics.
///
/// None of these are recovered internally. The resolution context only
/// decides whether ambiguity is an error; it never hides a missing result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PdgError {
    #[error("PDG Identifier {pdgid} not found")]
    InvalidIdentifier { pdgid: String },

    #[error("Malformed PDG Identifier: {raw}")]
    MalformedIdentifier { raw: String },

    #[error("No data: {what}")]
    NoData { what: String },

    #[error("Ambiguous value: {what}")]
    AmbiguousValue { what: String },

    #[error("Rounding error: {what}")]
    Rounding { what: &'static str },

    #[error(transparent)]
    Unit(#[from] UnitError),

    #[error("Invalid argument: {what}")]
    InvalidArgument { what: String },

    #[error("Invalid data: {what}")]
    InvalidData { what: String },

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl PdgError {
    pub fn no_data(what: impl Into<String>) -> Self {
        PdgError::NoData { what: what.into() }
    }

    pub fn ambiguous(what: impl Into<String>) -> Self {
        PdgError::AmbiguousValue { what: what.into() }
    }

    /// True for the "nothing qualifies" outcome, which callers may turn into a fallback.
    pub fn is_no_data(&self) -> bool {
        matches!(self, PdgError::NoData { .. })
    }

    /// True when more than one candidate qualified and no silent choice was allowed.
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, PdgError::AmbiguousValue { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PdgError::InvalidIdentifier {
            pdgid: "NONEXISTENT".into(),
        };
        assert!(err.to_string().contains("NONEXISTENT"));

        let err = PdgError::no_data("mass for e-");
        assert!(err.is_no_data());
        assert!(!err.is_ambiguous());
        assert!(err.to_string().contains("mass for e-"));
    }

    #[test]
    fn unit_error_converts() {
        let err: PdgError = UnitError::UnknownUnit {
            unit: "furlong".into(),
        }
        .into();
        assert!(matches!(err, PdgError::Unit(_)));
        assert!(err.to_string().contains("furlong"));
    }
}
