use core::fmt;
use core::num::NonZeroU32;
use core::str::FromStr;

use crate::error::{PdgError, PdgResult};

/// Separator between base identifier and edition, as in `S008/2024`.
pub const EDITION_SEPARATOR: char = '/';

/// A normalized PDG Identifier: an uppercase base id plus an optional edition.
///
/// The edition is an opaque token (usually a year). An identifier without an
/// edition defers to a caller- or store-supplied default when an entity is built.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Identifier {
    base_id: String,
    edition: Option<String>,
}

impl Identifier {
    pub fn new(base_id: &str, edition: Option<&str>) -> Self {
        Self {
            base_id: base_id.to_uppercase(),
            edition: edition.map(str::to_string),
        }
    }

    /// Parse `BASEID` or `BASEID/EDITION`, case-insensitive on the base id.
    pub fn parse(raw: &str) -> PdgResult<Self> {
        let (base_id, edition) = parse_id(raw)?;
        Ok(Self { base_id, edition })
    }

    pub fn base_id(&self) -> &str {
        &self.base_id
    }

    pub fn edition(&self) -> Option<&str> {
        self.edition.as_deref()
    }

    /// Fill in the edition if none was given explicitly.
    pub fn or_edition(self, edition: Option<&str>) -> Self {
        if self.edition.is_some() {
            self
        } else {
            let base = self.base_id;
            Self {
                base_id: base,
                edition: edition.map(str::to_string),
            }
        }
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({})", self)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.edition {
            Some(edition) => write!(f, "{}{}{}", self.base_id, EDITION_SEPARATOR, edition),
            None => write!(f, "{}", self.base_id),
        }
    }
}

impl FromStr for Identifier {
    type Err = PdgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Identifier::parse(s)
    }
}

/// Split a raw identifier into (normalized base id, edition).
///
/// More than one separator is rejected. An empty edition part counts as absent.
pub fn parse_id(raw: &str) -> PdgResult<(String, Option<String>)> {
    let mut parts = raw.split(EDITION_SEPARATOR);
    let base = parts.next().unwrap_or_default();
    let edition = parts.next();
    if parts.next().is_some() {
        return Err(PdgError::MalformedIdentifier {
            raw: raw.to_string(),
        });
    }
    let edition = edition.filter(|e| !e.is_empty()).map(str::to_string);
    Ok((base.to_uppercase(), edition))
}

/// Normalized base part of a PDG Identifier.
pub fn base_id(raw: &str) -> PdgResult<String> {
    parse_id(raw).map(|(base, _)| base)
}

/// Normalized full PDG Identifier string, with the edition when given.
pub fn make_id(base_id: &str, edition: Option<&str>) -> String {
    Identifier::new(base_id, edition).to_string()
}

/// Compact, stable handle into an arena (decay item graphs and similar).
///
/// - `u32` keeps memory small
/// - `NonZero` enables `Option<Id>` to be pointer-optimized
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(NonZeroU32);

impl Id {
    /// Create an Id from a 0-based index by storing index+1.
    pub fn from_index(index: u32) -> Self {
        Self(NonZeroU32::MIN.saturating_add(index))
    }

    /// Recover the 0-based index.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Arena slot of a decay item node.
pub type ItemNodeId = Id;
