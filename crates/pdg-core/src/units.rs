// pdg-core/src/units.rs

use core::fmt;

use thiserror::Error;
use uom::si::f64::{Energy as UomEnergy, Time as UomTime};

// Public canonical unit types (SI, f64)
pub type Energy = UomEnergy;
pub type Time = UomTime;

/// Physical dimension a named unit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// Energy, mass and width (canonical: eV)
    Energy,
    /// Lifetime (canonical: s)
    Time,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Energy => write!(f, "energy"),
            Self::Time => write!(f, "time"),
        }
    }
}

/// Error in unit lookup or conversion.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitError {
    #[error("Unknown unit '{unit}'")]
    UnknownUnit { unit: String },

    #[error("Cannot convert from {from} ({from_dim}) to {to} ({to_dim})")]
    IncompatibleDimensions {
        from: String,
        to: String,
        from_dim: Dimension,
        to_dim: Dimension,
    },
}

/// One row of the unit table: name, factor to the canonical unit, dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitDef {
    pub name: &'static str,
    pub factor: f64,
    pub dimension: Dimension,
}

// Names are case-sensitive: "meV" and "MeV" differ by nine orders of magnitude.
const UNIT_TABLE: [UnitDef; 13] = [
    UnitDef {
        name: "meV",
        factor: 1e-3,
        dimension: Dimension::Energy,
    },
    UnitDef {
        name: "eV",
        factor: 1e0,
        dimension: Dimension::Energy,
    },
    UnitDef {
        name: "keV",
        factor: 1e3,
        dimension: Dimension::Energy,
    },
    UnitDef {
        name: "MeV",
        factor: 1e6,
        dimension: Dimension::Energy,
    },
    UnitDef {
        name: "GeV",
        factor: 1e9,
        dimension: Dimension::Energy,
    },
    UnitDef {
        name: "TeV",
        factor: 1e12,
        dimension: Dimension::Energy,
    },
    UnitDef {
        name: "PeV",
        factor: 1e15,
        dimension: Dimension::Energy,
    },
    UnitDef {
        name: "s",
        factor: 1e0,
        dimension: Dimension::Time,
    },
    UnitDef {
        name: "ms",
        factor: 1e-3,
        dimension: Dimension::Time,
    },
    UnitDef {
        name: "us",
        factor: 1e-6,
        dimension: Dimension::Time,
    },
    UnitDef {
        name: "ns",
        factor: 1e-9,
        dimension: Dimension::Time,
    },
    UnitDef {
        name: "ps",
        factor: 1e-12,
        dimension: Dimension::Time,
    },
    UnitDef {
        name: "fs",
        factor: 1e-15,
        dimension: Dimension::Time,
    },
];

pub fn unit_table() -> &'static [UnitDef] {
    &UNIT_TABLE
}

pub fn lookup(unit: &str) -> Result<&'static UnitDef, UnitError> {
    let name = unit.trim();
    unit_table()
        .iter()
        .find(|def| def.name == name)
        .ok_or_else(|| UnitError::UnknownUnit {
            unit: unit.to_string(),
        })
}

/// Multiplicative factor taking a value in `from` units to `to` units.
pub fn conversion_factor(from: &str, to: &str) -> Result<f64, UnitError> {
    let from_def = lookup(from)?;
    let to_def = lookup(to)?;
    if from_def.dimension != to_def.dimension {
        return Err(UnitError::IncompatibleDimensions {
            from: from.to_string(),
            to: to.to_string(),
            from_dim: from_def.dimension,
            to_dim: to_def.dimension,
        });
    }
    Ok(from_def.factor / to_def.factor)
}

pub fn convert(value: f64, from: &str, to: &str) -> Result<f64, UnitError> {
    if from == to {
        lookup(from)?;
        return Ok(value);
    }
    Ok(value * conversion_factor(from, to)?)
}

#[inline]
pub fn seconds(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn gev(v: f64) -> Energy {
    use uom::si::energy::joule;
    Energy::new::<joule>(v * constants::GEV_IN_J)
}

pub mod constants {
    /// Reduced Planck constant in GeV s.
    pub const HBAR_IN_GEV_S: f64 = 6.582_119_569e-25;

    /// One GeV in joules.
    pub const GEV_IN_J: f64 = 1.602_176_634e-10;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{Tolerances, nearly_equal};

    #[test]
    fn mev_to_gev_divides_by_thousand() {
        let v = convert(139.57039, "MeV", "GeV").unwrap();
        assert!(nearly_equal(v, 0.13957039, Tolerances::default()));
    }

    #[test]
    fn units_are_case_sensitive() {
        let milli = convert(1.0, "meV", "eV").unwrap();
        let mega = convert(1.0, "MeV", "eV").unwrap();
        assert!(nearly_equal(milli, 1e-3, Tolerances::default()));
        assert!(nearly_equal(mega, 1e6, Tolerances::default()));
    }

    #[test]
    fn reject_cross_dimension() {
        assert!(matches!(
            convert(1.0, "GeV", "s"),
            Err(UnitError::IncompatibleDimensions { .. })
        ));
    }

    #[test]
    fn reject_unknown_unit() {
        assert!(matches!(
            convert(1.0, "GeV", "furlong"),
            Err(UnitError::UnknownUnit { unit }) if unit == "furlong"
        ));
        assert!(convert(1.0, "parsec", "parsec").is_err());
    }

    #[test]
    fn constructors_smoke() {
        use uom::si::energy::joule;
        use uom::si::time::second;
        let t = seconds(2.6e-8);
        assert!(nearly_equal(t.get::<second>(), 2.6e-8, Tolerances::default()));
        let e = gev(1.0);
        assert!(nearly_equal(
            e.get::<joule>(),
            constants::GEV_IN_J,
            Tolerances::default()
        ));
    }
}
