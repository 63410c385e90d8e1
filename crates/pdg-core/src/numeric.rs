use crate::{PdgError, PdgResult};

/// Floating point type used throughout the system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// Round `value` to `digits` decimal places, ties to even on the exact binary value.
///
/// Goes through the correctly rounded decimal rendering so results agree with
/// the published reference values digit for digit.
pub fn round_to(value: Real, digits: usize) -> PdgResult<Real> {
    let text = format!("{:.*}", digits, value);
    text.parse::<Real>().map_err(|_| PdgError::Rounding {
        what: "rounded value is not a number",
    })
}

/// Round a (value, error) pair following the PDG significant-figure rules.
///
/// The three leading digits of the error decide how many digits are kept:
/// below 355 two digits, below 950 one digit, otherwise the error is rounded
/// up to 1000 and two digits are kept. The value is rounded to the same
/// decimal position as the error.
pub fn pdg_round(value: Real, error: Real) -> PdgResult<(Real, Real)> {
    if error.is_nan() || error <= 0.0 {
        return Err(PdgError::Rounding {
            what: "PDG rounding requires error larger than zero",
        });
    }
    let log = error.abs().log10();
    let mut power = if error.abs() < 1.0 && log.fract() != 0.0 {
        log.trunc() as i32
    } else {
        log.trunc() as i32 + 1
    };
    let mut reduced_error = error * pow10(-power);
    let n_digits = if reduced_error < 0.355 {
        2
    } else if reduced_error < 0.950 {
        1
    } else {
        reduced_error = 0.1;
        power += 1;
        2
    };
    let new_error = round_to(reduced_error, n_digits)? * pow10(power);
    let new_value = round_to(value * pow10(-power), n_digits)? * pow10(power);
    Ok((new_value, new_error))
}

fn pow10(power: i32) -> Real {
    (10.0 as Real).powf(power as Real)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn reference_rounding_vectors() {
        assert_eq!(pdg_round(0.827, 0.119).unwrap(), (0.83, 0.12));
        assert_eq!(pdg_round(0.827, 0.367).unwrap(), (0.8, 0.4));
        assert_eq!(pdg_round(12.3456, 0.99).unwrap(), (12.3, 1.0));
    }

    #[test]
    fn rounding_large_errors() {
        let (value, error) = pdg_round(1234.5, 23.0).unwrap();
        assert!(nearly_equal(error, 23.0, Tolerances::default()));
        assert!((value - 1234.5).abs() <= 0.5 + 1e-9);
        assert!(nearly_equal(value, value.round(), Tolerances::default()));
    }

    #[test]
    fn rounding_requires_positive_error() {
        assert!(matches!(
            pdg_round(1.0, 0.0),
            Err(PdgError::Rounding { .. })
        ));
        assert!(pdg_round(1.0, -0.1).is_err());
        assert!(pdg_round(1.0, Real::NAN).is_err());
    }

    #[test]
    fn rounding_is_deterministic() {
        let first = pdg_round(139.57039, 0.00018).unwrap();
        let second = pdg_round(139.57039, 0.00018).unwrap();
        assert_eq!(first, second);
    }
}
