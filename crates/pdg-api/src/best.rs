//! Best-value arbitration.
//!
//! The same policy picks the best summary value within one property and
//! the best property among siblings (several mass entries of one
//! particle, for instance).

use pdg_core::{PdgError, PdgResult};

use crate::config::Resolution;

/// Alternate entry: a cross-reference, never authoritative.
pub const FLAG_ALTERNATE: char = 'A';
/// Default entry among several candidates.
pub const FLAG_DEFAULT: char = 'D';
/// Special-case entry, only considered under strict resolution.
pub const FLAG_SPECIAL: char = 's';

/// Anything carrying single-character data flags.
pub trait DataFlags {
    fn data_flags(&self) -> PdgResult<&str>;
}

impl<T: DataFlags + ?Sized> DataFlags for &T {
    fn data_flags(&self) -> PdgResult<&str> {
        (**self).data_flags()
    }
}

/// Pick the best candidate, or fail with `NoData` / `AmbiguousValue`.
///
/// Order of `candidates` is significant: lenient resolution returns the
/// first `D`-flagged candidate, else the first remaining one.
pub fn best<T: DataFlags>(
    candidates: impl IntoIterator<Item = T>,
    ctx: Resolution,
    quantity: Option<&str>,
) -> PdgResult<T> {
    let for_what = quantity.map(|q| format!(" for {q}")).unwrap_or_default();

    let mut remaining = Vec::new();
    for candidate in candidates {
        let flags = candidate.data_flags()?;
        if flags.contains(FLAG_ALTERNATE) {
            continue;
        }
        if !ctx.strict && flags.contains(FLAG_SPECIAL) {
            continue;
        }
        remaining.push(candidate);
    }

    match remaining.len() {
        0 => Err(PdgError::no_data(format!("No best property found{for_what}"))),
        1 => Ok(remaining.remove(0)),
        n if ctx.strict => {
            tracing::debug!(candidates = n, "ambiguous best value under strict resolution");
            Err(PdgError::ambiguous(format!("Ambiguous best property{for_what}")))
        }
        _ => {
            let mut default_at = None;
            for (index, candidate) in remaining.iter().enumerate() {
                if candidate.data_flags()?.contains(FLAG_DEFAULT) {
                    default_at = Some(index);
                    break;
                }
            }
            Ok(remaining.swap_remove(default_at.unwrap_or(0)))
        }
    }
}
