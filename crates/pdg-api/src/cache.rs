//! Per-entity memoization of fetched row groups.

use std::cell::OnceCell;

use pdg_core::{PdgError, PdgResult};
use pdg_schema::{PdgDecayRow, PdgIdRow, PdgParticleRow};

use crate::value::SummaryValue;

/// One slot per row group. Each slot is filled at most once; an edition
/// change replaces the whole cache.
#[derive(Debug, Default)]
pub struct EntityCache {
    pub(crate) id_row: OnceCell<PdgIdRow>,
    pub(crate) summary: OnceCell<Vec<SummaryValue>>,
    /// Outcome of particle row matching; failures stay cached.
    pub(crate) particle: OnceCell<PdgResult<PdgParticleRow>>,
    pub(crate) decay: OnceCell<Vec<PdgDecayRow>>,
}

impl EntityCache {
    /// Number of row groups fetched so far.
    pub fn filled(&self) -> usize {
        [
            self.id_row.get().is_some(),
            self.summary.get().is_some(),
            self.particle.get().is_some(),
            self.decay.get().is_some(),
        ]
        .into_iter()
        .filter(|&filled| filled)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.filled() == 0
    }
}

/// Return the slot's value, fetching it on first access.
///
/// A failed fetch leaves the slot empty.
pub(crate) fn get_or_fetch<'c, T>(
    slot: &'c OnceCell<T>,
    group: &'static str,
    pdgid: &str,
    fetch: impl FnOnce() -> PdgResult<T>,
) -> PdgResult<&'c T> {
    if let Some(value) = slot.get() {
        return Ok(value);
    }
    let value = fetch()?;
    tracing::debug!(group, pdgid, "cache fill");
    Ok(slot.get_or_init(|| value))
}

/// Store and schema failures are transient; resolution outcomes are not.
pub(crate) fn is_permanent(outcome: &PdgResult<PdgParticleRow>) -> bool {
    !matches!(outcome, Err(PdgError::Store(_) | PdgError::Schema(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_once() {
        let cache = EntityCache::default();
        assert!(cache.is_empty());

        let mut calls = 0;
        for _ in 0..3 {
            let rows = get_or_fetch(&cache.decay, "decay", "S008.1", || {
                calls += 1;
                Ok(Vec::new())
            })
            .unwrap();
            assert!(rows.is_empty());
        }
        assert_eq!(calls, 1);
        assert_eq!(cache.filled(), 1);
    }

    #[test]
    fn failed_fetch_leaves_slot_empty() {
        let cache = EntityCache::default();
        let err = get_or_fetch(&cache.decay, "decay", "S008.1", || {
            Err(PdgError::Store("gone".into()))
        })
        .unwrap_err();
        assert_eq!(err, PdgError::Store("gone".into()));
        assert!(cache.is_empty());
    }
}
