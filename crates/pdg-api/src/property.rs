//! Properties: masses, widths, lifetimes, branching data and the rest.

use std::collections::HashSet;
use std::ops::{Deref, DerefMut};

use pdg_core::{PdgError, PdgResult};
use pdg_schema::PdgMeasurementRow;
use pdg_store::{DataStore, Query};

use crate::best::{DataFlags, best};
use crate::config::Resolution;
use crate::entity::EntityCore;
use crate::measurement::Measurement;
use crate::particle::Particle;
use crate::value::SummaryValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Mass,
    Width,
    Lifetime,
    BranchingFraction,
    Other,
}

impl PropertyKind {
    pub fn from_data_type(data_type: Option<&str>) -> Self {
        match data_type {
            Some("M") => PropertyKind::Mass,
            Some("G") => PropertyKind::Width,
            Some("T") => PropertyKind::Lifetime,
            Some(t) if crate::entity::is_branching_fraction_type(t) => {
                PropertyKind::BranchingFraction
            }
            _ => PropertyKind::Other,
        }
    }
}

/// A quantity with summary values and measurements.
pub struct Property<'a, S: DataStore> {
    core: EntityCore<'a, S>,
    kind: PropertyKind,
}

impl<'a, S: DataStore> Property<'a, S> {
    pub(crate) fn new(core: EntityCore<'a, S>, kind: PropertyKind) -> Self {
        Self { core, kind }
    }

    pub fn core(&self) -> &EntityCore<'a, S> {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut EntityCore<'a, S> {
        &mut self.core
    }

    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// Summary values in stored order, optionally only those shown in the Summary Table.
    pub fn summary_values(&self, summary_table_only: bool) -> PdgResult<Vec<&SummaryValue>> {
        Ok(self
            .core
            .summary_rows()?
            .iter()
            .filter(|v| !summary_table_only || v.in_summary_table())
            .collect())
    }

    pub fn n_summary_table_values(&self) -> PdgResult<usize> {
        Ok(self.summary_values(true)?.len())
    }

    /// The PDG best summary value.
    ///
    /// A single summary value is the best one unless `summary_table_only`
    /// is set; otherwise the Summary Table values are arbitrated. `None`
    /// when there is nothing to arbitrate.
    pub fn best_summary(
        &self,
        ctx: Resolution,
        summary_table_only: bool,
    ) -> PdgResult<Option<&SummaryValue>> {
        if !summary_table_only {
            let all = self.core.summary_rows()?;
            if all.len() == 1 {
                return Ok(all.first());
            }
        }
        let candidates = self.summary_values(true)?;
        if candidates.is_empty() {
            return Ok(None);
        }
        let quantity = format!("{} ({})", self.core.pdgid(), self.core.description()?);
        best(candidates, ctx, Some(&quantity)).map(Some)
    }

    /// False when there is no best summary or it is ambiguous.
    pub fn has_best_summary(&self, ctx: Resolution, summary_table_only: bool) -> PdgResult<bool> {
        match self.best_summary(ctx, summary_table_only) {
            Ok(best) => Ok(best.is_some()),
            Err(err) if err.is_ambiguous() || err.is_no_data() => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn require_best(&self, ctx: Resolution) -> PdgResult<&SummaryValue> {
        self.best_summary(ctx, false)?.ok_or_else(|| {
            PdgError::no_data(format!("No summary value for {}", self.core.pdgid()))
        })
    }

    pub fn value(&self, ctx: Resolution) -> PdgResult<Option<f64>> {
        Ok(self.require_best(ctx)?.value())
    }

    pub fn error(&self, ctx: Resolution) -> PdgResult<Option<f64>> {
        self.require_best(ctx)?.get_error(None)
    }

    pub fn error_positive(&self, ctx: Resolution) -> PdgResult<Option<f64>> {
        Ok(self.require_best(ctx)?.error_positive())
    }

    pub fn error_negative(&self, ctx: Resolution) -> PdgResult<Option<f64>> {
        Ok(self.require_best(ctx)?.error_negative())
    }

    pub fn units(&self, ctx: Resolution) -> PdgResult<&str> {
        Ok(self.require_best(ctx)?.units())
    }

    pub fn is_limit(&self, ctx: Resolution) -> PdgResult<bool> {
        Ok(self.require_best(ctx)?.is_limit())
    }

    pub fn confidence_level(&self, ctx: Resolution) -> PdgResult<Option<f64>> {
        Ok(self.require_best(ctx)?.confidence_level())
    }

    pub fn scale_factor(&self, ctx: Resolution) -> PdgResult<f64> {
        Ok(self.require_best(ctx)?.scale_factor())
    }

    pub fn comment(&self, ctx: Resolution) -> PdgResult<Option<&str>> {
        Ok(self.require_best(ctx)?.comment())
    }

    pub fn display_value_text(&self, ctx: Resolution) -> PdgResult<&str> {
        Ok(self.require_best(ctx)?.display_value_text())
    }

    /// Best summary value converted to `units`.
    pub fn best_value_in(&self, ctx: Resolution, units: &str) -> PdgResult<Option<SummaryValue>> {
        self.best_summary(ctx, false)?
            .map(|v| v.converted(units))
            .transpose()
    }

    /// Best value in GeV; the Summary Table may quote masses in other units.
    pub fn best_value_in_gev(&self, ctx: Resolution) -> PdgResult<Option<SummaryValue>> {
        self.best_value_in(ctx, "GeV")
    }

    /// Number of summary values for this identifier in the active edition.
    pub fn count_data_entries(&self) -> PdgResult<i64> {
        self.core
            .api()
            .count_data_entries(self.core.base_id(), self.core.edition(), None)
    }

    pub fn measurements(&self) -> PdgResult<Vec<Measurement<'a, S>>> {
        let api = self.core.api();
        let session = api.session()?;
        let rows = session.fetch_rows::<PdgMeasurementRow>(
            &Query::new()
                .eq("pdgid", self.core.base_id())
                .order_by("sort"),
        )?;
        Ok(rows
            .into_iter()
            .map(|row| Measurement::new(api, row))
            .collect())
    }

    /// Particle rows of the particle this property belongs to.
    pub fn particles(&self) -> PdgResult<Vec<Particle<'a, S>>> {
        let api = self.core.api();
        let mut current = self.core.base_id().to_string();
        let mut parent = self.core.get_parent_identifier(false)?;
        let mut seen = HashSet::from([current.clone()]);
        while let Some(next) = parent {
            if next == current {
                break;
            }
            if !seen.insert(next.clone()) {
                return Err(PdgError::InvalidData {
                    what: format!("parent chain of {} loops at {next}", self.core.pdgid()),
                });
            }
            let row = api.id_row(&next)?;
            parent = row.parent_pdgid.map(|p| p.to_uppercase());
            current = next;
        }
        api.particle_list(&current, self.core.edition())
    }

    /// The single particle this property belongs to.
    pub fn particle(&self) -> PdgResult<Particle<'a, S>> {
        let mut particles = self.particles()?;
        match particles.len() {
            0 => Err(PdgError::no_data(format!(
                "No particle for {}",
                self.core.pdgid()
            ))),
            1 => Ok(particles.remove(0)),
            _ => Err(PdgError::ambiguous(format!(
                "More than one particle for {}; use particles() instead",
                self.core.pdgid()
            ))),
        }
    }
}

impl<'a, S: DataStore> Deref for Property<'a, S> {
    type Target = EntityCore<'a, S>;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

impl<S: DataStore> DerefMut for Property<'_, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.core
    }
}

impl<S: DataStore> DataFlags for Property<'_, S> {
    fn data_flags(&self) -> PdgResult<&str> {
        self.core.data_flags()
    }
}

impl<S: DataStore> std::fmt::Debug for Property<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property")
            .field("kind", &self.kind)
            .field("core", &self.core)
            .finish()
    }
}
