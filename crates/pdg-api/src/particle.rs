//! Particles: charge-state resolution, property navigation and derived
//! mass, width and lifetime.

use std::cell::OnceCell;
use std::ops::{Deref, DerefMut};

use pdg_core::units::{Time, constants::HBAR_IN_GEV_S, seconds};
use pdg_core::{PdgError, PdgResult};
use pdg_schema::{PdgDataRow, PdgIdRow, PdgParticleRow};
use pdg_store::{Aggregate, DataStore, Filter, Query};

use crate::best::{DataFlags, best};
use crate::cache::{EntityCache, get_or_fetch, is_permanent};
use crate::config::Resolution;
use crate::decay::BranchingFraction;
use crate::entity::{Entity, EntityCore};
use crate::measurement::Measurement;
use crate::property::Property;

/// Width from a lifetime, or lifetime from a width, via Γ·τ = ħ.
///
/// Returns `primary` when present. Otherwise derives it from a positive,
/// finite complement in GeV or seconds.
pub fn derive_from_complement(primary: Option<f64>, complement: Option<f64>) -> Option<f64> {
    match (primary, complement) {
        (Some(value), _) => Some(value),
        (None, Some(c)) if c > 0.0 && c.is_finite() => Some(HBAR_IN_GEV_S / c),
        _ => None,
    }
}

/// Error of a quantity derived through [`derive_from_complement`].
pub fn derive_error_from_complement(
    primary_error: Option<f64>,
    complement: Option<f64>,
    complement_error: Option<f64>,
) -> Option<f64> {
    match (primary_error, complement, complement_error) {
        (Some(err), _, _) => Some(err),
        (None, Some(c), Some(err)) if c > 0.0 && c.is_finite() => {
            Some(err * HBAR_IN_GEV_S / (c * c))
        }
        _ => None,
    }
}

/// Where particle row matching ended up for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleResolution {
    Unresolved,
    Resolved,
    Ambiguous,
    NotFound,
}

/// Options for [`Particle::properties`].
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyFilter {
    /// Data type key, exact or with `%` wildcards. `None` selects everything
    /// except branching fractions and ratios; `%` selects everything.
    pub data_type_key: Option<String>,
    /// Only properties with summary values in the active edition.
    pub require_summary_data: bool,
    /// Only properties with a summary value in (or not in) the Summary Table.
    /// Implies `require_summary_data`.
    pub in_summary_table: Option<bool>,
    pub omit_branching_ratios: bool,
}

impl Default for PropertyFilter {
    fn default() -> Self {
        Self {
            data_type_key: None,
            require_summary_data: true,
            in_summary_table: None,
            omit_branching_ratios: false,
        }
    }
}

impl PropertyFilter {
    pub fn data_type(key: &str) -> Self {
        Self {
            data_type_key: Some(key.to_string()),
            ..Self::default()
        }
    }

    pub fn with_summary_data(mut self, require: bool) -> Self {
        self.require_summary_data = require;
        self
    }
}

/// Names of explicit antiparticle rows carry this marker.
const ANTIPARTICLE_NAME_PATTERN: &str = "%bar%";

/// Excludes generic rows named as the antiparticle state.
///
/// This is a naming heuristic, not an exhaustive rule.
fn excluding_antiparticle_name(query: Query) -> Query {
    query.not_like("name", ANTIPARTICLE_NAME_PATTERN)
}

/// One particle, in one charge state when an MC id picks it.
pub struct Particle<'a, S: DataStore> {
    core: EntityCore<'a, S>,
    set_mcid: Option<i64>,
}

impl<'a, S: DataStore> Particle<'a, S> {
    pub(crate) fn from_core(core: EntityCore<'a, S>, set_mcid: Option<i64>) -> Self {
        Self { core, set_mcid }
    }

    /// Particle already matched to `row`.
    pub(crate) fn from_row(
        api: &'a crate::api::PdgApi<S>,
        row: PdgParticleRow,
        edition: Option<&str>,
    ) -> Self {
        let mcid = row.mcid;
        let core = EntityCore::new(api, pdg_core::Identifier::new(&row.pdgid, edition))
            .with_cache(EntityCache {
                particle: OnceCell::from(Ok(row)),
                ..EntityCache::default()
            });
        Self::from_core(core, mcid)
    }

    pub fn core(&self) -> &EntityCore<'a, S> {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut EntityCore<'a, S> {
        &mut self.core
    }

    /// MC id the particle was requested with, if any.
    pub fn set_mcid(&self) -> Option<i64> {
        self.set_mcid
    }

    /// Charge-conjugation type to match: `A` for a negative MC id, else `P`.
    pub fn cc_type_flag(&self) -> &'static str {
        match self.set_mcid {
            Some(mcid) if mcid < 0 => "A",
            _ => "P",
        }
    }

    pub fn resolution(&self) -> ParticleResolution {
        match self.core.cache().particle.get() {
            None => ParticleResolution::Unresolved,
            Some(Ok(_)) => ParticleResolution::Resolved,
            Some(Err(err)) if err.is_ambiguous() => ParticleResolution::Ambiguous,
            Some(Err(_)) => ParticleResolution::NotFound,
        }
    }

    /// The matched particle row. A failed match is permanent for this entity.
    pub fn particle_row(&self) -> PdgResult<&PdgParticleRow> {
        let outcome = get_or_fetch(&self.core.cache().particle, "particle", self.core.pdgid(), || {
            let outcome = self.match_particle_row();
            if is_permanent(&outcome) {
                Ok(outcome)
            } else {
                outcome.map(Ok)
            }
        })?;
        outcome.as_ref().map_err(Clone::clone)
    }

    fn base_particle_query(&self) -> Query {
        let mut query = Query::new()
            .eq("pdgid", self.core.base_id())
            .eq("entry_type", "P");
        if let Some(mcid) = self.set_mcid {
            query = query.eq("mcid", mcid);
        }
        query
    }

    fn match_particle_row(&self) -> PdgResult<PdgParticleRow> {
        let session = self.core.api().session()?;

        let specific = self.base_particle_query().any_of(vec![
            vec![
                Filter::Eq("charge_type", "S".into()),
                Filter::Eq("cc_type", self.cc_type_flag().into()),
            ],
            vec![
                Filter::Eq("charge_type", "S".into()),
                Filter::Eq("cc_type", "S".into()),
            ],
            vec![
                Filter::Eq("charge_type", "E".into()),
                Filter::IsNull("cc_type"),
            ],
        ]);
        let mut matches = session.fetch_rows::<PdgParticleRow>(&specific)?;
        if matches.len() == 1 {
            return Ok(matches.remove(0));
        }

        let mut generic = self
            .base_particle_query()
            .eq("charge_type", "G")
            .is_null("cc_type");
        if self.cc_type_flag() == "P" {
            generic = excluding_antiparticle_name(generic);
        }
        let mut generic_matches = session.fetch_rows::<PdgParticleRow>(&generic)?;
        tracing::warn!(
            pdgid = %self.core.pdgid(),
            specific = matches.len(),
            generic = generic_matches.len(),
            "no unique charge-specific particle row, trying generic state"
        );
        match generic_matches.len() {
            0 => {
                let mcid = self
                    .set_mcid
                    .map(|m| format!(", MC ID = {m}"))
                    .unwrap_or_default();
                Err(PdgError::no_data(format!(
                    "Particle data for {}{mcid} not found",
                    self.core.pdgid()
                )))
            }
            1 => Ok(generic_matches.remove(0)),
            _ => {
                let names: Vec<&str> = generic_matches.iter().map(|p| p.name.as_str()).collect();
                let mut mcids: Vec<i64> = generic_matches.iter().filter_map(|p| p.mcid).collect();
                mcids.sort_unstable();
                mcids.dedup();
                Err(PdgError::ambiguous(format!(
                    "Multiple particles for {}: MCID {mcids:?}, names {names:?}",
                    self.core.base_id()
                )))
            }
        }
    }

    pub fn name(&self) -> PdgResult<&str> {
        Ok(&self.particle_row()?.name)
    }

    pub fn mcid(&self) -> PdgResult<Option<i64>> {
        Ok(self.particle_row()?.mcid)
    }

    /// Charge in units of e.
    pub fn charge(&self) -> PdgResult<Option<f64>> {
        Ok(self.particle_row()?.charge)
    }

    pub fn quantum_i(&self) -> PdgResult<Option<&str>> {
        Ok(self.particle_row()?.quantum_i.as_deref())
    }

    pub fn quantum_g(&self) -> PdgResult<Option<&str>> {
        Ok(self.particle_row()?.quantum_g.as_deref())
    }

    pub fn quantum_j(&self) -> PdgResult<Option<&str>> {
        Ok(self.particle_row()?.quantum_j.as_deref())
    }

    pub fn quantum_p(&self) -> PdgResult<Option<&str>> {
        Ok(self.particle_row()?.quantum_p.as_deref())
    }

    pub fn quantum_c(&self) -> PdgResult<Option<&str>> {
        Ok(self.particle_row()?.quantum_c.as_deref())
    }

    pub fn is_boson(&self) -> PdgResult<bool> {
        self.core.has_flag('G')
    }

    pub fn is_quark(&self) -> PdgResult<bool> {
        self.core.has_flag('Q')
    }

    pub fn is_lepton(&self) -> PdgResult<bool> {
        self.core.has_flag('L')
    }

    pub fn is_meson(&self) -> PdgResult<bool> {
        self.core.has_flag('M')
    }

    pub fn is_baryon(&self) -> PdgResult<bool> {
        self.core.has_flag('B')
    }

    /// True for a generic (charge-unspecified) state.
    pub fn is_generic(&self) -> PdgResult<bool> {
        Ok(self.particle_row()?.charge_type == "G")
    }

    /// Child properties of this particle, in stored order.
    pub fn properties(&self, filter: &PropertyFilter) -> PdgResult<Vec<Entity<'a, S>>> {
        let api = self.core.api();
        let edition = self.core.edition();

        let mut query = Query::new()
            .like("parent_pdgid", format!("{}%", self.core.base_id()))
            .order_by("sort");
        let not_like_or_null = |pattern: &str| {
            Filter::AnyOf(vec![
                vec![Filter::NotLike("data_type", pattern.to_string())],
                vec![Filter::IsNull("data_type")],
            ])
        };
        match filter.data_type_key.as_deref() {
            None => {
                query = query
                    .filter(not_like_or_null("BF%"))
                    .filter(not_like_or_null("BR%"));
            }
            Some(key) => {
                if key.contains('%') {
                    if key != "%" {
                        query = query.like("data_type", key);
                    }
                } else {
                    query = query.eq("data_type", key);
                }
                if filter.omit_branching_ratios {
                    query = query.filter(not_like_or_null("BR%"));
                }
            }
        }

        let rows = {
            let session = api.session()?;
            let rows = session.fetch_rows::<PdgIdRow>(&query)?;
            let require_data = filter.require_summary_data || filter.in_summary_table.is_some();
            let mut kept = Vec::with_capacity(rows.len());
            for row in rows {
                if require_data {
                    let Some(edition) = edition else {
                        continue;
                    };
                    let mut data_query = Query::new()
                        .eq("pdgid", row.pdgid.as_str())
                        .eq("edition", edition);
                    if let Some(in_table) = filter.in_summary_table {
                        data_query = data_query.eq("in_summary_table", in_table);
                    }
                    let count =
                        session.fetch_scalar::<PdgDataRow>(Aggregate::Count, &data_query)?;
                    if count == 0 {
                        continue;
                    }
                }
                kept.push(row);
            }
            kept
        };

        let mut properties = Vec::with_capacity(rows.len());
        for row in rows {
            let entity = Entity::from_id_row(api, row, edition);
            if self.matches_charge(&entity)? {
                properties.push(entity);
            }
        }
        Ok(properties)
    }

    /// Charge-specific masses, widths and lifetimes must match this
    /// particle's charge magnitude, unless it has no specific charge.
    fn matches_charge(&self, entity: &Entity<'a, S>) -> PdgResult<bool> {
        if !matches!(entity.data_type()?, Some("M" | "G" | "T")) {
            return Ok(true);
        }
        let flags = entity.core().data_flags()?;
        if !flags.chars().any(|c| matches!(c, '0' | '1' | '2')) {
            return Ok(true);
        }
        match self.charge()? {
            None => Ok(true),
            Some(charge) => {
                let magnitude = (charge.abs().trunc() as i64).to_string();
                Ok(flags.contains(magnitude.as_str()))
            }
        }
    }

    fn properties_of(&self, key: &str, require_summary_data: bool) -> PdgResult<Vec<Property<'a, S>>> {
        let filter = PropertyFilter::data_type(key).with_summary_data(require_summary_data);
        Ok(self
            .properties(&filter)?
            .into_iter()
            .filter_map(Entity::into_property)
            .collect())
    }

    pub fn masses(&self, require_summary_data: bool) -> PdgResult<Vec<Property<'a, S>>> {
        self.properties_of("M", require_summary_data)
    }

    pub fn widths(&self, require_summary_data: bool) -> PdgResult<Vec<Property<'a, S>>> {
        self.properties_of("G", require_summary_data)
    }

    pub fn lifetimes(&self, require_summary_data: bool) -> PdgResult<Vec<Property<'a, S>>> {
        self.properties_of("T", require_summary_data)
    }

    /// Branching fractions of the given type; `BF%` selects all of them.
    pub fn branching_fractions(
        &self,
        data_type_key: &str,
        require_summary_data: bool,
    ) -> PdgResult<Vec<BranchingFraction<'a, S>>> {
        if !data_type_key.starts_with("BF") {
            return Err(PdgError::InvalidArgument {
                what: format!("illegal branching fraction data type key {data_type_key}"),
            });
        }
        let filter = PropertyFilter::data_type(data_type_key).with_summary_data(require_summary_data);
        Ok(self
            .properties(&filter)?
            .into_iter()
            .filter_map(|entity| match entity {
                Entity::BranchingFraction(bf) => Some(bf),
                Entity::Property(p) => Some(BranchingFraction::from(p)),
                Entity::Particle(_) => None,
            })
            .collect())
    }

    pub fn exclusive_branching_fractions(
        &self,
        include_subdecays: bool,
        require_summary_data: bool,
    ) -> PdgResult<Vec<BranchingFraction<'a, S>>> {
        let key = if include_subdecays { "BFX%" } else { "BFX" };
        self.branching_fractions(key, require_summary_data)
    }

    pub fn inclusive_branching_fractions(
        &self,
        include_subdecays: bool,
        require_summary_data: bool,
    ) -> PdgResult<Vec<BranchingFraction<'a, S>>> {
        let key = if include_subdecays { "BFI%" } else { "BFI" };
        self.branching_fractions(key, require_summary_data)
    }

    fn best_of(
        &self,
        candidates: Vec<Property<'a, S>>,
        ctx: Resolution,
        quantity: &str,
    ) -> PdgResult<Property<'a, S>> {
        best(candidates, ctx, Some(&format!("{quantity} ({})", self.core.pdgid())))
    }

    /// Value and symmetric error of the best property, in `units`.
    /// A limit gives no usable central value.
    fn direct(
        &self,
        candidates: Vec<Property<'a, S>>,
        ctx: Resolution,
        quantity: &str,
        units: &str,
    ) -> PdgResult<(Option<f64>, Option<f64>)> {
        let property = self.best_of(candidates, ctx, quantity)?;
        match property.best_summary(ctx, false)? {
            Some(summary) if !summary.is_limit() => Ok((
                summary.get_value(Some(units))?,
                summary.get_error(Some(units))?,
            )),
            _ => Ok((None, None)),
        }
    }

    fn direct_width(&self, ctx: Resolution) -> PdgResult<(Option<f64>, Option<f64>)> {
        self.direct(self.widths(true)?, ctx, "width", "GeV")
    }

    fn direct_lifetime(&self, ctx: Resolution) -> PdgResult<(Option<f64>, Option<f64>)> {
        self.direct(self.lifetimes(true)?, ctx, "lifetime", "s")
    }

    /// Complement for the ħ fallback: absent when there is no usable entry.
    fn complement(
        direct: PdgResult<(Option<f64>, Option<f64>)>,
    ) -> PdgResult<(Option<f64>, Option<f64>)> {
        match direct {
            Err(err) if err.is_no_data() => Ok((None, None)),
            other => other,
        }
    }

    /// Width and its error in GeV, derived from the lifetime when there is
    /// no width entry and resolution is lenient.
    fn width_pair(&self, ctx: Resolution) -> PdgResult<(Option<f64>, Option<f64>)> {
        match self.direct_width(ctx) {
            Err(err) if err.is_no_data() && !ctx.strict => {
                let (tau, tau_err) = Self::complement(self.direct_lifetime(ctx))?;
                tracing::debug!(pdgid = %self.core.pdgid(), "width derived from lifetime");
                Ok((
                    derive_from_complement(None, tau),
                    derive_error_from_complement(None, tau, tau_err),
                ))
            }
            other => other,
        }
    }

    fn lifetime_pair(&self, ctx: Resolution) -> PdgResult<(Option<f64>, Option<f64>)> {
        match self.direct_lifetime(ctx) {
            Err(err) if err.is_no_data() && !ctx.strict => {
                let (gamma, gamma_err) = Self::complement(self.direct_width(ctx))?;
                tracing::debug!(pdgid = %self.core.pdgid(), "lifetime derived from width");
                Ok((
                    derive_from_complement(None, gamma),
                    derive_error_from_complement(None, gamma, gamma_err),
                ))
            }
            other => other,
        }
    }

    /// Mass in GeV. `None` if the best value is a limit.
    pub fn mass(&self, ctx: Resolution) -> PdgResult<Option<f64>> {
        Ok(self.direct(self.masses(true)?, ctx, "mass", "GeV")?.0)
    }

    /// Symmetric mass error in GeV; `None` for limits or asymmetric errors.
    pub fn mass_error(&self, ctx: Resolution) -> PdgResult<Option<f64>> {
        Ok(self.direct(self.masses(true)?, ctx, "mass", "GeV")?.1)
    }

    /// Width in GeV.
    pub fn width(&self, ctx: Resolution) -> PdgResult<Option<f64>> {
        Ok(self.width_pair(ctx)?.0)
    }

    pub fn width_error(&self, ctx: Resolution) -> PdgResult<Option<f64>> {
        Ok(self.width_pair(ctx)?.1)
    }

    /// Lifetime in seconds.
    pub fn lifetime(&self, ctx: Resolution) -> PdgResult<Option<f64>> {
        Ok(self.lifetime_pair(ctx)?.0)
    }

    pub fn lifetime_error(&self, ctx: Resolution) -> PdgResult<Option<f64>> {
        Ok(self.lifetime_pair(ctx)?.1)
    }

    pub fn lifetime_si(&self, ctx: Resolution) -> PdgResult<Option<Time>> {
        Ok(self.lifetime(ctx)?.map(seconds))
    }

    pub fn has_width_entry(&self) -> PdgResult<bool> {
        Ok(!self.widths(true)?.is_empty())
    }

    pub fn has_lifetime_entry(&self) -> PdgResult<bool> {
        Ok(!self.lifetimes(true)?.is_empty())
    }

    pub fn is_stable(&self) -> PdgResult<bool> {
        Ok(!(self.has_width_entry()? || self.has_lifetime_entry()?))
    }

    fn measurements_of(&self, properties: Vec<Property<'a, S>>) -> PdgResult<Vec<Measurement<'a, S>>> {
        let mut measurements = Vec::new();
        for property in properties {
            measurements.extend(property.measurements()?);
        }
        Ok(measurements)
    }

    pub fn mass_measurements(&self, require_summary_data: bool) -> PdgResult<Vec<Measurement<'a, S>>> {
        self.measurements_of(self.masses(require_summary_data)?)
    }

    pub fn width_measurements(&self, require_summary_data: bool) -> PdgResult<Vec<Measurement<'a, S>>> {
        self.measurements_of(self.widths(require_summary_data)?)
    }

    pub fn lifetime_measurements(
        &self,
        require_summary_data: bool,
    ) -> PdgResult<Vec<Measurement<'a, S>>> {
        self.measurements_of(self.lifetimes(require_summary_data)?)
    }
}

impl<'a, S: DataStore> Deref for Particle<'a, S> {
    type Target = EntityCore<'a, S>;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

impl<S: DataStore> DerefMut for Particle<'_, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.core
    }
}

impl<S: DataStore> DataFlags for Particle<'_, S> {
    fn data_flags(&self) -> PdgResult<&str> {
        self.core.data_flags()
    }
}

impl<S: DataStore> std::fmt::Debug for Particle<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Particle")
            .field("set_mcid", &self.set_mcid)
            .field("core", &self.core)
            .finish()
    }
}
