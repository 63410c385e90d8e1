//! Entities: the typed view of one PDG Identifier in one edition.

use std::cell::OnceCell;

use pdg_core::{Identifier, PdgError, PdgResult, make_id};
use pdg_schema::{PdgDataRow, PdgDecayRow, PdgIdRow};
use pdg_store::{DataStore, Query};

use crate::api::PdgApi;
use crate::best::DataFlags;
use crate::cache::{EntityCache, get_or_fetch};
use crate::decay::BranchingFraction;
use crate::particle::Particle;
use crate::property::{Property, PropertyKind};
use crate::value::SummaryValue;

/// Identity, edition and row cache shared by every kind of entity.
pub struct EntityCore<'a, S: DataStore> {
    api: &'a PdgApi<S>,
    base_id: String,
    edition: Option<String>,
    pdgid: String,
    cache: EntityCache,
}

impl<'a, S: DataStore> EntityCore<'a, S> {
    pub(crate) fn new(api: &'a PdgApi<S>, identifier: Identifier) -> Self {
        Self {
            api,
            pdgid: identifier.to_string(),
            base_id: identifier.base_id().to_string(),
            edition: identifier.edition().map(str::to_string),
            cache: EntityCache::default(),
        }
    }

    /// Entity whose identifier row is already known.
    pub(crate) fn with_id_row(api: &'a PdgApi<S>, row: PdgIdRow, edition: Option<&str>) -> Self {
        Self::new(api, Identifier::new(&row.pdgid, edition)).with_cache(EntityCache {
            id_row: OnceCell::from(row),
            ..EntityCache::default()
        })
    }

    /// Start from pre-filled row groups.
    pub(crate) fn with_cache(mut self, cache: EntityCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn api(&self) -> &'a PdgApi<S> {
        self.api
    }

    pub fn base_id(&self) -> &str {
        &self.base_id
    }

    pub fn edition(&self) -> Option<&str> {
        self.edition.as_deref()
    }

    /// Canonical identifier string, with the edition when there is one.
    pub fn pdgid(&self) -> &str {
        &self.pdgid
    }

    pub fn identifier(&self) -> Identifier {
        Identifier::new(&self.base_id, self.edition())
    }

    pub fn cache(&self) -> &EntityCache {
        &self.cache
    }

    /// Switch edition. Every cached row group is discarded.
    pub fn set_edition(&mut self, edition: Option<&str>) {
        tracing::debug!(pdgid = %self.pdgid, ?edition, "edition change");
        self.edition = edition.map(str::to_string);
        self.pdgid = make_id(&self.base_id, edition);
        self.cache = EntityCache::default();
    }

    pub(crate) fn id_row(&self) -> PdgResult<&PdgIdRow> {
        get_or_fetch(&self.cache.id_row, "pdgid", &self.pdgid, || {
            let session = self.api.session()?;
            session
                .fetch_row::<PdgIdRow>(&Query::new().eq("pdgid", self.base_id.as_str()))?
                .ok_or_else(|| PdgError::InvalidIdentifier {
                    pdgid: self.pdgid.clone(),
                })
        })
    }

    pub fn description(&self) -> PdgResult<&str> {
        Ok(&self.id_row()?.description)
    }

    pub fn data_type(&self) -> PdgResult<Option<&str>> {
        Ok(self.id_row()?.data_type.as_deref())
    }

    pub fn data_flags(&self) -> PdgResult<&str> {
        Ok(&self.id_row()?.flags)
    }

    pub fn has_flag(&self, flag: char) -> PdgResult<bool> {
        Ok(self.data_flags()?.contains(flag))
    }

    pub(crate) fn mode_number(&self) -> PdgResult<Option<i64>> {
        Ok(self.id_row()?.mode_number)
    }

    /// Parent identifier, optionally stamped with this entity's edition.
    pub fn get_parent_identifier(&self, include_edition: bool) -> PdgResult<Option<String>> {
        let parent = self.id_row()?.parent_pdgid.as_deref();
        Ok(parent.map(|p| {
            if include_edition {
                make_id(p, self.edition())
            } else {
                make_id(p, None)
            }
        }))
    }

    /// All summary values of this identifier in the active edition, in stored order.
    pub(crate) fn summary_rows(&self) -> PdgResult<&[SummaryValue]> {
        let values = get_or_fetch(&self.cache.summary, "summary", &self.pdgid, || {
            let description = self.description()?.to_string();
            let Some(edition) = self.edition() else {
                return Ok(Vec::new());
            };
            let session = self.api.session()?;
            let rows = session.fetch_rows::<PdgDataRow>(
                &Query::new()
                    .eq("pdgid", self.base_id.as_str())
                    .eq("edition", edition)
                    .order_by("sort"),
            )?;
            Ok(rows
                .into_iter()
                .map(|row| SummaryValue::from_row(row, &description))
                .collect())
        })?;
        Ok(values)
    }

    /// Stored product rows of a decay mode, in stored order.
    pub(crate) fn decay_rows(&self) -> PdgResult<&[PdgDecayRow]> {
        let rows = get_or_fetch(&self.cache.decay, "decay", &self.pdgid, || {
            let session = self.api.session()?;
            Ok(session.fetch_rows::<PdgDecayRow>(
                &Query::new()
                    .eq("pdgid", self.base_id.as_str())
                    .order_by("sort"),
            )?)
        })?;
        Ok(rows)
    }
}

impl<S: DataStore> DataFlags for EntityCore<'_, S> {
    fn data_flags(&self) -> PdgResult<&str> {
        EntityCore::data_flags(self)
    }
}

impl<S: DataStore> std::fmt::Debug for EntityCore<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityCore")
            .field("pdgid", &self.pdgid)
            .field("cache", &self.cache)
            .finish()
    }
}

/// Branching fraction data type keys, including sub-decay levels.
pub fn is_branching_fraction_type(data_type: &str) -> bool {
    matches!(
        data_type,
        "BFX" | "BFX1" | "BFX2" | "BFX3" | "BFX4" | "BFX5" | "BFI" | "BFI1" | "BFI2" | "BFI3"
            | "BFI4" | "BFI5"
    )
}

/// An entity of the kind its data type calls for.
pub enum Entity<'a, S: DataStore> {
    Particle(Particle<'a, S>),
    Property(Property<'a, S>),
    BranchingFraction(BranchingFraction<'a, S>),
}

impl<'a, S: DataStore> Entity<'a, S> {
    pub(crate) fn from_id_row(api: &'a PdgApi<S>, row: PdgIdRow, edition: Option<&str>) -> Self {
        let data_type = row.data_type.clone();
        let core = EntityCore::with_id_row(api, row, edition);
        match data_type.as_deref() {
            Some("PART") => Entity::Particle(Particle::from_core(core, None)),
            Some(t) if is_branching_fraction_type(t) => Entity::BranchingFraction(
                BranchingFraction::from(Property::new(core, PropertyKind::BranchingFraction)),
            ),
            other => Entity::Property(Property::new(core, PropertyKind::from_data_type(other))),
        }
    }

    pub fn core(&self) -> &EntityCore<'a, S> {
        match self {
            Entity::Particle(p) => p.core(),
            Entity::Property(p) => p.core(),
            Entity::BranchingFraction(bf) => bf.core(),
        }
    }

    pub fn core_mut(&mut self) -> &mut EntityCore<'a, S> {
        match self {
            Entity::Particle(p) => p.core_mut(),
            Entity::Property(p) => p.core_mut(),
            Entity::BranchingFraction(bf) => bf.core_mut(),
        }
    }

    pub fn pdgid(&self) -> &str {
        self.core().pdgid()
    }

    pub fn description(&self) -> PdgResult<&str> {
        self.core().description()
    }

    pub fn data_type(&self) -> PdgResult<Option<&str>> {
        self.core().data_type()
    }

    pub fn set_edition(&mut self, edition: Option<&str>) {
        self.core_mut().set_edition(edition);
    }

    pub fn as_particle(&self) -> Option<&Particle<'a, S>> {
        match self {
            Entity::Particle(p) => Some(p),
            _ => None,
        }
    }

    pub fn into_particle(self) -> Option<Particle<'a, S>> {
        match self {
            Entity::Particle(p) => Some(p),
            _ => None,
        }
    }

    /// The property view; branching fractions are properties too.
    pub fn as_property(&self) -> Option<&Property<'a, S>> {
        match self {
            Entity::Property(p) => Some(p),
            Entity::BranchingFraction(bf) => Some(bf),
            Entity::Particle(_) => None,
        }
    }

    pub fn into_property(self) -> Option<Property<'a, S>> {
        match self {
            Entity::Property(p) => Some(p),
            Entity::BranchingFraction(bf) => Some(bf.into_property()),
            Entity::Particle(_) => None,
        }
    }

    pub fn as_branching_fraction(&self) -> Option<&BranchingFraction<'a, S>> {
        match self {
            Entity::BranchingFraction(bf) => Some(bf),
            _ => None,
        }
    }

    pub fn into_branching_fraction(self) -> Option<BranchingFraction<'a, S>> {
        match self {
            Entity::BranchingFraction(bf) => Some(bf),
            _ => None,
        }
    }
}

impl<S: DataStore> std::fmt::Debug for Entity<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Entity::Particle(_) => "Particle",
            Entity::Property(_) => "Property",
            Entity::BranchingFraction(_) => "BranchingFraction",
        };
        f.debug_tuple(kind).field(self.core()).finish()
    }
}

impl<S: DataStore> DataFlags for Entity<'_, S> {
    fn data_flags(&self) -> PdgResult<&str> {
        self.core().data_flags()
    }
}
