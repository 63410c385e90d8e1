//! Top-level API object.

use pdg_core::{Identifier, PdgError, PdgResult};
use pdg_schema::{
    InfoRow, PdgDataRow, PdgDocRow, PdgIdRow, PdgItemRow, PdgParticleRow, check_all_bindings,
    check_schema_version,
};
use pdg_store::{Aggregate, DataStore, Query, Session};

use crate::config::{ApiConfig, Resolution};
use crate::decay::Item;
use crate::entity::{Entity, EntityCore};
use crate::particle::Particle;

/// Entry point: resolves PDG Identifiers against a data store.
pub struct PdgApi<S: DataStore> {
    store: S,
    config: ApiConfig,
    default_edition: Option<String>,
}

impl<S: DataStore> PdgApi<S> {
    /// Bind to `store`. Fails fast if a table or column is missing or the
    /// schema version is too old.
    pub fn new(store: S, config: ApiConfig) -> PdgResult<Self> {
        check_all_bindings(|table| store.declared_columns(table))?;

        let mut api = Self {
            store,
            config,
            default_edition: None,
        };

        let found = api.info("schema_version")?;
        if let Err(err) = check_schema_version(found.as_deref(), api.config.min_schema_version) {
            tracing::warn!(?found, required = api.config.min_schema_version, "schema version check failed");
            return Err(err.into());
        }

        api.default_edition = match api.config.default_edition.clone() {
            Some(edition) => Some(edition),
            None => api.info("edition")?,
        };
        tracing::info!(edition = ?api.default_edition, strict = api.config.strict, "PDG API ready");
        Ok(api)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Default resolution context from the configuration.
    pub fn context(&self) -> Resolution {
        self.config.resolution()
    }

    pub fn session(&self) -> PdgResult<Session<'_, S>> {
        Ok(self.store.session()?)
    }

    /// Metadata value for `key` (`edition`, `citation`, ...).
    pub fn info(&self, key: &str) -> PdgResult<Option<String>> {
        let session = self.session()?;
        let row = session.fetch_row::<InfoRow>(&Query::new().eq("name", key))?;
        Ok(row.map(|r| r.value))
    }

    pub fn info_keys(&self) -> PdgResult<Vec<String>> {
        let session = self.session()?;
        let rows = session.fetch_rows::<InfoRow>(&Query::new())?;
        Ok(rows.into_iter().map(|r| r.name).collect())
    }

    /// Editions with data, newest first.
    pub fn editions(&self) -> PdgResult<Vec<String>> {
        let session = self.session()?;
        Ok(session.distinct_text::<PdgDataRow>("edition", &Query::new().order_by_desc("edition"))?)
    }

    pub fn default_edition(&self) -> Option<&str> {
        self.default_edition.as_deref()
    }

    /// Edition precedence: the identifier's own, then `edition`, then the default.
    fn identifier(&self, raw: &str, edition: Option<&str>) -> PdgResult<Identifier> {
        Ok(Identifier::parse(raw)?
            .or_edition(edition)
            .or_edition(self.default_edition()))
    }

    pub(crate) fn fetch_id_row(&self, base_id: &str) -> PdgResult<Option<PdgIdRow>> {
        let session = self.session()?;
        Ok(session.fetch_row::<PdgIdRow>(&Query::new().eq("pdgid", base_id))?)
    }

    pub(crate) fn id_row(&self, base_id: &str) -> PdgResult<PdgIdRow> {
        self.fetch_id_row(base_id)?
            .ok_or_else(|| PdgError::InvalidIdentifier {
                pdgid: base_id.to_string(),
            })
    }

    /// Typed entity for a PDG Identifier, `BASEID` or `BASEID/EDITION`.
    pub fn resolve(&self, pdgid: &str, edition: Option<&str>) -> PdgResult<Entity<'_, S>> {
        let identifier = self.identifier(pdgid, edition)?;
        let row = self
            .fetch_id_row(identifier.base_id())?
            .ok_or_else(|| PdgError::InvalidIdentifier {
                pdgid: identifier.to_string(),
            })?;
        tracing::debug!(pdgid = %identifier, data_type = ?row.data_type, "resolved");
        Ok(Entity::from_id_row(self, row, identifier.edition()))
    }

    /// Particle entity for a PDG Identifier, with an optional MC id picking the charge state.
    pub fn particle(
        &self,
        pdgid: &str,
        edition: Option<&str>,
        mcid: Option<i64>,
    ) -> PdgResult<Particle<'_, S>> {
        let identifier = self.identifier(pdgid, edition)?;
        let row = self.id_row(identifier.base_id())?;
        if row.data_type.as_deref() != Some("PART") {
            return Err(PdgError::InvalidArgument {
                what: format!("{identifier} is not a particle"),
            });
        }
        let edition = identifier.edition().map(str::to_string);
        let core = EntityCore::with_id_row(self, row, edition.as_deref());
        Ok(Particle::from_core(core, mcid))
    }

    /// All identifiers, or those of one data type, in stored order.
    pub fn get_all(
        &self,
        data_type_key: Option<&str>,
        edition: Option<&str>,
    ) -> PdgResult<Vec<Entity<'_, S>>> {
        let mut query = Query::new().order_by("sort");
        if let Some(key) = data_type_key {
            query = query.eq("data_type", key);
        }
        let rows = {
            let session = self.session()?;
            session.fetch_rows::<PdgIdRow>(&query)?
        };
        let edition = edition.or(self.default_edition());
        Ok(rows
            .into_iter()
            .map(|row| Entity::from_id_row(self, row, edition))
            .collect())
    }

    /// Every particle identifier that has particle rows.
    pub fn particles(&self, edition: Option<&str>) -> PdgResult<Vec<Particle<'_, S>>> {
        let session = self.session()?;
        let rows = session.fetch_rows::<PdgIdRow>(
            &Query::new().eq("data_type", "PART").order_by("sort"),
        )?;
        let edition = edition.or(self.default_edition());
        let mut particles = Vec::new();
        for row in rows {
            let count = session.fetch_scalar::<PdgParticleRow>(
                Aggregate::Count,
                &Query::new().eq("pdgid", row.pdgid.as_str()),
            )?;
            if count > 0 {
                let core = EntityCore::with_id_row(self, row, edition);
                particles.push(Particle::from_core(core, None));
            }
        }
        Ok(particles)
    }

    /// One particle per particle row of `base_id`, each already matched.
    pub(crate) fn particle_list(
        &self,
        base_id: &str,
        edition: Option<&str>,
    ) -> PdgResult<Vec<Particle<'_, S>>> {
        let session = self.session()?;
        let rows = session.fetch_rows::<PdgParticleRow>(
            &Query::new()
                .eq("pdgid", base_id)
                .eq("entry_type", "P")
                .order_by("id"),
        )?;
        Ok(rows
            .into_iter()
            .map(|row| Particle::from_row(self, row, edition))
            .collect())
    }

    /// Decay-product item by name, e.g. `pi+-`.
    pub fn item_by_name(
        &self,
        name: &str,
        case_sensitive: bool,
        edition: Option<&str>,
    ) -> PdgResult<Item<'_, S>> {
        let mut matches = {
            let session = self.session()?;
            if case_sensitive {
                session.fetch_rows::<PdgItemRow>(&Query::new().eq("name", name))?
            } else {
                let wanted = name.to_lowercase();
                session
                    .fetch_rows::<PdgItemRow>(&Query::new().order_by("id"))?
                    .into_iter()
                    .filter(|row| row.name.to_lowercase() == wanted)
                    .collect()
            }
        };
        let edition = edition.or(self.default_edition());
        match matches.len() {
            0 => Err(PdgError::no_data(format!("No particle found with name {name}"))),
            1 => Ok(Item::new(self, matches.remove(0), edition)),
            _ => Err(PdgError::ambiguous(format!("More than one item named {name}"))),
        }
    }

    /// Particle by item name, e.g. `pi+`.
    pub fn particle_by_name(
        &self,
        name: &str,
        case_sensitive: bool,
        edition: Option<&str>,
    ) -> PdgResult<Particle<'_, S>> {
        self.item_by_name(name, case_sensitive, edition)?.particle()
    }

    /// All particles for a possibly generic name.
    pub fn particles_by_name(
        &self,
        name: &str,
        case_sensitive: bool,
        edition: Option<&str>,
    ) -> PdgResult<Vec<Particle<'_, S>>> {
        self.item_by_name(name, case_sensitive, edition)?.particles()
    }

    pub fn particle_by_mcid(&self, mcid: i64, edition: Option<&str>) -> PdgResult<Particle<'_, S>> {
        let pdgids = {
            let session = self.session()?;
            session.distinct_text::<PdgParticleRow>("pdgid", &Query::new().eq("mcid", mcid))?
        };
        match pdgids.as_slice() {
            [] => Err(PdgError::no_data(format!("No particle found with MC ID {mcid}"))),
            [pdgid] => self.particle(pdgid, edition, Some(mcid)),
            _ => Err(PdgError::ambiguous(format!(
                "MC number {mcid} matches {} particles with PDG Identifiers {pdgids:?}",
                pdgids.len()
            ))),
        }
    }

    /// Summary values for `base_id` in `edition`, optionally only those
    /// in (or out of) the Summary Table.
    pub fn count_data_entries(
        &self,
        base_id: &str,
        edition: Option<&str>,
        in_summary_table: Option<bool>,
    ) -> PdgResult<i64> {
        let Some(edition) = edition else {
            return Ok(0);
        };
        let mut query = Query::new()
            .eq("pdgid", base_id.to_uppercase())
            .eq("edition", edition);
        if let Some(in_table) = in_summary_table {
            query = query.eq("in_summary_table", in_table);
        }
        let session = self.session()?;
        Ok(session.fetch_scalar::<PdgDataRow>(Aggregate::Count, &query)?)
    }

    /// Meaning of a key value or flag used in `table.column`.
    pub fn doc_key_value(&self, table: &str, column: &str, key: &str) -> PdgResult<PdgDocRow> {
        let session = self.session()?;
        session
            .fetch_row::<PdgDocRow>(
                &Query::new()
                    .eq("table_name", table)
                    .eq("column_name", column)
                    .eq("value", key),
            )?
            .ok_or_else(|| {
                PdgError::no_data(format!(
                    "No documentation for value {key} in table {table}.{column}"
                ))
            })
    }

    fn doc_keys(&self, table: &str, column: &str) -> PdgResult<Vec<PdgDocRow>> {
        let session = self.session()?;
        let mut rows = session.fetch_rows::<PdgDocRow>(
            &Query::new()
                .eq("table_name", table)
                .eq("column_name", column)
                .order_by("value"),
        )?;
        // Stable: ties on indicator keep value order.
        rows.sort_by(|a, b| a.indicator.cmp(&b.indicator));
        Ok(rows)
    }

    /// Data type keys usable with `Particle::properties`.
    pub fn doc_data_type_keys(&self) -> PdgResult<Vec<PdgDocRow>> {
        self.doc_keys("PDGID", "DATA_TYPE")
    }

    /// Summary value type keys and their indicators.
    pub fn doc_value_type_keys(&self) -> PdgResult<Vec<PdgDocRow>> {
        self.doc_keys("PDGDATA", "VALUE_TYPE")
    }
}

impl<S: DataStore> std::fmt::Debug for PdgApi<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdgApi")
            .field("config", &self.config)
            .field("default_edition", &self.default_edition)
            .finish()
    }
}
