//! Branching fractions, decay products and decay items.
//!
//! Items alias other items through the item map. The alias graph is
//! walked iteratively over an arena; a cycle is reported as invalid data.

use std::collections::{HashMap, HashSet};
use std::ops::{Deref, DerefMut};

use pdg_core::{Identifier, ItemNodeId, PdgError, PdgResult};
use pdg_schema::{PdgItemMapRow, PdgItemRow, PdgParticleRow};
use pdg_store::{DataStore, Query, Session};

use crate::api::PdgApi;
use crate::best::DataFlags;
use crate::entity::EntityCore;
use crate::particle::Particle;
use crate::property::{Property, PropertyKind};

/// A branching fraction (exclusive or inclusive decay mode).
pub struct BranchingFraction<'a, S: DataStore> {
    property: Property<'a, S>,
}

impl<'a, S: DataStore> From<Property<'a, S>> for BranchingFraction<'a, S> {
    fn from(property: Property<'a, S>) -> Self {
        Self { property }
    }
}

impl<'a, S: DataStore> BranchingFraction<'a, S> {
    pub(crate) fn new(api: &'a PdgApi<S>, identifier: Identifier) -> Self {
        Property::new(EntityCore::new(api, identifier), PropertyKind::BranchingFraction).into()
    }

    pub fn property(&self) -> &Property<'a, S> {
        &self.property
    }

    pub fn into_property(self) -> Property<'a, S> {
        self.property
    }

    /// Decay mode number; may change between editions.
    pub fn mode_number(&self) -> PdgResult<Option<i64>> {
        self.property.core().mode_number()
    }

    /// True for an indented sub-decay mode (`BFX1`, `BFI2`, ...).
    pub fn is_subdecay(&self) -> PdgResult<bool> {
        let data_type = self.property.core().data_type()?.unwrap_or_default();
        Ok(data_type.len() >= 4 && (data_type.starts_with("BFX") || data_type.starts_with("BFI")))
    }

    /// Indentation level, 0 for a top-level mode.
    pub fn subdecay_level(&self) -> PdgResult<u32> {
        if !self.is_subdecay()? {
            return Ok(0);
        }
        let data_type = self.property.core().data_type()?.unwrap_or_default();
        data_type
            .chars()
            .nth(3)
            .and_then(|c| c.to_digit(10))
            .ok_or_else(|| PdgError::InvalidData {
                what: format!("sub-decay level in data type {data_type}"),
            })
    }

    /// Outgoing decay products in stored order.
    pub fn decay_products(&self) -> PdgResult<Vec<DecayProduct<'a, S>>> {
        let core = self.property.core();
        let api = core.api();
        let rows = core.decay_rows()?;
        let session = api.session()?;

        let mut products = Vec::new();
        for row in rows.iter().filter(|r| r.is_outgoing) {
            let multiplier = u32::try_from(row.multiplier)
                .ok()
                .filter(|&m| m >= 1)
                .ok_or_else(|| PdgError::InvalidData {
                    what: format!("multiplier {} for {} in {}", row.multiplier, row.name, core.pdgid()),
                })?;
            let item_row = fetch_item_row(&session, row.pdgitem_id)?;
            let subdecay = row
                .subdecay_id
                .as_deref()
                .map(|id| BranchingFraction::new(api, Identifier::new(id, core.edition())));
            products.push(DecayProduct {
                item: Item::new(api, item_row, core.edition()),
                multiplier,
                subdecay,
            });
        }
        Ok(products)
    }
}

impl<'a, S: DataStore> Deref for BranchingFraction<'a, S> {
    type Target = Property<'a, S>;

    fn deref(&self) -> &Self::Target {
        &self.property
    }
}

impl<S: DataStore> DerefMut for BranchingFraction<'_, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.property
    }
}

impl<S: DataStore> DataFlags for BranchingFraction<'_, S> {
    fn data_flags(&self) -> PdgResult<&str> {
        self.property.core().data_flags()
    }
}

impl<S: DataStore> std::fmt::Debug for BranchingFraction<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BranchingFraction").field(&self.property).finish()
    }
}

/// One product of a decay mode.
pub struct DecayProduct<'a, S: DataStore> {
    pub item: Item<'a, S>,
    pub multiplier: u32,
    /// Chained decay of this product, for multi-body modes.
    pub subdecay: Option<BranchingFraction<'a, S>>,
}

impl<S: DataStore> std::fmt::Debug for DecayProduct<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecayProduct")
            .field("item", &self.item)
            .field("multiplier", &self.multiplier)
            .field("subdecay", &self.subdecay)
            .finish()
    }
}

fn fetch_item_row<S: DataStore>(session: &Session<'_, S>, id: i64) -> PdgResult<PdgItemRow> {
    session
        .fetch_row::<PdgItemRow>(&Query::new().eq("id", id))?
        .ok_or_else(|| PdgError::InvalidData {
            what: format!("decay item {id} not found"),
        })
}

fn fetch_direct_particles<S: DataStore>(
    session: &Session<'_, S>,
    item_id: i64,
) -> PdgResult<Vec<PdgParticleRow>> {
    Ok(session.fetch_rows::<PdgParticleRow>(
        &Query::new().eq("pdgitem_id", item_id).order_by("id"),
    )?)
}

/// A named decay-product token.
pub struct Item<'a, S: DataStore> {
    api: &'a PdgApi<S>,
    row: PdgItemRow,
    edition: Option<String>,
}

impl<'a, S: DataStore> Item<'a, S> {
    pub(crate) fn new(api: &'a PdgApi<S>, row: PdgItemRow, edition: Option<&str>) -> Self {
        Self {
            api,
            row,
            edition: edition.map(str::to_string),
        }
    }

    pub fn id(&self) -> i64 {
        self.row.id
    }

    pub fn name(&self) -> &str {
        &self.row.name
    }

    pub fn name_tex(&self) -> Option<&str> {
        self.row.name_tex.as_deref()
    }

    pub fn item_type(&self) -> &str {
        &self.row.item_type
    }

    /// Items this one aliases, in stored order.
    pub fn targets(&self) -> PdgResult<Vec<Item<'a, S>>> {
        let session = self.api.session()?;
        let edges = session.fetch_rows::<PdgItemMapRow>(
            &Query::new().eq("pdgitem_id", self.row.id).order_by("sort"),
        )?;
        let mut targets = Vec::with_capacity(edges.len());
        for edge in edges {
            let row = fetch_item_row(&session, edge.target_id)?;
            targets.push(Item::new(self.api, row, self.edition.as_deref()));
        }
        Ok(targets)
    }

    /// The one particle this item stands for, directly or through a chain
    /// of single-target aliases.
    pub fn particle(&self) -> PdgResult<Particle<'a, S>> {
        let session = self.api.session()?;
        let mut graph = ItemGraph::default();
        let mut node = graph.insert(&session, self.row.clone())?;
        let mut on_path = HashSet::from([node]);
        loop {
            let direct = &graph.node(node).particles;
            match direct.len() {
                1 => {
                    let row = direct[0].clone();
                    return Ok(Particle::from_row(self.api, row, self.edition.as_deref()));
                }
                0 => {}
                _ => {
                    return Err(PdgError::ambiguous(format!(
                        "Item {} has several particles; use particles() instead",
                        graph.node(node).row.name
                    )));
                }
            }
            let targets = graph.targets(&session, node)?;
            match targets.as_slice() {
                [] => {
                    return Err(PdgError::no_data(format!(
                        "No particle for item {}",
                        self.row.name
                    )));
                }
                [next] => {
                    if !on_path.insert(*next) {
                        return Err(alias_cycle(&self.row.name));
                    }
                    node = *next;
                }
                _ => {
                    return Err(PdgError::ambiguous(format!(
                        "Item {} aliases several items; use particles() instead",
                        graph.node(node).row.name
                    )));
                }
            }
        }
    }

    /// True for a direct particle, or a single alias that has exactly one.
    pub fn has_particle(&self) -> PdgResult<bool> {
        match self.particle() {
            Ok(_) => Ok(true),
            Err(err) if err.is_no_data() || err.is_ambiguous() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Every particle reachable from this item, each once, in traversal order.
    pub fn particles(&self) -> PdgResult<Vec<Particle<'a, S>>> {
        let session = self.api.session()?;
        let mut graph = ItemGraph::default();
        let root = graph.insert(&session, self.row.clone())?;

        let mut found: Vec<PdgParticleRow> = Vec::new();
        let mut found_ids = HashSet::new();
        let mut on_path = HashSet::from([root]);
        let mut done: HashSet<ItemNodeId> = HashSet::new();
        // (node, next target index)
        let mut stack: Vec<(ItemNodeId, usize)> = vec![(root, 0)];

        while let Some(&(node, next)) = stack.last() {
            if next == 0 && !graph.node(node).particles.is_empty() {
                for row in &graph.node(node).particles {
                    if found_ids.insert(row.id) {
                        found.push(row.clone());
                    }
                }
                on_path.remove(&node);
                done.insert(node);
                stack.pop();
                continue;
            }

            let targets = graph.targets(&session, node)?;
            match targets.get(next) {
                Some(&child) => {
                    if let Some(top) = stack.last_mut() {
                        top.1 += 1;
                    }
                    if on_path.contains(&child) {
                        return Err(alias_cycle(&self.row.name));
                    }
                    if done.contains(&child) {
                        continue;
                    }
                    on_path.insert(child);
                    stack.push((child, 0));
                }
                None => {
                    on_path.remove(&node);
                    done.insert(node);
                    stack.pop();
                }
            }
        }

        tracing::debug!(item = %self.row.name, nodes = graph.len(), particles = found.len(), "item expanded");
        Ok(found
            .into_iter()
            .map(|row| Particle::from_row(self.api, row, self.edition.as_deref()))
            .collect())
    }
}

impl<S: DataStore> std::fmt::Debug for Item<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Item")
            .field("id", &self.row.id)
            .field("name", &self.row.name)
            .finish()
    }
}

fn alias_cycle(name: &str) -> PdgError {
    PdgError::InvalidData {
        what: format!("item alias cycle reachable from {name}"),
    }
}

struct ItemNode {
    row: PdgItemRow,
    particles: Vec<PdgParticleRow>,
    targets: Option<Vec<ItemNodeId>>,
}

/// Arena of items loaded during one traversal.
#[derive(Default)]
struct ItemGraph {
    nodes: Vec<ItemNode>,
    by_item: HashMap<i64, ItemNodeId>,
}

impl ItemGraph {
    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, id: ItemNodeId) -> &ItemNode {
        &self.nodes[id.index() as usize]
    }

    fn insert<S: DataStore>(
        &mut self,
        session: &Session<'_, S>,
        row: PdgItemRow,
    ) -> PdgResult<ItemNodeId> {
        if let Some(&id) = self.by_item.get(&row.id) {
            return Ok(id);
        }
        let index = u32::try_from(self.nodes.len()).map_err(|_| PdgError::InvalidData {
            what: "item graph too large".to_string(),
        })?;
        let id = ItemNodeId::from_index(index);
        let particles = fetch_direct_particles(session, row.id)?;
        self.by_item.insert(row.id, id);
        self.nodes.push(ItemNode {
            row,
            particles,
            targets: None,
        });
        Ok(id)
    }

    /// Alias targets of `id`, loading them on first use.
    fn targets<S: DataStore>(
        &mut self,
        session: &Session<'_, S>,
        id: ItemNodeId,
    ) -> PdgResult<Vec<ItemNodeId>> {
        if let Some(targets) = &self.node(id).targets {
            return Ok(targets.clone());
        }
        let item_id = self.node(id).row.id;
        let edges = session.fetch_rows::<PdgItemMapRow>(
            &Query::new().eq("pdgitem_id", item_id).order_by("sort"),
        )?;
        let mut targets = Vec::with_capacity(edges.len());
        for edge in edges {
            let target = match self.by_item.get(&edge.target_id) {
                Some(&known) => known,
                None => {
                    let row = fetch_item_row(session, edge.target_id)?;
                    self.insert(session, row)?
                }
            };
            targets.push(target);
        }
        self.nodes[id.index() as usize].targets = Some(targets.clone());
        Ok(targets)
    }
}
