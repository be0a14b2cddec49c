//! Gearsets and their resolution ordering.

use std::collections::HashMap;

use super::{ClassJob, Gearpiece, GearsetError};
use crate::ids::{GearsetId, ItemId, NodeId};
use crate::prerequisite::PrerequisiteNode;

/// Where a gearset was imported from.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ImportSource {
    #[default]
    Manual,
    Etro,
    Xivgear,
    Ariyala,
    Teamcraft,
}

/// Import metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GearsetSource {
    pub kind: ImportSource,
    #[cfg_attr(feature = "serde", serde(default))]
    pub url: Option<String>,
    /// Monotonic import sequence number; later imports are larger.
    #[cfg_attr(feature = "serde", serde(default))]
    pub import_order: u64,
}

/// A named, prioritized collection of target gear.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gearset {
    id: GearsetId,
    name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    class_job: ClassJob,
    #[cfg_attr(feature = "serde", serde(default))]
    gearpieces: Vec<Gearpiece>,
    /// Lower values resolve first. `None` receives a synthetic value from
    /// [`effective_priorities`].
    #[cfg_attr(feature = "serde", serde(default))]
    priority: Option<i32>,
    #[cfg_attr(feature = "serde", serde(default = "default_active"))]
    is_active: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    source: GearsetSource,
}

#[cfg(feature = "serde")]
fn default_active() -> bool {
    true
}

impl Gearset {
    pub fn new(name: impl Into<String>, class_job: ClassJob) -> Self {
        Self {
            id: GearsetId::new(),
            name: name.into(),
            class_job,
            gearpieces: Vec::new(),
            priority: None,
            is_active: true,
            source: GearsetSource::default(),
        }
    }

    #[must_use]
    pub fn with_gearpiece(mut self, gearpiece: Gearpiece) -> Self {
        self.gearpieces.push(gearpiece);
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: GearsetSource) -> Self {
        self.source = source;
        self
    }

    pub fn id(&self) -> GearsetId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn class_job(&self) -> ClassJob {
        self.class_job
    }

    pub fn gearpieces(&self) -> &[Gearpiece] {
        &self.gearpieces
    }

    pub fn gearpieces_mut(&mut self) -> &mut [Gearpiece] {
        &mut self.gearpieces
    }

    pub fn push_gearpiece(&mut self, gearpiece: Gearpiece) {
        self.gearpieces.push(gearpiece);
    }

    pub fn priority(&self) -> Option<i32> {
        self.priority
    }

    pub fn set_priority(&mut self, priority: Option<i32>) {
        self.priority = priority;
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    pub fn source(&self) -> &GearsetSource {
        &self.source
    }

    pub fn gearpiece(&self, index: usize) -> Result<&Gearpiece, GearsetError> {
        self.gearpieces
            .get(index)
            .ok_or(GearsetError::UnknownGearpiece {
                gearset: self.id,
                index,
            })
    }

    pub fn gearpiece_mut(&mut self, index: usize) -> Result<&mut Gearpiece, GearsetError> {
        let gearset = self.id;
        self.gearpieces
            .get_mut(index)
            .ok_or(GearsetError::UnknownGearpiece { gearset, index })
    }

    /// Looks up a prerequisite node of one gearpiece.
    pub fn node_mut(
        &mut self,
        index: usize,
        node: NodeId,
    ) -> Result<&mut PrerequisiteNode, GearsetError> {
        let gearset = self.id;
        self.gearpiece_mut(index)?
            .prerequisites_mut()
            .and_then(|tree| tree.find_mut(node))
            .ok_or(GearsetError::UnknownNode {
                gearset,
                index,
                node,
            })
    }

    pub fn collected_count(&self) -> usize {
        self.gearpieces.iter().filter(|g| g.is_collected()).count()
    }

    pub fn completed_count(&self) -> usize {
        self.gearpieces.iter().filter(|g| g.is_complete()).count()
    }

    /// How many `item` this gearset still needs across all gearpieces.
    pub fn item_needed_count(&self, item: ItemId) -> u32 {
        self.gearpieces
            .iter()
            .map(|g| g.item_needed_count(item, true))
            .sum()
    }
}

/// Resolves every gearset's effective priority.
///
/// Explicit priorities are kept. Gearsets without one receive strictly
/// decreasing values in import order, all above the largest explicit value:
/// the oldest import gets the largest, the newest the smallest.
pub fn effective_priorities(gearsets: &[Gearset]) -> HashMap<GearsetId, i32> {
    let base = gearsets
        .iter()
        .filter_map(Gearset::priority)
        .max()
        .unwrap_or(0);

    let mut unprioritized: Vec<(usize, &Gearset)> = gearsets
        .iter()
        .enumerate()
        .filter(|(_, g)| g.priority.is_none())
        .collect();
    unprioritized.sort_by_key(|(position, g)| (g.source.import_order, *position));

    let count = i32::try_from(unprioritized.len()).unwrap_or(i32::MAX);
    let mut priorities: HashMap<GearsetId, i32> = gearsets
        .iter()
        .filter_map(|g| g.priority.map(|p| (g.id, p)))
        .collect();
    for (rank, (_, gearset)) in unprioritized.into_iter().enumerate() {
        let rank = i32::try_from(rank).unwrap_or(i32::MAX);
        priorities.insert(gearset.id, base.saturating_add(count).saturating_sub(rank));
    }
    priorities
}

/// Indices of active gearsets in resolution order: ascending effective
/// priority, ties kept in slice order.
pub fn resolution_order(gearsets: &[Gearset]) -> Vec<usize> {
    let priorities = effective_priorities(gearsets);
    let mut order: Vec<usize> = gearsets
        .iter()
        .enumerate()
        .filter(|(_, g)| g.is_active)
        .map(|(index, _)| index)
        .collect();
    order.sort_by_key(|index| priorities.get(&gearsets[*index].id).copied().unwrap_or(i32::MAX));
    order
}
