//! Static game data the engine consults but does not own.
//!
//! The tree builder is authoritative for the *shape* of prerequisite trees;
//! the engine is authoritative for their *state*. [`regenerate_trees`] is the
//! seam where the two meet.

use crate::gear::{Gearpiece, GearpieceSlot, Gearset};
use crate::ids::ItemId;
use crate::materia::{Materia, MateriaGroup, StatKind, overmeld_probability};
use crate::prerequisite::PrerequisiteNode;

/// Materia slot layout of an equippable item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotCounts {
    /// Guaranteed slots.
    pub normal: u8,
    /// Whether overmelding past the guaranteed slots is allowed.
    pub advanced_melding: bool,
}

/// Static description of a materia item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MateriaInfo {
    pub item_id: ItemId,
    pub stat: StatKind,
    pub quantity: u16,
    pub grade: u8,
}

impl MateriaInfo {
    pub fn to_materia(self) -> Materia {
        Materia::new(self.item_id, self.stat, self.quantity, self.grade)
    }
}

/// Read-only lookup into static item data.
pub trait ItemOracle: Send + Sync {
    fn item_name(&self, item: ItemId) -> Option<String>;

    fn gearpiece_slot(&self, item: ItemId) -> Option<GearpieceSlot>;

    /// Builds a fresh prerequisite tree for `item`, or `None` when the item
    /// has no known acquisition path.
    fn build_prerequisite_tree(&self, item: ItemId) -> Option<PrerequisiteNode>;

    fn materia_slot_counts(&self, item: ItemId) -> SlotCounts;

    fn materia_info(&self, item: ItemId) -> Option<MateriaInfo>;

    /// Attach chance of a `grade` materia in overmeld slot `offset`.
    /// Defaults to the built-in rate table.
    fn overmeld_probability(&self, grade: u8, offset: usize, is_high_quality: bool) -> f32 {
        overmeld_probability(grade, offset, is_high_quality)
    }

    fn to_hq_id(&self, item: ItemId) -> ItemId {
        item.to_hq()
    }
}

/// Builds a gearpiece for `item` from static data.
///
/// `materia` lists the wanted materia in slot order; unknown materia ids are
/// skipped. Returns `None` when the item is not equippable.
pub fn build_gearpiece(
    oracle: &dyn ItemOracle,
    item: ItemId,
    materia: &[ItemId],
) -> Option<Gearpiece> {
    let slot = oracle.gearpiece_slot(item)?;
    let name = oracle
        .item_name(item)
        .unwrap_or_else(|| format!("Item {}", item.to_nq().0));
    let counts = oracle.materia_slot_counts(item);

    let max_slots = if counts.advanced_melding {
        crate::SolverConfig::MAX_MATERIA_SLOTS
    } else {
        usize::from(counts.normal)
    };
    let slots: Vec<Materia> = materia
        .iter()
        .filter_map(|id| oracle.materia_info(*id))
        .take(max_slots)
        .map(MateriaInfo::to_materia)
        .collect();

    let overmeld_rates = slots
        .iter()
        .skip(usize::from(counts.normal))
        .enumerate()
        .map(|(offset, materia)| {
            oracle.overmeld_probability(materia.grade, offset, item.is_high_quality())
        })
        .collect();
    let materia = MateriaGroup::new(slots, counts.normal, item.is_high_quality())
        .with_overmeld_rates(overmeld_rates);

    let mut gearpiece = Gearpiece::new(item, name, slot).with_materia(materia);
    if let Some(tree) = oracle.build_prerequisite_tree(item) {
        gearpiece = gearpiece.with_prerequisites(tree);
    }
    Some(gearpiece)
}

/// Rebuilds every gearpiece's prerequisite tree from current static data,
/// keeping collected state where the new shape still matches.
///
/// Returns the number of gearpieces whose tree was replaced.
pub fn regenerate_trees(gearsets: &mut [Gearset], oracle: &dyn ItemOracle) -> usize {
    let mut replaced = 0;
    for gearset in gearsets.iter_mut() {
        for gearpiece in gearset.gearpieces_mut() {
            let Some(tree) = oracle.build_prerequisite_tree(gearpiece.item_id()) else {
                continue;
            };
            let paired = gearpiece.regenerate_prerequisites(tree);
            tracing::debug!(
                target: "gear::oracle",
                item = %gearpiece.item_id(),
                paired,
                "regenerated prerequisite tree"
            );
            replaced += 1;
        }
    }
    replaced
}
