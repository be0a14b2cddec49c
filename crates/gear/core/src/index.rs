//! Per-character requirement index.
//!
//! Maps every item id to each place an active gearset asks for it. The
//! index is a derived snapshot: it is rebuilt after a resolution pass, never
//! patched incrementally.

use std::collections::BTreeMap;

use crate::gear::{Gearset, resolution_order};
use crate::ids::{GearsetId, ItemId, NodeId};
use crate::prerequisite::PrerequisiteNode;

/// What kind of slot a requirement fills.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum RequirementKind {
    Gearpiece,
    Materia,
    Prerequisite,
}

/// One place an item is needed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Requirement {
    pub gearset: GearsetId,
    pub gearpiece_index: usize,
    pub gearpiece_item: ItemId,
    pub kind: RequirementKind,
    /// Prerequisite node backing the requirement, for `Prerequisite` entries.
    pub node: Option<NodeId>,
    pub is_collected: bool,
    pub is_obtainable: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequirementIndex {
    entries: BTreeMap<ItemId, Vec<Requirement>>,
}

impl RequirementIndex {
    /// Indexes every active gearset, visiting them in resolution order so
    /// each item's requirement list is ordered by precedence.
    pub fn build(gearsets: &[Gearset]) -> Self {
        let mut index = Self::default();
        for position in resolution_order(gearsets) {
            index.add_gearset(&gearsets[position]);
        }
        index
    }

    fn add_gearset(&mut self, gearset: &Gearset) {
        for (gearpiece_index, gearpiece) in gearset.gearpieces().iter().enumerate() {
            let base = Requirement {
                gearset: gearset.id(),
                gearpiece_index,
                gearpiece_item: gearpiece.item_id(),
                kind: RequirementKind::Gearpiece,
                node: None,
                is_collected: gearpiece.is_collected(),
                is_obtainable: gearpiece.is_obtainable(),
            };
            self.push(gearpiece.item_id(), base.clone());

            for materia in gearpiece.materia().slots() {
                self.push(
                    materia.item_id(),
                    Requirement {
                        kind: RequirementKind::Materia,
                        is_collected: materia.is_melded(),
                        is_obtainable: materia.is_melded(),
                        ..base.clone()
                    },
                );
            }

            let Some(tree) = gearpiece.prerequisites() else {
                continue;
            };
            let root = tree.id();
            let mut atoms = Vec::new();
            tree.walk(&mut |node: &PrerequisiteNode| {
                let is_root_piece = node.id() == root && node.item_id() == gearpiece.item_id();
                if node.as_atom().is_some() && !is_root_piece {
                    atoms.push((
                        node.item_id(),
                        node.id(),
                        node.is_collected(),
                        node.is_obtainable(),
                    ));
                }
            });
            for (item, node, is_collected, is_obtainable) in atoms {
                self.push(
                    item,
                    Requirement {
                        kind: RequirementKind::Prerequisite,
                        node: Some(node),
                        is_collected,
                        is_obtainable,
                        ..base.clone()
                    },
                );
            }
        }
    }

    fn push(&mut self, item: ItemId, requirement: Requirement) {
        self.entries.entry(item).or_default().push(requirement);
    }

    pub fn requirements(&self, item: ItemId) -> &[Requirement] {
        self.entries.get(&item).map_or(&[], Vec::as_slice)
    }

    /// True when some active gearset still lacks `item`.
    pub fn is_needed(&self, item: ItemId) -> bool {
        self.requirements(item).iter().any(|r| !r.is_collected)
    }

    /// Number of uncollected requirements naming `item`.
    pub fn outstanding_count(&self, item: ItemId) -> usize {
        self.requirements(item)
            .iter()
            .filter(|r| !r.is_collected)
            .count()
    }

    /// Uncollected requirements across every item.
    pub fn outstanding_total(&self) -> usize {
        self.entries
            .values()
            .flatten()
            .filter(|r| !r.is_collected)
            .count()
    }

    pub fn items(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &[Requirement])> + '_ {
        self.entries.iter().map(|(item, reqs)| (*item, reqs.as_slice()))
    }

    /// Number of distinct items indexed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gear::{ClassJob, Gearpiece, GearpieceSlot};
    use crate::materia::{Materia, MateriaGroup, StatKind};
    use crate::prerequisite::SourceType;

    const RING: ItemId = ItemId(500);
    const TOKEN: ItemId = ItemId(28);
    const CRIT: ItemId = ItemId(41_757);

    fn ring_set(priority: i32) -> Gearset {
        let tree = PrerequisiteNode::atom(RING, "Ring", SourceType::Shop).with_children(vec![
            PrerequisiteNode::atom(TOKEN, "Token", SourceType::Loot),
            PrerequisiteNode::atom(TOKEN, "Token", SourceType::Loot),
        ]);
        let materia = MateriaGroup::new(
            vec![Materia::new(CRIT, StatKind::CriticalHit, 54, 11)],
            1,
            false,
        );
        Gearset::new("set", ClassJob::Drg)
            .with_priority(priority)
            .with_gearpiece(
                Gearpiece::new(RING, "Ring", GearpieceSlot::Ring)
                    .with_prerequisites(tree)
                    .with_materia(materia),
            )
    }

    #[test]
    fn indexes_every_requirement_kind() {
        let sets = vec![ring_set(1)];
        let index = RequirementIndex::build(&sets);

        assert_eq!(index.len(), 3);
        assert_eq!(index.requirements(RING).len(), 1);
        assert_eq!(index.requirements(RING)[0].kind, RequirementKind::Gearpiece);
        assert_eq!(index.requirements(CRIT)[0].kind, RequirementKind::Materia);
        assert_eq!(index.requirements(TOKEN).len(), 2);
        assert!(index.requirements(TOKEN).iter().all(|r| r.node.is_some()));
        assert!(index.is_needed(TOKEN));
        assert!(!index.is_needed(ItemId(1)));
    }

    #[test]
    fn entries_follow_priority_and_skip_inactive() {
        let mut sets = vec![ring_set(3), ring_set(1), ring_set(2)];
        sets[2].set_active(false);
        let index = RequirementIndex::build(&sets);

        let owners: Vec<GearsetId> = index.requirements(RING).iter().map(|r| r.gearset).collect();
        assert_eq!(owners, vec![sets[1].id(), sets[0].id()]);
    }

    #[test]
    fn collected_state_is_reflected() {
        let mut sets = vec![ring_set(1)];
        sets[0].gearpieces_mut()[0].set_collected(true, false);
        let index = RequirementIndex::build(&sets);

        assert!(!index.is_needed(RING));
        assert!(!index.is_needed(TOKEN));
        assert_eq!(index.outstanding_count(CRIT), 1);
        assert_eq!(index.outstanding_total(), 1);
    }
}
