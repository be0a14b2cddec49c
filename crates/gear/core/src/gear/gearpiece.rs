//! A single target item within a gearset.

use std::collections::BTreeMap;

use super::GearpieceSlot;
use crate::ids::ItemId;
use crate::materia::MateriaGroup;
use crate::prerequisite::{CollectionState, NeededItem, PrerequisiteNode};

/// One equipment slot's target item.
///
/// # Collection
///
/// With a prerequisite tree the tree root drives collection state; the
/// gearpiece's own flags are only used when no tree exists. Either way the
/// manual-lock rules of [`PrerequisiteNode::set_collected`] apply.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gearpiece {
    item_id: ItemId,
    item_name: String,
    slot: GearpieceSlot,
    #[cfg_attr(feature = "serde", serde(default))]
    prerequisites: Option<PrerequisiteNode>,
    #[cfg_attr(feature = "serde", serde(default))]
    materia: MateriaGroup,
    #[cfg_attr(feature = "serde", serde(default))]
    is_collected: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    is_manually_collected: bool,
}

impl Gearpiece {
    pub fn new(item_id: ItemId, item_name: impl Into<String>, slot: GearpieceSlot) -> Self {
        Self {
            item_id,
            item_name: item_name.into(),
            slot,
            prerequisites: None,
            materia: MateriaGroup::empty(),
            is_collected: false,
            is_manually_collected: false,
        }
    }

    #[must_use]
    pub fn with_materia(mut self, materia: MateriaGroup) -> Self {
        self.materia = materia;
        self
    }

    #[must_use]
    pub fn with_prerequisites(mut self, tree: PrerequisiteNode) -> Self {
        self.prerequisites = Some(tree);
        self
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    pub fn slot(&self) -> GearpieceSlot {
        self.slot
    }

    pub fn prerequisites(&self) -> Option<&PrerequisiteNode> {
        self.prerequisites.as_ref()
    }

    pub fn prerequisites_mut(&mut self) -> Option<&mut PrerequisiteNode> {
        self.prerequisites.as_mut()
    }

    pub fn materia(&self) -> &MateriaGroup {
        &self.materia
    }

    pub fn materia_mut(&mut self) -> &mut MateriaGroup {
        &mut self.materia
    }

    pub fn is_collected(&self) -> bool {
        match &self.prerequisites {
            Some(tree) => tree.is_collected(),
            None => self.is_collected,
        }
    }

    pub fn is_manually_collected(&self) -> bool {
        match &self.prerequisites {
            Some(tree) => tree.is_manually_collected(),
            None => self.is_manually_collected,
        }
    }

    pub fn state(&self) -> CollectionState {
        match (self.is_collected(), self.is_manually_collected()) {
            (true, true) => CollectionState::ManuallyCollected,
            (true, false) => CollectionState::AutoCollected,
            (false, _) => CollectionState::Uncollected,
        }
    }

    /// Collected and every materia slot melded.
    pub fn is_complete(&self) -> bool {
        self.is_collected() && self.materia.all_melded()
    }

    pub fn is_obtainable(&self) -> bool {
        match &self.prerequisites {
            Some(tree) => tree.is_obtainable(),
            None => self.is_collected,
        }
    }

    pub fn set_collected(&mut self, collected: bool, manual: bool) {
        match &mut self.prerequisites {
            Some(tree) => tree.set_collected(collected, manual),
            None => {
                if !collected && !manual && self.is_manually_collected {
                    return;
                }
                self.is_manually_collected = collected && (manual || self.is_manually_collected);
                self.is_collected = collected;
            }
        }
    }

    /// How many `target` items this gearpiece still asks for, including the
    /// gearpiece item itself.
    pub fn item_needed_count(&self, target: ItemId, ignore_collected: bool) -> u32 {
        match &self.prerequisites {
            Some(tree) => tree.item_needed_count(target, ignore_collected),
            None => {
                let satisfied = ignore_collected && self.is_collected;
                u32::from(self.item_id == target && !satisfied)
            }
        }
    }

    pub fn min_remaining_items(&self, candidate: Option<ItemId>) -> u32 {
        match &self.prerequisites {
            Some(tree) => tree.min_remaining_items(candidate),
            None => u32::from(!self.is_collected && candidate != Some(self.item_id)),
        }
    }

    pub fn needed_item_ids(&self) -> BTreeMap<ItemId, NeededItem> {
        match &self.prerequisites {
            Some(tree) => tree.needed_item_ids(),
            None if !self.is_collected => BTreeMap::from([(
                self.item_id,
                NeededItem {
                    min_depth: 0,
                    count: 1,
                },
            )]),
            None => BTreeMap::new(),
        }
    }

    /// Installs a regenerated tree, carrying state over from the current one.
    ///
    /// Returns the number of nodes that kept their previous identity.
    pub fn regenerate_prerequisites(&mut self, mut tree: PrerequisiteNode) -> usize {
        let paired = match &self.prerequisites {
            Some(previous) => tree.merge_state_from(previous),
            None => {
                if self.is_collected {
                    tree.set_collected(true, self.is_manually_collected);
                }
                0
            }
        };
        self.prerequisites = Some(tree);
        paired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materia::{Materia, StatKind};
    use crate::prerequisite::SourceType;

    const WEAPON: ItemId = ItemId(42_000);
    const BASE: ItemId = ItemId(41_000);
    const TOKEN: ItemId = ItemId(43_000);

    fn upgrade_tree() -> PrerequisiteNode {
        PrerequisiteNode::atom(WEAPON, "Weapon", SourceType::Upgrade).with_children(vec![
            PrerequisiteNode::atom(BASE, "Base", SourceType::Shop),
            PrerequisiteNode::atom(TOKEN, "Token", SourceType::Loot),
        ])
    }

    #[test]
    fn treeless_piece_uses_own_flags() {
        let mut piece = Gearpiece::new(WEAPON, "Weapon", GearpieceSlot::MainHand);
        assert_eq!(piece.min_remaining_items(None), 1);
        assert_eq!(piece.item_needed_count(WEAPON, true), 1);

        piece.set_collected(true, true);
        piece.set_collected(false, false);
        assert_eq!(piece.state(), CollectionState::ManuallyCollected);
        assert_eq!(piece.item_needed_count(WEAPON, true), 0);
        assert!(piece.needed_item_ids().is_empty());

        piece.set_collected(false, true);
        assert!(!piece.is_collected());
    }

    #[test]
    fn tree_drives_collection() {
        let mut piece = Gearpiece::new(WEAPON, "Weapon", GearpieceSlot::MainHand)
            .with_prerequisites(upgrade_tree());
        assert_eq!(piece.min_remaining_items(None), 2);
        assert_eq!(piece.min_remaining_items(Some(BASE)), 1);

        piece.set_collected(true, false);
        assert!(piece.is_collected());
        assert!(piece.prerequisites().unwrap().atoms().iter().all(|a| a.is_collected()));
    }

    #[test]
    fn completion_requires_melds() {
        let materia = MateriaGroup::new(
            vec![Materia::new(ItemId(41_757), StatKind::CriticalHit, 54, 11)],
            2,
            false,
        );
        let mut piece =
            Gearpiece::new(WEAPON, "Weapon", GearpieceSlot::MainHand).with_materia(materia);
        piece.set_collected(true, false);
        assert!(!piece.is_complete());

        piece.materia_mut().meld_single(ItemId(41_757));
        assert!(piece.is_complete());
    }

    #[test]
    fn regeneration_keeps_progress() {
        let mut piece = Gearpiece::new(WEAPON, "Weapon", GearpieceSlot::MainHand)
            .with_prerequisites(upgrade_tree());
        piece
            .prerequisites_mut()
            .unwrap()
            .assign_item_id(TOKEN)
            .unwrap();

        let paired = piece.regenerate_prerequisites(upgrade_tree());

        assert_eq!(paired, 3);
        let tree = piece.prerequisites().unwrap();
        assert!(tree.children()[1].is_collected());
        assert!(!tree.children()[0].is_collected());
    }

    #[test]
    fn first_tree_inherits_manual_flag() {
        let mut piece = Gearpiece::new(WEAPON, "Weapon", GearpieceSlot::MainHand);
        piece.set_collected(true, true);

        piece.regenerate_prerequisites(upgrade_tree());

        assert_eq!(piece.state(), CollectionState::ManuallyCollected);
    }
}
