//! In-memory item oracle and prerequisite tree builder.

use std::collections::HashMap;

use gear_core::{
    GearpieceSlot, ItemId, ItemOracle, MateriaInfo, NodeError, PrerequisiteNode, SlotCounts,
    SolverConfig, SourceType,
};

use crate::catalog::{AcquisitionPath, ItemRecord};

/// Static item data backing [`ItemOracle`].
///
/// # Tree shape
///
/// - one acquisition path: its components become the item atom's children
/// - several paths: the item atom gets a single `Or` child with one branch
///   per path (an `And` of the path's components, or a bare atom for a path
///   without components)
/// - a component needed `n` times appears as `n` sibling atoms
///
/// Expansion stops at [`SolverConfig::MAX_TREE_DEPTH`] and at any item that
/// is already being expanded higher up the same branch.
#[derive(Clone, Debug, Default)]
pub struct StaticItemData {
    items: HashMap<ItemId, ItemRecord>,
    materia: HashMap<ItemId, MateriaInfo>,
    sources: HashMap<ItemId, Vec<AcquisitionPath>>,
}

impl StaticItemData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_item(&mut self, record: ItemRecord) {
        self.items.insert(record.id, record);
    }

    pub fn add_materia(&mut self, info: MateriaInfo) {
        self.materia.insert(info.item_id, info);
    }

    /// Appends an acquisition path; paths keep insertion order per item.
    pub fn add_source(&mut self, path: AcquisitionPath) {
        self.sources.entry(path.item).or_default().push(path);
    }

    pub fn item(&self, item: ItemId) -> Option<&ItemRecord> {
        self.items.get(&item.to_nq())
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn paths(&self, item: ItemId) -> &[AcquisitionPath] {
        self.sources.get(&item.to_nq()).map_or(&[], Vec::as_slice)
    }

    fn name_of(&self, item: ItemId) -> String {
        self.item(item)
            .map(|r| r.name.clone())
            .unwrap_or_else(|| format!("Item {}", item.to_nq().0))
    }

    fn build_node(
        &self,
        item: ItemId,
        depth: usize,
        visiting: &mut Vec<ItemId>,
    ) -> Result<PrerequisiteNode, NodeError> {
        let name = self.name_of(item);
        let paths = self.paths(item);
        let nq = item.to_nq();

        if depth >= SolverConfig::MAX_TREE_DEPTH || visiting.contains(&nq) || paths.is_empty() {
            let source = paths.first().map_or(SourceType::Unknown, |p| p.kind);
            return Ok(PrerequisiteNode::atom(item, name, source));
        }

        visiting.push(nq);
        let node = match paths {
            [single] => PrerequisiteNode::atom(item, name, single.kind)
                .with_children(self.components(single, depth, visiting)?),
            many => {
                let mut branches = Vec::with_capacity(many.len());
                for path in many {
                    let components = self.components(path, depth, visiting)?;
                    branches.push(if components.is_empty() {
                        PrerequisiteNode::atom(item, name.clone(), path.kind)
                    } else {
                        PrerequisiteNode::all_of(item, name.clone(), path.kind, components)?
                    });
                }
                let choice =
                    PrerequisiteNode::any_of(item, name.clone(), SourceType::Unknown, branches)?;
                PrerequisiteNode::atom(item, name, SourceType::Unknown).with_children(vec![choice])
            }
        };
        visiting.pop();
        Ok(node)
    }

    fn components(
        &self,
        path: &AcquisitionPath,
        depth: usize,
        visiting: &mut Vec<ItemId>,
    ) -> Result<Vec<PrerequisiteNode>, NodeError> {
        let mut children = Vec::new();
        for component in &path.components {
            for _ in 0..component.quantity {
                children.push(self.build_node(component.item, depth + 1, visiting)?);
            }
        }
        Ok(children)
    }
}

impl ItemOracle for StaticItemData {
    fn item_name(&self, item: ItemId) -> Option<String> {
        self.item(item).map(|r| r.name.clone())
    }

    fn gearpiece_slot(&self, item: ItemId) -> Option<GearpieceSlot> {
        self.item(item).and_then(|r| r.slot)
    }

    fn build_prerequisite_tree(&self, item: ItemId) -> Option<PrerequisiteNode> {
        if self.paths(item).is_empty() {
            return None;
        }
        match self.build_node(item, 0, &mut Vec::new()) {
            Ok(tree) => Some(tree),
            Err(error) => {
                tracing::warn!(
                    target: "gear::content",
                    %item,
                    %error,
                    "skipping malformed acquisition data"
                );
                None
            }
        }
    }

    fn materia_slot_counts(&self, item: ItemId) -> SlotCounts {
        self.item(item)
            .map(|r| SlotCounts {
                normal: r.materia_slots,
                advanced_melding: r.advanced_melding,
            })
            .unwrap_or_default()
    }

    fn materia_info(&self, item: ItemId) -> Option<MateriaInfo> {
        self.materia.get(&item).copied()
    }
}
