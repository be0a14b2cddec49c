//! Prerequisite trees: how an item is ultimately obtained.
//!
//! A tree is a closed sum of three node kinds:
//!
//! - [`AtomNode`]: a concrete item; the only node with settable state
//! - `And`: every child path must complete
//! - `Or`: any one child path completes it
//!
//! Composite state (`is_collected`, `is_manually_collected`,
//! `is_obtainable`) is always recomputed from the children, never stored.

mod error;
mod merge;
mod node;

use std::collections::BTreeMap;

pub use error::NodeError;
pub use node::{AtomNode, CollectionState, CompositeNode, NodeKind, SourceType};

use crate::ids::{ItemId, NodeId};

/// Aggregate entry produced by [`PrerequisiteNode::add_needed_item_ids`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NeededItem {
    /// Shallowest depth at which the item appears.
    pub min_depth: u32,
    /// Number of uncollected atoms naming the item.
    pub count: u32,
}

/// One node of a prerequisite tree.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "lowercase"))]
pub enum PrerequisiteNode {
    Atom(AtomNode),
    And(CompositeNode),
    Or(CompositeNode),
}

impl PrerequisiteNode {
    // ===== construction =====

    /// Creates an uncollected leaf atom with a fresh node id.
    pub fn atom(item_id: ItemId, item_name: impl Into<String>, source: SourceType) -> Self {
        Self::Atom(AtomNode {
            id: NodeId::new(),
            item_id,
            item_name: item_name.into(),
            source,
            children: Vec::new(),
            is_collected: false,
            is_manually_collected: false,
        })
    }

    /// Creates an `And` node. Fails when `children` is empty.
    pub fn all_of(
        item_id: ItemId,
        item_name: impl Into<String>,
        source: SourceType,
        children: Vec<Self>,
    ) -> Result<Self, NodeError> {
        Self::composite(NodeKind::And, item_id, item_name.into(), source, children)
    }

    /// Creates an `Or` node. Fails when `children` is empty.
    pub fn any_of(
        item_id: ItemId,
        item_name: impl Into<String>,
        source: SourceType,
        children: Vec<Self>,
    ) -> Result<Self, NodeError> {
        Self::composite(NodeKind::Or, item_id, item_name.into(), source, children)
    }

    fn composite(
        kind: NodeKind,
        item_id: ItemId,
        item_name: String,
        source: SourceType,
        children: Vec<Self>,
    ) -> Result<Self, NodeError> {
        if children.is_empty() {
            return Err(NodeError::EmptyComposite { kind, item_id });
        }
        let payload = CompositeNode {
            id: NodeId::new(),
            item_id,
            item_name,
            source,
            children,
        };
        Ok(match kind {
            NodeKind::Or => Self::Or(payload),
            _ => Self::And(payload),
        })
    }

    /// Replaces the children of this node.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Self>) -> Self {
        *self.children_mut() = children;
        self
    }

    /// Replaces the node id; used by persistence and regeneration.
    #[must_use]
    pub fn with_id(mut self, id: NodeId) -> Self {
        self.set_id(id);
        self
    }

    // ===== accessors =====

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Atom(_) => NodeKind::Atom,
            Self::And(_) => NodeKind::And,
            Self::Or(_) => NodeKind::Or,
        }
    }

    pub fn id(&self) -> NodeId {
        match self {
            Self::Atom(atom) => atom.id,
            Self::And(node) | Self::Or(node) => node.id,
        }
    }

    pub(crate) fn set_id(&mut self, id: NodeId) {
        match self {
            Self::Atom(atom) => atom.id = id,
            Self::And(node) | Self::Or(node) => node.id = id,
        }
    }

    pub fn item_id(&self) -> ItemId {
        match self {
            Self::Atom(atom) => atom.item_id,
            Self::And(node) | Self::Or(node) => node.item_id,
        }
    }

    pub fn item_name(&self) -> &str {
        match self {
            Self::Atom(atom) => &atom.item_name,
            Self::And(node) | Self::Or(node) => &node.item_name,
        }
    }

    pub fn source(&self) -> SourceType {
        match self {
            Self::Atom(atom) => atom.source,
            Self::And(node) | Self::Or(node) => node.source,
        }
    }

    pub fn children(&self) -> &[Self] {
        match self {
            Self::Atom(atom) => &atom.children,
            Self::And(node) | Self::Or(node) => &node.children,
        }
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<Self> {
        match self {
            Self::Atom(atom) => &mut atom.children,
            Self::And(node) | Self::Or(node) => &mut node.children,
        }
    }

    pub fn as_atom(&self) -> Option<&AtomNode> {
        match self {
            Self::Atom(atom) => Some(atom),
            _ => None,
        }
    }

    // ===== collection state =====

    pub fn is_collected(&self) -> bool {
        match self {
            Self::Atom(atom) => atom.is_collected,
            Self::And(node) => node.children.iter().all(Self::is_collected),
            Self::Or(node) => node.children.iter().any(Self::is_collected),
        }
    }

    pub fn is_manually_collected(&self) -> bool {
        match self {
            Self::Atom(atom) => atom.is_manually_collected,
            Self::And(node) => node.children.iter().all(Self::is_manually_collected),
            Self::Or(node) => node.children.iter().any(Self::is_manually_collected),
        }
    }

    pub fn state(&self) -> CollectionState {
        match (self.is_collected(), self.is_manually_collected()) {
            (true, true) => CollectionState::ManuallyCollected,
            (true, false) => CollectionState::AutoCollected,
            (false, _) => CollectionState::Uncollected,
        }
    }

    /// Whether the node is collected or can be completed from collected
    /// descendants.
    pub fn is_obtainable(&self) -> bool {
        match self {
            Self::Atom(atom) => {
                atom.is_collected
                    || (!atom.children.is_empty() && atom.children.iter().all(Self::is_obtainable))
            }
            Self::And(node) => {
                self.is_collected() || node.children.iter().all(Self::is_obtainable)
            }
            Self::Or(node) => self.is_collected() || node.children.iter().any(Self::is_obtainable),
        }
    }

    /// Sets collection state on every atom of this subtree.
    ///
    /// An automatic uncollect (`collected = false, manual = false`) of a
    /// manually collected atom is ignored together with its subtree, and an
    /// automatic collect never clears an existing manual mark.
    pub fn set_collected(&mut self, collected: bool, manual: bool) {
        match self {
            Self::Atom(atom) => {
                if !collected && !manual && atom.is_manually_collected {
                    return;
                }
                atom.is_manually_collected = collected && (manual || atom.is_manually_collected);
                atom.is_collected = collected;
                for child in &mut atom.children {
                    child.set_collected(collected, manual);
                }
            }
            Self::And(node) | Self::Or(node) => {
                for child in &mut node.children {
                    child.set_collected(collected, manual);
                }
            }
        }
    }

    // ===== requirement arithmetic =====

    /// How many `target` items this subtree asks for.
    ///
    /// `Or` reports its most expensive branch so callers never under-count.
    pub fn item_needed_count(&self, target: ItemId, ignore_collected: bool) -> u32 {
        if ignore_collected && self.is_collected() {
            return 0;
        }
        match self {
            Self::Atom(atom) => {
                u32::from(atom.item_id == target)
                    + atom
                        .children
                        .iter()
                        .map(|c| c.item_needed_count(target, ignore_collected))
                        .sum::<u32>()
            }
            Self::And(node) => node
                .children
                .iter()
                .map(|c| c.item_needed_count(target, ignore_collected))
                .sum(),
            Self::Or(node) => node
                .children
                .iter()
                .map(|c| c.item_needed_count(target, ignore_collected))
                .max()
                .unwrap_or(0),
        }
    }

    /// Minimum number of additional items needed, assuming one `candidate`
    /// already in hand is applied where it helps most.
    pub fn min_remaining_items(&self, candidate: Option<ItemId>) -> u32 {
        match self {
            Self::Atom(atom) => {
                if atom.is_collected || candidate == Some(atom.item_id) {
                    0
                } else if atom.children.is_empty() {
                    1
                } else {
                    Self::sum_spending_candidate(&atom.children, candidate)
                }
            }
            Self::And(node) => Self::sum_spending_candidate(&node.children, candidate),
            Self::Or(node) => node
                .children
                .iter()
                .map(|c| c.min_remaining_items(candidate))
                .min()
                .unwrap_or(0),
        }
    }

    /// Sums children while letting the candidate reduce at most one of them:
    /// the first child whose count changes when it is supplied.
    fn sum_spending_candidate(children: &[Self], mut candidate: Option<ItemId>) -> u32 {
        let mut total = 0;
        for child in children {
            let without = child.min_remaining_items(None);
            if candidate.is_some() {
                let with = child.min_remaining_items(candidate);
                if with != without {
                    candidate = None;
                    total += with;
                    continue;
                }
            }
            total += without;
        }
        total
    }

    /// Records every uncollected atom's item id with the shallowest depth it
    /// appears at and how many atoms name it.
    ///
    /// Composite nodes are not purchasable items and are never recorded;
    /// they pass their own depth through to their children.
    pub fn add_needed_item_ids(&self, counts: &mut BTreeMap<ItemId, NeededItem>, depth: u32) {
        match self {
            Self::Atom(atom) => {
                if atom.is_collected {
                    return;
                }
                counts
                    .entry(atom.item_id)
                    .and_modify(|entry| {
                        entry.min_depth = entry.min_depth.min(depth);
                        entry.count += 1;
                    })
                    .or_insert(NeededItem {
                        min_depth: depth,
                        count: 1,
                    });
                for child in &atom.children {
                    child.add_needed_item_ids(counts, depth + 1);
                }
            }
            Self::And(node) => {
                for child in &node.children {
                    child.add_needed_item_ids(counts, depth);
                }
            }
            Self::Or(node) => {
                if self.is_collected() {
                    return;
                }
                for child in &node.children {
                    child.add_needed_item_ids(counts, depth);
                }
            }
        }
    }

    /// Convenience wrapper around [`Self::add_needed_item_ids`] from depth 0.
    pub fn needed_item_ids(&self) -> BTreeMap<ItemId, NeededItem> {
        let mut counts = BTreeMap::new();
        self.add_needed_item_ids(&mut counts, 0);
        counts
    }

    /// Marks the first uncollected atom for `item_id` as automatically
    /// collected, searching depth first, and returns it.
    ///
    /// Collected subtrees (including satisfied `Or` nodes) are skipped.
    pub fn assign_item_id(&mut self, item_id: ItemId) -> Option<&mut Self> {
        if self.is_collected() {
            return None;
        }
        if let Self::Atom(atom) = self
            && atom.item_id == item_id
        {
            self.set_collected(true, false);
            return Some(self);
        }
        for child in self.children_mut() {
            if let Some(found) = child.assign_item_id(item_id) {
                return Some(found);
            }
        }
        None
    }

    // ===== structure =====

    /// Number of atom nodes in this subtree.
    pub fn prerequisite_count(&self) -> usize {
        let own = usize::from(matches!(self, Self::Atom(_)));
        own + self
            .children()
            .iter()
            .map(Self::prerequisite_count)
            .sum::<usize>()
    }

    /// Structural fingerprint used to collapse identical siblings.
    pub fn group_key(&self) -> String {
        let children = self
            .children()
            .iter()
            .map(Self::group_key)
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "{}:{}:{}:{}:{}[{}]",
            self.kind(),
            self.item_id().0,
            u8::from(self.is_collected()),
            u8::from(self.is_manually_collected()),
            self.source(),
            children
        )
    }

    /// Children with structurally identical siblings collapsed, in first
    /// appearance order.
    pub fn grouped_children(&self) -> Vec<(&Self, usize)> {
        let mut groups: Vec<(String, &Self, usize)> = Vec::new();
        for child in self.children() {
            let key = child.group_key();
            match groups.iter_mut().find(|(k, _, _)| *k == key) {
                Some((_, _, count)) => *count += 1,
                None => groups.push((key, child, 1)),
            }
        }
        groups
            .into_iter()
            .map(|(_, node, count)| (node, count))
            .collect()
    }

    pub fn find(&self, id: NodeId) -> Option<&Self> {
        if self.id() == id {
            return Some(self);
        }
        self.children().iter().find_map(|c| c.find(id))
    }

    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut Self> {
        if self.id() == id {
            return Some(self);
        }
        self.children_mut().iter_mut().find_map(|c| c.find_mut(id))
    }

    /// All atoms of this subtree in depth-first pre-order.
    pub fn atoms(&self) -> Vec<&AtomNode> {
        let mut out = Vec::new();
        self.collect_atoms(&mut out);
        out
    }

    fn collect_atoms<'a>(&'a self, out: &mut Vec<&'a AtomNode>) {
        if let Self::Atom(atom) = self {
            out.push(atom);
        }
        for child in self.children() {
            child.collect_atoms(out);
        }
    }

    /// Visits every node in depth-first pre-order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Self)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }
}
