//! Carrying collection state from an old tree into a regenerated one.
//!
//! Static item data may change the shape of a tree (a new vendor, a new
//! upgrade path). The regenerated shape is authoritative, but everything the
//! player already collected must survive. Nodes are paired by id first and
//! then by `(kind, item_id)` among the not yet paired siblings of the paired
//! parent. Paired nodes adopt the old id and, for atoms, the old state.
//! Unpaired nodes keep their fresh id and start uncollected.

use std::collections::{HashMap, HashSet};

use super::PrerequisiteNode;
use crate::ids::NodeId;

impl PrerequisiteNode {
    /// Transplants ids and atom state from `previous` into `self`.
    ///
    /// Returns the number of nodes that found a partner.
    pub fn merge_state_from(&mut self, previous: &PrerequisiteNode) -> usize {
        let mut index = HashMap::new();
        previous.walk(&mut |node| {
            index.insert(node.id(), node);
        });

        let mut merger = Merger {
            index,
            used: HashSet::new(),
            paired: 0,
        };

        let same_shape = self.kind() == previous.kind() && self.item_id() == previous.item_id();
        let root_partner = merger
            .by_id(self.id())
            .or_else(|| same_shape.then_some(previous));
        match root_partner {
            Some(old) => merger.pair(self, old),
            None => merger.unpaired(self),
        }

        tracing::trace!(
            target: "gear::prerequisite",
            paired = merger.paired,
            "merged regenerated prerequisite tree"
        );
        merger.paired
    }
}

struct Merger<'a> {
    index: HashMap<NodeId, &'a PrerequisiteNode>,
    used: HashSet<NodeId>,
    paired: usize,
}

impl<'a> Merger<'a> {
    fn by_id(&self, id: NodeId) -> Option<&'a PrerequisiteNode> {
        if self.used.contains(&id) {
            return None;
        }
        self.index.get(&id).copied()
    }

    fn pair(&mut self, new: &mut PrerequisiteNode, old: &'a PrerequisiteNode) {
        self.used.insert(old.id());
        self.paired += 1;
        new.set_id(old.id());

        if let (PrerequisiteNode::Atom(new_atom), PrerequisiteNode::Atom(old_atom)) =
            (&mut *new, old)
        {
            new_atom.is_collected = old_atom.is_collected;
            new_atom.is_manually_collected = old_atom.is_manually_collected;
        }

        for child in new.children_mut() {
            let partner = self.by_id(child.id()).or_else(|| {
                old.children().iter().find(|candidate| {
                    !self.used.contains(&candidate.id())
                        && candidate.kind() == child.kind()
                        && candidate.item_id() == child.item_id()
                })
            });
            match partner {
                Some(old_child) => self.pair(child, old_child),
                None => self.unpaired(child),
            }
        }
    }

    /// Fresh node: only descendants that reuse an old id can still pair.
    fn unpaired(&mut self, new: &mut PrerequisiteNode) {
        for child in new.children_mut() {
            match self.by_id(child.id()) {
                Some(old_child) => self.pair(child, old_child),
                None => self.unpaired(child),
            }
        }
    }
}
