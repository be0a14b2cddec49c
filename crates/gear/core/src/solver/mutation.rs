use std::collections::BTreeSet;

use crate::ids::{GearsetId, NodeId};

/// A state change produced by a resolution pass.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Mutation {
    /// A gearpiece (`node == None`) or one of its prerequisite atoms changed
    /// collection state.
    SetCollected {
        gearset: GearsetId,
        gearpiece: usize,
        node: Option<NodeId>,
        collected: bool,
    },
    /// A materia slot changed melded state.
    Meld {
        gearset: GearsetId,
        gearpiece: usize,
        slot: usize,
        melded: bool,
    },
}

impl Mutation {
    pub fn gearset(&self) -> GearsetId {
        match self {
            Self::SetCollected { gearset, .. } | Self::Meld { gearset, .. } => *gearset,
        }
    }
}

/// Outcome of one pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolutionReport {
    pub mutations: Vec<Mutation>,
    pub changed: BTreeSet<GearsetId>,
    /// Instances held back for non-target gearsets.
    pub reserved: usize,
    /// Instances assigned to a gearpiece or prerequisite.
    pub assigned: usize,
    /// Instances nobody asked for.
    pub unassigned: usize,
}

impl ResolutionReport {
    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }
}
