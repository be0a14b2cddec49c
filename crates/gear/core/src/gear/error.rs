use thiserror::Error;

use crate::ids::{GearsetId, NodeId};

/// Lookup failures for commands addressing gearset contents.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GearsetError {
    #[error("gearset {0} not found")]
    UnknownGearset(GearsetId),

    #[error("gearset {gearset} has no gearpiece at index {index}")]
    UnknownGearpiece { gearset: GearsetId, index: usize },

    #[error("gearpiece {index} of gearset {gearset} has no prerequisite node {node}")]
    UnknownNode {
        gearset: GearsetId,
        index: usize,
        node: NodeId,
    },

    #[error("gearpiece {index} of gearset {gearset} has no materia slot {slot}")]
    UnknownMateriaSlot {
        gearset: GearsetId,
        index: usize,
        slot: usize,
    },
}
