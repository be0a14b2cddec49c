//! Requirement resolution engine for gear tracking.
//!
//! `gear-core` models what a character wants to wear (gearsets of
//! gearpieces), how each item is obtained (prerequisite trees) and which
//! materia go into it, then reconciles all of that against a concrete
//! inventory snapshot. It performs no I/O: static item data arrives through
//! [`ItemOracle`], and state changes leave as [`Mutation`] reports.
pub mod config;
pub mod gear;
pub mod ids;
pub mod index;
pub mod materia;
pub mod oracle;
#[cfg(feature = "serde")]
pub mod persistence;
pub mod prerequisite;
pub mod solver;

pub use config::SolverConfig;
pub use gear::{
    ClassJob, Gearpiece, GearpieceSlot, Gearset, GearsetError, GearsetSource, ImportSource,
    effective_priorities, resolution_order,
};
pub use ids::{GearsetId, ItemId, NodeId};
pub use index::{Requirement, RequirementIndex, RequirementKind};
pub use materia::{
    Materia, MateriaDisplayRow, MateriaGroup, MateriaStatus, StatKind, overmeld_probability,
};
pub use oracle::{ItemOracle, MateriaInfo, SlotCounts, build_gearpiece, regenerate_trees};
#[cfg(feature = "serde")]
pub use persistence::{
    PersistenceError, gearset_from_json, gearset_to_json, gearsets_from_json_array,
    node_from_json, node_to_json,
};
pub use prerequisite::{
    AtomNode, CollectionState, CompositeNode, NeededItem, NodeError, NodeKind, PrerequisiteNode,
    SourceType,
};
pub use solver::{
    InventoryItem, InventorySnapshot, InventoryStack, Mutation, ResolutionReport, Solver,
};
