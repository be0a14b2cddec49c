//! Event payloads published by the resolution worker.

use gear_core::GearsetId;
use serde::{Deserialize, Serialize};

/// Requirement index events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequirementEvent {
    /// The requirement index was rebuilt.
    IndexChanged {
        /// Distinct items indexed.
        items: usize,
        /// Requirements still uncollected.
        outstanding: usize,
    },
}

/// Gearset collection events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GearsetEvent {
    /// A gearset was added or removed.
    CountChanged { count: usize },
    /// Gearsets whose state changed were written to the repository.
    Saved { ids: Vec<GearsetId> },
    /// A gearset could not be written.
    SaveFailed { id: GearsetId, error: String },
}
