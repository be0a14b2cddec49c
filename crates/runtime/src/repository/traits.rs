//! Repository contract for saving and loading gearsets.

use gear_core::{Gearset, GearsetId};

use super::Result;

/// Repository for gearset persistence.
///
/// Gearsets are the only mutable data the runtime owns; static item data is
/// served by an [`gear_core::ItemOracle`], never stored here.
pub trait GearsetRepository: Send + Sync {
    /// Save (create or replace) a gearset.
    fn save(&self, gearset: &Gearset) -> Result<()>;

    /// Load a gearset by id.
    fn load(&self, id: GearsetId) -> Result<Option<Gearset>>;

    fn exists(&self, id: GearsetId) -> bool;

    /// Delete a gearset. Deleting a missing gearset is not an error.
    fn delete(&self, id: GearsetId) -> Result<()>;

    /// Load every stored gearset, ordered by import order.
    fn load_all(&self) -> Result<Vec<Gearset>>;
}
