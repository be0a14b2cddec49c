//! In-memory GearsetRepository implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use gear_core::{Gearset, GearsetId};

use crate::repository::{GearsetRepository, RepositoryError, Result};

#[derive(Default)]
pub struct InMemoryGearsetRepository {
    gearsets: RwLock<HashMap<GearsetId, Gearset>>,
}

impl InMemoryGearsetRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GearsetRepository for InMemoryGearsetRepository {
    fn save(&self, gearset: &Gearset) -> Result<()> {
        let mut gearsets = self
            .gearsets
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        gearsets.insert(gearset.id(), gearset.clone());
        Ok(())
    }

    fn load(&self, id: GearsetId) -> Result<Option<Gearset>> {
        let gearsets = self
            .gearsets
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(gearsets.get(&id).cloned())
    }

    fn exists(&self, id: GearsetId) -> bool {
        self.gearsets
            .read()
            .map(|gearsets| gearsets.contains_key(&id))
            .unwrap_or(false)
    }

    fn delete(&self, id: GearsetId) -> Result<()> {
        let mut gearsets = self
            .gearsets
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        gearsets.remove(&id);
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<Gearset>> {
        let gearsets = self
            .gearsets
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let mut all: Vec<Gearset> = gearsets.values().cloned().collect();
        all.sort_by_key(|g| (g.source().import_order, g.id()));
        Ok(all)
    }
}
