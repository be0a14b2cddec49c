//! Asynchronous abstraction for sourcing inventory snapshots.
//!
//! The host game feeds the tracker through an [`InventoryProvider`]; tests
//! and offline runs use [`StaticInventoryProvider`].
use async_trait::async_trait;
use gear_core::InventorySnapshot;

use super::errors::Result;

/// Produces the character's current inventory.
#[async_trait]
pub trait InventoryProvider: Send + Sync {
    async fn snapshot(&self) -> Result<InventorySnapshot>;
}

/// Provider that always returns the same snapshot.
pub struct StaticInventoryProvider {
    snapshot: InventorySnapshot,
}

impl StaticInventoryProvider {
    pub fn new(snapshot: InventorySnapshot) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl InventoryProvider for StaticInventoryProvider {
    async fn snapshot(&self) -> Result<InventorySnapshot> {
        Ok(self.snapshot.clone())
    }
}
