//! Repository layer for gearsets.
//!
//! Repositories handle data that CHANGES while the tracker runs. Static item
//! content (names, slots, acquisition paths) is handled by oracles.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileGearsetRepository;
pub use memory::InMemoryGearsetRepository;
pub use traits::GearsetRepository;
