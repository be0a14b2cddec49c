//! Loaders reading static item data from RON/TOML files.

pub mod catalog;
pub mod config;
pub mod factory;
pub mod scenario;

pub use catalog::{ItemLoader, MateriaLoader, SourceLoader};
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use scenario::{GearsetSpec, PieceSpec, Scenario, ScenarioLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
