//! Solver configuration loader.

use std::path::Path;

use gear_core::SolverConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for solver policy from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads `SolverConfig`; missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<SolverConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<SolverConfig> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse solver TOML: {}", e))
    }
}
