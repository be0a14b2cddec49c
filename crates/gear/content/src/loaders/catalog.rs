//! RON catalog loaders.

use std::path::Path;

use gear_core::MateriaInfo;

use crate::catalog::{AcquisitionPath, ItemCatalog, ItemRecord, MateriaCatalog, SourceCatalog};
use crate::loaders::{LoadResult, read_file};

/// Loader for the item sheet (`items.ron`).
pub struct ItemLoader;

impl ItemLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<ItemRecord>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<ItemRecord>> {
        let catalog: ItemCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;
        Ok(catalog.items)
    }
}

/// Loader for the materia sheet (`materia.ron`).
pub struct MateriaLoader;

impl MateriaLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<MateriaInfo>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<MateriaInfo>> {
        let catalog: MateriaCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse materia catalog RON: {}", e))?;
        Ok(catalog.materia)
    }
}

/// Loader for acquisition paths (`sources.ron`).
///
/// Paths with a zero-quantity component are rejected: they would expand to
/// nothing and silently make an item free.
pub struct SourceLoader;

impl SourceLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<AcquisitionPath>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<AcquisitionPath>> {
        let catalog: SourceCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse source catalog RON: {}", e))?;
        if let Some(path) = catalog
            .sources
            .iter()
            .find(|p| p.components.iter().any(|c| c.quantity == 0))
        {
            anyhow::bail!("Source for item {} has a zero-quantity component", path.item);
        }
        Ok(catalog.sources)
    }
}
