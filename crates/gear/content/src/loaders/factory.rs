//! Content factory for building item data from a data directory.

use std::path::{Path, PathBuf};

use gear_core::SolverConfig;

use crate::catalog::{AcquisitionPath, ItemRecord};
use crate::item_data::StaticItemData;
use crate::loaders::{ConfigLoader, ItemLoader, LoadResult, MateriaLoader, SourceLoader};

/// Loads all static content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── items.ron
/// ├── materia.ron
/// ├── sources.ron
/// └── solver.toml   (optional)
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn load_items(&self) -> LoadResult<Vec<ItemRecord>> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    pub fn load_materia(&self) -> LoadResult<Vec<gear_core::MateriaInfo>> {
        MateriaLoader::load(&self.data_dir.join("materia.ron"))
    }

    pub fn load_sources(&self) -> LoadResult<Vec<AcquisitionPath>> {
        SourceLoader::load(&self.data_dir.join("sources.ron"))
    }

    /// Loads `solver.toml`, falling back to defaults when the file is absent.
    pub fn load_solver_config(&self) -> LoadResult<SolverConfig> {
        let path = self.data_dir.join("solver.toml");
        if !path.exists() {
            return Ok(SolverConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Loads every catalog into one [`StaticItemData`].
    pub fn load_item_data(&self) -> LoadResult<StaticItemData> {
        let mut data = StaticItemData::new();
        for record in self.load_items()? {
            data.add_item(record);
        }
        for info in self.load_materia()? {
            data.add_materia(info);
        }
        let sources = self.load_sources()?;
        let source_count = sources.len();
        for path in sources {
            data.add_source(path);
        }
        tracing::info!(
            target: "gear::content",
            items = data.item_count(),
            sources = source_count,
            dir = %self.data_dir.display(),
            "loaded static item data"
        );
        Ok(data)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
