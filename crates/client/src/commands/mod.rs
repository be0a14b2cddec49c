//! Command implementations for the driver
//!
//! Each command is a separate module that implements its own CLI args and
//! execution logic. They share a [`Context`] holding loaded content and the
//! gearset repository.

mod clean;
mod mark;
mod needs;
mod resolve;

use std::sync::Arc;

use anyhow::{Context as _, Result};
use gear_content::{ContentFactory, StaticItemData};
use gear_core::{Gearset, SolverConfig};
use gear_runtime::{FileGearsetRepository, Runtime};

use crate::config::CliConfig;

pub use clean::Clean;
pub use mark::Mark;
pub use needs::Needs;
pub use resolve::Resolve;

/// Loaded static content plus the save directory.
pub struct Context {
    pub config: CliConfig,
    pub data: Arc<StaticItemData>,
    pub solver: SolverConfig,
    pub repository: Arc<FileGearsetRepository>,
}

impl Context {
    pub fn load(config: CliConfig) -> Result<Self> {
        let factory = ContentFactory::new(config.data_dir.clone());
        let data = factory.load_item_data().with_context(|| {
            format!("Failed to load item data from {}", config.data_dir.display())
        })?;
        let solver = config.solver(factory.load_solver_config()?);
        let repository = FileGearsetRepository::new(&config.save_dir).with_context(|| {
            format!("Failed to open save directory {}", config.save_dir.display())
        })?;

        tracing::info!(
            items = data.item_count(),
            strict_materia = solver.strict_materia_matching,
            prerequisite_materia = solver.include_prerequisite_materia,
            save_dir = %config.save_dir.display(),
            "content loaded"
        );

        Ok(Self {
            config,
            data: Arc::new(data),
            solver,
            repository: Arc::new(repository),
        })
    }

    /// Runtime over the saved gearsets.
    pub async fn runtime(&self) -> Result<Runtime> {
        let runtime = Runtime::builder()
            .config(self.config.runtime(self.solver))
            .repository(self.repository.clone())
            .oracle(self.data.clone())
            .build()
            .await?;
        Ok(runtime)
    }

    /// Finds a gearset by exact name, then by id prefix.
    pub fn find<'a>(gearsets: &'a [Gearset], key: &str) -> Result<&'a Gearset> {
        gearsets
            .iter()
            .find(|g| g.name() == key)
            .or_else(|| gearsets.iter().find(|g| g.id().to_string().starts_with(key)))
            .with_context(|| format!("No gearset named {key:?}"))
    }
}
