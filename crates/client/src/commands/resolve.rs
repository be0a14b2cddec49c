//! Import a scenario and resolve it against its inventory.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Parser;
use gear_content::ScenarioLoader;
use gear_core::InventorySnapshot;
use gear_runtime::{GearsetRepository, StaticInventoryProvider};

use super::Context;
use crate::report;

/// Resolve saved gearsets against a scenario's inventory
#[derive(Parser, Debug)]
pub struct Resolve {
    /// Scenario file (default: `scenario.ron` in the data directory)
    #[arg(long)]
    pub scenario: Option<PathBuf>,

    /// Discard saved gearsets and re-import the scenario's
    #[arg(long)]
    pub reset: bool,

    /// Rebuild prerequisite trees from the item data before resolving
    #[arg(long)]
    pub regenerate: bool,
}

impl Resolve {
    pub async fn execute(self, context: &Context) -> Result<()> {
        let path = self
            .scenario
            .unwrap_or_else(|| context.config.data_dir.join("scenario.ron"));
        let scenario = ScenarioLoader::load(&path)
            .with_context(|| format!("Failed to load scenario {}", path.display()))?;

        if self.reset {
            for gearset in context.repository.load_all()? {
                context.repository.delete(gearset.id())?;
            }
        }

        let mut runtime = context.runtime().await?;
        let handle = runtime.handle();

        if handle.gearsets().await?.is_empty() {
            for gearset in scenario.build_gearsets(context.data.as_ref()) {
                tracing::info!(name = gearset.name(), "importing gearset");
                handle.add_gearset(gearset).await?;
            }
        }
        if self.regenerate {
            let replaced = handle.regenerate_trees().await?;
            println!("regenerated {replaced} prerequisite tree(s)");
        }

        let snapshot =
            InventorySnapshot::from_stacks(scenario.inventory.clone(), context.data.as_ref());
        runtime.set_inventory_provider(StaticInventoryProvider::new(snapshot));

        let outcome = runtime.sync_inventory().await?;
        println!("{}", report::pass_summary(&outcome));
        for gearset in handle.gearsets().await? {
            println!();
            println!("{}", report::gearset_summary(&gearset));
        }

        drop(handle);
        runtime.shutdown().await?;
        Ok(())
    }
}
