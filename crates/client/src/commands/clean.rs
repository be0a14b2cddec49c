//! Delete saved gearsets.

use anyhow::{Result, bail};
use clap::Parser;
use gear_runtime::GearsetRepository;

use super::Context;

/// Delete every saved gearset
#[derive(Parser, Debug)]
pub struct Clean {
    /// Confirm deletion
    #[arg(short = 'y', long)]
    pub yes: bool,
}

impl Clean {
    pub fn execute(self, context: &Context) -> Result<()> {
        let gearsets = context.repository.load_all()?;
        if gearsets.is_empty() {
            println!("Nothing to clean");
            return Ok(());
        }

        if !self.yes {
            for gearset in &gearsets {
                println!("  {} ({})", gearset.name(), gearset.id());
            }
            bail!(
                "{} gearset(s) in {} would be deleted; pass --yes to confirm",
                gearsets.len(),
                context.repository.base_dir().display()
            );
        }

        for gearset in &gearsets {
            context.repository.delete(gearset.id())?;
        }
        println!("Deleted {} gearset(s)", gearsets.len());
        Ok(())
    }
}
