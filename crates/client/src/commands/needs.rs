//! Show which items saved gearsets still need.

use anyhow::Result;
use clap::Parser;
use gear_core::ItemId;

use super::Context;
use crate::report;

/// List outstanding requirements of the saved gearsets
#[derive(Parser, Debug)]
pub struct Needs {
    /// Only show this item id
    #[arg(long)]
    pub item: Option<u32>,
}

impl Needs {
    pub async fn execute(self, context: &Context) -> Result<()> {
        let runtime = context.runtime().await?;
        let handle = runtime.handle();

        let gearsets = handle.gearsets().await?;
        let index = handle.requirement_index().await?;
        println!(
            "{}",
            report::needs_summary(
                &index,
                &gearsets,
                context.data.as_ref(),
                self.item.map(ItemId),
            )
        );

        drop(handle);
        runtime.shutdown().await?;
        Ok(())
    }
}
