//! Manually mark gearpieces, prerequisites or materia.

use anyhow::{Context as _, Result, bail};
use clap::Parser;
use gear_core::ItemId;

use super::Context;
use crate::report;

/// Manually mark a gearpiece (or part of it) as collected
///
/// Manual marks are kept by later resolution passes until cleared with
/// `--unset`.
#[derive(Parser, Debug)]
pub struct Mark {
    /// Gearset name or id prefix
    pub gearset: String,

    /// Gearpiece index within the gearset
    pub piece: usize,

    /// Mark the first prerequisite with this item id instead of the piece
    #[arg(long, conflicts_with = "slot")]
    pub item: Option<u32>,

    /// Mark this materia slot melded instead of the piece
    #[arg(long)]
    pub slot: Option<usize>,

    /// Clear the mark
    #[arg(long)]
    pub unset: bool,
}

impl Mark {
    pub async fn execute(self, context: &Context) -> Result<()> {
        let runtime = context.runtime().await?;
        let handle = runtime.handle();

        let gearsets = handle.gearsets().await?;
        let gearset = Context::find(&gearsets, &self.gearset)?;
        let id = gearset.id();
        let value = !self.unset;

        match (self.slot, self.item) {
            (Some(slot), _) => handle.set_melded(id, self.piece, slot, value).await?,
            (None, Some(item)) => {
                let piece = gearset.gearpiece(self.piece)?;
                let tree = piece
                    .prerequisites()
                    .with_context(|| format!("{} has no prerequisites", piece.item_name()))?;
                let Some(atom) = tree
                    .atoms()
                    .into_iter()
                    .find(|atom| atom.item_id() == ItemId(item) && atom.is_collected() != value)
                else {
                    bail!("No prerequisite {} left to change", ItemId(item));
                };
                handle
                    .set_collected(id, self.piece, Some(atom.id()), value)
                    .await?;
            }
            (None, None) => handle.set_collected(id, self.piece, None, value).await?,
        }

        let gearsets = handle.gearsets().await?;
        println!("{}", report::gearset_summary(Context::find(&gearsets, &self.gearset)?));

        drop(handle);
        runtime.shutdown().await?;
        Ok(())
    }
}
