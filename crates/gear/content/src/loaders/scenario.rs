//! Scenario files: gearsets to plan for plus an inventory snapshot.

use std::path::Path;

use gear_core::{
    ClassJob, Gearset, GearsetSource, ImportSource, InventoryStack, ItemId, ItemOracle,
    build_gearpiece,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One wanted gearpiece and the materia planned for it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PieceSpec {
    pub item: ItemId,
    #[serde(default)]
    pub materia: Vec<ItemId>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GearsetSpec {
    pub name: String,
    #[serde(default)]
    pub class_job: ClassJob,
    #[serde(default)]
    pub priority: Option<i32>,
    #[serde(default)]
    pub pieces: Vec<PieceSpec>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub gearsets: Vec<GearsetSpec>,
    #[serde(default)]
    pub inventory: Vec<InventoryStack>,
}

impl Scenario {
    /// Builds gearsets in file order; import order follows file order too.
    ///
    /// Pieces the oracle cannot equip are skipped with a warning.
    pub fn build_gearsets(&self, oracle: &dyn ItemOracle) -> Vec<Gearset> {
        self.gearsets
            .iter()
            .enumerate()
            .map(|(order, spec)| {
                let mut gearset = Gearset::new(&spec.name, spec.class_job).with_source(
                    GearsetSource {
                        kind: ImportSource::Manual,
                        url: None,
                        import_order: order as u64 + 1,
                    },
                );
                gearset.set_priority(spec.priority);
                for piece in &spec.pieces {
                    match build_gearpiece(oracle, piece.item, &piece.materia) {
                        Some(gearpiece) => gearset.push_gearpiece(gearpiece),
                        None => tracing::warn!(
                            target: "gear::content",
                            gearset = %spec.name,
                            item = %piece.item,
                            "item is not equippable, skipping"
                        ),
                    }
                }
                gearset
            })
            .collect()
    }
}

/// Loader for scenario RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn load(path: &Path) -> LoadResult<Scenario> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Scenario> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse scenario RON: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_gearsets_and_stacks() {
        let scenario = ScenarioLoader::parse(
            r#"(
                gearsets: [
                    (name: "Savage", class_job: DRG, priority: Some(1),
                     pieces: [(item: 42, materia: [41757, 41757])]),
                    (name: "Alt"),
                ],
                inventory: [(item_id: 28, quantity: 3)],
            )"#,
        )
        .unwrap();

        assert_eq!(scenario.gearsets.len(), 2);
        assert_eq!(scenario.gearsets[0].class_job, ClassJob::Drg);
        assert_eq!(scenario.gearsets[0].pieces[0].materia.len(), 2);
        assert!(scenario.gearsets[1].pieces.is_empty());
        assert_eq!(scenario.inventory[0].quantity, 3);
        assert!(!scenario.inventory[0].is_high_quality);
    }
}
