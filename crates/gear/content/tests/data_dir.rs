use std::path::PathBuf;

use gear_content::{ContentFactory, ScenarioLoader};
use gear_core::{
    InventorySnapshot, ItemId, ItemOracle, NodeKind, RequirementIndex, Solver, SolverConfig,
};

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

#[test]
fn bundled_data_loads() {
    let factory = ContentFactory::new(data_dir());
    let data = factory.load_item_data().unwrap();

    assert_eq!(data.item_count(), 12);
    assert_eq!(factory.load_solver_config().unwrap(), SolverConfig::default());

    // The base spear can be exchanged for books or taken from a coffer.
    let tree = data.build_prerequisite_tree(ItemId(43_100)).unwrap();
    let base = &tree.children()[0];
    assert_eq!(base.item_id(), ItemId(43_090));
    assert_eq!(base.children()[0].kind(), NodeKind::Or);
    assert_eq!(tree.item_needed_count(ItemId(43_560), false), 8);

    let ring = data.materia_slot_counts(ItemId(43_300).to_hq());
    assert!(ring.advanced_melding);
}

#[test]
fn scenario_resolves_end_to_end() {
    let data = ContentFactory::new(data_dir()).load_item_data().unwrap();
    let scenario = ScenarioLoader::load(&data_dir().join("scenario.ron")).unwrap();
    let mut gearsets = scenario.build_gearsets(&data);
    let inventory = InventorySnapshot::from_stacks(scenario.inventory.clone(), &data);
    assert_eq!(inventory.len(), 17);

    let solver = Solver::default();
    let report = solver.resolve(&mut gearsets, None, &inventory);

    assert_eq!(report.assigned, 17);
    assert_eq!(report.unassigned, 0);

    let bis = &gearsets[0];
    let ring = &bis.gearpieces()[2];
    assert!(ring.is_collected());
    assert_eq!(ring.materia().len(), 4);
    assert_eq!(ring.materia().missing(), vec![ItemId(33_932)]);

    let earring = bis.gearpieces()[1].prerequisites().unwrap();
    assert!(earring.is_obtainable());
    assert_eq!(earring.min_remaining_items(None), 0);

    // The spear's base is held by the first set, so the books go to the second.
    let prog_spear = gearsets[1].gearpieces()[0].prerequisites().unwrap();
    assert!(prog_spear.children()[0].is_obtainable());

    let index = RequirementIndex::build(&gearsets);
    assert!(index.is_needed(ItemId(43_536)));
    // Only the second set still needs tomestones.
    assert_eq!(index.outstanding_count(ItemId(28)), 3);

    assert!(solver.resolve(&mut gearsets, None, &inventory).is_empty());
}
