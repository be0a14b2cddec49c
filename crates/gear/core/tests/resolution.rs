use std::collections::{BTreeSet, HashMap};

use gear_core::{
    ClassJob, CollectionState, GearpieceSlot, Gearset, InventoryItem, InventorySnapshot,
    InventoryStack, ItemId, ItemOracle, MateriaInfo, Mutation, PrerequisiteNode, RequirementIndex,
    SlotCounts, Solver, SourceType, StatKind, build_gearpiece, regenerate_trees,
};

const WEAPON: ItemId = ItemId(42_000);
const BASE: ItemId = ItemId(41_000);
const TOME: ItemId = ItemId(43_000);
const RING: ItemId = ItemId(44_000);
const CRIT: ItemId = ItemId(41_757);

/// Small in-memory item table.
struct TestOracle {
    names: HashMap<ItemId, &'static str>,
    tome_cost: usize,
}

impl TestOracle {
    fn new(tome_cost: usize) -> Self {
        let names = HashMap::from([
            (WEAPON, "Augmented Spear"),
            (BASE, "Spear"),
            (TOME, "Tomestone Twine"),
            (RING, "Ring"),
            (CRIT, "Savage Aim Materia XI"),
        ]);
        Self { names, tome_cost }
    }
}

impl ItemOracle for TestOracle {
    fn item_name(&self, item: ItemId) -> Option<String> {
        self.names.get(&item.to_nq()).map(|n| (*n).to_owned())
    }

    fn gearpiece_slot(&self, item: ItemId) -> Option<GearpieceSlot> {
        match item.to_nq() {
            WEAPON | BASE => Some(GearpieceSlot::MainHand),
            RING => Some(GearpieceSlot::Ring),
            _ => None,
        }
    }

    fn build_prerequisite_tree(&self, item: ItemId) -> Option<PrerequisiteNode> {
        if item != WEAPON {
            return None;
        }
        let mut children = vec![PrerequisiteNode::atom(BASE, "Spear", SourceType::Shop)];
        children.extend(
            (0..self.tome_cost)
                .map(|_| PrerequisiteNode::atom(TOME, "Tomestone Twine", SourceType::Loot)),
        );
        Some(
            PrerequisiteNode::atom(WEAPON, "Augmented Spear", SourceType::Upgrade)
                .with_children(children),
        )
    }

    fn materia_slot_counts(&self, item: ItemId) -> SlotCounts {
        match self.gearpiece_slot(item) {
            Some(_) => SlotCounts {
                normal: 2,
                advanced_melding: false,
            },
            None => SlotCounts::default(),
        }
    }

    fn materia_info(&self, item: ItemId) -> Option<MateriaInfo> {
        (item == CRIT).then_some(MateriaInfo {
            item_id: CRIT,
            stat: StatKind::CriticalHit,
            quantity: 54,
            grade: 11,
        })
    }
}

fn gearset(oracle: &TestOracle, name: &str, priority: i32) -> Gearset {
    Gearset::new(name, ClassJob::Drg)
        .with_priority(priority)
        .with_gearpiece(build_gearpiece(oracle, WEAPON, &[CRIT, CRIT, CRIT]).unwrap())
        .with_gearpiece(build_gearpiece(oracle, RING, &[CRIT]).unwrap())
}

#[test]
fn gearpieces_are_built_from_static_data() {
    let oracle = TestOracle::new(1);
    let piece = build_gearpiece(&oracle, WEAPON, &[CRIT, ItemId(1), CRIT, CRIT]).unwrap();

    assert_eq!(piece.item_name(), "Augmented Spear");
    // Two guaranteed slots and no advanced melding.
    assert_eq!(piece.materia().len(), 2);
    assert_eq!(piece.prerequisites().unwrap().prerequisite_count(), 3);
    assert!(build_gearpiece(&oracle, TOME, &[]).is_none());
}

/// Item table whose items allow overmelding, with a flat overmeld rate.
struct OvermeldOracle(TestOracle);

impl ItemOracle for OvermeldOracle {
    fn item_name(&self, item: ItemId) -> Option<String> {
        self.0.item_name(item)
    }

    fn gearpiece_slot(&self, item: ItemId) -> Option<GearpieceSlot> {
        self.0.gearpiece_slot(item)
    }

    fn build_prerequisite_tree(&self, item: ItemId) -> Option<PrerequisiteNode> {
        self.0.build_prerequisite_tree(item)
    }

    fn materia_slot_counts(&self, item: ItemId) -> SlotCounts {
        SlotCounts {
            advanced_melding: true,
            ..self.0.materia_slot_counts(item)
        }
    }

    fn materia_info(&self, item: ItemId) -> Option<MateriaInfo> {
        self.0.materia_info(item)
    }

    fn overmeld_probability(&self, _grade: u8, offset: usize, is_high_quality: bool) -> f32 {
        let base = if is_high_quality { 0.4 } else { 0.5 };
        base / (offset + 1) as f32
    }
}

#[test]
fn overmeld_rates_come_from_static_data() {
    let oracle = OvermeldOracle(TestOracle::new(1));

    let nq = build_gearpiece(&oracle, RING, &[CRIT, CRIT, CRIT, CRIT]).unwrap();
    assert_eq!(nq.materia().len(), 4);
    assert_eq!(nq.materia().attach_probability(1), 1.0);
    assert_eq!(nq.materia().attach_probability(2), 0.5);
    assert_eq!(nq.materia().attach_probability(3), 0.25);
    assert_eq!(nq.materia().display_rows()[0].min_attach_probability, 0.25);

    let hq = build_gearpiece(&oracle, RING.to_hq(), &[CRIT, CRIT, CRIT]).unwrap();
    assert_eq!(hq.materia().attach_probability(2), 0.4);
}

#[test]
fn upgrade_progress_flows_into_the_index() {
    let oracle = TestOracle::new(2);
    let mut sets = vec![gearset(&oracle, "main", 1), gearset(&oracle, "alt", 2)];
    let inventory = InventorySnapshot::new(vec![
        InventoryItem::new(BASE),
        InventoryItem::new(TOME),
        InventoryItem::new(RING).with_materia(vec![CRIT]),
    ]);

    let report = Solver::default().resolve(&mut sets, None, &inventory);

    assert_eq!(report.assigned, 3);
    assert_eq!(report.changed, BTreeSet::from([sets[0].id()]));
    let weapon = sets[0].gearpieces()[0].prerequisites().unwrap();
    assert!(!weapon.is_collected());
    assert!(!weapon.is_obtainable());
    assert_eq!(weapon.min_remaining_items(None), 1);
    assert!(sets[0].gearpieces()[1].is_complete());

    let index = RequirementIndex::build(&sets);
    assert_eq!(index.outstanding_count(TOME), 3);
    assert_eq!(index.outstanding_count(RING), 1);
    assert!(index.is_needed(WEAPON));
}

#[test]
fn regeneration_keeps_collected_components() {
    let oracle = TestOracle::new(1);
    let mut sets = vec![gearset(&oracle, "main", 1)];
    let inventory = InventorySnapshot::new(vec![InventoryItem::new(BASE)]);
    Solver::default().resolve(&mut sets, None, &inventory);

    // The upgrade now costs two tomes.
    let replaced = regenerate_trees(&mut sets, &TestOracle::new(2));

    assert_eq!(replaced, 1);
    let tree = sets[0].gearpieces()[0].prerequisites().unwrap();
    assert_eq!(tree.prerequisite_count(), 4);
    assert_eq!(tree.children()[0].state(), CollectionState::AutoCollected);
    assert!(tree.children()[1..].iter().all(|c| !c.is_collected()));

    // A regenerated tree resolves to the same state.
    let report = Solver::default().resolve(&mut sets, None, &inventory);
    assert!(report.is_empty());
}

#[test]
fn hq_stacks_only_satisfy_hq_pieces() {
    let oracle = TestOracle::new(1);
    let mut sets = vec![
        Gearset::new("hq", ClassJob::Drg)
            .with_gearpiece(build_gearpiece(&oracle, RING.to_hq(), &[]).unwrap()),
    ];
    let inventory = InventorySnapshot::from_stacks(
        [
            InventoryStack {
                item_id: RING,
                quantity: 2,
                is_high_quality: false,
                materia: Vec::new(),
            },
            InventoryStack {
                item_id: RING,
                quantity: 1,
                is_high_quality: true,
                materia: Vec::new(),
            },
        ],
        &oracle,
    );
    assert_eq!(inventory.len(), 3);
    assert_eq!(inventory.count(RING.to_hq()), 1);

    let report = Solver::default().resolve(&mut sets, None, &inventory);

    assert_eq!(report.assigned, 1);
    assert_eq!(report.unassigned, 2);
    assert_eq!(
        report.mutations,
        vec![Mutation::SetCollected {
            gearset: sets[0].id(),
            gearpiece: 0,
            node: None,
            collected: true,
        }]
    );
}

#[test]
fn targeted_pass_leaves_other_sets_alone() {
    let oracle = TestOracle::new(1);
    let mut sets = vec![gearset(&oracle, "main", 1), gearset(&oracle, "alt", 2)];
    let inventory = InventorySnapshot::new(vec![InventoryItem::new(RING)]);
    Solver::default().resolve(&mut sets, None, &inventory);
    assert!(sets[0].gearpieces()[1].is_collected());

    // A second ring arrives; only "alt" is re-resolved.
    let inventory = InventorySnapshot::new(vec![InventoryItem::new(RING), InventoryItem::new(RING)]);
    let targets = BTreeSet::from([sets[1].id()]);
    let report = Solver::default().resolve(&mut sets, Some(&targets), &inventory);

    assert_eq!(report.reserved, 1);
    assert_eq!(report.changed, targets);
    assert!(sets[1].gearpieces()[1].is_collected());
}
