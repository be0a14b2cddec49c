//! Greedy assignment of inventory instances to gearset requirements.
//!
//! A pass is deterministic and exclusive: every inventory instance satisfies
//! at most one requirement, and running the same pass twice over an
//! unchanged snapshot reports no mutations the second time.
//!
//! # Phases
//!
//! 1. Non-target active gearsets reserve the instances backing what they
//!    already hold.
//! 2. Target gearsets are reset to their manual state.
//! 3. Gearpiece phase: instances claim whole gearpieces in priority order and
//!    re-derive the piece's melds from the instance's materia.
//! 4. Prerequisite phase: leftover instances fill prerequisite atoms.
//! 5. Unclaimed automatic gearpieces drop their melds.
//!
//! The report is the diff between the state before and after the pass.

mod inventory;
mod mutation;

use std::collections::BTreeSet;

pub use inventory::{InventoryItem, InventorySnapshot, InventoryStack};
pub use mutation::{Mutation, ResolutionReport};

use crate::config::SolverConfig;
use crate::gear::{Gearpiece, Gearset, resolution_order};
use crate::ids::{GearsetId, ItemId, NodeId};
use crate::prerequisite::PrerequisiteNode;

#[derive(Clone, Debug, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Runs one pass over `gearsets`.
    ///
    /// `targets == None` resolves every active gearset. Otherwise only the
    /// named active gearsets are touched and the rest hold on to their
    /// instances.
    pub fn resolve(
        &self,
        gearsets: &mut [Gearset],
        targets: Option<&BTreeSet<GearsetId>>,
        inventory: &InventorySnapshot,
    ) -> ResolutionReport {
        let (target_order, others): (Vec<usize>, Vec<usize>) = resolution_order(gearsets)
            .into_iter()
            .partition(|&position| targets.is_none_or(|t| t.contains(&gearsets[position].id())));

        let mut pool = Pool::new(inventory.items());
        let mut report = ResolutionReport::default();

        for &position in &others {
            for piece in gearsets[position].gearpieces() {
                report.reserved += self.reserve_held(&mut pool, inventory, piece);
            }
        }

        let before: Vec<Vec<PieceState>> = target_order
            .iter()
            .map(|&position| {
                gearsets[position]
                    .gearpieces()
                    .iter()
                    .map(PieceState::capture)
                    .collect()
            })
            .collect();

        for &position in &target_order {
            for piece in gearsets[position].gearpieces_mut() {
                piece.set_collected(false, false);
            }
        }

        // Gearpiece phase.
        let mut claimed: Vec<Vec<bool>> = target_order
            .iter()
            .map(|&position| vec![false; gearsets[position].gearpieces().len()])
            .collect();
        for index in pool.free() {
            let instance = &inventory.items()[index];
            let Some((rank, slot)) = self.claimable_piece(gearsets, &target_order, &claimed, instance)
            else {
                continue;
            };
            pool.claim(index);
            claimed[rank][slot] = true;
            let piece = &mut gearsets[target_order[rank]].gearpieces_mut()[slot];
            piece.set_collected(true, false);
            piece.materia_mut().meld_multiple(&instance.materia);
            report.assigned += 1;
        }

        // Prerequisite phase.
        for index in pool.free() {
            let instance = &inventory.items()[index];
            if !self.config.include_prerequisite_materia && !instance.materia.is_empty() {
                continue;
            }
            let assigned = target_order.iter().any(|&position| {
                gearsets[position]
                    .gearpieces_mut()
                    .iter_mut()
                    .any(|piece| assign_prerequisite(piece, instance.item_id))
            });
            if assigned {
                pool.claim(index);
                report.assigned += 1;
            }
        }

        for (rank, &position) in target_order.iter().enumerate() {
            for (slot, piece) in gearsets[position].gearpieces_mut().iter_mut().enumerate() {
                if !claimed[rank][slot] && !piece.is_manually_collected() {
                    piece.materia_mut().meld_multiple(&[]);
                }
            }
        }

        for (rank, &position) in target_order.iter().enumerate() {
            let gearset = &gearsets[position];
            for (slot, piece) in gearset.gearpieces().iter().enumerate() {
                let after = PieceState::capture(piece);
                let prior = &before[rank][slot];
                if after == *prior {
                    continue;
                }
                prior.diff(&after, gearset.id(), slot, &mut report.mutations);
                report.changed.insert(gearset.id());
            }
        }

        report.unassigned = pool.free().len();
        tracing::debug!(
            target: "gear::solver",
            targets = target_order.len(),
            reserved = report.reserved,
            assigned = report.assigned,
            unassigned = report.unassigned,
            mutations = report.mutations.len(),
            "resolution pass complete"
        );
        report
    }

    /// Reserves the instances a non-target gearpiece holds, picking only
    /// instances a full pass could have given it. Returns how many were
    /// reserved.
    fn reserve_held(
        &self,
        pool: &mut Pool,
        inventory: &InventorySnapshot,
        piece: &Gearpiece,
    ) -> usize {
        let items = inventory.items();
        if piece.is_collected() {
            let fits = |index: usize| {
                !self.config.strict_materia_matching
                    || piece.materia().list_can_satisfy(&items[index].materia)
            };
            return usize::from(pool.take(piece.item_id(), fits).is_some());
        }

        let Some(tree) = piece.prerequisites() else {
            return 0;
        };
        let mut backing = Vec::new();
        outermost_collected(tree, &mut backing);
        let fits = |index: usize| {
            self.config.include_prerequisite_materia || items[index].materia.is_empty()
        };
        backing
            .into_iter()
            .filter(|&item| pool.take(item, &fits).is_some())
            .count()
    }

    /// First unclaimed gearpiece, in priority order, that `instance` can
    /// stand in for.
    fn claimable_piece(
        &self,
        gearsets: &[Gearset],
        target_order: &[usize],
        claimed: &[Vec<bool>],
        instance: &InventoryItem,
    ) -> Option<(usize, usize)> {
        target_order
            .iter()
            .enumerate()
            .find_map(|(rank, &position)| {
                gearsets[position]
                    .gearpieces()
                    .iter()
                    .enumerate()
                    .find(|(slot, piece)| {
                        !claimed[rank][*slot]
                            && piece.item_id() == instance.item_id
                            && (!self.config.strict_materia_matching
                                || piece.materia().list_can_satisfy(&instance.materia))
                    })
                    .map(|(slot, _)| (rank, slot))
            })
    }
}

/// Inventory instances in item-id order, each usable once per pass.
struct Pool {
    item_ids: Vec<ItemId>,
    order: Vec<usize>,
    free: Vec<bool>,
}

impl Pool {
    fn new(items: &[InventoryItem]) -> Self {
        let mut order: Vec<usize> = (0..items.len()).collect();
        order.sort_by_key(|&index| items[index].item_id);
        Self {
            item_ids: items.iter().map(|i| i.item_id).collect(),
            order,
            free: vec![true; items.len()],
        }
    }

    /// Takes the first free instance of `item` that `accept` allows.
    fn take(&mut self, item: ItemId, accept: impl Fn(usize) -> bool) -> Option<usize> {
        let index = self
            .order
            .iter()
            .copied()
            .find(|&index| self.free[index] && self.item_ids[index] == item && accept(index))?;
        self.free[index] = false;
        Some(index)
    }

    fn claim(&mut self, index: usize) {
        self.free[index] = false;
    }

    fn free(&self) -> Vec<usize> {
        self.order
            .iter()
            .copied()
            .filter(|&index| self.free[index])
            .collect()
    }
}

/// Items backing the outermost automatically collected atoms of a tree.
///
/// A manually collected atom stands in for its whole subtree without
/// consuming an instance, the same as in a full pass.
fn outermost_collected(node: &PrerequisiteNode, out: &mut Vec<ItemId>) {
    if let Some(atom) = node.as_atom()
        && atom.is_collected()
    {
        if !atom.is_manually_collected() {
            out.push(node.item_id());
        }
        return;
    }
    for child in node.children() {
        outermost_collected(child, out);
    }
}

/// Fills one prerequisite atom of `piece` with `item`.
///
/// A root atom naming the gearpiece itself is skipped: only the gearpiece
/// phase may collect the piece as a whole.
fn assign_prerequisite(piece: &mut Gearpiece, item: ItemId) -> bool {
    if piece.is_collected() {
        return false;
    }
    let own = piece.item_id();
    let Some(tree) = piece.prerequisites_mut() else {
        return false;
    };
    if tree.as_atom().is_some() && tree.item_id() == own {
        tree.children_mut()
            .iter_mut()
            .any(|child| child.assign_item_id(item).is_some())
    } else {
        tree.assign_item_id(item).is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct PieceState {
    collected: bool,
    atoms: Vec<(NodeId, bool)>,
    melds: Vec<bool>,
}

impl PieceState {
    fn capture(piece: &Gearpiece) -> Self {
        Self {
            collected: piece.is_collected(),
            atoms: piece
                .prerequisites()
                .map(|tree| {
                    tree.atoms()
                        .iter()
                        .map(|atom| (atom.id(), atom.is_collected()))
                        .collect()
                })
                .unwrap_or_default(),
            melds: piece.materia().slots().iter().map(|m| m.is_melded()).collect(),
        }
    }

    fn diff(&self, after: &Self, gearset: GearsetId, gearpiece: usize, out: &mut Vec<Mutation>) {
        if self.atoms.is_empty() && self.collected != after.collected {
            out.push(Mutation::SetCollected {
                gearset,
                gearpiece,
                node: None,
                collected: after.collected,
            });
        }
        for ((node, was), (_, now)) in self.atoms.iter().zip(&after.atoms) {
            if was != now {
                out.push(Mutation::SetCollected {
                    gearset,
                    gearpiece,
                    node: Some(*node),
                    collected: *now,
                });
            }
        }
        for (slot, (was, now)) in self.melds.iter().zip(&after.melds).enumerate() {
            if was != now {
                out.push(Mutation::Meld {
                    gearset,
                    gearpiece,
                    slot,
                    melded: *now,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gear::{ClassJob, GearpieceSlot};
    use crate::materia::{Materia, MateriaGroup, StatKind};
    use crate::prerequisite::SourceType;

    const RING: ItemId = ItemId(500);
    const TOKEN: ItemId = ItemId(28);
    const CRIT: ItemId = ItemId(41_757);
    const DH: ItemId = ItemId(41_760);

    fn ring_piece() -> Gearpiece {
        let tree = PrerequisiteNode::atom(RING, "Ring", SourceType::Exchange).with_children(vec![
            PrerequisiteNode::atom(TOKEN, "Token", SourceType::Loot),
            PrerequisiteNode::atom(TOKEN, "Token", SourceType::Loot),
        ]);
        Gearpiece::new(RING, "Ring", GearpieceSlot::Ring)
            .with_prerequisites(tree)
            .with_materia(MateriaGroup::new(
                vec![Materia::new(CRIT, StatKind::CriticalHit, 54, 11)],
                1,
                false,
            ))
    }

    fn ring_set(name: &str, priority: i32) -> Gearset {
        Gearset::new(name, ClassJob::Drg)
            .with_priority(priority)
            .with_gearpiece(ring_piece())
    }

    fn snapshot(items: &[(ItemId, &[ItemId])]) -> InventorySnapshot {
        items
            .iter()
            .map(|(id, materia)| InventoryItem::new(*id).with_materia(materia.to_vec()))
            .collect()
    }

    #[test]
    fn single_instance_goes_to_highest_priority() {
        let mut sets = vec![ring_set("second", 2), ring_set("first", 1)];
        let report = Solver::default().resolve(&mut sets, None, &snapshot(&[(RING, &[])]));

        assert!(sets[1].gearpieces()[0].is_collected());
        assert!(!sets[0].gearpieces()[0].is_collected());
        assert_eq!(report.assigned, 1);
        assert_eq!(report.changed, BTreeSet::from([sets[1].id()]));
    }

    #[test]
    fn instances_are_never_shared() {
        let mut sets = vec![ring_set("a", 1), ring_set("b", 2)];
        let inventory = snapshot(&[(TOKEN, &[]), (TOKEN, &[]), (TOKEN, &[])]);

        let report = Solver::default().resolve(&mut sets, None, &inventory);

        let collected: usize = sets
            .iter()
            .flat_map(|s| s.gearpieces())
            .filter_map(|p| p.prerequisites())
            .map(|t| t.atoms().iter().filter(|a| a.is_collected()).count())
            .sum();
        assert_eq!(collected, 3);
        assert_eq!(report.assigned, 3);
        assert_eq!(report.unassigned, 0);
        let first = sets[0].gearpieces()[0].prerequisites().unwrap();
        assert!(first.children().iter().all(PrerequisiteNode::is_collected));
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let mut sets = vec![ring_set("a", 1), ring_set("b", 2)];
        let inventory = snapshot(&[(RING, &[CRIT]), (TOKEN, &[]), (ItemId(9), &[])]);
        let solver = Solver::default();

        let first = solver.resolve(&mut sets, None, &inventory);
        assert!(!first.is_empty());
        let state = sets.clone();

        let second = solver.resolve(&mut sets, None, &inventory);
        assert!(second.is_empty());
        assert!(second.changed.is_empty());
        assert_eq!(sets, state);
    }

    #[test]
    fn claimed_piece_melds_from_instance() {
        let mut sets = vec![ring_set("a", 1)];
        let report = Solver::default().resolve(&mut sets, None, &snapshot(&[(RING, &[CRIT])]));

        let piece = &sets[0].gearpieces()[0];
        assert!(piece.is_complete());
        assert!(report.mutations.contains(&Mutation::Meld {
            gearset: sets[0].id(),
            gearpiece: 0,
            slot: 0,
            melded: true,
        }));

        // Losing the ring drops both collection and the meld.
        let report = Solver::default().resolve(&mut sets, None, &InventorySnapshot::default());
        assert!(!sets[0].gearpieces()[0].is_collected());
        assert!(!sets[0].gearpieces()[0].materia().slots()[0].is_melded());
        assert_eq!(report.mutations.len(), 4);
    }

    #[test]
    fn strict_matching_rejects_wrong_materia() {
        let mut sets = vec![ring_set("a", 1)];
        let solver = Solver::new(SolverConfig::default().with_strict_materia_matching(true));

        solver.resolve(&mut sets, None, &snapshot(&[(RING, &[DH])]));
        assert!(!sets[0].gearpieces()[0].is_collected());

        solver.resolve(&mut sets, None, &snapshot(&[(RING, &[DH]), (RING, &[CRIT])]));
        assert!(sets[0].gearpieces()[0].is_complete());
    }

    #[test]
    fn prerequisite_materia_can_be_excluded() {
        let mut sets = vec![ring_set("a", 1)];
        let solver = Solver::new(SolverConfig::default().with_prerequisite_materia(false));

        let report = solver.resolve(&mut sets, None, &snapshot(&[(TOKEN, &[CRIT]), (TOKEN, &[])]));

        assert_eq!(report.assigned, 1);
        assert_eq!(report.unassigned, 1);
    }

    #[test]
    fn non_targets_keep_what_they_hold() {
        let mut sets = vec![ring_set("held", 1), ring_set("target", 2)];
        sets[0].gearpieces_mut()[0].set_collected(true, false);
        let targets = BTreeSet::from([sets[1].id()]);

        let report =
            Solver::default().resolve(&mut sets, Some(&targets), &snapshot(&[(RING, &[])]));

        assert_eq!(report.reserved, 1);
        assert!(sets[0].gearpieces()[0].is_collected());
        assert!(!sets[1].gearpieces()[0].is_collected());
    }

    #[test]
    fn strict_reservation_keeps_the_matching_instance() {
        let mut sets = vec![ring_set("held", 1), ring_set("target", 2)];
        let solver = Solver::new(SolverConfig::default().with_strict_materia_matching(true));
        let inventory = snapshot(&[(RING, &[DH]), (RING, &[CRIT])]);

        solver.resolve(&mut sets, None, &inventory);
        assert!(sets[0].gearpieces()[0].is_complete());
        assert!(!sets[1].gearpieces()[0].is_collected());

        let targets = BTreeSet::from([sets[1].id()]);
        let report = solver.resolve(&mut sets, Some(&targets), &inventory);

        assert_eq!(report.reserved, 1);
        assert_eq!(report.assigned, 0);
        assert!(report.is_empty());
        assert!(!sets[1].gearpieces()[0].is_collected());
    }

    #[test]
    fn manual_atoms_reserve_nothing() {
        let mut sets = vec![ring_set("manual", 1), ring_set("target", 2)];
        let tree = sets[0].gearpieces_mut()[0].prerequisites_mut().unwrap();
        for child in tree.children_mut() {
            child.set_collected(true, true);
        }
        let inventory = snapshot(&[(TOKEN, &[])]);

        let mut full = sets.clone();
        Solver::default().resolve(&mut full, None, &inventory);
        let targets = BTreeSet::from([sets[1].id()]);
        let report = Solver::default().resolve(&mut sets, Some(&targets), &inventory);

        assert_eq!(report.reserved, 0);
        assert_eq!(report.assigned, 1);
        let token = &sets[1].gearpieces()[0].prerequisites().unwrap().children()[0];
        assert!(token.is_collected());
        assert_eq!(sets, full);
    }

    #[test]
    fn manual_marks_survive_a_pass() {
        let mut sets = vec![ring_set("a", 1)];
        sets[0].gearpieces_mut()[0].set_collected(true, true);
        sets[0].gearpieces_mut()[0].materia_mut().set_melded(0, true, true);

        let report = Solver::default().resolve(&mut sets, None, &InventorySnapshot::default());

        assert!(report.is_empty());
        assert!(sets[0].gearpieces()[0].is_complete());
    }

    #[test]
    fn inactive_sets_are_ignored() {
        let mut sets = vec![ring_set("off", 1), ring_set("on", 2)];
        sets[0].set_active(false);

        Solver::default().resolve(&mut sets, None, &snapshot(&[(RING, &[])]));

        assert!(!sets[0].gearpieces()[0].is_collected());
        assert!(sets[1].gearpieces()[0].is_collected());
    }
}
