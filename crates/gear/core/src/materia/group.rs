//! Ordered materia slots of a single gearpiece.

use super::{Materia, StatKind, overmeld_probability};
use crate::ids::ItemId;

/// Count of slots sharing an `(item_id, is_melded)` pair.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MateriaStatus {
    pub item_id: ItemId,
    pub is_melded: bool,
    pub count: usize,
}

/// Row shown to the user: identical materia collapsed with their count and
/// the worst attach chance among them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MateriaDisplayRow {
    pub item_id: ItemId,
    pub stat: StatKind,
    pub quantity: u16,
    pub is_melded: bool,
    pub count: usize,
    pub min_attach_probability: f32,
}

/// Ordered materia slots of one gearpiece.
///
/// # Slot layout
///
/// The first `normal_slot_count` entries are guaranteed slots; everything
/// after is an overmeld slot whose attach chance depends on the materia
/// grade, the slot offset and the host item's quality. Rates supplied with
/// [`with_overmeld_rates`](Self::with_overmeld_rates) win over the built-in
/// table.
///
/// # Derived views
///
/// [`status_groups`](Self::status_groups) and
/// [`display_rows`](Self::display_rows) are recomputed at the end of every
/// mutating call. Nothing outside this type can flip a melded flag.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "MateriaGroupRepr"))]
pub struct MateriaGroup {
    slots: Vec<Materia>,
    normal_slot_count: u8,
    is_high_quality: bool,
    overmeld_rates: Vec<f32>,
    #[cfg_attr(feature = "serde", serde(skip))]
    status_groups: Vec<MateriaStatus>,
    #[cfg_attr(feature = "serde", serde(skip))]
    display_rows: Vec<MateriaDisplayRow>,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct MateriaGroupRepr {
    #[serde(default)]
    slots: Vec<Materia>,
    #[serde(default)]
    normal_slot_count: u8,
    #[serde(default)]
    is_high_quality: bool,
    #[serde(default)]
    overmeld_rates: Vec<f32>,
}

#[cfg(feature = "serde")]
impl From<MateriaGroupRepr> for MateriaGroup {
    fn from(repr: MateriaGroupRepr) -> Self {
        Self::new(repr.slots, repr.normal_slot_count, repr.is_high_quality)
            .with_overmeld_rates(repr.overmeld_rates)
    }
}

impl MateriaGroup {
    pub fn new(slots: Vec<Materia>, normal_slot_count: u8, is_high_quality: bool) -> Self {
        let mut group = Self {
            slots,
            normal_slot_count,
            is_high_quality,
            overmeld_rates: Vec::new(),
            status_groups: Vec::new(),
            display_rows: Vec::new(),
        };
        group.refresh();
        group
    }

    /// Attach chances for the overmeld slots, first overmeld slot first.
    pub fn with_overmeld_rates(mut self, rates: Vec<f32>) -> Self {
        self.overmeld_rates = rates;
        self.refresh();
        self
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn slots(&self) -> &[Materia] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn normal_slot_count(&self) -> u8 {
        self.normal_slot_count
    }

    pub fn is_high_quality(&self) -> bool {
        self.is_high_quality
    }

    pub fn status_groups(&self) -> &[MateriaStatus] {
        &self.status_groups
    }

    pub fn display_rows(&self) -> &[MateriaDisplayRow] {
        &self.display_rows
    }

    pub fn all_melded(&self) -> bool {
        self.slots.iter().all(|m| m.is_melded)
    }

    /// Item ids of slots still waiting for a meld, in slot order.
    pub fn missing(&self) -> Vec<ItemId> {
        self.slots
            .iter()
            .filter(|m| !m.is_melded)
            .map(|m| m.item_id)
            .collect()
    }

    /// Chance that the materia in slot `index` attaches.
    ///
    /// Guaranteed slots always return `1.0`; out of range indices `0.0`.
    pub fn attach_probability(&self, index: usize) -> f32 {
        let Some(materia) = self.slots.get(index) else {
            return 0.0;
        };
        let normal = usize::from(self.normal_slot_count);
        let Some(offset) = index.checked_sub(normal) else {
            return 1.0;
        };
        self.overmeld_rates.get(offset).copied().unwrap_or_else(|| {
            overmeld_probability(materia.grade, offset, self.is_high_quality)
        })
    }

    /// Melds the first unmelded slot holding `item_id`.
    ///
    /// Returns `true` if a slot changed.
    pub fn meld_single(&mut self, item_id: ItemId) -> bool {
        let changed = match self
            .slots
            .iter_mut()
            .find(|m| m.item_id == item_id && !m.is_melded)
        {
            Some(slot) => {
                slot.is_melded = true;
                true
            }
            None => false,
        };
        if changed {
            self.refresh();
        }
        changed
    }

    /// Unmelds the first melded, unlocked slot holding `item_id`.
    ///
    /// Returns `true` if a slot changed.
    pub fn unmeld_single(&mut self, item_id: ItemId) -> bool {
        let changed = match self
            .slots
            .iter_mut()
            .find(|m| m.item_id == item_id && m.is_melded && !m.is_manually_locked)
        {
            Some(slot) => {
                slot.is_melded = false;
                true
            }
            None => false,
        };
        if changed {
            self.refresh();
        }
        changed
    }

    /// Sets the melded flag of one slot.
    ///
    /// A manual call locks (or releases) the slot; an automatic call on a
    /// locked slot is ignored. Returns `true` if the slot changed.
    pub fn set_melded(&mut self, index: usize, melded: bool, manual: bool) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        if slot.is_manually_locked && !manual {
            return false;
        }
        let before = (slot.is_melded, slot.is_manually_locked);
        slot.is_melded = melded;
        slot.is_manually_locked = manual && melded;
        let changed = before != (slot.is_melded, slot.is_manually_locked);
        if changed {
            self.refresh();
        }
        changed
    }

    /// Re-derives melds from the materia actually present on a concrete item.
    ///
    /// Slots are walked in order; each claims the first remaining candidate
    /// with its item id. Claimed slots become melded, unclaimed melded slots
    /// are unmelded. Manually locked slots still claim a candidate but keep
    /// their state. Returns the number of slots that became melded.
    pub fn meld_multiple(&mut self, candidates: &[ItemId]) -> usize {
        let mut remaining = candidates.to_vec();
        let mut newly_melded = 0;

        for slot in &mut self.slots {
            let claimed = remaining.iter().position(|c| *c == slot.item_id);
            if let Some(pos) = claimed {
                remaining.remove(pos);
            }
            if slot.is_manually_locked {
                continue;
            }
            match (claimed.is_some(), slot.is_melded) {
                (true, false) => {
                    slot.is_melded = true;
                    newly_melded += 1;
                }
                (false, true) => slot.is_melded = false,
                _ => {}
            }
        }

        self.refresh();
        newly_melded
    }

    /// True when `available` covers every required materia as a multiset.
    ///
    /// Vacuously true when either side is empty.
    pub fn list_can_satisfy(&self, available: &[ItemId]) -> bool {
        if self.slots.is_empty() || available.is_empty() {
            return true;
        }
        let mut pool = available.to_vec();
        for slot in &self.slots {
            match pool.iter().position(|id| *id == slot.item_id) {
                Some(pos) => {
                    pool.swap_remove(pos);
                }
                None => return false,
            }
        }
        true
    }

    fn refresh(&mut self) {
        let mut status_groups: Vec<MateriaStatus> = Vec::new();
        let mut display_rows: Vec<MateriaDisplayRow> = Vec::new();

        for (index, materia) in self.slots.iter().enumerate() {
            let probability = self.attach_probability(index);

            match status_groups
                .iter_mut()
                .find(|s| s.item_id == materia.item_id && s.is_melded == materia.is_melded)
            {
                Some(status) => status.count += 1,
                None => status_groups.push(MateriaStatus {
                    item_id: materia.item_id,
                    is_melded: materia.is_melded,
                    count: 1,
                }),
            }

            match display_rows
                .iter_mut()
                .find(|r| r.item_id == materia.item_id && r.is_melded == materia.is_melded)
            {
                Some(row) => {
                    row.count += 1;
                    row.min_attach_probability = row.min_attach_probability.min(probability);
                }
                None => display_rows.push(MateriaDisplayRow {
                    item_id: materia.item_id,
                    stat: materia.stat,
                    quantity: materia.quantity,
                    is_melded: materia.is_melded,
                    count: 1,
                    min_attach_probability: probability,
                }),
            }
        }

        self.status_groups = status_groups;
        self.display_rows = display_rows;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CRIT: ItemId = ItemId(41_757);
    const DH: ItemId = ItemId(41_760);
    const DET: ItemId = ItemId(41_763);

    fn materia(id: ItemId) -> Materia {
        Materia::new(id, StatKind::CriticalHit, 54, 11)
    }

    fn states(group: &MateriaGroup) -> Vec<bool> {
        group.slots().iter().map(Materia::is_melded).collect()
    }

    #[test]
    fn meld_multiple_rederives_from_candidates() {
        let mut group = MateriaGroup::new(
            vec![
                materia(CRIT).melded(true),
                materia(DH),
                materia(DET).melded(true),
            ],
            2,
            false,
        );

        let newly = group.meld_multiple(&[DH]);

        assert_eq!(newly, 1);
        assert_eq!(states(&group), vec![false, true, false]);
    }

    #[test]
    fn meld_multiple_claims_each_candidate_once() {
        let mut group = MateriaGroup::new(vec![materia(CRIT), materia(CRIT)], 2, false);

        assert_eq!(group.meld_multiple(&[CRIT]), 1);
        assert_eq!(states(&group), vec![true, false]);

        assert_eq!(group.meld_multiple(&[CRIT, CRIT]), 1);
        assert_eq!(states(&group), vec![true, true]);

        // Same candidates again change nothing.
        assert_eq!(group.meld_multiple(&[CRIT, CRIT]), 0);
        assert_eq!(states(&group), vec![true, true]);
    }

    #[test]
    fn locked_slots_survive_rederivation() {
        let mut group = MateriaGroup::new(vec![materia(CRIT), materia(DH)], 2, false);
        assert!(group.set_melded(0, true, true));

        group.meld_multiple(&[]);

        assert_eq!(states(&group), vec![true, false]);
        assert!(group.slots()[0].is_manually_locked());

        // Automatic toggles cannot release the lock.
        assert!(!group.set_melded(0, false, false));
        assert!(!group.unmeld_single(CRIT));
        assert!(group.set_melded(0, false, true));
        assert_eq!(states(&group), vec![false, false]);
    }

    #[test]
    fn single_meld_and_unmeld_pick_first_match() {
        let mut group = MateriaGroup::new(vec![materia(CRIT), materia(DH), materia(CRIT)], 3, false);

        assert!(group.meld_single(CRIT));
        assert_eq!(states(&group), vec![true, false, false]);
        assert!(group.meld_single(CRIT));
        assert_eq!(states(&group), vec![true, false, true]);
        assert!(!group.meld_single(CRIT));

        assert!(group.unmeld_single(CRIT));
        assert_eq!(states(&group), vec![false, false, true]);
        assert!(!group.unmeld_single(DH));
    }

    #[test]
    fn list_can_satisfy_is_multiset_cover() {
        let group = MateriaGroup::new(vec![materia(CRIT), materia(CRIT), materia(DH)], 2, false);

        assert!(group.list_can_satisfy(&[DH, CRIT, CRIT]));
        assert!(group.list_can_satisfy(&[CRIT, DET, DH, CRIT]));
        assert!(!group.list_can_satisfy(&[CRIT, DH, DH]));
        assert!(group.list_can_satisfy(&[]));
        assert!(MateriaGroup::empty().list_can_satisfy(&[CRIT]));
    }

    #[test]
    fn derived_views_follow_mutations() {
        let mut group = MateriaGroup::new(vec![materia(CRIT), materia(CRIT), materia(DH)], 2, false);
        assert_eq!(
            group.status_groups(),
            &[
                MateriaStatus { item_id: CRIT, is_melded: false, count: 2 },
                MateriaStatus { item_id: DH, is_melded: false, count: 1 },
            ]
        );

        group.meld_single(CRIT);

        assert_eq!(group.status_groups().len(), 3);
        assert_eq!(group.status_groups()[0].count, 1);
        assert!(group.status_groups()[0].is_melded);
        assert_eq!(group.display_rows().len(), 3);
    }

    #[test]
    fn overmeld_slots_use_rate_table() {
        let group = MateriaGroup::new(
            vec![
                Materia::new(CRIT, StatKind::CriticalHit, 54, 11),
                Materia::new(DH, StatKind::DirectHit, 18, 10),
                Materia::new(DET, StatKind::Determination, 18, 10),
            ],
            1,
            true,
        );

        assert_eq!(group.attach_probability(0), 1.0);
        assert!((group.attach_probability(1) - 0.12).abs() < f32::EPSILON);
        assert_eq!(group.attach_probability(2), 0.0);
        assert_eq!(group.attach_probability(9), 0.0);
        assert_eq!(group.display_rows()[2].min_attach_probability, 0.0);
    }

    #[test]
    fn supplied_rates_replace_the_table() {
        let slots = vec![
            Materia::new(CRIT, StatKind::CriticalHit, 54, 11),
            Materia::new(DH, StatKind::DirectHit, 18, 7),
            Materia::new(DET, StatKind::Determination, 18, 7),
        ];
        let nq = MateriaGroup::new(slots.clone(), 1, false);
        let hq = MateriaGroup::new(slots.clone(), 1, true);
        assert!(nq.attach_probability(1) > hq.attach_probability(1));

        let group = MateriaGroup::new(slots, 1, false).with_overmeld_rates(vec![0.5]);
        assert_eq!(group.attach_probability(1), 0.5);
        // Past the supplied rates the table answers.
        assert!((group.attach_probability(2) - 0.10).abs() < f32::EPSILON);
        assert_eq!(group.display_rows()[1].min_attach_probability, 0.5);
    }
}
