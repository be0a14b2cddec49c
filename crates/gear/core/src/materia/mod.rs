//! Materia: meldable stat boosts attached to a gearpiece.
//!
//! A [`Materia`] is owned by exactly one [`MateriaGroup`]; its melded state
//! only changes through the group so the group's derived views stay in sync.

mod group;
mod overmeld;

pub use group::{MateriaDisplayRow, MateriaGroup, MateriaStatus};
pub use overmeld::{OVERMELD_OFFSETS, overmeld_probability};

use crate::ids::ItemId;

/// Stat a materia boosts.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatKind {
    #[default]
    CriticalHit,
    DirectHit,
    Determination,
    SkillSpeed,
    SpellSpeed,
    Tenacity,
    Piety,
    Craftsmanship,
    Control,
    CraftingPoints,
    Gathering,
    Perception,
    GatheringPoints,
}

/// One materia slot entry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Materia {
    pub(crate) item_id: ItemId,
    pub(crate) stat: StatKind,
    pub(crate) quantity: u16,
    /// Materia tier, 1-based (grade I = 1).
    pub(crate) grade: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub(crate) is_melded: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub(crate) is_manually_locked: bool,
}

impl Materia {
    pub fn new(item_id: ItemId, stat: StatKind, quantity: u16, grade: u8) -> Self {
        Self {
            item_id,
            stat,
            quantity,
            grade,
            is_melded: false,
            is_manually_locked: false,
        }
    }

    /// Builder-style initial melded flag.
    #[must_use]
    pub fn melded(mut self, melded: bool) -> Self {
        self.is_melded = melded;
        self
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn stat(&self) -> StatKind {
        self.stat
    }

    pub fn quantity(&self) -> u16 {
        self.quantity
    }

    pub fn grade(&self) -> u8 {
        self.grade
    }

    pub fn is_melded(&self) -> bool {
        self.is_melded
    }

    pub fn is_manually_locked(&self) -> bool {
        self.is_manually_locked
    }
}
