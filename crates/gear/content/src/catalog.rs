//! Static records describing items and how they are acquired.

use gear_core::{GearpieceSlot, ItemId, MateriaInfo, SourceType};

/// One item of the game's item sheet.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemRecord {
    pub id: ItemId,
    pub name: String,
    /// Equipment slot, for equippable items.
    #[cfg_attr(feature = "serde", serde(default))]
    pub slot: Option<GearpieceSlot>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub materia_slots: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub advanced_melding: bool,
}

/// An input consumed by an acquisition path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Component {
    pub item: ItemId,
    #[cfg_attr(feature = "serde", serde(default = "default_quantity"))]
    pub quantity: u32,
}

#[cfg(feature = "serde")]
fn default_quantity() -> u32 {
    1
}

/// One way of obtaining `item`.
///
/// A path without components means the item is obtained directly (a drop,
/// a quest reward).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcquisitionPath {
    pub item: ItemId,
    pub kind: SourceType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub components: Vec<Component>,
}

/// Item sheet as stored in `items.ron`.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemCatalog {
    pub items: Vec<ItemRecord>,
}

/// Materia sheet as stored in `materia.ron`.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MateriaCatalog {
    pub materia: Vec<MateriaInfo>,
}

/// Acquisition paths as stored in `sources.ron`.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceCatalog {
    pub sources: Vec<AcquisitionPath>,
}
