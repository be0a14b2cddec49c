use crate::ids::ItemId;
use crate::oracle::ItemOracle;

/// One physical item instance.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventoryItem {
    pub item_id: ItemId,
    /// Materia melded onto this instance, in slot order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub materia: Vec<ItemId>,
}

impl InventoryItem {
    pub fn new(item_id: ItemId) -> Self {
        Self {
            item_id,
            materia: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_materia(mut self, materia: Vec<ItemId>) -> Self {
        self.materia = materia;
        self
    }
}

/// A stack as reported by the host inventory: one item id with a quantity.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventoryStack {
    pub item_id: ItemId,
    pub quantity: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_high_quality: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub materia: Vec<ItemId>,
}

/// Every item instance the character owns at one point in time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventorySnapshot {
    items: Vec<InventoryItem>,
}

impl InventorySnapshot {
    pub fn new(items: Vec<InventoryItem>) -> Self {
        Self { items }
    }

    /// Expands stacks into single instances. High-quality stacks are mapped
    /// to their HQ item id through `oracle`.
    pub fn from_stacks<I>(stacks: I, oracle: &dyn ItemOracle) -> Self
    where
        I: IntoIterator<Item = InventoryStack>,
    {
        let mut items = Vec::new();
        for stack in stacks {
            let item_id = if stack.is_high_quality {
                oracle.to_hq_id(stack.item_id)
            } else {
                stack.item_id
            };
            for _ in 0..stack.quantity {
                items.push(InventoryItem {
                    item_id,
                    materia: stack.materia.clone(),
                });
            }
        }
        Self { items }
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn push(&mut self, item: InventoryItem) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn count(&self, item_id: ItemId) -> usize {
        self.items.iter().filter(|i| i.item_id == item_id).count()
    }
}

impl FromIterator<InventoryItem> for InventorySnapshot {
    fn from_iter<T: IntoIterator<Item = InventoryItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
