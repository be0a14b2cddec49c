//! Variant payloads of [`super::PrerequisiteNode`].

use crate::ids::{ItemId, NodeId};

use super::PrerequisiteNode;

/// How an item in a prerequisite tree is acquired.
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
pub enum SourceType {
    #[default]
    Unknown,
    /// Bought from a vendor for currency or tokens.
    Shop,
    /// Opened from a coffer that yields one of several pieces.
    Coffer,
    Crafted,
    Gathered,
    /// Dropped by duty content.
    Loot,
    /// Upgraded from a base item with augmentation materials.
    Upgrade,
    /// Exchanged for other items at an NPC.
    Exchange,
    Quest,
}

/// Variant discriminator, mirrored by the persisted `"type"` tag.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum NodeKind {
    Atom,
    And,
    Or,
}

/// Collection state of a node.
///
/// Atoms store it; composites derive it from their children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum CollectionState {
    Uncollected,
    AutoCollected,
    ManuallyCollected,
}

/// A concrete item that may itself be built from sub-items.
///
/// Children are components consumed together to produce this item.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AtomNode {
    pub(crate) id: NodeId,
    pub(crate) item_id: ItemId,
    pub(crate) item_name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub(crate) source: SourceType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub(crate) children: Vec<PrerequisiteNode>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub(crate) is_collected: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub(crate) is_manually_collected: bool,
}

impl AtomNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    pub fn source(&self) -> SourceType {
        self.source
    }

    pub fn children(&self) -> &[PrerequisiteNode] {
        &self.children
    }

    pub fn is_collected(&self) -> bool {
        self.is_collected
    }

    pub fn is_manually_collected(&self) -> bool {
        self.is_manually_collected
    }

    pub fn state(&self) -> CollectionState {
        match (self.is_collected, self.is_manually_collected) {
            (true, true) => CollectionState::ManuallyCollected,
            (true, false) => CollectionState::AutoCollected,
            (false, _) => CollectionState::Uncollected,
        }
    }
}

/// Shared payload of `And` / `Or` nodes. Carries no collection state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompositeNode {
    pub(crate) id: NodeId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub(crate) item_id: ItemId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub(crate) item_name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub(crate) source: SourceType,
    pub(crate) children: Vec<PrerequisiteNode>,
}

impl CompositeNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn children(&self) -> &[PrerequisiteNode] {
        &self.children
    }
}
