//! Identifier newtypes shared by every engine module.

use std::fmt;

use uuid::Uuid;

/// Game item identifier.
///
/// High-quality variants are distinct ids (see [`ItemId::HQ_OFFSET`]); the
/// solver never treats an HQ instance as its NQ counterpart or vice versa.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ItemId(pub u32);

impl ItemId {
    /// Offset the host adds to an item id to denote its high-quality variant.
    pub const HQ_OFFSET: u32 = 1_000_000;

    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn is_high_quality(self) -> bool {
        self.0 >= Self::HQ_OFFSET
    }

    /// Returns the high-quality id for this item (idempotent).
    #[inline]
    pub const fn to_hq(self) -> Self {
        if self.is_high_quality() {
            self
        } else {
            Self(self.0 + Self::HQ_OFFSET)
        }
    }

    /// Returns the normal-quality id for this item (idempotent).
    #[inline]
    pub const fn to_nq(self) -> Self {
        if self.is_high_quality() {
            Self(self.0 - Self::HQ_OFFSET)
        } else {
            self
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_high_quality() {
            write!(f, "#{}(HQ)", self.to_nq().0)
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

impl From<u32> for ItemId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Stable identity of a prerequisite node.
///
/// Minted once at construction and persisted; tree regeneration carries it
/// over to the matching node of the new shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeId(pub Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a gearset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct GearsetId(pub Uuid);

impl GearsetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GearsetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GearsetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
