//! Equipment slot and job enumerations.

/// Equipment slot a gearpiece occupies.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum GearpieceSlot {
    MainHand,
    OffHand,
    Head,
    Body,
    Hands,
    Legs,
    Feet,
    Earrings,
    Necklace,
    Bracelets,
    /// Rings can go on either hand; a gearset usually wants two.
    Ring,
}

impl GearpieceSlot {
    pub const fn is_weapon(self) -> bool {
        matches!(self, Self::MainHand | Self::OffHand)
    }

    pub const fn is_accessory(self) -> bool {
        matches!(
            self,
            Self::Earrings | Self::Necklace | Self::Bracelets | Self::Ring
        )
    }
}

/// Class or job a gearset is built for.
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
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum ClassJob {
    #[default]
    Adv,
    // Tanks
    Pld,
    War,
    Drk,
    Gnb,
    // Healers
    Whm,
    Sch,
    Ast,
    Sge,
    // Melee
    Mnk,
    Drg,
    Nin,
    Sam,
    Rpr,
    Vpr,
    // Ranged
    Brd,
    Mch,
    Dnc,
    // Casters
    Blm,
    Smn,
    Rdm,
    Pct,
    Blu,
}
