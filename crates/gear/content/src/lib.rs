//! Static item content for the gear engine.
//!
//! This crate houses the data the engine consults but never stores:
//! - Item sheet (names, equipment slots, materia slot layout)
//! - Materia sheet (stat, amount, grade)
//! - Acquisition paths, turned into prerequisite trees by [`StaticItemData`]
//! - Solver policy (TOML) and scenario files (RON)
//!
//! [`StaticItemData`] implements [`gear_core::ItemOracle`]; loaders are
//! behind the default `loaders` feature.

pub mod catalog;
pub mod item_data;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::{
    AcquisitionPath, Component, ItemCatalog, ItemRecord, MateriaCatalog, SourceCatalog,
};
pub use item_data::StaticItemData;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, GearsetSpec, ItemLoader, MateriaLoader, PieceSpec, Scenario,
    ScenarioLoader, SourceLoader,
};
