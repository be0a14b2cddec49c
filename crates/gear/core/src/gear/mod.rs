//! Gearsets, gearpieces and the slot/job vocabulary they use.

mod error;
mod gearpiece;
mod gearset;
mod slot;

pub use error::GearsetError;
pub use gearpiece::Gearpiece;
pub use gearset::{
    Gearset, GearsetSource, ImportSource, effective_priorities, resolution_order,
};
pub use slot::{ClassJob, GearpieceSlot};
