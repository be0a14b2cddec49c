//! Runtime orchestration for gearset resolution.
//!
//! This crate wires the pure `gear-core` engine to a single background
//! worker, a gearset repository and a topic event bus. Consumers embed
//! [`Runtime`] to feed inventory snapshots, request resolution passes and
//! edit gearsets through a cloneable [`GearHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`repository`] stores gearsets between runs
//! - `workers` keeps the resolution task internal to the crate
pub mod api;
pub mod events;
pub mod repository;
pub mod runtime;

mod workers;

pub use api::{GearHandle, InventoryProvider, Result, RuntimeError, StaticInventoryProvider};
pub use events::{Event, EventBus, GearsetEvent, RequirementEvent, Topic};
pub use repository::{
    FileGearsetRepository, GearsetRepository, InMemoryGearsetRepository, RepositoryError,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use workers::{PassOutcome, ResolveTargets};
