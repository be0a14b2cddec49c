//! Worker tasks that back the runtime orchestration.
//!
//! A single resolution worker owns all gearset state and executes every
//! command in arrival order.

mod resolution;

pub use resolution::{Command, PassOutcome, ResolutionWorker, ResolveTargets};
