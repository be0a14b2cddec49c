//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, repositories and gearset
//! lookups so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use gear_core::GearsetError;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("resolution worker command channel closed")]
    CommandChannelClosed,

    #[error("resolution worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("resolution worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Gearset(#[from] GearsetError),

    #[error("operation requires an item oracle but none was configured")]
    MissingOracle,

    #[error("no inventory provider configured")]
    ProviderNotSet,
}
