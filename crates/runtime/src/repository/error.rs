//! Error types raised by repository implementations.

use gear_core::PersistenceError;
use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("gearset repository lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("codec error: {0}")]
    Codec(#[from] PersistenceError),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
