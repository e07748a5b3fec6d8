//! Structured error types for stackline
//!
//! Using thiserror for automatic Display implementation and error chaining.
//! The core is pure computation over already-validated data, so the taxonomy
//! is deliberately narrow: reconstruction can only fail on empty input, and
//! malformed snapshot content is tolerated (missing stacks read as empty).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimelineError {
    #[error("no snapshots provided")]
    EmptyInput,
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
