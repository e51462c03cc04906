//! Error types for the solver.

use thiserror::Error;

/// Errors produced while solving a pallet loading instance.
#[derive(Debug, Error)]
pub enum Error {
    /// One or more input dimensions are not positive, or exceed the
    /// supported coordinate range.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The memoization store could not be allocated at any tier within
    /// the configured memory budget.
    #[error("out of memory: {0}")]
    OutOfMemory(String),

    /// An internal invariant was violated (non-raster coordinate, stored
    /// decision outside its constraint box, reconstruction mismatch).
    #[error("internal inconsistency: {0}")]
    Internal(String),
}

/// Convenience result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
