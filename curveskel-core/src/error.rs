//! Error types for curveskel

use thiserror::Error;

/// Main error type for curveskel operations
#[derive(Error, Debug)]
pub enum Error {
    /// The caller handed us something that violates an input contract.
    /// Raised synchronously, before any state is mutated.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A structural invariant was found broken after the fact, e.g. a
    /// serialized node table where some node has two parents. Only raised
    /// when validation was requested.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// An internal defect: the algorithm reached a state it never should.
    /// Not recoverable and never retried.
    #[error("Algorithm error: {0}")]
    Algorithm(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Cooperative cancellation was observed.
    #[error("Operation cancelled")]
    Cancelled,
}

/// Result type alias for curveskel operations
pub type Result<T> = std::result::Result<T, Error>;
