//! Error types for exact search.
//!
//! Every precondition the engine relies on is checked up front and reported
//! as a typed [`ExactError`] instead of indexing out of bounds or returning
//! results computed from a stale cache.

use std::fmt;
use thiserror::Error;

use crate::types::DatapointIndex;

/// Coarse classification of an [`ExactError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid argument provided.
    InvalidArgument,
    /// The engine is not in a state where the operation can run.
    FailedPrecondition,
    /// A count or index lies outside the valid range.
    OutOfRange,
    /// Operation was cancelled.
    Cancelled,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::InvalidArgument => write!(f, "INVALID_ARGUMENT"),
            ErrorCode::FailedPrecondition => write!(f, "FAILED_PRECONDITION"),
            ErrorCode::OutOfRange => write!(f, "OUT_OF_RANGE"),
            ErrorCode::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// Which of the two borrowed collections an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSet {
    /// The dataset searched against.
    Dataset,
    /// The query set.
    Queries,
}

impl fmt::Display for InputSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSet::Dataset => write!(f, "dataset"),
            InputSet::Queries => write!(f, "query set"),
        }
    }
}

/// Errors produced by the exact search engine and its helpers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExactError {
    /// The dataset or query set has no entries.
    #[error("{0} is empty")]
    EmptyInput(InputSet),

    /// The cached distance matrix does not match the current collections.
    #[error(
        "cached distance matrix is {cached_queries}x{cached_data} but the engine now has \
         {queries} queries and {data} datapoints"
    )]
    DimensionMismatch {
        cached_queries: usize,
        cached_data: usize,
        queries: usize,
        data: usize,
    },

    /// Query vectors and data vectors have different dimensionality.
    #[error("query dimensionality {query_dim} does not match dataset dimensionality {data_dim}")]
    DimensionalityMismatch { query_dim: u64, data_dim: u64 },

    /// More neighbors were requested than the dataset can supply.
    #[error("requested {requested} neighbors but only {available} are available")]
    InvalidNeighborCount { requested: usize, available: usize },

    /// The cache was built with a different distance function.
    #[error("distance matrix was built with `{cached}`, not `{requested}`; invalidate it first")]
    StaleCache { cached: String, requested: String },

    /// The distance function produced NaN.
    #[error("distance between query {query} and datapoint {datum} is NaN")]
    InvalidDistance {
        query: DatapointIndex,
        datum: DatapointIndex,
    },

    /// A configuration value or constructor argument is invalid.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The cancellation flag was raised before `query` was processed.
    #[error("cancelled before query {query}")]
    Cancelled { query: DatapointIndex },
}

impl ExactError {
    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        ExactError::InvalidArgument(msg.into())
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            ExactError::EmptyInput(_)
            | ExactError::DimensionMismatch { .. }
            | ExactError::StaleCache { .. } => ErrorCode::FailedPrecondition,
            ExactError::DimensionalityMismatch { .. }
            | ExactError::InvalidDistance { .. }
            | ExactError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            ExactError::InvalidNeighborCount { .. } => ErrorCode::OutOfRange,
            ExactError::Cancelled { .. } => ErrorCode::Cancelled,
        }
    }
}

/// Result type alias for exact search operations.
pub type Result<T> = std::result::Result<T, ExactError>;
