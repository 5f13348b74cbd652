//! Error types shared by the storage operations.
//!
//! Loading a resource never fails and validation reports problems as a list of
//! field names, so everything here concerns talking to the store.

use aws_sdk_dynamodb::error::BuildError;

/// Boxed source error of a failed store call.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by storage operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An item, key or expression value could not be converted into attribute values.
    #[error("failed to serialize attribute values: {0}")]
    Serialization(#[from] serde_dynamo::Error),
    /// The SDK rejected a request while building it.
    #[error("failed to build request: {0}")]
    Build(#[from] BuildError),
    /// A conditional write was rejected because its condition evaluated to false.
    #[error("conditional check failed during {operation}")]
    ConditionalCheckFailed {
        /// Name of the rejected operation.
        operation: &'static str,
    },
    /// The store returned an error for a single call (get, put, batch chunk, page...).
    #[error("{operation} failed: {source}")]
    Store {
        /// Name of the failed operation.
        operation: &'static str,
        /// Underlying failure.
        #[source]
        source: BoxError,
    },
    /// Every attempt to register a fresh id collided with an existing one.
    #[error("unable to generate a unique id for project {project} after {attempts} attempts")]
    IdGenerationExhausted {
        /// Project the id was scoped to.
        project: String,
        /// Number of attempts made.
        attempts: usize,
    },
}

impl Error {
    /// Wraps any failure returned by the store for `operation`.
    pub fn store(operation: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Store {
            operation,
            source: source.into(),
        }
    }

    /// Whether the error is a rejected conditional write.
    pub fn is_conditional_check_failed(&self) -> bool {
        matches!(self, Self::ConditionalCheckFailed { .. })
    }
}

/// Result alias used across the storage operations.
pub type Result<T> = std::result::Result<T, Error>;
