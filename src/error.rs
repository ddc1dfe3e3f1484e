//! Error types for container operations.

use thiserror::Error;

/// Errors raised by container operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContainerError {
    /// A mutating operation was attempted on a read-only container.
    #[error("Changing values on this data container is not allowed")]
    ReadOnly,

    /// A merge source was neither a mapping nor a container.
    #[error("Invalid merge source: expected a map or a container, got {0}")]
    InvalidMergeSource(&'static str),

    /// An indexed read addressed a key that is not present.
    #[error("Access to undefined key: {0}")]
    KeyNotFound(String),
}
