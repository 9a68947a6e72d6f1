use thiserror::Error;

/// Errors produced by type construction and validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid bucket id {name:?}: {reason}")]
    InvalidBucketId { name: String, reason: String },
}
