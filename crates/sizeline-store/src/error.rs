/// Errors from object-store and series-store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The named container or key does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The backend could not be reached or refused the request.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The backend accepted the request but failed to complete it.
    #[error("backend error: {0}")]
    Backend(String),

    /// A stored row could not be decoded into the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// A continuation token was malformed, or the backend returned a token
    /// that would restart or repeat the traversal.
    #[error("invalid continuation token: {0}")]
    InvalidToken(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
