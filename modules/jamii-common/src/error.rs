/// Result type alias for lifecycle and store operations.
pub type Result<T> = std::result::Result<T, JamiiError>;

#[derive(Debug, thiserror::Error)]
pub enum JamiiError {
    /// A required field is missing/empty, or a value is outside an allowed enum.
    /// Always a client-side fix, never retried.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The acting account's status disallows the action.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Duplicate vote attempt.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Referenced entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The underlying store could not complete the read/write. Callers may retry.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl JamiiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}
