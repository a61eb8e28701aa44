/// Convenience result type used across Keepsake.
pub type KeepsakeResult<T> = Result<T, KeepsakeError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum KeepsakeError {
    /// Invalid user-provided or storyboard data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors from the host's media/display-handle layer.
    #[error("media error: {0}")]
    Media(String),

    /// Errors from gesture surfaces (normally absorbed, see crate docs).
    #[error("surface error: {0}")]
    Surface(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KeepsakeError {
    /// Build a [`KeepsakeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`KeepsakeError::Media`] value.
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }

    /// Build a [`KeepsakeError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
