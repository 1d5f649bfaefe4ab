//! Error types for profile persistence.

/// Errors that can occur while saving or loading a profile snapshot.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem access failed.
    #[error("profile store io error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot could not be serialized or parsed.
    #[error("profile snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
