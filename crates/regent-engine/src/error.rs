//! Error types for the regent-engine crate.
//!
//! All operations that can fail return typed errors rather than panicking.
//! There is no "insufficient resources" variant (debits clamp at zero) and
//! no "already completed" variant (completions are idempotent no-ops).

/// Errors that can occur during progression engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// An arithmetic overflow occurred during a progression computation.
    #[error("arithmetic overflow in progression computation: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },

    /// An achievement ID was not found in the catalog.
    #[error("unknown achievement: {0}")]
    UnknownAchievement(String),

    /// A path ID was not found in the catalog.
    #[error("unknown path: {0}")]
    UnknownPath(String),

    /// A path declares a prerequisite that does not exist in the catalog.
    ///
    /// Detected at catalog load; the reference behavior (a permanently
    /// unavailable path, discovered never) is replaced by failing fast.
    #[error("path {path} requires undeclared prerequisite {prerequisite}")]
    UnknownPrerequisite {
        /// The path declaring the prerequisite.
        path: String,
        /// The prerequisite ID that does not exist.
        prerequisite: String,
    },

    /// The path prerequisite graph contains a cycle.
    ///
    /// Detected at catalog load via topological sort; the paths listed
    /// could never become available.
    #[error("path prerequisite cycle involving: {0:?}")]
    CyclicPrerequisites(Vec<String>),

    /// The achievement catalog is malformed (duplicate IDs, or the
    /// self-referential completionist entry is not last).
    #[error("invalid achievement catalog: {reason}")]
    InvalidAchievementCatalog {
        /// Description of the catalog defect.
        reason: String,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::ArithmeticOverflow`] with context.
    pub fn overflow(context: impl Into<String>) -> Self {
        Self::ArithmeticOverflow {
            context: context.into(),
        }
    }
}
