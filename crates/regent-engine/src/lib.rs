//! Progression rules for the Regent diary game.
//!
//! This crate is the single authority over a player's advancement: the
//! resource ledger, the experience curve, the rank ladder, the
//! achievement catalog, and the path/quest dependency graph. The host
//! application mutates a profile only through the
//! [`ProgressionCoordinator`], which applies the requested change and
//! then drives achievement scans, path scans, and rank checks to a fixed
//! point so every cross-system cascade settles within one call.
//!
//! # Modules
//!
//! - [`config`] -- Tunable constants: experience curve, task blocks,
//!   bonus factors, and the bonus stacking policy.
//! - [`ledger`] -- Checked resource credits and clamped debits over a
//!   profile's balances.
//! - [`experience`] -- Multiplier-scaled experience grants, level-ups,
//!   and task-based grants with combo/special-time bonuses.
//! - [`rank`] -- The six-step noble ladder: requirements, transition
//!   rewards, and the monotone advancement check.
//! - [`achievements`] -- The predicate-driven achievement catalog with
//!   idempotent completion and category mastery counters.
//! - [`paths`] -- The path/quest prerequisite DAG, validated at load,
//!   with one-time reward markers.
//! - [`territory`] -- Read-only queries over territory records.
//! - [`notify`] -- The fire-and-forget notification seam.
//! - [`coordinator`] -- The aggregate entry point tying it all together.
//! - [`error`] -- The crate error type.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use regent_engine::{
//!     AchievementRegistry, DependencyResolver, NullNotifier, NullSink, PathCatalog,
//!     ProgressionAction, ProgressionConfig, ProgressionCoordinator,
//! };
//!
//! let resolver = DependencyResolver::new(PathCatalog::standard())?;
//! let coordinator = ProgressionCoordinator::new(
//!     AchievementRegistry::standard(),
//!     resolver,
//!     ProgressionConfig::default(),
//!     Arc::new(NullNotifier),
//!     Arc::new(NullSink),
//! )?;
//!
//! let mut profile = coordinator.create_profile("Aldric")?;
//! let outcome = coordinator.apply(
//!     &mut profile,
//!     &[],
//!     ProgressionAction::AddExperience(120),
//! )?;
//!
//! // The unconditional tutorial opener completes on the first mutation.
//! assert!(!outcome.paths_completed.is_empty());
//! # Ok::<(), regent_engine::EngineError>(())
//! ```

pub mod achievements;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod experience;
pub mod ledger;
pub mod notify;
pub mod paths;
pub mod rank;
pub mod territory;

// Re-export primary types at crate root.
pub use achievements::{Achievement, AchievementRegistry};
pub use config::{BonusStackingPolicy, ProgressionConfig};
pub use coordinator::{
    ActionOutcome, NullSink, ProgressionAction, ProgressionCoordinator, SnapshotSink,
};
pub use error::EngineError;
pub use experience::ExperienceGain;
pub use notify::{Notifier, NullNotifier};
pub use paths::{DependencyResolver, PathCatalog, PathSpec};
pub use rank::RankAdvance;
