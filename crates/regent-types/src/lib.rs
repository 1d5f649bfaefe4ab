//! Shared type definitions for the Regent progression engine.
//!
//! This crate is the single source of truth for the data model shared
//! between the engine, the persistence layer, and the browser frontend.
//! Types defined here flow downstream to `TypeScript` via `ts-rs` for the
//! diary app's UI.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for entity identifiers
//! - [`enums`] -- Enumeration types (ranks, territory kinds, categories)
//! - [`structs`] -- The `PlayerProfile` aggregate root and its parts

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{AchievementCategory, NotificationKind, Rank, TerritoryKind};
pub use ids::{TerritoryId, TitleId};
pub use structs::{
    AchievementState, BASE_LEVEL_THRESHOLD, ExperienceMultipliers, PathProgress, PlayerProfile,
    PlayerStats, ResourceDelta, Resources, RewardBundle, Territory, TitleRecord,
};
