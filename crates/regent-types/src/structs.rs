//! Core entity structs for the Regent progression engine.
//!
//! Covers the `PlayerProfile` aggregate root and its parts, the read-only
//! `Territory` record supplied by the frontend's territory collaborator,
//! and the `RewardBundle` payout shape shared by achievements, paths, and
//! rank transitions.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{AchievementCategory, Rank, TerritoryKind};
use crate::ids::{TerritoryId, TitleId};

/// Experience threshold for advancing out of level 1.
///
/// The threshold for level *n* is `1000 + (n - 1) * 100`; this constant is
/// the `n = 1` value used when constructing a fresh profile. The engine
/// recomputes the threshold on every level change.
pub const BASE_LEVEL_THRESHOLD: u64 = 1000;

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// Current spendable balances.
///
/// Both balances are unsigned by construction; removal clamps at zero, so
/// a negative balance is unrepresentable rather than merely forbidden.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Resources {
    /// Spendable gold.
    pub gold: u64,
    /// Spendable influence.
    pub influence: u64,
}

/// A non-negative delta applied to one or both resource balances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ResourceDelta {
    /// Gold portion of the delta.
    pub gold: u64,
    /// Influence portion of the delta.
    pub influence: u64,
}

impl ResourceDelta {
    /// A delta touching neither balance.
    pub const ZERO: Self = Self { gold: 0, influence: 0 };

    /// A gold-only delta.
    pub const fn gold(amount: u64) -> Self {
        Self { gold: amount, influence: 0 }
    }

    /// An influence-only delta.
    pub const fn influence(amount: u64) -> Self {
        Self { gold: 0, influence: amount }
    }

    /// A delta touching both balances.
    pub const fn new(gold: u64, influence: u64) -> Self {
        Self { gold, influence }
    }

    /// Whether this delta changes nothing.
    pub const fn is_zero(&self) -> bool {
        self.gold == 0 && self.influence == 0
    }
}

// ---------------------------------------------------------------------------
// RewardBundle
// ---------------------------------------------------------------------------

/// A one-time payout attached to an achievement, path, or rank transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RewardBundle {
    /// Gold granted.
    pub gold: u64,
    /// Influence granted (also counts toward lifetime influence).
    pub influence: u64,
    /// Raw experience granted (subject to the profile's multipliers).
    pub experience: u64,
}

impl RewardBundle {
    /// A bundle granting nothing.
    pub const NONE: Self = Self { gold: 0, influence: 0, experience: 0 };

    /// Construct a bundle from its three parts.
    pub const fn new(gold: u64, influence: u64, experience: u64) -> Self {
        Self { gold, influence, experience }
    }

    /// Whether the bundle grants nothing at all.
    pub const fn is_empty(&self) -> bool {
        self.gold == 0 && self.influence == 0 && self.experience == 0
    }

    /// The resource portion of the bundle as a [`ResourceDelta`].
    pub const fn resource_delta(&self) -> ResourceDelta {
        ResourceDelta { gold: self.gold, influence: self.influence }
    }
}

// ---------------------------------------------------------------------------
// ExperienceMultipliers
// ---------------------------------------------------------------------------

/// The three composable multipliers applied to raw experience grants.
///
/// The effective grant is `floor(base * level * rank * bonus)`. Each factor
/// is a positive [`Decimal`]; the level and rank factors are recomputed by
/// the engine whenever level or rank changes, while the bonus factor is
/// only touched by task-streak bonuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ExperienceMultipliers {
    /// Level-derived factor: `1 + level / 20`.
    #[ts(as = "String")]
    pub level: Decimal,
    /// Rank-derived factor from the static rank multiplier table.
    #[ts(as = "String")]
    pub rank: Decimal,
    /// Bonus factor accumulated from combo / special-time task completions.
    #[ts(as = "String")]
    pub bonus: Decimal,
}

impl ExperienceMultipliers {
    /// The product of the three factors, or `None` on overflow.
    pub fn product(&self) -> Option<Decimal> {
        self.level.checked_mul(self.rank)?.checked_mul(self.bonus)
    }
}

impl Default for ExperienceMultipliers {
    fn default() -> Self {
        Self {
            level: Decimal::ONE,
            rank: Decimal::ONE,
            bonus: Decimal::ONE,
        }
    }
}

// ---------------------------------------------------------------------------
// PlayerStats
// ---------------------------------------------------------------------------

/// Derived and lifetime statistics carried on the profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlayerStats {
    /// Number of territories currently owned (synced from the territory
    /// collaborator).
    pub territories_owned: u32,
    /// Lifetime influence earned. Monotone non-decreasing: spending
    /// influence never reduces it.
    pub total_influence: u64,
    /// Current consecutive-day task completion streak.
    pub task_streak: u32,
    /// Active special effect tags granted by content (informational).
    pub special_effects: Vec<String>,
}

// ---------------------------------------------------------------------------
// AchievementState
// ---------------------------------------------------------------------------

/// Achievement completion membership and per-category progress counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AchievementState {
    /// IDs of completed achievements. Ordered set so snapshots serialize
    /// deterministically (as a JSON array).
    pub completed: BTreeSet<String>,
    /// Completion count; always equals `completed.len()`.
    pub total: u32,
    /// Caller-driven progress counters per category.
    pub categories: BTreeMap<AchievementCategory, u32>,
}

impl AchievementState {
    /// Whether the `total` counter agrees with the membership set.
    pub fn is_consistent(&self) -> bool {
        usize::try_from(self.total).is_ok_and(|t| t == self.completed.len())
    }
}

// ---------------------------------------------------------------------------
// PathProgress
// ---------------------------------------------------------------------------

/// Progression path / quest completion membership.
///
/// Reward-issuance markers are kept separate from completion membership
/// so a recorded completion whose payout failed can be retried without
/// double-paying. Both sets travel with the profile snapshot; the
/// at-most-once reward guarantee survives a reload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PathProgress {
    /// IDs of completed paths.
    pub completed: BTreeSet<String>,
    /// IDs of paths whose reward has been issued.
    #[serde(default)]
    pub rewarded: BTreeSet<String>,
}

// ---------------------------------------------------------------------------
// TitleRecord
// ---------------------------------------------------------------------------

/// An awarded title. The titles list on the profile is append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TitleRecord {
    /// Unique identifier for this award.
    pub id: TitleId,
    /// Display name, e.g. `"Viscount"`.
    pub name: String,
    /// The rank whose attainment granted this title.
    pub rank: Rank,
    /// When the title was granted.
    pub granted_at: DateTime<Utc>,
}

impl TitleRecord {
    /// Create a title record for attaining `rank` at the current time.
    pub fn for_rank(rank: Rank) -> Self {
        Self {
            id: TitleId::new(),
            name: String::from(rank.display_name()),
            rank,
            granted_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Territory
// ---------------------------------------------------------------------------

/// A read-only territory record from the frontend's territory collaborator.
///
/// The engine queries these for achievement predicates, path conditions,
/// and rank gates; it never mutates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Territory {
    /// Unique identifier.
    pub id: TerritoryId,
    /// What kind of holding this is.
    pub kind: TerritoryKind,
    /// Development level (starts at 1).
    pub level: u32,
}

impl Territory {
    /// Create a level-1 territory of the given kind with a fresh ID.
    pub fn new(kind: TerritoryKind) -> Self {
        Self {
            id: TerritoryId::new(),
            kind,
            level: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// PlayerProfile
// ---------------------------------------------------------------------------

/// The aggregate root: one player's entire progression state.
///
/// Mutated exclusively through the progression coordinator; persisted as a
/// single JSON document by the external store after every mutation
/// (debounced).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlayerProfile {
    /// Stable user-chosen display name; also the persistence key.
    pub name: String,
    /// Current rank on the six-step ladder.
    pub rank: Rank,
    /// Current level, starting at 1.
    pub level: u32,
    /// Experience toward the next level; always below
    /// `experience_for_next_level` after normalization.
    pub experience: u64,
    /// Threshold recomputed whenever `level` changes.
    pub experience_for_next_level: u64,
    /// Composable multipliers applied to future raw experience grants.
    pub multipliers: ExperienceMultipliers,
    /// Current spendable balances.
    pub resources: Resources,
    /// Derived and lifetime statistics.
    pub stats: PlayerStats,
    /// Achievement completion state.
    pub achievements: AchievementState,
    /// Path / quest completion state.
    pub paths: PathProgress,
    /// Append-only list of awarded titles.
    pub titles: Vec<TitleRecord>,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
}

impl PlayerProfile {
    /// Create a fresh Baron-rank profile with the given display name.
    ///
    /// Multipliers start at 1.0; the coordinator normalizes them against
    /// the live level/rank tables immediately after creation.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rank: Rank::Baron,
            level: 1,
            experience: 0,
            experience_for_next_level: BASE_LEVEL_THRESHOLD,
            multipliers: ExperienceMultipliers::default(),
            resources: Resources::default(),
            stats: PlayerStats::default(),
            achievements: AchievementState::default(),
            paths: PathProgress::default(),
            titles: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_profile_defaults() {
        let profile = PlayerProfile::new("Aldric");
        assert_eq!(profile.name, "Aldric");
        assert_eq!(profile.rank, Rank::Baron);
        assert_eq!(profile.level, 1);
        assert_eq!(profile.experience, 0);
        assert_eq!(profile.experience_for_next_level, BASE_LEVEL_THRESHOLD);
        assert_eq!(profile.resources, Resources::default());
        assert_eq!(profile.stats.total_influence, 0);
        assert!(profile.achievements.completed.is_empty());
        assert!(profile.titles.is_empty());
    }

    #[test]
    fn achievement_state_consistency_check() {
        let mut state = AchievementState::default();
        assert!(state.is_consistent());
        state.completed.insert(String::from("first_territory"));
        assert!(!state.is_consistent());
        state.total = 1;
        assert!(state.is_consistent());
    }

    #[test]
    fn multiplier_product_default_is_one() {
        let m = ExperienceMultipliers::default();
        assert_eq!(m.product(), Some(Decimal::ONE));
    }

    #[test]
    fn reward_bundle_emptiness() {
        assert!(RewardBundle::NONE.is_empty());
        assert!(!RewardBundle::new(0, 0, 1).is_empty());
        let bundle = RewardBundle::new(100, 50, 10);
        assert_eq!(bundle.resource_delta(), ResourceDelta::new(100, 50));
    }

    #[test]
    fn profile_json_roundtrip() {
        let mut profile = PlayerProfile::new("Mathilde");
        profile.achievements.completed.insert(String::from("wealthy"));
        profile.achievements.total = 1;
        profile
            .achievements
            .categories
            .insert(AchievementCategory::Wealth, 3);
        profile.titles.push(TitleRecord::for_rank(Rank::Viscount));

        let json = serde_json::to_string(&profile).ok();
        assert!(json.is_some());
        let restored: Result<PlayerProfile, _> =
            serde_json::from_str(json.as_deref().unwrap_or(""));
        assert_eq!(restored.ok().as_ref(), Some(&profile));
    }

    #[test]
    fn completed_sets_serialize_as_arrays() {
        // The persistence collaborator stores membership as JSON arrays;
        // the BTreeSet representation must round-trip through that shape.
        let mut profile = PlayerProfile::new("Edmund");
        profile.paths.completed.insert(String::from("tutorial_welcome"));
        let value = serde_json::to_value(&profile).ok();
        let completed = value
            .as_ref()
            .and_then(|v| v.pointer("/paths/completed"))
            .cloned();
        assert!(completed.is_some_and(|v| v.is_array()));
    }
}
