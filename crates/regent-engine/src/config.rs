//! Configuration constants and defaults for progression mechanics.
//!
//! The [`ProgressionConfig`] struct bundles every tunable so that callers
//! (the coordinator, tests) can override defaults. Values mirror the
//! balance numbers of the original game content.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// How task-streak bonus multipliers behave after a grant.
///
/// The original game never reverted the bonus multiplier after a combo or
/// special-time task, so bonuses stack for the rest of the profile's life.
/// Whether that was intended is ambiguous, so the behavior is a policy
/// rather than a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BonusStackingPolicy {
    /// Bonus factors applied by task completions remain on the profile
    /// (reference behavior).
    #[default]
    Persistent,
    /// Bonus factors apply to the triggering grant only and are restored
    /// afterwards.
    PerGrant,
}

/// Configuration for progression mechanics.
///
/// All thresholds are whole integer values; multiplier factors are
/// [`Decimal`] so reward math never touches floating point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Experience granted per completed 15-minute task block (default: 50).
    pub base_task_experience: u64,

    /// Minutes per task block (default: 15). A 40-minute task counts as
    /// two blocks; the remainder is dropped.
    pub task_block_minutes: u64,

    /// Experience threshold for leaving level 1 (default: 1000).
    pub base_level_threshold: u64,

    /// Additional threshold per level beyond the first (default: 100).
    ///
    /// The threshold for level `n` is
    /// `base_level_threshold + (n - 1) * level_threshold_step`.
    pub level_threshold_step: u64,

    /// Per-category progress count that auto-completes the category's
    /// mastery achievement (default: 50).
    pub category_mastery_threshold: u32,

    /// Bonus factor applied for combo task completions (default: 1.5).
    pub combo_bonus: Decimal,

    /// Bonus factor applied for special-time task completions (default: 2).
    pub special_time_bonus: Decimal,

    /// Whether task bonuses persist on the profile or apply per grant.
    pub bonus_policy: BonusStackingPolicy,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            base_task_experience: 50,
            task_block_minutes: 15,
            base_level_threshold: 1000,
            level_threshold_step: 100,
            category_mastery_threshold: 50,
            combo_bonus: Decimal::new(15, 1),
            special_time_bonus: Decimal::TWO,
            bonus_policy: BonusStackingPolicy::default(),
        }
    }
}

impl ProgressionConfig {
    /// Experience required to advance out of the given level.
    ///
    /// Formula: `base + (level - 1) * step`, the integer form of
    /// `floor(1000 * (1 + (level - 1) * 0.1))` at the default tunables.
    pub fn experience_threshold(&self, level: u32) -> Result<u64, EngineError> {
        let above_first = u64::from(level.saturating_sub(1));
        let step_total = above_first
            .checked_mul(self.level_threshold_step)
            .ok_or_else(|| EngineError::overflow("level threshold step total"))?;
        self.base_level_threshold
            .checked_add(step_total)
            .ok_or_else(|| EngineError::overflow("level threshold sum"))
    }
}
