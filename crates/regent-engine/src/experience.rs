//! Experience grants, multipliers, and the level-up loop.
//!
//! Raw "experience granted" events are scaled by the product of three
//! [`Decimal`] factors (level, rank, bonus), floored to an integer, and
//! folded into level-ups: a single large grant can cross several
//! thresholds at once, and the profile is always left normalized
//! (`experience < experience_for_next_level`).
//!
//! # Threshold Formula
//!
//! Experience required to leave level *n* is `1000 + (n - 1) * 100`
//! (see [`ProgressionConfig::experience_threshold`]).
//!
//! Level changes never touch rank directly; rank promotion is the
//! coordinator's post-mutation check, which keeps a single advancement
//! authority.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use regent_types::PlayerProfile;

use crate::config::{BonusStackingPolicy, ProgressionConfig};
use crate::error::EngineError;
use crate::rank;

/// Result of applying an experience grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExperienceGain {
    /// The multiplied, floored amount actually credited.
    pub effective: u64,
    /// How many levels the grant crossed (0 for most grants).
    pub levels_gained: u32,
}

/// Recompute the level and rank multiplier factors from the profile's
/// current level and rank.
///
/// Level factor: `1 + level / 20`. Rank factor: static table lookup.
/// The bonus factor is deliberately left alone; only task completions
/// modify it.
pub fn refresh_multipliers(profile: &mut PlayerProfile) -> Result<(), EngineError> {
    let per_level = Decimal::new(5, 2); // 1/20
    let level_part = Decimal::from(profile.level)
        .checked_mul(per_level)
        .ok_or_else(|| EngineError::overflow("level multiplier product"))?;
    profile.multipliers.level = Decimal::ONE
        .checked_add(level_part)
        .ok_or_else(|| EngineError::overflow("level multiplier sum"))?;
    profile.multipliers.rank = rank::experience_multiplier(profile.rank);
    Ok(())
}

/// Apply a raw experience grant to the profile.
///
/// Effective amount is `floor(base * level_m * rank_m * bonus_m)`. The
/// level-up loop then subtracts thresholds while they are met, supporting
/// multi-level jumps, and recomputes the level multiplier if the level
/// changed.
pub fn add_experience(
    profile: &mut PlayerProfile,
    base: u64,
    config: &ProgressionConfig,
) -> Result<ExperienceGain, EngineError> {
    if base == 0 {
        return Ok(ExperienceGain::default());
    }

    let effective = effective_amount(base, profile)?;

    profile.experience = profile
        .experience
        .checked_add(effective)
        .ok_or_else(|| EngineError::overflow("experience credit"))?;

    let mut levels_gained: u32 = 0;
    while profile.experience >= profile.experience_for_next_level {
        profile.experience = profile
            .experience
            .checked_sub(profile.experience_for_next_level)
            .ok_or_else(|| EngineError::overflow("experience carry-over"))?;
        profile.level = profile
            .level
            .checked_add(1)
            .ok_or_else(|| EngineError::overflow("level increment"))?;
        levels_gained = levels_gained
            .checked_add(1)
            .ok_or_else(|| EngineError::overflow("levels gained count"))?;
        profile.experience_for_next_level = config.experience_threshold(profile.level)?;
    }

    if levels_gained > 0 {
        refresh_multipliers(profile)?;
        tracing::debug!(
            player = %profile.name,
            level = profile.level,
            levels_gained,
            "level up"
        );
    }

    Ok(ExperienceGain {
        effective,
        levels_gained,
    })
}

/// Apply experience for a completed diary task.
///
/// The base amount is one [`ProgressionConfig::base_task_experience`] per
/// full task block (`duration / block_minutes`, remainder dropped). Combo
/// and special-time completions scale the profile's bonus factor before
/// the grant; whether that scaling outlives the grant is governed by
/// [`BonusStackingPolicy`].
pub fn add_task_experience(
    profile: &mut PlayerProfile,
    duration_minutes: u64,
    combo: bool,
    special_time: bool,
    config: &ProgressionConfig,
) -> Result<ExperienceGain, EngineError> {
    let blocks = duration_minutes
        .checked_div(config.task_block_minutes)
        .ok_or_else(|| EngineError::overflow("task block minutes is zero"))?;
    let base = blocks
        .checked_mul(config.base_task_experience)
        .ok_or_else(|| EngineError::overflow("task base experience"))?;

    let prior_bonus = profile.multipliers.bonus;

    if combo {
        profile.multipliers.bonus = profile
            .multipliers
            .bonus
            .checked_mul(config.combo_bonus)
            .ok_or_else(|| EngineError::overflow("combo bonus factor"))?;
    }
    if special_time {
        profile.multipliers.bonus = profile
            .multipliers
            .bonus
            .checked_mul(config.special_time_bonus)
            .ok_or_else(|| EngineError::overflow("special time bonus factor"))?;
    }

    let result = add_experience(profile, base, config);

    if config.bonus_policy == BonusStackingPolicy::PerGrant {
        profile.multipliers.bonus = prior_bonus;
    }

    result
}

/// Compute `floor(base * level_m * rank_m * bonus_m)` as a `u64`.
fn effective_amount(base: u64, profile: &PlayerProfile) -> Result<u64, EngineError> {
    let product = profile
        .multipliers
        .product()
        .ok_or_else(|| EngineError::overflow("multiplier product"))?;
    let scaled = Decimal::from(base)
        .checked_mul(product)
        .ok_or_else(|| EngineError::overflow("experience scaling"))?;
    scaled
        .trunc()
        .to_u64()
        .ok_or_else(|| EngineError::overflow("experience truncation"))
}
