//! The rank state machine: six-step ladder, unlock thresholds, and
//! one-time transition rewards.
//!
//! Promotion is threshold-driven and consolidated here: a rank is reached
//! the moment all of its requirements hold, checked by the coordinator
//! after every resource, stat, or achievement mutation. The King rank
//! additionally requires the `royal_capital` achievement. Because the
//! ladder is strictly monotone, a transition can fire at most once per
//! profile lifetime, which is what makes the payout one-time without any
//! extra bookkeeping.

use regent_types::{PlayerProfile, Rank, RewardBundle, TitleRecord};

use crate::config::ProgressionConfig;
use crate::error::EngineError;
use crate::experience::{self, ExperienceGain};
use crate::ledger;
use rust_decimal::Decimal;

/// The achievement gating the King rank.
pub const ROYAL_CAPITAL_ACHIEVEMENT: &str = "royal_capital";

/// Minimums a profile must meet before a rank is reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankRequirements {
    /// Territories currently owned.
    pub territories: u32,
    /// Lifetime influence earned.
    pub influence: u64,
    /// Achievements completed.
    pub achievements: u32,
    /// An achievement that must be completed, if any.
    pub required_achievement: Option<&'static str>,
}

/// Unlock thresholds for a rank.
///
/// Baron is the starting rank and requires nothing. The table otherwise
/// scales territories linearly and influence geometrically; these are the
/// balance numbers shown in the UI progress bars.
pub const fn requirements(rank: Rank) -> RankRequirements {
    match rank {
        Rank::Baron => RankRequirements {
            territories: 0,
            influence: 0,
            achievements: 0,
            required_achievement: None,
        },
        Rank::Viscount => RankRequirements {
            territories: 2,
            influence: 2_500,
            achievements: 5,
            required_achievement: None,
        },
        Rank::Count => RankRequirements {
            territories: 4,
            influence: 10_000,
            achievements: 10,
            required_achievement: None,
        },
        Rank::Marquess => RankRequirements {
            territories: 6,
            influence: 50_000,
            achievements: 15,
            required_achievement: None,
        },
        Rank::Duke => RankRequirements {
            territories: 8,
            influence: 200_000,
            achievements: 18,
            required_achievement: None,
        },
        Rank::King => RankRequirements {
            territories: 10,
            influence: 1_000_000,
            achievements: 22,
            required_achievement: Some(ROYAL_CAPITAL_ACHIEVEMENT),
        },
    }
}

/// Experience multiplier conferred by holding a rank.
pub const fn experience_multiplier(rank: Rank) -> Decimal {
    match rank {
        Rank::Baron => Decimal::ONE,
        Rank::Viscount => Decimal::from_parts(12, 0, 0, false, 1), // 1.2
        Rank::Count => Decimal::from_parts(15, 0, 0, false, 1),    // 1.5
        Rank::Marquess => Decimal::TWO,
        Rank::Duke => Decimal::from_parts(25, 0, 0, false, 1), // 2.5
        Rank::King => Decimal::from_parts(3, 0, 0, false, 0),
    }
}

/// One-time payout issued when transitioning *into* a rank.
///
/// Scaled to the rank's territory requirement
/// (`gold = 1000 * (territories / 2)`, `influence = 500 * (territories / 2)`,
/// flat 2000 experience), with an enormous special case for reaching King.
/// Baron is the starting rank and is never transitioned into.
pub const fn transition_reward(rank: Rank) -> RewardBundle {
    match rank {
        Rank::Baron => RewardBundle::NONE,
        Rank::Viscount => RewardBundle::new(1_000, 500, 2_000),
        Rank::Count => RewardBundle::new(2_000, 1_000, 2_000),
        Rank::Marquess => RewardBundle::new(3_000, 1_500, 2_000),
        Rank::Duke => RewardBundle::new(4_000, 2_000, 2_000),
        Rank::King => RewardBundle::new(1_000_000, 500_000, 10_000),
    }
}

/// Whether the profile currently satisfies a rank's requirements.
pub fn meets_requirements(profile: &PlayerProfile, rank: Rank) -> bool {
    let req = requirements(rank);
    profile.stats.territories_owned >= req.territories
        && profile.stats.total_influence >= req.influence
        && profile.achievements.total >= req.achievements
        && req
            .required_achievement
            .is_none_or(|id| profile.achievements.completed.contains(id))
}

/// A single rank transition that fired during a progress check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankAdvance {
    /// The rank transitioned into.
    pub rank: Rank,
    /// The payout issued for the transition.
    pub reward: RewardBundle,
    /// Experience actually credited by the payout (after multipliers).
    pub experience: ExperienceGain,
}

/// Advance the profile while the next rank's requirements are met.
///
/// Each step refreshes the rank multiplier, issues that step's payout
/// through the ledger and experience calculator, and appends a title
/// record. The payout itself credits influence, so a step can unlock the
/// one after it; the loop runs to the fixed point (bounded by the ladder
/// length).
pub fn check_progress(
    profile: &mut PlayerProfile,
    config: &ProgressionConfig,
) -> Result<Vec<RankAdvance>, EngineError> {
    let mut advances = Vec::new();

    while let Some(next) = profile.rank.next() {
        if !meets_requirements(profile, next) {
            break;
        }

        profile.rank = next;
        experience::refresh_multipliers(profile)?;

        let reward = transition_reward(next);
        ledger::add(profile, reward.resource_delta())?;
        let gain = experience::add_experience(profile, reward.experience, config)?;
        profile.titles.push(TitleRecord::for_rank(next));

        tracing::debug!(
            player = %profile.name,
            rank = %next,
            gold = reward.gold,
            influence = reward.influence,
            "rank transition"
        );

        advances.push(RankAdvance {
            rank: next,
            reward,
            experience: gain,
        });
    }

    Ok(advances)
}

/// Administrative reset: the only sanctioned rank regression.
///
/// Multipliers are refreshed to match the new rank; titles, balances, and
/// achievement state are untouched. Test and support tooling only.
pub fn admin_reset_rank(profile: &mut PlayerProfile, rank: Rank) -> Result<(), EngineError> {
    tracing::warn!(player = %profile.name, from = %profile.rank, to = %rank, "administrative rank reset");
    profile.rank = rank;
    experience::refresh_multipliers(profile)
}
