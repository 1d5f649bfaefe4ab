//! Resource ledger: gold and influence balance mutations.
//!
//! Credits use checked arithmetic and also feed the lifetime influence
//! counter. Debits clamp at zero: callers pre-validate
//! affordability in the UI, so an excess debit is absorbed silently
//! rather than surfaced as an error. The lifetime counter is never
//! touched by debits, which is what makes it monotone.

use regent_types::{PlayerProfile, ResourceDelta};

use crate::error::EngineError;

/// Credit the profile's balances with a non-negative delta.
///
/// The influence portion also increments `stats.total_influence`, the
/// lifetime counter consulted by rank gates and achievement predicates.
/// Both balances update within the single profile mutation; there is no
/// partial application.
pub fn add(profile: &mut PlayerProfile, delta: ResourceDelta) -> Result<(), EngineError> {
    if delta.is_zero() {
        return Ok(());
    }

    let gold = profile
        .resources
        .gold
        .checked_add(delta.gold)
        .ok_or_else(|| EngineError::overflow("gold balance credit"))?;
    let influence = profile
        .resources
        .influence
        .checked_add(delta.influence)
        .ok_or_else(|| EngineError::overflow("influence balance credit"))?;
    let lifetime = profile
        .stats
        .total_influence
        .checked_add(delta.influence)
        .ok_or_else(|| EngineError::overflow("lifetime influence credit"))?;

    profile.resources.gold = gold;
    profile.resources.influence = influence;
    profile.stats.total_influence = lifetime;

    tracing::debug!(
        player = %profile.name,
        gold = delta.gold,
        influence = delta.influence,
        "resources credited"
    );

    Ok(())
}

/// Debit the profile's balances, clamping each at zero.
///
/// A debit exceeding the balance absorbs the excess silently (logged at
/// `warn!` since it usually means the caller skipped an affordability
/// check). Lifetime influence is untouched.
pub fn remove(profile: &mut PlayerProfile, delta: ResourceDelta) {
    if delta.is_zero() {
        return;
    }

    if delta.gold > profile.resources.gold || delta.influence > profile.resources.influence {
        tracing::warn!(
            player = %profile.name,
            gold_debit = delta.gold,
            gold_balance = profile.resources.gold,
            influence_debit = delta.influence,
            influence_balance = profile.resources.influence,
            "debit exceeds balance; clamping at zero"
        );
    }

    profile.resources.gold = profile.resources.gold.saturating_sub(delta.gold);
    profile.resources.influence = profile.resources.influence.saturating_sub(delta.influence);
}
