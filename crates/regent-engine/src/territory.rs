//! Read-only queries over the territory collaborator's records.
//!
//! Territories live outside the engine (the frontend owns purchases and
//! upgrades); achievement predicates, path conditions, and rank gates
//! only ever count and classify them.

use regent_types::{Territory, TerritoryKind};

/// Total number of territories, saturating at `u32::MAX`.
pub fn count(territories: &[Territory]) -> u32 {
    u32::try_from(territories.len()).unwrap_or(u32::MAX)
}

/// Number of territories of the given kind.
pub fn count_of_kind(territories: &[Territory], kind: TerritoryKind) -> u32 {
    u32::try_from(territories.iter().filter(|t| t.kind == kind).count()).unwrap_or(u32::MAX)
}

/// Number of territories at or above the given development level.
pub fn count_at_level(territories: &[Territory], min_level: u32) -> u32 {
    u32::try_from(territories.iter().filter(|t| t.level >= min_level).count())
        .unwrap_or(u32::MAX)
}

/// Whether at least one territory of the given kind is owned.
pub fn owns_kind(territories: &[Territory], kind: TerritoryKind) -> bool {
    territories.iter().any(|t| t.kind == kind)
}

/// Whether every territory kind is represented at least once.
pub fn owns_every_kind(territories: &[Territory]) -> bool {
    TerritoryKind::ALL.iter().all(|kind| owns_kind(territories, *kind))
}
