//! Enumeration types for the Regent progression engine.
//!
//! Covers the noble rank ladder, territory kinds, achievement categories,
//! and the notification kinds emitted to the frontend toast layer.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Rank
// ---------------------------------------------------------------------------

/// A noble rank on the six-step ladder.
///
/// Ranks are strictly ordered; the derived [`Ord`] follows declaration
/// order, so `Rank::Baron < Rank::King` holds. A player's rank only ever
/// moves forward through this order (no skipping, no regression outside
/// explicit administrative reset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Rank {
    /// Starting rank for every new profile.
    Baron,
    /// Second rank.
    Viscount,
    /// Third rank.
    Count,
    /// Fourth rank.
    Marquess,
    /// Fifth rank.
    Duke,
    /// Terminal rank.
    King,
}

impl Rank {
    /// All ranks in ladder order.
    pub const ALL: [Self; 6] = [
        Self::Baron,
        Self::Viscount,
        Self::Count,
        Self::Marquess,
        Self::Duke,
        Self::King,
    ];

    /// Zero-based position on the ladder (Baron = 0, King = 5).
    pub const fn index(self) -> usize {
        match self {
            Self::Baron => 0,
            Self::Viscount => 1,
            Self::Count => 2,
            Self::Marquess => 3,
            Self::Duke => 4,
            Self::King => 5,
        }
    }

    /// The next rank up the ladder, or `None` at [`Rank::King`].
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Baron => Some(Self::Viscount),
            Self::Viscount => Some(Self::Count),
            Self::Count => Some(Self::Marquess),
            Self::Marquess => Some(Self::Duke),
            Self::Duke => Some(Self::King),
            Self::King => None,
        }
    }

    /// Human-readable title used in notifications and title records.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Baron => "Baron",
            Self::Viscount => "Viscount",
            Self::Count => "Count",
            Self::Marquess => "Marquess",
            Self::Duke => "Duke",
            Self::King => "King",
        }
    }
}

impl core::fmt::Display for Rank {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.display_name())
    }
}

// ---------------------------------------------------------------------------
// TerritoryKind
// ---------------------------------------------------------------------------

/// The kind of a territory on the player's demesne.
///
/// Territory records are owned by the frontend's territory collaborator;
/// the engine only reads them for achievement predicates and rank gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum TerritoryKind {
    /// Basic settlement.
    Village,
    /// Food-producing land.
    Farmland,
    /// Trading settlement.
    Town,
    /// Ore-producing works.
    Mine,
    /// Coastal trading hub.
    Port,
    /// Military stronghold.
    Fortress,
    /// Seat of a noble house.
    Castle,
    /// The royal capital; owning one gates the King rank.
    Capital,
}

impl TerritoryKind {
    /// All territory kinds, in catalog order.
    pub const ALL: [Self; 8] = [
        Self::Village,
        Self::Farmland,
        Self::Town,
        Self::Mine,
        Self::Port,
        Self::Fortress,
        Self::Castle,
        Self::Capital,
    ];
}

// ---------------------------------------------------------------------------
// AchievementCategory
// ---------------------------------------------------------------------------

/// Grouping for achievements and their per-category progress counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum AchievementCategory {
    /// Territory acquisition and development.
    Territory,
    /// Gold accumulation.
    Wealth,
    /// Influence accumulation.
    Influence,
    /// Level and experience milestones.
    Progression,
    /// Diary/task discipline (streaks, repeated completions).
    Diligence,
}

impl AchievementCategory {
    /// All categories, in catalog order.
    pub const ALL: [Self; 5] = [
        Self::Territory,
        Self::Wealth,
        Self::Influence,
        Self::Progression,
        Self::Diligence,
    ];
}

// ---------------------------------------------------------------------------
// NotificationKind
// ---------------------------------------------------------------------------

/// Category tag on a fire-and-forget notification.
///
/// The frontend toast layer maps these to styling; the engine never waits
/// on delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum NotificationKind {
    /// An achievement was completed.
    Achievement,
    /// The player advanced to a new rank.
    RankAdvance,
    /// A progression path or quest was completed.
    PathComplete,
    /// The player gained one or more levels.
    LevelUp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_order_is_ladder_order() {
        assert!(Rank::Baron < Rank::Viscount);
        assert!(Rank::Viscount < Rank::Count);
        assert!(Rank::Count < Rank::Marquess);
        assert!(Rank::Marquess < Rank::Duke);
        assert!(Rank::Duke < Rank::King);
    }

    #[test]
    fn rank_next_walks_the_ladder() {
        let mut rank = Rank::Baron;
        let mut steps = 0;
        while let Some(next) = rank.next() {
            assert_eq!(next.index(), rank.index() + 1);
            rank = next;
            steps += 1;
        }
        assert_eq!(rank, Rank::King);
        assert_eq!(steps, 5);
    }

    #[test]
    fn king_is_terminal() {
        assert_eq!(Rank::King.next(), None);
    }

    #[test]
    fn rank_indices_match_all_order() {
        for (i, rank) in Rank::ALL.iter().enumerate() {
            assert_eq!(rank.index(), i);
        }
    }

    #[test]
    fn rank_serde_roundtrip() {
        for rank in Rank::ALL {
            let json = serde_json::to_string(&rank).ok();
            assert!(json.is_some());
            let back: Result<Rank, _> = serde_json::from_str(json.as_deref().unwrap_or(""));
            assert_eq!(back.ok(), Some(rank));
        }
    }

    #[test]
    fn territory_kinds_are_distinct() {
        let mut seen = std::collections::BTreeSet::new();
        for kind in TerritoryKind::ALL {
            assert!(seen.insert(kind));
        }
        assert_eq!(seen.len(), 8);
    }
}
