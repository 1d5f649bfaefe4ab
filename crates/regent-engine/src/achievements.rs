//! The achievement registry: a static catalog of pure predicates with
//! one-time rewards.
//!
//! Predicates are plain function pointers over `(profile, territories)`
//! held in tagged catalog entries, not behavior-bearing objects, so each
//! one can be unit-tested in isolation. Evaluation is deterministic
//! catalog order because rewards are cumulative: completing one entry can
//! satisfy the next predicate within the same scan. The self-referential
//! `grand_chronicler` entry ("complete everything else") sits last in the
//! catalog so its result never depends on scan ordering.
//!
//! Completion is idempotent everywhere: a second completion attempt for
//! the same ID is a silent no-op, never an error and never a second
//! payout.

use regent_types::{
    AchievementCategory, PlayerProfile, RewardBundle, Territory, TerritoryKind,
};

use crate::config::ProgressionConfig;
use crate::error::EngineError;
use crate::experience;
use crate::ledger;
use crate::territory;

/// A pure completion condition over the profile and territory records.
pub type Predicate = fn(&PlayerProfile, &[Territory]) -> bool;

/// Number of entries in the standard catalog.
const CATALOG_SIZE: u32 = 23;

/// Completion count at which `grand_chronicler` fires: every other entry.
const GRAND_CHRONICLER_THRESHOLD: u32 = CATALOG_SIZE - 1;

/// ID of the self-referential completionist achievement.
pub const GRAND_CHRONICLER: &str = "grand_chronicler";

/// A static catalog entry. Immutable at runtime.
#[derive(Debug, Clone, Copy)]
pub struct Achievement {
    /// Stable identifier, also the idempotency key.
    pub id: &'static str,
    /// Human-readable description shown in notifications.
    pub description: &'static str,
    /// Category for the caller-driven progress counters.
    pub category: AchievementCategory,
    /// Pure, side-effect-free completion condition.
    pub predicate: Predicate,
    /// One-time payout on completion.
    pub reward: RewardBundle,
}

/// ID of the mastery achievement auto-completed when a category's
/// progress counter crosses the mastery threshold.
pub const fn mastery_id(category: AchievementCategory) -> &'static str {
    match category {
        AchievementCategory::Territory => "mastery_territory",
        AchievementCategory::Wealth => "mastery_wealth",
        AchievementCategory::Influence => "mastery_influence",
        AchievementCategory::Progression => "mastery_progression",
        AchievementCategory::Diligence => "mastery_diligence",
    }
}

// ---------------------------------------------------------------------------
// AchievementRegistry
// ---------------------------------------------------------------------------

/// The loaded achievement catalog plus completion operations.
#[derive(Debug, Clone)]
pub struct AchievementRegistry {
    catalog: Vec<Achievement>,
}

impl AchievementRegistry {
    /// Build the standard catalog.
    ///
    /// Mastery entries carry an always-false predicate: their single
    /// trigger is the counter path in
    /// [`record_category_progress`](Self::record_category_progress),
    /// which reads [`ProgressionConfig::category_mastery_threshold`].
    pub fn standard() -> Self {
        let catalog: Vec<Achievement> = vec![
            // --- Territory ---
            Achievement {
                id: "first_territory",
                description: "Claim your first territory",
                category: AchievementCategory::Territory,
                predicate: |_, t| territory::count(t) >= 1,
                reward: RewardBundle::new(500, 100, 250),
            },
            Achievement {
                id: "growing_demesne",
                description: "Hold three territories",
                category: AchievementCategory::Territory,
                predicate: |_, t| territory::count(t) >= 3,
                reward: RewardBundle::new(1_000, 250, 500),
            },
            Achievement {
                id: "land_baron",
                description: "Hold five territories",
                category: AchievementCategory::Territory,
                predicate: |_, t| territory::count(t) >= 5,
                reward: RewardBundle::new(2_500, 500, 1_000),
            },
            Achievement {
                id: "realm_builder",
                description: "Hold ten territories",
                category: AchievementCategory::Territory,
                predicate: |_, t| territory::count(t) >= 10,
                reward: RewardBundle::new(10_000, 2_000, 2_500),
            },
            Achievement {
                id: "village_founder",
                description: "Hold three villages",
                category: AchievementCategory::Territory,
                predicate: |_, t| territory::count_of_kind(t, TerritoryKind::Village) >= 3,
                reward: RewardBundle::new(1_500, 300, 500),
            },
            Achievement {
                id: "castle_lord",
                description: "Hold a castle",
                category: AchievementCategory::Territory,
                predicate: |_, t| territory::owns_kind(t, TerritoryKind::Castle),
                reward: RewardBundle::new(5_000, 1_000, 1_500),
            },
            Achievement {
                id: "master_steward",
                description: "Develop three territories to level 3",
                category: AchievementCategory::Territory,
                predicate: |_, t| territory::count_at_level(t, 3) >= 3,
                reward: RewardBundle::new(4_000, 800, 1_200),
            },
            Achievement {
                id: "realm_surveyor",
                description: "Hold every kind of territory",
                category: AchievementCategory::Territory,
                predicate: |_, t| territory::owns_every_kind(t),
                reward: RewardBundle::new(20_000, 5_000, 5_000),
            },
            Achievement {
                id: "royal_capital",
                description: "Hold the royal capital",
                category: AchievementCategory::Territory,
                predicate: |_, t| territory::owns_kind(t, TerritoryKind::Capital),
                reward: RewardBundle::new(50_000, 25_000, 5_000),
            },
            // --- Wealth ---
            Achievement {
                id: "first_fortune",
                description: "Amass 10,000 gold",
                category: AchievementCategory::Wealth,
                predicate: |p, _| p.resources.gold >= 10_000,
                reward: RewardBundle::new(0, 500, 1_000),
            },
            Achievement {
                id: "treasury_master",
                description: "Amass 100,000 gold",
                category: AchievementCategory::Wealth,
                predicate: |p, _| p.resources.gold >= 100_000,
                reward: RewardBundle::new(0, 2_500, 2_500),
            },
            // --- Influence ---
            Achievement {
                id: "voice_at_court",
                description: "Earn 5,000 lifetime influence",
                category: AchievementCategory::Influence,
                predicate: |p, _| p.stats.total_influence >= 5_000,
                reward: RewardBundle::new(2_000, 0, 1_000),
            },
            Achievement {
                id: "power_broker",
                description: "Earn 100,000 lifetime influence",
                category: AchievementCategory::Influence,
                predicate: |p, _| p.stats.total_influence >= 100_000,
                reward: RewardBundle::new(10_000, 0, 2_500),
            },
            // --- Progression ---
            Achievement {
                id: "seasoned_noble",
                description: "Reach level 10",
                category: AchievementCategory::Progression,
                predicate: |p, _| p.level >= 10,
                reward: RewardBundle::new(2_000, 500, 0),
            },
            Achievement {
                id: "veteran_noble",
                description: "Reach level 25",
                category: AchievementCategory::Progression,
                predicate: |p, _| p.level >= 25,
                reward: RewardBundle::new(8_000, 2_000, 0),
            },
            // --- Diligence ---
            Achievement {
                id: "dedicated_diarist",
                description: "Keep a seven-day task streak",
                category: AchievementCategory::Diligence,
                predicate: |p, _| p.stats.task_streak >= 7,
                reward: RewardBundle::new(1_000, 250, 500),
            },
            Achievement {
                id: "unbroken_month",
                description: "Keep a thirty-day task streak",
                category: AchievementCategory::Diligence,
                predicate: |p, _| p.stats.task_streak >= 30,
                reward: RewardBundle::new(5_000, 1_000, 2_000),
            },
            // --- Category mastery ---
            Achievement {
                id: mastery_id(AchievementCategory::Territory),
                description: "Master the arts of territory",
                category: AchievementCategory::Territory,
                predicate: |_, _| false,
                reward: RewardBundle::new(3_000, 1_000, 1_500),
            },
            Achievement {
                id: mastery_id(AchievementCategory::Wealth),
                description: "Master the arts of wealth",
                category: AchievementCategory::Wealth,
                predicate: |_, _| false,
                reward: RewardBundle::new(3_000, 1_000, 1_500),
            },
            Achievement {
                id: mastery_id(AchievementCategory::Influence),
                description: "Master the arts of influence",
                category: AchievementCategory::Influence,
                predicate: |_, _| false,
                reward: RewardBundle::new(3_000, 1_000, 1_500),
            },
            Achievement {
                id: mastery_id(AchievementCategory::Progression),
                description: "Master the arts of progression",
                category: AchievementCategory::Progression,
                predicate: |_, _| false,
                reward: RewardBundle::new(3_000, 1_000, 1_500),
            },
            Achievement {
                id: mastery_id(AchievementCategory::Diligence),
                description: "Master the arts of diligence",
                category: AchievementCategory::Diligence,
                predicate: |_, _| false,
                reward: RewardBundle::new(3_000, 1_000, 1_500),
            },
            // --- Completionist; must stay last ---
            Achievement {
                id: GRAND_CHRONICLER,
                description: "Complete every other achievement",
                category: AchievementCategory::Progression,
                predicate: |p, _| p.achievements.total >= GRAND_CHRONICLER_THRESHOLD,
                reward: RewardBundle::new(100_000, 50_000, 25_000),
            },
        ];

        Self { catalog }
    }

    /// Validate catalog shape: no duplicate IDs, expected size, and the
    /// self-referential completionist entry last.
    pub fn validate(&self) -> Result<(), EngineError> {
        let mut seen = std::collections::BTreeSet::new();
        for entry in &self.catalog {
            if !seen.insert(entry.id) {
                return Err(EngineError::InvalidAchievementCatalog {
                    reason: format!("duplicate achievement id {}", entry.id),
                });
            }
        }
        if self.catalog.len() != usize::try_from(CATALOG_SIZE).unwrap_or(usize::MAX) {
            return Err(EngineError::InvalidAchievementCatalog {
                reason: format!(
                    "catalog size {} does not match expected {CATALOG_SIZE}",
                    self.catalog.len()
                ),
            });
        }
        if self.catalog.last().map(|a| a.id) != Some(GRAND_CHRONICLER) {
            return Err(EngineError::InvalidAchievementCatalog {
                reason: String::from("completionist entry must be last"),
            });
        }
        Ok(())
    }

    /// Number of catalog entries.
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    /// Whether the catalog is empty (never true for the standard catalog).
    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// Look up a catalog entry by ID.
    pub fn get(&self, id: &str) -> Option<&Achievement> {
        self.catalog.iter().find(|a| a.id == id)
    }

    /// Iterate over the catalog in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &Achievement> {
        self.catalog.iter()
    }

    /// Scan the catalog and complete every newly-satisfied achievement.
    ///
    /// Runs in catalog order; each completion applies its reward before
    /// the next predicate runs, so cumulative effects within one scan are
    /// deterministic. Returns the entries completed by this scan.
    pub fn evaluate(
        &self,
        profile: &mut PlayerProfile,
        territories: &[Territory],
        config: &ProgressionConfig,
    ) -> Result<Vec<&Achievement>, EngineError> {
        let mut newly_completed = Vec::new();

        for entry in &self.catalog {
            if profile.achievements.completed.contains(entry.id) {
                continue;
            }
            if (entry.predicate)(profile, territories) {
                self.apply_completion(profile, entry, config)?;
                newly_completed.push(entry);
            }
        }

        Ok(newly_completed)
    }

    /// Complete an achievement by ID, bypassing its predicate (used by
    /// event-driven triggers such as quest hooks and category mastery).
    ///
    /// Returns `Ok(false)` if already completed (idempotent no-op) and
    /// [`EngineError::UnknownAchievement`] for an ID not in the catalog.
    pub fn complete(
        &self,
        profile: &mut PlayerProfile,
        id: &str,
        config: &ProgressionConfig,
    ) -> Result<bool, EngineError> {
        let entry = self
            .get(id)
            .ok_or_else(|| EngineError::UnknownAchievement(String::from(id)))?;

        if profile.achievements.completed.contains(entry.id) {
            return Ok(false);
        }
        self.apply_completion(profile, entry, config)?;
        Ok(true)
    }

    /// Bump a category's caller-driven progress counter.
    ///
    /// Crossing [`ProgressionConfig::category_mastery_threshold`]
    /// auto-completes the category's mastery achievement. This trigger
    /// path shares the idempotent completion guard with the catalog scan,
    /// so reaching the milestone both ways can never double-pay.
    pub fn record_category_progress(
        &self,
        profile: &mut PlayerProfile,
        category: AchievementCategory,
        config: &ProgressionConfig,
    ) -> Result<Option<&Achievement>, EngineError> {
        let counter = profile.achievements.categories.entry(category).or_insert(0);
        *counter = counter
            .checked_add(1)
            .ok_or_else(|| EngineError::overflow("category progress counter"))?;
        let reached = *counter >= config.category_mastery_threshold;

        if reached && self.complete(profile, mastery_id(category), config)? {
            return Ok(self.get(mastery_id(category)));
        }
        Ok(None)
    }

    /// Record a completion and pay its reward.
    fn apply_completion(
        &self,
        profile: &mut PlayerProfile,
        entry: &Achievement,
        config: &ProgressionConfig,
    ) -> Result<(), EngineError> {
        profile.achievements.completed.insert(String::from(entry.id));
        profile.achievements.total = profile
            .achievements
            .total
            .checked_add(1)
            .ok_or_else(|| EngineError::overflow("achievement total"))?;

        ledger::add(profile, entry.reward.resource_delta())?;
        experience::add_experience(profile, entry.reward.experience, config)?;

        tracing::debug!(
            player = %profile.name,
            achievement = entry.id,
            total = profile.achievements.total,
            "achievement completed"
        );
        Ok(())
    }
}

impl Default for AchievementRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl<'a> IntoIterator for &'a AchievementRegistry {
    type Item = &'a Achievement;
    type IntoIter = std::slice::Iter<'a, Achievement>;

    fn into_iter(self) -> Self::IntoIter {
        self.catalog.iter()
    }
}
