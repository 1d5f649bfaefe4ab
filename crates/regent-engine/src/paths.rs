//! Progression paths and quests: the prerequisite DAG and one-time
//! reward resolution.
//!
//! The original content encoded prerequisites as per-path conditional
//! chains; here the graph is explicit data, validated at load time
//! (every prerequisite must exist, and a topological sort must consume
//! every node), so a path that could never unlock is a startup error
//! instead of a silent-stuck state.
//!
//! Reward issuance is guarded by a marker set kept *separate* from
//! completion membership: a completion that was recorded but whose
//! payout failed can be retried without paying twice. Markers live on
//! the profile itself (`paths.rewarded`), so they persist and reload
//! with the snapshot and the at-most-once guarantee holds across
//! sessions.

use std::collections::{BTreeMap, BTreeSet};

use regent_types::{PlayerProfile, Rank, RewardBundle, Territory};

use crate::config::ProgressionConfig;
use crate::error::EngineError;
use crate::experience;
use crate::ledger;
use crate::territory;

/// A pure completion condition over the profile and territory records.
pub type Condition = fn(&PlayerProfile, &[Territory]) -> bool;

/// Content grouping for a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PathCategory {
    /// The guided linear onboarding sequence.
    Onboarding,
    /// Trade and wealth side content.
    Commerce,
    /// Territorial and military side content.
    Dominion,
    /// Influence and rank side content.
    Court,
}

/// Threshold gates a path requires beyond its prerequisite paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathRequirement {
    /// Minimum rank, if any.
    pub rank: Option<Rank>,
    /// Minimum spendable gold.
    pub min_gold: u64,
    /// Minimum lifetime influence.
    pub min_influence: u64,
    /// Minimum territories owned.
    pub min_territories: u32,
}

impl PathRequirement {
    /// No gates at all.
    pub const NONE: Self = Self {
        rank: None,
        min_gold: 0,
        min_influence: 0,
        min_territories: 0,
    };

    /// Whether the profile and holdings satisfy every gate.
    pub fn is_met(&self, profile: &PlayerProfile, territories: &[Territory]) -> bool {
        self.rank.is_none_or(|r| profile.rank >= r)
            && profile.resources.gold >= self.min_gold
            && profile.stats.total_influence >= self.min_influence
            && territory::count(territories) >= self.min_territories
    }
}

/// A static path/quest catalog entry. Immutable at runtime.
#[derive(Debug, Clone, Copy)]
pub struct PathSpec {
    /// Stable identifier, also the completion and reward-marker key.
    pub id: &'static str,
    /// Display title shown in notifications.
    pub title: &'static str,
    /// Content grouping.
    pub category: PathCategory,
    /// Whether this step belongs to the mandatory onboarding sequence.
    pub is_tutorial: bool,
    /// Paths that must be completed first.
    pub requires: &'static [&'static str],
    /// Threshold gates beyond the prerequisites.
    pub requirement: PathRequirement,
    /// Live-state completion condition.
    pub condition: Condition,
    /// One-time payout on completion.
    pub reward: RewardBundle,
}

// ---------------------------------------------------------------------------
// PathCatalog
// ---------------------------------------------------------------------------

/// The loaded path catalog.
#[derive(Debug, Clone)]
pub struct PathCatalog {
    paths: Vec<PathSpec>,
}

impl PathCatalog {
    /// Build the standard catalog: the five-step tutorial chain plus
    /// optional side content hooked into it.
    pub fn standard() -> Self {
        let paths = vec![
            // --- Tutorial chain ---
            PathSpec {
                id: "tutorial_welcome",
                title: "Welcome to the Court",
                category: PathCategory::Onboarding,
                is_tutorial: true,
                requires: &[],
                requirement: PathRequirement::NONE,
                condition: |_, _| true,
                reward: RewardBundle::new(100, 50, 100),
            },
            PathSpec {
                id: "tutorial_first_task",
                title: "A Day's Work",
                category: PathCategory::Onboarding,
                is_tutorial: true,
                requires: &["tutorial_welcome"],
                requirement: PathRequirement::NONE,
                condition: |p, _| p.level > 1 || p.experience > 0,
                reward: RewardBundle::new(150, 50, 150),
            },
            PathSpec {
                id: "tutorial_first_territory",
                title: "Land of Your Own",
                category: PathCategory::Onboarding,
                is_tutorial: true,
                requires: &["tutorial_first_task"],
                requirement: PathRequirement::NONE,
                condition: |_, t| territory::count(t) >= 1,
                reward: RewardBundle::new(300, 100, 200),
            },
            PathSpec {
                id: "tutorial_steward",
                title: "The Steward's Lesson",
                category: PathCategory::Onboarding,
                is_tutorial: true,
                requires: &["tutorial_first_territory"],
                requirement: PathRequirement::NONE,
                condition: |_, t| territory::count_at_level(t, 2) >= 1,
                reward: RewardBundle::new(500, 200, 300),
            },
            PathSpec {
                id: "tutorial_court_debut",
                title: "Debut at Court",
                category: PathCategory::Onboarding,
                is_tutorial: true,
                requires: &["tutorial_steward"],
                requirement: PathRequirement {
                    rank: Some(Rank::Viscount),
                    ..PathRequirement::NONE
                },
                condition: |_, _| true,
                reward: RewardBundle::new(1_000, 500, 500),
            },
            // --- Side content ---
            PathSpec {
                id: "merchant_prince",
                title: "Merchant Prince",
                category: PathCategory::Commerce,
                is_tutorial: false,
                requires: &["tutorial_first_territory"],
                requirement: PathRequirement {
                    min_gold: 50_000,
                    ..PathRequirement::NONE
                },
                condition: |_, t| {
                    territory::count_of_kind(t, regent_types::TerritoryKind::Town) >= 2
                },
                reward: RewardBundle::new(5_000, 2_000, 2_000),
            },
            PathSpec {
                id: "master_of_tides",
                title: "Master of the Tides",
                category: PathCategory::Commerce,
                is_tutorial: false,
                requires: &["merchant_prince"],
                requirement: PathRequirement::NONE,
                condition: |_, t| {
                    territory::count_of_kind(t, regent_types::TerritoryKind::Port) >= 2
                },
                reward: RewardBundle::new(8_000, 3_000, 3_000),
            },
            PathSpec {
                id: "iron_grip",
                title: "An Iron Grip",
                category: PathCategory::Dominion,
                is_tutorial: false,
                requires: &["tutorial_steward"],
                requirement: PathRequirement::NONE,
                condition: |_, t| {
                    territory::count_of_kind(t, regent_types::TerritoryKind::Fortress) >= 2
                },
                reward: RewardBundle::new(6_000, 2_500, 2_500),
            },
            PathSpec {
                id: "voice_of_the_realm",
                title: "Voice of the Realm",
                category: PathCategory::Court,
                is_tutorial: false,
                requires: &["tutorial_court_debut"],
                requirement: PathRequirement {
                    min_influence: 25_000,
                    ..PathRequirement::NONE
                },
                condition: |_, _| true,
                reward: RewardBundle::new(4_000, 4_000, 2_000),
            },
            PathSpec {
                id: "crown_in_reach",
                title: "The Crown in Reach",
                category: PathCategory::Court,
                is_tutorial: false,
                requires: &["voice_of_the_realm", "iron_grip"],
                requirement: PathRequirement {
                    rank: Some(Rank::Duke),
                    ..PathRequirement::NONE
                },
                condition: |_, t| {
                    territory::owns_kind(t, regent_types::TerritoryKind::Capital)
                },
                reward: RewardBundle::new(50_000, 25_000, 10_000),
            },
        ];

        Self { paths }
    }

    /// Construct a catalog from explicit entries (tests, custom content).
    pub fn from_paths(paths: Vec<PathSpec>) -> Self {
        Self { paths }
    }

    /// Validate the prerequisite graph: every referenced ID must exist
    /// and a topological sort (Kahn's algorithm) must consume every node.
    pub fn validate(&self) -> Result<(), EngineError> {
        let ids: BTreeSet<&str> = self.paths.iter().map(|p| p.id).collect();

        for path in &self.paths {
            for prereq in path.requires {
                if !ids.contains(prereq) {
                    return Err(EngineError::UnknownPrerequisite {
                        path: String::from(path.id),
                        prerequisite: String::from(*prereq),
                    });
                }
            }
        }

        // Kahn's algorithm over the prerequisite edges.
        let mut in_degree: BTreeMap<&str, usize> =
            self.paths.iter().map(|p| (p.id, p.requires.len())).collect();
        let mut dependents: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for path in &self.paths {
            for prereq in path.requires {
                dependents.entry(prereq).or_default().push(path.id);
            }
        }

        let mut queue: Vec<&str> = in_degree
            .iter()
            .filter(|(_, d)| **d == 0)
            .map(|(id, _)| *id)
            .collect();
        let mut resolved = 0usize;

        while let Some(id) = queue.pop() {
            resolved = resolved.saturating_add(1);
            for dependent in dependents.get(id).map(Vec::as_slice).unwrap_or_default() {
                if let Some(degree) = in_degree.get_mut(dependent) {
                    *degree = degree.saturating_sub(1);
                    if *degree == 0 {
                        queue.push(dependent);
                    }
                }
            }
        }

        if resolved < self.paths.len() {
            let stuck: Vec<String> = in_degree
                .iter()
                .filter(|(_, d)| **d > 0)
                .map(|(id, _)| String::from(*id))
                .collect();
            return Err(EngineError::CyclicPrerequisites(stuck));
        }

        Ok(())
    }

    /// Look up a path by ID.
    pub fn get(&self, id: &str) -> Option<&PathSpec> {
        self.paths.iter().find(|p| p.id == id)
    }

    /// Iterate over paths in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &PathSpec> {
        self.paths.iter()
    }

    /// Number of catalog entries.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<'a> IntoIterator for &'a PathCatalog {
    type Item = &'a PathSpec;
    type IntoIter = std::slice::Iter<'a, PathSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

// ---------------------------------------------------------------------------
// DependencyResolver
// ---------------------------------------------------------------------------

/// Evaluates path availability and issues one-time rewards.
///
/// The resolver itself is stateless beyond the catalog: completion
/// membership and reward markers both live on the profile, so whatever
/// persists the profile persists the at-most-once guarantee with it.
#[derive(Debug, Clone)]
pub struct DependencyResolver {
    catalog: PathCatalog,
}

impl DependencyResolver {
    /// Create a resolver over a validated catalog.
    ///
    /// Fails fast on unknown or cyclic prerequisites.
    pub fn new(catalog: PathCatalog) -> Result<Self, EngineError> {
        catalog.validate()?;
        Ok(Self { catalog })
    }

    /// The underlying catalog.
    pub const fn catalog(&self) -> &PathCatalog {
        &self.catalog
    }

    /// Whether a path can currently be attempted: not yet completed, and
    /// every prerequisite completed. Unknown IDs are simply unavailable.
    pub fn is_available(&self, profile: &PlayerProfile, id: &str) -> bool {
        let Some(spec) = self.catalog.get(id) else {
            return false;
        };
        if profile.paths.completed.contains(id) {
            return false;
        }
        spec.requires
            .iter()
            .all(|prereq| profile.paths.completed.contains(*prereq))
    }

    /// Whether a path's reward has been issued to this profile.
    pub fn is_rewarded(&self, profile: &PlayerProfile, id: &str) -> bool {
        profile.paths.rewarded.contains(id)
    }

    /// Evaluate one path and complete it if its gates and condition hold.
    ///
    /// Returns `Ok(true)` only when the path transitioned to completed in
    /// this call. The reward is issued at most once per profile lifetime:
    /// an already-completed path with a missing marker (a payout that
    /// failed mid-flight) is paid here without re-completing.
    pub fn check_and_complete(
        &self,
        profile: &mut PlayerProfile,
        territories: &[Territory],
        id: &str,
        config: &ProgressionConfig,
    ) -> Result<bool, EngineError> {
        let spec = *self
            .catalog
            .get(id)
            .ok_or_else(|| EngineError::UnknownPath(String::from(id)))?;

        let mut newly_completed = false;
        if !profile.paths.completed.contains(id) {
            if !self.is_available(profile, id)
                || !spec.requirement.is_met(profile, territories)
                || !(spec.condition)(profile, territories)
            {
                return Ok(false);
            }
            profile.paths.completed.insert(String::from(id));
            newly_completed = true;
            tracing::debug!(player = %profile.name, path = id, "path completed");
        }

        if !profile.paths.rewarded.contains(id) {
            ledger::add(profile, spec.reward.resource_delta())?;
            experience::add_experience(profile, spec.reward.experience, config)?;
            profile.paths.rewarded.insert(String::from(id));
        }

        Ok(newly_completed)
    }

    /// Evaluate every available path once, in catalog order.
    ///
    /// Returns the IDs of paths completed by this pass. The coordinator
    /// runs this after each mutation; a completion inside the pass can
    /// unlock a later catalog entry within the same pass.
    pub fn scan(
        &self,
        profile: &mut PlayerProfile,
        territories: &[Territory],
        config: &ProgressionConfig,
    ) -> Result<Vec<String>, EngineError> {
        let ids: Vec<&'static str> = self.catalog.iter().map(|p| p.id).collect();
        let mut completed = Vec::new();
        for id in ids {
            if self.check_and_complete(profile, territories, id, config)? {
                completed.push(String::from(id));
            }
        }
        Ok(completed)
    }
}
