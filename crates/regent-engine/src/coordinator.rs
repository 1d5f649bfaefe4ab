//! The progression coordinator: the single entry point through which the
//! host mutates a profile.
//!
//! Every mutation funnels through [`ProgressionCoordinator::apply`],
//! which performs the requested change and then drives the downstream
//! systems to a fixed point: achievement scans, path scans, and rank
//! checks each pay rewards that can satisfy one another, so the cascade
//! repeats until a pass completes nothing. Rank is never set anywhere
//! else; eligibility is only ever re-checked here after a mutation.
//!
//! Collaborators (catalogs, config, notifier, snapshot sink) are injected
//! at construction. The coordinator holds no global state.

use std::sync::Arc;

use regent_types::{
    AchievementCategory, NotificationKind, PlayerProfile, Rank, ResourceDelta, Territory,
};

use crate::achievements::AchievementRegistry;
use crate::config::ProgressionConfig;
use crate::error::EngineError;
use crate::experience;
use crate::ledger;
use crate::notify::Notifier;
use crate::paths::DependencyResolver;
use crate::rank;
use crate::territory;

// ---------------------------------------------------------------------------
// Snapshot sink
// ---------------------------------------------------------------------------

/// Receives profile snapshots for persistence.
///
/// `queue` must be non-blocking and infallible from the caller's view;
/// implementations log their own failures. The in-memory profile is never
/// rolled back on a persistence failure.
pub trait SnapshotSink: Send + Sync {
    /// Hand off the latest snapshot. Fire-and-forget.
    fn queue(&self, profile: &PlayerProfile);
}

/// A sink that discards snapshots. For hosts that persist elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl SnapshotSink for NullSink {
    fn queue(&self, _profile: &PlayerProfile) {}
}

// ---------------------------------------------------------------------------
// Actions and outcomes
// ---------------------------------------------------------------------------

/// A mutation request against the active profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressionAction {
    /// Credit resources through the ledger.
    AddResources(ResourceDelta),
    /// Debit resources through the ledger (clamped at zero).
    RemoveResources(ResourceDelta),
    /// Grant base experience, scaled by the profile's multipliers.
    AddExperience(u64),
    /// Grant experience for a completed diary task.
    AddTaskExperience {
        /// Task duration in minutes.
        duration_minutes: u64,
        /// Completed as part of a combo.
        combo: bool,
        /// Completed during a special time window.
        special_time: bool,
    },
    /// Complete a specific achievement by ID (event-driven trigger).
    CompleteAchievement(String),
    /// Bump a category's mastery progress counter.
    RecordCategoryProgress(AchievementCategory),
    /// Record a diary task completion for streak bookkeeping.
    RecordTaskCompletion {
        /// Whether this completion continues yesterday's streak.
        continues_streak: bool,
    },
    /// Recompute owned-territory stats from the current records.
    SyncTerritories,
}

/// What an [`ProgressionCoordinator::apply`] call changed, for the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionOutcome {
    /// Levels gained across the mutation and its cascade.
    pub levels_gained: u32,
    /// Ranks advanced into, in order.
    pub ranks_gained: Vec<Rank>,
    /// Achievement IDs completed, in completion order.
    pub achievements_completed: Vec<String>,
    /// Path IDs completed, in completion order.
    pub paths_completed: Vec<String>,
}

impl ActionOutcome {
    /// Whether the action changed nothing the UI would announce.
    pub fn is_quiet(&self) -> bool {
        self.levels_gained == 0
            && self.ranks_gained.is_empty()
            && self.achievements_completed.is_empty()
            && self.paths_completed.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Coordinator
// ---------------------------------------------------------------------------

/// Drives all progression mutations and their cascades.
pub struct ProgressionCoordinator {
    registry: AchievementRegistry,
    resolver: DependencyResolver,
    config: ProgressionConfig,
    notifier: Arc<dyn Notifier>,
    sink: Arc<dyn SnapshotSink>,
}

impl ProgressionCoordinator {
    /// Build a coordinator over validated catalogs.
    ///
    /// The achievement catalog is validated here; the resolver validates
    /// its own prerequisite graph at construction.
    pub fn new(
        registry: AchievementRegistry,
        resolver: DependencyResolver,
        config: ProgressionConfig,
        notifier: Arc<dyn Notifier>,
        sink: Arc<dyn SnapshotSink>,
    ) -> Result<Self, EngineError> {
        registry.validate()?;
        Ok(Self {
            registry,
            resolver,
            config,
            notifier,
            sink,
        })
    }

    /// The active configuration.
    pub const fn config(&self) -> &ProgressionConfig {
        &self.config
    }

    /// The path resolver and its catalog.
    pub const fn resolver(&self) -> &DependencyResolver {
        &self.resolver
    }

    /// Create a fresh Baron profile.
    ///
    /// Multipliers are normalized to the starting level and rank so the
    /// very first grant already uses the level-1 factor. Loaded profiles
    /// need no registration step: completion membership and reward
    /// markers travel inside the snapshot.
    pub fn create_profile(&self, name: &str) -> Result<PlayerProfile, EngineError> {
        let mut profile = PlayerProfile::new(name);
        experience::refresh_multipliers(&mut profile)?;
        self.sink.queue(&profile);
        tracing::debug!(player = name, "profile created");
        Ok(profile)
    }

    /// Apply one action and run the progression cascade to a fixed point.
    ///
    /// On success the snapshot is queued on the sink and notifications
    /// are emitted for everything newly completed. On error the profile
    /// may retain the direct mutation but no partial cascade rewards.
    pub fn apply(
        &self,
        profile: &mut PlayerProfile,
        territories: &[Territory],
        action: ProgressionAction,
    ) -> Result<ActionOutcome, EngineError> {
        let level_before = profile.level;
        let mut outcome = ActionOutcome::default();

        self.mutate(profile, territories, action, &mut outcome)?;
        self.cascade(profile, territories, &mut outcome)?;

        outcome.levels_gained = profile.level.saturating_sub(level_before);

        self.announce(profile, &outcome);
        self.sink.queue(profile);
        Ok(outcome)
    }

    /// Perform the direct mutation an action requests.
    fn mutate(
        &self,
        profile: &mut PlayerProfile,
        territories: &[Territory],
        action: ProgressionAction,
        outcome: &mut ActionOutcome,
    ) -> Result<(), EngineError> {
        match action {
            ProgressionAction::AddResources(delta) => ledger::add(profile, delta)?,
            ProgressionAction::RemoveResources(delta) => ledger::remove(profile, delta),
            ProgressionAction::AddExperience(base) => {
                experience::add_experience(profile, base, &self.config)?;
            }
            ProgressionAction::AddTaskExperience {
                duration_minutes,
                combo,
                special_time,
            } => {
                experience::add_task_experience(
                    profile,
                    duration_minutes,
                    combo,
                    special_time,
                    &self.config,
                )?;
            }
            ProgressionAction::CompleteAchievement(id) => {
                if self.registry.complete(profile, &id, &self.config)? {
                    outcome.achievements_completed.push(id);
                }
            }
            ProgressionAction::RecordCategoryProgress(category) => {
                let mastered = self
                    .registry
                    .record_category_progress(profile, category, &self.config)?
                    .map(|entry| String::from(entry.id));
                if let Some(id) = mastered {
                    outcome.achievements_completed.push(id);
                }
            }
            ProgressionAction::RecordTaskCompletion { continues_streak } => {
                profile.stats.task_streak = if continues_streak {
                    profile
                        .stats
                        .task_streak
                        .checked_add(1)
                        .ok_or_else(|| EngineError::overflow("task streak"))?
                } else {
                    1
                };
            }
            ProgressionAction::SyncTerritories => {
                profile.stats.territories_owned = territory::count(territories);
            }
        }
        Ok(())
    }

    /// Re-run achievement, path, and rank checks until nothing changes.
    ///
    /// Every completion is monotone (sets only grow, rank only rises), so
    /// the loop terminates; the iteration cap is a safety net against a
    /// catalog bug, not an expected exit.
    fn cascade(
        &self,
        profile: &mut PlayerProfile,
        territories: &[Territory],
        outcome: &mut ActionOutcome,
    ) -> Result<(), EngineError> {
        let cap = self
            .registry
            .len()
            .saturating_add(self.resolver.catalog().len())
            .saturating_add(Rank::ALL.len())
            .saturating_add(1);

        for _ in 0..cap {
            let achieved: Vec<String> = self
                .registry
                .evaluate(profile, territories, &self.config)?
                .into_iter()
                .map(|entry| String::from(entry.id))
                .collect();
            let pathed = self.resolver.scan(profile, territories, &self.config)?;
            let advances = rank::check_progress(profile, &self.config)?;

            let quiet = achieved.is_empty() && pathed.is_empty() && advances.is_empty();

            outcome.achievements_completed.extend(achieved);
            outcome.paths_completed.extend(pathed);
            outcome
                .ranks_gained
                .extend(advances.into_iter().map(|a| a.rank));

            if quiet {
                return Ok(());
            }
        }

        tracing::warn!(player = %profile.name, "progression cascade hit iteration cap");
        Ok(())
    }

    /// Emit notifications for everything an outcome reports.
    fn announce(&self, profile: &PlayerProfile, outcome: &ActionOutcome) {
        for id in &outcome.achievements_completed {
            let message = self
                .registry
                .get(id)
                .map(|entry| entry.description)
                .unwrap_or_default();
            self.notifier
                .notify(NotificationKind::Achievement, "Achievement unlocked", message);
        }
        for id in &outcome.paths_completed {
            if let Some(spec) = self.resolver.catalog().get(id) {
                self.notifier
                    .notify(NotificationKind::PathComplete, spec.title, "Path complete");
            }
        }
        for advanced in &outcome.ranks_gained {
            self.notifier.notify(
                NotificationKind::RankAdvance,
                advanced.display_name(),
                "You have risen in the peerage",
            );
        }
        if outcome.levels_gained > 0 {
            self.notifier.notify(
                NotificationKind::LevelUp,
                "Level up",
                &format!("Now level {}", profile.level),
            );
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::notify::testing::RecordingNotifier;
    use crate::paths::PathCatalog;
    use regent_types::TerritoryKind;
    use std::sync::Mutex;

    /// Counts snapshot hand-offs and keeps the latest profile name.
    #[derive(Debug, Default)]
    struct RecordingSink {
        queued: Mutex<Vec<String>>,
    }

    impl RecordingSink {
        fn count(&self) -> usize {
            self.queued.lock().map(|q| q.len()).unwrap_or_default()
        }
    }

    impl SnapshotSink for RecordingSink {
        fn queue(&self, profile: &PlayerProfile) {
            if let Ok(mut queued) = self.queued.lock() {
                queued.push(profile.name.clone());
            }
        }
    }

    fn coordinator() -> (
        ProgressionCoordinator,
        Arc<RecordingNotifier>,
        Arc<RecordingSink>,
    ) {
        let notifier = Arc::new(RecordingNotifier::default());
        let sink = Arc::new(RecordingSink::default());
        let resolver = DependencyResolver::new(PathCatalog::standard()).unwrap();
        let coordinator = ProgressionCoordinator::new(
            AchievementRegistry::standard(),
            resolver,
            ProgressionConfig::default(),
            Arc::clone(&notifier) as Arc<dyn Notifier>,
            Arc::clone(&sink) as Arc<dyn SnapshotSink>,
        )
        .unwrap();
        (coordinator, notifier, sink)
    }

    fn fresh_profile(c: &ProgressionCoordinator) -> PlayerProfile {
        c.create_profile("Aldric").unwrap()
    }

    #[test]
    fn create_profile_normalizes_multipliers_and_queues_a_save() {
        let (c, _, sink) = coordinator();
        let p = fresh_profile(&c);
        // Level 1 factor, not the unit placeholder.
        assert_eq!(p.multipliers.level.to_string(), "1.05");
        assert_eq!(sink.count(), 1);
    }

    #[test]
    fn first_experience_grant_walks_the_tutorial_opening() {
        let (c, notifier, sink) = coordinator();
        let mut p = fresh_profile(&c);

        let outcome = c
            .apply(&mut p, &[], ProgressionAction::AddExperience(10))
            .unwrap();
        assert!(!outcome.is_quiet());

        // Welcome completes unconditionally; its payout means experience
        // is nonzero, so the first-task step follows in the same cascade.
        assert_eq!(
            outcome.paths_completed,
            vec![
                String::from("tutorial_welcome"),
                String::from("tutorial_first_task"),
            ]
        );
        assert!(outcome.achievements_completed.is_empty());
        assert!(outcome.ranks_gained.is_empty());

        let events = notifier.events();
        let path_events: Vec<_> = events
            .iter()
            .filter(|(kind, _, _)| *kind == NotificationKind::PathComplete)
            .collect();
        assert_eq!(path_events.len(), 2);

        // One save at creation, one after the apply.
        assert_eq!(sink.count(), 2);
    }

    #[test]
    fn territory_sync_cascades_into_a_promotion() {
        let (c, notifier, _) = coordinator();
        let mut p = fresh_profile(&c);
        p.stats.total_influence = 2_500;
        for i in 0..5u32 {
            p.achievements.completed.insert(format!("chronicle_{i}"));
        }
        p.achievements.total = 5;

        let holdings = vec![
            Territory::new(TerritoryKind::Village),
            Territory::new(TerritoryKind::Farmland),
        ];
        let outcome = c
            .apply(&mut p, &holdings, ProgressionAction::SyncTerritories)
            .unwrap();

        // Owning land completes the first-territory achievement, pushing
        // the achievement count past the gate; the rank check then fires.
        assert!(outcome
            .achievements_completed
            .contains(&String::from("first_territory")));
        assert_eq!(outcome.ranks_gained, vec![Rank::Viscount]);
        assert_eq!(p.rank, Rank::Viscount);
        assert_eq!(p.titles.len(), 1);

        assert!(notifier
            .events()
            .iter()
            .any(|(kind, title, _)| *kind == NotificationKind::RankAdvance
                && title == "Viscount"));
    }

    #[test]
    fn quiet_action_reports_nothing_and_still_saves() {
        let (c, notifier, sink) = coordinator();
        let mut p = fresh_profile(&c);
        // Consume the unconditional tutorial opener first.
        let _ = c.apply(&mut p, &[], ProgressionAction::AddExperience(10));
        let before = notifier.events().len();

        let outcome = c
            .apply(
                &mut p,
                &[],
                ProgressionAction::RemoveResources(ResourceDelta::gold(100_000)),
            )
            .unwrap();
        assert!(outcome.is_quiet());
        assert_eq!(notifier.events().len(), before);
        assert_eq!(sink.count(), 3);
    }

    #[test]
    fn unknown_achievement_id_is_an_error() {
        let (c, _, _) = coordinator();
        let mut p = fresh_profile(&c);
        let result = c.apply(
            &mut p,
            &[],
            ProgressionAction::CompleteAchievement(String::from("no_such_entry")),
        );
        assert!(matches!(result, Err(EngineError::UnknownAchievement(_))));
    }

    #[test]
    fn streak_bookkeeping_feeds_the_diligence_achievements() {
        let (c, _, _) = coordinator();
        let mut p = fresh_profile(&c);
        let _ = c.apply(&mut p, &[], ProgressionAction::AddExperience(1));

        for _ in 0..7 {
            let outcome = c
                .apply(
                    &mut p,
                    &[],
                    ProgressionAction::RecordTaskCompletion {
                        continues_streak: true,
                    },
                )
                .unwrap();
            if p.stats.task_streak == 7 {
                assert!(outcome
                    .achievements_completed
                    .contains(&String::from("dedicated_diarist")));
            }
        }
        assert_eq!(p.stats.task_streak, 7);

        // A broken streak resets to one.
        let _ = c.apply(
            &mut p,
            &[],
            ProgressionAction::RecordTaskCompletion {
                continues_streak: false,
            },
        );
        assert_eq!(p.stats.task_streak, 1);
    }

    #[test]
    fn level_up_emits_a_single_notification_per_apply() {
        let (c, notifier, _) = coordinator();
        let mut p = fresh_profile(&c);
        let _ = c.apply(&mut p, &[], ProgressionAction::AddExperience(1));

        let outcome = c
            .apply(&mut p, &[], ProgressionAction::AddExperience(5_000))
            .unwrap();
        assert!(outcome.levels_gained >= 1);

        let level_ups = notifier
            .events()
            .iter()
            .filter(|(kind, _, _)| *kind == NotificationKind::LevelUp)
            .count();
        assert_eq!(level_ups, 1);
    }
}
