//! A hand-authored snapshot in the on-disk shape must load unchanged.
//!
//! This pins the wire format the browser-side storage produced: set
//! membership as JSON arrays, multiplier factors as decimal strings,
//! timestamps as RFC 3339, and enum values as bare variant names.

#![allow(clippy::unwrap_used)]

use regent_store::{JsonFileStore, ProfileStore};
use regent_types::{AchievementCategory, Rank};
use rust_decimal::Decimal;

const FIXTURE: &str = r#"{
  "name": "Aldric",
  "rank": "Viscount",
  "level": 3,
  "experience": 250,
  "experience_for_next_level": 1200,
  "multipliers": { "level": "1.15", "rank": "1.2", "bonus": "1" },
  "resources": { "gold": 1500, "influence": 400 },
  "stats": {
    "territories_owned": 2,
    "total_influence": 2600,
    "task_streak": 4,
    "special_effects": []
  },
  "achievements": {
    "completed": ["dedicated_diarist", "first_territory"],
    "total": 2,
    "categories": { "Territory": 3 }
  },
  "paths": {
    "completed": ["tutorial_welcome"],
    "rewarded": ["tutorial_welcome"]
  },
  "titles": [
    {
      "id": "0198c5a4-7e7c-7a10-b2a1-3f9d2c4e8b01",
      "name": "Viscount",
      "rank": "Viscount",
      "granted_at": "2026-08-01T12:00:00Z"
    }
  ],
  "created_at": "2026-07-01T09:30:00Z"
}"#;

#[tokio::test]
async fn persisted_snapshot_shape_loads() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Aldric.json"), FIXTURE).unwrap();

    let store = JsonFileStore::new(dir.path());
    let profile = store.load("Aldric").await.unwrap().unwrap();

    assert_eq!(profile.name, "Aldric");
    assert_eq!(profile.rank, Rank::Viscount);
    assert_eq!(profile.level, 3);
    assert_eq!(profile.experience, 250);
    assert_eq!(profile.multipliers.level, Decimal::new(115, 2));
    assert_eq!(profile.multipliers.rank, Decimal::new(12, 1));
    assert_eq!(profile.multipliers.bonus, Decimal::ONE);
    assert!(profile.achievements.completed.contains("first_territory"));
    assert!(profile.achievements.is_consistent());
    assert_eq!(
        profile
            .achievements
            .categories
            .get(&AchievementCategory::Territory),
        Some(&3)
    );
    assert!(profile.paths.completed.contains("tutorial_welcome"));
    assert!(profile.paths.rewarded.contains("tutorial_welcome"));
    assert_eq!(profile.titles.len(), 1);
    assert_eq!(profile.stats.total_influence, 2600);

    // Saving it back preserves the state exactly.
    store.save(&profile).await.unwrap();
    let reloaded = store.load("Aldric").await.unwrap().unwrap();
    assert_eq!(reloaded, profile);
}
