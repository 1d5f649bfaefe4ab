//! Progression state must survive a process restart: a reward issued in
//! one session is never issued again after the snapshot is reloaded.

#![allow(clippy::unwrap_used)]

use regent_engine::{DependencyResolver, PathCatalog, ProgressionConfig};
use regent_store::{JsonFileStore, ProfileStore};
use regent_types::PlayerProfile;

#[tokio::test]
async fn path_rewards_are_issued_once_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let config = ProgressionConfig::default();

    // First session: complete the opening path and persist the snapshot.
    let gold_after_first = {
        let store = JsonFileStore::new(dir.path());
        let resolver = DependencyResolver::new(PathCatalog::standard()).unwrap();
        let mut profile = PlayerProfile::new("Aldric");
        let completed = resolver
            .check_and_complete(&mut profile, &[], "tutorial_welcome", &config)
            .unwrap();
        assert!(completed);
        store.save(&profile).await.unwrap();
        profile.resources.gold
    };
    assert_eq!(gold_after_first, 100);

    // Second session: a fresh store and resolver over the loaded
    // snapshot. The reward marker came back with the profile, so the
    // already-completed path pays nothing.
    let store = JsonFileStore::new(dir.path());
    let resolver = DependencyResolver::new(PathCatalog::standard()).unwrap();
    let mut profile = store.load("Aldric").await.unwrap().unwrap();
    assert!(resolver.is_rewarded(&profile, "tutorial_welcome"));

    let completed = resolver
        .check_and_complete(&mut profile, &[], "tutorial_welcome", &config)
        .unwrap();
    assert!(!completed);
    assert_eq!(profile.resources.gold, gold_after_first);

    // A full rescan moves the chain forward without re-paying the
    // opener: first_task completes off the carried-over experience.
    let rescanned = resolver.scan(&mut profile, &[], &config).unwrap();
    assert_eq!(rescanned, vec![String::from("tutorial_first_task")]);
    assert_eq!(profile.resources.gold, 250);
}
