//! Debounced writer behavior under virtual time.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use regent_store::{DebouncedSaver, MemoryStore, ProfileStore, StoreError};
use regent_types::PlayerProfile;

/// A store whose saves always fail, counting the attempts.
#[derive(Debug, Default, Clone)]
struct BrokenStore {
    attempts: Arc<AtomicU64>,
}

impl ProfileStore for BrokenStore {
    async fn save(&self, _profile: &PlayerProfile) -> Result<(), StoreError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Io(std::io::Error::other("disk full")))
    }

    async fn load(&self, _name: &str) -> Result<Option<PlayerProfile>, StoreError> {
        Ok(None)
    }
}

#[tokio::test(start_paused = true)]
async fn rapid_queues_collapse_into_one_write_of_the_latest() {
    let store = MemoryStore::default();
    let handle = DebouncedSaver::spawn(store.clone(), Duration::from_secs(2));

    let mut profile = PlayerProfile::new("Aldric");
    for level in 1..=5 {
        profile.level = level;
        handle.queue(&profile);
    }

    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(store.writes(), 1);
    let loaded = store.load("Aldric").await.unwrap().unwrap();
    assert_eq!(loaded.level, 5);
}

#[tokio::test(start_paused = true)]
async fn a_fresh_burst_after_quiescence_writes_again() {
    let store = MemoryStore::default();
    let handle = DebouncedSaver::spawn(store.clone(), Duration::from_secs(2));
    let mut profile = PlayerProfile::new("Aldric");

    handle.queue(&profile);
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(store.writes(), 1);

    profile.level = 3;
    handle.queue(&profile);
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(store.writes(), 2);
    let loaded = store.load("Aldric").await.unwrap().unwrap();
    assert_eq!(loaded.level, 3);
}

#[tokio::test(start_paused = true)]
async fn steady_queueing_inside_the_window_defers_the_write() {
    let store = MemoryStore::default();
    let handle = DebouncedSaver::spawn(store.clone(), Duration::from_secs(2));
    let profile = PlayerProfile::new("Aldric");

    // Queue every second; the two-second window never elapses.
    for _ in 0..5 {
        handle.queue(&profile);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
    assert_eq!(store.writes(), 0);

    // Going quiet lets the write through.
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(store.writes(), 1);
}

#[tokio::test(start_paused = true)]
async fn write_failure_is_logged_not_retried() {
    let store = BrokenStore::default();
    let handle = DebouncedSaver::spawn(store.clone(), Duration::from_millis(100));
    let profile = PlayerProfile::new("Aldric");

    handle.queue(&profile);
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(store.attempts.load(Ordering::SeqCst), 1);

    // The writer stays alive for later snapshots.
    handle.queue(&profile);
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(store.attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn dropping_every_handle_flushes_the_pending_snapshot() {
    let store = MemoryStore::default();
    let handle = DebouncedSaver::spawn(store.clone(), Duration::from_secs(60));

    let mut profile = PlayerProfile::new("Aldric");
    profile.level = 7;
    handle.queue(&profile);
    drop(handle);

    // The flush needs no window to elapse, only the task to run.
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(store.writes(), 1);
    let loaded = store.load("Aldric").await.unwrap().unwrap();
    assert_eq!(loaded.level, 7);
}
