//! Debounced snapshot writer.
//!
//! Progression mutations can arrive several times a second (every task
//! tick queues a snapshot), but the store only needs the latest state.
//! The saver coalesces a burst into a single write: it waits for a
//! quiescence window after the last queued snapshot and then persists
//! only the newest one. A crash inside the window loses at most that
//! burst, which the game accepts.

use std::time::Duration;

use regent_engine::SnapshotSink;
use regent_types::PlayerProfile;
use tokio::sync::mpsc;

use crate::store::ProfileStore;

/// Spawns the background write task and hands out [`SaverHandle`]s.
#[derive(Debug, Clone, Copy)]
pub struct DebouncedSaver;

impl DebouncedSaver {
    /// Default quiescence window before a snapshot is written.
    pub const DEFAULT_WINDOW: Duration = Duration::from_secs(2);

    /// Spawn the writer task over a store.
    ///
    /// The task runs until every handle is dropped, then flushes the last
    /// pending snapshot (if any) and exits. Write failures are logged and
    /// never retried; the in-memory profile is the source of truth.
    pub fn spawn<S: ProfileStore>(store: S, window: Duration) -> SaverHandle {
        let (tx, mut rx) = mpsc::unbounded_channel::<PlayerProfile>();

        tokio::spawn(async move {
            while let Some(mut latest) = rx.recv().await {
                loop {
                    match tokio::time::timeout(window, rx.recv()).await {
                        // Newer snapshot within the window; restart it.
                        Ok(Some(newer)) => latest = newer,
                        // Senders gone; flush and exit.
                        Ok(None) => {
                            write_snapshot(&store, &latest).await;
                            return;
                        }
                        // Quiet for a full window; write.
                        Err(_) => break,
                    }
                }
                write_snapshot(&store, &latest).await;
            }
        });

        SaverHandle { tx }
    }
}

async fn write_snapshot<S: ProfileStore>(store: &S, profile: &PlayerProfile) {
    if let Err(error) = store.save(profile).await {
        tracing::error!(player = %profile.name, %error, "profile snapshot write failed");
    }
}

/// Cheap cloneable handle feeding the writer task.
#[derive(Debug, Clone)]
pub struct SaverHandle {
    tx: mpsc::UnboundedSender<PlayerProfile>,
}

impl SaverHandle {
    /// Queue a snapshot for writing. Non-blocking; never fails from the
    /// caller's perspective.
    pub fn queue(&self, profile: &PlayerProfile) {
        if self.tx.send(profile.clone()).is_err() {
            tracing::warn!(player = %profile.name, "snapshot writer has exited; dropping save");
        }
    }
}

impl SnapshotSink for SaverHandle {
    fn queue(&self, profile: &PlayerProfile) {
        Self::queue(self, profile);
    }
}
