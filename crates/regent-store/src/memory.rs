//! In-memory profile store for tests and ephemeral sessions.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use regent_types::PlayerProfile;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::store::ProfileStore;

/// A [`ProfileStore`] backed by a shared map. Clones share storage.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    profiles: Arc<RwLock<BTreeMap<String, PlayerProfile>>>,
    writes: Arc<AtomicU64>,
}

impl MemoryStore {
    /// Number of save calls observed across all clones.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }
}

impl ProfileStore for MemoryStore {
    async fn save(&self, profile: &PlayerProfile) -> Result<(), StoreError> {
        self.profiles
            .write()
            .await
            .insert(profile.name.clone(), profile.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn load(&self, name: &str) -> Result<Option<PlayerProfile>, StoreError> {
        Ok(self.profiles.read().await.get(name).cloned())
    }
}
