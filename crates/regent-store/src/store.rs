//! The profile persistence contract.

use std::future::Future;

use regent_types::PlayerProfile;

use crate::error::StoreError;

/// A backing store for player profile snapshots.
///
/// Implementations key snapshots by the profile's display name; saving a
/// name twice replaces the earlier snapshot. Save futures must be `Send`
/// so the debounced writer can run them off the caller's task.
pub trait ProfileStore: Send + Sync + 'static {
    /// Persist one snapshot, replacing any existing one for the name.
    fn save(
        &self,
        profile: &PlayerProfile,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Load the snapshot for a profile name, `None` if none exists.
    fn load(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<PlayerProfile>, StoreError>> + Send;
}
