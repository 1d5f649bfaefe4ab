//! Profile persistence for the Regent progression engine.
//!
//! The engine treats persistence as a collaborator behind two seams: the
//! [`ProfileStore`] trait for actual storage and the engine's
//! `SnapshotSink` for queueing. This crate provides both ends:
//!
//! - [`store`] -- The async [`ProfileStore`] contract.
//! - [`memory`] -- [`MemoryStore`], a shared-map store for tests and
//!   ephemeral sessions.
//! - [`file`] -- [`JsonFileStore`], one JSON snapshot per profile with
//!   temp-file-then-rename writes.
//! - [`saver`] -- [`DebouncedSaver`], a background task coalescing rapid
//!   snapshot bursts into a single write of the newest state.
//! - [`error`] -- The crate error type.
//!
//! Persistence never fails a game mutation: the [`SaverHandle`] queue is
//! fire-and-forget and write errors are logged, not retried.

pub mod error;
pub mod file;
pub mod memory;
pub mod saver;
pub mod store;

// Re-export primary types at crate root.
pub use error::StoreError;
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use saver::{DebouncedSaver, SaverHandle};
pub use store::ProfileStore;
