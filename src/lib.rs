//! Agent History library
//!
//! Version history for generated agent profiles: snapshots of the wizard form,
//! line and word level diffs between any two of them, a changelog, selective
//! merging and patch export.

pub mod backend;
pub mod config;
pub mod constant;
pub mod form;
pub mod generator;
pub mod history;
pub mod logging;
pub mod render;
pub mod session;
pub mod snapshot;
pub mod template;

pub use backend::{FileStore, KeyValueStore, MemoryStore, SnapshotStore, StoreError};
pub use form::{FileMap, FormData};
pub use generator::{AgentFileGenerator, FileGenerator};
pub use session::{CompareSession, FormHost, SnapshotRef, StaticForm};
pub use snapshot::{Snapshot, SnapshotSource};
