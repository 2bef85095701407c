//! Snapshot persistence
//!
//! The hierarchy core persists as two JSON documents: a layers document
//! (layer records plus the active layer id) and a project document (sites,
//! buildings, levels, objects, current-selection pointers). Storage is
//! fire-and-forget: a failed write is logged and the in-memory model keeps
//! working.

pub mod snapshot;
pub mod storage;
pub mod workspace;

pub use snapshot::{LayersDocument, ProjectDocument, WorkspaceSnapshot, SCHEMA_VERSION};
pub use storage::{JsonFileStore, MemoryStore, SnapshotStore};
pub use workspace::Workspace;
