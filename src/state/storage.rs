//! Snapshot stores
//!
//! A [`SnapshotStore`] hides where snapshots live. [`JsonFileStore`] keeps
//! the two documents as `layers.json` and `project.json` in a directory;
//! [`MemoryStore`] backs tests.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::state::snapshot::{LayersDocument, ProjectDocument, WorkspaceSnapshot};

/// Layers document file name.
pub const LAYERS_FILE: &str = "layers.json";
/// Project document file name.
pub const PROJECT_FILE: &str = "project.json";

/// Where workspace snapshots are loaded from and saved to.
pub trait SnapshotStore {
    /// Load the stored snapshot.
    ///
    /// # Returns
    /// `None` on first run, when nothing has been stored yet.
    fn load(&self) -> Result<Option<WorkspaceSnapshot>>;

    /// Persist a snapshot, replacing any previous one.
    fn save(&self, snapshot: &WorkspaceSnapshot) -> Result<()>;
}

/// Stores the snapshot as two JSON files in a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `dir`. The directory is created on first
    /// save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The store's root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn layers_path(&self) -> PathBuf {
        self.dir.join(LAYERS_FILE)
    }

    fn project_path(&self) -> PathBuf {
        self.dir.join(PROJECT_FILE)
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Option<WorkspaceSnapshot>> {
        let layers_path = self.layers_path();
        let project_path = self.project_path();
        if !layers_path.exists() || !project_path.exists() {
            return Ok(None);
        }

        let layers: LayersDocument = serde_json::from_str(&fs::read_to_string(&layers_path)?)?;
        let project: ProjectDocument = serde_json::from_str(&fs::read_to_string(&project_path)?)?;
        Ok(Some(WorkspaceSnapshot::new(layers, project)))
    }

    fn save(&self, snapshot: &WorkspaceSnapshot) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(
            self.layers_path(),
            serde_json::to_string_pretty(&snapshot.layers)?,
        )?;
        fs::write(
            self.project_path(),
            serde_json::to_string_pretty(&snapshot.project)?,
        )?;
        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: RefCell<Option<WorkspaceSnapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an existing snapshot.
    pub fn with_snapshot(snapshot: WorkspaceSnapshot) -> Self {
        Self {
            snapshot: RefCell::new(Some(snapshot)),
        }
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<WorkspaceSnapshot>> {
        Ok(self.snapshot.borrow().clone())
    }

    fn save(&self, snapshot: &WorkspaceSnapshot) -> Result<()> {
        *self.snapshot.borrow_mut() = Some(snapshot.clone());
        Ok(())
    }
}
