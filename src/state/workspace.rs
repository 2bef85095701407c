//! Workspace Container
//!
//! Ties the managers, the object store and a snapshot store together.
//! Opening a workspace either replays the stored snapshot into the
//! in-memory collections or, on first run, seeds the default layer set.
//! Saving is fire-and-forget: a storage failure is logged and the model
//! keeps operating purely in memory.

use log::{info, warn};

use crate::error::Result;
use crate::layers::LayerManager;
use crate::levels::LevelManager;
use crate::objects::ObjectStore;
use crate::state::snapshot::{LayersDocument, ProjectDocument, WorkspaceSnapshot, SCHEMA_VERSION};
use crate::state::storage::SnapshotStore;

/// The assembled hierarchy core: one instance per open project.
///
/// Constructed explicitly and passed by reference, never a process-wide
/// singleton, so tests can build isolated instances.
pub struct Workspace<S: SnapshotStore> {
    /// Layer hierarchy.
    pub layers: LayerManager,
    /// Spatial hierarchy.
    pub levels: LevelManager,
    /// Flat object collection.
    pub objects: ObjectStore,
    store: S,
}

impl<S: SnapshotStore> Workspace<S> {
    /// Open a workspace against a store: replay the stored snapshot, or
    /// seed the default layers on first run.
    pub fn open(store: S) -> Result<Self> {
        let workspace = match store.load()? {
            Some(snapshot) => {
                info!(
                    "loaded workspace snapshot from {}",
                    snapshot.saved_at.to_rfc3339()
                );
                let mut objects = ObjectStore::new();
                objects.replace_all(snapshot.project.objects);
                Self {
                    layers: LayerManager::from_parts(
                        snapshot.layers.layers,
                        snapshot.layers.active_layer_id,
                    ),
                    levels: LevelManager::from_parts(
                        snapshot.project.sites,
                        snapshot.project.buildings,
                        snapshot.project.levels,
                        snapshot.project.active_site_id,
                        snapshot.project.active_building_id,
                        snapshot.project.active_level_id,
                    ),
                    objects,
                    store,
                }
            }
            None => {
                info!("no stored snapshot, seeding default layers");
                Self {
                    layers: LayerManager::with_defaults(),
                    levels: LevelManager::new(),
                    objects: ObjectStore::new(),
                    store,
                }
            }
        };
        Ok(workspace)
    }

    /// Capture the current in-memory state as a snapshot.
    pub fn snapshot(&self) -> WorkspaceSnapshot {
        let (layers, active_layer_id) = self.layers.to_parts();
        let (sites, buildings, levels, active_site_id, active_building_id, active_level_id) =
            self.levels.to_parts();

        WorkspaceSnapshot::new(
            LayersDocument {
                schema_version: SCHEMA_VERSION.to_string(),
                layers,
                active_layer_id,
            },
            ProjectDocument {
                schema_version: SCHEMA_VERSION.to_string(),
                sites,
                buildings,
                levels,
                objects: self.objects.to_vec(),
                active_site_id,
                active_building_id,
                active_level_id,
            },
        )
    }

    /// Persist the current state, propagating storage errors. Prefer
    /// [`Workspace::autosave`] inside mutation paths.
    pub fn save(&self) -> Result<()> {
        self.store.save(&self.snapshot())
    }

    /// Persist the current state, swallowing and logging storage errors.
    /// The in-memory model is never affected by a failed write.
    ///
    /// # Returns
    /// Whether the write succeeded.
    pub fn autosave(&self) -> bool {
        match self.save() {
            Ok(()) => true,
            Err(err) => {
                warn!("snapshot save failed, continuing in memory: {}", err);
                false
            }
        }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}
