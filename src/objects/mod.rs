//! Object Store
//!
//! The flat collection of scene objects the hierarchy core coordinates
//! against. This is the narrow collaborator interface the managers consume:
//! add/remove/update plus listing filtered by layer or level. Geometry
//! beyond the position never enters this subsystem.

use std::collections::HashMap;

use crate::error::{DraftError, Result};
use crate::model::{ObjectPatch, Position, SceneObject};

/// Owns the flat scene object collection.
#[derive(Debug, Default)]
pub struct ObjectStore {
    objects: HashMap<String, SceneObject>,
}

impl ObjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the store.
    ///
    /// # Returns
    /// The id of the added object.
    pub fn add(&mut self, object: SceneObject) -> String {
        let id = object.id.clone();
        self.objects.insert(id.clone(), object);
        id
    }

    /// Remove an object by id.
    ///
    /// # Returns
    /// The removed object, or `None` if not found.
    pub fn remove(&mut self, id: &str) -> Option<SceneObject> {
        self.objects.remove(id)
    }

    /// Get an object by id.
    pub fn get(&self, id: &str) -> Option<&SceneObject> {
        self.objects.get(id)
    }

    /// Apply a partial update to an object and refresh its timestamp.
    ///
    /// The patch cannot touch level binding or Z; those go through
    /// `crate::assign` so object elevation has a single source of truth.
    pub fn update(&mut self, id: &str, patch: ObjectPatch) -> Result<&SceneObject> {
        let object = self
            .objects
            .get_mut(id)
            .ok_or_else(|| DraftError::not_found("Object", id))?;

        if let Some(name) = patch.name {
            object.name = name;
        }
        if let Some(kind) = patch.kind {
            object.kind = kind;
        }
        if let Some((x, y)) = patch.xy {
            object.position.x = x;
            object.position.y = y;
        }
        object.touch();
        Ok(&*object)
    }

    /// Iterate over all objects in arbitrary order.
    pub fn list(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.values()
    }

    /// All objects filed into the given layer.
    pub fn list_by_layer<'a>(&'a self, layer_id: &'a str) -> impl Iterator<Item = &'a SceneObject> {
        self.objects
            .values()
            .filter(move |o| o.layer_id.as_deref() == Some(layer_id))
    }

    /// All objects belonging to the given level.
    pub fn list_by_level<'a>(&'a self, level_id: &'a str) -> impl Iterator<Item = &'a SceneObject> {
        self.objects
            .values()
            .filter(move |o| o.level_id.as_deref() == Some(level_id))
    }

    /// Number of objects in the store.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Check whether an id resolves to an object.
    pub fn contains(&self, id: &str) -> bool {
        self.objects.contains_key(id)
    }

    /// Replace the whole collection. Used by snapshot loading.
    pub fn replace_all(&mut self, objects: Vec<SceneObject>) {
        self.objects = objects.into_iter().map(|o| (o.id.clone(), o)).collect();
    }

    /// Snapshot the collection as a vector. Used by snapshot saving.
    pub fn to_vec(&self) -> Vec<SceneObject> {
        self.objects.values().cloned().collect()
    }

    // Crate-internal mutable access for the assignment coordinator.
    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut SceneObject> {
        self.objects.get_mut(id)
    }
}
