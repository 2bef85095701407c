//! Layer Hierarchy Manager
//!
//! All layer mutations go through this manager: it validates first, applies
//! second, then notifies subscribers, so a returned error always means the
//! collection is unchanged. Effective visibility and lock are recomputed
//! from the ancestor chain on every query because an ancestor mutation does
//! not rewrite descendant records.

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{DraftError, Result};
use crate::events::{EventBus, LayerEvent, SubscriptionId};
use crate::model::{Layer, LayerNode, LayerOptions, LayerPatch};
use crate::validation::{validate_hex_color, validate_name};

use super::tree;

/// Names of the category layers seeded alongside the default layer on first
/// run.
pub const SEED_CATEGORY_LAYERS: [&str; 5] = ["Walls", "Doors", "Windows", "Furniture", "Annotations"];

/// Name of the default layer.
pub const DEFAULT_LAYER_NAME: &str = "Default";

/// Aggregate statistics over the layer collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerStats {
    /// Total number of layers.
    pub total: usize,
    /// Layers whose own visibility flag is set.
    pub visible: usize,
    /// Layers whose own lock flag is set.
    pub locked: usize,
    /// Depth of the deepest tree node (roots are depth 0).
    pub max_depth: usize,
}

/// UI-facing layer state snapshot, distinct from full entity persistence.
///
/// `expanded_layer_ids` is owned by the presentation layer; the manager only
/// passes it through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerUiState {
    pub visible_layer_ids: Vec<String>,
    pub locked_layer_ids: Vec<String>,
    pub active_layer_id: Option<String>,
    #[serde(default)]
    pub expanded_layer_ids: Vec<String>,
}

/// Owns the layer collection and the active-layer pointer.
#[derive(Debug)]
pub struct LayerManager {
    layers: HashMap<String, Layer>,
    active_layer_id: Option<String>,
    bus: EventBus<LayerEvent>,
}

impl Default for LayerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerManager {
    /// Create an empty manager with no layers. Most callers want
    /// [`LayerManager::with_defaults`] instead.
    pub fn new() -> Self {
        Self {
            layers: HashMap::new(),
            active_layer_id: None,
            bus: EventBus::new(),
        }
    }

    /// Create a manager seeded with the default layer set: one root
    /// "Default" layer (active) plus the named category layers.
    pub fn with_defaults() -> Self {
        let mut manager = Self::new();

        let mut default_layer = Layer::new(DEFAULT_LAYER_NAME, LayerOptions::default());
        default_layer.is_default = true;
        let default_id = default_layer.id.clone();
        manager.layers.insert(default_id.clone(), default_layer);
        manager.active_layer_id = Some(default_id);

        for (i, name) in SEED_CATEGORY_LAYERS.iter().enumerate() {
            let layer = Layer::new(
                *name,
                LayerOptions {
                    order: Some(i as i32 + 1),
                    ..Default::default()
                },
            );
            manager.layers.insert(layer.id.clone(), layer);
        }

        manager
    }

    /// Rebuild a manager from persisted parts. If the recorded active layer
    /// no longer resolves, the default layer becomes active.
    pub fn from_parts(layers: Vec<Layer>, active_layer_id: Option<String>) -> Self {
        let layers: HashMap<String, Layer> =
            layers.into_iter().map(|l| (l.id.clone(), l)).collect();
        let active_layer_id = active_layer_id
            .filter(|id| layers.contains_key(id))
            .or_else(|| {
                layers
                    .values()
                    .find(|l| l.is_default)
                    .map(|l| l.id.clone())
            });
        Self {
            layers,
            active_layer_id,
            bus: EventBus::new(),
        }
    }

    /// Snapshot the collection and active pointer for persistence.
    pub fn to_parts(&self) -> (Vec<Layer>, Option<String>) {
        (
            self.layers.values().cloned().collect(),
            self.active_layer_id.clone(),
        )
    }

    // === Queries ===

    /// Get a layer by id.
    pub fn get_layer(&self, id: &str) -> Option<&Layer> {
        self.layers.get(id)
    }

    /// Find a layer by name, case-insensitively.
    pub fn find_layer_by_name(&self, name: &str) -> Option<&Layer> {
        self.layers
            .values()
            .find(|l| l.name.eq_ignore_ascii_case(name))
    }

    /// Number of layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// The default layer. Present in any seeded or loaded collection.
    pub fn default_layer(&self) -> Option<&Layer> {
        self.layers.values().find(|l| l.is_default)
    }

    /// Id of the current drawing target layer.
    pub fn active_layer_id(&self) -> Option<&str> {
        self.active_layer_id.as_deref()
    }

    /// Materialize the layer forest from the flat collection.
    pub fn layer_tree(&self) -> Vec<LayerNode> {
        tree::build_layer_tree(&self.layers)
    }

    /// The full descendant-id closure of a layer (excluding itself).
    pub fn descendant_ids(&self, id: &str) -> Vec<String> {
        tree::descendant_ids(&self.layers, id)
    }

    /// Effective visibility: a layer is visible iff it and every ancestor up
    /// to its root have `visible = true`.
    pub fn is_layer_visible(&self, id: &str) -> bool {
        let mut current = self.layers.get(id);
        while let Some(layer) = current {
            if !layer.visible {
                return false;
            }
            current = layer.parent_id.as_deref().and_then(|p| self.layers.get(p));
        }
        true
    }

    /// Effective lock: a layer is locked iff it or any ancestor has
    /// `locked = true`.
    pub fn is_layer_locked(&self, id: &str) -> bool {
        let mut current = self.layers.get(id);
        while let Some(layer) = current {
            if layer.locked {
                return true;
            }
            current = layer.parent_id.as_deref().and_then(|p| self.layers.get(p));
        }
        false
    }

    /// Aggregate statistics over the collection.
    pub fn layer_stats(&self) -> LayerStats {
        fn max_depth(nodes: &[LayerNode]) -> usize {
            nodes
                .iter()
                .map(|n| n.depth.max(max_depth(&n.children)))
                .max()
                .unwrap_or(0)
        }

        let tree = self.layer_tree();
        LayerStats {
            total: self.layers.len(),
            visible: self.layers.values().filter(|l| l.visible).count(),
            locked: self.layers.values().filter(|l| l.locked).count(),
            max_depth: max_depth(&tree),
        }
    }

    // === Mutations ===

    /// Create a root (or explicitly parented) layer.
    ///
    /// # Errors
    /// `Validation` if the name is empty, too long, collides with an
    /// existing name, or the color is malformed; `NotFound` if an explicit
    /// parent id does not resolve.
    pub fn create_layer(&mut self, name: &str, opts: LayerOptions) -> Result<Layer> {
        self.validate_new_name(name, None)?;
        if let Some(color) = &opts.color {
            validate_hex_color(color)?;
        }
        if let Some(parent_id) = &opts.parent_id {
            if !self.layers.contains_key(parent_id) {
                return Err(DraftError::not_found("Layer", parent_id.clone()));
            }
        }

        let mut opts = opts;
        if opts.order.is_none() {
            opts.order = Some(self.next_order());
        }

        let layer = Layer::new(name, opts);
        self.layers.insert(layer.id.clone(), layer.clone());

        self.bus.emit(&LayerEvent::Added(layer.clone()));
        self.bus.emit(&LayerEvent::Changed);
        Ok(layer)
    }

    /// Create a layer under `parent_id`.
    pub fn create_child_layer(
        &mut self,
        parent_id: &str,
        name: &str,
        opts: LayerOptions,
    ) -> Result<Layer> {
        if !self.layers.contains_key(parent_id) {
            return Err(DraftError::not_found("Layer", parent_id));
        }
        self.create_layer(
            name,
            LayerOptions {
                parent_id: Some(parent_id.to_string()),
                ..opts
            },
        )
    }

    /// Apply a partial update and refresh `updated_at`.
    ///
    /// # Errors
    /// `Invariant` if the patch tries to clear `is_default` on the default
    /// layer; `Validation` for bad names/colors.
    pub fn update_layer(&mut self, id: &str, patch: LayerPatch) -> Result<Layer> {
        let layer = self
            .layers
            .get(id)
            .ok_or_else(|| DraftError::not_found("Layer", id))?;

        if layer.is_default && patch.is_default == Some(false) {
            return Err(DraftError::invariant(
                "the default layer cannot lose its default status",
            ));
        }
        if let Some(name) = &patch.name {
            self.validate_new_name(name, Some(id))?;
        }
        if let Some(color) = &patch.color {
            validate_hex_color(color)?;
        }

        let layer = self.layers.get_mut(id).expect("checked above");
        if let Some(name) = patch.name {
            layer.name = name;
        }
        if let Some(color) = patch.color {
            layer.color = color;
        }
        if let Some(visible) = patch.visible {
            layer.visible = visible;
        }
        if let Some(locked) = patch.locked {
            layer.locked = locked;
        }
        if let Some(order) = patch.order {
            layer.order = order;
        }
        layer.touch();
        let updated = layer.clone();

        self.bus.emit(&LayerEvent::Updated(updated.clone()));
        self.bus.emit(&LayerEvent::Changed);
        Ok(updated)
    }

    /// Delete a layer.
    ///
    /// With `force = false` the layer must be childless, otherwise
    /// `HasChildren` is returned; with `force = true` every descendant is
    /// deleted first. The default layer can never be deleted. If the active
    /// layer is deleted, the default layer becomes active.
    pub fn delete_layer(&mut self, id: &str, force: bool) -> Result<()> {
        let layer = self
            .layers
            .get(id)
            .ok_or_else(|| DraftError::not_found("Layer", id))?;
        if layer.is_default {
            return Err(DraftError::invariant("the default layer cannot be deleted"));
        }

        let descendants = self.descendant_ids(id);
        if !descendants.is_empty() && !force {
            let child_count = self.child_ids(id).len();
            return Err(DraftError::HasChildren {
                id: id.to_string(),
                child_count,
            });
        }

        let mut removed: Vec<String> = descendants;
        removed.push(id.to_string());
        debug!("deleting layer {} ({} record(s))", id, removed.len());
        for rid in &removed {
            self.layers.remove(rid);
        }
        self.reset_active_if_gone(&removed);

        self.bus.emit(&LayerEvent::Removed { ids: removed });
        self.bus.emit(&LayerEvent::Changed);
        Ok(())
    }

    /// Delete a layer and reparent its children to the deleted layer's
    /// parent (the grandparent, or root when the layer was a root).
    pub fn delete_layer_reparent(&mut self, id: &str) -> Result<()> {
        let layer = self
            .layers
            .get(id)
            .ok_or_else(|| DraftError::not_found("Layer", id))?;
        if layer.is_default {
            return Err(DraftError::invariant("the default layer cannot be deleted"));
        }
        let grandparent = layer.parent_id.clone();

        for child_id in self.child_ids(id) {
            let child = self.layers.get_mut(&child_id).expect("child listed above");
            child.parent_id = grandparent.clone();
            child.touch();
        }
        self.layers.remove(id);
        let removed = vec![id.to_string()];
        self.reset_active_if_gone(&removed);

        self.bus.emit(&LayerEvent::Removed { ids: removed });
        self.bus.emit(&LayerEvent::Changed);
        Ok(())
    }

    /// Reparent a layer. `new_parent_id = None` makes it a root.
    ///
    /// # Errors
    /// `Cycle` if the target parent is the layer itself or any of its
    /// descendants; `Invariant` when moving the default layer under a
    /// parent.
    pub fn move_layer(&mut self, id: &str, new_parent_id: Option<&str>) -> Result<()> {
        let layer = self
            .layers
            .get(id)
            .ok_or_else(|| DraftError::not_found("Layer", id))?;

        if let Some(target) = new_parent_id {
            if layer.is_default {
                return Err(DraftError::invariant("the default layer must stay a root"));
            }
            if !self.layers.contains_key(target) {
                return Err(DraftError::not_found("Layer", target));
            }
            if target == id || self.descendant_ids(id).iter().any(|d| d == target) {
                return Err(DraftError::Cycle {
                    id: id.to_string(),
                    target: target.to_string(),
                });
            }
        }

        let layer = self.layers.get_mut(id).expect("checked above");
        layer.parent_id = new_parent_id.map(|s| s.to_string());
        layer.touch();

        self.bus.emit(&LayerEvent::Moved {
            id: id.to_string(),
            new_parent_id: new_parent_id.map(|s| s.to_string()),
        });
        self.bus.emit(&LayerEvent::Changed);
        Ok(())
    }

    /// Set a layer's own visibility flag.
    pub fn set_visibility(&mut self, id: &str, visible: bool) -> Result<()> {
        self.update_layer(
            id,
            LayerPatch {
                visible: Some(visible),
                ..Default::default()
            },
        )?;
        Ok(())
    }

    /// Toggle a layer's own visibility flag.
    ///
    /// # Returns
    /// The new flag value.
    pub fn toggle_visibility(&mut self, id: &str) -> Result<bool> {
        let current = self
            .layers
            .get(id)
            .ok_or_else(|| DraftError::not_found("Layer", id))?
            .visible;
        self.set_visibility(id, !current)?;
        Ok(!current)
    }

    /// Set a layer's own lock flag.
    pub fn set_lock(&mut self, id: &str, locked: bool) -> Result<()> {
        self.update_layer(
            id,
            LayerPatch {
                locked: Some(locked),
                ..Default::default()
            },
        )?;
        Ok(())
    }

    /// Toggle a layer's own lock flag.
    ///
    /// # Returns
    /// The new flag value.
    pub fn toggle_lock(&mut self, id: &str) -> Result<bool> {
        let current = self
            .layers
            .get(id)
            .ok_or_else(|| DraftError::not_found("Layer", id))?
            .locked;
        self.set_lock(id, !current)?;
        Ok(!current)
    }

    /// Make `id` the only visible layer.
    pub fn isolate_layer(&mut self, id: &str) -> Result<()> {
        if !self.layers.contains_key(id) {
            return Err(DraftError::not_found("Layer", id));
        }
        for layer in self.layers.values_mut() {
            layer.visible = layer.id == id;
            layer.touch();
        }
        self.bus.emit(&LayerEvent::Changed);
        Ok(())
    }

    /// Set every layer's visibility flag.
    pub fn show_all_layers(&mut self) {
        for layer in self.layers.values_mut() {
            layer.visible = true;
            layer.touch();
        }
        self.bus.emit(&LayerEvent::Changed);
    }

    /// Lock every layer except the default layer.
    pub fn lock_all_layers(&mut self) {
        for layer in self.layers.values_mut() {
            if !layer.is_default {
                layer.locked = true;
                layer.touch();
            }
        }
        self.bus.emit(&LayerEvent::Changed);
    }

    /// Clear every layer's lock flag.
    pub fn unlock_all_layers(&mut self) {
        for layer in self.layers.values_mut() {
            layer.locked = false;
            layer.touch();
        }
        self.bus.emit(&LayerEvent::Changed);
    }

    /// Make a layer the drawing target.
    ///
    /// # Errors
    /// `LockedLayer` if the target is effectively locked (own flag or any
    /// ancestor).
    pub fn set_active_layer(&mut self, id: &str) -> Result<()> {
        if !self.layers.contains_key(id) {
            return Err(DraftError::not_found("Layer", id));
        }
        if self.is_layer_locked(id) {
            return Err(DraftError::LockedLayer { id: id.to_string() });
        }
        self.active_layer_id = Some(id.to_string());

        self.bus.emit(&LayerEvent::ActiveChanged { id: id.to_string() });
        self.bus.emit(&LayerEvent::Changed);
        Ok(())
    }

    // === UI state export/import ===

    /// Export the UI-facing state snapshot. `expanded_layer_ids` is supplied
    /// by the presentation layer and passed through untouched.
    pub fn export_ui_state(&self, expanded_layer_ids: &[String]) -> LayerUiState {
        let mut visible: Vec<String> = self
            .layers
            .values()
            .filter(|l| l.visible)
            .map(|l| l.id.clone())
            .collect();
        visible.sort();
        let mut locked: Vec<String> = self
            .layers
            .values()
            .filter(|l| l.locked)
            .map(|l| l.id.clone())
            .collect();
        locked.sort();

        LayerUiState {
            visible_layer_ids: visible,
            locked_layer_ids: locked,
            active_layer_id: self.active_layer_id.clone(),
            expanded_layer_ids: expanded_layer_ids.to_vec(),
        }
    }

    /// Apply a UI state snapshot to the collection. Ids that no longer
    /// resolve are skipped.
    ///
    /// # Returns
    /// The `expanded_layer_ids` for the presentation layer to restore.
    pub fn import_ui_state(&mut self, state: LayerUiState) -> Vec<String> {
        for layer in self.layers.values_mut() {
            layer.visible = state.visible_layer_ids.contains(&layer.id);
            layer.locked = state.locked_layer_ids.contains(&layer.id);
        }
        if let Some(active) = state
            .active_layer_id
            .filter(|id| self.layers.contains_key(id))
        {
            self.active_layer_id = Some(active);
        }
        self.bus.emit(&LayerEvent::Changed);
        state.expanded_layer_ids
    }

    // === Events ===

    /// Subscribe to layer events.
    pub fn subscribe(&mut self, callback: impl Fn(&LayerEvent) + 'static) -> SubscriptionId {
        self.bus.subscribe(callback)
    }

    /// Remove a subscription.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    // === Internals ===

    fn validate_new_name(&self, name: &str, exclude_id: Option<&str>) -> Result<()> {
        validate_name(name)?;
        let collision = self.layers.values().any(|l| {
            Some(l.id.as_str()) != exclude_id && l.name.eq_ignore_ascii_case(name)
        });
        if collision {
            return Err(DraftError::validation(format!(
                "a layer named '{}' already exists",
                name
            )));
        }
        Ok(())
    }

    fn next_order(&self) -> i32 {
        self.layers.values().map(|l| l.order).max().unwrap_or(-1) + 1
    }

    fn child_ids(&self, id: &str) -> Vec<String> {
        self.layers
            .values()
            .filter(|l| l.parent_id.as_deref() == Some(id))
            .map(|l| l.id.clone())
            .collect()
    }

    fn reset_active_if_gone(&mut self, removed: &[String]) {
        if let Some(active) = &self.active_layer_id {
            if removed.contains(active) {
                self.active_layer_id = self.default_layer().map(|l| l.id.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn manager() -> LayerManager {
        LayerManager::with_defaults()
    }

    #[test]
    fn test_with_defaults_seeds_layers() {
        let mgr = manager();
        assert_eq!(mgr.layer_count(), 1 + SEED_CATEGORY_LAYERS.len());

        let default = mgr.default_layer().unwrap();
        assert!(default.is_default);
        assert!(default.parent_id.is_none());
        assert_eq!(mgr.active_layer_id(), Some(default.id.as_str()));

        for name in SEED_CATEGORY_LAYERS {
            assert!(mgr.find_layer_by_name(name).is_some());
        }
    }

    #[test]
    fn test_create_layer_assigns_next_order() {
        let mut mgr = manager();
        let a = mgr.create_layer("Structure", LayerOptions::default()).unwrap();
        let b = mgr.create_layer("MEP", LayerOptions::default()).unwrap();
        assert!(b.order > a.order);
    }

    #[test]
    fn test_create_layer_rejects_bad_names() {
        let mut mgr = manager();
        assert!(mgr.create_layer("", LayerOptions::default()).is_err());
        assert!(mgr
            .create_layer(&"x".repeat(51), LayerOptions::default())
            .is_err());

        mgr.create_layer("Structure", LayerOptions::default()).unwrap();
        // Case-insensitive collision
        let err = mgr
            .create_layer("structure", LayerOptions::default())
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_create_layer_rejects_bad_color() {
        let mut mgr = manager();
        let err = mgr
            .create_layer(
                "Structure",
                LayerOptions {
                    color: Some("#12345".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_create_child_layer_requires_parent() {
        let mut mgr = manager();
        let err = mgr
            .create_child_layer("missing", "Beams", LayerOptions::default())
            .unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");

        let parent = mgr.create_layer("Structure", LayerOptions::default()).unwrap();
        let child = mgr
            .create_child_layer(&parent.id, "Beams", LayerOptions::default())
            .unwrap();
        assert_eq!(child.parent_id.as_deref(), Some(parent.id.as_str()));
    }

    #[test]
    fn test_update_layer_refreshes_timestamp() {
        let mut mgr = manager();
        let layer = mgr.create_layer("Structure", LayerOptions::default()).unwrap();
        let updated = mgr
            .update_layer(
                &layer.id,
                LayerPatch {
                    color: Some("#FF0000".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.color, "#FF0000");
        assert!(updated.updated_at >= layer.updated_at);
    }

    #[test]
    fn test_rename_to_own_name_allowed() {
        let mut mgr = manager();
        let layer = mgr.create_layer("Structure", LayerOptions::default()).unwrap();
        assert!(mgr
            .update_layer(
                &layer.id,
                LayerPatch {
                    name: Some("STRUCTURE".to_string()),
                    ..Default::default()
                },
            )
            .is_ok());
    }

    #[test]
    fn test_default_flag_cannot_be_cleared() {
        let mut mgr = manager();
        let default_id = mgr.default_layer().unwrap().id.clone();
        let err = mgr
            .update_layer(
                &default_id,
                LayerPatch {
                    is_default: Some(false),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert_eq!(err.error_code(), "INVARIANT_ERROR");
    }

    #[test]
    fn test_delete_default_layer_rejected() {
        let mut mgr = manager();
        let default_id = mgr.default_layer().unwrap().id.clone();
        assert!(mgr.delete_layer(&default_id, true).is_err());
        assert!(mgr.delete_layer_reparent(&default_id).is_err());
    }

    #[test]
    fn test_delete_with_children_requires_force() {
        let mut mgr = manager();
        let mep = mgr.create_layer("MEP", LayerOptions::default()).unwrap();
        mgr.create_child_layer(&mep.id, "Piping", LayerOptions::default())
            .unwrap();
        mgr.create_child_layer(&mep.id, "Ducts", LayerOptions::default())
            .unwrap();

        let err = mgr.delete_layer(&mep.id, false).unwrap_err();
        match err {
            DraftError::HasChildren { child_count, .. } => assert_eq!(child_count, 2),
            other => panic!("expected HasChildren, got {:?}", other),
        }
        // Collection unchanged after the failed delete
        assert!(mgr.get_layer(&mep.id).is_some());

        mgr.delete_layer(&mep.id, true).unwrap();
        assert!(mgr.get_layer(&mep.id).is_none());
        assert!(mgr.find_layer_by_name("Piping").is_none());
        assert!(mgr.find_layer_by_name("Ducts").is_none());
    }

    #[test]
    fn test_delete_reparent_moves_children_to_grandparent() {
        let mut mgr = manager();
        let before = mgr.layer_count();
        let root = mgr.create_layer("Structure", LayerOptions::default()).unwrap();
        let mid = mgr
            .create_child_layer(&root.id, "Framing", LayerOptions::default())
            .unwrap();
        let leaf = mgr
            .create_child_layer(&mid.id, "Beams", LayerOptions::default())
            .unwrap();

        mgr.delete_layer_reparent(&mid.id).unwrap();

        assert!(mgr.get_layer(&mid.id).is_none());
        let leaf = mgr.get_layer(&leaf.id).unwrap();
        assert_eq!(leaf.parent_id.as_deref(), Some(root.id.as_str()));
        // Only the deleted layer is gone
        assert_eq!(mgr.layer_count(), before + 2);
    }

    #[test]
    fn test_delete_active_layer_resets_to_default() {
        let mut mgr = manager();
        let default_id = mgr.default_layer().unwrap().id.clone();
        let layer = mgr.create_layer("Structure", LayerOptions::default()).unwrap();
        mgr.set_active_layer(&layer.id).unwrap();

        mgr.delete_layer(&layer.id, false).unwrap();
        assert_eq!(mgr.active_layer_id(), Some(default_id.as_str()));
    }

    #[test]
    fn test_move_layer_cycle_rejected() {
        let mut mgr = manager();
        let root = mgr.create_layer("Structure", LayerOptions::default()).unwrap();
        let child = mgr
            .create_child_layer(&root.id, "Beams", LayerOptions::default())
            .unwrap();

        // Under itself
        assert!(matches!(
            mgr.move_layer(&root.id, Some(&root.id)),
            Err(DraftError::Cycle { .. })
        ));
        // Under its own descendant
        assert!(matches!(
            mgr.move_layer(&root.id, Some(&child.id)),
            Err(DraftError::Cycle { .. })
        ));
        // Parent unchanged after rejection
        assert!(mgr.get_layer(&root.id).unwrap().parent_id.is_none());
    }

    #[test]
    fn test_move_layer_to_root_and_back() {
        let mut mgr = manager();
        let a = mgr.create_layer("A", LayerOptions::default()).unwrap();
        let b = mgr.create_layer("B", LayerOptions::default()).unwrap();

        mgr.move_layer(&b.id, Some(&a.id)).unwrap();
        assert_eq!(
            mgr.get_layer(&b.id).unwrap().parent_id.as_deref(),
            Some(a.id.as_str())
        );

        mgr.move_layer(&b.id, None).unwrap();
        assert!(mgr.get_layer(&b.id).unwrap().parent_id.is_none());
    }

    #[test]
    fn test_default_layer_must_stay_root() {
        let mut mgr = manager();
        let default_id = mgr.default_layer().unwrap().id.clone();
        let other = mgr.create_layer("Other", LayerOptions::default()).unwrap();
        let err = mgr.move_layer(&default_id, Some(&other.id)).unwrap_err();
        assert_eq!(err.error_code(), "INVARIANT_ERROR");
    }

    #[test]
    fn test_effective_visibility_inherits_from_ancestors() {
        let mut mgr = manager();
        let root = mgr.create_layer("Structure", LayerOptions::default()).unwrap();
        let child = mgr
            .create_child_layer(&root.id, "Beams", LayerOptions::default())
            .unwrap();

        assert!(mgr.is_layer_visible(&child.id));

        mgr.set_visibility(&root.id, false).unwrap();
        // Own flag still true, but an ancestor is hidden
        assert!(mgr.get_layer(&child.id).unwrap().visible);
        assert!(!mgr.is_layer_visible(&child.id));

        mgr.set_visibility(&root.id, true).unwrap();
        assert!(mgr.is_layer_visible(&child.id));
    }

    #[test]
    fn test_effective_lock_is_or_over_ancestors() {
        let mut mgr = manager();
        let root = mgr.create_layer("Structure", LayerOptions::default()).unwrap();
        let child = mgr
            .create_child_layer(&root.id, "Beams", LayerOptions::default())
            .unwrap();

        assert!(!mgr.is_layer_locked(&child.id));
        mgr.set_lock(&root.id, true).unwrap();
        assert!(mgr.is_layer_locked(&child.id));
        assert!(!mgr.get_layer(&child.id).unwrap().locked);
    }

    #[test]
    fn test_isolate_layer() {
        let mut mgr = manager();
        let target = mgr.create_layer("Focus", LayerOptions::default()).unwrap();

        mgr.isolate_layer(&target.id).unwrap();

        assert!(mgr.is_layer_visible(&target.id));
        let default_id = mgr.default_layer().unwrap().id.clone();
        assert!(!mgr.is_layer_visible(&default_id));
    }

    #[test]
    fn test_bulk_show_and_lock() {
        let mut mgr = manager();
        let layer = mgr.create_layer("Structure", LayerOptions::default()).unwrap();
        mgr.set_visibility(&layer.id, false).unwrap();

        mgr.show_all_layers();
        assert!(mgr.is_layer_visible(&layer.id));

        mgr.lock_all_layers();
        let default_id = mgr.default_layer().unwrap().id.clone();
        // Default layer is skipped so drawing always has a target
        assert!(!mgr.is_layer_locked(&default_id));
        assert!(mgr.is_layer_locked(&layer.id));

        mgr.unlock_all_layers();
        assert!(!mgr.is_layer_locked(&layer.id));
    }

    #[test]
    fn test_locked_layer_cannot_become_active() {
        let mut mgr = manager();
        let layer = mgr.create_layer("Structure", LayerOptions::default()).unwrap();
        mgr.set_lock(&layer.id, true).unwrap();

        let err = mgr.set_active_layer(&layer.id).unwrap_err();
        assert_eq!(err.error_code(), "LOCKED_LAYER");

        // Ancestor lock also blocks activation
        let child = mgr
            .create_child_layer(&layer.id, "Beams", LayerOptions::default())
            .unwrap();
        assert!(mgr.set_active_layer(&child.id).is_err());
    }

    #[test]
    fn test_layer_stats() {
        let mut mgr = manager();
        let root = mgr.create_layer("Structure", LayerOptions::default()).unwrap();
        let child = mgr
            .create_child_layer(&root.id, "Beams", LayerOptions::default())
            .unwrap();
        mgr.create_child_layer(&child.id, "Steel", LayerOptions::default())
            .unwrap();
        mgr.set_lock(&root.id, true).unwrap();

        let stats = mgr.layer_stats();
        assert_eq!(stats.total, mgr.layer_count());
        assert_eq!(stats.locked, 1);
        assert_eq!(stats.max_depth, 2);
    }

    #[test]
    fn test_export_import_ui_state() {
        let mut mgr = manager();
        let a = mgr.create_layer("A", LayerOptions::default()).unwrap();
        let b = mgr.create_layer("B", LayerOptions::default()).unwrap();
        mgr.set_visibility(&a.id, false).unwrap();
        mgr.set_lock(&b.id, true).unwrap();

        let expanded = vec![a.id.clone()];
        let state = mgr.export_ui_state(&expanded);
        assert!(!state.visible_layer_ids.contains(&a.id));
        assert!(state.locked_layer_ids.contains(&b.id));
        assert_eq!(state.expanded_layer_ids, expanded);

        // Flip everything, then restore
        mgr.show_all_layers();
        mgr.unlock_all_layers();
        let restored_expanded = mgr.import_ui_state(state);

        assert!(!mgr.get_layer(&a.id).unwrap().visible);
        assert!(mgr.get_layer(&b.id).unwrap().locked);
        assert_eq!(restored_expanded, expanded);
    }

    #[test]
    fn test_events_fine_then_coarse() {
        let mut mgr = manager();
        let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        mgr.subscribe(move |event| {
            let tag = match event {
                LayerEvent::Added(_) => "added",
                LayerEvent::Updated(_) => "updated",
                LayerEvent::Removed { .. } => "removed",
                LayerEvent::Moved { .. } => "moved",
                LayerEvent::ActiveChanged { .. } => "active",
                LayerEvent::Changed => "changed",
            };
            seen_clone.borrow_mut().push(tag.to_string());
        });

        let layer = mgr.create_layer("Structure", LayerOptions::default()).unwrap();
        mgr.delete_layer(&layer.id, false).unwrap();

        assert_eq!(
            *seen.borrow(),
            vec!["added", "changed", "removed", "changed"]
        );
    }

    #[test]
    fn test_from_parts_restores_active_or_default() {
        let mgr = manager();
        let (layers, _) = mgr.to_parts();
        let default_id = mgr.default_layer().unwrap().id.clone();

        // Stale active pointer falls back to the default layer
        let restored = LayerManager::from_parts(layers, Some("stale-id".to_string()));
        assert_eq!(restored.active_layer_id(), Some(default_id.as_str()));
    }
}
