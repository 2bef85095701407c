//! Layer records and the derived layer tree node
//!
//! A [`Layer`] is a named, colored visibility/lock group objects are filed
//! into. Layers form a forest via `parent_id`; the tree view is derived,
//! never stored (see `crate::layers::tree`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::new_id;

/// Default display color for new layers
pub const DEFAULT_LAYER_COLOR: &str = "#808080";

/// A single layer record in the flat layer collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Unique identifier.
    pub id: String,

    /// Display name, unique case-insensitively across all layers.
    pub name: String,

    /// Display color as `#RRGGBB`.
    pub color: String,

    /// Own visibility flag. Effective visibility also requires every
    /// ancestor to be visible.
    pub visible: bool,

    /// Own lock flag. Effective lock is true if any ancestor is locked.
    pub locked: bool,

    /// Parent layer id; `None` for roots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// Sibling sort key; ties broken by creation time.
    pub order: i32,

    /// Exactly one layer in the system carries this flag. It is created at
    /// initialization, never deletable, and always a root.
    #[serde(default)]
    pub is_default: bool,

    /// Timestamp when the layer was created.
    pub created_at: DateTime<Utc>,

    /// Timestamp of last modification.
    pub updated_at: DateTime<Utc>,
}

impl Layer {
    /// Create a new layer record with freshly stamped id and timestamps.
    pub fn new(name: impl Into<String>, opts: LayerOptions) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            name: name.into(),
            color: opts
                .color
                .unwrap_or_else(|| DEFAULT_LAYER_COLOR.to_string()),
            visible: opts.visible.unwrap_or(true),
            locked: opts.locked.unwrap_or(false),
            parent_id: opts.parent_id,
            order: opts.order.unwrap_or(0),
            is_default: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh the modification timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Optional fields for layer creation.
#[derive(Debug, Clone, Default)]
pub struct LayerOptions {
    pub color: Option<String>,
    pub visible: Option<bool>,
    pub locked: Option<bool>,
    pub parent_id: Option<String>,
    /// Sibling sort key; defaults to max existing order + 1.
    pub order: Option<i32>,
}

/// Partial update applied through `LayerManager::update_layer`.
#[derive(Debug, Clone, Default)]
pub struct LayerPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub visible: Option<bool>,
    pub locked: Option<bool>,
    pub order: Option<i32>,
    /// Only meaningful on the default layer, where clearing it is rejected.
    pub is_default: Option<bool>,
}

/// Node in the materialized layer tree.
///
/// Derived from the flat layer collection by grouping on `parent_id` and
/// sorting each sibling group by `order`; rebuilt on every read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerNode {
    /// The layer record at this node.
    pub layer: Layer,
    /// Child nodes, sorted by `order`.
    pub children: Vec<LayerNode>,
    /// Distance from the root (roots have depth 0).
    pub depth: usize,
}

impl LayerNode {
    /// Total number of layers in this subtree, including this node.
    pub fn subtree_size(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|c| c.subtree_size())
            .sum::<usize>()
    }

    /// Find a node by layer id (recursive).
    pub fn find(&self, id: &str) -> Option<&LayerNode> {
        if self.layer.id == id {
            return Some(self);
        }
        for child in &self.children {
            if let Some(found) = child.find(id) {
                return Some(found);
            }
        }
        None
    }
}
