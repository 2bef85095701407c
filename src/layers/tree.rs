//! Layer tree materialization
//!
//! The layer tree is always derived from the flat layer collection, never
//! stored: grouping on `parent_id` and sorting sibling groups by `order`
//! avoids dangling child pointers when layers are deleted or reparented.

use std::collections::HashMap;

use crate::model::{Layer, LayerNode};

/// Build the layer forest from the flat collection.
///
/// Roots (layers with no parent, or whose parent id does not resolve) come
/// first-level; each sibling group is sorted by `order`, with creation time
/// and id breaking ties so the result is deterministic.
pub fn build_layer_tree(layers: &HashMap<String, Layer>) -> Vec<LayerNode> {
    let mut by_parent: HashMap<Option<&str>, Vec<&Layer>> = HashMap::new();
    for layer in layers.values() {
        let key = layer
            .parent_id
            .as_deref()
            .filter(|pid| layers.contains_key(*pid));
        by_parent.entry(key).or_default().push(layer);
    }

    build_group(&by_parent, None, 0)
}

fn build_group(
    by_parent: &HashMap<Option<&str>, Vec<&Layer>>,
    parent: Option<&str>,
    depth: usize,
) -> Vec<LayerNode> {
    let mut group: Vec<&Layer> = match by_parent.get(&parent) {
        Some(children) => children.clone(),
        None => return Vec::new(),
    };
    group.sort_by(|a, b| {
        a.order
            .cmp(&b.order)
            .then(a.created_at.cmp(&b.created_at))
            .then(a.id.cmp(&b.id))
    });

    group
        .into_iter()
        .map(|layer| LayerNode {
            children: build_group(by_parent, Some(layer.id.as_str()), depth + 1),
            layer: layer.clone(),
            depth,
        })
        .collect()
}

/// Collect the full descendant-id closure of `id` (excluding `id` itself).
///
/// This is the membership set the cycle check consults before a reparent.
pub fn descendant_ids(layers: &HashMap<String, Layer>, id: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut stack = vec![id.to_string()];

    while let Some(current) = stack.pop() {
        for layer in layers.values() {
            if layer.parent_id.as_deref() == Some(current.as_str()) {
                result.push(layer.id.clone());
                stack.push(layer.id.clone());
            }
        }
    }

    result
}
