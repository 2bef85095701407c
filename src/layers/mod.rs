//! Layer Hierarchy
//!
//! Owns the flat layer collection, maintains the forest invariant, and
//! computes effective visibility/lock through ancestor inheritance.

pub mod manager;
pub mod tree;

pub use manager::{LayerManager, LayerStats, LayerUiState};
pub use tree::{build_layer_tree, descendant_ids};
