//! Draftspace - BIM/CAD Workbench Hierarchy Core
//!
//! The organizational backbone of a drafting workbench:
//! - Layer hierarchy: a forest of visibility/lock groups with ancestor
//!   inheritance, cycle-free reparenting, and a single default layer
//! - Level hierarchy: Site → Building → Level containment with
//!   non-overlapping elevation ranges and top-down cascade deletion
//! - Object assignment: the sole owner of layer/level bindings and the
//!   Z coordinate derived from level membership
//!
//! # Architecture
//!
//! Managers own flat entity collections; tree views and statistics are
//! derived on every read. Mutations validate first and apply second, so a
//! returned error always means the model is unchanged. Every mutation
//! notifies subscribers with a fine-grained event followed by a coarse
//! `Changed` event.

pub mod assign;
pub mod error;
pub mod events;
pub mod layers;
pub mod levels;
pub mod model;
pub mod objects;
pub mod state;
pub mod validation;

pub mod cli;

pub use error::{DraftError, Result};
