//! Spatial Hierarchy: Site → Building → Level
//!
//! Owns the spatial containers and enforces the elevation-interval
//! non-overlap invariant per building.

pub mod manager;

pub use manager::{ElevationValidation, LevelManager};
