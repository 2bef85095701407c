//! Scene object records
//!
//! The hierarchy core never touches object geometry beyond the position; a
//! [`SceneObject`] is just an id, a kind tag, a position, and its layer and
//! level bindings. The Z coordinate is derived from level membership and
//! rewritten only by `crate::assign`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::new_id;

/// A point in model space, meters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Same X/Y with a different Z.
    pub fn with_z(self, z: f64) -> Self {
        Self { z, ..self }
    }
}

/// A drawable object filed into the hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Object kind tag (e.g. "wall", "door"); opaque to this subsystem.
    pub kind: String,

    /// Position in model space. Z is pinned to the containing level's
    /// elevation.
    pub position: Position,

    /// Layer this object is filed into.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer_id: Option<String>,

    /// Level this object belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_id: Option<String>,

    /// Timestamp when the object was created.
    pub created_at: DateTime<Utc>,

    /// Timestamp of last modification.
    pub updated_at: DateTime<Utc>,
}

impl SceneObject {
    /// Create a new object record at `position`.
    pub fn new(name: impl Into<String>, kind: impl Into<String>, position: Position) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            name: name.into(),
            kind: kind.into(),
            position,
            layer_id: None,
            level_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Clone this object with a fresh id and timestamps. Used by level
    /// copying; bindings are cleared so the coordinator can re-attach the
    /// clone.
    pub fn duplicate(&self) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            name: self.name.clone(),
            kind: self.kind.clone(),
            position: self.position,
            layer_id: self.layer_id.clone(),
            level_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh the modification timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Partial update applied through `ObjectStore::update`.
///
/// Deliberately excludes `level_id` and `position.z`: those are owned by the
/// assignment coordinator so object elevation has a single source of truth.
#[derive(Debug, Clone, Default)]
pub struct ObjectPatch {
    pub name: Option<String>,
    pub kind: Option<String>,
    /// New X/Y position; Z is preserved.
    pub xy: Option<(f64, f64)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_factory() {
        let obj = SceneObject::new("Wall 1", "wall", Position::new(1.0, 2.0, 0.0));
        assert_eq!(obj.kind, "wall");
        assert_eq!(obj.position, Position::new(1.0, 2.0, 0.0));
        assert!(obj.layer_id.is_none());
        assert!(obj.level_id.is_none());
    }

    #[test]
    fn test_duplicate_gets_fresh_id_and_clears_level() {
        let mut obj = SceneObject::new("Wall 1", "wall", Position::new(1.0, 2.0, 0.0));
        obj.level_id = Some("level-1".to_string());
        obj.layer_id = Some("layer-1".to_string());

        let copy = obj.duplicate();
        assert_ne!(copy.id, obj.id);
        assert_eq!(copy.position, obj.position);
        assert_eq!(copy.layer_id.as_deref(), Some("layer-1"));
        assert!(copy.level_id.is_none());
    }

    #[test]
    fn test_with_z_keeps_xy() {
        let pos = Position::new(1.0, 2.0, 0.0).with_z(6.0);
        assert_eq!(pos, Position::new(1.0, 2.0, 6.0));
    }
}
