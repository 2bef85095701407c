//! Snapshot schema
//!
//! Serde documents mirroring the two storage keys: one for the layer
//! collection, one for the spatial project. Loading replays these arrays
//! directly into the in-memory collections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Building, Layer, Level, SceneObject, Site};

/// Current snapshot schema version.
pub const SCHEMA_VERSION: &str = "1.0";

fn default_schema_version() -> String {
    SCHEMA_VERSION.to_string()
}

/// Persisted layer state: the flat layer array plus the active layer id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayersDocument {
    /// Schema version for migration support.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// All layer records.
    #[serde(default)]
    pub layers: Vec<Layer>,

    /// The current drawing target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_layer_id: Option<String>,
}

/// Persisted spatial state: sites, buildings, levels, objects, and the
/// current-selection pointers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDocument {
    /// Schema version for migration support.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    #[serde(default)]
    pub sites: Vec<Site>,

    #[serde(default)]
    pub buildings: Vec<Building>,

    #[serde(default)]
    pub levels: Vec<Level>,

    #[serde(default)]
    pub objects: Vec<SceneObject>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_site_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_building_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_level_id: Option<String>,
}

/// A complete workspace snapshot: both documents plus the capture time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    /// When the snapshot was captured.
    pub saved_at: DateTime<Utc>,

    pub layers: LayersDocument,

    pub project: ProjectDocument,
}

impl WorkspaceSnapshot {
    /// Wrap the two documents with a fresh capture timestamp.
    pub fn new(layers: LayersDocument, project: ProjectDocument) -> Self {
        Self {
            saved_at: Utc::now(),
            layers,
            project,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LayerOptions, Position};

    #[test]
    fn test_layers_document_round_trip() {
        let doc = LayersDocument {
            schema_version: SCHEMA_VERSION.to_string(),
            layers: vec![crate::model::Layer::new("Walls", LayerOptions::default())],
            active_layer_id: None,
        };

        let json = serde_json::to_string(&doc).unwrap();
        let parsed: LayersDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.layers.len(), 1);
        assert_eq!(parsed.layers[0].name, "Walls");
    }

    #[test]
    fn test_project_document_defaults_missing_fields() {
        // A minimal document from an older writer still parses
        let parsed: ProjectDocument = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.schema_version, SCHEMA_VERSION);
        assert!(parsed.sites.is_empty());
        assert!(parsed.active_level_id.is_none());
    }

    #[test]
    fn test_snapshot_preserves_object_positions() {
        let mut object = crate::model::SceneObject::new("Wall", "wall", Position::new(1.0, 2.0, 3.0));
        object.level_id = Some("level-1".to_string());

        let project = ProjectDocument {
            schema_version: SCHEMA_VERSION.to_string(),
            sites: Vec::new(),
            buildings: Vec::new(),
            levels: Vec::new(),
            objects: vec![object],
            active_site_id: None,
            active_building_id: None,
            active_level_id: None,
        };

        let json = serde_json::to_string_pretty(&project).unwrap();
        let parsed: ProjectDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.objects[0].position, Position::new(1.0, 2.0, 3.0));
        assert_eq!(parsed.objects[0].level_id.as_deref(), Some("level-1"));
    }
}
