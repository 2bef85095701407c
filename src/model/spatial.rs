//! Spatial hierarchy records: Site → Building → Level
//!
//! A [`Level`] is a horizontal slice of a building at a given elevation and
//! height. The core invariant (enforced by `crate::levels::LevelManager`,
//! not here) is that level elevation ranges within one building never
//! overlap.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::new_id;

/// Default display color for new levels
pub const DEFAULT_LEVEL_COLOR: &str = "#4A90D9";

/// Default floor-to-ceiling height in meters
pub const DEFAULT_LEVEL_HEIGHT: f64 = 3.0;

/// Broad classification of a building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingType {
    Residential,
    Commercial,
    Industrial,
    Institutional,
    MixedUse,
}

impl Default for BuildingType {
    fn default() -> Self {
        BuildingType::Residential
    }
}

/// Intended use of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelUsage {
    Residential,
    Office,
    Retail,
    Parking,
    Mechanical,
    Storage,
    Roof,
}

impl Default for LevelUsage {
    fn default() -> Self {
        LevelUsage::Residential
    }
}

/// A geographic site containing buildings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Buildings placed on this site, in creation order.
    #[serde(default)]
    pub building_ids: Vec<String>,

    /// Site datum elevation in meters.
    pub elevation: f64,

    /// Postal address, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Latitude in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    /// Longitude in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    /// Timestamp when the site was created.
    pub created_at: DateTime<Utc>,

    /// Timestamp of last modification.
    pub updated_at: DateTime<Utc>,
}

impl Site {
    /// Create a new site record.
    pub fn new(name: impl Into<String>, opts: SiteOptions) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            name: name.into(),
            building_ids: Vec::new(),
            elevation: opts.elevation.unwrap_or(0.0),
            address: opts.address,
            latitude: opts.latitude,
            longitude: opts.longitude,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh the modification timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Optional fields for site creation.
#[derive(Debug, Clone, Default)]
pub struct SiteOptions {
    pub elevation: Option<f64>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Partial update for a site.
#[derive(Debug, Clone, Default)]
pub struct SitePatch {
    pub name: Option<String>,
    pub elevation: Option<f64>,
    pub address: Option<Option<String>>,
    pub latitude: Option<Option<f64>>,
    pub longitude: Option<Option<f64>>,
}

/// A building within a site, containing levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Owning site.
    pub site_id: String,

    /// Levels in this building, in creation order.
    #[serde(default)]
    pub level_ids: Vec<String>,

    /// Broad building classification.
    #[serde(default)]
    pub building_type: BuildingType,

    /// Timestamp when the building was created.
    pub created_at: DateTime<Utc>,

    /// Timestamp of last modification.
    pub updated_at: DateTime<Utc>,
}

impl Building {
    /// Create a new building record owned by `site_id`.
    pub fn new(
        name: impl Into<String>,
        site_id: impl Into<String>,
        building_type: BuildingType,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            name: name.into(),
            site_id: site_id.into(),
            level_ids: Vec::new(),
            building_type,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh the modification timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Partial update for a building.
#[derive(Debug, Clone, Default)]
pub struct BuildingPatch {
    pub name: Option<String>,
    pub building_type: Option<BuildingType>,
}

/// A horizontal slice of a building at a given elevation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Floor elevation in meters, relative to the site datum.
    pub elevation: f64,

    /// Floor-to-ceiling height in meters, always positive.
    pub height: f64,

    /// Ordering hint: 0 = ground, negative = below grade. Not validated for
    /// uniqueness; purely informational.
    pub level_number: i32,

    /// Intended use of the level.
    #[serde(default)]
    pub usage_type: LevelUsage,

    /// Whether the level is shown in plan views.
    #[serde(default = "default_true")]
    pub is_visible: bool,

    /// Display color as `#RRGGBB`.
    pub color: String,

    /// Owning building.
    pub building_id: String,

    /// Objects whose Z position is pinned to this level's elevation.
    #[serde(default)]
    pub object_ids: Vec<String>,

    /// Timestamp when the level was created.
    pub created_at: DateTime<Utc>,

    /// Timestamp of last modification.
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

impl Level {
    /// Create a new level record owned by `building_id`.
    pub fn new(
        name: impl Into<String>,
        building_id: impl Into<String>,
        elevation: f64,
        height: f64,
        opts: LevelOptions,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            name: name.into(),
            elevation,
            height,
            level_number: opts.level_number.unwrap_or(0),
            usage_type: opts.usage_type.unwrap_or_default(),
            is_visible: opts.is_visible.unwrap_or(true),
            color: opts
                .color
                .unwrap_or_else(|| DEFAULT_LEVEL_COLOR.to_string()),
            building_id: building_id.into(),
            object_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The level's half-open elevation range `[elevation, elevation+height)`.
    pub fn range(&self) -> (f64, f64) {
        (self.elevation, self.elevation + self.height)
    }

    /// Refresh the modification timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Optional fields for level creation.
#[derive(Debug, Clone, Default)]
pub struct LevelOptions {
    /// Defaults to the building's current level count.
    pub level_number: Option<i32>,
    pub usage_type: Option<LevelUsage>,
    pub is_visible: Option<bool>,
    pub color: Option<String>,
}

/// Partial update for a level. Elevation and height changes are re-validated
/// against the building's other levels by the manager.
#[derive(Debug, Clone, Default)]
pub struct LevelPatch {
    pub name: Option<String>,
    pub elevation: Option<f64>,
    pub height: Option<f64>,
    pub level_number: Option<i32>,
    pub usage_type: Option<LevelUsage>,
    pub is_visible: Option<bool>,
    pub color: Option<String>,
}
