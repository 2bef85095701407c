//! Level Hierarchy Manager
//!
//! Validates and assigns level elevations, cascades deletes top-down
//! (Site → Building → Level → contained objects), and copies levels
//! together with their objects. Every mutation validates before applying,
//! so no partially-mutated state is ever observable.

use std::collections::HashMap;

use log::debug;

use crate::error::{DraftError, Result};
use crate::events::{EventBus, LevelEvent, SubscriptionId};
use crate::model::{
    Building, BuildingPatch, BuildingType, Level, LevelOptions, LevelPatch, Site, SiteOptions,
    SitePatch,
};
use crate::objects::ObjectStore;
use crate::validation::{
    ranges_overlap, validate_elevation_bounds, validate_height, validate_hex_color, validate_name,
};

/// Result of an elevation check: either valid, or a message naming the
/// conflict. A query result, not an error; `create_level` and friends turn
/// an invalid result into [`DraftError::Overlap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElevationValidation {
    pub valid: bool,
    pub error: Option<String>,
}

impl ElevationValidation {
    fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(message.into()),
        }
    }
}

/// Owns the Site/Building/Level collections and the current-selection
/// pointers.
#[derive(Debug, Default)]
pub struct LevelManager {
    sites: HashMap<String, Site>,
    buildings: HashMap<String, Building>,
    levels: HashMap<String, Level>,
    active_site_id: Option<String>,
    active_building_id: Option<String>,
    active_level_id: Option<String>,
    bus: EventBus<LevelEvent>,
}

impl LevelManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a manager from persisted parts. Stale active pointers are
    /// cleared.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        sites: Vec<Site>,
        buildings: Vec<Building>,
        levels: Vec<Level>,
        active_site_id: Option<String>,
        active_building_id: Option<String>,
        active_level_id: Option<String>,
    ) -> Self {
        let sites: HashMap<String, Site> = sites.into_iter().map(|s| (s.id.clone(), s)).collect();
        let buildings: HashMap<String, Building> =
            buildings.into_iter().map(|b| (b.id.clone(), b)).collect();
        let levels: HashMap<String, Level> =
            levels.into_iter().map(|l| (l.id.clone(), l)).collect();

        Self {
            active_site_id: active_site_id.filter(|id| sites.contains_key(id)),
            active_building_id: active_building_id.filter(|id| buildings.contains_key(id)),
            active_level_id: active_level_id.filter(|id| levels.contains_key(id)),
            sites,
            buildings,
            levels,
            bus: EventBus::new(),
        }
    }

    /// Snapshot the collections and pointers for persistence.
    #[allow(clippy::type_complexity)]
    pub fn to_parts(
        &self,
    ) -> (
        Vec<Site>,
        Vec<Building>,
        Vec<Level>,
        Option<String>,
        Option<String>,
        Option<String>,
    ) {
        (
            self.sites.values().cloned().collect(),
            self.buildings.values().cloned().collect(),
            self.levels.values().cloned().collect(),
            self.active_site_id.clone(),
            self.active_building_id.clone(),
            self.active_level_id.clone(),
        )
    }

    // === Queries ===

    /// Get a site by id.
    pub fn site(&self, id: &str) -> Option<&Site> {
        self.sites.get(id)
    }

    /// Get a building by id.
    pub fn building(&self, id: &str) -> Option<&Building> {
        self.buildings.get(id)
    }

    /// Get a level by id.
    pub fn level(&self, id: &str) -> Option<&Level> {
        self.levels.get(id)
    }

    /// Number of sites.
    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    /// Number of buildings across all sites.
    pub fn building_count(&self) -> usize {
        self.buildings.len()
    }

    /// Number of levels across all buildings.
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Iterate over all sites in arbitrary order.
    pub fn sites(&self) -> impl Iterator<Item = &Site> {
        self.sites.values()
    }

    /// Buildings belonging to a site, in the site's creation order.
    pub fn buildings_in_site(&self, site_id: &str) -> Vec<&Building> {
        self.sites
            .get(site_id)
            .map(|site| {
                site.building_ids
                    .iter()
                    .filter_map(|id| self.buildings.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Levels of a building, sorted by elevation ascending.
    pub fn levels_in_building(&self, building_id: &str) -> Vec<&Level> {
        let mut levels: Vec<&Level> = self
            .levels
            .values()
            .filter(|l| l.building_id == building_id)
            .collect();
        levels.sort_by(|a, b| a.elevation.total_cmp(&b.elevation));
        levels
    }

    /// The level whose half-open range contains the given elevation point.
    pub fn level_at_elevation(&self, building_id: &str, elevation: f64) -> Option<&Level> {
        self.levels.values().find(|l| {
            l.building_id == building_id
                && crate::validation::range_contains(l.elevation, l.height, elevation)
        })
    }

    /// Current selection pointers.
    pub fn active_site_id(&self) -> Option<&str> {
        self.active_site_id.as_deref()
    }

    pub fn active_building_id(&self) -> Option<&str> {
        self.active_building_id.as_deref()
    }

    pub fn active_level_id(&self) -> Option<&str> {
        self.active_level_id.as_deref()
    }

    /// Check a candidate elevation range against every level in the
    /// building except `exclude_level_id` (so editing a level does not
    /// self-conflict). Also rejects elevations outside the world bounds.
    pub fn validate_level_elevation(
        &self,
        building_id: &str,
        elevation: f64,
        height: f64,
        exclude_level_id: Option<&str>,
    ) -> ElevationValidation {
        if let Err(err) = validate_elevation_bounds(elevation) {
            return ElevationValidation::invalid(err.to_string());
        }
        if let Err(err) = validate_height(height) {
            return ElevationValidation::invalid(err.to_string());
        }

        for level in self.levels.values() {
            if level.building_id != building_id {
                continue;
            }
            if Some(level.id.as_str()) == exclude_level_id {
                continue;
            }
            if ranges_overlap(elevation, height, level.elevation, level.height) {
                let (start, end) = level.range();
                return ElevationValidation::invalid(format!(
                    "elevation range [{}, {}) conflicts with level '{}' occupying [{}, {})",
                    elevation,
                    elevation + height,
                    level.name,
                    start,
                    end
                ));
            }
        }

        ElevationValidation::ok()
    }

    /// Pairwise scan over a building's levels reporting every overlapping
    /// pair by name. A diagnostic, not a gate; the collection can only
    /// contain overlaps after loading an externally produced snapshot.
    pub fn check_overlapping_levels(&self, building_id: &str) -> Vec<String> {
        let levels = self.levels_in_building(building_id);
        let mut conflicts = Vec::new();

        for (i, a) in levels.iter().enumerate() {
            for b in &levels[i + 1..] {
                if ranges_overlap(a.elevation, a.height, b.elevation, b.height) {
                    let (a_start, a_end) = a.range();
                    let (b_start, b_end) = b.range();
                    conflicts.push(format!(
                        "'{}' [{}, {}) overlaps '{}' [{}, {})",
                        a.name, a_start, a_end, b.name, b_start, b_end
                    ));
                }
            }
        }

        conflicts
    }

    // === Mutations ===

    /// Create a site.
    pub fn create_site(&mut self, name: &str, opts: SiteOptions) -> Result<Site> {
        validate_name(name)?;
        let site = Site::new(name, opts);
        self.sites.insert(site.id.clone(), site.clone());

        self.bus.emit(&LevelEvent::SiteAdded {
            id: site.id.clone(),
        });
        self.bus.emit(&LevelEvent::Changed);
        Ok(site)
    }

    /// Create a building on a site.
    pub fn create_building(
        &mut self,
        site_id: &str,
        name: &str,
        building_type: BuildingType,
    ) -> Result<Building> {
        validate_name(name)?;
        if !self.sites.contains_key(site_id) {
            return Err(DraftError::not_found("Site", site_id));
        }

        let building = Building::new(name, site_id, building_type);
        let site = self.sites.get_mut(site_id).expect("checked above");
        site.building_ids.push(building.id.clone());
        site.touch();
        self.buildings
            .insert(building.id.clone(), building.clone());

        self.bus.emit(&LevelEvent::BuildingAdded {
            id: building.id.clone(),
        });
        self.bus.emit(&LevelEvent::Changed);
        Ok(building)
    }

    /// Create a level in a building. The requested elevation range is always
    /// validated against the building's existing levels before insertion.
    ///
    /// `level_number` defaults to the building's current level count; it is
    /// an ordering hint and deliberately not checked for uniqueness.
    pub fn create_level(
        &mut self,
        building_id: &str,
        name: &str,
        elevation: f64,
        height: f64,
        opts: LevelOptions,
    ) -> Result<Level> {
        validate_name(name)?;
        if let Some(color) = &opts.color {
            validate_hex_color(color)?;
        }
        if !self.buildings.contains_key(building_id) {
            return Err(DraftError::not_found("Building", building_id));
        }
        self.require_valid_elevation(building_id, elevation, height, None)?;

        let mut opts = opts;
        if opts.level_number.is_none() {
            let count = self
                .levels
                .values()
                .filter(|l| l.building_id == building_id)
                .count();
            opts.level_number = Some(count as i32);
        }

        let level = Level::new(name, building_id, elevation, height, opts);
        let building = self.buildings.get_mut(building_id).expect("checked above");
        building.level_ids.push(level.id.clone());
        building.touch();
        self.levels.insert(level.id.clone(), level.clone());

        self.bus.emit(&LevelEvent::LevelAdded(level.clone()));
        self.bus.emit(&LevelEvent::Changed);
        Ok(level)
    }

    /// Apply a partial update to a site.
    pub fn update_site(&mut self, id: &str, patch: SitePatch) -> Result<Site> {
        if let Some(name) = &patch.name {
            validate_name(name)?;
        }
        let site = self
            .sites
            .get_mut(id)
            .ok_or_else(|| DraftError::not_found("Site", id))?;

        if let Some(name) = patch.name {
            site.name = name;
        }
        if let Some(elevation) = patch.elevation {
            site.elevation = elevation;
        }
        if let Some(address) = patch.address {
            site.address = address;
        }
        if let Some(latitude) = patch.latitude {
            site.latitude = latitude;
        }
        if let Some(longitude) = patch.longitude {
            site.longitude = longitude;
        }
        site.touch();
        let updated = site.clone();

        self.bus.emit(&LevelEvent::Updated { id: id.to_string() });
        self.bus.emit(&LevelEvent::Changed);
        Ok(updated)
    }

    /// Apply a partial update to a building.
    pub fn update_building(&mut self, id: &str, patch: BuildingPatch) -> Result<Building> {
        if let Some(name) = &patch.name {
            validate_name(name)?;
        }
        let building = self
            .buildings
            .get_mut(id)
            .ok_or_else(|| DraftError::not_found("Building", id))?;

        if let Some(name) = patch.name {
            building.name = name;
        }
        if let Some(building_type) = patch.building_type {
            building.building_type = building_type;
        }
        building.touch();
        let updated = building.clone();

        self.bus.emit(&LevelEvent::Updated { id: id.to_string() });
        self.bus.emit(&LevelEvent::Changed);
        Ok(updated)
    }

    /// Apply a partial update to a level. Elevation or height changes are
    /// re-validated against the building's other levels, excluding the level
    /// itself so the edit does not self-conflict.
    pub fn update_level(&mut self, id: &str, patch: LevelPatch) -> Result<Level> {
        let level = self
            .levels
            .get(id)
            .ok_or_else(|| DraftError::not_found("Level", id))?;

        if let Some(name) = &patch.name {
            validate_name(name)?;
        }
        if let Some(color) = &patch.color {
            validate_hex_color(color)?;
        }
        if patch.elevation.is_some() || patch.height.is_some() {
            let elevation = patch.elevation.unwrap_or(level.elevation);
            let height = patch.height.unwrap_or(level.height);
            let building_id = level.building_id.clone();
            self.require_valid_elevation(&building_id, elevation, height, Some(id))?;
        }

        let level = self.levels.get_mut(id).expect("checked above");
        if let Some(name) = patch.name {
            level.name = name;
        }
        if let Some(elevation) = patch.elevation {
            level.elevation = elevation;
        }
        if let Some(height) = patch.height {
            level.height = height;
        }
        if let Some(level_number) = patch.level_number {
            level.level_number = level_number;
        }
        if let Some(usage_type) = patch.usage_type {
            level.usage_type = usage_type;
        }
        if let Some(is_visible) = patch.is_visible {
            level.is_visible = is_visible;
        }
        if let Some(color) = patch.color {
            level.color = color;
        }
        level.touch();
        let updated = level.clone();

        self.bus.emit(&LevelEvent::Updated { id: id.to_string() });
        self.bus.emit(&LevelEvent::Changed);
        Ok(updated)
    }

    /// Delete a level: first every object it lists, then its membership in
    /// the building, then the level record. Clears the active level if it
    /// pointed here.
    pub fn delete_level(&mut self, id: &str, objects: &mut ObjectStore) -> Result<()> {
        if !self.levels.contains_key(id) {
            return Err(DraftError::not_found("Level", id));
        }
        self.remove_level_record(id, objects);

        self.bus.emit(&LevelEvent::Removed {
            ids: vec![id.to_string()],
        });
        self.bus.emit(&LevelEvent::Changed);
        Ok(())
    }

    /// Delete a building and cascade through its levels and their objects.
    pub fn delete_building(&mut self, id: &str, objects: &mut ObjectStore) -> Result<()> {
        if !self.buildings.contains_key(id) {
            return Err(DraftError::not_found("Building", id));
        }
        let removed = self.remove_building_record(id, objects);

        self.bus.emit(&LevelEvent::Removed { ids: removed });
        self.bus.emit(&LevelEvent::Changed);
        Ok(())
    }

    /// Delete a site and cascade through its buildings, levels and objects.
    pub fn delete_site(&mut self, id: &str, objects: &mut ObjectStore) -> Result<()> {
        let site = self
            .sites
            .get(id)
            .ok_or_else(|| DraftError::not_found("Site", id))?;

        let building_ids = site.building_ids.clone();
        let mut removed = vec![id.to_string()];
        for building_id in building_ids {
            removed.extend(self.remove_building_record(&building_id, objects));
        }
        self.sites.remove(id);
        if self.active_site_id.as_deref() == Some(id) {
            self.active_site_id = None;
        }
        debug!("cascade-deleted site {} ({} record(s))", id, removed.len());

        self.bus.emit(&LevelEvent::Removed { ids: removed });
        self.bus.emit(&LevelEvent::Changed);
        Ok(())
    }

    /// Copy a level to a new elevation, deep-copying every object it
    /// contains: each clone keeps the source X/Y and gets Z set to the
    /// target elevation.
    pub fn copy_level(
        &mut self,
        id: &str,
        target_elevation: f64,
        new_name: Option<&str>,
        objects: &mut ObjectStore,
    ) -> Result<Level> {
        let source = self
            .levels
            .get(id)
            .ok_or_else(|| DraftError::not_found("Level", id))?
            .clone();

        let name = match new_name {
            Some(name) => {
                validate_name(name)?;
                name.to_string()
            }
            None => format!("{} Copy", source.name),
        };
        self.require_valid_elevation(&source.building_id, target_elevation, source.height, None)?;

        let count = self
            .levels
            .values()
            .filter(|l| l.building_id == source.building_id)
            .count();
        let mut copy = Level::new(
            name,
            source.building_id.clone(),
            target_elevation,
            source.height,
            LevelOptions {
                level_number: Some(count as i32),
                usage_type: Some(source.usage_type),
                is_visible: Some(source.is_visible),
                color: Some(source.color.clone()),
            },
        );

        for object_id in &source.object_ids {
            let Some(original) = objects.get(object_id) else {
                continue;
            };
            let mut clone = original.duplicate();
            clone.position = clone.position.with_z(target_elevation);
            clone.level_id = Some(copy.id.clone());
            let clone_id = objects.add(clone);
            copy.object_ids.push(clone_id);
        }

        let building = self
            .buildings
            .get_mut(&source.building_id)
            .expect("source level's building exists");
        building.level_ids.push(copy.id.clone());
        building.touch();
        self.levels.insert(copy.id.clone(), copy.clone());

        self.bus.emit(&LevelEvent::LevelAdded(copy.clone()));
        self.bus.emit(&LevelEvent::Changed);
        Ok(copy)
    }

    // === Selection ===

    /// Point the current-site selection at an existing site.
    pub fn set_active_site(&mut self, id: &str) -> Result<()> {
        if !self.sites.contains_key(id) {
            return Err(DraftError::not_found("Site", id));
        }
        self.active_site_id = Some(id.to_string());
        Ok(())
    }

    /// Point the current-building selection at an existing building.
    pub fn set_active_building(&mut self, id: &str) -> Result<()> {
        if !self.buildings.contains_key(id) {
            return Err(DraftError::not_found("Building", id));
        }
        self.active_building_id = Some(id.to_string());
        Ok(())
    }

    /// Point the current-level selection at an existing level.
    pub fn set_active_level(&mut self, id: &str) -> Result<()> {
        if !self.levels.contains_key(id) {
            return Err(DraftError::not_found("Level", id));
        }
        self.active_level_id = Some(id.to_string());
        Ok(())
    }

    // === Events ===

    /// Subscribe to level events.
    pub fn subscribe(&mut self, callback: impl Fn(&LevelEvent) + 'static) -> SubscriptionId {
        self.bus.subscribe(callback)
    }

    /// Remove a subscription.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    // === Crate-internal (assignment coordinator) ===

    pub(crate) fn attach_object(&mut self, level_id: &str, object_id: &str) -> Result<f64> {
        let level = self
            .levels
            .get_mut(level_id)
            .ok_or_else(|| DraftError::not_found("Level", level_id))?;
        if !level.object_ids.iter().any(|id| id == object_id) {
            level.object_ids.push(object_id.to_string());
            level.touch();
        }
        Ok(level.elevation)
    }

    pub(crate) fn detach_object(&mut self, level_id: &str, object_id: &str) {
        if let Some(level) = self.levels.get_mut(level_id) {
            level.object_ids.retain(|id| id != object_id);
            level.touch();
        }
    }

    pub(crate) fn emit(&self, event: LevelEvent) {
        self.bus.emit(&event);
    }

    // === Internals ===

    fn require_valid_elevation(
        &self,
        building_id: &str,
        elevation: f64,
        height: f64,
        exclude_level_id: Option<&str>,
    ) -> Result<()> {
        let check =
            self.validate_level_elevation(building_id, elevation, height, exclude_level_id);
        if check.valid {
            return Ok(());
        }

        // Surface interval conflicts as Overlap, bounds problems as Validation.
        let conflict = self.levels.values().find(|l| {
            l.building_id == building_id
                && Some(l.id.as_str()) != exclude_level_id
                && ranges_overlap(elevation, height, l.elevation, l.height)
        });
        match conflict {
            Some(level) => {
                let (start, end) = level.range();
                Err(DraftError::Overlap {
                    level_name: level.name.clone(),
                    range_start: start,
                    range_end: end,
                })
            }
            None => Err(DraftError::validation(
                check.error.unwrap_or_else(|| "invalid elevation".to_string()),
            )),
        }
    }

    /// Remove one level record and its objects. No events; callers emit.
    fn remove_level_record(&mut self, id: &str, objects: &mut ObjectStore) {
        let Some(level) = self.levels.remove(id) else {
            return;
        };
        for object_id in &level.object_ids {
            objects.remove(object_id);
        }
        if let Some(building) = self.buildings.get_mut(&level.building_id) {
            building.level_ids.retain(|lid| lid != id);
            building.touch();
        }
        if self.active_level_id.as_deref() == Some(id) {
            self.active_level_id = None;
        }
    }

    /// Remove one building, its levels and their objects. No events.
    fn remove_building_record(&mut self, id: &str, objects: &mut ObjectStore) -> Vec<String> {
        let Some(building) = self.buildings.remove(id) else {
            return Vec::new();
        };
        let mut removed = vec![id.to_string()];
        for level_id in &building.level_ids {
            if let Some(level) = self.levels.remove(level_id) {
                for object_id in &level.object_ids {
                    objects.remove(object_id);
                }
                if self.active_level_id.as_deref() == Some(level_id.as_str()) {
                    self.active_level_id = None;
                }
                removed.push(level_id.clone());
            }
        }
        if let Some(site) = self.sites.get_mut(&building.site_id) {
            site.building_ids.retain(|bid| bid != id);
            site.touch();
        }
        if self.active_building_id.as_deref() == Some(id) {
            self.active_building_id = None;
        }
        removed
    }
}
