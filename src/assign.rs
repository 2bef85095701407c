//! Object Assignment Coordinator
//!
//! The only code paths allowed to rewrite an object's layer/level binding
//! and its Z coordinate. Object Z is derived from level membership, never
//! independently authoritative: assigning to a level pins Z to that level's
//! elevation and leaves X/Y alone.

use crate::error::{DraftError, Result};
use crate::events::LevelEvent;
use crate::layers::LayerManager;
use crate::levels::LevelManager;
use crate::objects::ObjectStore;

/// File an object into a layer.
///
/// # Errors
/// `NotFound` if the object or layer does not resolve.
pub fn assign_object_to_layer(
    layers: &LayerManager,
    objects: &mut ObjectStore,
    object_id: &str,
    layer_id: &str,
) -> Result<()> {
    if layers.get_layer(layer_id).is_none() {
        return Err(DraftError::not_found("Layer", layer_id));
    }
    let object = objects
        .get_mut(object_id)
        .ok_or_else(|| DraftError::not_found("Object", object_id))?;
    object.layer_id = Some(layer_id.to_string());
    object.touch();
    Ok(())
}

/// Attach an object to a level, detaching it from any previous level, and
/// pin its Z to the target level's elevation.
pub fn assign_object_to_level(
    levels: &mut LevelManager,
    objects: &mut ObjectStore,
    object_id: &str,
    level_id: &str,
) -> Result<()> {
    if levels.level(level_id).is_none() {
        return Err(DraftError::not_found("Level", level_id));
    }
    let previous = objects
        .get(object_id)
        .ok_or_else(|| DraftError::not_found("Object", object_id))?
        .level_id
        .clone();

    if let Some(previous_level) = previous {
        levels.detach_object(&previous_level, object_id);
    }
    let elevation = levels.attach_object(level_id, object_id)?;

    let object = objects.get_mut(object_id).expect("checked above");
    object.level_id = Some(level_id.to_string());
    object.position = object.position.with_z(elevation);
    object.touch();

    levels.emit(LevelEvent::ObjectAssigned {
        object_id: object_id.to_string(),
        level_id: level_id.to_string(),
    });
    levels.emit(LevelEvent::Changed);
    Ok(())
}

/// Move an object from one level to another.
///
/// # Errors
/// `NotFound` if any id does not resolve; `Validation` if the object is not
/// actually a member of `from`.
pub fn move_object_to_level(
    levels: &mut LevelManager,
    objects: &mut ObjectStore,
    object_id: &str,
    from: &str,
    to: &str,
) -> Result<()> {
    let source = levels
        .level(from)
        .ok_or_else(|| DraftError::not_found("Level", from))?;
    if !source.object_ids.iter().any(|id| id == object_id) {
        return Err(DraftError::validation(format!(
            "object '{}' is not on level '{}'",
            object_id, source.name
        )));
    }
    assign_object_to_level(levels, objects, object_id, to)
}
