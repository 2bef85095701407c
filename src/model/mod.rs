//! Entity records for the hierarchy core
//!
//! Plain serde structs plus the factory helpers that stamp ids and
//! timestamps. All validation and invariant enforcement lives in the
//! managers; these records carry no behavior beyond construction.

pub mod layer;
pub mod object;
pub mod spatial;

pub use layer::{Layer, LayerNode, LayerOptions, LayerPatch};
pub use object::{ObjectPatch, Position, SceneObject};
pub use spatial::{
    Building, BuildingPatch, BuildingType, Level, LevelOptions, LevelPatch, LevelUsage, Site,
    SiteOptions, SitePatch,
};

/// Generate a fresh entity id.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
