//! Trait for the host game's world services.

use std::fmt;

use nalgebra::Point3;

use crate::highlight::ObjectId;

/// World-space position.
pub type Position = Point3<f32>;

/// Lootable-item capability of a world object.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LootItem {
    /// Template identifier, used for the rarity tier
    pub template_id: Option<String>,
    /// Localized template name, used as the label
    pub localized_name: Option<String>,
}

/// Corpse capability. Either variant makes an object a corpse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpseKind {
    /// Corpse replicated from another client
    Observed,
    /// Corpse simulated locally
    Local,
}

/// Lootable-container capability of a world object.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LootContainer {
    /// Scene object name, e.g. `"ammo_box_03"`
    pub name: String,
}

/// World services the scanner consumes from the host game.
///
/// Implement this trait to connect a game engine to the highlighter. All
/// calls happen on the host's update tick; nothing is called concurrently.
///
/// # Example
///
/// ```ignore
/// use loot_highlight::{Position, World};
///
/// struct EngineWorld { /* engine bindings */ }
///
/// impl World for EngineWorld {
///     type Handle = EntityRef;
///     type Error = EngineError;
///
///     fn overlap_sphere(&self, center: &Position, radius: f32) -> Result<Vec<EntityRef>, EngineError> {
///         self.physics.overlap_sphere(center, radius)
///     }
///     // ...
/// }
/// ```
pub trait World {
    /// Opaque reference to a world object.
    type Handle: Clone;

    /// Error returned when the world query service is unavailable.
    type Error: fmt::Display;

    /// Return every object whose collider intersects the sphere.
    ///
    /// The same object may be returned more than once (one per collider).
    fn overlap_sphere(
        &self,
        center: &Position,
        radius: f32,
    ) -> Result<Vec<Self::Handle>, Self::Error>;

    /// Stable identity of a live object, `None` if it is gone.
    fn stable_id(&self, handle: &Self::Handle) -> Option<ObjectId>;

    /// Whether the object is active in the scene hierarchy.
    fn is_active_in_scene(&self, handle: &Self::Handle) -> bool;

    /// Name of the topmost ancestor in the ownership hierarchy.
    fn root_ancestor_name(&self, handle: &Self::Handle) -> String;

    /// World position of the object, `None` if it is gone.
    fn position(&self, handle: &Self::Handle) -> Option<Position>;

    /// Lootable-item capability, if the object has one.
    fn lootable_item(&self, handle: &Self::Handle) -> Option<LootItem>;

    /// Corpse capability, if the object has one.
    fn corpse(&self, handle: &Self::Handle) -> Option<CorpseKind>;

    /// Lootable-container capability, if the object has one.
    fn lootable_container(&self, handle: &Self::Handle) -> Option<LootContainer>;

    /// Position of the active viewer (camera), `None` when there is none.
    fn viewer_position(&self) -> Option<Position>;
}
