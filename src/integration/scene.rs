//! In-memory scene implementing [`World`], for tests and headless hosts.

use nalgebra::distance;
use thiserror::Error;

use crate::highlight::ObjectId;
use crate::integration::world::{CorpseKind, LootContainer, LootItem, Position, World};

/// Handle to an object stored in a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneHandle(usize);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("scene is not loaded")]
    NotLoaded,
}

/// A world object with the capabilities the classifier looks at.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    /// Name of the topmost ancestor
    pub root: String,
    pub position: Position,
    pub active: bool,
    pub item: Option<LootItem>,
    pub corpse: Option<CorpseKind>,
    pub container: bool,
    alive: bool,
}

impl SceneObject {
    pub fn is_alive(&self) -> bool {
        self.alive
    }
}

/// Builder for [`SceneObject`]s.
#[derive(Debug, Clone)]
pub struct SceneObjectBuilder {
    object: SceneObject,
}

impl SceneObjectBuilder {
    /// Start a plain, active object at the origin with no capabilities.
    pub fn new(id: u64) -> Self {
        Self {
            object: SceneObject {
                id: ObjectId(id),
                name: format!("object_{id}"),
                root: "World".to_string(),
                position: Position::origin(),
                active: true,
                item: None,
                corpse: None,
                container: false,
                alive: true,
            },
        }
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.object.position = Position::new(x, y, z);
        self
    }

    pub fn named(mut self, name: &str) -> Self {
        self.object.name = name.to_string();
        self
    }

    /// Set the root ancestor name.
    pub fn root(mut self, root: &str) -> Self {
        self.object.root = root.to_string();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.object.active = false;
        self
    }

    /// Give the object a lootable-item capability.
    pub fn item(mut self, template_id: Option<&str>, localized_name: Option<&str>) -> Self {
        self.object.item = Some(LootItem {
            template_id: template_id.map(str::to_string),
            localized_name: localized_name.map(str::to_string),
        });
        self
    }

    pub fn corpse(mut self, kind: CorpseKind) -> Self {
        self.object.corpse = Some(kind);
        self
    }

    /// Give the object a lootable-container capability. The sub-type comes
    /// from the object name.
    pub fn container(mut self) -> Self {
        self.object.container = true;
        self
    }

    pub fn build(self) -> SceneObject {
        self.object
    }
}

/// Objects, their colliders and the viewer.
///
/// Destroyed objects keep their colliders, the way a physics query can still
/// return a collider whose object was destroyed earlier in the frame.
#[derive(Debug, Clone)]
pub struct Scene {
    objects: Vec<SceneObject>,
    colliders: Vec<SceneHandle>,
    viewer: Option<Position>,
    loaded: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// An empty, loaded scene with the viewer at the origin.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            colliders: Vec::new(),
            viewer: Some(Position::origin()),
            loaded: true,
        }
    }

    /// Add an object with a single collider.
    pub fn insert(&mut self, object: SceneObject) -> SceneHandle {
        let handle = SceneHandle(self.objects.len());
        self.objects.push(object);
        self.colliders.push(handle);
        handle
    }

    /// Give an object one more collider.
    pub fn add_collider(&mut self, handle: SceneHandle) {
        self.colliders.push(handle);
    }

    pub fn object(&self, handle: SceneHandle) -> Option<&SceneObject> {
        self.objects.get(handle.0)
    }

    pub fn object_mut(&mut self, handle: SceneHandle) -> Option<&mut SceneObject> {
        self.objects.get_mut(handle.0)
    }

    pub fn move_to(&mut self, handle: SceneHandle, x: f32, y: f32, z: f32) {
        if let Some(object) = self.object_mut(handle) {
            object.position = Position::new(x, y, z);
        }
    }

    /// Destroy an object. Its id becomes free for reuse.
    pub fn destroy(&mut self, handle: SceneHandle) {
        if let Some(object) = self.object_mut(handle) {
            object.alive = false;
        }
    }

    pub fn set_viewer(&mut self, viewer: Option<Position>) {
        self.viewer = viewer;
    }

    /// An unloaded scene fails every overlap query.
    pub fn set_loaded(&mut self, loaded: bool) {
        self.loaded = loaded;
    }

    fn live(&self, handle: &SceneHandle) -> Option<&SceneObject> {
        self.object(*handle).filter(|o| o.alive)
    }
}

impl World for Scene {
    type Handle = SceneHandle;
    type Error = SceneError;

    fn overlap_sphere(
        &self,
        center: &Position,
        radius: f32,
    ) -> Result<Vec<SceneHandle>, SceneError> {
        if !self.loaded {
            return Err(SceneError::NotLoaded);
        }

        Ok(self
            .colliders
            .iter()
            .filter(|h| {
                self.object(**h)
                    .is_some_and(|o| distance(center, &o.position) <= radius)
            })
            .copied()
            .collect())
    }

    fn stable_id(&self, handle: &SceneHandle) -> Option<ObjectId> {
        self.live(handle).map(|o| o.id)
    }

    fn is_active_in_scene(&self, handle: &SceneHandle) -> bool {
        self.live(handle).is_some_and(|o| o.active)
    }

    fn root_ancestor_name(&self, handle: &SceneHandle) -> String {
        self.live(handle).map(|o| o.root.clone()).unwrap_or_default()
    }

    fn position(&self, handle: &SceneHandle) -> Option<Position> {
        self.live(handle).map(|o| o.position)
    }

    fn lootable_item(&self, handle: &SceneHandle) -> Option<LootItem> {
        self.live(handle).and_then(|o| o.item.clone())
    }

    fn corpse(&self, handle: &SceneHandle) -> Option<CorpseKind> {
        self.live(handle).and_then(|o| o.corpse)
    }

    fn lootable_container(&self, handle: &SceneHandle) -> Option<LootContainer> {
        self.live(handle)
            .filter(|o| o.container)
            .map(|o| LootContainer {
                name: o.name.clone(),
            })
    }

    fn viewer_position(&self) -> Option<Position> {
        self.viewer
    }
}
