//! Node storage record and builder.
//!
//! Nodes live in the scene's arena and are addressed by [`NodeId`]. A `Node`
//! value is only a description until it is handed to
//! [`Scene::add_child`](crate::Scene::add_child); after that, all mutation goes
//! through the scene so transform invalidation and registration stay
//! consistent.

use std::cell::Cell;

use glam::Vec2;
use slotmap::new_key_type;

use crate::behavior::Behavior;
use crate::camera::Camera;
use crate::collider::Shape;
use crate::layer::Layer;
use crate::transform::Transform2D;

new_key_type! {
    /// Generational handle to a node in a [`Scene`](crate::Scene). Stale
    /// handles never alias a newer node.
    pub struct NodeId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lifecycle {
    /// Queued on its parent, not yet part of the live tree.
    Pending,
    Active,
    /// Being torn down; freed once its subtree has been notified.
    Destroyed,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct PendingChild {
    pub id: NodeId,
    pub queued_at: u64,
}

pub struct Node {
    pub(crate) name: String,
    pub(crate) local: Transform2D,
    pub(crate) global: Cell<Transform2D>,
    pub(crate) global_dirty: Cell<bool>,
    pub(crate) layer: Layer,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) pending_add: Vec<PendingChild>,
    pub(crate) pending_destroy: Vec<NodeId>,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) behavior: Option<Box<dyn Behavior>>,
    pub(crate) collider: Option<Shape>,
    pub(crate) camera: Option<Camera>,
}

impl Node {
    pub fn new() -> Self {
        Self {
            name: String::from("Node"),
            local: Transform2D::IDENTITY,
            global: Cell::new(Transform2D::IDENTITY),
            global_dirty: Cell::new(true),
            layer: Layer::DEFAULT,
            parent: None,
            children: Vec::new(),
            pending_add: Vec::new(),
            pending_destroy: Vec::new(),
            lifecycle: Lifecycle::Pending,
            behavior: None,
            collider: None,
            camera: None,
        }
    }

    /// A node that registers `shape` with the scene's physics while attached.
    pub fn new_collider(shape: Shape) -> Self {
        Self::new().with_name("Collider").with_collider(shape)
    }

    /// A node that renders `layers` while attached, ordered by `draw_order`.
    pub fn new_camera(draw_order: i32, layers: Layer) -> Self {
        Self::new()
            .with_name("Camera")
            .with_camera(Camera::new(draw_order, layers))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_transform(mut self, transform: Transform2D) -> Self {
        self.local = transform;
        self
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.local.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.local.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.local.scale = scale;
        self
    }

    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_behavior(mut self, behavior: impl Behavior) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }

    pub fn with_collider(mut self, shape: Shape) -> Self {
        self.collider = Some(shape);
        self
    }

    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = Some(camera);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn local_transform(&self) -> &Transform2D {
        &self.local
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Attached children in update and draw order. Queued children are not
    /// listed until they activate.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle == Lifecycle::Active
    }

    pub fn is_pending(&self) -> bool {
        self.lifecycle == Lifecycle::Pending
    }

    pub fn collider(&self) -> Option<&Shape> {
        self.collider.as_ref()
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    /// `None` while the behavior's own callback is running.
    pub fn behavior(&self) -> Option<&dyn Behavior> {
        self.behavior.as_deref()
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("local", &self.local)
            .field("layer", &self.layer)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("lifecycle", &self.lifecycle)
            .field("has_behavior", &self.behavior.is_some())
            .field("collider", &self.collider)
            .field("camera", &self.camera)
            .finish()
    }
}
