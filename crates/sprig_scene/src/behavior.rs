//! User-defined node behavior and the contexts it runs with.

use glam::Vec2;
use sprig_core::{AsAny, InputState};

use crate::camera::Camera;
use crate::layer::Layer;
use crate::node::{Node, NodeId};
use crate::render::RenderTarget;
use crate::scene::Scene;
use crate::transform::Transform2D;

/// Hooks a node runs over its lifetime. Every hook defaults to a no-op.
///
/// - `on_add` runs once, when the node joins the live tree.
/// - `update` runs once per tick, after the node has applied its queued
///   child additions and removals and before its children update.
/// - `draw` runs once per camera pass that renders the node's layer.
/// - `on_destroy` runs once, parent before children, when the node's subtree
///   is torn down.
///
/// While a hook runs, the behavior is detached from its node, so looking it up
/// through the scene from inside its own hook returns `None`.
pub trait Behavior: AsAny {
    fn on_add(&mut self, _ctx: &mut NodeContext<'_>) {}
    fn update(&mut self, _ctx: &mut NodeContext<'_>) {}
    fn draw(&self, _ctx: &DrawContext<'_>, _target: &mut dyn RenderTarget) {}
    fn on_destroy(&mut self, _ctx: &mut NodeContext<'_>) {}
}

/// Mutable view of the scene handed to lifecycle hooks.
pub struct NodeContext<'a> {
    pub(crate) scene: &'a mut Scene,
    pub(crate) node: NodeId,
    pub(crate) input: &'a InputState,
}

impl<'a> NodeContext<'a> {
    pub fn id(&self) -> NodeId {
        self.node
    }

    pub fn scene(&self) -> &Scene {
        &*self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut *self.scene
    }

    pub fn input(&self) -> &InputState {
        self.input
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.scene.parent(self.node)
    }

    pub fn local_transform(&self) -> Transform2D {
        self.scene.local_transform(self.node)
    }

    pub fn global_transform(&self) -> Transform2D {
        self.scene.global_transform(self.node)
    }

    pub fn set_local_position(&mut self, position: Vec2) {
        self.scene.set_local_position(self.node, position);
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.scene.translate(self.node, offset);
    }

    pub fn set_local_rotation(&mut self, rotation: f32) {
        self.scene.set_local_rotation(self.node, rotation);
    }

    pub fn set_local_scale(&mut self, scale: Vec2) {
        self.scene.set_local_scale(self.node, scale);
    }

    /// Queue a child under this node. It activates on the next tick.
    pub fn add_child(&mut self, node: Node) -> NodeId {
        self.scene.add_child(self.node, node)
    }

    /// Queue a plain child running `behavior`. It activates on the next tick.
    pub fn make_child<B: Behavior>(&mut self, behavior: B) -> NodeId {
        self.scene.make_child(self.node, behavior)
    }

    /// Queue a child of `parent`. It activates on the next tick.
    pub fn add_child_to(&mut self, parent: NodeId, node: Node) -> NodeId {
        self.scene.add_child(parent, node)
    }

    /// Queue this node for removal.
    pub fn destroy(&mut self) {
        self.scene.destroy(self.node);
    }

    pub fn destroy_node(&mut self, id: NodeId) {
        self.scene.destroy(id);
    }

    /// Colliders overlapping the collider node `collider`.
    pub fn overlap(&self, collider: NodeId) -> Vec<NodeId> {
        self.scene.overlap(collider)
    }

    /// First attached child of this node whose behavior is a `T`.
    pub fn get_child<T: Behavior>(&self) -> Option<NodeId> {
        self.scene.get_child::<T>(self.node)
    }
}

/// Read-only view of the scene handed to `draw`.
pub struct DrawContext<'a> {
    pub(crate) scene: &'a Scene,
    pub(crate) node: NodeId,
    pub(crate) camera: NodeId,
}

impl<'a> DrawContext<'a> {
    pub fn id(&self) -> NodeId {
        self.node
    }

    pub fn scene(&self) -> &Scene {
        self.scene
    }

    pub fn global_transform(&self) -> Transform2D {
        self.scene.global_transform(self.node)
    }

    pub fn layer(&self) -> Layer {
        self.scene.layer(self.node)
    }

    /// The camera node of the current pass.
    pub fn camera_id(&self) -> NodeId {
        self.camera
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.scene.camera(self.camera)
    }
}
