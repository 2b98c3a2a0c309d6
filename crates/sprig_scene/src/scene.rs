//! The node tree, its registries, and the per-tick update and render passes.
//!
//! All nodes of a scene live in one arena. The tree is expressed with parent
//! and child handles, so a stale [`NodeId`] can be detected instead of
//! dangling.
//!
//! Structural changes are deferred. `add_child` and `destroy` only queue the
//! change on the parent; the parent applies its queues at the start of its
//! own update, removals first, then additions. A child queued during tick T
//! activates on tick T+1 at the earliest, even when its parent is visited
//! later in the same traversal, so nothing a tick creates is updated during
//! that tick.
//!
//! Tearing down a node unregisters it, runs its `on_destroy`, then recurses
//! into its children. The storage of the whole subtree is freed afterwards.

use glam::Vec2;
use slotmap::SlotMap;
use sprig_core::InputState;

use crate::behavior::{Behavior, DrawContext, NodeContext};
use crate::camera::{Camera, CameraManager};
use crate::collider::{Shape, WorldShape};
use crate::layer::Layer;
use crate::node::{Lifecycle, Node, NodeId, PendingChild};
use crate::physics::Physics;
use crate::render::{DrawCommand, RenderTarget};
use crate::transform::Transform2D;

pub const DEFAULT_WINDOW_SIZE: Vec2 = Vec2::new(1280.0, 720.0);

pub struct Scene {
    name: String,
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
    physics: Physics,
    cameras: CameraManager,
    window_size: Vec2,
    tick: u64,
    debug_colliders: bool,
}

impl Scene {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let mut root = Node::new().with_name("Root").with_layer(Layer::EVERYTHING);
        root.lifecycle = Lifecycle::Active;
        let root = nodes.insert(root);
        Self {
            name: String::from("Scene"),
            nodes,
            root,
            physics: Physics::new(),
            cameras: CameraManager::new(),
            window_size: DEFAULT_WINDOW_SIZE,
            tick: 0,
            debug_colliders: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of ticks this scene has run.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn physics(&self) -> &Physics {
        &self.physics
    }

    pub fn cameras(&self) -> &CameraManager {
        &self.cameras
    }

    pub fn window_size(&self) -> Vec2 {
        self.window_size
    }

    pub fn debug_colliders(&self) -> bool {
        self.debug_colliders
    }

    /// Draw an outline for every attached collider during render passes.
    pub fn set_debug_colliders(&mut self, enabled: bool) {
        self.debug_colliders = enabled;
    }

    // ----- membership -------------------------------------------------------

    /// True while `id` is attached to the live tree. Queued, torn-down and
    /// stale handles are not valid.
    pub fn is_valid(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(Node::is_active)
    }

    /// True while `id` is queued on its parent and not yet attached.
    pub fn is_pending(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(Node::is_pending)
    }

    /// True while the handle refers to stored node data, attached or queued.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Attached nodes, root included.
    pub fn active_count(&self) -> usize {
        self.nodes.values().filter(|n| n.is_active()).count()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn find_child(&self, id: NodeId, predicate: impl Fn(&Node) -> bool) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| self.nodes.get(child).is_some_and(&predicate))
    }

    /// First attached child of `id` whose behavior is a `T`.
    pub fn get_child<T: Behavior>(&self, id: NodeId) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| self.behavior::<T>(child).is_some())
    }

    pub fn behavior<T: Behavior>(&self, id: NodeId) -> Option<&T> {
        self.nodes
            .get(id)
            .and_then(|n| n.behavior.as_deref())
            .and_then(|b| b.as_any().downcast_ref::<T>())
    }

    pub fn behavior_mut<T: Behavior>(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes
            .get_mut(id)
            .and_then(|n| n.behavior.as_deref_mut())
            .and_then(|b| b.as_any_mut().downcast_mut::<T>())
    }

    pub fn collider(&self, id: NodeId) -> Option<Shape> {
        self.nodes.get(id).and_then(|n| n.collider)
    }

    pub fn camera(&self, id: NodeId) -> Option<&Camera> {
        self.nodes.get(id).and_then(|n| n.camera.as_ref())
    }

    // ----- structure --------------------------------------------------------

    /// Queue `node` as the last child of `parent`. The node is stored right
    /// away, so its handle works for transform queries and behavior lookups,
    /// but it joins the live tree on the parent's next update.
    ///
    /// Panics when `parent` is not stored in this scene.
    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        assert!(
            self.nodes.contains_key(parent),
            "add_child: parent {parent:?} is not part of scene '{}'",
            self.name
        );
        node.parent = Some(parent);
        node.lifecycle = Lifecycle::Pending;
        node.global_dirty.set(true);
        let name = node.name.clone();
        let id = self.nodes.insert(node);
        let queued_at = self.tick;
        self.nodes[parent]
            .pending_add
            .push(PendingChild { id, queued_at });
        log::trace!("Queued '{}' {:?} under {:?}", name, id, parent);
        id
    }

    /// Queue `node` under the root.
    pub fn spawn(&mut self, node: Node) -> NodeId {
        self.add_child(self.root, node)
    }

    /// Queue a plain node running `behavior` under `parent`.
    pub fn make_child<B: Behavior>(&mut self, parent: NodeId, behavior: B) -> NodeId {
        self.add_child(parent, Node::new().with_behavior(behavior))
    }

    /// Queue `id` and its subtree for removal. Attached nodes are torn down at
    /// the start of their parent's next update; queued nodes are dropped at
    /// once without any callback. Repeated requests are ignored, as are
    /// requests for the root and for stale handles.
    pub fn destroy(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get(id) else {
            log::warn!("destroy: stale node {:?} ignored", id);
            return;
        };
        let Some(parent) = node.parent else {
            log::warn!("destroy: the root of scene '{}' cannot be destroyed", self.name);
            return;
        };
        let lifecycle = node.lifecycle;
        match lifecycle {
            Lifecycle::Active => {
                let queue = &mut self.nodes[parent].pending_destroy;
                if !queue.contains(&id) {
                    queue.push(id);
                }
            }
            Lifecycle::Pending => {
                self.nodes[parent].pending_add.retain(|p| p.id != id);
                self.free_subtree(id);
                log::trace!("Dropped queued node {:?}", id);
            }
            Lifecycle::Destroyed => {}
        }
    }

    // ----- transforms -------------------------------------------------------

    /// Panics on a handle that is not stored in this scene.
    pub fn local_transform(&self, id: NodeId) -> Transform2D {
        self.expect_node(id).local
    }

    /// The node's transform composed with all ancestors. Cached, and
    /// recomputed only after the node or an ancestor changed.
    ///
    /// Panics on a handle that is not stored in this scene.
    pub fn global_transform(&self, id: NodeId) -> Transform2D {
        let node = self.expect_node(id);
        if node.global_dirty.get() {
            let global = match node.parent {
                Some(parent) => self.global_transform(parent).compose(&node.local),
                None => node.local,
            };
            node.global.set(global);
            node.global_dirty.set(false);
        }
        node.global.get()
    }

    pub fn global_position(&self, id: NodeId) -> Vec2 {
        self.global_transform(id).position
    }

    pub fn set_local_transform(&mut self, id: NodeId, transform: Transform2D) {
        self.modify_local(id, |local| *local = transform);
    }

    pub fn set_local_position(&mut self, id: NodeId, position: Vec2) {
        self.modify_local(id, |local| local.position = position);
    }

    pub fn translate(&mut self, id: NodeId, offset: Vec2) {
        self.modify_local(id, |local| local.position += offset);
    }

    pub fn set_local_rotation(&mut self, id: NodeId, rotation: f32) {
        self.modify_local(id, |local| local.rotation = rotation);
    }

    pub fn set_local_scale(&mut self, id: NodeId, scale: Vec2) {
        self.modify_local(id, |local| local.scale = scale);
    }

    fn modify_local(&mut self, id: NodeId, apply: impl FnOnce(&mut Transform2D)) {
        let Some(node) = self.nodes.get_mut(id) else {
            log::warn!("Transform change on stale node {:?} ignored", id);
            return;
        };
        apply(&mut node.local);
        self.invalidate_global(id);
    }

    /// Mark `id` and everything below it, queued children included, as
    /// needing recomputation. A node that is already dirty has dirty
    /// descendants, so the walk stops there.
    fn invalidate_global(&self, id: NodeId) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if node.global_dirty.replace(true) {
            return;
        }
        for &child in &node.children {
            self.invalidate_global(child);
        }
        for pending in &node.pending_add {
            self.invalidate_global(pending.id);
        }
    }

    // ----- layers, physics, cameras -----------------------------------------

    /// Panics on a handle that is not stored in this scene.
    pub fn layer(&self, id: NodeId) -> Layer {
        self.expect_node(id).layer
    }

    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) {
        match self.nodes.get_mut(id) {
            Some(node) => node.name = name.into(),
            None => log::warn!("set_name on stale node {:?} ignored", id),
        }
    }

    pub fn set_layer(&mut self, id: NodeId, layer: Layer) {
        match self.nodes.get_mut(id) {
            Some(node) => node.layer = layer,
            None => log::warn!("set_layer on stale node {:?} ignored", id),
        }
    }

    /// The collider's shape in world space, if `id` is a stored collider.
    pub fn world_shape(&self, id: NodeId) -> Option<WorldShape> {
        let shape = self.nodes.get(id)?.collider?;
        Some(shape.to_world(&self.global_transform(id)))
    }

    /// Registered colliders overlapping the collider node `collider`, in
    /// registration order.
    pub fn overlap(&self, collider: NodeId) -> Vec<NodeId> {
        self.physics
            .overlap(collider, |other| self.world_shape(other))
    }

    /// Resize every camera's view to the new window size. Cameras attached
    /// later pick the size up on activation.
    pub fn on_window_resize(&mut self, size: Vec2) {
        self.window_size = size;
        for id in self.cameras.iter().collect::<Vec<_>>() {
            if let Some(camera) = self.nodes.get_mut(id).and_then(|n| n.camera.as_mut()) {
                camera.view.size = size;
            }
        }
        log::debug!(
            "Scene '{}' resized to {}x{} ({} cameras)",
            self.name,
            size.x,
            size.y,
            self.cameras.len()
        );
    }

    /// Override one camera's view size, e.g. to zoom. The next window resize
    /// resets it to the window size like every other camera.
    pub fn set_camera_view_size(&mut self, id: NodeId, size: Vec2) {
        match self.nodes.get_mut(id).and_then(|n| n.camera.as_mut()) {
            Some(camera) => camera.view.size = size,
            None => log::warn!("set_camera_view_size: {:?} is not a camera", id),
        }
    }

    // ----- update -----------------------------------------------------------

    /// Advance the scene by one tick: a depth-first walk from the root in
    /// which every attached node applies its queued removals, then its queued
    /// additions, then runs its own update, then updates its children in
    /// order.
    pub fn update(&mut self, input: &InputState) {
        self.tick += 1;
        self.update_node(self.root, input);
    }

    fn update_node(&mut self, id: NodeId, input: &InputState) {
        self.remove_destroyed_children(id, input);
        self.add_queued_children(id, input);

        self.with_behavior(id, input, |behavior, ctx| behavior.update(ctx));
        self.sync_camera(id);

        // The child list only changes in this node's own first two steps,
        // so walking it by index is stable.
        let mut index = 0;
        while let Some(&child) = self.nodes.get(id).and_then(|n| n.children.get(index)) {
            self.update_node(child, input);
            index += 1;
        }
    }

    fn remove_destroyed_children(&mut self, id: NodeId, input: &InputState) {
        let queued = std::mem::take(&mut self.nodes[id].pending_destroy);
        if queued.is_empty() {
            return;
        }

        let children = &self.nodes[id].children;
        let mut doomed: Vec<(usize, NodeId)> = queued
            .into_iter()
            .filter_map(|child| {
                children
                    .iter()
                    .position(|&c| c == child)
                    .map(|index| (index, child))
            })
            .collect();
        // Back to front, so earlier indices stay valid while erasing.
        doomed.sort_unstable_by(|a, b| b.0.cmp(&a.0));
        doomed.dedup_by_key(|(index, _)| *index);

        for (index, child) in doomed {
            self.teardown(child, input);
            self.nodes[id].children.remove(index);
            self.free_subtree(child);
        }
    }

    fn add_queued_children(&mut self, id: NodeId, input: &InputState) {
        let tick = self.tick;
        let node = &mut self.nodes[id];
        if node.pending_add.is_empty() {
            return;
        }
        let (ready, waiting): (Vec<PendingChild>, Vec<PendingChild>) =
            std::mem::take(&mut node.pending_add)
                .into_iter()
                .partition(|p| p.queued_at < tick);
        node.pending_add = waiting;

        for pending in ready {
            // An earlier sibling's on_add may have dropped this one.
            if !self.nodes.contains_key(pending.id) {
                continue;
            }
            self.nodes[id].children.push(pending.id);
            self.activate(pending.id, input);
        }
    }

    fn activate(&mut self, id: NodeId, input: &InputState) {
        let window_size = self.window_size;
        let position = self.global_transform(id).position;
        let node = &mut self.nodes[id];
        node.lifecycle = Lifecycle::Active;
        let has_collider = node.collider.is_some();
        let draw_order = node.camera.as_mut().map(|camera| {
            camera.view.size = window_size;
            camera.view.center = position;
            camera.draw_order
        });
        log::trace!("Activated '{}' {:?}", node.name, id);

        if has_collider {
            self.physics.add_collider(id);
        }
        if let Some(order) = draw_order {
            self.cameras.add_camera(id, order);
        }
        self.with_behavior(id, input, |behavior, ctx| behavior.on_add(ctx));
    }

    fn sync_camera(&mut self, id: NodeId) {
        if self.nodes[id].camera.is_none() {
            return;
        }
        let center = self.global_transform(id).position;
        if let Some(camera) = self.nodes[id].camera.as_mut() {
            camera.view.center = center;
        }
    }

    /// Unregister, notify, then recurse. Storage is left for the caller to
    /// free once the whole subtree has been visited.
    fn teardown(&mut self, id: NodeId, input: &InputState) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if node.lifecycle != Lifecycle::Active {
            return;
        }
        node.lifecycle = Lifecycle::Destroyed;
        let (has_collider, has_camera) = (node.collider.is_some(), node.camera.is_some());
        log::trace!("Tearing down '{}' {:?}", node.name, id);

        if has_collider {
            self.physics.remove_collider(id);
        }
        if has_camera {
            self.cameras.remove_camera(id);
        }
        self.with_behavior(id, input, |behavior, ctx| behavior.on_destroy(ctx));

        let children = self.nodes.get(id).map(|n| n.children.clone()).unwrap_or_default();
        for child in children {
            self.teardown(child, input);
        }
    }

    /// Release the storage of `id`, its children and its queued children.
    fn free_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(next) {
                stack.extend(node.children.iter().copied());
                stack.extend(node.pending_add.iter().map(|p| p.id));
            }
        }
    }

    /// Run `hook` with the node's behavior detached, so the hook can borrow
    /// the scene mutably.
    fn with_behavior<F>(&mut self, id: NodeId, input: &InputState, hook: F)
    where
        F: FnOnce(&mut dyn Behavior, &mut NodeContext<'_>),
    {
        let Some(mut behavior) = self.nodes.get_mut(id).and_then(|n| n.behavior.take()) else {
            return;
        };
        {
            let mut ctx = NodeContext {
                scene: &mut *self,
                node: id,
                input,
            };
            hook(&mut *behavior, &mut ctx);
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.behavior = Some(behavior);
        }
    }

    /// Tear down the whole tree, root included, notifying every attached node
    /// once. The scene is empty afterwards.
    pub fn shutdown(&mut self) {
        let input = InputState::new();
        let root_children = self.nodes[self.root].children.clone();
        for child in root_children {
            self.teardown(child, &input);
        }
        self.with_behavior(self.root, &input, |behavior, ctx| behavior.on_destroy(ctx));
        let root = self.root;
        self.nodes.retain(|id, _| id == root);
        let root = &mut self.nodes[root];
        root.children.clear();
        root.pending_add.clear();
        root.pending_destroy.clear();
        log::info!("Scene '{}' shut down after {} ticks", self.name, self.tick);
    }

    // ----- render -----------------------------------------------------------

    /// One pass per camera in draw order. Each pass sets the camera's view,
    /// then walks the tree depth-first and draws every node whose layer the
    /// camera renders. A filtered-out node's children are still visited.
    pub fn render(&self, target: &mut dyn RenderTarget) {
        for camera_id in self.cameras.iter() {
            let Some(camera) = self.camera(camera_id) else {
                continue;
            };
            target.set_view(camera_id, &camera.view);
            self.draw_node(self.root, camera_id, camera, target);
        }
    }

    fn draw_node(
        &self,
        id: NodeId,
        camera_id: NodeId,
        camera: &Camera,
        target: &mut dyn RenderTarget,
    ) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if camera.renders(node.layer) {
            if let Some(behavior) = node.behavior.as_deref() {
                let ctx = DrawContext {
                    scene: self,
                    node: id,
                    camera: camera_id,
                };
                behavior.draw(&ctx, target);
            }
            if self.debug_colliders {
                if let Some(shape) = node.collider {
                    let shape = shape.to_world(&self.global_transform(id));
                    target.draw(id, DrawCommand::ColliderOutline { shape });
                }
            }
        }
        for &child in &node.children {
            self.draw_node(child, camera_id, camera, target);
        }
    }

    fn expect_node(&self, id: NodeId) -> &Node {
        match self.nodes.get(id) {
            Some(node) => node,
            None => panic!("node {id:?} is not part of scene '{}'", self.name),
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
