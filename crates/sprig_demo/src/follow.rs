use glam::Vec2;
use sprig_scene::{Behavior, NodeContext, NodeId};

/// Keeps its node on the target's global position, clamped to a box. Meant
/// for a camera node parented to the root.
pub struct FollowTarget {
    target: NodeId,
    min: Vec2,
    max: Vec2,
}

impl FollowTarget {
    pub fn new(target: NodeId, min: Vec2, max: Vec2) -> Self {
        Self {
            target,
            min,
            max: max.max(min),
        }
    }

    fn follow(&self, ctx: &mut NodeContext<'_>) {
        if !ctx.scene().is_valid(self.target) {
            return;
        }
        let position = ctx.scene().global_position(self.target);
        ctx.set_local_position(position.clamp(self.min, self.max));
    }
}

impl Behavior for FollowTarget {
    fn on_add(&mut self, ctx: &mut NodeContext<'_>) {
        self.follow(ctx);
    }

    fn update(&mut self, ctx: &mut NodeContext<'_>) {
        self.follow(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprig_core::InputState;
    use sprig_scene::{Layer, Node, Scene};

    #[test]
    fn camera_tracks_target_within_bounds() {
        let mut scene = Scene::new();
        let target = scene.spawn(Node::new().with_position(Vec2::new(50.0, 300.0)));
        let camera = scene.spawn(Node::new_camera(0, Layer::DEFAULT).with_behavior(
            FollowTarget::new(target, Vec2::new(100.0, 200.0), Vec2::new(900.0, 200.0)),
        ));
        let input = InputState::new();
        scene.update(&input);
        scene.update(&input);

        let view = scene.camera(camera).map(|c| c.view.center);
        assert_eq!(view, Some(Vec2::new(100.0, 200.0)));

        scene.set_local_position(target, Vec2::new(500.0, 0.0));
        scene.update(&input);
        let view = scene.camera(camera).map(|c| c.view.center);
        assert_eq!(view, Some(Vec2::new(500.0, 200.0)));

        scene.destroy(target);
        scene.update(&input);
        scene.update(&input);
        let view = scene.camera(camera).map(|c| c.view.center);
        assert_eq!(view, Some(Vec2::new(500.0, 200.0)));
    }
}
