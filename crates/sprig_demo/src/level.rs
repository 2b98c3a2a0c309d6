//! Builds the demo scene from config: player, pickups, hazards, a world
//! camera that follows the player, and a HUD drawn by a separate UI camera.

use glam::Vec2;
use sprig_core::animation::AnimationFile;
use sprig_core::AnimationClip;
use sprig_scene::{Layer, Node, NodeId, Scene, Shape};

use crate::config::DemoConfig;
use crate::follow::FollowTarget;
use crate::hud::Hud;
use crate::items::{Hazard, Pickup};
use crate::player::Player;

const PLAYER_COLLIDER_SIZE: Vec2 = Vec2::new(32.0, 48.0);
const HUD_MARGIN: Vec2 = Vec2::new(16.0, 16.0);
const HAZARD_TEXTURE: &str = "textures/spikes.png";

pub struct Level {
    pub scene: Scene,
    pub player: NodeId,
    pub hud: NodeId,
    pub world_camera: NodeId,
    pub ui_camera: NodeId,
}

pub fn require_clip<'a>(sprites: &'a AnimationFile, name: &str) -> Result<&'a AnimationClip, String> {
    sprites.clips.get(name).ok_or_else(|| {
        format!(
            "Animation set '{}' is missing clip '{}'",
            sprites.animation_id, name
        )
    })
}

/// Player node at `start` (feet position) with its collider child above the feet.
pub fn spawn_player(
    scene: &mut Scene,
    sprites: &AnimationFile,
    start: Vec2,
    ground_y: f32,
    level_width: f32,
) -> Result<NodeId, String> {
    let player = Player::new(sprites, ground_y, level_width)?;
    let id = scene.spawn(
        Node::new()
            .with_name("Player")
            .with_position(start)
            .with_behavior(player),
    );
    let collider = scene.add_child(
        id,
        Node::new_collider(Shape::rectangle(PLAYER_COLLIDER_SIZE))
            .with_position(Vec2::new(0.0, -PLAYER_COLLIDER_SIZE.y * 0.5)),
    );
    if let Some(player) = scene.behavior_mut::<Player>(id) {
        player.set_collider(collider);
    }
    Ok(id)
}

pub fn spawn_pickup(
    scene: &mut Scene,
    sprites: &AnimationFile,
    position: Vec2,
    radius: f32,
    value: u32,
) -> Result<NodeId, String> {
    let animation = require_clip(sprites, "pickup")?.instantiate();
    let id = scene.spawn(
        Node::new()
            .with_name("Pickup")
            .with_position(position)
            .with_behavior(Pickup::new(value, animation)),
    );
    scene.add_child(id, Node::new_collider(Shape::circle(radius)));
    Ok(id)
}

pub fn spawn_hazard(scene: &mut Scene, center: Vec2, size: Vec2) -> NodeId {
    let id = scene.spawn(
        Node::new()
            .with_name("Hazard")
            .with_position(center)
            .with_behavior(Hazard::new(HAZARD_TEXTURE, size)),
    );
    scene.add_child(id, Node::new_collider(Shape::rectangle(size)));
    id
}

pub fn build_level(config: &DemoConfig, sprites: &AnimationFile) -> Result<Level, String> {
    let level = &config.level;
    let window = config.window_size();
    let mut scene = Scene::new().with_name("demo_level");
    scene.on_window_resize(window);
    scene.set_debug_colliders(config.debug_colliders);

    let [start_x, start_y] = level.player_start;
    let player = spawn_player(
        &mut scene,
        sprites,
        Vec2::new(start_x, start_y),
        level.ground_y,
        level.width,
    )?;

    for pickup in &level.pickups {
        spawn_pickup(
            &mut scene,
            sprites,
            Vec2::new(pickup.x, pickup.y),
            pickup.radius,
            pickup.value,
        )?;
    }
    for hazard in &level.hazards {
        spawn_hazard(
            &mut scene,
            Vec2::new(hazard.x, hazard.y),
            Vec2::new(hazard.width, hazard.height),
        );
    }

    let half = window * 0.5;
    let camera_y = level.ground_y - half.y * 0.5;
    let world_camera = scene.spawn(
        Node::new_camera(0, Layer::DEFAULT)
            .with_name("WorldCamera")
            .with_behavior(FollowTarget::new(
                player,
                Vec2::new(half.x, camera_y),
                Vec2::new(level.width - half.x, camera_y),
            )),
    );

    // The UI camera sits still with the window's top-left corner at the origin.
    let ui_camera = scene.spawn(
        Node::new_camera(1, Layer::UI)
            .with_name("UiCamera")
            .with_position(half),
    );
    let digits = require_clip(sprites, "digits")?.sheet.clone();
    let hud = scene.spawn(
        Node::new()
            .with_name("Hud")
            .with_layer(Layer::UI)
            .with_position(HUD_MARGIN)
            .with_behavior(Hud::new(player, digits)),
    );

    log::info!(
        "Built level: {} pickups, {} hazards, {}x{} window",
        level.pickups.len(),
        level.hazards.len(),
        window.x,
        window.y
    );
    Ok(Level {
        scene,
        player,
        hud,
        world_camera,
        ui_camera,
    })
}

#[cfg(test)]
pub(crate) fn test_sprites() -> AnimationFile {
    sprig_core::animation::parse_animation_file(include_str!(
        "../../../assets/animations/sprites.json"
    ))
    .expect("bundled sprites parse")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HazardConfig, PickupConfig};
    use crate::player::PlayerState;
    use sprig_core::{InputState, Key};
    use sprig_scene::{DrawCommand, RecordingTarget};

    fn config() -> DemoConfig {
        let mut config = DemoConfig::default();
        config.level.pickups = vec![PickupConfig {
            x: 200.0,
            y: 580.0,
            radius: 12.0,
            value: 500,
        }];
        config.level.hazards = vec![HazardConfig {
            x: 1200.0,
            y: 592.0,
            width: 32.0,
            height: 16.0,
        }];
        config
    }

    #[test]
    fn level_renders_world_then_ui() {
        let sprites = test_sprites();
        let level = build_level(&config(), &sprites).expect("level builds");
        let mut scene = level.scene;
        scene.update(&InputState::new());
        scene.update(&InputState::new());

        let mut target = RecordingTarget::new();
        scene.render(&mut target);
        assert_eq!(target.camera_order(), vec![level.world_camera, level.ui_camera]);

        let world = target.drawn_nodes(0);
        assert!(world.contains(&level.player));
        assert!(!world.contains(&level.hud));
        assert_eq!(world.len(), 3, "player, pickup and hazard");

        let ui = target.drawn_nodes(1);
        assert_eq!(ui.len(), 6, "one sprite per HUD digit");
        assert!(ui.iter().all(|&id| id == level.hud));
        assert_eq!(target.passes[1].view.center, Vec2::new(640.0, 360.0));
    }

    #[test]
    fn collecting_updates_hud_digits() {
        let sprites = test_sprites();
        let level = build_level(&config(), &sprites).expect("level builds");
        let mut scene = level.scene;
        let mut input = InputState::new();
        input.key_down(Key::D);
        for _ in 0..40 {
            scene.update(&input);
            input.end_tick();
        }

        let hud = scene.behavior::<Hud>(level.hud).expect("hud");
        assert_eq!(hud.score(), 500);
        assert_eq!(hud.digit_values(), vec![0, 0, 0, 5, 0, 0]);
        assert_eq!(
            scene.behavior::<Player>(level.player).map(Player::state),
            Some(PlayerState::Run)
        );
    }

    #[test]
    fn debug_outlines_cover_every_collider() {
        let sprites = test_sprites();
        let mut config = config();
        config.debug_colliders = true;
        let level = build_level(&config, &sprites).expect("level builds");
        let mut scene = level.scene;
        scene.update(&InputState::new());
        scene.update(&InputState::new());

        let mut target = RecordingTarget::new();
        scene.render(&mut target);
        let outlines = target.passes[0]
            .draws
            .iter()
            .filter(|(_, cmd)| matches!(cmd, DrawCommand::ColliderOutline { .. }))
            .count();
        assert_eq!(outlines, 3);
        assert_eq!(scene.physics().len(), 3);
    }

    #[test]
    fn missing_clip_fails_the_build() {
        let mut sprites = test_sprites();
        sprites.clips.remove("digits");
        let err = build_level(&config(), &sprites).err().expect("must fail");
        assert!(err.contains("'digits'"), "{err}");
    }
}
