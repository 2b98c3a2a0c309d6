//! Headless demo: builds a small platformer level on the scene framework and
//! drives it from a scripted input file, recording draw commands instead of
//! presenting them.
//!
//! Per frame:
//!
//!   1. apply the script's held keys for this frame to the host input,
//!   2. `Host::frame` runs the fixed ticks the simulated frame time allows,
//!   3. the recorded passes are summarised and dropped.
//!
//! Usage: `sprig_demo [config.json]` (defaults to `assets/config/demo.json`;
//! a missing file falls back to built-in defaults).

mod config;
mod follow;
mod hud;
mod items;
mod level;
mod player;
mod script;

use std::path::Path;
use std::time::Duration;

use sprig_core::animation::{load_animation_file, AnimationFile};
use sprig_core::{AssetCache, Key};
use sprig_scene::{Host, RecordingTarget};

use config::load_config_or_default;
use level::build_level;
use player::Player;
use script::load_script_from_path;

const DEFAULT_CONFIG_PATH: &str = "assets/config/demo.json";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    if let Err(e) = run(Path::new(&config_path)) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(config_path: &Path) -> Result<(), String> {
    let config = load_config_or_default(config_path)?;
    log::info!(
        "sprig demo: {} ticks/s, up to {} frames",
        config.ticks_per_second,
        config.max_frames
    );

    let mut animations: AssetCache<AnimationFile> = AssetCache::new(&config.asset_root);
    let sprites = animations.load(&config.animations, load_animation_file)?;
    let script_path = animations.resolve(&config.input_script);
    let script = load_script_from_path(&script_path)?;
    log::info!(
        "Loaded {} clips and a {}-frame input script",
        sprites.clips.len(),
        script.frame_count()
    );

    let level = build_level(&config, &sprites)?;
    let player = level.player;
    log::debug!(
        "Player {:?}, HUD {:?}, cameras {:?} / {:?}",
        level.player,
        level.hud,
        level.world_camera,
        level.ui_camera
    );
    let mut host = Host::new(config.ticks_per_second, config.window_size());
    host.load_scene(level.scene);

    let frame_time = config.frame_duration();
    let mut target = RecordingTarget::new();
    let mut total_ticks = 0u64;
    let mut total_draws = 0usize;
    let report_every = config.ticks_per_second.max(1) as usize;

    for (frame, held) in script
        .expanded_frames()
        .into_iter()
        .take(config.max_frames as usize)
        .enumerate()
    {
        host.input_mut().set_held(held);
        if host.input().is_just_pressed(Key::Escape) {
            log::info!("Escape pressed on frame {frame}, stopping");
            break;
        }

        target.clear();
        total_ticks += u64::from(host.frame(frame_time, &mut target));
        total_draws += target.draw_count();

        if frame % report_every == 0 {
            report(&host, player, frame);
        }
    }

    let score = host
        .scene()
        .and_then(|scene| scene.behavior::<Player>(player))
        .map(Player::score);
    match score {
        Some(score) => log::info!("Run finished: score {score}"),
        None => log::info!("Run finished: player did not survive"),
    }
    log::info!(
        "{} ticks simulated, {} sprites drawn",
        total_ticks,
        total_draws
    );

    host.unload_scene();
    host.frame(Duration::ZERO, &mut target);
    Ok(())
}

fn report(host: &Host, player: sprig_scene::NodeId, frame: usize) {
    let Some(scene) = host.scene() else {
        return;
    };
    match scene.behavior::<Player>(player) {
        Some(state) => {
            let position = scene.global_position(player);
            log::info!(
                "frame {:>5}: player {:?} at ({:.0}, {:.0}) moving {:?}, score {}, {} colliders",
                frame,
                state.state(),
                position.x,
                position.y,
                state.velocity(),
                state.score(),
                scene.physics().len()
            );
        }
        None => log::info!("frame {:>5}: no player", frame),
    }
}
