//! Frame driver: owns the active scene, the tick clock and the input state.
//!
//! Each frame:
//!
//!   1. apply a scheduled unload (the scene is shut down and dropped),
//!   2. apply a scheduled load (replacing and shutting down any current scene),
//!   3. run as many fixed ticks as the accumulated time allows, advancing the
//!      input snapshot after each one,
//!   4. render the scene, if any, into the caller's target.
//!
//! Scene switches requested from inside a tick take effect at the start of the
//! next frame, never in the middle of a traversal.

use std::time::Duration;

use glam::Vec2;
use sprig_core::{InputState, TickClock};

use crate::render::RenderTarget;
use crate::scene::Scene;

pub struct Host {
    clock: TickClock,
    input: InputState,
    window_size: Vec2,
    scene: Option<Scene>,
    scheduled: Option<Scene>,
    unload_scheduled: bool,
}

impl Host {
    pub fn new(ticks_per_second: u32, window_size: Vec2) -> Self {
        Self {
            clock: TickClock::new(ticks_per_second),
            input: InputState::new(),
            window_size,
            scene: None,
            scheduled: None,
            unload_scheduled: false,
        }
    }

    /// Make `scene` current at the start of the next frame.
    pub fn load_scene(&mut self, scene: Scene) -> &mut Self {
        if let Some(previous) = self.scheduled.replace(scene) {
            log::warn!(
                "Scene '{}' was scheduled but replaced before it loaded",
                previous.name()
            );
        }
        self
    }

    /// Shut down and drop the current scene at the start of the next frame.
    pub fn unload_scene(&mut self) {
        self.unload_scheduled = true;
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.scene.as_mut()
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn clock(&self) -> &TickClock {
        &self.clock
    }

    pub fn window_size(&self) -> Vec2 {
        self.window_size
    }

    pub fn resize(&mut self, size: Vec2) {
        if size.x <= 0.0 || size.y <= 0.0 {
            log::warn!("Ignoring degenerate window size {}x{}", size.x, size.y);
            return;
        }
        self.window_size = size;
        if let Some(scene) = self.scene.as_mut() {
            scene.on_window_resize(size);
        }
    }

    /// Run one frame. Returns the number of ticks simulated.
    pub fn frame(&mut self, elapsed: Duration, target: &mut dyn RenderTarget) -> u32 {
        if std::mem::take(&mut self.unload_scheduled) {
            match self.scene.take() {
                Some(mut scene) => {
                    scene.shutdown();
                    log::info!("Unloaded scene '{}'", scene.name());
                }
                None => log::warn!("Unload requested with no scene loaded"),
            }
        }

        if let Some(mut next) = self.scheduled.take() {
            if let Some(mut current) = self.scene.take() {
                current.shutdown();
                log::info!("Replaced scene '{}'", current.name());
            }
            next.on_window_resize(self.window_size);
            log::info!("Loaded scene '{}'", next.name());
            self.scene = Some(next);
        }

        self.clock.begin_frame(elapsed);
        let mut ticks = 0;
        while self.clock.should_step() {
            if let Some(scene) = self.scene.as_mut() {
                scene.update(&self.input);
            }
            self.input.end_tick();
            ticks += 1;
        }

        if let Some(scene) = self.scene.as_ref() {
            scene.render(target);
        }
        ticks
    }
}
