//! The player: keyboard-driven kinematics on a flat floor, an animation FSM,
//! and pickup/hazard contacts resolved through the physics overlap query.
//!
//! World space is y-down, so jumping makes the vertical velocity negative.

use std::sync::Arc;

use glam::Vec2;
use sprig_core::animation::AnimationFile;
use sprig_core::{AnimationEvent, Fsm, Key, SpriteAnimation, State, Transition};
use sprig_scene::{Behavior, DrawCommand, DrawContext, NodeContext, NodeId, RenderTarget};

use crate::items::{Hazard, Pickup};
use crate::level::require_clip;

/// Sprite art is authored at half the on-screen size.
const SPRITE_SCALE: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerState {
    Idle,
    Run,
    Jump,
    Fall,
    Hit,
}

impl PlayerState {
    pub fn clip_name(self) -> &'static str {
        match self {
            PlayerState::Idle => "idle",
            PlayerState::Run => "run",
            PlayerState::Jump => "jump",
            PlayerState::Fall => "fall",
            PlayerState::Hit => "hit",
        }
    }
}

#[derive(Debug, Default)]
pub struct PlayerContext {
    pub velocity: Vec2,
    pub on_ground: bool,
    pub dead: bool,
    /// Set once the hit animation has played out.
    pub hit_finished: bool,
}

/// Plays one clip while active.
struct ClipState {
    animation: SpriteAnimation,
}

impl State<PlayerContext> for ClipState {
    fn on_enter(&mut self, _context: &mut PlayerContext) {
        self.animation.start();
    }

    fn update(&mut self, context: &mut PlayerContext) {
        if self.animation.tick() == Some(AnimationEvent::Finished) && context.dead {
            context.hit_finished = true;
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Tuning {
    pub speed: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            speed: 4.0,
            gravity: 1.0,
            jump_impulse: 15.0,
        }
    }
}

pub struct Player {
    fsm: Fsm<PlayerState, PlayerContext>,
    tuning: Tuning,
    collider: Option<NodeId>,
    ground_y: f32,
    level_width: f32,
    facing: f32,
    score: u32,
}

impl Player {
    pub fn new(sprites: &AnimationFile, ground_y: f32, level_width: f32) -> Result<Self, String> {
        use PlayerState::*;

        let clip = |state: PlayerState| -> Result<Box<dyn State<PlayerContext>>, String> {
            let clip = require_clip(sprites, state.clip_name())?;
            Ok(Box::new(ClipState {
                animation: clip.instantiate(),
            }))
        };

        let mut fsm = Fsm::new(PlayerContext::default(), Idle, clip(Idle)?);
        for state in [Run, Jump, Fall, Hit] {
            fsm.add_state(state, clip(state)?);
        }

        fsm.add_transition(Transition::new(Idle, Run, |c: &PlayerContext| c.velocity.x != 0.0));
        fsm.add_transition(Transition::new(Run, Idle, |c: &PlayerContext| c.velocity.x == 0.0));
        fsm.add_transition(Transition::new(Idle, Jump, |c: &PlayerContext| c.velocity.y < 0.0));
        fsm.add_transition(Transition::new(Run, Jump, |c: &PlayerContext| c.velocity.y < 0.0));
        fsm.add_transition(Transition::new(Jump, Fall, |c: &PlayerContext| {
            c.velocity.y > 0.0 && !c.on_ground
        }));
        fsm.add_transition(Transition::new(Jump, Idle, |c: &PlayerContext| c.on_ground));
        fsm.add_transition(Transition::new(Fall, Idle, |c: &PlayerContext| c.on_ground));
        for from in [Idle, Run, Jump, Fall] {
            fsm.add_transition(Transition::new(from, Hit, |c: &PlayerContext| c.dead));
        }

        Ok(Self {
            fsm,
            tuning: Tuning::default(),
            collider: None,
            ground_y,
            level_width,
            facing: 1.0,
            score: 0,
        })
    }

    pub fn set_collider(&mut self, collider: NodeId) {
        self.collider = Some(collider);
    }

    pub fn state(&self) -> PlayerState {
        *self.fsm.current()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn velocity(&self) -> Vec2 {
        self.fsm.context().velocity
    }

    pub fn is_dead(&self) -> bool {
        self.fsm.context().dead
    }

    pub fn take_damage(&mut self) {
        let context = self.fsm.context_mut();
        if !context.dead {
            context.dead = true;
            log::info!("Player hit");
        }
    }

    pub fn current_animation(&self) -> Option<&SpriteAnimation> {
        self.fsm
            .state::<ClipState>(self.fsm.current())
            .map(|s| &s.animation)
    }

    fn resolve_contacts(&mut self, ctx: &mut NodeContext<'_>) {
        let Some(collider) = self.collider else {
            return;
        };
        if !ctx.scene().is_valid(collider) {
            return;
        }

        for other in ctx.overlap(collider) {
            let Some(owner) = ctx.scene().parent(other) else {
                continue;
            };
            let collected = ctx
                .scene_mut()
                .behavior_mut::<Pickup>(owner)
                .and_then(Pickup::collect);
            if let Some(value) = collected {
                self.score += value;
                ctx.destroy_node(owner);
                log::debug!("Collected pickup {:?} (+{}, score {})", owner, value, self.score);
            } else if ctx.scene().behavior::<Hazard>(owner).is_some() {
                self.take_damage();
            }
        }
    }
}

impl Behavior for Player {
    fn update(&mut self, ctx: &mut NodeContext<'_>) {
        self.fsm.update();

        if self.fsm.context().hit_finished {
            log::info!("Player died with score {}", self.score);
            ctx.destroy();
            return;
        }
        if self.fsm.context().dead {
            return;
        }

        let input = ctx.input();
        let mut direction = 0.0;
        if input.is_held(Key::A) || input.is_held(Key::Left) {
            direction -= 1.0;
            self.facing = -1.0;
        }
        if input.is_held(Key::D) || input.is_held(Key::Right) {
            direction += 1.0;
            self.facing = 1.0;
        }
        let jump = input.is_just_pressed(Key::Space) || input.is_just_pressed(Key::W);

        let tuning = self.tuning;
        let context = self.fsm.context_mut();
        context.velocity.x = direction * tuning.speed;
        context.velocity.y += tuning.gravity;
        if context.on_ground && jump {
            context.velocity.y -= tuning.jump_impulse;
        }

        let mut position = ctx.local_transform().position + context.velocity;
        position.x = position.x.clamp(0.0, self.level_width);
        if position.y >= self.ground_y {
            position.y = self.ground_y;
            context.velocity.y = 0.0;
            context.on_ground = true;
        } else {
            context.on_ground = false;
        }
        ctx.set_local_position(position);

        self.resolve_contacts(ctx);
    }

    fn draw(&self, ctx: &DrawContext<'_>, target: &mut dyn RenderTarget) {
        let Some(animation) = self.current_animation() else {
            return;
        };
        let sheet = animation.sheet();
        let mut transform = ctx.global_transform();
        transform.scale *= Vec2::new(self.facing, 1.0) * SPRITE_SCALE;
        target.draw(
            ctx.id(),
            DrawCommand::Sprite {
                texture: Arc::from(sheet.texture.as_str()),
                frame: animation.frame_rect(),
                transform,
                origin: sheet.frame_size.as_vec2() * Vec2::new(0.5, 1.0),
            },
        );
    }
}
