//! Score display on the UI layer. Reads the player's score every tick and
//! keeps showing the last value once the player is gone.

use std::sync::Arc;

use glam::Vec2;
use sprig_core::SpriteSheet;
use sprig_scene::{Behavior, DrawCommand, DrawContext, NodeContext, NodeId, RenderTarget};

use crate::player::Player;

const DIGITS: usize = 6;

pub struct Hud {
    player: NodeId,
    digits: SpriteSheet,
    score: u32,
    player_alive: bool,
}

impl Hud {
    pub fn new(player: NodeId, digits: SpriteSheet) -> Self {
        Self {
            player,
            digits,
            score: 0,
            player_alive: true,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Zero-padded decimal digits of the score, most significant first.
    pub fn digit_values(&self) -> Vec<u32> {
        format!("{:0width$}", self.score, width = DIGITS)
            .chars()
            .filter_map(|c| c.to_digit(10))
            .collect()
    }
}

impl Behavior for Hud {
    fn update(&mut self, ctx: &mut NodeContext<'_>) {
        match ctx.scene().behavior::<Player>(self.player) {
            Some(player) => self.score = player.score(),
            None if self.player_alive => {
                self.player_alive = false;
                log::info!("HUD: player gone, final score {}", self.score);
            }
            None => {}
        }
    }

    fn draw(&self, ctx: &DrawContext<'_>, target: &mut dyn RenderTarget) {
        let texture: Arc<str> = Arc::from(self.digits.texture.as_str());
        let advance = self.digits.frame_size.as_vec2().x;
        let origin = ctx.global_transform();
        for (i, digit) in self.digit_values().into_iter().enumerate() {
            let mut transform = origin;
            transform.position += Vec2::new(advance * i as f32, 0.0);
            target.draw(
                ctx.id(),
                DrawCommand::Sprite {
                    texture: Arc::clone(&texture),
                    frame: self.digits.frame_rect(digit),
                    transform,
                    origin: Vec2::ZERO,
                },
            );
        }
    }
}
