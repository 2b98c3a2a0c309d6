use std::sync::Arc;

use glam::Vec2;
use sprig_core::SpriteAnimation;
use sprig_scene::{Behavior, DrawCommand, DrawContext, NodeContext, RenderTarget};

/// A collectible worth `value` points. Its collider is a child node.
pub struct Pickup {
    value: u32,
    animation: SpriteAnimation,
    collected: bool,
}

impl Pickup {
    pub fn new(value: u32, animation: SpriteAnimation) -> Self {
        Self {
            value,
            animation,
            collected: false,
        }
    }

    /// Returns the value the first time only.
    pub fn collect(&mut self) -> Option<u32> {
        if self.collected {
            return None;
        }
        self.collected = true;
        Some(self.value)
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }
}

impl Behavior for Pickup {
    fn update(&mut self, _ctx: &mut NodeContext<'_>) {
        self.animation.tick();
    }

    fn draw(&self, ctx: &DrawContext<'_>, target: &mut dyn RenderTarget) {
        if self.collected {
            return;
        }
        let sheet = self.animation.sheet();
        target.draw(
            ctx.id(),
            DrawCommand::Sprite {
                texture: Arc::from(sheet.texture.as_str()),
                frame: self.animation.frame_rect(),
                transform: ctx.global_transform(),
                origin: sheet.frame_size.as_vec2() * 0.5,
            },
        );
    }
}

/// Static obstacle; touching it kills the player.
pub struct Hazard {
    texture: Arc<str>,
    size: Vec2,
}

impl Hazard {
    pub fn new(texture: &str, size: Vec2) -> Self {
        Self {
            texture: Arc::from(texture),
            size,
        }
    }
}

impl Behavior for Hazard {
    fn draw(&self, ctx: &DrawContext<'_>, target: &mut dyn RenderTarget) {
        target.draw(
            ctx.id(),
            DrawCommand::Sprite {
                texture: Arc::clone(&self.texture),
                frame: sprig_core::FrameRect {
                    x: 0,
                    y: 0,
                    w: self.size.x as u32,
                    h: self.size.y as u32,
                },
                transform: ctx.global_transform(),
                origin: self.size * 0.5,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::test_sprites;

    #[test]
    fn pickup_pays_out_once() {
        let sprites = test_sprites();
        let mut pickup = Pickup::new(250, sprites.clips["pickup"].instantiate());
        assert!(!pickup.is_collected());
        assert_eq!(pickup.collect(), Some(250));
        assert_eq!(pickup.collect(), None);
        assert!(pickup.is_collected());
    }
}
