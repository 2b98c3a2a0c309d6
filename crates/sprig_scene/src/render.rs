//! Output side of the render pass.
//!
//! The scene never talks to a graphics API. It switches the target's view once
//! per camera and hands it draw commands in traversal order; the backend turns
//! those into quads, outlines, or whatever it likes.

use std::sync::Arc;

use sprig_core::FrameRect;

use crate::camera::View;
use crate::collider::WorldShape;
use crate::node::NodeId;
use crate::transform::Transform2D;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Sprite {
        texture: Arc<str>,
        frame: FrameRect,
        transform: Transform2D,
        origin: glam::Vec2,
    },
    ColliderOutline {
        shape: WorldShape,
    },
}

pub trait RenderTarget {
    /// Called once per camera pass before any of that pass's draws.
    fn set_view(&mut self, camera: NodeId, view: &View);

    fn draw(&mut self, node: NodeId, command: DrawCommand);
}

#[derive(Debug, Clone)]
pub struct RecordedPass {
    pub camera: NodeId,
    pub view: View,
    pub draws: Vec<(NodeId, DrawCommand)>,
}

/// Keeps every pass of the last render in memory.
#[derive(Debug, Default)]
pub struct RecordingTarget {
    pub passes: Vec<RecordedPass>,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.passes.clear();
    }

    pub fn camera_order(&self) -> Vec<NodeId> {
        self.passes.iter().map(|p| p.camera).collect()
    }

    /// Nodes drawn in the given pass, in draw order.
    pub fn drawn_nodes(&self, pass: usize) -> Vec<NodeId> {
        self.passes
            .get(pass)
            .map(|p| p.draws.iter().map(|(node, _)| *node).collect())
            .unwrap_or_default()
    }

    pub fn draw_count(&self) -> usize {
        self.passes.iter().map(|p| p.draws.len()).sum()
    }
}

impl RenderTarget for RecordingTarget {
    fn set_view(&mut self, camera: NodeId, view: &View) {
        self.passes.push(RecordedPass {
            camera,
            view: *view,
            draws: Vec::new(),
        });
    }

    fn draw(&mut self, node: NodeId, command: DrawCommand) {
        match self.passes.last_mut() {
            Some(pass) => pass.draws.push((node, command)),
            None => log::warn!("Draw for {:?} issued before any view was set", node),
        }
    }
}
