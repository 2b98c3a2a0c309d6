//! Cameras and their draw-order registry.
//!
//! A camera is a node carrying a [`Camera`] component. On activation its view
//! size is taken from the scene's window size and it registers with the
//! scene's [`CameraManager`]; every tick its view center follows the node's
//! global position. The render pass visits cameras in ascending draw order,
//! ties broken by registration order.

use glam::Vec2;

use crate::layer::Layer;
use crate::node::NodeId;
use crate::scene::DEFAULT_WINDOW_SIZE;

/// The world-space rectangle a camera shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub center: Vec2,
    pub size: Vec2,
}

impl View {
    pub fn min(&self) -> Vec2 {
        self.center - self.size * 0.5
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.size * 0.5
    }
}

impl Default for View {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            size: DEFAULT_WINDOW_SIZE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Camera {
    pub draw_order: i32,
    pub render_layers: Layer,
    pub view: View,
}

impl Camera {
    pub fn new(draw_order: i32, render_layers: Layer) -> Self {
        Self {
            draw_order,
            render_layers,
            view: View::default(),
        }
    }

    pub fn renders(&self, layer: Layer) -> bool {
        self.render_layers.intersects(layer)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(0, Layer::DEFAULT)
    }
}

#[derive(Debug, Clone, Copy)]
struct CameraEntry {
    draw_order: i32,
    sequence: u64,
    node: NodeId,
}

#[derive(Debug, Default)]
pub struct CameraManager {
    entries: Vec<CameraEntry>,
    next_sequence: u64,
}

impl CameraManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_camera(&mut self, node: NodeId, draw_order: i32) {
        if self.contains(node) {
            return;
        }
        let entry = CameraEntry {
            draw_order,
            sequence: self.next_sequence,
            node,
        };
        self.next_sequence += 1;
        let index = self
            .entries
            .partition_point(|e| (e.draw_order, e.sequence) < (entry.draw_order, entry.sequence));
        self.entries.insert(index, entry);
        log::debug!("Camera {:?} registered with draw order {}", node, draw_order);
    }

    pub(crate) fn remove_camera(&mut self, node: NodeId) {
        self.entries.retain(|e| e.node != node);
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.entries.iter().any(|e| e.node == node)
    }

    /// Cameras in render order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.iter().map(|e| e.node)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
