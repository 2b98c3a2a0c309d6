pub mod behavior;
pub mod camera;
pub mod collider;
pub mod host;
pub mod layer;
pub mod node;
pub mod physics;
pub mod render;
pub mod scene;
pub mod transform;

pub use behavior::{Behavior, DrawContext, NodeContext};
pub use camera::{Camera, CameraManager, View};
pub use collider::{Shape, WorldShape};
pub use host::Host;
pub use layer::Layer;
pub use node::{Node, NodeId};
pub use physics::Physics;
pub use render::{DrawCommand, RecordedPass, RecordingTarget, RenderTarget};
pub use scene::{Scene, DEFAULT_WINDOW_SIZE};
pub use transform::Transform2D;
