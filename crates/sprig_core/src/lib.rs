pub mod animation;
pub mod any;
pub mod assets;
pub mod fsm;
pub mod input;
pub mod time;

pub use any::AsAny;
pub use animation::{AnimationClip, AnimationEvent, FrameRect, SpriteAnimation, SpriteSheet};
pub use assets::AssetCache;
pub use fsm::{Fsm, State, Transition};
pub use input::{InputState, Key};
pub use time::TickClock;
