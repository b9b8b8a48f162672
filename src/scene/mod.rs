pub mod camera;
pub mod math;
pub mod render;
pub mod room;

pub use camera::{Camera, MoveInput};
pub use render::{paint_scene, TvTextures};
pub use room::{Quad, TvLayout};
