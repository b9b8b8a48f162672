pub mod aspect;

pub use aspect::{compute_scale, DisplayMode, DEFAULT_NATIVE_ASPECT};
