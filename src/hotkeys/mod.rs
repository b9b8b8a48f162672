pub mod events;
pub mod manager;
mod tests;

pub use events::{HotkeyEvent, HotkeyId};
pub use manager::{FrameInput, HotkeyManager};
