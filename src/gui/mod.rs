pub mod app;
pub mod control_panel;
pub mod notices;
pub mod settings_window;
pub mod timeline;


pub use app::*;
