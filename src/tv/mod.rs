pub mod controller;

pub use controller::TvController;
