pub mod config;
pub mod error;
pub mod picture;


pub use config::*;
pub use error::*;
pub use picture::*;
