pub mod loader;
pub mod parser;
pub mod track;

pub use loader::{SubtitleLoadResult, SubtitleLoader};
pub use parser::{parse, Cue, SubtitleFormat};
pub use track::SubtitleTrack;
