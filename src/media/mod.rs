pub mod audio;
pub mod probe;
pub mod session;
pub mod snapshot;
pub mod source;

pub use probe::MediaInfo;
pub use session::{MediaEvent, MediaSession, VideoFrame};
pub use snapshot::{format_time, PlaybackSnapshot};
pub use source::{normalize_url, MediaSource};
