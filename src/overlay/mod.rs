pub mod channel;
pub mod compositor;
pub mod surface;
pub mod text;

pub use channel::{filled_segments, OverlayChannel, OverlayPayload, PlaybackKind, GAUGE_SEGMENTS};
pub use compositor::OverlayCompositor;
pub use surface::RasterSurface;
pub use text::TextPainter;
