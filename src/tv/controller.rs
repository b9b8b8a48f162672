use std::time::Instant;

use crate::core::{AppConfig, PictureChange, PictureKind, PictureSettings, ScreenBounds};
use crate::display::{compute_scale, DisplayMode, DEFAULT_NATIVE_ASPECT};
use crate::overlay::{OverlayCompositor, OverlayPayload, TextPainter};
use crate::subtitles::{SubtitleFormat, SubtitleTrack};

/// Everything the TV shows besides the video pixels themselves.
///
/// Input handlers and the panel go through this instead of sharing loose
/// globals: picture settings, the display mode, the loaded subtitle track
/// and the overlay compositor all live here.
pub struct TvController {
    bounds: ScreenBounds,
    picture: PictureSettings,
    mode: DisplayMode,
    native_aspect: f32,
    screen_scale: (f32, f32),
    subtitles: Option<SubtitleTrack>,
    subtitles_enabled: bool,
    compositor: OverlayCompositor,
}

impl TvController {
    pub fn new(config: &AppConfig) -> Self {
        let bounds = config.screen;
        let mode = DisplayMode::default();
        Self {
            bounds,
            picture: PictureSettings::default(),
            mode,
            native_aspect: DEFAULT_NATIVE_ASPECT,
            screen_scale: compute_scale(DEFAULT_NATIVE_ASPECT, mode, bounds.aspect_ratio()),
            subtitles: None,
            subtitles_enabled: false,
            compositor: OverlayCompositor::new(&config.overlay),
        }
    }

    /// Creates the overlay surfaces. Triggers before this are dropped silently.
    pub fn initialize_overlays(&mut self, painter: TextPainter) {
        self.compositor.initialize(painter);
    }

    pub fn trigger(&mut self, payload: OverlayPayload) -> bool {
        self.compositor.trigger(payload)
    }

    /// Advances to the next display mode, refits the screen and shows the mode name.
    pub fn cycle_aspect_mode(&mut self) -> DisplayMode {
        self.mode = self.mode.next();
        self.refit();
        log::info!("Display mode: {}", self.mode.name());
        self.compositor.trigger(OverlayPayload::Aspect(self.mode));
        self.mode
    }

    pub fn set_picture_value(&mut self, kind: PictureKind, change: PictureChange) -> f32 {
        let value = self.picture.apply(kind, change);
        log::debug!("{} set to {:.2}", kind.display_name(), value);
        self.compositor.trigger(OverlayPayload::Picture(kind, value));
        value
    }

    /// Parses `document` and replaces the current track with it.
    /// Returns the number of cues now loaded.
    pub fn load_subtitles(&mut self, document: &str, format: SubtitleFormat) -> usize {
        let track = SubtitleTrack::parse("document", document, format);
        if track.is_empty() {
            log::warn!("Subtitle document produced no cues ({:?})", format);
        }
        let count = track.cues().len();
        self.subtitles = Some(track);
        count
    }

    pub fn subtitles(&self) -> Option<&SubtitleTrack> {
        self.subtitles.as_ref()
    }

    pub fn set_subtitles_enabled(&mut self, enabled: bool) {
        self.subtitles_enabled = enabled;
    }

    pub fn toggle_subtitles(&mut self) -> bool {
        self.set_subtitles_enabled(!self.subtitles_enabled);
        self.subtitles_enabled
    }

    pub fn subtitles_enabled(&self) -> bool {
        self.subtitles_enabled
    }

    /// Media metadata arrived: remember the real aspect ratio and refit.
    pub fn set_native_size(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!("Ignoring empty native size {}x{}", width, height);
            return;
        }
        self.native_aspect = width as f32 / height as f32;
        self.refit();
        log::info!(
            "Native size {}x{} (aspect {:.3}), screen scale {:.4} x {:.4}",
            width,
            height,
            self.native_aspect,
            self.screen_scale.0,
            self.screen_scale.1
        );
    }

    fn refit(&mut self) {
        self.screen_scale = compute_scale(self.native_aspect, self.mode, self.bounds.aspect_ratio());
    }

    /// Per-frame work: expire overlay timers and follow the playback position with the captions.
    pub fn on_frame(&mut self, position: Option<f64>, now: Instant) {
        self.compositor.tick(now);
        let enabled = self.subtitles_enabled && position.is_some();
        self.compositor
            .update_subtitle(self.subtitles.as_ref(), enabled, position.unwrap_or(0.0), now);
    }

    pub fn screen_scale(&self) -> (f32, f32) {
        self.screen_scale
    }

    /// World-space size of the video quad after fitting.
    pub fn bounds(&self) -> ScreenBounds {
        self.bounds
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn native_aspect(&self) -> f32 {
        self.native_aspect
    }

    pub fn picture(&self) -> &PictureSettings {
        &self.picture
    }

    pub fn compositor(&self) -> &OverlayCompositor {
        &self.compositor
    }

    pub fn compositor_mut(&mut self) -> &mut OverlayCompositor {
        &mut self.compositor
    }
}
