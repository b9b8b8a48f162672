use std::time::{Duration, Instant};

use crate::core::PictureKind;
use crate::display::DisplayMode;

/// Number of segments in the volume and picture gauges.
pub const GAUGE_SEGMENTS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayChannel {
    Picture,
    Volume,
    Playback,
    Aspect,
    Subtitle,
}

impl OverlayChannel {
    pub const ALL: [OverlayChannel; 5] = [
        OverlayChannel::Picture,
        OverlayChannel::Volume,
        OverlayChannel::Playback,
        OverlayChannel::Aspect,
        OverlayChannel::Subtitle,
    ];

    /// Channels driven by triggers and auto-hidden by their timer.
    pub fn is_timed(self) -> bool {
        !matches!(self, OverlayChannel::Subtitle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackKind {
    Play,
    Pause,
    Rewind,
    Forward,
}

impl PlaybackKind {
    pub fn label(self) -> &'static str {
        match self {
            PlaybackKind::Play => "PLAY",
            PlaybackKind::Pause => "PAUSE",
            PlaybackKind::Rewind => "REWIND",
            PlaybackKind::Forward => "FORWARD",
        }
    }
}

/// What a trigger asks a channel to show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayPayload {
    Picture(PictureKind, f32),
    Volume(f32),
    Playback(PlaybackKind),
    Aspect(DisplayMode),
}

impl OverlayPayload {
    pub fn channel(&self) -> OverlayChannel {
        match self {
            OverlayPayload::Picture(..) => OverlayChannel::Picture,
            OverlayPayload::Volume(_) => OverlayChannel::Volume,
            OverlayPayload::Playback(_) => OverlayChannel::Playback,
            OverlayPayload::Aspect(_) => OverlayChannel::Aspect,
        }
    }
}

/// Filled gauge segments for `value` out of `max`.
pub fn filled_segments(value: f32, max: f32) -> u32 {
    if !(value.is_finite() && max > 0.0) {
        return 0;
    }
    let ratio = (value / max).clamp(0.0, 1.0);
    (ratio * GAUGE_SEGMENTS as f32).round() as u32
}

/// Visibility and pending auto-hide of one channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelState {
    visible: bool,
    hide_at: Option<Instant>,
    shown_at: Option<Instant>,
}

impl ChannelState {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn shown_at(&self) -> Option<Instant> {
        self.shown_at
    }

    /// Shows the channel and replaces any pending hide with `now + timeout`.
    pub fn show_for(&mut self, now: Instant, timeout: Duration) {
        self.visible = true;
        self.shown_at = Some(now);
        self.hide_at = Some(now + timeout);
    }

    /// Shows without a timer (subtitle channel).
    pub fn show(&mut self, now: Instant) {
        if !self.visible {
            self.shown_at = Some(now);
        }
        self.visible = true;
        self.hide_at = None;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.hide_at = None;
    }

    /// Hides the channel if its timer has run out. Returns true if it just hid.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.hide_at {
            Some(deadline) if now >= deadline => {
                self.hide();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_segments() {
        assert_eq!(filled_segments(0.55, 1.0), 6);
        assert_eq!(filled_segments(1.0, 2.0), 5);
        assert_eq!(filled_segments(2.0, 2.0), 10);
        assert_eq!(filled_segments(0.0, 1.0), 0);
        assert_eq!(filled_segments(1.4, 1.0), 10);
        assert_eq!(filled_segments(f32::NAN, 1.0), 0);
    }

    #[test]
    fn test_restart_replaces_deadline() {
        let start = Instant::now();
        let timeout = Duration::from_millis(5000);
        let mut state = ChannelState::default();

        state.show_for(start, timeout);
        state.show_for(start + Duration::from_millis(3000), timeout);

        assert!(!state.expire(start + Duration::from_millis(5000)));
        assert!(state.is_visible());
        assert!(state.expire(start + Duration::from_millis(8000)));
        assert!(!state.is_visible());
    }

    #[test]
    fn test_untimed_show_never_expires() {
        let start = Instant::now();
        let mut state = ChannelState::default();
        state.show(start);
        assert!(!state.expire(start + Duration::from_secs(3600)));
        assert!(state.is_visible());
    }

    #[test]
    fn test_payload_channels() {
        assert_eq!(OverlayPayload::Volume(0.5).channel(), OverlayChannel::Volume);
        assert_eq!(
            OverlayPayload::Picture(PictureKind::Contrast, 1.0).channel(),
            OverlayChannel::Picture
        );
        assert_eq!(OverlayPayload::Playback(PlaybackKind::Pause).channel(), OverlayChannel::Playback);
        assert_eq!(OverlayPayload::Aspect(DisplayMode::Zoom).channel(), OverlayChannel::Aspect);
        assert!(!OverlayChannel::Subtitle.is_timed());
    }
}
