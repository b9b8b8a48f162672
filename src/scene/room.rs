use crate::core::ScreenBounds;
use crate::overlay::OverlayChannel;

pub const ROOM_WIDTH: f32 = 10.0;
pub const ROOM_HEIGHT: f32 = 4.0;
pub const ROOM_DEPTH: f32 = 10.0;

/// Center of the TV group, low and centered on the front wall.
pub const TV_CENTER: [f32; 3] = [0.0, 0.2, -4.9];

const SCREEN_DEPTH: f32 = 0.054;
const OVERLAY_DEPTH: f32 = 0.11;
const SUBTITLE_QUAD: (f32, f32) = (2.2, 0.3);
/// Overlay band height as a fraction of the TV body height.
const BAND_HEIGHT: f32 = 0.18;

/// Flat rectangle facing the viewer (+z).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub center: [f32; 3],
    pub width: f32,
    pub height: f32,
}

impl Quad {
    /// Top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [[f32; 3]; 4] {
        let [cx, cy, cz] = self.center;
        let (hw, hh) = (self.width / 2.0, self.height / 2.0);
        [
            [cx - hw, cy + hh, cz],
            [cx + hw, cy + hh, cz],
            [cx + hw, cy - hh, cz],
            [cx - hw, cy - hh, cz],
        ]
    }

    pub fn contains_xy(&self, x: f32, y: f32) -> bool {
        (x - self.center[0]).abs() <= self.width / 2.0 && (y - self.center[1]).abs() <= self.height / 2.0
    }
}

/// TV geometry derived from the screen bounds so the fit calculation and
/// the drawn screen agree on one size.
#[derive(Debug, Clone, Copy)]
pub struct TvLayout {
    bounds: ScreenBounds,
    body_width: f32,
    body_height: f32,
}

impl TvLayout {
    pub fn new(bounds: ScreenBounds) -> Self {
        Self {
            bounds,
            body_width: bounds.width / 0.92,
            body_height: bounds.height / 0.87,
        }
    }

    pub fn body(&self) -> Quad {
        Quad {
            center: TV_CENTER,
            width: self.body_width,
            height: self.body_height,
        }
    }

    /// Black panel behind the video, the full screen bounds.
    pub fn screen_area(&self) -> Quad {
        Quad {
            center: [TV_CENTER[0], TV_CENTER[1], TV_CENTER[2] + SCREEN_DEPTH / 2.0],
            width: self.bounds.width,
            height: self.bounds.height,
        }
    }

    /// Video quad for the fitted `(sx, sy)` scale.
    pub fn video(&self, scale: (f32, f32)) -> Quad {
        Quad {
            center: [TV_CENTER[0], TV_CENTER[1], TV_CENTER[2] + SCREEN_DEPTH],
            width: self.bounds.width * scale.0,
            height: self.bounds.height * scale.1,
        }
    }

    /// Where a channel's surface is drawn on the TV. Timed channels get
    /// stacked rows of one band height each so they never overlap.
    pub fn overlay(&self, channel: OverlayChannel) -> Quad {
        let z = TV_CENTER[2] + OVERLAY_DEPTH;
        let band = |offset: f32| Quad {
            center: [TV_CENTER[0], TV_CENTER[1] + offset * self.body_height, z],
            width: self.body_width * 0.92,
            height: self.body_height * BAND_HEIGHT,
        };
        match channel {
            OverlayChannel::Volume => band(-BAND_HEIGHT),
            OverlayChannel::Picture => band(0.0),
            OverlayChannel::Aspect => band(BAND_HEIGHT),
            OverlayChannel::Playback => band(2.0 * BAND_HEIGHT),
            OverlayChannel::Subtitle => Quad {
                center: [TV_CENTER[0], TV_CENTER[1] - 0.33 * self.body_height, z],
                width: SUBTITLE_QUAD.0,
                height: SUBTITLE_QUAD.1,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_surrounds_screen() {
        let layout = TvLayout::new(ScreenBounds::default());
        let body = layout.body();
        let screen = layout.screen_area();
        assert!((screen.width / body.width - 0.92).abs() < 1e-5);
        assert!((screen.height / body.height - 0.87).abs() < 1e-5);
    }

    #[test]
    fn test_video_quad_never_exceeds_screen_area() {
        let layout = TvLayout::new(ScreenBounds::default());
        let video = layout.video((1.0, 0.75));
        assert_eq!(video.width, 2.3);
        assert!((video.height - 0.975).abs() < 1e-6);
    }

    #[test]
    fn test_overlay_bands() {
        let layout = TvLayout::new(ScreenBounds::default());
        let gauge = layout.overlay(OverlayChannel::Volume);
        assert!(layout.overlay(OverlayChannel::Playback).center[1] > TV_CENTER[1]);
        assert!(layout.overlay(OverlayChannel::Subtitle).center[1] < gauge.center[1]);
        assert!(gauge.center[2] > layout.video((1.0, 1.0)).center[2]);
    }

    #[test]
    fn test_timed_overlays_do_not_overlap() {
        let layout = TvLayout::new(ScreenBounds::default());
        let timed = [
            OverlayChannel::Picture,
            OverlayChannel::Volume,
            OverlayChannel::Aspect,
            OverlayChannel::Playback,
        ];
        for (i, a) in timed.iter().enumerate() {
            for b in &timed[i + 1..] {
                let (qa, qb) = (layout.overlay(*a), layout.overlay(*b));
                let gap = (qa.center[1] - qb.center[1]).abs();
                assert!(gap >= (qa.height + qb.height) / 2.0 - 1e-5, "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_quad_corners_and_contains() {
        let quad = Quad { center: [0.0, 1.0, -2.0], width: 2.0, height: 1.0 };
        let corners = quad.corners();
        assert_eq!(corners[0], [-1.0, 1.5, -2.0]);
        assert_eq!(corners[2], [1.0, 0.5, -2.0]);
        assert!(quad.contains_xy(0.9, 0.6));
        assert!(!quad.contains_xy(1.1, 1.0));
    }
}
