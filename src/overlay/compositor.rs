use image::{Rgba, RgbaImage};
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::core::{OverlayConfig, PICTURE_MAX};
use crate::overlay::channel::{filled_segments, ChannelState, OverlayChannel, OverlayPayload, GAUGE_SEGMENTS};
use crate::overlay::surface::{RasterSurface, BLACK, WHITE};
use crate::overlay::text::{HAlign, TextPainter, TextStyle};
use crate::subtitles::SubtitleTrack;

const LABEL_SIZE: f32 = 40.0;
const SUBTITLE_SIZE: f32 = 48.0;
const CAPTION_MARGIN: f32 = 8.0;
const SHADOW: Rgba<u8> = Rgba([0, 0, 0, 150]);

// Gauge layout on the 1024x128 canvas
const GAUGE_LEFT_MARGIN: f32 = 100.0;
const GAUGE_GAP: f32 = 20.0;
const BAR_WIDTH: u32 = 18;
const BAR_HEIGHT: u32 = 36;
const BAR_SPACING: u32 = 6;
const PLAYBACK_MARGIN: f32 = 48.0;

struct ChannelSlot {
    state: ChannelState,
    surface: Option<RasterSurface>,
}

/// Owns the heads-up overlay surfaces and their auto-hide timers.
///
/// Each channel is independent: triggering one rewrites only its own
/// surface and restarts only its own timer. Surfaces exist once
/// [`OverlayCompositor::initialize`] has run; before that every trigger
/// is ignored.
pub struct OverlayCompositor {
    slots: HashMap<OverlayChannel, ChannelSlot>,
    painter: Option<TextPainter>,
    timeout: Duration,
    surface_size: (u32, u32),
    subtitle_text: Option<String>,
}

impl OverlayCompositor {
    pub fn new(config: &OverlayConfig) -> Self {
        let slots = OverlayChannel::ALL
            .iter()
            .map(|channel| {
                (
                    *channel,
                    ChannelSlot {
                        state: ChannelState::default(),
                        surface: None,
                    },
                )
            })
            .collect();

        Self {
            slots,
            painter: None,
            timeout: Duration::from_millis(config.timeout_ms),
            surface_size: (config.surface_width, config.surface_height),
            subtitle_text: None,
        }
    }

    /// Creates the raster surfaces. Until this runs, triggers are no-ops.
    pub fn initialize(&mut self, painter: TextPainter) {
        let (width, height) = self.surface_size;
        for slot in self.slots.values_mut() {
            slot.surface = Some(RasterSurface::new(width, height));
        }
        self.painter = Some(painter);
        log::debug!("Overlay surfaces initialized at {}x{}", width, height);
    }

    pub fn trigger(&mut self, payload: OverlayPayload) -> bool {
        self.trigger_at(payload, Instant::now())
    }

    /// Redraws the payload's channel, shows it and restarts its hide timer.
    /// Returns false if the surfaces are not initialized yet.
    pub fn trigger_at(&mut self, payload: OverlayPayload, now: Instant) -> bool {
        let channel = payload.channel();
        let timeout = self.timeout;
        let Some(painter) = self.painter.as_ref() else {
            return false;
        };
        let Some(slot) = self.slots.get_mut(&channel) else {
            return false;
        };
        let Some(surface) = slot.surface.as_mut() else {
            return false;
        };

        surface.clear();
        match payload {
            OverlayPayload::Picture(kind, value) => {
                draw_gauge(painter, surface, kind.label(), filled_segments(value, PICTURE_MAX));
            }
            OverlayPayload::Volume(value) => {
                draw_gauge(painter, surface, "VOLUME", filled_segments(value, 1.0));
            }
            OverlayPayload::Playback(kind) => {
                let center_y = surface.height() as f32 / 2.0;
                let baseline = painter.middle_baseline(center_y + 34.0, LABEL_SIZE);
                painter.draw_line(surface, kind.label(), PLAYBACK_MARGIN, baseline, HAlign::Left, &label_style());
            }
            OverlayPayload::Aspect(mode) => {
                let center_x = surface.width() as f32 / 2.0;
                let baseline = painter.middle_baseline(surface.height() as f32 * 0.7, LABEL_SIZE);
                painter.draw_line(
                    surface,
                    &mode.name().to_uppercase(),
                    center_x,
                    baseline,
                    HAlign::Center,
                    &label_style(),
                );
            }
        }
        surface.mark_dirty();
        slot.state.show_for(now, timeout);

        log::debug!("Overlay {:?} shown: {:?}", channel, payload);
        true
    }

    /// Hides every timed channel whose timer ran out.
    pub fn tick(&mut self, now: Instant) {
        for (channel, slot) in self.slots.iter_mut() {
            if channel.is_timed() && slot.state.expire(now) {
                log::debug!("Overlay {:?} hidden", channel);
            }
        }
    }

    /// Shows the cue active at `position`, or hides the subtitle channel.
    ///
    /// Called every frame. The surface is only redrawn when the caption changes.
    pub fn update_subtitle(&mut self, track: Option<&SubtitleTrack>, enabled: bool, position: f64, now: Instant) {
        let cue_text = if enabled {
            track.and_then(|t| t.active_cue(position)).map(|cue| cue.text.as_str())
        } else {
            None
        };

        let Some(text) = cue_text else {
            if let Some(slot) = self.slots.get_mut(&OverlayChannel::Subtitle) {
                slot.state.hide();
            }
            return;
        };

        let Some(painter) = self.painter.as_ref() else {
            return;
        };
        let Some(slot) = self.slots.get_mut(&OverlayChannel::Subtitle) else {
            return;
        };
        let Some(surface) = slot.surface.as_mut() else {
            return;
        };

        if self.subtitle_text.as_deref() != Some(text) {
            surface.clear();
            draw_caption(painter, surface, text);
            surface.mark_dirty();
            self.subtitle_text = Some(text.to_string());
        }
        slot.state.show(now);
    }

    pub fn is_visible(&self, channel: OverlayChannel) -> bool {
        self.slots
            .get(&channel)
            .map(|slot| slot.state.is_visible())
            .unwrap_or(false)
    }

    pub fn surface(&self, channel: OverlayChannel) -> Option<&RasterSurface> {
        self.slots.get(&channel).and_then(|slot| slot.surface.as_ref())
    }

    /// Visible channels, oldest first, so later triggers draw on top.
    pub fn visible_channels(&self) -> Vec<OverlayChannel> {
        let mut visible: Vec<(OverlayChannel, Option<Instant>)> = self
            .slots
            .iter()
            .filter(|(_, slot)| slot.state.is_visible())
            .map(|(channel, slot)| (*channel, slot.state.shown_at()))
            .collect();
        visible.sort_by_key(|(_, shown_at)| *shown_at);
        visible.into_iter().map(|(channel, _)| channel).collect()
    }

    /// Surfaces whose content changed since the last call.
    pub fn drain_dirty(&mut self) -> Vec<(OverlayChannel, &RgbaImage)> {
        let mut dirty = Vec::new();
        for (channel, slot) in self.slots.iter_mut() {
            if let Some(surface) = slot.surface.as_mut() {
                if let Some(image) = surface.take_dirty() {
                    dirty.push((*channel, image));
                }
            }
        }
        dirty
    }
}

fn label_style() -> TextStyle {
    TextStyle {
        size: LABEL_SIZE,
        color: WHITE,
        outline: Some((SHADOW, 2)),
    }
}

fn draw_gauge(painter: &TextPainter, surface: &mut RasterSurface, label: &str, filled: u32) {
    let center_y = surface.height() as f32 * 0.7;

    // Same label box for every gauge so the bars line up between channels
    let label_width = painter
        .measure("BRIGHTNESS", LABEL_SIZE)
        .max(painter.measure("SATURATION", LABEL_SIZE))
        + 32.0;
    let label_x = GAUGE_LEFT_MARGIN + label_width;
    let bars_x = label_x + GAUGE_GAP;

    let baseline = painter.middle_baseline(center_y, LABEL_SIZE);
    painter.draw_line(surface, label, label_x, baseline, HAlign::Right, &label_style());

    let bar_top = (center_y - BAR_HEIGHT as f32 / 2.0).round() as i32;
    for i in 0..filled.min(GAUGE_SEGMENTS) {
        let x = bars_x.round() as i32 + (i * (BAR_WIDTH + BAR_SPACING)) as i32;
        surface.fill_rect(x + 2, bar_top + 2, BAR_WIDTH, BAR_HEIGHT, SHADOW);
        surface.fill_rect(x, bar_top, BAR_WIDTH, BAR_HEIGHT, WHITE);
    }
}

fn draw_caption(painter: &TextPainter, surface: &mut RasterSurface, text: &str) {
    let style = TextStyle {
        size: SUBTITLE_SIZE,
        color: WHITE,
        outline: Some((BLACK, 4)),
    };
    let lines: Vec<&str> = text.lines().collect();
    let (size, baselines) = caption_layout(painter, &lines, surface.width(), surface.height());
    let style = TextStyle { size, ..style };
    let center_x = surface.width() as f32 / 2.0;
    for (line, baseline) in lines.iter().zip(baselines) {
        painter.draw_line(surface, line, center_x, baseline, HAlign::Center, &style);
    }
}

/// Font size and per-line baselines for a caption block centered on the
/// surface. Long or many-line cues shrink until the block fits.
fn caption_layout(painter: &TextPainter, lines: &[&str], width: u32, height: u32) -> (f32, Vec<f32>) {
    if lines.is_empty() {
        return (SUBTITLE_SIZE, Vec::new());
    }
    let available_w = (width as f32 - 2.0 * CAPTION_MARGIN).max(1.0);
    let available_h = (height as f32 - 2.0 * CAPTION_MARGIN).max(1.0);

    let block_h = lines.len() as f32 * painter.line_height(SUBTITLE_SIZE);
    let widest = lines
        .iter()
        .map(|line| painter.measure(line, SUBTITLE_SIZE))
        .fold(0.0f32, f32::max);
    let mut shrink = (available_h / block_h).min(1.0);
    if widest > 0.0 {
        shrink = shrink.min(available_w / widest);
    }
    let size = SUBTITLE_SIZE * shrink;

    let line_height = painter.line_height(size);
    let top = (height as f32 - lines.len() as f32 * line_height) / 2.0;
    let baselines = (0..lines.len())
        .map(|i| painter.middle_baseline(top + (i as f32 + 0.5) * line_height, size))
        .collect();
    (size, baselines)
}
