use eframe::egui;
use std::collections::HashMap;
use std::time::Instant;

use crate::core::{AppConfig, PictureSettings};
use crate::gui::control_panel::{ControlPanel, PanelAction};
use crate::gui::notices::NoticeBoard;
use crate::gui::settings_window::SettingsWindow;
use crate::hotkeys::{HotkeyEvent, HotkeyId, HotkeyManager};
use crate::media::{MediaEvent, MediaSession, MediaSource, VideoFrame};
use crate::overlay::{OverlayChannel, OverlayPayload, PlaybackKind, TextPainter};
use crate::scene::{paint_scene, Camera, TvLayout, TvTextures};
use crate::subtitles::{SubtitleFormat, SubtitleLoader};
use crate::tv::TvController;

pub struct TvRoomApp {
    pub config: AppConfig,
    pub tv: TvController,
    pub media: MediaSession,
    pub subtitle_loader: SubtitleLoader,
    pub notices: NoticeBoard,
    pub hotkeys: HotkeyManager,
    pub camera: Camera,
    pub layout: TvLayout,
    pub panel: ControlPanel,
    pub settings: SettingsWindow,
    pub looking_at_tv: bool,

    /// Latest decoded frame before picture adjustment.
    raw_frame: Option<VideoFrame>,
    /// Picture settings the video texture was last built with.
    applied_picture: Option<PictureSettings>,
    video_texture: Option<egui::TextureHandle>,
    overlay_textures: HashMap<OverlayChannel, egui::TextureHandle>,
}

impl TvRoomApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> anyhow::Result<Self> {
        let mut visuals = egui::Visuals::dark();
        visuals.override_text_color = Some(egui::Color32::from_rgba_unmultiplied(255, 255, 255, 191));
        cc.egui_ctx.set_visuals(visuals);

        let config = AppConfig::load()?;
        Ok(Self::with_config(config))
    }

    /// Builds the app without a window, also used by tests.
    pub fn with_config(config: AppConfig) -> Self {
        let mut tv = TvController::new(&config);
        match TextPainter::load(config.overlay.font_path.as_deref()) {
            Ok(painter) => tv.initialize_overlays(painter),
            Err(e) => log::error!("Overlay font unavailable, overlays disabled: {}", e),
        }

        let media = MediaSession::new(&config.media);
        let notices = NoticeBoard::new(std::time::Duration::from_millis(config.ui.notice_timeout_ms));
        let layout = TvLayout::new(config.screen);

        Self {
            tv,
            media,
            subtitle_loader: SubtitleLoader::new(),
            notices,
            hotkeys: HotkeyManager::new(),
            camera: Camera::default(),
            layout,
            panel: ControlPanel::default(),
            settings: SettingsWindow::default(),
            looking_at_tv: false,
            raw_frame: None,
            applied_picture: None,
            video_texture: None,
            overlay_textures: HashMap::new(),
            config,
        }
    }

    pub fn apply_action(&mut self, action: PanelAction) {
        log::debug!("Panel action: {:?}", action);
        match action {
            PanelAction::LoadUrl(url) => {
                match MediaSource::classify(&url, &self.config.media.unsupported_extensions) {
                    Ok(source) => self.media.load(source),
                    Err(e) => self.notices.report(&e),
                }
            }
            PanelAction::LoadFile(path) => {
                match MediaSource::from_path(path, &self.config.media.unsupported_extensions) {
                    Ok(source) => self.media.load(source),
                    Err(e) => self.notices.report(&e),
                }
            }
            PanelAction::TogglePlay => {
                if !self.media.snapshot().loaded {
                    log::debug!("Nothing loaded to play");
                    return;
                }
                let kind = if self.media.toggle_play() {
                    PlaybackKind::Play
                } else {
                    PlaybackKind::Pause
                };
                self.tv.trigger(OverlayPayload::Playback(kind));
            }
            PanelAction::Rewind => {
                self.media.rewind();
                self.tv.trigger(OverlayPayload::Playback(PlaybackKind::Rewind));
            }
            PanelAction::Forward => {
                self.media.forward();
                self.tv.trigger(OverlayPayload::Playback(PlaybackKind::Forward));
            }
            PanelAction::SeekFraction(fraction) => self.media.seek_fraction(fraction),
            PanelAction::VolumeDown => {
                let volume = self.media.volume_down();
                self.tv.trigger(OverlayPayload::Volume(volume));
            }
            PanelAction::VolumeUp => {
                let volume = self.media.volume_up();
                self.tv.trigger(OverlayPayload::Volume(volume));
            }
            PanelAction::ToggleMute => {
                self.media.toggle_mute();
                let shown = self.media.snapshot().effective_volume();
                self.tv.trigger(OverlayPayload::Volume(shown));
            }
            PanelAction::CycleAspect => {
                self.tv.cycle_aspect_mode();
            }
            PanelAction::ToggleSubtitles => {
                let enabled = self.tv.toggle_subtitles();
                log::info!("Subtitles {}", if enabled { "on" } else { "off" });
            }
            PanelAction::LoadSubtitles(source) => {
                let format = SubtitleFormat::from_source(&source);
                log::info!("Loading {:?} subtitles from {}", format, source);
                self.subtitle_loader.request(&source, format);
            }
            PanelAction::Picture(kind, change) => {
                self.tv.set_picture_value(kind, change);
            }
            PanelAction::OpenSettings => self.settings.open = true,
            PanelAction::ClosePanel => self.panel.open = false,
        }
    }

    pub fn handle_media_event(&mut self, event: &MediaEvent) {
        match event {
            MediaEvent::MetadataReady(info) => self.tv.set_native_size(info.width, info.height),
            MediaEvent::PlaybackError(message) => self.notices.push(message.clone()),
            MediaEvent::TimeAdvanced(_) | MediaEvent::Playing | MediaEvent::Paused => {}
        }
    }

    pub fn handle_hotkey(&mut self, event: HotkeyEvent) {
        match event {
            HotkeyEvent::OpenPanel => self.panel.open = true,
            HotkeyEvent::ClosePanel => self.panel.open = false,
        }
    }

    /// Hint under the crosshair while the TV is targeted.
    pub fn remote_hint(&self) -> String {
        let key = self
            .hotkeys
            .key_for(HotkeyId::Confirm)
            .map(|key| key.name())
            .unwrap_or("Enter");
        format!("Press {} for the remote", key)
    }

    fn poll_media(&mut self) {
        let (events, frame) = self.media.poll();
        for event in &events {
            self.handle_media_event(event);
        }
        if frame.is_some() {
            self.raw_frame = frame;
            self.applied_picture = None;
        }
    }

    fn poll_subtitles(&mut self) {
        if !self.subtitle_loader.is_pending() {
            return;
        }
        let Some(loaded) = self.subtitle_loader.take_latest() else {
            return;
        };
        match loaded.result {
            Ok(document) => {
                let count = self.tv.load_subtitles(&document, loaded.format);
                log::info!("Loaded {} cues from {}", count, loaded.source);
            }
            Err(e) => {
                log::error!("Error loading subtitles from {}: {}", loaded.source, e);
                self.notices.push("Error loading subtitles. Try a different URL.");
            }
        }
    }

    /// Current media position for the caption lookup, if anything is loaded.
    fn caption_position(&self) -> Option<f64> {
        let snapshot = self.media.snapshot();
        snapshot.loaded.then_some(snapshot.position)
    }

    fn upload_textures(&mut self, ctx: &egui::Context) {
        let picture = *self.tv.picture();
        if let Some(frame) = &self.raw_frame {
            if self.applied_picture != Some(picture) {
                let mut pixels = frame.pixels.clone();
                if !picture.is_identity() {
                    picture.apply_to_rgba(&mut pixels);
                }
                let image = egui::ColorImage::from_rgba_unmultiplied(
                    [frame.width as usize, frame.height as usize],
                    &pixels,
                );
                match &mut self.video_texture {
                    Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
                    None => {
                        self.video_texture = Some(ctx.load_texture("video_frame", image, egui::TextureOptions::LINEAR));
                    }
                }
                self.applied_picture = Some(picture);
            }
        }

        for (channel, image) in self.tv.compositor_mut().drain_dirty() {
            let color_image = egui::ColorImage::from_rgba_unmultiplied(
                [image.width() as usize, image.height() as usize],
                image.as_raw(),
            );
            match self.overlay_textures.get_mut(&channel) {
                Some(texture) => texture.set(color_image, egui::TextureOptions::LINEAR),
                None => {
                    let texture = ctx.load_texture(format!("overlay_{:?}", channel), color_image, egui::TextureOptions::LINEAR);
                    self.overlay_textures.insert(channel, texture);
                }
            }
        }
    }

    fn show_room(&mut self, ui: &mut egui::Ui) {
        let rect = ui.max_rect();
        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
        if response.dragged() && !self.panel.open {
            let delta = response.drag_delta();
            self.camera.look(delta.x, delta.y);
        }

        let overlays: Vec<(crate::scene::Quad, egui::TextureId)> = self
            .tv
            .compositor()
            .visible_channels()
            .into_iter()
            .filter_map(|channel| {
                self.overlay_textures
                    .get(&channel)
                    .map(|texture| (self.layout.overlay(channel), texture.id()))
            })
            .collect();
        let textures = TvTextures {
            video: self
                .media
                .snapshot()
                .loaded
                .then(|| self.video_texture.as_ref().map(|t| t.id()))
                .flatten(),
            overlays: &overlays,
        };

        let painter = ui.painter_at(rect);
        paint_scene(&painter, rect, &self.camera, &self.layout, self.tv.screen_scale(), &textures);

        // Crosshair
        let center = rect.center();
        let color = if self.looking_at_tv {
            egui::Color32::from_rgb(0x00, 0x7a, 0xff)
        } else {
            egui::Color32::from_white_alpha(160)
        };
        painter.circle_filled(center, 3.0, color);

        if self.looking_at_tv && !self.panel.open {
            painter.text(
                center + egui::vec2(0.0, 24.0),
                egui::Align2::CENTER_TOP,
                self.remote_hint(),
                egui::FontId::proportional(14.0),
                egui::Color32::WHITE,
            );
        }
    }
}

impl eframe::App for TvRoomApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        self.poll_media();
        self.poll_subtitles();
        self.tv.on_frame(self.caption_position(), now);

        let typing = ctx.wants_keyboard_input();
        let frame_input = ctx.input(|i| self.hotkeys.process(i, self.panel.open, self.looking_at_tv, typing));
        for event in frame_input.events {
            self.handle_hotkey(event);
        }
        self.camera.walk(frame_input.movement, self.config.ui.move_speed);
        self.looking_at_tv = self.camera.looking_at(&self.layout.screen_area());

        self.upload_textures(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.show_room(ui));

        let mode = self.tv.mode();
        let subtitles_enabled = self.tv.subtitles_enabled();
        let mut actions = self.panel.show(ctx, self.media.snapshot(), mode, subtitles_enabled);
        actions.extend(self.settings.show(ctx, self.tv.picture(), self.config.ui.picture_step));
        for action in actions {
            self.apply_action(action);
        }

        self.notices.show(ctx);

        ctx.request_repaint();
    }
}
