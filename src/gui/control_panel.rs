use eframe::egui;
use std::path::PathBuf;

use crate::core::{PictureChange, PictureKind};
use crate::display::DisplayMode;
use crate::gui::timeline::TimelineWidget;
use crate::media::PlaybackSnapshot;

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg", "ogv", "mov", "m4v", "m3u8"];

/// Everything the panel and the settings window can ask the app to do.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelAction {
    LoadUrl(String),
    LoadFile(PathBuf),
    TogglePlay,
    Rewind,
    Forward,
    SeekFraction(f32),
    VolumeDown,
    VolumeUp,
    ToggleMute,
    CycleAspect,
    ToggleSubtitles,
    LoadSubtitles(String),
    Picture(PictureKind, PictureChange),
    OpenSettings,
    ClosePanel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceTab {
    #[default]
    WebUrl,
    LocalFile,
}

/// Panel contents that are not playback state.
#[derive(Default)]
pub struct ControlPanel {
    pub open: bool,
    pub tab: SourceTab,
    pub url_input: String,
    pub picked_file: Option<PathBuf>,
    pub subtitle_input: String,
    timeline: TimelineWidget,
}

impl ControlPanel {
    /// Load button for the active tab.
    pub fn load_action(&self) -> Option<PanelAction> {
        match self.tab {
            SourceTab::WebUrl => Some(PanelAction::LoadUrl(self.url_input.trim().to_string())),
            SourceTab::LocalFile => self.picked_file.clone().map(PanelAction::LoadFile),
        }
    }

    /// Subtitle add button; nothing happens for an empty field.
    pub fn subtitle_action(&self) -> Option<PanelAction> {
        let source = self.subtitle_input.trim();
        if source.is_empty() {
            None
        } else {
            Some(PanelAction::LoadSubtitles(source.to_string()))
        }
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        snapshot: &PlaybackSnapshot,
        mode: DisplayMode,
        subtitles_enabled: bool,
    ) -> Vec<PanelAction> {
        let mut actions = Vec::new();
        if !self.open {
            return actions;
        }

        egui::Window::new("TV Remote")
            .collapsible(false)
            .resizable(false)
            .default_width(360.0)
            .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -24.0))
            .show(ctx, |ui| {
                self.show_source_row(ui, &mut actions);
                ui.add_space(8.0);

                if let Some(fraction) = self.timeline.show(ui, snapshot) {
                    actions.push(PanelAction::SeekFraction(fraction));
                }
                ui.add_space(4.0);

                ui.vertical_centered(|ui| {
                    ui.horizontal(|ui| {
                        if ui.button("⏪").on_hover_text("Back 10 seconds").clicked() {
                            actions.push(PanelAction::Rewind);
                        }
                        let play_label = if snapshot.paused { "▶" } else { "⏸" };
                        if ui.button(play_label).clicked() {
                            actions.push(PanelAction::TogglePlay);
                        }
                        if ui.button("⏩").on_hover_text("Forward 10 seconds").clicked() {
                            actions.push(PanelAction::Forward);
                        }
                    });

                    ui.horizontal(|ui| {
                        if ui.button("➖").clicked() {
                            actions.push(PanelAction::VolumeDown);
                        }
                        let mute_label = if snapshot.muted { "🔇" } else { "🔊" };
                        if ui.button(mute_label).clicked() {
                            actions.push(PanelAction::ToggleMute);
                        }
                        if ui.button("➕").clicked() {
                            actions.push(PanelAction::VolumeUp);
                        }
                    });

                    ui.horizontal(|ui| {
                        if ui.button("▭").on_hover_text("Aspect ratio").clicked() {
                            actions.push(PanelAction::CycleAspect);
                        }
                        ui.label(mode.name());
                        if ui.selectable_label(subtitles_enabled, "CC").clicked() {
                            actions.push(PanelAction::ToggleSubtitles);
                        }
                        if ui.button("⚙").on_hover_text("Settings").clicked() {
                            actions.push(PanelAction::OpenSettings);
                        }
                        if ui.button("✖").on_hover_text("Close (Esc)").clicked() {
                            actions.push(PanelAction::ClosePanel);
                        }
                    });
                });

                if subtitles_enabled {
                    ui.separator();
                    ui.add(
                        egui::TextEdit::singleline(&mut self.subtitle_input)
                            .hint_text("Enter subtitle URL (.vtt or .srt)")
                            .desired_width(f32::INFINITY),
                    );
                    if ui.add_sized([ui.available_width(), 24.0], egui::Button::new("Add subtitles")).clicked() {
                        actions.extend(self.subtitle_action());
                    }
                }
            });

        actions
    }

    fn show_source_row(&mut self, ui: &mut egui::Ui, actions: &mut Vec<PanelAction>) {
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.tab, SourceTab::WebUrl, "Web URL");
            ui.selectable_value(&mut self.tab, SourceTab::LocalFile, "Local File");
        });

        ui.horizontal(|ui| {
            match self.tab {
                SourceTab::WebUrl => {
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut self.url_input)
                            .hint_text("Enter video URL (mp4 or m3u8)")
                            .desired_width(260.0),
                    );
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        actions.extend(self.load_action());
                    }
                }
                SourceTab::LocalFile => {
                    let label = self
                        .picked_file
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "No file chosen".to_string());
                    if ui.button("Choose…").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Video", VIDEO_EXTENSIONS)
                            .pick_file()
                        {
                            log::info!("Picked {}", path.display());
                            self.picked_file = Some(path);
                        }
                    }
                    ui.label(label);
                }
            }
            if ui.button("Load").clicked() {
                actions.extend(self.load_action());
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_action_follows_tab() {
        let mut panel = ControlPanel {
            url_input: "  https://example.com/a.mp4 ".to_string(),
            ..Default::default()
        };
        assert_eq!(
            panel.load_action(),
            Some(PanelAction::LoadUrl("https://example.com/a.mp4".to_string()))
        );

        panel.tab = SourceTab::LocalFile;
        assert_eq!(panel.load_action(), None);
        panel.picked_file = Some(PathBuf::from("/videos/a.mp4"));
        assert_eq!(panel.load_action(), Some(PanelAction::LoadFile(PathBuf::from("/videos/a.mp4"))));
    }

    #[test]
    fn test_empty_subtitle_input_does_nothing() {
        let mut panel = ControlPanel::default();
        assert_eq!(panel.subtitle_action(), None);
        panel.subtitle_input = "https://example.com/subs.srt".to_string();
        assert_eq!(
            panel.subtitle_action(),
            Some(PanelAction::LoadSubtitles("https://example.com/subs.srt".to_string()))
        );
    }
}
