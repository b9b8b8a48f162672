use eframe::egui;

use crate::core::{PictureChange, PictureKind, PictureSettings, PICTURE_MAX, PICTURE_MIN};
use crate::gui::control_panel::PanelAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsTab {
    #[default]
    Subtitles,
    Picture,
}

#[derive(Default)]
pub struct SettingsWindow {
    pub open: bool,
    pub tab: SettingsTab,
    pub subtitle_input: String,
}

impl SettingsWindow {
    pub fn show(&mut self, ctx: &egui::Context, picture: &PictureSettings, step: f32) -> Vec<PanelAction> {
        let mut actions = Vec::new();
        if !self.open {
            return actions;
        }

        let mut open = self.open;
        egui::Window::new("TV Settings")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .min_width(420.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.selectable_value(&mut self.tab, SettingsTab::Subtitles, "Subtitles");
                    ui.selectable_value(&mut self.tab, SettingsTab::Picture, "Picture");
                });
                ui.separator();

                match self.tab {
                    SettingsTab::Subtitles => {
                        ui.label("Subtitle URL");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.subtitle_input)
                                .hint_text("Enter subtitle URL (.vtt or .srt)")
                                .desired_width(f32::INFINITY),
                        );
                        if ui.add_sized([ui.available_width(), 28.0], egui::Button::new("Load Subtitles")).clicked() {
                            let source = self.subtitle_input.trim();
                            if !source.is_empty() {
                                actions.push(PanelAction::LoadSubtitles(source.to_string()));
                            }
                        }
                    }
                    SettingsTab::Picture => {
                        for kind in PictureKind::ALL {
                            ui.horizontal(|ui| {
                                ui.label(format!("{:<11}", kind.display_name()));
                                if ui.button("➖").clicked() {
                                    actions.push(PanelAction::Picture(kind, PictureChange::Delta(-step)));
                                }
                                if ui.button(format!("{:.1}", picture.get(kind))).on_hover_text("Reset").clicked() {
                                    actions.push(PanelAction::Picture(kind, PictureChange::Reset));
                                }
                                if ui.button("➕").clicked() {
                                    actions.push(PanelAction::Picture(kind, PictureChange::Delta(step)));
                                }
                                let mut value = picture.get(kind);
                                let slider = egui::Slider::new(&mut value, PICTURE_MIN..=PICTURE_MAX)
                                    .step_by(step as f64)
                                    .show_value(false);
                                if ui.add(slider).changed() {
                                    actions.push(PanelAction::Picture(kind, PictureChange::Absolute(value)));
                                }
                            });
                        }
                    }
                }
            });
        self.open = open;

        actions
    }
}
