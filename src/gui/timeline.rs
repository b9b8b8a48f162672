use eframe::egui;

use crate::media::PlaybackSnapshot;

const FILL: egui::Color32 = egui::Color32::from_rgb(0x00, 0x7a, 0xff);

/// Clickable progress bar with the `m:ss / m:ss` (or `LIVE`) label under it.
pub struct TimelineWidget {
    pub height: f32,
}

impl Default for TimelineWidget {
    fn default() -> Self {
        Self { height: 6.0 }
    }
}

impl TimelineWidget {
    /// Draws the bar and returns the clicked fraction, if any.
    pub fn show(&self, ui: &mut egui::Ui, snapshot: &PlaybackSnapshot) -> Option<f32> {
        let width = ui.available_width();
        let (rect, response) = ui.allocate_exact_size(egui::vec2(width, self.height), egui::Sense::click());

        if ui.is_rect_visible(rect) {
            let painter = ui.painter();
            painter.rect_filled(rect, egui::Rounding::same(3.0), egui::Color32::from_gray(0x44));

            let fill_rect = egui::Rect::from_min_size(
                rect.min,
                egui::vec2(rect.width() * snapshot.progress(), rect.height()),
            );
            painter.rect_filled(fill_rect, egui::Rounding::same(3.0), FILL);
        }

        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new(snapshot.time_label()).monospace().size(12.0));
        });

        if snapshot.duration.is_none() || !response.clicked() {
            return None;
        }
        response
            .interact_pointer_pos()
            .map(|pos| click_fraction(rect, pos.x))
    }
}

fn click_fraction(rect: egui::Rect, x: f32) -> f32 {
    if rect.width() <= 0.0 {
        return 0.0;
    }
    ((x - rect.min.x) / rect.width()).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_fraction() {
        let rect = egui::Rect::from_min_size(egui::pos2(100.0, 0.0), egui::vec2(200.0, 6.0));
        assert_eq!(click_fraction(rect, 200.0), 0.5);
        assert_eq!(click_fraction(rect, 50.0), 0.0);
        assert_eq!(click_fraction(rect, 400.0), 1.0);
    }
}
