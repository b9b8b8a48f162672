use eframe::egui;
use std::time::{Duration, Instant};

use crate::core::TvError;

#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    pub shown_at: Instant,
}

/// Short error messages shown at the top of the window. Never blocks input.
pub struct NoticeBoard {
    notices: Vec<Notice>,
    timeout: Duration,
}

impl NoticeBoard {
    pub fn new(timeout: Duration) -> Self {
        Self {
            notices: Vec::new(),
            timeout,
        }
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.push_at(message, Instant::now());
    }

    pub fn push_at(&mut self, message: impl Into<String>, now: Instant) {
        let message = message.into();
        // Same message again only restarts its timer
        self.notices.retain(|n| n.message != message);
        self.notices.push(Notice { message, shown_at: now });
    }

    /// Posts errors meant for the user; the rest only reach the log.
    pub fn report(&mut self, error: &TvError) {
        if error.is_user_visible() {
            log::error!("{}", error);
            self.push(error.to_string());
        } else {
            log::warn!("{}", error);
        }
    }

    pub fn expire(&mut self, now: Instant) {
        let timeout = self.timeout;
        self.notices.retain(|n| now.saturating_duration_since(n.shown_at) < timeout);
    }

    pub fn dismiss(&mut self, index: usize) {
        if index < self.notices.len() {
            self.notices.remove(index);
        }
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        self.expire(Instant::now());
        if self.notices.is_empty() {
            return;
        }

        let mut dismissed = None;
        egui::Area::new(egui::Id::new("notices"))
            .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, 10.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for (index, notice) in self.notices.iter().enumerate() {
                    let response = egui::Frame::none()
                        .fill(egui::Color32::from_rgba_unmultiplied(255, 0, 0, 180))
                        .rounding(egui::Rounding::same(5.0))
                        .inner_margin(egui::Margin::same(10.0))
                        .show(ui, |ui| {
                            ui.label(egui::RichText::new(&notice.message).color(egui::Color32::WHITE));
                        })
                        .response
                        .interact(egui::Sense::click());
                    if response.clicked() {
                        dismissed = Some(index);
                    }
                }
            });

        if let Some(index) = dismissed {
            self.dismiss(index);
        }
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notices_expire_after_timeout() {
        let mut board = NoticeBoard::new(Duration::from_millis(5000));
        let start = Instant::now();
        board.push_at("Error loading video", start);

        board.expire(start + Duration::from_millis(4999));
        assert_eq!(board.notices().len(), 1);
        board.expire(start + Duration::from_millis(5000));
        assert!(board.is_empty());
    }

    #[test]
    fn test_repeated_message_restarts_timer() {
        let mut board = NoticeBoard::new(Duration::from_millis(5000));
        let start = Instant::now();
        board.push_at("same", start);
        board.push_at("same", start + Duration::from_millis(3000));
        assert_eq!(board.notices().len(), 1);

        board.expire(start + Duration::from_millis(6000));
        assert_eq!(board.notices().len(), 1);
    }

    #[test]
    fn test_parse_errors_stay_in_the_log() {
        let mut board = NoticeBoard::new(Duration::from_secs(5));
        board.report(&TvError::SubtitleParse("bad cue".to_string()));
        assert!(board.is_empty());

        board.report(&TvError::UnsupportedFormat("MKV format is not directly supported.".to_string()));
        assert_eq!(board.notices()[0].message, "MKV format is not directly supported.");
    }

    #[test]
    fn test_dismiss_out_of_range_is_ignored() {
        let mut board = NoticeBoard::new(Duration::from_secs(5));
        board.push("one");
        board.dismiss(3);
        board.dismiss(0);
        assert!(board.is_empty());
    }
}
