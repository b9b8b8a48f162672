use crate::media::session::MediaEvent;

/// UI-side view of the playback state, updated from [`MediaEvent`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSnapshot {
    pub loaded: bool,
    pub position: f64,
    /// `None` while nothing is loaded and for live streams.
    pub duration: Option<f64>,
    pub paused: bool,
    pub muted: bool,
    pub volume: f32,
    pub native_size: Option<(u32, u32)>,
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self {
            loaded: false,
            position: 0.0,
            duration: None,
            paused: true,
            muted: false,
            volume: 1.0,
            native_size: None,
        }
    }
}

impl PlaybackSnapshot {
    pub fn apply(&mut self, event: &MediaEvent) {
        match event {
            MediaEvent::MetadataReady(info) => {
                self.loaded = true;
                self.position = 0.0;
                self.duration = info.duration;
                self.native_size = Some((info.width, info.height));
            }
            MediaEvent::PlaybackError(_) => self.paused = true,
            MediaEvent::TimeAdvanced(position) => self.position = *position,
            MediaEvent::Playing => self.paused = false,
            MediaEvent::Paused => self.paused = true,
        }
    }

    pub fn is_live(&self) -> bool {
        self.loaded && self.duration.is_none()
    }

    /// Volume as shown on the gauge: zero while muted.
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }

    pub fn progress(&self) -> f32 {
        match self.duration {
            Some(duration) if duration > 0.0 => (self.position / duration).clamp(0.0, 1.0) as f32,
            _ => 0.0,
        }
    }

    /// `m:ss / m:ss`, or `LIVE` for a stream without duration.
    pub fn time_label(&self) -> String {
        match self.duration {
            Some(duration) => format!("{} / {}", format_time(self.position), format_time(duration)),
            None if self.loaded => "LIVE".to_string(),
            None => format!("{} / {}", format_time(0.0), format_time(0.0)),
        }
    }
}

/// Whole minutes and zero-padded seconds.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() { seconds.max(0.0).floor() as u64 } else { 0 };
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::probe::MediaInfo;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(65.9), "1:05");
        assert_eq!(format_time(3600.0), "60:00");
        assert_eq!(format_time(-3.0), "0:00");
    }

    #[test]
    fn test_events_update_snapshot() {
        let mut snapshot = PlaybackSnapshot::default();
        assert_eq!(snapshot.time_label(), "0:00 / 0:00");

        snapshot.apply(&MediaEvent::MetadataReady(MediaInfo {
            width: 640,
            height: 480,
            duration: Some(125.0),
            frame_rate: 30.0,
            has_audio: true,
        }));
        snapshot.apply(&MediaEvent::Playing);
        snapshot.apply(&MediaEvent::TimeAdvanced(62.5));

        assert!(snapshot.loaded && !snapshot.paused);
        assert_eq!(snapshot.native_size, Some((640, 480)));
        assert_eq!(snapshot.time_label(), "1:02 / 2:05");
        assert!((snapshot.progress() - 0.5).abs() < 1e-6);

        snapshot.apply(&MediaEvent::PlaybackError("boom".to_string()));
        assert!(snapshot.paused);
    }

    #[test]
    fn test_live_label() {
        let mut snapshot = PlaybackSnapshot::default();
        snapshot.apply(&MediaEvent::MetadataReady(MediaInfo {
            width: 1280,
            height: 720,
            duration: None,
            frame_rate: 25.0,
            has_audio: false,
        }));
        assert!(snapshot.is_live());
        assert_eq!(snapshot.time_label(), "LIVE");
        assert_eq!(snapshot.progress(), 0.0);
    }

    #[test]
    fn test_muted_volume_reads_zero() {
        let snapshot = PlaybackSnapshot { muted: true, volume: 0.7, ..Default::default() };
        assert_eq!(snapshot.effective_volume(), 0.0);
    }
}
