use crate::subtitles::parser::{self, Cue, SubtitleFormat};

/// The cues of one loaded subtitle document.
#[derive(Debug, Clone, Default)]
pub struct SubtitleTrack {
    source: String,
    cues: Vec<Cue>,
}

impl SubtitleTrack {
    pub fn parse(source: impl Into<String>, document: &str, format: SubtitleFormat) -> Self {
        let source = source.into();
        let cues = parser::parse(document, format);
        log::info!("Parsed {} subtitle cues from {} ({:?})", cues.len(), source, format);
        Self { source, cues }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// First cue whose `[start, end)` contains `time`.
    pub fn active_cue(&self, time: f64) -> Option<&Cue> {
        self.cues.iter().find(|cue| cue.contains(time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_track() -> SubtitleTrack {
        let doc = "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nOne\n\n00:00:02.000 --> 00:00:03.000\nTwo\n\n00:00:05.000 --> 00:00:06.000\nThree\n";
        SubtitleTrack::parse("sample.vtt", doc, SubtitleFormat::Vtt)
    }

    #[test]
    fn test_active_cue_lookup() {
        let track = sample_track();
        assert_eq!(track.cues().len(), 3);
        assert!(track.active_cue(0.5).is_none());
        assert_eq!(track.active_cue(1.5).map(|c| c.text.as_str()), Some("One"));
        // End is exclusive, so the boundary belongs to the next cue
        assert_eq!(track.active_cue(2.0).map(|c| c.text.as_str()), Some("Two"));
        assert!(track.active_cue(4.0).is_none());
        assert_eq!(track.active_cue(5.5).map(|c| c.text.as_str()), Some("Three"));
    }

    #[test]
    fn test_lookup_follows_seeks_backwards() {
        let track = sample_track();
        assert_eq!(track.active_cue(5.2).map(|c| c.text.as_str()), Some("Three"));
        assert_eq!(track.active_cue(1.1).map(|c| c.text.as_str()), Some("One"));
    }

    #[test]
    fn test_empty_track() {
        let track = SubtitleTrack::default();
        assert!(track.is_empty());
        assert!(track.active_cue(1.0).is_none());
        assert_eq!(track.source(), "");
    }
}
