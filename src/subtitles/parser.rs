use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::{TvError, TvResult};

static TIMESTAMP_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}:\d{2}:\d{2}[.,]\d{3}) --> (\d{2}:\d{2}:\d{2}[.,]\d{3})")
        .expect("timestamp pattern is valid")
});

static SEQUENCE_INDEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+$").expect("index pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubtitleFormat {
    Srt,
    Vtt,
}

impl SubtitleFormat {
    /// Picks the format from a file name or URL: `.srt` is SubRip, anything else WebVTT.
    pub fn from_source(source: &str) -> Self {
        let path_part = source.split(['?', '#']).next().unwrap_or(source);
        let is_srt = Path::new(path_part)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("srt"))
            .unwrap_or(false);

        if is_srt {
            SubtitleFormat::Srt
        } else {
            SubtitleFormat::Vtt
        }
    }
}

/// A timed caption. Always satisfies `start_time < end_time` with non-blank text.
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,
}

impl Cue {
    pub fn contains(&self, time: f64) -> bool {
        self.start_time <= time && time < self.end_time
    }

    fn is_valid(&self) -> bool {
        self.start_time < self.end_time && !self.text.trim().is_empty()
    }
}

/// Parses a whole subtitle document.
///
/// Malformed lines and cues are skipped; a document with nothing usable
/// yields an empty list.
pub fn parse(document: &str, format: SubtitleFormat) -> Vec<Cue> {
    let mut cues = Vec::new();
    let mut current: Option<Cue> = None;
    let mut skipped = 0usize;

    for raw_line in document.lines() {
        let line = raw_line.trim();

        if line.is_empty() || line == "WEBVTT" || line == "1" {
            continue;
        }

        if let Some(captures) = TIMESTAMP_RANGE.captures(line) {
            if let Some(cue) = current.take() {
                flush(cue, &mut cues, &mut skipped);
            }

            match parse_range(&captures[1], &captures[2]) {
                Ok((start_time, end_time)) => {
                    current = Some(Cue {
                        start_time,
                        end_time,
                        text: String::new(),
                    });
                }
                Err(e) => {
                    log::debug!("Skipping cue at '{}': {}", line, e);
                    skipped += 1;
                }
            }
            continue;
        }

        if format == SubtitleFormat::Srt && SEQUENCE_INDEX.is_match(line) {
            continue;
        }

        if let Some(cue) = current.as_mut() {
            if !cue.text.is_empty() {
                cue.text.push('\n');
            }
            cue.text.push_str(line);
        }
    }

    if let Some(cue) = current.take() {
        flush(cue, &mut cues, &mut skipped);
    }

    if skipped > 0 {
        log::debug!("Subtitle parse kept {} cues, skipped {}", cues.len(), skipped);
    }
    cues
}

fn flush(cue: Cue, cues: &mut Vec<Cue>, skipped: &mut usize) {
    if cue.is_valid() {
        cues.push(cue);
    } else {
        *skipped += 1;
    }
}

fn parse_range(start: &str, end: &str) -> TvResult<(f64, f64)> {
    let start_time = parse_timestamp(start)?;
    let end_time = parse_timestamp(end)?;
    if start_time >= end_time {
        return Err(TvError::SubtitleParse(format!(
            "start {:.3}s is not before end {:.3}s",
            start_time, end_time
        )));
    }
    Ok((start_time, end_time))
}

/// `HH:MM:SS.mmm` (or `,mmm`) to seconds.
pub fn parse_timestamp(timestamp: &str) -> TvResult<f64> {
    let normalized = timestamp.replace(',', ".");
    let parts: Vec<&str> = normalized.split(':').collect();
    if parts.len() != 3 {
        return Err(TvError::SubtitleParse(format!("malformed timestamp '{}'", timestamp)));
    }

    let mut fields = [0.0f64; 3];
    for (field, part) in fields.iter_mut().zip(&parts) {
        *field = part
            .parse::<f64>()
            .map_err(|e| TvError::SubtitleParse(format!("'{}' in '{}': {}", part, timestamp, e)))?;
    }

    let seconds = fields[0] * 3600.0 + fields[1] * 60.0 + fields[2];
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(TvError::SubtitleParse(format!("out of range timestamp '{}'", timestamp)));
    }
    Ok(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vtt_drops_inverted_cue() {
        let doc = "00:00:01.000 --> 00:00:02.500\nHello\n\n00:00:03.000 --> 00:00:01.000\nBad\n";
        let cues = parse(doc, SubtitleFormat::Vtt);

        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].start_time, 1.0);
        assert_eq!(cues[0].end_time, 2.5);
        assert_eq!(cues[0].text, "Hello");
    }

    #[test]
    fn test_srt_index_lines_are_skipped() {
        let doc = "1\n00:00:01,000 --> 00:00:02,000\nFirst\n\n2\n00:00:03,000 --> 00:00:04,500\nSecond\nline two\n\n3\n00:00:05,000 --> 00:00:06,000\nThird\n";
        let cues = parse(doc, SubtitleFormat::Srt);

        assert_eq!(cues.len(), 3);
        assert_eq!(cues[0].text, "First");
        assert_eq!(cues[1].text, "Second\nline two");
        assert_eq!(cues[1].start_time, 3.0);
        assert_eq!(cues[1].end_time, 4.5);
        assert_eq!(cues[2].text, "Third");
    }

    #[test]
    fn test_vtt_header_and_crlf() {
        let doc = "WEBVTT\r\n\r\n00:01:00.250 --> 00:01:02.000\r\nCaption\r\n";
        let cues = parse(doc, SubtitleFormat::Vtt);

        assert_eq!(cues.len(), 1);
        assert!((cues[0].start_time - 60.25).abs() < 1e-9);
        assert_eq!(cues[0].text, "Caption");
    }

    #[test]
    fn test_either_separator_is_accepted() {
        let doc = "00:00:01,500 --> 00:00:02.000\nmixed\n";
        let cues = parse(doc, SubtitleFormat::Vtt);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].start_time, 1.5);
    }

    #[test]
    fn test_hours_are_counted() {
        let doc = "01:02:03.004 --> 01:02:04.000\nlate\n";
        let cues = parse(doc, SubtitleFormat::Vtt);
        assert!((cues[0].start_time - 3723.004).abs() < 1e-9);
    }

    #[test]
    fn test_vtt_settings_after_range_are_ignored() {
        let doc = "00:00:01.000 --> 00:00:02.000 align:start position:10%\nPositioned\n";
        let cues = parse(doc, SubtitleFormat::Vtt);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "Positioned");
    }

    #[test]
    fn test_empty_cue_is_dropped() {
        let doc = "00:00:01.000 --> 00:00:02.000\n\n00:00:03.000 --> 00:00:04.000\nKept\n";
        let cues = parse(doc, SubtitleFormat::Vtt);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "Kept");
    }

    #[test]
    fn test_text_after_rejected_cue_is_not_attached_anywhere() {
        let doc = "00:00:01.000 --> 00:00:02.000\nGood\n00:00:05.000 --> 00:00:04.000\nOrphan\n";
        let cues = parse(doc, SubtitleFormat::Vtt);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "Good");
    }

    #[test]
    fn test_garbage_documents_never_fail() {
        assert!(parse("", SubtitleFormat::Vtt).is_empty());
        assert!(parse("WEBVTT\n\n", SubtitleFormat::Vtt).is_empty());
        assert!(parse("not a subtitle file\n12345\n-->\n", SubtitleFormat::Srt).is_empty());
        assert!(parse("0:0:1.0 --> 0:0:2.0\ntext\n", SubtitleFormat::Vtt).is_empty());
    }

    #[test]
    fn test_well_formed_documents_keep_source_order_and_invariants() {
        let mut doc = String::from("WEBVTT\n\n");
        for i in 0..50u32 {
            doc.push_str(&format!(
                "00:{:02}:{:02}.000 --> 00:{:02}:{:02}.500\nline {}\n\n",
                i / 60,
                i % 60,
                i / 60,
                i % 60,
                i
            ));
        }
        let cues = parse(&doc, SubtitleFormat::Vtt);

        assert_eq!(cues.len(), 50);
        for pair in cues.windows(2) {
            assert!(pair[0].start_time <= pair[1].start_time);
        }
        for (i, cue) in cues.iter().enumerate() {
            assert!(cue.start_time < cue.end_time);
            assert_eq!(cue.text, format!("line {}", i));
        }
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("00:00:01.000").unwrap(), 1.0);
        assert_eq!(parse_timestamp("00:01:00,500").unwrap(), 60.5);
        assert!(parse_timestamp("00:01").is_err());
        assert!(parse_timestamp("aa:bb:cc.ddd").is_err());
    }

    #[test]
    fn test_cue_contains_is_half_open() {
        let cue = Cue {
            start_time: 1.0,
            end_time: 2.0,
            text: "x".to_string(),
        };
        assert!(cue.contains(1.0));
        assert!(cue.contains(1.999));
        assert!(!cue.contains(2.0));
        assert!(!cue.contains(0.5));
    }

    #[test]
    fn test_format_from_source() {
        assert_eq!(SubtitleFormat::from_source("movie.srt"), SubtitleFormat::Srt);
        assert_eq!(SubtitleFormat::from_source("https://host/a/b.SRT?token=1"), SubtitleFormat::Srt);
        assert_eq!(SubtitleFormat::from_source("captions.vtt"), SubtitleFormat::Vtt);
        assert_eq!(SubtitleFormat::from_source("https://host/captions"), SubtitleFormat::Vtt);
    }
}
