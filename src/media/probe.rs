use std::path::Path;
use std::process::Command;

use crate::media::source::MediaSource;

/// Stream facts read with ffprobe before playback starts.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaInfo {
    /// Display size: pixel aspect and rotation already applied.
    pub width: u32,
    pub height: u32,
    /// `None` for live streams.
    pub duration: Option<f64>,
    pub frame_rate: f64,
    pub has_audio: bool,
}

impl MediaInfo {
    pub fn is_live(&self) -> bool {
        self.duration.is_none()
    }

    pub fn from_probe_json(info: &serde_json::Value) -> anyhow::Result<Self> {
        let empty_vec = vec![];
        let streams = info["streams"].as_array().unwrap_or(&empty_vec);

        let video = streams
            .iter()
            .find(|s| s["codec_type"].as_str() == Some("video"))
            .ok_or_else(|| anyhow::anyhow!("No video stream found"))?;

        let coded_width = video["width"].as_u64().unwrap_or(0) as u32;
        let coded_height = video["height"].as_u64().unwrap_or(0) as u32;
        if coded_width == 0 || coded_height == 0 {
            return Err(anyhow::anyhow!("Video stream has no dimensions"));
        }
        let (width, height) = display_size(video, coded_width, coded_height);

        let duration = info["format"]["duration"]
            .as_str()
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|d| d.is_finite() && *d > 0.0);

        let frame_rate = video["r_frame_rate"]
            .as_str()
            .or_else(|| video["avg_frame_rate"].as_str())
            .map(parse_frame_rate)
            .unwrap_or(30.0);

        let has_audio = streams
            .iter()
            .any(|s| s["codec_type"].as_str() == Some("audio"));

        Ok(Self {
            width,
            height,
            duration,
            frame_rate,
            has_audio,
        })
    }
}

/// Coded size corrected for non-square pixels and quarter-turn rotation.
fn display_size(video: &serde_json::Value, coded_width: u32, coded_height: u32) -> (u32, u32) {
    let mut width = coded_width;
    let height = coded_height;

    if let Some(sar) = video["sample_aspect_ratio"].as_str().and_then(parse_ratio) {
        width = (coded_width as f64 * sar).round() as u32;
    } else if let Some(dar) = video["display_aspect_ratio"].as_str().and_then(parse_ratio) {
        width = (coded_height as f64 * dar).round() as u32;
    }
    let width = width.max(1);

    if rotation_degrees(video).rem_euclid(180) == 90 {
        (height, width)
    } else {
        (width, height)
    }
}

/// `"16:9"` style ratio; `0:1` and other degenerate values mean unknown.
fn parse_ratio(ratio: &str) -> Option<f64> {
    let (num, den) = ratio.split_once(':').or_else(|| ratio.split_once('/'))?;
    let num: f64 = num.trim().parse().ok()?;
    let den: f64 = den.trim().parse().ok()?;
    let value = num / den;
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Rotation from the display matrix side data, or the legacy `rotate` tag.
fn rotation_degrees(video: &serde_json::Value) -> i64 {
    let from_side_data = video["side_data_list"].as_array().and_then(|list| {
        list.iter().find_map(|entry| {
            entry["rotation"]
                .as_f64()
                .or_else(|| entry["rotation"].as_str().and_then(|r| r.parse().ok()))
        })
    });
    let from_tag = || video["tags"]["rotate"].as_str().and_then(|r| r.trim().parse::<f64>().ok());

    from_side_data.or_else(from_tag).map(|r| r.round() as i64).unwrap_or(0)
}

/// Parses ffprobe's `num/den` rate, clamped to something playable.
pub fn parse_frame_rate(rate: &str) -> f64 {
    let fps = match rate.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().unwrap_or(30.0);
            let den: f64 = den.trim().parse().unwrap_or(1.0);
            if den != 0.0 { num / den } else { 30.0 }
        }
        None => rate.trim().parse().unwrap_or(30.0),
    };
    if fps.is_finite() && fps > 0.0 {
        fps.clamp(1.0, 120.0)
    } else {
        30.0
    }
}

/// Read/write timeout for network probes, in microseconds.
const NETWORK_TIMEOUT_US: u64 = 15_000_000;

fn probe_args(source: &MediaSource) -> Vec<std::ffi::OsString> {
    let mut args: Vec<std::ffi::OsString> = ["-v", "quiet", "-print_format", "json", "-show_format", "-show_streams"]
        .iter()
        .map(|a| a.into())
        .collect();
    if source.is_network() {
        args.push("-rw_timeout".into());
        args.push(NETWORK_TIMEOUT_US.to_string().into());
    }
    args.push(source.input_arg().to_os_string());
    args
}

pub fn probe(ffprobe: &Path, source: &MediaSource) -> anyhow::Result<MediaInfo> {
    log::debug!("Probing {} with {}", source.label(), ffprobe.display());
    let output = Command::new(ffprobe).args(probe_args(source)).output()?;

    if !output.status.success() {
        return Err(anyhow::anyhow!("ffprobe failed for {}", source.label()));
    }

    let json_str = String::from_utf8(output.stdout)?;
    let info: serde_json::Value = serde_json::from_str(&json_str)?;
    MediaInfo::from_probe_json(&info)
}
