use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// World-space size of the area the video may occupy on the TV.
///
/// This is the one place the screen proportions live: the aspect-fit
/// calculation and the TV geometry both read it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenBounds {
    pub width: f32,
    pub height: f32,
}

impl Default for ScreenBounds {
    fn default() -> Self {
        Self {
            width: 2.3,
            height: 1.3,
        }
    }
}

impl ScreenBounds {
    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub timeout_ms: u64,
    pub font_path: Option<PathBuf>,
    pub surface_width: u32,
    pub surface_height: u32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            font_path: None,
            surface_width: 1024,
            surface_height: 128,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    pub ffmpeg_path: Option<PathBuf>,
    pub ffprobe_path: Option<PathBuf>,
    pub decode_width: u32,
    pub decode_height: u32,
    pub seek_step_seconds: f64,
    pub volume_step: f32,
    pub loop_playback: bool,
    pub unsupported_extensions: Vec<String>,
}

/// Largest decode dimension accepted from the config file (8K).
pub const MAX_DECODE_SIZE: u32 = 7680;

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: None,
            ffprobe_path: None,
            decode_width: 854,
            decode_height: 480,
            seek_step_seconds: 10.0,
            volume_step: 0.1,
            loop_playback: true,
            unsupported_extensions: vec!["mkv".to_string()],
        }
    }
}

impl MediaConfig {
    pub fn ffmpeg_binary(&self) -> PathBuf {
        self.ffmpeg_path.clone().unwrap_or_else(|| PathBuf::from("ffmpeg"))
    }

    pub fn ffprobe_binary(&self) -> PathBuf {
        self.ffprobe_path.clone().unwrap_or_else(|| PathBuf::from("ffprobe"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub notice_timeout_ms: u64,
    pub picture_step: f32,
    pub move_speed: f32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            notice_timeout_ms: 5000,
            picture_step: 0.1,
            move_speed: 0.1,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub screen: ScreenBounds,
    pub overlay: OverlayConfig,
    pub media: MediaConfig,
    pub ui: UiConfig,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| anyhow::anyhow!("Failed to read config file at {}: {}", config_path.display(), e))?;

            match serde_json::from_str::<Self>(&content) {
                Ok(config) => {
                    log::info!("Loaded existing config from {}", config_path.display());
                    Ok(config.sanitized())
                }
                Err(e) => {
                    log::warn!("Config file exists but has issues ({}), creating new one with defaults", e);
                    let new_config = Self::default();
                    new_config.save()
                        .map_err(|save_err| anyhow::anyhow!("Failed to save new config: {}", save_err))?;
                    log::info!("Created new config file at {}", config_path.display());
                    Ok(new_config)
                }
            }
        } else {
            log::info!("No config file found, creating default config");
            let config = Self::default();
            config.save()
                .map_err(|e| anyhow::anyhow!("Failed to save default config: {}", e))?;
            log::info!("Created new config file at {}", config_path.display());
            Ok(config)
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tv-room")
            .join("config.json")
    }

    /// Replaces values that would break the geometry or the timers with defaults.
    pub fn sanitized(mut self) -> Self {
        if !(self.screen.width > 0.0 && self.screen.height > 0.0) {
            log::warn!(
                "Invalid screen bounds {}x{}, using defaults",
                self.screen.width,
                self.screen.height
            );
            self.screen = ScreenBounds::default();
        }
        if self.overlay.surface_width == 0 || self.overlay.surface_height == 0 {
            log::warn!("Invalid overlay surface size, using defaults");
            let defaults = OverlayConfig::default();
            self.overlay.surface_width = defaults.surface_width;
            self.overlay.surface_height = defaults.surface_height;
        }
        let decode = (self.media.decode_width, self.media.decode_height);
        if decode.0 == 0 || decode.1 == 0 || decode.0 > MAX_DECODE_SIZE || decode.1 > MAX_DECODE_SIZE {
            log::warn!("Invalid decode size {}x{}, using defaults", decode.0, decode.1);
            let defaults = MediaConfig::default();
            self.media.decode_width = defaults.decode_width;
            self.media.decode_height = defaults.decode_height;
        }
        self.media.unsupported_extensions = self
            .media
            .unsupported_extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .collect();
        self
    }
}
