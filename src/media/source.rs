use std::path::{Path, PathBuf};

use crate::core::{TvError, TvResult};

/// Where a video comes from, decided before anything is spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    LocalFile(PathBuf),
    RemoteUrl(String),
    /// HLS playlist (`.m3u8`), possibly a live stream without a duration.
    AdaptiveManifest(String),
}

impl MediaSource {
    /// Classifies user input from the URL field or a picked file.
    pub fn classify(input: &str, unsupported_extensions: &[String]) -> TvResult<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(TvError::MediaLoad("Please enter a video URL".to_string()));
        }

        if is_remote(input) {
            let url = normalize_url(input);
            let extension = url_extension(&url);
            check_supported(extension.as_deref(), unsupported_extensions)?;
            if extension.as_deref() == Some("m3u8") {
                return Ok(MediaSource::AdaptiveManifest(url));
            }
            return Ok(MediaSource::RemoteUrl(url));
        }

        let path = PathBuf::from(input.strip_prefix("file://").unwrap_or(input));
        Self::from_path(path, unsupported_extensions)
    }

    pub fn from_path(path: PathBuf, unsupported_extensions: &[String]) -> TvResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        check_supported(extension.as_deref(), unsupported_extensions)?;

        if !path.is_file() {
            return Err(TvError::MediaLoad(format!("File not found: {}", path.display())));
        }
        Ok(MediaSource::LocalFile(path))
    }

    /// Input argument handed to ffmpeg/ffprobe.
    pub fn input_arg(&self) -> &std::ffi::OsStr {
        match self {
            MediaSource::LocalFile(path) => path.as_os_str(),
            MediaSource::RemoteUrl(url) | MediaSource::AdaptiveManifest(url) => std::ffi::OsStr::new(url),
        }
    }

    pub fn is_network(&self) -> bool {
        !matches!(self, MediaSource::LocalFile(_))
    }

    /// Short human-readable name for logs and notices.
    pub fn label(&self) -> String {
        match self {
            MediaSource::LocalFile(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            MediaSource::RemoteUrl(url) | MediaSource::AdaptiveManifest(url) => url.clone(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            MediaSource::LocalFile(path) => Some(path),
            _ => None,
        }
    }
}

pub fn is_remote(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Rewrites GitHub `/raw/` page links to the raw content host.
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if url.contains("github.com") && url.contains("/raw/") {
        url.replacen("github.com", "raw.githubusercontent.com", 1)
            .replacen("/raw/", "/", 1)
    } else {
        url.to_string()
    }
}

/// Lowercased extension of the URL path, ignoring query and fragment.
fn url_extension(url: &str) -> Option<String> {
    let without_scheme = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    let path = without_scheme
        .split(['?', '#'])
        .next()
        .unwrap_or(without_scheme);
    let (_, path) = path.split_once('/')?;
    let file = path.rsplit('/').next()?;
    let (_, ext) = file.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_ascii_lowercase())
    }
}

fn check_supported(extension: Option<&str>, unsupported_extensions: &[String]) -> TvResult<()> {
    if let Some(ext) = extension {
        if unsupported_extensions.iter().any(|u| u.eq_ignore_ascii_case(ext)) {
            return Err(TvError::UnsupportedFormat(format!(
                "{} format is not directly supported. Please convert to MP4 or WebM.",
                ext.to_ascii_uppercase()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mkv() -> Vec<String> {
        vec!["mkv".to_string()]
    }

    #[test]
    fn test_github_raw_rewrite() {
        assert_eq!(
            normalize_url("https://github.com/user/repo/raw/main/video.mp4"),
            "https://raw.githubusercontent.com/user/repo/main/video.mp4"
        );
        assert_eq!(normalize_url("https://example.com/a.mp4"), "https://example.com/a.mp4");
    }

    #[test]
    fn test_classify_remote_kinds() {
        assert_eq!(
            MediaSource::classify("https://cdn.example.com/live/index.M3U8?token=1", &mkv()).unwrap(),
            MediaSource::AdaptiveManifest("https://cdn.example.com/live/index.M3U8?token=1".to_string())
        );
        assert_eq!(
            MediaSource::classify(" https://example.com/clip.mp4 ", &mkv()).unwrap(),
            MediaSource::RemoteUrl("https://example.com/clip.mp4".to_string())
        );
        assert!(matches!(
            MediaSource::classify("https://example.com", &mkv()).unwrap(),
            MediaSource::RemoteUrl(_)
        ));
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let err = MediaSource::classify("https://example.com/movie.MKV", &mkv()).unwrap_err();
        assert!(matches!(err, TvError::UnsupportedFormat(_)));
        assert!(err.to_string().starts_with("MKV"));

        assert!(MediaSource::classify("https://example.com/movie.mkv", &[]).is_ok());
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(MediaSource::classify("   ", &mkv()), Err(TvError::MediaLoad(_))));
    }

    #[test]
    fn test_local_file_must_exist() {
        let missing = MediaSource::classify("/definitely/not/here.mp4", &mkv());
        assert!(matches!(missing, Err(TvError::MediaLoad(_))));

        let path = std::env::temp_dir().join(format!("tv_room_source_{}.mp4", std::process::id()));
        std::fs::write(&path, b"not really a video").unwrap();
        let source = MediaSource::classify(&format!("file://{}", path.display()), &mkv()).unwrap();
        assert_eq!(source.path(), Some(path.as_path()));
        assert!(!source.is_network());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_url_extension_ignores_host_and_query() {
        assert_eq!(url_extension("https://example.com/a/b.Mp4?x=1#t"), Some("mp4".to_string()));
        assert_eq!(url_extension("https://example.com"), None);
        assert_eq!(url_extension("https://example.com/dir/"), None);
    }
}
