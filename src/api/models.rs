use std::path::PathBuf;

use serde::Deserialize;

/// Metadata printed by `yt-dlp --dump-single-json`, reduced to what the
/// format list needs
#[derive(Debug, Clone, Deserialize)]
pub struct VideoInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub formats: Vec<RawFormat>,
}

/// One stream variant as reported by the extractor
#[derive(Debug, Clone, Deserialize)]
pub struct RawFormat {
    pub format_id: String,
    #[serde(default)]
    pub vcodec: Option<String>,
    #[serde(default)]
    pub acodec: Option<String>,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub abr: Option<f64>,
    #[serde(default)]
    pub format_note: Option<String>,
}

/// What to download and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub format_id: String,
    /// yt-dlp output template, e.g. `/tmp/downloads/title.%(ext)s`
    pub output_template: PathBuf,
}

/// A progress notification: status tag plus the percentage string yt-dlp printed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub status: String,
    pub percent: String,
}

/// Configuration for the yt-dlp client
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub program: PathBuf,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        let program = std::env::var_os("YTDLP_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("yt-dlp"));

        Self { program }
    }
}
