use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use futures::channel::mpsc::UnboundedSender;

use crate::api::{
    DownloadRequest, ExtractorError, MediaExtractor, ProgressUpdate, RawFormat, VideoInfo,
};

/// In-memory stand-in for yt-dlp
pub(crate) struct FakeExtractor {
    info: Option<VideoInfo>,
    fail_download: bool,
    extension: &'static str,
    pub info_calls: AtomicUsize,
    pub download_calls: AtomicUsize,
}

impl FakeExtractor {
    pub fn new(info: VideoInfo) -> Self {
        Self {
            info: Some(info),
            fail_download: false,
            extension: "mp4",
            info_calls: AtomicUsize::new(0),
            download_calls: AtomicUsize::new(0),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            info: None,
            ..Self::new(sample_info())
        }
    }

    pub fn failing_download(mut self) -> Self {
        self.fail_download = true;
        self
    }

    pub fn with_extension(mut self, extension: &'static str) -> Self {
        self.extension = extension;
        self
    }

    pub fn info_calls(&self) -> usize {
        self.info_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaExtractor for FakeExtractor {
    async fn extract_info(&self, _url: &str) -> crate::api::Result<VideoInfo> {
        self.info_calls.fetch_add(1, Ordering::SeqCst);
        self.info
            .clone()
            .ok_or_else(|| ExtractorError::Io(std::io::Error::other("network unreachable")))
    }

    async fn download(
        &self,
        request: &DownloadRequest,
        progress: UnboundedSender<ProgressUpdate>,
    ) -> crate::api::Result<()> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        let _ = progress.unbounded_send(update("downloading", "50.0%"));

        if self.fail_download {
            return Err(ExtractorError::Io(std::io::Error::other("disk full")));
        }

        let path = request
            .output_template
            .to_string_lossy()
            .replace("%(ext)s", self.extension);
        tokio::fs::write(path, request.format_id.as_bytes()).await?;

        let _ = progress.unbounded_send(update("downloading", "100.0%"));
        let _ = progress.unbounded_send(update("finished", "100.0%"));
        Ok(())
    }
}

fn update(status: &str, percent: &str) -> ProgressUpdate {
    ProgressUpdate {
        status: status.to_string(),
        percent: percent.to_string(),
    }
}

pub(crate) fn sample_info() -> VideoInfo {
    let raw = |id: &str, vcodec: &str, acodec: &str, ext: &str, height: Option<u32>, abr: Option<f64>| RawFormat {
        format_id: id.to_string(),
        vcodec: Some(vcodec.to_string()),
        acodec: Some(acodec.to_string()),
        ext: Some(ext.to_string()),
        height,
        abr,
        format_note: height.map(|h| format!("{}p", h)),
    };

    VideoInfo {
        title: Some("My Video: Part #1!".to_string()),
        formats: vec![
            raw("136", "avc1", "none", "mp4", Some(720), None),
            raw("mp3-128", "none", "mp3", "mp3", None, Some(128.0)),
            raw("247", "vp9", "none", "webm", Some(720), None),
        ],
    }
}
