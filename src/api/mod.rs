pub mod client;
pub mod models;

use async_trait::async_trait;
use futures::channel::mpsc::UnboundedSender;

pub use client::{ExtractorError, Result, YtDlpClient};
pub use models::{DownloadRequest, ExtractorConfig, ProgressUpdate, RawFormat, VideoInfo};

/// The external tool that inspects URLs and performs downloads
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Stream metadata for `url`, nothing is downloaded
    async fn extract_info(&self, url: &str) -> Result<VideoInfo>;

    /// Download `request`, sending progress as it is reported. The sender is
    /// dropped once the download finishes.
    async fn download(
        &self,
        request: &DownloadRequest,
        progress: UnboundedSender<ProgressUpdate>,
    ) -> Result<()>;
}
