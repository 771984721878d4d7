use std::path::PathBuf;
use std::sync::Arc;

use futures::channel::mpsc::{self, UnboundedSender};
use futures::{future, stream, stream::BoxStream, StreamExt};

use super::TempDownloadArea;
use crate::{
    api::{DownloadRequest, MediaExtractor, ProgressUpdate},
    domain::{build_format_list, AppError, DownloadSession},
    utils::sanitize_filename,
};

const DEFAULT_TITLE: &str = "video";

#[derive(Debug, Clone)]
pub enum DownloadEvent {
    /// Percentage string as reported by the extractor
    Progress(String),
    Completed(PathBuf),
    Failed(AppError),
}

/// Rejects blank input before any background work is submitted.
pub fn normalize_url(url: &str) -> Result<String, AppError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(AppError::EmptyInput);
    }
    Ok(url.to_string())
}

#[derive(Clone)]
pub struct DownloadCoordinator {
    extractor: Arc<dyn MediaExtractor>,
    temp_area: TempDownloadArea,
}

impl DownloadCoordinator {
    pub fn new(extractor: Arc<dyn MediaExtractor>, temp_area: TempDownloadArea) -> Self {
        Self {
            extractor,
            temp_area,
        }
    }

    pub fn temp_area(&self) -> &TempDownloadArea {
        &self.temp_area
    }

    pub async fn fetch_formats(&self, url: String) -> Result<DownloadSession, AppError> {
        let url = normalize_url(&url)?;

        let info = self
            .extractor
            .extract_info(&url)
            .await
            .map_err(|e| AppError::Fetch(e.to_string()))?;

        let formats = build_format_list(&info.formats);
        let title = info
            .title
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());

        tracing::info!(
            raw = info.formats.len(),
            kept = formats.len(),
            "formats fetched"
        );

        Ok(DownloadSession::new(url, sanitize_filename(&title), formats))
    }

    /// Downloads `format_id` of the session into the temp area. Progress
    /// events arrive in order, followed by exactly one `Completed` or
    /// `Failed`.
    pub fn download_stream(
        &self,
        session: DownloadSession,
        format_id: String,
    ) -> BoxStream<'static, DownloadEvent> {
        if let Err(e) = session.ensure_downloadable(&format_id) {
            return stream::once(future::ready(DownloadEvent::Failed(e))).boxed();
        }

        let request = DownloadRequest {
            url: session.source_url,
            format_id,
            output_template: self.temp_area.output_template(&session.sanitized_title),
        };
        let extractor = self.extractor.clone();
        let temp_area = self.temp_area.clone();
        let (events, events_rx) = mpsc::unbounded();

        let driver = async move {
            let outcome = run_download(extractor.as_ref(), &temp_area, &request, &events).await;
            let last = match outcome {
                Ok(path) => DownloadEvent::Completed(path),
                Err(e) => DownloadEvent::Failed(e),
            };
            let _ = events.unbounded_send(last);
        };

        // The driver only produces side effects; the receiver yields the events
        // and ends once the driver has dropped its sender.
        stream::select(
            events_rx,
            stream::once(driver).filter_map(|()| future::ready(None::<DownloadEvent>)),
        )
        .boxed()
    }

    pub async fn choose_save_path(&self, suggested_filename: String) -> Option<PathBuf> {
        rfd::AsyncFileDialog::new()
            .set_title("Save video")
            .set_file_name(&suggested_filename)
            .save_file()
            .await
            .map(|handle| handle.path().to_path_buf())
    }

    /// Copies the newest file of the temp area to `destination`, replacing
    /// whatever is there.
    pub async fn save_to(&self, destination: PathBuf) -> Result<PathBuf, AppError> {
        let source = self
            .temp_area
            .newest_file()
            .await
            .map_err(|e| AppError::Save(e.to_string()))?
            .ok_or_else(|| AppError::Save("nothing has been downloaded yet".to_string()))?;

        tokio::fs::copy(&source, &destination)
            .await
            .map_err(|e| AppError::Save(e.to_string()))?;

        tracing::info!(from = %source.display(), to = %destination.display(), "file saved");
        Ok(destination)
    }
}

async fn run_download(
    extractor: &dyn MediaExtractor,
    temp_area: &TempDownloadArea,
    request: &DownloadRequest,
    events: &UnboundedSender<DownloadEvent>,
) -> Result<PathBuf, AppError> {
    temp_area
        .clear()
        .await
        .map_err(|e| AppError::Download(format!("Failed to clear temp area: {}", e)))?;

    tracing::info!(format = %request.format_id, url = %request.url, "download started");

    let (progress, progress_rx) = mpsc::unbounded::<ProgressUpdate>();
    let relay = progress_rx.for_each(|update| {
        if update.status == "downloading" {
            let _ = events.unbounded_send(DownloadEvent::Progress(update.percent));
        }
        future::ready(())
    });

    let (result, ()) = futures::join!(extractor.download(request, progress), relay);
    result.map_err(|e| AppError::Download(e.to_string()))?;

    temp_area
        .newest_file()
        .await
        .map_err(|e| AppError::Download(e.to_string()))?
        .ok_or_else(|| AppError::Download("no file was written".to_string()))
}
