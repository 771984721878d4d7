use std::path::PathBuf;
use std::sync::Arc;

use futures::StreamExt;
use iced::Task;

use crate::api::YtDlpClient;
use crate::application::{
    normalize_url, DownloadCoordinator, DownloadEvent, JobKind, JobTracker, TempDownloadArea,
};
use crate::domain::{AppError, DownloadSession};
use crate::ui::{DownloadMessage, DownloadView};
use crate::utils::source_host;

pub struct DownloadApp {
    view: DownloadView,
    coordinator: DownloadCoordinator,
    jobs: JobTracker,
    session: Option<DownloadSession>,
    /// File in the temp area from the last successful download
    downloaded_file: Option<PathBuf>,
}

impl Default for DownloadApp {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadApp {
    pub fn new() -> Self {
        let extractor = Arc::new(YtDlpClient::new(Default::default()));
        let temp_area = TempDownloadArea::new(TempDownloadArea::default_location());

        Self::with_coordinator(DownloadCoordinator::new(extractor, temp_area))
    }

    pub fn with_coordinator(coordinator: DownloadCoordinator) -> Self {
        let mut app = Self {
            view: DownloadView::default(),
            coordinator,
            jobs: JobTracker::default(),
            session: None,
            downloaded_file: None,
        };

        let temp_area = app.coordinator.temp_area().path().to_path_buf();
        match app.coordinator.temp_area().prepare() {
            Ok(()) => tracing::info!(path = %temp_area.display(), "temp area ready"),
            Err(e) => {
                tracing::warn!(path = %temp_area.display(), error = %e, "temp area unavailable");
                app.log(format!("Failed to prepare {}: {}", temp_area.display(), e));
            }
        }

        app.sync_controls();
        app
    }

    fn log(&mut self, line: String) {
        tracing::info!("{}", line);
        self.view.push_log(line);
    }

    fn log_error(&mut self, error: &AppError) {
        tracing::warn!("{}", error);
        self.view.push_log(error.to_string());
    }

    fn refuse(&mut self, kind: JobKind) {
        self.log(format!("Cannot start {} right now, please wait.", kind.describe()));
    }

    /// Button states follow the session, the last download and running jobs
    fn sync_controls(&mut self) {
        let has_selection = self
            .session
            .as_ref()
            .and_then(DownloadSession::selected)
            .is_some();

        self.view.can_fetch = self.jobs.can_start(JobKind::Fetch);
        self.view.can_download = has_selection && self.jobs.can_start(JobKind::Download);
        self.view.can_save = self.downloaded_file.is_some() && self.jobs.can_start(JobKind::Save);
    }

    fn start_fetch(&mut self) -> Task<Message> {
        let url = match normalize_url(&self.view.url) {
            Ok(url) => url,
            Err(e) => {
                self.log_error(&e);
                return Task::none();
            }
        };

        if !self.jobs.try_start(JobKind::Fetch) {
            self.refuse(JobKind::Fetch);
            return Task::none();
        }

        self.session = None;
        self.downloaded_file = None;
        self.view.format_labels.clear();
        self.view.selected_label = None;

        let source = source_host(&url).unwrap_or_else(|| url.clone());
        self.log(format!("Fetching formats from {}...", source));

        let coordinator = self.coordinator.clone();
        Task::perform(
            async move { coordinator.fetch_formats(url).await },
            Message::FormatsFetched,
        )
    }

    fn select_format(&mut self, label: String) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if let Err(e) = session.select_by_label(&label) {
            self.view.selected_label = session.selected_label();
            self.log_error(&e);
        }
    }

    fn start_download(&mut self) -> Task<Message> {
        let Some(session) = self.session.clone() else {
            self.log("Fetch formats first!".to_string());
            return Task::none();
        };
        let Some(format_id) = session.selected_format_id.clone() else {
            self.log("Select a format first!".to_string());
            return Task::none();
        };

        if !self.jobs.try_start(JobKind::Download) {
            self.refuse(JobKind::Download);
            return Task::none();
        }

        self.downloaded_file = None;
        let label = session.selected_label().unwrap_or_else(|| format_id.clone());
        self.log(format!("Downloading {}...", label));

        Task::stream(
            self.coordinator
                .download_stream(session, format_id)
                .map(Message::Download),
        )
    }

    fn on_download_event(&mut self, event: DownloadEvent) {
        match event {
            DownloadEvent::Progress(percent) => {
                self.view.push_log(format!("Progress: {}", percent));
            }
            DownloadEvent::Completed(path) => {
                self.jobs.finish(JobKind::Download);
                tracing::info!(path = %path.display(), "download finished");
                self.downloaded_file = Some(path);
                self.log("Download complete!".to_string());
            }
            DownloadEvent::Failed(e) => {
                self.jobs.finish(JobKind::Download);
                self.downloaded_file = None;
                self.log_error(&e);
            }
        }
    }

    fn start_save(&mut self) -> Task<Message> {
        let Some(file) = self.downloaded_file.as_ref() else {
            return Task::none();
        };
        let suggested = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        if !self.jobs.try_start(JobKind::Save) {
            self.refuse(JobKind::Save);
            return Task::none();
        }

        let coordinator = self.coordinator.clone();
        Task::perform(
            async move { coordinator.choose_save_path(suggested).await },
            Message::SaveLocationChosen,
        )
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(DownloadMessage),
    FormatsFetched(Result<DownloadSession, AppError>),
    Download(DownloadEvent),
    /// None when the dialog was cancelled
    SaveLocationChosen(Option<PathBuf>),
    SaveCompleted(Result<PathBuf, AppError>),
}

pub fn update(app: &mut DownloadApp, message: Message) -> Task<Message> {
    let task = match message {
        Message::UiMessage(ui_msg) => {
            app.view.update(ui_msg.clone());

            match ui_msg {
                DownloadMessage::FetchPressed => app.start_fetch(),
                DownloadMessage::FormatSelected(label) => {
                    app.select_format(label);
                    Task::none()
                }
                DownloadMessage::DownloadPressed => app.start_download(),
                DownloadMessage::SavePressed => app.start_save(),
                DownloadMessage::UrlChanged(_) => Task::none(),
            }
        }
        Message::FormatsFetched(result) => {
            app.jobs.finish(JobKind::Fetch);
            match result {
                Ok(session) => {
                    app.view.format_labels = session.labels();
                    app.view.selected_label = session.selected_label();
                    app.log(format!("Found {} formats", session.available_formats.len()));
                    app.session = Some(session);
                }
                Err(e) => app.log_error(&e),
            }
            Task::none()
        }
        Message::Download(event) => {
            app.on_download_event(event);
            Task::none()
        }
        Message::SaveLocationChosen(path_opt) => match path_opt {
            Some(path) => {
                let coordinator = app.coordinator.clone();
                Task::perform(
                    async move { coordinator.save_to(path).await },
                    Message::SaveCompleted,
                )
            }
            None => {
                // User cancelled dialog
                app.jobs.finish(JobKind::Save);
                tracing::debug!("save dialog cancelled");
                Task::none()
            }
        },
        Message::SaveCompleted(result) => {
            app.jobs.finish(JobKind::Save);
            match result {
                Ok(path) => app.log(format!("File saved to: {}", path.display())),
                Err(e) => app.log_error(&e),
            }
            Task::none()
        }
    };

    app.sync_controls();
    task
}

pub fn view(app: &DownloadApp) -> iced::Element<'_, Message> {
    app.view.view().map(Message::UiMessage)
}
