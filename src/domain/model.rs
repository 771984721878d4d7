use super::AppError;

/// One selectable stream variant, shown to the user as a single label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatDescriptor {
    pub display_label: String,
    pub format_id: String,
    /// Pixel height, present for video variants
    pub height_px: Option<u32>,
    /// Audio bitrate, present for audio-only variants
    pub bitrate_kbps: Option<u32>,
}

/// The URL being worked on, its formats and the user's pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSession {
    pub source_url: String,
    pub sanitized_title: String,
    pub available_formats: Vec<FormatDescriptor>,
    pub selected_format_id: Option<String>,
}

impl DownloadSession {
    /// Builds a session and preselects the top entry, if any.
    pub fn new(
        source_url: String,
        sanitized_title: String,
        available_formats: Vec<FormatDescriptor>,
    ) -> Self {
        let selected_format_id = available_formats
            .first()
            .map(|format| format.format_id.clone());

        Self {
            source_url,
            sanitized_title,
            available_formats,
            selected_format_id,
        }
    }

    pub fn labels(&self) -> Vec<String> {
        self.available_formats
            .iter()
            .map(|format| format.display_label.clone())
            .collect()
    }

    pub fn selected(&self) -> Option<&FormatDescriptor> {
        let id = self.selected_format_id.as_deref()?;
        self.available_formats
            .iter()
            .find(|format| format.format_id == id)
    }

    pub fn selected_label(&self) -> Option<String> {
        self.selected().map(|format| format.display_label.clone())
    }

    pub fn select_by_label(&mut self, label: &str) -> Result<String, AppError> {
        let format_id = self
            .available_formats
            .iter()
            .find(|format| format.display_label == label)
            .map(|format| format.format_id.clone())
            .ok_or_else(|| AppError::NotFound(label.to_string()))?;

        self.selected_format_id = Some(format_id.clone());
        Ok(format_id)
    }

    /// Checks that `format_id` may be downloaded from this session.
    pub fn ensure_downloadable(&self, format_id: &str) -> Result<(), AppError> {
        if self
            .available_formats
            .iter()
            .any(|format| format.format_id == format_id)
        {
            Ok(())
        } else {
            Err(AppError::NotFound(format_id.to_string()))
        }
    }
}
