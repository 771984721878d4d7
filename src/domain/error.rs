use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Please enter a URL first!")]
    EmptyInput,

    #[error("Failed to fetch formats: {0}")]
    Fetch(String),

    #[error("Unknown format: {0}")]
    NotFound(String),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Save error: {0}")]
    Save(String),
}
