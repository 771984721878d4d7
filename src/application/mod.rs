pub mod download_coordinator;
pub mod jobs;
pub mod temp_area;

#[cfg(test)]
pub(crate) mod testing;

pub use download_coordinator::{normalize_url, DownloadCoordinator, DownloadEvent};
pub use jobs::{JobKind, JobTracker};
pub use temp_area::TempDownloadArea;
