use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const APP_DIR: &str = "yt-format-grabber";

/// Private staging directory that holds the latest download until the user
/// saves it somewhere.
#[derive(Debug, Clone)]
pub struct TempDownloadArea {
    dir: PathBuf,
}

impl TempDownloadArea {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn default_location() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(APP_DIR)
            .join("downloads")
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Creates the directory if it does not exist yet
    pub fn prepare(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)
    }

    pub fn output_template(&self, file_stem: &str) -> PathBuf {
        self.dir.join(format!("{}.%(ext)s", file_stem))
    }

    /// Removes everything left over from earlier downloads
    pub async fn clear(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_dir() {
                tokio::fs::remove_dir_all(&path).await?;
            } else {
                tokio::fs::remove_file(&path).await?;
            }
        }
        Ok(())
    }

    /// The most recently modified file, ties broken by name
    pub async fn newest_file(&self) -> io::Result<Option<PathBuf>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        let mut newest: Option<(SystemTime, PathBuf)> = None;
        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }

            let candidate = (metadata.modified()?, entry.path());
            if newest.as_ref().map_or(true, |current| candidate > *current) {
                newest = Some(candidate);
            }
        }

        Ok(newest.map(|(_, path)| path))
    }
}
