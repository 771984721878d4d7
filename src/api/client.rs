use std::ffi::OsString;
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use futures::channel::mpsc::UnboundedSender;
use regex::Regex;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;

use super::models::{DownloadRequest, ExtractorConfig, ProgressUpdate, VideoInfo};
use super::MediaExtractor;

/// Marker yt-dlp prints in front of every progress line we ask for
const PROGRESS_MARKER: &str = "[progress]";
const PROGRESS_TEMPLATE: &str =
    "download:[progress] %(progress.status)s %(progress._percent_str)s";

#[derive(Error, Debug)]
pub enum ExtractorError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("yt-dlp exited with {status}: {message}")]
    Failed { status: ExitStatus, message: String },

    #[error("Invalid metadata: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExtractorError>;

/// Drives the `yt-dlp` executable as a child process
#[derive(Debug, Clone)]
pub struct YtDlpClient {
    config: ExtractorConfig,
}

impl YtDlpClient {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    fn command(&self, args: &[OsString]) -> Command {
        tracing::debug!(program = %self.config.program.display(), ?args, "running yt-dlp");

        let mut command = Command::new(&self.config.program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }

    fn spawn_error(&self, source: std::io::Error) -> ExtractorError {
        ExtractorError::Spawn {
            program: self.config.program.display().to_string(),
            source,
        }
    }
}

#[async_trait]
impl MediaExtractor for YtDlpClient {
    async fn extract_info(&self, url: &str) -> Result<VideoInfo> {
        let output = self
            .command(&info_args(url))
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(ExtractorError::Failed {
                status: output.status,
                message: error_summary(&String::from_utf8_lossy(&output.stderr)),
            });
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }

    async fn download(
        &self,
        request: &DownloadRequest,
        progress: UnboundedSender<ProgressUpdate>,
    ) -> Result<()> {
        let mut child = self
            .command(&download_args(request))
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("yt-dlp stdout was not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| std::io::Error::other("yt-dlp stderr was not captured"))?;

        let relay_progress = async {
            let mut lines = BufReader::new(stdout).lines();
            while let Some(line) = lines.next_line().await? {
                match parse_progress_line(&line) {
                    Some(update) => {
                        // Receiver gone means nobody is listening anymore
                        let _ = progress.unbounded_send(update);
                    }
                    None => tracing::debug!("yt-dlp: {}", line),
                }
            }
            Ok::<_, std::io::Error>(())
        };

        let collect_errors = async {
            let mut buf = String::new();
            BufReader::new(stderr).read_to_string(&mut buf).await?;
            Ok::<_, std::io::Error>(buf)
        };

        let (relayed, stderr_text) = futures::join!(relay_progress, collect_errors);
        let status = child.wait().await?;
        drop(progress);

        relayed?;
        let stderr_text = stderr_text?;

        if !status.success() {
            return Err(ExtractorError::Failed {
                status,
                message: error_summary(&stderr_text),
            });
        }

        Ok(())
    }
}

fn info_args(url: &str) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["--dump-single-json", "--no-warnings", "--no-playlist", "--"]
        .into_iter()
        .map(OsString::from)
        .collect();
    args.push(url.into());
    args
}

fn download_args(request: &DownloadRequest) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "--no-playlist".into(),
        "--newline".into(),
        "--progress-template".into(),
        PROGRESS_TEMPLATE.into(),
        "-f".into(),
        request.format_id.as_str().into(),
        "-o".into(),
        request.output_template.clone().into_os_string(),
        "--".into(),
    ];
    args.push(request.url.as_str().into());
    args
}

/// Parses a line printed through the progress template, e.g.
/// `[progress] downloading  42.3%`
fn parse_progress_line(line: &str) -> Option<ProgressUpdate> {
    let line = strip_ansi(line);
    let rest = line.trim().strip_prefix(PROGRESS_MARKER)?.trim();
    let (status, percent) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));

    if status.is_empty() {
        return None;
    }

    let percent = match percent.trim() {
        "" | "NA" => "0%",
        p => p,
    };

    Some(ProgressUpdate {
        status: status.to_string(),
        percent: percent.to_string(),
    })
}

fn strip_ansi(line: &str) -> String {
    match Regex::new(r"\x1b\[[0-9;]*m") {
        Ok(re) => re.replace_all(line, "").into_owned(),
        Err(_) => line.to_string(),
    }
}

/// Picks the line worth showing from yt-dlp's stderr: the last `ERROR:` line,
/// otherwise the last non-empty one
fn error_summary(stderr: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    lines
        .iter()
        .rev()
        .find_map(|line| line.strip_prefix("ERROR:"))
        .map(|message| message.trim().to_string())
        .or_else(|| lines.last().map(|line| line.to_string()))
        .unwrap_or_else(|| "no error output".to_string())
}
