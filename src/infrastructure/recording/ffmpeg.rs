//! FFmpeg-based capture adapter
//!
//! Spawns one FFmpeg process per recording that writes AAC/M4A straight
//! to the destination file. A supervisor task owns the process and
//! reports how it ended.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tokio::time::{timeout, Duration as TokioDuration};
use tracing::{debug, warn};

use crate::application::ports::{
    stream_channel, ActiveStream, CaptureBackend, StreamEnd, StreamError, StreamLink,
};
use crate::domain::recording::{EncodingSettings, AUDIO_CODEC};

/// How long FFmpeg gets to fail on bad input before we call it started
const STARTUP_GRACE: TokioDuration = TokioDuration::from_millis(250);

/// How long FFmpeg gets to finalize the file after an interrupt
const STOP_TIMEOUT: TokioDuration = TokioDuration::from_secs(5);

/// FFmpeg capture settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FfmpegCapture {
    program: String,
    input_format: String,
    input_device: String,
}

impl FfmpegCapture {
    /// Create a capture adapter for the given FFmpeg program and input
    pub fn new(
        program: impl Into<String>,
        input_format: impl Into<String>,
        input_device: impl Into<String>,
    ) -> Self {
        Self {
            program: program.into(),
            input_format: input_format.into(),
            input_device: input_device.into(),
        }
    }

    /// Build FFmpeg args for recording
    fn build_ffmpeg_args(&self, output_path: &Path, settings: &EncodingSettings) -> Vec<String> {
        vec![
            "-hide_banner".to_string(),
            "-nostats".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-f".to_string(),
            self.input_format.clone(),
            "-i".to_string(),
            self.input_device.clone(),
            "-ar".to_string(),
            settings.sample_rate.to_string(),
            "-ac".to_string(),
            settings.channels.to_string(),
            "-c:a".to_string(),
            AUDIO_CODEC.to_string(),
            "-q:a".to_string(),
            settings.quality.vbr_level().to_string(),
            "-movflags".to_string(),
            "+faststart".to_string(),
            "-n".to_string(), // Never overwrite an existing recording
            output_path.to_string_lossy().to_string(),
        ]
    }

    /// Spawn FFmpeg process
    fn spawn_ffmpeg(&self, args: &[String]) -> Result<Child, StreamError> {
        let mut command = Command::new(&self.program);
        command
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Keep terminal Ctrl-C away from FFmpeg; stopping goes through `interrupt`
        #[cfg(unix)]
        command.process_group(0);

        command
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    StreamError::FfmpegNotFound
                } else {
                    StreamError::StartFailed(e.to_string())
                }
            })
    }
}

#[async_trait]
impl CaptureBackend for FfmpegCapture {
    async fn start(
        &self,
        destination: &Path,
        settings: &EncodingSettings,
    ) -> Result<ActiveStream, StreamError> {
        if destination.exists() {
            return Err(StreamError::DestinationExists(
                destination.display().to_string(),
            ));
        }

        let args = self.build_ffmpeg_args(destination, settings);
        debug!(program = %self.program, ?args, "spawning ffmpeg");
        let mut child = self.spawn_ffmpeg(&args)?;

        // A bad input device makes FFmpeg exit almost immediately
        let early_exit = timeout(STARTUP_GRACE, child.wait()).await;
        if let Ok(waited) = early_exit {
            let reason = match waited {
                Ok(status) => exit_reason(&mut child, status).await,
                Err(e) => e.to_string(),
            };
            // The destination did not exist before, so anything there is partial
            let _ = tokio::fs::remove_file(destination).await;
            return Err(StreamError::StartFailed(reason));
        }

        let (stream, link) = stream_channel();
        tokio::spawn(supervise(child, destination.to_path_buf(), link));
        Ok(stream)
    }
}

/// Own the FFmpeg process until it exits and report the outcome
async fn supervise(mut child: Child, path: PathBuf, link: StreamLink) {
    let StreamLink { stop, finished } = link;

    let exited = tokio::select! {
        status = child.wait() => Some(status),
        _ = stop => None,
    };

    let end = match exited {
        Some(Ok(status)) if status.success() => StreamEnd::Completed,
        Some(Ok(status)) => StreamEnd::Failed(exit_reason(&mut child, status).await),
        Some(Err(e)) => StreamEnd::Failed(e.to_string()),
        None => {
            interrupt(&mut child).await;
            let waited = timeout(STOP_TIMEOUT, child.wait()).await;
            match waited {
                Ok(_) => written_or_failed(&path).await,
                Err(_) => {
                    warn!(path = %path.display(), "ffmpeg did not stop in time, killing it");
                    let _ = child.kill().await;
                    StreamEnd::Failed("ffmpeg did not finalize the recording".to_string())
                }
            }
        }
    };

    if end.is_failure() {
        // Only successful captures become recordings
        let _ = tokio::fs::remove_file(&path).await;
    }

    let _ = finished.send(end);
}

/// A stopped capture succeeded only if it left audio behind
async fn written_or_failed(path: &Path) -> StreamEnd {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.len() > 0 => StreamEnd::Stopped,
        _ => StreamEnd::Failed("no audio was written".to_string()),
    }
}

/// Last line FFmpeg wrote to stderr, or the exit status
async fn exit_reason(child: &mut Child, status: ExitStatus) -> String {
    let mut buf = Vec::new();
    if let Some(mut stderr) = child.stderr.take() {
        let _ = stderr.read_to_end(&mut buf).await;
    }

    let text = String::from_utf8_lossy(&buf);
    text.lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .map(|line| format!("ffmpeg exited with error: {}", line.trim()))
        .unwrap_or_else(|| format!("ffmpeg exited with {}", status))
}

/// Ask FFmpeg to finish the file (SIGINT)
#[cfg(unix)]
async fn interrupt(child: &mut Child) {
    use nix::sys::signal::{self, Signal};
    use nix::unistd::Pid;

    if let Some(id) = child.id() {
        if let Err(e) = signal::kill(Pid::from_raw(id as i32), Signal::SIGINT) {
            warn!(error = %e, "failed to interrupt ffmpeg");
            let _ = child.start_kill();
        }
    }
}

/// Ask FFmpeg to finish the file ('q' on stdin)
#[cfg(not(unix))]
async fn interrupt(child: &mut Child) {
    use tokio::io::AsyncWriteExt;

    let sent = match child.stdin.as_mut() {
        Some(stdin) => stdin.write_all(b"q").await.is_ok(),
        None => false,
    };
    if !sent {
        let _ = child.start_kill();
    }
}
