use rand::RngExt;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::constants::constants;

// --- Upload simulation ---

/// Validation failures reported synchronously by `start`, before any timer
/// is armed. The catalog is never touched on these paths.
#[derive(Debug, PartialEq, Eq)]
pub enum UploadError {
  /// The selected file isn't a video.
  InvalidFileType { mime: String },
  /// The selected file exceeds the upload ceiling.
  FileTooLarge { size: u64 },
  /// Another upload session is already in flight.
  AlreadyUploading,
}

impl Display for UploadError {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      UploadError::InvalidFileType { mime } => {
        write!(f, "Please select a valid video file (got {})", mime)
      }
      UploadError::FileTooLarge { size } => {
        write!(f, "File size must be less than 500MB (got {}MB)", size / (1024 * 1024))
      }
      UploadError::AlreadyUploading => write!(f, "An upload is already in progress"),
    }
  }
}

impl std::error::Error for UploadError {}

/// A user-selected local file: name, size, and MIME type, as supplied by the
/// input collaborator.
#[derive(Debug, Clone)]
pub struct SelectedFile {
  pub path: PathBuf,
  pub name: String,
  pub size: u64,
  pub mime: String,
}

impl SelectedFile {
  /// Build a selection from a filesystem path, reading its size and
  /// deriving the MIME type from the extension.
  pub fn from_path(path: &Path) -> anyhow::Result<Self> {
    use anyhow::Context;
    let meta =
      std::fs::metadata(path).with_context(|| format!("Cannot read file {}", path.display()))?;
    if !meta.is_file() {
      anyhow::bail!("{} is not a file", path.display());
    }
    let name = path
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .with_context(|| format!("{} has no file name", path.display()))?;
    let ext = path.extension().map(|e| e.to_string_lossy().to_lowercase()).unwrap_or_default();
    Ok(Self { path: path.to_path_buf(), name, size: meta.len(), mime: mime_for_extension(&ext).to_string() })
  }
}

/// MIME type for a lowercase file extension. Anything unrecognized falls
/// back to a generic binary type, which the validator then rejects.
pub fn mime_for_extension(ext: &str) -> &'static str {
  match ext {
    "mp4" | "m4v" => "video/mp4",
    "mkv" => "video/x-matroska",
    "webm" => "video/webm",
    "mov" => "video/quicktime",
    "avi" => "video/x-msvideo",
    "mpg" | "mpeg" => "video/mpeg",
    "ts" => "video/mp2t",
    _ => "application/octet-stream",
  }
}

/// Derive a record title from the file name with its extension stripped.
pub fn title_from_filename(name: &str) -> String {
  Path::new(name).file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| name.to_string())
}

/// Synchronous validation, run by `start` before anything is spawned.
pub fn validate(file: &SelectedFile) -> Result<(), UploadError> {
  if !file.mime.starts_with("video/") {
    return Err(UploadError::InvalidFileType { mime: file.mime.clone() });
  }
  if file.size > constants().upload_max_bytes {
    return Err(UploadError::FileTooLarge { size: file.size });
  }
  Ok(())
}

/// Events emitted by the simulated upload task.
#[derive(Debug)]
pub enum UploadEvent {
  /// Progress update, 0..=100. Monotonically non-decreasing.
  Progress(f64),
  /// The simulated transfer finished; the app synthesizes the record.
  Completed(SelectedFile),
  /// Something went wrong mid-flight. No catalog mutation happened.
  Failed(String),
}

/// Upload session state machine.
///
/// `Idle -> Uploading -> Completed -> Idle`, with cancellation and failure
/// both collapsing straight back to `Idle`. Cancelling aborts the timer
/// task — the sole mechanism for stopping an in-flight session — and is
/// idempotent. `Completed` keeps the modal visible until `close_at` so the
/// success notice is seen before the modal closes on its own.
#[derive(Debug, Default)]
pub enum UploadState {
  #[default]
  Idle,
  Uploading {
    handle: JoinHandle<()>,
    progress: f64,
  },
  Completed {
    close_at: Instant,
  },
}

impl UploadState {
  pub fn is_uploading(&self) -> bool {
    matches!(self, UploadState::Uploading { .. })
  }

  /// Whether the upload modal should be visible to the renderer.
  pub fn modal_open(&self) -> bool {
    !matches!(self, UploadState::Idle)
  }
}

/// Run the simulated upload as an async task.
///
/// Every tick adds a pseudo-random increment until progress reaches 100,
/// which is clamped and followed by a `Completed` event carrying the file.
/// The source file is re-checked just before completion — a selection that
/// vanished mid-flight fails the session instead of producing a feed entry
/// whose video can never play.
pub fn spawn_upload_pipeline(tx: mpsc::UnboundedSender<UploadEvent>, file: SelectedFile) -> JoinHandle<()> {
  tokio::spawn(async move {
    let c = constants();
    let mut ticker = tokio::time::interval(Duration::from_millis(c.upload_tick_ms));
    // The first interval tick completes immediately; consume it so every
    // progress step costs a full tick.
    ticker.tick().await;

    let mut progress: f64 = 0.0;
    info!(file = %file.name, size = file.size, "upload: simulation started");

    loop {
      ticker.tick().await;
      progress += rand::rng().random_range(0.0..c.upload_step_max_pct);
      if progress >= 100.0 {
        let _ = tx.send(UploadEvent::Progress(100.0));
        break;
      }
      let _ = tx.send(UploadEvent::Progress(progress));
    }

    if std::fs::metadata(&file.path).is_err() {
      info!(file = %file.name, "upload: source file disappeared mid-flight");
      let _ = tx.send(UploadEvent::Failed("Upload failed. Please try again.".to_string()));
      return;
    }

    info!(file = %file.name, "upload: simulation complete");
    let _ = tx.send(UploadEvent::Completed(file));
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn video_file(size: u64) -> SelectedFile {
    SelectedFile {
      path: PathBuf::from("/tmp/does-not-matter.mp4"),
      name: "lecture.mp4".to_string(),
      size,
      mime: "video/mp4".to_string(),
    }
  }

  // --- Validation ---

  #[test]
  fn valid_video_passes() {
    assert!(validate(&video_file(10 * 1024 * 1024)).is_ok());
  }

  #[test]
  fn non_video_mime_is_rejected() {
    let mut file = video_file(1024);
    file.mime = "application/pdf".to_string();
    assert_eq!(validate(&file), Err(UploadError::InvalidFileType { mime: "application/pdf".to_string() }));
  }

  #[test]
  fn oversized_file_is_rejected() {
    let size = 600 * 1024 * 1024;
    assert_eq!(validate(&video_file(size)), Err(UploadError::FileTooLarge { size }));
  }

  #[test]
  fn ceiling_is_inclusive() {
    assert!(validate(&video_file(constants().upload_max_bytes)).is_ok());
    assert!(validate(&video_file(constants().upload_max_bytes + 1)).is_err());
  }

  // --- Helpers ---

  #[test]
  fn mime_covers_common_video_extensions() {
    assert_eq!(mime_for_extension("mp4"), "video/mp4");
    assert_eq!(mime_for_extension("webm"), "video/webm");
    assert_eq!(mime_for_extension("mov"), "video/quicktime");
    assert_eq!(mime_for_extension("pdf"), "application/octet-stream");
    assert_eq!(mime_for_extension(""), "application/octet-stream");
  }

  #[test]
  fn title_strips_only_the_extension() {
    assert_eq!(title_from_filename("lecture.mp4"), "lecture");
    assert_eq!(title_from_filename("my.course.intro.mkv"), "my.course.intro");
    assert_eq!(title_from_filename("noextension"), "noextension");
  }

  // --- Pipeline ---

  #[tokio::test(start_paused = true)]
  async fn pipeline_progress_is_monotone_and_completes() {
    let dir = std::env::temp_dir();
    let path = dir.join("shine-upload-test.mp4");
    std::fs::write(&path, b"fake video bytes").unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let file = SelectedFile {
      path: path.clone(),
      name: "shine-upload-test.mp4".to_string(),
      size: 16,
      mime: "video/mp4".to_string(),
    };
    let handle = spawn_upload_pipeline(tx, file);
    handle.await.unwrap();

    let mut last = 0.0;
    let mut completed = false;
    while let Ok(event) = rx.try_recv() {
      match event {
        UploadEvent::Progress(p) => {
          assert!(p >= last, "progress must be non-decreasing: {} then {}", last, p);
          assert!(p <= 100.0);
          last = p;
        }
        UploadEvent::Completed(f) => {
          assert_eq!(f.name, "shine-upload-test.mp4");
          completed = true;
        }
        UploadEvent::Failed(msg) => panic!("unexpected failure: {}", msg),
      }
    }
    assert_eq!(last, 100.0, "progress must reach exactly 100");
    assert!(completed);
    let _ = std::fs::remove_file(&path);
  }

  #[tokio::test(start_paused = true)]
  async fn pipeline_fails_when_source_file_vanishes() {
    let path = std::env::temp_dir().join("shine-upload-vanished.mp4");
    let _ = std::fs::remove_file(&path);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let file =
      SelectedFile { path, name: "shine-upload-vanished.mp4".to_string(), size: 16, mime: "video/mp4".to_string() };
    spawn_upload_pipeline(tx, file).await.unwrap();

    let mut failed = false;
    while let Ok(event) = rx.try_recv() {
      if let UploadEvent::Failed(_) = event {
        failed = true;
      }
    }
    assert!(failed);
  }

  #[tokio::test(start_paused = true)]
  async fn cancelled_pipeline_sends_no_completion() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = spawn_upload_pipeline(tx, video_file(16));
    handle.abort();
    let _ = handle.await;

    while let Ok(event) = rx.try_recv() {
      assert!(matches!(event, UploadEvent::Progress(_)), "only progress events may precede an abort");
    }
  }

  #[test]
  fn state_reports_modal_visibility() {
    assert!(!UploadState::Idle.modal_open());
    assert!(UploadState::Completed { close_at: Instant::now() }.modal_open());
    assert!(!UploadState::Idle.is_uploading());
  }
}
