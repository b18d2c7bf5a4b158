use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::catalog::{Counter, Creator, Topic, VideoCatalog, VideoRecord};
use crate::config::Config;
use crate::constants::constants;
use crate::feed::FeedController;
use crate::gesture::{GestureRouter, Intent};
use crate::search::filter_catalog;
use crate::theme::THEMES;
use crate::upload::{self, SelectedFile, UploadError, UploadEvent, UploadState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
  /// Browsing the feed one video at a time.
  Feed,
  /// Editing the search query (recomputed live).
  Search,
  /// Entering the path of a video file to upload.
  Upload,
}

pub struct App {
  pub mode: AppMode,
  pub theme_index: usize,
  pub catalog: VideoCatalog,
  pub feed: FeedController,
  pub gesture: GestureRouter,

  /// The live search query. The filtered view tracks it on every edit.
  pub query: String,
  pub query_cursor: usize,
  pub query_scroll: usize,
  /// Which popular-search suggestion Tab last applied.
  suggestion_idx: Option<usize>,

  /// Path input for the upload mode.
  pub upload_input: String,
  pub upload_cursor: usize,
  pub upload_scroll: usize,

  pub upload: UploadState,
  pub(crate) upload_rx: Option<mpsc::UnboundedReceiver<UploadEvent>>,

  pub last_error: Option<String>,
  pub status_message: Option<String>,
  /// Informational message — shown with info icon, lower priority than status/error.
  pub info_message: Option<String>,
  pub should_quit: bool,
  /// When the last error was set — used for auto-dismiss.
  error_time: Option<Instant>,
}

impl App {
  pub fn new(catalog: VideoCatalog, theme_flag: Option<String>) -> Self {
    let config = Config::load();
    let wanted = theme_flag.or(config.theme_name);
    let theme_index = wanted.as_deref().and_then(|name| THEMES.iter().position(|t| t.name == name)).unwrap_or(0);

    let mut app = Self {
      mode: AppMode::Feed,
      theme_index,
      catalog,
      feed: FeedController::new(),
      gesture: GestureRouter::new(),
      query: String::new(),
      query_cursor: 0,
      query_scroll: 0,
      suggestion_idx: None,
      upload_input: String::new(),
      upload_cursor: 0,
      upload_scroll: 0,
      upload: UploadState::Idle,
      upload_rx: None,
      last_error: None,
      status_message: None,
      info_message: None,
      should_quit: false,
      error_time: None,
    };
    app.recompute_view();
    app
  }

  pub fn theme(&self) -> &'static crate::theme::Theme {
    // Safety: theme_index is always bounded by modular arithmetic in next_theme()
    // and clamped on initialization.
    &THEMES[self.theme_index]
  }

  pub fn next_theme(&mut self) {
    self.theme_index = (self.theme_index + 1) % THEMES.len();
    self.save_config();
  }

  fn save_config(&self) {
    let config = Config { theme_name: Some(self.theme().name.to_string()) };
    config.save();
  }

  // --- Messages ---

  /// Set an error message with auto-dismiss tracking.
  pub fn set_error(&mut self, msg: String) {
    self.last_error = Some(msg);
    self.error_time = Some(Instant::now());
  }

  /// Clear the current error message and its expiry timer.
  pub fn clear_error(&mut self) {
    self.last_error = None;
    self.error_time = None;
  }

  /// Clear stale error messages once they've been shown long enough.
  pub fn expire_error(&mut self) {
    if let Some(t) = self.error_time
      && t.elapsed() >= Duration::from_secs(constants().error_dismiss_secs)
    {
      self.last_error = None;
      self.error_time = None;
    }
  }

  // --- Feed & search ---

  /// Re-run the filter over the catalog and hand the controller a fresh
  /// view. Called on every catalog or query change; the active index is
  /// reset to 0 as a consequence.
  pub fn recompute_view(&mut self) {
    let ids = filter_catalog(&self.catalog, &self.query);
    self.feed.set_view(ids);
  }

  /// Reset the search query to the identity view.
  pub fn clear_query(&mut self) {
    self.query.clear();
    self.query_cursor = 0;
    self.query_scroll = 0;
    self.suggestion_idx = None;
    self.recompute_view();
  }

  /// Called from the search editor whenever the query text changed.
  pub fn query_edited(&mut self) {
    self.suggestion_idx = None;
    self.recompute_view();
  }

  /// Fill the query with the next popular-search suggestion.
  pub fn cycle_suggestion(&mut self) {
    let populars = &constants().popular_searches;
    if populars.is_empty() {
      return;
    }
    let next = match self.suggestion_idx {
      Some(i) => (i + 1) % populars.len(),
      None => 0,
    };
    self.suggestion_idx = Some(next);
    self.query = populars[next].clone();
    self.query_cursor = self.query.chars().count();
    self.query_scroll = 0;
    self.recompute_view();
  }

  pub fn active_video(&self) -> Option<&VideoRecord> {
    self.feed.active_id().and_then(|id| self.catalog.get(id))
  }

  /// Execute a navigation/playback intent from any input channel.
  pub fn apply_intent(&mut self, intent: Option<Intent>) {
    let Some(intent) = intent else { return };
    match intent {
      Intent::Advance => {
        self.feed.advance();
      }
      Intent::Retreat => {
        self.feed.retreat();
      }
      Intent::TogglePlay => self.feed.toggle_active(),
    }
  }

  // --- Upload session ---

  /// Start an upload session for the selected file.
  ///
  /// Validation errors are reported synchronously and nothing is spawned.
  /// A second `start` while a session is in flight is rejected rather than
  /// silently racing two timers.
  pub fn trigger_upload(&mut self, file: SelectedFile) -> Result<(), UploadError> {
    if self.upload.is_uploading() {
      return Err(UploadError::AlreadyUploading);
    }
    upload::validate(&file)?;

    let (tx, rx) = mpsc::unbounded_channel();
    let handle = upload::spawn_upload_pipeline(tx, file.clone());
    self.upload_rx = Some(rx);
    self.upload = UploadState::Uploading { handle, progress: 0.0 };
    self.clear_error();
    self.info_message = None;
    self.status_message = Some(format!("Uploading {}…", file.name));
    info!(file = %file.name, size = file.size, "upload: session started");
    Ok(())
  }

  /// Abort an in-flight upload. Idempotent: cancelling twice, or after
  /// completion, is a no-op. Never leaves a partial catalog entry.
  pub fn cancel_upload(&mut self) {
    match std::mem::take(&mut self.upload) {
      UploadState::Uploading { handle, .. } => {
        handle.abort();
        self.upload_rx = None;
        self.status_message = None;
        self.info_message = Some("Upload cancelled.".to_string());
        info!("upload: cancelled");
      }
      other => self.upload = other,
    }
  }

  fn finish_upload(&mut self, file: SelectedFile) {
    let record = self.build_uploaded_record(&file);
    info!(id = record.id, title = %record.title, "upload: record added to catalog");
    self.catalog.prepend(record);
    self.recompute_view();
    self.feed.reset_to(0);
    self.upload =
      UploadState::Completed { close_at: Instant::now() + Duration::from_millis(constants().upload_modal_linger_ms) };
    self.status_message = None;
    self.info_message = Some("Video uploaded successfully!".to_string());
  }

  fn fail_upload(&mut self, msg: String) {
    warn!(err = %msg, "upload: failed");
    if let UploadState::Uploading { handle, .. } = std::mem::take(&mut self.upload) {
      handle.abort();
    }
    self.status_message = None;
    self.set_error(msg);
  }

  fn build_uploaded_record(&mut self, file: &SelectedFile) -> VideoRecord {
    let c = constants();
    VideoRecord {
      id: self.catalog.allocate_id(),
      title: upload::title_from_filename(&file.name),
      description: format!("Uploaded video: {}", file.name),
      upload_date: chrono::Local::now().format("%Y-%m-%d").to_string(),
      user: Creator {
        name: c.uploader_name.clone(),
        profile_pic: String::new(),
        university: c.uploader_university.clone(),
        department: c.uploader_department.clone(),
        followers: Counter::Count(0),
        videos: 1,
      },
      video_url: file.path.display().to_string(),
      likes: Counter::Count(0),
      shares: Counter::Count(0),
      topics: vec![Topic {
        title: "Uploaded Content".to_string(),
        content: "This video was uploaded from your personal files.".to_string(),
      }],
      is_uploaded: true,
    }
  }

  /// Drain pending upload events. Every state transition happens here, in
  /// the same loop turn that observes the event.
  pub fn check_pending(&mut self) {
    if let Some(mut rx) = self.upload_rx.take() {
      loop {
        match rx.try_recv() {
          Ok(UploadEvent::Progress(p)) => {
            if let UploadState::Uploading { progress, .. } = &mut self.upload {
              *progress = p;
            }
          }
          Ok(UploadEvent::Completed(file)) => {
            self.finish_upload(file);
            break;
          }
          Ok(UploadEvent::Failed(msg)) => {
            self.fail_upload(msg);
            break;
          }
          Err(mpsc::error::TryRecvError::Empty) => {
            self.upload_rx = Some(rx);
            break;
          }
          Err(mpsc::error::TryRecvError::Disconnected) => {
            if self.upload.is_uploading() {
              self.fail_upload("Upload task failed.".to_string());
            }
            break;
          }
        }
      }
    }
  }

  /// Time-driven housekeeping: error expiry and the post-completion modal
  /// auto-close.
  pub fn tick(&mut self) {
    self.expire_error();
    if let UploadState::Completed { close_at } = self.upload
      && Instant::now() >= close_at
    {
      self.upload = UploadState::Idle;
      debug!("upload: modal auto-closed");
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::PathBuf;

  fn test_app() -> App {
    App::new(VideoCatalog::seed().unwrap(), None)
  }

  fn video_file(name: &str, size: u64) -> SelectedFile {
    SelectedFile { path: PathBuf::from(format!("/tmp/{}", name)), name: name.to_string(), size, mime: "video/mp4".to_string() }
  }

  #[test]
  fn new_app_shows_full_catalog_at_index_zero() {
    let app = test_app();
    assert_eq!(app.feed.len(), 2);
    assert_eq!(app.feed.active_index(), Some(0));
    assert_eq!(app.active_video().unwrap().id, 1);
  }

  #[test]
  fn query_change_resets_active_index() {
    let mut app = test_app();
    app.apply_intent(Some(Intent::Advance));
    assert_eq!(app.feed.active_index(), Some(1));
    app.query = "deep".to_string();
    app.query_edited();
    assert_eq!(app.feed.active_index(), Some(0));
    assert_eq!(app.active_video().unwrap().id, 2);
  }

  #[test]
  fn unmatched_query_yields_empty_feed() {
    let mut app = test_app();
    app.query = "astrophysics".to_string();
    app.query_edited();
    assert!(app.feed.is_empty());
    assert!(app.active_video().is_none());
    app.clear_query();
    assert_eq!(app.feed.len(), 2);
  }

  #[test]
  fn toggle_play_only_touches_the_active_video() {
    let mut app = test_app();
    app.apply_intent(Some(Intent::TogglePlay));
    assert!(app.feed.is_playing(1));
    assert!(!app.feed.is_playing(2));
    app.apply_intent(Some(Intent::Advance));
    assert!(!app.feed.is_playing(1));
  }

  #[test]
  fn finish_upload_prepends_and_focuses_head() {
    let mut app = test_app();
    app.finish_upload(video_file("lecture.mp4", 1024));
    assert_eq!(app.catalog.len(), 3);
    let head = &app.catalog.records()[0];
    assert!(head.is_uploaded);
    assert_eq!(head.title, "lecture");
    assert_eq!(head.id, 3);
    assert_eq!(app.feed.active_index(), Some(0));
    assert_eq!(app.active_video().unwrap().id, head.id);
    assert!(matches!(app.upload, UploadState::Completed { .. }));
  }

  #[test]
  fn failed_upload_returns_to_idle_without_catalog_mutation() {
    let mut app = test_app();
    app.fail_upload("Upload failed. Please try again.".to_string());
    assert!(matches!(app.upload, UploadState::Idle));
    assert_eq!(app.catalog.len(), 2);
    assert!(app.last_error.is_some());
  }

  #[tokio::test]
  async fn oversized_file_is_rejected_before_any_state_change() {
    let mut app = test_app();
    let err = app.trigger_upload(video_file("huge.mp4", 600 * 1024 * 1024)).unwrap_err();
    assert!(matches!(err, UploadError::FileTooLarge { .. }));
    assert!(matches!(app.upload, UploadState::Idle));
    assert_eq!(app.catalog.len(), 2);
  }

  #[tokio::test]
  async fn cancel_mid_upload_leaves_catalog_unchanged() {
    let mut app = test_app();
    app.trigger_upload(video_file("lecture.mp4", 10 * 1024 * 1024)).unwrap();
    assert!(app.upload.is_uploading());
    app.cancel_upload();
    assert!(matches!(app.upload, UploadState::Idle));
    assert_eq!(app.catalog.len(), 2);
    // Idempotent: a second cancel is a no-op.
    app.cancel_upload();
    assert!(matches!(app.upload, UploadState::Idle));
  }

  #[tokio::test]
  async fn second_start_while_uploading_is_rejected() {
    let mut app = test_app();
    app.trigger_upload(video_file("first.mp4", 1024)).unwrap();
    let err = app.trigger_upload(video_file("second.mp4", 1024)).unwrap_err();
    assert_eq!(err, UploadError::AlreadyUploading);
    app.cancel_upload();
  }

  #[test]
  fn completed_modal_auto_closes_after_linger() {
    let mut app = test_app();
    app.upload = UploadState::Completed { close_at: Instant::now() };
    app.tick();
    assert!(matches!(app.upload, UploadState::Idle));
  }

  #[test]
  fn reference_swipe_lands_on_second_video() {
    let mut app = test_app();
    assert_eq!(app.feed.len(), 2);
    let t0 = Instant::now();
    app.gesture.touch_start(300.0, t0);
    // 60 px upward in 100 ms — qualifies on both distance and velocity.
    let intent = app.gesture.touch_end(240.0, t0 + Duration::from_millis(100));
    app.apply_intent(intent);
    assert_eq!(app.feed.active_index(), Some(1));
  }

  #[test]
  fn cycle_suggestion_fills_query_and_recomputes() {
    let mut app = test_app();
    app.cycle_suggestion();
    assert_eq!(app.query, constants().popular_searches[0]);
    assert_eq!(app.feed.active_index().is_some(), !app.feed.is_empty());
    app.cycle_suggestion();
    assert_eq!(app.query, constants().popular_searches[1]);
  }
}
