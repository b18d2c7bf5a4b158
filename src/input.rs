use ratatui::crossterm::event::{self, KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use std::path::PathBuf;
use std::time::Instant;

use crate::app::{App, AppMode};
use crate::constants::constants;
use crate::upload::{SelectedFile, UploadState};

// --- Helpers ---

/// Convert a char index to a byte offset within the string.
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
  s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

/// Expand a leading `~` to the user's home directory.
fn expand_home(raw: &str) -> PathBuf {
  if let Some(rest) = raw.strip_prefix("~/")
    && let Some(base) = directories::BaseDirs::new()
  {
    return base.home_dir().join(rest);
  }
  PathBuf::from(raw)
}

// --- Event Handling ---

pub fn handle_key_event(app: &mut App, key: event::KeyEvent) {
  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
    app.should_quit = true;
    return;
  }

  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('t') {
    app.next_theme();
    return;
  }

  match app.mode {
    AppMode::Feed => handle_feed_key(app, key),
    AppMode::Search => handle_search_key(app, key),
    AppMode::Upload => handle_upload_key(app, key),
  }
}

fn handle_feed_key(app: &mut App, key: event::KeyEvent) {
  // While a session is uploading, Esc and 'c' cancel it instead of acting
  // on the feed underneath the modal.
  if app.upload.is_uploading() && matches!(key.code, KeyCode::Esc | KeyCode::Char('c')) {
    app.cancel_upload();
    return;
  }
  // After completion the modal auto-closes; Esc dismisses it early.
  if matches!(app.upload, UploadState::Completed { .. }) && key.code == KeyCode::Esc {
    app.upload = UploadState::Idle;
    return;
  }

  match key.code {
    KeyCode::Char('/') => {
      app.clear_error();
      app.mode = AppMode::Search;
    }
    KeyCode::Char('u') => {
      app.clear_error();
      app.mode = AppMode::Upload;
    }
    KeyCode::Esc => {
      if !app.query.trim().is_empty() {
        app.clear_query();
      } else {
        app.should_quit = true;
      }
    }
    code => {
      let intent = app.gesture.on_key(code);
      app.apply_intent(intent);
    }
  }
}

fn handle_search_key(app: &mut App, key: event::KeyEvent) {
  app.clear_error();
  match key.code {
    KeyCode::Enter => {
      app.mode = AppMode::Feed;
    }
    KeyCode::Tab => {
      app.cycle_suggestion();
    }
    KeyCode::Char(c) => {
      let byte_idx = char_to_byte_index(&app.query, app.query_cursor);
      app.query.insert(byte_idx, c);
      app.query_cursor += 1;
      app.query_edited();
    }
    KeyCode::Backspace => {
      if app.query_cursor > 0 {
        app.query_cursor -= 1;
        let byte_idx = char_to_byte_index(&app.query, app.query_cursor);
        app.query.remove(byte_idx);
        app.query_edited();
      }
    }
    KeyCode::Delete => {
      if app.query_cursor < app.query.chars().count() {
        let byte_idx = char_to_byte_index(&app.query, app.query_cursor);
        app.query.remove(byte_idx);
        app.query_edited();
      }
    }
    KeyCode::Left => {
      app.query_cursor = app.query_cursor.saturating_sub(1);
    }
    KeyCode::Right => {
      if app.query_cursor < app.query.chars().count() {
        app.query_cursor += 1;
      }
    }
    KeyCode::Home => {
      app.query_cursor = 0;
    }
    KeyCode::End => {
      app.query_cursor = app.query.chars().count();
    }
    KeyCode::Esc => {
      app.clear_query();
      app.mode = AppMode::Feed;
    }
    _ => {}
  }
}

fn handle_upload_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Enter => {
      trigger_upload_from_input(app);
    }
    KeyCode::Char(c) => {
      let byte_idx = char_to_byte_index(&app.upload_input, app.upload_cursor);
      app.upload_input.insert(byte_idx, c);
      app.upload_cursor += 1;
    }
    KeyCode::Backspace => {
      if app.upload_cursor > 0 {
        app.upload_cursor -= 1;
        let byte_idx = char_to_byte_index(&app.upload_input, app.upload_cursor);
        app.upload_input.remove(byte_idx);
      }
    }
    KeyCode::Delete => {
      if app.upload_cursor < app.upload_input.chars().count() {
        let byte_idx = char_to_byte_index(&app.upload_input, app.upload_cursor);
        app.upload_input.remove(byte_idx);
      }
    }
    KeyCode::Left => {
      app.upload_cursor = app.upload_cursor.saturating_sub(1);
    }
    KeyCode::Right => {
      if app.upload_cursor < app.upload_input.chars().count() {
        app.upload_cursor += 1;
      }
    }
    KeyCode::Home => {
      app.upload_cursor = 0;
    }
    KeyCode::End => {
      app.upload_cursor = app.upload_input.chars().count();
    }
    KeyCode::Esc => {
      app.mode = AppMode::Feed;
    }
    _ => {}
  }
}

fn trigger_upload_from_input(app: &mut App) {
  let raw = app.upload_input.trim().to_string();
  if raw.is_empty() {
    app.set_error("Enter the path of a video file.".to_string());
    return;
  }

  let path = expand_home(&raw);
  let file = match SelectedFile::from_path(&path) {
    Ok(file) => file,
    Err(e) => {
      app.set_error(format!("{:#}", e));
      return;
    }
  };

  match app.trigger_upload(file) {
    Ok(()) => {
      app.upload_input.clear();
      app.upload_cursor = 0;
      app.upload_scroll = 0;
      app.mode = AppMode::Feed;
    }
    Err(e) => {
      app.set_error(e.to_string());
    }
  }
}

/// Route mouse input through the gesture router. Scroll wheel pages the
/// feed under the throttle window; press/release pairs form a touch-style
/// drag. Only active while the feed view has focus.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
  if app.mode != AppMode::Feed {
    return;
  }
  let now = Instant::now();
  let y_px = mouse.row as f32 * constants().touch_row_px;

  let intent = match mouse.kind {
    MouseEventKind::ScrollDown => app.gesture.on_wheel(1, now),
    MouseEventKind::ScrollUp => app.gesture.on_wheel(-1, now),
    MouseEventKind::Down(MouseButton::Left) => {
      app.gesture.touch_start(y_px, now);
      None
    }
    MouseEventKind::Up(MouseButton::Left) => app.gesture.touch_end(y_px, now),
    _ => None,
  };
  app.apply_intent(intent);
}

#[cfg(test)]
mod tests {
  use super::*;

  // --- char_to_byte_index ---

  #[test]
  fn char_to_byte_ascii() {
    assert_eq!(char_to_byte_index("hello", 0), 0);
    assert_eq!(char_to_byte_index("hello", 3), 3);
    assert_eq!(char_to_byte_index("hello", 5), 5); // past end
  }

  #[test]
  fn char_to_byte_multibyte() {
    let s = "aé日"; // a=1 byte, é=2 bytes, 日=3 bytes
    assert_eq!(char_to_byte_index(s, 0), 0); // 'a'
    assert_eq!(char_to_byte_index(s, 1), 1); // 'é' starts at byte 1
    assert_eq!(char_to_byte_index(s, 2), 3); // '日' starts at byte 3
    assert_eq!(char_to_byte_index(s, 3), 6); // past end
  }

  #[test]
  fn char_to_byte_empty() {
    assert_eq!(char_to_byte_index("", 0), 0);
    assert_eq!(char_to_byte_index("", 5), 0);
  }

  // --- expand_home ---

  #[test]
  fn expand_home_leaves_absolute_paths_alone() {
    assert_eq!(expand_home("/tmp/a.mp4"), PathBuf::from("/tmp/a.mp4"));
  }

  #[test]
  fn expand_home_resolves_tilde() {
    if let Some(base) = directories::BaseDirs::new() {
      assert_eq!(expand_home("~/a.mp4"), base.home_dir().join("a.mp4"));
    }
  }
}
