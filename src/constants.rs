//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!` so it's always available —
//! no runtime file I/O. Parsed once on first access via `LazyLock`.

use serde::Deserialize;
use std::sync::LazyLock;

/// All tuneable application constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  // Gesture routing
  pub wheel_throttle_ms: u64,
  pub touch_distance_px: f32,
  pub touch_velocity_px_per_ms: f32,
  /// Approximate pixel height of one terminal cell, used to convert mouse
  /// rows into the pixel space the touch thresholds are expressed in.
  pub touch_row_px: f32,

  // Upload simulation
  pub upload_tick_ms: u64,
  pub upload_step_max_pct: f64,
  pub upload_max_bytes: u64,
  pub upload_modal_linger_ms: u64,

  // Messages
  pub error_dismiss_secs: u64,

  // Profile attached to uploaded records
  pub uploader_name: String,
  pub uploader_university: String,
  pub uploader_department: String,

  // Search bar suggestion row
  pub popular_searches: Vec<String>,
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time; if it's malformed this is a build-time error.
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn embedded_constants_parse() {
    let c = constants();
    assert_eq!(c.wheel_throttle_ms, 500);
    assert_eq!(c.upload_tick_ms, 200);
    assert!(!c.popular_searches.is_empty());
  }
}
