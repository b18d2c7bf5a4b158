use ratatui::crossterm::event::KeyCode;
use std::time::{Duration, Instant};
use tracing::trace;

use crate::constants::constants;

/// A normalized navigation/playback command derived from raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
  Advance,
  Retreat,
  TogglePlay,
}

/// Tracks a touch gesture from press to release.
#[derive(Debug, Clone, Copy)]
struct TouchOrigin {
  y_px: f32,
  at: Instant,
}

/// Normalizes wheel, touch, and keyboard input into [`Intent`]s.
///
/// Wheel intents are throttled: after one fires, further wheel events are
/// ignored for a fixed cool-down so one physical scroll gesture doesn't page
/// through the whole feed. Touch intents are computed only at release, from
/// the vertical displacement and elapsed time — a long slow drag or a short
/// fast flick both qualify. Keyboard intents are never throttled.
///
/// The current time is passed in on every call so throttling and velocity
/// are deterministic under test.
#[derive(Debug)]
pub struct GestureRouter {
  throttle: Duration,
  distance_px: f32,
  velocity_px_per_ms: f32,
  last_wheel: Option<Instant>,
  touch: Option<TouchOrigin>,
}

impl GestureRouter {
  pub fn new() -> Self {
    let c = constants();
    Self::with_tuning(Duration::from_millis(c.wheel_throttle_ms), c.touch_distance_px, c.touch_velocity_px_per_ms)
  }

  pub fn with_tuning(throttle: Duration, distance_px: f32, velocity_px_per_ms: f32) -> Self {
    Self { throttle, distance_px, velocity_px_per_ms, last_wheel: None, touch: None }
  }

  /// One wheel event: positive delta scrolls the feed forward. Returns at
  /// most one intent per throttle window.
  pub fn on_wheel(&mut self, delta: i32, now: Instant) -> Option<Intent> {
    if delta == 0 {
      return None;
    }
    if let Some(last) = self.last_wheel
      && now.duration_since(last) < self.throttle
    {
      trace!("gesture: wheel event inside throttle window, dropped");
      return None;
    }
    self.last_wheel = Some(now);
    Some(if delta > 0 { Intent::Advance } else { Intent::Retreat })
  }

  /// Record the press position that starts a touch gesture.
  pub fn touch_start(&mut self, y_px: f32, now: Instant) {
    self.touch = Some(TouchOrigin { y_px, at: now });
  }

  /// Finish a touch gesture. Fires when the displacement exceeds the
  /// distance threshold *or* the velocity exceeds the flick threshold.
  /// Dragging the content upward (release above press) advances the feed.
  pub fn touch_end(&mut self, y_px: f32, now: Instant) -> Option<Intent> {
    let origin = self.touch.take()?;
    let dy = origin.y_px - y_px;
    let elapsed_ms = now.duration_since(origin.at).as_millis() as f32;
    let velocity = dy.abs() / elapsed_ms.max(1.0);
    trace!(dy, velocity, "gesture: touch released");

    if dy.abs() <= self.distance_px && velocity <= self.velocity_px_per_ms {
      return None;
    }
    if dy > 0.0 { Some(Intent::Advance) } else { Some(Intent::Retreat) }
  }

  /// Map a key press to an intent. Space toggles playback of the active
  /// video; arrows navigate. Discrete — no throttle window.
  pub fn on_key(&self, code: KeyCode) -> Option<Intent> {
    match code {
      KeyCode::Char(' ') => Some(Intent::TogglePlay),
      KeyCode::Down | KeyCode::Char('j') => Some(Intent::Advance),
      KeyCode::Up | KeyCode::Char('k') => Some(Intent::Retreat),
      _ => None,
    }
  }
}

impl Default for GestureRouter {
  fn default() -> Self {
    Self::new()
  }
}
