use tracing::debug;

use crate::catalog::VideoId;
use crate::playback::PlaybackStateStore;

/// Owns the active position within the current filtered view, and the
/// playback store with it, so that "only the active video may play" is an
/// invariant of the index-change operations rather than caller discipline.
///
/// The view is an ordered list of catalog ids produced by
/// [`crate::search::filter_catalog`]; it is replaced wholesale whenever the
/// catalog or query changes. When the view is empty there is no active
/// video and the caller renders the no-results affordance.
#[derive(Debug, Default)]
pub struct FeedController {
  view: Vec<VideoId>,
  active: Option<usize>,
  playback: PlaybackStateStore,
}

impl FeedController {
  pub fn new() -> Self {
    Self::default()
  }

  /// Replace the filtered view and reset the active index to 0
  /// (or the empty sentinel when nothing matches).
  pub fn set_view(&mut self, view: Vec<VideoId>) {
    self.active = if view.is_empty() { None } else { Some(0) };
    self.view = view;
    debug!(len = self.view.len(), "feed: view replaced");
  }

  pub fn view(&self) -> &[VideoId] {
    &self.view
  }

  pub fn len(&self) -> usize {
    self.view.len()
  }

  pub fn is_empty(&self) -> bool {
    self.view.is_empty()
  }

  pub fn active_index(&self) -> Option<usize> {
    self.active
  }

  pub fn active_id(&self) -> Option<VideoId> {
    self.active.and_then(|i| self.view.get(i).copied())
  }

  /// Move to the next video. No-op at the last index — the feed clamps at
  /// its boundaries, it never wraps. Switching always pauses every video
  /// except the newly active one; it never auto-plays it.
  pub fn advance(&mut self) -> bool {
    let Some(i) = self.active else { return false };
    if i + 1 >= self.view.len() {
      return false;
    }
    self.active = Some(i + 1);
    self.playback.set_false_except(self.view[i + 1]);
    debug!(index = i + 1, "feed: advance");
    true
  }

  /// Move to the previous video. No-op at index 0.
  pub fn retreat(&mut self) -> bool {
    let Some(i) = self.active else { return false };
    if i == 0 {
      return false;
    }
    self.active = Some(i - 1);
    self.playback.set_false_except(self.view[i - 1]);
    debug!(index = i - 1, "feed: retreat");
    true
  }

  /// Force the active index to `i`, clamped into the view's bounds.
  pub fn reset_to(&mut self, i: usize) {
    self.active = if self.view.is_empty() { None } else { Some(i.min(self.view.len() - 1)) };
  }

  /// Toggle playback of the active video. No-op when the view is empty.
  pub fn toggle_active(&mut self) {
    if let Some(id) = self.active_id() {
      self.playback.toggle(id);
      debug!(id, playing = self.playback.get(id), "feed: toggle playback");
    }
  }

  pub fn is_playing(&self, id: VideoId) -> bool {
    self.playback.get(id)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn controller(ids: &[VideoId]) -> FeedController {
    let mut feed = FeedController::new();
    feed.set_view(ids.to_vec());
    feed
  }

  #[test]
  fn set_view_resets_index_to_zero() {
    let mut feed = controller(&[1, 2, 3]);
    feed.advance();
    assert_eq!(feed.active_index(), Some(1));
    feed.set_view(vec![2, 3]);
    assert_eq!(feed.view(), &[2, 3]);
    assert_eq!(feed.active_index(), Some(0));
    assert_eq!(feed.active_id(), Some(2));
  }

  #[test]
  fn empty_view_has_no_active_video() {
    let feed = controller(&[]);
    assert_eq!(feed.active_index(), None);
    assert_eq!(feed.active_id(), None);
  }

  #[test]
  fn advance_clamps_at_last_index() {
    let mut feed = controller(&[1, 2]);
    assert!(feed.advance());
    assert!(!feed.advance());
    assert!(!feed.advance());
    assert_eq!(feed.active_index(), Some(1));
  }

  #[test]
  fn retreat_clamps_at_zero() {
    let mut feed = controller(&[1, 2]);
    assert!(!feed.retreat());
    assert_eq!(feed.active_index(), Some(0));
    feed.advance();
    assert!(feed.retreat());
    assert!(!feed.retreat());
    assert_eq!(feed.active_index(), Some(0));
  }

  #[test]
  fn advance_on_empty_view_is_noop() {
    let mut feed = controller(&[]);
    assert!(!feed.advance());
    assert!(!feed.retreat());
  }

  #[test]
  fn navigating_away_pauses_the_left_video() {
    let mut feed = controller(&[1, 2]);
    feed.toggle_active();
    assert!(feed.is_playing(1));
    feed.advance();
    assert!(!feed.is_playing(1));
    // The newly active video is never auto-played.
    assert!(!feed.is_playing(2));
  }

  #[test]
  fn retreating_pauses_the_left_video() {
    let mut feed = controller(&[1, 2]);
    feed.advance();
    feed.toggle_active();
    assert!(feed.is_playing(2));
    feed.retreat();
    assert!(!feed.is_playing(2));
    assert!(!feed.is_playing(1));
  }

  #[test]
  fn reset_to_clamps_into_bounds() {
    let mut feed = controller(&[1, 2, 3]);
    feed.reset_to(99);
    assert_eq!(feed.active_index(), Some(2));
    feed.reset_to(1);
    assert_eq!(feed.active_index(), Some(1));
    feed.set_view(Vec::new());
    feed.reset_to(0);
    assert_eq!(feed.active_index(), None);
  }

  #[test]
  fn toggle_active_is_noop_on_empty_view() {
    let mut feed = controller(&[]);
    feed.toggle_active();
    assert!(!feed.is_playing(1));
  }
}
