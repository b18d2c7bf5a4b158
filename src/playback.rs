use std::collections::HashMap;

use crate::catalog::VideoId;

/// Per-video playback flags.
///
/// Entries are created lazily the first time a video is touched and persist
/// for the process lifetime. The store itself doesn't enforce the
/// single-playing-video policy — [`crate::feed::FeedController`] does, by
/// pausing everything but the newly active video on every index change.
#[derive(Debug, Default)]
pub struct PlaybackStateStore {
  states: HashMap<VideoId, bool>,
}

impl PlaybackStateStore {
  /// Whether the given video is playing. Unknown ids default to paused.
  pub fn get(&self, id: VideoId) -> bool {
    self.states.get(&id).copied().unwrap_or(false)
  }

  /// Flip the flag for `id`, creating the entry if absent.
  pub fn toggle(&mut self, id: VideoId) {
    let flag = self.states.entry(id).or_insert(false);
    *flag = !*flag;
  }

  /// Pause every video except `id`. The exempted video's flag is untouched.
  pub fn set_false_except(&mut self, id: VideoId) {
    for (key, flag) in self.states.iter_mut() {
      if *key != id {
        *flag = false;
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unknown_ids_default_to_paused() {
    let store = PlaybackStateStore::default();
    assert!(!store.get(42));
  }

  #[test]
  fn toggle_creates_and_flips() {
    let mut store = PlaybackStateStore::default();
    store.toggle(1);
    assert!(store.get(1));
    store.toggle(1);
    assert!(!store.get(1));
  }

  #[test]
  fn set_false_except_spares_only_the_given_id() {
    let mut store = PlaybackStateStore::default();
    store.toggle(1);
    store.toggle(2);
    store.toggle(3);
    store.set_false_except(2);
    assert!(!store.get(1));
    assert!(store.get(2));
    assert!(!store.get(3));
  }
}
