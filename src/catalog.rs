use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Stable identifier of a video record. Assigned once, never reused.
pub type VideoId = u64;

/// A display counter that is either a raw count or a pre-abbreviated label
/// ("2.4K"). Rendered as provided; raw counts go through [`format_count`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Counter {
  Count(u64),
  Label(String),
}

impl Counter {
  pub fn display(&self) -> String {
    match self {
      Counter::Count(n) => format_count(*n),
      Counter::Label(s) => s.clone(),
    }
  }
}

/// Abbreviate a raw count for display: 2400 → "2.4K", 356 → "356".
pub fn format_count(n: u64) -> String {
  match n {
    0..=999 => n.to_string(),
    1_000..=999_999 => trim_decimal(n as f64 / 1_000.0, "K"),
    _ => trim_decimal(n as f64 / 1_000_000.0, "M"),
  }
}

fn trim_decimal(value: f64, suffix: &str) -> String {
  let s = format!("{:.1}", value);
  let s = s.strip_suffix(".0").unwrap_or(&s);
  format!("{}{}", s, suffix)
}

/// Creator profile embedded in a record — read-only display data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
  pub name: String,
  pub profile_pic: String,
  pub university: String,
  pub department: String,
  pub followers: Counter,
  pub videos: u64,
}

/// Static supplementary content shown alongside a video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
  pub title: String,
  pub content: String,
}

/// One playable item in the feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
  pub id: VideoId,
  pub title: String,
  pub description: String,
  pub upload_date: String,
  pub user: Creator,
  pub video_url: String,
  pub likes: Counter,
  pub shares: Counter,
  pub topics: Vec<Topic>,
  #[serde(default)]
  pub is_uploaded: bool,
}

impl VideoRecord {
  /// Upload date formatted for display ("Oct 15, 2023"), falling back to the
  /// raw string when it isn't a `%Y-%m-%d` date.
  pub fn display_date(&self) -> String {
    chrono::NaiveDate::parse_from_str(&self.upload_date, "%Y-%m-%d")
      .map(|d| d.format("%b %-d, %Y").to_string())
      .unwrap_or_else(|_| self.upload_date.clone())
  }
}

/// The canonical ordered collection of video records.
///
/// Insertion order is meaningful: uploads are prepended so the newest
/// user-originated entry sits at the head. Ids are allocated from a
/// monotonic counter seeded past the largest seed id, so rapid consecutive
/// uploads can never collide.
pub struct VideoCatalog {
  records: Vec<VideoRecord>,
  next_id: VideoId,
}

impl VideoCatalog {
  pub fn from_records(records: Vec<VideoRecord>) -> Self {
    let next_id = records.iter().map(|r| r.id).max().map_or(1, |m| m + 1);
    Self { records, next_id }
  }

  /// The built-in seed catalog, embedded at compile time.
  pub fn seed() -> Result<Self> {
    let records: Vec<VideoRecord> =
      serde_json::from_str(include_str!("../catalog.json")).context("Embedded catalog.json is malformed")?;
    Ok(Self::from_records(records))
  }

  /// Load a catalog from a user-supplied JSON file (the `--catalog` flag).
  pub fn load_from_path(path: &Path) -> Result<Self> {
    let content =
      std::fs::read_to_string(path).with_context(|| format!("Failed to read catalog file {}", path.display()))?;
    let records: Vec<VideoRecord> =
      serde_json::from_str(&content).with_context(|| format!("Invalid catalog JSON in {}", path.display()))?;
    Ok(Self::from_records(records))
  }

  pub fn records(&self) -> &[VideoRecord] {
    &self.records
  }

  pub fn get(&self, id: VideoId) -> Option<&VideoRecord> {
    self.records.iter().find(|r| r.id == id)
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  /// Hand out the next unique id.
  pub fn allocate_id(&mut self) -> VideoId {
    let id = self.next_id;
    self.next_id += 1;
    id
  }

  /// Insert a record at the head of the catalog (newest first).
  pub fn prepend(&mut self, record: VideoRecord) {
    debug_assert!(self.get(record.id).is_none(), "catalog ids must stay unique");
    self.records.insert(0, record);
  }
}
