use crate::catalog::{VideoCatalog, VideoId, VideoRecord};

// --- Search filtering ---

/// Check whether a record matches the given query.
/// Matches case-insensitively against title, description, creator name, and
/// any topic's title or content.
pub fn matches_query(record: &VideoRecord, query: &str) -> bool {
  if query.trim().is_empty() {
    return true;
  }
  let needle = query.to_lowercase();
  if record.title.to_lowercase().contains(&needle) {
    return true;
  }
  if record.description.to_lowercase().contains(&needle) {
    return true;
  }
  if record.user.name.to_lowercase().contains(&needle) {
    return true;
  }
  record
    .topics
    .iter()
    .any(|t| t.title.to_lowercase().contains(&needle) || t.content.to_lowercase().contains(&needle))
}

/// Compute the filtered view of the catalog for the given query.
///
/// Pure: returns the ids of matching records in catalog order. An empty or
/// whitespace-only query yields the identity view. The result always
/// replaces the previous view wholesale — there is no incremental patching.
pub fn filter_catalog(catalog: &VideoCatalog, query: &str) -> Vec<VideoId> {
  catalog.records().iter().filter(|r| matches_query(r, query)).map(|r| r.id).collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::{Counter, Creator, Topic, VideoCatalog, VideoRecord};

  fn make_record(id: u64, title: &str, description: &str, creator: &str, topic: Option<(&str, &str)>) -> VideoRecord {
    VideoRecord {
      id,
      title: title.to_string(),
      description: description.to_string(),
      upload_date: "2023-10-15".to_string(),
      user: Creator {
        name: creator.to_string(),
        profile_pic: String::new(),
        university: String::new(),
        department: String::new(),
        followers: Counter::Count(0),
        videos: 0,
      },
      video_url: String::new(),
      likes: Counter::Count(0),
      shares: Counter::Count(0),
      topics: topic.map(|(t, c)| vec![Topic { title: t.to_string(), content: c.to_string() }]).unwrap_or_default(),
      is_uploaded: false,
    }
  }

  fn sample_catalog() -> VideoCatalog {
    VideoCatalog::from_records(vec![
      make_record(1, "Intro to Machine Learning", "basics of ML", "Dr. Sarah Johnson", Some(("QA", "about LPPs"))),
      make_record(2, "Deep Learning Fundamentals", "neural networks", "Prof. Michael Chen", Some(("Neural Networks", "ANN basics"))),
      make_record(3, "Organic Chemistry", "carbon compounds", "Dr. Emily Park", None),
    ])
  }

  #[test]
  fn empty_query_is_identity() {
    let catalog = sample_catalog();
    assert_eq!(filter_catalog(&catalog, ""), vec![1, 2, 3]);
    assert_eq!(filter_catalog(&catalog, "   "), vec![1, 2, 3]);
  }

  #[test]
  fn matches_title_case_insensitive() {
    let catalog = sample_catalog();
    assert_eq!(filter_catalog(&catalog, "LEARNING"), vec![1, 2]);
  }

  #[test]
  fn matches_description() {
    let catalog = sample_catalog();
    assert_eq!(filter_catalog(&catalog, "carbon"), vec![3]);
  }

  #[test]
  fn matches_creator_name() {
    let catalog = sample_catalog();
    assert_eq!(filter_catalog(&catalog, "chen"), vec![2]);
  }

  #[test]
  fn matches_topic_title_and_content() {
    let catalog = sample_catalog();
    assert_eq!(filter_catalog(&catalog, "neural networks"), vec![2]);
    assert_eq!(filter_catalog(&catalog, "lpp"), vec![1]);
  }

  #[test]
  fn no_match_yields_empty_view() {
    let catalog = sample_catalog();
    assert!(filter_catalog(&catalog, "astrophysics").is_empty());
  }

  #[test]
  fn preserves_catalog_order() {
    let catalog = sample_catalog();
    // "dr." matches records 1 and 3; relative order must be catalog order.
    assert_eq!(filter_catalog(&catalog, "dr."), vec![1, 3]);
  }
}
