//! Search results and serial-number assignment.

use serde::{
  Deserialize,
  Serialize,
};

/// A result as delivered by the fetch collaborator, before the cache has
/// numbered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawResult {
  pub title:   String,
  /// Upstream HTML fragment. Only sanitized when a result is selected.
  pub snippet: String,
  #[serde(rename = "pageid")]
  pub page_id: u64,
}

impl RawResult {
  pub fn new(title: impl Into<String>, snippet: impl Into<String>, page_id: u64) -> Self {
    Self {
      title: title.into(),
      snippet: snippet.into(),
      page_id,
    }
  }
}

/// A cached result with its per-query serial number.
///
/// `sn` is dense and 1-based within one query's list. It is a render identity
/// only; results from different queries can share serial numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
  pub sn:      u64,
  pub title:   String,
  pub snippet: String,
  #[serde(rename = "pageid")]
  pub page_id: u64,
}

impl SearchResult {
  pub fn numbered(raw: RawResult, sn: u64) -> Self {
    Self {
      sn,
      title: raw.title,
      snippet: raw.snippet,
      page_id: raw.page_id,
    }
  }
}

/// Serial number the next appended result receives after `base`.
#[inline]
pub fn next_serial(base: &[SearchResult]) -> u64 {
  base.last().map_or(1, |last| last.sn + 1)
}

/// Numbers `batch` so that it continues `base`.
///
/// Element `i` of the batch receives `next_serial(base) + i`. A fresh search
/// passes an empty base and therefore restarts at 1.
pub fn number_batch(base: &[SearchResult], batch: Vec<RawResult>) -> Vec<SearchResult> {
  let start = next_serial(base);
  batch
    .into_iter()
    .zip(start..)
    .map(|(raw, sn)| SearchResult::numbered(raw, sn))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn raw(title: &str) -> RawResult {
    RawResult::new(title, "", 0)
  }

  #[test]
  fn empty_base_starts_at_one() {
    let numbered = number_batch(&[], vec![raw("a"), raw("b")]);
    let serials: Vec<_> = numbered.iter().map(|r| r.sn).collect();
    assert_eq!(serials, [1, 2]);
  }

  #[test]
  fn continues_from_last_entry() {
    let base = number_batch(&[], vec![raw("a"), raw("b")]);
    let next = number_batch(&base, vec![raw("c")]);
    assert_eq!(next[0].sn, 3);
    assert_eq!(next[0].title, "c");
  }

  #[test]
  fn empty_batch_yields_nothing() {
    let base = number_batch(&[], vec![raw("a")]);
    assert!(number_batch(&base, Vec::new()).is_empty());
  }

  #[test]
  fn deserializes_upstream_shape() {
    let raw: RawResult = serde_json::from_str(
      r#"{"ns":0,"title":"Rust","pageid":42,"snippet":"<span>Rust</span> lang","wordcount":3}"#,
    )
    .unwrap();
    assert_eq!(raw, RawResult::new("Rust", "<span>Rust</span> lang", 42));
  }
}
