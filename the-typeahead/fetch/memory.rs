use std::{
  sync::atomic::{
    AtomicBool,
    Ordering,
  },
  time::Duration,
};

use async_trait::async_trait;
use parking_lot::Mutex;
use the_typeahead_lib::RawResult;

use super::{
  FetchError,
  Fetcher,
  Page,
  Result,
  page_offset,
  total_pages,
};

/// A request seen by a [`MemoryFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCall {
  pub query: String,
  pub page:  u32,
}

/// Serves pages out of an in-memory corpus.
///
/// A result matches when its title or snippet contains the query, ignoring
/// ASCII case. Used for offline runs and as the network stand-in in tests.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
  corpus:    Vec<RawResult>,
  latency:   Duration,
  failure:   Mutex<Option<String>>,
  malformed: AtomicBool,
  calls:     Mutex<Vec<FetchCall>>,
}

impl MemoryFetcher {
  pub fn new(corpus: Vec<RawResult>) -> Self {
    Self {
      corpus,
      ..Self::default()
    }
  }

  /// A small built-in corpus with enough matches per topic to paginate.
  pub fn demo() -> Self {
    const TOPICS: [(&str, &str); 6] = [
      ("Rust", "systems programming language"),
      ("Angular", "web application framework"),
      ("Tokio", "asynchronous runtime"),
      ("Wikipedia", "free online encyclopedia"),
      ("Typeahead", "search as you type"),
      ("Virtual scrolling", "rendering only visible rows"),
    ];
    let corpus = TOPICS
      .iter()
      .flat_map(|(title, blurb)| {
        (1..=150).map(move |n| {
          let snippet = format!("<b>{title}</b>: {blurb} &amp; more, part {n}");
          (format!("{title} ({n})"), snippet)
        })
      })
      .zip(1..)
      .map(|((title, snippet), page_id)| RawResult::new(title, snippet, page_id))
      .collect();
    Self::new(corpus)
  }

  /// Every fetch sleeps for `latency` before answering.
  pub fn with_latency(mut self, latency: Duration) -> Self {
    self.latency = latency;
    self
  }

  /// Makes every following fetch fail with `message`, or succeed again.
  pub fn set_failure(&self, message: Option<&str>) {
    *self.failure.lock() = message.map(str::to_owned);
  }

  /// Answers like an upstream whose response has no usable result list.
  pub fn set_malformed(&self, malformed: bool) {
    self.malformed.store(malformed, Ordering::Relaxed);
  }

  /// Requests received so far, in order.
  pub fn calls(&self) -> Vec<FetchCall> {
    self.calls.lock().clone()
  }

  fn matches(&self, query: &str) -> Vec<&RawResult> {
    let needle = query.to_ascii_lowercase();
    self
      .corpus
      .iter()
      .filter(|result| {
        result.title.to_ascii_lowercase().contains(&needle)
          || result.snippet.to_ascii_lowercase().contains(&needle)
      })
      .collect()
  }
}

#[async_trait]
impl Fetcher for MemoryFetcher {
  async fn fetch(&self, query: &str, page: u32, page_size: u32) -> Result<Page> {
    self.calls.lock().push(FetchCall {
      query: query.to_owned(),
      page,
    });
    if !self.latency.is_zero() {
      tokio::time::sleep(self.latency).await;
    }
    let failure = self.failure.lock().clone();
    if let Some(message) = failure {
      return Err(FetchError::Unavailable(message));
    }
    if self.malformed.load(Ordering::Relaxed) {
      log::error!("search response has no result list");
      return Ok(Page::malformed());
    }

    let matches = self.matches(query);
    let offset = usize::try_from(page_offset(page, page_size)).unwrap_or(usize::MAX);
    let results = matches
      .iter()
      .skip(offset)
      .take(page_size as usize)
      .map(|result| (*result).clone())
      .collect();
    Ok(Page {
      results,
      total_pages: Some(total_pages(matches.len() as u64, page_size)),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn corpus() -> Vec<RawResult> {
    (1..=5)
      .map(|n| RawResult::new(format!("Item {n}"), format!("snippet {n}"), n))
      .collect()
  }

  #[tokio::test]
  async fn pages_through_matches() {
    let fetcher = MemoryFetcher::new(corpus());
    let first = fetcher.fetch("item", 1, 2).await.unwrap();
    let last = fetcher.fetch("item", 3, 2).await.unwrap();
    assert_eq!(first.total_pages, Some(3));
    assert_eq!(first.results.len(), 2);
    assert_eq!(last.results, [RawResult::new("Item 5", "snippet 5", 5)]);
    assert_eq!(fetcher.calls(), [
      FetchCall {
        query: "item".into(),
        page:  1,
      },
      FetchCall {
        query: "item".into(),
        page:  3,
      },
    ]);
  }

  #[tokio::test]
  async fn no_matches_is_an_empty_answer() {
    let fetcher = MemoryFetcher::new(corpus());
    let page = fetcher.fetch("zzzz", 1, 10).await.unwrap();
    assert!(page.results.is_empty());
    assert_eq!(page.total_pages, Some(0));
  }

  #[tokio::test]
  async fn injected_failure() {
    let fetcher = MemoryFetcher::new(corpus());
    fetcher.set_failure(Some("offline"));
    assert!(matches!(
      fetcher.fetch("item", 1, 10).await,
      Err(FetchError::Unavailable(message)) if message == "offline"
    ));
    fetcher.set_failure(None);
    assert!(fetcher.fetch("item", 1, 10).await.is_ok());
  }

  #[tokio::test]
  async fn malformed_answer() {
    let fetcher = MemoryFetcher::new(corpus());
    fetcher.set_malformed(true);
    let page = fetcher.fetch("item", 1, 10).await.unwrap();
    assert_eq!(page, Page::malformed());
  }

  #[test]
  fn demo_corpus_paginates() {
    let fetcher = MemoryFetcher::demo();
    assert_eq!(fetcher.matches("rust").len(), 150);
  }
}
