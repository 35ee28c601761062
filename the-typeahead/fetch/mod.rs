//! The fetch collaborator: one page of results for a query.

mod memory;
mod wikipedia;

use async_trait::async_trait;
use the_typeahead_lib::RawResult;
use thiserror::Error;

pub use self::{
  memory::{
    FetchCall,
    MemoryFetcher,
  },
  wikipedia::{
    WikipediaFetcher,
    parse_envelope,
  },
};

/// One page of upstream results, not yet numbered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
  pub results:     Vec<RawResult>,
  /// `None` when the upstream did not report a total.
  pub total_pages: Option<u32>,
}

impl Page {
  /// What a response without a usable result envelope turns into.
  pub fn malformed() -> Self {
    Self {
      results:     Vec::new(),
      total_pages: Some(0),
    }
  }
}

/// Failures that do not produce a page at all.
///
/// A response that arrives but cannot be decoded is not an error, see
/// [`Page::malformed`].
#[derive(Debug, Error)]
pub enum FetchError {
  #[error("invalid search endpoint: {0}")]
  InvalidEndpoint(#[from] url::ParseError),
  #[error("search request failed: {0}")]
  Transport(#[from] reqwest::Error),
  #[error("search service responded with {0}")]
  Status(reqwest::StatusCode),
  #[error("search service unavailable: {0}")]
  Unavailable(String),
}

pub type Result<T, E = FetchError> = std::result::Result<T, E>;

#[async_trait]
pub trait Fetcher: Send + Sync + 'static {
  /// Fetches 1-based `page` of `query`, `page_size` results per page.
  async fn fetch(&self, query: &str, page: u32, page_size: u32) -> Result<Page>;
}

/// `ceil(total_hits / page_size)`, saturating at `u32::MAX`.
pub fn total_pages(total_hits: u64, page_size: u32) -> u32 {
  let pages = total_hits.div_ceil(u64::from(page_size.max(1)));
  u32::try_from(pages).unwrap_or(u32::MAX)
}

/// 0-based offset of the first result on 1-based `page`.
pub fn page_offset(page: u32, page_size: u32) -> u64 {
  u64::from(page.saturating_sub(1)) * u64::from(page_size)
}
