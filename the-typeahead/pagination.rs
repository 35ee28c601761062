//! Loading further pages of the active query.

use std::sync::Arc;

use the_typeahead_lib::{
  Action,
  SearchError,
  pagination::{
    NextPage,
    next_page_gated,
  },
};
use tokio::task::JoinHandle;

use crate::{
  fetch::Fetcher,
  handle::StoreHandle,
};

/// What a [`PaginationAdvancer::load_next`] call did.
#[derive(Debug)]
pub enum Advance {
  /// A fetch for `page` was started.
  Requested { page: u32, task: JoinHandle<()> },
  /// The last known page is already loaded. Nothing was fetched.
  Exhausted { current_page: u32, total_pages: u32 },
  /// A next-page fetch is already outstanding.
  InFlight,
  /// There is no query to page through.
  NoQuery,
}

impl Advance {
  pub fn is_requested(&self) -> bool {
    matches!(self, Self::Requested { .. })
  }
}

#[derive(Clone)]
pub struct PaginationAdvancer {
  store:     StoreHandle,
  fetcher:   Arc<dyn Fetcher>,
  page_size: u32,
}

impl PaginationAdvancer {
  pub fn new(store: StoreHandle, fetcher: Arc<dyn Fetcher>, page_size: u32) -> Self {
    Self {
      store,
      fetcher,
      page_size,
    }
  }

  /// Requests the page after the last loaded one for `query`, if there is
  /// one and no next-page fetch is already running.
  ///
  /// Must be called from within a tokio runtime.
  pub fn load_next(&self, query: &str) -> Advance {
    let query = query.trim();
    if query.is_empty() {
      return Advance::NoQuery;
    }

    let decision = self.store.transact(|store| {
      let state = store.state();
      let decision = next_page_gated(state.page_info(query), state.next_page_loading());
      if let NextPage::Fetch { .. } = decision {
        store.dispatch(Action::BeginNextPage);
      }
      decision
    });

    match decision {
      NextPage::Fetch { page } => {
        log::debug!("loading page {page} of {query:?}");
        let task = tokio::spawn(fetch_page(
          self.store.clone(),
          self.fetcher.clone(),
          query.to_owned(),
          page,
          self.page_size,
        ));
        Advance::Requested { page, task }
      },
      NextPage::Exhausted {
        current_page,
        total_pages,
      } => {
        log::warn!("no more pages for {query:?} ({current_page} of {total_pages} loaded)");
        Advance::Exhausted {
          current_page,
          total_pages,
        }
      },
      NextPage::InFlight => {
        log::debug!("next page of {query:?} already loading");
        Advance::InFlight
      },
    }
  }
}

async fn fetch_page(
  store: StoreHandle,
  fetcher: Arc<dyn Fetcher>,
  query: String,
  page: u32,
  page_size: u32,
) {
  match fetcher.fetch(&query, page, page_size).await {
    Ok(result) => {
      store.dispatch(Action::NextPageSucceeded {
        query,
        results: result.results,
        page,
        total_pages: result.total_pages,
      });
    },
    Err(err) => {
      log::error!("loading page {page} of {query:?} failed: {err}");
      store.dispatch(Action::NextPageFailed(SearchError::from_display(&err)));
    },
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use the_typeahead_lib::{
    LoadState,
    QueryPageInfo,
    RawResult,
  };

  use super::*;
  use crate::fetch::{
    FetchCall,
    MemoryFetcher,
  };

  fn corpus(n: u64) -> Vec<RawResult> {
    (1..=n)
      .map(|id| RawResult::new(format!("Rust {id}"), "", id))
      .collect()
  }

  fn first_page(store: &StoreHandle, results: Vec<RawResult>, total_pages: Option<u32>) {
    store.dispatch(Action::SearchSucceeded {
      query: "rust".into(),
      results,
      page: 1,
      total_pages,
    });
  }

  fn setup(fetcher: MemoryFetcher) -> (StoreHandle, Arc<MemoryFetcher>, PaginationAdvancer) {
    let store = StoreHandle::default();
    let fetcher = Arc::new(fetcher);
    let advancer = PaginationAdvancer::new(store.clone(), fetcher.clone(), 2);
    (store, fetcher, advancer)
  }

  #[tokio::test]
  async fn appends_the_next_page() {
    let (store, fetcher, advancer) = setup(MemoryFetcher::new(corpus(5)));
    first_page(&store, corpus(2), Some(3));

    let Advance::Requested { page, task } = advancer.load_next(" rust ") else {
      panic!("expected a request");
    };
    assert_eq!(page, 2);
    task.await.unwrap();

    store.read(|state| {
      let serials: Vec<_> = state.results("rust").unwrap().iter().map(|r| r.sn).collect();
      assert_eq!(serials, [1, 2, 3, 4]);
      assert_eq!(
        state.page_info("rust"),
        Some(QueryPageInfo {
          current_page: 2,
          total_pages:  Some(3),
        })
      );
      assert_eq!(state.next_page_loading(), LoadState::Idle);
    });
    assert_eq!(fetcher.calls(), [FetchCall {
      query: "rust".into(),
      page:  2,
    }]);
  }

  #[tokio::test]
  async fn stops_at_the_last_page() {
    let (store, fetcher, advancer) = setup(MemoryFetcher::new(corpus(2)));
    first_page(&store, corpus(2), Some(1));

    assert!(matches!(advancer.load_next("rust"), Advance::Exhausted {
      current_page: 1,
      total_pages:  1,
    }));
    assert!(fetcher.calls().is_empty());
    assert_eq!(store.read(|s| s.next_page_loading()), LoadState::NotStarted);
  }

  #[tokio::test]
  async fn unknown_query_starts_at_page_two() {
    let (_, _, advancer) = setup(MemoryFetcher::new(corpus(5)));
    let advance = advancer.load_next("rust");
    assert!(matches!(advance, Advance::Requested { page: 2, .. }));
  }

  #[tokio::test(start_paused = true)]
  async fn one_fetch_at_a_time() {
    let (store, fetcher, advancer) =
      setup(MemoryFetcher::new(corpus(10)).with_latency(Duration::from_secs(1)));
    first_page(&store, corpus(2), None);

    let Advance::Requested { task, .. } = advancer.load_next("rust") else {
      panic!("expected a request");
    };
    assert!(matches!(advancer.load_next("rust"), Advance::InFlight));
    task.await.unwrap();

    let Advance::Requested { page, task } = advancer.load_next("rust") else {
      panic!("expected a second request");
    };
    assert_eq!(page, 3);
    task.await.unwrap();
    assert_eq!(fetcher.calls().len(), 2);
    assert_eq!(store.read(|s| s.results("rust").unwrap().len()), 6);
  }

  #[tokio::test]
  async fn failure_keeps_cache_and_records_error() {
    let (store, fetcher, advancer) = setup(MemoryFetcher::new(corpus(5)));
    first_page(&store, corpus(2), Some(3));
    fetcher.set_failure(Some("timeout"));

    let Advance::Requested { task, .. } = advancer.load_next("rust") else {
      panic!("expected a request");
    };
    task.await.unwrap();

    store.read(|state| {
      assert_eq!(state.results("rust").unwrap().len(), 2);
      assert_eq!(state.page_info("rust").unwrap().current_page, 1);
      assert_eq!(state.next_page_loading(), LoadState::Idle);
      assert!(state.last_error().is_some());
    });
  }

  #[test]
  fn empty_query_is_ignored() {
    let (_, _, advancer) = setup(MemoryFetcher::default());
    assert!(matches!(advancer.load_next("  "), Advance::NoQuery));
  }
}
