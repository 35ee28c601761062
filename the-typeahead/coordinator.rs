//! Request coordination: keystrokes in, at most one live fetch out.
//!
//! Input values are trimmed, debounced and compared with the last accepted
//! query. An accepted query is answered from the cache when possible; only a
//! cache miss reaches the fetcher. Each accepted query gets a new task
//! generation, and a fetch that completes after a newer query was accepted
//! still writes its answer to the cache but is not delivered.

use std::{
  sync::Arc,
  time::Duration,
};

use the_typeahead_event::{
  AsyncHook,
  TaskController,
  TaskHandle,
};
use the_typeahead_lib::{
  Action,
  SearchError,
  SearchResult,
  state::ResultList,
};
use tokio::{
  sync::mpsc::UnboundedSender,
  time::Instant,
};

use crate::{
  config::SearchConfig,
  fetch::Fetcher,
  handle::StoreHandle,
};


#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryEvent {
  /// The raw value of the input after a keystroke.
  Input(String),
  /// Drops the pending input and stops delivering the current query.
  Cancel,
}

/// Where a delivered list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
  EmptyQuery,
  Cache,
  /// Fetched just now. An empty list may also mean the upstream answer was
  /// unusable.
  Network,
  /// The fetch failed; whatever the cache holds (usually nothing) is
  /// delivered.
  Failed,
}

/// What the coordinator tells the suggestion list.
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestionUpdate {
  /// A query was accepted. Prior suggestions are obsolete.
  Loading { generation: u64, query: String },
  /// The terminal state of an accepted query.
  Ready {
    generation: u64,
    query:      String,
    results:    ResultList,
    origin:     Origin,
  },
}

impl SuggestionUpdate {
  pub fn generation(&self) -> u64 {
    match self {
      Self::Loading { generation, .. } | Self::Ready { generation, .. } => *generation,
    }
  }

  pub fn query(&self) -> &str {
    match self {
      Self::Loading { query, .. } | Self::Ready { query, .. } => query,
    }
  }
}

/// Delivery side shared by the hook and its fetch tasks.
#[derive(Debug, Clone)]
struct Deliver {
  store:   StoreHandle,
  updates: UnboundedSender<SuggestionUpdate>,
}

impl Deliver {
  fn send(&self, update: SuggestionUpdate) {
    if self.updates.send(update).is_err() {
      log::debug!("suggestion receiver dropped");
    }
  }

  /// Ends `handle`'s query. Nothing happens once a newer query was accepted,
  /// so its spinner stays on.
  fn ready(&self, handle: &TaskHandle, query: String, results: ResultList, origin: Origin) {
    let current = self.store.transact(|store| {
      // Checked under the store lock: a newer query restarts the controller
      // before it turns loading on.
      if handle.is_canceled() {
        return false;
      }
      store.dispatch(Action::SetSearchLoading(false));
      true
    });
    if !current {
      log::debug!(
        "ignoring superseded result for {query:?} (generation {})",
        handle.generation()
      );
      return;
    }
    self.send(SuggestionUpdate::Ready {
      generation: handle.generation(),
      query,
      results,
      origin,
    });
  }

  fn cached(&self, query: &str) -> Option<ResultList> {
    self.store.read(|state| state.results(query).cloned())
  }
}

pub struct RequestCoordinator {
  deliver:      Deliver,
  fetcher:      Arc<dyn Fetcher>,
  debounce:     Duration,
  page_size:    u32,
  pending:      Option<String>,
  last_emitted: Option<String>,
  controller:   TaskController,
}

impl RequestCoordinator {
  pub fn new(
    store: StoreHandle,
    fetcher: Arc<dyn Fetcher>,
    config: &SearchConfig,
    updates: UnboundedSender<SuggestionUpdate>,
  ) -> Self {
    Self {
      deliver: Deliver { store, updates },
      fetcher,
      debounce: config.debounce(),
      page_size: config.page_size,
      pending: None,
      last_emitted: None,
      controller: TaskController::new(),
    }
  }

  fn accept(&mut self, query: String) {
    let handle = self.controller.restart();
    let generation = handle.generation();
    log::debug!("accepted query {query:?} (generation {generation})");

    self.deliver.store.dispatch(Action::SetSearchLoading(true));
    self.deliver.send(SuggestionUpdate::Loading {
      generation,
      query: query.clone(),
    });

    if query.is_empty() {
      self
        .deliver
        .ready(&handle, query, no_results(), Origin::EmptyQuery);
      return;
    }

    if let Some(results) = self.deliver.cached(&query) {
      log::debug!("cache hit for {query:?} ({} results)", results.len());
      self.deliver.ready(&handle, query, results, Origin::Cache);
      return;
    }

    self.deliver.store.dispatch(Action::BeginSearch);
    tokio::spawn(fetch_first_page(
      self.deliver.clone(),
      self.fetcher.clone(),
      query,
      self.page_size,
      handle,
    ));
  }
}

impl AsyncHook for RequestCoordinator {
  type Event = QueryEvent;

  fn handle_event(&mut self, event: Self::Event, _timeout: Option<Instant>) -> Option<Instant> {
    match event {
      QueryEvent::Input(value) => {
        self.pending = Some(value.trim().to_owned());
        Some(Instant::now() + self.debounce)
      },
      QueryEvent::Cancel => {
        self.pending = None;
        self.last_emitted = None;
        self.controller.cancel();
        None
      },
    }
  }

  fn finish_debounce(&mut self) {
    let Some(query) = self.pending.take() else {
      return;
    };
    if self.last_emitted.as_deref() == Some(query.as_str()) {
      log::trace!("query {query:?} unchanged");
      return;
    }
    self.last_emitted = Some(query.clone());
    self.accept(query);
  }

  fn on_close(&mut self) {
    self.controller.cancel();
  }
}

fn no_results() -> ResultList {
  Vec::<SearchResult>::new().into()
}

async fn fetch_first_page(
  deliver: Deliver,
  fetcher: Arc<dyn Fetcher>,
  query: String,
  page_size: u32,
  handle: TaskHandle,
) {
  let origin = match fetcher.fetch(&query, 1, page_size).await {
    Ok(page) => {
      deliver.store.dispatch(Action::SearchSucceeded {
        query:       query.clone(),
        results:     page.results,
        page:        1,
        total_pages: page.total_pages,
      });
      Origin::Network
    },
    Err(err) => {
      log::error!("search for {query:?} failed: {err}");
      deliver
        .store
        .dispatch(Action::SearchFailed(SearchError::from_display(&err)));
      Origin::Failed
    },
  };

  let results = deliver.cached(&query).unwrap_or_else(no_results);
  deliver.ready(&handle, query, results, origin);
}
