//! The typeahead state aggregate and its transition function.
//!
//! [`reduce`] is the only place the aggregate changes. It takes the previous
//! state by value and returns the next one; cached lists are shared behind
//! `Arc<[SearchResult]>` so that a transition never rewrites a list another
//! reader may still hold.

use std::{
  collections::HashMap,
  fmt,
  sync::Arc,
};

use thiserror::Error;

use crate::{
  reset::{
    self,
    StatePath,
  },
  result::{
    RawResult,
    SearchResult,
    number_batch,
  },
};

/// An accumulated, numbered result list for one query.
pub type ResultList = Arc<[SearchResult]>;

/// Tri-state loading flag.
///
/// `NotStarted` means nothing has been requested yet, which consumers must be
/// able to tell apart from `Idle` (a request finished).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
  #[default]
  NotStarted,
  Loading,
  Idle,
}

impl LoadState {
  #[inline]
  pub fn is_loading(self) -> bool {
    self == Self::Loading
  }

  pub fn from_flag(loading: bool) -> Self {
    if loading { Self::Loading } else { Self::Idle }
  }
}

/// Pagination bookkeeping for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryPageInfo {
  /// Page of the most recent successful fetch (1-based).
  pub current_page: u32,
  /// `None` when the upstream total is unknown.
  pub total_pages:  Option<u32>,
}

/// Opaque record of a failed fetch, kept in `last_error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SearchError {
  message: Arc<str>,
}

impl SearchError {
  pub fn new(message: impl Into<Arc<str>>) -> Self {
    Self {
      message: message.into(),
    }
  }

  /// Captures any displayable failure.
  pub fn from_display(err: &dyn fmt::Display) -> Self {
    Self::new(err.to_string())
  }

  pub fn message(&self) -> &str {
    &self.message
  }
}

/// Root aggregate of the result cache.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeaheadState {
  pub(crate) queries:              HashMap<String, ResultList>,
  pub(crate) query_page_info:      HashMap<String, QueryPageInfo>,
  pub(crate) selected_result:      Option<SearchResult>,
  pub(crate) is_search_loading:    LoadState,
  pub(crate) is_next_page_loading: LoadState,
  pub(crate) last_error:           Option<SearchError>,
}

impl TypeaheadState {
  /// The state every store starts from and every reset copies from.
  pub fn initial() -> Self {
    Self::default()
  }

  /// Cached results for `query`. An empty list is a cached zero-hit answer,
  /// `None` means the query was never answered.
  pub fn results(&self, query: &str) -> Option<&ResultList> {
    self.queries.get(query)
  }

  pub fn queries(&self) -> impl Iterator<Item = (&str, &ResultList)> {
    self.queries.iter().map(|(query, list)| (query.as_str(), list))
  }

  pub fn page_info(&self, query: &str) -> Option<QueryPageInfo> {
    self.query_page_info.get(query).copied()
  }

  pub fn query_page_info(&self) -> &HashMap<String, QueryPageInfo> {
    &self.query_page_info
  }

  pub fn selected_result(&self) -> Option<&SearchResult> {
    self.selected_result.as_ref()
  }

  pub fn search_loading(&self) -> LoadState {
    self.is_search_loading
  }

  pub fn next_page_loading(&self) -> LoadState {
    self.is_next_page_loading
  }

  pub fn last_error(&self) -> Option<&SearchError> {
    self.last_error.as_ref()
  }
}

/// Typed events accepted by [`reduce`].
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
  BeginSearch,
  SearchSucceeded {
    query:       String,
    results:     Vec<RawResult>,
    page:        u32,
    total_pages: Option<u32>,
  },
  SearchFailed(SearchError),
  BeginNextPage,
  NextPageSucceeded {
    query:       String,
    results:     Vec<RawResult>,
    page:        u32,
    total_pages: Option<u32>,
  },
  NextPageFailed(SearchError),
  /// Explicit spinner control, used by the request coordinator around
  /// cache hits that never issue `BeginSearch`.
  SetSearchLoading(bool),
  /// The caller must already have sanitized the snippet.
  SelectResult(SearchResult),
  Reset(Vec<StatePath>),
}

impl Action {
  pub fn name(&self) -> &'static str {
    match self {
      Self::BeginSearch => "begin-search",
      Self::SearchSucceeded { .. } => "search-succeeded",
      Self::SearchFailed(_) => "search-failed",
      Self::BeginNextPage => "begin-next-page",
      Self::NextPageSucceeded { .. } => "next-page-succeeded",
      Self::NextPageFailed(_) => "next-page-failed",
      Self::SetSearchLoading(_) => "set-search-loading",
      Self::SelectResult(_) => "select-result",
      Self::Reset(_) => "reset",
    }
  }

  /// The query a transition writes to, if it is query-scoped.
  pub fn query(&self) -> Option<&str> {
    match self {
      Self::SearchSucceeded { query, .. } | Self::NextPageSucceeded { query, .. } => Some(query),
      _ => None,
    }
  }
}

/// Applies one transition.
pub fn reduce(mut state: TypeaheadState, action: Action) -> TypeaheadState {
  match action {
    Action::BeginSearch => {
      state.is_search_loading = LoadState::Loading;
      state.last_error = None;
    },
    Action::SearchSucceeded {
      query,
      results,
      page,
      total_pages,
    } => {
      state.is_search_loading = LoadState::Idle;
      let list: ResultList = number_batch(&[], results).into();
      state.queries.insert(query.clone(), list);
      state.query_page_info.insert(query, QueryPageInfo {
        current_page: page,
        total_pages,
      });
    },
    Action::SearchFailed(error) => {
      state.is_search_loading = LoadState::Idle;
      state.last_error = Some(error);
    },
    Action::BeginNextPage => {
      state.is_next_page_loading = LoadState::Loading;
    },
    Action::NextPageSucceeded {
      query,
      results,
      page,
      total_pages,
    } => {
      state.is_next_page_loading = LoadState::Idle;
      let base = state.queries.get(&query).map_or(&[][..], |list| &list[..]);
      let list: ResultList = base
        .iter()
        .cloned()
        .chain(number_batch(base, results))
        .collect();
      state.queries.insert(query.clone(), list);
      state.query_page_info.insert(query, QueryPageInfo {
        current_page: page,
        total_pages,
      });
    },
    Action::NextPageFailed(error) => {
      state.is_next_page_loading = LoadState::Idle;
      state.last_error = Some(error);
    },
    Action::SetSearchLoading(loading) => {
      state.is_search_loading = LoadState::from_flag(loading);
    },
    Action::SelectResult(result) => {
      state.selected_result = Some(result);
    },
    Action::Reset(paths) => {
      state = reset::reset_subset(state, &paths);
    },
  }
  state
}
