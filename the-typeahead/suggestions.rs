//! The visible suggestion list.
//!
//! Follows the coordinator's updates for the latest accepted query, keeps the
//! rendered window in sync with data and scroll changes, and raises a
//! load-more request when the sentinel below the last rendered row scrolls
//! into view.

use std::{
  borrow::Cow,
  sync::Arc,
};

use the_typeahead_lib::{
  SearchResult,
  TypeaheadState,
  dismiss::{
    Dropdown,
    PointerTarget,
  },
  selection::truncate_title,
  sentinel::SentinelTrigger,
  state::ResultList,
  window::{
    Viewport,
    Window,
    WindowError,
  },
};

use crate::{
  config::ListConfig,
  coordinator::{
    Origin,
    SuggestionUpdate,
  },
};

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<'a> {
  /// Position in the full list.
  pub index:   usize,
  pub sn:      u64,
  pub title:   Cow<'a, str>,
  pub snippet: &'a str,
}

#[derive(Debug)]
pub struct SuggestionList {
  viewport:        Viewport,
  sentinel:        SentinelTrigger,
  dropdown:        Dropdown,
  title_max_chars: usize,
  generation:      u64,
  query:           Option<String>,
  items:           ResultList,
  origin:          Option<Origin>,
  loading:         bool,
  scroll_top:      u64,
  window:          Window,
  load_more:       bool,
}

impl SuggestionList {
  pub fn new(config: &ListConfig) -> Result<Self, WindowError> {
    let viewport = config.viewport()?;
    Ok(Self {
      window: viewport.window(0, 0),
      viewport,
      sentinel: config.sentinel(),
      dropdown: Dropdown::default(),
      title_max_chars: config.title_max_chars,
      generation: 0,
      query: None,
      items: Vec::<SearchResult>::new().into(),
      origin: None,
      loading: false,
      scroll_top: 0,
      load_more: false,
    })
  }

  /// Applies one coordinator update. Returns `false` if it belonged to a
  /// superseded query and was ignored.
  pub fn apply(&mut self, update: SuggestionUpdate) -> bool {
    match update {
      SuggestionUpdate::Loading { generation, query } => {
        if generation < self.generation {
          log::debug!("dropping stale loading update for {query:?}");
          return false;
        }
        self.generation = generation;
        self.query = Some(query);
        self.origin = None;
        self.loading = true;
        self.dropdown.on_results(0);
        self.replace_items(Vec::<SearchResult>::new().into());
      },
      SuggestionUpdate::Ready {
        generation,
        query,
        results,
        origin,
      } => {
        if generation != self.generation {
          log::debug!("dropping stale results for {query:?}");
          return false;
        }
        self.query = Some(query);
        self.origin = Some(origin);
        self.loading = false;
        self.dropdown.on_results(results.len());
        self.replace_items(results);
      },
    }
    true
  }

  /// Picks up pages appended to the active query's list since it was
  /// delivered. The scroll position is kept.
  pub fn refresh(&mut self, state: &TypeaheadState) -> bool {
    if self.loading {
      return false;
    }
    let Some(latest) = self.query.as_deref().and_then(|query| state.results(query)) else {
      return false;
    };
    if Arc::ptr_eq(latest, &self.items) {
      return false;
    }
    self.items = latest.clone();
    self.update_window();
    true
  }

  pub fn scroll_to(&mut self, scroll_top: u64) {
    self.scroll_top = scroll_top;
    self.update_window();
  }

  /// Applies a pointer interaction. Returns `true` if it hid the list.
  pub fn pointer(&mut self, target: PointerTarget) -> bool {
    let hidden = self.dropdown.on_pointer(target);
    if hidden {
      self.sentinel.reset();
    }
    hidden
  }

  /// Whether the sentinel crossed into view since the last call.
  pub fn take_load_more(&mut self) -> bool {
    std::mem::take(&mut self.load_more)
  }

  /// The rows inside the current window.
  pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
    let start = self.window.start;
    self
      .window
      .slice(&self.items)
      .iter()
      .enumerate()
      .map(move |(i, result)| {
        Row {
          index:   start + i,
          sn:      result.sn,
          title:   truncate_title(&result.title, self.title_max_chars),
          snippet: &result.snippet,
        }
      })
  }

  pub fn find(&self, sn: u64) -> Option<&SearchResult> {
    self.items.iter().find(|result| result.sn == sn)
  }

  pub fn query(&self) -> Option<&str> {
    self.query.as_deref()
  }

  pub fn generation(&self) -> u64 {
    self.generation
  }

  pub fn items(&self) -> &ResultList {
    &self.items
  }

  pub fn window(&self) -> &Window {
    &self.window
  }

  pub fn scroll_top(&self) -> u64 {
    self.scroll_top
  }

  /// Where the delivered items came from; `None` while loading.
  pub fn origin(&self) -> Option<Origin> {
    self.origin
  }

  pub fn is_loading(&self) -> bool {
    self.loading
  }

  pub fn is_visible(&self) -> bool {
    self.dropdown.is_visible()
  }

  fn replace_items(&mut self, items: ResultList) {
    self.items = items;
    self.scroll_top = 0;
    self.sentinel.reset();
    self.update_window();
  }

  /// Scroll extent: all rows plus the sentinel.
  fn max_scroll(&self) -> u64 {
    (self.viewport.content_height(self.items.len()) + u64::from(self.sentinel.height()))
      .saturating_sub(u64::from(self.viewport.viewport_height()))
  }

  fn update_window(&mut self) {
    self.scroll_top = self.scroll_top.min(self.max_scroll());
    self.window = self.viewport.window(self.items.len(), self.scroll_top);

    // The sentinel is only rendered along with a visible, non-empty list.
    if self.items.is_empty() || !self.dropdown.is_visible() {
      self.sentinel.reset();
      return;
    }
    if self
      .sentinel
      .poll(&self.viewport, &self.window, self.scroll_top)
    {
      self.load_more = true;
    }
  }
}
