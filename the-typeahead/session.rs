//! One typeahead widget: input box, suggestion list and selection, wired to
//! a shared store.

use std::sync::Arc;

use the_typeahead_event::{
  AsyncHook,
  send_blocking,
};
use the_typeahead_lib::{
  Action,
  SearchResult,
  TypeaheadState,
  dismiss::PointerTarget,
  reset::{
    StatePath,
    resolve_paths,
  },
  selection::prepare_selection,
  window::WindowError,
};
use tokio::sync::{
  mpsc,
  watch,
};

use crate::{
  config::Config,
  coordinator::{
    QueryEvent,
    RequestCoordinator,
    SuggestionUpdate,
  },
  fetch::Fetcher,
  handle::StoreHandle,
  pagination::{
    Advance,
    PaginationAdvancer,
  },
  suggestions::SuggestionList,
};

pub struct Typeahead {
  store:     StoreHandle,
  input:     mpsc::Sender<QueryEvent>,
  updates:   mpsc::UnboundedReceiver<SuggestionUpdate>,
  revisions: watch::Receiver<u64>,
  advancer:  PaginationAdvancer,
  list:      SuggestionList,
}

impl Typeahead {
  /// Creates a session with its own store.
  ///
  /// Must be called from within a tokio runtime; the request coordinator is
  /// spawned onto it.
  pub fn new(config: &Config, fetcher: Arc<dyn Fetcher>) -> Result<Self, WindowError> {
    Self::with_store(config, fetcher, StoreHandle::default())
  }

  pub fn with_store(
    config: &Config,
    fetcher: Arc<dyn Fetcher>,
    store: StoreHandle,
  ) -> Result<Self, WindowError> {
    let list = SuggestionList::new(&config.list)?;
    let (tx, updates) = mpsc::unbounded_channel();
    let input =
      RequestCoordinator::new(store.clone(), fetcher.clone(), &config.search, tx).spawn();
    Ok(Self {
      revisions: store.subscribe(),
      advancer: PaginationAdvancer::new(store.clone(), fetcher, config.search.page_size),
      store,
      input,
      updates,
      list,
    })
  }

  /// Feeds the current value of the input box.
  pub fn input(&self, value: &str) {
    send_blocking(&self.input, QueryEvent::Input(value.to_owned()));
  }

  /// Drops pending input and stops waiting for the current query.
  pub fn cancel(&self) {
    send_blocking(&self.input, QueryEvent::Cancel);
  }

  /// Applies every pending change without waiting. Returns whether the list
  /// changed.
  pub fn pump(&mut self) -> bool {
    let mut changed = false;
    while let Ok(update) = self.updates.try_recv() {
      changed |= self.list.apply(update);
    }
    if self.revisions.has_changed().unwrap_or(false) {
      self.revisions.borrow_and_update();
      changed |= self.refresh();
    }
    self.poll_load_more();
    changed
  }

  /// Waits for the next coordinator update or store change and applies it.
  ///
  /// Returns `false` once the coordinator has shut down.
  pub async fn next_update(&mut self) -> bool {
    tokio::select! {
      update = self.updates.recv() => {
        let Some(update) = update else {
          return false;
        };
        self.list.apply(update);
      },
      Ok(()) = self.revisions.changed() => {
        self.refresh();
      },
      else => return false,
    }
    self.pump();
    true
  }

  /// Moves the list's scroll position. Returns the pagination outcome if the
  /// sentinel came into view.
  pub fn scroll_to(&mut self, scroll_top: u64) -> Option<Advance> {
    self.list.scroll_to(scroll_top);
    self.poll_load_more()
  }

  /// Asks for the next page of the query currently shown.
  pub fn load_more(&mut self) -> Advance {
    let query = self.list.query().unwrap_or_default().to_owned();
    self.advancer.load_next(&query)
  }

  /// Stores the row with serial `sn` as the selection, snippet reduced to
  /// plain text.
  pub fn select(&mut self, sn: u64) -> Option<SearchResult> {
    let selected = prepare_selection(self.list.find(sn)?);
    self.store.dispatch(Action::SelectResult(selected.clone()));
    Some(selected)
  }

  /// Returns `true` if the interaction hid the suggestions.
  pub fn pointer(&mut self, target: PointerTarget) -> bool {
    self.list.pointer(target)
  }

  pub fn reset(&self, paths: &[StatePath]) {
    self.store.dispatch(Action::Reset(paths.to_vec()));
  }

  /// [`Typeahead::reset`] over raw dot paths; unknown paths are skipped.
  pub fn reset_lenient<'a>(&self, paths: impl IntoIterator<Item = &'a str>) {
    self.reset(&resolve_paths(paths));
  }

  pub fn list(&self) -> &SuggestionList {
    &self.list
  }

  pub fn store(&self) -> &StoreHandle {
    &self.store
  }

  pub fn state(&self) -> TypeaheadState {
    self.store.snapshot()
  }

  fn refresh(&mut self) -> bool {
    let list = &mut self.list;
    self.store.read(|state| list.refresh(state))
  }

  fn poll_load_more(&mut self) -> Option<Advance> {
    if !self.list.take_load_more() {
      return None;
    }
    let advance = self.load_more();
    log::debug!("sentinel reached: {advance:?}");
    Some(advance)
  }
}
