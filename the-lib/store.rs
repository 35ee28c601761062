//! The single owned state container.

use std::collections::VecDeque;

use crate::state::{
  Action,
  TypeaheadState,
  reduce,
};

/// Default number of transitions kept in the log.
const DEFAULT_LOG_CAPACITY: usize = 256;

/// One applied transition, as recorded in the store's log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
  /// Revision of the state produced by this transition.
  pub revision: u64,
  pub action:   &'static str,
  pub query:    Option<String>,
}

/// Owns the [`TypeaheadState`] and applies [`Action`]s to it in order.
///
/// Every dispatch bumps the revision and appends a [`Transition`] record to a
/// bounded log. Lists are never edited in place; readers holding a cloned
/// `ResultList` keep seeing the version they read.
#[derive(Debug)]
pub struct Store {
  state:        TypeaheadState,
  revision:     u64,
  log:          VecDeque<Transition>,
  log_capacity: usize,
}

impl Default for Store {
  fn default() -> Self {
    Self::new()
  }
}

impl Store {
  pub fn new() -> Self {
    Self::with_log_capacity(DEFAULT_LOG_CAPACITY)
  }

  pub fn with_log_capacity(log_capacity: usize) -> Self {
    Self {
      state: TypeaheadState::initial(),
      revision: 0,
      log: VecDeque::with_capacity(log_capacity.min(DEFAULT_LOG_CAPACITY)),
      log_capacity,
    }
  }

  pub fn state(&self) -> &TypeaheadState {
    &self.state
  }

  /// Number of transitions applied so far.
  pub fn revision(&self) -> u64 {
    self.revision
  }

  /// Most recent transitions, oldest first.
  pub fn log(&self) -> impl Iterator<Item = &Transition> {
    self.log.iter()
  }

  pub fn dispatch(&mut self, action: Action) -> u64 {
    let name = action.name();
    let query = action.query().map(str::to_owned);
    log::trace!("dispatch {name} (query: {query:?})");

    self.state = reduce(std::mem::take(&mut self.state), action);
    self.revision += 1;

    if self.log_capacity > 0 {
      if self.log.len() == self.log_capacity {
        self.log.pop_front();
      }
      self.log.push_back(Transition {
        revision: self.revision,
        action: name,
        query,
      });
    }
    self.revision
  }
}
