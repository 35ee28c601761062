//! Shared access to the [`Store`].

use std::sync::Arc;

use parking_lot::RwLock;
use the_typeahead_lib::{
  Action,
  Store,
  TypeaheadState,
  store::Transition,
};
use tokio::sync::watch;

#[derive(Debug)]
struct Shared {
  store:    RwLock<Store>,
  revision: watch::Sender<u64>,
}

/// Cheaply clonable handle to one store.
///
/// All writes go through [`StoreHandle::dispatch`] (or
/// [`StoreHandle::transact`]), so transitions are applied one at a time in
/// arrival order. Subscribers are woken with the new revision after every
/// write.
#[derive(Debug, Clone)]
pub struct StoreHandle {
  shared: Arc<Shared>,
}

impl Default for StoreHandle {
  fn default() -> Self {
    Self::new(Store::new())
  }
}

impl StoreHandle {
  pub fn new(store: Store) -> Self {
    let (revision, _) = watch::channel(store.revision());
    Self {
      shared: Arc::new(Shared {
        store: RwLock::new(store),
        revision,
      }),
    }
  }

  pub fn dispatch(&self, action: Action) -> u64 {
    self.transact(|store| store.dispatch(action))
  }

  /// Runs `f` with exclusive access, so a read and the dispatch it leads to
  /// cannot interleave with other writers.
  pub fn transact<R>(&self, f: impl FnOnce(&mut Store) -> R) -> R {
    let (result, before, after) = {
      let mut store = self.shared.store.write();
      let before = store.revision();
      let result = f(&mut store);
      (result, before, store.revision())
    };
    if after != before {
      self.shared.revision.send_replace(after);
    }
    result
  }

  pub fn read<R>(&self, f: impl FnOnce(&TypeaheadState) -> R) -> R {
    f(self.shared.store.read().state())
  }

  pub fn snapshot(&self) -> TypeaheadState {
    self.read(TypeaheadState::clone)
  }

  pub fn revision(&self) -> u64 {
    self.shared.store.read().revision()
  }

  pub fn transitions(&self) -> Vec<Transition> {
    self.shared.store.read().log().cloned().collect()
  }

  /// Receiver that observes the revision after every write.
  pub fn subscribe(&self) -> watch::Receiver<u64> {
    self.shared.revision.subscribe()
  }
}

#[cfg(test)]
mod tests {
  use the_typeahead_lib::{
    LoadState,
    RawResult,
  };

  use super::*;

  #[tokio::test]
  async fn subscribers_see_every_write() {
    let store = StoreHandle::default();
    let mut revisions = store.subscribe();

    store.dispatch(Action::BeginSearch);
    revisions.changed().await.unwrap();
    assert_eq!(*revisions.borrow_and_update(), 1);

    store.dispatch(Action::SearchSucceeded {
      query:       "q".into(),
      results:     vec![RawResult::new("a", "", 1)],
      page:        1,
      total_pages: Some(1),
    });
    revisions.changed().await.unwrap();
    assert_eq!(*revisions.borrow_and_update(), 2);
    assert_eq!(store.read(|state| state.search_loading()), LoadState::Idle);
  }

  #[test]
  fn read_only_transaction_does_not_notify() {
    let store = StoreHandle::default();
    let revisions = store.subscribe();
    let loading = store.transact(|store| store.state().search_loading());
    assert_eq!(loading, LoadState::NotStarted);
    assert!(!revisions.has_changed().unwrap());
  }

  #[test]
  fn clones_share_state() {
    let store = StoreHandle::default();
    let other = store.clone();
    other.dispatch(Action::SetSearchLoading(true));
    assert!(store.read(|state| state.search_loading().is_loading()));
    assert_eq!(store.transitions().len(), 1);
    assert_eq!(store.snapshot(), other.snapshot());
  }
}
