//! Synchronous core of the typeahead: the per-query result cache and the
//! geometry used to render it.
//!
//! Nothing in this crate performs I/O or spawns tasks. The async side lives
//! in the `the-typeahead` crate and drives the [`store::Store`] through typed
//! [`state::Action`]s.

pub mod dismiss;
pub mod pagination;
pub mod reset;
pub mod result;
pub mod selection;
pub mod sentinel;
pub mod state;
pub mod store;
pub mod window;

pub use result::{
  RawResult,
  SearchResult,
};
pub use state::{
  Action,
  LoadState,
  QueryPageInfo,
  SearchError,
  TypeaheadState,
};
pub use store::Store;
