//! Event plumbing shared by the typeahead crates.
//!
//! [`AsyncHook`] turns a stream of synchronous events into debounced work on a
//! background tokio task, and [`TaskController`] keeps track of which spawned
//! task is the current one so that superseded results can be dropped.

mod cancel;
mod debounce;

pub use cancel::{
  TaskController,
  TaskHandle,
};
pub use debounce::{
  AsyncHook,
  send_blocking,
};
