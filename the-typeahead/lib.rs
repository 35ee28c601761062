//! Async side of the typeahead.
//!
//! [`coordinator::RequestCoordinator`] turns keystrokes into cache lookups
//! and fetches, [`pagination::PaginationAdvancer`] loads further pages, and
//! [`suggestions::SuggestionList`] keeps the rendered window of the active
//! query. [`Typeahead`] ties them to one [`handle::StoreHandle`].

pub mod config;
pub mod coordinator;
pub mod fetch;
pub mod handle;
pub mod pagination;
pub mod paths;
pub mod session;
pub mod suggestions;

pub use config::Config;
pub use handle::StoreHandle;
pub use session::Typeahead;
