//! Next-page gating.

use crate::state::{
  LoadState,
  QueryPageInfo,
};

/// Outcome of asking whether another page may be requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
  /// Request this (1-based) page.
  Fetch { page: u32 },
  /// Every known page has been fetched. Advisory only.
  Exhausted { current_page: u32, total_pages: u32 },
  /// A next-page fetch is still outstanding.
  InFlight,
}

/// Decides the next page for a query from its pagination info.
///
/// Missing info counts as page 1 of an unbounded result set, and so does an
/// unknown total.
pub fn next_page(info: Option<QueryPageInfo>) -> NextPage {
  let current_page = info.map_or(1, |info| info.current_page);
  match info.and_then(|info| info.total_pages) {
    Some(total_pages) if current_page >= total_pages => {
      NextPage::Exhausted {
        current_page,
        total_pages,
      }
    },
    _ => {
      NextPage::Fetch {
        page: current_page.saturating_add(1),
      }
    },
  }
}

/// [`next_page`], but also refusing while a next-page fetch is outstanding.
pub fn next_page_gated(info: Option<QueryPageInfo>, loading: LoadState) -> NextPage {
  if loading.is_loading() {
    NextPage::InFlight
  } else {
    next_page(info)
  }
}
