//! Partial resets of the typeahead state.
//!
//! A [`StatePath`] names either a whole field of [`TypeaheadState`] or one
//! entry of a keyed field (`queries.<query>`, `queryPageInfo.<query>`).
//! Resetting copies the value found at that path in the initial state; paths
//! that are not mentioned keep their current value.

use std::{
  fmt,
  str::FromStr,
};

use thiserror::Error;

use crate::state::TypeaheadState;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResetPathError {
  #[error("empty reset path")]
  Empty,
  #[error("unknown state field `{0}`")]
  UnknownField(String),
  #[error("state field `{field}` has no nested entries (in `{path}`)")]
  NotKeyed { field: &'static str, path: String },
}

/// Top-level fields of the state aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
  Queries,
  QueryPageInfo,
  SelectedResult,
  IsSearchLoading,
  IsNextPageLoading,
  LastError,
}

impl Field {
  pub const ALL: [Field; 6] = [
    Field::Queries,
    Field::QueryPageInfo,
    Field::SelectedResult,
    Field::IsSearchLoading,
    Field::IsNextPageLoading,
    Field::LastError,
  ];

  pub fn name(self) -> &'static str {
    match self {
      Self::Queries => "queries",
      Self::QueryPageInfo => "queryPageInfo",
      Self::SelectedResult => "selectedResult",
      Self::IsSearchLoading => "isSearchLoading",
      Self::IsNextPageLoading => "isNextPageLoading",
      Self::LastError => "lastError",
    }
  }

  /// Accepts the camelCase names as well as their snake_case spelling.
  pub fn from_name(name: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|field| {
      field.name() == name || field.name().eq_ignore_ascii_case(&name.replace('_', ""))
    })
  }

  fn is_keyed(self) -> bool {
    matches!(self, Self::Queries | Self::QueryPageInfo)
  }
}

impl fmt::Display for Field {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StatePath {
  Field(Field),
  /// `queries.<query>`
  QueryEntry(String),
  /// `queryPageInfo.<query>`
  PageInfoEntry(String),
}

impl StatePath {
  /// Parses a dot path strictly: unknown fields and nested paths below
  /// non-keyed fields are errors.
  ///
  /// Everything after the first dot is the entry key, so queries that
  /// contain dots themselves stay addressable.
  pub fn parse(path: &str) -> Result<Self, ResetPathError> {
    let path = path.trim();
    if path.is_empty() {
      return Err(ResetPathError::Empty);
    }
    let (head, rest) = match path.split_once('.') {
      Some((head, rest)) => (head, Some(rest)),
      None => (path, None),
    };
    let field = Field::from_name(head).ok_or_else(|| ResetPathError::UnknownField(head.into()))?;
    match (field, rest) {
      (field, None) => Ok(Self::Field(field)),
      (Field::Queries, Some(key)) => Ok(Self::QueryEntry(key.into())),
      (Field::QueryPageInfo, Some(key)) => Ok(Self::PageInfoEntry(key.into())),
      (field, Some(_)) => {
        debug_assert!(!field.is_keyed());
        Err(ResetPathError::NotKeyed {
          field: field.name(),
          path:  path.into(),
        })
      },
    }
  }

  /// Parses a comma separated list of paths.
  pub fn parse_list(paths: &str) -> Result<Vec<Self>, ResetPathError> {
    paths.split(',').map(Self::parse).collect()
  }
}

impl FromStr for StatePath {
  type Err = ResetPathError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

impl From<Field> for StatePath {
  fn from(field: Field) -> Self {
    Self::Field(field)
  }
}

impl fmt::Display for StatePath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Field(field) => write!(f, "{field}"),
      Self::QueryEntry(key) => write!(f, "{}.{key}", Field::Queries),
      Self::PageInfoEntry(key) => write!(f, "{}.{key}", Field::QueryPageInfo),
    }
  }
}

/// Restores every path in `paths` to its initial value.
pub fn reset_subset(mut state: TypeaheadState, paths: &[StatePath]) -> TypeaheadState {
  let initial = TypeaheadState::initial();
  for path in paths {
    match path {
      StatePath::Field(Field::Queries) => state.queries = initial.queries.clone(),
      StatePath::Field(Field::QueryPageInfo) => {
        state.query_page_info = initial.query_page_info.clone()
      },
      StatePath::Field(Field::SelectedResult) => {
        state.selected_result = initial.selected_result.clone()
      },
      StatePath::Field(Field::IsSearchLoading) => {
        state.is_search_loading = initial.is_search_loading
      },
      StatePath::Field(Field::IsNextPageLoading) => {
        state.is_next_page_loading = initial.is_next_page_loading
      },
      StatePath::Field(Field::LastError) => state.last_error = initial.last_error.clone(),
      StatePath::QueryEntry(key) => match initial.queries.get(key) {
        Some(list) => {
          state.queries.insert(key.clone(), list.clone());
        },
        None => {
          state.queries.remove(key);
        },
      },
      StatePath::PageInfoEntry(key) => match initial.query_page_info.get(key) {
        Some(info) => {
          state.query_page_info.insert(key.clone(), *info);
        },
        None => {
          state.query_page_info.remove(key);
        },
      },
    }
  }
  state
}

/// Parses raw dot paths, skipping (and logging) those that do not resolve.
pub fn resolve_paths<'a>(paths: impl IntoIterator<Item = &'a str>) -> Vec<StatePath> {
  paths
    .into_iter()
    .filter_map(|path| {
      StatePath::parse(path)
        .inspect_err(|err| log::debug!("skipping reset path `{path}`: {err}"))
        .ok()
    })
    .collect()
}

/// Best-effort variant of [`reset_subset`] over raw dot paths.
///
/// Paths that do not resolve are skipped instead of failing the whole reset.
pub fn reset_paths<'a>(
  state: TypeaheadState,
  paths: impl IntoIterator<Item = &'a str>,
) -> TypeaheadState {
  reset_subset(state, &resolve_paths(paths))
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use super::*;
  use crate::{
    result::{
      RawResult,
      SearchResult,
    },
    state::{
      Action,
      LoadState,
      SearchError,
      reduce,
    },
  };

  fn populated() -> TypeaheadState {
    let state = reduce(TypeaheadState::initial(), Action::SearchSucceeded {
      query:       "rust".into(),
      results:     vec![RawResult::new("Rust", "lang", 1), RawResult::new("Rusty", "", 2)],
      page:        1,
      total_pages: Some(3),
    });
    let state = reduce(state, Action::SearchSucceeded {
      query:       "go".into(),
      results:     vec![RawResult::new("Go", "", 3)],
      page:        1,
      total_pages: Some(1),
    });
    let state = reduce(state, Action::BeginNextPage);
    let state = reduce(state, Action::NextPageFailed(SearchError::new("timeout")));
    reduce(
      state,
      Action::SelectResult(SearchResult::numbered(RawResult::new("Rust", "lang", 1), 1)),
    )
  }

  #[test]
  fn parses_fields_and_entries() {
    assert_eq!(
      StatePath::parse("queryPageInfo"),
      Ok(StatePath::Field(Field::QueryPageInfo))
    );
    assert_eq!(
      StatePath::parse("query_page_info"),
      Ok(StatePath::Field(Field::QueryPageInfo))
    );
    assert_eq!(
      StatePath::parse("queries.node.js"),
      Ok(StatePath::QueryEntry("node.js".into()))
    );
    assert_eq!(
      StatePath::parse("queryPageInfo.rust"),
      Ok(StatePath::PageInfoEntry("rust".into()))
    );
  }

  #[test]
  fn strict_parse_rejects_typos() {
    assert_eq!(
      StatePath::parse("querys"),
      Err(ResetPathError::UnknownField("querys".into()))
    );
    assert!(matches!(
      StatePath::parse("selectedResult.title"),
      Err(ResetPathError::NotKeyed { field: "selectedResult", .. })
    ));
    assert_eq!(StatePath::parse("  "), Err(ResetPathError::Empty));
  }

  #[test]
  fn display_round_trips_through_parse() {
    for path in [
      StatePath::Field(Field::LastError),
      StatePath::QueryEntry("a b".into()),
      StatePath::PageInfoEntry("x".into()),
    ] {
      assert_eq!(path.to_string().parse::<StatePath>(), Ok(path));
    }
  }

  #[test]
  fn resetting_page_info_leaves_siblings_identical() {
    let before = populated();
    let after = reset_subset(before.clone(), &[Field::QueryPageInfo.into()]);

    assert!(after.query_page_info().is_empty());
    assert_eq!(after.selected_result(), before.selected_result());
    for (query, list) in before.queries() {
      assert!(Arc::ptr_eq(list, after.results(query).unwrap()));
    }
    assert_eq!(after.last_error(), before.last_error());
    assert_eq!(after.next_page_loading(), before.next_page_loading());
  }

  #[test]
  fn entry_reset_only_drops_that_query() {
    let after = reset_subset(populated(), &[StatePath::QueryEntry("go".into())]);
    assert!(after.results("go").is_none());
    assert!(after.results("rust").is_some());
    assert!(after.page_info("go").is_some());
  }

  #[test]
  fn several_paths_at_once() {
    let after = reset_subset(populated(), &[
      Field::LastError.into(),
      Field::IsNextPageLoading.into(),
      Field::SelectedResult.into(),
    ]);
    assert!(after.last_error().is_none());
    assert!(after.selected_result().is_none());
    assert_eq!(after.next_page_loading(), LoadState::NotStarted);
    assert_eq!(after.results("rust").map(|list| list.len()), Some(2));
  }

  #[test]
  fn lenient_reset_skips_unresolvable_paths() {
    let before = populated();
    let after = reset_paths(before.clone(), [
      "bogus",
      "lastError.message",
      "queryPageInfo.rust.currentPage",
      "lastError",
    ]);
    assert!(after.last_error().is_none());
    assert_eq!(after.query_page_info(), before.query_page_info());
    assert_eq!(after.selected_result(), before.selected_result());
  }

  #[test]
  fn reset_through_reducer() {
    let after = reduce(populated(), Action::Reset(vec![Field::Queries.into()]));
    assert!(after.queries().next().is_none());
    assert_eq!(after.page_info("rust").map(|info| info.total_pages), Some(Some(3)));
  }
}
