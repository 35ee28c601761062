use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use the_typeahead_lib::RawResult;
use url::Url;

use super::{
  Fetcher,
  Page,
  Result,
  page_offset,
  total_pages,
};

/// Full-text search against a MediaWiki `action=query&list=search` endpoint.
#[derive(Debug, Clone)]
pub struct WikipediaFetcher {
  client:   Client,
  endpoint: Url,
}

impl WikipediaFetcher {
  pub fn new(endpoint: &str) -> Result<Self> {
    let client = Client::builder()
      .user_agent(concat!("the-typeahead/", env!("CARGO_PKG_VERSION")))
      .build()?;
    Ok(Self {
      client,
      endpoint: Url::parse(endpoint)?,
    })
  }

  pub fn request_url(&self, query: &str, page: u32, page_size: u32) -> Url {
    let mut url = self.endpoint.clone();
    url
      .query_pairs_mut()
      .append_pair("action", "query")
      .append_pair("list", "search")
      .append_pair("srsearch", query)
      .append_pair("srlimit", &page_size.to_string())
      .append_pair("sroffset", &page_offset(page, page_size).to_string())
      .append_pair("format", "json")
      .append_pair("origin", "*");
    url
  }
}

#[async_trait]
impl Fetcher for WikipediaFetcher {
  async fn fetch(&self, query: &str, page: u32, page_size: u32) -> Result<Page> {
    let url = self.request_url(query, page, page_size);
    log::debug!("fetching page {page} of {query:?}");
    let response = self.client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
      return Err(super::FetchError::Status(status));
    }
    let body = response.text().await?;
    Ok(parse_envelope(&body, page_size))
  }
}

#[derive(Deserialize)]
struct Envelope {
  query: Option<QueryBlock>,
}

#[derive(Deserialize)]
struct QueryBlock {
  searchinfo: Option<SearchInfo>,
  search:     Option<Vec<RawResult>>,
}

#[derive(Deserialize)]
struct SearchInfo {
  totalhits: Option<u64>,
}

/// Decodes a search response body.
///
/// Never fails: a body without `query.search` becomes [`Page::malformed`] and
/// is logged.
pub fn parse_envelope(body: &str, page_size: u32) -> Page {
  match serde_json::from_str::<Envelope>(body) {
    Ok(Envelope {
      query:
        Some(QueryBlock {
          search: Some(results),
          searchinfo,
        }),
    }) => {
      Page {
        results,
        total_pages: searchinfo
          .and_then(|info| info.totalhits)
          .map(|hits| total_pages(hits, page_size)),
      }
    },
    Ok(_) => {
      log::error!("search response has no result list");
      Page::malformed()
    },
    Err(err) => {
      log::error!("failed to decode search response: {err}");
      Page::malformed()
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn request_carries_search_parameters() {
    let fetcher = WikipediaFetcher::new("https://en.wikipedia.org/w/api.php").unwrap();
    let url = fetcher.request_url("rust lang", 3, 100);
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    let get = |key: &str| {
      pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
    };
    assert_eq!(get("action"), Some("query"));
    assert_eq!(get("list"), Some("search"));
    assert_eq!(get("srsearch"), Some("rust lang"));
    assert_eq!(get("srlimit"), Some("100"));
    assert_eq!(get("sroffset"), Some("200"));
    assert_eq!(get("format"), Some("json"));
    assert_eq!(get("origin"), Some("*"));
  }

  #[test]
  fn rejects_bad_endpoint() {
    assert!(WikipediaFetcher::new("not a url").is_err());
  }

  #[test]
  fn parses_results_and_total() {
    let body = r#"{
      "batchcomplete": "",
      "continue": {"sroffset": 100, "continue": "-||"},
      "query": {
        "searchinfo": {"totalhits": 250},
        "search": [
          {
            "ns": 0,
            "title": "Angular",
            "pageid": 1,
            "snippet": "<span class=\"searchmatch\">Angular</span>"
          },
          {"ns": 0, "title": "Angle", "pageid": 2, "snippet": "geometry"}
        ]
      }
    }"#;
    let page = parse_envelope(body, 100);
    assert_eq!(page.total_pages, Some(3));
    assert_eq!(page.results, [
      RawResult::new("Angular", "<span class=\"searchmatch\">Angular</span>", 1),
      RawResult::new("Angle", "geometry", 2),
    ]);
  }

  #[test]
  fn missing_total_is_unknown() {
    let page = parse_envelope(r#"{"query": {"search": []}}"#, 100);
    assert_eq!(page, Page {
      results:     Vec::new(),
      total_pages: None,
    });
  }

  #[test]
  fn malformed_bodies_become_empty_pages() {
    for body in [
      "",
      "<html>",
      "{}",
      r#"{"query": {}}"#,
      r#"{"error": {"code": "badvalue"}}"#,
    ] {
      assert_eq!(parse_envelope(body, 100), Page::malformed(), "{body}");
    }
  }
}
