//! Preparing results for selection and display.
//!
//! Upstream snippets are HTML fragments. Before a result is stored as the
//! selection its snippet is reduced to the plain text content of the
//! fragment, the same text a DOM would report for it: tags and comments are
//! dropped, character references are decoded and the bodies of raw text
//! elements (`script`, `style`) are kept as inert text.

use std::borrow::Cow;

use crate::result::SearchResult;

/// Default display width of a title, in characters.
pub const DEFAULT_TITLE_MAX_CHARS: usize = 40;

/// Returns a copy of `result` whose snippet is plain text.
pub fn prepare_selection(result: &SearchResult) -> SearchResult {
  SearchResult {
    snippet: html_to_text(&result.snippet),
    ..result.clone()
  }
}

/// Trims `title` and cuts it to `max_chars` characters followed by `...`.
pub fn truncate_title(title: &str, max_chars: usize) -> Cow<'_, str> {
  let title = title.trim();
  match title.char_indices().nth(max_chars) {
    Some((cut, _)) => Cow::Owned(format!("{}...", &title[..cut])),
    None => Cow::Borrowed(title),
  }
}

/// Text content of an HTML fragment.
pub fn html_to_text(html: &str) -> String {
  let mut out = String::with_capacity(html.len());
  let mut rest = html;
  while let Some(pos) = rest.find(['<', '&']) {
    out.push_str(&rest[..pos]);
    rest = &rest[pos..];
    rest = if rest.starts_with('<') {
      skip_markup(rest, &mut out)
    } else {
      decode_reference(rest, &mut out)
    };
  }
  out.push_str(rest);
  out
}

/// Elements whose content is text rather than markup.
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// `input` starts with `<`. Returns the remainder after the markup.
fn skip_markup<'a>(input: &'a str, out: &mut String) -> &'a str {
  if let Some(comment) = input.strip_prefix("<!--") {
    return comment.find("-->").map_or("", |end| &comment[end + 3..]);
  }

  let after = &input[1..];
  let starts_tag = after
    .chars()
    .next()
    .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'));
  if !starts_tag {
    out.push('<');
    return after;
  }

  // An unterminated tag swallows the rest of the input.
  let Some(end) = tag_end(after) else {
    return "";
  };
  let rest = &after[end + 1..];

  let name: String = after
    .chars()
    .take_while(|c| c.is_ascii_alphanumeric())
    .map(|c| c.to_ascii_lowercase())
    .collect();
  if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
    let close = format!("</{name}");
    let body_end = find_ignore_ascii_case(rest, &close).unwrap_or(rest.len());
    out.push_str(&rest[..body_end]);
    return &rest[body_end..];
  }
  rest
}

/// Index of the `>` closing a tag, ignoring any inside quoted attributes.
fn tag_end(tag: &str) -> Option<usize> {
  let mut quote = None;
  for (i, c) in tag.char_indices() {
    match (quote, c) {
      (None, '"' | '\'') => quote = Some(c),
      (Some(q), c) if c == q => quote = None,
      (None, '>') => return Some(i),
      _ => {},
    }
  }
  None
}

fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
  haystack
    .as_bytes()
    .windows(needle.len())
    .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

/// Longest reference name we bother to look for a terminating `;` in.
const MAX_REFERENCE_LEN: usize = 32;

/// `input` starts with `&`. Returns the remainder after the reference.
fn decode_reference<'a>(input: &'a str, out: &mut String) -> &'a str {
  let body = &input[1..];
  let semi = body
    .char_indices()
    .take(MAX_REFERENCE_LEN)
    .find(|&(_, c)| c == ';')
    .map(|(i, _)| i);
  let decoded = semi.and_then(|semi| decode_reference_name(&body[..semi]));
  match (semi, decoded) {
    (Some(semi), Some(c)) => {
      out.push(c);
      &body[semi + 1..]
    },
    _ => {
      out.push('&');
      body
    },
  }
}

fn decode_reference_name(name: &str) -> Option<char> {
  if let Some(numeric) = name.strip_prefix('#') {
    let code = match numeric.strip_prefix(['x', 'X']) {
      Some(hex) => u32::from_str_radix(hex, 16).ok()?,
      None => numeric.parse::<u32>().ok()?,
    };
    return Some(
      char::from_u32(code)
        .filter(|&c| c != '\0')
        .unwrap_or(char::REPLACEMENT_CHARACTER),
    );
  }
  let c = match name {
    "amp" => '&',
    "lt" => '<',
    "gt" => '>',
    "quot" => '"',
    "apos" => '\'',
    "nbsp" => '\u{a0}',
    "ndash" => '\u{2013}',
    "mdash" => '\u{2014}',
    "hellip" => '\u{2026}',
    _ => return None,
  };
  Some(c)
}
