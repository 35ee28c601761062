//! Fixed-height list virtualization.
//!
//! Given the item count and the scroll offset of the container, [`Viewport`]
//! works out which slice of items has to be rendered and where to translate
//! it to. All math is in whole pixels.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WindowError {
  #[error("item height must be non-zero")]
  ZeroItemHeight,
}

/// Fixed geometry of a virtualized list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
  item_height:     u32,
  viewport_height: u32,
  buffer_items:    usize,
}

/// The rendered part of the list for one scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
  /// First rendered item.
  pub start:          usize,
  /// One past the last rendered item.
  pub end:            usize,
  /// Vertical translation of the rendered slice, `start * item_height`.
  pub offset:         u64,
  /// Height of the full list, used to size the scroll spacer.
  pub content_height: u64,
}

impl Window {
  pub fn len(&self) -> usize {
    self.end - self.start
  }

  pub fn is_empty(&self) -> bool {
    self.start == self.end
  }

  /// The rendered items. Clamped to `items`, so a stale window never panics.
  pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
    let end = self.end.min(items.len());
    &items[self.start.min(end)..end]
  }

  pub fn css_transform(&self) -> String {
    format!("translateY({}px)", self.offset)
  }
}

impl Viewport {
  pub fn new(
    item_height: u32,
    viewport_height: u32,
    buffer_items: usize,
  ) -> Result<Self, WindowError> {
    if item_height == 0 {
      return Err(WindowError::ZeroItemHeight);
    }
    Ok(Self {
      item_height,
      viewport_height,
      buffer_items,
    })
  }

  pub fn item_height(&self) -> u32 {
    self.item_height
  }

  pub fn viewport_height(&self) -> u32 {
    self.viewport_height
  }

  pub fn buffer_items(&self) -> usize {
    self.buffer_items
  }

  /// Number of items that fit in the viewport, rounded up.
  pub fn items_in_view(&self) -> usize {
    self.viewport_height.div_ceil(self.item_height) as usize
  }

  pub fn content_height(&self, total_items: usize) -> u64 {
    total_items as u64 * u64::from(self.item_height)
  }

  /// Computes the rendered window. Pure: equal inputs give equal windows.
  pub fn window(&self, total_items: usize, scroll_top: u64) -> Window {
    let span = self.items_in_view() + self.buffer_items;

    let mut start = usize::try_from(scroll_top / u64::from(self.item_height)).unwrap_or(usize::MAX);
    let mut end = start.saturating_add(span).min(total_items);

    // Once the raw window touches the end, pin it to the bottom so the last
    // items are always fully rendered.
    if end >= total_items {
      start = total_items.saturating_sub(span);
      end = total_items;
    }

    Window {
      start,
      end,
      offset: start as u64 * u64::from(self.item_height),
      content_height: self.content_height(total_items),
    }
  }
}
