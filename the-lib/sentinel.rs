//! Infinite-scroll trigger.
//!
//! A sentinel sits right after the last rendered item. The trigger is polled
//! with the current scroll position and fires once each time the sentinel
//! goes from hidden to visible. It does not know whether more data exists;
//! deciding that is up to whoever handles the trigger.

use crate::window::{
  Viewport,
  Window,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SentinelTrigger {
  height:       u32,
  /// Minimum intersection ratio, exclusive.
  threshold:    f32,
  intersecting: bool,
}

impl Default for SentinelTrigger {
  fn default() -> Self {
    Self::new(1, 0.0)
  }
}

impl SentinelTrigger {
  pub fn new(height: u32, threshold: f32) -> Self {
    Self {
      height:       height.max(1),
      threshold:    if threshold.is_nan() {
        0.0
      } else {
        threshold.clamp(0.0, 1.0)
      },
      intersecting: false,
    }
  }

  pub fn height(&self) -> u32 {
    self.height
  }

  pub fn is_intersecting(&self) -> bool {
    self.intersecting
  }

  /// Fraction of the sentinel (top edge at `top`) inside the visible band
  /// `[scroll_top, scroll_top + viewport_height)`.
  pub fn intersection_ratio(&self, top: u64, scroll_top: u64, viewport_height: u32) -> f32 {
    let visible_end = scroll_top.saturating_add(u64::from(viewport_height));
    let sentinel_end = top.saturating_add(u64::from(self.height));
    let overlap = visible_end
      .min(sentinel_end)
      .saturating_sub(scroll_top.max(top));
    overlap as f32 / self.height as f32
  }

  /// Records one visibility observation. Returns `true` on a crossing into
  /// view.
  pub fn observe(&mut self, ratio: f32) -> bool {
    let intersecting = ratio > self.threshold;
    let crossed = intersecting && !self.intersecting;
    self.intersecting = intersecting;
    crossed
  }

  /// Observes the sentinel placed after `window`'s last item.
  pub fn poll(&mut self, viewport: &Viewport, window: &Window, scroll_top: u64) -> bool {
    let top = (window.end as u64).saturating_mul(u64::from(viewport.item_height()));
    let ratio = self.intersection_ratio(top, scroll_top, viewport.viewport_height());
    self.observe(ratio)
  }

  /// Forgets the last observation, e.g. when the list is replaced.
  pub fn reset(&mut self) {
    self.intersecting = false;
  }
}
