//! Suggestions panel visibility and click-outside dismissal.

/// Kind of element a pointer interaction landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
  /// A text input, such as the search box itself.
  TextInput,
  Other,
}

/// Where a pointer interaction happened, relative to the suggestions panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerTarget {
  /// The target is the panel or one of its descendants.
  pub within_panel: bool,
  pub element:      ElementKind,
}

impl PointerTarget {
  pub const fn inside() -> Self {
    Self {
      within_panel: true,
      element:      ElementKind::Other,
    }
  }

  pub const fn outside() -> Self {
    Self {
      within_panel: false,
      element:      ElementKind::Other,
    }
  }

  pub const fn input() -> Self {
    Self {
      within_panel: false,
      element:      ElementKind::TextInput,
    }
  }
}

/// Whether an interaction at `target` should hide the panel.
///
/// Clicking any text input never dismisses, so focusing the search box keeps
/// the suggestions open.
pub fn should_dismiss(target: PointerTarget) -> bool {
  !target.within_panel && target.element != ElementKind::TextInput
}

/// Visibility of the suggestions panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dropdown {
  visible: bool,
}

impl Dropdown {
  pub fn is_visible(&self) -> bool {
    self.visible
  }

  pub fn set_visible(&mut self, visible: bool) {
    self.visible = visible;
  }

  /// A delivered list shows the panel iff it has something to show.
  pub fn on_results(&mut self, len: usize) {
    self.visible = len > 0;
  }

  /// Returns `true` if the interaction hid a visible panel.
  pub fn on_pointer(&mut self, target: PointerTarget) -> bool {
    if self.visible && should_dismiss(target) {
      self.visible = false;
      return true;
    }
    false
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn containment_rules() {
    assert!(should_dismiss(PointerTarget::outside()));
    assert!(!should_dismiss(PointerTarget::inside()));
    assert!(!should_dismiss(PointerTarget::input()));
    // An input nested inside the panel is inside anyway.
    assert!(!should_dismiss(PointerTarget {
      within_panel: true,
      element:      ElementKind::TextInput,
    }));
  }

  #[test]
  fn dropdown_follows_results_and_clicks() {
    let mut dropdown = Dropdown::default();
    dropdown.on_results(0);
    assert!(!dropdown.is_visible());

    dropdown.on_results(4);
    assert!(dropdown.is_visible());
    assert!(!dropdown.on_pointer(PointerTarget::input()));
    assert!(!dropdown.on_pointer(PointerTarget::inside()));
    assert!(dropdown.is_visible());

    assert!(dropdown.on_pointer(PointerTarget::outside()));
    assert!(!dropdown.is_visible());
    assert!(!dropdown.on_pointer(PointerTarget::outside()));
  }
}
