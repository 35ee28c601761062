//! Single-flight cancellation for spawned tasks.
//!
//! A [`TaskController`] owns a generation counter. Every call to
//! [`TaskController::restart`] bumps the generation and hands out a
//! [`TaskHandle`] tagged with it; all handles from earlier generations are
//! canceled from that point on. Cancellation is cooperative: a task keeps
//! running and checks its handle before publishing a result.

use std::sync::{
  Arc,
  atomic::{
    AtomicU64,
    Ordering,
  },
};

#[derive(Debug, Default)]
struct Shared {
  generation: AtomicU64,
}

impl Shared {
  fn advance(&self) -> u64 {
    self.generation.fetch_add(1, Ordering::AcqRel) + 1
  }
}

/// Hands out [`TaskHandle`]s and cancels all but the latest one.
///
/// Dropping the controller cancels the current task as well.
#[derive(Debug, Default)]
pub struct TaskController {
  shared: Arc<Shared>,
}

impl TaskController {
  pub fn new() -> Self {
    Self::default()
  }

  /// Cancels the current task (if any) and returns a handle for a new one.
  pub fn restart(&mut self) -> TaskHandle {
    let generation = self.shared.advance();
    TaskHandle {
      shared: self.shared.clone(),
      generation,
    }
  }

  /// Cancels the current task without starting a new one.
  pub fn cancel(&mut self) {
    self.shared.advance();
  }

  /// The generation of the most recently started (or canceled) task.
  pub fn generation(&self) -> u64 {
    self.shared.generation.load(Ordering::Acquire)
  }
}

impl Drop for TaskController {
  fn drop(&mut self) {
    self.cancel();
  }
}

/// Cancellation token for one task generation.
#[derive(Debug, Clone)]
pub struct TaskHandle {
  shared:     Arc<Shared>,
  generation: u64,
}

impl TaskHandle {
  pub fn generation(&self) -> u64 {
    self.generation
  }

  /// Whether a newer task has been started (or the task was canceled).
  pub fn is_canceled(&self) -> bool {
    self.shared.generation.load(Ordering::Acquire) != self.generation
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn restart_cancels_previous_generation() {
    let mut controller = TaskController::new();
    let first = controller.restart();
    assert!(!first.is_canceled());

    let second = controller.restart();
    assert!(first.is_canceled());
    assert!(!second.is_canceled());
    assert!(second.generation() > first.generation());
    assert_eq!(controller.generation(), second.generation());
  }

  #[test]
  fn cancel_and_drop_cancel_current() {
    let mut controller = TaskController::new();
    let handle = controller.restart();
    controller.cancel();
    assert!(handle.is_canceled());

    let handle = controller.restart();
    drop(controller);
    assert!(handle.is_canceled());
  }
}
