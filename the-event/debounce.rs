//! Utilities for declaring an async (usually debounced) hook

use std::time::Duration;

use futures_executor::block_on;
use tokio::{
  sync::mpsc::{
    self,
    Sender,
    error::TrySendError,
  },
  time::Instant,
};

/// Maximum time to block when sending to a full channel.
/// Keystrokes arrive from the UI loop, which must never stall on a busy hook.
const SEND_TIMEOUT_MS: u64 = 2;

/// Default channel capacity for spawned hooks.
const CHANNEL_CAPACITY: usize = 256;

/// A background event handler with a single debounce timer.
///
/// Events are pushed through the channel returned by [`AsyncHook::spawn`].
/// Every event is handed to [`AsyncHook::handle_event`] as soon as it arrives,
/// together with the currently armed deadline (if any). The hook answers with
/// the deadline it wants armed next: returning a later instant restarts the
/// quiescence window, returning the passed-in deadline keeps it, and `None`
/// disarms it. Once the armed deadline passes without a new event,
/// [`AsyncHook::finish_debounce`] runs.
pub trait AsyncHook: Sync + Send + 'static + Sized {
  type Event: Sync + Send + 'static;

  /// Called immediately whenever an event is received.
  fn handle_event(&mut self, event: Self::Event, timeout: Option<Instant>) -> Option<Instant>;

  /// Called whenever the debounce deadline is reached.
  fn finish_debounce(&mut self);

  /// Called once after every sender has been dropped.
  fn on_close(&mut self) {}

  fn spawn(self) -> mpsc::Sender<Self::Event> {
    self.spawn_with_capacity(CHANNEL_CAPACITY)
  }

  fn spawn_with_capacity(self, capacity: usize) -> mpsc::Sender<Self::Event> {
    let (tx, rx) = mpsc::channel(capacity);
    // Only spawn the worker inside a runtime so that synchronous unit tests
    // can construct hooks. Without a worker the channel is closed immediately.
    if tokio::runtime::Handle::try_current().is_ok() {
      tokio::spawn(run(self, rx));
    } else {
      log::debug!("async hook created outside of a tokio runtime, events will be dropped");
    }
    tx
  }
}

async fn run<Hook: AsyncHook>(mut hook: Hook, mut rx: mpsc::Receiver<Hook::Event>) {
  let mut deadline = None;
  loop {
    let event = match deadline {
      Some(deadline_) => {
        match tokio::time::timeout_at(deadline_, rx.recv()).await {
          Ok(event) => event,
          Err(_) => {
            deadline = None;
            hook.finish_debounce();
            continue;
          },
        }
      },
      None => rx.recv().await,
    };
    let Some(event) = event else {
      break;
    };
    deadline = hook.handle_event(event, deadline);
  }
  hook.on_close();
}

/// Send an event to a hook, blocking only briefly if its channel is full.
///
/// Tries a non-blocking send first. If the channel is full, blocks for at most
/// `SEND_TIMEOUT_MS` milliseconds and then drops the event.
pub fn send_blocking<T>(tx: &Sender<T>, data: T) {
  match tx.try_send(data) {
    Ok(()) => {},
    Err(TrySendError::Full(data)) => {
      if block_on(tx.send_timeout(data, Duration::from_millis(SEND_TIMEOUT_MS))).is_err() {
        log::warn!("hook channel is full, dropping event");
      }
    },
    Err(TrySendError::Closed(_)) => {
      log::warn!("Attempted to send to closed channel");
    },
  }
}
